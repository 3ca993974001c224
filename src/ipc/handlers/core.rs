use crate::ipc::error::{ok, respond, HandlerErr};
use crate::ipc::helpers::str_or_empty;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "students": state.roster.students().len(),
            "criteriaColumns": state.roster.criteria_columns().len(),
        }),
    )
}

fn handle_roster_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let snapshot = state.roster.snapshot();
    respond(
        &req.id,
        serde_json::to_value(&snapshot).map_err(|e| HandlerErr {
            code: "internal",
            message: e.to_string(),
            details: None,
        }),
    )
}

fn handle_set_title(state: &mut AppState, req: &Request) -> serde_json::Value {
    // An empty title is allowed here; export is where it is required.
    let title = str_or_empty(&req.params, "title");
    state.roster.set_title(title);
    ok(&req.id, json!({ "title": state.roster.title() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "roster.get" => Some(handle_roster_get(state, req)),
        "roster.setTitle" => Some(handle_set_title(state, req)),
        _ => None,
    }
}
