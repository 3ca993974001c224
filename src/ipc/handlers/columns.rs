use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::required_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn columns_result(state: &AppState) -> serde_json::Value {
    json!({
        "criteriaColumns": state.roster.criteria_columns(),
        "columns": state.roster.display_columns(),
    })
}

fn handle_columns_add(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let name = required_str(&req.params, "name")?;
    let added = state.roster.add_criteria_column(name);
    if !added {
        tracing::debug!(name, "column add ignored");
    }
    let mut out = columns_result(state);
    out["added"] = json!(added);
    Ok(out)
}

fn handle_columns_rename(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let old_name = required_str(&req.params, "oldName")?;
    let new_name = required_str(&req.params, "newName")?;
    let outcome = state.roster.rename_criteria_column(old_name, new_name)?;
    if outcome.merged {
        tracing::warn!(
            old_name,
            new_name,
            "column renamed onto an existing column; its marks were overwritten"
        );
    }
    let mut out = columns_result(state);
    out["renamed"] = json!(outcome.renamed);
    out["merged"] = json!(outcome.merged);
    Ok(out)
}

fn handle_columns_delete(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let name = required_str(&req.params, "name")?;
    let removed = state.roster.delete_criteria_column(name);
    let mut out = columns_result(state);
    out["removed"] = json!(removed);
    Ok(out)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "columns.list" => Ok(columns_result(state)),
        "columns.add" => handle_columns_add(state, req),
        "columns.rename" => handle_columns_rename(state, req),
        "columns.delete" => handle_columns_delete(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
