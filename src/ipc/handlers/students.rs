use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::str_or_empty;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_students_list(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({ "students": state.roster.students() }))
}

fn handle_students_create(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let display_name = str_or_empty(&req.params, "displayName");
    let external_id = str_or_empty(&req.params, "externalId");
    let section = str_or_empty(&req.params, "section");

    let index = state
        .roster
        .add_student(display_name, external_id, section)?;
    let student_id = state
        .roster
        .student(index)
        .map(|s| s.id.clone())
        .unwrap_or_default();
    tracing::debug!(index, student_id = %student_id, "student created");

    Ok(json!({
        "studentId": student_id,
        "index": index,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "students.list" => handle_students_list(state),
        "students.create" => handle_students_create(state, req),
        _ => return None,
    };
    Some(respond(&req.id, res))
}
