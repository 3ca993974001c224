use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{raw_mark, required_index, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_marks_set(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let student_index = required_index(&req.params, "studentIndex")?;
    let column = required_str(&req.params, "column")?;
    let raw = raw_mark(&req.params, "value");

    let upd = state.roster.set_mark(student_index, column, &raw)?;
    if upd.coerced {
        tracing::debug!(raw = %raw, column, "mark coerced to 0");
    }

    Ok(json!({
        "studentIndex": student_index,
        "column": column,
        "mark": upd.mark,
        "coerced": upd.coerced,
        "total": upd.total,
        "gradePoint": upd.grade_point,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "marks.set" => Some(respond(&req.id, handle_marks_set(state, req))),
        _ => None,
    }
}
