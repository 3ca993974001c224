use crate::ipc::error::HandlerErr;
use serde_json::Value;

pub fn required_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Missing keys read as empty so presence checks happen in the store.
pub fn str_or_empty<'a>(params: &'a Value, key: &str) -> &'a str {
    params.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

pub fn required_index(params: &Value, key: &str) -> Result<usize, HandlerErr> {
    let Some(v) = params.get(key) else {
        return Err(HandlerErr::bad_params(format!("missing {}", key)));
    };
    v.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: format!("{} must be a non-negative integer", key),
            details: Some(serde_json::json!({ key: v })),
        })
}

/// Mark cells arrive as typed text, but plain JSON numbers are accepted too.
pub fn raw_mark(params: &Value, key: &str) -> String {
    match params.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
