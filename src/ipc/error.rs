use crate::roster::RosterError;
use serde_json::json;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<RosterError> for HandlerErr {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::Validation(message) => HandlerErr {
                code: "validation_failed",
                message,
                details: None,
            },
            RosterError::NotFound { what, ref key } => HandlerErr {
                code: "not_found",
                message: e.to_string(),
                details: Some(json!({ what: key })),
            },
        }
    }
}

/// Collapse a handler result into the response envelope.
pub fn respond(id: &str, res: Result<serde_json::Value, HandlerErr>) -> serde_json::Value {
    match res {
        Ok(v) => ok(id, v),
        Err(e) => e.response(id),
    }
}
