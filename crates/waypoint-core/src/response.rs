//! Tagged response envelopes for drivers that speak JSON.
//!
//! Every operation outcome maps to either `{"success": true, "data": ...}`
//! or `{"success": false, "error": {"code", "message", "details"}}`, with
//! codes from [`EngineError::code`].

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::EngineError;

/// Wrap a successful payload.
pub fn success<T: Serialize>(data: &T) -> Value {
    json!({
        "success": true,
        "data": serde_json::to_value(data).unwrap_or(Value::Null),
    })
}

/// Wrap an engine error.
pub fn failure(err: &EngineError) -> Value {
    let mut error = json!({
        "code": err.code(),
        "message": err.to_string(),
    });
    let details = err.details();
    if details != json!({}) {
        error["details"] = details;
    }
    json!({ "success": false, "error": error })
}

/// Wrap an operation result.
pub fn envelope<T: Serialize>(result: &Result<T, EngineError>) -> Value {
    match result {
        Ok(data) => success(data),
        Err(err) => failure(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let value = success(&serde_json::json!({"task_id": 3}));
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["task_id"], 3);
    }

    #[test]
    fn failure_envelope_carries_code_and_details() {
        let err = EngineError::TaskHasDependents {
            id: 1,
            dependents: vec![2],
        };
        let value = failure(&err);
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "TASK_HAS_DEPENDENTS");
        assert_eq!(value["error"]["details"]["dependents"], json!([2]));
    }

    #[test]
    fn failure_envelope_omits_empty_details() {
        let value = failure(&EngineError::NoCurrentTask);
        assert_eq!(value["error"]["code"], "NO_CURRENT_TASK");
        assert!(value["error"].get("details").is_none());
    }
}
