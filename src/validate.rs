use serde_json::Value;

use crate::error::PollError;

/// Check the top-level response shape and return the `homeworks` records in
/// API order (index 0 is the most recent).
pub fn check_response(payload: &Value) -> Result<&[Value], PollError> {
    let object = payload
        .as_object()
        .ok_or_else(|| PollError::shape("response is not a JSON object"))?;
    let homeworks = object
        .get("homeworks")
        .ok_or_else(|| PollError::shape("response has no \"homeworks\" key"))?;
    let homeworks = homeworks
        .as_array()
        .ok_or_else(|| PollError::shape("\"homeworks\" is not a list"))?;
    if homeworks.is_empty() {
        return Err(PollError::EmptyResult);
    }
    Ok(homeworks)
}

/// `current_date` reported by the API, if present and an integer.
pub fn current_date(payload: &Value) -> Option<i64> {
    payload.get("current_date").and_then(Value::as_i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_payloads_are_shape_errors() {
        for payload in [json!([]), json!("homeworks"), json!(null), json!(3)] {
            let err = check_response(&payload).unwrap_err();
            assert!(matches!(err, PollError::Shape(_)), "{payload}: {err:?}");
        }
    }

    #[test]
    fn missing_or_non_list_homeworks_is_shape_error() {
        let payloads = [
            json!({}),
            json!({ "homework": [] }),
            json!({ "homeworks": {} }),
            json!({ "homeworks": "approved" }),
            json!({ "homeworks": null }),
        ];
        for payload in payloads {
            let err = check_response(&payload).unwrap_err();
            assert!(matches!(err, PollError::Shape(_)), "{payload}: {err:?}");
        }
    }

    #[test]
    fn empty_list_is_its_own_error() {
        let err = check_response(&json!({ "homeworks": [], "current_date": 1 })).unwrap_err();
        assert!(matches!(err, PollError::EmptyResult));
    }

    #[test]
    fn records_returned_in_order() {
        let payload = json!({
            "homeworks": [
                { "homework_name": "newest", "status": "reviewing" },
                { "homework_name": "older", "status": "approved" },
            ]
        });
        let records = check_response(&payload).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["homework_name"], "newest");
        assert_eq!(records[1]["homework_name"], "older");
    }

    #[test]
    fn current_date_is_optional() {
        assert_eq!(current_date(&json!({ "current_date": 1700000000 })), Some(1_700_000_000));
        assert_eq!(current_date(&json!({ "current_date": "soon" })), None);
        assert_eq!(current_date(&json!({})), None);
    }
}
