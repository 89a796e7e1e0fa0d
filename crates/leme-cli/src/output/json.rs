use std::io;

use leme_core::contracts::envelope::failure_from_error;
use leme_core::{CoreError, SuccessEnvelope};
use serde::Serialize;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

pub fn render_error_json(error: &CoreError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use leme_core::{CoreError, SuccessEnvelope};
    use serde_json::{Value, json};

    use super::{render_error_json, render_success_json};

    #[test]
    fn success_json_is_the_full_envelope() {
        let payload = SuccessEnvelope {
            ok: true,
            command: "history list".to_string(),
            version: "0.1.0".to_string(),
            data: json!({"rows": []}),
        };

        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed = serde_json::from_str::<Value>(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], true);
                assert_eq!(value["command"], "history list");
                assert!(value["data"]["rows"].is_array());
            }
        }
    }

    #[test]
    fn error_json_carries_code_and_data() {
        let error = CoreError::evaluation_not_found("eval_missing");
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed = serde_json::from_str::<Value>(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], false);
                assert_eq!(value["error"]["code"], "evaluation_not_found");
                assert_eq!(value["data"]["evaluation_id"], "eval_missing");
            }
        }
    }
}
