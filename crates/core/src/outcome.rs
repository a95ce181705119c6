use serde::{Deserialize, Serialize};

use crate::error::FieldErrors;

/// Body returned with every 4xx/5xx response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub fields: FieldErrors,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            fields: FieldErrors::new(),
        }
    }

    pub fn validation(fields: FieldErrors) -> Self {
        Self {
            error: fields.summary(),
            fields,
        }
    }
}

/// Plain acknowledgement body, e.g. `{"message": "logged out"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_error_omits_fields() {
        let json = serde_json::to_value(ErrorBody::new("invalid credentials")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "invalid credentials"}));
    }

    #[test]
    fn validation_error_carries_summary_and_fields() {
        let body = ErrorBody::validation(FieldErrors::single("dni", "dni already in use"));
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["error"], "dni already in use");
        assert_eq!(json["fields"]["dni"][0], "dni already in use");
    }
}
