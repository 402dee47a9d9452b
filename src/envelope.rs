use serde::Serialize;

/// Uniform wire shape returned by every meme endpoint.
///
/// Handlers work with plain `Result` values internally; the envelope is built
/// only at the API boundary — here for successes, in
/// [`crate::errors::ApiError::into_response`] for failures.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error_message: None,
        }
    }
}

impl Envelope<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error_message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_omits_error_message() {
        let json = serde_json::to_value(Envelope::ok(vec![1, 2, 3])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("error_message").is_none());
    }

    #[test]
    fn error_envelope_omits_data() {
        let json = serde_json::to_value(Envelope::error("boom")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error_message"], "boom");
        assert!(json.get("data").is_none());
    }
}
