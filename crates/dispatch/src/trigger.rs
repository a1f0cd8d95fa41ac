//! Webhook trigger envelope parsing.
//!
//! When the job runner starts us from a webhook it passes one argument shaped
//! like
//!
//! ```text
//! WebhookName:munki,RequestBody:{"serial":"C02XYZ"},RequestHeader:{...}
//! ```
//!
//! The first field is ignored. The second field must carry the `RequestBody:`
//! label (whitespace before it is allowed) followed by a JSON object with a
//! `serial` string. Commas inside the body do not break parsing. After the
//! body only whitespace or further `,`-separated fields may follow.

use serde::Serialize;
use serde_json::Value;

use crate::{SerialNumber, TriggerError};

/// Separates envelope fields.
pub const FIELD_DELIMITER: char = ',';

/// Label that prefixes the JSON body in the second envelope field.
pub const REQUEST_BODY_LABEL: &str = "RequestBody:";

/// Decoded webhook body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    /// Device the run is restricted to.
    pub serial: SerialNumber,
}

impl WebhookPayload {
    /// Parses a raw invocation argument.
    pub fn from_invocation_argument(raw: &str) -> Result<Self, TriggerError> {
        let (_, rest) = raw
            .split_once(FIELD_DELIMITER)
            .ok_or(TriggerError::MissingRequestBody)?;

        let body = rest
            .trim_start()
            .strip_prefix(REQUEST_BODY_LABEL)
            .ok_or(TriggerError::MissingRequestBodyLabel)?;

        let mut stream = serde_json::Deserializer::from_str(body).into_iter::<Value>();
        let value = stream
            .next()
            .ok_or(TriggerError::EmptyRequestBody)?
            .map_err(TriggerError::InvalidJson)?;

        let trailing = body[stream.byte_offset()..].trim_start();
        if !trailing.is_empty() && !trailing.starts_with(FIELD_DELIMITER) {
            return Err(TriggerError::TrailingData);
        }

        Self::from_json(value)
    }

    /// Extracts the payload from an already-decoded request body.
    pub fn from_json(value: Value) -> Result<Self, TriggerError> {
        let Value::Object(mut object) = value else {
            return Err(TriggerError::NotAnObject);
        };

        let serial = match object.remove("serial") {
            None => return Err(TriggerError::MissingSerial),
            Some(Value::String(s)) => SerialNumber::new(s).ok_or(TriggerError::InvalidSerial)?,
            Some(_) => return Err(TriggerError::InvalidSerial),
        };

        Ok(Self { serial })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<WebhookPayload, TriggerError> {
        WebhookPayload::from_invocation_argument(raw)
    }

    #[test]
    fn test_parses_minimal_envelope() {
        let payload = parse(r#"ignored,RequestBody:{"serial":"ABC123"}"#).unwrap();
        assert_eq!(payload.serial.as_str(), "ABC123");
    }

    #[test]
    fn test_tolerates_commas_in_body_and_trailing_fields() {
        let raw = r#"WebhookName:munki,RequestBody:{"serial":"C02XYZ","user":"a@b.c"},RequestHeader:{"x":"y"}"#;
        let payload = parse(raw).unwrap();
        assert_eq!(payload.serial.as_str(), "C02XYZ");
    }

    #[test]
    fn test_tolerates_whitespace_around_body() {
        let payload = parse(r#"x, RequestBody: {"serial":"ABC123"}  "#).unwrap();
        assert_eq!(payload.serial.as_str(), "ABC123");
    }

    #[test]
    fn test_rejects_data_glued_to_body() {
        assert!(matches!(
            parse(r#"x,RequestBody:{"serial":"A"}garbage"#),
            Err(TriggerError::TrailingData)
        ));
        assert!(matches!(
            parse(r#"x,RequestBody:{"serial":"A"} {"serial":"B"}"#),
            Err(TriggerError::TrailingData)
        ));
    }

    #[test]
    fn test_rejects_argument_without_delimiter() {
        assert!(matches!(
            parse(r#"RequestBody:{"serial":"ABC123"}"#),
            Err(TriggerError::MissingRequestBody)
        ));
    }

    #[test]
    fn test_rejects_unlabelled_body() {
        assert!(matches!(
            parse(r#"ignored,{"serial":"ABC123"}"#),
            Err(TriggerError::MissingRequestBodyLabel)
        ));
    }

    #[test]
    fn test_rejects_empty_body() {
        assert!(matches!(
            parse("ignored,RequestBody:"),
            Err(TriggerError::EmptyRequestBody)
        ));
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(matches!(
            parse("a,RequestBody:{not valid json"),
            Err(TriggerError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_rejects_non_object_body() {
        assert!(matches!(
            parse(r#"a,RequestBody:["serial"]"#),
            Err(TriggerError::NotAnObject)
        ));
    }

    #[test]
    fn test_rejects_missing_serial() {
        assert!(matches!(
            parse(r#"a,RequestBody:{"device":"ABC123"}"#),
            Err(TriggerError::MissingSerial)
        ));
    }

    #[test]
    fn test_rejects_non_string_or_empty_serial() {
        assert!(matches!(
            parse(r#"a,RequestBody:{"serial":42}"#),
            Err(TriggerError::InvalidSerial)
        ));
        assert!(matches!(
            parse(r#"a,RequestBody:{"serial":""}"#),
            Err(TriggerError::InvalidSerial)
        ));
    }
}
