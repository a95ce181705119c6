use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Per-field validation messages, keyed by the JSON field name.
///
/// Serializes as a plain object: `{"email": ["email already in use"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{}", self.summary())]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for an error set with exactly one message.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Human-readable one-liner; a single message is returned verbatim.
    pub fn summary(&self) -> String {
        let messages: Vec<&str> = self
            .0
            .values()
            .flat_map(|msgs| msgs.iter().map(String::as_str))
            .collect();

        match messages.as_slice() {
            [] => "Validation failed".to_string(),
            [only] => (*only).to_string(),
            many => format!("Validation failed: {}", many.join("; ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_message_summary_is_verbatim() {
        let errors = FieldErrors::single("email", "email already in use");
        assert_eq!(errors.summary(), "email already in use");
        assert_eq!(errors.to_string(), "email already in use");
    }

    #[test]
    fn messages_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("nombre", "This field is required.");
        errors.add("dni", "This field is required.");
        errors.add("dni", "Ensure this field has no more than 20 characters.");

        assert_eq!(errors.get("dni").map(<[String]>::len), Some(2));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["dni", "nombre"]);
        assert!(errors.summary().starts_with("Validation failed: "));
    }

    #[test]
    fn serializes_as_plain_object() {
        let errors = FieldErrors::single("matricula", "license number already in use");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"matricula": ["license number already in use"]})
        );
    }

    #[test]
    fn empty_set_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
