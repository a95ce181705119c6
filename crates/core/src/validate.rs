//! Explicit payload validation.
//!
//! Every write payload enumerates its own required fields, length limits and
//! value rules. Uniqueness and foreign keys are left to the database.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::FieldErrors;

pub const REQUIRED: &str = "This field is required.";
pub const MIN_PASSWORD_LEN: usize = 8;

/// Field used for errors that cannot be pinned to a single key.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Implemented by every write payload.
pub trait Validate {
    /// JSON keys whose string values are kept exactly as sent. Every other
    /// top-level string is trimmed before deserialization.
    const VERBATIM: &'static [&'static str] = &[];

    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Password keys, in both spellings clients use.
pub const PASSWORD_KEYS: &[&str] = &["password", "contrasena"];

/// Deserialize a JSON body into a payload and run its validation.
///
/// Top-level strings are trimmed first (except `P::VERBATIM` keys), so
/// what is validated is exactly what gets stored. Type mismatches (e.g. a
/// string where a number is expected) are reported under
/// `non_field_errors` with serde's message.
pub fn parse_payload<P>(mut value: JsonValue) -> Result<P, FieldErrors>
where
    P: DeserializeOwned + Validate,
{
    let Some(object) = value.as_object_mut() else {
        return Err(FieldErrors::single(
            NON_FIELD_ERRORS,
            "Invalid data. Expected a JSON object.",
        ));
    };
    for (key, field) in object.iter_mut() {
        if P::VERBATIM.contains(&key.as_str()) {
            continue;
        }
        if let JsonValue::String(text) = field {
            let trimmed = text.trim();
            if trimmed.len() != text.len() {
                *text = trimmed.to_string();
            }
        }
    }

    let payload: P = serde_json::from_value(value)
        .map_err(|e| FieldErrors::single(NON_FIELD_ERRORS, e.to_string()))?;
    payload.validate()?;
    Ok(payload)
}

/// Overlay the keys of `patch` on top of `base`. Both must be objects.
pub fn merge_objects(base: JsonValue, patch: JsonValue) -> Result<JsonValue, FieldErrors> {
    match (base, patch) {
        (JsonValue::Object(mut base), JsonValue::Object(patch)) => {
            base.extend(patch);
            Ok(JsonValue::Object(base))
        }
        _ => Err(FieldErrors::single(
            NON_FIELD_ERRORS,
            "Invalid data. Expected a JSON object.",
        )),
    }
}

pub fn required_text(errors: &mut FieldErrors, field: &str, value: &Option<String>, max: usize) {
    match value.as_deref().map(str::trim) {
        None | Some("") => errors.add(field, REQUIRED),
        Some(text) => max_len(errors, field, text, max),
    }
}

pub fn optional_text(errors: &mut FieldErrors, field: &str, value: &Option<String>, max: usize) {
    if let Some(text) = value.as_deref() {
        max_len(errors, field, text.trim(), max);
    }
}

pub fn required<T>(errors: &mut FieldErrors, field: &str, value: &Option<T>) {
    if value.is_none() {
        errors.add(field, REQUIRED);
    }
}

pub fn required_email(errors: &mut FieldErrors, field: &str, value: &Option<String>) {
    match value.as_deref().map(str::trim) {
        None | Some("") => errors.add(field, REQUIRED),
        Some(email) if !is_valid_email(email) => {
            errors.add(field, "Enter a valid email address.")
        }
        Some(email) => max_len(errors, field, email, 254),
    }
}

/// Password rules; `required` is false on updates, where omission keeps the
/// stored credential.
pub fn password(errors: &mut FieldErrors, field: &str, value: &Option<String>, required: bool) {
    match value.as_deref() {
        None | Some("") if required => errors.add(field, REQUIRED),
        None | Some("") => {}
        Some(pw) if pw.chars().count() < MIN_PASSWORD_LEN => errors.add(
            field,
            format!("Ensure this field has at least {} characters.", MIN_PASSWORD_LEN),
        ),
        Some(_) => {}
    }
}

pub fn positive(errors: &mut FieldErrors, field: &str, value: &Option<f64>) {
    match value {
        None => errors.add(field, REQUIRED),
        Some(v) if !v.is_finite() || *v <= 0.0 => {
            errors.add(field, "Ensure this value is greater than 0.")
        }
        Some(_) => {}
    }
}

fn max_len(errors: &mut FieldErrors, field: &str, text: &str, max: usize) {
    if text.chars().count() > max {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max),
        );
    }
}

/// Loose structural check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Emails are stored and looked up trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trimmed copy of an optional text field.
pub fn clean(value: &Option<String>) -> Option<String> {
    value.as_deref().map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Sample {
        dni: Option<String>,
        password: Option<String>,
        altura: Option<f64>,
    }

    impl Validate for Sample {
        const VERBATIM: &'static [&'static str] = PASSWORD_KEYS;

        fn validate(&self) -> Result<(), FieldErrors> {
            let mut errors = FieldErrors::new();
            required_text(&mut errors, "dni", &self.dni, 20);
            errors.into_result()
        }
    }

    #[test]
    fn parse_trims_strings_but_not_passwords() {
        let parsed: Sample = parse_payload(serde_json::json!({
            "dni": "  12345678 ",
            "password": " secret pw ",
            "altura": 1.75
        }))
        .unwrap();
        assert_eq!(parsed.dni.as_deref(), Some("12345678"));
        assert_eq!(parsed.password.as_deref(), Some(" secret pw "));
        assert_eq!(parsed.altura, Some(1.75));
    }

    #[test]
    fn padding_does_not_count_towards_length() {
        let padded = format!("{}12345678", " ".repeat(30));
        let parsed: Sample = parse_payload(serde_json::json!({ "dni": padded })).unwrap();
        assert_eq!(parsed.dni.as_deref(), Some("12345678"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = parse_payload::<Sample>(serde_json::json!(["dni"])).unwrap_err();
        assert!(err.contains(NON_FIELD_ERRORS));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("juan@gmail.com"));
        assert!(is_valid_email("a.b+c@clinic.example.org"));
        assert!(!is_valid_email("juan"));
        assert!(!is_valid_email("@gmail.com"));
        assert!(!is_valid_email("juan@gmail"));
        assert!(!is_valid_email("juan@.com"));
        assert!(!is_valid_email("ju an@gmail.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_email("  Ana@Gmail.COM "), "ana@gmail.com");
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let mut errors = FieldErrors::new();
        required_text(&mut errors, "nombre", &Some("   ".into()), 100);
        assert_eq!(errors.get("nombre"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn text_length_is_enforced() {
        let mut errors = FieldErrors::new();
        required_text(&mut errors, "telefono", &Some("1".repeat(21)), 20);
        optional_text(&mut errors, "direccion", &Some("x".repeat(201)), 200);
        assert!(errors.contains("telefono"));
        assert!(errors.contains("direccion"));
    }

    #[test]
    fn password_rules() {
        let mut errors = FieldErrors::new();
        password(&mut errors, "password", &None, false);
        assert!(errors.is_empty());

        password(&mut errors, "password", &None, true);
        password(&mut errors, "short", &Some("1234".into()), false);
        assert!(errors.contains("password"));
        assert!(errors.contains("short"));
    }

    #[test]
    fn positive_rejects_zero_and_nan() {
        let mut errors = FieldErrors::new();
        positive(&mut errors, "altura", &Some(0.0));
        positive(&mut errors, "peso", &Some(f64::NAN));
        positive(&mut errors, "ok", &Some(1.75));
        assert!(errors.contains("altura"));
        assert!(errors.contains("peso"));
        assert!(!errors.contains("ok"));
    }

    #[test]
    fn merge_overlays_patch_keys() {
        let base = serde_json::json!({"id": 1, "nombre": "Pedro", "apellido": "López"});
        let patch = serde_json::json!({"nombre": "Pablo"});
        let merged = merge_objects(base, patch).unwrap();
        assert_eq!(merged["nombre"], "Pablo");
        assert_eq!(merged["apellido"], "López");
    }

    #[test]
    fn merge_rejects_non_objects() {
        let base = serde_json::json!({"id": 1});
        assert!(merge_objects(base, serde_json::json!([1, 2])).is_err());
    }
}
