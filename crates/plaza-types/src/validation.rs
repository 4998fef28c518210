use std::borrow::Cow;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// One violated constraint, reported back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Account fields as they will be persisted.
///
/// `password` is `None` when an update leaves the stored password alone;
/// the constraints then only apply to the fields that are present.
#[derive(Debug, Clone, Validate)]
pub struct AccountFields {
    #[validate(
        length(min = 3, max = 12, message = "must be between 3 and 12 characters"),
        custom(function = "validate_lowercase")
    )]
    pub username: String,
    #[validate(length(min = 3, max = 24, message = "must be between 3 and 24 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 140, message = "must be between 1 and 140 characters"))]
    pub description: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 6, max = 15, message = "must be between 6 and 15 characters"),
        custom(function = "validate_lowercase")
    )]
    pub password: Option<String>,
}

pub fn validate_lowercase(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_uppercase) {
        let mut err = ValidationError::new("lowercase");
        err.message = Some(Cow::Borrowed("must be lowercase"));
        return Err(err);
    }
    Ok(())
}

/// Run the declarative checks on `value`, flattening every violation.
pub fn check<T: Validate>(value: &T) -> Result<(), Vec<FieldError>> {
    value.validate().map_err(|errors| collect(&errors))
}

/// Flatten validator output into a list ordered by field name.
pub fn collect(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(move |e| FieldError::new(field.to_string(), describe(e)))
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    match err.code.as_ref() {
        "required" => "is required".to_string(),
        "email" => "must be a valid email address".to_string(),
        "length" => "has an invalid length".to_string(),
        other => other.to_string(),
    }
}
