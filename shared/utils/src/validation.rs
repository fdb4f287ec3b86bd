use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{LoadError, LoadResult};

pub fn validate_model<T: Validate>(model: &T) -> LoadResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(LoadError::configuration(format_validation_errors(&errors))),
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages("", errors, &mut messages);
    messages.join(", ")
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match (&error.message, &*error.code) {
                        (Some(message), _) => format!("{}: {}", path, message),
                        (None, "length") => format!("Length validation failed for field '{}'", path),
                        (None, "range") => format!("Value out of range for field '{}'", path),
                        (None, code) => format!("Validation failed for field '{}': {}", path, code),
                    };
                    messages.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(&path, nested, messages),
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    collect_messages(&format!("{}[{}]", path, idx), nested, messages);
                }
            }
        }
    }
}
