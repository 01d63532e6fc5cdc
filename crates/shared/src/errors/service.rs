use crate::errors::repository::RepositoryError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("{entity} with id: #{id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Some {entity} were not found")]
    BatchNotFound { entity: &'static str },

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),
}

impl ServiceError {
    /// Outcomes decided by the caller's input rather than by infrastructure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::NotFound { .. }
                | ServiceError::BatchNotFound { .. }
                | ServiceError::Validation(_)
        )
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(validation_messages(&errors))
    }
}

/// Flattens field errors into `field: message` lines, sorted by field name.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| match error.code.as_ref() {
                        "length" => "Invalid length".to_string(),
                        "range" => "Value out of range".to_string(),
                        _ => format!("Invalid {field}"),
                    });
                format!("{field}: {message}")
            })
        })
        .collect();

    messages.sort();
    messages
}
