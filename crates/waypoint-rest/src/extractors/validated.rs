//! Validated JSON extractor for automatic request validation.
//!
//! `ValidatedJson<T>` deserializes the body and runs the `validator` rules
//! of `T`. Malformed JSON is answered with 400 `INVALID_JSON`; rule
//! violations with 422 `VALIDATION_ERROR` and field-level details. Nested
//! fields are reported as `points[1].latitude`.

use crate::responses::ApiResponse;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};
use waypoint_core::{ErrorResponse, FieldError};

/// JSON extractor that validates the deserialized value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError(JsonRejection),
    /// Validation error with field-level details.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let error_response = ErrorResponse {
                    code: "INVALID_JSON".to_string(),
                    message: format!("Invalid JSON: {}", rejection.body_text()),
                    details: None,
                };
                (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(error_response))).into_response()
            }
            Self::ValidationError(errors) => {
                let mut field_errors = convert_validation_errors(&errors);
                field_errors.sort_by(|a, b| a.field.cmp(&b.field));
                let error_response = ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: "Request validation failed".to_string(),
                    details: Some(field_errors),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::<()>::error(error_response))).into_response()
            }
        }
    }
}

/// Flattens validator errors, including nested structs and lists.
fn convert_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors = Vec::new();

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    let message = err
                        .message
                        .as_ref()
                        .map_or_else(|| format!("Validation failed for field '{}'", field), ToString::to_string);
                    field_errors.push(FieldError {
                        field: field.to_string(),
                        message,
                        code: err.code.to_string(),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                for nested_err in convert_validation_errors(nested) {
                    field_errors.push(FieldError {
                        field: format!("{}.{}", field, nested_err.field),
                        ..nested_err
                    });
                }
            }
            ValidationErrorsKind::List(items) => {
                for (index, item_errors) in items {
                    for nested_err in convert_validation_errors(item_errors) {
                        field_errors.push(FieldError {
                            field: format!("{}[{}].{}", field, index, nested_err.field),
                            ..nested_err
                        });
                    }
                }
            }
        }
    }

    field_errors
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value.validate().map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Stop {
        #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
        latitude: f64,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Trip {
        #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
        title: String,
        #[validate(nested)]
        stops: Vec<Stop>,
    }

    #[test]
    fn test_convert_validation_errors_single_field() {
        let trip = Trip {
            title: "ab".to_string(),
            stops: Vec::new(),
        };

        let errors = trip.validate().unwrap_err();
        let field_errors = convert_validation_errors(&errors);

        assert_eq!(field_errors.len(), 1);
        assert_eq!(field_errors[0].field, "title");
        assert_eq!(field_errors[0].message, "Title must be at least 3 characters");
    }

    #[test]
    fn test_convert_validation_errors_list_items() {
        let trip = Trip {
            title: "Valid".to_string(),
            stops: vec![Stop { latitude: 10.0 }, Stop { latitude: 95.0 }],
        };

        let errors = trip.validate().unwrap_err();
        let field_errors = convert_validation_errors(&errors);

        assert_eq!(field_errors.len(), 1);
        assert_eq!(field_errors[0].field, "stops[1].latitude");
        assert_eq!(field_errors[0].code, "range");
    }

    #[test]
    fn test_valid_request_passes() {
        let trip = Trip {
            title: "Valid".to_string(),
            stops: vec![Stop { latitude: 0.0 }],
        };
        assert!(trip.validate().is_ok());
    }
}
