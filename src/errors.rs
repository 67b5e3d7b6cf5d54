use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::InvalidInput(msg) => AppError::InvalidInput(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Conflict(_) => HttpResponse::Conflict().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Forbidden(_) => HttpResponse::Forbidden().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::InvalidInput(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        assert_eq!(AppError::NotFound.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_returns_409() {
        let err = AppError::Conflict("Order is already taken".to_string());
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn forbidden_returns_403() {
        let err = AppError::Forbidden("You can only release your own orders".to_string());
        assert_eq!(err.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn invalid_input_returns_400() {
        let err = AppError::InvalidInput("Title must be at least 2 characters".to_string());
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_body_hides_the_detail() {
        // The detailed message stays in logs; the body is generic.
        let resp = AppError::Internal("connection refused".to_string()).error_response();
        let bytes = futures::executor::block_on(actix_web::body::to_bytes(resp.into_body()))
            .expect("body read failed");
        assert_eq!(
            String::from_utf8_lossy(&bytes),
            r#"{"error":"Internal server error"}"#
        );
    }

    #[test]
    fn conflict_display_is_the_message() {
        assert_eq!(
            AppError::Conflict("Order is already taken".to_string()).to_string(),
            "Order is already taken"
        );
    }

    #[test]
    fn domain_errors_map_to_matching_app_errors() {
        assert!(matches!(AppError::from(DomainError::NotFound), AppError::NotFound));
        assert!(matches!(
            AppError::from(DomainError::Conflict("c".to_string())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::Forbidden("f".to_string())),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::InvalidInput("i".to_string())),
            AppError::InvalidInput(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::Internal("x".to_string())),
            AppError::Internal(_)
        ));
    }
}
