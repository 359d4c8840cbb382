use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;

use crate::error::Error;

/// `{"message": ...}` body used by every single-message error response
#[derive(Debug, Serialize)]
pub struct GenericError {
    pub message: String,
}

impl GenericError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"messages": [...]}` body for rejected payloads
#[derive(Debug, Serialize)]
pub struct ValidationErrorEnvelope {
    pub messages: Vec<String>,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidDate { .. } | Error::InvalidTag(_) => StatusCode::BAD_REQUEST,
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            Error::Validation(messages) => response.json(ValidationErrorEnvelope {
                messages: messages.clone(),
            }),
            Error::Store(err) => {
                error!("Request failed on the store: {}", err);
                response.json(GenericError::new("Internal server error"))
            }
            other => response.json(GenericError::new(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use actix_web::body::to_bytes;

    async fn body_of(err: Error) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_not_found_envelope() {
        let (status, body) = body_of(Error::not_found("Article 9 not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Article 9 not found");
    }

    #[actix_web::test]
    async fn test_validation_envelope_lists_messages() {
        let (status, body) = body_of(Error::Validation(vec![
            "body: body is required".into(),
            "title: title is required".into(),
        ]))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_bad_date_is_bad_request() {
        let (status, body) = body_of(Error::invalid_date("99999999", "expected YYYYMMDD")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("99999999"));
    }

    #[actix_web::test]
    async fn test_store_detail_is_hidden() {
        let (status, body) = body_of(Error::Store(StoreError::Blocking {
            context: "get_article_by_id",
            message: "disk I/O error at /var/secret".into(),
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }
}
