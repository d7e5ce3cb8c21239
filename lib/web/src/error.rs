use axum::http::header::{ALLOW, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use osfws_model::{HttpMethod, NegotiationError};

/// A failure that is answered before, or instead of, a structured service response.
///
/// These responses are always plain text.
#[derive(thiserror::Error, Debug)]
pub enum OsfServerError {
    #[error("The {method} method is not allowed by this web service. Use {allowed}.")]
    MethodNotAllowed { method: String, allowed: HttpMethod },
    #[error("Content negotiation failed: {0}")]
    ContentNegotiation(#[from] NegotiationError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal server error: {0}")]
    Fatal(String),
}

impl OsfServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            OsfServerError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            OsfServerError::ContentNegotiation(_) => StatusCode::NOT_ACCEPTABLE,
            OsfServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            OsfServerError::Fatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for OsfServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, self.to_string()).into_response();
        let headers = response.headers_mut();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        if let OsfServerError::MethodNotAllowed { allowed, .. } = self {
            headers.insert(ALLOW, HeaderValue::from_static(allowed.as_str()));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_not_allowed_names_the_allowed_method() {
        let response = OsfServerError::MethodNotAllowed {
            method: "PUT".to_owned(),
            allowed: HttpMethod::Post,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "POST");
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}
