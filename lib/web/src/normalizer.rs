use crate::config::MAX_BODY_SIZE;
use crate::error::OsfServerError;
use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::header::{
    HeaderName, ACCEPT, ACCEPT_CHARSET, ACCEPT_ENCODING, ACCEPT_LANGUAGE, USER_AGENT,
};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method};
use osfws_model::{AcceptHeaders, HttpMethod, RequestParams};
use std::net::SocketAddr;
use url::form_urlencoded;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Maps the method of a request to the methods services are bound to.
pub fn http_method(method: &Method) -> Option<HttpMethod> {
    match *method {
        Method::GET => Some(HttpMethod::Get),
        Method::POST => Some(HttpMethod::Post),
        _ => None,
    }
}

/// Builds the [`RequestParams`] of a request.
///
/// GET requests carry their parameters in the query string. POST requests carry them in an
/// url-encoded form body and may add more in the query string; when a parameter is repeated,
/// the first occurrence wins, so the body takes precedence.
pub async fn normalize(
    parts: &Parts,
    body: Body,
    method: HttpMethod,
) -> Result<RequestParams, OsfServerError> {
    let mut pairs = Vec::new();
    if method == HttpMethod::Post {
        let bytes = to_bytes(body, MAX_BODY_SIZE).await.map_err(|e| {
            OsfServerError::BadRequest(format!("The request body could not be read: {e}"))
        })?;
        pairs.extend(form_urlencoded::parse(&bytes).into_owned());
    }
    if let Some(query) = parts.uri.query() {
        pairs.extend(form_urlencoded::parse(query.as_bytes()).into_owned());
    }

    let params = RequestParams::new(method, pairs, accept_headers(&parts.headers))
        .with_requester_ip(requester_ip(parts))
        .with_user_agent(header_value(&parts.headers, &USER_AGENT).unwrap_or_default());
    Ok(params)
}

pub fn accept_headers(headers: &HeaderMap) -> AcceptHeaders {
    AcceptHeaders {
        accept: header_value(headers, &ACCEPT),
        accept_charset: header_value(headers, &ACCEPT_CHARSET),
        accept_encoding: header_value(headers, &ACCEPT_ENCODING),
        accept_language: header_value(headers, &ACCEPT_LANGUAGE),
    }
}

/// Joins repeated header lines into a single list.
fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    let values = headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>();
    (!values.is_empty()).then(|| values.join(", "))
}

/// The first address of `X-Forwarded-For`, or the peer address of the connection.
fn requester_ip(parts: &Parts) -> String {
    let forwarded = parts
        .headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    match forwarded {
        Some(ip) => ip.to_owned(),
        None => parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn normalized(request: Request<Body>, method: HttpMethod) -> RequestParams {
        let (parts, body) = request.into_parts();
        normalize(&parts, body, method).await.unwrap()
    }

    #[tokio::test]
    async fn reads_query_string_of_get_requests() {
        let request = Request::get("/ws/dataset/read/?uri=http%3A%2F%2Fexample.org%2Fds1&uri=ignored")
            .header(ACCEPT, "text/turtle")
            .header(ACCEPT, "application/rdf+xml;q=0.5")
            .header(USER_AGENT, "curl/8.0")
            .header(FORWARDED_FOR, "10.0.0.1, 10.0.0.2")
            .body(Body::empty())
            .unwrap();
        let params = normalized(request, HttpMethod::Get).await;

        assert_eq!(params.get("uri"), Some("http://example.org/ds1"));
        assert_eq!(
            params.headers().accept.as_deref(),
            Some("text/turtle, application/rdf+xml;q=0.5")
        );
        assert_eq!(params.headers().accept_language, None);
        assert_eq!(params.user_agent(), "curl/8.0");
        assert_eq!(params.requester_ip(), "10.0.0.1");
    }

    #[tokio::test]
    async fn form_body_takes_precedence_over_query_string() {
        let request = Request::post("/ws/dataset/create/?uri=http://example.org/query&version=1.0")
            .body(Body::from("uri=http%3A%2F%2Fexample.org%2Fbody&title=A+title"))
            .unwrap();
        let params = normalized(request, HttpMethod::Post).await;

        assert_eq!(params.get("uri"), Some("http://example.org/body"));
        assert_eq!(params.get("title"), Some("A title"));
        assert_eq!(params.version(), "1.0");
    }

    #[test]
    fn maps_methods() {
        assert_eq!(http_method(&Method::GET), Some(HttpMethod::Get));
        assert_eq!(http_method(&Method::POST), Some(HttpMethod::Post));
        assert_eq!(http_method(&Method::PUT), None);
    }
}
