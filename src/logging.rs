//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::Error;

/// The maximum number of characters of a body that is logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body, in bytes, that the server accepts.
pub const REQUEST_BODY_LIMIT: usize = 2 * 1024 * 1024;

const REDACTED: &str = "********";
/// JSON fields whose values are never written to the logs.
const SECRET_FIELDS: [&str; 2] = ["password", "token"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and logged in full at the `debug` level.
///
/// Passwords and tokens in JSON bodies and the bearer token in the
/// `Authorization` header are redacted. Bodies are passed on byte for byte.
///
/// A request body larger than [REQUEST_BODY_LIMIT] is rejected with
/// [Error::PayloadTooLarge] before it reaches a handler.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, REQUEST_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return Error::PayloadTooLarge.into_response();
        }
    };

    tracing::info!(
        "Received request: {} {} {:?}\nheaders: {:#?}",
        parts.method,
        parts.uri,
        parts.version,
        redact_headers(&parts.headers)
    );
    log_body(
        "request",
        &redact_body(&parts.headers, &String::from_utf8_lossy(&body_bytes)),
    );

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!(
        "Sending response: {}\nheaders: {:#?}",
        parts.status,
        parts.headers
    );
    log_body(
        "response",
        &redact_body(&parts.headers, &String::from_utf8_lossy(&body_bytes)),
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer ********"));
    }

    headers
}

fn redact_body(headers: &HeaderMap, body: &str) -> String {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"));

    if !is_json {
        return body.to_owned();
    }

    match serde_json::from_str::<Value>(body) {
        Ok(mut json) => {
            redact_json(&mut json);
            json.to_string()
        }
        Err(_) => body.to_owned(),
    }
}

fn redact_json(json: &mut Value) {
    match json {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if SECRET_FIELDS.contains(&key.as_str()) {
                    *value = Value::String(REDACTED.to_owned());
                } else {
                    redact_json(value);
                }
            }
        }
        Value::Array(values) => values.iter_mut().for_each(redact_json),
        _ => {}
    }
}

fn log_body(kind: &str, body: &str) {
    match body.char_indices().nth(LOG_BODY_LENGTH_LIMIT) {
        Some((cut, _)) => {
            tracing::info!("{kind} body: {}...", &body[..cut]);
            tracing::debug!("Full {kind} body: {body:?}");
        }
        None => tracing::info!("{kind} body: {body:?}"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Bytes,
        http::{HeaderMap, HeaderValue, StatusCode, header::CONTENT_TYPE},
        middleware,
        routing::post,
    };
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::AppJson;

    use super::{REQUEST_BODY_LIMIT, logging_middleware, redact_body, redact_headers};

    fn get_json_echo_server() -> TestServer {
        let app = Router::new()
            .route(
                "/echo",
                post(|AppJson(body): AppJson<Value>| async move { AppJson(body) }),
            )
            .layer(middleware::from_fn(logging_middleware));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn redacts_password_in_json() {
        let body = r#"{"username":"alice","password":"hunter2"}"#;

        let redacted = redact_body(&json_headers(), body);

        assert!(!redacted.contains("hunter2"), "got {redacted}");
        assert!(redacted.contains("alice"));
    }

    #[test]
    fn redacts_nested_token() {
        let body = r#"[{"token":"abc.def.ghi","username":"alice"}]"#;

        let redacted = redact_body(&json_headers(), body);

        assert!(!redacted.contains("abc.def.ghi"), "got {redacted}");
    }

    #[test]
    fn leaves_other_bodies_alone() {
        let body = "password=hunter2";

        assert_eq!(redact_body(&HeaderMap::new(), body), body);
    }

    #[test]
    fn redacts_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer secret"));

        let redacted = redact_headers(&headers);

        assert_eq!(redacted["authorization"], "Bearer ********");
    }

    #[tokio::test]
    async fn passes_body_through_unchanged() {
        let app = Router::new()
            .route(
                "/echo",
                post(|body: String| async move { ([(CONTENT_TYPE, "application/json")], body) }),
            )
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let body = json!({ "password": "hunter2", "note": "ünïcödé ".repeat(20) });

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>(), body);
    }

    #[tokio::test]
    async fn rejects_invalid_utf8_json() {
        let server = get_json_echo_server();

        let response = server
            .post("/echo")
            .content_type("application/json")
            .bytes(Bytes::from_static(b"{\"name\":\"caf\xe9\"}"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_oversized_body() {
        let server = get_json_echo_server();

        let response = server
            .post("/echo")
            .content_type("application/json")
            .bytes(Bytes::from(vec![b' '; REQUEST_BODY_LIMIT + 1]))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        response.assert_json(&json!({ "message": "Request body too large" }));
    }

    #[tokio::test]
    async fn accepts_body_at_limit() {
        let server = get_json_echo_server();
        let mut body = vec![b' '; REQUEST_BODY_LIMIT - 2];
        body.extend_from_slice(b"42");

        let response = server
            .post("/echo")
            .content_type("application/json")
            .bytes(Bytes::from(body))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!(42));
    }
}
