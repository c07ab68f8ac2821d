//! Request view handed to dispatcher handlers.

use actix_web::HttpRequest;
use actix_web::http::Method;
use actix_web::web::Bytes;
use serde::de::DeserializeOwned;

use crate::domain::Error;

/// Incoming request together with its fully buffered body.
#[derive(Clone)]
pub struct ApiRequest {
    http: HttpRequest,
    body: Bytes,
}

impl ApiRequest {
    /// Pair a request head with its body.
    pub fn new(http: HttpRequest, body: Bytes) -> Self {
        Self { http, body }
    }

    /// Underlying actix request.
    pub fn http(&self) -> &HttpRequest {
        &self.http
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        self.http.method()
    }

    /// Request path without the query string.
    pub fn path(&self) -> &str {
        self.http.path()
    }

    /// Raw query string, empty when absent.
    pub fn query_string(&self) -> &str {
        self.http.query_string()
    }

    /// Path parameter captured by the route pattern. Missing parameters read
    /// as the empty string so that id validation reports them.
    pub fn param(&self, name: &str) -> &str {
        self.http.match_info().get(name).unwrap_or_default()
    }

    /// Header value when present and valid ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.http
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    /// Raw body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Strictly decode the body as a JSON object.
    ///
    /// # Errors
    /// [`ErrorCode::InvalidRequest`](crate::domain::ErrorCode::InvalidRequest)
    /// for an empty body, a body that is not a JSON object, unknown fields and
    /// any other decoding failure.
    ///
    /// # Examples
    /// ```
    /// use actix_web::test::TestRequest;
    /// use actix_web::web::Bytes;
    /// use employee_service::domain::NewEmployee;
    /// use employee_service::inbound::http::request::ApiRequest;
    ///
    /// let req = ApiRequest::new(TestRequest::default().to_http_request(), Bytes::from_static(b"[]"));
    /// let err = req.decode::<NewEmployee>().expect_err("arrays are rejected");
    /// assert_eq!(err.message(), "json missing opening or closing brackets");
    /// ```
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        decode_json(&self.body)
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    let text = std::str::from_utf8(body)
        .map_err(|err| Error::invalid_request(format!("invalid json: {err}")))?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request("json payload is empty"));
    }
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return Err(Error::invalid_request(
            "json missing opening or closing brackets",
        ));
    }
    serde_json::from_str(trimmed).map_err(describe_json_error)
}

fn describe_json_error(err: serde_json::Error) -> Error {
    let message = err.to_string();
    let unknown = message
        .strip_prefix("unknown field `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(field, _)| field);
    match unknown {
        Some(field) => Error::invalid_request(format!("unknown field: {field}")),
        None => Error::invalid_request(format!("invalid json: {message}")),
    }
}
