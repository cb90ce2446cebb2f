use crate::constants::{DEFAULT_CONTENT_TYPE, EXPIRES_IMMEDIATELY, JSON_CONTENT_TYPE, NO_CACHE};
use bytes::Bytes;
use http::header::{self, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use hyper::Response;
use serde_json::Value;

/// The body passed to the `send` family of [`RequestContext`](./struct.RequestContext.html) methods.
///
/// Text bodies are sent with the given content type (`text/html` by default), any other JSON
/// value is serialized and sent as `application/json`. Both get a trailing newline.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Text(String),
    Json(Value),
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<&Value> for Payload {
    fn from(value: &Value) -> Self {
        Payload::Json(value.clone())
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map_or(Payload::Empty, Into::into)
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn content_type_value(content_type: &str) -> HeaderValue {
    HeaderValue::from_str(content_type).unwrap_or_else(|_| {
        tracing::warn!(content_type, "invalid content type, falling back to {}", DEFAULT_CONTENT_TYPE);
        HeaderValue::from_static(DEFAULT_CONTENT_TYPE)
    })
}

pub(crate) fn build_response(
    status: StatusCode,
    payload: Payload,
    content_type: Option<&str>,
) -> Response<Full<Bytes>> {
    let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);

    let payload = match payload {
        Payload::Json(Value::String(text)) => Payload::Text(text),
        Payload::Json(value) if is_falsy(&value) => Payload::Empty,
        payload => payload,
    };

    let (content_type, body) = match payload {
        Payload::Text(text) => (content_type_value(content_type), Bytes::from(text + "\n")),
        Payload::Json(value) => (
            HeaderValue::from_static(JSON_CONTENT_TYPE),
            Bytes::from(value.to_string() + "\n"),
        ),
        Payload::Empty => (content_type_value(content_type), Bytes::new()),
    };

    let mut res = Response::new(Full::new(body));
    *res.status_mut() = status;

    let headers = res.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    headers.insert(header::PRAGMA, HeaderValue::from_static(NO_CACHE));
    headers.insert(header::EXPIRES, HeaderValue::from_static(EXPIRES_IMMEDIATELY));
    headers.insert(header::CONTENT_TYPE, content_type);

    res
}
