use crate::body;
use crate::constants::ERROR_CONTENT_TYPE;
use crate::helpers;
use crate::middleware::Step;
use crate::response::{build_response, Payload};
use crate::types::RouteParams;
use bytes::Bytes;
use cookie::CookieJar;
use http::header::{self, HeaderMap, HeaderValue};
use http::{Extensions, Method, StatusCode, Uri};
use http_body_util::Full;
use hyper::Response;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{self, Debug, Formatter};
use std::net::SocketAddr;

/// The state of a single request, handed from one handler to the next.
///
/// It is created when the request body has been fully received, passed through the before-handlers and the
/// handler chain of the matched route, and dropped once the response is produced. It is never shared
/// between requests.
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    remote_addr: Option<SocketAddr>,
    raw_body: Bytes,
    body: Option<Value>,
    pub(crate) params: RouteParams,
    cookies: CookieJar,
    data: Extensions,
    response: Option<Response<Full<Bytes>>>,
}

impl RequestContext {
    /// Creates a context for a request without body, headers or remote address.
    pub fn new(method: Method, uri: Uri) -> RequestContext {
        RequestContext::from_parts(method, uri, HeaderMap::new(), Bytes::new(), None)
    }

    pub(crate) fn from_parts(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        raw_body: Bytes,
        remote_addr: Option<SocketAddr>,
    ) -> RequestContext {
        RequestContext {
            method,
            uri,
            headers,
            remote_addr,
            raw_body,
            body: None,
            params: RouteParams::new(),
            cookies: CookieJar::new(),
            data: Extensions::new(),
            response: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The path of the request without the query string.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The path of the request including the query string, as used for route matching.
    pub fn url(&self) -> &str {
        self.uri.path_and_query().map_or_else(|| self.uri.path(), |pq| pq.as_str())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header<K: header::AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|val| val.to_str().ok())
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// The request body exactly as received.
    pub fn raw_body(&self) -> &Bytes {
        &self.raw_body
    }

    /// The parsed request body. It is `None` when the request had no body.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn set_body(&mut self, body: Value) {
        self.body = Some(body);
    }

    /// The query string parsed the same way as a form-encoded body.
    pub fn query(&self) -> Value {
        body::parse_form(self.uri.query().unwrap_or("").as_bytes())
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut RouteParams {
        &mut self.params
    }

    pub fn param<N: AsRef<str>>(&self, param_name: N) -> Option<&str> {
        self.params.get(param_name)
    }

    /// The request cookies. Cookies added or removed here are sent back as `Set-Cookie` headers.
    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    pub fn cookies_mut(&mut self) -> &mut CookieJar {
        &mut self.cookies
    }

    /// Returns request-local data stored by a previous handler.
    pub fn data<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.data.get::<T>()
    }

    pub fn data_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.data.get_mut::<T>()
    }

    /// Stores request-local data, one value per type, returning the previous value.
    pub fn set_data<T: Clone + Send + Sync + 'static>(&mut self, val: T) -> Option<T> {
        self.data.insert(val)
    }

    /// Hands the context to the following handler.
    pub fn next(self) -> Step {
        Step::Next(self)
    }

    /// Finishes the handler chain without running the remaining handlers.
    pub fn end(self) -> Step {
        Step::End(self)
    }

    /// Returns `true` once a response has been sent.
    pub fn is_sent(&self) -> bool {
        self.response.is_some()
    }

    /// Sends a `200 OK` response.
    pub fn send<P: Into<Payload>>(&mut self, payload: P) {
        self.send_with_content_type(StatusCode::OK, payload.into(), None);
    }

    pub fn send_status<P: Into<Payload>>(&mut self, status: StatusCode, payload: P) {
        self.send_with_content_type(status, payload.into(), None);
    }

    pub fn send_with<P: Into<Payload>>(&mut self, status: StatusCode, payload: P, content_type: &str) {
        self.send_with_content_type(status, payload.into(), Some(content_type));
    }

    /// Serializes `val` and sends it as JSON.
    pub fn send_json<T: Serialize + ?Sized>(&mut self, status: StatusCode, val: &T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(val)?;
        self.send_with_content_type(status, Payload::Json(value), None);
        Ok(())
    }

    /// Sends a `500 Internal Server Error` response with the error and its sources as plain text.
    pub fn send_error(&mut self, err: &(dyn std::error::Error + 'static)) {
        self.send_with_content_type(
            StatusCode::INTERNAL_SERVER_ERROR,
            Payload::Text(helpers::error_report(err)),
            Some(ERROR_CONTENT_TYPE),
        );
    }

    fn send_with_content_type(&mut self, status: StatusCode, payload: Payload, content_type: Option<&str>) {
        if self.response.is_some() {
            tracing::warn!(method = %self.method, url = self.url(), "response already sent, ignoring");
            return;
        }
        self.response = Some(build_response(status, payload, content_type));
    }

    pub(crate) fn parse_cookies(&mut self) {
        for val in self.headers.get_all(header::COOKIE) {
            let Ok(val) = val.to_str() else { continue };
            for cookie in cookie::Cookie::split_parse(val).flatten() {
                self.cookies.add_original(cookie.into_owned());
            }
        }
    }

    /// Takes the sent response out of the context, with the cookie changes applied.
    pub(crate) fn into_response(self) -> Option<Response<Full<Bytes>>> {
        let mut res = self.response?;
        for cookie in self.cookies.delta() {
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(val) => {
                    res.headers_mut().append(header::SET_COOKIE, val);
                }
                Err(err) => tracing::warn!(name = cookie.name(), "invalid cookie: {}", err),
            }
        }
        Some(res)
    }
}

impl Debug for RequestContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ method: {:?}, uri: {:?}, headers: {:?}, params: {:?}, sent: {} }}",
            self.method,
            self.uri,
            self.headers,
            self.params,
            self.is_sent()
        )
    }
}
