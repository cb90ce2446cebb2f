#![allow(dead_code)]

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::Response;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use webservice::{Logger, RouteError, Router, WebService};

pub struct Serve<E> {
    service: WebService<E>,
    addr: SocketAddr,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl<E: Into<RouteError> + 'static> Serve<E> {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn new_request(&self, method: &str, route: &str) -> http::request::Builder {
        http::request::Request::builder()
            .method(method.to_ascii_uppercase().as_str())
            .uri(format!("http://{}{}", self.addr(), route))
    }

    pub async fn send(&self, req: http::Request<Full<Bytes>>) -> Response<Incoming> {
        self.client.request(req).await.unwrap()
    }

    pub async fn get(&self, route: &str) -> Response<Incoming> {
        let req = self.new_request("GET", route).body(Full::new(Bytes::new())).unwrap();
        self.send(req).await
    }

    pub fn service(&self) -> &WebService<E> {
        &self.service
    }

    pub async fn shutdown(self) {
        self.service.close().await;
    }
}

pub async fn serve<E>(router: Router<E>) -> Serve<E>
where
    E: Into<RouteError> + 'static,
{
    let service = WebService::new(router);
    // Port 0 binds any free port.
    let addr = service.listen(0).await.unwrap();
    let client = Client::builder(TokioExecutor::new()).build_http();

    Serve { service, addr, client }
}

pub async fn into_text<B>(body: B) -> String
where
    B: hyper::body::Body<Data = Bytes> + Send,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    String::from_utf8_lossy(&body.collect().await.unwrap().to_bytes()).to_string()
}

/// A logger keeping every message, prefixed with its level.
#[derive(Clone, Default)]
pub struct RecordingLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingLogger {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, message: &str) {
        self.messages.lock().push(format!("log: {}", message));
    }

    fn warn(&self, message: &str) {
        self.messages.lock().push(format!("warn: {}", message));
    }

    fn error(&self, message: &str) {
        self.messages.lock().push(format!("error: {}", message));
    }
}
