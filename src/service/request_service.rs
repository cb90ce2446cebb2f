use crate::router::Router;
use crate::types::RequestContext;
use crate::{Error, RouteError};
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{service::Service, Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

/// A hyper [`Service`](https://docs.rs/hyper/1/hyper/service/trait.Service.html) processing the requests of a
/// single connection.
///
/// The request body is buffered completely before the router sees the request.
pub struct RequestService<E> {
    pub(crate) router: Arc<Router<E>>,
    pub(crate) remote_addr: Option<SocketAddr>,
}

impl<B, E> Service<Request<B>> for RequestService<E>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<RouteError>,
    E: Into<RouteError> + 'static,
{
    type Response = Response<Full<Bytes>>;
    type Error = RouteError;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let router = self.router.clone();
        let remote_addr = self.remote_addr;

        let fut = async move {
            let (parts, body) = req.into_parts();

            let raw_body = body
                .collect()
                .await
                .map_err(|e| Error::ReadBody(e.into()))?
                .to_bytes();

            tracing::trace!(method = %parts.method, uri = %parts.uri, bytes = raw_body.len(), "request received");

            let ctx = RequestContext::from_parts(parts.method, parts.uri, parts.headers, raw_body, remote_addr);

            let res = router.dispatch(ctx).await?;
            Ok::<_, RouteError>(res)
        };

        Box::pin(fut)
    }
}

#[derive(Debug)]
pub struct RequestServiceBuilder<E> {
    router: Arc<Router<E>>,
}

impl<E: Into<RouteError> + 'static> RequestServiceBuilder<E> {
    pub fn new(router: Router<E>) -> Self {
        Self {
            router: Arc::from(router),
        }
    }

    pub fn build(&self, remote_addr: Option<SocketAddr>) -> RequestService<E> {
        RequestService {
            router: self.router.clone(),
            remote_addr,
        }
    }
}
