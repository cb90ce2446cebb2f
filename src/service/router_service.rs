use crate::router::Router;
use crate::service::request_service::{RequestService, RequestServiceBuilder};
use crate::RouteError;
use hyper::service::Service;
use std::convert::Infallible;
use std::future::{ready, Ready};
use tokio::net::TcpStream;

/// A [`Service`](https://docs.rs/hyper/1/hyper/service/trait.Service.html) creating a
/// [`RequestService`](./struct.RequestService.html) for each accepted connection.
///
/// [`WebService`](./struct.WebService.html) uses it to serve its listener; it can also drive a custom accept loop.
///
/// # Examples
///
/// ```no_run
/// use hyper::service::Service;
/// use hyper_util::rt::{TokioExecutor, TokioIo};
/// use hyper_util::server::conn::auto::Builder;
/// use webservice::{RequestContext, Router, RouterService, Step};
/// use std::convert::Infallible;
/// use std::sync::Arc;
/// use tokio::net::TcpListener;
///
/// async fn home(mut ctx: RequestContext) -> Result<Step, Infallible> {
///     ctx.send("Home page");
///     Ok(ctx.end())
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let router: Router<Infallible> = Router::builder().get("/", home).build()?;
///     let service = Arc::new(RouterService::new(router));
///
///     let listener = TcpListener::bind("127.0.0.1:3001").await?;
///
///     loop {
///         let (stream, _) = listener.accept().await?;
///         let router_service = service.clone();
///
///         tokio::spawn(async move {
///             let request_service = router_service.call(&stream).await.unwrap();
///             let io = TokioIo::new(stream);
///             let builder = Builder::new(TokioExecutor::new());
///             if let Err(err) = builder.serve_connection(io, request_service).await {
///                 eprintln!("Error serving connection: {:?}", err);
///             }
///         });
///     }
/// }
/// ```
#[derive(Debug)]
pub struct RouterService<E> {
    builder: RequestServiceBuilder<E>,
}

impl<E: Into<RouteError> + 'static> RouterService<E> {
    pub fn new(router: Router<E>) -> RouterService<E> {
        RouterService {
            builder: RequestServiceBuilder::new(router),
        }
    }
}

impl<E: Into<RouteError> + 'static> Service<&TcpStream> for RouterService<E> {
    type Response = RequestService<E>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, conn: &TcpStream) -> Self::Future {
        let req_service = self.builder.build(conn.peer_addr().ok());

        ready(Ok(req_service))
    }
}
