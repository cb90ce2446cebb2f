use crate::constants::LOOPBACK;
use crate::logger::Logger;
use crate::router::Router;
use crate::service::RouterService;
use crate::{Error, RouteError};
use hyper::service::Service;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use parking_lot::Mutex;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot::{self, Sender};
use tokio::task::JoinHandle;

const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

struct Listening {
    addr: SocketAddr,
    tx: Sender<()>,
    task: JoinHandle<()>,
}

/// Serves a [`Router`](./struct.Router.html) on a loopback port.
///
/// # Examples
///
/// ```no_run
/// use webservice::{RequestContext, Router, Step, WebService};
/// use std::convert::Infallible;
///
/// #[tokio::main]
/// async fn main() -> webservice::Result<()> {
///     let router: Router<Infallible> = Router::builder()
///         .get("/version", |mut ctx: RequestContext| async move {
///             ctx.send("1.0");
///             Ok::<_, Infallible>(Step::End(ctx))
///         })
///         .build()?;
///
///     let service = WebService::new(router);
///     let addr = service.listen(3000).await?;
///     println!("App is running on: {}", addr);
///
///     // Serve requests until the application decides to stop.
///
///     service.close().await;
///     Ok(())
/// }
/// ```
pub struct WebService<E> {
    service: Arc<RouterService<E>>,
    logger: Arc<dyn Logger>,
    listening: Mutex<Option<Listening>>,
}

impl<E: Into<RouteError> + 'static> WebService<E> {
    pub fn new(router: Router<E>) -> WebService<E> {
        let logger = router.logger.clone();
        WebService {
            service: Arc::new(RouterService::new(router)),
            logger,
            listening: Mutex::new(None),
        }
    }

    /// Binds `127.0.0.1:port` and starts accepting connections in the background.
    ///
    /// It resolves with the bound address once the listener is ready; pass `0` to bind any free port.
    /// It fails with [`Error::AlreadyListening`](./enum.Error.html#variant.AlreadyListening) while the service is
    /// already listening.
    pub async fn listen(&self, port: u16) -> crate::Result<SocketAddr> {
        if self.is_listening() {
            return Err(Error::AlreadyListening);
        }

        let listener = TcpListener::bind(SocketAddr::from((LOOPBACK, port)))
            .await
            .map_err(|source| Error::Bind { port, source })?;
        let addr = listener.local_addr().map_err(|source| Error::Bind { port, source })?;

        let mut listening = self.listening.lock();
        if listening.is_some() {
            return Err(Error::AlreadyListening);
        }

        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(accept_loop(listener, self.service.clone(), rx));
        *listening = Some(Listening { addr, tx, task });

        self.logger.log(&format!("Listening on port {}", addr.port()));
        tracing::debug!(address = %addr, "listener started");

        Ok(addr)
    }

    /// Stops accepting new connections. Connections already accepted are served to completion.
    ///
    /// It does nothing if the service is not listening.
    pub async fn close(&self) {
        let listening = self.listening.lock().take();
        let Some(Listening { addr, tx, task }) = listening else {
            return;
        };

        let _ = tx.send(());
        if let Err(err) = task.await {
            tracing::warn!(address = %addr, "accept loop ended abnormally: {}", err);
        }
        tracing::debug!(address = %addr, "listener closed");
    }

    pub fn is_listening(&self) -> bool {
        self.listening.lock().is_some()
    }

    /// The address the service listens on, if it is listening.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listening.lock().as_ref().map(|l| l.addr)
    }
}

async fn accept_loop<E>(listener: TcpListener, service: Arc<RouterService<E>>, mut shutdown: oneshot::Receiver<()>)
where
    E: Into<RouteError> + 'static,
{
    loop {
        let stream = tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, _)) => stream,
                Err(err) => {
                    back_off(&err).await;
                    continue;
                }
            },
        };

        let service = service.clone();
        tokio::spawn(async move {
            let request_service = match service.call(&stream).await {
                Ok(request_service) => request_service,
                Err(never) => match never {},
            };
            let io = TokioIo::new(stream);
            let builder = Builder::new(TokioExecutor::new());
            if let Err(err) = builder.serve_connection(io, request_service).await {
                tracing::debug!("Error serving connection: {:?}", err);
            }
        });
    }
}

// Delays the next accept after a failure such as EMFILE.
async fn back_off(err: &io::Error) {
    tracing::warn!("Error accepting connection: {}", err);
    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
}
