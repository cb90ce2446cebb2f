use crate::types::RequestContext;
use crate::RouteError;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

pub(crate) use self::decorate::decorate_handler;
pub(crate) use self::pipeline::{run, Outcome};

mod decorate;
mod pipeline;

pub(crate) type Handler = Box<dyn Fn(RequestContext) -> HandlerReturn + Send + Sync + 'static>;
pub(crate) type HandlerReturn = Box<dyn Future<Output = Result<Step, RouteError>> + Send + 'static>;

/// What a handler does with the request context once its turn is over.
///
/// A handler either hands the context on to the following handler, or ends the chain, typically after it
/// has sent a response. Returning an error aborts the chain as well and produces a `500` response.
#[derive(Debug)]
pub enum Step {
    /// Run the following handler, the equivalent of calling `next()`.
    Next(RequestContext),

    /// Skip the remaining handlers.
    End(RequestContext),
}

pub(crate) fn boxed_handler<H, R, E>(handler: H) -> Arc<Handler>
where
    H: Fn(RequestContext) -> R + Send + Sync + 'static,
    R: Future<Output = Result<Step, E>> + Send + 'static,
    E: Into<RouteError> + 'static,
{
    let handler: Handler = Box::new(move |ctx: RequestContext| {
        let fut = handler(ctx);
        Box::new(async move { fut.await.map_err(Into::into) })
    });
    Arc::new(handler)
}

/// The ordered list of handlers bound to a single route.
///
/// The `E` represents any error type which will be used by the handlers. This error type must be convertible into
/// a [`RouteError`](./type.RouteError.html).
///
/// # Examples
///
/// ```
/// use webservice::{HandlerChain, RequestContext, RouteMethod, Router};
/// use std::convert::Infallible;
///
/// async fn load_user(mut ctx: RequestContext) -> Result<webservice::Step, Infallible> {
///     let name = ctx.param("name").unwrap_or("anonymous").to_string();
///     ctx.set_data(name);
///     Ok(ctx.next())
/// }
///
/// async fn greet(mut ctx: RequestContext) -> Result<webservice::Step, Infallible> {
///     let greeting = format!("Hello {}", ctx.data::<String>().unwrap());
///     ctx.send(greeting);
///     Ok(ctx.end())
/// }
///
/// let router: Router<Infallible> = Router::builder()
///     .route(RouteMethod::Get, "/greet/:name", HandlerChain::new().handler(load_user).handler(greet))
///     .build()
///     .unwrap();
/// ```
pub struct HandlerChain<E> {
    pub(crate) handlers: Vec<Arc<Handler>>,
    _error: std::marker::PhantomData<fn() -> E>,
}

impl<E: Into<RouteError> + 'static> HandlerChain<E> {
    /// Creates an empty chain. A route registered with an empty chain makes the router build fail.
    pub fn new() -> HandlerChain<E> {
        HandlerChain {
            handlers: Vec::new(),
            _error: std::marker::PhantomData,
        }
    }

    /// Appends a handler to the chain.
    pub fn handler<H, R>(mut self, handler: H) -> HandlerChain<E>
    where
        H: Fn(RequestContext) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Step, E>> + Send + 'static,
    {
        self.handlers.push(boxed_handler(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E: Into<RouteError> + 'static> Default for HandlerChain<E> {
    fn default() -> Self {
        HandlerChain::new()
    }
}

impl<E> Debug for HandlerChain<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ handlers: {} }}", self.handlers.len())
    }
}
