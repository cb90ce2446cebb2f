use crate::constants::{ERROR_CONTENT_TYPE, NOT_FOUND_MESSAGE};
use crate::helpers;
use crate::logger::{Logger, NoopLogger};
use crate::middleware::{self, boxed_handler, decorate_handler, Handler, HandlerChain, Outcome, Step};
use crate::pattern::{PatternOptions, RoutePath};
use crate::response::{build_response, Payload};
use crate::route::{Route, RouteMethod, RouteTable};
use crate::types::RequestContext;
use crate::{Error, RouteError};
use http::StatusCode;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Represents a modular, immutable set of routes and before-handlers.
///
/// It is created with [`Router::builder`](#method.builder); once built nothing can be registered anymore, so the
/// same router can be shared by every connection.
///
/// The `E` represents any error type which will be used by the route handlers and the before-handlers. This error
/// type must be convertible into a [`RouteError`](./type.RouteError.html).
pub struct Router<E> {
    pub(crate) routes: RouteTable,
    pub(crate) before: Vec<Arc<Handler>>,
    pub(crate) logger: Arc<dyn Logger>,
    _error: PhantomData<fn() -> E>,
}

impl<E: Into<RouteError> + 'static> Router<E> {
    /// Returns a [`RouterBuilder`](./struct.RouterBuilder.html) to register the routes and before-handlers.
    pub fn builder() -> RouterBuilder<E> {
        RouterBuilder::new()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Runs a request through the before-handlers and the first matching route.
    ///
    /// It fails only when the handlers finish without sending a response.
    pub(crate) async fn dispatch(&self, ctx: RequestContext) -> crate::Result<Response<Full<Bytes>>> {
        self.logger
            .log(&format!("incoming '{}' request {}", ctx.method(), ctx.url()));

        let mut ctx = match middleware::run(&self.before, ctx).await {
            Outcome::Completed(ctx) => ctx,
            Outcome::Halted(ctx) => return self.finish(ctx),
            Outcome::Failed(err) => return Ok(self.error_response(err)),
        };

        let route = match self.routes.find_first_match(ctx.method(), ctx.url()) {
            Some((route, params)) => {
                ctx.params = params;
                route
            }
            None => {
                tracing::debug!(method = %ctx.method(), url = ctx.url(), "no route matched");
                ctx.send_status(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE);
                return self.finish(ctx);
            }
        };

        tracing::debug!(method = %ctx.method(), url = ctx.url(), route = ?route, "route matched");

        match middleware::run(&route.handlers, ctx).await {
            Outcome::Completed(ctx) | Outcome::Halted(ctx) => self.finish(ctx),
            Outcome::Failed(err) => Ok(self.error_response(err)),
        }
    }

    fn finish(&self, ctx: RequestContext) -> crate::Result<Response<Full<Bytes>>> {
        let method = ctx.method().clone();
        let path = ctx.url().to_string();

        ctx.into_response().ok_or_else(|| {
            self.logger
                .warn(&format!("no response was sent for '{}' request {}", method, path));
            Error::NoResponse { method, path }
        })
    }

    fn error_response(&self, err: RouteError) -> Response<Full<Bytes>> {
        let report = helpers::error_report(&*err);
        self.logger.error(&format!("err: {}", report));

        build_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            Payload::Text(report),
            Some(ERROR_CONTENT_TYPE),
        )
    }
}

impl<E> Debug for Router<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ routes: {:?}, before: {} }}",
            self.routes,
            self.before.len()
        )
    }
}

struct BuilderInner {
    routes: RouteTable,
    before: Vec<Arc<Handler>>,
    logger: Arc<dyn Logger>,
    options: PatternOptions,
}

/// Builder for the [Router](./struct.Router.html) type.
///
/// The first registration error is kept and returned by [`build`](#method.build).
///
/// # Examples
///
/// ```
/// use webservice::{RequestContext, Router, Step};
/// use std::convert::Infallible;
///
/// async fn echo(mut ctx: RequestContext) -> Result<Step, Infallible> {
///     let value = ctx.param("value").unwrap_or_default().to_string();
///     ctx.send(value);
///     Ok(ctx.end())
/// }
///
/// let router: Router<Infallible> = Router::builder()
///     .before(|ctx| async move { Ok(ctx.next()) })
///     .get("/echo/:value", echo)
///     .build()
///     .unwrap();
/// ```
pub struct RouterBuilder<E> {
    inner: crate::Result<BuilderInner>,
    _error: PhantomData<fn() -> E>,
}

impl<E: Into<RouteError> + 'static> RouterBuilder<E> {
    pub fn new() -> RouterBuilder<E> {
        RouterBuilder::default()
    }

    /// Creates a new [Router](./struct.Router.html) instance from the registered routes and before-handlers.
    pub fn build(self) -> crate::Result<Router<E>> {
        let inner = self.inner?;

        let mut before = Vec::with_capacity(inner.before.len() + 1);
        before.push(decorate_handler(inner.logger.clone()));
        before.extend(inner.before);

        Ok(Router {
            routes: inner.routes,
            before,
            logger: inner.logger,
            _error: PhantomData,
        })
    }

    fn and_then<F>(self, func: F) -> Self
    where
        F: FnOnce(BuilderInner) -> crate::Result<BuilderInner>,
    {
        RouterBuilder {
            inner: self.inner.and_then(func),
            _error: PhantomData,
        }
    }

    /// Sets the logger which receives the request, warning and error messages.
    pub fn logger<L: Logger>(self, logger: L) -> Self {
        self.and_then(move |mut inner| {
            inner.logger = Arc::new(logger);
            Ok(inner)
        })
    }

    /// Makes the routes registered after this call match case-sensitively.
    pub fn case_sensitive(self, sensitive: bool) -> Self {
        self.and_then(move |mut inner| {
            inner.options = inner.options.sensitive(sensitive);
            Ok(inner)
        })
    }

    /// Makes the routes registered after this call reject an extra trailing slash.
    pub fn strict(self, strict: bool) -> Self {
        self.and_then(move |mut inner| {
            inner.options = inner.options.strict(strict);
            Ok(inner)
        })
    }

    /// Appends a handler which runs for every request, before the route is resolved.
    pub fn before<H, R>(self, handler: H) -> Self
    where
        H: Fn(RequestContext) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Step, E>> + Send + 'static,
    {
        self.and_then(move |mut inner| {
            inner.before.push(boxed_handler(handler));
            Ok(inner)
        })
    }

    /// Registers a route with a chain of handlers. The build fails if the chain is empty.
    pub fn route<P: Into<RoutePath>>(self, method: RouteMethod, path: P, chain: HandlerChain<E>) -> Self {
        let path = path.into();
        self.and_then(move |mut inner| {
            let route = Route::new(method, path, inner.options, chain.handlers)?;
            inner.routes.push(route);
            Ok(inner)
        })
    }

    /// Registers a `GET` route.
    pub fn get<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<RoutePath>,
        H: Fn(RequestContext) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Step, E>> + Send + 'static,
    {
        self.route(RouteMethod::Get, path, HandlerChain::new().handler(handler))
    }

    /// Registers a `POST` route.
    pub fn post<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<RoutePath>,
        H: Fn(RequestContext) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Step, E>> + Send + 'static,
    {
        self.route(RouteMethod::Post, path, HandlerChain::new().handler(handler))
    }

    /// Registers a `PUT` route.
    pub fn put<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<RoutePath>,
        H: Fn(RequestContext) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Step, E>> + Send + 'static,
    {
        self.route(RouteMethod::Put, path, HandlerChain::new().handler(handler))
    }

    /// Registers a `DELETE` route.
    pub fn delete<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<RoutePath>,
        H: Fn(RequestContext) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Step, E>> + Send + 'static,
    {
        self.route(RouteMethod::Delete, path, HandlerChain::new().handler(handler))
    }

    /// Registers a route for every request method.
    pub fn all<P, H, R>(self, path: P, handler: H) -> Self
    where
        P: Into<RoutePath>,
        H: Fn(RequestContext) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Step, E>> + Send + 'static,
    {
        self.route(RouteMethod::All, path, HandlerChain::new().handler(handler))
    }
}

impl<E> Default for RouterBuilder<E> {
    fn default() -> Self {
        RouterBuilder {
            inner: Ok(BuilderInner {
                routes: RouteTable::new(),
                before: Vec::new(),
                logger: Arc::new(NoopLogger),
                options: PatternOptions::default(),
            }),
            _error: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use http_body_util::BodyExt;
    use std::convert::Infallible;

    async fn dispatch(router: &Router<Error>, method: Method, uri: &str) -> crate::Result<Response<Full<Bytes>>> {
        router.dispatch(RequestContext::new(method, uri.parse().unwrap())).await
    }

    async fn body_text(res: Response<Full<Bytes>>) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn should_fail_to_build_with_an_empty_chain() {
        let result = Router::<Infallible>::builder()
            .route(RouteMethod::Get, "/users", HandlerChain::new())
            .build();
        assert!(matches!(result, Err(Error::MissingHandler { .. })));
    }

    #[test]
    fn should_fail_to_build_with_a_malformed_path() {
        let result = Router::<Infallible>::builder()
            .get("/users/:id([)", |ctx| async move { Ok(ctx.end()) })
            .build();
        assert!(matches!(result, Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn should_apply_options_to_later_routes() {
        let router = Router::<Infallible>::builder()
            .get("/loose", |ctx| async move { Ok(ctx.end()) })
            .strict(true)
            .case_sensitive(true)
            .get("/tight", |ctx| async move { Ok(ctx.end()) })
            .build()
            .unwrap();

        let options: Vec<_> = router.routes().iter().map(|r| r.pattern().options()).collect();
        assert_eq!(options[0], PatternOptions::default());
        assert_eq!(options[1], PatternOptions::default().strict(true).sensitive(true));
    }

    #[tokio::test]
    async fn should_respond_with_not_found() {
        let router: Router<Error> = Router::builder().build().unwrap();
        let res = dispatch(&router, Method::GET, "/nowhere").await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(res).await, "I'm sorry, but what you're looking for is not here.\n");
    }

    #[tokio::test]
    async fn should_fill_params_of_the_matched_route() {
        let router: Router<Error> = Router::builder()
            .get("/echo/:value", |mut ctx| async move {
                let value = ctx.param("value").unwrap_or_default().to_string();
                ctx.send(value);
                Ok(ctx.end())
            })
            .build()
            .unwrap();

        let res = dispatch(&router, Method::GET, "/echo/this").await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "this\n");
    }

    #[tokio::test]
    async fn should_fail_when_no_response_is_sent() {
        let router: Router<Error> = Router::builder()
            .get("/silent", |ctx| async move { Ok(ctx.next()) })
            .build()
            .unwrap();

        let err = dispatch(&router, Method::GET, "/silent").await.unwrap_err();
        assert!(matches!(err, Error::NoResponse { .. }));
    }

    #[tokio::test]
    async fn should_let_before_handlers_answer_early() {
        let router: Router<Error> = Router::builder()
            .before(|mut ctx| async move {
                ctx.send_status(StatusCode::UNAUTHORIZED, "denied");
                Ok(ctx.end())
            })
            .get("/secret", |mut ctx| async move {
                ctx.send("secret");
                Ok(ctx.end())
            })
            .build()
            .unwrap();

        let res = dispatch(&router, Method::GET, "/secret").await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(res).await, "denied\n");
    }
}
