//! `webservice` is a lightweight HTTP request router for the Rust HTTP library [hyper](https://hyper.rs/).
//!
//! It maps an incoming method and path to a chain of handlers, extracts the route parameters and runs an ordered
//! list of before-handlers ahead of route dispatch, with a uniform error handling strategy.
//!
//! ## Basic Example
//!
//! ```no_run
//! use webservice::prelude::*;
//! use webservice::{Router, TracingLogger, WebService};
//! use std::convert::Infallible;
//!
//! // A handler for "/echo/:value" page.
//! async fn echo_handler(mut ctx: RequestContext) -> Result<Step, Infallible> {
//!     let value = ctx.param("value").unwrap_or_default().to_string();
//!     ctx.send(value);
//!     Ok(ctx.end())
//! }
//!
//! // A before-handler which runs for every request.
//! async fn logger(ctx: RequestContext) -> Result<Step, Infallible> {
//!     println!("{} {}", ctx.method(), ctx.url());
//!     Ok(ctx.next())
//! }
//!
//! fn router() -> Router<Infallible> {
//!     Router::builder()
//!         .logger(TracingLogger)
//!         .before(logger)
//!         .get("/echo/:value", echo_handler)
//!         .build()
//!         .unwrap()
//! }
//!
//! #[tokio::main]
//! async fn main() -> webservice::Result<()> {
//!     let service = WebService::new(router());
//!     let addr = service.listen(3000).await?;
//!     println!("App is running on: {}", addr);
//!     # service.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Routing
//!
//! ### Route Handlers
//!
//! A handler is a function or a closure which takes the [`RequestContext`](./struct.RequestContext.html) and returns
//! a [`Step`](./enum.Step.html): `Step::Next` hands the context to the following handler, `Step::End` finishes the
//! chain. A handler sends the response itself through the `send` family of methods; the router never produces a
//! response for a successful chain.
//!
//! ```
//! use webservice::{HandlerChain, RequestContext, RouteMethod, Router, Step};
//! use std::convert::Infallible;
//!
//! # fn run() -> Router<Infallible> {
//! let router = Router::builder()
//!     .get("/about", |mut ctx: RequestContext| async move {
//!         ctx.send("About page");
//!         Ok(ctx.end())
//!     })
//!     // A route may have a chain of several handlers.
//!     .route(
//!         RouteMethod::Post,
//!         "/users",
//!         HandlerChain::new()
//!             .handler(|ctx: RequestContext| async move { Ok(ctx.next()) })
//!             .handler(|mut ctx: RequestContext| async move {
//!                 let body = ctx.body().cloned();
//!                 ctx.send(body);
//!                 Ok(ctx.end())
//!             }),
//!     )
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! Routes are tried in registration order and the first one matching both the path and the method wins, so a more
//! specific route must be registered before a broader one. Requests matching no route get a `404` response.
//!
//! ### Route Paths
//!
//! * `/about` matches `/about` and `/about/`, case-insensitively unless `case_sensitive(true)` is set;
//!   `strict(true)` rejects the trailing `/`.
//! * `/users/:userId` captures one path segment into the `userId` parameter.
//! * `/a/:x?` makes the segment optional, `/files/:name.:ext` captures a name and a format.
//! * `/users/:id(\d+)` restricts the parameter with a custom regex.
//! * `/files/*` captures the rest of the path as a positional parameter.
//! * A list of paths or a precompiled [`regex::Regex`](https://docs.rs/regex) can be used as well.
//!
//! ```
//! use webservice::{PatternOptions, RouteParams, RoutePattern};
//!
//! let pattern = RoutePattern::compile("/users/:userName/books/:bookName?", PatternOptions::default()).unwrap();
//!
//! let mut params = RouteParams::new();
//! assert!(pattern.match_path("/users/alice/books", &mut params));
//! assert_eq!(params.get("userName"), Some("alice"));
//! assert!(params.contains("bookName"));
//! assert_eq!(params.get("bookName"), None);
//!
//! let loose = RoutePattern::compile("/about", PatternOptions::default()).unwrap();
//! assert!(loose.match_path("/ABOUT/", &mut RouteParams::new()));
//!
//! let strict = RoutePattern::compile("/about", PatternOptions::default().strict(true)).unwrap();
//! assert!(strict.match_path("/ABOUT", &mut RouteParams::new()));
//! assert!(!strict.match_path("/about/", &mut RouteParams::new()));
//! ```
//!
//! ## Error Handling
//!
//! Handlers may return any error type convertible into a [`RouteError`](./type.RouteError.html). An error, or a
//! panic, aborts the remaining handlers; it is passed to the [`Logger`](./trait.Logger.html) and answered with a
//! `500` response whose plain text body is the error followed by its sources.
//!
//! The [`Error`](./enum.Error.html) type covers the failures of the framework itself, e.g. a route registered without
//! handlers makes [`RouterBuilder::build`](./struct.RouterBuilder.html#method.build) fail.

pub use self::error::{Error, RouteError};
pub use self::logger::{Logger, NoopLogger, TracingLogger};
pub use self::middleware::{HandlerChain, Step};
pub use self::pattern::{ParamKey, PatternOptions, RoutePath, RoutePattern};
pub use self::response::Payload;
pub use self::route::{Route, RouteMethod, RouteTable};
pub use self::router::{Router, RouterBuilder};
pub use self::server::WebService;
#[doc(hidden)]
pub use self::service::RequestService;
pub use self::service::RequestServiceBuilder;
pub use self::service::RouterService;
pub use self::types::{RequestContext, RouteParams};

mod body;
mod constants;
mod error;
mod helpers;
pub mod logger;
mod middleware;
mod pattern;
pub mod prelude;
mod regex_generator;
mod response;
mod route;
mod router;
mod server;
mod service;
mod types;

/// A Result type often returned from methods that can have webservice errors.
pub type Result<T> = std::result::Result<T, Error>;
