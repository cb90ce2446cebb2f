use http::Method;
use thiserror::Error;

/// The error type used by the route handlers and the before-handlers.
///
/// Any error type which can be converted into `Box<dyn std::error::Error + Send + Sync>` can be returned
/// from a handler; it is boxed into this type and rendered into a `500` response by the dispatcher.
pub type RouteError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The errors raised by the framework itself.
#[derive(Error, Debug)]
pub enum Error {
    /// A route was registered without any handler.
    #[error("A callback is required for the route: {method} {path}")]
    MissingHandler { method: String, path: String },

    /// A route path could not be compiled into a regular expression.
    #[error("Could not create an exact match regex for the route path: {path}: {source}")]
    InvalidPattern {
        path: String,
        #[source]
        source: regex::Error,
    },

    /// `listen` was called on a service which is already listening.
    #[error("Server is already listening")]
    AlreadyListening,

    /// The listener could not be bound.
    #[error("Could not bind to 127.0.0.1:{port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// The request body could not be read from the transport.
    #[error("Couldn't read the request body: {0}")]
    ReadBody(RouteError),

    /// The request body could not be parsed as JSON.
    #[error("Couldn't parse the request body as JSON: {0}")]
    ParseBody(#[from] serde_json::Error),

    /// A handler panicked while processing the request.
    #[error("A handler panicked: {0}")]
    HandlerPanic(String),

    /// The handlers finished without sending a response.
    #[error("No response was sent for the request: {method} {path}")]
    NoResponse { method: Method, path: String },
}
