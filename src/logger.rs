//! The logger capability used by the dispatcher.
//!
//! A [`Logger`](./trait.Logger.html) is injected through [`RouterBuilder::logger`](../struct.RouterBuilder.html#method.logger).
//! Without one the router stays silent with a [`NoopLogger`](./struct.NoopLogger.html). The
//! [`TracingLogger`](./struct.TracingLogger.html) forwards every message to the `tracing` macros.

/// Receives the messages produced while requests are processed.
pub trait Logger: Send + Sync + 'static {
    fn log(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);
}

/// A logger which discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _: &str) {}

    fn warn(&self, _: &str) {}

    fn error(&self, _: &str) {}
}

/// A logger which emits `info`, `warn` and `error` events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: "webservice", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "webservice", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "webservice", "{}", message);
    }
}
