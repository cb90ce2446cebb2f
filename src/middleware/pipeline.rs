use super::{Handler, Step};
use crate::helpers;
use crate::types::RequestContext;
use crate::{Error, RouteError};
use futures::FutureExt;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;

/// How a run of handlers ended.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Every handler handed the context on.
    Completed(RequestContext),
    /// A handler ended the chain.
    Halted(RequestContext),
    /// A handler returned an error or panicked; the remaining handlers were skipped.
    Failed(RouteError),
}

/// Runs `handlers` one at a time, in order, threading the context through them.
///
/// The pipeline consumes its own copy of the list, so each handler runs at most once per call while the
/// registered list stays intact for the next request. Every invocation is preceded by a yield to the
/// scheduler.
pub(crate) async fn run(handlers: &[Arc<Handler>], ctx: RequestContext) -> Outcome {
    let mut pending: VecDeque<Arc<Handler>> = handlers.iter().cloned().collect();
    let mut ctx = ctx;

    while let Some(handler) = pending.pop_front() {
        tokio::task::yield_now().await;

        tracing::trace!(remaining = pending.len(), url = ctx.url(), "invoking handler");

        match invoke(&handler, ctx).await {
            Ok(Step::Next(next_ctx)) => ctx = next_ctx,
            Ok(Step::End(ctx)) => return Outcome::Halted(ctx),
            Err(err) => return Outcome::Failed(err),
        }
    }

    Outcome::Completed(ctx)
}

async fn invoke(handler: &Handler, ctx: RequestContext) -> Result<Step, RouteError> {
    let fut = match panic::catch_unwind(AssertUnwindSafe(|| handler(ctx))) {
        Ok(fut) => fut,
        Err(payload) => return Err(Error::HandlerPanic(helpers::panic_message(payload.as_ref())).into()),
    };

    match AssertUnwindSafe(Pin::from(fut)).catch_unwind().await {
        Ok(res) => res,
        Err(payload) => Err(Error::HandlerPanic(helpers::panic_message(payload.as_ref())).into()),
    }
}
