use super::{Handler, Step};
use crate::body;
use crate::logger::Logger;
use crate::types::RequestContext;
use crate::RouteError;
use http::header::CONTENT_TYPE;
use std::sync::Arc;

/// The before-handler which always runs first: it parses the request cookies and the buffered body.
pub(crate) fn decorate_handler(logger: Arc<dyn Logger>) -> Arc<Handler> {
    let handler: Handler = Box::new(move |ctx: RequestContext| {
        let logger = logger.clone();
        Box::new(async move { decorate(ctx, logger.as_ref()) })
    });
    Arc::new(handler)
}

fn decorate(mut ctx: RequestContext, logger: &dyn Logger) -> Result<Step, RouteError> {
    logger.log("Processing core request handler pipeline");

    logger.log("Parsing cookies");
    ctx.parse_cookies();

    if !ctx.raw_body().is_empty() {
        logger.log("Parsing body data");
        let body = body::parse_body(ctx.raw_body(), ctx.header(CONTENT_TYPE))?;
        ctx.set_body(body);
    }

    Ok(ctx.next())
}
