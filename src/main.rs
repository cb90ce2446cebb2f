use std::convert::Infallible;
use tracing_subscriber::EnvFilter;
// Import the webservice prelude traits and types.
use webservice::prelude::*;
use webservice::{Router, TracingLogger, WebService};

// A handler for "/echo/:value" which answers with the captured value.
async fn echo_handler(mut ctx: RequestContext) -> Result<Step, Infallible> {
    let value = ctx.param("value").unwrap_or_default().to_string();
    ctx.send(value);
    Ok(ctx.end())
}

// A handler for "POST /echo/:value" which answers with the parsed body.
async fn echo_body_handler(mut ctx: RequestContext) -> Result<Step, Infallible> {
    let body = ctx.body().cloned();
    ctx.send(body);
    Ok(ctx.end())
}

// A before-handler which logs an http request.
async fn logger(ctx: RequestContext) -> Result<Step, Infallible> {
    let remote = ctx.remote_addr().map(|addr| addr.to_string()).unwrap_or_default();
    println!("{} {} {}", remote, ctx.method(), ctx.url());
    Ok(ctx.next())
}

fn router() -> webservice::Result<Router<Infallible>> {
    // Here, "before" adds a handler which runs for every request ahead of the route handlers.
    Router::builder()
        .logger(TracingLogger)
        .before(logger)
        .get("/echo/:value", echo_handler)
        .post("/echo/:value", echo_body_handler)
        .build()
}

#[tokio::main]
async fn main() -> webservice::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let service = WebService::new(router()?);
    let addr = service.listen(3000).await?;
    println!("App is running on: {}", addr);

    if let Err(err) = tokio::signal::ctrl_c().await {
        eprintln!("Unable to listen for the shutdown signal: {}", err);
    }

    service.close().await;
    Ok(())
}
