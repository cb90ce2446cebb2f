use http::StatusCode;
use std::fmt;
use tracing_subscriber::EnvFilter;
use webservice::prelude::*;
use webservice::{Router, TracingLogger, WebService};

// A custom error type returned by the handlers.
#[derive(Debug)]
struct AuthError(String);

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Authorization failed: {}", self.0)
    }
}

impl std::error::Error for AuthError {}

// A before-handler which rejects requests without an `x-api-key` header.
// Returning an error skips the remaining handlers and answers with a `500`.
async fn require_api_key(ctx: RequestContext) -> Result<Step, AuthError> {
    if ctx.header("x-api-key").is_some() {
        return Ok(ctx.next());
    }
    Err(AuthError(format!("no api key for {}", ctx.url())))
}

// A before-handler which answers "/health" itself and ends the chain.
async fn health_check(mut ctx: RequestContext) -> Result<Step, AuthError> {
    if ctx.path() == "/health" {
        ctx.send_status(StatusCode::OK, "ok");
        return Ok(ctx.end());
    }
    Ok(ctx.next())
}

async fn secret_handler(mut ctx: RequestContext) -> Result<Step, AuthError> {
    ctx.send("The secret page");
    Ok(ctx.end())
}

fn router() -> webservice::Result<Router<AuthError>> {
    Router::builder()
        .logger(TracingLogger)
        .before(health_check)
        .before(require_api_key)
        .get("/secret", secret_handler)
        .build()
}

#[tokio::main]
async fn main() -> webservice::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let service = WebService::new(router()?);
    let addr = service.listen(3002).await?;
    println!("App is running on: {}", addr);

    tokio::signal::ctrl_c().await.ok();
    service.close().await;
    Ok(())
}
