use hyper::service::Service;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
// Import the webservice prelude traits and types.
use webservice::prelude::*;
use webservice::{Router, RouterService};

// A handler for "/" page.
async fn home_handler(mut ctx: RequestContext) -> Result<Step, io::Error> {
    ctx.send("Home page");
    Ok(ctx.end())
}

// Define a handler for "/users/:userName/books/:bookName?" page which will have two
// route parameters: `userName` and the optional `bookName`.
async fn user_book_handler(mut ctx: RequestContext) -> Result<Step, io::Error> {
    let user_name = ctx.param("userName").unwrap_or_default().to_string();
    let reply = match ctx.param("bookName") {
        Some(book_name) => format!("User: {}, Book: {}", user_name, book_name),
        None => format!("User: {}, no book", user_name),
    };

    ctx.send(reply);
    Ok(ctx.end())
}

// A handler for "/files/*" which reads the wildcard capture positionally.
async fn file_handler(mut ctx: RequestContext) -> Result<Step, io::Error> {
    let file = ctx
        .params()
        .positional()
        .first()
        .cloned()
        .flatten()
        .unwrap_or_default();

    ctx.send(format!("File: {}", file));
    Ok(ctx.end())
}

fn router() -> Router<io::Error> {
    // Create a router and specify the handlers.
    Router::builder()
        .get("/", home_handler)
        .get("/users/:userName/books/:bookName?", user_book_handler)
        .get("/files/*", file_handler)
        .build()
        .unwrap()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Create a Service from the router above to handle incoming connections.
    let router_service = Arc::new(RouterService::new(router()));

    // The address on which the server will be listening.
    let addr = SocketAddr::from(([127, 0, 0, 1], 3001));

    let listener = TcpListener::bind(addr).await?;
    println!("App is running on: {}", addr);

    loop {
        let (stream, _) = listener.accept().await?;

        let router_service = router_service.clone();

        tokio::spawn(async move {
            // Get the request service for this connection.
            let request_service = router_service.call(&stream).await.unwrap();

            let io = TokioIo::new(stream);
            let builder = Builder::new(TokioExecutor::new());

            if let Err(err) = builder.serve_connection(io, request_service).await {
                eprintln!("Error serving connection: {:?}", err);
            }
        });
    }
}
