use self::support::{into_text, serve, RecordingLogger};
use cookie::Cookie;
use http::{header, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::Service;
use serde_json::json;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use webservice::{HandlerChain, RequestContext, RequestServiceBuilder, RouteMethod, Router, Step};

mod support;

async fn echo(mut ctx: RequestContext) -> Result<Step, io::Error> {
    let value = ctx.param("value").unwrap_or_default().to_string();
    ctx.send(value);
    Ok(ctx.end())
}

async fn echo_body(mut ctx: RequestContext) -> Result<Step, io::Error> {
    let body = ctx.body().cloned();
    ctx.send(body);
    Ok(ctx.end())
}

#[tokio::test]
async fn can_echo_route_params() {
    let router: Router<io::Error> = Router::builder().get("/echo/:value", echo).build().unwrap();
    let serve = serve(router).await;

    let resp = serve.get("/echo/this").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/html");
    assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(resp.headers()[header::PRAGMA], "no-cache");
    assert_eq!(resp.headers()[header::EXPIRES], "-1");
    assert_eq!(into_text(resp.into_body()).await, "this\n");

    let resp = serve.get("/ECHO/that/").await;
    assert_eq!(into_text(resp.into_body()).await, "that\n");

    serve.shutdown().await;
}

#[tokio::test]
async fn can_echo_json_bodies() {
    let router: Router<io::Error> = Router::builder().post("/echo/:value", echo_body).build().unwrap();
    let serve = serve(router).await;

    let req = serve
        .new_request("POST", "/echo/this")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(json!({"hello": "world"}).to_string())))
        .unwrap();
    let resp = serve.send(req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(into_text(resp.into_body()).await, "{\"hello\":\"world\"}\n");

    serve.shutdown().await;
}

#[tokio::test]
async fn can_parse_form_bodies_and_queries() {
    let router: Router<io::Error> = Router::builder()
        .post("/form", echo_body)
        .get("/search", |mut ctx| async move {
            let query = ctx.query();
            ctx.send(query);
            Ok(ctx.end())
        })
        .build()
        .unwrap();
    let serve = serve(router).await;

    let req = serve
        .new_request("POST", "/form")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Full::new(Bytes::from_static(b"a=1&b=2&b=3")))
        .unwrap();
    let resp = serve.send(req).await;
    assert_eq!(into_text(resp.into_body()).await, "{\"a\":\"1\",\"b\":[\"2\",\"3\"]}\n");

    let resp = serve.get("/search?q=rust+lang").await;
    assert_eq!(into_text(resp.into_body()).await, "{\"q\":\"rust lang\"}\n");

    serve.shutdown().await;
}

#[tokio::test]
async fn can_route_by_method() {
    let router: Router<io::Error> = Router::builder()
        .put("/items/:id", |mut ctx| async move {
            let reply = format!("put {}", ctx.param("id").unwrap_or_default());
            ctx.send(reply);
            Ok(ctx.end())
        })
        .delete("/items/:id", |mut ctx| async move {
            ctx.send_status(StatusCode::ACCEPTED, "deleted");
            Ok(ctx.end())
        })
        .all("/any", |mut ctx| async move {
            let reply = ctx.method().to_string();
            ctx.send(reply);
            Ok(ctx.end())
        })
        .build()
        .unwrap();
    let serve = serve(router).await;

    let req = serve.new_request("PUT", "/items/7").body(Full::new(Bytes::new())).unwrap();
    assert_eq!(into_text(serve.send(req).await.into_body()).await, "put 7\n");

    let req = serve.new_request("DELETE", "/items/7").body(Full::new(Bytes::new())).unwrap();
    let resp = serve.send(req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(into_text(resp.into_body()).await, "deleted\n");

    let req = serve.new_request("PATCH", "/any").body(Full::new(Bytes::new())).unwrap();
    assert_eq!(into_text(serve.send(req).await.into_body()).await, "PATCH\n");

    let resp = serve.get("/items/7").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    serve.shutdown().await;
}

#[tokio::test]
async fn can_answer_unmatched_requests_with_not_found() {
    let router: Router<io::Error> = Router::builder().get("/echo/:value", echo).build().unwrap();
    let serve = serve(router).await;

    let resp = serve.get("/nowhere").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/html");
    assert_eq!(
        into_text(resp.into_body()).await,
        "I'm sorry, but what you're looking for is not here.\n"
    );

    serve.shutdown().await;
}

#[tokio::test]
async fn can_use_the_first_matching_route() {
    let router: Router<io::Error> = Router::builder()
        .get("/users/me", |mut ctx| async move {
            ctx.send("me");
            Ok(ctx.end())
        })
        .get("/users/:id", |mut ctx| async move {
            ctx.send("someone");
            Ok(ctx.end())
        })
        .build()
        .unwrap();
    let serve = serve(router).await;

    assert_eq!(into_text(serve.get("/users/me").await.into_body()).await, "me\n");
    assert_eq!(into_text(serve.get("/users/42").await.into_body()).await, "someone\n");

    serve.shutdown().await;
}

#[tokio::test]
async fn can_run_a_route_handler_chain() {
    let router: Router<io::Error> = Router::builder()
        .route(
            RouteMethod::Get,
            "/chain/:value",
            HandlerChain::new()
                .handler(|mut ctx| async move {
                    let value = ctx.param("value").unwrap_or_default().to_uppercase();
                    ctx.set_data(value);
                    Ok(ctx.next())
                })
                .handler(|mut ctx| async move {
                    let value = ctx.data::<String>().cloned().unwrap_or_default();
                    ctx.send(value);
                    Ok(ctx.end())
                }),
        )
        .build()
        .unwrap();
    let serve = serve(router).await;

    assert_eq!(into_text(serve.get("/chain/abc").await.into_body()).await, "ABC\n");

    serve.shutdown().await;
}

#[tokio::test]
async fn can_run_before_handlers_in_order_under_load() {
    let router: Router<io::Error> = Router::builder()
        .before(|mut ctx| async move {
            ctx.set_data(vec![1u32]);
            Ok(ctx.next())
        })
        .before(|mut ctx| async move {
            tokio::task::yield_now().await;
            if let Some(order) = ctx.data_mut::<Vec<u32>>() {
                order.push(2);
            }
            Ok(ctx.next())
        })
        .before(|mut ctx| async move {
            if let Some(order) = ctx.data_mut::<Vec<u32>>() {
                order.push(3);
            }
            Ok(ctx.next())
        })
        .get("/order", |mut ctx| async move {
            let order = ctx.data::<Vec<u32>>().cloned().unwrap_or_default();
            ctx.send(json!(order));
            Ok(ctx.end())
        })
        .build()
        .unwrap();

    let service = RequestServiceBuilder::new(router).build(None);
    let calls = (0..200).map(|_| {
        let req = http::Request::builder()
            .uri("/order")
            .body(Full::new(Bytes::new()))
            .unwrap();
        service.call(req)
    });

    for resp in futures::future::join_all(calls).await {
        let resp = resp.unwrap();
        assert_eq!(into_text(resp.into_body()).await, "[1,2,3]\n");
    }
}

#[tokio::test]
async fn can_short_circuit_on_before_handler_errors() {
    let route_ran = Arc::new(AtomicBool::new(false));
    let route_ran2 = route_ran.clone();
    let logger = RecordingLogger::default();

    let router: Router<io::Error> = Router::builder()
        .logger(logger.clone())
        .before(|_| async move { Err(io::Error::new(io::ErrorKind::Other, "boom")) })
        .get("/echo/:value", move |ctx| {
            let route_ran = route_ran2.clone();
            async move {
                route_ran.store(true, Ordering::SeqCst);
                echo(ctx).await
            }
        })
        .build()
        .unwrap();
    let serve = serve(router).await;

    let resp = serve.get("/echo/this").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(into_text(resp.into_body()).await, "boom\n");
    assert!(!route_ran.load(Ordering::SeqCst));
    assert!(logger.messages().contains(&"error: err: boom".to_string()));

    serve.shutdown().await;
}

async fn exploding(_: RequestContext) -> Result<Step, io::Error> {
    panic!("kaboom")
}

#[tokio::test]
async fn can_answer_handler_panics_with_server_error() {
    let router: Router<io::Error> = Router::builder()
        .get("/explode", exploding)
        .get("/echo/:value", echo)
        .build()
        .unwrap();
    let serve = serve(router).await;

    let resp = serve.get("/explode").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(into_text(resp.into_body()).await, "A handler panicked: kaboom\n");

    // The service keeps serving after a panic.
    assert_eq!(into_text(serve.get("/echo/again").await.into_body()).await, "again\n");

    serve.shutdown().await;
}

#[tokio::test]
async fn can_read_and_set_cookies() {
    let router: Router<io::Error> = Router::builder()
        .get("/session", |mut ctx| async move {
            let session = ctx.cookies().get("session").map(|c| c.value().to_string());
            ctx.cookies_mut().add(Cookie::new("visited", "yes"));
            ctx.send(session);
            Ok(ctx.end())
        })
        .build()
        .unwrap();
    let serve = serve(router).await;

    let req = serve
        .new_request("GET", "/session")
        .header(header::COOKIE, "session=abc; theme=dark")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let resp = serve.send(req).await;

    let set_cookies: Vec<_> = resp.headers().get_all(header::SET_COOKIE).iter().collect();
    assert_eq!(set_cookies, vec!["visited=yes"]);
    assert_eq!(into_text(resp.into_body()).await, "abc\n");

    serve.shutdown().await;
}

#[tokio::test]
async fn can_report_to_the_injected_logger() {
    let logger = RecordingLogger::default();
    let router: Router<io::Error> = Router::builder()
        .logger(logger.clone())
        .get("/echo/:value", echo)
        .build()
        .unwrap();
    let serve = serve(router).await;
    let port = serve.addr().port();

    serve.get("/echo/this").await;

    let messages = logger.messages();
    assert_eq!(
        messages,
        vec![
            format!("log: Listening on port {}", port),
            "log: incoming 'GET' request /echo/this".to_string(),
            "log: Processing core request handler pipeline".to_string(),
            "log: Parsing cookies".to_string(),
        ]
    );

    serve.shutdown().await;
}

#[tokio::test]
async fn can_stop_listening_on_close() {
    let router: Router<io::Error> = Router::builder().get("/echo/:value", echo).build().unwrap();
    let serve = serve(router).await;
    let addr = serve.addr();

    assert!(serve.service().is_listening());
    assert!(matches!(serve.service().listen(0).await, Err(webservice::Error::AlreadyListening)));

    serve.service().close().await;
    assert!(!serve.service().is_listening());
    assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn can_send_with_a_custom_content_type() {
    let router: Router<io::Error> = Router::builder()
        .get("/export", |mut ctx| async move {
            ctx.send_with(StatusCode::CREATED, "a,b", "text/csv");
            Ok(ctx.end())
        })
        .build()
        .unwrap();
    let serve = serve(router).await;

    let resp = serve.get("/export").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(into_text(resp.into_body()).await, "a,b\n");

    serve.shutdown().await;
}
