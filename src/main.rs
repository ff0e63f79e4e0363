use std::sync::Arc;
use std::time::Duration;

use http::Method;
use marhaba::handlers::{HandlerResult, ResourceHandler};
use marhaba::logging::init_logging;
use marhaba::middleware::{MetricsMiddleware, Middleware, TracingMiddleware};
use marhaba::server::{Request, Response};
use marhaba::{App, AppConfig};
use serde_json::json;
use tracing::info;

#[derive(Default)]
struct Book;

impl Book {
    fn get(&mut self, _req: &Request, res: &mut Response) -> HandlerResult {
        res.set_text("Welcome to Books page. Enjoy coding.");
        Ok(())
    }

    fn post(&mut self, _req: &Request, res: &mut Response) -> HandlerResult {
        res.set_text("Page to create books. Enjoy coding.");
        Ok(())
    }
}

struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn before(&self, req: &mut Request) -> anyhow::Result<()> {
        info!(method = %req.method, path = %req.path, "Request is being called");
        Ok(())
    }

    fn after(&self, req: &Request, _res: &mut Response, _latency: Duration) -> anyhow::Result<()> {
        info!(method = %req.method, path = %req.path, "Response has been generated");
        Ok(())
    }
}

fn build_app() -> anyhow::Result<App> {
    let mut app = App::new(AppConfig::from_env());

    app.add_function_route("/about", |_req, res, _params| {
        res.set_text("Welcome to About page. Enjoy coding.");
        Ok(())
    })?;

    app.add_function_route("/hello/{name}", |_req, res, params| {
        let name = params.get("name").unwrap_or_default();
        res.set_text(format!("Hello {name}! Welcome to Greeting page."));
        Ok(())
    })?;

    app.add_resource_route(
        "/books",
        ResourceHandler::new(Book::default)
            .get(Book::get)
            .post(Book::post),
    )?;

    app.add_function_route("/new-handler", |_req, res, _params| {
        res.set_text("Hello from new handler. Enjoy coding.");
        Ok(())
    })?;

    let templates = app.templates();
    app.add_function_route("/home", move |_req, res, _params| {
        let page = templates.render(
            "home.html",
            json!({"title": "Home page", "body": "Hello from home page", "name": "Bekzod"}),
        )?;
        res.set_html(page);
        Ok(())
    })?;

    app.add_function_route("/exception", |_req, _res, _params| {
        anyhow::bail!("the exception page always fails")
    })?;

    app.add_function_route("/json-page", |_req, res, _params| {
        res.set_json(&json!({"name": "Falon", "info": "Falan ibn fulan"}))?;
        Ok(())
    })?;

    app.set_exception_handler(|_req, res| {
        res.status_code = 500;
        res.set_text("Something wrong happened.");
    });

    app.add_middleware(Arc::new(LoggingMiddleware));
    app.add_middleware(Arc::new(TracingMiddleware));

    Ok(app)
}

fn main() -> anyhow::Result<()> {
    let _logging = init_logging("info")?;

    let mut app = build_app()?;
    let metrics = Arc::new(MetricsMiddleware::new());
    let layer: Arc<MetricsMiddleware> = Arc::clone(&metrics);
    app.add_middleware(layer);
    app.router().dump_routes();

    let service = app.into_service();

    let requests = [
        (Method::GET, "/about"),
        (Method::GET, "/hello/Aziz"),
        (Method::GET, "/books"),
        (Method::POST, "/books"),
        (Method::DELETE, "/books"),
        (Method::GET, "/new-handler"),
        (Method::GET, "/home"),
        (Method::GET, "/exception"),
        (Method::GET, "/json-page"),
        (Method::GET, "/static/main.css"),
        (Method::GET, "/does/not/exist"),
    ];

    for (method, path) in requests {
        let res = service.handle(Request::new(method.clone(), path));
        println!(
            "{} {} -> {} {}",
            method,
            path,
            res.status_code,
            res.text().lines().next().unwrap_or_default()
        );
    }

    info!(
        requests = metrics.request_count(),
        server_errors = metrics.server_errors(),
        average_latency_us = metrics.average_latency().as_micros(),
        "Demo finished"
    );
    Ok(())
}
