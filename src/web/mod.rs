//! Embedded web dashboard for fuelwatch.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page prediction form with result panel
//! - JSON API endpoints for health, options, predict, model info and the
//!   external view URL
//! - The topological map page, when `dashboard.map_path` is set
//!
//! Launched via `fuelwatch serve` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::FuelwatchConfig;
use crate::service::InferenceService;
use crate::service::client::HttpInferenceClient;
use crate::session::Session;
use crate::view;

pub use api::ApiReply;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard on `addr` against the configured inference service.
///
/// Blocks the current thread. Requests are handled one at a time by a single
/// session, so the dashboard behaves like one user's open page.
pub fn serve(config: FuelwatchConfig, addr: &str) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    let client = HttpInferenceClient::from_config(&config.service);
    println!("Inference service: {}", client.base_url());
    let mut session = Session::start(client, config);
    println!("Service status: {}", session.health());

    println!("fuelwatch dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    let _ = view::open_in_browser(&format!("http://{addr}"));

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let response = dispatch(&mut session, &method, &url, body.as_deref());
        let _ = request.respond(response);

        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    session.end();
    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch<S: InferenceService>(
    session: &mut Session<S>,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Response<Cursor<Vec<u8>>> {
    let path = url.split('?').next().unwrap_or(url);
    let body = body.unwrap_or("");

    let reply = match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => return serve_frontend(),
        (&Method::Get, "/map") => return serve_map(&session.config().dashboard.map_path),

        (&Method::Get, "/api/health") => api::get_health(session),
        (&Method::Get, "/api/options") => api::get_options(session),
        (&Method::Post, "/api/predict") => api::post_predict(session, body),
        (&Method::Get, "/api/model-info") => api::get_model_info(session),
        (&Method::Post, "/api/view-url") => api::post_view_url(session, body),

        _ => ApiReply::error(404, "not found"),
    };

    json_response(&reply)
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn json_response(reply: &ApiReply) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(reply.body.to_string().into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(reply.status))
}

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    html_response(frontend::INDEX_HTML.as_bytes().to_vec())
}

/// Serve the configured topological map file.
fn serve_map(map_path: &str) -> Response<Cursor<Vec<u8>>> {
    if map_path.is_empty() {
        return json_response(&ApiReply::error(404, "no topological map configured"));
    }
    match std::fs::read(Path::new(map_path)) {
        Ok(bytes) => html_response(bytes),
        Err(e) => json_response(&ApiReply::error(
            404,
            &format!("topological map unavailable: {e}"),
        )),
    }
}

fn html_response(bytes: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(bytes)
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// JSON content type header.
fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}
