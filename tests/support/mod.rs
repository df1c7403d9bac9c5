//! In-process stand-in for the inference service.
//!
//! A real `tiny_http` server on `127.0.0.1:0` answers each request from a
//! handler closure and records what it received.
#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use fuelwatch::service::client::HttpInferenceClient;
use tiny_http::{Header, Response, Server};

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
}

type Handler = dyn Fn(&Recorded) -> (u16, String) + Send + Sync;

pub struct MockService {
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockService {
    /// Serve every request through `handler`, which returns status and body.
    pub fn start(handler: impl Fn(&Recorded) -> (u16, String) + Send + Sync + 'static) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind mock server"));
        let addr = server
            .server_addr()
            .to_ip()
            .expect("mock server has an IP address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let handle = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            thread::spawn(move || {
                for mut request in server.incoming_requests() {
                    let mut body = String::new();
                    let _ = request.as_reader().read_to_string(&mut body);
                    let recorded = Recorded {
                        method: request.method().to_string(),
                        path: request.url().to_string(),
                        body,
                    };
                    requests.lock().unwrap().push(recorded.clone());

                    let (status, body) = handler(&recorded);
                    let response = Response::from_string(body)
                        .with_status_code(status)
                        .with_header(
                            Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                                .unwrap(),
                        );
                    let _ = request.respond(response);
                }
            })
        };

        Self {
            server,
            handle: Some(handle),
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Answer `path` with a fixed status and body; anything else is a 404.
    pub fn routes(routes: Vec<(&'static str, u16, String)>) -> Self {
        Self::start(move |req| {
            routes
                .iter()
                .find(|(path, _, _)| *path == req.path)
                .map(|(_, status, body)| (*status, body.clone()))
                .unwrap_or((404, r#"{"detail": "Not Found"}"#.to_string()))
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> HttpInferenceClient {
        HttpInferenceClient::new(&self.base_url, Duration::from_secs(2), Duration::from_secs(2))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

impl Drop for MockService {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Base URL of a port nothing listens on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let port = listener.local_addr().expect("probe port address").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// A healthy `/predict` body for an efficient result.
pub fn efficient_body() -> String {
    serde_json::json!({
        "prediction": 1,
        "probability": 0.18,
        "probability_percentage": "18.0%",
        "confidence": 0.82,
        "feature_importance": {
            "Score del conductor": 0.31,
            "Score del vehiculo": 0.22,
            "Estacion": 0.05
        },
        "scores": {
            "conductor_score": 0.87,
            "vehiculo_score": 0.74,
            "rend_cond_mean": 3.4,
            "rend_veh_mean": 3.1
        },
        "result_text": "EFICIENTE",
        "result_description": "El sistema predice un buen rendimiento de combustible"
    })
    .to_string()
}

/// The default catalog's first value for every field.
pub fn full_form() -> fuelwatch::form::FormSelection {
    let catalog = fuelwatch::catalog::DomainCatalog::default_catalog();
    let mut form = fuelwatch::form::FormSelection::new();
    for field in fuelwatch::form::Field::ALL {
        form.set_field(field, catalog.values(field)[0].clone());
    }
    form
}
