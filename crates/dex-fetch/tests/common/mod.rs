// crates/dex-fetch/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Local HTTP servers and upstream payload builders.
// Purpose: Exercise the HTTP client without external network access.
// Dependencies: tiny_http, serde_json
// ============================================================================

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::thread::JoinHandle;

use dex_fetch::HttpCatalogClient;
use dex_fetch::HttpCatalogConfig;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// One canned HTTP reply.
pub struct Reply {
    /// Status code.
    pub status: u16,
    /// Body bytes.
    pub body: Vec<u8>,
    /// Optional `Location` header.
    pub location: Option<String>,
}

impl Reply {
    /// Successful reply with `body`.
    #[must_use]
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            body,
            location: None,
        }
    }

    /// Reply with `status` and a short text body.
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: b"error".to_vec(),
            location: None,
        }
    }

    /// Redirect reply pointing at `location`.
    #[must_use]
    pub fn redirect(location: String) -> Self {
        Self {
            status: 302,
            body: Vec::new(),
            location: Some(location),
        }
    }
}

/// Starts a server that answers `replies` in order, then stops.
///
/// Returns the base URL and a handle yielding the requested paths.
pub fn spawn_server(replies: Vec<Reply>) -> (String, JoinHandle<Vec<String>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let base = format!("http://{}", server.server_addr());
    let handle = thread::spawn(move || {
        let mut paths = Vec::new();
        for reply in replies {
            let Ok(request) = server.recv() else {
                break;
            };
            paths.push(request.url().to_string());
            let mut response = Response::from_data(reply.body).with_status_code(reply.status);
            if let Some(location) = reply.location {
                response =
                    response.with_header(Header::from_bytes("Location", location).unwrap());
            }
            let _ = request.respond(response);
        }
        paths
    });
    (base, handle)
}

/// Builds a cleartext client rooted at `{base}/creature`.
#[must_use]
pub fn local_client(base: &str) -> HttpCatalogClient {
    local_client_with(base, HttpCatalogConfig::default())
}

/// Builds a cleartext client rooted at `{base}/creature` from `config`.
#[must_use]
pub fn local_client_with(base: &str, config: HttpCatalogConfig) -> HttpCatalogClient {
    HttpCatalogClient::new(HttpCatalogConfig {
        base_url: format!("{base}/creature"),
        allow_http: true,
        timeout_ms: 2_000,
        ..config
    })
    .unwrap()
}

/// Builds an upstream record payload.
#[must_use]
pub fn record_json(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "types": [
            {"slot": 1, "type": {"name": "normal"}},
            {"slot": 2, "type": {"name": "flying"}}
        ],
        "stats": [
            {"base_stat": 40}, {"base_stat": 45}, {"base_stat": 40},
            {"base_stat": 35}, {"base_stat": 35}, {"base_stat": 56}
        ],
        "sprites": {
            "front_default": format!("https://img.example/{id}.png"),
            "front_shiny": format!("https://img.example/shiny/{id}.png")
        }
    })
}

/// Serializes a payload to bytes.
#[must_use]
pub fn body(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap()
}
