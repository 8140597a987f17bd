// Shared fixtures: a scripted HttpTransport standing in for Entra ID and Graph
#![allow(dead_code)]

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{json, Value};
use splist::{Credentials, HttpRequest, HttpResponse, HttpTransport, ListerConfig, ListerSettings, TransportError};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const GRAPH: &str = "https://graph.test/v1.0";
pub const AUTHORITY: &str = "https://login.test";
pub const SITE_URL: &str = "https://t.sharepoint.com/sites/s";
pub const LIBRARY_URL: &str = "https://t.sharepoint.com/sites/s/Shared%20Documents";

type Handler = Box<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

/// Answers every request through a closure and records the URLs it saw
pub struct ScriptedTransport {
    handler: Handler,
    log: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            log: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn count_matching(&self, needle: &str) -> usize {
        self.calls().iter().filter(|url| url.contains(needle)).count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.log.lock().unwrap().push(request.url.clone());
        Ok((self.handler)(&request))
    }
}

pub fn settings() -> ListerSettings {
    ListerSettings {
        authority_host: AUTHORITY.to_string(),
        graph_endpoint: GRAPH.to_string(),
        ..ListerSettings::default()
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        tenant_id: "tenant".to_string(),
        client_id: "client".to_string(),
        client_secret: SecretString::new("secret".to_string()),
    }
}

pub fn config(output: &Path) -> ListerConfig {
    ListerConfig::new(SITE_URL, credentials()).with_output(output)
}

pub fn ok(body: Value) -> HttpResponse {
    HttpResponse::new(200, body.to_string())
}

pub fn token_ok() -> HttpResponse {
    ok(json!({"token_type": "Bearer", "expires_in": 3599, "access_token": "abc"}))
}

pub fn site_ok() -> HttpResponse {
    ok(json!({"id": "t.sharepoint.com,site-guid,web-guid", "webUrl": SITE_URL}))
}

pub fn drives_ok() -> HttpResponse {
    ok(json!({"value": [
        {"id": "drive-assets", "name": "Site Assets", "webUrl": "https://t.sharepoint.com/sites/s/SiteAssets"},
        {"id": "drive-docs", "name": "Documents", "webUrl": LIBRARY_URL}
    ]}))
}

pub fn file(name: &str) -> Value {
    json!({"id": format!("id-{}", name), "name": name, "webUrl": format!("{}/{}", LIBRARY_URL, name)})
}

pub fn is_token(req: &HttpRequest) -> bool {
    req.url.contains("/oauth2/v2.0/token")
}

pub fn is_drives(req: &HttpRequest) -> bool {
    req.url.contains("/drives?")
}

pub fn is_children(req: &HttpRequest) -> bool {
    req.url.contains("/children")
}

pub fn is_site(req: &HttpRequest) -> bool {
    req.url.starts_with(&format!("{}/sites/", GRAPH)) && !is_drives(req)
}

/// Page index encoded in our fake nextLinks; the first request carries none
pub fn page_index(url: &str) -> usize {
    url.split("page=")
        .nth(1)
        .and_then(|rest| rest.split('&').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

pub fn children_page(pages: &[Vec<Value>], index: usize) -> HttpResponse {
    let mut body = json!({"value": pages[index]});
    if index + 1 < pages.len() {
        body["@odata.nextLink"] = Value::String(format!(
            "{}/drives/drive-docs/root/children?$top=200&page={}",
            GRAPH,
            index + 1
        ));
    }
    ok(body)
}

/// A well-behaved tenant whose library root holds `pages`
pub fn library_with_pages(pages: Vec<Vec<Value>>) -> Arc<ScriptedTransport> {
    ScriptedTransport::new(move |req| {
        if is_token(req) {
            token_ok()
        } else if is_children(req) {
            children_page(&pages, page_index(&req.url))
        } else if is_drives(req) {
            drives_ok()
        } else if is_site(req) {
            site_ok()
        } else {
            HttpResponse::new(500, format!("unexpected request {}", req.url))
        }
    })
}
