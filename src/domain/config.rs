use crate::domain::error::{ListerError, ListerResult};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

pub const TENANT_ID_VAR: &str = "TENANT_ID";
pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";

pub const DEFAULT_LIBRARY_NAME: &str = "Documents";
pub const DEFAULT_OUTPUT_PATH: &str = "sharepoint_files.json";

/// Application credentials for the client-credentials grant
#[derive(Debug, Clone)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: SecretString,
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env() -> ListerResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary variable lookup.
    ///
    /// Blank values count as missing; values are otherwise kept verbatim.
    /// All missing names are reported at once.
    pub fn from_lookup<F>(lookup: F) -> ListerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let tenant_id = read(TENANT_ID_VAR);
        let client_id = read(CLIENT_ID_VAR);
        let client_secret = read(CLIENT_SECRET_VAR);

        let missing: Vec<&str> = [
            (TENANT_ID_VAR, tenant_id.is_none()),
            (CLIENT_ID_VAR, client_id.is_none()),
            (CLIENT_SECRET_VAR, client_secret.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| *name)
        .collect();

        match (tenant_id, client_id, client_secret) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Ok(Self {
                tenant_id,
                client_id,
                client_secret: SecretString::new(client_secret),
            }),
            _ => Err(ListerError::config(format!(
                "missing required environment variable(s): {}",
                missing.join(", ")
            ))),
        }
    }

    fn validate(&self) -> ListerResult<()> {
        if self.tenant_id.trim().is_empty() {
            return Err(ListerError::config("tenant ID is empty"));
        }
        // Goes into the token endpoint path as a single segment.
        if !self
            .tenant_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(ListerError::config(format!(
                "tenant ID '{}' must be a GUID or domain name",
                self.tenant_id
            )));
        }
        if self.client_id.trim().is_empty() {
            return Err(ListerError::config("client ID is empty"));
        }
        if self.client_secret.expose_secret().trim().is_empty() {
            return Err(ListerError::config("client secret is empty"));
        }
        Ok(())
    }
}

/// Per-run configuration, built once at startup
#[derive(Debug, Clone)]
pub struct ListerConfig {
    /// SharePoint site URL, e.g. `https://contoso.sharepoint.com/sites/team`
    pub site_url: String,
    /// Display name of the document library
    pub library_name: String,
    /// Where the JSON document is written
    pub output: PathBuf,
    pub credentials: Credentials,
    /// Descend into folders
    pub recursive: bool,
    /// Pretty-print the output document
    pub pretty: bool,
}

impl ListerConfig {
    pub fn new(site_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            site_url: site_url.into(),
            library_name: DEFAULT_LIBRARY_NAME.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            credentials,
            recursive: false,
            pretty: true,
        }
    }

    pub fn with_library_name(mut self, name: impl Into<String>) -> Self {
        self.library_name = name.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Check every field and parse the site URL
    pub fn validate(&self) -> ListerResult<SiteLocation> {
        self.credentials.validate()?;
        if self.library_name.trim().is_empty() {
            return Err(ListerError::config("library name is empty"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ListerError::config("output path is empty"));
        }
        SiteLocation::parse(&self.site_url)
    }
}

/// A validated site URL split into the parts Graph addresses sites by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLocation {
    pub url: Url,
    pub host: String,
    /// Server-relative path without a trailing slash; empty for the root site
    pub path: String,
}

impl SiteLocation {
    pub fn parse(raw: &str) -> ListerResult<Self> {
        let url = Url::parse(raw.trim())
            .map_err(|e| ListerError::config(format!("invalid site URL '{}': {}", raw, e)))?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ListerError::config(format!(
                "site URL '{}' must use http or https",
                raw
            )));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ListerError::config(format!("site URL '{}' has no host", raw)))?
            .to_string();

        let path = url.path().trim_end_matches('/').to_string();

        Ok(Self { url, host, path })
    }

    /// Graph site address, `{host}:{path}` or just `{host}` for the root site
    pub fn graph_address(&self) -> String {
        if self.path.is_empty() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.path)
        }
    }
}

/// Endpoint and behaviour settings loaded from the settings file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListerSettings {
    /// Identity provider base URL
    #[serde(default = "default_authority_host")]
    pub authority_host: String,
    /// Graph API base URL including version
    #[serde(default = "default_graph_endpoint")]
    pub graph_endpoint: String,
    /// Scope requested in the token exchange
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Items requested per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_authority_host() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_graph_endpoint() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_scope() -> String {
    "https://graph.microsoft.com/.default".to_string()
}

fn default_page_size() -> u32 {
    200
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ListerSettings {
    fn default() -> Self {
        Self {
            authority_host: default_authority_host(),
            graph_endpoint: default_graph_endpoint(),
            scope: default_scope(),
            page_size: default_page_size(),
            log_level: default_log_level(),
        }
    }
}
