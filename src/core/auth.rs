//! OAuth2 client-credentials token exchange against the Microsoft identity platform.

use crate::core::transport::{HttpRequest, HttpTransport};
use crate::domain::config::{Credentials, ListerSettings};
use crate::domain::error::{ListerError, ListerResult};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Bearer token acquired once per run; never refreshed
#[derive(Debug, Clone)]
pub struct AccessToken {
    secret: SecretString,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(token.into()),
        }
    }

    pub fn bearer(&self) -> &str {
        self.secret.expose_secret()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<Seconds>,
}

/// v1 endpoints send `expires_in` as a string, v2 as a number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Seconds {
    Number(u64),
    Text(String),
}

impl Seconds {
    fn as_duration(&self) -> Option<Duration> {
        match self {
            Seconds::Number(n) => Some(Duration::from_secs(*n)),
            Seconds::Text(s) => s.trim().parse().ok().map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

pub fn token_endpoint(settings: &ListerSettings, tenant_id: &str) -> String {
    format!(
        "{}/{}/oauth2/v2.0/token",
        settings.authority_host.trim_end_matches('/'),
        tenant_id
    )
}

/// Exchange the application credentials for an access token
pub async fn acquire_token(
    transport: &dyn HttpTransport,
    settings: &ListerSettings,
    credentials: &Credentials,
) -> ListerResult<AccessToken> {
    let endpoint = token_endpoint(settings, &credentials.tenant_id);
    debug!("Requesting token from {}", endpoint);

    let request = HttpRequest::post_form(
        endpoint.as_str(),
        &[
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.expose_secret().as_str()),
            ("grant_type", "client_credentials"),
            ("scope", settings.scope.as_str()),
        ],
    );

    let response = transport
        .send(request)
        .await
        .map_err(|e| ListerError::auth(format!("token request failed: {}", e)))?;

    if !response.is_success() {
        return Err(ListerError::auth(describe_failure(
            response.status,
            &response.body,
        )));
    }

    let parsed: TokenResponse = serde_json::from_str(&response.body)
        .map_err(|e| ListerError::auth(format!("invalid token response: {}", e)))?;

    let token = parsed
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ListerError::auth("token response has no access_token"))?;

    match parsed.expires_in.as_ref().and_then(Seconds::as_duration) {
        Some(lifetime) => info!("Acquired access token (expires in {}s)", lifetime.as_secs()),
        None => info!("Acquired access token"),
    }

    Ok(AccessToken::new(token))
}

fn describe_failure(status: u16, body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(TokenErrorResponse {
            error: Some(error),
            error_description,
        }) => match error_description {
            Some(description) => format!(
                "token endpoint returned HTTP {}: {}: {}",
                status,
                error,
                description.lines().next().unwrap_or_default()
            ),
            None => format!("token endpoint returned HTTP {}: {}", status, error),
        },
        _ => format!("token endpoint returned HTTP {}", status),
    }
}
