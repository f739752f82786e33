//! Token acquisition.
//!
//! Credential lookup order:
//! 1. `GITHUB_TOKEN` environment variable
//! 2. Token cached from a previous device-flow authorization
//! 3. OAuth device flow (requires `GITHUB_CLIENT_ID`)
//!
//! If none of these yields a token the error is fatal: the server must not
//! start serving requests without a credential.

use std::time::{Duration, Instant};

use ghp_core::{Config, Error, Result};
use serde::Deserialize;
use tracing::warn;

use crate::client::USER_AGENT;

/// Environment variable holding a ready-made token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable holding the OAuth app client ID for the device flow.
pub const CLIENT_ID_ENV: &str = "GITHUB_CLIENT_ID";

const DEVICE_CODE_URL: &str = "https://github.com/login/device/code";
const ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const DEVICE_SCOPES: &str = "repo read:org project";
const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Obtain a GitHub token, running the device flow if nothing is cached.
pub async fn github_token() -> Result<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    match Config::load() {
        Ok(config) => {
            if let Some(token) = config.token {
                return Ok(token);
            }
        }
        Err(e) => warn!("Ignoring unreadable config: {}", e),
    }

    let client_id = std::env::var(CLIENT_ID_ENV).map_err(|_| {
        Error::Auth(format!(
            "No GitHub token found. Set {} or {} to authenticate.",
            TOKEN_ENV, CLIENT_ID_ENV
        ))
    })?;

    let token = device_flow(&client_id, DEVICE_CODE_URL, ACCESS_TOKEN_URL).await?;

    // A failed save only costs a re-authorization next time
    let config = Config {
        token: Some(token.clone()),
    };
    if let Err(e) = config.save() {
        warn!("Could not cache token: {}", e);
    }

    Ok(token)
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_uri: String,
    expires_in: u64,
    #[serde(default = "default_interval")]
    interval: u64,
}

fn default_interval() -> u64 {
    5
}

#[derive(Debug, Default, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Run the OAuth device flow against the given endpoints.
async fn device_flow(client_id: &str, device_url: &str, token_url: &str) -> Result<String> {
    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Http(e.to_string()))?;

    let grant: DeviceCodeResponse = http
        .post(device_url)
        .header("Accept", "application/json")
        .form(&[("client_id", client_id), ("scope", DEVICE_SCOPES)])
        .send()
        .await
        .map_err(|e| Error::Http(e.to_string()))?
        .json()
        .await
        .map_err(|e| Error::Auth(format!("Malformed device code response: {}", e)))?;

    // Instructions go to stderr; stdout belongs to the MCP transport
    eprintln!("GitHub authentication required.");
    eprintln!("1. Open: {}", grant.verification_uri);
    eprintln!("2. Enter code: {}", grant.user_code);
    eprintln!("Waiting for authorization...");

    let deadline = Instant::now() + Duration::from_secs(grant.expires_in);
    let mut interval = grant.interval;

    loop {
        tokio::time::sleep(Duration::from_secs(interval)).await;

        if Instant::now() >= deadline {
            return Err(Error::Auth(
                "Device code expired before authorization completed".to_string(),
            ));
        }

        let poll: AccessTokenResponse = http
            .post(token_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", client_id),
                ("device_code", grant.device_code.as_str()),
                ("grant_type", DEVICE_GRANT_TYPE),
            ])
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?
            .json()
            .await
            .map_err(|e| Error::Auth(format!("Malformed access token response: {}", e)))?;

        if let Some(token) = poll.access_token {
            eprintln!("Authentication successful.");
            return Ok(token);
        }

        match poll.error.as_deref() {
            Some("authorization_pending") => continue,
            Some("slow_down") => interval += 5,
            Some(code) => {
                let detail = poll.error_description.unwrap_or_else(|| code.to_string());
                return Err(Error::Auth(format!("Device authorization failed: {}", detail)));
            }
            None => {
                return Err(Error::Auth(
                    "Device authorization returned neither a token nor an error".to_string(),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_device_flow_success() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/device/code");
            then.status(200).json_body(serde_json::json!({
                "device_code": "dc123",
                "user_code": "ABCD-1234",
                "verification_uri": "https://github.test/login/device",
                "expires_in": 900,
                "interval": 0
            }));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/access_token")
                .body_includes("device_code=dc123");
            then.status(200)
                .json_body(serde_json::json!({ "access_token": "gho_new" }));
        });

        let token = device_flow(
            "client123",
            &server.url("/device/code"),
            &server.url("/access_token"),
        )
        .await
        .unwrap();

        assert_eq!(token, "gho_new");
    }

    #[tokio::test]
    async fn test_device_flow_denied() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/device/code");
            then.status(200).json_body(serde_json::json!({
                "device_code": "dc123",
                "user_code": "ABCD-1234",
                "verification_uri": "https://github.test/login/device",
                "expires_in": 900,
                "interval": 0
            }));
        });
        server.mock(|when, then| {
            when.method(POST).path("/access_token");
            then.status(200).json_body(serde_json::json!({
                "error": "access_denied",
                "error_description": "The user denied the request"
            }));
        });

        let err = device_flow(
            "client123",
            &server.url("/device/code"),
            &server.url("/access_token"),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("denied"));
    }

    #[tokio::test]
    async fn test_device_flow_expired_code() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/device/code");
            then.status(200).json_body(serde_json::json!({
                "device_code": "dc123",
                "user_code": "ABCD-1234",
                "verification_uri": "https://github.test/login/device",
                "expires_in": 0,
                "interval": 0
            }));
        });

        let err = device_flow(
            "client123",
            &server.url("/device/code"),
            &server.url("/access_token"),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("expired"));
    }
}
