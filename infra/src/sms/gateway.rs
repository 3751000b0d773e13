//! HTTP SMS gateway client.
//!
//! Speaks the JSON API of the upstream SMS provider. Provider error codes
//! are mapped to the core dispatch taxonomy here and logged server-side;
//! they never travel to clients.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use ec_core::services::auth::mask_phone;
use ec_core::services::sms::{SmsDispatchError, SmsDispatcher};

use crate::InfrastructureError;

// Provider result codes, per the gateway API documentation.
const PROVIDER_OK: i64 = 0;
const PROVIDER_SENSITIVE_CONTENT: i64 = 1301;
const PROVIDER_DAILY_LIMIT: i64 = 1302;
const PROVIDER_THROTTLED: i64 = 1303;
const PROVIDER_AUTH_FAILURE: i64 = 1401;

/// SMS gateway configuration.
#[derive(Debug, Clone)]
pub struct SmsGatewayConfig {
    /// Gateway endpoint URL
    pub url: String,
    /// API key for the gateway
    pub api_key: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl SmsGatewayConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let url = std::env::var("SMS_GATEWAY_URL")
            .map_err(|_| InfrastructureError::Config("SMS_GATEWAY_URL not set".to_string()))?;
        let api_key = std::env::var("SMS_GATEWAY_KEY")
            .map_err(|_| InfrastructureError::Config("SMS_GATEWAY_KEY not set".to_string()))?;

        Ok(Self {
            url,
            api_key,
            request_timeout_secs: std::env::var("SMS_GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    code: i64,
    #[serde(default)]
    message: String,
}

/// SMS gateway client.
pub struct SmsGateway {
    client: reqwest::Client,
    config: SmsGatewayConfig,
}

impl SmsGateway {
    /// Create a new gateway client with an explicit request timeout.
    pub fn new(config: SmsGatewayConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| InfrastructureError::Http(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(SmsGatewayConfig::from_env()?)
    }
}

#[async_trait]
impl SmsDispatcher for SmsGateway {
    async fn send_code(&self, phone: &str, code: &str) -> Result<(), SmsDispatchError> {
        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "phone": phone,
                "code": code,
            }))
            .send()
            .await
            .map_err(|e| {
                error!(phone = %mask_phone(phone), error = %e, "SMS gateway unreachable");
                SmsDispatchError::Unavailable {
                    detail: e.to_string(),
                }
            })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SmsDispatchError::Throttled);
        }
        if !response.status().is_success() {
            return Err(SmsDispatchError::Unavailable {
                detail: format!("gateway returned {}", response.status()),
            });
        }

        let body: GatewayResponse = response.json().await.map_err(|e| {
            SmsDispatchError::Unavailable {
                detail: format!("malformed gateway response: {}", e),
            }
        })?;

        match map_provider_code(body.code, &body.message) {
            Ok(()) => {
                debug!(phone = %mask_phone(phone), "SMS accepted by gateway");
                Ok(())
            }
            Err(e) => {
                error!(
                    phone = %mask_phone(phone),
                    provider_code = body.code,
                    provider_message = %body.message,
                    "SMS gateway rejected message"
                );
                Err(e)
            }
        }
    }
}

/// Map a provider result code into the core dispatch taxonomy.
fn map_provider_code(code: i64, message: &str) -> Result<(), SmsDispatchError> {
    match code {
        PROVIDER_OK => Ok(()),
        PROVIDER_SENSITIVE_CONTENT => Err(SmsDispatchError::Rejected {
            reason: "content rejected by carrier filter".to_string(),
        }),
        PROVIDER_DAILY_LIMIT | PROVIDER_THROTTLED => Err(SmsDispatchError::Throttled),
        PROVIDER_AUTH_FAILURE => Err(SmsDispatchError::Unavailable {
            detail: "gateway authentication failure".to_string(),
        }),
        other => Err(SmsDispatchError::Unavailable {
            detail: format!("provider code {}: {}", other, message),
        }),
    }
}
