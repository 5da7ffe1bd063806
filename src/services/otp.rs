use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the OTP service
#[derive(Debug, Error)]
pub enum OtpError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to send OTP: {0}")]
    Rejected(String),

    #[error("Invalid or expired OTP")]
    InvalidOtp,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    email: &'a str,
    #[serde(rename = "type")]
    otp_type: &'a str,
    organization: &'a str,
    subject: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    email: &'a str,
    otp: &'a str,
}

/// Client for the external one-time-password service
///
/// The service exposes `POST {base}/generate` to email a code and
/// `POST {base}/verify` to check it. Any 200 response counts as success.
pub struct OtpClient {
    base_url: String,
    organization: String,
    subject: String,
    otp_type: String,
    client: Client,
}

impl OtpClient {
    pub fn new(
        base_url: String,
        organization: String,
        subject: String,
        otp_type: String,
        timeout: Duration,
    ) -> Result<Self, OtpError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            organization,
            subject,
            otp_type,
            client,
        })
    }

    fn url(&self, action: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), action)
    }

    /// Ask the service to email a fresh code
    pub async fn generate(&self, email: &str) -> Result<(), OtpError> {
        let payload = GenerateRequest {
            email,
            otp_type: &self.otp_type,
            organization: &self.organization,
            subject: &self.subject,
        };

        let response = self
            .client
            .post(self.url("generate"))
            .json(&payload)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::warn!("OTP generation rejected for {}: {}", email, body);
            return Err(OtpError::Rejected(body));
        }

        tracing::debug!("OTP sent to {}", email);
        Ok(())
    }

    /// Check a code previously sent to `email`
    pub async fn verify(&self, email: &str, otp: &str) -> Result<(), OtpError> {
        let response = self
            .client
            .post(self.url("verify"))
            .json(&VerifyRequest { email, otp })
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            tracing::debug!("OTP verification failed for {}: {}", email, response.status());
            return Err(OtpError::InvalidOtp);
        }

        Ok(())
    }
}
