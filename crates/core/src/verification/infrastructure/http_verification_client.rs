use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;

use crate::capture::domain::verification_payload::VerificationPayload;
use crate::shared::constants::{ENROLL_PATH, VERIFY_PATH};
use crate::verification::domain::verify_error::VerifyError;

/// Blocking client for the remote face verification service.
///
/// One request per call. No retries and no timeout; callers that need
/// either wrap the call themselves.
pub struct VerificationClient {
    http: Client,
    base_url: String,
}

impl VerificationClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submits the payload to the verify endpoint and returns the JSON body
    /// unchanged.
    pub fn verify(&self, payload: &VerificationPayload) -> Result<Value, VerifyError> {
        let url = format!("{}{VERIFY_PATH}", self.base_url);
        log::info!("Submitting {} byte image for verification", payload.bytes.len());
        self.send(self.http.post(&url), &url, payload)
    }

    /// Registers the face for the account behind `bearer_token`.
    pub fn enroll(
        &self,
        payload: &VerificationPayload,
        bearer_token: &str,
    ) -> Result<Value, VerifyError> {
        let url = format!("{}{ENROLL_PATH}", self.base_url);
        log::info!("Enrolling {} byte image", payload.bytes.len());
        self.send(self.http.put(&url).bearer_auth(bearer_token), &url, payload)
    }

    fn send(
        &self,
        request: RequestBuilder,
        url: &str,
        payload: &VerificationPayload,
    ) -> Result<Value, VerifyError> {
        let form = multipart_form(payload).map_err(VerifyError::Form)?;
        let response = request
            .multipart(form)
            .send()
            .map_err(|source| VerifyError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("{url} answered with status {status}");
            return Err(VerifyError::HttpStatus {
                status: status.as_u16(),
            });
        }
        response.json::<Value>().map_err(VerifyError::Decode)
    }
}

fn multipart_form(payload: &VerificationPayload) -> Result<Form, reqwest::Error> {
    let part = Part::bytes(payload.bytes.clone())
        .file_name(payload.filename.clone())
        .mime_str(payload.mime)?;
    Ok(Form::new().part(payload.field_name, part))
}
