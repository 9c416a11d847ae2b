// API client module: a small blocking HTTP client that sends one recording
// to the prediction service and reads back the emotion it detected.
//
// A submission goes through two stages, each with its own outcome:
// transport (did we get a 2xx body?) then decode (is the body JSON?).
// The decoded JSON is then read leniently into a `PredictionResult`.

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::asset::UploadedAsset;
use crate::config::ClientConfig;
use crate::error::PredictError;

/// Label used when the service does not name an emotion.
pub const UNKNOWN_EMOTION: &str = "unknown";

/// What the service told us. Missing fields fall back to defaults, so any
/// JSON body produces a result.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub emotion: String,
    pub probabilities: Option<BTreeMap<String, f64>>,
}

impl PredictionResult {
    /// Read the known keys out of any JSON value. A non-string `emotion`
    /// becomes `unknown`; a `probabilities` value that is not a map of
    /// numbers is dropped.
    pub fn from_value(value: &Value) -> Self {
        let emotion = value
            .get("emotion")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_EMOTION)
            .to_string();
        let probabilities = value.get("probabilities").and_then(|p| {
            match serde_json::from_value::<BTreeMap<String, f64>>(p.clone()) {
                Ok(map) => Some(map),
                Err(e) => {
                    log::warn!("ignoring malformed probabilities: {}", e);
                    None
                }
            }
        });
        PredictionResult {
            emotion,
            probabilities,
        }
    }
}

/// Outcome of the transport stage: a successful status and its body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Decode stage: body text to a result. Anything that is not JSON is a
/// `Decode` failure carrying the body as-is.
pub fn decode_prediction(body: &str) -> Result<PredictionResult, PredictError> {
    let value: Value =
        serde_json::from_str(body).map_err(|_| PredictError::Decode(body.to_string()))?;
    Ok(PredictionResult::from_value(&value))
}

/// Anything that can turn an upload into a prediction. The session talks
/// to this rather than to HTTP directly.
pub trait Predictor {
    fn predict(&self, asset: &UploadedAsset) -> Result<PredictionResult, PredictError>;
}

/// Holds a reqwest blocking client and the endpoint configuration.
#[derive(Clone)]
pub struct PredictClient {
    client: Client,
    config: ClientConfig,
}

impl PredictClient {
    /// Build a client for `config`. Without a configured timeout the client
    /// waits indefinitely (reqwest's blocking default of 30 s is disabled).
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(PredictClient { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `asset` once and return the parsed prediction. Never retries.
    pub fn submit(&self, asset: &UploadedAsset) -> Result<PredictionResult, PredictError> {
        let raw = self.send(asset)?;
        log::debug!("response {} ({} bytes)", raw.status, raw.body.len());
        decode_prediction(&raw.body)
    }

    /// Transport stage: POST the multipart form and collect a 2xx body.
    /// Connection errors and non-2xx statuses become `Network` failures.
    pub fn send(&self, asset: &UploadedAsset) -> Result<RawResponse, PredictError> {
        let url = self.config.endpoint();
        let form = multipart::Form::new().part(self.config.field_name.clone(), file_part(asset));

        log::info!(
            "POST {} ({} bytes as field `{}`)",
            url,
            asset.len(),
            self.config.field_name
        );
        let res = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| network_failure(&url, e))?
            .error_for_status()
            .map_err(|e| network_failure(&url, e))?;

        let status = res.status();
        let body = res.text().map_err(|e| network_failure(&url, e))?;
        Ok(RawResponse { status, body })
    }
}

impl Predictor for PredictClient {
    fn predict(&self, asset: &UploadedAsset) -> Result<PredictionResult, PredictError> {
        self.submit(asset)
    }
}

/// The file as a multipart part, keeping its name and declared type. A
/// declared type reqwest cannot parse is left off rather than failing.
fn file_part(asset: &UploadedAsset) -> multipart::Part {
    let bare = || {
        multipart::Part::bytes(asset.bytes().to_vec()).file_name(asset.file_name().to_string())
    };
    bare().mime_str(asset.media_type()).unwrap_or_else(|e| {
        log::warn!("sending without content type ({}): {}", asset.media_type(), e);
        bare()
    })
}

fn network_failure(url: &str, err: reqwest::Error) -> PredictError {
    log::warn!("request to {} failed: {}", url, err);
    PredictError::Network(err.to_string())
}
