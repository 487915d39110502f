//! Response envelopes of the REST API and their decoding.
//!
//! Every JSON response carries `success`; failures add `error`. The payload
//! fields differ per endpoint, so a body is decoded twice: once as [`Status`]
//! and, when successful, once more as the endpoint's payload type.

use reqwest::StatusCode;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub(crate) struct Status {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListBody<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountBody {
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub data: Vec<IgnoredAny>,
}

impl CountBody {
    pub fn total(&self) -> usize {
        self.total.unwrap_or(self.data.len())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportBody {
    pub data: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImportRequest<'a> {
    pub csv_content: &'a str,
}

/// Decodes a JSON envelope, mapping `success: false` to [`ApiError::ApiFailure`].
pub(crate) fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> ApiResult<T> {
    let envelope: Status = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(err) if status.is_success() => {
            return Err(ApiError::NetworkFailure(format!("unreadable response: {err}")));
        }
        Err(_) => return Err(status_failure(status)),
    };

    if !envelope.success {
        return Err(ApiError::ApiFailure(
            envelope
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| status_failure(status).to_string()),
        ));
    }

    serde_json::from_slice(body)
        .map_err(|err| ApiError::NetworkFailure(format!("unreadable response: {err}")))
}

/// Failure for a non-success status whose body says nothing useful.
pub(crate) fn status_failure(status: StatusCode) -> ApiError {
    ApiError::ApiFailure(format!("server responded with {status}"))
}

/// Extracts the file name from a `Content-Disposition` header value.
///
/// Prefers the RFC 5987 `filename*=` form over plain `filename=`.
pub(crate) fn filename_from_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for part in value.split(';').map(str::trim) {
        let Some((key, raw)) = part.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename" => plain = Some(raw.trim().trim_matches('"').to_owned()),
            "filename*" => {
                // charset'language'percent-encoded
                let encoded = raw.trim().splitn(3, '\'').nth(2).unwrap_or(raw.trim());
                extended = Some(percent_decode(encoded));
            }
            _ => {}
        }
    }

    extended
        .or(plain)
        .and_then(|name| receitas_core::format::safe_file_name(&name))
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
