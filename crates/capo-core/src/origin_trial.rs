//! Origin-trial tokens
//!
//! Layout of a decoded token:
//!
//! ```text
//! offset  0      version (1 byte)
//! offset  1      signature (64 bytes)
//! offset 65      payload length (u32, big-endian)
//! offset 69      payload (UTF-8 JSON, `length` bytes)
//! ```
//!
//! The signature is not verified; the payload is read for diagnostics.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Offset of the big-endian payload length
pub const LENGTH_OFFSET: usize = 65;
/// Offset of the JSON payload
pub const PAYLOAD_OFFSET: usize = 69;

const SIGNATURE_LEN: usize = 64;
const UNSIGNED_VERSION: u8 = 3;

/// Standard alphabet, padding optional (browsers' `atob` is forgiving)
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a token could not be decoded
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token is {0} bytes, shorter than its {PAYLOAD_OFFSET}-byte header")]
    Truncated(usize),

    #[error("payload length {length} exceeds the {available} bytes available")]
    LengthOutOfRange { length: usize, available: usize },

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload origin `{0}` is not a URL")]
    Origin(String),

    #[error("expiry {0} is out of range")]
    Expiry(i64),
}

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginTrialPayload {
    pub origin: String,
    pub feature: String,
    pub expiry: DateTime<Utc>,
    pub is_subdomain: bool,
    pub is_third_party: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

/// JSON as it appears inside the token
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    origin: String,
    feature: String,
    expiry: i64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_subdomain: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_third_party: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    usage: Option<String>,
}

impl OriginTrialPayload {
    /// Parsed `origin` field; decoding guarantees it parses
    pub fn origin_url(&self) -> Option<Url> {
        Url::parse(&self.origin).ok()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry < now
    }
}

/// Decode a base64 token into its payload
pub fn decode(token: &str) -> Result<OriginTrialPayload, TokenError> {
    let compact: String = token.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = TOKEN_ENGINE.decode(compact.as_bytes())?;
    if bytes.len() < PAYLOAD_OFFSET {
        return Err(TokenError::Truncated(bytes.len()));
    }

    let mut length = [0u8; 4];
    length.copy_from_slice(&bytes[LENGTH_OFFSET..PAYLOAD_OFFSET]);
    let length = u32::from_be_bytes(length) as usize;
    let available = bytes.len() - PAYLOAD_OFFSET;
    if length > available {
        return Err(TokenError::LengthOutOfRange { length, available });
    }

    let raw: RawPayload = serde_json::from_slice(&bytes[PAYLOAD_OFFSET..PAYLOAD_OFFSET + length])?;
    if Url::parse(&raw.origin).is_err() {
        return Err(TokenError::Origin(raw.origin));
    }
    let expiry = DateTime::from_timestamp(raw.expiry, 0).ok_or(TokenError::Expiry(raw.expiry))?;

    Ok(OriginTrialPayload {
        origin: raw.origin,
        feature: raw.feature,
        expiry,
        is_subdomain: raw.is_subdomain,
        is_third_party: raw.is_third_party,
        usage: raw.usage,
    })
}

/// Encode a payload with a zeroed signature. Browsers reject these; they
/// exist for fixtures and tooling.
pub fn encode_unsigned(payload: &OriginTrialPayload) -> String {
    let raw = RawPayload {
        origin: payload.origin.clone(),
        feature: payload.feature.clone(),
        expiry: payload.expiry.timestamp(),
        is_subdomain: payload.is_subdomain,
        is_third_party: payload.is_third_party,
        usage: payload.usage.clone(),
    };
    // Serializing plain strings, integers and bools cannot fail
    let json = serde_json::to_vec(&raw).unwrap_or_default();

    let mut bytes = Vec::with_capacity(PAYLOAD_OFFSET + json.len());
    bytes.push(UNSIGNED_VERSION);
    bytes.extend_from_slice(&[0u8; SIGNATURE_LEN]);
    bytes.extend_from_slice(&(json.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&json);
    TOKEN_ENGINE.encode(bytes)
}
