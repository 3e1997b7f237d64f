//! Payload decoding: base64 envelope content to a [`VerifyCode`].

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::{CodeError, CodeResult};
use crate::models::VerifyCode;

/// Decode base64 file content as returned by the contents APIs.
///
/// GitHub wraps the content at 60 columns, so ASCII whitespace is removed first.
pub fn decode_base64_content(content: &str) -> CodeResult<Vec<u8>> {
    let compact: String = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    BASE64
        .decode(compact.as_bytes())
        .map_err(|e| CodeError::Decode(format!("base64: {}", e)))
}

/// Parse a decoded payload into a [`VerifyCode`].
///
/// Both `date` and `verifyCode` must be present as strings. No freshness or
/// format check is done here.
pub fn decode(bytes: &[u8]) -> CodeResult<VerifyCode> {
    serde_json::from_slice::<VerifyCode>(bytes)
        .map_err(|e| CodeError::Decode(format!("payload: {}", e)))
}
