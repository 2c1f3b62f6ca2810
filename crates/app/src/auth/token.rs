//! Session token formatting, parsing and hashing.

use std::{fmt, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::auth::SessionUuid;

/// Session token prefix.
pub const SESSION_TOKEN_PREFIX: &str = "fs";

/// Number of secret bytes encoded in a token.
pub const SESSION_SECRET_BYTES: usize = 32;

const SESSION_SECRET_HEX_CHARS: usize = SESSION_SECRET_BYTES * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTokenVersion {
    V1,
}

impl SessionTokenVersion {
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl FromStr for SessionTokenVersion {
    type Err = SessionTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(SessionTokenError::UnsupportedVersion),
        }
    }
}

#[derive(Clone)]
pub struct SessionSecret {
    bytes: [u8; SESSION_SECRET_BYTES],
}

impl SessionSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SESSION_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SESSION_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(**redacted**)")
    }
}

impl Drop for SessionSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// The identifying parts of a bearer token. The secret itself is only ever
/// checked through [`hash_session_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedSessionToken {
    pub session_uuid: SessionUuid,
    pub version: SessionTokenVersion,
}

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("session token format is invalid")]
    InvalidFormat,

    #[error("session token uses an unsupported version")]
    UnsupportedVersion,

    #[error("session token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_session_secret() -> SessionSecret {
    let mut secret = [0_u8; SESSION_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    SessionSecret::from_bytes(secret)
}

/// `fs_v1_{uuid}_{secret}` with the uuid in simple form and the secret as
/// lowercase hex.
#[must_use]
pub fn format_session_token(
    session_uuid: SessionUuid,
    version: SessionTokenVersion,
    secret: &SessionSecret,
) -> String {
    format!(
        "{SESSION_TOKEN_PREFIX}_{}_{}_{}",
        version.segment(),
        session_uuid.into_uuid().simple(),
        encode_hex(secret.as_bytes())
    )
}

/// Split a bearer token into its session id and version.
///
/// # Errors
///
/// Returns an error if the token is not `fs_v1_<uuid>_<64 hex>`.
pub fn parse_session_token(token: &str) -> Result<ParsedSessionToken, SessionTokenError> {
    let mut parts = token.splitn(4, '_');

    let prefix = parts.next().ok_or(SessionTokenError::InvalidFormat)?;
    let version_segment = parts.next().ok_or(SessionTokenError::InvalidFormat)?;
    let uuid_segment = parts.next().ok_or(SessionTokenError::InvalidFormat)?;
    let secret_hex = parts.next().ok_or(SessionTokenError::InvalidFormat)?;

    if prefix != SESSION_TOKEN_PREFIX {
        return Err(SessionTokenError::InvalidFormat);
    }

    let version = SessionTokenVersion::from_str(version_segment)?;

    let session_uuid = Uuid::try_parse(uuid_segment)
        .map(SessionUuid::from_uuid)
        .map_err(|_| SessionTokenError::InvalidFormat)?;

    let well_formed = secret_hex.len() == SESSION_SECRET_HEX_CHARS
        && secret_hex
            .bytes()
            .all(|byte| matches!(byte, b'0'..=b'9' | b'a'..=b'f'));

    if !well_formed {
        return Err(SessionTokenError::InvalidSecretEncoding);
    }

    Ok(ParsedSessionToken {
        session_uuid,
        version,
    })
}

/// Lowercase hex SHA-256 of the full token; this is what sessions store.
#[must_use]
pub fn hash_session_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_and_format_round_trip() -> TestResult {
        let session_uuid = SessionUuid::from_uuid(Uuid::nil());
        let secret = SessionSecret::from_bytes([0xAB; SESSION_SECRET_BYTES]);
        let token = format_session_token(session_uuid, SessionTokenVersion::V1, &secret);

        assert!(token.starts_with("fs_v1_00000000000000000000000000000000_abab"));

        let parsed = parse_session_token(&token)?;

        assert_eq!(parsed.session_uuid, session_uuid);
        assert_eq!(parsed.version, SessionTokenVersion::V1);

        Ok(())
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        let nil = Uuid::nil().simple().to_string();
        let secret = "ab".repeat(SESSION_SECRET_BYTES);

        assert!(matches!(
            parse_session_token(&format!("lt_v1_{nil}_{secret}")),
            Err(SessionTokenError::InvalidFormat)
        ));
        assert!(matches!(
            parse_session_token(&format!("fs_v2_{nil}_{secret}")),
            Err(SessionTokenError::UnsupportedVersion)
        ));
        assert!(matches!(
            parse_session_token(&format!("fs_v1_{nil}_{}", "AB".repeat(SESSION_SECRET_BYTES))),
            Err(SessionTokenError::InvalidSecretEncoding)
        ));
        assert!(matches!(
            parse_session_token(&format!("fs_v1_{nil}")),
            Err(SessionTokenError::InvalidFormat)
        ));
    }

    #[test]
    fn hashes_are_hex_sha256() {
        assert_eq!(
            hash_session_token(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn generated_secrets_differ() {
        let a = generate_session_secret();
        let b = generate_session_secret();

        assert_ne!(a.as_bytes(), b.as_bytes());
        assert_eq!(format!("{a:?}"), "SessionSecret(**redacted**)");
    }
}
