// src/storage/sigv4.rs
//! AWS Signature Version 4 for single-shot S3 requests.
//!
//! Only what an unsigned-query `PUT` needs: no query string canonicalization
//! and no chunked payload signing.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Credentials and scope for one service endpoint.
pub struct SigV4Signer<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub region: &'a str,
    pub service: &'a str,
}

/// The request parts covered by the signature.
pub struct CanonicalRequest<'a> {
    pub method: &'a str,
    pub host: &'a str,
    /// Already percent-encoded path, starting with `/`.
    pub path: &'a str,
    pub content_type: &'a str,
    pub payload: &'a [u8],
}

/// Headers to attach to the signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub amz_date: String,
    pub content_sha256: String,
    pub authorization: String,
}

impl SigV4Signer<'_> {
    pub fn sign(
        &self,
        request: &CanonicalRequest<'_>,
        at: DateTime<Utc>,
    ) -> Result<SignedHeaders, AppError> {
        let amz_date = at.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = at.format("%Y%m%d").to_string();
        let payload_hash = sha256_hex(request.payload);

        let signed_header_names = "content-type;host;x-amz-content-sha256;x-amz-date";
        let canonical_headers = format!(
            "content-type:{}\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            request.content_type.trim(),
            request.host.trim(),
            payload_hash,
            amz_date
        );
        let canonical_request = format!(
            "{}\n{}\n\n{}\n{}\n{}",
            request.method, request.path, canonical_headers, signed_header_names, payload_hash
        );

        let scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp, self.region, self.service
        );
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            sha256_hex(canonical_request.as_bytes())
        );

        let key = signing_key(self.secret_access_key, &date_stamp, self.region, self.service)?;
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

        Ok(SignedHeaders {
            amz_date,
            content_sha256: payload_hash,
            authorization: format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.access_key_id, scope, signed_header_names, signature
            ),
        })
    }
}

/// Derives the per-day, per-region, per-service signing key.
pub fn signing_key(
    secret: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, AppError> {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date_stamp.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| AppError::InternalError {
        message: format!("HMAC key rejected: {}", e),
        source: None,
    })?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Percent-encodes an object key for use in a canonical path, keeping `/`.
pub fn encode_path(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            other => encoded.push_str(&format!("%{:02X}", other)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn signing_key_matches_published_vector() {
        let key = signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        )
        .unwrap();
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn empty_payload_hash() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn path_encoding_keeps_slashes() {
        assert_eq!(encode_path("audio/my file.mp3"), "audio/my%20file.mp3");
        assert_eq!(encode_path("a/é"), "a/%C3%A9");
    }

    #[test]
    fn authorization_header_layout() {
        let signer = SigV4Signer {
            access_key_id: "AKIDEXAMPLE",
            secret_access_key: "secret",
            region: "auto",
            service: "s3",
        };
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let headers = signer
            .sign(
                &CanonicalRequest {
                    method: "PUT",
                    host: "acct.r2.cloudflarestorage.com",
                    path: "/bucket/audio/x.mp3",
                    content_type: "audio/mpeg",
                    payload: b"abc",
                },
                at,
            )
            .unwrap();

        assert_eq!(headers.amz_date, "20240301T123000Z");
        assert_eq!(headers.content_sha256, sha256_hex(b"abc"));
        assert!(headers.authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240301/auto/s3/aws4_request, \
             SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date, Signature="
        ));
        let signature = headers.authorization.rsplit('=').next().unwrap();
        assert_eq!(signature.len(), 64);

        // Same inputs, same signature.
        let again = signer
            .sign(
                &CanonicalRequest {
                    method: "PUT",
                    host: "acct.r2.cloudflarestorage.com",
                    path: "/bucket/audio/x.mp3",
                    content_type: "audio/mpeg",
                    payload: b"abc",
                },
                at,
            )
            .unwrap();
        assert_eq!(headers, again);
    }
}
