//! Cryptographic Utilities
//!
//! Hashing, HMAC, randomness, and the base64 alphabets used across the
//! credential and token code.

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute SHA-256 over a salt followed by a secret
///
/// Used for salted credential hashing where the salt is stored
/// alongside the digest.
pub fn salted_sha256(salt: &[u8], secret: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(secret);
    hasher.finalize().into()
}

/// Encode bytes as base64 (standard alphabet, padded)
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 (standard alphabet, padded) to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Encode bytes as base64url without padding (JWT segment encoding)
pub fn to_base64url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url without padding to bytes
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Compute HMAC-SHA256 with a 32-byte key
///
/// RFC 2104 construction: `H((K ^ opad) || H((K ^ ipad) || message))`.
/// The key is shorter than the SHA-256 block size, so it is zero-padded
/// to 64 bytes rather than hashed down.
pub fn hmac_sha256(key: &[u8; 32], data: &[u8]) -> [u8; 32] {
    let mut i_key_pad = [0x36u8; 64];
    let mut o_key_pad = [0x5cu8; 64];
    for (i, &k) in key.iter().enumerate() {
        i_key_pad[i] ^= k;
        o_key_pad[i] ^= k;
    }

    let inner = salted_sha256(&i_key_pad, data);
    salted_sha256(&o_key_pad, &inner)
}

/// Constant-time comparison to prevent timing attacks
///
/// Length mismatch returns early; equal-length inputs are always
/// scanned in full.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
