//! Content digests for stamp image payloads, encoded SRI-style.
//!
//! Renderers use the digest to share one image object between placements of
//! identical payloads.

use sha2::{Digest as _, Sha256, Sha512};

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Sha512,
}

/// Digest name that does not map to a supported algorithm.
#[derive(Debug, thiserror::Error)]
#[error("Unsupported digest algorithm: {0}")]
pub struct UnsupportedDigest(pub String);

impl DigestAlgorithm {
    /// Returns the algorithm name in lowercase (for SRI strings).
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }

    /// Parse algorithm from name string.
    pub fn from_name(s: &str) -> Result<Self, UnsupportedDigest> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(UnsupportedDigest(s.to_string())),
        }
    }
}

/// Compute digest of the given data using the specified algorithm.
#[tracing::instrument(skip(data), fields(data_len = data.len(), alg = ?algorithm))]
pub fn compute_digest(algorithm: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
    }
}

/// Encode digest as SRI string (e.g., `sha512-<base64>`).
pub fn encode_sri(algorithm: DigestAlgorithm, digest: &[u8]) -> String {
    format!(
        "{}-{}",
        algorithm.name(),
        crate::payload::encode_payload(digest)
    )
}

/// Digest `data` and return its SRI string in one step.
pub fn payload_sri(algorithm: DigestAlgorithm, data: &[u8]) -> String {
    encode_sri(algorithm, &compute_digest(algorithm, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_lengths() {
        assert_eq!(compute_digest(DigestAlgorithm::Sha256, b"hello").len(), 32);
        assert_eq!(compute_digest(DigestAlgorithm::Sha512, b"hello").len(), 64);
    }

    #[test]
    fn sha256_sri_of_empty_input() {
        assert_eq!(
            payload_sri(DigestAlgorithm::Sha256, b""),
            "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(
            DigestAlgorithm::from_name("SHA-512").unwrap(),
            DigestAlgorithm::Sha512
        );
        assert!(DigestAlgorithm::from_name("md5").is_err());
    }
}
