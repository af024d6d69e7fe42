//! Decoding of base64 image payloads, bare or wrapped in a `data:` URL.

use base64::Engine;

use crate::error::PayloadError;

/// Decode a stamp image payload.
///
/// Accepts plain base64 (padded or unpadded, embedded whitespace ignored) or
/// a `data:<mime>;base64,<payload>` URL.
pub fn decode_payload(input: &str) -> Result<Vec<u8>, PayloadError> {
    let trimmed = input.trim();
    let body = match trimmed.strip_prefix("data:") {
        Some(rest) => {
            let (header, body) = rest
                .split_once(',')
                .ok_or(PayloadError::MissingDataSeparator)?;
            if !header.ends_with(";base64") {
                return Err(PayloadError::NotBase64DataUrl);
            }
            body
        }
        None => trimmed,
    };

    let cleaned: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(&cleaned)
        .or_else(|_| base64::engine::general_purpose::STANDARD_NO_PAD.decode(&cleaned))?;
    Ok(decoded)
}

/// Encode bytes as padded standard base64.
pub fn encode_payload(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Serde adapters for byte fields carried as base64 strings.
pub(crate) mod serde_base64 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_payload(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode_payload(&s).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            data: &Option<Vec<u8>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match data {
                Some(bytes) => serializer.serialize_some(&crate::payload::encode_payload(bytes)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Vec<u8>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|s| crate::payload::decode_payload(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
