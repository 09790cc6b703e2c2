//! Torrent metadata summarization and content-hash derivation.
//!
//! Decodes uploaded .torrent bytes, re-encodes the info dictionary in
//! canonical form, and derives the SHA-1 content hash plus the size and file
//! count the catalog stores. Derivation is pure: identical input bytes always
//! yield identical results.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha1::{Digest, Sha1};

use crate::bencode::{self, DecodeError, Value};

/// SHA-1 hash identifying a unique catalog entry.
///
/// 20-byte digest of the canonically encoded info dictionary. Renders as the
/// 40-character lowercase hex form everywhere, which makes the "stored
/// lowercase" uniqueness invariant structural rather than a convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; 20]);

impl InfoHash {
    /// Creates InfoHash from a 20-byte SHA-1 digest.
    pub fn new(hash: [u8; 20]) -> Self {
        Self(hash)
    }

    /// Returns reference to the underlying 20-byte digest.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parses a 40-character hex string, accepting either letter case.
    ///
    /// # Errors
    ///
    /// - `InfoHashParseError` - Input is not exactly 40 hex characters
    pub fn from_hex(text: &str) -> Result<Self, InfoHashParseError> {
        if text.len() != 40 {
            return Err(InfoHashParseError {
                input: text.to_string(),
            });
        }

        let mut hash = [0u8; 20];
        hex::decode_to_slice(text.to_ascii_lowercase(), &mut hash).map_err(|_| {
            InfoHashParseError {
                input: text.to_string(),
            }
        })?;

        Ok(Self(hash))
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for InfoHash {
    type Err = InfoHashParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_hex(text)
    }
}

impl Serialize for InfoHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for InfoHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        InfoHash::from_hex(&text).map_err(D::Error::custom)
    }
}

/// Error from parsing a hex-encoded info hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid info hash: {input:?} (expected 40 hex characters)")]
pub struct InfoHashParseError {
    pub input: String,
}

/// Errors that can occur while deriving metadata from torrent bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetainfoError {
    #[error("Malformed bencode: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid torrent metadata: {reason}")]
    Invalid { reason: String },
}

impl MetainfoError {
    fn invalid(reason: impl Into<String>) -> Self {
        MetainfoError::Invalid {
            reason: reason.into(),
        }
    }
}

/// Summary derived from a torrent document's info dictionary.
///
/// Carries exactly the fields the catalog persists: the content hash, the
/// display name, total payload size, and file count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metainfo {
    pub info_hash: InfoHash,
    pub name: String,
    pub total_size: u64,
    pub file_count: u32,
}

impl Metainfo {
    /// Derives a metadata summary from raw torrent bytes.
    ///
    /// The top level must be a dictionary with an "info" key holding another
    /// dictionary. The content hash is SHA-1 over the canonical re-encoding
    /// of that info dictionary, so byte-distinct uploads with equal info
    /// dictionaries derive equal hashes.
    ///
    /// # Errors
    ///
    /// - `MetainfoError::Decode` - Input is not well-formed bencode
    /// - `MetainfoError::Invalid` - Missing or malformed "info" structure
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetainfoError> {
        let document = bencode::decode(bytes)?;

        if document.as_dictionary().is_none() {
            return Err(MetainfoError::invalid("top level must be a dictionary"));
        }

        let info = document
            .lookup(b"info")
            .ok_or_else(|| MetainfoError::invalid("missing info dictionary"))?;
        if info.as_dictionary().is_none() {
            return Err(MetainfoError::invalid("info field must be a dictionary"));
        }

        let info_hash = derive_info_hash(info);
        let (total_size, file_count) = derive_sizes(info)?;
        let name = info
            .lookup(b"name")
            .and_then(Value::as_bytes)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Self {
            info_hash,
            name,
            total_size,
            file_count,
        })
    }
}

/// SHA-1 over the canonical encoding of the info dictionary.
fn derive_info_hash(info: &Value) -> InfoHash {
    let canonical = bencode::encode(info);
    let digest = Sha1::digest(&canonical);

    let mut hash = [0u8; 20];
    hash.copy_from_slice(&digest);
    InfoHash::new(hash)
}

/// Total payload size and file count from the info dictionary.
///
/// Multi-file torrents sum per-file "length" fields; single-file torrents use
/// the top-level "length" (default 0). `file_count` stays positive: an empty
/// "files" list is rejected.
fn derive_sizes(info: &Value) -> Result<(u64, u32), MetainfoError> {
    if let Some(files) = info.lookup(b"files") {
        let entries = files
            .as_list()
            .ok_or_else(|| MetainfoError::invalid("files field must be a list"))?;
        if entries.is_empty() {
            return Err(MetainfoError::invalid("files list is empty"));
        }

        let mut total_size = 0u64;
        for entry in entries {
            let length = entry
                .lookup(b"length")
                .and_then(Value::as_integer)
                .ok_or_else(|| MetainfoError::invalid("file entry missing length"))?;
            if length < 0 {
                return Err(MetainfoError::invalid("file length is negative"));
            }
            total_size = total_size
                .checked_add(length as u64)
                .ok_or_else(|| MetainfoError::invalid("total size overflows"))?;
        }

        let file_count = u32::try_from(entries.len())
            .map_err(|_| MetainfoError::invalid("files list is too large"))?;
        return Ok((total_size, file_count));
    }

    let length = match info.lookup(b"length") {
        Some(value) => value
            .as_integer()
            .ok_or_else(|| MetainfoError::invalid("length field must be an integer"))?,
        None => 0,
    };
    if length < 0 {
        return Err(MetainfoError::invalid("length is negative"));
    }

    Ok((length as u64, 1))
}
