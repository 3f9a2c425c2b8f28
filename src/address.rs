//! UMI addresses.
//!
//! An address is 34 bytes: a big-endian u16 version word (high bit
//! always zero) followed by a 32-byte Ed25519 public key. The string
//! form is Bech32 with the decoded prefix as the human-readable part.

use crate::bech32;
use crate::errors::UmiError;
use crate::keys::{PublicKey, SecretKey};
use crate::prefix::{prefix_to_version, version_to_prefix};

/// A 34-byte UMI address.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Address {
    bytes: [u8; Address::LENGTH],
}

impl Address {
    /// Address length in bytes.
    pub const LENGTH: usize = 34;

    /// Version word of genesis addresses.
    pub const GENESIS: u16 = 0;

    /// Version word of the mainnet `umi` namespace.
    pub const UMI: u16 = 21929;

    /// Create an empty address with the `umi` version.
    pub fn new() -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        bytes[..2].copy_from_slice(&Self::UMI.to_be_bytes());
        Self { bytes }
    }

    /// Copy raw bytes; no validation beyond the length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UmiError> {
        let bytes: [u8; Self::LENGTH] = bytes.try_into().map_err(|_| {
            UmiError::InvalidLength(format!(
                "address must be {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Parse and validate a Bech32 string.
    pub fn from_bech32(bech32_str: &str) -> Result<Self, UmiError> {
        Ok(Self {
            bytes: bech32::decode(bech32_str)?,
        })
    }

    /// Build a `umi` address holding the given public key.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let mut address = Self::new();
        address.set_public_key(public_key);
        address
    }

    /// Build a `umi` address holding the key derived from `secret_key`.
    pub fn from_secret_key(secret_key: &SecretKey) -> Self {
        Self::from_public_key(&secret_key.public_key())
    }

    /// The version word.
    pub fn version(&self) -> u16 {
        u16::from_be_bytes([self.bytes[0], self.bytes[1]])
    }

    /// Set the version word. The value must decode to a prefix; the
    /// reserved high bit is masked to zero before writing.
    pub fn set_version(&mut self, version: u16) -> Result<&mut Self, UmiError> {
        version_to_prefix(version)?;
        self.bytes[..2].copy_from_slice(&(version & 0x7fff).to_be_bytes());
        Ok(self)
    }

    /// The prefix string for the version word.
    pub fn prefix(&self) -> Result<String, UmiError> {
        version_to_prefix(self.version())
    }

    /// Set the version word from a prefix string.
    pub fn set_prefix(&mut self, prefix: &str) -> Result<&mut Self, UmiError> {
        let version = prefix_to_version(prefix)?;
        self.bytes[..2].copy_from_slice(&version.to_be_bytes());
        Ok(self)
    }

    /// The public key held in bytes 2..34.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(&self.bytes[2..]).unwrap()
    }

    /// Replace the public key.
    pub fn set_public_key(&mut self, public_key: &PublicKey) -> &mut Self {
        self.bytes[2..].copy_from_slice(public_key.as_ref());
        self
    }

    /// The Bech32 string form.
    pub fn bech32(&self) -> Result<String, UmiError> {
        bech32::encode(&self.bytes)
    }

    /// Replace the whole address from a Bech32 string.
    pub fn set_bech32(&mut self, bech32_str: &str) -> Result<&mut Self, UmiError> {
        self.bytes = bech32::decode(bech32_str)?;
        Ok(self)
    }

    /// A copy of the 34-byte buffer.
    pub fn bytes(&self) -> [u8; Self::LENGTH] {
        self.bytes
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
