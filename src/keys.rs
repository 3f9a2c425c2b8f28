//! Key value objects.
//!
//! Thin wrappers around the raw 32-byte public and 64-byte secret key
//! buffers. `SecretKey` holds the RFC 8032 combined form (32 bytes of
//! seed-derived private material followed by the 32-byte public key)
//! and wipes its buffer with volatile writes on drop.

use crate::ed25519;
use crate::errors::UmiError;
use crate::sha256::sha256;

/// Ed25519 public key.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PublicKey {
    bytes: [u8; PublicKey::LENGTH],
}

impl PublicKey {
    /// Public key length in bytes.
    pub const LENGTH: usize = 32;

    /// Construct from a raw 32-byte buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UmiError> {
        let bytes: [u8; Self::LENGTH] = bytes.try_into().map_err(|_| {
            UmiError::InvalidLength(format!(
                "public key must be {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Check a detached signature over `message`.
    ///
    /// Returns `false` on any malformed input rather than raising.
    pub fn verify_signature(&self, signature: &[u8; 64], message: &[u8]) -> bool {
        ed25519::verify(signature, message, &self.bytes)
    }

    /// The raw 32-byte key.
    pub fn bytes(&self) -> [u8; Self::LENGTH] {
        self.bytes
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<[u8; PublicKey::LENGTH]> for PublicKey {
    fn from(bytes: [u8; PublicKey::LENGTH]) -> Self {
        Self { bytes }
    }
}

/// Ed25519 secret key, combined form.
#[derive(Clone)]
pub struct SecretKey {
    bytes: [u8; SecretKey::LENGTH],
}

impl SecretKey {
    /// Secret key length in bytes.
    pub const LENGTH: usize = 64;

    /// Construct from a raw 64-byte buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UmiError> {
        let bytes: [u8; Self::LENGTH] = bytes.try_into().map_err(|_| {
            UmiError::InvalidLength(format!(
                "secret key must be {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Derive a secret key from a caller-supplied seed.
    ///
    /// A 32-byte seed is used as-is; any other length up to 128 bytes is
    /// first normalized with SHA-256.
    pub fn from_seed(seed: &[u8]) -> Result<Self, UmiError> {
        let seed32: [u8; 32] = if seed.len() == 32 {
            seed.try_into().unwrap()
        } else {
            if seed.len() > 128 {
                return Err(UmiError::InvalidLength(format!(
                    "seed must be at most 128 bytes, got {}",
                    seed.len()
                )));
            }
            sha256(seed)
        };

        let (bytes, _) = ed25519::keypair_from_seed(&seed32);
        Ok(Self { bytes })
    }

    /// The public half of the key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(ed25519::public_from_secret(&self.bytes))
    }

    /// Produce a detached 64-byte signature over `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        ed25519::sign(message, &self.bytes)
    }

    /// A copy of the raw 64-byte buffer.
    pub fn bytes(&self) -> [u8; Self::LENGTH] {
        self.bytes
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        // Volatile writes prevent the compiler from optimizing away the wipe.
        for byte in self.bytes.iter_mut() {
            unsafe { core::ptr::write_volatile(byte, 0) };
        }
        std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);
    }
}
