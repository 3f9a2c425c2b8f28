//! UMI Core — client-side primitives for the UMI network.
//!
//! This crate is a self-contained implementation of the UMI wire
//! formats: 34-byte addresses with a Bech32 string form, Ed25519 keys,
//! and the 150-byte eight-variant transaction record. Every encoding
//! it produces is byte-exact against the other implementations of the
//! protocol, verified by golden vectors in the test suite.
//!
//! The crate is pure and I/O-free: all operations are bounded
//! transformations on fixed-size byte buffers. The cryptographic
//! primitives (SHA-256, SHA-512, Ed25519 over 16-limb field
//! arithmetic) are implemented here rather than pulled in, and the
//! secret-dependent paths are written branch-free.
//!
//! ```
//! use umi_core::{Address, SecretKey, Transaction};
//!
//! # fn main() -> Result<(), umi_core::UmiError> {
//! let key = SecretKey::from_seed(&[0u8; 32])?;
//! let sender = Address::from_secret_key(&key);
//! let recipient = Address::from_bech32(
//!     "umi1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqr5zcpj",
//! )?;
//!
//! let mut tx = Transaction::new();
//! tx.set_version(Transaction::BASIC)?;
//! tx.set_sender(&sender)?;
//! tx.set_recipient(&recipient)?;
//! tx.set_value(42)?;
//! tx.set_nonce(1)?;
//! tx.sign(&key)?;
//!
//! assert!(tx.verify()?);
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod bech32;
pub mod block;
pub mod ed25519;
pub mod errors;
pub mod keys;
pub mod prefix;
pub mod sha256;
pub mod transaction;
pub mod utf8;

pub use address::Address;
pub use block::{Block, BlockHeader};
pub use errors::UmiError;
pub use keys::{PublicKey, SecretKey};
pub use transaction::Transaction;
