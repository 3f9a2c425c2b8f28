//! UMI transactions.
//!
//! A transaction is a 150-byte buffer with version-dependent field
//! overlays, plus a fields-set bitmap consulted before reads. The
//! buffer is always the canonical serialization:
//!
//! | offset | size | field            | versions                      |
//! |--------|------|------------------|-------------------------------|
//! | 0      | 1    | version          | all                           |
//! | 1      | 34   | sender           | all                           |
//! | 35     | 34   | recipient        | all but Create/UpdateStructure|
//! | 35     | 2    | structure prefix | Create/UpdateStructure        |
//! | 37     | 2    | profit percent   | Create/UpdateStructure        |
//! | 39     | 2    | fee percent      | Create/UpdateStructure        |
//! | 41     | 1    | name length      | Create/UpdateStructure        |
//! | 42     | 35   | name (UTF-8)     | Create/UpdateStructure        |
//! | 69     | 8    | value            | Genesis, Basic                |
//! | 77     | 8    | nonce            | all                           |
//! | 85     | 64   | signature        | all                           |
//!
//! Multi-byte integers are big-endian. The signed message is bytes
//! 0..85. The version byte is a transition gate: until it is set, no
//! other field may be read or written, and once set it is immutable.

use crate::address::Address;
use crate::errors::UmiError;
use crate::keys::SecretKey;
use crate::prefix::{prefix_to_version, version_to_prefix};
use crate::sha256::sha256;
use crate::utf8;

const SENDER_OFFSET: usize = 1;
const RECIPIENT_OFFSET: usize = 35;
const PREFIX_OFFSET: usize = 35;
const PROFIT_OFFSET: usize = 37;
const FEE_OFFSET: usize = 39;
const NAME_LENGTH_OFFSET: usize = 41;
const NAME_OFFSET: usize = 42;
const VALUE_OFFSET: usize = 69;
const NONCE_OFFSET: usize = 77;
const SIGNATURE_OFFSET: usize = 85;

/// Largest value and nonce the wire format carries: 2^53 - 1.
const MAX_SAFE_INT: u64 = (1 << 53) - 1;

/// Fields tracked by the set-bitmap.
#[derive(Clone, Copy)]
enum Field {
    Version,
    Sender,
    Recipient,
    Value,
    Prefix,
    Name,
    ProfitPercent,
    FeePercent,
    Nonce,
    Signature,
}

impl Field {
    const ALL: [Field; 10] = [
        Field::Version,
        Field::Sender,
        Field::Recipient,
        Field::Value,
        Field::Prefix,
        Field::Name,
        Field::ProfitPercent,
        Field::FeePercent,
        Field::Nonce,
        Field::Signature,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    fn name(self) -> &'static str {
        match self {
            Field::Version => "version",
            Field::Sender => "sender",
            Field::Recipient => "recipient",
            Field::Value => "value",
            Field::Prefix => "prefix",
            Field::Name => "name",
            Field::ProfitPercent => "profit_percent",
            Field::FeePercent => "fee_percent",
            Field::Nonce => "nonce",
            Field::Signature => "signature",
        }
    }
}

/// The eight wire versions as a tagged view over the version byte.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Version {
    Genesis,
    Basic,
    CreateStructure,
    UpdateStructure,
    UpdateProfitAddress,
    UpdateFeeAddress,
    CreateTransitAddress,
    DeleteTransitAddress,
}

impl Version {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Version::Genesis),
            1 => Some(Version::Basic),
            2 => Some(Version::CreateStructure),
            3 => Some(Version::UpdateStructure),
            4 => Some(Version::UpdateProfitAddress),
            5 => Some(Version::UpdateFeeAddress),
            6 => Some(Version::CreateTransitAddress),
            7 => Some(Version::DeleteTransitAddress),
            _ => None,
        }
    }

    fn has_recipient(self) -> bool {
        !self.has_structure_fields()
    }

    fn has_value(self) -> bool {
        matches!(self, Version::Genesis | Version::Basic)
    }

    fn has_structure_fields(self) -> bool {
        matches!(self, Version::CreateStructure | Version::UpdateStructure)
    }

    fn is_address_admin(self) -> bool {
        matches!(
            self,
            Version::UpdateProfitAddress
                | Version::UpdateFeeAddress
                | Version::CreateTransitAddress
                | Version::DeleteTransitAddress
        )
    }
}

/// A 150-byte UMI transaction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Transaction {
    bytes: [u8; Transaction::LENGTH],
    fields: u16,
}

impl Transaction {
    /// Transaction length in bytes.
    pub const LENGTH: usize = 150;

    /// Genesis mint.
    pub const GENESIS: u8 = 0;
    /// Plain transfer.
    pub const BASIC: u8 = 1;
    /// Structure registration.
    pub const CREATE_STRUCTURE: u8 = 2;
    /// Structure settings update.
    pub const UPDATE_STRUCTURE: u8 = 3;
    /// Profit address update.
    pub const UPDATE_PROFIT_ADDRESS: u8 = 4;
    /// Fee address update.
    pub const UPDATE_FEE_ADDRESS: u8 = 5;
    /// Transit address activation.
    pub const CREATE_TRANSIT_ADDRESS: u8 = 6;
    /// Transit address deactivation.
    pub const DELETE_TRANSIT_ADDRESS: u8 = 7;

    /// Create an empty transaction: zero buffer, no fields set.
    pub fn new() -> Self {
        Self {
            bytes: [0u8; Self::LENGTH],
            fields: 0,
        }
    }

    /// Copy a 150-byte buffer and mark every field as set. Illegal
    /// combinations are only rejected when the field is accessed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UmiError> {
        let bytes: [u8; Self::LENGTH] = bytes.try_into().map_err(|_| {
            UmiError::InvalidLength(format!(
                "transaction must be {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            ))
        })?;
        let mut fields = 0u16;
        for field in Field::ALL {
            fields |= field.bit();
        }
        Ok(Self { bytes, fields })
    }

    // ── guards ──────────────────────────────────────────────────────

    fn is_set(&self, field: Field) -> bool {
        self.fields & field.bit() != 0
    }

    fn mark_set(&mut self, field: Field) {
        self.fields |= field.bit();
    }

    fn require_set(&self, field: Field) -> Result<(), UmiError> {
        if self.is_set(field) {
            Ok(())
        } else {
            Err(UmiError::FieldNotSet(field.name().into()))
        }
    }

    /// The version gate: every other accessor starts here.
    fn current_version(&self) -> Result<Version, UmiError> {
        self.require_set(Field::Version)?;
        Version::from_byte(self.bytes[0]).ok_or_else(|| {
            UmiError::InvalidField(format!("unknown transaction version {}", self.bytes[0]))
        })
    }

    fn require_field(&self, field: Field, available: bool) -> Result<(), UmiError> {
        if available {
            Ok(())
        } else {
            Err(UmiError::InvalidField(format!(
                "{} is not available in version {}",
                field.name(),
                self.bytes[0]
            )))
        }
    }

    fn check_sender(version: Version, address: &Address) -> Result<(), UmiError> {
        if version == Version::Genesis {
            if address.version() != Address::GENESIS {
                return Err(UmiError::InvalidType(
                    "genesis transaction sender must be a genesis address".into(),
                ));
            }
        } else if address.version() == Address::GENESIS {
            return Err(UmiError::InvalidType(
                "sender must not be a genesis address".into(),
            ));
        }
        Ok(())
    }

    fn check_recipient(version: Version, address: &Address) -> Result<(), UmiError> {
        if address.version() == Address::GENESIS {
            return Err(UmiError::InvalidType(
                "recipient must not be a genesis address".into(),
            ));
        }
        if version == Version::Genesis && address.version() != Address::UMI {
            return Err(UmiError::InvalidType(
                "genesis transaction recipient must be a umi address".into(),
            ));
        }
        if version.is_address_admin() && address.version() == Address::UMI {
            return Err(UmiError::InvalidType(
                "recipient must not be a umi address".into(),
            ));
        }
        Ok(())
    }

    // ── accessors ───────────────────────────────────────────────────

    /// The version byte.
    pub fn version(&self) -> Result<u8, UmiError> {
        self.require_set(Field::Version)?;
        Ok(self.bytes[0])
    }

    /// Set the version byte. Once set it is immutable.
    pub fn set_version(&mut self, version: u8) -> Result<&mut Self, UmiError> {
        if self.is_set(Field::Version) {
            return Err(UmiError::FieldAlreadySet("version".into()));
        }
        if Version::from_byte(version).is_none() {
            return Err(UmiError::InvalidRange(format!(
                "version must be 0..=7, got {version}"
            )));
        }
        self.bytes[0] = version;
        self.mark_set(Field::Version);
        Ok(self)
    }

    /// The sender address.
    pub fn sender(&self) -> Result<Address, UmiError> {
        self.current_version()?;
        self.require_set(Field::Sender)?;
        Address::from_bytes(&self.bytes[SENDER_OFFSET..SENDER_OFFSET + Address::LENGTH])
    }

    /// Set the sender address.
    pub fn set_sender(&mut self, sender: &Address) -> Result<&mut Self, UmiError> {
        let version = self.current_version()?;
        Self::check_sender(version, sender)?;
        self.bytes[SENDER_OFFSET..SENDER_OFFSET + Address::LENGTH]
            .copy_from_slice(sender.as_ref());
        self.mark_set(Field::Sender);
        Ok(self)
    }

    /// The recipient address.
    pub fn recipient(&self) -> Result<Address, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::Recipient, version.has_recipient())?;
        self.require_set(Field::Recipient)?;
        Address::from_bytes(&self.bytes[RECIPIENT_OFFSET..RECIPIENT_OFFSET + Address::LENGTH])
    }

    /// Set the recipient address.
    pub fn set_recipient(&mut self, recipient: &Address) -> Result<&mut Self, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::Recipient, version.has_recipient())?;
        Self::check_recipient(version, recipient)?;
        self.bytes[RECIPIENT_OFFSET..RECIPIENT_OFFSET + Address::LENGTH]
            .copy_from_slice(recipient.as_ref());
        self.mark_set(Field::Recipient);
        Ok(self)
    }

    /// The transferred value.
    pub fn value(&self) -> Result<u64, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::Value, version.has_value())?;
        self.require_set(Field::Value)?;
        self.read_safe_u64(VALUE_OFFSET, "value")
    }

    /// Set the transferred value, in `1..=2^53-1`.
    pub fn set_value(&mut self, value: u64) -> Result<&mut Self, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::Value, version.has_value())?;
        if value == 0 || value > MAX_SAFE_INT {
            return Err(UmiError::InvalidRange(format!(
                "value must be in 1..=2^53-1, got {value}"
            )));
        }
        self.bytes[VALUE_OFFSET..VALUE_OFFSET + 8].copy_from_slice(&value.to_be_bytes());
        self.mark_set(Field::Value);
        Ok(self)
    }

    /// The nonce.
    pub fn nonce(&self) -> Result<u64, UmiError> {
        self.current_version()?;
        self.require_set(Field::Nonce)?;
        self.read_safe_u64(NONCE_OFFSET, "nonce")
    }

    /// Set the nonce, in `0..=2^53-1`.
    pub fn set_nonce(&mut self, nonce: u64) -> Result<&mut Self, UmiError> {
        self.current_version()?;
        if nonce > MAX_SAFE_INT {
            return Err(UmiError::InvalidRange(format!(
                "nonce must be in 0..=2^53-1, got {nonce}"
            )));
        }
        self.bytes[NONCE_OFFSET..NONCE_OFFSET + 8].copy_from_slice(&nonce.to_be_bytes());
        self.mark_set(Field::Nonce);
        Ok(self)
    }

    /// Read a stored u64, rejecting values above 2^53 - 1: the first
    /// two big-endian bytes must not exceed 0x001f.
    fn read_safe_u64(&self, offset: usize, name: &str) -> Result<u64, UmiError> {
        let top = u16::from_be_bytes([self.bytes[offset], self.bytes[offset + 1]]);
        if top > 0x001f {
            return Err(UmiError::InvalidRange(format!(
                "stored {name} exceeds 2^53-1"
            )));
        }
        Ok(u64::from_be_bytes(
            self.bytes[offset..offset + 8].try_into().unwrap(),
        ))
    }

    /// The structure prefix.
    pub fn prefix(&self) -> Result<String, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::Prefix, version.has_structure_fields())?;
        self.require_set(Field::Prefix)?;
        let word = u16::from_be_bytes([self.bytes[PREFIX_OFFSET], self.bytes[PREFIX_OFFSET + 1]]);
        version_to_prefix(word)
    }

    /// Set the structure prefix.
    pub fn set_prefix(&mut self, prefix: &str) -> Result<&mut Self, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::Prefix, version.has_structure_fields())?;
        let word = prefix_to_version(prefix)?;
        self.bytes[PREFIX_OFFSET..PREFIX_OFFSET + 2].copy_from_slice(&word.to_be_bytes());
        self.mark_set(Field::Prefix);
        Ok(self)
    }

    /// The structure name.
    pub fn name(&self) -> Result<String, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::Name, version.has_structure_fields())?;
        self.require_set(Field::Name)?;
        let len = self.bytes[NAME_LENGTH_OFFSET] as usize;
        if len > 35 {
            return Err(UmiError::InvalidLength(format!(
                "stored name length {len} exceeds 35"
            )));
        }
        Ok(utf8::decode(&self.bytes[NAME_OFFSET..NAME_OFFSET + len]))
    }

    /// Set the structure name; its UTF-8 encoding is at most 35 bytes.
    pub fn set_name(&mut self, name: &str) -> Result<&mut Self, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::Name, version.has_structure_fields())?;
        let encoded = utf8::encode(name);
        if encoded.len() >= 36 {
            return Err(UmiError::InvalidLength(format!(
                "name encodes to {} bytes, limit is 35",
                encoded.len()
            )));
        }
        self.bytes[NAME_LENGTH_OFFSET] = encoded.len() as u8;
        self.bytes[NAME_OFFSET..NAME_OFFSET + encoded.len()].copy_from_slice(&encoded);
        self.bytes[NAME_OFFSET + encoded.len()..NAME_OFFSET + 35].fill(0);
        self.mark_set(Field::Name);
        Ok(self)
    }

    /// The structure profit share.
    pub fn profit_percent(&self) -> Result<u16, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::ProfitPercent, version.has_structure_fields())?;
        self.require_set(Field::ProfitPercent)?;
        Ok(u16::from_be_bytes([
            self.bytes[PROFIT_OFFSET],
            self.bytes[PROFIT_OFFSET + 1],
        ]))
    }

    /// Set the structure profit share, in hundredths of a percent,
    /// `100..=500`.
    pub fn set_profit_percent(&mut self, percent: u16) -> Result<&mut Self, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::ProfitPercent, version.has_structure_fields())?;
        if !(100..=500).contains(&percent) {
            return Err(UmiError::InvalidRange(format!(
                "profit percent must be in 100..=500, got {percent}"
            )));
        }
        self.bytes[PROFIT_OFFSET..PROFIT_OFFSET + 2].copy_from_slice(&percent.to_be_bytes());
        self.mark_set(Field::ProfitPercent);
        Ok(self)
    }

    /// The structure fee share.
    pub fn fee_percent(&self) -> Result<u16, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::FeePercent, version.has_structure_fields())?;
        self.require_set(Field::FeePercent)?;
        Ok(u16::from_be_bytes([
            self.bytes[FEE_OFFSET],
            self.bytes[FEE_OFFSET + 1],
        ]))
    }

    /// Set the structure fee share, in hundredths of a percent,
    /// `0..=2000`.
    pub fn set_fee_percent(&mut self, percent: u16) -> Result<&mut Self, UmiError> {
        let version = self.current_version()?;
        self.require_field(Field::FeePercent, version.has_structure_fields())?;
        if percent > 2000 {
            return Err(UmiError::InvalidRange(format!(
                "fee percent must be in 0..=2000, got {percent}"
            )));
        }
        self.bytes[FEE_OFFSET..FEE_OFFSET + 2].copy_from_slice(&percent.to_be_bytes());
        self.mark_set(Field::FeePercent);
        Ok(self)
    }

    /// The detached signature over bytes 0..85.
    pub fn signature(&self) -> Result<[u8; 64], UmiError> {
        self.require_set(Field::Version)?;
        self.require_set(Field::Sender)?;
        self.require_set(Field::Signature)?;
        Ok(self.bytes[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 64]
            .try_into()
            .unwrap())
    }

    /// Write a detached signature.
    pub fn set_signature(&mut self, signature: &[u8]) -> Result<&mut Self, UmiError> {
        self.require_set(Field::Version)?;
        self.require_set(Field::Sender)?;
        if signature.len() != 64 {
            return Err(UmiError::InvalidLength(format!(
                "signature must be 64 bytes, got {}",
                signature.len()
            )));
        }
        self.bytes[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 64].copy_from_slice(signature);
        self.mark_set(Field::Signature);
        Ok(self)
    }

    /// Sign bytes 0..85 with `secret_key` and store the signature.
    /// Returns the transaction for chaining.
    pub fn sign(&mut self, secret_key: &SecretKey) -> Result<&mut Self, UmiError> {
        self.require_set(Field::Version)?;
        self.require_set(Field::Sender)?;
        let signature = secret_key.sign(&self.bytes[..SIGNATURE_OFFSET]);
        self.set_signature(&signature)
    }

    /// Check the stored signature with the sender's public key.
    ///
    /// Errors mean the check could not run (missing fields); `false`
    /// means the check ran and failed.
    pub fn verify(&self) -> Result<bool, UmiError> {
        self.require_set(Field::Version)?;
        self.require_set(Field::Sender)?;
        self.require_set(Field::Signature)?;
        let signature: [u8; 64] = self.bytes[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 64]
            .try_into()
            .unwrap();
        let sender = Address::from_bytes(&self.bytes[SENDER_OFFSET..SENDER_OFFSET + Address::LENGTH])?;
        Ok(sender
            .public_key()
            .verify_signature(&signature, &self.bytes[..SIGNATURE_OFFSET]))
    }

    /// SHA-256 of the full 150-byte buffer.
    pub fn hash(&self) -> [u8; 32] {
        sha256(&self.bytes)
    }

    /// A copy of the 150-byte buffer.
    pub fn bytes(&self) -> [u8; Self::LENGTH] {
        self.bytes
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for Transaction {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
