//! Bech32 encoding/decoding for UMI addresses.
//!
//! BIP-173 Bech32 (not Bech32m). The human-readable part is the address
//! prefix (`umi`, `genesis`, ...), the data part is the 32-byte public
//! key regrouped into 5-bit characters, followed by a 6-character BCH
//! checksum. A 34-byte address therefore renders as
//! `prefix + '1' + 52 data chars + 6 checksum chars`.

use crate::errors::UmiError;
use crate::prefix::{prefix_to_version, version_to_prefix};

/// Bech32 character set.
const CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Generator polynomial coefficients for the checksum.
const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

/// Compute the Bech32 polymod over 5-bit values.
fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &v in values {
        let top = chk >> 25;
        chk = ((chk & 0x1ff_ffff) << 5) ^ (v as u32);
        for (i, &gen) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= gen;
            }
        }
    }
    chk
}

/// Expand the human-readable part for checksum computation.
fn hrp_expand(hrp: &str) -> Vec<u8> {
    let mut ret = Vec::with_capacity(hrp.len() * 2 + 1);
    for c in hrp.bytes() {
        ret.push(c >> 5);
    }
    ret.push(0);
    for c in hrp.bytes() {
        ret.push(c & 31);
    }
    ret
}

fn verify_checksum(hrp: &str, data: &[u8]) -> bool {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    polymod(&values) == 1
}

fn create_checksum(hrp: &str, data: &[u8]) -> [u8; 6] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    let polymod = polymod(&values) ^ 1;
    let mut ret = [0u8; 6];
    for (i, slot) in ret.iter_mut().enumerate() {
        *slot = ((polymod >> (5 * (5 - i))) & 31) as u8;
    }
    ret
}

/// Regroup bits between 8-bit and 5-bit representations.
fn convert_bits(data: &[u8], from_bits: u32, to_bits: u32, pad: bool) -> Result<Vec<u8>, UmiError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut ret = Vec::new();
    let maxv = (1u32 << to_bits) - 1;

    for &value in data {
        let value = value as u32;
        if value >> from_bits != 0 {
            return Err(UmiError::InvalidBech32("value exceeds source width".into()));
        }
        acc = (acc << from_bits) | value;
        bits += from_bits;
        while bits >= to_bits {
            bits -= to_bits;
            ret.push(((acc >> bits) & maxv) as u8);
        }
    }

    if pad {
        if bits > 0 {
            ret.push(((acc << (to_bits - bits)) & maxv) as u8);
        }
    } else if bits >= from_bits || ((acc << (to_bits - bits)) & maxv) != 0 {
        return Err(UmiError::InvalidBech32("non-zero or excess padding".into()));
    }

    Ok(ret)
}

/// Encode a 34-byte address as a Bech32 string.
pub fn encode(address: &[u8; 34]) -> Result<String, UmiError> {
    let version = u16::from_be_bytes([address[0], address[1]]);
    let hrp = version_to_prefix(version)?;

    let data = convert_bits(&address[2..], 8, 5, true)?;
    let checksum = create_checksum(&hrp, &data);

    let mut out = String::with_capacity(hrp.len() + 1 + data.len() + 6);
    out.push_str(&hrp);
    out.push('1');
    for &d in data.iter().chain(checksum.iter()) {
        out.push(CHARSET[d as usize] as char);
    }
    Ok(out)
}

/// Decode a Bech32 string to a 34-byte address.
pub fn decode(bech32: &str) -> Result<[u8; 34], UmiError> {
    let has_lower = bech32.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = bech32.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(UmiError::InvalidBech32("mixed case".into()));
    }
    let lower = bech32.to_lowercase();

    let sep = lower
        .rfind('1')
        .ok_or_else(|| UmiError::InvalidBech32("missing separator".into()))?;
    if sep == 0 {
        return Err(UmiError::InvalidBech32("empty prefix".into()));
    }
    let hrp = &lower[..sep];
    let data_str = &lower[sep + 1..];
    if data_str.len() < 6 {
        return Err(UmiError::InvalidBech32("data part too short".into()));
    }

    let mut data = Vec::with_capacity(data_str.len());
    for c in data_str.bytes() {
        let pos = CHARSET
            .iter()
            .position(|&x| x == c)
            .ok_or_else(|| UmiError::InvalidBech32(format!("invalid character '{}'", c as char)))?;
        data.push(pos as u8);
    }

    if !verify_checksum(hrp, &data) {
        return Err(UmiError::InvalidBech32("checksum mismatch".into()));
    }

    let key = convert_bits(&data[..data.len() - 6], 5, 8, false)?;
    if key.len() != 32 {
        return Err(UmiError::InvalidBech32(format!(
            "expected 32 data bytes, got {}",
            key.len()
        )));
    }

    let version = prefix_to_version(hrp)?;
    let mut address = [0u8; 34];
    address[..2].copy_from_slice(&version.to_be_bytes());
    address[2..].copy_from_slice(&key);
    Ok(address)
}
