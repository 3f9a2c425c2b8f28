//! Address prefix codec.
//!
//! A prefix is either the literal `genesis` (version 0) or three ASCII
//! lowercase letters packed into a 15-bit version word: with `a..z`
//! mapped to `1..26`, `version = a*1024 + b*32 + c`. The high bit of the
//! word is reserved and must be zero.

use crate::errors::UmiError;

/// Convert a prefix string to its 16-bit version word.
pub fn prefix_to_version(prefix: &str) -> Result<u16, UmiError> {
    if prefix == "genesis" {
        return Ok(0);
    }

    if prefix.len() != 3 {
        return Err(UmiError::InvalidPrefix(format!(
            "expected 3 characters, got {}",
            prefix.len()
        )));
    }

    let mut version: u16 = 0;
    for c in prefix.bytes() {
        if !c.is_ascii_lowercase() {
            return Err(UmiError::InvalidPrefix(format!(
                "character '{}' out of range a-z",
                c as char
            )));
        }
        version = (version << 5) | (c - b'a' + 1) as u16;
    }
    Ok(version)
}

/// Convert a 16-bit version word back to its prefix string.
pub fn version_to_prefix(version: u16) -> Result<String, UmiError> {
    if version == 0 {
        return Ok("genesis".to_string());
    }

    if version & 0x8000 != 0 {
        return Err(UmiError::InvalidPrefix("reserved bit set".into()));
    }

    let mut prefix = String::with_capacity(3);
    for shift in [10u16, 5, 0] {
        let chr = (version >> shift) & 0x1f;
        if !(1..=26).contains(&chr) {
            return Err(UmiError::InvalidPrefix(format!(
                "letter code {chr} out of range 1-26"
            )));
        }
        prefix.push((b'a' + chr as u8 - 1) as char);
    }
    Ok(prefix)
}
