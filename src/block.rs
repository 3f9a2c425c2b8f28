//! Block placeholders.
//!
//! The block layout is not part of the client core yet. These types
//! reserve the names in the public surface; their wire format will be
//! specified separately.

/// Reserved: a block of transactions.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Block;

/// Reserved: a block header.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct BlockHeader;
