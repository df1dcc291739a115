//! Binary layout engine for Squads instruction payloads.
//!
//! The on-chain program unpacks its instruction data positionally, so every
//! field occupies a fixed span at a fixed offset. This module provides the
//! field-level [`Layout`] units and the [`Structure`] composite that lays a
//! named [`Record`] out field by field.
//!
//! Integer fields accept a wide [`i128`] so that negative or out-of-range
//! caller input is rejected at encode time rather than wrapped.
//!
//! # Example
//!
//! ```rust
//! use squads_sdk::layout::{Field, Record, Structure};
//!
//! let schema = Structure::new(vec![Field::u8("tag"), Field::u64("amount")]);
//! let record = Record::new().with("tag", 7u8).with("amount", 42u64);
//!
//! let bytes = schema.encode_to_vec(&record).expect("encodes");
//! assert_eq!(bytes.len(), 9);
//! assert_eq!(schema.decode(&bytes).expect("decodes"), record);
//! ```

pub mod primitives;
pub mod structure;

pub use primitives::{FixedUtf8, I64, U64, U8};
pub use structure::{Field, FieldKind, FieldValue, Record, SequenceCount, Structure};

use crate::error::SdkError;

/// A fixed-span encode/decode unit for one field.
pub trait Layout {
    /// Value produced by [`Layout::decode`] and consumed by [`Layout::encode`].
    type Value;

    /// Field name used in error messages.
    fn name(&self) -> &str;

    /// Number of bytes the field occupies. Never changes after construction.
    fn span(&self) -> usize;

    /// Encodes `value` into `buf` at `offset`.
    ///
    /// Returns the number of meaningful bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not fit the field or the buffer.
    fn encode(&self, value: &Self::Value, buf: &mut [u8], offset: usize)
        -> Result<usize, SdkError>;

    /// Decodes the field from `buf` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is too short or holds invalid data.
    fn decode(&self, buf: &[u8], offset: usize) -> Result<Self::Value, SdkError>;
}

/// Returns the mutable `span`-byte region of `buf` starting at `offset`.
pub(crate) fn region_mut(buf: &mut [u8], offset: usize, span: usize) -> Result<&mut [u8], SdkError> {
    let available = buf.len();
    let end = offset
        .checked_add(span)
        .ok_or(SdkError::BufferTooSmall {
            needed: usize::MAX,
            available,
        })?;
    buf.get_mut(offset..end).ok_or(SdkError::BufferTooSmall {
        needed: end,
        available,
    })
}

/// Returns the `span`-byte region of `buf` starting at `offset`.
pub(crate) fn region(buf: &[u8], offset: usize, span: usize) -> Result<&[u8], SdkError> {
    let available = buf.len();
    let end = offset
        .checked_add(span)
        .ok_or(SdkError::BufferTooSmall {
            needed: usize::MAX,
            available,
        })?;
    buf.get(offset..end).ok_or(SdkError::BufferTooSmall {
        needed: end,
        available,
    })
}
