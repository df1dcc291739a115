//! SDK error types.
//!
//! Every failure in this crate is a local, deterministic validation error
//! raised before an instruction reaches a batch. None of them are retryable.

/// SDK errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
    /// Text does not fit its fixed-width field.
    #[error("field `{field}` is {len} bytes, exceeds width of {width}")]
    FieldTooLong {
        /// Field name.
        field: String,
        /// Declared width in bytes.
        width: usize,
        /// Byte length of the offered text.
        len: usize,
    },

    /// Negative value offered to an unsigned field.
    #[error("field `{field}` is unsigned, got negative value {value}")]
    NegativeValue {
        /// Field name.
        field: String,
        /// The rejected value.
        value: i128,
    },

    /// Value does not fit the field's integer range.
    #[error("value for field `{field}` overflows its integer range")]
    Overflow {
        /// Field name.
        field: String,
    },

    /// Buffer is smaller than the encoded layout.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },

    /// Allocated buffer does not match the encoded span exactly.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// No bump in `0..=255` produced an off-curve address.
    #[error("unable to find a viable program address bump seed")]
    DerivationExhausted,

    /// Sequence holds more entries than its fixed capacity.
    #[error("field `{field}` holds at most {max} elements, got {actual}")]
    TooManyElements {
        /// Field name.
        field: String,
        /// Capacity.
        max: usize,
        /// Offered element count.
        actual: usize,
    },

    /// Seeds violate the ledger's seed limits, or the hash lands on the curve.
    #[error("invalid seeds: {0}")]
    InvalidSeeds(String),

    /// A required record field was not supplied.
    #[error("missing field: {0}")]
    MissingField(String),

    /// Invalid or missing address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The instruction kind has no client-side schema.
    #[error("unsupported instruction: {0}")]
    UnsupportedInstruction(String),
}
