//! Primitive field layouts: fixed-width UTF-8 text and little-endian integers.

use crate::error::SdkError;

use super::{region, region_mut, Layout};

/// Fixed-width UTF-8 text field.
///
/// Encoding copies the text bytes to the start of the region and zero-fills
/// the rest. Callers are expected to pre-pad text to the full width (see
/// [`crate::schema::normalize_text`]) because the program reads the whole
/// region. Decoding returns exactly `width` bytes; padding is not stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedUtf8 {
    name: &'static str,
    width: usize,
}

impl FixedUtf8 {
    /// Creates a text field of `width` bytes.
    #[must_use]
    pub const fn new(name: &'static str, width: usize) -> Self {
        Self { name, width }
    }

    /// Returns the declared width in bytes.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }
}

impl Layout for FixedUtf8 {
    type Value = String;

    fn name(&self) -> &str {
        self.name
    }

    fn span(&self) -> usize {
        self.width
    }

    fn encode(&self, value: &String, buf: &mut [u8], offset: usize) -> Result<usize, SdkError> {
        let bytes = value.as_bytes();
        if bytes.len() > self.width {
            return Err(SdkError::FieldTooLong {
                field: self.name.to_string(),
                width: self.width,
                len: bytes.len(),
            });
        }

        let target = region_mut(buf, offset, self.width)?;
        let (head, tail) = target.split_at_mut(bytes.len());
        head.copy_from_slice(bytes);
        tail.fill(0);
        Ok(bytes.len())
    }

    fn decode(&self, buf: &[u8], offset: usize) -> Result<String, SdkError> {
        let source = region(buf, offset, self.width)?;
        std::str::from_utf8(source)
            .map(str::to_owned)
            .map_err(|e| SdkError::Deserialization(format!("field `{}`: {e}", self.name)))
    }
}

fn unsigned_range_error(name: &str, value: i128) -> SdkError {
    if value < 0 {
        SdkError::NegativeValue {
            field: name.to_string(),
            value,
        }
    } else {
        SdkError::Overflow {
            field: name.to_string(),
        }
    }
}

/// Unsigned 8-bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U8 {
    name: &'static str,
}

impl U8 {
    /// Creates a `u8` field.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Layout for U8 {
    type Value = i128;

    fn name(&self) -> &str {
        self.name
    }

    fn span(&self) -> usize {
        1
    }

    fn encode(&self, value: &i128, buf: &mut [u8], offset: usize) -> Result<usize, SdkError> {
        let raw = u8::try_from(*value).map_err(|_| unsigned_range_error(self.name, *value))?;
        region_mut(buf, offset, 1)?.copy_from_slice(&[raw]);
        Ok(1)
    }

    fn decode(&self, buf: &[u8], offset: usize) -> Result<i128, SdkError> {
        let source = region(buf, offset, 1)?;
        Ok(source.first().map_or(0, |b| i128::from(*b)))
    }
}

/// Unsigned 64-bit little-endian field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U64 {
    name: &'static str,
}

impl U64 {
    /// Creates a `u64` field.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Layout for U64 {
    type Value = i128;

    fn name(&self) -> &str {
        self.name
    }

    fn span(&self) -> usize {
        8
    }

    fn encode(&self, value: &i128, buf: &mut [u8], offset: usize) -> Result<usize, SdkError> {
        let raw = u64::try_from(*value).map_err(|_| unsigned_range_error(self.name, *value))?;
        region_mut(buf, offset, 8)?.copy_from_slice(&raw.to_le_bytes());
        Ok(8)
    }

    fn decode(&self, buf: &[u8], offset: usize) -> Result<i128, SdkError> {
        let bytes: [u8; 8] = region(buf, offset, 8)?
            .try_into()
            .map_err(|_| SdkError::Deserialization(format!("field `{}`", self.name)))?;
        Ok(i128::from(u64::from_le_bytes(bytes)))
    }
}

/// Signed 64-bit little-endian two's-complement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I64 {
    name: &'static str,
}

impl I64 {
    /// Creates an `i64` field.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Layout for I64 {
    type Value = i128;

    fn name(&self) -> &str {
        self.name
    }

    fn span(&self) -> usize {
        8
    }

    fn encode(&self, value: &i128, buf: &mut [u8], offset: usize) -> Result<usize, SdkError> {
        let raw = i64::try_from(*value).map_err(|_| SdkError::Overflow {
            field: self.name.to_string(),
        })?;
        region_mut(buf, offset, 8)?.copy_from_slice(&raw.to_le_bytes());
        Ok(8)
    }

    fn decode(&self, buf: &[u8], offset: usize) -> Result<i128, SdkError> {
        let bytes: [u8; 8] = region(buf, offset, 8)?
            .try_into()
            .map_err(|_| SdkError::Deserialization(format!("field `{}`", self.name)))?;
        Ok(i128::from(i64::from_le_bytes(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roundtrip_int<L: Layout<Value = i128>>(layout: &L, value: i128) -> i128 {
        let mut buf = vec![0u8; layout.span()];
        layout.encode(&value, &mut buf, 0).expect("should encode");
        layout.decode(&buf, 0).expect("should decode")
    }

    #[test]
    fn test_u64_boundaries() {
        let layout = U64::new("amount");
        assert_eq!(roundtrip_int(&layout, 0), 0);
        assert_eq!(
            roundtrip_int(&layout, i128::from(u64::MAX)),
            i128::from(u64::MAX)
        );
    }

    #[test]
    fn test_u64_little_endian() {
        let layout = U64::new("amount");
        let mut buf = [0u8; 8];
        layout.encode(&0x0102, &mut buf, 0).expect("should encode");
        assert_eq!(buf, [0x02, 0x01, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_u64_rejects_negative() {
        let layout = U64::new("amount");
        let mut buf = [0u8; 8];
        assert_eq!(
            layout.encode(&-1, &mut buf, 0),
            Err(SdkError::NegativeValue {
                field: "amount".to_string(),
                value: -1
            })
        );
        assert_eq!(buf, [0u8; 8]);
    }

    #[test]
    fn test_u64_rejects_one_past_max() {
        let layout = U64::new("amount");
        let mut buf = [0u8; 8];
        let result = layout.encode(&(i128::from(u64::MAX) + 1), &mut buf, 0);
        assert!(matches!(result, Err(SdkError::Overflow { .. })));
    }

    #[test]
    fn test_i64_boundaries() {
        let layout = I64::new("start_timestamp");
        assert_eq!(
            roundtrip_int(&layout, i128::from(i64::MIN)),
            i128::from(i64::MIN)
        );
        assert_eq!(
            roundtrip_int(&layout, i128::from(i64::MAX)),
            i128::from(i64::MAX)
        );
        assert_eq!(roundtrip_int(&layout, 0), 0);
    }

    #[test]
    fn test_i64_twos_complement() {
        let layout = I64::new("start_timestamp");
        let mut buf = [0u8; 8];
        layout.encode(&-1, &mut buf, 0).expect("should encode");
        assert_eq!(buf, [0xff; 8]);
    }

    #[test]
    fn test_i64_rejects_out_of_range() {
        let layout = I64::new("close_timestamp");
        let mut buf = [0u8; 8];
        assert!(matches!(
            layout.encode(&(i128::from(i64::MAX) + 1), &mut buf, 0),
            Err(SdkError::Overflow { .. })
        ));
        assert!(matches!(
            layout.encode(&(i128::from(i64::MIN) - 1), &mut buf, 0),
            Err(SdkError::Overflow { .. })
        ));
    }

    #[test]
    fn test_u8_range() {
        let layout = U8::new("vote");
        assert_eq!(roundtrip_int(&layout, 255), 255);
        let mut buf = [0u8; 1];
        assert!(matches!(
            layout.encode(&256, &mut buf, 0),
            Err(SdkError::Overflow { .. })
        ));
        assert!(matches!(
            layout.encode(&-3, &mut buf, 0),
            Err(SdkError::NegativeValue { value: -3, .. })
        ));
    }

    #[test]
    fn test_int_encode_respects_offset() {
        let layout = U64::new("amount");
        let mut buf = [0u8; 10];
        layout.encode(&1, &mut buf, 2).expect("should encode");
        assert_eq!(buf, [0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(layout.decode(&buf, 2).expect("should decode"), 1);
    }

    #[test]
    fn test_int_encode_overruns_buffer() {
        let layout = I64::new("start_timestamp");
        let mut buf = [0u8; 10];
        assert_eq!(
            layout.encode(&1, &mut buf, 3),
            Err(SdkError::BufferTooSmall {
                needed: 11,
                available: 10
            })
        );
    }

    #[test]
    fn test_text_padded_roundtrip() {
        let layout = FixedUtf8::new("token", 6);
        let padded = "SLIDE ".to_string();
        let mut buf = [0u8; 6];
        assert_eq!(layout.encode(&padded, &mut buf, 0), Ok(6));
        assert_eq!(&buf, b"SLIDE ");
        assert_eq!(layout.decode(&buf, 0).expect("should decode"), padded);
    }

    #[test]
    fn test_text_short_is_zero_filled() {
        let layout = FixedUtf8::new("token", 6);
        let mut buf = [0xAAu8; 6];
        assert_eq!(layout.encode(&"ab".to_string(), &mut buf, 0), Ok(2));
        assert_eq!(buf, [b'a', b'b', 0, 0, 0, 0]);
    }

    #[test]
    fn test_text_empty_at_zero_width() {
        let layout = FixedUtf8::new("empty", 0);
        let mut buf: [u8; 0] = [];
        assert_eq!(layout.encode(&String::new(), &mut buf, 0), Ok(0));
        assert_eq!(layout.decode(&buf, 0).expect("should decode"), "");
    }

    #[test]
    fn test_text_too_long() {
        let layout = FixedUtf8::new("token", 6);
        let mut buf = [0u8; 8];
        assert_eq!(
            layout.encode(&"SLIDEXY".to_string(), &mut buf, 0),
            Err(SdkError::FieldTooLong {
                field: "token".to_string(),
                width: 6,
                len: 7
            })
        );
    }

    #[test]
    fn test_text_multibyte_counts_bytes() {
        let layout = FixedUtf8::new("token", 4);
        let mut buf = [0u8; 4];
        // three chars, six bytes
        let result = layout.encode(&"ééé".to_string(), &mut buf, 0);
        assert!(matches!(result, Err(SdkError::FieldTooLong { len: 6, .. })));
    }

    #[test]
    fn test_text_decode_invalid_utf8() {
        let layout = FixedUtf8::new("title", 2);
        let result = layout.decode(&[0xff, 0xfe], 0);
        assert!(matches!(result, Err(SdkError::Deserialization(_))));
    }

    #[test]
    fn test_text_multibyte_full_width_roundtrip() {
        let layout = FixedUtf8::new("squad_name", 24);
        let text = "é".repeat(12);
        assert_eq!(text.len(), 24);
        let mut buf = [0u8; 24];
        assert_eq!(layout.encode(&text, &mut buf, 0), Ok(24));
        assert_eq!(layout.decode(&buf, 0), Ok(text));
    }

    proptest! {
        #[test]
        fn prop_u64_roundtrip(value in any::<u64>()) {
            let layout = U64::new("amount");
            prop_assert_eq!(roundtrip_int(&layout, i128::from(value)), i128::from(value));
        }

        #[test]
        fn prop_i64_roundtrip(value in any::<i64>()) {
            let layout = I64::new("timestamp");
            prop_assert_eq!(roundtrip_int(&layout, i128::from(value)), i128::from(value));
        }

        #[test]
        fn prop_u64_rejects_every_negative(value in i128::from(i64::MIN)..0i128) {
            let layout = U64::new("amount");
            let mut buf = [0u8; 8];
            let is_negative_error = matches!(
                layout.encode(&value, &mut buf, 0),
                Err(SdkError::NegativeValue { .. })
            );
            prop_assert!(is_negative_error);
        }

        #[test]
        fn prop_text_exact_width_roundtrip(text in "[ -~]{0,24}") {
            let layout = FixedUtf8::new("squad_name", 24);
            let padded = format!("{text:<24}");
            let mut buf = [0u8; 24];
            layout.encode(&padded, &mut buf, 0).expect("fits");
            prop_assert_eq!(layout.decode(&buf, 0).expect("decodes"), padded);
        }

        #[test]
        fn prop_multibyte_text_exact_width_roundtrip(text in "[a-zé€😀]{0,24}") {
            let layout = FixedUtf8::new("squad_name", 24);
            let padded = crate::schema::normalize_text(&text, 24);
            prop_assert_eq!(padded.len(), 24);
            let mut buf = [0u8; 24];
            layout.encode(&padded, &mut buf, 0).expect("fits");
            prop_assert_eq!(layout.decode(&buf, 0).expect("decodes"), padded);
        }
    }
}
