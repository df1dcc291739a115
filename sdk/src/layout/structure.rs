//! Composite layouts.
//!
//! A [`Structure`] is an ordered list of named [`Field`]s laid out back to
//! back. Field order is the wire order; nothing is reordered or aligned.

use crate::error::SdkError;

use super::primitives::{FixedUtf8, I64, U64, U8};
use super::{region, region_mut, Layout};

/// A decoded or to-be-encoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Any integer field. Range is checked against the field at encode time.
    Int(i128),
    /// A text field.
    Text(String),
    /// A sequence field.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Returns the integer value, if this is an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i128> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text value, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the elements, if this is a sequence.
    #[must_use]
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

macro_rules! impl_int_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i128::from(value))
                }
            }
        )*
    };
}

impl_int_value!(u8, u16, u32, u64, i8, i16, i32, i64);

impl From<i128> for FieldValue {
    fn from(value: i128) -> Self {
        Self::Int(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// How many elements a sequence field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceCount {
    /// Fixed capacity. Missing trailing elements are zero-filled.
    Fixed(usize),
    /// Length is carried by an earlier integer field with this name.
    CountedBy(&'static str),
}

/// The wire shape of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 64-bit little-endian integer.
    U64,
    /// Signed 64-bit little-endian integer.
    I64,
    /// Fixed-width UTF-8 text.
    FixedUtf8(usize),
    /// Zero bytes the program ignores. Never read back on decode.
    Reserved(usize),
    /// Repetitions of one fixed-span element.
    Sequence {
        /// Element layout.
        element: Box<FieldKind>,
        /// Element count rule.
        count: SequenceCount,
    },
}

impl FieldKind {
    /// Span in bytes, or `None` when it depends on a counted sequence.
    #[must_use]
    pub fn fixed_span(&self) -> Option<usize> {
        match self {
            Self::U8 => Some(1),
            Self::U64 | Self::I64 => Some(8),
            Self::FixedUtf8(width) | Self::Reserved(width) => Some(*width),
            Self::Sequence {
                element,
                count: SequenceCount::Fixed(n),
            } => element.fixed_span().and_then(|span| span.checked_mul(*n)),
            Self::Sequence {
                count: SequenceCount::CountedBy(_),
                ..
            } => None,
        }
    }

    fn element_span(name: &str, element: &FieldKind) -> Result<usize, SdkError> {
        element.fixed_span().ok_or_else(|| {
            SdkError::Serialization(format!(
                "sequence `{name}` must have a fixed-span element"
            ))
        })
    }

    /// Span this field takes when holding `value`.
    fn span_for(&self, name: &str, value: &FieldValue) -> Result<usize, SdkError> {
        match self {
            Self::Sequence {
                element,
                count: SequenceCount::CountedBy(_),
            } => {
                let elements = expect_list(name, value)?;
                Self::element_span(name, element)?
                    .checked_mul(elements.len())
                    .ok_or_else(|| SdkError::Overflow {
                        field: name.to_string(),
                    })
            }
            _ => self.fixed_span().ok_or_else(|| SdkError::Overflow {
                field: name.to_string(),
            }),
        }
    }

    fn encode(
        &self,
        name: &'static str,
        value: &FieldValue,
        buf: &mut [u8],
        offset: usize,
    ) -> Result<usize, SdkError> {
        match self {
            Self::U8 => U8::new(name).encode(&expect_int(name, value)?, buf, offset),
            Self::U64 => U64::new(name).encode(&expect_int(name, value)?, buf, offset),
            Self::I64 => I64::new(name).encode(&expect_int(name, value)?, buf, offset),
            Self::FixedUtf8(width) => {
                let text = expect_text(name, value)?.to_string();
                FixedUtf8::new(name, *width).encode(&text, buf, offset)?;
                Ok(*width)
            }
            Self::Reserved(width) => {
                region_mut(buf, offset, *width)?.fill(0);
                Ok(*width)
            }
            Self::Sequence { element, count } => {
                let elements = expect_list(name, value)?;
                let element_span = Self::element_span(name, element)?;
                let slots = match count {
                    SequenceCount::Fixed(capacity) => {
                        if elements.len() > *capacity {
                            return Err(SdkError::TooManyElements {
                                field: name.to_string(),
                                max: *capacity,
                                actual: elements.len(),
                            });
                        }
                        *capacity
                    }
                    SequenceCount::CountedBy(_) => elements.len(),
                };
                let total = element_span.checked_mul(slots).ok_or_else(|| SdkError::Overflow {
                    field: name.to_string(),
                })?;
                region_mut(buf, offset, total)?.fill(0);

                let mut cursor = offset;
                for item in elements {
                    element.encode(name, item, buf, cursor)?;
                    cursor += element_span;
                }
                Ok(total)
            }
        }
    }

    fn decode(
        &self,
        name: &'static str,
        buf: &[u8],
        offset: usize,
        count_hint: Option<usize>,
    ) -> Result<(FieldValue, usize), SdkError> {
        match self {
            Self::U8 => Ok((FieldValue::Int(U8::new(name).decode(buf, offset)?), 1)),
            Self::U64 => Ok((FieldValue::Int(U64::new(name).decode(buf, offset)?), 8)),
            Self::I64 => Ok((FieldValue::Int(I64::new(name).decode(buf, offset)?), 8)),
            Self::FixedUtf8(width) => Ok((
                FieldValue::Text(FixedUtf8::new(name, *width).decode(buf, offset)?),
                *width,
            )),
            Self::Reserved(width) => {
                region(buf, offset, *width)?;
                Ok((FieldValue::List(Vec::new()), *width))
            }
            Self::Sequence { element, count } => {
                let element_span = Self::element_span(name, element)?;
                let slots = match count {
                    SequenceCount::Fixed(capacity) => *capacity,
                    SequenceCount::CountedBy(counter) => count_hint.ok_or_else(|| {
                        SdkError::Deserialization(format!(
                            "sequence `{name}` is counted by missing field `{counter}`"
                        ))
                    })?,
                };
                let needed = element_span
                    .checked_mul(slots)
                    .and_then(|total| total.checked_add(offset))
                    .unwrap_or(usize::MAX);
                if needed > buf.len() {
                    return Err(SdkError::BufferTooSmall {
                        needed,
                        available: buf.len(),
                    });
                }

                let mut elements = Vec::with_capacity(slots);
                let mut cursor = offset;
                for _ in 0..slots {
                    let (item, _) = element.decode(name, buf, cursor, None)?;
                    elements.push(item);
                    cursor += element_span;
                }
                Ok((FieldValue::List(elements), cursor - offset))
            }
        }
    }
}

fn expect_int(name: &str, value: &FieldValue) -> Result<i128, SdkError> {
    value
        .as_int()
        .ok_or_else(|| SdkError::Serialization(format!("field `{name}` expects an integer")))
}

fn expect_text<'a>(name: &str, value: &'a FieldValue) -> Result<&'a str, SdkError> {
    value
        .as_text()
        .ok_or_else(|| SdkError::Serialization(format!("field `{name}` expects text")))
}

fn expect_list<'a>(name: &str, value: &'a FieldValue) -> Result<&'a [FieldValue], SdkError> {
    value
        .as_list()
        .ok_or_else(|| SdkError::Serialization(format!("field `{name}` expects a sequence")))
}

/// One named field of a [`Structure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    kind: FieldKind,
    optional: bool,
}

impl Field {
    /// Creates a field of the given kind.
    #[must_use]
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            optional: false,
        }
    }

    /// `u8` field.
    #[must_use]
    pub fn u8(name: &'static str) -> Self {
        Self::new(name, FieldKind::U8)
    }

    /// `u64` field.
    #[must_use]
    pub fn u64(name: &'static str) -> Self {
        Self::new(name, FieldKind::U64)
    }

    /// `i64` field.
    #[must_use]
    pub fn i64(name: &'static str) -> Self {
        Self::new(name, FieldKind::I64)
    }

    /// Fixed-width text field.
    #[must_use]
    pub fn fixed_utf8(name: &'static str, width: usize) -> Self {
        Self::new(name, FieldKind::FixedUtf8(width))
    }

    /// Zero-filled gap the program skips.
    #[must_use]
    pub fn reserved(width: usize) -> Self {
        Self::new("", FieldKind::Reserved(width))
    }

    /// Sequence of `element` repeated per `count`.
    #[must_use]
    pub fn sequence(name: &'static str, element: FieldKind, count: SequenceCount) -> Self {
        Self::new(
            name,
            FieldKind::Sequence {
                element: Box::new(element),
                count,
            },
        )
    }

    /// Marks the field as an optional trailing field.
    ///
    /// Optional fields must come last. Once one is absent, every later
    /// optional field must be absent too.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Field kind.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether the field may be omitted.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    fn is_reserved(&self) -> bool {
        matches!(self.kind, FieldKind::Reserved(_))
    }
}

/// Ordered, named field values matching a [`Structure`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(&'static str, FieldValue)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a value, builder style.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, name: &'static str, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Looks up a value by field name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Returns true if the record holds `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the record is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }
}

/// An ordered composite layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    fields: Vec<Field>,
}

impl Structure {
    /// Creates a structure from fields in wire order.
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Fields in wire order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Span of the required fields alone, or `None` if a required field is a
    /// counted sequence.
    #[must_use]
    pub fn base_span(&self) -> Option<usize> {
        self.fields
            .iter()
            .filter(|field| !field.optional)
            .try_fold(0usize, |total, field| {
                field
                    .kind
                    .fixed_span()
                    .and_then(|span| total.checked_add(span))
            })
    }

    /// Walks the fields that `record` populates, yielding each with its value.
    ///
    /// Reserved fields yield `None`. Validates presence, trailing-optional
    /// ordering and counted-sequence lengths.
    fn present_fields<'a>(
        &'a self,
        record: &'a Record,
    ) -> Result<Vec<(&'a Field, Option<&'a FieldValue>)>, SdkError> {
        let mut present = Vec::with_capacity(self.fields.len());
        let mut trailing_absent = None;

        for field in &self.fields {
            if field.is_reserved() {
                present.push((field, None));
                continue;
            }
            match record.get(field.name) {
                Some(value) => {
                    if let Some(absent) = trailing_absent {
                        return Err(SdkError::Serialization(format!(
                            "optional field `{}` is set but earlier field `{absent}` is not",
                            field.name
                        )));
                    }
                    if let FieldKind::Sequence {
                        count: SequenceCount::CountedBy(counter),
                        ..
                    } = &field.kind
                    {
                        check_count(record, field.name, counter, value)?;
                    }
                    present.push((field, Some(value)));
                }
                None if field.optional => {
                    trailing_absent.get_or_insert(field.name);
                }
                None => return Err(SdkError::MissingField(field.name.to_string())),
            }
        }

        Ok(present)
    }

    /// Number of bytes `record` encodes to.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not fit this structure.
    pub fn span(&self, record: &Record) -> Result<usize, SdkError> {
        self.present_fields(record)?
            .into_iter()
            .try_fold(0usize, |total, (field, value)| {
                let span = match value {
                    Some(value) => field.kind.span_for(field.name, value)?,
                    None => field.kind.fixed_span().unwrap_or(0),
                };
                total.checked_add(span).ok_or_else(|| SdkError::Overflow {
                    field: field.name.to_string(),
                })
            })
    }

    /// Encodes `record` at the start of `buf`.
    ///
    /// Returns the number of bytes written. Nothing is written when the
    /// record is invalid or `buf` is too small.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing field, an out-of-range value or a
    /// buffer shorter than [`Structure::span`].
    pub fn encode(&self, record: &Record, buf: &mut [u8]) -> Result<usize, SdkError> {
        let needed = self.span(record)?;
        if buf.len() < needed {
            return Err(SdkError::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }

        // `buf` is untouched unless every field encodes.
        let mut scratch = vec![0u8; needed];
        let mut offset = 0usize;
        for (field, value) in self.present_fields(record)? {
            offset += match value {
                Some(value) => field.kind.encode(field.name, value, &mut scratch, offset)?,
                None => field.kind.encode(
                    field.name,
                    &FieldValue::List(Vec::new()),
                    &mut scratch,
                    offset,
                )?,
            };
        }

        region_mut(buf, 0, needed)?.copy_from_slice(&scratch);
        Ok(needed)
    }

    /// Encodes `record` into a buffer that must be exactly its span.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::BufferTooSmall`] or [`SdkError::BufferSizeMismatch`]
    /// when `buf` has the wrong length, or any encode error.
    pub fn encode_exact(&self, record: &Record, buf: &mut [u8]) -> Result<(), SdkError> {
        let written = self.encode(record, buf)?;
        if written != buf.len() {
            return Err(SdkError::BufferSizeMismatch {
                expected: written,
                actual: buf.len(),
            });
        }
        Ok(())
    }

    /// Encodes `record` into a freshly allocated buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not fit this structure.
    pub fn encode_to_vec(&self, record: &Record) -> Result<Vec<u8>, SdkError> {
        let mut buf = vec![0u8; self.span(record)?];
        self.encode(record, &mut buf)?;
        Ok(buf)
    }

    /// Decodes a record from the start of `buf`.
    ///
    /// Optional trailing fields are decoded only when enough bytes remain.
    /// Every byte of `buf` must belong to a decoded field.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field runs past the buffer, holds
    /// invalid data, or bytes remain after the last field.
    pub fn decode(&self, buf: &[u8]) -> Result<Record, SdkError> {
        let mut record = Record::new();
        let mut offset = 0usize;

        for field in &self.fields {
            if field.optional {
                let remaining = buf.len().saturating_sub(offset);
                let fits = field
                    .kind
                    .fixed_span()
                    .is_some_and(|span| span <= remaining);
                if !fits {
                    break;
                }
            }

            let count_hint = match &field.kind {
                FieldKind::Sequence {
                    count: SequenceCount::CountedBy(counter),
                    ..
                } => record
                    .get(counter)
                    .and_then(FieldValue::as_int)
                    .and_then(|n| usize::try_from(n).ok()),
                _ => None,
            };

            let (value, span) = field.kind.decode(field.name, buf, offset, count_hint)?;
            if !field.is_reserved() {
                record.insert(field.name, value);
            }
            offset += span;
        }

        if offset != buf.len() {
            return Err(SdkError::Deserialization(format!(
                "{} trailing bytes after offset {offset}",
                buf.len().saturating_sub(offset)
            )));
        }

        Ok(record)
    }
}

fn check_count(
    record: &Record,
    name: &str,
    counter: &str,
    value: &FieldValue,
) -> Result<(), SdkError> {
    let elements = expect_list(name, value)?.len();
    let declared = record
        .get(counter)
        .and_then(FieldValue::as_int)
        .ok_or_else(|| SdkError::MissingField(counter.to_string()))?;
    if usize::try_from(declared).ok() != Some(elements) {
        return Err(SdkError::Serialization(format!(
            "`{counter}` is {declared} but `{name}` has {elements} elements"
        )));
    }
    Ok(())
}
