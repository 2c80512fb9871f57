use core::fmt;

/// The high-level class of an error.
///
/// - **Decode** errors: the byte stream is malformed, truncated, unsupported, or over limits.
/// - **Map** errors: a [`Value`](crate::Value) does not have the shape a native type expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Binary parse failure.
    Decode,
    /// Value-to-native mapping failure.
    Map,
}

/// A structured error code identifying the reason an operation failed.
///
/// This enum is string-free to stay usable without `std`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Unexpected end-of-input while decoding.
    UnexpectedEof,
    /// Arithmetic overflow while computing a length/offset.
    LengthOverflow,
    /// Input contains trailing bytes after the single data item.
    TrailingBytes,

    /// Nesting depth limit exceeded.
    DepthLimitExceeded,
    /// Array length exceeds limits.
    ArrayLenLimitExceeded,
    /// Map length exceeds limits.
    MapLenLimitExceeded,
    /// Byte string length exceeds limits.
    BytesLenLimitExceeded,
    /// Text string length exceeds limits.
    TextLenLimitExceeded,

    /// Reserved additional-info value (28..30) was used.
    ReservedAdditionalInfo,
    /// Indefinite-length encoding was used for a string or container.
    IndefiniteLengthUnsupported,
    /// A tag (major type 6) was encountered.
    TagUnsupported,
    /// Invalid UTF-8 in a text string.
    Utf8Invalid,

    /// A field marked required has no entry in the source map.
    MissingRequiredField,
    /// No union variant matches the value's kind tag or case.
    UnresolvableUnionVariant,
    /// Expected `null`.
    ExpectedNull,
    /// Expected a boolean.
    ExpectedBool,
    /// Expected an integer.
    ExpectedInteger,
    /// Integer does not fit the target type.
    IntegerOutOfRange,
    /// Expected a floating-point number.
    ExpectedFloat,
    /// Expected a text string.
    ExpectedText,
    /// Expected a byte string.
    ExpectedBytes,
    /// Expected an array.
    ExpectedArray,
    /// Expected a map.
    ExpectedMap,
    /// Text does not name a known enum variant.
    UnknownVariant,
    /// Array length does not match the fixed arity of the target.
    LengthMismatch,
    /// A field converter rejected its input.
    ConversionFailed,
}

/// An error with a kind, a stable code, a byte offset, and an optional field key.
///
/// Offsets are meaningful for `Decode` errors. For `Map` errors the offset is `0` and `key`
/// names the innermost map key whose value failed to map, when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CborError {
    /// The error kind.
    pub kind: ErrorKind,
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset into the input where the error was detected (0 for map errors).
    pub offset: usize,
    /// Innermost map key involved in a mapping failure.
    pub key: Option<&'static str>,
}

impl CborError {
    /// Construct a decode error at `offset`.
    #[inline]
    #[must_use]
    pub const fn decode(code: ErrorCode, offset: usize) -> Self {
        Self {
            kind: ErrorKind::Decode,
            code,
            offset,
            key: None,
        }
    }

    /// Construct a mapping error.
    #[inline]
    #[must_use]
    pub const fn mapping(code: ErrorCode) -> Self {
        Self {
            kind: ErrorKind::Map,
            code,
            offset: 0,
            key: None,
        }
    }

    /// Attach `key` unless a more specific (inner) key is already recorded.
    #[inline]
    #[must_use]
    pub const fn with_key(mut self, key: &'static str) -> Self {
        if self.key.is_none() {
            self.key = Some(key);
        }
        self
    }

    /// Returns true iff this error came from the binary parser.
    #[inline]
    #[must_use]
    pub const fn is_decode(self) -> bool {
        matches!(self.kind, ErrorKind::Decode)
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::UnexpectedEof => "unexpected end of input",
            ErrorCode::LengthOverflow => "length overflow",
            ErrorCode::TrailingBytes => "trailing bytes after single CBOR item",

            ErrorCode::DepthLimitExceeded => "nesting depth limit exceeded",
            ErrorCode::ArrayLenLimitExceeded => "array length exceeds parse limits",
            ErrorCode::MapLenLimitExceeded => "map length exceeds parse limits",
            ErrorCode::BytesLenLimitExceeded => "byte string length exceeds parse limits",
            ErrorCode::TextLenLimitExceeded => "text string length exceeds parse limits",

            ErrorCode::ReservedAdditionalInfo => "reserved additional info value",
            ErrorCode::IndefiniteLengthUnsupported => "indefinite length not supported",
            ErrorCode::TagUnsupported => "CBOR tags are not supported",
            ErrorCode::Utf8Invalid => "text must be valid UTF-8",

            ErrorCode::MissingRequiredField => "missing required field",
            ErrorCode::UnresolvableUnionVariant => "no union variant matches value",
            ErrorCode::ExpectedNull => "expected null",
            ErrorCode::ExpectedBool => "expected bool",
            ErrorCode::ExpectedInteger => "expected integer",
            ErrorCode::IntegerOutOfRange => "integer out of range for target type",
            ErrorCode::ExpectedFloat => "expected float",
            ErrorCode::ExpectedText => "expected text string",
            ErrorCode::ExpectedBytes => "expected byte string",
            ErrorCode::ExpectedArray => "expected array",
            ErrorCode::ExpectedMap => "expected map",
            ErrorCode::UnknownVariant => "unknown enum variant",
            ErrorCode::LengthMismatch => "array length mismatch",
            ErrorCode::ConversionFailed => "field converter rejected value",
        };

        match (self.kind, self.key) {
            (ErrorKind::Decode, _) => write!(f, "cbor decode failed at {}: {msg}", self.offset),
            (ErrorKind::Map, Some(key)) => write!(f, "cbor mapping failed at `{key}`: {msg}"),
            (ErrorKind::Map, None) => write!(f, "cbor mapping failed: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CborError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn inner_key_wins() {
        let err = CborError::mapping(ErrorCode::ExpectedText)
            .with_key("inner")
            .with_key("outer");
        assert_eq!(err.key, Some("inner"));
        assert_eq!(
            err.to_string(),
            "cbor mapping failed at `inner`: expected text string"
        );
    }

    #[test]
    fn decode_display_has_offset() {
        let err = CborError::decode(ErrorCode::TagUnsupported, 7);
        assert!(err.is_decode());
        assert_eq!(
            err.to_string(),
            "cbor decode failed at 7: CBOR tags are not supported"
        );
    }
}
