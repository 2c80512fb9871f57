/// Default maximum nesting depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default maximum container length limit for arrays/maps used by [`ParseLimits::for_bytes`].
///
/// This is a safety limit; adjust explicitly for your deployment.
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 1 << 16;

/// Parse-time resource limits.
///
/// Every limit violation is a parse failure. Independently of these limits, the parser never
/// preallocates more container slots than there are remaining input bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum nesting depth of arrays/maps.
    pub max_depth: usize,
    /// Maximum array length.
    pub max_array_len: usize,
    /// Maximum map length (pairs).
    pub max_map_len: usize,
    /// Maximum byte-string length.
    pub max_bytes_len: usize,
    /// Maximum text-string length in UTF-8 bytes.
    pub max_text_len: usize,
}

impl Default for ParseLimits {
    /// Depth is capped at [`DEFAULT_MAX_DEPTH`]; lengths are bounded only by the input.
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_len: usize::MAX,
            max_map_len: usize::MAX,
            max_bytes_len: usize::MAX,
            max_text_len: usize::MAX,
        }
    }
}

impl ParseLimits {
    /// Construct conservative limits derived from a maximum message size.
    ///
    /// String lengths are capped by `max_message_bytes`; array and map lengths additionally by
    /// [`DEFAULT_MAX_CONTAINER_LEN`].
    #[must_use]
    pub fn for_bytes(max_message_bytes: usize) -> Self {
        let max_container_len = max_message_bytes.min(DEFAULT_MAX_CONTAINER_LEN);
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_len: max_container_len,
            max_map_len: max_container_len,
            max_bytes_len: max_message_bytes,
            max_text_len: max_message_bytes,
        }
    }

    /// Return these limits with a different nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
