use crate::{CborError, ErrorCode};

/// Borrow a text item's payload as `&str`, failing with `Utf8Invalid` at the item's head offset.
#[inline]
pub fn text_at(raw: &[u8], off: usize) -> Result<&str, CborError> {
    #[cfg(feature = "simdutf8")]
    let checked = simdutf8::basic::from_utf8(raw).ok();
    #[cfg(not(feature = "simdutf8"))]
    let checked = core::str::from_utf8(raw).ok();

    checked.ok_or_else(|| CborError::decode(ErrorCode::Utf8Invalid, off))
}
