use crate::{CborError, ErrorCode};

pub fn read_u8(data: &[u8], pos: &mut usize) -> Result<u8, CborError> {
    let off = *pos;
    let b = *data
        .get(*pos)
        .ok_or_else(|| CborError::decode(ErrorCode::UnexpectedEof, off))?;
    *pos += 1;
    Ok(b)
}

pub fn read_exact<'a>(data: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8], CborError> {
    let off = *pos;
    let end = pos
        .checked_add(n)
        .ok_or_else(|| CborError::decode(ErrorCode::LengthOverflow, off))?;
    if end > data.len() {
        return Err(CborError::decode(ErrorCode::UnexpectedEof, off));
    }
    let s = &data[*pos..end];
    *pos = end;
    Ok(s)
}

pub fn read_be_u16(data: &[u8], pos: &mut usize) -> Result<u16, CborError> {
    let s = read_exact(data, pos, 2)?;
    Ok(u16::from_be_bytes([s[0], s[1]]))
}

pub fn read_be_u32(data: &[u8], pos: &mut usize) -> Result<u32, CborError> {
    let s = read_exact(data, pos, 4)?;
    Ok(u32::from_be_bytes([s[0], s[1], s[2], s[3]]))
}

pub fn read_be_u64(data: &[u8], pos: &mut usize) -> Result<u64, CborError> {
    let s = read_exact(data, pos, 8)?;
    Ok(u64::from_be_bytes([
        s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7],
    ]))
}

/// Read the argument selected by `ai`. Any width is accepted; overlong forms are not rejected.
pub fn read_arg(data: &[u8], pos: &mut usize, ai: u8, off: usize) -> Result<u64, CborError> {
    match ai {
        0..=23 => Ok(u64::from(ai)),
        24 => Ok(u64::from(read_u8(data, pos)?)),
        25 => Ok(u64::from(read_be_u16(data, pos)?)),
        26 => Ok(u64::from(read_be_u32(data, pos)?)),
        27 => Ok(read_be_u64(data, pos)?),
        31 => Err(CborError::decode(ErrorCode::IndefiniteLengthUnsupported, off)),
        _ => Err(CborError::decode(ErrorCode::ReservedAdditionalInfo, off)),
    }
}

pub fn len_to_usize(len: u64, off: usize) -> Result<usize, CborError> {
    usize::try_from(len).map_err(|_| CborError::decode(ErrorCode::LengthOverflow, off))
}

/// Write a head byte for `major` with the shortest argument encoding of `value`.
pub fn write_head(out: &mut alloc::vec::Vec<u8>, major: u8, value: u64) {
    debug_assert!(major <= 7);
    if let Ok(v8) = u8::try_from(value) {
        if v8 < 24 {
            out.push((major << 5) | v8);
            return;
        }
        out.push((major << 5) | 24);
        out.push(v8);
        return;
    }
    if let Ok(v16) = u16::try_from(value) {
        out.push((major << 5) | 25);
        out.extend_from_slice(&v16.to_be_bytes());
        return;
    }
    if let Ok(v32) = u32::try_from(value) {
        out.push((major << 5) | 26);
        out.extend_from_slice(&v32.to_be_bytes());
        return;
    }
    out.push((major << 5) | 27);
    out.extend_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn head(major: u8, value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_head(&mut out, major, value);
        out
    }

    #[test]
    fn head_width_boundaries() {
        assert_eq!(head(0, 0), [0x00]);
        assert_eq!(head(0, 23), [0x17]);
        assert_eq!(head(0, 24), [0x18, 0x18]);
        assert_eq!(head(0, 255), [0x18, 0xff]);
        assert_eq!(head(0, 256), [0x19, 0x01, 0x00]);
        assert_eq!(head(0, 65_535), [0x19, 0xff, 0xff]);
        assert_eq!(head(0, 65_536), [0x1a, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(head(0, 0xffff_ffff), [0x1a, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(
            head(0, 0x1_0000_0000),
            [0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(head(5, 2), [0xa2]);
    }

    #[test]
    fn read_arg_accepts_overlong() {
        let data = [0x00, 0x05];
        let mut pos = 0;
        assert_eq!(read_arg(&data, &mut pos, 25, 0).unwrap(), 5);
        assert_eq!(pos, 2);
    }

    #[test]
    fn read_arg_rejects_reserved_and_truncated() {
        let mut pos = 0;
        let err = read_arg(&[], &mut pos, 29, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservedAdditionalInfo);
        let err = read_arg(&[0x01], &mut pos, 26, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedEof);
    }
}
