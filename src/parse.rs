use alloc::vec::Vec;

use crate::context::Context;
use crate::limits::ParseLimits;
use crate::value::{Array, Map, Value};
use crate::wire::{self, len_to_usize, read_arg};
use crate::{CborError, ErrorCode};

struct Parser<'a> {
    ctx: &'a Context,
    data: &'a [u8],
    pos: usize,
    depth: usize,
    limits: ParseLimits,
}

/// Parse the first item of `data` and report how many bytes it took.
pub fn parse_item(
    ctx: &Context,
    data: &[u8],
    limits: ParseLimits,
) -> Result<(Value, usize), CborError> {
    let mut p = Parser {
        ctx,
        data,
        pos: 0,
        depth: 0,
        limits,
    };
    let value = p.item()?;
    Ok((value, p.pos))
}

impl Parser<'_> {
    #[inline]
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn item(&mut self) -> Result<Value, CborError> {
        let off = self.pos;
        let ib = wire::read_u8(self.data, &mut self.pos)?;
        let major = ib >> 5;
        let ai = ib & 0x1f;

        if major == 7 {
            return self.simple(ai, off);
        }
        if major == 6 {
            return Err(CborError::decode(ErrorCode::TagUnsupported, off));
        }

        let arg = read_arg(self.data, &mut self.pos, ai, off)?;
        match major {
            0 => Ok(Value::Positive(arg)),
            1 => Ok(Value::Negative(arg)),
            2 => {
                let len = len_to_usize(arg, off)?;
                if len > self.limits.max_bytes_len {
                    return Err(CborError::decode(ErrorCode::BytesLenLimitExceeded, off));
                }
                let bytes = wire::read_exact(self.data, &mut self.pos, len)?;
                Ok(self.ctx.bytes(bytes))
            }
            3 => {
                let len = len_to_usize(arg, off)?;
                if len > self.limits.max_text_len {
                    return Err(CborError::decode(ErrorCode::TextLenLimitExceeded, off));
                }
                let raw = wire::read_exact(self.data, &mut self.pos, len)?;
                Ok(self.ctx.text(crate::utf8::text_at(raw, off)?))
            }
            4 => self.array(arg, off),
            5 => self.map(arg, off),
            _ => unreachable!("major type is three bits"),
        }
    }

    fn simple(&mut self, ai: u8, off: usize) -> Result<Value, CborError> {
        match ai {
            20 => Ok(Value::Bool(false)),
            21 => Ok(Value::Bool(true)),
            22 => Ok(Value::Null),
            23 => Ok(Value::Undefined),
            25 => Ok(Value::Half(wire::read_be_u16(self.data, &mut self.pos)?)),
            26 => Ok(Value::Single(f32::from_bits(wire::read_be_u32(
                self.data,
                &mut self.pos,
            )?))),
            27 => Ok(Value::Double(f64::from_bits(wire::read_be_u64(
                self.data,
                &mut self.pos,
            )?))),
            // Break-stop: recognized as a one-byte item, nothing is accumulated.
            31 => Ok(Value::Undefined),
            _ => Ok(Value::Positive(read_arg(self.data, &mut self.pos, ai, off)?)),
        }
    }

    fn enter(&mut self, off: usize) -> Result<(), CborError> {
        if self.depth >= self.limits.max_depth {
            return Err(CborError::decode(ErrorCode::DepthLimitExceeded, off));
        }
        self.depth += 1;
        Ok(())
    }

    fn array(&mut self, arg: u64, off: usize) -> Result<Value, CborError> {
        let len = len_to_usize(arg, off)?;
        if len > self.limits.max_array_len {
            return Err(CborError::decode(ErrorCode::ArrayLenLimitExceeded, off));
        }
        self.enter(off)?;
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(self.item()?);
        }
        self.depth -= 1;
        Ok(Value::Array(Array::from_vec(self.ctx.id(), items)))
    }

    fn map(&mut self, arg: u64, off: usize) -> Result<Value, CborError> {
        let len = len_to_usize(arg, off)?;
        if len > self.limits.max_map_len {
            return Err(CborError::decode(ErrorCode::MapLenLimitExceeded, off));
        }
        self.enter(off)?;
        let mut entries = Vec::with_capacity(len.min(self.remaining() / 2));
        for _ in 0..len {
            let key = self.item()?;
            let value = self.item()?;
            entries.push((key, value));
        }
        self.depth -= 1;
        Ok(Value::Map(Map::from_vec(self.ctx.id(), entries)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &[u8]) -> Result<(Value, usize), CborError> {
        parse_item(&Context::new(), data, ParseLimits::default())
    }

    #[test]
    fn simple_values() {
        assert_eq!(parse(&[0xf4]).unwrap(), (Value::Bool(false), 1));
        assert_eq!(parse(&[0xf5]).unwrap(), (Value::Bool(true), 1));
        assert_eq!(parse(&[0xf6]).unwrap(), (Value::Null, 1));
        assert_eq!(parse(&[0xf7]).unwrap(), (Value::Undefined, 1));
        assert_eq!(parse(&[0xf0]).unwrap(), (Value::Positive(16), 1));
        assert_eq!(parse(&[0xf8, 0x20]).unwrap(), (Value::Positive(32), 2));
    }

    #[test]
    fn break_stop_consumes_one_byte() {
        assert_eq!(parse(&[0xff, 0x00]).unwrap(), (Value::Undefined, 1));
    }

    #[test]
    fn floats() {
        assert_eq!(parse(&[0xf9, 0x3c, 0x00]).unwrap(), (Value::Half(0x3c00), 3));
        assert_eq!(
            parse(&[0xfa, 0x3f, 0x80, 0x00, 0x00]).unwrap(),
            (Value::Single(1.0), 5)
        );
        assert_eq!(
            parse(&[0xfb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]).unwrap(),
            (Value::Double(1.5), 9)
        );
    }

    #[test]
    fn only_first_item_is_consumed() {
        assert_eq!(parse(&[0x01, 0x02]).unwrap(), (Value::Positive(1), 1));
    }

    #[test]
    fn rejects_tags_and_indefinite() {
        assert_eq!(
            parse(&[0xc1, 0x00]).unwrap_err().code,
            ErrorCode::TagUnsupported
        );
        assert_eq!(
            parse(&[0x9f, 0x01, 0xff]).unwrap_err().code,
            ErrorCode::IndefiniteLengthUnsupported
        );
        assert_eq!(
            parse(&[0x1e]).unwrap_err().code,
            ErrorCode::ReservedAdditionalInfo
        );
    }

    #[test]
    fn nested_failure_propagates() {
        // [1, <truncated u16>]
        let err = parse(&[0x82, 0x01, 0x19, 0x01]).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedEof);
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn invalid_utf8() {
        let err = parse(&[0x62, 0xc3, 0x28]).unwrap_err();
        assert_eq!(err.code, ErrorCode::Utf8Invalid);
    }

    #[test]
    fn huge_declared_length_does_not_allocate() {
        let err = parse(&[0x9b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00]).unwrap_err();
        assert!(matches!(
            err.code,
            ErrorCode::UnexpectedEof | ErrorCode::LengthOverflow
        ));
    }

    #[test]
    fn depth_limit() {
        let data = [0x81, 0x81, 0x81, 0x00];
        let limits = ParseLimits::default().with_max_depth(2);
        let err = parse_item(&Context::new(), &data, limits).unwrap_err();
        assert_eq!(err.code, ErrorCode::DepthLimitExceeded);
        assert_eq!(err.offset, 2);
        let limits = ParseLimits::default().with_max_depth(3);
        assert!(parse_item(&Context::new(), &data, limits).is_ok());
    }

    #[test]
    fn length_limits() {
        let limits = ParseLimits::for_bytes(2);
        let ctx = Context::new();
        let err = parse_item(&ctx, &[0x63, b'a', b'b', b'c'], limits).unwrap_err();
        assert_eq!(err.code, ErrorCode::TextLenLimitExceeded);
        let err = parse_item(&ctx, &[0x83, 0x01, 0x02, 0x03], limits).unwrap_err();
        assert_eq!(err.code, ErrorCode::ArrayLenLimitExceeded);
    }
}
