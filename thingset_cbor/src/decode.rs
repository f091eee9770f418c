/***************************************************************************************************
 * Copyright (c) 2022, 2023, Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * CBOR Decoder
 *
 * A reduced-profile CBOR deserializer for the ThingSet protocol. Decoding accepts any valid
 * shortest-or-longer form of the expected major type and narrows values with a range check.
 * Text and byte strings are borrowed zero-copy from the parse buffer. Indefinite-length items
 * are not part of the profile and are rejected as malformed. This implementation is designed
 * for use in constrained systems and requires neither the Rust standard library nor an
 * allocator.
 **************************************************************************************************/
use crate::constants::*;
use crate::error::{CBORError, Result};

use std::str::from_utf8;

#[cfg(feature = "float")]
use half::f16;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// `SequenceBuffer` is constructed over a byte slice and keeps track of the current parse
/// position. CBOR strings borrow immutably from the underlying buffer, which must therefore
/// outlive the decoded items (the `'buf` lifetime).
#[derive(Debug, Copy, Clone)]
pub struct SequenceBuffer<'buf> {
    bytes: &'buf [u8],
    index: usize,
}

impl<'buf> SequenceBuffer<'buf> {
    /// Construct an instance of `SequenceBuffer` over a slice of CBOR input.
    #[inline]
    pub fn new(init: &'buf [u8]) -> SequenceBuffer<'buf> {
        SequenceBuffer {
            bytes: init,
            index: 0,
        }
    }

    /// `true` once every byte of the input has been consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.index >= self.bytes.len()
    }

    /// Number of bytes left to parse.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.index)
    }

    /// Current parse position, counted from the start of the input.
    #[inline]
    pub fn position(&self) -> usize {
        self.index
    }

    /// The raw initial byte of the next item, without consuming anything.
    #[inline]
    pub fn peek(&self) -> Result<u8> {
        self.bytes
            .get(self.index)
            .copied()
            .ok_or(CBORError::EndOfBuffer)
    }

    /// Major type bits of the next item, without consuming anything.
    #[inline]
    pub fn peek_major(&self) -> Result<u8> {
        Ok(self.peek()? & MT_MASK)
    }

    /// `true` if the next item is the simple value `undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self.peek(), Ok(SIMPLE_UNDEFINED))
    }

    /// `true` if the next item is the simple value `null`.
    pub fn is_null(&self) -> bool {
        matches!(self.peek(), Ok(SIMPLE_NULL))
    }

    /// Fetch `n` raw bytes and advance over them.
    fn take_bytes(&mut self, n: usize) -> Result<&'buf [u8]> {
        if self.index + n <= self.bytes.len() {
            let s = &self.bytes[self.index..self.index + n];
            self.index += n;
            Ok(s)
        } else {
            Err(CBORError::EndOfBuffer)
        }
    }

    /// Read the initial byte plus any extension bytes of the next item, returning its major
    /// type and argument value. Indefinite-length markers (AI 31) and the reserved AI values
    /// are rejected.
    fn item_head(&mut self) -> Result<(u8, u64)> {
        let ib = self.peek()?;
        let mt = ib & MT_MASK;
        let ai = ib & AI_MASK;
        self.index += 1;
        let value = match ai {
            0..=PAYLOAD_AI_BITS => ai as u64,
            PAYLOAD_ONE_BYTE => self.take_bytes(1)?[0] as u64,
            PAYLOAD_TWO_BYTES => {
                let b = self.take_bytes(2)?;
                u16::from_be_bytes([b[0], b[1]]) as u64
            }
            PAYLOAD_FOUR_BYTES => {
                let b = self.take_bytes(4)?;
                u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as u64
            }
            PAYLOAD_EIGHT_BYTES => {
                let b = self.take_bytes(8)?;
                u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
            }
            _ => return Err(CBORError::AIError),
        };
        Ok((mt, value))
    }

    /// Take an unsigned integer (major type 0) of any width.
    #[cfg_attr(feature = "trace", trace)]
    pub fn take_uint(&mut self) -> Result<u64> {
        match self.item_head()? {
            (MT_UINT, v) => Ok(v),
            _ => Err(CBORError::ExpectedType("uint")),
        }
    }

    /// Take a signed integer (major type 0 or 1) of any width, narrowing to `i64`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn take_int(&mut self) -> Result<i64> {
        match self.item_head()? {
            (MT_UINT, v) => i64::try_from(v).map_err(|_| CBORError::OutOfRange),
            (MT_NINT, v) => {
                if v <= i64::MAX as u64 {
                    Ok(-1 - v as i64)
                } else {
                    Err(CBORError::OutOfRange)
                }
            }
            _ => Err(CBORError::ExpectedType("int")),
        }
    }

    /// Take an unsigned integer narrowed to `u8`.
    pub fn take_u8(&mut self) -> Result<u8> {
        u8::try_from(self.take_uint()?).map_err(|_| CBORError::OutOfRange)
    }

    /// Take an unsigned integer narrowed to `u16`.
    pub fn take_u16(&mut self) -> Result<u16> {
        u16::try_from(self.take_uint()?).map_err(|_| CBORError::OutOfRange)
    }

    /// Take an unsigned integer narrowed to `u32`.
    pub fn take_u32(&mut self) -> Result<u32> {
        u32::try_from(self.take_uint()?).map_err(|_| CBORError::OutOfRange)
    }

    /// Take a signed integer narrowed to `i8`.
    pub fn take_i8(&mut self) -> Result<i8> {
        i8::try_from(self.take_int()?).map_err(|_| CBORError::OutOfRange)
    }

    /// Take a signed integer narrowed to `i16`.
    pub fn take_i16(&mut self) -> Result<i16> {
        i16::try_from(self.take_int()?).map_err(|_| CBORError::OutOfRange)
    }

    /// Take a signed integer narrowed to `i32`.
    pub fn take_i32(&mut self) -> Result<i32> {
        i32::try_from(self.take_int()?).map_err(|_| CBORError::OutOfRange)
    }

    /// Take a boolean simple value.
    pub fn take_bool(&mut self) -> Result<bool> {
        match self.peek()? {
            SIMPLE_TRUE => {
                self.index += 1;
                Ok(true)
            }
            SIMPLE_FALSE => {
                self.index += 1;
                Ok(false)
            }
            _ => Err(CBORError::ExpectedType("bool")),
        }
    }

    /// Take the simple value `undefined`.
    pub fn take_undefined(&mut self) -> Result<()> {
        if self.peek()? == SIMPLE_UNDEFINED {
            self.index += 1;
            Ok(())
        } else {
            Err(CBORError::ExpectedType("undefined"))
        }
    }

    /// Take a float narrowed to `f32`.
    ///
    /// Integer forms are accepted and converted; with the `float` feature, half and double
    /// precision encodings are accepted as well and narrowed.
    #[cfg_attr(feature = "trace", trace)]
    pub fn take_f32(&mut self) -> Result<f32> {
        match self.peek()? {
            SIMPLE_FLOAT32 => {
                self.index += 1;
                let b = self.take_bytes(4)?;
                Ok(f32::from_bits(u32::from_be_bytes([b[0], b[1], b[2], b[3]])))
            }
            #[cfg(feature = "float")]
            SIMPLE_FLOAT16 => {
                self.index += 1;
                let b = self.take_bytes(2)?;
                Ok(f16::from_bits(u16::from_be_bytes([b[0], b[1]])).to_f32())
            }
            #[cfg(feature = "float")]
            SIMPLE_FLOAT64 => {
                self.index += 1;
                let b = self.take_bytes(8)?;
                let bits = u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]);
                Ok(f64::from_bits(bits) as f32)
            }
            ib if ib & MT_MASK == MT_UINT => Ok(self.take_uint()? as f32),
            ib if ib & MT_MASK == MT_NINT => Ok(self.take_int()? as f32),
            _ => Err(CBORError::ExpectedType("float")),
        }
    }

    /// Take a text string, borrowed zero-copy from the input.
    #[cfg_attr(feature = "trace", trace)]
    pub fn take_tstr(&mut self) -> Result<&'buf str> {
        match self.item_head()? {
            (MT_TSTR, len) => {
                let bytes = self.take_bytes(len as usize)?;
                from_utf8(bytes).map_err(|_| CBORError::UTF8Error)
            }
            _ => Err(CBORError::ExpectedType("tstr")),
        }
    }

    /// Take a byte string, borrowed zero-copy from the input.
    #[cfg_attr(feature = "trace", trace)]
    pub fn take_bstr(&mut self) -> Result<&'buf [u8]> {
        match self.item_head()? {
            (MT_BSTR, len) => self.take_bytes(len as usize),
            _ => Err(CBORError::ExpectedType("bstr")),
        }
    }

    /// Take a definite-length array header, returning the number of items that follow.
    pub fn take_array_head(&mut self) -> Result<usize> {
        match self.item_head()? {
            (MT_ARRAY, n) => Ok(n as usize),
            _ => Err(CBORError::ExpectedType("array")),
        }
    }

    /// Take a definite-length map header, returning the number of key/value pairs that follow.
    pub fn take_map_head(&mut self) -> Result<usize> {
        match self.item_head()? {
            (MT_MAP, n) => Ok(n as usize),
            _ => Err(CBORError::ExpectedType("map")),
        }
    }

    /// Take a decimal fraction, rescaling the mantissa to `exponent`.
    ///
    /// The canonical form is `tag(4) [exponent, mantissa]`. Plain integers and floats are also
    /// accepted and rescaled.
    #[cfg_attr(feature = "trace", trace)]
    pub fn take_decfrac(&mut self, exponent: i16) -> Result<i32> {
        match self.peek()? {
            ib if ib == MT_TAG | TAG_DECFRAC => {
                let (_, tag) = self.item_head()?;
                if tag != TAG_DECFRAC as u64 {
                    return Err(CBORError::ExpectedTag(TAG_DECFRAC as u64));
                }
                if self.take_array_head()? != 2 {
                    return Err(CBORError::MalformedEncoding);
                }
                let received =
                    i16::try_from(self.take_int()?).map_err(|_| CBORError::OutOfRange)?;
                let mantissa = self.take_i32()?;
                Ok(rescale(mantissa, received, exponent))
            }
            SIMPLE_FLOAT32 => {
                let mut value = self.take_f32()?;
                let mut e = 0i16;
                while e < exponent {
                    value /= 10.0;
                    e += 1;
                }
                while e > exponent {
                    value *= 10.0;
                    e -= 1;
                }
                Ok(value as i32)
            }
            ib if ib & MT_MASK == MT_UINT || ib & MT_MASK == MT_NINT => {
                let value = self.take_i32()?;
                Ok(rescale(value, 0, exponent))
            }
            _ => Err(CBORError::ExpectedType("decfrac")),
        }
    }

    /// Advance over one complete item, including the contents of nested arrays, maps and tags.
    #[cfg_attr(feature = "trace", trace)]
    pub fn skip_item(&mut self) -> Result<()> {
        let ib = self.peek()?;
        match ib & MT_MASK {
            MT_UINT | MT_NINT => {
                self.item_head()?;
                Ok(())
            }
            MT_BSTR | MT_TSTR => {
                let (_, len) = self.item_head()?;
                self.take_bytes(len as usize)?;
                Ok(())
            }
            MT_ARRAY => {
                let n = self.take_array_head()?;
                for _ in 0..n {
                    self.skip_item()?;
                }
                Ok(())
            }
            MT_MAP => {
                let n = self.take_map_head()?;
                for _ in 0..2 * n {
                    self.skip_item()?;
                }
                Ok(())
            }
            MT_TAG => {
                self.item_head()?;
                self.skip_item()
            }
            _ => match ib & AI_MASK {
                0..=PAYLOAD_AI_BITS => {
                    self.index += 1;
                    Ok(())
                }
                PAYLOAD_ONE_BYTE => {
                    self.index += 1;
                    self.take_bytes(1).map(|_| ())
                }
                PAYLOAD_TWO_BYTES => {
                    self.index += 1;
                    self.take_bytes(2).map(|_| ())
                }
                PAYLOAD_FOUR_BYTES => {
                    self.index += 1;
                    self.take_bytes(4).map(|_| ())
                }
                PAYLOAD_EIGHT_BYTES => {
                    self.index += 1;
                    self.take_bytes(8).map(|_| ())
                }
                _ => Err(CBORError::AIError),
            },
        }
    }
}

/// Rescale an integer mantissa from one base-10 exponent to another, truncating towards zero
/// on downscaling.
fn rescale(mantissa: i32, from: i16, to: i16) -> i32 {
    let mut m = mantissa;
    let mut e = from;
    while e < to {
        m /= 10;
        e += 1;
    }
    while e > to {
        m = m.saturating_mul(10);
        e -= 1;
    }
    m
}
