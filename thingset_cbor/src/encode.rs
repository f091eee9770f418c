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
 * CBOR Encoder
 *
 * A reduced-profile CBOR serializer for the ThingSet protocol. Integers always use the shortest
 * of the 1, 2, 3, 5 and 9 byte forms that fits the value; floats always encode as 5-byte
 * single precision; arrays and maps always emit a definite-length header. This serializer is
 * designed for use in constrained systems and requires neither the Rust standard library nor an
 * allocator.
 **************************************************************************************************/
use crate::constants::*;
use crate::error::{CBORError, Result};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// `EncodeBuffer` wraps a mutable byte slice and keeps track of the insert position while CBOR
/// items are appended.
///
/// All `put_*` functions either write a complete item and advance the position, or fail with
/// [`CBORError::EndOfBuffer`] leaving a partially written tail that the caller is expected to
/// discard.
#[derive(Debug)]
pub struct EncodeBuffer<'buf> {
    bytes: &'buf mut [u8],
    index: usize,
}

impl<'buf> EncodeBuffer<'buf> {
    /// Construct an instance of `EncodeBuffer` over a buffer.
    ///
    /// The insert position starts at zero. The same underlying buffer may be re-used by
    /// constructing a new `EncodeBuffer` over it.
    #[inline]
    pub fn new(b: &'buf mut [u8]) -> EncodeBuffer<'buf> {
        EncodeBuffer { bytes: b, index: 0 }
    }

    /// Return a slice containing the encoded output so far.
    pub fn encoded(&self) -> Result<&[u8]> {
        if self.index <= self.bytes.len() {
            Ok(&self.bytes[0..self.index])
        } else {
            Err(CBORError::EndOfBuffer)
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.index
    }

    /// `true` if nothing has been written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index == 0
    }

    /// Insert an `EncodeItem` item into an `EncodeBuffer`.
    #[inline]
    pub fn insert(&mut self, item: &dyn EncodeItem) -> Result<usize> {
        item.encode(self)
    }

    /// Append a single raw byte.
    fn push(&mut self, byte: u8) -> Result<()> {
        if self.index < self.bytes.len() {
            self.bytes[self.index] = byte;
            self.index += 1;
            Ok(())
        } else {
            Err(CBORError::EndOfBuffer)
        }
    }

    /// Append a slice of raw bytes.
    fn extend(&mut self, src: &[u8]) -> Result<()> {
        if self.index + src.len() <= self.bytes.len() {
            self.bytes[self.index..self.index + src.len()].copy_from_slice(src);
            self.index += src.len();
            Ok(())
        } else {
            Err(CBORError::EndOfBuffer)
        }
    }

    /// Write the initial byte and any extension bytes for `value` under major type `mt`, using
    /// the shortest form that fits.
    fn header(&mut self, mt: u8, value: u64) -> Result<usize> {
        let start = self.index;
        if value <= PAYLOAD_AI_BITS as u64 {
            self.push(mt | value as u8)?;
        } else if value <= u8::MAX as u64 {
            self.push(mt | PAYLOAD_ONE_BYTE)?;
            self.push(value as u8)?;
        } else if value <= u16::MAX as u64 {
            self.push(mt | PAYLOAD_TWO_BYTES)?;
            self.extend(&(value as u16).to_be_bytes())?;
        } else if value <= u32::MAX as u64 {
            self.push(mt | PAYLOAD_FOUR_BYTES)?;
            self.extend(&(value as u32).to_be_bytes())?;
        } else {
            self.push(mt | PAYLOAD_EIGHT_BYTES)?;
            self.extend(&value.to_be_bytes())?;
        }
        Ok(self.index - start)
    }

    /// Append an unsigned integer (major type 0).
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_uint(&mut self, value: u64) -> Result<usize> {
        self.header(MT_UINT, value)
    }

    /// Append a signed integer, selecting major type 0 or 1 depending on the sign.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_int(&mut self, value: i64) -> Result<usize> {
        if value < 0 {
            self.header(MT_NINT, (-1 - value) as u64)
        } else {
            self.header(MT_UINT, value as u64)
        }
    }

    /// Append a boolean simple value.
    pub fn put_bool(&mut self, value: bool) -> Result<usize> {
        self.push(if value { SIMPLE_TRUE } else { SIMPLE_FALSE })?;
        Ok(1)
    }

    /// Append the simple value `null`.
    pub fn put_null(&mut self) -> Result<usize> {
        self.push(SIMPLE_NULL)?;
        Ok(1)
    }

    /// Append the simple value `undefined`.
    pub fn put_undefined(&mut self) -> Result<usize> {
        self.push(SIMPLE_UNDEFINED)?;
        Ok(1)
    }

    /// Append a single-precision float. The ThingSet profile never emits half or double
    /// precision.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_f32(&mut self, value: f32) -> Result<usize> {
        self.push(SIMPLE_FLOAT32)?;
        self.extend(&value.to_bits().to_be_bytes())?;
        Ok(5)
    }

    /// Append a text string (major type 3). No terminator is written.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_tstr(&mut self, value: &str) -> Result<usize> {
        let n = self.header(MT_TSTR, value.len() as u64)?;
        self.extend(value.as_bytes())?;
        Ok(n + value.len())
    }

    /// Append a byte string (major type 2).
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_bstr(&mut self, value: &[u8]) -> Result<usize> {
        let n = self.header(MT_BSTR, value.len() as u64)?;
        self.extend(value)?;
        Ok(n + value.len())
    }

    /// Append a definite-length array header for `num_elements` items. The items themselves
    /// must be appended afterwards by the caller.
    pub fn put_array_head(&mut self, num_elements: usize) -> Result<usize> {
        self.header(MT_ARRAY, num_elements as u64)
    }

    /// Append a definite-length map header for `num_elements` key/value pairs.
    pub fn put_map_head(&mut self, num_elements: usize) -> Result<usize> {
        self.header(MT_MAP, num_elements as u64)
    }

    /// Append a decimal fraction as `tag(4) [exponent, mantissa]`.
    ///
    /// Exponents outside the single-byte integer range [-24, 23] are rejected with
    /// [`CBORError::OutOfRange`] rather than silently truncated.
    #[cfg_attr(feature = "trace", trace)]
    pub fn put_decfrac(&mut self, mantissa: i32, exponent: i16) -> Result<usize> {
        if !(DECFRAC_EXP_MIN..=DECFRAC_EXP_MAX).contains(&exponent) {
            return Err(CBORError::OutOfRange);
        }
        let start = self.index;
        self.header(MT_TAG, TAG_DECFRAC as u64)?;
        self.header(MT_ARRAY, 2)?;
        self.put_int(exponent as i64)?;
        self.put_int(mantissa as i64)?;
        Ok(self.index - start)
    }
}

/***************************************************************************************************
 * Encode Item
 **************************************************************************************************/

/// The `EncodeItem` trait encapsulates encoding operations as anything that can be serialized
/// to the ThingSet CBOR profile.
pub trait EncodeItem {
    /// Append `self` to `buf`, returning the number of bytes written.
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize>;
}

impl EncodeItem for bool {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_bool(*self)
    }
}

impl EncodeItem for u8 {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_uint(*self as u64)
    }
}

impl EncodeItem for u16 {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_uint(*self as u64)
    }
}

impl EncodeItem for u32 {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_uint(*self as u64)
    }
}

impl EncodeItem for u64 {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_uint(*self)
    }
}

impl EncodeItem for i8 {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_int(*self as i64)
    }
}

impl EncodeItem for i16 {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_int(*self as i64)
    }
}

impl EncodeItem for i32 {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_int(*self as i64)
    }
}

impl EncodeItem for i64 {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_int(*self)
    }
}

impl EncodeItem for f32 {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_f32(*self)
    }
}

impl EncodeItem for &str {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_tstr(self)
    }
}

impl EncodeItem for &[u8] {
    #[inline]
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<usize> {
        buf.put_bstr(self)
    }
}
