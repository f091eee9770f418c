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
 * thingset_cbor CBOR constants
 *
 * A reduced-profile CBOR serializer and deserializer for the ThingSet protocol. This
 * implementation is designed for use in constrained systems and requires neither the Rust
 * standard library nor an allocator.
 **************************************************************************************************/

/// Major type bitmask
pub const MT_MASK: u8 = 0b111_00000;
/// Additional Information bitmask
pub const AI_MASK: u8 = 0b000_11111;

/// Major Type 0 (Positive integers)
pub const MT_UINT: u8 = 0b000_00000;
/// Major Type 1 (Negative integers)
pub const MT_NINT: u8 = 0b001_00000;
/// Major Type 2 (Byte Strings)
pub const MT_BSTR: u8 = 0b010_00000;
/// Major Type 3 (Text Strings)
pub const MT_TSTR: u8 = 0b011_00000;
/// Major Type 4 (Array)
pub const MT_ARRAY: u8 = 0b100_00000;
/// Major Type 5 (Map)
pub const MT_MAP: u8 = 0b101_00000;
/// Major Type 6 (Tag)
pub const MT_TAG: u8 = 0b110_00000;
/// Major Type 7 (Floats, simple types etc.)
pub const MT_SIMPLE: u8 = 0b111_00000;

/// Maximum value of a "simple" payload mapped on AI bits
pub const PAYLOAD_AI_BITS: u8 = 23;
/// Indicates one byte of length or value information follows the MT/AI byte
pub const PAYLOAD_ONE_BYTE: u8 = 24;
/// Indicates two bytes of length or value information follow the MT/AI byte
pub const PAYLOAD_TWO_BYTES: u8 = 25;
/// Indicates four bytes of length or value information follow the MT/AI byte
pub const PAYLOAD_FOUR_BYTES: u8 = 26;
/// Indicates eight bytes of length or value information follow the MT/AI byte
pub const PAYLOAD_EIGHT_BYTES: u8 = 27;

/// Initial byte encoding the simple value `false`
pub const SIMPLE_FALSE: u8 = MT_SIMPLE | 20;
/// Initial byte encoding the simple value `true`
pub const SIMPLE_TRUE: u8 = MT_SIMPLE | 21;
/// Initial byte encoding the simple value `null`
pub const SIMPLE_NULL: u8 = MT_SIMPLE | 22;
/// Initial byte encoding the simple value `undefined`
pub const SIMPLE_UNDEFINED: u8 = MT_SIMPLE | 23;
/// Initial byte of a half-precision float
pub const SIMPLE_FLOAT16: u8 = MT_SIMPLE | 25;
/// Initial byte of a single-precision float
pub const SIMPLE_FLOAT32: u8 = MT_SIMPLE | 26;
/// Initial byte of a double-precision float
pub const SIMPLE_FLOAT64: u8 = MT_SIMPLE | 27;

/// Tag number of a decimal fraction (tag content is `[exponent, mantissa]`)
pub const TAG_DECFRAC: u8 = 4;

/// Smallest decimal-fraction exponent representable with a single-byte integer encoding
pub const DECFRAC_EXP_MIN: i16 = -24;
/// Largest decimal-fraction exponent representable with a single-byte integer encoding
pub const DECFRAC_EXP_MAX: i16 = 23;
