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
 * Test cases for the ThingSet CBOR profile, decoding direction
 *
 * Exercises acceptance of longer-than-shortest forms, range-checked narrowing and the lenient
 * numeric conversions used by the protocol handlers.
 **************************************************************************************************/

extern crate thingset_cbor;

use thingset_cbor::decoder::SequenceBuffer;
use thingset_cbor::error::CBORError;

#[test]
fn decode_accepts_longer_than_shortest_forms() -> Result<(), CBORError> {
    // The value 10 in all integer widths
    for bytes in [
        &[0x0au8][..],
        &[0x18, 0x0a][..],
        &[0x19, 0x00, 0x0a][..],
        &[0x1a, 0x00, 0x00, 0x00, 0x0a][..],
        &[0x1b, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0a][..],
    ] {
        let mut dec = SequenceBuffer::new(bytes);
        assert_eq!(dec.take_u8()?, 10);
        assert!(dec.at_end());
    }
    Ok(())
}

#[test]
fn decode_narrowing_range_check() {
    let mut dec = SequenceBuffer::new(&[0x19, 0x01, 0x00]);
    assert_eq!(dec.take_u8(), Err(CBORError::OutOfRange));

    let mut dec = SequenceBuffer::new(&[0x39, 0x7f, 0xff]);
    assert_eq!(dec.take_i16(), Err(CBORError::OutOfRange));

    // -129 does not fit an i8
    let mut dec = SequenceBuffer::new(&[0x38, 0x80]);
    assert_eq!(dec.take_i8(), Err(CBORError::OutOfRange));
}

#[test]
fn decode_nint() -> Result<(), CBORError> {
    let mut dec = SequenceBuffer::new(&[0x39, 0x03, 0xe7]);
    assert_eq!(dec.take_int()?, -1000);
    Ok(())
}

#[test]
fn decode_float_from_integer_forms() -> Result<(), CBORError> {
    let mut dec = SequenceBuffer::new(&[0x18, 0x2a]);
    assert_eq!(dec.take_f32()?, 42.0);

    let mut dec = SequenceBuffer::new(&[0x29]);
    assert_eq!(dec.take_f32()?, -10.0);
    Ok(())
}

#[test]
fn decode_float_narrows_wider_encodings() -> Result<(), CBORError> {
    // f16 1.5
    let mut dec = SequenceBuffer::new(&[0xf9, 0x3e, 0x00]);
    assert_eq!(dec.take_f32()?, 1.5);

    // f64 1.1 narrows with precision loss
    let mut dec = SequenceBuffer::new(&[0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]);
    assert_eq!(dec.take_f32()?, 1.1f32);

    // f32 100000.0
    let mut dec = SequenceBuffer::new(&[0xfa, 0x47, 0xc3, 0x50, 0x00]);
    assert_eq!(dec.take_f32()?, 100000.0);
    Ok(())
}

#[test]
fn decode_strings_zero_copy() -> Result<(), CBORError> {
    let bytes = [0x64, 0x49, 0x45, 0x54, 0x46, 0x42, 0x01, 0x02];
    let mut dec = SequenceBuffer::new(&bytes);
    assert_eq!(dec.take_tstr()?, "IETF");
    assert_eq!(dec.take_bstr()?, &[0x01, 0x02]);
    assert!(dec.at_end());
    Ok(())
}

#[test]
fn decode_rejects_invalid_utf8() {
    let mut dec = SequenceBuffer::new(&[0x62, 0xff, 0xfe]);
    assert_eq!(dec.take_tstr(), Err(CBORError::UTF8Error));
}

#[test]
fn decode_rejects_indefinite_length() {
    let mut dec = SequenceBuffer::new(&[0x9f, 0x01, 0xff]);
    assert_eq!(dec.take_array_head(), Err(CBORError::AIError));
}

#[test]
fn decode_decfrac_rescales_mantissa() -> Result<(), CBORError> {
    // tag(4) [-2, 27315] read at exponent -2
    let mut dec = SequenceBuffer::new(&[0xc4, 0x82, 0x21, 0x19, 0x6a, 0xb3]);
    assert_eq!(dec.take_decfrac(-2)?, 27315);

    // same item read at exponent -1 truncates towards zero
    let mut dec = SequenceBuffer::new(&[0xc4, 0x82, 0x21, 0x19, 0x6a, 0xb3]);
    assert_eq!(dec.take_decfrac(-1)?, 2731);

    // plain integer 5 read at exponent -2 scales up
    let mut dec = SequenceBuffer::new(&[0x05]);
    assert_eq!(dec.take_decfrac(-2)?, 500);
    Ok(())
}

#[test]
fn decode_skip_item_spans_nested_structures() -> Result<(), CBORError> {
    // [1, [2, 3], {"a": 4}] followed by the uint 9
    let bytes = [
        0x83, 0x01, 0x82, 0x02, 0x03, 0xa1, 0x61, 0x61, 0x04, 0x09,
    ];
    let mut dec = SequenceBuffer::new(&bytes);
    dec.skip_item()?;
    assert_eq!(dec.take_uint()?, 9);
    assert!(dec.at_end());
    Ok(())
}

#[test]
fn decode_incomplete_input() {
    let mut dec = SequenceBuffer::new(&[0x19, 0x01]);
    assert_eq!(dec.take_u16(), Err(CBORError::EndOfBuffer));
}
