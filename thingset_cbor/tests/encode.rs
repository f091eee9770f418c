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
 * Test cases for the ThingSet CBOR profile, encoding direction
 *
 * Shortest-form boundary cases from RFC8949, Appendix A.
 **************************************************************************************************/

extern crate thingset_cbor;

use thingset_cbor::encoder::EncodeBuffer;
use thingset_cbor::error::CBORError;

#[test]
fn encode_uint_shortest_form() -> Result<(), CBORError> {
    let u1: &[u8] = &[0x00];
    let u2: &[u8] = &[0x17];
    let u3: &[u8] = &[0x18, 0x18];
    let u4: &[u8] = &[0x18, 0xff];
    let u5: &[u8] = &[0x19, 0x01, 0x00];
    let u6: &[u8] = &[0x19, 0xff, 0xff];
    let u7: &[u8] = &[0x1a, 0x00, 0x01, 0x00, 0x00];
    let u8_: &[u8] = &[0x1a, 0x7f, 0xff, 0xff, 0xff];
    let u9: &[u8] = &[0x1a, 0x80, 0x00, 0x00, 0x00];
    let u10: &[u8] = &[0x1b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];

    for (val, expect) in [
        (0u64, u1),
        (23u64, u2),
        (24u64, u3),
        (255u64, u4),
        (256u64, u5),
        (65535u64, u6),
        (65536u64, u7),
        (0x7fff_ffffu64, u8_),
        (0x8000_0000u64, u9),
        (0x7fff_ffff_ffff_ffffu64, u10),
    ] {
        let mut bytes = [0u8; 16];
        let mut enc = EncodeBuffer::new(&mut bytes);
        enc.put_uint(val)?;
        assert_eq!(enc.encoded()?, expect, "value {}", val);
    }
    Ok(())
}

#[test]
fn encode_nint_shortest_form() -> Result<(), CBORError> {
    let s1: &[u8] = &[0x20];
    let s2: &[u8] = &[0x29];
    let s3: &[u8] = &[0x38, 0x63];
    let s4: &[u8] = &[0x39, 0x03, 0xe7];
    let s5: &[u8] = &[0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];

    for (val, expect) in [
        (-1i64, s1),
        (-10i64, s2),
        (-100i64, s3),
        (-1000i64, s4),
        (i64::MIN, s5),
    ] {
        let mut bytes = [0u8; 16];
        let mut enc = EncodeBuffer::new(&mut bytes);
        enc.put_int(val)?;
        assert_eq!(enc.encoded()?, expect, "value {}", val);
    }
    Ok(())
}

#[test]
fn encode_simple_values() -> Result<(), CBORError> {
    let mut bytes = [0u8; 8];
    let mut enc = EncodeBuffer::new(&mut bytes);
    enc.put_bool(false)?;
    enc.put_bool(true)?;
    enc.put_null()?;
    enc.put_undefined()?;
    assert_eq!(enc.encoded()?, &[0xf4, 0xf5, 0xf6, 0xf7]);
    Ok(())
}

#[test]
fn encode_float_always_single_precision() -> Result<(), CBORError> {
    let mut bytes = [0u8; 8];
    let mut enc = EncodeBuffer::new(&mut bytes);
    enc.put_f32(100000.0)?;
    assert_eq!(enc.encoded()?, &[0xfa, 0x47, 0xc3, 0x50, 0x00]);
    Ok(())
}

#[test]
fn encode_strings() -> Result<(), CBORError> {
    let mut bytes = [0u8; 16];
    let mut enc = EncodeBuffer::new(&mut bytes);
    enc.put_tstr("IETF")?;
    assert_eq!(enc.encoded()?, &[0x64, 0x49, 0x45, 0x54, 0x46]);

    let mut bytes = [0u8; 16];
    let mut enc = EncodeBuffer::new(&mut bytes);
    enc.put_bstr(&[0x01, 0x02, 0x03, 0x04])?;
    assert_eq!(enc.encoded()?, &[0x44, 0x01, 0x02, 0x03, 0x04]);
    Ok(())
}

#[test]
fn encode_definite_length_heads() -> Result<(), CBORError> {
    let mut bytes = [0u8; 8];
    let mut enc = EncodeBuffer::new(&mut bytes);
    enc.put_array_head(3)?;
    enc.put_map_head(2)?;
    enc.put_array_head(25)?;
    assert_eq!(enc.encoded()?, &[0x83, 0xa2, 0x98, 0x19]);
    Ok(())
}

#[test]
fn encode_decfrac() -> Result<(), CBORError> {
    // 273.15 as mantissa 27315 with exponent -2 (RFC8949 section 3.4.4)
    let mut bytes = [0u8; 16];
    let mut enc = EncodeBuffer::new(&mut bytes);
    enc.put_decfrac(27315, -2)?;
    assert_eq!(enc.encoded()?, &[0xc4, 0x82, 0x21, 0x19, 0x6a, 0xb3]);
    Ok(())
}

#[test]
fn encode_decfrac_rejects_out_of_range_exponent() {
    let mut bytes = [0u8; 16];
    let mut enc = EncodeBuffer::new(&mut bytes);
    assert_eq!(enc.put_decfrac(1, -25), Err(CBORError::OutOfRange));
    assert_eq!(enc.put_decfrac(1, 24), Err(CBORError::OutOfRange));
}

#[test]
fn encode_reports_buffer_overflow() {
    let mut bytes = [0u8; 3];
    let mut enc = EncodeBuffer::new(&mut bytes);
    assert_eq!(enc.put_tstr("IETF"), Err(CBORError::EndOfBuffer));
}
