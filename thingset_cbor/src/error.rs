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
 * thingset_cbor CBOR Error API
 *
 * A reduced-profile CBOR serializer and deserializer for the ThingSet protocol. This
 * implementation is designed for use in constrained systems and requires neither the Rust
 * standard library nor an allocator.
 **************************************************************************************************/
use std::result;

#[cfg(any(feature = "std", test))]
use thiserror::Error;

/// An alias for Result<T, CBORError> used throughout this crate.
pub type Result<T> = result::Result<T, CBORError>;

/// `CBORError` provides information about errors converting CBOR types to/from other types
#[cfg_attr(any(feature = "std", test), derive(Copy, Clone, Error, Debug, PartialEq))]
#[cfg_attr(all(not(feature = "std"), not(test)), derive(Copy, Clone, Debug, PartialEq))]
pub enum CBORError {
    /// A number conversion has overflowed or underflowed.
    #[cfg_attr(
        any(feature = "std", test),
        error("Overflow or underflow in number conversion")
    )]
    OutOfRange,
    /// Attempt to convert an item to an incompatible type.
    #[cfg_attr(
        any(feature = "std", test),
        error("Attempt to convert an item of incompatible type")
    )]
    IncompatibleType,
    /// Buffer too short to encode or decode the next item
    #[cfg_attr(
        any(feature = "std", test),
        error("Buffer insufficient to process the next item")
    )]
    EndOfBuffer,
    /// A tstr input contains an invalid UTF8 sequence
    #[cfg_attr(
        any(feature = "std", test),
        error("A tstr contains an invalid UTF8 sequence")
    )]
    UTF8Error,
    /// The item was not expecting this Additional Information encoding. Probably malformed CBOR
    #[cfg_attr(
        any(feature = "std", test),
        error("The item was not expecting this AI encoding. Probably malformed")
    )]
    AIError,
    /// Encoding is illegal or unsupported in the ThingSet profile
    #[cfg_attr(
        any(feature = "std", test),
        error("Encoding is illegal or unsupported")
    )]
    MalformedEncoding,
    /// The CBOR type indicated by the `str` was expected here.
    #[cfg_attr(
        any(feature = "std", test),
        error("Did not match expected CBOR type")
    )]
    ExpectedType(&'static str),
    /// The tag value was not expected here
    #[cfg_attr(any(feature = "std", test), error("Unexpected Tag"))]
    ExpectedTag(u64),
}
