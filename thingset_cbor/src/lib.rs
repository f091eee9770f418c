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
 * thingset_cbor module definition
 *
 * A reduced-profile CBOR serializer and deserializer for the ThingSet protocol. This
 * implementation is designed for use in constrained systems and requires neither the Rust
 * standard library nor an allocator.
 **************************************************************************************************/

// Default configuration
#![no_std]
#![warn(missing_docs)]

//! # THINGSET_CBOR
//!
//! The `thingset_cbor` crate implements the carefully reduced CBOR profile used on the ThingSet
//! binary wire: shortest-form integer headers, single-precision floats, definite-length strings,
//! arrays and maps, and tag 4 decimal fractions. Indefinite-length items, general tags and
//! bignums are intentionally not supported — a ThingSet peer never emits them.
//!
//! Serialization and deserialization both operate directly on a byte buffer of the caller's
//! choice; no allocator is required.
//!
//! ## Encoding
//!
//! [`encoder::EncodeBuffer`] wraps a mutable byte slice and keeps track of the insert position.
//! Values may be written through the typed `put_*` functions or through the
//! [`encoder::EncodeItem`] trait:
//!
//! ```
//! use thingset_cbor::encoder::EncodeBuffer;
//! use thingset_cbor::error::CBORError;
//!
//! fn main() -> Result<(), CBORError> {
//!     let mut bytes = [0u8; 16];
//!     let mut enc = EncodeBuffer::new(&mut bytes);
//!     enc.put_map_head(1)?;
//!     enc.put_uint(0x31)?;
//!     enc.put_f32(14.4)?;
//!     assert_eq!(enc.encoded()?, &[0xA1, 0x18, 0x31, 0xFA, 0x41, 0x66, 0x66, 0x66]);
//!     Ok(())
//! }
//! ```
//!
//! ## Decoding
//!
//! [`decoder::SequenceBuffer`] wraps an immutable byte slice. The typed `take_*` functions
//! accept any valid shortest-or-longer form of the expected major type and narrow the value
//! with a range check; text and byte strings are borrowed zero-copy from the input.
//!
//! ```
//! use thingset_cbor::decoder::SequenceBuffer;
//! use thingset_cbor::error::CBORError;
//!
//! fn main() -> Result<(), CBORError> {
//!     let bytes = [0x19, 0x03, 0xE8];
//!     let mut dec = SequenceBuffer::new(&bytes);
//!     assert_eq!(dec.take_u16()?, 1000);
//!     assert!(dec.at_end());
//!     Ok(())
//! }
//! ```

// Pull in std if we are testing or if it is defined as feature (because we run tests on a
// platform supporting I/O and full feature set.
#[cfg(any(feature = "std", test))]
extern crate std;

// If we are really building no_std, pull in core as well. It is aliased as std so that "use"
// statements are always the same
#[cfg(all(not(feature = "std"), not(test)))]
extern crate core as std;

pub(crate) mod constants;
pub(crate) mod decode;
pub(crate) mod encode;

/// Error handling for CBOR encoding and decoding.
pub mod error;

/// Constants of the reduced CBOR profile (major types and payload markers).
pub mod types {
    pub use super::constants::{
        AI_MASK, MT_ARRAY, MT_BSTR, MT_MAP, MT_MASK, MT_NINT, MT_SIMPLE, MT_TAG, MT_TSTR, MT_UINT,
        SIMPLE_FALSE, SIMPLE_FLOAT32, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED, TAG_DECFRAC,
    };
}

/// Decoding API: a zero-copy sequence reader over a byte slice.
pub mod decoder {
    pub use super::decode::SequenceBuffer;
}

/// Encoding API: a bounded write buffer with typed insertion.
pub mod encoder {
    pub use super::encode::{EncodeBuffer, EncodeItem};
}
