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
 * thingset_core
 *
 * ThingSet protocol core for resource-constrained devices: a server owns a tree of named,
 * typed data items and answers requests from clients over heterogeneous transports. This crate
 * implements the data-object registry, the request/response processing and the dual wire codec
 * (compact CBOR based binary encoding and human readable JSON based text encoding) including
 * the subset based publication mechanism.
 **************************************************************************************************/
#![no_std]
#![warn(missing_docs)]

//! # THINGSET_CORE
//!
//! A server declares its data as a fixed array of [`Object`]s, each borrowing storage from the
//! application, and wraps the array in a [`Registry`] served by a [`Context`]:
//!
//! ```
//! use thingset_core::{Context, Object, Registry, Value};
//! use thingset_common::access;
//!
//! static BAT_V: Value<f32> = Value::new(14.1);
//! static OBJECTS_ARR: [Object; 2] = [
//!     Object::group(0x70, "meas", None, 0),
//!     Object::float_item(0x71, "Bat_V", &BAT_V, 2, 0x70, access::ANY_R, 0),
//! ];
//! static OBJECTS: &[Object] = &OBJECTS_ARR;
//! static CTX: Context = Context::new(Registry::new(OBJECTS));
//!
//! let mut resp = [0u8; 64];
//! let len = CTX.process(b"?meas/Bat_V", &mut resp);
//! assert_eq!(&resp[..len], b":85 Content. 14.10");
//! ```
//!
//! Transports deliver whole request messages to [`Context::process`]; the first byte selects
//! the binary or text encoding. Unsolicited publications are generated with the statement
//! functions independent of any request, and `export`/`import` serialize a named subset for
//! persistence.
//!
//! The hosting application may also use the process-wide default context in [`global`], which
//! is a thin layer over the context-taking API.

// Pull in std if we are testing or if it is defined as feature (because we run tests on a
// platform supporting I/O and full feature set.
#[cfg(any(feature = "std", test))]
extern crate std;

// If we are really building no_std, pull in core as well. It is aliased as std so that "use"
// statements are always the same
#[cfg(all(not(feature = "std"), not(test)))]
extern crate core as std;

extern crate thingset_cbor;
extern crate thingset_common;
extern crate thingset_error;

pub(crate) mod bin;
pub(crate) mod txt;

mod ctx;
mod obj;
mod path;

/// Lenient JSON tokenizer with a fixed token capacity.
pub mod json;

pub use crate::ctx::Context;
pub use crate::obj::{
    ArrayCell, ArrayElem, ArrayStore, BytesCell, BytesStore, Callback, ItemType, ObjData, ObjId,
    ObjMeta, Object, RecordStore, Registry, ScalarValue, TextCell, TextStore, Value,
};
pub use crate::path::Endpoint;

/// Process-wide default context: a thin convenience layer over the context-taking API for
/// hosts that serve a single device tree.
pub mod global {
    use super::Context;
    use state::Storage;
    use thingset_error::ThingSetError;

    // This is the global store for the default context
    static CONTEXT: Storage<Context<'static>> = Storage::new();

    /// Install the process-wide default context. Returns `false` if it was set before.
    pub fn init(context: Context<'static>) -> bool {
        CONTEXT.set(context)
    }

    /// The default context, if one has been installed.
    pub fn get() -> Option<&'static Context<'static>> {
        CONTEXT.try_get()
    }

    /// Process a request against the default context. Without an installed context the
    /// response is empty.
    pub fn process(req: &[u8], resp: &mut [u8]) -> usize {
        match CONTEXT.try_get() {
            Some(context) => context.process(req, resp),
            None => 0,
        }
    }

    /// Set the role bits of the connected client on the default context.
    pub fn set_authentication(flags: u16) {
        if let Some(context) = CONTEXT.try_get() {
            context.set_authentication(flags);
        }
    }

    /// Generate a binary statement message for the object at `path`.
    pub fn bin_statement_by_path(buf: &mut [u8], path: &str) -> usize {
        match CONTEXT.try_get() {
            Some(context) => context.bin_statement_by_path(buf, path),
            None => 0,
        }
    }

    /// Generate a text statement message for the object at `path`.
    pub fn txt_statement_by_path(buf: &mut [u8], path: &str) -> usize {
        match CONTEXT.try_get() {
            Some(context) => context.txt_statement_by_path(buf, path),
            None => 0,
        }
    }

    /// Export the objects of the given subsets from the default context.
    pub fn export_bin(buf: &mut [u8], subsets: u16) -> Result<usize, ThingSetError> {
        match CONTEXT.try_get() {
            Some(context) => context.export_bin(buf, subsets),
            None => Err(ThingSetError::InternalError),
        }
    }

    /// Import previously exported data into the default context.
    pub fn import_bin(data: &[u8], subsets: u16) -> Result<(), ThingSetError> {
        match CONTEXT.try_get() {
            Some(context) => context.import_bin(data, subsets),
            None => Err(ThingSetError::InternalError),
        }
    }
}
