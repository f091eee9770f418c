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
 * ThingSet context
 *
 * The in-memory instance of the server: registry, authentication state and the serializing
 * request lock. The dispatcher determines the encoding from the first byte of a request and
 * routes to the binary or text handlers.
 **************************************************************************************************/
use spin::{Mutex, RwLock};

use thingset_common::{access, method};
use thingset_error::ThingSetError;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

use crate::obj::{Callback, ObjId, Object, Registry};
use crate::{bin, txt};

/// The in-memory instance of a ThingSet server.
///
/// A context owns a serializing mutex over the request processing path: concurrent requests
/// arriving on different transports are handled in arrival order, and statement emission as
/// well as import/export hold the same lock for their duration. Handlers never block for I/O;
/// they consume an in-memory request buffer and produce an in-memory response buffer
/// synchronously.
///
/// Callbacks installed in the registry or via [`Context::set_update_callback`] run while the
/// lock is held and must not re-enter the context.
pub struct Context<'a> {
    registry: Registry<'a>,
    auth_flags: RwLock<u16>,
    update_subsets: RwLock<u16>,
    update_cb: RwLock<Option<&'a Callback>>,
    lock: Mutex<()>,
}

impl<'a> Context<'a> {
    /// Create a context over a registry. The caller starts out with normal user rights.
    pub const fn new(registry: Registry<'a>) -> Self {
        Context {
            registry,
            auth_flags: RwLock::new(access::USR_MASK),
            update_subsets: RwLock::new(0),
            update_cb: RwLock::new(None),
            lock: Mutex::new(()),
        }
    }

    /// The registry this context serves.
    #[inline]
    pub fn registry(&self) -> &Registry<'a> {
        &self.registry
    }

    /// Current role bits of the connected client, as supplied by the host.
    pub fn authentication(&self) -> u16 {
        *self.auth_flags.read()
    }

    /// Set the role bits of the connected client. The core only consumes this mask; the
    /// authentication protocol itself is the host's business.
    pub fn set_authentication(&self, flags: u16) {
        *self.auth_flags.write() = flags;
    }

    /// Install a callback fired once after every successful write that touches an object whose
    /// subset bits intersect `subsets`.
    pub fn set_update_callback(&self, subsets: u16, callback: &'a Callback) {
        *self.update_subsets.write() = subsets;
        *self.update_cb.write() = Some(callback);
    }

    pub(crate) fn update_subsets(&self) -> u16 {
        *self.update_subsets.read()
    }

    pub(crate) fn fire_update_callback(&self) {
        if let Some(callback) = *self.update_cb.read() {
            callback();
        }
    }

    /// Process one complete request message and write a single response message into `resp`,
    /// returning its length. The encoding is determined from the first byte of the request.
    /// A buffer that is not a ThingSet request produces an empty response.
    #[cfg_attr(feature = "trace", trace)]
    pub fn process(&self, req: &[u8], resp: &mut [u8]) -> usize {
        if req.is_empty() || resp.is_empty() {
            return 0;
        }
        let _guard = self.lock.lock();
        match req[0] {
            method::GET | method::POST | method::DELETE | method::FETCH | method::PATCH => {
                bin::process(self, req, resp)
            }
            method::TXT_GET
            | method::TXT_PATCH
            | method::TXT_CREATE
            | method::TXT_DELETE
            | method::TXT_EXEC => txt::process(self, req, resp),
            _ => 0,
        }
    }

    /// Generate a binary statement message for the object at `path`.
    ///
    /// Returns the message length, or 0 if the object does not exist or does not support
    /// statements (only top-level subsets and groups do).
    pub fn bin_statement_by_path(&self, buf: &mut [u8], path: &str) -> usize {
        let _guard = self.lock.lock();
        match self.registry.by_path(path) {
            Some(obj) => bin::statement(self, buf, obj),
            None => 0,
        }
    }

    /// Generate a binary statement message for the object with the given ID.
    pub fn bin_statement_by_id(&self, buf: &mut [u8], obj_id: ObjId) -> usize {
        let _guard = self.lock.lock();
        match self.registry.by_id(obj_id) {
            Some(obj) => bin::statement(self, buf, obj),
            None => 0,
        }
    }

    /// Generate a text statement message for the object at `path`.
    pub fn txt_statement_by_path(&self, buf: &mut [u8], path: &str) -> usize {
        let _guard = self.lock.lock();
        match self.registry.by_path(path) {
            Some(obj) => txt::statement(self, buf, obj),
            None => 0,
        }
    }

    /// Generate a text statement message for the object with the given ID.
    pub fn txt_statement_by_id(&self, buf: &mut [u8], obj_id: ObjId) -> usize {
        let _guard = self.lock.lock();
        match self.registry.by_id(obj_id) {
            Some(obj) => txt::statement(self, buf, obj),
            None => 0,
        }
    }

    /// Emit a statement for a resolved object reference without acquiring the lock again.
    /// Intended for applications that iterate the registry themselves.
    pub fn bin_statement(&self, buf: &mut [u8], obj: &Object<'a>) -> usize {
        let _guard = self.lock.lock();
        bin::statement(self, buf, obj)
    }

    /// Serialize all objects of the given subsets as a CBOR map from ID to value, used to
    /// persist configuration to non-volatile storage.
    pub fn export_bin(&self, buf: &mut [u8], subsets: u16) -> Result<usize, ThingSetError> {
        let _guard = self.lock.lock();
        bin::export(self, buf, subsets)
    }

    /// Restore previously exported data. Unknown IDs are silently skipped; a type mismatch on
    /// a known ID fails the whole import atomically. The normal role check is bypassed since
    /// this is local restoration, not a remote write.
    pub fn import_bin(&self, data: &[u8], subsets: u16) -> Result<(), ThingSetError> {
        let _guard = self.lock.lock();
        bin::import(self, data, subsets)
    }

    /// Serialize all objects of the given subsets as a JSON name/value map.
    pub fn export_txt(&self, buf: &mut [u8], subsets: u16) -> Result<usize, ThingSetError> {
        let _guard = self.lock.lock();
        txt::export(self, buf, subsets)
    }
}
