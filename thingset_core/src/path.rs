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
 * ThingSet path resolver
 *
 * Resolves `/`-separated paths against the registry, including numeric record-index segments,
 * and derives the path of an object for discovery responses and statements.
 **************************************************************************************************/
use std::fmt;

use thingset_common::id;

use crate::obj::{Object, Registry};

/// A resolved request endpoint.
///
/// `object` is `None` when the request addresses the root of the tree. A numeric path segment
/// below a records node is parsed as a record index and stored separately.
#[derive(Clone, Copy)]
pub struct Endpoint<'a> {
    /// The addressed object, or `None` for the root.
    pub object: Option<&'a Object<'a>>,
    /// Record index taken from an all-digits path segment.
    pub record_index: Option<usize>,
}

impl<'a> Endpoint<'a> {
    /// The root endpoint.
    pub const fn root() -> Self {
        Endpoint {
            object: None,
            record_index: None,
        }
    }

    /// ID used when resolving children of this endpoint.
    pub fn id(&self) -> u16 {
        self.object.map_or(id::ROOT, |o| o.id())
    }
}

impl<'a> Registry<'a> {
    /// Resolve a complete path to an object. A trailing `/` is stripped. Returns `None` when
    /// any segment fails to resolve or the path addresses the root.
    pub fn by_path(&self, path: &str) -> Option<&'a Object<'a>> {
        self.resolve(path).and_then(|ep| ep.object)
    }

    /// Resolve a path to an endpoint, parsing an all-digits segment below a records node as a
    /// record index. An empty path (or a bare `/`) resolves to the root. No partial state is
    /// reported: any unresolvable segment yields `None`.
    pub fn resolve(&self, path: &str) -> Option<Endpoint<'a>> {
        let path = path.strip_suffix('/').unwrap_or(path);
        if path.is_empty() {
            return Some(Endpoint::root());
        }

        let mut endpoint = Endpoint::root();
        for segment in path.split('/') {
            if segment.is_empty() {
                return None;
            }
            let is_index = segment.as_bytes().iter().all(|b| b.is_ascii_digit());
            if is_index && endpoint.object.map_or(false, |o| o.is_records()) {
                // record index segments do not descend; fields stay children of the node
                endpoint.record_index = segment.parse().ok();
                continue;
            }
            match self.by_name(Some(endpoint.id()), segment) {
                Some(obj) => endpoint.object = Some(obj),
                None => return None,
            }
        }
        Some(endpoint)
    }

    /// Write the path of `obj` (up to two levels, e.g. `meas/Bat_V`) into `out`.
    pub fn write_path(&self, obj: &Object<'a>, out: &mut dyn fmt::Write) -> fmt::Result {
        if obj.parent() != id::ROOT {
            if let Some(parent) = self.by_id(obj.parent()) {
                out.write_str(parent.name())?;
                out.write_char('/')?;
            }
        }
        out.write_str(obj.name())
    }
}
