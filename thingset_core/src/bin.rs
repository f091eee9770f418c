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
 * ThingSet binary mode
 *
 * Request handlers for the CBOR based binary encoding: value serialization via the reduced
 * profile codec and the GET / FETCH / PATCH / POST / DELETE semantics plus statements and the
 * import/export path used for persistence.
 **************************************************************************************************/
use thingset_cbor::decoder::SequenceBuffer;
use thingset_cbor::encoder::EncodeBuffer;
use thingset_cbor::error::CBORError;
use thingset_cbor::types::{MT_ARRAY, MT_MASK, MT_TSTR, MT_UINT};
use thingset_common::{access, id, method, status};
use thingset_error::ThingSetError;

use crate::ctx::Context;
use crate::json::JsonWriter;
use crate::obj::{ItemType, ObjData, ObjId, Object, Registry, ScalarValue};
use crate::path::Endpoint;

type Result<T> = core::result::Result<T, ThingSetError>;

/// How the client addressed the endpoint; responses honor the same form.
#[derive(Clone, Copy, PartialEq)]
enum Addressing {
    Ids,
    Names,
}

enum EndpointRef<'a> {
    Object(Endpoint<'a>, Addressing),
    /// The `_ids` virtual endpoint: resolve paths to numeric IDs.
    DiscoverIds,
    /// The `_paths` virtual endpoint: resolve numeric IDs to paths.
    DiscoverPaths,
}

/// Fill the response buffer with a bare status byte.
pub(crate) fn respond(resp: &mut [u8], code: u8) -> usize {
    if resp.is_empty() {
        return 0;
    }
    resp[0] = code;
    1
}

/// Process one complete binary request and write a single response message.
pub(crate) fn process(ctx: &Context, req: &[u8], resp: &mut [u8]) -> usize {
    match process_inner(ctx, req, resp) {
        Ok(len) => len,
        Err(err) => respond(resp, u8::from(err)),
    }
}

fn process_inner(ctx: &Context, req: &[u8], resp: &mut [u8]) -> Result<usize> {
    let reg = ctx.registry();
    let auth = ctx.authentication();
    let mut dec = SequenceBuffer::new(&req[1..]);

    let endpoint = match dec.peek().map_err(|_| ThingSetError::RequestIncomplete)? {
        id::ENDPOINT_IDS => {
            dec.take_uint().map_err(|_| ThingSetError::BadRequest)?;
            EndpointRef::DiscoverIds
        }
        id::ENDPOINT_PATHS => {
            dec.take_uint().map_err(|_| ThingSetError::BadRequest)?;
            EndpointRef::DiscoverPaths
        }
        first if first & MT_MASK == MT_TSTR => {
            let path = dec.take_tstr().map_err(ThingSetError::from)?;
            let endpoint = reg.resolve(path).ok_or(ThingSetError::NotFound)?;
            EndpointRef::Object(endpoint, Addressing::Names)
        }
        first if first & MT_MASK == MT_UINT => {
            let obj_id: ObjId = dec.take_u16().map_err(ThingSetError::from)?;
            let endpoint = if obj_id == id::ROOT {
                Endpoint::root()
            } else {
                Endpoint {
                    object: Some(reg.by_id(obj_id).ok_or(ThingSetError::NotFound)?),
                    record_index: None,
                }
            };
            EndpointRef::Object(endpoint, Addressing::Ids)
        }
        _ => return Err(ThingSetError::BadRequest),
    };

    match req[0] {
        method::GET => match endpoint {
            EndpointRef::Object(ep, addr) => get(ctx, resp, ep, addr, auth),
            _ => Err(ThingSetError::BadRequest),
        },
        method::FETCH => fetch(ctx, resp, endpoint, dec, auth),
        method::PATCH => match endpoint {
            EndpointRef::Object(ep, _) => {
                let updated = patch_payload(ctx, &mut dec, Some(ep.id()), auth, 0, false)?;
                if updated {
                    ctx.fire_update_callback();
                }
                if let Some(obj) = ep.object {
                    if let Some(callback) = obj.group_callback() {
                        callback();
                    }
                }
                Ok(respond(resp, status::CHANGED))
            }
            _ => Err(ThingSetError::BadRequest),
        },
        method::POST => match endpoint {
            EndpointRef::Object(ep, _) => match ep.object {
                Some(obj) if obj.is_exec() => exec(ctx, resp, obj, dec, auth),
                Some(obj) if obj.is_subset() => subset_modify(ctx, resp, obj, dec, auth, true),
                _ => Err(ThingSetError::MethodNotAllowed),
            },
            _ => Err(ThingSetError::BadRequest),
        },
        method::DELETE => match endpoint {
            EndpointRef::Object(ep, _) => match ep.object {
                Some(obj) if obj.is_subset() => subset_modify(ctx, resp, obj, dec, auth, false),
                _ => Err(ThingSetError::MethodNotAllowed),
            },
            _ => Err(ThingSetError::BadRequest),
        },
        _ => Err(ThingSetError::BadRequest),
    }
}

/***************************************************************************************************
 * Value serialization
 **************************************************************************************************/

fn round_to_int(value: f32) -> i64 {
    if value >= 0.0 {
        (value + 0.5) as i64
    } else {
        (value - 0.5) as i64
    }
}

fn encode_scalar(
    enc: &mut EncodeBuffer,
    value: ScalarValue,
    detail: i16,
) -> core::result::Result<(), CBORError> {
    match value {
        ScalarValue::Bool(v) => enc.put_bool(v).map(drop),
        ScalarValue::U64(v) => enc.put_uint(v).map(drop),
        ScalarValue::I64(v) => enc.put_int(v).map(drop),
        ScalarValue::F32(v) => {
            if detail == 0 {
                // round to 0 digits: use the integer encoding
                enc.put_int(round_to_int(v)).map(drop)
            } else {
                enc.put_f32(v).map(drop)
            }
        }
        ScalarValue::DecFrac(m) => enc.put_decfrac(m, detail).map(drop),
    }
}

/// Serialize the value of a data object.
pub(crate) fn encode_value(
    reg: &Registry,
    enc: &mut EncodeBuffer,
    obj: &Object,
) -> core::result::Result<(), CBORError> {
    match obj.data() {
        ObjData::Bool(c) => enc.put_bool(c.get()).map(drop),
        ObjData::U8(c) => enc.put_uint(c.get() as u64).map(drop),
        ObjData::I8(c) => enc.put_int(c.get() as i64).map(drop),
        ObjData::U16(c) => enc.put_uint(c.get() as u64).map(drop),
        ObjData::I16(c) => enc.put_int(c.get() as i64).map(drop),
        ObjData::U32(c) => enc.put_uint(c.get() as u64).map(drop),
        ObjData::I32(c) => enc.put_int(c.get() as i64).map(drop),
        ObjData::U64(c) => enc.put_uint(c.get()).map(drop),
        ObjData::I64(c) => enc.put_int(c.get()).map(drop),
        ObjData::F32(c) => encode_scalar(enc, ScalarValue::F32(c.get()), obj.detail()),
        ObjData::DecFrac(c) => enc.put_decfrac(c.get(), obj.detail()).map(drop),
        ObjData::String(s) => {
            let mut res = Ok(0);
            s.read(&mut |text| res = enc.put_tstr(text));
            res.map(drop)
        }
        ObjData::Bytes(b) => {
            let mut res = Ok(0);
            b.read(&mut |bytes| res = enc.put_bstr(bytes));
            res.map(drop)
        }
        ObjData::Array(a) => {
            enc.put_array_head(a.len())?;
            for i in 0..a.len() {
                match a.get(i) {
                    Some(elem) => encode_scalar(enc, elem, obj.detail())?,
                    None => return Err(CBORError::IncompatibleType),
                }
            }
            Ok(())
        }
        ObjData::Subset => {
            let members = reg.members(obj.subset_mask()).count();
            enc.put_array_head(members)?;
            for member in reg.members(obj.subset_mask()) {
                enc.put_uint(member.id() as u64)?;
            }
            Ok(())
        }
        ObjData::Group(_) | ObjData::Exec(_) | ObjData::Records(_) | ObjData::RecordItem(_) => {
            enc.put_null().map(drop)
        }
    }
}

/***************************************************************************************************
 * Value deserialization
 **************************************************************************************************/

fn take_scalar(
    dec: &mut SequenceBuffer,
    item_type: ItemType,
    detail: i16,
) -> Result<ScalarValue> {
    let value = match item_type {
        ItemType::Bool => ScalarValue::Bool(dec.take_bool()?),
        ItemType::U8 => ScalarValue::U64(dec.take_u8()? as u64),
        ItemType::U16 => ScalarValue::U64(dec.take_u16()? as u64),
        ItemType::U32 => ScalarValue::U64(dec.take_u32()? as u64),
        ItemType::U64 => ScalarValue::U64(dec.take_uint()?),
        ItemType::I8 => ScalarValue::I64(dec.take_i8()? as i64),
        ItemType::I16 => ScalarValue::I64(dec.take_i16()? as i64),
        ItemType::I32 => ScalarValue::I64(dec.take_i32()? as i64),
        ItemType::I64 => ScalarValue::I64(dec.take_int()?),
        ItemType::F32 => ScalarValue::F32(dec.take_f32()?),
        ItemType::DecFrac => ScalarValue::DecFrac(dec.take_decfrac(detail)?),
    };
    Ok(value)
}

/// Deserialize one CBOR item into a data object. With `commit` unset the value is decoded and
/// range checked but nothing is written, so a failing later element leaves all previous targets
/// untouched.
pub(crate) fn decode_value(
    dec: &mut SequenceBuffer,
    obj: &Object,
    commit: bool,
) -> Result<()> {
    match obj.data() {
        ObjData::Bool(c) => {
            let v = dec.take_bool()?;
            if commit {
                c.set(v);
            }
        }
        ObjData::U8(c) => {
            let v = dec.take_u8()?;
            if commit {
                c.set(v);
            }
        }
        ObjData::I8(c) => {
            let v = dec.take_i8()?;
            if commit {
                c.set(v);
            }
        }
        ObjData::U16(c) => {
            let v = dec.take_u16()?;
            if commit {
                c.set(v);
            }
        }
        ObjData::I16(c) => {
            let v = dec.take_i16()?;
            if commit {
                c.set(v);
            }
        }
        ObjData::U32(c) => {
            let v = dec.take_u32()?;
            if commit {
                c.set(v);
            }
        }
        ObjData::I32(c) => {
            let v = dec.take_i32()?;
            if commit {
                c.set(v);
            }
        }
        ObjData::U64(c) => {
            let v = dec.take_uint()?;
            if commit {
                c.set(v);
            }
        }
        ObjData::I64(c) => {
            let v = dec.take_int()?;
            if commit {
                c.set(v);
            }
        }
        ObjData::F32(c) => {
            let v = dec.take_f32()?;
            if commit {
                c.set(v);
            }
        }
        ObjData::DecFrac(c) => {
            let v = dec.take_decfrac(obj.detail())?;
            if commit {
                c.set(v);
            }
        }
        ObjData::String(s) => {
            let text = dec.take_tstr()?;
            if text.len() >= s.capacity() {
                return Err(ThingSetError::RequestTooLarge);
            }
            if commit && !s.write(text) {
                return Err(ThingSetError::InternalError);
            }
        }
        ObjData::Bytes(b) => {
            let bytes = dec.take_bstr()?;
            if bytes.len() > b.capacity() {
                return Err(ThingSetError::RequestTooLarge);
            }
            if commit && !b.write(bytes) {
                return Err(ThingSetError::InternalError);
            }
        }
        ObjData::Array(a) => {
            let num = dec.take_array_head()?;
            if num > a.capacity() {
                return Err(ThingSetError::BadRequest);
            }
            for i in 0..num {
                let elem = take_scalar(dec, a.elem_type(), obj.detail())?;
                if commit && !a.set(i, elem) {
                    return Err(ThingSetError::UnsupportedFormat);
                }
            }
            if commit && !a.set_len(num) {
                return Err(ThingSetError::InternalError);
            }
        }
        _ => return Err(ThingSetError::UnsupportedFormat),
    }
    Ok(())
}

/***************************************************************************************************
 * Request handlers
 **************************************************************************************************/

fn read_denied(obj: &Object) -> ThingSetError {
    if obj.read_allowed() {
        ThingSetError::Unauthorized
    } else {
        ThingSetError::Forbidden
    }
}

fn write_denied(obj: &Object) -> ThingSetError {
    if obj.write_allowed() {
        ThingSetError::Unauthorized
    } else {
        ThingSetError::Forbidden
    }
}

fn encoding_failed(err: CBORError) -> ThingSetError {
    match err {
        CBORError::EndOfBuffer => ThingSetError::ResponseTooLarge,
        _ => ThingSetError::InternalError,
    }
}

fn child_key(
    enc: &mut EncodeBuffer,
    obj: &Object,
    addr: Addressing,
) -> core::result::Result<(), CBORError> {
    match addr {
        Addressing::Ids => enc.put_uint(obj.id() as u64).map(drop),
        Addressing::Names => enc.put_tstr(obj.name()).map(drop),
    }
}

fn get(
    ctx: &Context,
    resp: &mut [u8],
    endpoint: Endpoint,
    addr: Addressing,
    auth: u16,
) -> Result<usize> {
    let reg = ctx.registry();
    respond(resp, status::CONTENT);
    let (_, payload) = resp.split_at_mut(1);
    let mut enc = EncodeBuffer::new(payload);

    if let Some(obj) = endpoint.object {
        match obj.data() {
            ObjData::Group(_) => {}
            ObjData::Exec(_) => {
                // parameter listing only; exec objects hold no readable value
                let params = reg.children(obj.id()).count();
                enc.put_array_head(params).map_err(encoding_failed)?;
                for param in reg.children(obj.id()) {
                    child_key(&mut enc, param, addr).map_err(encoding_failed)?;
                }
                return Ok(1 + enc.len());
            }
            ObjData::Records(store) => {
                return match endpoint.record_index {
                    Some(index) if index < store.num_records() => {
                        let fields = reg
                            .children(obj.id())
                            .filter(|o| matches!(o.data(), ObjData::RecordItem(_)))
                            .count();
                        enc.put_map_head(fields).map_err(encoding_failed)?;
                        let mut field = 0;
                        for item in reg.children(obj.id()) {
                            if let ObjData::RecordItem(_) = item.data() {
                                let value = store
                                    .field(index, field)
                                    .ok_or(ThingSetError::InternalError)?;
                                child_key(&mut enc, item, addr).map_err(encoding_failed)?;
                                encode_scalar(&mut enc, value, item.detail())
                                    .map_err(encoding_failed)?;
                                field += 1;
                            }
                        }
                        Ok(1 + enc.len())
                    }
                    Some(_) => Err(ThingSetError::NotFound),
                    None => {
                        enc.put_uint(store.num_records() as u64)
                            .map_err(encoding_failed)?;
                        Ok(1 + enc.len())
                    }
                };
            }
            _ => {
                // single object endpoint: the entire value is emitted
                if !obj.readable(auth) {
                    return Err(read_denied(obj));
                }
                if let (ObjData::RecordItem(_), Some(index)) = (obj.data(), endpoint.record_index)
                {
                    let value = reg
                        .record_field(obj, index)
                        .ok_or(ThingSetError::NotFound)?;
                    encode_scalar(&mut enc, value, obj.detail()).map_err(encoding_failed)?;
                } else {
                    encode_value(reg, &mut enc, obj).map_err(encoding_failed)?;
                }
                return Ok(1 + enc.len());
            }
        }
    }

    // listing of a container's children, keyed the way the client addressed us
    let children = reg
        .children(endpoint.id())
        .filter(|o| o.readable(auth))
        .count();
    enc.put_map_head(children).map_err(encoding_failed)?;
    for child in reg.children(endpoint.id()) {
        if !child.readable(auth) {
            continue;
        }
        child_key(&mut enc, child, addr).map_err(encoding_failed)?;
        encode_value(reg, &mut enc, child).map_err(encoding_failed)?;
    }
    Ok(1 + enc.len())
}

fn fetch(
    ctx: &Context,
    resp: &mut [u8],
    endpoint: EndpointRef,
    mut dec: SequenceBuffer,
    auth: u16,
) -> Result<usize> {
    let reg = ctx.registry();

    // the undefined value requests discovery of the child objects
    if let EndpointRef::Object(ep, addr) = &endpoint {
        if dec.is_undefined() {
            dec.take_undefined().map_err(ThingSetError::from)?;
            respond(resp, status::CONTENT);
            let (_, payload) = resp.split_at_mut(1);
            let mut enc = EncodeBuffer::new(payload);
            let children = reg
                .children(ep.id())
                .filter(|o| o.readable(auth))
                .count();
            enc.put_array_head(children).map_err(encoding_failed)?;
            for child in reg.children(ep.id()) {
                if !child.readable(auth) {
                    continue;
                }
                child_key(&mut enc, child, *addr).map_err(encoding_failed)?;
            }
            return Ok(1 + enc.len());
        }
    }

    let wrapped = matches!(dec.peek_major(), Ok(major) if major == MT_ARRAY);
    let count = if wrapped {
        dec.take_array_head().map_err(|_| ThingSetError::BadRequest)?
    } else {
        1
    };

    respond(resp, status::CONTENT);
    let (_, payload) = resp.split_at_mut(1);
    let mut enc = EncodeBuffer::new(payload);
    if count > 1 {
        enc.put_array_head(count).map_err(encoding_failed)?;
    }

    for _ in 0..count {
        let obj = match dec.peek_major().map_err(ThingSetError::from)? {
            MT_TSTR => {
                let name = dec.take_tstr().map_err(ThingSetError::from)?;
                match &endpoint {
                    // discovery of an ID from a path: the string is a complete path
                    EndpointRef::DiscoverIds => reg.by_path(name),
                    EndpointRef::Object(ep, _) => reg.by_name(Some(ep.id()), name),
                    EndpointRef::DiscoverPaths => return Err(ThingSetError::BadRequest),
                }
            }
            MT_UINT => {
                let obj_id = dec.take_u16().map_err(ThingSetError::from)?;
                reg.by_id(obj_id)
            }
            _ => return Err(ThingSetError::BadRequest),
        }
        .ok_or(ThingSetError::NotFound)?;

        if !obj.readable(auth) {
            return Err(read_denied(obj));
        }

        match &endpoint {
            EndpointRef::Object(..) => {
                encode_value(reg, &mut enc, obj).map_err(encoding_failed)?
            }
            EndpointRef::DiscoverIds => {
                enc.put_uint(obj.id() as u64).map_err(encoding_failed)?;
            }
            EndpointRef::DiscoverPaths => {
                let mut path_buf = [0u8; 64];
                let mut path = JsonWriter::new(&mut path_buf);
                reg.write_path(obj, &mut path)
                    .map_err(|_| ThingSetError::InternalError)?;
                let len = path.len();
                let path_str = core::str::from_utf8(&path_buf[..len])
                    .map_err(|_| ThingSetError::InternalError)?;
                enc.put_tstr(path_str).map_err(encoding_failed)?;
            }
        }
    }
    Ok(1 + enc.len())
}

/// The shared PATCH payload walk: first pass checks every key and value, the second pass
/// commits. With `import` set, unknown IDs are skipped (forward compatible restore) and no
/// parent check applies.
pub(crate) fn patch_payload(
    ctx: &Context,
    dec: &mut SequenceBuffer,
    parent: Option<ObjId>,
    auth: u16,
    subsets: u16,
    import: bool,
) -> Result<bool> {
    let num = dec
        .take_map_head()
        .map_err(|_| ThingSetError::BadRequest)?;
    let mut commit_pass = *dec;
    patch_pass(ctx, dec, num, parent, auth, subsets, import, false)?;
    patch_pass(ctx, &mut commit_pass, num, parent, auth, subsets, import, true)
}

#[allow(clippy::too_many_arguments)]
fn patch_pass(
    ctx: &Context,
    dec: &mut SequenceBuffer,
    num: usize,
    parent: Option<ObjId>,
    auth: u16,
    subsets: u16,
    import: bool,
    commit: bool,
) -> Result<bool> {
    let reg = ctx.registry();
    let mut updated = false;
    for _ in 0..num {
        let obj = match dec.peek_major().map_err(|_| ThingSetError::BadRequest)? {
            MT_UINT => {
                let obj_id = dec.take_u16().map_err(|_| ThingSetError::BadRequest)?;
                reg.by_id(obj_id)
            }
            MT_TSTR => {
                let name = dec.take_tstr().map_err(|_| ThingSetError::BadRequest)?;
                reg.by_name(Some(parent.unwrap_or(id::ROOT)), name)
            }
            _ => return Err(ThingSetError::BadRequest),
        };

        let obj = match obj {
            Some(obj) => obj,
            None => {
                if import {
                    // object not present on this device: skip for forward compatibility
                    dec.skip_item().map_err(|_| ThingSetError::BadRequest)?;
                    continue;
                }
                return Err(ThingSetError::NotFound);
            }
        };

        if !obj.writable(auth) {
            return Err(write_denied(obj));
        }
        if let Some(parent_id) = parent {
            if obj.parent() != parent_id {
                return Err(ThingSetError::NotFound);
            }
        }
        if subsets != 0 && obj.subsets() & subsets == 0 {
            // not part of the requested subsets: ignore the element
            dec.skip_item().map_err(|_| ThingSetError::BadRequest)?;
            continue;
        }

        decode_value(dec, obj, commit)?;
        if obj.subsets() & ctx.update_subsets() != 0 {
            updated = true;
        }
    }
    Ok(updated && commit)
}

fn exec(
    ctx: &Context,
    resp: &mut [u8],
    obj: &Object,
    mut dec: SequenceBuffer,
    auth: u16,
) -> Result<usize> {
    let reg = ctx.registry();
    let num = dec
        .take_array_head()
        .map_err(|_| ThingSetError::BadRequest)?;

    let function = match obj.data() {
        ObjData::Exec(function) if obj.write_allowed() => {
            // object is generally executable, but are we authorized?
            if !obj.writable(auth) {
                return Err(ThingSetError::Unauthorized);
            }
            function
        }
        _ => return Err(ThingSetError::Forbidden),
    };

    let mut args = 0;
    for param in reg.children(obj.id()) {
        if args >= num {
            // more parameter objects than arguments were passed
            return Err(ThingSetError::BadRequest);
        }
        decode_value(&mut dec, param, true).map_err(|err| match err {
            ThingSetError::BadRequest => ThingSetError::BadRequest,
            _ => ThingSetError::UnsupportedFormat,
        })?;
        args += 1;
    }

    if num > args {
        // more arguments passed than parameter objects found
        return Err(ThingSetError::BadRequest);
    }

    function();
    Ok(respond(resp, status::VALID))
}

fn subset_modify(
    ctx: &Context,
    resp: &mut [u8],
    obj: &Object,
    mut dec: SequenceBuffer,
    auth: u16,
    add: bool,
) -> Result<usize> {
    let reg = ctx.registry();
    if !obj.writable(auth) {
        return Err(write_denied(obj));
    }
    let target = match dec.peek_major().map_err(ThingSetError::from)? {
        MT_TSTR => {
            let name = dec.take_tstr().map_err(ThingSetError::from)?;
            if name.contains('/') {
                reg.by_path(name)
            } else {
                reg.by_name(None, name)
            }
        }
        MT_UINT => reg.by_id(dec.take_u16().map_err(ThingSetError::from)?),
        _ => return Err(ThingSetError::BadRequest),
    }
    .ok_or(ThingSetError::NotFound)?;

    if add {
        target.add_subsets(obj.subset_mask());
        Ok(respond(resp, status::CREATED))
    } else {
        target.remove_subsets(obj.subset_mask());
        Ok(respond(resp, status::DELETED))
    }
}

/***************************************************************************************************
 * Statements, export and import
 **************************************************************************************************/

/// Emit an unsolicited statement for a subset or group object. Only top-level endpoints are
/// supported; any other object yields a zero-length output.
pub(crate) fn statement(ctx: &Context, buf: &mut [u8], obj: &Object) -> usize {
    if obj.parent() != id::ROOT {
        // currently only supporting top level objects
        return 0;
    }
    statement_inner(ctx, buf, obj).unwrap_or(0)
}

fn statement_inner(ctx: &Context, buf: &mut [u8], obj: &Object) -> Result<usize> {
    let reg = ctx.registry();
    if buf.is_empty() {
        return Ok(0);
    }
    buf[0] = method::STATEMENT;
    let (_, payload) = buf.split_at_mut(1);
    let mut enc = EncodeBuffer::new(payload);
    enc.put_uint(obj.id() as u64).map_err(encoding_failed)?;

    match obj.data() {
        ObjData::Subset => {
            let mask = obj.subset_mask();
            enc.put_array_head(reg.members(mask).count())
                .map_err(encoding_failed)?;
            for member in reg.members(mask) {
                encode_value(reg, &mut enc, member).map_err(encoding_failed)?;
            }
        }
        ObjData::Group(_) => {
            enc.put_array_head(reg.children(obj.id()).count())
                .map_err(encoding_failed)?;
            for child in reg.children(obj.id()) {
                encode_value(reg, &mut enc, child).map_err(encoding_failed)?;
            }
        }
        _ => return Ok(0),
    }
    Ok(1 + enc.len())
}

/// Serialize every object of the given subsets as a CBOR map from ID to value, e.g. to persist
/// the configuration to non-volatile memory.
pub(crate) fn export(ctx: &Context, buf: &mut [u8], subsets: u16) -> Result<usize> {
    let reg = ctx.registry();
    let mut enc = EncodeBuffer::new(buf);
    enc.put_map_head(reg.members(subsets).count())
        .map_err(encoding_failed)?;
    for member in reg.members(subsets) {
        enc.put_uint(member.id() as u64).map_err(encoding_failed)?;
        encode_value(reg, &mut enc, member).map_err(encoding_failed)?;
    }
    Ok(enc.len())
}

/// Restore previously exported data. Runs with elevated access flags since this is a local
/// restoration rather than a remote write; unknown IDs are skipped, any type mismatch fails
/// the whole import before a single value is written.
pub(crate) fn import(ctx: &Context, data: &[u8], subsets: u16) -> Result<()> {
    let mut dec = SequenceBuffer::new(data);
    let elevated = access::READ_MASK | access::WRITE_MASK;
    let updated = patch_payload(ctx, &mut dec, None, elevated, subsets, true)?;
    if updated {
        ctx.fire_update_callback();
    }
    Ok(())
}
