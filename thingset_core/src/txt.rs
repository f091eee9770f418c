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
 * ThingSet text mode
 *
 * Request handlers for the JSON based text encoding: response status lines, value
 * serialization, and the GET / FETCH / PATCH / POST / DELETE / EXEC semantics plus statements
 * and text export.
 **************************************************************************************************/
use std::fmt::Write as _;
use std::str::from_utf8;

use thingset_common::{id, limit, method, status};
use thingset_error::ThingSetError;

use crate::ctx::Context;
use crate::json::{tokenize, JsonError, JsonWriter, Token, TokenKind};
use crate::obj::{ObjData, Object, Registry, ScalarValue};
use crate::path::Endpoint;

type Result<T> = core::result::Result<T, ThingSetError>;

#[cfg(feature = "verbose-status")]
fn status_message(code: u8) -> &'static str {
    match code {
        // success
        status::CREATED => "Created",
        status::DELETED => "Deleted",
        status::VALID => "Valid",
        status::CHANGED => "Changed",
        status::CONTENT => "Content",
        // client errors
        status::BAD_REQUEST => "Bad Request",
        status::UNAUTHORIZED => "Unauthorized",
        status::FORBIDDEN => "Forbidden",
        status::NOT_FOUND => "Not Found",
        status::METHOD_NOT_ALLOWED => "Method Not Allowed",
        status::REQUEST_INCOMPLETE => "Request Entity Incomplete",
        status::CONFLICT => "Conflict",
        status::REQUEST_TOO_LARGE => "Request Entity Too Large",
        status::UNSUPPORTED_FORMAT => "Unsupported Content-Format",
        // server errors
        status::INTERNAL_SERVER_ERR => "Internal Server Error",
        status::NOT_IMPLEMENTED => "Not Implemented",
        // ThingSet specific errors
        status::RESPONSE_TOO_LARGE => "Response too large",
        _ => "Error",
    }
}

fn write_status(w: &mut JsonWriter, code: u8) -> core::fmt::Result {
    #[cfg(feature = "verbose-status")]
    {
        write!(w, ":{:02X} {}.", code, status_message(code))
    }
    #[cfg(not(feature = "verbose-status"))]
    {
        write!(w, ":{:02X}.", code)
    }
}

/// Fill the response buffer with a bare status line.
pub(crate) fn respond(resp: &mut [u8], code: u8) -> usize {
    let mut w = JsonWriter::new(resp);
    match write_status(&mut w, code) {
        Ok(()) => w.len(),
        Err(_) => 0,
    }
}

/// Process one complete text request and write a single response message.
pub(crate) fn process(ctx: &Context, req: &[u8], resp: &mut [u8]) -> usize {
    match process_inner(ctx, req, resp) {
        Ok(len) => len,
        Err(err) => respond(resp, u8::from(err)),
    }
}

fn process_inner(ctx: &Context, req: &[u8], resp: &mut [u8]) -> Result<usize> {
    let text = from_utf8(req).map_err(|_| ThingSetError::BadRequest)?;
    let rest = &text[1..];
    let (path, payload) = match rest.find(' ') {
        Some(pos) => (&rest[..pos], &rest[pos + 1..]),
        None => (rest, ""),
    };
    let trailing_slash = path.ends_with('/');
    let endpoint = ctx
        .registry()
        .resolve(path)
        .ok_or(ThingSetError::NotFound)?;

    let mut tokens = [Token::EMPTY; limit::JSON_TOKENS];
    let count = match tokenize(payload, &mut tokens) {
        Ok(count) => count,
        Err(JsonError::NoMemory) => return Err(ThingSetError::RequestTooLarge),
        Err(_) => return Err(ThingSetError::BadRequest),
    };
    let tokens = &tokens[..count];

    let auth = ctx.authentication();
    match req[0] {
        method::TXT_GET if count == 0 => {
            if trailing_slash {
                // discovery is only allowed for containers
                match endpoint.object {
                    None => get(ctx, resp, endpoint, false, auth),
                    Some(obj) if obj.is_group() || obj.is_exec() || obj.is_records() => {
                        get(ctx, resp, endpoint, false, auth)
                    }
                    _ => Err(ThingSetError::BadRequest),
                }
            } else {
                get(ctx, resp, endpoint, true, auth)
            }
        }
        method::TXT_EXEC => exec(ctx, resp, endpoint, payload, tokens, auth),
        method::TXT_GET => fetch(ctx, resp, endpoint, payload, tokens, auth),
        method::TXT_PATCH if count > 0 => patch(ctx, resp, endpoint, payload, tokens, auth),
        method::TXT_CREATE if count > 0 => create(ctx, resp, endpoint, payload, tokens, auth),
        method::TXT_DELETE if count > 0 => delete(ctx, resp, endpoint, payload, tokens, auth),
        _ => Err(ThingSetError::BadRequest),
    }
}

/***************************************************************************************************
 * Value serialization
 **************************************************************************************************/

fn overflow(_: core::fmt::Error) -> ThingSetError {
    ThingSetError::ResponseTooLarge
}

/// Serialize one scalar with a trailing comma. The comma is removed by the caller once the
/// surrounding list or map is complete.
fn write_scalar(w: &mut JsonWriter, value: ScalarValue, detail: i16) -> Result<()> {
    match value {
        ScalarValue::Bool(v) => {
            write!(w, "{},", if v { "true" } else { "false" }).map_err(overflow)
        }
        ScalarValue::U64(v) => write!(w, "{},", v).map_err(overflow),
        ScalarValue::I64(v) => write!(w, "{},", v).map_err(overflow),
        ScalarValue::F32(v) => {
            if v.is_nan() || v.is_infinite() {
                // JSON does not support NaN and Inf, so null is used instead
                write!(w, "null,").map_err(overflow)
            } else {
                let digits = if detail < 0 { 0 } else { detail as usize };
                write!(w, "{:.*},", digits, v).map_err(overflow)
            }
        }
        ScalarValue::DecFrac(m) => write!(w, "{}e{},", m, detail).map_err(overflow),
    }
}

/// Serialize the value of a data object with a trailing comma, the way it appears in maps,
/// arrays and single-value responses.
pub(crate) fn write_value(reg: &Registry, w: &mut JsonWriter, obj: &Object) -> Result<()> {
    match obj.data() {
        ObjData::Bool(c) => write_scalar(w, ScalarValue::Bool(c.get()), 0),
        ObjData::U8(c) => write_scalar(w, ScalarValue::U64(c.get() as u64), 0),
        ObjData::I8(c) => write_scalar(w, ScalarValue::I64(c.get() as i64), 0),
        ObjData::U16(c) => write_scalar(w, ScalarValue::U64(c.get() as u64), 0),
        ObjData::I16(c) => write_scalar(w, ScalarValue::I64(c.get() as i64), 0),
        ObjData::U32(c) => write_scalar(w, ScalarValue::U64(c.get() as u64), 0),
        ObjData::I32(c) => write_scalar(w, ScalarValue::I64(c.get() as i64), 0),
        ObjData::U64(c) => write_scalar(w, ScalarValue::U64(c.get()), 0),
        ObjData::I64(c) => write_scalar(w, ScalarValue::I64(c.get()), 0),
        ObjData::F32(c) => write_scalar(w, ScalarValue::F32(c.get()), obj.detail()),
        ObjData::DecFrac(c) => write_scalar(w, ScalarValue::DecFrac(c.get()), obj.detail()),
        ObjData::String(s) => {
            let mut res = Ok(());
            s.read(&mut |text| res = write!(w, "\"{}\",", text));
            res.map_err(overflow)
        }
        ObjData::Array(a) => {
            w.push(b'[').map_err(overflow)?;
            for i in 0..a.len() {
                let elem = a.get(i).ok_or(ThingSetError::InternalError)?;
                write_scalar(w, elem, obj.detail())?;
            }
            if a.len() > 0 {
                w.pop();
            }
            write!(w, "],").map_err(overflow)
        }
        ObjData::Exec(_) => {
            // parameter names, so a client can discover the expected argument list
            w.push(b'[').map_err(overflow)?;
            let mut found = 0;
            for child in reg.children(obj.id()) {
                write!(w, "\"{}\",", child.name()).map_err(overflow)?;
                found += 1;
            }
            if found > 0 {
                w.pop();
                write!(w, "],").map_err(overflow)
            } else {
                w.pop();
                write!(w, "null,").map_err(overflow)
            }
        }
        ObjData::Subset => {
            w.push(b'[').map_err(overflow)?;
            let mut found = 0;
            for member in reg.members(obj.subset_mask()) {
                w.push(b'"').map_err(overflow)?;
                reg.write_path(member, w).map_err(overflow)?;
                write!(w, "\",").map_err(overflow)?;
                found += 1;
            }
            if found > 0 {
                w.pop();
            }
            write!(w, "],").map_err(overflow)
        }
        ObjData::Bytes(_)
        | ObjData::Group(_)
        | ObjData::Records(_)
        | ObjData::RecordItem(_) => write!(w, "null,").map_err(overflow),
    }
}

fn write_name_value(reg: &Registry, w: &mut JsonWriter, obj: &Object) -> Result<()> {
    write!(w, "\"{}\":", obj.name()).map_err(overflow)?;
    write_value(reg, w, obj)
}

/***************************************************************************************************
 * Value deserialization
 **************************************************************************************************/

/// Deserialize one JSON token into a data object. With `commit` unset the value is only
/// checked against the target type; nothing is written, so a failing later element leaves all
/// previous targets untouched.
fn parse_value(text: &str, kind: TokenKind, obj: &Object, commit: bool) -> Result<()> {
    if kind != TokenKind::Primitive && kind != TokenKind::Str {
        return Err(ThingSetError::UnsupportedFormat);
    }
    match obj.data() {
        ObjData::Bool(c) => {
            let value = match text.as_bytes().first() {
                Some(b't') | Some(b'1') => true,
                Some(b'f') | Some(b'0') => false,
                _ => return Err(ThingSetError::UnsupportedFormat),
            };
            if commit {
                c.set(value);
            }
        }
        ObjData::U8(c) => {
            let value = text
                .parse()
                .map_err(|_| ThingSetError::UnsupportedFormat)?;
            if commit {
                c.set(value);
            }
        }
        ObjData::I8(c) => {
            let value = text
                .parse()
                .map_err(|_| ThingSetError::UnsupportedFormat)?;
            if commit {
                c.set(value);
            }
        }
        ObjData::U16(c) => {
            let value = text
                .parse()
                .map_err(|_| ThingSetError::UnsupportedFormat)?;
            if commit {
                c.set(value);
            }
        }
        ObjData::I16(c) => {
            let value = text
                .parse()
                .map_err(|_| ThingSetError::UnsupportedFormat)?;
            if commit {
                c.set(value);
            }
        }
        ObjData::U32(c) => {
            let value = text
                .parse()
                .map_err(|_| ThingSetError::UnsupportedFormat)?;
            if commit {
                c.set(value);
            }
        }
        ObjData::I32(c) => {
            let value = text
                .parse()
                .map_err(|_| ThingSetError::UnsupportedFormat)?;
            if commit {
                c.set(value);
            }
        }
        ObjData::U64(c) => {
            let value = text
                .parse()
                .map_err(|_| ThingSetError::UnsupportedFormat)?;
            if commit {
                c.set(value);
            }
        }
        ObjData::I64(c) => {
            let value = text
                .parse()
                .map_err(|_| ThingSetError::UnsupportedFormat)?;
            if commit {
                c.set(value);
            }
        }
        ObjData::F32(c) => {
            let value: f32 = text
                .parse()
                .map_err(|_| ThingSetError::UnsupportedFormat)?;
            if commit {
                c.set(value);
            }
        }
        ObjData::DecFrac(c) => {
            let mut value: f32 = text
                .parse()
                .map_err(|_| ThingSetError::UnsupportedFormat)?;
            // rescale to the object's fixed exponent
            let mut e = 0i16;
            while e < obj.detail() {
                value /= 10.0;
                e += 1;
            }
            while e > obj.detail() {
                value *= 10.0;
                e -= 1;
            }
            if commit {
                c.set(value as i32);
            }
        }
        ObjData::String(s) => {
            if kind != TokenKind::Str {
                return Err(ThingSetError::UnsupportedFormat);
            }
            if text.len() >= s.capacity() {
                return Err(ThingSetError::RequestTooLarge);
            }
            if commit && !s.write(text) {
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

fn get(
    ctx: &Context,
    resp: &mut [u8],
    endpoint: Endpoint,
    include_values: bool,
    auth: u16,
) -> Result<usize> {
    let reg = ctx.registry();
    let mut w = JsonWriter::new(resp);
    write_status(&mut w, status::CONTENT).map_err(overflow)?;

    if let Some(obj) = endpoint.object {
        match obj.data() {
            ObjData::Group(_) => {}
            ObjData::Exec(_) => {
                if include_values {
                    // the values of an exec object cannot be read
                    return Err(ThingSetError::BadRequest);
                }
            }
            ObjData::Records(store) => {
                if !include_values {
                    write!(w, " {}", store.num_records()).map_err(overflow)?;
                    return Ok(w.len());
                }
                return match endpoint.record_index {
                    Some(index) if index < store.num_records() => {
                        w.push(b' ').map_err(overflow)?;
                        w.push(b'{').map_err(overflow)?;
                        let mut field = 0;
                        for item in reg.children(obj.id()) {
                            if let ObjData::RecordItem(_) = item.data() {
                                let value = store
                                    .field(index, field)
                                    .ok_or(ThingSetError::InternalError)?;
                                write!(w, "\"{}\":", item.name()).map_err(overflow)?;
                                write_scalar(&mut w, value, item.detail())?;
                                field += 1;
                            }
                        }
                        if field > 0 {
                            w.pop();
                        }
                        w.push(b'}').map_err(overflow)?;
                        Ok(w.len())
                    }
                    Some(_) => Err(ThingSetError::NotFound),
                    None => {
                        write!(w, " null").map_err(overflow)?;
                        Ok(w.len())
                    }
                };
            }
            _ => {
                // single object endpoint: the entire value is emitted
                if !obj.readable(auth) {
                    return Err(if obj.read_allowed() {
                        ThingSetError::Unauthorized
                    } else {
                        ThingSetError::Forbidden
                    });
                }
                w.push(b' ').map_err(overflow)?;
                if let (ObjData::RecordItem(_), Some(index)) = (obj.data(), endpoint.record_index)
                {
                    let value = reg
                        .record_field(obj, index)
                        .ok_or(ThingSetError::NotFound)?;
                    write_scalar(&mut w, value, obj.detail())?;
                } else {
                    write_value(reg, &mut w, obj)?;
                }
                w.pop();
                return Ok(w.len());
            }
        }
    }

    // listing of a container's children
    w.push(b' ').map_err(overflow)?;
    w.push(if include_values { b'{' } else { b'[' })
        .map_err(overflow)?;
    let mut found = 0;
    for child in reg.children(endpoint.id()) {
        if !child.readable(auth) {
            continue;
        }
        if include_values {
            write_name_value(reg, &mut w, child)?;
        } else {
            write!(w, "\"{}\",", child.name()).map_err(overflow)?;
        }
        found += 1;
    }
    if found > 0 {
        w.pop();
    }
    w.push(if include_values { b'}' } else { b']' })
        .map_err(overflow)?;
    Ok(w.len())
}

fn fetch(
    ctx: &Context,
    resp: &mut [u8],
    endpoint: Endpoint,
    payload: &str,
    tokens: &[Token],
    auth: u16,
) -> Result<usize> {
    let reg = ctx.registry();
    let mut w = JsonWriter::new(resp);
    write_status(&mut w, status::CONTENT).map_err(overflow)?;

    let wrapped = tokens[0].kind == TokenKind::Array;
    let mut tok = if wrapped {
        write!(w, " [").map_err(overflow)?;
        1
    } else {
        w.push(b' ').map_err(overflow)?;
        0
    };

    while tok < tokens.len() {
        if tokens[tok].kind != TokenKind::Str {
            return Err(ThingSetError::BadRequest);
        }
        let name = tokens[tok].text(payload);
        let obj = reg
            .by_name(Some(endpoint.id()), name)
            .ok_or(ThingSetError::NotFound)?;
        if obj.is_group() {
            // the values of a group cannot be fetched
            return Err(ThingSetError::BadRequest);
        }
        if !obj.readable(auth) {
            return Err(if obj.read_allowed() {
                ThingSetError::Unauthorized
            } else {
                ThingSetError::Forbidden
            });
        }
        write_value(reg, &mut w, obj)?;
        tok += 1;
    }

    w.pop();
    if wrapped {
        w.push(b']').map_err(overflow)?;
    }
    Ok(w.len())
}

fn patch(
    ctx: &Context,
    resp: &mut [u8],
    endpoint: Endpoint,
    payload: &str,
    tokens: &[Token],
    auth: u16,
) -> Result<usize> {
    let reg = ctx.registry();
    if tokens.len() < 2 {
        return Err(ThingSetError::BadRequest);
    }
    let start = if tokens[0].kind == TokenKind::Object {
        1
    } else {
        0
    };

    // first pass: check every name and value without touching any object
    let mut tok = start;
    while tok + 1 < tokens.len() {
        if tokens[tok].kind != TokenKind::Str {
            return Err(ThingSetError::BadRequest);
        }
        let obj = reg
            .by_name(Some(endpoint.id()), tokens[tok].text(payload))
            .ok_or(ThingSetError::NotFound)?;
        if !obj.writable(auth) {
            return Err(if obj.write_allowed() {
                ThingSetError::Unauthorized
            } else {
                ThingSetError::Forbidden
            });
        }
        parse_value(
            tokens[tok + 1].text(payload),
            tokens[tok + 1].kind,
            obj,
            false,
        )?;
        tok += 2;
    }

    // second pass: actually write the data
    let mut updated = false;
    tok = start;
    while tok + 1 < tokens.len() {
        let obj = reg
            .by_name(Some(endpoint.id()), tokens[tok].text(payload))
            .ok_or(ThingSetError::InternalError)?;
        parse_value(
            tokens[tok + 1].text(payload),
            tokens[tok + 1].kind,
            obj,
            true,
        )?;
        if obj.subsets() & ctx.update_subsets() != 0 {
            updated = true;
        }
        tok += 2;
    }

    if updated {
        ctx.fire_update_callback();
    }
    if let Some(obj) = endpoint.object {
        if let Some(callback) = obj.group_callback() {
            callback();
        }
    }
    Ok(respond(resp, status::CHANGED))
}

fn exec(
    ctx: &Context,
    resp: &mut [u8],
    endpoint: Endpoint,
    payload: &str,
    tokens: &[Token],
    auth: u16,
) -> Result<usize> {
    let reg = ctx.registry();
    let obj = endpoint.object.ok_or(ThingSetError::Forbidden)?;

    let mut tok = 0;
    if !tokens.is_empty() && tokens[0].kind == TokenKind::Array {
        tok = 1;
    }

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

    for param in reg.children(obj.id()) {
        if tok >= tokens.len() {
            // more parameter objects than arguments were passed
            return Err(ThingSetError::BadRequest);
        }
        parse_value(tokens[tok].text(payload), tokens[tok].kind, param, true)?;
        tok += 1;
    }

    if tokens.len() > tok {
        // more arguments passed than parameter objects found
        return Err(ThingSetError::BadRequest);
    }

    function();
    Ok(respond(resp, status::VALID))
}

/// Look up the object named by a subset-modification payload: a plain name searches the whole
/// registry, a path with separators resolves level by level.
fn subset_target<'a>(reg: &Registry<'a>, name: &str) -> Option<&'a Object<'a>> {
    if name.contains('/') {
        reg.by_path(name)
    } else {
        reg.by_name(None, name)
    }
}

fn create(
    ctx: &Context,
    resp: &mut [u8],
    endpoint: Endpoint,
    payload: &str,
    tokens: &[Token],
    auth: u16,
) -> Result<usize> {
    let obj = endpoint.object.ok_or(ThingSetError::MethodNotAllowed)?;
    if tokens.len() > 1 {
        // only a single JSON primitive is supported at the moment
        return Err(ThingSetError::NotImplemented);
    }
    match obj.data() {
        ObjData::Array(_) => Err(ThingSetError::NotImplemented),
        ObjData::Subset => {
            if tokens[0].kind != TokenKind::Str {
                return Err(ThingSetError::MethodNotAllowed);
            }
            if !obj.writable(auth) {
                return Err(if obj.write_allowed() {
                    ThingSetError::Unauthorized
                } else {
                    ThingSetError::Forbidden
                });
            }
            let target = subset_target(ctx.registry(), tokens[0].text(payload))
                .ok_or(ThingSetError::NotFound)?;
            target.add_subsets(obj.subset_mask());
            Ok(respond(resp, status::CREATED))
        }
        _ => Err(ThingSetError::MethodNotAllowed),
    }
}

fn delete(
    ctx: &Context,
    resp: &mut [u8],
    endpoint: Endpoint,
    payload: &str,
    tokens: &[Token],
    auth: u16,
) -> Result<usize> {
    let obj = endpoint.object.ok_or(ThingSetError::MethodNotAllowed)?;
    if tokens.len() > 1 {
        return Err(ThingSetError::NotImplemented);
    }
    match obj.data() {
        ObjData::Array(_) => Err(ThingSetError::NotImplemented),
        ObjData::Subset => {
            if tokens[0].kind != TokenKind::Str {
                return Err(ThingSetError::MethodNotAllowed);
            }
            if !obj.writable(auth) {
                return Err(if obj.write_allowed() {
                    ThingSetError::Unauthorized
                } else {
                    ThingSetError::Forbidden
                });
            }
            let target = subset_target(ctx.registry(), tokens[0].text(payload))
                .ok_or(ThingSetError::NotFound)?;
            target.remove_subsets(obj.subset_mask());
            Ok(respond(resp, status::DELETED))
        }
        _ => Err(ThingSetError::MethodNotAllowed),
    }
}

/***************************************************************************************************
 * Statements and export
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
    let mut w = JsonWriter::new(buf);
    w.push(method::TXT_STATEMENT).map_err(overflow)?;
    reg.write_path(obj, &mut w).map_err(overflow)?;
    w.push(b' ').map_err(overflow)?;

    match obj.data() {
        ObjData::Subset => {
            export_members(reg, &mut w, obj.subset_mask())?;
            Ok(w.len())
        }
        ObjData::Group(_) => {
            w.push(b'{').map_err(overflow)?;
            let mut found = 0;
            for child in reg.children(obj.id()) {
                write_name_value(reg, &mut w, child)?;
                found += 1;
            }
            if found > 0 {
                w.pop();
            }
            w.push(b'}').map_err(overflow)?;
            Ok(w.len())
        }
        _ => Ok(0),
    }
}

fn export_members(reg: &Registry, w: &mut JsonWriter, subsets: u16) -> Result<()> {
    w.push(b'{').map_err(overflow)?;
    let mut found = 0;
    for member in reg.members(subsets) {
        write_name_value(reg, w, member)?;
        found += 1;
    }
    if found > 0 {
        w.pop();
    }
    w.push(b'}').map_err(overflow)
}

/// Serialize every object of the given subsets as a JSON name/value map, e.g. to persist the
/// configuration in text form.
pub(crate) fn export(ctx: &Context, buf: &mut [u8], subsets: u16) -> Result<usize> {
    let mut w = JsonWriter::new(buf);
    export_members(ctx.registry(), &mut w, subsets)?;
    Ok(w.len())
}
