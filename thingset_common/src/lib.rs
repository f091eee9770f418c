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
 * thingset_common
 *
 * Definitions (constants only) shared between the ThingSet wire codecs, the request dispatcher
 * and applications declaring data objects. These are split into a separate crate (which contains
 * essentially no code) to avoid creating circular dependencies.
 **************************************************************************************************/
#![no_std]

/***************************************************************************************************
 * Exported status codes
 **************************************************************************************************/

/// Response status codes, following CoAP numbering.
///
/// A binary response carries the status as its first byte; a text response renders it as the
/// `:XX` hex prefix.
pub mod status {
    /// A new resource was created (e.g. an object appended to a subset).
    pub const CREATED: u8 = 0x81;

    /// A resource was deleted (e.g. an object removed from a subset).
    pub const DELETED: u8 = 0x82;

    /// The request was valid; used to confirm execution of a function.
    pub const VALID: u8 = 0x83;

    /// One or more values were changed.
    pub const CHANGED: u8 = 0x84;

    /// The response contains the requested payload.
    pub const CONTENT: u8 = 0x85;

    /// The request could not be parsed or violated protocol syntax.
    pub const BAD_REQUEST: u8 = 0xA0;

    /// The caller's role bits are insufficient for this operation.
    pub const UNAUTHORIZED: u8 = 0xA1;

    /// The operation is structurally disallowed, independent of the caller's role.
    pub const FORBIDDEN: u8 = 0xA3;

    /// The requested endpoint or child object does not exist.
    pub const NOT_FOUND: u8 = 0xA4;

    /// The method is not supported by the addressed object type.
    pub const METHOD_NOT_ALLOWED: u8 = 0xA5;

    /// The request ended before a complete payload was received.
    pub const REQUEST_INCOMPLETE: u8 = 0xA8;

    /// The request conflicts with the current state of the resource.
    pub const CONFLICT: u8 = 0xA9;

    /// The request payload exceeds the parser's token or buffer capacity.
    pub const REQUEST_TOO_LARGE: u8 = 0xAD;

    /// A payload value could not be decoded or does not match the target type.
    pub const UNSUPPORTED_FORMAT: u8 = 0xAF;

    /// An internal invariant was violated.
    pub const INTERNAL_SERVER_ERR: u8 = 0xC0;

    /// The operation is specified but not implemented.
    pub const NOT_IMPLEMENTED: u8 = 0xC1;

    /// The response would overflow the provided buffer (ThingSet extension).
    pub const RESPONSE_TOO_LARGE: u8 = 0xE1;
}

/***************************************************************************************************
 * Exported request methods
 **************************************************************************************************/

/// Method bytes of the binary encoding and method characters of the text encoding.
///
/// The first byte of a message selects the encoding: one of the binary method bytes below, one
/// of the text method characters, or a statement marker.
pub mod method {
    /// Binary GET: read the value(s) at an endpoint.
    pub const GET: u8 = 0x01;

    /// Binary POST: execute a function or append to a subset.
    pub const POST: u8 = 0x02;

    /// Binary DELETE: remove an object from a subset.
    pub const DELETE: u8 = 0x04;

    /// Binary FETCH: read selected child values of an endpoint.
    pub const FETCH: u8 = 0x05;

    /// Binary PATCH: update child values of an endpoint.
    pub const PATCH: u8 = 0x07;

    /// Leading byte of a binary statement (unsolicited publication).
    pub const STATEMENT: u8 = 0x1F;

    /// Text GET / FETCH request.
    pub const TXT_GET: u8 = b'?';

    /// Text PATCH request.
    pub const TXT_PATCH: u8 = b'=';

    /// Text POST (create / append) request.
    pub const TXT_CREATE: u8 = b'+';

    /// Text DELETE request.
    pub const TXT_DELETE: u8 = b'-';

    /// Text EXEC request.
    pub const TXT_EXEC: u8 = b'!';

    /// Leading character of a text statement.
    pub const TXT_STATEMENT: u8 = b'#';
}

/***************************************************************************************************
 * Reserved object IDs
 **************************************************************************************************/

/// Object IDs with a fixed meaning on every device.
pub mod id {
    /// Root of the data object tree. Never present as a registry entry.
    pub const ROOT: u16 = 0x0000;

    /// Unix timestamp of the device.
    pub const TIME: u16 = 0x0010;

    /// Device name.
    pub const NAME: u16 = 0x0017;

    /// URL pointing to the full metadata of the device.
    pub const METADATA_URL: u16 = 0x0018;

    /// Unique device identifier.
    pub const DEVICE_ID: u16 = 0x001D;

    /// Marker for an invalid or unassigned object ID.
    pub const INVALID: u16 = 0xFFFF;

    /// Request-only virtual endpoint resolving paths to numeric IDs.
    ///
    /// This value doubles as the CBOR encoding of `false` minus its major type; it never
    /// collides with a valid CBOR endpoint item because a real ID would be encoded as an
    /// unsigned integer and a path as a text string.
    pub const ENDPOINT_IDS: u8 = 0x16;

    /// Request-only virtual endpoint resolving numeric IDs to paths.
    pub const ENDPOINT_PATHS: u8 = 0x17;
}

/***************************************************************************************************
 * Access control
 **************************************************************************************************/

/// Role based access masks for data objects.
///
/// The 16-bit access field of an object is split in two halves: the 8 least-significant bits
/// carry the read roles, the 8 most-significant bits the write roles. Within each half, bit 0
/// is the normal user, bit 1 the expert user and bit 2 the maker. The same layout is used for
/// the authentication flags of a context, so a permission check is a simple bitwise AND.
pub mod access {
    /// Normal user role.
    pub const ROLE_USR: u16 = 1 << 0;

    /// Expert user role.
    pub const ROLE_EXP: u16 = 1 << 1;

    /// Maker (manufacturer) role.
    pub const ROLE_MKR: u16 = 1 << 2;

    /// Read and write bits of the normal user.
    pub const USR_MASK: u16 = ROLE_USR << 8 | ROLE_USR;

    /// Read and write bits of the expert user.
    pub const EXP_MASK: u16 = ROLE_EXP << 8 | ROLE_EXP;

    /// Read and write bits of the maker.
    pub const MKR_MASK: u16 = ROLE_MKR << 8 | ROLE_MKR;

    /// Mask covering the read half of the access field.
    pub const READ_MASK: u16 = 0x00FF & (USR_MASK | EXP_MASK | MKR_MASK);

    /// Mask covering the write half of the access field.
    pub const WRITE_MASK: u16 = 0xFF00 & (USR_MASK | EXP_MASK | MKR_MASK);

    /// Read access for the normal user.
    pub const USR_R: u16 = READ_MASK & USR_MASK;

    /// Read access for the expert user.
    pub const EXP_R: u16 = READ_MASK & EXP_MASK;

    /// Read access for the maker.
    pub const MKR_R: u16 = READ_MASK & MKR_MASK;

    /// Read access for any role.
    pub const ANY_R: u16 = READ_MASK;

    /// Write access for the normal user.
    pub const USR_W: u16 = WRITE_MASK & USR_MASK;

    /// Write access for the expert user.
    pub const EXP_W: u16 = WRITE_MASK & EXP_MASK;

    /// Write access for the maker.
    pub const MKR_W: u16 = WRITE_MASK & MKR_MASK;

    /// Write access for any role.
    pub const ANY_W: u16 = WRITE_MASK;

    /// Read and write access for the normal user.
    pub const USR_RW: u16 = USR_R | USR_W;

    /// Read and write access for the expert user.
    pub const EXP_RW: u16 = EXP_R | EXP_W;

    /// Read and write access for the maker.
    pub const MKR_RW: u16 = MKR_R | MKR_W;

    /// Read and write access for any role.
    pub const ANY_RW: u16 = ANY_R | ANY_W;
}

/***************************************************************************************************
 * Subsets
 **************************************************************************************************/

/// Conventional subset bits. Only bit 0 carries a fixed meaning; all other bits are
/// application defined.
pub mod subset {
    /// Objects published in regular report statements.
    pub const REPORT: u16 = 1 << 0;

    /// Objects persisted to non-volatile memory, by convention.
    pub const NVM: u16 = 1 << 1;
}

/***************************************************************************************************
 * Protocol limits
 **************************************************************************************************/

/// Fixed capacities of the bounded-memory request parsers.
pub mod limit {
    /// Maximum number of JSON tokens accepted in a single text request.
    pub const JSON_TOKENS: usize = 50;

    /// Maximum nesting depth supported when deriving the path of an object.
    pub const PATH_DEPTH: usize = 2;
}
