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
 * Common Error Handling for ThingSet Crates
 **************************************************************************************************/
extern crate thingset_common;

use thingset_cbor::error::CBORError;
use thingset_common::status;
use thiserror::Error;

/// Set of errors used in the ThingSet request processing path.
///
/// Each error has a corresponding status code in the `thingset_common` crate. The error
/// descriptions should be pretty self-explanatory.
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum ThingSetError {
    #[error("The request could not be parsed or violates protocol syntax.")]
    BadRequest,
    #[error("The caller's role bits are insufficient for this operation.")]
    Unauthorized,
    #[error("The operation is structurally disallowed regardless of the caller's role.")]
    Forbidden,
    #[error("The requested endpoint or child object does not exist.")]
    NotFound,
    #[error("The method is not supported by the addressed object type.")]
    MethodNotAllowed,
    #[error("The request ended before a complete payload was received.")]
    RequestIncomplete,
    #[error("The request conflicts with the current state of the resource.")]
    Conflict,
    #[error("The request payload exceeds the parser's token or buffer capacity.")]
    RequestTooLarge,
    #[error("A payload value could not be decoded or does not match the target type.")]
    UnsupportedFormat,
    #[error("The response would overflow the provided buffer.")]
    ResponseTooLarge,
    #[error("An internal invariant was violated.")]
    InternalError,
    #[error("The operation is specified but not implemented.")]
    NotImplemented,
}

/// Convert ThingSetError values into the corresponding status code sent on the wire.
impl From<ThingSetError> for u8 {
    fn from(err: ThingSetError) -> u8 {
        match err {
            ThingSetError::BadRequest => status::BAD_REQUEST,
            ThingSetError::Unauthorized => status::UNAUTHORIZED,
            ThingSetError::Forbidden => status::FORBIDDEN,
            ThingSetError::NotFound => status::NOT_FOUND,
            ThingSetError::MethodNotAllowed => status::METHOD_NOT_ALLOWED,
            ThingSetError::RequestIncomplete => status::REQUEST_INCOMPLETE,
            ThingSetError::Conflict => status::CONFLICT,
            ThingSetError::RequestTooLarge => status::REQUEST_TOO_LARGE,
            ThingSetError::UnsupportedFormat => status::UNSUPPORTED_FORMAT,
            ThingSetError::ResponseTooLarge => status::RESPONSE_TOO_LARGE,
            ThingSetError::InternalError => status::INTERNAL_SERVER_ERR,
            ThingSetError::NotImplemented => status::NOT_IMPLEMENTED,
        }
    }
}

/// Codec failures while decoding a request payload surface as Unsupported Format, except for a
/// truncated input, which is an incomplete request.
///
/// > Note: encoding failures must not use this conversion. A response that no longer fits its
/// > buffer is Response Too Large and is mapped explicitly by the handlers.
impl From<CBORError> for ThingSetError {
    fn from(err: CBORError) -> ThingSetError {
        match err {
            CBORError::EndOfBuffer => ThingSetError::RequestIncomplete,
            CBORError::OutOfRange => ThingSetError::BadRequest,
            _ => ThingSetError::UnsupportedFormat,
        }
    }
}
