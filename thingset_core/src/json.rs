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
 * Lenient JSON tokenizer
 *
 * A minimal tokenizer over a fixed-capacity token array. The number
 * tokenizer is deliberately lenient: any unquoted run of non-delimiter characters forms a
 * single primitive token, which makes decimal-fraction literals like `123e-2` a single token
 * even though standard JSON would split them.
 **************************************************************************************************/
use std::fmt;

/// Kind of a JSON token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
    /// Double-quoted string; `start`/`end` exclude the quotes.
    Str,
    /// Unquoted primitive: number, boolean, null or any lenient extension.
    Primitive,
}

/// A single token, referencing a byte range of the input.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    /// Kind of the token.
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Number of direct child tokens (for objects: key/value pairs count as two).
    pub size: usize,
}

impl Token {
    /// Placeholder for initializing token arrays.
    pub const EMPTY: Token = Token {
        kind: TokenKind::Primitive,
        start: 0,
        end: 0,
        size: 0,
    };

    /// The text of this token within `input`.
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}

/// Tokenizer failure modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonError {
    /// The fixed token array is exhausted.
    NoMemory,
    /// The input is not valid (lenient) JSON.
    Invalid,
    /// The input ended inside an unterminated string, object or array.
    Partial,
}

// Sentinel for containers whose closing bracket has not been seen yet
const OPEN: usize = usize::MAX;

/// Tokenize `input` into `tokens`, returning the number of tokens produced.
///
/// The memory use is bounded by the caller-supplied token array; oversized payloads fail with
/// [`JsonError::NoMemory`] instead of growing.
pub fn tokenize(input: &str, tokens: &mut [Token]) -> Result<usize, JsonError> {
    let bytes = input.as_bytes();
    let mut count = 0usize;
    let mut supertok: Option<usize> = None;
    let mut pos = 0usize;

    while pos < bytes.len() {
        match bytes[pos] {
            c @ (b'{' | b'[') => {
                if count >= tokens.len() {
                    return Err(JsonError::NoMemory);
                }
                if let Some(s) = supertok {
                    tokens[s].size += 1;
                }
                tokens[count] = Token {
                    kind: if c == b'{' {
                        TokenKind::Object
                    } else {
                        TokenKind::Array
                    },
                    start: pos,
                    end: OPEN,
                    size: 0,
                };
                supertok = Some(count);
                count += 1;
            }
            c @ (b'}' | b']') => {
                let kind = if c == b'}' {
                    TokenKind::Object
                } else {
                    TokenKind::Array
                };
                let mut closed = None;
                for i in (0..count).rev() {
                    if tokens[i].end == OPEN {
                        if tokens[i].kind != kind {
                            return Err(JsonError::Invalid);
                        }
                        tokens[i].end = pos + 1;
                        closed = Some(i);
                        break;
                    }
                }
                let closed = closed.ok_or(JsonError::Invalid)?;
                supertok = (0..closed).rev().find(|&j| tokens[j].end == OPEN);
            }
            b'"' => {
                let (start, end) = parse_string(bytes, &mut pos)?;
                if count >= tokens.len() {
                    return Err(JsonError::NoMemory);
                }
                tokens[count] = Token {
                    kind: TokenKind::Str,
                    start,
                    end,
                    size: 0,
                };
                count += 1;
                if let Some(s) = supertok {
                    tokens[s].size += 1;
                }
            }
            b' ' | b'\t' | b'\r' | b'\n' => {}
            b':' => {
                if count == 0 {
                    return Err(JsonError::Invalid);
                }
                supertok = Some(count - 1);
            }
            b',' => {
                if let Some(s) = supertok {
                    if tokens[s].kind != TokenKind::Object && tokens[s].kind != TokenKind::Array {
                        supertok = (0..count).rev().find(|&j| {
                            (tokens[j].kind == TokenKind::Object
                                || tokens[j].kind == TokenKind::Array)
                                && tokens[j].end == OPEN
                        });
                    }
                }
            }
            _ => {
                let start = pos;
                while pos < bytes.len()
                    && !matches!(
                        bytes[pos],
                        b'\t' | b'\r' | b'\n' | b' ' | b',' | b']' | b'}' | b':'
                    )
                {
                    pos += 1;
                }
                if count >= tokens.len() {
                    return Err(JsonError::NoMemory);
                }
                tokens[count] = Token {
                    kind: TokenKind::Primitive,
                    start,
                    end: pos,
                    size: 0,
                };
                count += 1;
                if let Some(s) = supertok {
                    tokens[s].size += 1;
                }
                pos -= 1;
            }
        }
        pos += 1;
    }

    if tokens[..count].iter().any(|t| t.end == OPEN) {
        return Err(JsonError::Partial);
    }
    Ok(count)
}

/// Scan a double-quoted string starting at the opening quote. Returns the byte range between
/// the quotes and leaves `pos` on the closing quote.
fn parse_string(bytes: &[u8], pos: &mut usize) -> Result<(usize, usize), JsonError> {
    let start = *pos + 1;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                *pos = i;
                return Ok((start, i));
            }
            b'\\' => {
                i += 1;
                match bytes.get(i) {
                    Some(b'"' | b'/' | b'\\' | b'b' | b'f' | b'r' | b'n' | b't') => {}
                    Some(b'u') => {
                        for _ in 0..4 {
                            i += 1;
                            if !bytes.get(i).map_or(false, |b| b.is_ascii_hexdigit()) {
                                return Err(JsonError::Invalid);
                            }
                        }
                    }
                    _ => return Err(JsonError::Invalid),
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(JsonError::Partial)
}

/***************************************************************************************************
 * Bounded text output
 **************************************************************************************************/

/// A bounded writer over a caller-supplied byte buffer, used to build text responses.
///
/// Any write past the end of the buffer fails with `fmt::Error`; the handlers translate that
/// into a Response Too Large status and discard the partial content.
pub(crate) struct JsonWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> JsonWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        JsonWriter { buf, pos: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn push(&mut self, byte: u8) -> fmt::Result {
        if self.pos < self.buf.len() {
            self.buf[self.pos] = byte;
            self.pos += 1;
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }

    /// Remove the last byte written (used to drop trailing separators).
    pub fn pop(&mut self) {
        if self.pos > 0 {
            self.pos -= 1;
        }
    }

    pub fn last(&self) -> Option<u8> {
        self.pos.checked_sub(1).map(|i| self.buf[i])
    }

    /// Overwrite the last byte written.
    pub fn replace_last(&mut self, byte: u8) {
        if self.pos > 0 {
            self.buf[self.pos - 1] = byte;
        }
    }

    /// Reset the writer to `len` bytes.
    pub fn truncate(&mut self, len: usize) {
        if len < self.pos {
            self.pos = len;
        }
    }
}

impl fmt::Write for JsonWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        if self.pos + bytes.len() <= self.buf.len() {
            self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
            self.pos += bytes.len();
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}
