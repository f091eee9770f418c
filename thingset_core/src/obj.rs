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
 * ThingSet data objects
 *
 * The data object registry: immutable declarations plus mutable per-object meta data (subset
 * membership and access flags). Value storage is borrowed from the declaring application and is
 * never owned or freed by the registry.
 **************************************************************************************************/
use spin::RwLock;

use thingset_common::access;

/// ThingSet data object ID type.
pub type ObjId = u16;

/// A bounded callback installed by the application: invoked after a successful write within a
/// group, or as the body of an executable object.
pub type Callback = dyn Fn() + Sync;

/// Scalar element types used for array elements and record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    /// Boolean
    Bool,
    /// Unsigned 8-bit integer
    U8,
    /// Signed 8-bit integer
    I8,
    /// Unsigned 16-bit integer
    U16,
    /// Signed 16-bit integer
    I16,
    /// Unsigned 32-bit integer
    U32,
    /// Signed 32-bit integer
    I32,
    /// Unsigned 64-bit integer
    U64,
    /// Signed 64-bit integer
    I64,
    /// Single precision float
    F32,
    /// Decimal fraction (mantissa value, fixed exponent in the object's detail)
    DecFrac,
}

/// A scalar value in transit between a storage cell and one of the wire codecs.
///
/// Integers travel widened to 64 bits; the storage cell narrows them back with a range check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    /// Boolean value
    Bool(bool),
    /// Unsigned integer value, widened
    U64(u64),
    /// Signed integer value, widened
    I64(i64),
    /// Single precision float value
    F32(f32),
    /// Decimal fraction mantissa
    DecFrac(i32),
}

/***************************************************************************************************
 * Value storage cells
 **************************************************************************************************/

/// Storage cell for a scalar value.
///
/// Interior mutability behind a read/write lock keeps the registry `Sync`; all protocol-path
/// mutation additionally happens under the context's request lock.
#[derive(Debug)]
pub struct Value<T>(RwLock<T>);

impl<T> Value<T> {
    /// Create a new cell holding `value`.
    pub const fn new(value: T) -> Self {
        Value(RwLock::new(value))
    }
}

impl<T: Copy> Value<T> {
    /// Read the current value.
    #[inline]
    pub fn get(&self) -> T {
        *self.0.read()
    }

    /// Replace the current value.
    #[inline]
    pub fn set(&self, value: T) {
        *self.0.write() = value;
    }
}

/// Access to a fixed-capacity text buffer declared by the application.
pub trait TextStore: Sync {
    /// Declared buffer capacity. A stored string is always at least one byte shorter.
    fn capacity(&self) -> usize;
    /// Length of the stored string.
    fn len(&self) -> usize;
    /// Visit the stored string without copying it out.
    fn read(&self, visit: &mut dyn FnMut(&str));
    /// Replace the stored string. Returns `false` if `s` does not fit (it must leave room for
    /// a terminator, i.e. be shorter than the capacity).
    fn write(&self, s: &str) -> bool;
}

/// A fixed-capacity string cell backing a STRING object.
pub struct TextCell<const N: usize> {
    inner: RwLock<TextBuf<N>>,
}

struct TextBuf<const N: usize> {
    len: usize,
    buf: [u8; N],
}

impl<const N: usize> TextCell<N> {
    /// Create a cell initialized with `initial`, which must be shorter than `N`.
    pub const fn new(initial: &str) -> Self {
        let bytes = initial.as_bytes();
        assert!(bytes.len() < N);
        let mut buf = [0u8; N];
        let mut i = 0;
        while i < bytes.len() {
            buf[i] = bytes[i];
            i += 1;
        }
        TextCell {
            inner: RwLock::new(TextBuf {
                len: bytes.len(),
                buf,
            }),
        }
    }
}

impl<const N: usize> TextStore for TextCell<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn len(&self) -> usize {
        self.inner.read().len
    }

    fn read(&self, visit: &mut dyn FnMut(&str)) {
        let guard = self.inner.read();
        visit(core::str::from_utf8(&guard.buf[..guard.len]).unwrap_or(""));
    }

    fn write(&self, s: &str) -> bool {
        if s.len() >= N {
            return false;
        }
        let mut guard = self.inner.write();
        guard.buf[..s.len()].copy_from_slice(s.as_bytes());
        guard.len = s.len();
        true
    }
}

/// Access to a fixed-capacity byte buffer declared by the application.
pub trait BytesStore: Sync {
    /// Declared buffer capacity.
    fn capacity(&self) -> usize;
    /// Number of bytes currently stored.
    fn len(&self) -> usize;
    /// Visit the stored bytes without copying them out.
    fn read(&self, visit: &mut dyn FnMut(&[u8]));
    /// Replace the stored bytes. Returns `false` if `b` exceeds the capacity.
    fn write(&self, b: &[u8]) -> bool;
}

/// A fixed-capacity byte buffer cell backing a BYTES object.
pub struct BytesCell<const N: usize> {
    inner: RwLock<BytesBuf<N>>,
}

struct BytesBuf<const N: usize> {
    len: usize,
    buf: [u8; N],
}

impl<const N: usize> BytesCell<N> {
    /// Create an empty cell.
    pub const fn new() -> Self {
        BytesCell {
            inner: RwLock::new(BytesBuf {
                len: 0,
                buf: [0u8; N],
            }),
        }
    }
}

impl<const N: usize> Default for BytesCell<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> BytesStore for BytesCell<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn len(&self) -> usize {
        self.inner.read().len
    }

    fn read(&self, visit: &mut dyn FnMut(&[u8])) {
        let guard = self.inner.read();
        visit(&guard.buf[..guard.len]);
    }

    fn write(&self, b: &[u8]) -> bool {
        if b.len() > N {
            return false;
        }
        let mut guard = self.inner.write();
        guard.buf[..b.len()].copy_from_slice(b);
        guard.len = b.len();
        true
    }
}

/// An element type usable inside an [`ArrayCell`].
pub trait ArrayElem: Copy + Send + Sync + 'static {
    /// The wire-level element type.
    const ITEM_TYPE: ItemType;
    /// Widen into a [`ScalarValue`].
    fn to_scalar(self) -> ScalarValue;
    /// Narrow from a [`ScalarValue`] with a range check.
    fn from_scalar(value: ScalarValue) -> Option<Self>;
}

impl ArrayElem for bool {
    const ITEM_TYPE: ItemType = ItemType::Bool;
    fn to_scalar(self) -> ScalarValue {
        ScalarValue::Bool(self)
    }
    fn from_scalar(value: ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl ArrayElem for f32 {
    const ITEM_TYPE: ItemType = ItemType::F32;
    fn to_scalar(self) -> ScalarValue {
        ScalarValue::F32(self)
    }
    fn from_scalar(value: ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::F32(v) => Some(v),
            ScalarValue::U64(v) => Some(v as f32),
            ScalarValue::I64(v) => Some(v as f32),
            _ => None,
        }
    }
}

macro_rules! impl_array_elem_uint {
    ($t:ty, $item:expr) => {
        impl ArrayElem for $t {
            const ITEM_TYPE: ItemType = $item;
            fn to_scalar(self) -> ScalarValue {
                ScalarValue::U64(self as u64)
            }
            fn from_scalar(value: ScalarValue) -> Option<Self> {
                match value {
                    ScalarValue::U64(v) => <$t>::try_from(v).ok(),
                    ScalarValue::I64(v) => <$t>::try_from(v).ok(),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! impl_array_elem_int {
    ($t:ty, $item:expr) => {
        impl ArrayElem for $t {
            const ITEM_TYPE: ItemType = $item;
            fn to_scalar(self) -> ScalarValue {
                ScalarValue::I64(self as i64)
            }
            fn from_scalar(value: ScalarValue) -> Option<Self> {
                match value {
                    ScalarValue::I64(v) => <$t>::try_from(v).ok(),
                    ScalarValue::U64(v) => <$t>::try_from(v).ok(),
                    _ => None,
                }
            }
        }
    };
}

impl_array_elem_uint!(u8, ItemType::U8);
impl_array_elem_uint!(u16, ItemType::U16);
impl_array_elem_uint!(u32, ItemType::U32);
impl_array_elem_uint!(u64, ItemType::U64);
impl_array_elem_int!(i8, ItemType::I8);
impl_array_elem_int!(i16, ItemType::I16);
impl_array_elem_int!(i32, ItemType::I32);
impl_array_elem_int!(i64, ItemType::I64);

/// Access to a homogeneous, fixed-capacity array declared by the application.
pub trait ArrayStore: Sync {
    /// Element type of the array.
    fn elem_type(&self) -> ItemType;
    /// Current number of elements.
    fn len(&self) -> usize;
    /// Maximum number of elements.
    fn capacity(&self) -> usize;
    /// Read element `index`, widened to a [`ScalarValue`].
    fn get(&self, index: usize) -> Option<ScalarValue>;
    /// Write element `index`, narrowing with a range check. Returns `false` on a type or
    /// range mismatch or an out-of-capacity index.
    fn set(&self, index: usize, value: ScalarValue) -> bool;
    /// Set the current number of elements. Returns `false` if `len` exceeds the capacity.
    fn set_len(&self, len: usize) -> bool;
}

/// A fixed-capacity array cell backing an ARRAY object.
pub struct ArrayCell<T, const N: usize> {
    inner: RwLock<ArrayBuf<T, N>>,
}

struct ArrayBuf<T, const N: usize> {
    len: usize,
    items: [T; N],
}

impl<T: ArrayElem, const N: usize> ArrayCell<T, N> {
    /// Create a cell over `items` with `len` elements considered occupied.
    pub const fn new(items: [T; N], len: usize) -> Self {
        assert!(len <= N);
        ArrayCell {
            inner: RwLock::new(ArrayBuf { len, items }),
        }
    }
}

impl<T: ArrayElem, const N: usize> ArrayStore for ArrayCell<T, N> {
    fn elem_type(&self) -> ItemType {
        T::ITEM_TYPE
    }

    fn len(&self) -> usize {
        self.inner.read().len
    }

    fn capacity(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<ScalarValue> {
        let guard = self.inner.read();
        if index < guard.len {
            Some(guard.items[index].to_scalar())
        } else {
            None
        }
    }

    fn set(&self, index: usize, value: ScalarValue) -> bool {
        if index >= N {
            return false;
        }
        match T::from_scalar(value) {
            Some(v) => {
                self.inner.write().items[index] = v;
                true
            }
            None => false,
        }
    }

    fn set_len(&self, len: usize) -> bool {
        if len > N {
            return false;
        }
        self.inner.write().len = len;
        true
    }
}

/// Access to index-addressed records declared by the application.
///
/// The child objects of a RECORDS node describe the record fields (name, type, detail) in
/// declaration order; the store supplies the values of field `field` of record `record`.
pub trait RecordStore: Sync {
    /// Number of records currently held.
    fn num_records(&self) -> usize;
    /// Read one field of one record, widened to a [`ScalarValue`].
    fn field(&self, record: usize, field: usize) -> Option<ScalarValue>;
}

/***************************************************************************************************
 * Data objects
 **************************************************************************************************/

/// Typed borrow of the storage backing a data object.
///
/// Each arm carries a reference to storage of the correct element type; the codecs and handlers
/// match on the variant instead of interpreting a type tag.
#[derive(Clone, Copy)]
pub enum ObjData<'a> {
    /// Boolean item
    Bool(&'a Value<bool>),
    /// Unsigned 8-bit item
    U8(&'a Value<u8>),
    /// Signed 8-bit item
    I8(&'a Value<i8>),
    /// Unsigned 16-bit item
    U16(&'a Value<u16>),
    /// Signed 16-bit item
    I16(&'a Value<i16>),
    /// Unsigned 32-bit item
    U32(&'a Value<u32>),
    /// Signed 32-bit item
    I32(&'a Value<i32>),
    /// Unsigned 64-bit item
    U64(&'a Value<u64>),
    /// Signed 64-bit item
    I64(&'a Value<i64>),
    /// Single precision float item; the object's detail is the number of decimal digits
    F32(&'a Value<f32>),
    /// Decimal fraction mantissa; the object's detail is the base-10 exponent
    DecFrac(&'a Value<i32>),
    /// Zero-terminated text; the object's detail is the buffer capacity
    String(&'a dyn TextStore),
    /// Raw byte buffer; the object's detail is the buffer capacity
    Bytes(&'a dyn BytesStore),
    /// Homogeneous array; float elements use the object's detail as decimal digits
    Array(&'a dyn ArrayStore),
    /// Index-addressed records
    Records(&'a dyn RecordStore),
    /// Field declaration inside a RECORDS node; holds no storage of its own
    RecordItem(ItemType),
    /// Container only; may carry a callback invoked after a successful write within the group
    Group(Option<&'a Callback>),
    /// Virtual object holding no value; the object's detail is the subset bitmask
    Subset,
    /// Invocable function; child objects are its named parameters in declaration order
    Exec(&'a Callback),
}

/// Mutable meta data of a data object.
#[derive(Debug, Clone, Copy)]
pub struct ObjMeta {
    /// Flags assigning the object to data item subsets.
    pub subsets: u16,
    /// Flags defining read/write access, split into a read and a write half.
    pub access: u16,
}

/// A single addressable node in the server's data object tree.
pub struct Object<'a> {
    id: ObjId,
    parent: ObjId,
    name: &'a str,
    data: ObjData<'a>,
    detail: i16,
    meta: RwLock<ObjMeta>,
}

impl<'a> Object<'a> {
    /// Declare a data object. Prefer the typed convenience constructors below.
    pub const fn new(
        id: ObjId,
        parent: ObjId,
        name: &'a str,
        data: ObjData<'a>,
        detail: i16,
        access: u16,
        subsets: u16,
    ) -> Self {
        Object {
            id,
            parent,
            name,
            data,
            detail,
            meta: RwLock::new(ObjMeta { subsets, access }),
        }
    }

    /// Declare a boolean item.
    pub const fn bool_item(
        id: ObjId,
        name: &'a str,
        value: &'a Value<bool>,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::Bool(value), 0, access, subsets)
    }

    /// Declare an unsigned 8-bit item.
    pub const fn u8_item(
        id: ObjId,
        name: &'a str,
        value: &'a Value<u8>,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::U8(value), 0, access, subsets)
    }

    /// Declare a signed 8-bit item.
    pub const fn i8_item(
        id: ObjId,
        name: &'a str,
        value: &'a Value<i8>,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::I8(value), 0, access, subsets)
    }

    /// Declare an unsigned 16-bit item.
    pub const fn u16_item(
        id: ObjId,
        name: &'a str,
        value: &'a Value<u16>,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::U16(value), 0, access, subsets)
    }

    /// Declare a signed 16-bit item.
    pub const fn i16_item(
        id: ObjId,
        name: &'a str,
        value: &'a Value<i16>,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::I16(value), 0, access, subsets)
    }

    /// Declare an unsigned 32-bit item.
    pub const fn u32_item(
        id: ObjId,
        name: &'a str,
        value: &'a Value<u32>,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::U32(value), 0, access, subsets)
    }

    /// Declare a signed 32-bit item.
    pub const fn i32_item(
        id: ObjId,
        name: &'a str,
        value: &'a Value<i32>,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::I32(value), 0, access, subsets)
    }

    /// Declare an unsigned 64-bit item.
    pub const fn u64_item(
        id: ObjId,
        name: &'a str,
        value: &'a Value<u64>,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::U64(value), 0, access, subsets)
    }

    /// Declare a signed 64-bit item.
    pub const fn i64_item(
        id: ObjId,
        name: &'a str,
        value: &'a Value<i64>,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::I64(value), 0, access, subsets)
    }

    /// Declare a float item rendered with `digits` decimal digits. A `digits` of zero makes
    /// the binary codec emit a rounded integer.
    pub const fn float_item(
        id: ObjId,
        name: &'a str,
        value: &'a Value<f32>,
        digits: i16,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::F32(value), digits, access, subsets)
    }

    /// Declare a decimal fraction item with mantissa storage and a fixed base-10 `exponent`.
    pub const fn decfrac_item(
        id: ObjId,
        name: &'a str,
        mantissa: &'a Value<i32>,
        exponent: i16,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(
            id,
            parent,
            name,
            ObjData::DecFrac(mantissa),
            exponent,
            access,
            subsets,
        )
    }

    /// Declare a string item over a text cell with `buf_size` capacity.
    pub const fn string_item(
        id: ObjId,
        name: &'a str,
        store: &'a dyn TextStore,
        buf_size: i16,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(
            id,
            parent,
            name,
            ObjData::String(store),
            buf_size,
            access,
            subsets,
        )
    }

    /// Declare a byte buffer item with `buf_size` capacity.
    pub const fn bytes_item(
        id: ObjId,
        name: &'a str,
        store: &'a dyn BytesStore,
        buf_size: i16,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(
            id,
            parent,
            name,
            ObjData::Bytes(store),
            buf_size,
            access,
            subsets,
        )
    }

    /// Declare an array item; float elements render with `digits` decimal digits.
    pub const fn array_item(
        id: ObjId,
        name: &'a str,
        store: &'a dyn ArrayStore,
        digits: i16,
        parent: ObjId,
        access: u16,
        subsets: u16,
    ) -> Self {
        Self::new(
            id,
            parent,
            name,
            ObjData::Array(store),
            digits,
            access,
            subsets,
        )
    }

    /// Declare a group container, optionally carrying a callback invoked after any successful
    /// write within the group.
    pub const fn group(
        id: ObjId,
        name: &'a str,
        callback: Option<&'a Callback>,
        parent: ObjId,
    ) -> Self {
        Self::new(
            id,
            parent,
            name,
            ObjData::Group(callback),
            0,
            access::ANY_R,
            0,
        )
    }

    /// Declare a subset object representing the `mask` bits.
    pub const fn subset(id: ObjId, name: &'a str, mask: u16, parent: ObjId, access: u16) -> Self {
        Self::new(id, parent, name, ObjData::Subset, mask as i16, access, 0)
    }

    /// Declare an executable object. Child objects are its named parameters in declaration
    /// order; execute permission uses the write half of `access`.
    pub const fn exec(
        id: ObjId,
        name: &'a str,
        function: &'a Callback,
        parent: ObjId,
        access: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::Exec(function), 0, access, 0)
    }

    /// Declare an index-addressed records node.
    pub const fn records(
        id: ObjId,
        name: &'a str,
        store: &'a dyn RecordStore,
        parent: ObjId,
        access: u16,
    ) -> Self {
        Self::new(id, parent, name, ObjData::Records(store), 0, access, 0)
    }

    /// Declare a field of a records node. Field ordinals follow declaration order.
    pub const fn record_item(
        id: ObjId,
        name: &'a str,
        item_type: ItemType,
        detail: i16,
        parent: ObjId,
    ) -> Self {
        Self::new(
            id,
            parent,
            name,
            ObjData::RecordItem(item_type),
            detail,
            access::ANY_R,
            0,
        )
    }

    /// The object's ID.
    #[inline]
    pub fn id(&self) -> ObjId {
        self.id
    }

    /// The ID of the containing object (0 = root).
    #[inline]
    pub fn parent(&self) -> ObjId {
        self.parent
    }

    /// The object's name.
    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Borrow of the value storage.
    #[inline]
    pub fn data(&self) -> ObjData<'a> {
        self.data
    }

    /// Type-specific detail: decimal digits, decimal-fraction exponent, buffer capacity or
    /// subset bitmask depending on the object type.
    #[inline]
    pub fn detail(&self) -> i16 {
        self.detail
    }

    /// Current access flags.
    pub fn access(&self) -> u16 {
        self.meta.read().access
    }

    /// Replace the access flags.
    pub fn set_access(&self, access: u16) {
        self.meta.write().access = access;
    }

    /// Current subset membership bits.
    pub fn subsets(&self) -> u16 {
        self.meta.read().subsets
    }

    /// Add the given subset bits to the object's membership.
    pub fn add_subsets(&self, mask: u16) {
        self.meta.write().subsets |= mask;
    }

    /// Remove the given subset bits from the object's membership.
    pub fn remove_subsets(&self, mask: u16) {
        self.meta.write().subsets &= !mask;
    }

    /// The subset bitmask represented by a SUBSET object.
    #[inline]
    pub fn subset_mask(&self) -> u16 {
        self.detail as u16
    }

    /// `true` if any role at all may read this object.
    pub fn read_allowed(&self) -> bool {
        self.access() & access::READ_MASK != 0
    }

    /// `true` if the caller's role bits grant read access.
    pub fn readable(&self, auth: u16) -> bool {
        self.access() & access::READ_MASK & auth != 0
    }

    /// `true` if any role at all may write this object.
    pub fn write_allowed(&self) -> bool {
        self.access() & access::WRITE_MASK != 0
    }

    /// `true` if the caller's role bits grant write access.
    pub fn writable(&self, auth: u16) -> bool {
        self.access() & access::WRITE_MASK & auth != 0
    }

    /// `true` for group containers.
    pub fn is_group(&self) -> bool {
        matches!(self.data, ObjData::Group(_))
    }

    /// `true` for subset objects.
    pub fn is_subset(&self) -> bool {
        matches!(self.data, ObjData::Subset)
    }

    /// `true` for executable objects.
    pub fn is_exec(&self) -> bool {
        matches!(self.data, ObjData::Exec(_))
    }

    /// `true` for records nodes.
    pub fn is_records(&self) -> bool {
        matches!(self.data, ObjData::Records(_))
    }

    /// The group callback, for group objects that carry one.
    pub fn group_callback(&self) -> Option<&'a Callback> {
        match self.data {
            ObjData::Group(cb) => cb,
            _ => None,
        }
    }
}

/***************************************************************************************************
 * Registry
 **************************************************************************************************/

/// The fixed array of data objects known at process start.
///
/// Lookups are linear scans; typical device registries hold tens to a few hundred entries.
#[derive(Clone, Copy)]
pub struct Registry<'a> {
    objects: &'a [Object<'a>],
}

impl<'a> Registry<'a> {
    /// Wrap a declaration array. IDs need not be contiguous or sorted.
    pub const fn new(objects: &'a [Object<'a>]) -> Self {
        Registry { objects }
    }

    /// All objects in declaration order.
    #[inline]
    pub fn objects(&self) -> &'a [Object<'a>] {
        self.objects
    }

    /// Look up an object by its unique ID.
    pub fn by_id(&self, id: ObjId) -> Option<&'a Object<'a>> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Look up an object by name below `parent`; `None` searches all objects. Names compare
    /// byte-exact and case-sensitive; prefix matches are rejected by the full equality.
    pub fn by_name(&self, parent: Option<ObjId>, name: &str) -> Option<&'a Object<'a>> {
        self.objects
            .iter()
            .find(|o| o.name == name && parent.map_or(true, |p| o.parent == p))
    }

    /// Iterate the direct children of `parent` in declaration order.
    pub fn children(&self, parent: ObjId) -> impl Iterator<Item = &'a Object<'a>> + '_ {
        self.objects.iter().filter(move |o| o.parent == parent)
    }

    /// Iterate the objects whose subset bits intersect `mask`, in declaration order.
    pub fn members(&self, mask: u16) -> impl Iterator<Item = &'a Object<'a>> + '_ {
        self.objects
            .iter()
            .filter(move |o| o.subsets() & mask != 0)
    }

    /// Read one field of an index-addressed record, given the record-item declaration and the
    /// record index. The field ordinal is the item's position among the declared fields.
    pub(crate) fn record_field(&self, item: &Object<'a>, index: usize) -> Option<ScalarValue> {
        let parent = self.by_id(item.parent())?;
        let store = match parent.data() {
            ObjData::Records(store) => store,
            _ => return None,
        };
        if index >= store.num_records() {
            return None;
        }
        let ordinal = self
            .children(parent.id())
            .filter(|o| matches!(o.data(), ObjData::RecordItem(_)))
            .position(|o| o.id() == item.id())?;
        store.field(index, ordinal)
    }
}
