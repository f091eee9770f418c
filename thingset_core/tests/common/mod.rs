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
 * Shared test fixture: a small but complete device data tree
 **************************************************************************************************/
#![allow(dead_code)]

use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::sync::{Mutex, MutexGuard};

use thingset_common::access::{ANY_R, ANY_RW, ANY_W, MKR_W};
use thingset_common::subset::{NVM, REPORT};
use thingset_core::{
    ArrayCell, BytesCell, Context, ItemType, Object, RecordStore, Registry, ScalarValue, TextCell,
    Value,
};

// object IDs of the fixture tree
pub const ID_INFO: u16 = 0x01;
pub const ID_CONF: u16 = 0x02;
pub const ID_INPUT: u16 = 0x03;
pub const ID_MEAS: u16 = 0x04;
pub const ID_RPC: u16 = 0x05;
pub const ID_MANUFACTURER: u16 = 0x19;
pub const ID_TIMESTAMP: u16 = 0x1A;
pub const ID_DEVICE_ID: u16 = 0x1B;
pub const ID_BAT_CHARGING_V: u16 = 0x31;
pub const ID_LOAD_DISCONNECT_V: u16 = 0x32;
pub const ID_F32: u16 = 0x6007;
pub const ID_STRBUF: u16 = 0x6009;
pub const ID_ROOM_DEGC: u16 = 0x6010;
pub const ID_FINGERPRINT: u16 = 0x6011;
pub const ID_F32_ROUNDED: u16 = 0x600A;
pub const ID_U8: u16 = 0x600B;
pub const ID_ARRAY_I32: u16 = 0x7003;
pub const ID_ARRAY_FLOAT: u16 = 0x7004;
pub const ID_SECRET_MAKER: u16 = 0x7002;
pub const ID_ENABLE_CHARGING: u16 = 0x61;
pub const ID_BAT_V: u16 = 0x71;
pub const ID_BAT_A: u16 = 0x72;
pub const ID_AMBIENT_DEGC: u16 = 0x73;
pub const ID_X_RESET: u16 = 0x5001;
pub const ID_X_ADD: u16 = 0x5002;
pub const ID_REPORT: u16 = 0xA1;
pub const ID_HISTORY: u16 = 0x90;

// info
pub static MANUFACTURER: TextCell<32> = TextCell::new("Libre Solar");
pub static TIMESTAMP: Value<u32> = Value::new(12345678);
pub static DEVICE_ID: TextCell<64> = TextCell::new("ABC123");

// conf
pub static BAT_CHARGING_V: Value<f32> = Value::new(14.4);
pub static LOAD_DISCONNECT_V: Value<f32> = Value::new(10.8);
pub static F32: Value<f32> = Value::new(0.0);
pub static F32_ROUNDED: Value<f32> = Value::new(0.0);
pub static U8: Value<u8> = Value::new(0);
pub static STRBUF: TextCell<8> = TextCell::new("");
pub static ROOM_DEGC: Value<i32> = Value::new(2315);
pub static FINGERPRINT: BytesCell<8> = BytesCell::new();
pub static SECRET_MAKER: Value<u32> = Value::new(2);
pub static INT32_ARRAY: ArrayCell<i32, 8> = ArrayCell::new([4, 2, 8, 4, 0, 0, 0, 0], 4);
pub static FLOAT_ARRAY: ArrayCell<f32, 8> =
    ArrayCell::new([2.27, 3.44, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 2);

// input
pub static ENABLE_CHARGING: Value<bool> = Value::new(false);

// meas
pub static BAT_V: Value<f32> = Value::new(14.1);
pub static BAT_A: Value<f32> = Value::new(5.13);
pub static AMBIENT_DEGC: Value<i16> = Value::new(22);

// rpc
pub static RESET_COUNT: AtomicU32 = AtomicU32::new(0);
pub static ADD_X: Value<i32> = Value::new(0);
pub static ADD_Y: Value<i32> = Value::new(0);
pub static ADD_RESULT: Value<i32> = Value::new(0);
pub static UPDATE_COUNT: AtomicU32 = AtomicU32::new(0);
pub static CONF_CB_COUNT: AtomicU32 = AtomicU32::new(0);

fn reset_function() {
    RESET_COUNT.fetch_add(1, Ordering::Relaxed);
}

fn add_function() {
    ADD_RESULT.set(ADD_X.get() + ADD_Y.get());
}

pub fn update_callback() {
    UPDATE_COUNT.fetch_add(1, Ordering::Relaxed);
}

fn conf_callback() {
    CONF_CB_COUNT.fetch_add(1, Ordering::Relaxed);
}

// history: timestamped battery voltage records
pub struct History {
    records: [(u32, f32); 3],
}

impl RecordStore for History {
    fn num_records(&self) -> usize {
        self.records.len()
    }

    fn field(&self, record: usize, field: usize) -> Option<ScalarValue> {
        let (time, voltage) = self.records.get(record)?;
        match field {
            0 => Some(ScalarValue::U64(*time as u64)),
            1 => Some(ScalarValue::F32(*voltage)),
            _ => None,
        }
    }
}

pub static HISTORY: History = History {
    records: [(1000, 13.9), (2000, 14.0), (3000, 14.1)],
};

static OBJECTS_ARR: [Object; 31] = [
    // DEVICE INFORMATION
    Object::group(ID_INFO, "info", None, 0),
    Object::string_item(ID_MANUFACTURER, "Manufacturer", &MANUFACTURER, 32, ID_INFO, ANY_R, 0),
    Object::u32_item(ID_TIMESTAMP, "Timestamp_s", &TIMESTAMP, ID_INFO, ANY_R | MKR_W, REPORT),
    Object::string_item(ID_DEVICE_ID, "DeviceID", &DEVICE_ID, 64, ID_INFO, ANY_R | MKR_W, 0),
    // CONFIGURATION
    Object::group(ID_CONF, "conf", Some(&conf_callback), 0),
    Object::float_item(ID_BAT_CHARGING_V, "BatCharging_V", &BAT_CHARGING_V, 2, ID_CONF, ANY_RW, NVM),
    Object::float_item(ID_LOAD_DISCONNECT_V, "LoadDisconnect_V", &LOAD_DISCONNECT_V, 2, ID_CONF, ANY_RW, NVM),
    Object::float_item(ID_F32, "f32", &F32, 2, ID_CONF, ANY_RW, NVM),
    Object::float_item(ID_F32_ROUNDED, "f32_rounded", &F32_ROUNDED, 0, ID_CONF, ANY_RW, 0),
    Object::u8_item(ID_U8, "u8", &U8, ID_CONF, ANY_RW, 0),
    Object::string_item(ID_STRBUF, "strbuf", &STRBUF, 8, ID_CONF, ANY_RW, 0),
    Object::decfrac_item(ID_ROOM_DEGC, "Room_degC", &ROOM_DEGC, -2, ID_CONF, ANY_RW, 0),
    Object::bytes_item(ID_FINGERPRINT, "Fingerprint", &FINGERPRINT, 8, ID_CONF, ANY_RW, 0),
    Object::array_item(ID_ARRAY_I32, "arrayi32", &INT32_ARRAY, 0, ID_CONF, ANY_RW, 0),
    Object::array_item(ID_ARRAY_FLOAT, "arrayfloat", &FLOAT_ARRAY, 2, ID_CONF, ANY_RW, 0),
    Object::u32_item(ID_SECRET_MAKER, "secret_maker", &SECRET_MAKER, ID_CONF, ANY_R | MKR_W, 0),
    // INPUT DATA
    Object::group(ID_INPUT, "input", None, 0),
    Object::bool_item(ID_ENABLE_CHARGING, "EnableCharging", &ENABLE_CHARGING, ID_INPUT, ANY_RW, 0),
    // MEASUREMENTS
    Object::group(ID_MEAS, "meas", None, 0),
    Object::float_item(ID_BAT_V, "Bat_V", &BAT_V, 2, ID_MEAS, ANY_R, REPORT),
    Object::float_item(ID_BAT_A, "Bat_A", &BAT_A, 2, ID_MEAS, ANY_R, REPORT),
    Object::i16_item(ID_AMBIENT_DEGC, "Ambient_degC", &AMBIENT_DEGC, ID_MEAS, ANY_R, REPORT),
    // REMOTE PROCEDURE CALLS
    Object::group(ID_RPC, "rpc", None, 0),
    Object::exec(ID_X_RESET, "x-reset", &reset_function, ID_RPC, ANY_W),
    Object::exec(ID_X_ADD, "x-add", &add_function, ID_RPC, ANY_W),
    Object::i32_item(0x5003, "x", &ADD_X, ID_X_ADD, ANY_RW, 0),
    Object::i32_item(0x5004, "y", &ADD_Y, ID_X_ADD, ANY_RW, 0),
    // REPORT SUBSET
    Object::subset(ID_REPORT, ".report", REPORT, 0, ANY_RW),
    // HISTORY RECORDS
    Object::records(ID_HISTORY, "history", &HISTORY, 0, ANY_R),
    Object::record_item(0x91, "Time_s", ItemType::U64, 0, ID_HISTORY),
    Object::record_item(0x92, "Bat_V", ItemType::F32, 2, ID_HISTORY),
];

pub static OBJECTS: &[Object] = &OBJECTS_ARR;

pub static CTX: Context = Context::new(Registry::new(OBJECTS));

static TEST_LOCK: Mutex<()> = Mutex::new(());

/// The fixture holds process-wide state; tests take this guard to run one at a time.
pub fn serial() -> MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Convert a whitespace separated hex dump (the notation used in the protocol examples) into
/// bytes.
pub fn hex2bin(hex: &str) -> Vec<u8> {
    hex.split_whitespace()
        .map(|byte| u8::from_str_radix(byte, 16).expect("invalid hex byte"))
        .collect()
}

pub fn process(req: &[u8]) -> (Vec<u8>, usize) {
    let mut resp = [0u8; 512];
    let len = CTX.process(req, &mut resp);
    (resp[..len].to_vec(), len)
}

pub fn process_str(req: &str) -> String {
    let mut resp = [0u8; 512];
    let len = CTX.process(req.as_bytes(), &mut resp);
    String::from_utf8_lossy(&resp[..len]).into_owned()
}
