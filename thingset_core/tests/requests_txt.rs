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
 * Test cases for the text encoding: request processing, statements and export
 **************************************************************************************************/

mod common;

use common::*;
use std::sync::atomic::Ordering;
use thingset_common::access;
use thingset_core::TextStore;

#[test]
fn txt_get_root_names() {
    let _guard = serial();
    assert_eq!(
        process_str("?/"),
        ":85 Content. [\"info\",\"conf\",\"input\",\"meas\",\"rpc\",\".report\",\"history\"]"
    );
}

#[test]
fn txt_get_group_names() {
    let _guard = serial();
    assert_eq!(
        process_str("?meas/"),
        ":85 Content. [\"Bat_V\",\"Bat_A\",\"Ambient_degC\"]"
    );
}

#[test]
fn txt_get_group_names_values() {
    let _guard = serial();
    assert_eq!(
        process_str("?meas"),
        ":85 Content. {\"Bat_V\":14.10,\"Bat_A\":5.13,\"Ambient_degC\":22}"
    );
}

#[test]
fn txt_get_single_value() {
    let _guard = serial();
    assert_eq!(process_str("?meas/Bat_V"), ":85 Content. 14.10");
    assert_eq!(process_str("?info/Manufacturer"), ":85 Content. \"Libre Solar\"");
}

#[test]
fn txt_get_float_array() {
    let _guard = serial();
    assert_eq!(process_str("?conf/arrayfloat"), ":85 Content. [2.27,3.44]");
    assert_eq!(process_str("?conf/arrayi32"), ":85 Content. [4,2,8,4]");
}

#[test]
fn txt_get_decfrac() {
    let _guard = serial();
    assert_eq!(process_str("?conf/Room_degC"), ":85 Content. 2315e-2");
}

#[test]
fn txt_get_unknown_path() {
    let _guard = serial();
    assert_eq!(process_str("?data/nope"), ":A4 Not Found.");
}

#[test]
fn txt_fetch_multiple_values() {
    let _guard = serial();
    assert_eq!(
        process_str("?meas [\"Bat_V\",\"Bat_A\"]"),
        ":85 Content. [14.10,5.13]"
    );
}

#[test]
fn txt_fetch_single_value_as_scalar() {
    let _guard = serial();
    assert_eq!(process_str("?meas \"Bat_A\""), ":85 Content. 5.13");
}

#[test]
fn txt_fetch_unknown_name() {
    let _guard = serial();
    assert_eq!(process_str("?meas [\"Bat_X\"]"), ":A4 Not Found.");
}

#[test]
fn txt_patch_float() {
    let _guard = serial();
    LOAD_DISCONNECT_V.set(10.0);
    assert_eq!(
        process_str("=conf {\"LoadDisconnect_V\":10.8}"),
        ":84 Changed."
    );
    assert_eq!(LOAD_DISCONNECT_V.get(), 10.8);
}

#[test]
fn txt_patch_fires_group_callback_once() {
    let _guard = serial();
    let before = CONF_CB_COUNT.load(Ordering::Relaxed);
    assert_eq!(
        process_str("=conf {\"BatCharging_V\":14.4,\"f32\":1.25}"),
        ":84 Changed."
    );
    assert_eq!(CONF_CB_COUNT.load(Ordering::Relaxed), before + 1);
    assert_eq!(F32.get(), 1.25);
}

#[test]
fn txt_patch_rejected_values_leave_state_untouched() {
    let _guard = serial();
    F32.set(3.5);
    // the second value does not parse as an integer, so the first must not be committed
    assert_eq!(
        process_str("=conf {\"f32\":1.5,\"u8\":\"x\"}"),
        ":AF Unsupported Content-Format."
    );
    assert_eq!(F32.get(), 3.5);
}

#[test]
fn txt_patch_unauthorized_without_maker_role() {
    let _guard = serial();
    let before = TIMESTAMP.get();
    assert_eq!(process_str("=info {\"Timestamp_s\":1}"), ":A1 Unauthorized.");
    assert_eq!(TIMESTAMP.get(), before);
}

#[test]
fn txt_patch_allowed_with_maker_role() {
    let _guard = serial();
    let before = TIMESTAMP.get();
    CTX.set_authentication(access::MKR_MASK | access::USR_MASK);
    assert_eq!(process_str("=info {\"Timestamp_s\":1}"), ":84 Changed.");
    assert_eq!(TIMESTAMP.get(), 1);
    TIMESTAMP.set(before);
    CTX.set_authentication(access::USR_MASK);
}

#[test]
fn txt_patch_read_only_value_forbidden() {
    let _guard = serial();
    // Bat_V has no write bits at all for any role
    assert_eq!(process_str("=meas {\"Bat_V\":0}"), ":A3 Forbidden.");
}

#[test]
fn txt_patch_unknown_name() {
    let _guard = serial();
    assert_eq!(process_str("=conf {\"Unknown\":1}"), ":A4 Not Found.");
}

#[test]
fn txt_patch_string_capacity_boundary() {
    let _guard = serial();
    // capacity is 8: up to 7 bytes fit, 8 bytes must be rejected
    assert_eq!(process_str("=conf {\"strbuf\":\"1234567\"}"), ":84 Changed.");
    STRBUF.read(&mut |s| assert_eq!(s, "1234567"));
    assert_eq!(
        process_str("=conf {\"strbuf\":\"12345678\"}"),
        ":AD Request Entity Too Large."
    );
    STRBUF.read(&mut |s| assert_eq!(s, "1234567"));
}

#[test]
fn txt_patch_decfrac_rescales() {
    let _guard = serial();
    let before = ROOM_DEGC.get();
    assert_eq!(process_str("=conf {\"Room_degC\":24}"), ":84 Changed.");
    assert_eq!(ROOM_DEGC.get(), 2400);
    ROOM_DEGC.set(before);
}

#[test]
fn txt_get_patch_round_trip() {
    let _guard = serial();
    let first = process_str("?conf/BatCharging_V");
    let value = first.rsplit(' ').next().unwrap().to_owned();
    assert_eq!(
        process_str(&format!("=conf {{\"BatCharging_V\":{}}}", value)),
        ":84 Changed."
    );
    assert_eq!(process_str("?conf/BatCharging_V"), first);
}

#[test]
fn txt_exec_without_parameters() {
    let _guard = serial();
    let before = RESET_COUNT.load(Ordering::Relaxed);
    assert_eq!(process_str("!rpc/x-reset"), ":83 Valid.");
    assert_eq!(RESET_COUNT.load(Ordering::Relaxed), before + 1);
}

#[test]
fn txt_exec_with_parameters() {
    let _guard = serial();
    assert_eq!(process_str("!rpc/x-add [1,2]"), ":83 Valid.");
    assert_eq!(ADD_RESULT.get(), 3);
}

#[test]
fn txt_exec_strict_arity() {
    let _guard = serial();
    assert_eq!(process_str("!rpc/x-add [1]"), ":A0 Bad Request.");
    assert_eq!(process_str("!rpc/x-add [1,2,3]"), ":A0 Bad Request.");
}

#[test]
fn txt_exec_of_plain_item_forbidden() {
    let _guard = serial();
    assert_eq!(process_str("!meas/Bat_V"), ":A3 Forbidden.");
}

#[test]
fn txt_exec_discovery() {
    let _guard = serial();
    assert_eq!(process_str("?rpc/x-add/"), ":85 Content. [\"x\",\"y\"]");
    // reading the values of an exec object is not possible
    assert_eq!(process_str("?rpc/x-add"), ":A0 Bad Request.");
}

#[test]
fn txt_subset_add_and_remove() {
    let _guard = serial();
    let mut buf = [0u8; 256];

    assert_eq!(process_str("+.report \"EnableCharging\""), ":81 Created.");
    let len = CTX.txt_statement_by_path(&mut buf, ".report");
    let statement = core::str::from_utf8(&buf[..len]).unwrap();
    assert!(statement.starts_with("#.report {"));
    assert!(statement.contains("\"EnableCharging\":false"));

    assert_eq!(process_str("-.report \"EnableCharging\""), ":82 Deleted.");
    let len = CTX.txt_statement_by_path(&mut buf, ".report");
    let statement = core::str::from_utf8(&buf[..len]).unwrap();
    assert!(!statement.contains("EnableCharging"));
}

#[test]
fn txt_subset_add_unknown_object() {
    let _guard = serial();
    assert_eq!(process_str("+.report \"Missing\""), ":A4 Not Found.");
}

#[test]
fn txt_delete_on_plain_item_not_allowed() {
    let _guard = serial();
    assert_eq!(
        process_str("-conf/BatCharging_V \"x\""),
        ":A5 Method Not Allowed."
    );
}

#[test]
fn txt_statement_subset() {
    let _guard = serial();
    let mut buf = [0u8; 256];
    let len = CTX.txt_statement_by_path(&mut buf, ".report");
    let statement = core::str::from_utf8(&buf[..len]).unwrap();
    assert_eq!(
        statement,
        "#.report {\"Timestamp_s\":12345678,\"Bat_V\":14.10,\"Bat_A\":5.13,\"Ambient_degC\":22}"
    );
}

#[test]
fn txt_statement_group() {
    let _guard = serial();
    let mut buf = [0u8; 256];
    let len = CTX.txt_statement_by_path(&mut buf, "meas");
    let statement = core::str::from_utf8(&buf[..len]).unwrap();
    assert_eq!(
        statement,
        "#meas {\"Bat_V\":14.10,\"Bat_A\":5.13,\"Ambient_degC\":22}"
    );
}

#[test]
fn txt_statement_nested_endpoint_empty() {
    let _guard = serial();
    let mut buf = [0u8; 256];
    assert_eq!(CTX.txt_statement_by_path(&mut buf, "meas/Bat_V"), 0);
}

#[test]
fn txt_records_count_and_item() {
    let _guard = serial();
    assert_eq!(process_str("?history/"), ":85 Content. 3");
    assert_eq!(process_str("?history"), ":85 Content. null");
    assert_eq!(
        process_str("?history/1"),
        ":85 Content. {\"Time_s\":2000,\"Bat_V\":14.00}"
    );
    assert_eq!(process_str("?history/1/Time_s"), ":85 Content. 2000");
    assert_eq!(process_str("?history/7"), ":A4 Not Found.");
}

#[test]
fn txt_update_callback_fires_on_watched_subset() {
    let _guard = serial();
    CTX.set_update_callback(thingset_common::subset::NVM, &update_callback);
    let before = UPDATE_COUNT.load(Ordering::Relaxed);
    assert_eq!(process_str("=conf {\"f32\":9.25}"), ":84 Changed.");
    assert_eq!(UPDATE_COUNT.load(Ordering::Relaxed), before + 1);
    // a write outside the watched subsets does not fire the callback
    assert_eq!(process_str("=conf {\"u8\":7}"), ":84 Changed.");
    assert_eq!(UPDATE_COUNT.load(Ordering::Relaxed), before + 1);
}

#[test]
fn txt_export() {
    let _guard = serial();
    BAT_CHARGING_V.set(14.4);
    LOAD_DISCONNECT_V.set(10.8);
    F32.set(0.5);
    let mut buf = [0u8; 256];
    let len = CTX.export_txt(&mut buf, thingset_common::subset::NVM).unwrap();
    assert_eq!(
        core::str::from_utf8(&buf[..len]).unwrap(),
        "{\"BatCharging_V\":14.40,\"LoadDisconnect_V\":10.80,\"f32\":0.50}"
    );
}

#[test]
fn txt_request_token_capacity() {
    let _guard = serial();
    // more than 50 tokens in a single request payload
    let mut payload = String::from("=conf {");
    for i in 0..40 {
        payload.push_str(&format!("\"k{}\":{},", i, i));
    }
    payload.push('}');
    assert_eq!(process_str(&payload), ":AD Request Entity Too Large.");
}
