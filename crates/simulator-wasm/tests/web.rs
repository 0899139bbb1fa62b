//! Browser-side checks of the exported helpers.

#![cfg(target_arch = "wasm32")]

use js_sys::Reflect;
use simulator_wasm::{algorithm_name, decompose_response_code, response_code_name};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::wasm_bindgen_test;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn response_code_names_include_the_subject() {
    assert_eq!(response_code_name(0x1C3), "TPM2_RC_HASH (parameter 1)");
    assert_eq!(response_code_name(0x000), "TPM2_RC_SUCCESS");
}

#[wasm_bindgen_test]
fn decomposed_codes_are_plain_objects() {
    let parts = decompose_response_code(0x98E).expect("serializes");
    let base = Reflect::get(&parts, &JsValue::from_str("base")).expect("base field");
    assert_eq!(base.as_f64(), Some(f64::from(0x08E_u32)));
    let format1 = Reflect::get(&parts, &JsValue::from_str("is_format1")).expect("format field");
    assert_eq!(format1.as_bool(), Some(true));
}

#[wasm_bindgen_test]
fn algorithm_names_resolve() {
    assert_eq!(algorithm_name(0x000B).as_deref(), Some("TPM2_ALG_SHA256"));
    assert_eq!(algorithm_name(0x7FFF), None);
}
