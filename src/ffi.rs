//! FFI bindings for vitalcalc
//!
//! This module provides C-compatible functions for calling vitalcalc from other languages.
//! All functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `vitalcalc_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::evaluator::{evaluate_json, MetricEvaluator};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Read both string arguments, recording which one was unusable
unsafe fn read_args(formula: *const c_char, input_json: *const c_char) -> Option<(String, String)> {
    let Some(formula) = cstr_to_string(formula) else {
        set_last_error("Invalid formula string pointer");
        return None;
    };
    let Some(input) = cstr_to_string(input_json) else {
        set_last_error("Invalid input JSON string pointer");
        return None;
    };
    Some((formula, input))
}

// ============================================================================
// Stateless API
// ============================================================================

/// Evaluate a formula against a JSON measurement record with the default
/// configuration and return the result as JSON.
///
/// # Safety
/// - `formula` and `input_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `vitalcalc_free_string`.
/// - Returns NULL when the formula declines or on error; call
///   `vitalcalc_last_error` to get the reason.
#[no_mangle]
pub unsafe extern "C" fn vitalcalc_evaluate(
    formula: *const c_char,
    input_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some((formula, input)) = read_args(formula, input_json) else {
        return ptr::null_mut();
    };

    match evaluate_json(&formula, &input) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Evaluator API
// ============================================================================

/// Opaque handle to a MetricEvaluator
pub struct MetricEvaluatorHandle {
    evaluator: MetricEvaluator,
}

/// Create an evaluator, optionally from a JSON configuration.
///
/// # Safety
/// - `config_json` must be NULL (default constants) or a valid null-terminated C string.
/// - Returns a pointer that must be freed with `vitalcalc_evaluator_free`.
/// - Returns NULL on invalid configuration; call `vitalcalc_last_error`.
#[no_mangle]
pub unsafe extern "C" fn vitalcalc_evaluator_new(
    config_json: *const c_char,
) -> *mut MetricEvaluatorHandle {
    clear_last_error();

    let evaluator = if config_json.is_null() {
        MetricEvaluator::new()
    } else {
        let Some(json) = cstr_to_string(config_json) else {
            set_last_error("Invalid config JSON string pointer");
            return ptr::null_mut();
        };
        match MetricEvaluator::from_config_json(&json) {
            Ok(evaluator) => evaluator,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    };

    Box::into_raw(Box::new(MetricEvaluatorHandle { evaluator }))
}

/// Free an evaluator.
///
/// # Safety
/// - `evaluator` must be a valid pointer returned by `vitalcalc_evaluator_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn vitalcalc_evaluator_free(evaluator: *mut MetricEvaluatorHandle) {
    if !evaluator.is_null() {
        drop(Box::from_raw(evaluator));
    }
}

/// Evaluate a formula with an evaluator's configuration.
///
/// # Safety
/// - `evaluator` must be a valid pointer returned by `vitalcalc_evaluator_new`.
/// - `formula` and `input_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `vitalcalc_free_string`.
/// - Returns NULL on error; call `vitalcalc_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn vitalcalc_evaluator_evaluate(
    evaluator: *const MetricEvaluatorHandle,
    formula: *const c_char,
    input_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if evaluator.is_null() {
        set_last_error("Null evaluator pointer");
        return ptr::null_mut();
    }

    let handle = &*evaluator;

    let Some((formula, input)) = read_args(formula, input_json) else {
        return ptr::null_mut();
    };

    match handle.evaluator.evaluate_json(&formula, &input) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by vitalcalc functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a vitalcalc function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn vitalcalc_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next vitalcalc call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn vitalcalc_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the vitalcalc library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn vitalcalc_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
