//! C ABI for embedding the converter in other runtimes.
//!
//! Three symbols are exported, declared in `include/simple_serializer.h`:
//!
//! ```c
//! char *Convert(const char *input, const char *input_format,
//!               const char *input_header, const char *input_comment,
//!               const char *output_format, char **output_string);
//! char *Version(void);
//! void  FreeString(char *s);
//! ```
//!
//! Every non-NULL string returned by `Convert` or `Version`, and every string
//! `Convert` stores through `output_string`, is owned by the caller and must be
//! released exactly once with `FreeString`.

#![allow(non_snake_case)]

use crate::convert::convert;
use std::any::Any;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use tracing::debug;

/// Converts a NUL-terminated payload between two formats.
///
/// # Parameters
/// * `input` - Payload to convert
/// * `input_format` / `output_format` - Format names, matched case-insensitively
/// * `input_header` - Comma-separated column names, or NULL / empty to infer
/// * `input_comment` - Comment-line marker, or NULL / empty for none
/// * `output_string` - Receives the converted payload
///
/// # Returns
/// * NULL on success, with `*output_string` set to the converted payload
/// * An error message on failure, with `*output_string` set to NULL
///
/// # Safety
/// * Every non-NULL argument must point to a valid NUL-terminated string
/// * `output_string` must be NULL or valid for a pointer write
///
/// # Example
/// ```c
/// char *out = NULL;
/// char *err = Convert("{\"a\":1}", "json", "", "", "yaml", &out);
/// if (err != NULL) {
///     fprintf(stderr, "%s\n", err);
///     FreeString(err);
/// } else {
///     puts(out);
///     FreeString(out);
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn Convert(
    input: *const c_char,
    input_format: *const c_char,
    input_header: *const c_char,
    input_comment: *const c_char,
    output_format: *const c_char,
    output_string: *mut *mut c_char,
) -> *mut c_char {
    if !output_string.is_null() {
        *output_string = ptr::null_mut();
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        run(
            input,
            input_format,
            input_header,
            input_comment,
            output_format,
            output_string,
        )
    }))
    .unwrap_or_else(|payload| Err(panic_message(payload)));

    match outcome {
        Ok(output) => {
            *output_string = output.into_raw();
            ptr::null_mut()
        }
        Err(message) => {
            debug!(error = %message, "conversion failed");
            into_c_string(message)
        }
    }
}

/// Returns the library version. Release it with `FreeString`.
#[no_mangle]
pub extern "C" fn Version() -> *mut c_char {
    into_c_string(env!("CARGO_PKG_VERSION").to_string())
}

/// Releases a string returned by this library. NULL is ignored.
///
/// # Safety
/// * `s` must be NULL or a pointer obtained from `Convert` or `Version` that
///   has not been released yet
#[no_mangle]
pub unsafe extern "C" fn FreeString(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    drop(CString::from_raw(s));
}

unsafe fn run(
    input: *const c_char,
    input_format: *const c_char,
    input_header: *const c_char,
    input_comment: *const c_char,
    output_format: *const c_char,
    output_string: *mut *mut c_char,
) -> Result<CString, String> {
    if output_string.is_null() {
        return Err("output_string must not be NULL".to_string());
    }
    if input.is_null() {
        return Err("input must not be NULL".to_string());
    }
    let payload = CStr::from_ptr(input).to_bytes();
    let input_format = required(input_format, "input_format")?;
    let output_format = required(output_format, "output_format")?;
    let header = optional(input_header, "input_header")?;
    let comment = optional(input_comment, "input_comment")?;

    let output = convert(payload, input_format, header, comment, output_format)
        .map_err(|e| e.to_string())?;
    CString::new(output).map_err(|e| {
        format!(
            "converted output contains a NUL byte at position {}",
            e.nul_position()
        )
    })
}

unsafe fn required<'a>(arg: *const c_char, name: &str) -> Result<&'a str, String> {
    if arg.is_null() {
        return Err(format!("{} must not be NULL", name));
    }
    CStr::from_ptr(arg)
        .to_str()
        .map_err(|e| format!("{} is not valid UTF-8: {}", name, e))
}

unsafe fn optional<'a>(arg: *const c_char, name: &str) -> Result<&'a str, String> {
    if arg.is_null() {
        return Ok("");
    }
    required(arg, name)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    format!("internal error during conversion: {}", detail)
}

/// Hands a message to the caller, replacing interior NUL bytes.
fn into_c_string(message: String) -> *mut c_char {
    let sanitized = if message.contains('\0') {
        message.replace('\0', "\\0")
    } else {
        message
    };
    CString::new(sanitized).unwrap_or_default().into_raw()
}
