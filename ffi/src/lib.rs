//! C-ABI wrapper around `fixture-core`.
//!
//! # Overview
//! Lets a behavior-driven test runner written in any language with a C FFI
//! turn its data tables into request specifications. The runner either fills
//! a descriptor key by key or passes the raw `| key | value |` table text.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Builds return a single `FfiBuildResult` envelope carrying either an
//!   `FfiRequestSpec` or an error code and message.
//! - Trace options come from `FIXTURE_TRACE` / `FIXTURE_TRACE_SINK`, since a
//!   C caller has no other way to configure them.
//! - The C caller owns all returned pointers and must call the matching
//!   `fixture_*_free` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use fixture_core::{BuilderOptions, RequestBuilder, RequestDescriptor};

use types::*;

fn builder() -> RequestBuilder {
    RequestBuilder::with_options(BuilderOptions::from_env())
}

/// Borrow a C string as `&str`. Caller has checked for null.
unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Descriptor lifecycle
// ---------------------------------------------------------------------------

/// Create an empty descriptor.
///
/// Returns null only if an internal panic occurs.
/// The caller must free the returned pointer with `fixture_descriptor_free`.
#[unsafe(no_mangle)]
pub extern "C" fn fixture_descriptor_new() -> *mut FfiDescriptor {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiDescriptor {
            inner: RequestDescriptor::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Set `key` to `value` on a descriptor. Setting a key twice replaces the
/// earlier value.
#[unsafe(no_mangle)]
pub extern "C" fn fixture_descriptor_set(
    descriptor: *mut FfiDescriptor,
    key: *const c_char,
    value: *const c_char,
) -> FfiErrorCode {
    catch_unwind(|| {
        if descriptor.is_null() || key.is_null() || value.is_null() {
            return FfiErrorCode::NullArg;
        }
        let (Some(key), Some(value)) = (unsafe { read_str(key) }, unsafe { read_str(value) })
        else {
            return FfiErrorCode::InvalidUtf8;
        };
        let descriptor = unsafe { &mut *descriptor };
        descriptor.inner.insert(key, value);
        FfiErrorCode::Ok
    })
    .unwrap_or(FfiErrorCode::Panic)
}

/// Free a descriptor created by `fixture_descriptor_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn fixture_descriptor_free(descriptor: *mut FfiDescriptor) {
    if !descriptor.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(descriptor) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build functions
// ---------------------------------------------------------------------------

/// Build a request specification from a descriptor.
///
/// The caller must free the returned pointer with `fixture_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn fixture_build_request(descriptor: *const FfiDescriptor) -> *mut FfiBuildResult {
    catch_unwind(|| {
        if descriptor.is_null() {
            return FfiBuildResult::null_arg("descriptor");
        }
        let descriptor = unsafe { &*descriptor };
        match builder().build(&descriptor.inner) {
            Ok(spec) => FfiBuildResult::ok(spec),
            Err(e) => FfiBuildResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiBuildResult::panic("panic in fixture_build_request"))
}

/// Parse a `| key | value |` data table and build a request specification
/// from it.
///
/// The caller must free the returned pointer with `fixture_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn fixture_build_from_table(table: *const c_char) -> *mut FfiBuildResult {
    catch_unwind(|| {
        if table.is_null() {
            return FfiBuildResult::null_arg("table");
        }
        let Some(table) = (unsafe { read_str(table) }) else {
            return FfiBuildResult::invalid_utf8("table");
        };
        match builder().build_from_table(table) {
            Ok(spec) => FfiBuildResult::ok(spec),
            Err(e) => FfiBuildResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiBuildResult::panic("panic in fixture_build_from_table"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiBuildResult` returned by either build function, including
/// the specification it carries. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn fixture_free_result(result: *mut FfiBuildResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        unsafe {
            free_c_string(result.error_message);
            FfiRequestSpec::free(result.spec);
        }
    });
}
