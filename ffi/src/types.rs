//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible fields: `*mut c_char`
//! instead of `String`, pointer plus length instead of `Vec`, null instead
//! of `None`. Conversion and release live here so `lib.rs` stays focused on
//! the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use fixture_core::{BuildError, RequestDescriptor, RequestSpecification};

/// Opaque handle to a `RequestDescriptor`. C callers receive a pointer to
/// this and pass it back into `fixture_descriptor_set` and
/// `fixture_build_request`.
pub struct FfiDescriptor {
    pub(crate) inner: RequestDescriptor,
}

/// A name/value pair of C strings, used for headers and query parameters.
#[repr(C)]
pub struct FfiPair {
    pub name: *mut c_char,
    pub value: *mut c_char,
}

/// A request specification as C-compatible plain data.
///
/// `base_path` and `body` are null when the descriptor had no such key.
/// `json` holds the whole specification serialized, for callers that would
/// rather hand it to a JSON library than walk the arrays.
#[repr(C)]
pub struct FfiRequestSpec {
    pub base_uri: *mut c_char,
    pub base_path: *mut c_char,
    pub headers: *mut FfiPair,
    pub headers_len: u32,
    pub query_params: *mut FfiPair,
    pub query_params_len: u32,
    pub body: *mut c_char,
    pub content_type: *mut c_char,
    pub accept: *mut c_char,
    pub json: *mut c_char,
}

/// Error codes returned by descriptor setters and in `FfiBuildResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    MissingField = 1,
    MalformedEntry = 2,
    Table = 3,
    NullArg = 4,
    InvalidUtf8 = 5,
    Panic = 6,
}

/// Result envelope for the build functions.
///
/// On success `error_code` is `Ok`, `error_message` is null and `spec`
/// points to the specification. On failure `spec` is null and
/// `error_message` is a human-readable C string.
#[repr(C)]
pub struct FfiBuildResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub spec: *mut FfiRequestSpec,
}

/// Hand a Rust string to C. Interior NULs cannot come from C input, but are
/// dropped rather than failing the conversion.
pub(crate) fn into_c_string(s: impl Into<String>) -> *mut c_char {
    let s: String = s.into();
    let c = match CString::new(s) {
        Ok(c) => c,
        Err(err) => {
            let mut bytes = err.into_vec();
            bytes.retain(|b| *b != 0);
            CString::new(bytes).unwrap_or_default()
        }
    };
    c.into_raw()
}

fn optional_c_string(s: Option<&str>) -> *mut c_char {
    s.map(|s| into_c_string(s)).unwrap_or(std::ptr::null_mut())
}

/// Release a string produced by `into_c_string`. Null is ignored.
pub(crate) unsafe fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

fn pairs_to_ffi(pairs: &[(String, String)]) -> (*mut FfiPair, u32) {
    if pairs.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let items: Box<[FfiPair]> = pairs
        .iter()
        .map(|(name, value)| FfiPair {
            name: into_c_string(name.as_str()),
            value: into_c_string(value.as_str()),
        })
        .collect();
    let len = items.len() as u32;
    (Box::into_raw(items) as *mut FfiPair, len)
}

unsafe fn free_pairs(ptr: *mut FfiPair, len: u32) {
    if ptr.is_null() || len == 0 {
        return;
    }
    let items = unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len as usize)) };
    for pair in items.iter() {
        unsafe {
            free_c_string(pair.name);
            free_c_string(pair.value);
        }
    }
}

impl FfiRequestSpec {
    fn from_core(spec: &RequestSpecification) -> *mut Self {
        let (headers, headers_len) = pairs_to_ffi(spec.headers());
        let (query_params, query_params_len) = pairs_to_ffi(spec.query_params());
        let json = serde_json::to_string(spec).unwrap_or_default();
        Box::into_raw(Box::new(FfiRequestSpec {
            base_uri: into_c_string(spec.base_uri()),
            base_path: optional_c_string(spec.base_path()),
            headers,
            headers_len,
            query_params,
            query_params_len,
            body: optional_c_string(spec.body()),
            content_type: into_c_string(spec.content_type()),
            accept: into_c_string(spec.accept()),
            json: into_c_string(json),
        }))
    }

    pub(crate) unsafe fn free(ptr: *mut Self) {
        if ptr.is_null() {
            return;
        }
        let spec = unsafe { Box::from_raw(ptr) };
        unsafe {
            free_c_string(spec.base_uri);
            free_c_string(spec.base_path);
            free_pairs(spec.headers, spec.headers_len);
            free_pairs(spec.query_params, spec.query_params_len);
            free_c_string(spec.body);
            free_c_string(spec.content_type);
            free_c_string(spec.accept);
            free_c_string(spec.json);
        }
    }
}

impl FfiBuildResult {
    pub(crate) fn ok(spec: RequestSpecification) -> *mut Self {
        Box::into_raw(Box::new(FfiBuildResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            spec: FfiRequestSpec::from_core(&spec),
        }))
    }

    pub(crate) fn from_error(err: BuildError) -> *mut Self {
        let error_code = match &err {
            BuildError::MissingField(_) => FfiErrorCode::MissingField,
            BuildError::MalformedEntry { .. } => FfiErrorCode::MalformedEntry,
            BuildError::Table(_) => FfiErrorCode::Table,
        };
        Self::failure(error_code, err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn invalid_utf8(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::InvalidUtf8, format!("argument is not UTF-8: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiBuildResult {
            error_code,
            error_message: into_c_string(msg),
            spec: std::ptr::null_mut(),
        }))
    }
}
