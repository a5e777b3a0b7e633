//! Builds HTTP request specifications from behavior-driven test tables.
//!
//! # Overview
//! A scenario describes its request as a two-column data table
//! (`request_base`, `request_path`, `headers`, `query_params`, `post_body`).
//! This crate reads that table into a `RequestDescriptor` and composes a
//! `RequestSpecification` without touching the network; the caller executes
//! it with whatever HTTP client the test suite uses.
//!
//! # Design
//! - `RequestBuilder` is stateless apart from its `BuilderOptions`; every
//!   call allocates a fresh specification and hands ownership to the caller.
//! - `Content-Type` and `Accept` are always `application/json`. They are
//!   applied after user headers and replace any user-supplied value.
//! - The diagnostic trace has one formatter with a `TraceStyle` switch and is
//!   written only after a successful build.
//! - Errors are plain enums returned through `Result`; nothing panics on bad
//!   table input.

pub mod builder;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod http;
pub mod table;
pub mod trace;

pub use builder::{build_request, build_request_from_table, RequestBuilder};
pub use config::{BuilderOptions, TraceSink, TraceStyle};
pub use descriptor::{DescriptorKey, RequestDescriptor};
pub use error::{BuildError, TableError};
pub use http::{RequestSpecification, APPLICATION_JSON};
pub use table::parse_table;
pub use trace::render_trace;
