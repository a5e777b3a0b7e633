//! Human-readable trace of a composed request.
//!
//! A field appears in the trace only when its key was present in the
//! descriptor. The header section lists every header on the specification,
//! forced defaults included. Output is for people reading test logs; it is not
//! meant to be parsed.

use std::fmt::Write as _;

use crate::config::{TraceSink, TraceStyle};
use crate::descriptor::{DescriptorKey, RequestDescriptor};
use crate::http::RequestSpecification;

pub const TRACE_HEADING: &str = "Request prepared with the following details:";

/// Render the trace for `spec`. Returns an empty string for `TraceStyle::Off`.
///
/// Both styles share one walk over the fields; they differ only in how the
/// header and query collections are laid out.
pub fn render_trace(
    descriptor: &RequestDescriptor,
    spec: &RequestSpecification,
    style: TraceStyle,
) -> String {
    let mut out = String::new();
    if style == TraceStyle::Off {
        return out;
    }
    let _ = writeln!(out, "{TRACE_HEADING}");
    let _ = writeln!(out, "\tBase request link: {}", spec.base_uri());
    if descriptor.contains(DescriptorKey::RequestPath) {
        let _ = writeln!(out, "\tRequest path: {}", spec.base_path().unwrap_or_default());
    }
    if descriptor.contains(DescriptorKey::Headers) {
        write_pairs(&mut out, "Headers", spec.headers(), style);
    }
    if descriptor.contains(DescriptorKey::QueryParams) {
        write_pairs(&mut out, "Query parameters", spec.query_params(), style);
    }
    if descriptor.contains(DescriptorKey::PostBody) {
        let _ = writeln!(out, "\tPost body: {}", spec.body().unwrap_or_default());
    }
    out
}

/// Verbose puts each pair on its own line; compact dumps `[a: b, c: d]`.
fn write_pairs(out: &mut String, label: &str, pairs: &[(String, String)], style: TraceStyle) {
    if style == TraceStyle::Compact {
        let items: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        let _ = writeln!(out, "\t{label}: [{}]", items.join(", "));
        return;
    }
    let _ = writeln!(out, "\t{label}:");
    for (name, value) in pairs {
        let _ = writeln!(out, "\t\t{name}: {value}");
    }
}

/// Write an already-rendered trace to `sink`.
pub(crate) fn emit(trace: &str, sink: TraceSink) {
    if trace.is_empty() {
        return;
    }
    match sink {
        TraceSink::Stdout => print!("{trace}"),
        TraceSink::Log => {
            tracing::info!(target: "fixture_core::trace", "{}", trace.trim_end());
        }
    }
}
