//! Turns a `RequestDescriptor` into a `RequestSpecification`.
//!
//! # Design
//! `RequestBuilder` holds only its `BuilderOptions`, so one instance can be
//! shared across threads and every call starts from a fresh specification.
//! Steps run in a fixed order and the first bad entry aborts the build; the
//! trace is written only once the specification is complete.

use crate::config::BuilderOptions;
use crate::descriptor::{DescriptorKey, RequestDescriptor};
use crate::error::BuildError;
use crate::http::{RequestSpecification, ACCEPT, APPLICATION_JSON, CONTENT_TYPE};
use crate::table::parse_table;
use crate::trace::{emit, render_trace};

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBuilder {
    options: BuilderOptions,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuilderOptions) -> Self {
        Self { options }
    }

    pub fn build(&self, descriptor: &RequestDescriptor) -> Result<RequestSpecification, BuildError> {
        let spec = compose(descriptor)?;
        let trace = render_trace(descriptor, &spec, self.options.style);
        emit(&trace, self.options.sink);
        Ok(spec)
    }

    /// Parse a data table and build from it.
    pub fn build_from_table(&self, table: &str) -> Result<RequestSpecification, BuildError> {
        let descriptor = parse_table(table)?;
        self.build(&descriptor)
    }
}

/// Build with the default options: verbose trace on stdout.
pub fn build_request(descriptor: &RequestDescriptor) -> Result<RequestSpecification, BuildError> {
    RequestBuilder::new().build(descriptor)
}

pub fn build_request_from_table(table: &str) -> Result<RequestSpecification, BuildError> {
    RequestBuilder::new().build_from_table(table)
}

fn compose(descriptor: &RequestDescriptor) -> Result<RequestSpecification, BuildError> {
    let base = descriptor
        .value(DescriptorKey::RequestBase)
        .map(str::trim)
        .filter(|base| !base.is_empty())
        .ok_or(BuildError::MissingField(DescriptorKey::RequestBase.as_str()))?;
    let mut spec = RequestSpecification::new(base.to_string());
    tracing::debug!(base_uri = base, "composing request");

    if let Some(path) = descriptor.value(DescriptorKey::RequestPath) {
        spec.set_base_path(path.to_string());
    }

    if let Some(headers) = descriptor.value(DescriptorKey::Headers) {
        for (name, value) in split_pairs(headers, DescriptorKey::Headers, ':')? {
            tracing::debug!(name, value, "adding header");
            spec.add_header(name.to_string(), value.to_string());
        }
    }

    if let Some(params) = descriptor.value(DescriptorKey::QueryParams) {
        for (name, value) in split_pairs(params, DescriptorKey::QueryParams, '=')? {
            tracing::debug!(name, value, "adding query parameter");
            spec.set_query_param(name.to_string(), value.to_string());
        }
    }

    if let Some(body) = descriptor.value(DescriptorKey::PostBody) {
        spec.set_body(body.to_string());
    }

    for name in [CONTENT_TYPE, ACCEPT] {
        if spec.force_header(name, APPLICATION_JSON) {
            tracing::warn!(header = name, "user-supplied header overridden with {APPLICATION_JSON}");
        }
    }

    Ok(spec)
}

/// Split `a<sep>1,b<sep>2` into trimmed pairs, cutting each entry at its first
/// separator. A single trailing comma is tolerated; any other entry with no
/// separator or an empty name, blank entries included, fails the whole list.
fn split_pairs(
    list: &str,
    key: DescriptorKey,
    separator: char,
) -> Result<Vec<(&str, &str)>, BuildError> {
    let list = list.strip_suffix(',').unwrap_or(list);
    list.split(',')
        .map(|entry| {
            entry
                .split_once(separator)
                .map(|(name, value)| (name.trim(), value.trim()))
                .filter(|(name, _)| !name.is_empty())
                .ok_or_else(|| BuildError::MalformedEntry {
                    field: key.as_str(),
                    entry: entry.trim().to_string(),
                    separator,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TraceSink, TraceStyle};
    use crate::trace::TRACE_HEADING;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn builder() -> RequestBuilder {
        RequestBuilder::with_options(BuilderOptions::silent())
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn base_only_gets_json_defaults() {
        let d = RequestDescriptor::new().with(DescriptorKey::RequestBase, "https://api.example.com");
        let spec = builder().build(&d).unwrap();
        assert_eq!(spec.base_uri(), "https://api.example.com");
        assert_eq!(spec.base_path(), None);
        assert_eq!(
            spec.headers(),
            pairs(&[("Content-Type", "application/json"), ("Accept", "application/json")])
        );
        assert!(spec.query_params().is_empty());
        assert_eq!(spec.body(), None);
    }

    #[test]
    fn users_scenario() {
        let d = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, "https://api.example.com")
            .with(DescriptorKey::RequestPath, "users/5")
            .with(DescriptorKey::QueryParams, "active=true");
        let spec = builder().build(&d).unwrap();
        assert_eq!(spec.base_uri(), "https://api.example.com");
        assert_eq!(spec.base_path(), Some("users/5"));
        assert_eq!(spec.query_params(), pairs(&[("active", "true")]));
        assert_eq!(spec.body(), None);
        assert_eq!(spec.content_type(), "application/json");
        assert_eq!(spec.accept(), "application/json");
        assert_eq!(spec.path_url(), "https://api.example.com/users/5");
    }

    #[test]
    fn headers_keep_input_order_and_duplicates() {
        let d = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, "http://h")
            .with(DescriptorKey::Headers, "X-B:2,X-A:1,X-B:3");
        let spec = builder().build(&d).unwrap();
        assert_eq!(
            spec.headers(),
            pairs(&[
                ("X-B", "2"),
                ("X-A", "1"),
                ("X-B", "3"),
                ("Content-Type", "application/json"),
                ("Accept", "application/json"),
            ])
        );
        let values: Vec<_> = spec.header_values("x-b").collect();
        assert_eq!(values, vec!["2", "3"]);
    }

    #[test]
    fn header_value_may_contain_colon() {
        let d = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, "http://h")
            .with(DescriptorKey::Headers, "Referer:http://example.com:8080/x");
        let spec = builder().build(&d).unwrap();
        assert_eq!(spec.headers()[0], ("Referer".to_string(), "http://example.com:8080/x".to_string()));
    }

    #[test]
    fn entries_are_trimmed_and_trailing_comma_ignored() {
        let d = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, " http://h ")
            .with(DescriptorKey::Headers, "key: myKey ,")
            .with(DescriptorKey::QueryParams, " page = 2 ,");
        let spec = builder().build(&d).unwrap();
        assert_eq!(spec.base_uri(), "http://h");
        assert_eq!(spec.headers()[0], ("key".to_string(), "myKey".to_string()));
        assert_eq!(spec.headers().len(), 3);
        assert_eq!(spec.query_params(), pairs(&[("page", "2")]));
    }

    #[test]
    fn blank_entries_fail() {
        let cases = [
            (DescriptorKey::Headers, ""),
            (DescriptorKey::Headers, "a:1,,b:2"),
            (DescriptorKey::Headers, "a:1,,"),
            (DescriptorKey::QueryParams, " , "),
            (DescriptorKey::QueryParams, ""),
        ];
        for (key, value) in cases {
            let d = RequestDescriptor::new()
                .with(DescriptorKey::RequestBase, "http://h")
                .with(key, value);
            let err = builder().build(&d).unwrap_err();
            assert!(
                matches!(&err, BuildError::MalformedEntry { field, entry, .. }
                    if *field == key.as_str() && entry.is_empty()),
                "{key}={value:?}: {err:?}"
            );
        }
    }

    #[test]
    fn query_params_last_write_wins() {
        let d = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, "http://h")
            .with(DescriptorKey::QueryParams, "color=black,size=9,color=white");
        let spec = builder().build(&d).unwrap();
        assert_eq!(spec.query_params(), pairs(&[("color", "white"), ("size", "9")]));
    }

    #[test]
    fn body_is_verbatim() {
        let body = "  {\"name\": \"a,b:c=d\"}  ";
        let d = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, "http://h")
            .with(DescriptorKey::PostBody, body);
        let spec = builder().build(&d).unwrap();
        assert_eq!(spec.body(), Some(body));
    }

    #[test]
    fn user_content_type_and_accept_are_overridden() {
        let d = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, "http://h")
            .with(DescriptorKey::Headers, "accept:text/html,X-Id:9,Content-Type:text/plain");
        let spec = builder().build(&d).unwrap();
        assert_eq!(
            spec.headers(),
            pairs(&[
                ("X-Id", "9"),
                ("Content-Type", "application/json"),
                ("Accept", "application/json"),
            ])
        );
    }

    #[test]
    fn missing_base_fails() {
        let d = RequestDescriptor::new().with(DescriptorKey::RequestPath, "users");
        assert_eq!(
            builder().build(&d).unwrap_err(),
            BuildError::MissingField("request_base")
        );
        let blank = RequestDescriptor::new().with(DescriptorKey::RequestBase, "   ");
        assert_eq!(
            builder().build(&blank).unwrap_err(),
            BuildError::MissingField("request_base")
        );
    }

    #[test]
    fn header_without_colon_fails() {
        let d = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, "http://h")
            .with(DescriptorKey::Headers, "good:1,badheader");
        assert_eq!(
            builder().build(&d).unwrap_err(),
            BuildError::MalformedEntry {
                field: "headers",
                entry: "badheader".to_string(),
                separator: ':',
            }
        );
    }

    #[test]
    fn query_param_without_name_fails() {
        let d = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, "http://h")
            .with(DescriptorKey::QueryParams, "=orphan");
        assert!(matches!(
            builder().build(&d).unwrap_err(),
            BuildError::MalformedEntry { field: "query_params", separator: '=', .. }
        ));
    }

    #[test]
    fn building_twice_gives_equal_specs() {
        let d = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, "http://h")
            .with(DescriptorKey::Headers, "a:1")
            .with(DescriptorKey::QueryParams, "q=1")
            .with(DescriptorKey::PostBody, "{}");
        let b = builder();
        assert_eq!(b.build(&d).unwrap(), b.build(&d).unwrap());
    }

    #[test]
    fn builds_from_table() {
        let spec = builder()
            .build_from_table("| request_base | http://h |\n| query_params | page=2 |")
            .unwrap();
        assert_eq!(spec.query_param("page"), Some("2"));
    }

    #[test]
    fn table_errors_surface_as_build_errors() {
        let err = builder().build_from_table("request_base http://h").unwrap_err();
        assert!(matches!(err, BuildError::Table(_)));
    }

    // --- trace emission ---

    /// Writer that collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn logging_builder() -> RequestBuilder {
        RequestBuilder::with_options(BuilderOptions {
            style: TraceStyle::Compact,
            sink: TraceSink::Log,
        })
    }

    #[test]
    fn log_sink_emits_one_trace_event() {
        let d = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, "http://h")
            .with(DescriptorKey::QueryParams, "page=2");
        let logs = capture_logs(|| {
            logging_builder().build(&d).unwrap();
        });
        assert_eq!(logs.matches("fixture_core::trace").count(), 1, "{logs}");
        assert_eq!(logs.matches(TRACE_HEADING).count(), 1, "{logs}");
        assert!(logs.contains("Query parameters: [page: 2]"), "{logs}");
    }

    #[test]
    fn failed_build_emits_no_trace() {
        let missing_base = RequestDescriptor::new().with(DescriptorKey::RequestPath, "users");
        let bad_header = RequestDescriptor::new()
            .with(DescriptorKey::RequestBase, "http://h")
            .with(DescriptorKey::Headers, "badheader");
        let logs = capture_logs(|| {
            assert!(logging_builder().build(&missing_base).is_err());
            assert!(logging_builder().build(&bad_header).is_err());
        });
        assert!(!logs.contains("fixture_core::trace"), "{logs}");
        assert!(!logs.contains(TRACE_HEADING), "{logs}");
    }

    #[test]
    fn off_style_emits_nothing_to_the_log() {
        let d = RequestDescriptor::new().with(DescriptorKey::RequestBase, "http://h");
        let logs = capture_logs(|| {
            RequestBuilder::with_options(BuilderOptions {
                style: TraceStyle::Off,
                sink: TraceSink::Log,
            })
            .build(&d)
            .unwrap();
        });
        assert!(!logs.contains("fixture_core::trace"), "{logs}");
    }
}
