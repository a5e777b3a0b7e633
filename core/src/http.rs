//! The request specification handed to whatever HTTP client runs the scenario.
//!
//! # Design
//! `RequestSpecification` is plain data: the builder fills it once and the
//! caller owns it afterwards. Nothing in this crate performs I/O; the caller
//! picks the HTTP verb and executes the request with its own client. Owned
//! `String`/`Vec` fields keep the type easy to serialize and to copy across
//! the C boundary.

use serde::{Deserialize, Serialize};

/// Media type forced onto `Content-Type` and `Accept`.
pub const APPLICATION_JSON: &str = "application/json";

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";

/// A fully composed HTTP request, minus the verb.
///
/// `headers` always ends with `Content-Type` and `Accept`, each set to
/// `application/json` and present exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpecification {
    base_uri: String,
    base_path: Option<String>,
    headers: Vec<(String, String)>,
    query_params: Vec<(String, String)>,
    body: Option<String>,
}

impl RequestSpecification {
    pub(crate) fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            base_path: None,
            headers: Vec::new(),
            query_params: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn set_base_path(&mut self, path: String) {
        self.base_path = Some(path);
    }

    pub(crate) fn add_header(&mut self, name: String, value: String) {
        self.headers.push((name, value));
    }

    /// Replace every header called `name` (case-insensitive) with one entry
    /// appended at the end. Returns true if a header was displaced.
    pub(crate) fn force_header(&mut self, name: &str, value: &str) -> bool {
        let before = self.headers.len();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        let displaced = self.headers.len() != before;
        self.headers.push((name.to_string(), value.to_string()));
        displaced
    }

    /// Last write wins; a repeated name keeps its first position.
    pub(crate) fn set_query_param(&mut self, name: String, value: String) {
        match self.query_params.iter_mut().find(|(n, _)| *n == name) {
            Some(param) => param.1 = value,
            None => self.query_params.push((name, value)),
        }
    }

    pub(crate) fn set_body(&mut self, body: String) {
        self.body = Some(body);
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Values of every header called `name`, compared case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn content_type(&self) -> &str {
        self.header_values(CONTENT_TYPE).last().unwrap_or(APPLICATION_JSON)
    }

    pub fn accept(&self) -> &str {
        self.header_values(ACCEPT).last().unwrap_or(APPLICATION_JSON)
    }

    /// Base URI and base path joined by exactly one `/`. Query parameters are
    /// left to the executing client so it can apply its own encoding.
    pub fn path_url(&self) -> String {
        match self.base_path.as_deref() {
            None | Some("") => self.base_uri.clone(),
            Some(path) => format!(
                "{}/{}",
                self.base_uri.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
        }
    }
}
