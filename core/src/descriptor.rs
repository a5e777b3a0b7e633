//! The key-value table a scenario uses to describe a request.
//!
//! # Design
//! `RequestDescriptor` is an insertion-ordered list of string pairs rather
//! than a `HashMap`, so a descriptor read from a table prints back in the
//! order the scenario author wrote it. Keys the builder does not recognize
//! are kept and ignored.

use std::fmt;
use std::str::FromStr;

/// The descriptor keys the builder reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKey {
    RequestBase,
    RequestPath,
    Headers,
    QueryParams,
    PostBody,
}

impl DescriptorKey {
    pub const ALL: [DescriptorKey; 5] = [
        DescriptorKey::RequestBase,
        DescriptorKey::RequestPath,
        DescriptorKey::Headers,
        DescriptorKey::QueryParams,
        DescriptorKey::PostBody,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DescriptorKey::RequestBase => "request_base",
            DescriptorKey::RequestPath => "request_path",
            DescriptorKey::Headers => "headers",
            DescriptorKey::QueryParams => "query_params",
            DescriptorKey::PostBody => "post_body",
        }
    }

    pub fn is_required(self) -> bool {
        self == DescriptorKey::RequestBase
    }

    /// Human-readable value format, as shown by `fixreq keys`.
    pub fn format_hint(self) -> &'static str {
        match self {
            DescriptorKey::RequestBase => "absolute URI, e.g. https://localhost:8080/api/v1",
            DescriptorKey::RequestPath => "path appended to request_base, e.g. users/5",
            DescriptorKey::Headers => "name1:value1,name2:value2",
            DescriptorKey::QueryParams => "name1=value1,name2=value2",
            DescriptorKey::PostBody => "raw body, usually JSON",
        }
    }
}

impl fmt::Display for DescriptorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the recognized descriptor keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown descriptor key `{}`", self.0)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for DescriptorKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DescriptorKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// Input to the builder: string keys mapped to string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    entries: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. A repeated key replaces the earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: DescriptorKey, value: impl Into<String>) -> Self {
        self.insert(key.as_str(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn value(&self, key: DescriptorKey) -> Option<&str> {
        self.get(key.as_str())
    }

    pub fn contains(&self, key: DescriptorKey) -> bool {
        self.value(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestDescriptor {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut descriptor = RequestDescriptor::new();
        for (key, value) in iter {
            descriptor.insert(key, value);
        }
        descriptor
    }
}
