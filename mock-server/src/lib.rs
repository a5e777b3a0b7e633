use axum::{
    extract::Query,
    http::{HeaderMap, Method, Uri},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the server saw: every request is answered with its own description.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Echo {
    /// Values of header `name`; header names arrive lowercased.
    pub fn header(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

pub fn app() -> Router {
    Router::new().fallback(echo)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    Json(Echo {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query,
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Echo {
        Echo {
            method: "GET".to_string(),
            path: "/users/5".to_string(),
            query: vec![("active".to_string(), "true".to_string())],
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("x-id".to_string(), "1".to_string()),
                ("x-id".to_string(), "2".to_string()),
            ],
            body: String::new(),
        }
    }

    #[test]
    fn echo_serializes_pairs_as_arrays() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["query"], serde_json::json!([["active", "true"]]));
        assert_eq!(json["headers"][0], serde_json::json!(["accept", "application/json"]));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let echo = sample();
        assert_eq!(echo.header("X-Id"), vec!["1", "2"]);
        assert_eq!(echo.header("Accept"), vec!["application/json"]);
        assert!(echo.header("content-type").is_empty());
    }
}
