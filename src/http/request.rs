use serde::Serialize;
use serde_json::Value;

use super::method::HttpMethod;

/// One declared call against the target service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub expected_status: u16,
    pub required_fields: Vec<String>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            body: None,
            expected_status: 200,
            required_fields: Vec::new(),
        }
    }

    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    pub fn post(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Post, path)
    }

    pub fn put(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Put, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    pub fn require_fields(mut self, fields: &[&str]) -> Self {
        self.required_fields = fields.iter().map(|field| field.to_string()).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_to_expecting_200_without_body() {
        let case = TestCase::get("Health Check", "/health");
        assert_eq!(case.method, HttpMethod::Get);
        assert_eq!(case.expected_status, 200);
        assert!(case.body.is_none());
        assert!(case.required_fields.is_empty());
    }

    #[test]
    fn builders_keep_field_order() {
        let case = TestCase::post("Scan Reserves", "/api/reserves/scan")
            .with_body(json!({"force": true}))
            .expect_status(202)
            .require_fields(&["success", "reserves"]);

        assert_eq!(case.expected_status, 202);
        assert_eq!(case.required_fields, vec!["success", "reserves"]);
        assert_eq!(case.body, Some(json!({"force": true})));
    }
}
