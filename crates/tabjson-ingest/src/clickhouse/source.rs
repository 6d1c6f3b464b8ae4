//! Query-backed source over the ClickHouse HTTP interface.

use std::time::Instant;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use tabjson_model::{CellValue, RowSet};

use super::config::ClickHouseConfig;
use crate::error::{IngestError, Result};
use crate::source::TabularSource;

const USER_HEADER: &str = "X-ClickHouse-User";
const KEY_HEADER: &str = "X-ClickHouse-Key";

/// Runs one fixed query and returns its rows.
///
/// The HTTP client is created by [`ClickHouseSource::connect`] and released
/// when the source is dropped.
#[derive(Debug)]
pub struct ClickHouseSource {
    config: ClickHouseConfig,
    query: String,
    client: Client,
    expected_arity: Option<usize>,
}

impl ClickHouseSource {
    /// Opens a client and checks that the endpoint answers `/ping`.
    ///
    /// The endpoint is always reached directly; proxy environment variables
    /// are ignored.
    pub fn connect(config: ClickHouseConfig, query: impl Into<String>) -> Result<Self> {
        let endpoint = config.endpoint();
        let client = Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| connection_error(&endpoint, &e))?;
        let response = client
            .get(format!("{endpoint}/ping"))
            .send()
            .map_err(|e| connection_error(&endpoint, &e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Connection {
                endpoint,
                message: format!("ping returned HTTP {}", status.as_u16()),
            });
        }
        info!(endpoint = %endpoint, database = %config.database, "connected to ClickHouse");
        Ok(Self {
            config,
            query: query.into(),
            client,
            expected_arity: None,
        })
    }

    /// Rejects results whose column count differs from `columns`.
    #[must_use]
    pub fn with_expected_arity(mut self, columns: usize) -> Self {
        self.expected_arity = Some(columns);
        self
    }

    fn query_url(&self) -> Result<Url> {
        let endpoint = self.config.endpoint();
        Url::parse_with_params(
            &format!("{endpoint}/"),
            &[("database", self.config.database.as_str())],
        )
        .map_err(|e| IngestError::Connection {
            endpoint,
            message: e.to_string(),
        })
    }
}

impl TabularSource for ClickHouseSource {
    fn describe(&self) -> String {
        format!("ClickHouse {}/{}", self.config.endpoint(), self.config.database)
    }

    fn fetch(&mut self) -> Result<RowSet> {
        let endpoint = self.config.endpoint();
        let url = self.query_url()?;
        let body = format!(
            "{} FORMAT JSONCompact",
            self.query.trim().trim_end_matches(';')
        );
        debug!(query = %self.query, "executing query");

        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .header(USER_HEADER, self.config.username.as_str())
            .header(KEY_HEADER, self.config.password.as_str())
            .body(body)
            .send()
            .map_err(|e| connection_error(&endpoint, &e))?;
        let status = response.status();
        let text = response.text().map_err(|e| IngestError::Decode {
            message: e.to_string(),
        })?;

        if is_unauthorized(status, &text) {
            return Err(IngestError::Unauthorized {
                endpoint,
                user: self.config.username.clone(),
                message: first_line(&text),
            });
        }
        if !status.is_success() {
            return Err(IngestError::Query {
                status: status.as_u16(),
                message: first_line(&text),
            });
        }

        let rows = decode_compact(&text)?;
        if let Some(expected) = self.expected_arity
            && rows.width() != expected
        {
            return Err(IngestError::ArityMismatch {
                expected,
                actual: rows.width(),
            });
        }
        info!(
            endpoint = %endpoint,
            rows = rows.len(),
            columns = rows.width(),
            duration_ms = started.elapsed().as_millis(),
            "query complete"
        );
        Ok(rows)
    }
}

#[derive(Debug, Deserialize)]
struct CompactResponse {
    meta: Vec<ColumnMeta>,
    data: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ColumnMeta {
    name: String,
    #[serde(rename = "type")]
    data_type: String,
}

/// Decodes a `JSONCompact` response body.
pub(crate) fn decode_compact(body: &str) -> Result<RowSet> {
    let response: CompactResponse =
        serde_json::from_str(body).map_err(|e| IngestError::Decode {
            message: e.to_string(),
        })?;
    for column in &response.meta {
        debug!(column = %column.name, data_type = %column.data_type, "result column");
    }
    let headers = response.meta.into_iter().map(|column| column.name).collect();
    let rows = response
        .data
        .into_iter()
        .map(|row| row.into_iter().map(cell_from_json).collect())
        .collect();
    Ok(RowSet::with_rows(headers, rows))
}

/// Converts one JSON result value to a [`CellValue`].
fn cell_from_json(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(b),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => CellValue::Integer(i),
            (None, Some(u)) => CellValue::Text(u.to_string()),
            (None, None) => n.as_f64().map_or(CellValue::Null, CellValue::Float),
        },
        Value::String(s) => CellValue::Text(s),
        Value::Array(items) => CellValue::List(items.into_iter().filter_map(json_member).collect()),
        other @ Value::Object(_) => CellValue::Text(other.to_string()),
    }
}

fn json_member(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Error responses that mean the credentials were rejected. A successful
/// response is never treated as one, whatever its rows contain.
fn is_unauthorized(status: StatusCode, body: &str) -> bool {
    status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || (!status.is_success() && is_auth_failure(body))
}

fn is_auth_failure(body: &str) -> bool {
    body.contains("AUTHENTICATION_FAILED")
        || body.contains("Authentication failed")
        || body.contains("Code: 516")
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}

fn connection_error(endpoint: &str, error: &reqwest::Error) -> IngestError {
    IngestError::Connection {
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_compact_result() {
        let body = r#"{
            "meta": [
                {"name": "school_province", "type": "String"},
                {"name": "cities", "type": "Array(String)"}
            ],
            "data": [
                ["湖北", ["武汉", "宜昌"]],
                ["河南", []]
            ],
            "rows": 2
        }"#;
        let rows = decode_compact(body).unwrap();
        assert_eq!(rows.headers, vec!["school_province", "cities"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows[0][0], CellValue::Text("湖北".to_string()));
        assert_eq!(
            rows.rows[0][1],
            CellValue::List(vec!["武汉".to_string(), "宜昌".to_string()])
        );
        assert_eq!(rows.rows[1][1], CellValue::List(Vec::new()));
    }

    #[test]
    fn converts_json_scalars() {
        assert_eq!(cell_from_json(Value::Null), CellValue::Null);
        assert_eq!(cell_from_json(serde_json::json!(5)), CellValue::Integer(5));
        assert_eq!(cell_from_json(serde_json::json!(2.5)), CellValue::Float(2.5));
        assert_eq!(
            cell_from_json(serde_json::json!(u64::MAX)),
            CellValue::Text(u64::MAX.to_string())
        );
        assert_eq!(
            cell_from_json(serde_json::json!([1, null, "x"])),
            CellValue::List(vec!["1".to_string(), "x".to_string()])
        );
    }

    #[test]
    fn rejects_malformed_body() {
        let err = decode_compact("Code: 62. DB::Exception: Syntax error").unwrap_err();
        assert!(matches!(err, IngestError::Decode { .. }));
    }

    #[test]
    fn detects_authentication_failures() {
        assert!(is_auth_failure(
            "Code: 516. DB::Exception: default: Authentication failed: password is incorrect"
        ));
        assert!(!is_auth_failure("Code: 60. DB::Exception: Table gaokao2025 does not exist"));
    }

    #[test]
    fn auth_text_in_successful_rows_is_data() {
        let body = r#"{"meta":[{"name":"note","type":"String"}],"data":[["Authentication failed"]]}"#;
        assert!(!is_unauthorized(StatusCode::OK, body));
        assert!(is_unauthorized(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Code: 516. DB::Exception: Authentication failed"
        ));
        assert!(is_unauthorized(StatusCode::FORBIDDEN, ""));
        assert!(!is_unauthorized(
            StatusCode::NOT_FOUND,
            "Code: 60. DB::Exception: Table gaokao2025 does not exist"
        ));
    }
}
