//! ClickHouse source against a scripted HTTP endpoint.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use tabjson_ingest::{ClickHouseConfig, ClickHouseSource, IngestError, TabularSource};
use tabjson_model::CellValue;

const PING_OK: (u16, &str) = (200, "Ok.\n");

const PROVINCE_RESULT: &str = r#"{"meta":[{"name":"school_province","type":"String"},{"name":"cities","type":"Array(String)"}],"data":[["湖北",["武汉","宜昌"]],["河南",[]]],"rows":2}"#;

/// Answers one connection per scripted response and returns the raw requests.
fn scripted_server(responses: Vec<(u16, &'static str)>) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let port = listener.local_addr().expect("local addr").port();
    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (stream, _) = listener.accept().expect("accept");
            requests.push(answer(stream, status, body));
        }
        requests
    });
    (port, handle)
}

fn answer(stream: TcpStream, status: u16, body: &str) -> String {
    let mut reader = BufReader::new(stream);
    let mut request = String::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).expect("read request line") == 0 {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
        let end_of_headers = line == "\r\n";
        request.push_str(&line);
        if end_of_headers {
            break;
        }
    }
    let mut payload = vec![0u8; content_length];
    reader.read_exact(&mut payload).expect("read request body");
    request.push_str(&String::from_utf8_lossy(&payload));

    let mut stream = reader.into_inner();
    let response = format!(
        "HTTP/1.1 {status} STUB\r\nContent-Type: text/plain; charset=UTF-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).expect("write response");
    stream.flush().expect("flush response");
    request
}

fn config_for(port: u16) -> ClickHouseConfig {
    ClickHouseConfig {
        host: "127.0.0.1".to_string(),
        port,
        username: "reader".to_string(),
        password: "s3cret".to_string(),
        database: "exams".to_string(),
    }
}

#[test]
fn fetches_rows_and_sends_credentials() {
    let (port, server) = scripted_server(vec![PING_OK, (200, PROVINCE_RESULT)]);
    let mut source = ClickHouseSource::connect(config_for(port), "SELECT 1;")
        .expect("connect")
        .with_expected_arity(2);

    let rows = source.fetch().expect("fetch");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.rows[0][0], CellValue::Text("湖北".to_string()));
    assert_eq!(rows.rows[1][1], CellValue::List(Vec::new()));

    let requests = server.join().expect("server thread");
    assert!(requests[0].starts_with("GET /ping"));
    let query = requests[1].to_lowercase();
    assert!(query.starts_with("post /?database=exams"));
    assert!(query.contains("x-clickhouse-user: reader"));
    assert!(query.contains("x-clickhouse-key: s3cret"));
    assert!(requests[1].ends_with("SELECT 1 FORMAT JSONCompact"));
}

#[test]
fn rejected_credentials_are_unauthorized() {
    let (port, server) = scripted_server(vec![
        PING_OK,
        (
            401,
            "Code: 516. DB::Exception: reader: Authentication failed: password is incorrect.",
        ),
    ]);
    let mut source = ClickHouseSource::connect(config_for(port), "SELECT 1").expect("connect");

    let err = source.fetch().expect_err("credentials rejected");
    assert!(matches!(err, IngestError::Unauthorized { ref user, .. } if user == "reader"));
    assert!(err.is_connection_error());
    server.join().expect("server thread");
}

#[test]
fn auth_error_text_in_result_rows_is_ordinary_data() {
    const NOTES: &str = r#"{"meta":[{"name":"note","type":"String"}],"data":[["Authentication failed"],["Code: 516"]],"rows":2}"#;
    let (port, server) = scripted_server(vec![PING_OK, (200, NOTES)]);
    let mut source = ClickHouseSource::connect(config_for(port), "SELECT note FROM log")
        .expect("connect");

    let rows = source.fetch().expect("rows are data");
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows.rows[0][0],
        CellValue::Text("Authentication failed".to_string())
    );
    server.join().expect("server thread");
}

#[test]
fn authentication_error_body_on_server_error_is_unauthorized() {
    let (port, server) = scripted_server(vec![
        PING_OK,
        (
            500,
            "Code: 516. DB::Exception: reader: Authentication failed: password is incorrect.",
        ),
    ]);
    let mut source = ClickHouseSource::connect(config_for(port), "SELECT 1").expect("connect");

    let err = source.fetch().expect_err("credentials rejected");
    assert!(matches!(err, IngestError::Unauthorized { .. }));
    server.join().expect("server thread");
}

#[test]
fn server_errors_are_query_failures() {
    let (port, server) = scripted_server(vec![
        PING_OK,
        (
            404,
            "Code: 60. DB::Exception: Table exams.gaokao2025 does not exist.",
        ),
    ]);
    let mut source = ClickHouseSource::connect(config_for(port), "SELECT 1").expect("connect");

    let err = source.fetch().expect_err("missing table");
    assert!(matches!(err, IngestError::Query { status: 404, .. }));
    assert!(!err.is_connection_error());
    server.join().expect("server thread");
}

#[test]
fn unexpected_column_count_is_rejected() {
    let (port, server) = scripted_server(vec![PING_OK, (200, PROVINCE_RESULT)]);
    let mut source = ClickHouseSource::connect(config_for(port), "SELECT 1")
        .expect("connect")
        .with_expected_arity(3);

    let err = source.fetch().expect_err("arity mismatch");
    assert!(matches!(
        err,
        IngestError::ArityMismatch {
            expected: 3,
            actual: 2
        }
    ));
    server.join().expect("server thread");
}

#[test]
fn unreachable_endpoint_is_a_connection_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };
    let err = ClickHouseSource::connect(config_for(port), "SELECT 1").expect_err("refused");
    assert!(matches!(err, IngestError::Connection { .. }));
}
