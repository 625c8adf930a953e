use std::fs;
use std::path::PathBuf;
use tickwatch::exchange::binance::parse_klines;
use tickwatch::ErrorKind;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn parses_binance_klines() {
    let path = fixture_path("binance_klines.json");
    let content = fs::read_to_string(&path).expect("read fixture");
    let candles = parse_klines(&content).expect("parse");

    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].close, 42050.0);
    assert_eq!(candles[1].close, 42150.0);
    assert_eq!(candles[0].time, 1704070799);
    assert!(candles[0].time < candles[1].time);
}

#[test]
fn restores_chronological_order() {
    let content = r#"[
        [2000000, "2", "2", "2", "2", "1", 2999999, "0", 1, "0", "0", "0"],
        [1000000, "1", "1", "1", "1", "1", 1999999, "0", 1, "0", "0", "0"]
    ]"#;
    let candles = parse_klines(content).expect("parse");
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].close, 1.0);
    assert_eq!(candles[1].close, 2.0);
}

#[test]
fn deduplicates_repeated_close_times() {
    let content = r#"[
        [1000000, "1", "1", "1", "1", "1", 1999999, "0", 1, "0", "0", "0"],
        [1000000, "1", "1", "1", "1", "1", 1999999, "0", 1, "0", "0", "0"]
    ]"#;
    let candles = parse_klines(content).expect("parse");
    assert_eq!(candles.len(), 1);
}

#[test]
fn non_array_payload_is_a_data_error() {
    let err = parse_klines("{\"code\": -1121}").expect_err("should fail");
    assert_eq!(err.kind, ErrorKind::Data);
}

#[test]
fn non_numeric_close_is_a_data_error() {
    let content = r#"[
        [1000000, "1", "1", "1", "oops", "1", 1999999, "0", 1, "0", "0", "0"]
    ]"#;
    let err = parse_klines(content).expect_err("should fail");
    assert_eq!(err.kind, ErrorKind::Data);
}

#[test]
fn short_row_is_a_data_error() {
    let content = r#"[[1000000, "1", "1"]]"#;
    let err = parse_klines(content).expect_err("should fail");
    assert_eq!(err.kind, ErrorKind::Data);
}

#[test]
fn invalid_json_is_a_data_error() {
    let err = parse_klines("not json").expect_err("should fail");
    assert_eq!(err.kind, ErrorKind::Data);
}
