use std::fs::File;
use std::io::Write;

use deposit_config::{MeasurementRow, load_measurement_csv};
use rstest::rstest;
use tempfile::tempdir;

fn write_csv(lines: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.csv");
    let mut f = File::create(&path).unwrap();
    for l in lines {
        writeln!(f, "{l}").unwrap();
    }
    (dir, path)
}

#[rstest]
fn loads_rows_in_order() {
    let (_dir, path) = write_csv(&["time,current", "0.0,-1e-11", "0.5,-2e-11", "1.0,-3e-11"]);
    let rows = load_measurement_csv(&path).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[1],
        MeasurementRow {
            time: 0.5,
            current: -2e-11
        }
    );
}

#[rstest]
fn tolerates_padded_fields() {
    let (_dir, path) = write_csv(&["time, current", " 0.0 , 1e-12", "1.0,2e-12"]);
    let rows = load_measurement_csv(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].current, 1e-12);
}

#[rstest]
fn csv_with_wrong_header_errors() {
    let (_dir, path) = write_csv(&["t,i", "0.0,1.0"]);
    let err = load_measurement_csv(&path).expect_err("should error on bad headers");
    assert!(format!("{err}").contains("headers 'time,current'"));
}

#[rstest]
fn csv_with_non_numeric_errors() {
    let (_dir, path) = write_csv(&["time,current", "abc,xyz"]);
    let err = load_measurement_csv(&path).expect_err("should error on non-numeric");
    assert!(format!("{err}").contains("invalid CSV row 2"));
}

#[rstest]
fn csv_with_time_going_backwards_errors() {
    let (_dir, path) = write_csv(&["time,current", "0.0,1e-12", "2.0,1e-12", "1.0,1e-12"]);
    let err = load_measurement_csv(&path).expect_err("should reject decreasing time");
    assert!(format!("{err}").contains("non-decreasing"));
}

#[rstest]
fn repeated_timestamps_are_allowed() {
    let (_dir, path) = write_csv(&["time,current", "0.0,1e-12", "0.0,1e-12", "1.0,1e-12"]);
    assert_eq!(load_measurement_csv(&path).unwrap().len(), 3);
}

#[rstest]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let err = load_measurement_csv(&dir.path().join("nope.csv")).expect_err("missing file");
    assert!(format!("{err}").contains("open measurement CSV"));
}
