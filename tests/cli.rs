// Headless command-line behaviour: report export and startup failures.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const POLLUTION: &str = "\
PM2.5,PM10,CO,Qualite_air
12.5,20,1.2µg,bon
,35,n/a,moyen
40.1,,2.0µg,mauvais
80.0,120,,dangereuse
";

#[test]
fn test_export_missing_writes_report() {
    let tmp_dir = TempDir::new().unwrap();
    let data = tmp_dir.path().join("pollution.csv");
    let out = tmp_dir.path().join("rapport.csv");
    fs::write(&data, POLLUTION).unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("airview");
    cmd.arg(&data).arg("--export-missing").arg(&out);
    cmd.assert().success();

    let report = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], ",Valeurs_manquantes,Pourcentage_manquant (%)");
    assert_eq!(lines[1], "CO,2,50.0");
    assert_eq!(lines.len(), 5);
    assert!(lines.contains(&"Qualite_air,0,0.0"));
}

#[test]
fn test_missing_file_fails_before_any_window() {
    let tmp_dir = TempDir::new().unwrap();
    let out = tmp_dir.path().join("rapport.csv");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("airview");
    cmd.arg(tmp_dir.path().join("absent.csv"))
        .arg("--export-missing")
        .arg(&out);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
    assert!(!out.exists());
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let tmp_dir = TempDir::new().unwrap();
    let data = tmp_dir.path().join("pollution.xlsx");
    fs::write(&data, "not a spreadsheet").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("airview");
    cmd.arg(&data).arg("--export-missing").arg(tmp_dir.path().join("r.csv"));

    cmd.assert().failure();
}

#[test]
fn test_unknown_view_is_a_usage_error() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("airview");
    cmd.arg("--view").arg("dashboard");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
