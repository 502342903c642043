use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const CATEGORY_COLUMNS: [&str; 17] = [
    "AUTOS",
    "MOTOS",
    "AUTOBUS DE 2 EJES",
    "AUTOBUS DE 3 EJES",
    "AUTOBUS DE 4 EJES",
    "CAMIONES DE 2 EJES",
    "CAMIONES DE 3 EJES",
    "CAMIONES DE 4 EJES",
    "CAMIONES DE 5 EJES",
    "CAMIONES DE 6 EJES",
    "CAMIONES DE 7 EJES",
    "CAMIONES DE 8 EJES",
    "CAMIONES DE 9 EJES",
    "TRICICLOS",
    "EJE EXTRA AUTOBUS",
    "EJE EXTRA CAMION",
    "PEATONES",
];

const MONTHS: [&str; 12] = [
    "ENERO", "FEBRERO", "MARZO", "ABRIL", "MAYO", "JUNIO", "JULIO", "AGOSTO", "SEPTIEMBRE", "OCTUBRE",
    "NOVIEMBRE", "DICIEMBRE",
];

fn aforo() -> Command {
    let mut cmd = Command::cargo_bin("aforo").unwrap();
    cmd.env_remove("AFORO_DATA").env_remove("RUST_LOG");
    cmd
}

fn csv_with_years(years: std::ops::RangeInclusive<i32>) -> String {
    let mut out = String::from("AÑO,MES,");
    out.push_str(
        &CATEGORY_COLUMNS
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push('\n');
    for (t, year) in years.flat_map(|y| std::iter::repeat(y).take(12)).enumerate() {
        let month = MONTHS[t % 12];
        let autos = 100_000 + 500 * t + 8_000 * ((t % 12) as usize);
        out.push_str(&format!("{year},{month},\"{autos}\""));
        for i in 1..CATEGORY_COLUMNS.len() {
            out.push_str(&format!(",{}", 10 * i + t));
        }
        out.push('\n');
    }
    out
}

#[test]
fn summary_with_demo_data() {
    aforo()
        .args(["summary", "--demo", "--show", "autos,motos", "-y", "2024", "-m", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total 2021-2025"))
        .stdout(predicate::str::contains("Frequency: monthly"))
        .stdout(predicate::str::contains("MARZO"))
        .stdout(predicate::str::contains("Statistics 2024"));
}

#[test]
fn categories_lists_keys() {
    aforo()
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("autobus-2"))
        .stdout(predicate::str::contains("PEATONES"));
}

#[test]
fn missing_column_exits_with_code_2() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "AÑO,MES,AUTOS\n2021,ENERO,1\n").unwrap();

    aforo()
        .args(["summary", "-f"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing required column"));
}

#[test]
fn missing_data_source_exits_with_code_2() {
    let dir = tempfile::tempdir().unwrap();
    aforo()
        .current_dir(dir.path())
        .arg("summary")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--demo"));
}

#[test]
fn file_without_usable_rows_exits_with_code_3() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    let header = csv_with_years(2021..=2020);
    fs::write(&path, header).unwrap();

    aforo().args(["summary", "-f"]).arg(&path).assert().code(3);
}

#[test]
fn forecast_json_from_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aforos.csv");
    fs::write(&path, csv_with_years(2021..=2024)).unwrap();

    aforo()
        .args(["forecast", "--json", "-v", "autos", "-y", "2025", "-m", "1", "-f"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"fitted\""))
        .stdout(predicate::str::contains("\"column\": \"AUTOS\""));
}

#[test]
fn data_path_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aforos.csv");
    fs::write(&path, csv_with_years(2021..=2021)).unwrap();

    aforo()
        .env("AFORO_DATA", &path)
        .args(["forecast", "-v", "peatones"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Peatones 2025-06: 0"))
        .stdout(predicate::str::contains("failed on 9 training months"));
}
