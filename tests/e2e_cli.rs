mod cli_helpers;

use anyhow::Result;
use assert_cmd::prelude::*;
use cli_helpers::{base_cmd, init_warehouse, path_arg, run_cmd_json, run_cmd_stdout};
use predicates::prelude::*;
use tempfile::TempDir;

fn setup_temp_home() -> TempDir {
    TempDir::new().expect("failed to create temp home")
}

#[test]
fn show_summary_sample_no_color_when_piped() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["show", "summary", "--sample"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1.00조 원"))
        .stdout(predicate::str::contains("↑ 5.2%"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn show_balance_sample_lists_categories() -> Result<()> {
    let home = setup_temp_home();
    let stdout = run_cmd_stdout(&home, &["show", "balance", "--sample"])?;

    assert!(stdout.contains("유동자산"));
    assert!(stdout.contains("총 자산"));
    assert!(stdout.contains("합계"));
    Ok(())
}

#[test]
fn show_income_json_is_parseable() -> Result<()> {
    let home = setup_temp_home();
    let value = run_cmd_json(&home, &["--json", "show", "income", "--sample"])?;

    let years: Vec<&str> = value["years"]
        .as_array()
        .expect("years array")
        .iter()
        .filter_map(|y| y.as_str())
        .collect();
    assert_eq!(years, vec!["2024년", "2023년", "2022년"]);
    assert_eq!(value["rows"][0]["name"], "매출액");
    assert_eq!(value["rows"][0]["amounts"][0], "1.00조 원");
    Ok(())
}

#[test]
fn show_income_respects_year_limit() -> Result<()> {
    let home = setup_temp_home();
    let value = run_cmd_json(&home, &["--json", "show", "income", "--sample", "--years", "2"])?;

    assert_eq!(value["years"].as_array().map(|a| a.len()), Some(2));
    Ok(())
}

#[test]
fn show_unknown_view_fails() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["show", "cashflow", "--sample"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown view"));
}

#[test]
fn report_sample_writes_html() -> Result<()> {
    let home = setup_temp_home();
    let output = home.path().join("out").join("report.html");

    let mut cmd = base_cmd(&home);
    cmd.args(["report", "--sample", "--output", &path_arg(&output)]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Report written"));

    let html = std::fs::read_to_string(&output)?;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("재무실적보고서"));
    assert!(html.contains("1.00조 원"));
    Ok(())
}

#[test]
fn report_json_summary() -> Result<()> {
    let home = setup_temp_home();
    let output = home.path().join("report.html");

    let value = run_cmd_json(
        &home,
        &["--json", "report", "--sample", "--output", &path_arg(&output)],
    )?;
    assert_eq!(value["output"], path_arg(&output));
    assert!(value["bytes"].as_u64().unwrap_or(0) > 0);
    assert!(output.exists());
    Ok(())
}

#[test]
fn report_from_json_input_with_title() -> Result<()> {
    let home = setup_temp_home();
    let input = home.path().join("figures.json");
    std::fs::write(
        &input,
        r#"{"balance_sheet": [
            {"항목": "현금", "값": 300000000000, "분류": "유동자산"},
            {"항목": "재고자산", "값": 400000000000, "분류": "유동자산"}
        ]}"#,
    )?;
    let output = home.path().join("report.html");

    run_cmd_stdout(
        &home,
        &[
            "report",
            "--input",
            &path_arg(&input),
            "--output",
            &path_arg(&output),
            "--title",
            "분기 보고서",
        ],
    )?;

    let html = std::fs::read_to_string(&output)?;
    assert!(html.contains("분기 보고서"));
    assert!(html.contains("7000.00억 원"));
    assert!(html.contains("요약 데이터가 없습니다."));
    Ok(())
}

#[test]
fn report_rejects_unsupported_input() {
    let home = setup_temp_home();
    let input = home.path().join("figures.csv");
    std::fs::write(&input, "항목,값\n").expect("write csv");

    let mut cmd = base_cmd(&home);
    cmd.args(["report", "--input", &path_arg(&input)]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type"));
}

#[test]
fn report_without_source_fails() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["report", "--output", &path_arg(&home.path().join("r.html"))]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no data source"));
}

#[test]
fn warehouse_from_config_file() -> Result<()> {
    let home = setup_temp_home();
    let db = init_warehouse(&home)?;
    let config = home.path().join("finreport.toml");
    std::fs::write(
        &config,
        format!(
            "[warehouse]\npath = '{}'\n\n[report]\ntitle = '연간 실적'\n",
            path_arg(&db)
        ),
    )?;
    let output = home.path().join("report.html");

    run_cmd_stdout(
        &home,
        &["--config", &path_arg(&config), "report", "--output", &path_arg(&output)],
    )?;

    let html = std::fs::read_to_string(&output)?;
    assert!(html.contains("연간 실적"));
    assert!(html.contains("매출원가"));
    Ok(())
}

#[test]
fn warehouse_from_environment() -> Result<()> {
    let home = setup_temp_home();
    let db = init_warehouse(&home)?;

    let mut cmd = base_cmd(&home);
    cmd.env("FINREPORT_DB", &db);
    cmd.args(["show", "analysis"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("영업이익률"))
        .stdout(predicate::str::contains("15.00%"));
    Ok(())
}

#[test]
fn missing_config_file_fails() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["--config", "does-not-exist.toml", "show", "summary", "--sample"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn init_db_then_tables_and_query() -> Result<()> {
    let home = setup_temp_home();
    let db = init_warehouse(&home)?;
    let db_arg = path_arg(&db);

    let tables = run_cmd_json(&home, &["--json", "tables", "--db", &db_arg])?;
    let names: Vec<&str> = tables
        .as_array()
        .expect("tables array")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert!(names.contains(&"summary"));
    assert!(names.contains(&"income_statement"));
    assert!(names.contains(&"balance_sheet"));

    let rows = run_cmd_json(
        &home,
        &[
            "--json",
            "query",
            "SELECT \"항목\", \"금액\" FROM income_statement WHERE \"연도\" = 2024 ORDER BY rowid",
            "--db",
            &db_arg,
        ],
    )?;
    let rows = rows.as_array().expect("rows array");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["항목"], "매출액");
    Ok(())
}

#[test]
fn describe_and_ping_warehouse() -> Result<()> {
    let home = setup_temp_home();
    let db = init_warehouse(&home)?;
    let db_arg = path_arg(&db);

    let stdout = run_cmd_stdout(&home, &["describe", "balance_sheet", "--db", &db_arg])?;
    assert!(stdout.contains("분류"));

    let ping = run_cmd_json(&home, &["--json", "ping", "--db", &db_arg])?;
    assert_eq!(ping["table_count"], 3);
    Ok(())
}

#[test]
fn query_missing_warehouse_fails() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args([
        "query",
        "SELECT 1",
        "--db",
        &path_arg(&home.path().join("absent.db")),
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("database not found"));
}

#[test]
fn dashboard_exits_on_command() {
    let home = setup_temp_home();

    let mut cmd = assert_cmd::Command::from_std(base_cmd(&home));
    cmd.args(["dashboard", "--sample"]).write_stdin("summary\nexit\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Interactive Dashboard"))
        .stdout(predicate::str::contains("Goodbye!"));
}
