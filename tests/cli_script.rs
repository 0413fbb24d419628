use std::{path::Path, str::FromStr};

use assert_cmd::Command;
use predicates::str::contains;
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::tempdir;

const TODAY: &str = "2024-03-15";

fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cashview_cli").unwrap();
    cmd.env("CASHVIEW_HOME", home)
        .env("CASHVIEW_TODAY", TODAY)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn run_script(home: &Path, script: &str) -> String {
    let output = cli(home)
        .env("CASHVIEW_CLI_SCRIPT", "1")
        .write_stdin(script.to_string())
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}

fn run_json(home: &Path, args: &[&str]) -> Value {
    let output = cli(home).arg("--json").args(args).output().unwrap();
    assert!(output.status.success(), "{args:?} failed");
    serde_json::from_slice(&output.stdout).unwrap()
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

#[test]
fn script_mode_flags_overspent_budget() {
    let home = tempdir().unwrap();
    let stdout = run_script(
        home.path(),
        "add-budget Food 100\nadd-expense 150 Food 2024-03-10 groceries\nbudget-status\nbudget-performance\nexit\n",
    );

    assert!(stdout.contains("Created monthly budget for Food"));
    assert!(stdout.contains("Over Budget"));
    assert!(stdout.contains("150.00 USD"));
    assert!(stdout.contains("-50.00 USD"));
    assert!(stdout.contains("Exceeded"));
    assert!(stdout.contains("150.00%"));
}

#[test]
fn records_survive_between_runs() {
    let home = tempdir().unwrap();
    run_script(home.path(), "add-income 1000 salary 2024-02-01\nadd-expense 800 Food 2024-02-03\n");
    run_script(home.path(), "add-income 1200 Salary 2024-03-01\nadd-expense 600 Utilities 2024-03-02\n");

    let analysis = run_json(home.path(), &["savings", "2"]);
    let buckets = analysis["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0]["period"], "2024-02");
    assert_eq!(decimal(&buckets[0]["monthly_savings"]), Decimal::from(200));
    assert_eq!(decimal(&buckets[1]["cumulative_savings"]), Decimal::from(800));
    assert_eq!(decimal(&buckets[0]["savings_rate"]), Decimal::from(20));
    assert_eq!(decimal(&buckets[1]["savings_rate"]), Decimal::from(50));

    assert!(home.path().join("records.json").exists());
    assert!(home.path().join("config.json").exists());
}

#[test]
fn json_cash_flow_is_zero_filled_and_chronological() {
    let home = tempdir().unwrap();
    run_script(home.path(), "add-expense 40 Entertainment 2024-01-20\n");

    let series = run_json(home.path(), &["cash-flow", "3"]);
    let entries = series["entries"].as_array().unwrap();
    let periods: Vec<&str> = entries
        .iter()
        .map(|entry| entry["period"].as_str().unwrap())
        .collect();
    assert_eq!(periods, ["2024-01", "2024-02", "2024-03"]);
    assert_eq!(decimal(&entries[0]["net"]), Decimal::from(-40));
    assert_eq!(decimal(&entries[1]["expenses"]), Decimal::ZERO);

    let empty = run_json(home.path(), &["cash-flow", "0"]);
    assert!(empty["entries"].as_array().unwrap().is_empty());
}

#[test]
fn no_budgets_is_its_own_outcome() {
    let home = tempdir().unwrap();
    let report = run_json(home.path(), &["budget-status"]);
    assert_eq!(report["kind"], "no_budgets");

    let dashboard = run_json(home.path(), &["dashboard"]);
    assert_eq!(dashboard["month"], "2024-03");
    assert_eq!(dashboard["budget_count"], 0);
}

#[test]
fn invalid_input_exits_with_error() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["cash-flow", "500"])
        .assert()
        .failure()
        .stderr(contains("Error:"));

    cli(home.path())
        .args(["month", "2024", "13"])
        .assert()
        .failure()
        .stderr(contains("Validation failed"));

    cli(home.path())
        .args(["add-budget", "Salary", "100"])
        .assert()
        .failure();
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = tempdir().unwrap();
    cli(home.path())
        .arg("dashbord")
        .assert()
        .failure()
        .stderr(contains("Unknown command `dashbord`"))
        .stdout(contains("Did you mean `dashboard`?"));
}

#[test]
fn script_mode_continues_after_errors() {
    let home = tempdir().unwrap();
    cli(home.path())
        .env("CASHVIEW_CLI_SCRIPT", "1")
        .write_stdin("add-budget Food 100\nadd-budget food 50\nlist-budgets\n")
        .assert()
        .success()
        .stderr(contains("already exists"))
        .stdout(contains("100.00 USD"));
}

#[test]
fn range_query_without_matches_is_not_found() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["transactions", "income", "2024-01-01", "2024-01-31"])
        .assert()
        .failure()
        .stderr(contains("No records found"));
}
