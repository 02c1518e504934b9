use assert_cmd::prelude::*;
use predicates::prelude::*;

use cli_helpers::{banks, base_cmd, run_cmd_json, setup_temp_home, write_config, SNAPSHOT};

fn amount(value: &serde_json::Value) -> f64 {
    value.as_f64().expect("amount should be a JSON number")
}

#[test]
fn table_lists_offers_without_ansi_when_no_color() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.arg("table").arg(SNAPSHOT);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Data updated on 30/04/2025"))
        .stdout(predicate::str::contains("CDB offers (5)"))
        .stdout(predicate::str::contains("Banco Alfa"))
        .stdout(predicate::str::contains("CDB Sem Banco").not())
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn table_json_derives_days_to_maturity_from_reference_date() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["table", SNAPSHOT]).unwrap();

    assert_eq!(json["reference_date"], "2025-04-30");
    let offers = &json["offers"];
    assert_eq!(
        banks(offers),
        vec!["Banco Alfa", "Banco Beta", "Banco Gama", "Banco Beta", "Banco Delta"]
    );
    assert_eq!(offers[0]["days_to_maturity"], 306);
    assert_eq!(offers[2]["days_to_maturity"], 168);
    assert_eq!(offers[4]["category"], "UNRECOGNIZED");
}

#[test]
fn maturity_preset_narrows_the_table() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["table", SNAPSHOT, "--maturity", "up-to-6m"]).unwrap();
    assert_eq!(banks(&json["offers"]), vec!["Banco Gama", "Banco Beta"]);

    let json = run_cmd_json(
        &home,
        &["table", SNAPSHOT, "--min-days", "300", "--max-days", "400"],
    )
    .unwrap();
    assert_eq!(banks(&json["offers"]), vec!["Banco Alfa", "Banco Delta"]);
}

#[test]
fn empty_filter_result_shows_friendly_message() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["table", SNAPSHOT, "--bank", "Banco Inexistente"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No offers match the current filters"));
}

#[test]
fn best_picks_highest_rate_per_category() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["best", SNAPSHOT]).unwrap();

    let cards = json.as_array().unwrap();
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[0]["category"], "POST_FIXED");
    assert_eq!(cards[0]["offer"]["bank"], "Banco Beta");
    assert_eq!(cards[1]["category"], "PRE_FIXED");
    assert_eq!(cards[1]["offer"]["bank"], "Banco Alfa");
    assert_eq!(cards[1]["offer"]["min_tax"], 14.25);
    assert_eq!(cards[2]["category"], "INFLATION_LINKED");
    assert_eq!(cards[2]["offer"]["bank"], "Banco Gama");
}

#[test]
fn excluding_a_bank_changes_the_best_offer() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["best", SNAPSHOT, "--exclude-bank", "Banco Alfa"]).unwrap();

    let cards = json.as_array().unwrap();
    assert_eq!(cards[1]["offer"]["product"], "CDB Beta Curto");
    assert_eq!(cards[1]["offer"]["min_tax"], 13.5);
}

#[test]
fn best_shows_missing_category_note() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["best", SNAPSHOT, "--indexer", "Prefixado"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Best CDBs of the day"))
        .stdout(predicate::str::contains("Banco Alfa"))
        .stdout(predicate::str::contains("March/2026"))
        .stdout(predicate::str::contains("No offer available for this category"));
}

#[test]
fn bank_inclusion_conflicts_with_exclusion() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args([
        "best",
        SNAPSHOT,
        "--bank",
        "Banco Alfa",
        "--exclude-bank",
        "Banco Beta",
    ]);

    cmd.assert().failure();
}

#[test]
fn averages_group_by_indexer_with_axis_ceiling() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["averages", SNAPSHOT]).unwrap();

    let rows = json["rows"].as_array().unwrap();
    let labels: Vec<&str> = rows.iter().map(|r| r["indexer"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["CDI+", "Inflação", "Prefixado", "Pós-fixado"]);
    assert_eq!(rows[2]["offers"], 2);
    assert_eq!(rows[2]["avg_return"], 13.875);
    assert_eq!(json["axis_max"], 120.0);
}

#[test]
fn simulate_projects_each_category() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["simulate", SNAPSHOT]).unwrap();

    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 3);

    let pre = &items[1]["result"];
    assert_eq!(pre["bank"], "Banco Alfa");
    assert_eq!(pre["calendar_days"], 306);
    assert_eq!(pre["business_days"], 218);
    assert_eq!(pre["tax_rate"], 0.2);

    let gross = amount(&pre["gross_return"]);
    let expected = 5000.0 * (1.1425f64.powf(218.0 / 252.0) - 1.0);
    assert!((gross - expected).abs() < 0.01, "gross = {}", gross);
    let net = amount(&pre["net_return"]);
    let tax = amount(&pre["tax_amount"]);
    assert!((gross - tax - net).abs() < 0.02);
    assert!((amount(&pre["final_value"]) - (5000.0 + net)).abs() < 0.02);

    assert_eq!(items[0]["result"]["tax_rate"], 0.175);
    assert_eq!(items[0]["result"]["business_days"], 438);
    assert_eq!(items[2]["result"]["tax_rate"], 0.225);
    assert_eq!(items[2]["result"]["business_days"], 120);
}

#[test]
fn simulate_out_of_range_amount_is_not_shown_as_zero() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["simulate", SNAPSHOT, "--amount", "1e308"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("R$ (out of range)"))
        .stdout(predicate::str::contains("R$ 0.00").not());

    let json = run_cmd_json(&home, &["simulate", SNAPSHOT, "--amount", "1e308"]).unwrap();
    let pre = &json[1]["result"];
    assert!(pre["invested_amount"].is_null());
    assert!(pre["final_value"].is_null());
}

#[test]
fn simulate_reports_empty_category_as_information() {
    let home = setup_temp_home();
    let json = run_cmd_json(
        &home,
        &["simulate", SNAPSHOT, "--exclude-bank", "Banco Gama", "--amount", "1000"],
    )
    .unwrap();

    let items = json.as_array().unwrap();
    assert_eq!(items[2]["error"]["kind"], "EMPTY_SELECTION");
    assert_eq!(items[2]["error"]["informational"], true);
    assert!(items[0]["result"].is_object());
}

#[test]
fn simulate_invalid_amount_prompts_instead_of_failing() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["simulate", SNAPSHOT, "--amount", "50"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("minimum investment is R$ 100.00"))
        .stdout(predicate::str::contains("Use --amount"))
        .stdout(predicate::str::contains("Investment simulator").not());
}

#[test]
fn simulate_negative_rate_prompts_in_json() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["simulate", SNAPSHOT, "--cdi", "-1"]).unwrap();

    assert_eq!(json["error"]["kind"], "INVALID_RATE");
}

#[test]
fn dashboard_renders_every_panel() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["dashboard", SNAPSHOT]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Best CDBs of the day"))
        .stdout(predicate::str::contains("Average return by indexer"))
        .stdout(predicate::str::contains("Investment simulator"))
        .stdout(predicate::str::contains("CDB offers (5)"));
}

#[test]
fn dashboard_json_keeps_view_when_amount_is_invalid() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["dashboard", SNAPSHOT, "--amount", "10"]).unwrap();

    assert_eq!(json["snapshot_date"], "2025-04-30");
    assert_eq!(json["offers"].as_array().unwrap().len(), 5);
    assert_eq!(json["simulations"]["error"]["kind"], "INVALID_AMOUNT");
}

#[test]
fn facets_list_distinct_values() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["facets", SNAPSHOT]).unwrap();

    assert_eq!(
        json["banks"],
        serde_json::json!(["Banco Alfa", "Banco Beta", "Banco Delta", "Banco Gama"])
    );
    assert_eq!(json["ratings"], serde_json::json!(["A", "AA", "AAA", "BBB"]));
}

#[test]
fn config_file_supplies_snapshot_and_limits() {
    let home = setup_temp_home();
    let snapshot = std::fs::canonicalize(SNAPSHOT).unwrap();
    let config = write_config(
        &home,
        &format!(
            "snapshot = {:?}\nmin_investment = 1000.0\n",
            snapshot.display().to_string()
        ),
    );

    let mut cmd = base_cmd(&home);
    cmd.arg("--config")
        .arg(&config)
        .args(["simulate", "--amount", "500"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("minimum investment is R$ 1000.00"));

    let mut cmd = base_cmd(&home);
    cmd.arg("--config").arg(&config).arg("table");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Banco Gama"));
}

#[test]
fn missing_snapshot_is_an_error() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.arg("table");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No snapshot given"));
}

#[test]
fn unreadable_snapshot_is_an_error() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["table", "tests/data/does_not_exist_01012025.csv"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read snapshot"));
}
