//! Integration tests for the `poflow` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("poflow").unwrap()
}

fn grid(grand_total: &str) -> Value {
    json!([
        ["PURCHASE ORDER"],
        ["PO#", "FKPO4242", null, "PO Expiry", "15-02-24"],
        ["ORDER DATE", "05-01-24"],
        ["SUPPLIER NAME", "Acme Foods Pvt Ltd"],
        ["SHIPPED TO ADDRESS", "FC Bhiwandi, Thane, Maharashtra 421302"],
        ["ORDER DETAILS"],
        ["S.No", "FSN/ISBN13", "Title", "Quantity", "Total Amount", "SGST/UTGST Rate", "CGST Rate"],
        [1, "RICE 0001", "Basmati Rice 1kg", 2, "200.00", "2.5%", "2.5%"],
        [2, "DAL 0002", "Toor Dal 1kg", 3, "450.015", "2.5%", "2.5%"],
        [null, null, null, null, grand_total],
        ["Important Notification", "Total Quantity=", 5, "Total=", grand_total]
    ])
}

fn lookups() -> Value {
    json!({
        "statuses": [{"id": 10, "name": "New orders"}],
        "sources": [{"id": "200", "name": "FLIPKART GROCERY"}],
        "extra_fields": [
            {"extra_field_id": 77, "name": "PO Number"},
            {"extra_field_id": 78, "name": "PO Expiry"},
            {"extra_field_id": 79, "name": "Sender Mail"}
        ],
        "existing_orders": [
            {"order_id": 9001, "custom_extra_fields": {"77": "FKPO0001"}}
        ]
    })
}

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

#[test]
fn process_outputs_order_json() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "po.json", &grid("INR 650.03"));
    let lookups = write_json(dir.path(), "lookups.json", &lookups());

    let output = cmd()
        .arg("process")
        .arg(&input)
        .arg("--lookups")
        .arg(&lookups)
        .arg("--sender")
        .arg("po@example.com")
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["order"]["order_status_id"], json!(10));
    assert_eq!(value["order"]["custom_source_id"], json!("200"));
    assert_eq!(value["order"]["date_add"], json!(1_704_412_800));
    assert_eq!(value["order"]["payment_method_cod"], json!("1"));
    assert_eq!(value["order"]["paid"], json!("0"));
    assert_eq!(value["order"]["delivery_state"], json!("Maharashtra"));
    assert_eq!(value["order"]["products"].as_array().unwrap().len(), 2);
    assert_eq!(value["order"]["products"][1]["ean"], json!("DAL0002"));
    assert_eq!(value["order"]["custom_extra_fields"]["77"], json!("FKPO4242"));
    assert_eq!(value["order"]["custom_extra_fields"]["79"], json!("po@example.com"));
    assert_eq!(value["po_number"], json!("FKPO4242"));
}

#[test]
fn process_reads_xls_workbook() {
    let dir = TempDir::new().unwrap();
    let input = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures/purchase_order.xls");
    let lookups = write_json(dir.path(), "lookups.json", &lookups());

    let output = cmd()
        .arg("process")
        .arg(&input)
        .arg("--lookups")
        .arg(&lookups)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["po_number"], json!("FKPO4242"));
    assert_eq!(value["order"]["products"][0]["ean"], json!("RICE0001"));
    assert_eq!(value["order"]["products"][1]["quantity"], json!(3));
    assert_eq!(value["order"]["delivery_postcode"], json!("421302"));
}

#[test]
fn process_reconciliation_failure_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "po.json", &grid("INR 700.00"));
    let lookups = write_json(dir.path(), "lookups.json", &lookups());

    cmd()
        .arg("process")
        .arg(&input)
        .arg("--lookups")
        .arg(&lookups)
        .arg("--checklist")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match stated total"))
        .stderr(predicate::str::contains("[ ] Build order"));
}

#[test]
fn process_csv_lists_products() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "po.json", &grid("INR 650"));
    let lookups = write_json(dir.path(), "lookups.json", &lookups());

    cmd()
        .arg("process")
        .arg(&input)
        .arg("--lookups")
        .arg(&lookups)
        .arg("--format")
        .arg("csv")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "ean,name,quantity,price_brutto,tax_rate,line_total",
        ))
        .stdout(predicate::str::contains("DAL0002,Toor Dal 1kg,3,150.01,5.0,450.03"));
}

#[test]
fn process_reports_duplicate_po() {
    let dir = TempDir::new().unwrap();
    let mut po = grid("INR 650.03");
    po[1][1] = json!("FKPO0001");
    let input = write_json(dir.path(), "po.json", &po);
    let lookups = write_json(dir.path(), "lookups.json", &lookups());

    cmd()
        .arg("process")
        .arg(&input)
        .arg("--lookups")
        .arg(&lookups)
        .assert()
        .success()
        .stderr(predicate::str::contains("PO FKPO0001 already exists as order 9001"));
}

#[test]
fn process_rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("po.pdf");
    fs::write(&input, b"%PDF").unwrap();
    let lookups = write_json(dir.path(), "lookups.json", &lookups());

    cmd()
        .arg("process")
        .arg(&input)
        .arg("--lookups")
        .arg(&lookups)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format: pdf"));
}

#[test]
fn batch_continues_on_error_and_writes_summary() {
    let dir = TempDir::new().unwrap();
    let inbox = dir.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    write_json(&inbox, "good.json", &grid("INR 650.03"));
    write_json(&inbox, "bad.json", &grid("INR 10"));
    let lookups = write_json(dir.path(), "lookups.json", &lookups());
    let out = dir.path().join("out");

    cmd()
        .arg("batch")
        .arg(format!("{}/*.json", inbox.display()))
        .arg("--lookups")
        .arg(&lookups)
        .arg("--output-dir")
        .arg(&out)
        .arg("--summary")
        .arg("--continue-on-error")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    assert!(out.join("good.json").exists());
    assert!(!out.join("bad.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("good.json,success,FKPO4242,2,5,650.03,INR"));
    assert!(summary.contains("bad.json,error"));
    assert!(summary.contains("Build order"));
}

#[test]
fn batch_stops_on_first_error_by_default() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "a.json", &grid("INR 10"));
    let lookups = write_json(dir.path(), "lookups.txt", &lookups());

    cmd()
        .arg("batch")
        .arg(format!("{}/*.json", dir.path().display()))
        .arg("--lookups")
        .arg(&lookups)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn config_init_get_set_roundtrip() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("poflow.json");

    cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "lookups.sender_email", "orders@example.com"])
        .assert()
        .success();

    cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "lookups.sender_email"])
        .assert()
        .success()
        .stdout(predicate::str::contains("orders@example.com"));

    cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "lookups.no_such_key", "1"])
        .assert()
        .failure();
}
