//! Table Property Tests
//!
//! Tests for primary record behavior on a real directory:
//! - Round-trip and overwrite
//! - Missing and corrupt records
//! - Reserved names and greenlight gates

use filetable::greenlight::{Denial, Verdict};
use filetable::naming::file_name;
use filetable::{Greenlight, Table, TableInfo};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn open_table(temp: &TempDir) -> Table {
    Table::open(TableInfo::new(temp.path().join("tickets"), "tickets")).unwrap()
}

// =============================================================================
// Round-trip Tests
// =============================================================================

/// A record reads back exactly as it was written.
#[test]
fn test_round_trip() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);

    let records = [
        json!({"status": "open", "tags": ["a", "b"], "n": 3}),
        json!([1, 2, 3]),
        json!("just a string"),
        json!(null),
    ];

    for (i, record) in records.iter().enumerate() {
        let key = json!(format!("key-{}", i));
        table.put(&key, record, &Greenlight::None).unwrap();
        assert_eq!(&table.get(&key, &Greenlight::None).unwrap(), record);
    }
}

/// A second put replaces the first.
#[test]
fn test_overwrite() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);
    let key = json!("a");

    table.put(&key, &json!({"v": 1}), &Greenlight::None).unwrap();
    table.put(&key, &json!({"v": 2}), &Greenlight::None).unwrap();

    assert_eq!(table.get(&key, &Greenlight::None).unwrap(), json!({"v": 2}));
    assert_eq!(table.get_all(&Greenlight::None).unwrap().len(), 1);
}

/// Records land in `<hex>.json` as two-space pretty JSON.
#[test]
fn test_on_disk_layout() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);
    let key = json!("a");

    table.put(&key, &json!({"status": "open"}), &Greenlight::None).unwrap();

    let path = temp.path().join("tickets").join(file_name(&key));
    let text = fs::read_to_string(path).unwrap();
    assert_eq!(text, "{\n  \"status\": \"open\"\n}");
}

// =============================================================================
// Failure Tests
// =============================================================================

/// Reading a key never written fails with NotFound.
#[test]
fn test_missing_key_is_not_found() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);

    let err = table.get(&json!("ghost"), &Greenlight::None).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.code(), "FILETABLE_NOT_FOUND");
}

/// A hand-damaged record fails with Corrupt, and so does a scan over it.
#[test]
fn test_corrupt_record() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);
    let key = json!("a");

    table.put(&key, &json!({"ok": true}), &Greenlight::None).unwrap();
    fs::write(table.record_path(&key), "{ not json").unwrap();

    assert!(table.get(&key, &Greenlight::None).unwrap_err().is_corrupt());
    assert!(table.get_all(&Greenlight::None).unwrap_err().is_corrupt());
}

/// Metadata files and subdirectories are not records.
#[test]
fn test_scan_skips_reserved_and_directories() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);

    table.put(&json!("a"), &json!(1), &Greenlight::None).unwrap();
    table.put(&json!("b"), &json!(2), &Greenlight::None).unwrap();

    let root = temp.path().join("tickets");
    fs::write(root.join("tableInfo.json"), "{\"name\": \"tickets\"}").unwrap();
    fs::write(root.join("indexes.json"), "garbage").unwrap();
    fs::create_dir(root.join("nested")).unwrap();

    let mut all: Vec<i64> = table
        .get_all(&Greenlight::None)
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    all.sort();
    assert_eq!(all, vec![1, 2]);
}

/// Scanning a table that was never written is empty, not an error.
#[test]
fn test_scan_of_new_table_is_empty() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);
    assert!(table.get_all(&Greenlight::None).unwrap().is_empty());
}

// =============================================================================
// Greenlight Tests
// =============================================================================

/// A denying gate on put keeps the file from being created.
#[test]
fn test_put_gate_prevents_write() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);
    let key = json!("a");

    let gate = Greenlight::single(|_| Verdict::deny("frozen"));
    let err = table.put(&key, &json!({"v": 1}), &gate).unwrap_err();

    assert_eq!(err.denial(), Some(&Denial::Single("frozen".into())));
    assert!(!table.record_path(&key).exists());
}

/// A denying gate on get withholds a record that exists.
#[test]
fn test_get_gate_withholds_value() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);
    let key = json!("a");
    table.put(&key, &json!({"owner": "ann"}), &Greenlight::None).unwrap();

    let gate = Greenlight::single(|ctx| match ctx.record {
        Some(record) if record["owner"] == "ann" => Verdict::deny("not yours"),
        _ => Verdict::allow(),
    });

    let err = table.get(&key, &gate).unwrap_err();
    assert_eq!(err.denial().unwrap().reasons(), vec!["not yours".to_string()]);
    assert!(table.record_path(&key).exists());
}

/// A sequence reports every denial, not just the first.
#[test]
fn test_sequence_gate_reports_all_reasons() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);

    let gate = Greenlight::sequence(vec![
        filetable::greenlight::evaluator(|_| Verdict::deny("one")),
        filetable::greenlight::evaluator(|_| Verdict::allow()),
        filetable::greenlight::evaluator(|_| Verdict::deny_silently()),
    ]);

    let err = table.put(&json!("k"), &json!({}), &gate).unwrap_err();
    assert_eq!(
        err.denial(),
        Some(&Denial::Many(vec![
            "one".into(),
            "DB operation failed for key k. No reason given".into(),
        ]))
    );
}

/// A composite gate's aggregator sees every result and the context.
#[test]
fn test_composite_gate_on_scan() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);
    table.put(&json!("a"), &json!({"v": 1}), &Greenlight::None).unwrap();

    let gate = Greenlight::composite(
        vec![
            filetable::greenlight::evaluator(|_| Verdict::allow()),
            filetable::greenlight::evaluator(|_| Verdict::deny("nope")),
        ],
        |results, ctx| {
            let rows = ctx.list.map_or(0, |l| l.len());
            if results.iter().all(|r| r.allow) || rows == 0 {
                filetable::greenlight::Decision::allow()
            } else {
                filetable::greenlight::Decision::deny(vec![format!("{} rows withheld", rows)])
            }
        },
    );

    match table.get_all(&gate).unwrap_err().denial() {
        Some(Denial::Composite { results, reasons }) => {
            assert_eq!(results.len(), 2);
            assert_eq!(reasons, &vec!["1 rows withheld".to_string()]);
        }
        other => panic!("expected composite denial, got {:?}", other),
    }
}

/// The put gate sees the exact text that would be written.
#[test]
fn test_put_gate_sees_record_string() {
    let temp = TempDir::new().unwrap();
    let table = open_table(&temp);

    let gate = Greenlight::single(|ctx| {
        let parsed: Value = serde_json::from_str(ctx.record_string).unwrap();
        if Some(&parsed) == ctx.record {
            Verdict::allow()
        } else {
            Verdict::deny("mismatch")
        }
    });

    table.put(&json!("a"), &json!({"x": [1, 2]}), &gate).unwrap();
}
