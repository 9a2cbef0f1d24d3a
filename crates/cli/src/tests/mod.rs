// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use clap::Parser;
use dbrow::Value;
use dbrow_domain::schema;
use dbrow_persistence::Persistence;
use serde_json::json;

use crate::commands::parse_value;
use crate::{Args, Command, Table};

fn run(persistence: &mut Persistence, argv: &[&str]) -> serde_json::Value {
    let args = Args::try_parse_from(std::iter::once("dbrow").chain(argv.iter().copied())).unwrap();
    args.command.run(persistence, &[]).unwrap()
}

fn store() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();
    schema::initialize(&mut persistence).unwrap();
    persistence
}

// ============================================================================
// Argument Parsing
// ============================================================================

#[test]
fn test_values_are_typed_narrowest_first() {
    assert_eq!(parse_value("null"), Value::Null);
    assert_eq!(parse_value("true"), Value::Bool(true));
    assert_eq!(parse_value("-12"), Value::Int(-12));
    assert_eq!(parse_value("0.5"), Value::Float(0.5));
    assert_eq!(parse_value("inf"), Value::from("inf"));
    assert_eq!(parse_value("3:4"), Value::from("3:4"));
}

#[test]
fn test_negative_delta_is_not_a_flag() {
    let args = Args::try_parse_from(["dbrow", "adjust", "unit", "4", "quantity", "-3"]).unwrap();

    match args.command {
        Command::Adjust {
            table, id, delta, ..
        } => {
            assert_eq!(table, Table::Unit);
            assert_eq!(id, 4);
            assert_eq!(delta, "-3");
        }
        other => panic!("unexpected command {other:?}"),
    }
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_init_lists_applied_migrations() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let applied = schema::initialize(&mut persistence).unwrap();

    let output = Command::Init.run(&mut persistence, &applied).unwrap();

    assert_eq!(output, json!({ "applied": applied }));
    assert_eq!(applied.len(), 1);
}

#[test]
fn test_add_unit_to_fleet_and_show() {
    let mut persistence = store();
    let fleet = run(&mut persistence, &["add-fleet", "north", "--code", "n1"]);
    assert_eq!(fleet["code"], json!("N1"));

    let unit = run(
        &mut persistence,
        &[
            "add-unit", "bolts", "-n", "12", "-k", "crate", "-w", "1.5", "-l", "2:7", "-f", "1",
        ],
    );

    assert_eq!(unit["id"], json!(1));
    assert_eq!(unit["fleet"], json!(1));
    assert_eq!(unit["kind"], json!(1));
    assert_eq!(unit["weight"], json!(1.5));
    assert_eq!(unit["location"], json!("2:7"));
    assert_eq!(unit["label"], json!("bolts x12 @ 2:7"));
    assert_eq!(run(&mut persistence, &["show", "unit", "1"]), unit);
}

#[test]
fn test_adjust_prints_stored_result() {
    let mut persistence = store();
    run(&mut persistence, &["add-unit", "nuts", "-n", "10"]);

    let unit = run(&mut persistence, &["adjust", "unit", "1", "quantity", "-4"]);

    assert_eq!(unit["quantity"], json!(6));
}

#[test]
fn test_set_label_renames_stored_unit() {
    let mut persistence = store();
    run(&mut persistence, &["add-unit", "studs", "-n", "4"]);

    let unit = run(&mut persistence, &["set", "unit", "1", "label", "anchors"]);

    assert_eq!(unit["name"], json!("anchors"));
    assert_eq!(run(&mut persistence, &["show", "unit", "1"])["name"], json!("anchors"));
}

#[test]
fn test_set_to_empty_deletes_row() {
    let mut persistence = store();
    run(&mut persistence, &["add-unit", "pins", "-n", "2"]);

    let output = run(&mut persistence, &["set", "unit", "1", "quantity", "0"]);

    assert_eq!(output, json!({ "id": 1, "deleted": true }));
    let args = Args::try_parse_from(["dbrow", "show", "unit", "1"]).unwrap();
    assert!(args.command.run(&mut persistence, &[]).is_err());
}

#[test]
fn test_remove_deletes_fleet() {
    let mut persistence = store();
    run(&mut persistence, &["add-fleet", "south"]);

    let output = run(&mut persistence, &["rm", "fleet", "1"]);

    assert_eq!(output, json!({ "id": 1, "deleted": true }));
}

#[test]
fn test_unknown_property_fails_without_writing() {
    let mut persistence = store();
    run(&mut persistence, &["add-unit", "rivets", "-n", "3"]);
    let args = Args::try_parse_from(["dbrow", "set", "unit", "1", "colour", "red"]).unwrap();

    let result = args.command.run(&mut persistence, &[]);

    assert!(result.is_err());
    assert_eq!(run(&mut persistence, &["show", "unit", "1"])["quantity"], json!(3));
}
