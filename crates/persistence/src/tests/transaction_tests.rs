// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transaction wrapper and transaction oracle tests.

use dbrow::{Entity, RowError, RowStore, Saveable};

use super::{Counter, counter_store, insert_counter, load_counter};
use crate::PersistenceError;

#[test]
fn test_transaction_oracle_follows_wrapper() {
    let mut persistence = counter_store();

    assert!(!persistence.is_transaction_open());
    let inside = persistence
        .transaction(|p| Ok::<_, PersistenceError>(p.is_transaction_open()))
        .unwrap();

    assert!(inside);
    assert!(!persistence.is_transaction_open());
}

#[test]
fn test_nested_transactions_track_depth() {
    let mut persistence = counter_store();

    let depths = persistence
        .transaction(|outer| {
            let outer_depth = outer.transaction_depth();
            let inner_depth =
                outer.transaction(|inner| Ok::<_, PersistenceError>(inner.transaction_depth()))?;
            Ok::<_, PersistenceError>((outer_depth, inner_depth, outer.transaction_depth()))
        })
        .unwrap();

    assert_eq!(depths, (1, 2, 1));
    assert_eq!(persistence.transaction_depth(), 0);
}

#[test]
fn test_failed_closure_rolls_back_writes() {
    let mut persistence = counter_store();

    let result: Result<(), RowError> = persistence.transaction(|p| {
        let mut counter = Counter::default();
        counter.set("total", 3)?;
        counter.save(p)?;
        Err(RowError::PropertyNotFound {
            table: Counter::TABLE,
            property: String::from("abort"),
        })
    });

    assert!(result.is_err());
    assert!(load_counter(&mut persistence, 1).is_none());
}

#[test]
fn test_committed_writes_are_visible_after_transaction() {
    let mut persistence = counter_store();
    let id = insert_counter(&mut persistence, "base", 1);

    persistence
        .transaction(|p| {
            let mut counter = load_counter(p, id).expect("row exists");
            counter.adjust("total", 4)?;
            counter.save(p)
        })
        .unwrap();

    assert_eq!(load_counter(&mut persistence, id).unwrap().total, 5);
}
