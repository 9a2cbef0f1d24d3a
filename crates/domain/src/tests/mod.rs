// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use dbrow_persistence::Persistence;

use crate::schema;

/// An in-memory database with the inventory schema applied.
pub fn inventory_store() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();
    schema::initialize(&mut persistence).unwrap();
    persistence
}
