// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Turn-taking for connections to one shared-cache in-memory database.
//!
//! Shared-cache connections report a competing writer as `SQLITE_LOCKED`,
//! which the busy timeout does not cover. Connections to the same
//! in-memory database therefore run their operations one at a time
//! behind a process-wide mutex keyed by database URL. File databases get
//! no gate and rely on the busy timeout.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError, Weak};

/// Serializes every operation on one in-memory database.
pub type Gate = Arc<Mutex<()>>;

/// Live gates by database URL. Entries die with the last connection.
static GATES: LazyLock<Mutex<HashMap<String, Weak<Mutex<()>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Returns true if `database_url` names a shared-cache in-memory database.
#[must_use]
pub fn is_shared_memory(database_url: &str) -> bool {
    database_url.contains("mode=memory") && database_url.contains("cache=shared")
}

/// Returns the gate for `database_url`, or `None` for file databases.
///
/// Every connection to the same in-memory database receives the same gate.
#[must_use]
pub fn gate_for(database_url: &str) -> Option<Gate> {
    if !is_shared_memory(database_url) {
        return None;
    }

    // The map holds no invariant a panicking holder could break.
    let mut gates = GATES.lock().unwrap_or_else(PoisonError::into_inner);
    gates.retain(|_, gate| gate.strong_count() > 0);

    if let Some(gate) = gates.get(database_url).and_then(Weak::upgrade) {
        return Some(gate);
    }

    let gate: Gate = Arc::new(Mutex::new(()));
    gates.insert(database_url.to_string(), Arc::downgrade(&gate));
    Some(gate)
}

/// Waits for this connection's turn. The turn ends when the guard drops.
#[must_use]
pub fn enter(gate: Option<&Gate>) -> Option<MutexGuard<'_, ()>> {
    gate.map(|gate| gate.lock().unwrap_or_else(PoisonError::into_inner))
}
