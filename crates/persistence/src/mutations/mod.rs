// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `principals`: Principal registration
//! - `engagements`: Slot creation, claims, removals, status transitions
//! - `messages`: Message log appends
//! - `public_events`: Public event announcements
//!
//! ## Conditional Writes
//!
//! Every engagement write states its precondition in the `WHERE` clause of
//! the statement that performs it. The number of affected rows is the only
//! signal of whether the precondition held; no row is read and then
//! written in a separate step. History rows are written in the same
//! `IMMEDIATE` transaction as the change they record.

pub mod engagements;
pub mod messages;
pub mod principals;
pub mod public_events;

pub use engagements::{apply_transition, claim_open_slot, delete_open_slot, insert_open_slot};
pub use messages::append_message;
pub use principals::create_principal;
pub use public_events::insert_public_event;
