// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Booking workflow rules.
//!
//! This crate is pure: it decides what a command means for an engagement
//! and how a failed conditional write should be reported, while the
//! persistence layer performs the writes.

mod apply;
mod command;
mod error;
mod pricing;
mod state;

#[cfg(test)]
mod tests;

pub use apply::{classify_miss, plan_transition};
pub use command::Command;
pub use error::CoreError;
pub use pricing::{BAPTISM_PRICE, DEFAULT_PRICE, PARTY_PRICE, WEDDING_PRICE, price_for_category};
pub use state::{EngagementSnapshot, Transition, TransitionPlan};
