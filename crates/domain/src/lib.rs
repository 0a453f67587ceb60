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

mod engagement_status;
mod error;
mod slot_time;
mod types;

#[cfg(test)]
mod tests;

pub use engagement_status::{Decision, EngagementStatus};
pub use error::DomainError;
pub use slot_time::SlotTime;
pub use types::{
    Coordinates, EventCategory, EventDetails, MAX_TEXT_LEN, MessageBody, PrincipalKind, Role,
    Username, validate_city, validate_display_name, validate_ticket_price,
};
