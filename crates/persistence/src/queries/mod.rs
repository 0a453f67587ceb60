// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! Row structs are private to each module and converted into the public
//! types in `data_models` before leaving the crate.

pub mod accounting;
pub mod engagements;
pub mod messages;
pub mod principals;
pub mod public_events;

pub use accounting::{accounting_summary, bands_per_city, site_counts};
pub use engagements::{
    engagement_history, find_active_engagement, get_engagement, is_participant,
    list_engagements_for, list_open_slots,
};
pub use messages::message_history;
pub use principals::{get_principal_by_id, get_principal_by_username, verify_password};
pub use public_events::list_public_events;
