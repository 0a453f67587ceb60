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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

//! The booking API.
//!
//! Handlers here are transport-agnostic: they take a `Persistence`
//! connection and plain request structs, resolve credentials, enforce
//! authorization and translate every lower-layer error into an
//! [`ApiError`]. The HTTP server maps those onto status codes.

mod auth;
mod error;
mod geocode;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    Credentials, Principal, authenticate, authorize, authorize_principal, is_participant,
    resolve_credentials,
};
pub use error::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};
pub use geocode::{GeocodeError, Geocoder, NoopGeocoder};
pub use handlers::{
    accounting_summary, cancel, close_slot, complete, create_admin, create_public_event, decide,
    engagement_history, list_band_availability, list_my_engagements, list_public_events,
    message_history, open_slot, register_principal, request_slot, send_message, site_statistics,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AccountingSummaryResponse, AvailabilityResponse, CategoryCount, CityCount, CreateAdminRequest,
    CreateAdminResponse, CreatePublicEventRequest, CreatePublicEventResponse, DecideRequest,
    EngagementActionRequest, EngagementHistoryResponse, EngagementInfo, HistoryEntryInfo,
    ListEngagementsResponse, MessageHistoryResponse, MessageInfo, OpenSlotRequest,
    ParticipantRequest, PublicEventInfo, PublicEventsResponse, RegisterPrincipalRequest,
    RegisterPrincipalResponse, RequestSlotRequest, SendMessageRequest, SiteStatisticsResponse,
    SlotInfo, StatusCount, WriteResponse,
};
