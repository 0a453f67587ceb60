// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use bandbook_persistence::{EngagementData, HistoryData, MessageData, PublicEventData};
use serde::{Deserialize, Serialize};

use crate::auth::Credentials;

/// API request to register a band or user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterPrincipalRequest {
    /// `band` or `user`.
    pub kind: String,
    /// The login name.
    pub username: String,
    /// The name shown to other parties.
    pub display_name: String,
    /// The chosen password.
    pub password: String,
    /// The password, repeated.
    pub password_confirmation: String,
    /// Home city. Required for bands.
    pub city: Option<String>,
}

/// API response for a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPrincipalResponse {
    /// The new principal id.
    pub principal_id: i64,
    /// The account kind.
    pub kind: String,
    /// The login name.
    pub username: String,
    /// The display name.
    pub display_name: String,
    /// The home city, if given.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub city: Option<String>,
    /// A success message.
    pub message: String,
}

/// API request to seed an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAdminRequest {
    /// The login name.
    pub username: String,
    /// The name shown in logs.
    pub display_name: String,
    /// The password.
    pub password: String,
}

/// API response for an admin seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAdminResponse {
    /// The admin's principal id.
    pub principal_id: i64,
    /// The login name.
    pub username: String,
    /// False if the admin already existed.
    pub created: bool,
}

/// API request for a band to publish availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSlotRequest {
    /// The band's credentials.
    pub credentials: Credentials,
    /// The slot date/time.
    pub datetime: String,
}

/// API request for a user to claim a band's slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSlotRequest {
    /// The user's credentials.
    pub credentials: Credentials,
    /// The band's username.
    pub band: String,
    /// The slot date/time.
    pub datetime: String,
    /// The event category.
    pub category: String,
    /// Free-text description of the event.
    pub description: String,
    /// The venue city.
    pub city: String,
    /// The venue street address.
    pub address: String,
}

/// API request for a band to announce a public event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePublicEventRequest {
    /// The band's credentials.
    pub credentials: Credentials,
    /// The event date/time.
    pub datetime: String,
    /// The event category.
    pub category: String,
    /// Free-text description of the event.
    pub description: String,
    /// Price per ticket.
    pub ticket_price: i64,
    /// The venue city.
    pub city: String,
    /// The venue street address.
    pub address: String,
}

/// API response for an announced public event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePublicEventResponse {
    /// Always true; failures are reported as errors.
    pub success: bool,
    /// A human-readable outcome.
    pub message: String,
    /// The new public event.
    pub public_event_id: i64,
}

/// API request for a band's verdict on a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecideRequest {
    /// The band's credentials.
    pub credentials: Credentials,
    /// `confirmed` or `rejected`.
    pub decision: String,
}

/// API request to complete or cancel an engagement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementActionRequest {
    /// `admin` or `band`.
    pub kind: String,
    /// The caller's credentials.
    pub credentials: Credentials,
}

/// API request identifying the caller as one side of an engagement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRequest {
    /// `band` or `user`.
    pub role: String,
    /// The caller's credentials.
    pub credentials: Credentials,
}

/// API request to post a message on an engagement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    /// `band` or `user`.
    pub role: String,
    /// The sender's credentials.
    pub credentials: Credentials,
    /// The message text.
    pub body: String,
}

/// Outcome of a state-changing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Always true; failures are reported as errors.
    pub success: bool,
    /// A human-readable outcome.
    pub message: String,
    /// The engagement the call created or acted on.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub engagement_id: Option<i64>,
}

impl WriteResponse {
    pub(crate) fn ok(message: String, engagement_id: Option<i64>) -> Self {
        Self {
            success: true,
            message,
            engagement_id,
        }
    }
}

/// A single open slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInfo {
    /// The engagement id to request against.
    pub engagement_id: i64,
    /// The canonical slot date/time.
    pub datetime: String,
}

/// API response listing a band's availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// The band's username.
    pub band: String,
    /// The band's display name.
    pub display_name: String,
    /// Open future slots, earliest first.
    pub slots: Vec<SlotInfo>,
}

/// Full view of an engagement for its parties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementInfo {
    pub engagement_id: i64,
    pub band_id: i64,
    pub user_id: Option<i64>,
    pub datetime: String,
    pub status: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<EngagementData> for EngagementInfo {
    fn from(data: EngagementData) -> Self {
        Self {
            engagement_id: data.engagement_id,
            band_id: data.band_id,
            user_id: data.user_id,
            datetime: data.event_datetime,
            status: data.status,
            category: data.category,
            description: data.description,
            city: data.city,
            address: data.address,
            latitude: data.latitude,
            longitude: data.longitude,
            price: data.price,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }
}

/// API response listing the caller's engagements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEngagementsResponse {
    /// The engagements, earliest slot first.
    pub engagements: Vec<EngagementInfo>,
}

/// One recorded status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryInfo {
    pub previous_status: Option<String>,
    pub new_status: String,
    pub actor: String,
    pub transitioned_at: String,
}

impl From<HistoryData> for HistoryEntryInfo {
    fn from(data: HistoryData) -> Self {
        Self {
            previous_status: data.previous_status,
            new_status: data.new_status,
            actor: data.actor,
            transitioned_at: data.transitioned_at,
        }
    }
}

/// API response with an engagement's transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementHistoryResponse {
    /// The engagement.
    pub engagement_id: i64,
    /// Status changes, oldest first.
    pub entries: Vec<HistoryEntryInfo>,
}

/// One message on an engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInfo {
    pub message_id: i64,
    pub sender_role: String,
    pub sender: String,
    pub body: String,
    pub sent_at: String,
}

impl From<MessageData> for MessageInfo {
    fn from(data: MessageData) -> Self {
        Self {
            message_id: data.message_id,
            sender_role: data.sender_role,
            sender: data.sender,
            body: data.body,
            sent_at: data.sent_at,
        }
    }
}

/// API response with an engagement's messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHistoryResponse {
    /// The engagement.
    pub engagement_id: i64,
    /// Messages, oldest first.
    pub messages: Vec<MessageInfo>,
}

/// A count for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// A count for one event category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// API response with the administrator accounting summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingSummaryResponse {
    /// Engagements per status.
    pub status_counts: Vec<StatusCount>,
    /// Requested engagements per category.
    pub category_counts: Vec<CategoryCount>,
    /// Total price of completed engagements.
    pub completed_revenue: i64,
}

/// A public event as anyone may see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicEventInfo {
    pub public_event_id: i64,
    pub band: String,
    pub band_display_name: String,
    pub datetime: String,
    pub category: String,
    pub description: String,
    pub ticket_price: i64,
    pub city: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<PublicEventData> for PublicEventInfo {
    fn from(data: PublicEventData) -> Self {
        Self {
            public_event_id: data.public_event_id,
            band: data.band_username,
            band_display_name: data.band_display_name,
            datetime: data.event_datetime,
            category: data.category,
            description: data.description,
            ticket_price: data.ticket_price,
            city: data.city,
            address: data.address,
            latitude: data.latitude,
            longitude: data.longitude,
        }
    }
}

/// API response listing upcoming public events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicEventsResponse {
    /// Future events, earliest first.
    pub events: Vec<PublicEventInfo>,
}

/// Bands registered in one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCount {
    pub city: String,
    pub bands: i64,
}

/// API response with head counts for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteStatisticsResponse {
    /// Registered bands.
    pub bands: i64,
    /// Registered users.
    pub users: i64,
    /// Engagements in any status.
    pub engagements: i64,
    /// Announced public events, past and future.
    pub public_events: i64,
    /// Bands per home city, most populous first.
    pub bands_per_city: Vec<CityCount>,
}
