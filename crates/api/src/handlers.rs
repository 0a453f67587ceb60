// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for the booking lifecycle and its supporting reads.
//!
//! Every engagement write follows the same shape:
//!
//! 1. Resolve the caller's credentials
//! 2. Load the engagement and check the caller is the right party
//! 3. Plan the transition from the status just read
//! 4. Perform one conditional write
//! 5. If the write matched nothing, re-read and classify what happened

use std::str::FromStr;

use bandbook::{
    Command, CoreError, EngagementSnapshot, TransitionPlan, classify_miss, plan_transition,
    price_for_category,
};
use bandbook_domain::{
    Coordinates, Decision, EngagementStatus, EventDetails, MessageBody, PrincipalKind, Role,
    SlotTime, Username, validate_city, validate_display_name, validate_ticket_price,
};
use bandbook_persistence::{
    AccountingData, EngagementData, NewPublicEvent, Persistence, PersistenceError, PrincipalData,
    SiteCounts, SlotClaim,
};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::{Credentials, Principal, authenticate, authorize_principal, is_participant};
use crate::error::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};
use crate::geocode::Geocoder;
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AccountingSummaryResponse, AvailabilityResponse, CategoryCount, CityCount, CreateAdminRequest,
    CreateAdminResponse, CreatePublicEventRequest, CreatePublicEventResponse, DecideRequest,
    EngagementActionRequest, EngagementHistoryResponse, EngagementInfo, ListEngagementsResponse,
    MessageHistoryResponse, OpenSlotRequest, ParticipantRequest, PublicEventInfo,
    PublicEventsResponse, RegisterPrincipalRequest, RegisterPrincipalResponse, RequestSlotRequest,
    SendMessageRequest, SiteStatisticsResponse, SlotInfo, StatusCount, WriteResponse,
};

fn parse_role(value: &str) -> Result<Role, ApiError> {
    Role::from_str(value).map_err(translate_domain_error)
}

fn load_engagement(
    persistence: &mut Persistence,
    command: &Command,
    engagement_id: i64,
) -> Result<EngagementSnapshot, ApiError> {
    let data: Option<EngagementData> = persistence
        .get_engagement(engagement_id)
        .map_err(translate_persistence_error)?;

    match data {
        Some(data) => data.snapshot().map_err(translate_persistence_error),
        None => Err(miss_error(command, None)),
    }
}

fn current_status(
    persistence: &mut Persistence,
    engagement_id: i64,
) -> Result<Option<EngagementStatus>, ApiError> {
    persistence
        .get_engagement(engagement_id)
        .map_err(translate_persistence_error)?
        .map(|data| data.engagement_status())
        .transpose()
        .map_err(translate_persistence_error)
}

fn active_status(
    persistence: &mut Persistence,
    band_id: i64,
    slot: &SlotTime,
) -> Result<Option<EngagementStatus>, ApiError> {
    persistence
        .find_active_engagement(band_id, slot)
        .map_err(translate_persistence_error)?
        .map(|data| data.engagement_status())
        .transpose()
        .map_err(translate_persistence_error)
}

/// Turns a missed create or claim into an error.
///
/// For slot-keyed commands `classify_miss` only ever reports an error.
fn miss_error(command: &Command, observed: Option<EngagementStatus>) -> ApiError {
    match classify_miss(command, observed) {
        Err(err) => translate_core_error(err),
        Ok(plan) => ApiError::Internal {
            message: format!("Unexpected plan {plan:?} for {}", command.name()),
        },
    }
}

/// Best-effort lookup of a venue; a failed lookup yields no coordinates.
fn locate(geocoder: &dyn Geocoder, details: &EventDetails) -> Option<Coordinates> {
    match geocoder.geocode(&details.geocode_query()) {
        Ok(found) => found,
        Err(e) => {
            warn!(error = %e, city = %details.city, "Geocoding failed; continuing without coordinates");
            None
        }
    }
}

fn noop_response(engagement_id: i64, status: EngagementStatus) -> WriteResponse {
    WriteResponse::ok(
        format!("Engagement {engagement_id} is already {status}"),
        Some(engagement_id),
    )
}

/// Applies a planned change to one engagement with a conditional write.
///
/// When the write matches no row the engagement is re-read and the miss
/// classified, so a racing writer surfaces as not-found, conflict or
/// invalid-state rather than as success.
fn execute_plan(
    persistence: &mut Persistence,
    command: &Command,
    engagement_id: i64,
    plan: TransitionPlan,
    actor: &str,
) -> Result<WriteResponse, ApiError> {
    let (affected, success_message): (usize, String) = match plan {
        TransitionPlan::NoOp { status } => return Ok(noop_response(engagement_id, status)),
        TransitionPlan::Remove => (
            persistence
                .delete_open_slot(engagement_id, actor)
                .map_err(translate_persistence_error)?,
            format!("Slot {engagement_id} closed"),
        ),
        TransitionPlan::Apply(transition) => (
            persistence
                .apply_transition(engagement_id, &transition, actor)
                .map_err(translate_persistence_error)?,
            format!("Engagement {engagement_id} is now {}", transition.to),
        ),
    };

    if affected > 0 {
        return Ok(WriteResponse::ok(success_message, Some(engagement_id)));
    }

    let observed: Option<EngagementStatus> = current_status(persistence, engagement_id)?;
    match classify_miss(command, observed).map_err(translate_core_error)? {
        TransitionPlan::NoOp { status } => Ok(noop_response(engagement_id, status)),
        plan => Err(ApiError::Internal {
            message: format!("Unexpected plan {plan:?} after a missed {}", command.name()),
        }),
    }
}

fn forbidden(command: &Command) -> ApiError {
    translate_core_error(CoreError::Forbidden {
        action: command.name(),
    })
}

// ========================================================================
// Principals
// ========================================================================

/// Registers a band or user.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The registration request
///
/// # Errors
///
/// Returns an error if:
/// - The kind is not `band` or `user`
/// - The username or display name is malformed
/// - A band gives no home city, or the city is too long
/// - The password breaks the password policy
/// - The username is already registered for this kind
pub fn register_principal(
    persistence: &mut Persistence,
    request: &RegisterPrincipalRequest,
) -> Result<RegisterPrincipalResponse, ApiError> {
    let kind: PrincipalKind = parse_role(&request.kind)?.principal_kind();
    let username: Username = Username::new(&request.username).map_err(translate_domain_error)?;
    let display_name: String =
        validate_display_name(&request.display_name).map_err(translate_domain_error)?;

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        &request.password,
        &request.password_confirmation,
        username.value(),
        &display_name,
    )?;

    let city: Option<String> = match request.city.as_deref() {
        Some(city) if !city.trim().is_empty() => {
            Some(validate_city(city).map_err(translate_domain_error)?)
        }
        _ if kind == PrincipalKind::Band => {
            return Err(ApiError::InvalidInput {
                field: String::from("city"),
                message: String::from("A band must give its home city"),
            });
        }
        _ => None,
    };

    let principal_id: i64 = persistence
        .create_principal(
            kind,
            username.value(),
            &display_name,
            &request.password,
            city.as_deref(),
        )
        .map_err(|e| match e {
            PersistenceError::UniqueViolation(_) => ApiError::Conflict {
                message: format!("The {kind} username '{username}' is already taken"),
            },
            other => translate_persistence_error(other),
        })?;

    info!(principal_id, kind = kind.as_str(), username = %username, "Registered principal");

    Ok(RegisterPrincipalResponse {
        principal_id,
        kind: kind.as_str().to_string(),
        username: username.value().to_string(),
        display_name: display_name.clone(),
        city,
        message: format!("Registered {kind} '{display_name}'"),
    })
}

/// Creates an administrator if one with this username does not exist yet.
///
/// Used to seed the first admin at server start.
///
/// # Errors
///
/// Returns an error if the username is malformed, the password breaks the
/// policy, or the database operation fails.
pub fn create_admin(
    persistence: &mut Persistence,
    request: &CreateAdminRequest,
) -> Result<CreateAdminResponse, ApiError> {
    let username: Username = Username::new(&request.username).map_err(translate_domain_error)?;

    let existing: Option<PrincipalData> = persistence
        .get_principal_by_username(PrincipalKind::Admin, username.value())
        .map_err(translate_persistence_error)?;

    if let Some(existing) = existing {
        return Ok(CreateAdminResponse {
            principal_id: existing.principal_id,
            username: existing.username,
            created: false,
        });
    }

    let display_name: String =
        validate_display_name(&request.display_name).map_err(translate_domain_error)?;

    let policy: PasswordPolicy = PasswordPolicy::default();
    policy.validate(
        &request.password,
        &request.password,
        username.value(),
        &display_name,
    )?;

    let principal_id: i64 = persistence
        .create_principal(
            PrincipalKind::Admin,
            username.value(),
            &display_name,
            &request.password,
            None,
        )
        .map_err(translate_persistence_error)?;

    info!(principal_id, username = %username, "Created admin");

    Ok(CreateAdminResponse {
        principal_id,
        username: username.value().to_string(),
        created: true,
    })
}

// ========================================================================
// Availability Manager
// ========================================================================

/// Publishes an open slot for the calling band.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The band's credentials and the slot date/time
///
/// # Returns
///
/// * `Ok(WriteResponse)` carrying the new engagement id
///
/// # Errors
///
/// Returns an error if:
/// - The band's credentials do not resolve
/// - The date/time is malformed or not strictly in the future
/// - The band already has an active engagement at that instant
pub fn open_slot(
    persistence: &mut Persistence,
    request: &OpenSlotRequest,
) -> Result<WriteResponse, ApiError> {
    let band: Principal = authenticate(persistence, PrincipalKind::Band, &request.credentials)?;

    let slot: SlotTime = SlotTime::parse(&request.datetime).map_err(translate_domain_error)?;
    slot.ensure_future(OffsetDateTime::now_utc())
        .map_err(translate_domain_error)?;

    let command: Command = Command::OpenSlot {
        band_id: band.principal_id,
        slot,
    };

    match persistence.insert_open_slot(band.principal_id, &slot, &band.actor_label()) {
        Ok(engagement_id) => Ok(WriteResponse::ok(
            format!("Slot opened for {slot}"),
            Some(engagement_id),
        )),
        Err(PersistenceError::UniqueViolation(_)) => {
            let observed: Option<EngagementStatus> =
                active_status(persistence, band.principal_id, &slot)?;
            Err(miss_error(&command, observed))
        }
        Err(e) => Err(translate_persistence_error(e)),
    }
}

/// Withdraws one of the calling band's slots that nobody has claimed.
///
/// # Errors
///
/// Returns an error if:
/// - The band's credentials do not resolve
/// - The engagement does not exist
/// - The caller is not the engagement's band
/// - The engagement is no longer open
pub fn close_slot(
    persistence: &mut Persistence,
    engagement_id: i64,
    credentials: &Credentials,
) -> Result<WriteResponse, ApiError> {
    let band: Principal = authenticate(persistence, PrincipalKind::Band, credentials)?;
    let command: Command = Command::CloseSlot { engagement_id };

    let engagement: EngagementSnapshot = load_engagement(persistence, &command, engagement_id)?;
    if !authorize_principal(&band, Role::Band, &engagement) {
        return Err(forbidden(&command));
    }

    let plan: TransitionPlan =
        plan_transition(engagement.status, &command).map_err(translate_core_error)?;

    execute_plan(
        persistence,
        &command,
        engagement_id,
        plan,
        &band.actor_label(),
    )
}

/// Lists a band's open future slots. Requires no credentials.
///
/// # Errors
///
/// Returns an error if the band does not exist or the query fails.
pub fn list_band_availability(
    persistence: &mut Persistence,
    band_username: &str,
) -> Result<AvailabilityResponse, ApiError> {
    let band: PrincipalData = persistence
        .get_principal_by_username(PrincipalKind::Band, band_username.trim())
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Band"),
            message: format!("Band '{band_username}' does not exist"),
        })?;

    let now: SlotTime = SlotTime::from_instant(OffsetDateTime::now_utc());
    let slots: Vec<SlotInfo> = persistence
        .list_open_slots(band.principal_id, Some(&now))
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|data| SlotInfo {
            engagement_id: data.engagement_id,
            datetime: data.event_datetime,
        })
        .collect();

    Ok(AvailabilityResponse {
        band: band.username,
        display_name: band.display_name,
        slots,
    })
}

// ========================================================================
// Public Events
// ========================================================================

/// Announces a public event for the calling band.
///
/// Public events are listings, not bookings: they hold no slot and take
/// no part in the engagement lifecycle. The venue is geocoded on a
/// best-effort basis.
///
/// # Errors
///
/// Returns an error if:
/// - The band's credentials do not resolve
/// - The date/time is malformed or not strictly in the future
/// - The event details are malformed or the ticket price is negative
/// - The band already announced an event at that instant (conflict)
pub fn create_public_event(
    persistence: &mut Persistence,
    geocoder: &dyn Geocoder,
    request: &CreatePublicEventRequest,
) -> Result<CreatePublicEventResponse, ApiError> {
    let band: Principal = authenticate(persistence, PrincipalKind::Band, &request.credentials)?;

    let slot: SlotTime = SlotTime::parse(&request.datetime).map_err(translate_domain_error)?;
    slot.ensure_future(OffsetDateTime::now_utc())
        .map_err(translate_domain_error)?;
    let details: EventDetails = EventDetails::new(
        &request.category,
        &request.description,
        &request.city,
        &request.address,
    )
    .map_err(translate_domain_error)?;
    let ticket_price: i64 =
        validate_ticket_price(request.ticket_price).map_err(translate_domain_error)?;

    let coordinates: Option<Coordinates> = locate(geocoder, &details);
    let event_datetime: String = slot.canonical();
    let event: NewPublicEvent<'_> = NewPublicEvent {
        band_id: band.principal_id,
        event_datetime: &event_datetime,
        category: details.category.as_str(),
        description: &details.description,
        ticket_price,
        city: &details.city,
        address: &details.address,
        latitude: coordinates.map(|c| c.latitude()),
        longitude: coordinates.map(|c| c.longitude()),
    };

    let public_event_id: i64 = persistence
        .insert_public_event(&event)
        .map_err(|e| match e {
            PersistenceError::UniqueViolation(_) => ApiError::Conflict {
                message: format!("'{}' already announced an event at {slot}", band.username),
            },
            other => translate_persistence_error(other),
        })?;

    Ok(CreatePublicEventResponse {
        success: true,
        message: format!("{} plays {} at {slot}", band.display_name, details.city),
        public_event_id,
    })
}

/// Lists every future public event. Requires no credentials.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_public_events(
    persistence: &mut Persistence,
) -> Result<PublicEventsResponse, ApiError> {
    let now: SlotTime = SlotTime::from_instant(OffsetDateTime::now_utc());
    let events: Vec<PublicEventInfo> = persistence
        .list_public_events(Some(&now))
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(PublicEventInfo::from)
        .collect();

    Ok(PublicEventsResponse { events })
}

// ========================================================================
// Booking Workflow Engine
// ========================================================================

/// Claims a band's open slot for the calling user.
///
/// The price comes from the event category. The address is geocoded on a
/// best-effort basis before the claim; a failed lookup leaves the
/// coordinates unset.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `geocoder` - Address lookup
/// * `request` - The user's credentials, the band and slot, and the event details
///
/// # Returns
///
/// * `Ok(WriteResponse)` carrying the claimed engagement id
///
/// # Errors
///
/// Returns an error if:
/// - The user's credentials do not resolve
/// - The band does not exist
/// - The date/time or event details are malformed
/// - The band has no open slot at that instant (not found)
/// - The slot is already requested or confirmed (conflict)
pub fn request_slot(
    persistence: &mut Persistence,
    geocoder: &dyn Geocoder,
    request: &RequestSlotRequest,
) -> Result<WriteResponse, ApiError> {
    let user: Principal = authenticate(persistence, PrincipalKind::User, &request.credentials)?;

    let band: PrincipalData = persistence
        .get_principal_by_username(PrincipalKind::Band, request.band.trim())
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Band"),
            message: format!("Band '{}' does not exist", request.band),
        })?;

    let slot: SlotTime = SlotTime::parse(&request.datetime).map_err(translate_domain_error)?;
    let details: EventDetails = EventDetails::new(
        &request.category,
        &request.description,
        &request.city,
        &request.address,
    )
    .map_err(translate_domain_error)?;

    let price: i64 = price_for_category(&details.category);
    let category: String = details.category.as_str().to_string();
    let command: Command = Command::RequestSlot {
        band_id: band.principal_id,
        slot,
        user_id: user.principal_id,
        details: details.clone(),
    };

    // Geocoding is slow and rate limited; skip it for a slot that cannot be claimed.
    let current: Option<EngagementStatus> = active_status(persistence, band.principal_id, &slot)?;
    if current != Some(EngagementStatus::Open) {
        return Err(miss_error(&command, current));
    }

    let coordinates: Option<Coordinates> = locate(geocoder, &details);

    let claim: SlotClaim = SlotClaim {
        user_id: user.principal_id,
        price,
        category,
        description: details.description,
        city: details.city,
        address: details.address,
        latitude: coordinates.map(|c| c.latitude()),
        longitude: coordinates.map(|c| c.longitude()),
    };

    // The conditional claim is the real guard; the slot may have changed since the check.
    let claimed: Option<i64> = persistence
        .claim_open_slot(band.principal_id, &slot, &claim, &user.actor_label())
        .map_err(translate_persistence_error)?;

    if let Some(engagement_id) = claimed {
        return Ok(WriteResponse::ok(
            format!("Requested {} at {slot} for {price}", band.display_name),
            Some(engagement_id),
        ));
    }

    let observed: Option<EngagementStatus> = active_status(persistence, band.principal_id, &slot)?;
    Err(miss_error(&command, observed))
}

/// Records the band's verdict on a pending request.
///
/// The caller must be the engagement's band; this is checked before the
/// decision itself is looked at.
///
/// # Errors
///
/// Returns an error if:
/// - The band's credentials do not resolve
/// - The engagement does not exist
/// - The caller is not the engagement's band
/// - The decision is not `confirmed` or `rejected`
/// - The engagement is not awaiting a decision
pub fn decide(
    persistence: &mut Persistence,
    engagement_id: i64,
    request: &DecideRequest,
) -> Result<WriteResponse, ApiError> {
    let band: Principal = authenticate(persistence, PrincipalKind::Band, &request.credentials)?;

    // Authorization comes before the decision is parsed.
    let lookup: Command = Command::Decide {
        engagement_id,
        decision: Decision::Rejected,
    };
    let engagement: EngagementSnapshot = load_engagement(persistence, &lookup, engagement_id)?;
    if !authorize_principal(&band, Role::Band, &engagement) {
        return Err(forbidden(&lookup));
    }

    let decision: Decision = Decision::from_str(&request.decision).map_err(translate_domain_error)?;
    let command: Command = Command::Decide {
        engagement_id,
        decision,
    };

    let plan: TransitionPlan =
        plan_transition(engagement.status, &command).map_err(translate_core_error)?;

    execute_plan(
        persistence,
        &command,
        engagement_id,
        plan,
        &band.actor_label(),
    )
}

fn terminal_action(
    persistence: &mut Persistence,
    command: &Command,
    engagement_id: i64,
    request: &EngagementActionRequest,
) -> Result<WriteResponse, ApiError> {
    let kind: PrincipalKind =
        PrincipalKind::from_str(&request.kind).map_err(translate_domain_error)?;
    if kind == PrincipalKind::User {
        return Err(ApiError::InvalidInput {
            field: String::from("kind"),
            message: format!("Only an admin or the band may {}", command.name()),
        });
    }

    let principal: Principal = authenticate(persistence, kind, &request.credentials)?;

    let engagement: EngagementSnapshot = load_engagement(persistence, command, engagement_id)?;
    if kind == PrincipalKind::Band && !authorize_principal(&principal, Role::Band, &engagement) {
        return Err(forbidden(command));
    }

    let plan: TransitionPlan =
        plan_transition(engagement.status, command).map_err(translate_core_error)?;

    execute_plan(
        persistence,
        command,
        engagement_id,
        plan,
        &principal.actor_label(),
    )
}

/// Marks a confirmed engagement as performed.
///
/// Allowed for an admin or the engagement's band. Completing an engagement
/// that is already terminal succeeds without changing it.
///
/// # Errors
///
/// Returns an error if the credentials do not resolve, the engagement does
/// not exist, a band caller is not its band, or it is not yet confirmed.
pub fn complete(
    persistence: &mut Persistence,
    engagement_id: i64,
    request: &EngagementActionRequest,
) -> Result<WriteResponse, ApiError> {
    terminal_action(
        persistence,
        &Command::Complete { engagement_id },
        engagement_id,
        request,
    )
}

/// Calls off a confirmed engagement.
///
/// Allowed for an admin or the engagement's band. Cancelling an engagement
/// that is already terminal succeeds without changing it.
///
/// # Errors
///
/// Returns an error if the credentials do not resolve, the engagement does
/// not exist, a band caller is not its band, or it is not yet confirmed.
pub fn cancel(
    persistence: &mut Persistence,
    engagement_id: i64,
    request: &EngagementActionRequest,
) -> Result<WriteResponse, ApiError> {
    terminal_action(
        persistence,
        &Command::Cancel { engagement_id },
        engagement_id,
        request,
    )
}

// ========================================================================
// Participant reads and messaging
// ========================================================================

/// Lists every engagement the caller takes part in on the given side.
///
/// # Errors
///
/// Returns an error if the role is unknown, the credentials do not
/// resolve, or the query fails.
pub fn list_my_engagements(
    persistence: &mut Persistence,
    request: &ParticipantRequest,
) -> Result<ListEngagementsResponse, ApiError> {
    let role: Role = parse_role(&request.role)?;
    let principal: Principal =
        authenticate(persistence, role.principal_kind(), &request.credentials)?;

    let engagements: Vec<EngagementInfo> = persistence
        .list_engagements_for(role, principal.principal_id)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(EngagementInfo::from)
        .collect();

    Ok(ListEngagementsResponse { engagements })
}

/// Resolves the caller and checks they take part in the engagement.
fn participant(
    persistence: &mut Persistence,
    engagement_id: i64,
    request: &ParticipantRequest,
    action: &str,
) -> Result<(Role, Principal), ApiError> {
    let role: Role = parse_role(&request.role)?;
    let principal: Principal =
        authenticate(persistence, role.principal_kind(), &request.credentials)?;

    if current_status(persistence, engagement_id)?.is_none() {
        return Err(ApiError::NotFound {
            resource_type: String::from("Engagement"),
            message: format!("Engagement {engagement_id} does not exist"),
        });
    }

    if !is_participant(persistence, engagement_id, role, &principal.username)? {
        return Err(ApiError::Forbidden {
            action: action.to_string(),
        });
    }

    Ok((role, principal))
}

/// Posts a message on an engagement. Only its band and user may post.
///
/// # Errors
///
/// Returns an error if the caller is not a participant, the engagement
/// does not exist, or the message is blank or too long.
pub fn send_message(
    persistence: &mut Persistence,
    engagement_id: i64,
    request: &SendMessageRequest,
) -> Result<WriteResponse, ApiError> {
    let caller: ParticipantRequest = ParticipantRequest {
        role: request.role.clone(),
        credentials: request.credentials.clone(),
    };
    let (role, principal) = participant(persistence, engagement_id, &caller, "message")?;

    let body: MessageBody = MessageBody::new(&request.body).map_err(translate_domain_error)?;

    let message_id: i64 = persistence
        .append_message(engagement_id, role, &principal.username, body.value())
        .map_err(translate_persistence_error)?;

    Ok(WriteResponse::ok(
        format!("Message {message_id} sent"),
        Some(engagement_id),
    ))
}

/// Returns an engagement's messages. Only its band and user may read them.
///
/// # Errors
///
/// Returns an error if the caller is not a participant or the engagement
/// does not exist.
pub fn message_history(
    persistence: &mut Persistence,
    engagement_id: i64,
    request: &ParticipantRequest,
) -> Result<MessageHistoryResponse, ApiError> {
    participant(persistence, engagement_id, request, "read messages on")?;

    let messages = persistence
        .message_history(engagement_id)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(MessageHistoryResponse {
        engagement_id,
        messages,
    })
}

/// Returns an engagement's transition log. Only its band and user may read it.
///
/// # Errors
///
/// Returns an error if the caller is not a participant or the engagement
/// does not exist.
pub fn engagement_history(
    persistence: &mut Persistence,
    engagement_id: i64,
    request: &ParticipantRequest,
) -> Result<EngagementHistoryResponse, ApiError> {
    participant(persistence, engagement_id, request, "view the history of")?;

    let entries = persistence
        .engagement_history(engagement_id)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(EngagementHistoryResponse {
        engagement_id,
        entries,
    })
}

// ========================================================================
// Administration
// ========================================================================

/// Returns counts per status and category and completed revenue.
///
/// # Errors
///
/// Returns an error if the admin credentials do not resolve or the query fails.
pub fn accounting_summary(
    persistence: &mut Persistence,
    credentials: &Credentials,
) -> Result<AccountingSummaryResponse, ApiError> {
    authenticate(persistence, PrincipalKind::Admin, credentials)?;

    let data: AccountingData = persistence
        .accounting_summary()
        .map_err(translate_persistence_error)?;

    Ok(AccountingSummaryResponse {
        status_counts: data
            .status_counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        category_counts: data
            .category_counts
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect(),
        completed_revenue: data.completed_revenue,
    })
}

/// Returns head counts of bands, users, engagements and public events,
/// and the number of bands per home city.
///
/// # Errors
///
/// Returns an error if the admin credentials do not resolve or the query fails.
pub fn site_statistics(
    persistence: &mut Persistence,
    credentials: &Credentials,
) -> Result<SiteStatisticsResponse, ApiError> {
    authenticate(persistence, PrincipalKind::Admin, credentials)?;

    let counts: SiteCounts = persistence
        .site_counts()
        .map_err(translate_persistence_error)?;
    let bands_per_city: Vec<CityCount> = persistence
        .bands_per_city()
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|(city, bands)| CityCount { city, bands })
        .collect();

    Ok(SiteStatisticsResponse {
        bands: counts.bands,
        users: counts.users,
        engagements: counts.engagements,
        public_events: counts.public_events,
        bands_per_city,
    })
}
