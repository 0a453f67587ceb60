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

mod nominatim;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use bandbook_api::{
    AccountingSummaryResponse, ApiError, AvailabilityResponse, CreateAdminRequest,
    CreateAdminResponse, CreatePublicEventRequest, CreatePublicEventResponse, Credentials,
    DecideRequest, EngagementActionRequest, EngagementHistoryResponse, Geocoder,
    ListEngagementsResponse, MessageHistoryResponse, NoopGeocoder, OpenSlotRequest,
    ParticipantRequest, PublicEventsResponse, RegisterPrincipalRequest, RegisterPrincipalResponse,
    RequestSlotRequest, SendMessageRequest, SiteStatisticsResponse, WriteResponse,
    accounting_summary, cancel, close_slot, complete, create_admin, create_public_event, decide,
    engagement_history, list_band_availability, list_my_engagements, list_public_events,
    message_history, open_slot, register_principal, request_slot, send_message, site_statistics,
    translate_persistence_error,
};
use bandbook_persistence::Persistence;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::nominatim::NominatimGeocoder;

/// Bandbook Server - HTTP server for the band booking service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "BANDBOOK_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Nominatim-compatible search endpoint used to geocode venues
    #[arg(
        long,
        env = "BANDBOOK_GEOCODER_URL",
        default_value = "https://nominatim.openstreetmap.org/search"
    )]
    geocoder_url: String,

    /// Geocoder request timeout, in seconds
    #[arg(long, default_value_t = 5)]
    geocoder_timeout_secs: u64,

    /// User-Agent sent to the geocoder
    #[arg(long, default_value = concat!("bandbook/", env!("CARGO_PKG_VERSION")))]
    user_agent: String,

    /// Disable address lookup entirely
    #[arg(long)]
    no_geocoder: bool,

    /// Username of an admin to create at startup if it does not exist
    #[arg(long, env = "BANDBOOK_ADMIN_USERNAME", requires = "admin_password")]
    admin_username: Option<String>,

    /// Password for the seeded admin
    #[arg(long, env = "BANDBOOK_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,
}

/// Application state shared across handlers.
///
/// Handlers never share a connection. Each request opens its own
/// connection to `database_url` on a blocking worker thread, so the
/// database is the only point where concurrent requests meet.
#[derive(Clone)]
struct AppState {
    /// Where request connections are opened.
    database_url: String,
    /// Address lookup for slot requests.
    geocoder: Arc<dyn Geocoder + Send + Sync>,
    /// The initializing connection. Never used for requests; holding it
    /// keeps a shared in-memory database alive for the server's lifetime.
    _anchor: Arc<Mutex<Persistence>>,
}

impl AppState {
    fn new(persistence: Persistence, geocoder: Arc<dyn Geocoder + Send + Sync>) -> Self {
        Self {
            database_url: persistence.database_url().to_string(),
            geocoder,
            _anchor: Arc::new(Mutex::new(persistence)),
        }
    }
}

// ============================================================================
// Request bodies
// ============================================================================

/// API request for registering a band or user.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RegisterApiRequest {
    /// `band` or `user`.
    kind: String,
    /// The login name.
    username: String,
    /// The name shown to other parties.
    display_name: String,
    /// The chosen password.
    password: String,
    /// The password, repeated.
    password_confirmation: String,
    /// Home city. Required for bands.
    #[serde(default)]
    city: Option<String>,
}

/// Bare credentials, for calls that need nothing else.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CredentialsApiRequest {
    /// The login name.
    username: String,
    /// The password.
    password: String,
}

/// API request for opening a slot.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct OpenSlotApiRequest {
    /// The band's login name.
    username: String,
    /// The band's password.
    password: String,
    /// The slot date/time.
    datetime: String,
}

/// API request for claiming a band's slot.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RequestSlotApiRequest {
    /// The user's login name.
    username: String,
    /// The user's password.
    password: String,
    /// The band's username.
    band: String,
    /// The slot date/time.
    datetime: String,
    /// The event category.
    category: String,
    /// Free-text description of the event.
    #[serde(default)]
    description: String,
    /// The venue city.
    city: String,
    /// The venue street address.
    address: String,
}

/// API request for announcing a public event.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct PublicEventApiRequest {
    /// The band's login name.
    username: String,
    /// The band's password.
    password: String,
    /// The event date/time.
    datetime: String,
    /// The event category.
    category: String,
    /// Free-text description of the event.
    #[serde(default)]
    description: String,
    /// Price per ticket.
    ticket_price: i64,
    /// The venue city.
    city: String,
    /// The venue street address.
    address: String,
}

/// API request for a band's decision.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct DecisionApiRequest {
    /// The band's login name.
    username: String,
    /// The band's password.
    password: String,
    /// `confirmed` or `rejected`.
    decision: String,
}

/// API request for completing or cancelling an engagement.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActionApiRequest {
    /// `admin` or `band`.
    kind: String,
    /// The caller's login name.
    username: String,
    /// The caller's password.
    password: String,
}

/// API request identifying a party to an engagement.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ParticipantApiRequest {
    /// `band` or `user`.
    role: String,
    /// The caller's login name.
    username: String,
    /// The caller's password.
    password: String,
}

/// API request for posting a message.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct MessageApiRequest {
    /// `band` or `user`.
    role: String,
    /// The sender's login name.
    username: String,
    /// The sender's password.
    password: String,
    /// The message text.
    body: String,
}

// ============================================================================
// Errors
// ============================================================================

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Always false.
    success: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            success: false,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } | ApiError::InvalidState { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Unwraps a JSON body. A body that is not valid JSON, or does not fit the
/// request type, is reported in the usual error shape with axum's status.
fn read_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected request body");
        HttpError {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    })
}

/// Runs a handler on a blocking worker with its own connection.
///
/// The geocoder may block on network I/O, and so may `SQLite` while it
/// waits on a lock; neither happens on a runtime thread.
async fn run_blocking<T, F>(app_state: &AppState, operation: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&mut Persistence, &dyn Geocoder) -> Result<T, ApiError> + Send + 'static,
{
    let database_url: String = app_state.database_url.clone();
    let geocoder: Arc<dyn Geocoder + Send + Sync> = Arc::clone(&app_state.geocoder);

    let outcome: Result<T, ApiError> = tokio::task::spawn_blocking(move || {
        let mut persistence: Persistence =
            Persistence::connect(&database_url).map_err(translate_persistence_error)?;
        operation(&mut persistence, geocoder.as_ref())
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Blocking task failed");
        HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Internal error: {e}"),
        }
    })?;

    outcome.map_err(HttpError::from)
}

// ============================================================================
// Handlers
// ============================================================================

async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    body: Result<Json<RegisterApiRequest>, JsonRejection>,
) -> Result<Json<RegisterPrincipalResponse>, HttpError> {
    let req: RegisterApiRequest = read_json(body)?;
    info!(kind = %req.kind, username = %req.username, "Handling register request");

    let request: RegisterPrincipalRequest = RegisterPrincipalRequest {
        kind: req.kind,
        username: req.username,
        display_name: req.display_name,
        password: req.password,
        password_confirmation: req.password_confirmation,
        city: req.city,
    };

    let response: RegisterPrincipalResponse = run_blocking(&app_state, move |persistence, _| {
        register_principal(persistence, &request)
    })
    .await?;

    Ok(Json(response))
}

async fn handle_open_slot(
    AxumState(app_state): AxumState<AppState>,
    body: Result<Json<OpenSlotApiRequest>, JsonRejection>,
) -> Result<Json<WriteResponse>, HttpError> {
    let req: OpenSlotApiRequest = read_json(body)?;
    info!(band = %req.username, datetime = %req.datetime, "Handling open_slot request");

    let request: OpenSlotRequest = OpenSlotRequest {
        credentials: Credentials::new(&req.username, &req.password),
        datetime: req.datetime,
    };

    let response: WriteResponse =
        run_blocking(&app_state, move |persistence, _| open_slot(persistence, &request)).await?;

    Ok(Json(response))
}

async fn handle_close_slot(
    AxumState(app_state): AxumState<AppState>,
    Path(engagement_id): Path<i64>,
    body: Result<Json<CredentialsApiRequest>, JsonRejection>,
) -> Result<Json<WriteResponse>, HttpError> {
    let req: CredentialsApiRequest = read_json(body)?;
    info!(band = %req.username, engagement_id, "Handling close_slot request");

    let credentials: Credentials = Credentials::new(&req.username, &req.password);

    let response: WriteResponse = run_blocking(&app_state, move |persistence, _| {
        close_slot(persistence, engagement_id, &credentials)
    })
    .await?;

    Ok(Json(response))
}

async fn handle_availability(
    AxumState(app_state): AxumState<AppState>,
    Path(band): Path<String>,
) -> Result<Json<AvailabilityResponse>, HttpError> {
    info!(band = %band, "Handling availability request");

    let response: AvailabilityResponse = run_blocking(&app_state, move |persistence, _| {
        list_band_availability(persistence, &band)
    })
    .await?;

    Ok(Json(response))
}

async fn handle_request_slot(
    AxumState(app_state): AxumState<AppState>,
    body: Result<Json<RequestSlotApiRequest>, JsonRejection>,
) -> Result<Json<WriteResponse>, HttpError> {
    let req: RequestSlotApiRequest = read_json(body)?;
    info!(
        user = %req.username,
        band = %req.band,
        datetime = %req.datetime,
        category = %req.category,
        "Handling request_slot request"
    );

    let request: RequestSlotRequest = RequestSlotRequest {
        credentials: Credentials::new(&req.username, &req.password),
        band: req.band,
        datetime: req.datetime,
        category: req.category,
        description: req.description,
        city: req.city,
        address: req.address,
    };

    let response: WriteResponse = run_blocking(&app_state, move |persistence, geocoder| {
        request_slot(persistence, geocoder, &request)
    })
    .await?;

    info!(engagement_id = ?response.engagement_id, "Slot requested");

    Ok(Json(response))
}

async fn handle_decide(
    AxumState(app_state): AxumState<AppState>,
    Path(engagement_id): Path<i64>,
    body: Result<Json<DecisionApiRequest>, JsonRejection>,
) -> Result<Json<WriteResponse>, HttpError> {
    let req: DecisionApiRequest = read_json(body)?;
    info!(
        band = %req.username,
        engagement_id,
        decision = %req.decision,
        "Handling decide request"
    );

    let request: DecideRequest = DecideRequest {
        credentials: Credentials::new(&req.username, &req.password),
        decision: req.decision,
    };

    let response: WriteResponse = run_blocking(&app_state, move |persistence, _| {
        decide(persistence, engagement_id, &request)
    })
    .await?;

    Ok(Json(response))
}

fn action_request(req: ActionApiRequest) -> EngagementActionRequest {
    EngagementActionRequest {
        credentials: Credentials::new(&req.username, &req.password),
        kind: req.kind,
    }
}

async fn handle_complete(
    AxumState(app_state): AxumState<AppState>,
    Path(engagement_id): Path<i64>,
    body: Result<Json<ActionApiRequest>, JsonRejection>,
) -> Result<Json<WriteResponse>, HttpError> {
    let req: ActionApiRequest = read_json(body)?;
    info!(kind = %req.kind, username = %req.username, engagement_id, "Handling complete request");

    let request: EngagementActionRequest = action_request(req);

    let response: WriteResponse = run_blocking(&app_state, move |persistence, _| {
        complete(persistence, engagement_id, &request)
    })
    .await?;

    Ok(Json(response))
}

async fn handle_cancel(
    AxumState(app_state): AxumState<AppState>,
    Path(engagement_id): Path<i64>,
    body: Result<Json<ActionApiRequest>, JsonRejection>,
) -> Result<Json<WriteResponse>, HttpError> {
    let req: ActionApiRequest = read_json(body)?;
    info!(kind = %req.kind, username = %req.username, engagement_id, "Handling cancel request");

    let request: EngagementActionRequest = action_request(req);

    let response: WriteResponse = run_blocking(&app_state, move |persistence, _| {
        cancel(persistence, engagement_id, &request)
    })
    .await?;

    Ok(Json(response))
}

fn participant_request(req: ParticipantApiRequest) -> ParticipantRequest {
    ParticipantRequest {
        credentials: Credentials::new(&req.username, &req.password),
        role: req.role,
    }
}

async fn handle_my_engagements(
    AxumState(app_state): AxumState<AppState>,
    body: Result<Json<ParticipantApiRequest>, JsonRejection>,
) -> Result<Json<ListEngagementsResponse>, HttpError> {
    let req: ParticipantApiRequest = read_json(body)?;
    info!(role = %req.role, username = %req.username, "Handling my_engagements request");

    let request: ParticipantRequest = participant_request(req);

    let response: ListEngagementsResponse = run_blocking(&app_state, move |persistence, _| {
        list_my_engagements(persistence, &request)
    })
    .await?;

    Ok(Json(response))
}

async fn handle_engagement_history(
    AxumState(app_state): AxumState<AppState>,
    Path(engagement_id): Path<i64>,
    body: Result<Json<ParticipantApiRequest>, JsonRejection>,
) -> Result<Json<EngagementHistoryResponse>, HttpError> {
    let req: ParticipantApiRequest = read_json(body)?;
    info!(role = %req.role, username = %req.username, engagement_id, "Handling history request");

    let request: ParticipantRequest = participant_request(req);

    let response: EngagementHistoryResponse =
        run_blocking(&app_state, move |persistence, _| {
            engagement_history(persistence, engagement_id, &request)
        })
        .await?;

    Ok(Json(response))
}

async fn handle_send_message(
    AxumState(app_state): AxumState<AppState>,
    Path(engagement_id): Path<i64>,
    body: Result<Json<MessageApiRequest>, JsonRejection>,
) -> Result<Json<WriteResponse>, HttpError> {
    let req: MessageApiRequest = read_json(body)?;
    info!(role = %req.role, username = %req.username, engagement_id, "Handling send_message request");

    let request: SendMessageRequest = SendMessageRequest {
        role: req.role,
        credentials: Credentials::new(&req.username, &req.password),
        body: req.body,
    };

    let response: WriteResponse = run_blocking(&app_state, move |persistence, _| {
        send_message(persistence, engagement_id, &request)
    })
    .await?;

    Ok(Json(response))
}

async fn handle_message_history(
    AxumState(app_state): AxumState<AppState>,
    Path(engagement_id): Path<i64>,
    body: Result<Json<ParticipantApiRequest>, JsonRejection>,
) -> Result<Json<MessageHistoryResponse>, HttpError> {
    let req: ParticipantApiRequest = read_json(body)?;
    info!(role = %req.role, username = %req.username, engagement_id, "Handling message_history request");

    let request: ParticipantRequest = participant_request(req);

    let response: MessageHistoryResponse = run_blocking(&app_state, move |persistence, _| {
        message_history(persistence, engagement_id, &request)
    })
    .await?;

    Ok(Json(response))
}

async fn handle_admin_summary(
    AxumState(app_state): AxumState<AppState>,
    body: Result<Json<CredentialsApiRequest>, JsonRejection>,
) -> Result<Json<AccountingSummaryResponse>, HttpError> {
    let req: CredentialsApiRequest = read_json(body)?;
    info!(username = %req.username, "Handling admin summary request");

    let credentials: Credentials = Credentials::new(&req.username, &req.password);

    let response: AccountingSummaryResponse = run_blocking(&app_state, move |persistence, _| {
        accounting_summary(persistence, &credentials)
    })
    .await?;

    Ok(Json(response))
}

async fn handle_site_statistics(
    AxumState(app_state): AxumState<AppState>,
    body: Result<Json<CredentialsApiRequest>, JsonRejection>,
) -> Result<Json<SiteStatisticsResponse>, HttpError> {
    let req: CredentialsApiRequest = read_json(body)?;
    info!(username = %req.username, "Handling site statistics request");

    let credentials: Credentials = Credentials::new(&req.username, &req.password);

    let response: SiteStatisticsResponse = run_blocking(&app_state, move |persistence, _| {
        site_statistics(persistence, &credentials)
    })
    .await?;

    Ok(Json(response))
}

async fn handle_create_public_event(
    AxumState(app_state): AxumState<AppState>,
    body: Result<Json<PublicEventApiRequest>, JsonRejection>,
) -> Result<Json<CreatePublicEventResponse>, HttpError> {
    let req: PublicEventApiRequest = read_json(body)?;
    info!(
        band = %req.username,
        datetime = %req.datetime,
        city = %req.city,
        "Handling create_public_event request"
    );

    let request: CreatePublicEventRequest = CreatePublicEventRequest {
        credentials: Credentials::new(&req.username, &req.password),
        datetime: req.datetime,
        category: req.category,
        description: req.description,
        ticket_price: req.ticket_price,
        city: req.city,
        address: req.address,
    };

    let response: CreatePublicEventResponse =
        run_blocking(&app_state, move |persistence, geocoder| {
            create_public_event(persistence, geocoder, &request)
        })
        .await?;

    info!(public_event_id = response.public_event_id, "Public event announced");

    Ok(Json(response))
}

async fn handle_public_events(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<PublicEventsResponse>, HttpError> {
    let response: PublicEventsResponse =
        run_blocking(&app_state, |persistence, _| list_public_events(persistence)).await?;

    Ok(Json(response))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/principals", post(handle_register))
        .route("/slots", post(handle_open_slot))
        .route("/slots/{engagement_id}", delete(handle_close_slot))
        .route("/bands/{band}/availability", get(handle_availability))
        .route("/bookings", post(handle_request_slot))
        .route("/engagements/mine", post(handle_my_engagements))
        .route("/engagements/{engagement_id}/decision", post(handle_decide))
        .route("/engagements/{engagement_id}/complete", post(handle_complete))
        .route("/engagements/{engagement_id}/cancel", post(handle_cancel))
        .route(
            "/engagements/{engagement_id}/history",
            post(handle_engagement_history),
        )
        .route(
            "/engagements/{engagement_id}/messages",
            post(handle_send_message),
        )
        .route(
            "/engagements/{engagement_id}/messages/list",
            post(handle_message_history),
        )
        .route(
            "/public-events",
            get(handle_public_events).post(handle_create_public_event),
        )
        .route("/admin/summary", post(handle_admin_summary))
        .route("/admin/statistics", post(handle_site_statistics))
        .with_state(app_state)
}

fn build_geocoder(args: &Args) -> Result<Arc<dyn Geocoder + Send + Sync>, Box<dyn std::error::Error>> {
    if args.no_geocoder {
        info!("Geocoding disabled");
        return Ok(Arc::new(NoopGeocoder));
    }

    info!(endpoint = %args.geocoder_url, "Using Nominatim geocoder");
    let geocoder: NominatimGeocoder = NominatimGeocoder::new(
        &args.geocoder_url,
        Duration::from_secs(args.geocoder_timeout_secs),
        &args.user_agent,
    )?;
    Ok(Arc::new(geocoder))
}

/// Creates the configured admin unless it already exists.
///
/// Hashing runs on a blocking worker like any request.
async fn seed_admin(
    app_state: &AppState,
    username: String,
    password: String,
) -> Result<CreateAdminResponse, HttpError> {
    let request: CreateAdminRequest = CreateAdminRequest {
        display_name: username.clone(),
        username,
        password,
    };

    let response: CreateAdminResponse = run_blocking(app_state, move |persistence, _| {
        create_admin(persistence, &request)
    })
    .await?;

    if response.created {
        info!(
            principal_id = response.principal_id,
            username = %response.username,
            "Seeded admin"
        );
    } else {
        info!(username = %response.username, "Admin already present");
    }

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Bandbook Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let geocoder: Arc<dyn Geocoder + Send + Sync> = build_geocoder(&args)?;
    let app_state: AppState = AppState::new(persistence, geocoder);

    if let (Some(username), Some(password)) = (args.admin_username.clone(), args.admin_password.clone()) {
        if let Err(e) = seed_admin(&app_state, username, password).await {
            warn!(error = %e.message, "Failed to seed admin");
        }
    }

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use bandbook_api::GeocodeError;
    use bandbook_domain::Coordinates;
    use tower::ServiceExt;

    const PASSWORD: &str = "Str0ng-Passw0rd!";
    const SLOT: &str = "2099-06-01T20:00:00";

    struct FixedGeocoder;

    impl Geocoder for FixedGeocoder {
        fn geocode(&self, _query: &str) -> Result<Option<Coordinates>, GeocodeError> {
            Ok(Some(Coordinates::new(38.7223, -9.1393).unwrap()))
        }
    }

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState::new(persistence, Arc::new(FixedGeocoder))
    }

    async fn send<T: Serialize>(
        app: &Router,
        method: &str,
        uri: &str,
        body: &T,
    ) -> (HttpStatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status: HttpStatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn send_raw(
        app: &Router,
        uri: &str,
        body: &str,
    ) -> (HttpStatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status: HttpStatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(app: &Router, uri: &str) -> (HttpStatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status: HttpStatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn register(app: &Router, kind: &str, username: &str) {
        let req: RegisterApiRequest = RegisterApiRequest {
            kind: kind.to_string(),
            username: username.to_string(),
            display_name: format!("Display {username}"),
            password: PASSWORD.to_string(),
            password_confirmation: PASSWORD.to_string(),
            city: (kind == "band").then(|| String::from("Lisbon")),
        };
        let (status, _) = send(app, "POST", "/principals", &req).await;
        assert_eq!(status, HttpStatusCode::OK);
    }

    async fn open(app: &Router, band: &str, datetime: &str) -> (HttpStatusCode, serde_json::Value) {
        let req: OpenSlotApiRequest = OpenSlotApiRequest {
            username: band.to_string(),
            password: PASSWORD.to_string(),
            datetime: datetime.to_string(),
        };
        send(app, "POST", "/slots", &req).await
    }

    async fn book(app: &Router, user: &str, band: &str) -> (HttpStatusCode, serde_json::Value) {
        let req: RequestSlotApiRequest = RequestSlotApiRequest {
            username: user.to_string(),
            password: PASSWORD.to_string(),
            band: band.to_string(),
            datetime: SLOT.to_string(),
            category: String::from("wedding"),
            description: String::new(),
            city: String::from("Lisbon"),
            address: String::from("Rua Augusta 1"),
        };
        send(app, "POST", "/bookings", &req).await
    }

    async fn decide_as(
        app: &Router,
        band: &str,
        engagement_id: i64,
        decision: &str,
    ) -> (HttpStatusCode, serde_json::Value) {
        let req: DecisionApiRequest = DecisionApiRequest {
            username: band.to_string(),
            password: PASSWORD.to_string(),
            decision: decision.to_string(),
        };
        send(
            app,
            "POST",
            &format!("/engagements/{engagement_id}/decision"),
            &req,
        )
        .await
    }

    #[tokio::test]
    async fn test_booking_flow_over_http() {
        let app: Router = build_router(create_test_app_state());
        register(&app, "band", "the-band").await;
        register(&app, "user", "the-user").await;
        register(&app, "user", "rival-user").await;

        let (status, body) = open(&app, "the-band", SLOT).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["success"], true);
        let engagement_id: i64 = body["engagement_id"].as_i64().unwrap();

        let (status, body) = book(&app, "the-user", "the-band").await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["engagement_id"].as_i64(), Some(engagement_id));

        let (status, body) = book(&app, "rival-user", "the-band").await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let (status, _) = decide_as(&app, "the-band", engagement_id, "confirmed").await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = decide_as(&app, "the-band", engagement_id, "rejected").await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("confirmed"));

        let mine: ParticipantApiRequest = ParticipantApiRequest {
            role: String::from("user"),
            username: String::from("the-user"),
            password: PASSWORD.to_string(),
        };
        let (status, body) = send(&app, "POST", "/engagements/mine", &mine).await;
        assert_eq!(status, HttpStatusCode::OK);
        let engagement = &body["engagements"][0];
        assert_eq!(engagement["status"], "confirmed");
        assert_eq!(engagement["price"], 2000);
        assert_eq!(engagement["latitude"], 38.7223);
    }

    #[tokio::test]
    async fn test_open_slot_in_past_is_bad_request() {
        let app: Router = build_router(create_test_app_state());
        register(&app, "band", "the-band").await;

        let (status, body) = open(&app, "the-band", "2001-01-01T10:00:00").await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/bands/the-band/availability")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let availability: AvailabilityResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(availability.slots.is_empty());
    }

    #[tokio::test]
    async fn test_bad_credentials_are_unauthorized() {
        let app: Router = build_router(create_test_app_state());
        register(&app, "band", "the-band").await;

        let req: OpenSlotApiRequest = OpenSlotApiRequest {
            username: String::from("the-band"),
            password: String::from("Wr0ng-Passw0rd!"),
            datetime: SLOT.to_string(),
        };
        let (status, body) = send(&app, "POST", "/slots", &req).await;

        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_wrong_band_decision_is_forbidden() {
        let app: Router = build_router(create_test_app_state());
        register(&app, "band", "the-band").await;
        register(&app, "band", "rival-band").await;
        register(&app, "user", "the-user").await;
        let (_, body) = open(&app, "the-band", SLOT).await;
        let engagement_id: i64 = body["engagement_id"].as_i64().unwrap();
        book(&app, "the-user", "the-band").await;

        let (status, _) = decide_as(&app, "rival-band", engagement_id, "not-a-decision").await;

        assert_eq!(status, HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_close_slot_round_trip() {
        let app: Router = build_router(create_test_app_state());
        register(&app, "band", "the-band").await;
        let (_, body) = open(&app, "the-band", SLOT).await;
        let engagement_id: i64 = body["engagement_id"].as_i64().unwrap();

        let creds: CredentialsApiRequest = CredentialsApiRequest {
            username: String::from("the-band"),
            password: PASSWORD.to_string(),
        };
        let (status, _) = send(&app, "DELETE", &format!("/slots/{engagement_id}"), &creds).await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, _) = send(&app, "DELETE", &format!("/slots/{engagement_id}"), &creds).await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);

        let (status, _) = open(&app, "the-band", SLOT).await;
        assert_eq!(status, HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_summary_after_seed() {
        let app_state: AppState = create_test_app_state();
        seed_admin(&app_state, String::from("root-admin"), PASSWORD.to_string())
            .await
            .unwrap();
        let app: Router = build_router(app_state);

        let creds: CredentialsApiRequest = CredentialsApiRequest {
            username: String::from("root-admin"),
            password: PASSWORD.to_string(),
        };
        let (status, body) = send(&app, "POST", "/admin/summary", &creds).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["completed_revenue"], 0);
    }

    #[tokio::test]
    async fn test_malformed_bodies_use_the_error_shape() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send_raw(&app, "/slots", "{not json").await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

        let (status, body) = send_raw(&app, "/slots", r#"{"username":"the-band"}"#).await;
        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some_and(|m| m.contains("password")));
    }

    #[tokio::test]
    async fn test_band_registration_without_city_is_bad_request() {
        let app: Router = build_router(create_test_app_state());
        let body: String = format!(
            r#"{{"kind":"band","username":"the-band","display_name":"The Band","password":"{PASSWORD}","password_confirmation":"{PASSWORD}"}}"#
        );

        let (status, body) = send_raw(&app, "/principals", &body).await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_public_events_over_http() {
        let app: Router = build_router(create_test_app_state());
        register(&app, "band", "the-band").await;
        let req: PublicEventApiRequest = PublicEventApiRequest {
            username: String::from("the-band"),
            password: PASSWORD.to_string(),
            datetime: SLOT.to_string(),
            category: String::from("concert"),
            description: String::from("Open-air set"),
            ticket_price: 15,
            city: String::from("Porto"),
            address: String::from("Avenida dos Aliados"),
        };

        let (status, body) = send(&app, "POST", "/public-events", &req).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert!(body["public_event_id"].as_i64().is_some());

        let (status, body) = send(&app, "POST", "/public-events", &req).await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let (status, body) = get_json(&app, "/public-events").await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["events"][0]["band"], "the-band");
        assert_eq!(body["events"][0]["ticket_price"], 15);
    }

    #[tokio::test]
    async fn test_site_statistics_over_http() {
        let app_state: AppState = create_test_app_state();
        seed_admin(&app_state, String::from("root-admin"), PASSWORD.to_string())
            .await
            .unwrap();
        let app: Router = build_router(app_state);
        register(&app, "band", "the-band").await;
        register(&app, "user", "the-user").await;

        let creds: CredentialsApiRequest = CredentialsApiRequest {
            username: String::from("root-admin"),
            password: PASSWORD.to_string(),
        };
        let (status, body) = send(&app, "POST", "/admin/statistics", &creds).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["bands"], 1);
        assert_eq!(body["users"], 1);
        assert_eq!(body["bands_per_city"][0]["city"], "Lisbon");
    }

    #[tokio::test]
    #[allow(clippy::used_underscore_binding)]
    async fn test_seed_admin_does_not_wait_on_the_anchor() {
        let app_state: AppState = create_test_app_state();
        let held = app_state._anchor.lock().await;

        let first = tokio::time::timeout(
            Duration::from_secs(30),
            seed_admin(&app_state, String::from("root-admin"), PASSWORD.to_string()),
        )
        .await
        .expect("seeding must not need the anchor connection")
        .unwrap();
        drop(held);

        let second: CreateAdminResponse =
            seed_admin(&app_state, String::from("root-admin"), PASSWORD.to_string())
                .await
                .unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.principal_id, second.principal_id);
    }

    #[tokio::test]
    async fn test_seed_admin_reports_weak_password() {
        let app_state: AppState = create_test_app_state();

        let result =
            seed_admin(&app_state, String::from("root-admin"), String::from("weak")).await;

        assert_eq!(result.unwrap_err().status, HttpStatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_errors_map_to_statuses() {
        let cases: [(ApiError, HttpStatusCode); 6] = [
            (
                ApiError::Forbidden {
                    action: String::from("decide"),
                },
                HttpStatusCode::FORBIDDEN,
            ),
            (
                ApiError::NotFound {
                    resource_type: String::from("Engagement"),
                    message: String::from("gone"),
                },
                HttpStatusCode::NOT_FOUND,
            ),
            (
                ApiError::InvalidState {
                    message: String::from("confirmed"),
                },
                HttpStatusCode::CONFLICT,
            ),
            (
                ApiError::PasswordPolicyViolation {
                    message: String::from("short"),
                },
                HttpStatusCode::BAD_REQUEST,
            ),
            (
                ApiError::AuthenticationFailed {
                    reason: String::from("nope"),
                },
                HttpStatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Internal {
                    message: String::from("disk"),
                },
                HttpStatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(HttpError::from(err).status, expected);
        }
    }
}
