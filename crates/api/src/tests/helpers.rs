// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use bandbook_domain::Coordinates;
use bandbook_persistence::Persistence;

use crate::{
    ApiError, CreateAdminRequest, Credentials, DecideRequest, EngagementActionRequest,
    GeocodeError, Geocoder, NoopGeocoder, OpenSlotRequest, RegisterPrincipalRequest,
    RequestSlotRequest, WriteResponse, create_admin, decide, open_slot, register_principal,
    request_slot,
};

pub const PASSWORD: &str = "Str0ng-Passw0rd!";
pub const SLOT: &str = "2099-06-01T20:00:00";

/// Always resolves to the same point.
pub struct FixedGeocoder;

impl Geocoder for FixedGeocoder {
    fn geocode(&self, _query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(Some(Coordinates::new(38.7223, -9.1393).unwrap()))
    }
}

/// Always fails as if the lookup service were down.
pub struct FailingGeocoder;

impl Geocoder for FailingGeocoder {
    fn geocode(&self, _query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Err(GeocodeError::Transport(String::from("connection refused")))
    }
}

/// Counts lookups and resolves none of them.
#[derive(Default)]
pub struct CountingGeocoder {
    calls: AtomicUsize,
}

impl CountingGeocoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for CountingGeocoder {
    fn geocode(&self, _query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A temporary database file removed (with its WAL side files) on drop.
pub struct TempDatabase {
    pub path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> Self {
        let id: u64 = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path: PathBuf = std::env::temp_dir().join(format!(
            "bandbook_api_race_{}_{id}.db",
            std::process::id()
        ));
        Self { path }
    }

    pub fn url(&self) -> String {
        self.path.to_str().unwrap().to_string()
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        let base: String = self.url();
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{base}{suffix}"));
        }
    }
}

pub fn setup_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn register(persistence: &mut Persistence, kind: &str, username: &str) -> Credentials {
    let city: Option<&str> = (kind == "band").then_some("Lisbon");
    register_in(persistence, kind, username, city)
}

pub fn register_in(
    persistence: &mut Persistence,
    kind: &str,
    username: &str,
    city: Option<&str>,
) -> Credentials {
    let request: RegisterPrincipalRequest = RegisterPrincipalRequest {
        kind: kind.to_string(),
        username: username.to_string(),
        display_name: format!("Display {username}"),
        password: PASSWORD.to_string(),
        password_confirmation: PASSWORD.to_string(),
        city: city.map(str::to_string),
    };
    register_principal(persistence, &request).expect("Failed to register principal");
    Credentials::new(username, PASSWORD)
}

pub fn create_test_admin(persistence: &mut Persistence) -> Credentials {
    let request: CreateAdminRequest = CreateAdminRequest {
        username: String::from("root-admin"),
        display_name: String::from("Site Operator"),
        password: PASSWORD.to_string(),
    };
    create_admin(persistence, &request).expect("Failed to create admin");
    Credentials::new("root-admin", PASSWORD)
}

pub fn open(persistence: &mut Persistence, band: &Credentials, datetime: &str) -> i64 {
    let request: OpenSlotRequest = OpenSlotRequest {
        credentials: band.clone(),
        datetime: datetime.to_string(),
    };
    open_slot(persistence, &request)
        .expect("Failed to open slot")
        .engagement_id
        .expect("Open slot carries an engagement id")
}

pub fn wedding_request(user: &Credentials, band: &str, datetime: &str) -> RequestSlotRequest {
    RequestSlotRequest {
        credentials: user.clone(),
        band: band.to_string(),
        datetime: datetime.to_string(),
        category: String::from("Wedding"),
        description: String::from("Evening reception"),
        city: String::from("Lisbon"),
        address: String::from("Rua Augusta 1"),
    }
}

pub fn request(
    persistence: &mut Persistence,
    user: &Credentials,
    band: &str,
    datetime: &str,
) -> Result<WriteResponse, ApiError> {
    request_slot(
        persistence,
        &NoopGeocoder,
        &wedding_request(user, band, datetime),
    )
}

pub fn decide_as(
    persistence: &mut Persistence,
    band: &Credentials,
    engagement_id: i64,
    decision: &str,
) -> Result<WriteResponse, ApiError> {
    let request: DecideRequest = DecideRequest {
        credentials: band.clone(),
        decision: decision.to_string(),
    };
    decide(persistence, engagement_id, &request)
}

pub fn action(kind: &str, credentials: &Credentials) -> EngagementActionRequest {
    EngagementActionRequest {
        kind: kind.to_string(),
        credentials: credentials.clone(),
    }
}

/// A band `the-band` and user `the-user` with a requested engagement at `SLOT`.
pub struct Booked {
    pub band: Credentials,
    pub user: Credentials,
    pub engagement_id: i64,
}

pub fn create_requested_engagement(persistence: &mut Persistence) -> Booked {
    let band: Credentials = register(persistence, "band", "the-band");
    let user: Credentials = register(persistence, "user", "the-user");
    let engagement_id: i64 = open(persistence, &band, SLOT);
    request(persistence, &user, "the-band", SLOT).expect("Failed to request slot");

    Booked {
        band,
        user,
        engagement_id,
    }
}

pub fn create_confirmed_engagement(persistence: &mut Persistence) -> Booked {
    let booked: Booked = create_requested_engagement(persistence);
    decide_as(persistence, &booked.band, booked.engagement_id, "confirmed")
        .expect("Failed to confirm");
    booked
}
