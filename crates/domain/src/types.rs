// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum length for usernames.
const MAX_USERNAME_LEN: usize = 64;
/// Maximum length for display names.
const MAX_DISPLAY_NAME_LEN: usize = 120;
/// Maximum length for free-text fields (descriptions, messages).
pub const MAX_TEXT_LEN: usize = 2000;
/// Category stored when none is given.
const DEFAULT_CATEGORY: &str = "other";

/// The kind of account a principal holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    /// A performer that publishes availability.
    Band,
    /// A client that requests engagements.
    User,
    /// An operator with accounting and administrative authority.
    Admin,
}

impl PrincipalKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Band => "band",
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for PrincipalKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "band" => Ok(Self::Band),
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidPrincipalKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The side of an engagement a principal acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The performing band.
    Band,
    /// The requesting user.
    User,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Band => "band",
            Self::User => "user",
        }
    }

    /// The principal kind whose credentials act in this role.
    #[must_use]
    pub const fn principal_kind(&self) -> PrincipalKind {
        match self {
            Self::Band => PrincipalKind::Band,
            Self::User => PrincipalKind::User,
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "band" => Ok(Self::Band),
            "user" => Ok(Self::User),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of event being booked.
///
/// Unknown categories are kept verbatim rather than rejected; they fall
/// into the flat default price band.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Wedding,
    Baptism,
    Party,
    /// Any other category, as supplied.
    Other(String),
}

impl EventCategory {
    /// Parses a category. Never fails.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let normalized: String = input.trim().to_lowercase();
        match normalized.as_str() {
            "wedding" => Self::Wedding,
            "baptism" => Self::Baptism,
            "party" => Self::Party,
            "" => Self::Other(String::from(DEFAULT_CATEGORY)),
            _ => Self::Other(normalized),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Wedding => "wedding",
            Self::Baptism => "baptism",
            Self::Party => "party",
            Self::Other(value) => value,
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A geographic point produced by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Creates validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if either value is not
    /// finite or lies outside its range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let valid: bool = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(DomainError::InvalidCoordinates {
                latitude: latitude.to_string(),
                longitude: longitude.to_string(),
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A validated login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Validates and wraps a username. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUsername` if the name is empty, too long,
    /// or contains whitespace.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidUsername(String::from(
                "Username cannot be empty",
            )));
        }

        if trimmed.chars().count() > MAX_USERNAME_LEN {
            return Err(DomainError::InvalidUsername(format!(
                "Username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidUsername(String::from(
                "Username cannot contain whitespace",
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validates a display name, returning the trimmed value.
///
/// # Errors
///
/// Returns `DomainError::InvalidDisplayName` if the name is blank or too long.
pub fn validate_display_name(value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();

    if trimmed.is_empty() {
        return Err(DomainError::InvalidDisplayName(String::from(
            "Display name cannot be empty",
        )));
    }

    if trimmed.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(DomainError::InvalidDisplayName(format!(
            "Display name must be at most {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }

    Ok(trimmed.to_string())
}

/// What a user supplies when requesting a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub category: EventCategory,
    pub description: String,
    pub city: String,
    pub address: String,
}

impl EventDetails {
    /// Builds validated event details.
    ///
    /// City and address are required; the description may be empty.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEventDetail` naming the first bad field.
    pub fn new(
        category: &str,
        description: &str,
        city: &str,
        address: &str,
    ) -> Result<Self, DomainError> {
        let city: String = required_text("city", city)?;
        let address: String = required_text("address", address)?;

        let description: String = description.trim().to_string();
        if description.chars().count() > MAX_TEXT_LEN {
            return Err(DomainError::InvalidEventDetail {
                field: "description",
                reason: format!("must be at most {MAX_TEXT_LEN} characters"),
            });
        }

        Ok(Self {
            category: EventCategory::parse(category),
            description,
            city,
            address,
        })
    }

    /// The free-text query handed to the geocoder.
    #[must_use]
    pub fn geocode_query(&self) -> String {
        format!("{}, {}", self.address, self.city)
    }
}

/// Validates a city name, returning the trimmed value.
///
/// # Errors
///
/// Returns `DomainError::InvalidEventDetail` if the city is blank or too long.
pub fn validate_city(value: &str) -> Result<String, DomainError> {
    required_text("city", value)
}

/// Validates the per-person price of a public event.
///
/// # Errors
///
/// Returns `DomainError::InvalidEventDetail` if the price is negative.
pub fn validate_ticket_price(price: i64) -> Result<i64, DomainError> {
    if price < 0 {
        return Err(DomainError::InvalidEventDetail {
            field: "ticket_price",
            reason: String::from("cannot be negative"),
        });
    }
    Ok(price)
}

fn required_text(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidEventDetail {
            field,
            reason: String::from("cannot be empty"),
        });
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(DomainError::InvalidEventDetail {
            field,
            reason: format!("must be at most {MAX_TEXT_LEN} characters"),
        });
    }
    Ok(trimmed.to_string())
}

/// A single entry for an engagement's message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMessage` if the body is blank or too long.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidMessage(String::from(
                "Message cannot be empty",
            )));
        }
        if trimmed.chars().count() > MAX_TEXT_LEN {
            return Err(DomainError::InvalidMessage(format!(
                "Message must be at most {MAX_TEXT_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}
