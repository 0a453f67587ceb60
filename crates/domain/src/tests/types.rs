// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use crate::{
    Coordinates, DomainError, EventCategory, EventDetails, MAX_TEXT_LEN, MessageBody,
    PrincipalKind, Role, Username, validate_city, validate_display_name, validate_ticket_price,
};

#[test]
fn test_category_parsing_is_case_insensitive() {
    assert_eq!(EventCategory::parse("Wedding"), EventCategory::Wedding);
    assert_eq!(EventCategory::parse(" BAPTISM "), EventCategory::Baptism);
    assert_eq!(EventCategory::parse("party"), EventCategory::Party);
}

#[test]
fn test_unknown_category_is_kept() {
    let category: EventCategory = EventCategory::parse("Corporate Gala");
    assert_eq!(
        category,
        EventCategory::Other(String::from("corporate gala"))
    );
    assert_eq!(category.as_str(), "corporate gala");
}

#[test]
fn test_blank_category_defaults_to_other() {
    assert_eq!(
        EventCategory::parse(""),
        EventCategory::Other(String::from("other"))
    );
    assert_eq!(EventCategory::parse("   ").as_str(), "other");
}

#[test]
fn test_role_and_kind_parsing() {
    assert_eq!(Role::from_str("band"), Ok(Role::Band));
    assert_eq!(Role::from_str("USER"), Ok(Role::User));
    assert!(Role::from_str("admin").is_err());

    assert_eq!(PrincipalKind::from_str("admin"), Ok(PrincipalKind::Admin));
    assert_eq!(Role::Band.principal_kind(), PrincipalKind::Band);
    assert_eq!(Role::User.principal_kind(), PrincipalKind::User);
}

#[test]
fn test_username_validation() {
    assert_eq!(Username::new("  the_band ").unwrap().value(), "the_band");
    assert!(matches!(
        Username::new("   "),
        Err(DomainError::InvalidUsername(_))
    ));
    assert!(matches!(
        Username::new("two words"),
        Err(DomainError::InvalidUsername(_))
    ));
    assert!(Username::new(&"x".repeat(65)).is_err());
}

#[test]
fn test_display_name_validation() {
    assert_eq!(validate_display_name(" The Band ").unwrap(), "The Band");
    assert!(validate_display_name("").is_err());
}

#[test]
fn test_event_details_require_city_and_address() {
    let details: EventDetails =
        EventDetails::new("wedding", "", "Athens", "Ermou 1").unwrap();
    assert_eq!(details.category, EventCategory::Wedding);
    assert_eq!(details.geocode_query(), "Ermou 1, Athens");

    let err: DomainError = EventDetails::new("party", "fun", " ", "Ermou 1").unwrap_err();
    assert_eq!(
        err,
        DomainError::InvalidEventDetail {
            field: "city",
            reason: String::from("cannot be empty"),
        }
    );

    assert!(EventDetails::new("party", "fun", "Athens", "").is_err());
    assert!(EventDetails::new("party", &"d".repeat(MAX_TEXT_LEN + 1), "Athens", "Ermou 1").is_err());
}

#[test]
fn test_coordinates_range() {
    let point: Coordinates = Coordinates::new(37.97, 23.72).unwrap();
    assert!((point.latitude() - 37.97).abs() < f64::EPSILON);
    assert!((point.longitude() - 23.72).abs() < f64::EPSILON);

    assert!(Coordinates::new(91.0, 0.0).is_err());
    assert!(Coordinates::new(0.0, -180.5).is_err());
    assert!(Coordinates::new(f64::NAN, 0.0).is_err());
}

#[test]
fn test_message_body() {
    assert_eq!(MessageBody::new(" hello ").unwrap().value(), "hello");
    assert!(MessageBody::new("").is_err());
}

#[test]
fn test_city_and_ticket_price() {
    assert_eq!(validate_city("  Porto ").unwrap(), "Porto");
    assert!(matches!(
        validate_city(" "),
        Err(DomainError::InvalidEventDetail { field: "city", .. })
    ));

    assert_eq!(validate_ticket_price(0), Ok(0));
    assert_eq!(validate_ticket_price(15), Ok(15));
    assert!(matches!(
        validate_ticket_price(-1),
        Err(DomainError::InvalidEventDetail {
            field: "ticket_price",
            ..
        })
    ));
}
