// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for engagement messages, history and the accounting summary.

use super::helpers::{
    action, create_confirmed_engagement, create_requested_engagement, create_test_admin,
    register, setup_test_persistence,
};
use crate::{
    AccountingSummaryResponse, ApiError, Credentials, MessageHistoryResponse,
    ParticipantRequest, SendMessageRequest, StatusCount, accounting_summary, complete,
    engagement_history, message_history, send_message,
};

fn say(role: &str, credentials: &Credentials, body: &str) -> SendMessageRequest {
    SendMessageRequest {
        role: role.to_string(),
        credentials: credentials.clone(),
        body: body.to_string(),
    }
}

fn as_party(role: &str, credentials: &Credentials) -> ParticipantRequest {
    ParticipantRequest {
        role: role.to_string(),
        credentials: credentials.clone(),
    }
}

#[test]
fn test_both_parties_exchange_messages() {
    let mut persistence = setup_test_persistence();
    let booked = create_requested_engagement(&mut persistence);
    let id: i64 = booked.engagement_id;

    send_message(&mut persistence, id, &say("user", &booked.user, "Can you play at 9?")).unwrap();
    send_message(&mut persistence, id, &say("band", &booked.band, "  Yes.  ")).unwrap();

    let history: MessageHistoryResponse =
        message_history(&mut persistence, id, &as_party("user", &booked.user)).unwrap();

    let lines: Vec<(&str, &str, &str)> = history
        .messages
        .iter()
        .map(|m| (m.sender_role.as_str(), m.sender.as_str(), m.body.as_str()))
        .collect();
    assert_eq!(
        lines,
        vec![
            ("user", "the-user", "Can you play at 9?"),
            ("band", "the-band", "Yes."),
        ]
    );
}

#[test]
fn test_outsider_cannot_message_or_read() {
    let mut persistence = setup_test_persistence();
    let booked = create_requested_engagement(&mut persistence);
    let outsider: Credentials = register(&mut persistence, "user", "outsider");
    let id: i64 = booked.engagement_id;

    assert!(matches!(
        send_message(&mut persistence, id, &say("user", &outsider, "hello")),
        Err(ApiError::Forbidden { .. })
    ));
    assert!(matches!(
        message_history(&mut persistence, id, &as_party("user", &outsider)),
        Err(ApiError::Forbidden { .. })
    ));
    assert!(matches!(
        engagement_history(&mut persistence, id, &as_party("user", &outsider)),
        Err(ApiError::Forbidden { .. })
    ));
    assert!(persistence.message_history(id).unwrap().is_empty());
}

#[test]
fn test_blank_message_is_invalid_input() {
    let mut persistence = setup_test_persistence();
    let booked = create_requested_engagement(&mut persistence);

    assert!(matches!(
        send_message(
            &mut persistence,
            booked.engagement_id,
            &say("band", &booked.band, "   ")
        ),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "body"
    ));
}

#[test]
fn test_message_on_missing_engagement_is_not_found() {
    let mut persistence = setup_test_persistence();
    let user: Credentials = register(&mut persistence, "user", "the-user");

    assert!(matches!(
        send_message(&mut persistence, 77, &say("user", &user, "anyone?")),
        Err(ApiError::NotFound { .. })
    ));
}

#[test]
fn test_engagement_history_for_participant() {
    let mut persistence = setup_test_persistence();
    let booked = create_confirmed_engagement(&mut persistence);

    let history = engagement_history(
        &mut persistence,
        booked.engagement_id,
        &as_party("band", &booked.band),
    )
    .unwrap();

    let statuses: Vec<&str> = history
        .entries
        .iter()
        .map(|e| e.new_status.as_str())
        .collect();
    assert_eq!(statuses, vec!["open", "requested", "confirmed"]);
}

#[test]
fn test_accounting_summary_requires_admin() {
    let mut persistence = setup_test_persistence();
    let booked = create_requested_engagement(&mut persistence);

    assert!(matches!(
        accounting_summary(&mut persistence, &booked.band),
        Err(ApiError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_accounting_summary_after_completion() {
    let mut persistence = setup_test_persistence();
    let booked = create_confirmed_engagement(&mut persistence);
    let admin: Credentials = create_test_admin(&mut persistence);
    complete(&mut persistence, booked.engagement_id, &action("admin", &admin)).unwrap();

    let summary: AccountingSummaryResponse =
        accounting_summary(&mut persistence, &admin).unwrap();

    assert_eq!(summary.completed_revenue, 2000);
    assert_eq!(
        summary.status_counts,
        vec![StatusCount {
            status: String::from("completed"),
            count: 1
        }]
    );
    assert_eq!(summary.category_counts.len(), 1);
    assert_eq!(summary.category_counts[0].category, "wedding");
}
