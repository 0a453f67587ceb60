// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Walks an engagement through the booking lifecycle using only plans,
//! the way the persistence layer applies them.

use crate::tests::helpers::{BAND_ID, ENGAGEMENT_ID, USER_ID, complete, decide, request_slot};
use crate::{CoreError, EngagementSnapshot, TransitionPlan, plan_transition};
use bandbook_domain::{Decision, EngagementStatus, Role};

fn apply(snapshot: &mut EngagementSnapshot, plan: TransitionPlan) {
    if let TransitionPlan::Apply(transition) = plan {
        assert_eq!(snapshot.status, transition.from);
        snapshot.status = transition.to;
    }
}

#[test]
fn test_confirmed_engagement_rejects_second_decision() {
    let mut snapshot: EngagementSnapshot = EngagementSnapshot {
        engagement_id: ENGAGEMENT_ID,
        band_id: BAND_ID,
        user_id: None,
        status: EngagementStatus::Open,
    };

    let plan: TransitionPlan = plan_transition(snapshot.status, &request_slot()).unwrap();
    apply(&mut snapshot, plan);
    snapshot.user_id = Some(USER_ID);
    assert_eq!(snapshot.status, EngagementStatus::Requested);

    let plan: TransitionPlan =
        plan_transition(snapshot.status, &decide(Decision::Confirmed)).unwrap();
    apply(&mut snapshot, plan);
    assert_eq!(snapshot.status, EngagementStatus::Confirmed);

    let second: Result<TransitionPlan, CoreError> =
        plan_transition(snapshot.status, &decide(Decision::Rejected));
    assert_eq!(
        second,
        Err(CoreError::InvalidState {
            action: "decide",
            status: EngagementStatus::Confirmed,
        })
    );

    let plan: TransitionPlan = plan_transition(snapshot.status, &complete()).unwrap();
    apply(&mut snapshot, plan);
    assert_eq!(snapshot.status, EngagementStatus::Completed);

    assert_eq!(
        plan_transition(snapshot.status, &complete()),
        Ok(TransitionPlan::NoOp {
            status: EngagementStatus::Completed
        })
    );
}

#[test]
fn test_rejected_engagement_cannot_be_requested_or_redecided() {
    let status: EngagementStatus = EngagementStatus::Rejected;

    assert!(plan_transition(status, &request_slot()).is_err());
    assert!(plan_transition(status, &decide(Decision::Confirmed)).is_err());
    assert!(plan_transition(status, &decide(Decision::Rejected)).is_err());
}

#[test]
fn test_party_matching() {
    let open: EngagementSnapshot = EngagementSnapshot {
        engagement_id: ENGAGEMENT_ID,
        band_id: BAND_ID,
        user_id: None,
        status: EngagementStatus::Open,
    };
    assert!(open.is_party(BAND_ID, Role::Band));
    assert!(!open.is_party(USER_ID, Role::User));
    assert!(!open.is_party(BAND_ID, Role::User));

    let requested: EngagementSnapshot = EngagementSnapshot {
        user_id: Some(USER_ID),
        status: EngagementStatus::Requested,
        ..open
    };
    assert!(requested.is_party(USER_ID, Role::User));
    assert!(!requested.is_party(USER_ID, Role::Band));
    assert!(!requested.is_party(99, Role::Band));
}
