// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{Transition, TransitionPlan};
use bandbook_domain::EngagementStatus;

/// Plans how a command changes an engagement currently in `current`.
///
/// The plan carries the precondition the store must re-check in the same
/// statement that performs the write; this function never touches storage.
///
/// # Arguments
///
/// * `current` - The status last observed for the engagement
/// * `command` - The command to apply
///
/// # Returns
///
/// * `Ok(TransitionPlan::Apply)` for a permitted status change
/// * `Ok(TransitionPlan::Remove)` for closing an open slot
/// * `Ok(TransitionPlan::NoOp)` for completing or cancelling an engagement
///   that is already terminal
///
/// # Errors
///
/// Returns `CoreError::InvalidState` if the lifecycle forbids the command
/// from `current`, and `CoreError::Conflict` for `OpenSlot` when an
/// engagement already holds the slot.
pub fn plan_transition(
    current: EngagementStatus,
    command: &Command,
) -> Result<TransitionPlan, CoreError> {
    let action: &'static str = command.name();

    match command {
        Command::OpenSlot { slot, .. } => Err(CoreError::Conflict(format!(
            "An engagement for {slot} already exists and is {current}"
        ))),
        Command::CloseSlot { .. } => {
            if current == EngagementStatus::Open {
                Ok(TransitionPlan::Remove)
            } else {
                Err(CoreError::InvalidState {
                    action,
                    status: current,
                })
            }
        }
        Command::RequestSlot { .. } => {
            step(current, EngagementStatus::Requested, false, action)
        }
        Command::Decide { decision, .. } => {
            step(current, decision.target_status(), true, action)
        }
        Command::Complete { .. } => {
            if current.is_terminal() {
                return Ok(TransitionPlan::NoOp { status: current });
            }
            step(current, EngagementStatus::Completed, false, action)
        }
        Command::Cancel { .. } => {
            if current.is_terminal() {
                return Ok(TransitionPlan::NoOp { status: current });
            }
            step(current, EngagementStatus::Cancelled, false, action)
        }
    }
}

fn step(
    from: EngagementStatus,
    to: EngagementStatus,
    clears_decision: bool,
    action: &'static str,
) -> Result<TransitionPlan, CoreError> {
    from.validate_transition(to)
        .map_err(|_| CoreError::InvalidState {
            action,
            status: from,
        })?;

    Ok(TransitionPlan::Apply(Transition {
        from,
        to,
        clears_decision,
    }))
}

/// Explains a conditional write that affected zero rows.
///
/// The caller re-reads the engagement after the miss and passes what it
/// observed. For `RequestSlot` and `OpenSlot` that is the active
/// engagement at the band's slot; for every other command it is the
/// engagement row itself.
///
/// # Returns
///
/// `Ok(TransitionPlan::NoOp)` when the miss is an idempotent repeat of a
/// terminal transition.
///
/// # Errors
///
/// * `CoreError::NotFound` if nothing was observed
/// * `CoreError::Conflict` if another writer took the slot, or changed the
///   engagement into a state this command would have accepted
/// * `CoreError::InvalidState` if the observed status forbids the command
pub fn classify_miss(
    command: &Command,
    observed: Option<EngagementStatus>,
) -> Result<TransitionPlan, CoreError> {
    let Some(status) = observed else {
        let message: String = match command {
            Command::OpenSlot { slot, .. } | Command::RequestSlot { slot, .. } => {
                format!("No open slot at {slot}")
            }
            Command::CloseSlot { engagement_id }
            | Command::Decide { engagement_id, .. }
            | Command::Complete { engagement_id }
            | Command::Cancel { engagement_id } => {
                format!("Engagement {engagement_id} does not exist")
            }
        };
        return Err(CoreError::NotFound(message));
    };

    if let Command::OpenSlot { slot, .. } | Command::RequestSlot { slot, .. } = command {
        return Err(CoreError::Conflict(format!(
            "The slot at {slot} is already {status}"
        )));
    }

    match plan_transition(status, command)? {
        TransitionPlan::NoOp { status } => Ok(TransitionPlan::NoOp { status }),
        TransitionPlan::Apply(_) | TransitionPlan::Remove => Err(CoreError::Conflict(format!(
            "Engagement changed concurrently and is now {status}; retry"
        ))),
    }
}
