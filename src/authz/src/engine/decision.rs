//! The decision table shared by the single-item and batch paths

use crate::error::DecisionError;
use crate::grant::BatchResult;
use crate::permission::PermissionLevel;
use crate::types::{Grant, ItemId};
use crate::visibility::Visibility;

/// Result of a batch decision: granted items in `data`, refusals in `errors`
pub type BatchOutcome = BatchResult<Option<Grant>>;

/// Decide whether `requested` is allowed given the resolved grant and the
/// aggregated visibility of the item.
///
/// Returns the justifying grant, or `None` for an implicit public read.
///
/// Rules, in order:
///
/// 1. A grant whose stored permission is not in the lattice is a data fault.
/// 2. A hidden item needs a grant of at least write for any access; a
///    refusal here is keyed on the requested level.
/// 3. Without a grant only a read of a public item succeeds. Every other
///    request is `MemberCannotAccess`, whatever level was asked for.
/// 4. With a grant, the grant level must satisfy the requested level; a
///    refusal is keyed on the requested level.
pub fn evaluate(
    item_id: ItemId,
    grant: Option<Grant>,
    visibility: Visibility,
    requested: PermissionLevel,
) -> Result<Option<Grant>, DecisionError> {
    // The grant may sit on an ancestor; report the fault against the item asked about
    let level = grant
        .as_ref()
        .map(Grant::level)
        .transpose()
        .map_err(|e| match e {
            DecisionError::UnknownPermission { value, .. } => {
                DecisionError::UnknownPermission { item_id, value }
            }
            other => other,
        })?;

    if visibility.is_hidden {
        let floor = visibility.minimum_level_for_any_access();
        if !level.is_some_and(|have| have.satisfies(floor)) {
            return Err(DecisionError::for_level(requested, item_id));
        }
    }

    match (grant, level) {
        (Some(grant), Some(have)) => {
            if have.satisfies(requested) {
                Ok(Some(grant))
            } else {
                Err(DecisionError::for_level(requested, item_id))
            }
        }
        _ => {
            if visibility.grants_implicit_read() && requested == PermissionLevel::Read {
                Ok(None)
            } else {
                Err(DecisionError::MemberCannotAccess { item_id })
            }
        }
    }
}
