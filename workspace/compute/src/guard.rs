use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{instrument, warn};

use crate::access::has_overtime_write_access;
use crate::error::{ComputeError, Result};
use model::entities::employee;

/// Message returned when a guarded overtime field would change without the
/// elevated HR roles.
pub const PROTECTED_FIELD_MESSAGE: &str = "You do not have the permission to modify this field.";

/// Requested changes to the guarded overtime configuration fields.
///
/// A `None` field is absent from the update. A present field carrying the
/// stored value counts as unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct OvertimeConfigUpdate {
    pub initial_overtime: Option<f64>,
    pub overtime_start_date: Option<NaiveDate>,
}

impl OvertimeConfigUpdate {
    /// Whether applying the update would change the stored configuration.
    pub fn changes(&self, stored: &employee::Model) -> bool {
        self.initial_overtime
            .is_some_and(|value| value != stored.initial_overtime)
            || self
                .overtime_start_date
                .is_some_and(|value| value != stored.overtime_start_date)
    }
}

/// Enforces the write guard on `initial_overtime` and `overtime_start_date`.
///
/// An update that would change either stored value needs one of the elevated
/// HR roles; without it the whole update is rejected so nothing is persisted.
/// Updates that leave both values untouched pass for any actor, including
/// ones that merely re-send the stored values.
#[instrument(skip(db, stored, update), fields(employee_id = stored.id))]
pub async fn check_overtime_update(
    db: &DatabaseConnection,
    acting_user_id: i32,
    stored: &employee::Model,
    update: &OvertimeConfigUpdate,
) -> Result<()> {
    if !update.changes(stored) {
        return Ok(());
    }

    if has_overtime_write_access(db, acting_user_id).await? {
        return Ok(());
    }

    warn!(
        "User {} attempted to modify the overtime configuration of employee {}",
        acting_user_id, stored.id
    );
    Err(ComputeError::AccessDenied(PROTECTED_FIELD_MESSAGE.to_string()))
}
