use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;
use utoipa::ToSchema;

/// The overtime balance of one employee.
///
/// `accrued_overtime` is the sum of `timesheet_overtime` over the employee's
/// active timesheet sheets whose `date_end` falls on or after
/// `overtime_start_date`; `total_overtime` adds the manually entered
/// `initial_overtime` on top.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct OvertimeSummary {
    pub employee_id: i32,
    /// Manually entered starting balance, in hours.
    pub initial_overtime: f64,
    /// Cutoff date from which sheet overtime is summed.
    pub overtime_start_date: NaiveDate,
    /// Sum of sheet overtime since the start date, in hours.
    pub accrued_overtime: f64,
    /// initial_overtime + accrued_overtime.
    pub total_overtime: f64,
}

impl OvertimeSummary {
    pub fn new(
        employee_id: i32,
        initial_overtime: f64,
        overtime_start_date: NaiveDate,
        accrued_overtime: f64,
    ) -> Self {
        let total_overtime = initial_overtime + accrued_overtime;
        trace!(
            "Overtime summary for employee {}: {} initial + {} accrued = {}",
            employee_id,
            initial_overtime,
            accrued_overtime,
            total_overtime
        );
        Self {
            employee_id,
            initial_overtime,
            overtime_start_date,
            accrued_overtime,
            total_overtime,
        }
    }
}
