pub mod cache;

pub use cache::CachedOvertimeCalculator;

use chrono::{Datelike, Local, NaiveDate};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{debug, instrument};

use crate::error::Result;
use common::OvertimeSummary;
use model::entities::{employee, timesheet_sheet};

/// January 1 of the current year, the default `overtime_start_date` for new
/// employees.
///
/// This function uses the provided date as "today" or the local date of the
/// evaluating process if none is provided.
pub fn default_overtime_start_date(today: Option<NaiveDate>) -> NaiveDate {
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap()
}

/// Overtime accrued on timesheet sheets since the employee's overtime start
/// date.
///
/// Counts every active sheet of the employee whose `date_end` falls on or
/// after `overtime_start_date`; sheets ending the day the tracking starts are
/// included. Archived sheets are excluded, which is what lets an archival
/// retroactively change the total.
#[instrument(skip(db, employee), fields(employee_id = employee.id))]
pub async fn accrued_overtime(db: &DatabaseConnection, employee: &employee::Model) -> Result<f64> {
    let sheets = timesheet_sheet::Entity::find()
        .filter(timesheet_sheet::Column::EmployeeId.eq(employee.id))
        .filter(timesheet_sheet::Column::DateEnd.gte(employee.overtime_start_date))
        .filter(timesheet_sheet::Column::Active.eq(true))
        .all(db)
        .await?;

    let accrued: f64 = sheets.iter().map(|sheet| sheet.timesheet_overtime).sum();
    debug!(
        "Employee {} accrued {} overtime hours over {} sheets since {}",
        employee.id,
        accrued,
        sheets.len(),
        employee.overtime_start_date
    );
    Ok(accrued)
}

/// Total overtime of the employee: the initial carry-over plus everything
/// accrued since the overtime start date.
pub async fn total_overtime(db: &DatabaseConnection, employee: &employee::Model) -> Result<f64> {
    let accrued = accrued_overtime(db, employee).await?;
    Ok(employee.initial_overtime + accrued)
}

/// Builds the transport summary of the employee's overtime state.
pub async fn overtime_summary(
    db: &DatabaseConnection,
    employee: &employee::Model,
) -> Result<OvertimeSummary> {
    let accrued = accrued_overtime(db, employee).await?;
    Ok(OvertimeSummary::new(
        employee.id,
        employee.initial_overtime,
        employee.overtime_start_date,
        accrued,
    ))
}
