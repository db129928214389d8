pub mod contract;

pub use contract::ContractCalendar;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use tracing::{instrument, trace};

use crate::error::{ComputeError, Result};
use model::entities::employee;

/// Source of normal working time for an employee.
///
/// Implementations resolve the employee's schedule (contracts, calendars,
/// whatever the deployment uses) and report one `(date, hours)` pair per
/// working day inside the half-open interval `[start, end)`. The interval
/// boundaries carry the employee's timezone so implementations do not have
/// to re-resolve it.
#[async_trait]
pub trait WorkTimeCalendar: Send + Sync {
    async fn list_normal_work_time_per_day(
        &self,
        db: &DatabaseConnection,
        employee_id: i32,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Vec<(NaiveDate, f64)>>;
}

/// Resolves the employee's IANA timezone.
///
/// A missing or unparseable timezone is a configuration error on the record,
/// not a fallback case: working-hours math in the wrong zone silently shifts
/// day boundaries, so the operation fails instead.
pub fn employee_timezone(employee: &employee::Model) -> Result<Tz> {
    let name = employee.tz.as_deref().ok_or_else(|| {
        ComputeError::Configuration(format!("employee {} has no timezone configured", employee.id))
    })?;

    name.parse::<Tz>().map_err(|_| {
        ComputeError::Configuration(format!(
            "employee {} has an invalid timezone: {}",
            employee.id, name
        ))
    })
}

/// Local midnight of `date` in `tz`.
///
/// `latest()` picks the later instant when a DST fold makes midnight
/// ambiguous. A DST gap that removes midnight entirely has no valid local
/// time, which surfaces as a date error.
fn local_midnight(tz: Tz, date: NaiveDate) -> Result<DateTime<Tz>> {
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(tz)
        .latest()
        .ok_or_else(|| {
            ComputeError::Date(format!("midnight of {} does not exist in timezone {}", date, tz))
        })
}

/// Lists the employee's normal working time per day over an inclusive date
/// range.
///
/// The range is interpreted in the employee's timezone: `start_date` at local
/// midnight up to (excluding) the local midnight after `end_date`. An omitted
/// `end_date` queries the single day `start_date`.
#[instrument(skip(db, calendar, employee), fields(employee_id = employee.id))]
pub async fn list_working_time(
    db: &DatabaseConnection,
    calendar: &dyn WorkTimeCalendar,
    employee: &employee::Model,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<Vec<(NaiveDate, f64)>> {
    let end_date = end_date.unwrap_or(start_date);
    if end_date < start_date {
        return Err(ComputeError::Date(format!(
            "end date {} precedes start date {}",
            end_date, start_date
        )));
    }

    let tz = employee_timezone(employee)?;
    let start = local_midnight(tz, start_date)?;
    let end = local_midnight(tz, end_date + Duration::days(1))?;

    trace!("Listing normal work time in [{}, {})", start, end);
    calendar
        .list_normal_work_time_per_day(db, employee.id, start, end)
        .await
}

/// Total working hours of the employee over an inclusive date range.
///
/// An omitted `end_date` treats the range as the single day `start_date`.
pub async fn get_working_hours(
    db: &DatabaseConnection,
    calendar: &dyn WorkTimeCalendar,
    employee: &employee::Model,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<f64> {
    let work_time = list_working_time(db, calendar, employee, start_date, end_date).await?;
    Ok(work_time.iter().map(|(_, hours)| hours).sum())
}

/// Working hours of the employee for the current day.
///
/// This function uses the provided date as "today" or the local date of the
/// evaluating process if none is provided. The value depends on that date, so
/// it is recomputed on every call and never cached.
pub async fn current_day_working_hours(
    db: &DatabaseConnection,
    calendar: &dyn WorkTimeCalendar,
    employee: &employee::Model,
    today: Option<NaiveDate>,
) -> Result<f64> {
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    get_working_hours(db, calendar, employee, today, None).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee_with_tz(tz: Option<&str>) -> employee::Model {
        employee::Model {
            id: 1,
            name: "Test employee".to_string(),
            tz: tz.map(|v| v.to_string()),
            user_id: None,
            parent_id: None,
            initial_overtime: 0.0,
            overtime_start_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            active: true,
        }
    }

    #[test]
    fn test_employee_timezone_parses_iana_name() {
        let employee = employee_with_tz(Some("Europe/Brussels"));
        let tz = employee_timezone(&employee).expect("Failed to resolve timezone");
        assert_eq!(tz, chrono_tz::Europe::Brussels);
    }

    #[test]
    fn test_employee_timezone_missing_is_configuration_error() {
        let employee = employee_with_tz(None);
        let err = employee_timezone(&employee).unwrap_err();
        assert!(matches!(err, ComputeError::Configuration(_)));
    }

    #[test]
    fn test_employee_timezone_invalid_is_configuration_error() {
        let employee = employee_with_tz(Some("Mars/Olympus_Mons"));
        let err = employee_timezone(&employee).unwrap_err();
        assert!(matches!(err, ComputeError::Configuration(_)));
    }

    #[test]
    fn test_local_midnight_plain_day() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let midnight = local_midnight(chrono_tz::Europe::Brussels, date)
            .expect("Failed to localize midnight");
        assert_eq!(midnight.date_naive(), date);
        assert_eq!(midnight.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_local_midnight_dst_gap_is_date_error() {
        // Brazil's 2018 DST switch skipped midnight: clocks jumped from
        // 23:59:59 on Nov 3 straight to 01:00 on Nov 4.
        let date = NaiveDate::from_ymd_opt(2018, 11, 4).unwrap();
        let err = local_midnight(chrono_tz::America::Sao_Paulo, date).unwrap_err();
        assert!(matches!(err, ComputeError::Date(_)));
    }
}
