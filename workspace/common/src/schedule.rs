use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;
use utoipa::ToSchema;

/// Normal working time of a single day, in hours.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DayWorkTime {
    pub date: NaiveDate,
    pub hours: f64,
}

/// Working hours of an employee over an inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct WorkingHoursReport {
    pub employee_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Sum over `days`, in hours.
    pub total_hours: f64,
    pub days: Vec<DayWorkTime>,
}

impl WorkingHoursReport {
    /// Builds a report from the `(date, hours)` pairs returned by the
    /// working-time calendar, totalling them on the way.
    pub fn new(
        employee_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        work_time_per_day: Vec<(NaiveDate, f64)>,
    ) -> Self {
        let days: Vec<DayWorkTime> = work_time_per_day
            .into_iter()
            .map(|(date, hours)| DayWorkTime { date, hours })
            .collect();
        let total_hours: f64 = days.iter().map(|day| day.hours).sum();
        trace!(
            "Working hours report for employee {}: {} hours over {} days",
            employee_id,
            total_hours,
            days.len()
        );

        Self {
            employee_id,
            start_date,
            end_date,
            total_hours,
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_totals_day_hours() {
        let monday = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2021, 3, 2).unwrap();
        let report =
            WorkingHoursReport::new(3, monday, tuesday, vec![(monday, 8.0), (tuesday, 7.6)]);

        assert_eq!(report.days.len(), 2);
        assert!((report.total_hours - 15.6).abs() < 1e-9);
    }

    #[test]
    fn empty_range_totals_zero() {
        let day = NaiveDate::from_ymd_opt(2021, 3, 6).unwrap();
        let report = WorkingHoursReport::new(3, day, day, vec![]);
        assert_eq!(report.total_hours, 0.0);
        assert!(report.days.is_empty());
    }
}
