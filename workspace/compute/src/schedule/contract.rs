use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{debug, trace};

use super::WorkTimeCalendar;
use crate::error::Result;
use model::entities::{calendar_attendance, contract};

/// Working-time source backed by the employee's contracts.
///
/// Each active contract links the employee to a work calendar, and the
/// calendar schedules weekly attendance spans. For every date in the queried
/// interval the first active contract covering that date picks the calendar;
/// the day's hours are the calendar's summed spans for that weekday. Dates no
/// contract covers are skipped, as are weekdays the calendar leaves empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractCalendar;

impl ContractCalendar {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkTimeCalendar for ContractCalendar {
    async fn list_normal_work_time_per_day(
        &self,
        db: &DatabaseConnection,
        employee_id: i32,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        let contracts = contract::Entity::find()
            .filter(contract::Column::EmployeeId.eq(employee_id))
            .filter(contract::Column::Active.eq(true))
            .all(db)
            .await?;

        if contracts.is_empty() {
            debug!("Employee {} has no active contract", employee_id);
            return Ok(Vec::new());
        }

        let calendar_ids: Vec<i32> = contracts.iter().map(|c| c.calendar_id).collect();
        let attendances = calendar_attendance::Entity::find()
            .filter(calendar_attendance::Column::CalendarId.is_in(calendar_ids))
            .all(db)
            .await?;

        // Summed span hours per (calendar, weekday), weekday 0 = Monday.
        let mut weekday_hours: HashMap<(i32, i16), f64> = HashMap::new();
        for attendance in &attendances {
            *weekday_hours
                .entry((attendance.calendar_id, attendance.weekday))
                .or_insert(0.0) += attendance.hour_to - attendance.hour_from;
        }

        let mut work_time = Vec::new();
        let mut date = start.date_naive();
        let end_date = end.date_naive();
        while date < end_date {
            if let Some(active) = contracts.iter().find(|c| c.covers(date)) {
                let weekday = date.weekday().num_days_from_monday() as i16;
                if let Some(hours) = weekday_hours.get(&(active.calendar_id, weekday)) {
                    work_time.push((date, *hours));
                }
            }
            date += Duration::days(1);
        }

        trace!(
            "Employee {} has {} scheduled days in the queried interval",
            employee_id,
            work_time.len()
        );
        Ok(work_time)
    }
}
