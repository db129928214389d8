use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DbErr, Set};

use super::setup_db;
use crate::testing::{AssertResult, TestScenario, TestScenarioBuilder};
use model::entities::{employee, timesheet_sheet};

/// The accrual scenario: one employee with an initial carry-over and two
/// sheets, one inside the tracked window and one before it.
pub struct ScenarioAccrual {}

impl ScenarioAccrual {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl TestScenarioBuilder for ScenarioAccrual {
    async fn get_scenario(&self) -> Result<TestScenario, DbErr> {
        let db = setup_db().await?;

        // Overtime tracking starts at the beginning of 2021 with 10 hours
        // carried over from the previous arrangement.
        let tracked = employee::ActiveModel {
            name: Set("Tracked employee".to_string()),
            tz: Set(Some("Europe/Brussels".to_string())),
            initial_overtime: Set(10.0),
            overtime_start_date: Set(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()),
            active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // A sheet ending inside the tracked window; its 5 hours count.
        let _counted_sheet = timesheet_sheet::ActiveModel {
            employee_id: Set(tracked.id),
            date_start: Set(NaiveDate::from_ymd_opt(2021, 2, 23).unwrap()),
            date_end: Set(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()),
            timesheet_overtime: Set(5.0),
            state: Set(timesheet_sheet::SheetState::Done),
            active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // A sheet ending before the start date; its 100 hours must not
        // leak into the total.
        let _stale_sheet = timesheet_sheet::ActiveModel {
            employee_id: Set(tracked.id),
            date_start: Set(NaiveDate::from_ymd_opt(2020, 12, 9).unwrap()),
            date_end: Set(NaiveDate::from_ymd_opt(2020, 12, 15).unwrap()),
            timesheet_overtime: Set(100.0),
            state: Set(timesheet_sheet::SheetState::Done),
            active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // A second employee with no sheets at all; the total is just the
        // carry-over.
        let idle = employee::ActiveModel {
            name: Set("Idle employee".to_string()),
            tz: Set(Some("Europe/Brussels".to_string())),
            initial_overtime: Set(2.5),
            overtime_start_date: Set(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()),
            active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // 10 carried over + 5 accrued = 15; the pre-window sheet is ignored.
        let assert_results: AssertResult = vec![(tracked.id, 15.0), (idle.id, 2.5)];

        // Return the test scenario
        Ok((db, vec![tracked, idle], assert_results))
    }
}
