use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DbErr, Set};

use super::setup_db;
use crate::testing::{helpers, AssertResult, TestScenario, TestScenarioBuilder};
use model::entities::employee;

/// The archival scenario: archiving a sheet retroactively removes its hours
/// from the employee's total.
pub struct ScenarioArchivedSheets {}

impl ScenarioArchivedSheets {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl TestScenarioBuilder for ScenarioArchivedSheets {
    async fn get_scenario(&self) -> Result<TestScenario, DbErr> {
        let db = setup_db().await?;

        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let tracked: employee::Model = helpers::new_employee(&db, None, None, 0.0, start).await?;

        // Two live sheets and one that gets archived again.
        helpers::new_timesheet_sheet(
            &db,
            &tracked,
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            5.0,
        )
        .await?;

        // A sheet ending exactly on the start date still counts.
        helpers::new_timesheet_sheet(&db, &tracked, start, 4.0).await?;

        let withdrawn = helpers::new_timesheet_sheet(
            &db,
            &tracked,
            NaiveDate::from_ymd_opt(2021, 4, 5).unwrap(),
            3.0,
        )
        .await?;
        helpers::archive_sheet(&db, withdrawn).await?;

        // 5 + 4 from the live sheets; the archived 3 hours are gone.
        let assert_results: AssertResult = vec![(tracked.id, 9.0)];

        // Return the test scenario
        Ok((db, vec![tracked], assert_results))
    }
}
