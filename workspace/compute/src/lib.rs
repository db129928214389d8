pub mod access;
pub mod error;
pub mod guard;
pub mod overtime;
pub mod schedule;

#[cfg(test)]
pub mod testing;

use schedule::ContractCalendar;

/// Returns the default working-time source that will be used most of the time.
///
/// It resolves schedules from the employees' stored contracts and work
/// calendars, which is the configuration the HTTP service runs with.
pub fn default_calendar() -> ContractCalendar {
    ContractCalendar::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use overtime::CachedOvertimeCalculator;
    use testing::{helpers, setup_db, ScenarioAccrual, TestScenarioBuilder};
    use tokio;

    /// Test that the default calendar resolves hours from stored contracts.
    #[tokio::test]
    async fn test_default_calendar_reads_contracts() {
        let db = setup_db().await.expect("Failed to set up database");
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let employee = helpers::new_employee(&db, None, None, 0.0, start)
            .await
            .expect("Failed to create employee");
        let calendar = helpers::new_weekly_calendar(&db, 8.0)
            .await
            .expect("Failed to create calendar");
        helpers::new_contract(&db, &employee, &calendar, start, None)
            .await
            .expect("Failed to create contract");

        let hours = schedule::get_working_hours(
            &db,
            &default_calendar(),
            &employee,
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            Some(NaiveDate::from_ymd_opt(2021, 3, 7).unwrap()),
        )
        .await
        .expect("Failed to compute working hours");

        assert_eq!(hours, 40.0);
    }

    /// Test that the cached calculator agrees with the direct aggregation.
    #[tokio::test]
    async fn test_cached_calculator_matches_direct_totals() {
        let scenario = ScenarioAccrual::new();
        let (db, employees, assert_result) = scenario
            .get_scenario()
            .await
            .expect("Failed to build scenario");

        let calculator = CachedOvertimeCalculator::with_defaults();
        for (employee_id, expected) in assert_result {
            let employee = employees
                .iter()
                .find(|e| e.id == employee_id)
                .expect("Scenario asserts an unknown employee");

            let direct = overtime::total_overtime(&db, employee)
                .await
                .expect("Failed to compute total");
            let cached = calculator
                .total_overtime(&db, employee)
                .await
                .expect("Failed to compute cached total");

            assert_eq!(direct, cached);
            assert!((cached - expected).abs() < 1e-9);
        }
    }
}
