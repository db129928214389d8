pub mod helpers;
pub mod scenario_accrual;
pub mod scenario_archived_sheets;

pub use scenario_accrual::ScenarioAccrual;
pub use scenario_archived_sheets::ScenarioArchivedSheets;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};

use crate::error::Result as ComputeResult;
use crate::overtime;
use migration::{Migrator, MigratorTrait};
use model::entities::employee;

pub async fn setup_db() -> Result<DatabaseConnection, DbErr> {
    // Connect to the SQLite database
    let db = Database::connect("sqlite::memory:").await?;

    // Enable foreign keys
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

    // Try to apply migrations first
    Migrator::up(&db, None).await.expect("Migrations failed.");
    Ok(db)
}

/// Type representing the expected result of a test scenario,
/// in the following schema (employee_id, expected total overtime).
pub type AssertResult = Vec<(i32, f64)>;

/// Prepared test scenario.
pub type TestScenario = (DatabaseConnection, Vec<employee::Model>, AssertResult);

/// Trait for building test scenarios.
#[async_trait]
pub trait TestScenarioBuilder {
    async fn get_scenario(&self) -> Result<TestScenario, DbErr>;
}

pub async fn run_and_assert_scenario(builder: &dyn TestScenarioBuilder) -> ComputeResult<()> {
    let (db, employees, assert_result) = builder.get_scenario().await?;

    for (employee_id, expected) in assert_result {
        let employee = employees
            .iter()
            .find(|e| e.id == employee_id)
            .unwrap_or_else(|| panic!("Scenario asserts an unknown employee {}", employee_id));

        let total = overtime::total_overtime(&db, employee).await?;
        assert!(
            (total - expected).abs() < 1e-9,
            "employee {}: expected total overtime {}, got {}",
            employee_id,
            expected,
            total
        );
    }

    Ok(())
}
