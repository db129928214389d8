//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the HR overtime tracking application here.
//! The structure mirrors the HR domain (employees, timesheet sheets,
//! working-time calendars and contracts) adapted for Rust's type system and
//! the SeaORM framework.

pub mod calendar_attendance;
pub mod contract;
pub mod employee;
pub mod role;
pub mod timesheet_sheet;
pub mod user;
pub mod user_role;
pub mod work_calendar;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::calendar_attendance::Entity as CalendarAttendance;
    pub use super::contract::Entity as Contract;
    pub use super::employee::Entity as Employee;
    pub use super::role::Entity as Role;
    pub use super::timesheet_sheet::Entity as TimesheetSheet;
    pub use super::user::Entity as User;
    pub use super::user_role::Entity as UserRole;
    pub use super::work_calendar::Entity as WorkCalendar;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        // Setup database
        let db = setup_db().await?;

        // Create users
        let user1 = user::ActiveModel {
            username: Set("alice".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let user2 = user::ActiveModel {
            username: Set("bob".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create roles and grant one to alice
        let hr_user_role = role::ActiveModel {
            name: Set("hr_user".to_string()),
            description: Set(Some("HR officer".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let hr_manager_role = role::ActiveModel {
            name: Set("hr_manager".to_string()),
            description: Set(Some("HR manager".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let grant = user_role::ActiveModel {
            user_id: Set(user1.id),
            role_id: Set(hr_user_role.id),
        }
        .insert(&db)
        .await?;

        // Create a manager and a subordinate employee
        let manager = employee::ActiveModel {
            name: Set("Alice Manager".to_string()),
            tz: Set(Some("Europe/Brussels".to_string())),
            user_id: Set(Some(user1.id)),
            parent_id: Set(None),
            initial_overtime: Set(0.0),
            overtime_start_date: Set(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()),
            active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let worker = employee::ActiveModel {
            name: Set("Bob Worker".to_string()),
            tz: Set(Some("Europe/Brussels".to_string())),
            user_id: Set(Some(user2.id)),
            parent_id: Set(Some(manager.id)),
            initial_overtime: Set(10.0),
            overtime_start_date: Set(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()),
            active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create timesheet sheets for the worker
        let sheet1 = timesheet_sheet::ActiveModel {
            employee_id: Set(worker.id),
            date_start: Set(NaiveDate::from_ymd_opt(2021, 2, 22).unwrap()),
            date_end: Set(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()),
            timesheet_overtime: Set(5.0),
            state: Set(timesheet_sheet::SheetState::Done),
            active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let sheet2 = timesheet_sheet::ActiveModel {
            employee_id: Set(worker.id),
            date_start: Set(NaiveDate::from_ymd_opt(2020, 12, 7).unwrap()),
            date_end: Set(NaiveDate::from_ymd_opt(2020, 12, 15).unwrap()),
            timesheet_overtime: Set(100.0),
            state: Set(timesheet_sheet::SheetState::Done),
            active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a working-time calendar with 8h spans Monday to Friday
        let calendar = work_calendar::ActiveModel {
            name: Set("Standard 40h week".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        for weekday in 0..5i16 {
            calendar_attendance::ActiveModel {
                calendar_id: Set(calendar.id),
                weekday: Set(weekday),
                hour_from: Set(9.0),
                hour_to: Set(17.0),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }

        // Bind the worker to the calendar with an open-ended contract
        let contract = contract::ActiveModel {
            employee_id: Set(worker.id),
            calendar_id: Set(calendar.id),
            date_start: Set(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
            date_end: Set(None),
            active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data

        // Verify users
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.username == "alice"));
        assert!(users.iter().any(|u| u.username == "bob"));

        // Verify roles and the grant
        let roles = Role::find().all(&db).await?;
        assert_eq!(roles.len(), 2);
        assert!(roles.iter().any(|r| r.name == "hr_user"));
        assert!(roles.iter().any(|r| r.name == "hr_manager"));
        assert_eq!(hr_manager_role.name, "hr_manager");

        let grants = UserRole::find().all(&db).await?;
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].user_id, grant.user_id);
        assert_eq!(grants[0].role_id, hr_user_role.id);

        // Verify employees and the hierarchy adjacency
        let employees = Employee::find().all(&db).await?;
        assert_eq!(employees.len(), 2);
        assert!(employees.iter().any(|e| e.name == "Alice Manager"));

        let subordinates = Employee::find()
            .filter(employee::Column::ParentId.eq(manager.id))
            .all(&db)
            .await?;
        assert_eq!(subordinates.len(), 1);
        assert_eq!(subordinates[0].id, worker.id);

        // Verify sheets and the date_end filter used by the overtime sum
        let sheets = TimesheetSheet::find().all(&db).await?;
        assert_eq!(sheets.len(), 2);
        assert!(sheets.iter().any(|s| s.id == sheet1.id));
        assert!(sheets.iter().any(|s| s.id == sheet2.id));

        let sheets_since_start = TimesheetSheet::find()
            .filter(timesheet_sheet::Column::EmployeeId.eq(worker.id))
            .filter(
                timesheet_sheet::Column::DateEnd
                    .gte(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()),
            )
            .all(&db)
            .await?;
        assert_eq!(sheets_since_start.len(), 1);
        assert_eq!(sheets_since_start[0].timesheet_overtime, 5.0);

        // Verify calendar, attendances and the contract coverage helper
        let calendars = WorkCalendar::find().all(&db).await?;
        assert_eq!(calendars.len(), 1);

        let attendances = CalendarAttendance::find()
            .filter(calendar_attendance::Column::CalendarId.eq(calendar.id))
            .all(&db)
            .await?;
        assert_eq!(attendances.len(), 5);
        assert!(attendances.iter().all(|a| a.hour_to - a.hour_from == 8.0));

        let contracts = Contract::find().all(&db).await?;
        assert_eq!(contracts.len(), 1);
        assert!(contracts[0].covers(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()));
        assert!(!contracts[0].covers(NaiveDate::from_ymd_opt(2019, 12, 31).unwrap()));
        assert_eq!(contracts[0].id, contract.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_employee_user_link_set_null_on_user_delete() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let user = user::ActiveModel {
            username: Set("carol".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let employee = employee::ActiveModel {
            name: Set("Carol".to_string()),
            tz: Set(None),
            user_id: Set(Some(user.id)),
            parent_id: Set(None),
            initial_overtime: Set(0.0),
            overtime_start_date: Set(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()),
            active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        User::delete_by_id(user.id).exec(&db).await?;

        let reloaded = Employee::find_by_id(employee.id)
            .one(&db)
            .await?
            .expect("employee should survive user deletion");
        assert_eq!(reloaded.user_id, None);

        Ok(())
    }
}
