use std::sync::atomic::AtomicU64;

use chrono::{Duration, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use model::entities::{
    calendar_attendance, contract, employee, role, timesheet_sheet, user, user_role, work_calendar,
};

pub type Result<T> = std::result::Result<T, DbErr>;

pub async fn new_user(db: &DatabaseConnection) -> Result<user::Model> {
    static USER_ID: AtomicU64 = AtomicU64::new(0);

    let current_id = USER_ID.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    user::ActiveModel {
        username: Set(format!("user_{}", current_id)),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Links the user to the named role, creating the role row when the database
/// does not carry it yet.
pub async fn grant_role(
    db: &DatabaseConnection,
    user: &user::Model,
    role_name: &str,
) -> Result<user_role::Model> {
    let role = match role::Entity::find()
        .filter(role::Column::Name.eq(role_name))
        .one(db)
        .await?
    {
        Some(role) => role,
        None => {
            role::ActiveModel {
                name: Set(role_name.to_string()),
                description: Set(None),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    user_role::ActiveModel {
        user_id: Set(user.id),
        role_id: Set(role.id),
    }
    .insert(db)
    .await
}

pub async fn new_employee(
    db: &DatabaseConnection,
    user: Option<&user::Model>,
    manager: Option<&employee::Model>,
    initial_overtime: f64,
    overtime_start_date: NaiveDate,
) -> Result<employee::Model> {
    static EMPLOYEE_ID: AtomicU64 = AtomicU64::new(0);

    let current_id = EMPLOYEE_ID.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    employee::ActiveModel {
        name: Set(format!("Test employee {}", current_id)),
        tz: Set(Some("Europe/Brussels".to_string())),
        user_id: Set(user.map(|u| u.id)),
        parent_id: Set(manager.map(|m| m.id)),
        initial_overtime: Set(initial_overtime),
        overtime_start_date: Set(overtime_start_date),
        active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Creates a week-long sheet ending on `date_end`.
pub async fn new_timesheet_sheet(
    db: &DatabaseConnection,
    employee: &employee::Model,
    date_end: NaiveDate,
    timesheet_overtime: f64,
) -> Result<timesheet_sheet::Model> {
    timesheet_sheet::ActiveModel {
        employee_id: Set(employee.id),
        date_start: Set(date_end - Duration::days(6)),
        date_end: Set(date_end),
        timesheet_overtime: Set(timesheet_overtime),
        state: Set(timesheet_sheet::SheetState::Done),
        active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn archive_sheet(
    db: &DatabaseConnection,
    sheet: timesheet_sheet::Model,
) -> Result<timesheet_sheet::Model> {
    let mut archived: timesheet_sheet::ActiveModel = sheet.into();
    archived.active = Set(false);
    archived.update(db).await
}

/// Creates a calendar scheduling `hours_per_day` on Monday through Friday,
/// starting at 09:00.
pub async fn new_weekly_calendar(
    db: &DatabaseConnection,
    hours_per_day: f64,
) -> Result<work_calendar::Model> {
    static CALENDAR_ID: AtomicU64 = AtomicU64::new(0);

    let current_id = CALENDAR_ID.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let calendar = work_calendar::ActiveModel {
        name: Set(format!("Test calendar {}", current_id)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for weekday in 0..5i16 {
        calendar_attendance::ActiveModel {
            calendar_id: Set(calendar.id),
            weekday: Set(weekday),
            hour_from: Set(9.0),
            hour_to: Set(9.0 + hours_per_day),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(calendar)
}

pub async fn new_contract(
    db: &DatabaseConnection,
    employee: &employee::Model,
    calendar: &work_calendar::Model,
    date_start: NaiveDate,
    date_end: Option<NaiveDate>,
) -> Result<contract::Model> {
    contract::ActiveModel {
        employee_id: Set(employee.id),
        calendar_id: Set(calendar.id),
        date_start: Set(date_start),
        date_end: Set(date_end),
        active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
}
