use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use tracing::trace;

use super::{employee, work_calendar};

/// An employment contract binding an employee to a working-time calendar
/// for a date range. An open-ended contract has `date_end = None`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub calendar_id: i32,
    pub date_start: NaiveDate,
    pub date_end: Option<NaiveDate>,
    #[sea_orm(default_value = "true")]
    pub active: bool,
}

impl Model {
    /// Whether this contract covers the given calendar date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        let covered = date >= self.date_start && self.date_end.map_or(true, |end| date <= end);
        trace!(
            "Contract {} ({} to {:?}) covers {}: {}",
            self.id,
            self.date_start,
            self.date_end,
            date,
            covered
        );
        covered
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "employee::Entity",
        from = "Column::EmployeeId",
        to = "employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "work_calendar::Entity",
        from = "Column::CalendarId",
        to = "work_calendar::Column::Id",
        on_delete = "Cascade"
    )]
    WorkCalendar,
}

impl Related<employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<work_calendar::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkCalendar.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
