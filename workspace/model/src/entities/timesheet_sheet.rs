use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::employee;

/// Review state of a timesheet sheet.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum SheetState {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "done")]
    Done,
}

/// A timesheet sheet covering one period of an employee's work.
///
/// `timesheet_overtime` is the pre-computed overtime balance of the sheet in
/// hours; the employee's total overtime sums it over all active sheets whose
/// `date_end` falls on or after the employee's overtime start date. Archived
/// sheets (`active = false`) drop out of that sum.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "timesheet_sheets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// Overtime balance of this sheet, in hours.
    #[sea_orm(default_value = "0.0")]
    pub timesheet_overtime: f64,
    pub state: SheetState,
    #[sea_orm(default_value = "true")]
    pub active: bool,
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
}

impl Related<employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
