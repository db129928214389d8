use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::{contract, timesheet_sheet, user};

/// An employee of the company.
///
/// The overtime configuration lives here: `initial_overtime` seeds the
/// accrued total and `overtime_start_date` is the cutoff from which
/// timesheet sheets are summed. Both are guarded fields; only holders of an
/// elevated HR role may change them to a different value.
///
/// `tz` is the employee's IANA timezone. It is required whenever working
/// hours are computed for the employee; a missing value is surfaced as a
/// configuration error rather than silently defaulting, since a wrong
/// timezone shifts day boundaries.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// IANA timezone identifier, e.g. "Europe/Brussels".
    pub tz: Option<String>,
    /// The user account behind this employee, if any.
    pub user_id: Option<i32>,
    /// The manager's employee record. Self-referencing adjacency that the
    /// hierarchy closure traverses.
    pub parent_id: Option<i32>,
    /// Manually entered starting balance for the overtime total, in hours.
    #[sea_orm(default_value = "0.0")]
    pub initial_overtime: f64,
    /// Cutoff date from which timesheet overtime is summed.
    pub overtime_start_date: NaiveDate,
    #[sea_orm(default_value = "true")]
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Parent,
    #[sea_orm(has_many = "timesheet_sheet::Entity")]
    TimesheetSheet,
    #[sea_orm(has_many = "contract::Entity")]
    Contract,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<timesheet_sheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimesheetSheet.def()
    }
}

impl Related<contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
