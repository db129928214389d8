use sea_orm::entity::prelude::*;

/// A weekly working-time calendar, e.g. "Standard 38h week".
/// The per-weekday hours live in `calendar_attendance` rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "work_calendars")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::calendar_attendance::Entity")]
    CalendarAttendance,
    #[sea_orm(has_many = "super::contract::Entity")]
    Contract,
}

impl Related<super::calendar_attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CalendarAttendance.def()
    }
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
