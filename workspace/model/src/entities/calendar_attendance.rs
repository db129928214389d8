use sea_orm::entity::prelude::*;

use super::work_calendar;

/// One working-time span within a calendar's week.
/// `weekday` is 0 for Monday through 6 for Sunday; the span contributes
/// `hour_to - hour_from` hours to that weekday's normal work time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "calendar_attendances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub calendar_id: i32,
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: i16,
    pub hour_from: f64,
    pub hour_to: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "work_calendar::Entity",
        from = "Column::CalendarId",
        to = "work_calendar::Column::Id",
        on_delete = "Cascade"
    )]
    WorkCalendar,
}

impl Related<work_calendar::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkCalendar.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
