use sea_orm_migration::{prelude::*, schema::*};

use crate::entity_iden::EntityIden;
use model::entities::employee;
use model::entities::prelude::Employee;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create work_calendars table
        manager
            .create_table(
                Table::create()
                    .table(WorkCalendars::Table)
                    .if_not_exists()
                    .col(pk_auto(WorkCalendars::Id))
                    .col(string(WorkCalendars::Name))
                    .to_owned(),
            )
            .await?;

        // Create calendar_attendances table
        manager
            .create_table(
                Table::create()
                    .table(CalendarAttendances::Table)
                    .if_not_exists()
                    .col(pk_auto(CalendarAttendances::Id))
                    .col(integer(CalendarAttendances::CalendarId))
                    .col(small_integer(CalendarAttendances::Weekday))
                    .col(double(CalendarAttendances::HourFrom))
                    .col(double(CalendarAttendances::HourTo))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_calendar_attendance_calendar")
                            .from(CalendarAttendances::Table, CalendarAttendances::CalendarId)
                            .to(WorkCalendars::Table, WorkCalendars::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create contracts table. The employees table comes from the initial
        // migration, so reference it through the entity instead of
        // redeclaring its identifiers here.
        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(pk_auto(Contracts::Id))
                    .col(integer(Contracts::EmployeeId))
                    .col(integer(Contracts::CalendarId))
                    .col(date(Contracts::DateStart))
                    .col(date_null(Contracts::DateEnd))
                    .col(boolean(Contracts::Active).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contract_employee")
                            .from(Contracts::Table, Contracts::EmployeeId)
                            .to(Employee::table(), Employee::column(employee::Column::Id))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contract_calendar")
                            .from(Contracts::Table, Contracts::CalendarId)
                            .to(WorkCalendars::Table, WorkCalendars::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Contracts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CalendarAttendances::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(WorkCalendars::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for the tables introduced by this migration

#[derive(DeriveIden)]
enum WorkCalendars {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum CalendarAttendances {
    Table,
    Id,
    CalendarId,
    Weekday,
    HourFrom,
    HourTo,
}

#[derive(DeriveIden)]
enum Contracts {
    Table,
    Id,
    EmployeeId,
    CalendarId,
    DateStart,
    DateEnd,
    Active,
}
