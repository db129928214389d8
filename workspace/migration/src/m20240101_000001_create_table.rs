use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create roles table
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(pk_auto(Roles::Id))
                    .col(string(Roles::Name).unique_key())
                    .col(string_null(Roles::Description))
                    .to_owned(),
            )
            .await?;

        // Create users_roles table (join table)
        manager
            .create_table(
                Table::create()
                    .table(UsersRoles::Table)
                    .if_not_exists()
                    .col(integer(UsersRoles::UserId))
                    .col(integer(UsersRoles::RoleId))
                    .primary_key(
                        Index::create()
                            .name("pk_users_roles")
                            .col(UsersRoles::UserId)
                            .col(UsersRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_roles_user")
                            .from(UsersRoles::Table, UsersRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_roles_role")
                            .from(UsersRoles::Table, UsersRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create employees table
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(pk_auto(Employees::Id))
                    .col(string(Employees::Name))
                    .col(string_null(Employees::Tz))
                    .col(integer_null(Employees::UserId))
                    .col(integer_null(Employees::ParentId))
                    .col(double(Employees::InitialOvertime).default(0.0))
                    .col(date(Employees::OvertimeStartDate))
                    .col(boolean(Employees::Active).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_user")
                            .from(Employees::Table, Employees::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_parent")
                            .from(Employees::Table, Employees::ParentId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create timesheet_sheets table
        manager
            .create_table(
                Table::create()
                    .table(TimesheetSheets::Table)
                    .if_not_exists()
                    .col(pk_auto(TimesheetSheets::Id))
                    .col(integer(TimesheetSheets::EmployeeId))
                    .col(date(TimesheetSheets::DateStart))
                    .col(date(TimesheetSheets::DateEnd))
                    .col(double(TimesheetSheets::TimesheetOvertime).default(0.0))
                    .col(string(TimesheetSheets::State).string_len(10))
                    .col(boolean(TimesheetSheets::Active).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timesheet_sheet_employee")
                            .from(TimesheetSheets::Table, TimesheetSheets::EmployeeId)
                            .to(Employees::Table, Employees::Id)
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
            .drop_table(Table::drop().table(TimesheetSheets::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UsersRoles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum UsersRoles {
    Table,
    UserId,
    RoleId,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    Name,
    Tz,
    UserId,
    ParentId,
    InitialOvertime,
    OvertimeStartDate,
    Active,
}

#[derive(DeriveIden)]
enum TimesheetSheets {
    Table,
    Id,
    EmployeeId,
    DateStart,
    DateEnd,
    TimesheetOvertime,
    State,
    Active,
}
