use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::{debug, error, info, trace};

use compute::access::OVERTIME_WRITE_ACCESS_ROLES;
use model::entities::role;

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    trace!("Attempting to connect to database");
    let db: DatabaseConnection = match Database::connect(database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            debug!("Database connection established");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    info!("Running database migrations");
    trace!("Executing migration up command");
    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Database migrations completed successfully");
            debug!("All pending migrations have been applied");
        }
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            return Err(e.into());
        }
    }

    info!("Seeding HR roles");
    trace!("Ensuring the elevated role rows exist");
    match seed_roles(&db).await {
        Ok(created) if created > 0 => {
            info!("Seeded {} HR roles", created);
        }
        Ok(_) => {
            debug!("HR roles already present");
        }
        Err(e) => {
            error!("Failed to seed HR roles: {}", e);
            return Err(e.into());
        }
    }

    info!("Database initialization completed successfully!");
    trace!("init_database function completed");

    Ok(())
}

/// Inserts the elevated HR roles that are still missing. Safe to run
/// repeatedly.
async fn seed_roles(db: &DatabaseConnection) -> Result<usize, sea_orm::DbErr> {
    let mut created = 0;
    for role_name in OVERTIME_WRITE_ACCESS_ROLES {
        let existing = role::Entity::find()
            .filter(role::Column::Name.eq(role_name))
            .one(db)
            .await?;

        if existing.is_none() {
            role::ActiveModel {
                name: Set(role_name.to_string()),
                description: Set(None),
                ..Default::default()
            }
            .insert(db)
            .await?;
            created += 1;
        }
    }
    Ok(created)
}
