use std::collections::HashSet;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{instrument, trace};

use crate::error::Result;
use model::entities::{employee, role, user_role};

/// Role names whose members may edit the overtime configuration fields.
pub const OVERTIME_WRITE_ACCESS_ROLES: [&str; 2] = ["hr_user", "hr_manager"];

/// Whether the user holds any of the elevated HR roles.
#[instrument(skip(db))]
pub async fn has_overtime_write_access(db: &DatabaseConnection, user_id: i32) -> Result<bool> {
    let role_ids: Vec<i32> = role::Entity::find()
        .filter(role::Column::Name.is_in(OVERTIME_WRITE_ACCESS_ROLES))
        .all(db)
        .await?
        .into_iter()
        .map(|role| role.id)
        .collect();

    if role_ids.is_empty() {
        return Ok(false);
    }

    let grant = user_role::Entity::find()
        .filter(user_role::Column::UserId.eq(user_id))
        .filter(user_role::Column::RoleId.is_in(role_ids))
        .one(db)
        .await?;

    Ok(grant.is_some())
}

/// Employee ids reachable from `root_ids` along manager-to-report edges.
///
/// The roots themselves are part of the result. The walk keeps a visited set,
/// so cyclic manager data cannot loop it.
pub async fn descendant_employee_ids(
    db: &DatabaseConnection,
    root_ids: &[i32],
) -> Result<HashSet<i32>> {
    let mut reachable: HashSet<i32> = root_ids.iter().copied().collect();
    let mut frontier: Vec<i32> = root_ids.to_vec();

    while !frontier.is_empty() {
        let reports = employee::Entity::find()
            .filter(employee::Column::ParentId.is_in(frontier))
            .all(db)
            .await?;

        frontier = reports
            .iter()
            .map(|report| report.id)
            .filter(|id| reachable.insert(*id))
            .collect();
    }

    Ok(reachable)
}

/// Whether the acting user may see the overtime figures of `employee`.
///
/// Grants, in order: an elevated HR role, the employee being the acting
/// user's own record, and the employee reporting (transitively) to one of the
/// acting user's employee records. The answer depends on who is asking, so it
/// is evaluated per request and never stored on the employee.
#[instrument(skip(db, employee), fields(employee_id = employee.id))]
pub async fn has_overtime_access(
    db: &DatabaseConnection,
    acting_user_id: i32,
    employee: &employee::Model,
) -> Result<bool> {
    if has_overtime_write_access(db, acting_user_id).await? {
        trace!("User {} holds an elevated HR role", acting_user_id);
        return Ok(true);
    }

    if employee.user_id == Some(acting_user_id) {
        trace!("User {} is viewing their own record", acting_user_id);
        return Ok(true);
    }

    let own_records: Vec<i32> = employee::Entity::find()
        .filter(employee::Column::UserId.eq(acting_user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|record| record.id)
        .collect();

    if own_records.is_empty() {
        return Ok(false);
    }

    let subordinates = descendant_employee_ids(db, &own_records).await?;
    Ok(subordinates.contains(&employee.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{helpers, setup_db};
    use chrono::NaiveDate;
    use sea_orm::{ActiveModelTrait, Set};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn test_elevated_roles_grant_write_access() {
        let db = setup_db().await.expect("Failed to set up database");
        let officer = helpers::new_user(&db).await.expect("Failed to create user");
        let manager = helpers::new_user(&db).await.expect("Failed to create user");
        let plain = helpers::new_user(&db).await.expect("Failed to create user");
        helpers::grant_role(&db, &officer, "hr_user")
            .await
            .expect("Failed to grant role");
        helpers::grant_role(&db, &manager, "hr_manager")
            .await
            .expect("Failed to grant role");

        assert!(has_overtime_write_access(&db, officer.id).await.unwrap());
        assert!(has_overtime_write_access(&db, manager.id).await.unwrap());
        assert!(!has_overtime_write_access(&db, plain.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unrelated_roles_do_not_grant_write_access() {
        let db = setup_db().await.expect("Failed to set up database");
        let user = helpers::new_user(&db).await.expect("Failed to create user");
        helpers::grant_role(&db, &user, "payroll_viewer")
            .await
            .expect("Failed to grant role");

        assert!(!has_overtime_write_access(&db, user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_own_record_grants_access_without_roles() {
        let db = setup_db().await.expect("Failed to set up database");
        let user = helpers::new_user(&db).await.expect("Failed to create user");
        let employee = helpers::new_employee(&db, Some(&user), None, 0.0, start())
            .await
            .expect("Failed to create employee");

        assert!(has_overtime_access(&db, user.id, &employee).await.unwrap());
    }

    #[tokio::test]
    async fn test_manager_sees_transitive_reports() {
        let db = setup_db().await.expect("Failed to set up database");
        let boss_user = helpers::new_user(&db).await.expect("Failed to create user");
        let boss = helpers::new_employee(&db, Some(&boss_user), None, 0.0, start())
            .await
            .expect("Failed to create employee");
        let lead = helpers::new_employee(&db, None, Some(&boss), 0.0, start())
            .await
            .expect("Failed to create employee");
        let worker = helpers::new_employee(&db, None, Some(&lead), 0.0, start())
            .await
            .expect("Failed to create employee");

        // Both the direct report and the transitive one are visible.
        assert!(has_overtime_access(&db, boss_user.id, &lead).await.unwrap());
        assert!(has_overtime_access(&db, boss_user.id, &worker).await.unwrap());
    }

    #[tokio::test]
    async fn test_unrelated_user_is_denied() {
        let db = setup_db().await.expect("Failed to set up database");
        let viewer_user = helpers::new_user(&db).await.expect("Failed to create user");
        helpers::new_employee(&db, Some(&viewer_user), None, 0.0, start())
            .await
            .expect("Failed to create employee");
        let stranger = helpers::new_employee(&db, None, None, 0.0, start())
            .await
            .expect("Failed to create employee");

        assert!(!has_overtime_access(&db, viewer_user.id, &stranger).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_without_employee_record_is_denied() {
        let db = setup_db().await.expect("Failed to set up database");
        let user = helpers::new_user(&db).await.expect("Failed to create user");
        let employee = helpers::new_employee(&db, None, None, 0.0, start())
            .await
            .expect("Failed to create employee");

        assert!(!has_overtime_access(&db, user.id, &employee).await.unwrap());
    }

    #[tokio::test]
    async fn test_descendants_include_the_roots() {
        let db = setup_db().await.expect("Failed to set up database");
        let boss = helpers::new_employee(&db, None, None, 0.0, start())
            .await
            .expect("Failed to create employee");
        let report = helpers::new_employee(&db, None, Some(&boss), 0.0, start())
            .await
            .expect("Failed to create employee");

        let reachable = descendant_employee_ids(&db, &[boss.id]).await.unwrap();
        assert!(reachable.contains(&boss.id));
        assert!(reachable.contains(&report.id));
        assert_eq!(reachable.len(), 2);
    }

    #[tokio::test]
    async fn test_cyclic_hierarchy_terminates() {
        let db = setup_db().await.expect("Failed to set up database");
        let user = helpers::new_user(&db).await.expect("Failed to create user");
        let first = helpers::new_employee(&db, Some(&user), None, 0.0, start())
            .await
            .expect("Failed to create employee");
        let second = helpers::new_employee(&db, None, Some(&first), 0.0, start())
            .await
            .expect("Failed to create employee");

        // Close the loop: the manager now also reports to their own report.
        let mut looped: employee::ActiveModel = first.clone().into();
        looped.parent_id = Set(Some(second.id));
        looped.update(&db).await.expect("Failed to update employee");

        assert!(has_overtime_access(&db, user.id, &second).await.unwrap());
    }
}
