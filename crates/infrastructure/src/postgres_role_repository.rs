use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, Transaction};

use emis_role_application::{RoleListQuery, RoleListing, RoleRepository};
use emis_role_core::{AppError, AppResult};
use emis_role_domain::{PermissionId, Role, RoleId};


/// PostgreSQL-backed repository for roles and their permission references.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: uuid::Uuid,
    name: String,
    abbreviation: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    permission_ids: Vec<uuid::Uuid>,
}

#[derive(Debug, FromRow)]
struct RoleSummaryRow {
    total: i64,
    last_modified: Option<DateTime<Utc>>,
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        fetch_role(&self.pool, role_id).await
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.name,
                roles.abbreviation,
                roles.description,
                roles.created_at,
                roles.updated_at,
                ARRAY(
                    SELECT grants.permission_id
                    FROM role_permissions AS grants
                    WHERE grants.role_id = roles.id
                    ORDER BY grants.position
                ) AS permission_ids
            FROM roles
            WHERE roles.name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role '{name}': {error}")))?;

        row.map(role_from_row).transpose()
    }

    async fn insert_role(&self, role: Role) -> AppResult<Role> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        sqlx::query(
            r#"
            INSERT INTO roles (id, name, abbreviation, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.name())
        .bind(role.abbreviation())
        .bind(role.description())
        .bind(role.created_at())
        .bind(role.updated_at())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_write_error(error, role.name(), "create"))?;

        write_permissions(&mut transaction, &role).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(role)
    }

    async fn update_role(&self, role: Role) -> AppResult<Role> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let rows_affected = sqlx::query(
            r#"
            UPDATE roles
            SET name = $2,
                abbreviation = $3,
                description = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.name())
        .bind(role.abbreviation())
        .bind(role.description())
        .bind(role.updated_at())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_write_error(error, role.name(), "update"))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                role.id()
            )));
        }

        sqlx::query(
            r#"
            DELETE FROM role_permissions
            WHERE role_id = $1
            "#,
        )
        .bind(role.id().as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to clear role permissions: {error}"))
        })?;

        write_permissions(&mut transaction, &role).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(role)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let Some(role) = fetch_role(&mut *transaction, role_id).await? else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            DELETE FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(Some(role))
    }

    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<RoleListing> {
        let pattern = query
            .search
            .as_deref()
            .map(|search| format!("%{}%", escape_like(search)));
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.skip).unwrap_or(i64::MAX);

        let summary = sqlx::query_as::<_, RoleSummaryRow>(
            r#"
            SELECT
                COUNT(*) AS total,
                MAX(updated_at) AS last_modified
            FROM roles
            WHERE $1::TEXT IS NULL
                OR name ILIKE $1
                OR abbreviation ILIKE $1
                OR description ILIKE $1
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count roles: {error}")))?;

        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.name,
                roles.abbreviation,
                roles.description,
                roles.created_at,
                roles.updated_at,
                ARRAY(
                    SELECT grants.permission_id
                    FROM role_permissions AS grants
                    WHERE grants.role_id = roles.id
                    ORDER BY grants.position
                ) AS permission_ids
            FROM roles
            WHERE $1::TEXT IS NULL
                OR roles.name ILIKE $1
                OR roles.abbreviation ILIKE $1
                OR roles.description ILIKE $1
            ORDER BY roles.name
            LIMIT $2
            OFFSET $3
            "#,
        )
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(RoleListing {
            roles: rows
                .into_iter()
                .map(role_from_row)
                .collect::<AppResult<Vec<_>>>()?,
            total: u64::try_from(summary.total).unwrap_or_default(),
            last_modified: summary.last_modified,
        })
    }
}

async fn fetch_role<'e>(
    executor: impl PgExecutor<'e>,
    role_id: RoleId,
) -> AppResult<Option<Role>> {
    let row = sqlx::query_as::<_, RoleRow>(
        r#"
        SELECT
            roles.id AS role_id,
            roles.name,
            roles.abbreviation,
            roles.description,
            roles.created_at,
            roles.updated_at,
            ARRAY(
                SELECT grants.permission_id
                FROM role_permissions AS grants
                WHERE grants.role_id = roles.id
                ORDER BY grants.position
            ) AS permission_ids
        FROM roles
        WHERE roles.id = $1
        "#,
    )
    .bind(role_id.as_uuid())
    .fetch_optional(executor)
    .await
    .map_err(|error| AppError::Internal(format!("failed to find role '{role_id}': {error}")))?;

    row.map(role_from_row).transpose()
}

async fn write_permissions(
    transaction: &mut Transaction<'_, Postgres>,
    role: &Role,
) -> AppResult<()> {
    for (position, permission_id) in role.permissions().unwrap_or_default().iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id, position)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(permission_id.as_uuid())
        .bind(i32::try_from(position).unwrap_or(i32::MAX))
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(database_error) = &error
                && database_error.code().as_deref() == Some("23503")
            {
                return AppError::Validation(format!(
                    "role '{}' references unknown permission '{permission_id}'",
                    role.name()
                ));
            }

            AppError::Internal(format!("failed to persist role permissions: {error}"))
        })?;
    }

    Ok(())
}

fn role_from_row(row: RoleRow) -> AppResult<Role> {
    let role_id = RoleId::from_uuid(row.role_id);
    Role::restore(
        role_id,
        row.name,
        Some(row.abbreviation),
        Some(row.description),
        row.permission_ids
            .into_iter()
            .map(PermissionId::from_uuid)
            .collect(),
        row.created_at,
        row.updated_at,
    )
    .map_err(|error| AppError::Internal(format!("invalid stored role '{role_id}': {error}")))
}

fn map_role_write_error(error: sqlx::Error, role_name: &str, operation: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("role '{role_name}' already exists"));
    }

    AppError::Internal(format!("failed to {operation} role: {error}"))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        if matches!(character, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }

    escaped
}
