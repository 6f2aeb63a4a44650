//! Role domain types and field invariants.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use emis_role_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::PermissionId;

/// Name of the role granted every known permission unless configured otherwise.
pub const DEFAULT_ADMINISTRATOR_ROLE_NAME: &str = "Administrator";

/// Unique identifier for a role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for RoleId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid role id '{value}': {error}")))
    }
}

/// Field values applied when creating or changing a role.
///
/// `None` means "not provided": merges keep the stored value for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleChanges {
    /// Unique human readable name.
    pub name: Option<String>,
    /// Short form of the name.
    pub abbreviation: Option<String>,
    /// Summary of what the role is for.
    pub description: Option<String>,
    /// Referenced permissions.
    pub permissions: Option<Vec<PermissionId>>,
}

/// A named bundle of permission references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    abbreviation: String,
    description: String,
    permissions: Option<Vec<PermissionId>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Role {
    /// Builds a new role from the provided fields, stamping both timestamps.
    pub fn create(id: RoleId, changes: RoleChanges, now: DateTime<Utc>) -> AppResult<Self> {
        let name = changes
            .name
            .ok_or_else(|| AppError::Validation("role name is required".to_owned()))?;

        Self::normalized(
            id,
            name,
            changes.abbreviation,
            changes.description,
            changes.permissions,
            now,
            now,
        )
    }

    /// Restores a role from persisted values, re-applying field invariants.
    pub fn restore(
        id: RoleId,
        name: String,
        abbreviation: Option<String>,
        description: Option<String>,
        permissions: Vec<PermissionId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Self::normalized(
            id,
            name,
            abbreviation,
            description,
            Some(permissions),
            created_at,
            updated_at,
        )
    }

    /// Applies the provided fields over this role, keeping values not provided.
    pub fn merged(&self, changes: RoleChanges, now: DateTime<Utc>) -> AppResult<Self> {
        Self::normalized(
            self.id,
            changes.name.unwrap_or_else(|| self.name.to_string()),
            changes.abbreviation.or_else(|| Some(self.abbreviation.clone())),
            changes.description.or_else(|| Some(self.description.clone())),
            changes.permissions.or_else(|| self.permissions.clone()),
            self.created_at,
            now,
        )
    }

    /// Replaces all mutable fields; omitted optional fields fall back to defaults.
    pub fn replaced(&self, changes: RoleChanges, now: DateTime<Utc>) -> AppResult<Self> {
        Self::normalized(
            self.id,
            changes.name.unwrap_or_else(|| self.name.to_string()),
            changes.abbreviation,
            changes.description,
            changes.permissions,
            self.created_at,
            now,
        )
    }

    /// Returns a copy holding exactly the given permission references.
    pub fn with_permissions(&self, permissions: Vec<PermissionId>, now: DateTime<Utc>) -> Self {
        Self {
            permissions: normalize_permissions(Some(permissions)),
            updated_at: now,
            ..self.clone()
        }
    }

    fn normalized(
        id: RoleId,
        name: String,
        abbreviation: Option<String>,
        description: Option<String>,
        permissions: Option<Vec<PermissionId>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)
            .map_err(|_| AppError::Validation("role name must not be empty".to_owned()))?;

        let abbreviation = trimmed_or(abbreviation, || abbreviate(name.as_str()));
        let description = trimmed_or(description, || name.to_string());

        Ok(Self {
            id,
            name,
            abbreviation,
            description,
            permissions: normalize_permissions(permissions),
            created_at,
            updated_at,
        })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the role abbreviation.
    #[must_use]
    pub fn abbreviation(&self) -> &str {
        self.abbreviation.as_str()
    }

    /// Returns the role description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns referenced permissions, `None` when the role has none.
    #[must_use]
    pub fn permissions(&self) -> Option<&[PermissionId]> {
        self.permissions.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Derives a short form from a name using the first letter of every word.
#[must_use]
pub fn abbreviate(name: &str) -> String {
    name.split(|character: char| !character.is_alphanumeric())
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

fn trimmed_or(value: Option<String>, fallback: impl FnOnce() -> String) -> String {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(fallback)
}

fn normalize_permissions(permissions: Option<Vec<PermissionId>>) -> Option<Vec<PermissionId>> {
    let permissions = permissions?;
    let mut seen = HashSet::with_capacity(permissions.len());
    let unique: Vec<PermissionId> = permissions
        .into_iter()
        .filter(|permission| seen.insert(*permission))
        .collect();

    (!unique.is_empty()).then_some(unique)
}
