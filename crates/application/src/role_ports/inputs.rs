use chrono::{DateTime, Utc};
use emis_role_core::{AppError, AppResult};
use emis_role_domain::{PermissionId, Role, RoleChanges, RoleId};
use serde::{Deserialize, Serialize};

/// Default number of roles returned per page.
pub const DEFAULT_ROLE_PAGE_LIMIT: usize = 10;

/// Upper bound on the number of roles returned per page.
pub const MAX_ROLE_PAGE_LIMIT: usize = 100;

/// Partial or full role record accepted by create, update, upsert and seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInput {
    /// Existing role identifier, when targeting a known record.
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RoleId>,
    /// Unique role name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short form of the role name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    /// Human readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Referenced permission identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<PermissionId>>,
}

impl RoleInput {
    /// Creates the minimal record for a role name, using the name as description.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: Some(name.clone()),
            name: Some(name),
            ..Self::default()
        }
    }

    /// Returns the trimmed name when one was provided.
    #[must_use]
    pub fn trimmed_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Returns the field changes carried by this input.
    #[must_use]
    pub fn changes(&self) -> RoleChanges {
        RoleChanges {
            name: self.name.clone(),
            abbreviation: self.abbreviation.clone(),
            description: self.description.clone(),
            permissions: self.permissions.clone(),
        }
    }
}

/// Seed entry: either a bare role name or a role-shaped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleSeed {
    /// A role name, expanded to `{ name, description: name }`.
    Name(String),
    /// A role-shaped record.
    Record(RoleInput),
}

impl RoleSeed {
    /// Parses a JSON seed document holding one seed or an array of seeds.
    pub fn parse_document(document: &str) -> AppResult<Vec<Self>> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Document {
            Many(Vec<RoleSeed>),
            One(RoleSeed),
        }

        let document = serde_json::from_str::<Document>(document)
            .map_err(|error| AppError::Validation(format!("invalid role seed document: {error}")))?;

        Ok(match document {
            Document::Many(seeds) => seeds,
            Document::One(seed) => vec![seed],
        })
    }

    /// Normalizes the seed into a role input; blank names yield `None`.
    #[must_use]
    pub fn into_input(self) -> Option<RoleInput> {
        match self {
            Self::Name(name) => {
                let name = name.trim();
                (!name.is_empty()).then(|| RoleInput::named(name))
            }
            Self::Record(input) => Some(input),
        }
    }
}

impl From<&str> for RoleSeed {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for RoleSeed {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<RoleInput> for RoleSeed {
    fn from(value: RoleInput) -> Self {
        Self::Record(value)
    }
}

/// Query parameters for role listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleListQuery {
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for offset pagination.
    pub skip: usize,
    /// Optional case-insensitive search over name, abbreviation and description.
    pub search: Option<String>,
}

impl Default for RoleListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_ROLE_PAGE_LIMIT,
            skip: 0,
            search: None,
        }
    }
}

impl RoleListQuery {
    /// Clamps the limit into the supported range and drops blank searches.
    #[must_use]
    pub fn normalized(self) -> Self {
        let limit = match self.limit {
            0 => DEFAULT_ROLE_PAGE_LIMIT,
            limit => limit.min(MAX_ROLE_PAGE_LIMIT),
        };
        let search = self
            .search
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Self {
            limit,
            skip: self.skip,
            search,
        }
    }
}

/// Raw listing returned by role repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleListing {
    /// Roles in the requested window, ordered by name.
    pub roles: Vec<Role>,
    /// Number of roles matching the search, ignoring the window.
    pub total: u64,
    /// Most recent `updated_at` among matching roles.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Paginated role envelope returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePage {
    /// Roles on this page.
    pub data: Vec<Role>,
    /// Number of roles matching the query.
    pub total: u64,
    /// Page size.
    pub limit: usize,
    /// Offset of the first role on this page.
    pub skip: usize,
    /// One-based page number.
    pub page: usize,
    /// Number of pages available.
    pub pages: usize,
    /// Most recent modification among matching roles.
    pub last_modified: Option<DateTime<Utc>>,
}

impl RolePage {
    /// Wraps a repository listing into a page envelope.
    #[must_use]
    pub fn from_listing(listing: RoleListing, query: &RoleListQuery) -> Self {
        let limit = query.limit.max(1);
        let total = usize::try_from(listing.total).unwrap_or(usize::MAX);

        Self {
            data: listing.roles,
            total: listing.total,
            limit,
            skip: query.skip,
            page: query.skip / limit + 1,
            pages: total.div_ceil(limit),
            last_modified: listing.last_modified,
        }
    }
}
