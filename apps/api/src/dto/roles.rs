use chrono::{DateTime, Utc};
use emis_role_application::{
    DEFAULT_ROLE_PAGE_LIMIT, PopulatedRole, RoleInput, RoleListQuery, RolePage,
};
use emis_role_core::AppError;
use emis_role_domain::{Permission, PermissionId, RoleId};
use serde::{Deserialize, Serialize};

/// Incoming payload for role create, patch and replace.
#[derive(Debug, Default, Deserialize)]
pub struct RoleRequest {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl TryFrom<RoleRequest> for RoleInput {
    type Error = AppError;

    fn try_from(value: RoleRequest) -> Result<Self, Self::Error> {
        let id = value
            .id
            .as_deref()
            .map(str::parse::<RoleId>)
            .transpose()?;
        let permissions = value
            .permissions
            .map(|permissions| {
                permissions
                    .iter()
                    .map(|permission| permission.parse::<PermissionId>())
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            id,
            name: value.name,
            abbreviation: value.abbreviation,
            description: value.description,
            permissions,
        })
    }
}

/// Query string accepted by the role listing endpoint.
///
/// `skip` wins over `page` when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct RoleListParams {
    pub limit: Option<usize>,
    pub skip: Option<usize>,
    pub page: Option<usize>,
    pub q: Option<String>,
}

impl From<RoleListParams> for RoleListQuery {
    fn from(value: RoleListParams) -> Self {
        let query = Self {
            limit: value.limit.unwrap_or(DEFAULT_ROLE_PAGE_LIMIT),
            skip: 0,
            search: value.q,
        }
        .normalized();

        let skip = match (value.skip, value.page) {
            (Some(skip), _) => skip,
            (None, Some(page)) => page.saturating_sub(1).saturating_mul(query.limit),
            (None, None) => 0,
        };

        Self { skip, ..query }
    }
}

/// API representation of a role with its permissions resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub description: String,
    pub permissions: Vec<PermissionSummaryResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PopulatedRole> for RoleResponse {
    fn from(value: PopulatedRole) -> Self {
        let PopulatedRole { role, permissions } = value;

        Self {
            id: role.id().to_string(),
            name: role.name().to_owned(),
            abbreviation: role.abbreviation().to_owned(),
            description: role.description().to_owned(),
            permissions: permissions
                .into_iter()
                .map(PermissionSummaryResponse::from)
                .collect(),
            created_at: role.created_at(),
            updated_at: role.updated_at(),
        }
    }
}

/// Permission fields embedded in a role response.
#[derive(Debug, Serialize)]
pub struct PermissionSummaryResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<Permission> for PermissionSummaryResponse {
    fn from(permission: Permission) -> Self {
        Self {
            id: permission.id().to_string(),
            name: permission.wildcard(),
            description: permission.description().map(ToOwned::to_owned),
        }
    }
}

/// Paginated role listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePageResponse {
    pub data: Vec<RoleResponse>,
    pub total: u64,
    pub limit: usize,
    pub skip: usize,
    pub page: usize,
    pub pages: usize,
    pub last_modified: Option<DateTime<Utc>>,
}

impl RolePageResponse {
    /// Builds the envelope from `page` and its already populated roles.
    pub fn new(page: RolePage, roles: Vec<PopulatedRole>) -> Self {
        Self {
            data: roles.into_iter().map(RoleResponse::from).collect(),
            total: page.total,
            limit: page.limit,
            skip: page.skip,
            page: page.page,
            pages: page.pages,
            last_modified: page.last_modified,
        }
    }
}

/// API representation of a permission a role may reference.
#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub resource: String,
    pub action: String,
    pub wildcard: String,
    pub description: Option<String>,
}

impl From<Permission> for PermissionResponse {
    fn from(permission: Permission) -> Self {
        Self {
            id: permission.id().to_string(),
            resource: permission.resource().to_owned(),
            action: permission.action().to_owned(),
            wildcard: permission.wildcard(),
            description: permission.description().map(ToOwned::to_owned),
        }
    }
}
