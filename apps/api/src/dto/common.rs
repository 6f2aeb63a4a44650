use emis_role_domain::RoleField;
use serde::Serialize;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Service description returned from the root path.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub api_version: &'static str,
    pub model_name: String,
    pub collection_name: String,
    pub searchable_fields: Vec<&'static str>,
    pub taggable_fields: Vec<&'static str>,
    pub fields: Vec<FieldResponse>,
}

/// Capabilities of one role field.
#[derive(Debug, Serialize)]
pub struct FieldResponse {
    pub name: &'static str,
    pub searchable: bool,
    pub taggable: bool,
    pub exportable: bool,
    pub autopopulate: bool,
}

impl From<RoleField> for FieldResponse {
    fn from(field: RoleField) -> Self {
        Self {
            name: field.as_str(),
            searchable: field.is_searchable(),
            taggable: field.is_taggable(),
            exportable: field.is_exportable(),
            autopopulate: field.is_autopopulated(),
        }
    }
}
