use std::path::{Path, PathBuf};

use emis_role_domain::DEFAULT_ADMINISTRATOR_ROLE_NAME;

/// Explicit configuration for role seeding and naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSettings {
    /// Name of the role granted every known permission.
    pub administrator_role_name: String,
    /// Model name exposed to API consumers.
    pub model_name: String,
    /// Collection (table) name exposed to API consumers.
    pub collection_name: String,
    /// Role names guaranteed to exist after seeding.
    pub role_seeds: Vec<String>,
    /// Directory holding optional seed documents.
    pub seeds_path: PathBuf,
    /// File stem of the role seed document inside `seeds_path`.
    pub seed_name: String,
}

impl Default for RoleSettings {
    fn default() -> Self {
        Self {
            administrator_role_name: DEFAULT_ADMINISTRATOR_ROLE_NAME.to_owned(),
            model_name: "Role".to_owned(),
            collection_name: "roles".to_owned(),
            role_seeds: Vec::new(),
            seeds_path: PathBuf::from("seeds"),
            seed_name: "roles".to_owned(),
        }
    }
}

impl RoleSettings {
    /// Returns the path of the JSON role seed document.
    #[must_use]
    pub fn seed_file_path(&self) -> PathBuf {
        seed_file_path(self.seeds_path.as_path(), self.seed_name.as_str())
    }

    /// Returns whether `name` designates the administrator role.
    ///
    /// Surrounding whitespace is ignored on both sides, matching how role
    /// names are stored.
    #[must_use]
    pub fn is_administrator(&self, name: &str) -> bool {
        name.trim() == self.administrator_role_name.trim()
    }
}

fn seed_file_path(seeds_path: &Path, seed_name: &str) -> PathBuf {
    if Path::new(seed_name).extension().is_some() {
        return seeds_path.join(seed_name);
    }

    seeds_path.join(format!("{seed_name}.json"))
}

/// Splits a comma-separated list of role names, dropping blanks.
#[must_use]
pub fn parse_role_seed_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
