use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use emis_role_application::{RoleSeed, RoleSeedSource};
use emis_role_core::{AppError, AppResult};

/// Loads role seeds from a JSON document on disk.
///
/// The document holds either one seed or an array of seeds, where each seed
/// is a role name or a role-shaped object. A missing file yields no seeds.
#[derive(Debug, Clone)]
pub struct JsonFileRoleSeedSource {
    path: PathBuf,
}

impl JsonFileRoleSeedSource {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RoleSeedSource for JsonFileRoleSeedSource {
    async fn load_role_seeds(&self) -> AppResult<Vec<RoleSeed>> {
        let document = match tokio::fs::read_to_string(&self.path).await {
            Ok(document) => document,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no role seed document found");
                return Ok(Vec::new());
            }
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read role seed document '{}': {error}",
                    self.path.display()
                )));
            }
        };

        RoleSeed::parse_document(document.as_str())
    }
}
