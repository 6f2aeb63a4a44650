use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use emis_role_application::{RoleSettings, parse_role_seed_list};
use emis_role_core::AppError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: Option<String>,
    pub seed_on_startup: bool,
    pub role_settings: RoleSettings,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let frontend_url = optional_env("FRONTEND_URL");
        let seed_on_startup = optional_env("ROLE_SEED_ON_STARTUP")
            .map(|value| parse_flag("ROLE_SEED_ON_STARTUP", value.as_str()))
            .transpose()?
            .unwrap_or(true);

        let working_directory = env::current_dir().map_err(|error| {
            AppError::Internal(format!("failed to resolve working directory: {error}"))
        })?;
        let role_settings = role_settings_from(optional_env, working_directory);

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            frontend_url,
            seed_on_startup,
            role_settings,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn role_settings_from(
    lookup: impl Fn(&str) -> Option<String>,
    working_directory: PathBuf,
) -> RoleSettings {
    let defaults = RoleSettings::default();
    let base_path = lookup("BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or(working_directory);

    RoleSettings {
        administrator_role_name: lookup("ADMINISTRATOR_ROLE_NAME")
            .map(|value| value.trim().to_owned())
            .unwrap_or(defaults.administrator_role_name),
        model_name: lookup("ROLE_MODEL_NAME").unwrap_or(defaults.model_name),
        collection_name: lookup("ROLE_COLLECTION_NAME").unwrap_or(defaults.collection_name),
        role_seeds: lookup("ROLE_SEEDS")
            .map(|value| parse_role_seed_list(value.as_str()))
            .unwrap_or_default(),
        seeds_path: lookup("SEEDS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| base_path.join("seeds")),
        seed_name: lookup("ROLE_SEED").unwrap_or(defaults.seed_name),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::Validation(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use emis_role_application::RoleSettings;

    use super::{parse_flag, role_settings_from};

    fn settings(values: &[(&str, &str)]) -> RoleSettings {
        let values = values
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect::<HashMap<_, _>>();

        role_settings_from(
            |name| values.get(name).cloned(),
            PathBuf::from("/srv/emis"),
        )
    }

    #[test]
    fn defaults_resolve_seeds_under_working_directory() {
        let settings = settings(&[]);

        assert_eq!(settings.administrator_role_name, "Administrator");
        assert_eq!(settings.model_name, "Role");
        assert_eq!(settings.collection_name, "roles");
        assert!(settings.role_seeds.is_empty());
        assert_eq!(
            settings.seed_file_path(),
            PathBuf::from("/srv/emis/seeds/roles.json")
        );
    }

    #[test]
    fn overrides_are_applied() {
        let settings = settings(&[
            ("ADMINISTRATOR_ROLE_NAME", " Root "),
            ("ROLE_SEEDS", "IT Officer, Billing Officer"),
            ("BASE_PATH", "/opt/app"),
            ("ROLE_SEED", "baseline"),
        ]);

        assert_eq!(settings.administrator_role_name, "Root");
        assert_eq!(settings.role_seeds, vec!["IT Officer", "Billing Officer"]);
        assert_eq!(
            settings.seed_file_path(),
            PathBuf::from("/opt/app/seeds/baseline.json")
        );
    }

    #[test]
    fn explicit_seeds_path_wins_over_base_path() {
        let settings = settings(&[("BASE_PATH", "/opt/app"), ("SEEDS_PATH", "/data/seeds")]);

        assert_eq!(
            settings.seed_file_path(),
            PathBuf::from("/data/seeds/roles.json")
        );
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(matches!(parse_flag("FLAG", "TRUE"), Ok(true)));
        assert!(matches!(parse_flag("FLAG", "0"), Ok(false)));
        assert!(parse_flag("FLAG", "sometimes").is_err());
    }
}
