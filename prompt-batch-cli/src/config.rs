//! CLI configuration management

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use prompt_batch_core::WizardSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

/// Default data service URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080/services/apexrest/prompt-batch";

/// Prefix of environment variables overriding file values, e.g.
/// `PROMPT_BATCH__SETTINGS__TIMEOUT_SECS=60` or `PROMPT_BATCH__WIZARD__CASE_PAGE_SIZE=25`.
pub const ENV_PREFIX: &str = "PROMPT_BATCH";

/// Keyring service name for stored secrets
pub const KEYRING_SERVICE: &str = "prompt-batch-cli";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Default profile to use
    #[serde(default)]
    pub default_profile: Option<String>,

    /// Named profiles
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Session defaults handed to every wizard run
    #[serde(default)]
    pub wizard: WizardSettings,
}

impl CliConfig {
    /// Load configuration from the default location, applying environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, applying environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let sources = ::config::Config::builder()
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: CliConfig = sources
            .try_deserialize()
            .with_context(|| format!("Failed to parse config from {:?}", path))?;

        config
            .wizard
            .validate()
            .with_context(|| format!("Invalid [wizard] settings in {:?}", path))?;

        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "prompt-batch", "prompt-batch-cli")
            .context("Could not determine config directory")
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Get the credentials file path
    pub fn credentials_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("credentials.toml"))
    }

    /// Get a profile by name
    pub fn get_profile(&self, name: Option<&str>) -> Option<&Profile> {
        let profile_name = name.or(self.default_profile.as_deref())?;
        self.profiles.get(profile_name)
    }

    /// Get or create a profile
    pub fn get_or_create_profile(&mut self, name: &str) -> &mut Profile {
        self.profiles.entry(name.to_string()).or_default()
    }

    /// Set the default profile
    pub fn set_default_profile(&mut self, name: &str) {
        self.default_profile = Some(name.to_string());
    }

    /// Remove a profile
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profile names, sorted
    pub fn list_profiles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// A configuration profile
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    /// Data service base URL
    #[serde(default)]
    pub api_url: Option<String>,

    /// Authentication method
    #[serde(default)]
    pub auth: AuthMethod,

    /// Additional headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Profile {
    /// Get the API URL, falling back to default
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }
}

/// Authentication method configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthMethod {
    /// No authentication
    #[default]
    None,
    /// API key authentication
    ApiKey {
        /// The API key, empty when kept in the keyring
        #[serde(default)]
        key: String,
        /// Whether the key is stored in system keyring
        #[serde(default)]
        use_keyring: bool,
    },
    /// OAuth access token
    BearerToken {
        /// The token, empty when kept in the keyring
        #[serde(default)]
        token: String,
        /// Whether the token is stored in system keyring
        #[serde(default)]
        use_keyring: bool,
    },
    /// Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password, empty when kept in the keyring
        #[serde(default)]
        password: String,
        /// Whether the password is stored in system keyring
        #[serde(default)]
        use_keyring: bool,
    },
}

impl AuthMethod {
    /// Short description for status output
    pub fn describe(&self) -> String {
        let storage = |use_keyring: bool| if use_keyring { "keyring" } else { "file" };
        match self {
            AuthMethod::None => "Not configured".to_string(),
            AuthMethod::ApiKey { use_keyring, .. } => {
                format!("API Key (stored in {})", storage(*use_keyring))
            }
            AuthMethod::BearerToken { use_keyring, .. } => {
                format!("Bearer Token (stored in {})", storage(*use_keyring))
            }
            AuthMethod::Basic {
                username,
                use_keyring,
                ..
            } => format!(
                "Basic (user: {}, password in {})",
                username,
                storage(*use_keyring)
            ),
        }
    }
}

/// Global settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Default output format
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries for failed listing requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            color: true,
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_output_format() -> String {
    "table".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// Credential storage
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Credentials {
    /// Stored credentials by profile name
    #[serde(default)]
    pub profiles: HashMap<String, ProfileCredentials>,
}

impl Credentials {
    /// Load credentials from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&CliConfig::credentials_path()?)
    }

    /// Load credentials from `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials from {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse credentials from {:?}", path))
    }

    /// Save credentials to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&CliConfig::credentials_path()?)
    }

    /// Save credentials to `path`, readable by the owner only
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create credentials directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize credentials")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write credentials to {:?}", path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Get credentials for a profile
    pub fn get(&self, profile: &str) -> Option<&ProfileCredentials> {
        self.profiles.get(profile)
    }

    /// Set credentials for a profile
    pub fn set(&mut self, profile: &str, creds: ProfileCredentials) {
        self.profiles.insert(profile.to_string(), creds);
    }

    /// Remove credentials for a profile
    pub fn remove(&mut self, profile: &str) -> Option<ProfileCredentials> {
        self.profiles.remove(profile)
    }
}

/// Credentials for a single profile
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileCredentials {
    /// API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// OAuth access token
    #[serde(default)]
    pub token: Option<String>,
}

impl ProfileCredentials {
    /// Create credentials with an API key
    pub fn api_key(key: String) -> Self {
        Self {
            api_key: Some(key),
            token: None,
        }
    }

    /// Create credentials with a bearer token
    pub fn token(token: String) -> Self {
        Self {
            api_key: None,
            token: Some(token),
        }
    }
}

/// Keyring entry name for a profile's secret of the given kind
pub fn keyring_entry(profile: &str, kind: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{}-{}", profile, kind))
        .context("Failed to access keyring")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.default_profile.is_none());
        assert!(config.profiles.is_empty());
        assert_eq!(config.wizard, WizardSettings::default());
    }

    #[test]
    fn test_profile_api_url() {
        let profile = Profile::default();
        assert_eq!(profile.api_url(), DEFAULT_API_URL);

        let profile = Profile {
            api_url: Some("https://acme.my.salesforce.com/services/apexrest/prompt-batch".to_string()),
            ..Default::default()
        };
        assert_eq!(
            profile.api_url(),
            "https://acme.my.salesforce.com/services/apexrest/prompt-batch"
        );
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.output_format, "table");
        assert!(settings.color);
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.max_retries, 3);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.settings.timeout_secs, 30);
        assert_eq!(config.wizard.template_page_size, 20);
    }

    #[test]
    fn test_load_wizard_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
default_profile = "sandbox"

[profiles.sandbox]
api_url = "https://sandbox.example.com/services/apexrest/prompt-batch"

[profiles.sandbox.auth]
type = "bearer_token"
use_keyring = true

[wizard]
case_page_size = 25
default_retriever_id = "ret-001"
"#,
        )
        .unwrap();

        let config = CliConfig::load_from(&path).unwrap();
        assert_eq!(config.wizard.case_page_size, 25);
        assert_eq!(config.wizard.conversation_page_size, 10);
        assert_eq!(config.wizard.default_retriever_id.as_deref(), Some("ret-001"));
        assert!(matches!(
            config.get_profile(None).map(|p| &p.auth),
            Some(AuthMethod::BearerToken { use_keyring: true, .. })
        ));
    }

    #[test]
    fn test_invalid_wizard_page_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[wizard]\ntemplate_page_size = 0\n").unwrap();

        assert!(CliConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = CliConfig::default();
        config.get_or_create_profile("prod").api_url = Some("https://prod.example.com".to_string());
        config.set_default_profile("prod");
        config.save_to(&path).unwrap();

        let loaded = CliConfig::load_from(&path).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("prod"));
        assert_eq!(loaded.list_profiles(), vec!["prod"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_credentials_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");

        let mut creds = Credentials::default();
        creds.set("default", ProfileCredentials::token("00Dxx!token".to_string()));
        creds.save_to(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(
            Credentials::load_from(&path).unwrap().get("default"),
            Some(&ProfileCredentials::token("00Dxx!token".to_string()))
        );
    }
}
