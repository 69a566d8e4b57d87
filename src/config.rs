use crate::keymap::Keymap;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the grading portal lives and how it names things
    pub portal: PortalConfig,
    /// Per-call time limits
    pub timeouts: TimeoutConfig,
    /// Terminal UI preferences
    pub ui: UiConfig,
}

/// Grading portal endpoints and conventions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Base URL the endpoint paths are joined onto
    pub base_url: String,
    /// Login endpoint, relative to `base_url`
    pub login_path: String,
    /// Homework endpoint (list and submit), relative to `base_url`
    pub homework_path: String,
    /// `action` query value that lists homework
    pub list_action: String,
    /// `action` query value that submits homework
    pub submit_action: String,
    /// Cookie the session token is sent back in
    pub token_cookie: String,
    /// Cookie the portal may issue the token in when the login body has none
    pub login_cookie: String,
    /// How the upload's content type is chosen
    pub content_type: ContentTypePolicy,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/system".to_string(),
            login_path: "screen-login.php".to_string(),
            homework_path: "screen-homework.php".to_string(),
            list_action: "get_homework_list".to_string(),
            submit_action: "submit_homework".to_string(),
            token_cookie: "screen-token".to_string(),
            login_cookie: "screen_token".to_string(),
            content_type: ContentTypePolicy::Fixed,
        }
    }
}

/// Content type sent with the uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentTypePolicy {
    /// Always `image/jpeg`, whatever the file is
    #[default]
    Fixed,
    /// Derived from the file extension (`.png` -> `image/png`)
    ByExtension,
}

impl ContentTypePolicy {
    pub fn content_type_for(self, path: &Path) -> &'static str {
        match self {
            ContentTypePolicy::Fixed => "image/jpeg",
            ContentTypePolicy::ByExtension => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_ascii_lowercase);
                match ext.as_deref() {
                    Some("png") => "image/png",
                    Some("jpg" | "jpeg") => "image/jpeg",
                    _ => "application/octet-stream",
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub login_secs: u64,
    pub list_secs: u64,
    pub submit_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            login_secs: 5,
            list_secs: 10,
            submit_secs: 30,
        }
    }
}

impl TimeoutConfig {
    pub fn login(&self) -> Duration {
        Duration::from_secs(self.login_secs)
    }

    pub fn list(&self) -> Duration {
        Duration::from_secs(self.list_secs)
    }

    pub fn submit(&self) -> Duration {
        Duration::from_secs(self.submit_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// "dark", "light" or "nocolor"
    pub theme: String,
    /// Screen id pre-filled on the login form. Passwords are never stored.
    pub screen_id: String,
    pub keymap: Keymap,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            screen_id: String::new(),
            keymap: Keymap::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, writing the defaults first if it doesn't exist
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config =
                toml::from_str(&content).with_context(|| "Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to file with secure permissions
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        // 600: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(config_path)
                .with_context(|| format!("Failed to get file metadata: {:?}", config_path))?
                .permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(config_path, perms)
                .with_context(|| format!("Failed to set file permissions: {:?}", config_path))?;
        }

        Ok(())
    }

    /// Apply one-off overrides from the command line.
    pub fn with_overrides(mut self, base_url: Option<String>, screen_id: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.portal.base_url = base_url;
        }
        if let Some(screen_id) = screen_id {
            self.ui.screen_id = screen_id;
        }
        self
    }
}
