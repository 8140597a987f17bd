use crate::domain::{
    config::ListerSettings,
    error::{ListerError, ListerResult},
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR: &str = "splist";
const PROJECT_DIR: &str = ".splist";
const CONFIG_FILE: &str = "config.toml";

/// Settings file manager
pub struct ConfigManager {
    global_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
    explicit_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        Self {
            global_config_path: Self::get_global_config_path(),
            project_config_path: Self::find_project_config_path(),
            explicit_path,
        }
    }

    /// Load settings from the first file found.
    ///
    /// Order: explicit path (must exist), project file, global file, defaults.
    pub fn load_settings(&self) -> ListerResult<ListerSettings> {
        if let Some(path) = &self.explicit_path {
            return self.load_settings_from_path(path);
        }

        for path in [&self.project_config_path, &self.global_config_path]
            .into_iter()
            .flatten()
        {
            if path.exists() {
                return self.load_settings_from_path(path);
            }
        }

        debug!("No settings file found, using defaults");
        Ok(ListerSettings::default())
    }

    /// Get global configuration path
    fn get_global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(PROJECT_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Load settings from specific path
    pub fn load_settings_from_path(&self, path: &Path) -> ListerResult<ListerSettings> {
        debug!("Loading settings from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            ListerError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let settings: ListerSettings = toml::from_str(&content).map_err(|e| {
            ListerError::config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        if settings.page_size == 0 || settings.page_size > 999 {
            return Err(ListerError::config(format!(
                "page_size in {} must be between 1 and 999",
                path.display()
            )));
        }

        Ok(settings)
    }

    /// Get the current project config path (if any)
    pub fn get_project_config_path(&self) -> Option<&PathBuf> {
        self.project_config_path.as_ref()
    }
}
