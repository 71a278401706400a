use std::path::{Path, PathBuf};
use std::time::Duration;

use certforge_export::pdf::{DEFAULT_OFFICE_BINARY, DEFAULT_TIMEOUT, OfficeConverter};
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const OFFICE_BIN_ENV: &str = "CERTFORGE_OFFICE_BIN";
pub const CONVERT_TIMEOUT_ENV: &str = "CERTFORGE_CONVERT_TIMEOUT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertforgeConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_office_binary")]
    pub office_binary: String,
    #[serde(default = "default_timeout_secs")]
    pub convert_timeout_secs: u64,
    /// Where archives are written. Unset = next to the template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for CertforgeConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            office_binary: default_office_binary(),
            convert_timeout_secs: default_timeout_secs(),
            output_dir: None,
        }
    }
}

fn default_office_binary() -> String {
    DEFAULT_OFFICE_BINARY.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl CertforgeConfig {
    pub fn convert_timeout(&self) -> Duration {
        Duration::from_secs(self.convert_timeout_secs)
    }

    pub fn converter(&self) -> OfficeConverter {
        OfficeConverter::new(&self.office_binary, self.convert_timeout())
    }

    /// Apply `CERTFORGE_*` overrides from `lookup` (normally the process
    /// environment).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> eyre::Result<()> {
        if let Some(binary) = lookup(OFFICE_BIN_ENV).filter(|v| !v.trim().is_empty()) {
            self.office_binary = binary;
        }
        if let Some(secs) = lookup(CONVERT_TIMEOUT_ENV) {
            self.convert_timeout_secs = secs
                .trim()
                .parse()
                .map_err(|e| eyre::eyre!("invalid {CONVERT_TIMEOUT_ENV} value {secs:?}: {e}"))?;
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("certforge").join("config.json"))
}

/// Load configuration from `explicit`, else from the per-user config file
/// when it exists, else defaults. Environment overrides are applied last.
pub fn load_config(explicit: Option<&Path>) -> eyre::Result<CertforgeConfig> {
    let mut config = match explicit {
        Some(path) => read_config(path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => read_config(&path)?,
            None => CertforgeConfig::default(),
        },
    };
    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

pub fn read_config(path: &Path) -> eyre::Result<CertforgeConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn parse_config(contents: &str) -> eyre::Result<CertforgeConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    Ok(serde_json::from_value(migrated)?)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update certforge."
        ));
    }

    // v0 -> v1: `soffice` and `timeout` were renamed.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(binary) = obj.remove("soffice") {
            obj.entry("office_binary").or_insert(binary);
        }
        if let Some(timeout) = obj.remove("timeout") {
            obj.entry("convert_timeout_secs").or_insert(timeout);
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (renamed soffice, timeout)");
    }

    Ok(json)
}
