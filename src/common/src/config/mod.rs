use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use once_cell::sync::OnceCell;

pub static CONFIG: OnceCell<PolicyConfig> = OnceCell::new();

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "promval.toml";

/// Prefix of environment variables overriding the configuration
pub const ENV_PREFIX: &str = "PROMVAL__";

/// Query policies to enforce
///
/// Every policy is optional; an absent or empty entry disables it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Labels every aggregation must group by, exactly
    pub aggregation_group: Option<BTreeSet<String>>,
    /// Label value whose matchers must be kept by the enclosing aggregation
    pub aggregation_label_value: Option<String>,
    /// Aggregation operators that may not be used
    pub blacklisted_aggregators: BTreeSet<String>,
    /// Functions that may not be called
    pub blacklisted_functions: BTreeSet<String>,
}

impl PolicyConfig {
    /// Load from defaults, `promval.toml` and `PROMVAL__` environment variables
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::load_from(CONFIG_FILE)
    }

    /// Same as [`PolicyConfig::load`] with an explicit configuration file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        let config = Self::figment(path.as_ref()).extract().map_err(Box::new)?;
        log::debug!("Loaded policy configuration: {config:?}");
        Ok(config)
    }

    /// Process-wide configuration, loaded on first use
    pub fn global() -> Result<&'static PolicyConfig, Box<figment::Error>> {
        CONFIG.get_or_try_init(Self::load)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(PolicyConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Whether no policy is enabled
    pub fn is_empty(&self) -> bool {
        self.aggregation_group.is_none()
            && self.aggregation_label_value.is_none()
            && self.blacklisted_aggregators.is_empty()
            && self.blacklisted_functions.is_empty()
    }
}
