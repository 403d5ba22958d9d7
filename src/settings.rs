use config::{Config, Environment};
use serde::Deserialize;

/// Output/exit behaviour shared by the subcommands. CLI flags can only turn
/// options on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub pretty: bool,
    #[serde(default)]
    pub strict: bool,
}

impl Settings {
    /// `CHANGELOG_PRETTY`, `CHANGELOG_STRICT`. Malformed values fall back to defaults.
    pub fn load() -> Self {
        Self::from_environment(Environment::with_prefix("CHANGELOG").try_parsing(true))
    }

    fn from_environment(env: Environment) -> Self {
        Config::builder()
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap_or_default()
    }
}
