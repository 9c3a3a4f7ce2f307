use std::{borrow::Cow, env};
use tracing_subscriber::{EnvFilter, fmt};
use tripsplit_domain::{CustomSplitPolicy, SettlementOptions, UnknownMemberPolicy};

const UNKNOWN_MEMBERS_VAR: &str = "TRIPSPLIT_UNKNOWN_MEMBERS";
const CUSTOM_SPLITS_VAR: &str = "TRIPSPLIT_CUSTOM_SPLITS";
const LOG_VAR: &str = "TRIPSPLIT_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

/// Settings resolved from the environment (and `.env`, when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub unknown_members: UnknownMemberPolicy,
    pub custom_splits: CustomSplitPolicy,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            unknown_members: UnknownMemberPolicy::default(),
            custom_splits: CustomSplitPolicy::default(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Cow<'static, str>> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Cow<'static, str>> {
        let mut config = Self::default();
        if let Some(value) = lookup(UNKNOWN_MEMBERS_VAR) {
            config.unknown_members = value
                .parse()
                .map_err(|err| format!("{UNKNOWN_MEMBERS_VAR}: {err}"))?;
        }
        if let Some(value) = lookup(CUSTOM_SPLITS_VAR) {
            config.custom_splits = value
                .parse()
                .map_err(|err| format!("{CUSTOM_SPLITS_VAR}: {err}"))?;
        }
        if let Some(value) = lookup(LOG_VAR).filter(|value| !value.trim().is_empty()) {
            config.log_filter = value;
        }
        Ok(config)
    }

    /// Command-line values win over the environment.
    pub fn with_overrides(
        mut self,
        unknown_members: Option<UnknownMemberPolicy>,
        custom_splits: Option<CustomSplitPolicy>,
    ) -> Self {
        if let Some(policy) = unknown_members {
            self.unknown_members = policy;
        }
        if let Some(policy) = custom_splits {
            self.custom_splits = policy;
        }
        self
    }

    pub fn settlement_options(&self) -> SettlementOptions {
        SettlementOptions {
            unknown_members: self.unknown_members,
            custom_splits: self.custom_splits,
        }
    }
}

/// Logs go to stderr so stdout carries only the report.
pub fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("Ignoring invalid {LOG_VAR} value `{filter}`: {err}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
