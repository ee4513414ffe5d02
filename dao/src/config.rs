//! DAO configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use zar_governance::{GovernorSettings, QuorumPolicy, SnapshotPolicy};
use zar_types::Address;
use zar_utils::LogFormat;

use crate::DaoError;

/// Configuration for a DAO instance.
///
/// Loaded from a TOML file via [`DaoConfig::from_toml_file`] or built
/// programmatically (tests). Every field has a default, so an empty file is
/// a valid configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaoConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default)]
    pub governor: GovernorConfig,

    #[serde(default)]
    pub timelock: TimelockConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// `[token]`: the governance token minted to the admin at bootstrap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_token_name")]
    pub name: String,
    #[serde(default = "default_token_symbol")]
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Whole supply in base units.
    #[serde(default = "default_initial_supply")]
    pub initial_supply: u64,
}

/// `[governor]`: voting schedule, thresholds and policies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernorConfig {
    #[serde(default = "default_dao_name")]
    pub name: String,
    #[serde(default = "default_voting_delay")]
    pub voting_delay: u64,
    #[serde(default = "default_voting_period")]
    pub voting_period: u64,
    #[serde(default)]
    pub proposal_threshold: u64,
    /// Percent of snapshot supply.
    #[serde(default = "default_quorum_numerator")]
    pub quorum_numerator: u64,
    #[serde(default)]
    pub quorum_policy: QuorumPolicy,
    #[serde(default)]
    pub snapshot_policy: SnapshotPolicy,
    #[serde(default = "default_grace_period")]
    pub grace_period: u64,
    #[serde(default)]
    pub guardian: Option<Address>,
}

/// `[timelock]`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelockConfig {
    /// Positions between queueing and execution.
    #[serde(default = "default_min_delay")]
    pub min_delay: u64,
}

/// `[ledger]`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Advance one position after every transaction.
    #[serde(default = "default_true")]
    pub automine: bool,
    #[serde(default)]
    pub genesis_position: u64,
    /// Nominal block interval, used only for log output.
    #[serde(default)]
    pub block_time_secs: Option<u64>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_token_name() -> String {
    "Zar Token".to_string()
}

fn default_token_symbol() -> String {
    "ZRT".to_string()
}

fn default_decimals() -> u8 {
    18
}

fn default_initial_supply() -> u64 {
    1000
}

fn default_dao_name() -> String {
    "Zar DAO".to_string()
}

fn default_voting_delay() -> u64 {
    1
}

fn default_voting_period() -> u64 {
    5
}

fn default_quorum_numerator() -> u64 {
    4
}

fn default_grace_period() -> u64 {
    100
}

fn default_min_delay() -> u64 {
    2
}

fn default_true() -> bool {
    true
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaoConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, DaoError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DaoError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DaoError> {
        let config: Self = toml::from_str(s).map_err(|e| DaoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, DaoError> {
        toml::to_string_pretty(self).map_err(|e| DaoError::Config(e.to_string()))
    }

    /// Check everything that would otherwise only fail at bootstrap.
    pub fn validate(&self) -> Result<(), DaoError> {
        self.log_format()?;
        self.governor.settings().validate()?;
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, DaoError> {
        self.log_format.parse().map_err(DaoError::Config)
    }

    /// Install the global subscriber described by `log_format` and `log_level`.
    pub fn init_logging(&self) -> Result<bool, DaoError> {
        Ok(zar_utils::init_logging(self.log_format()?, &self.log_level))
    }
}

impl GovernorConfig {
    pub fn settings(&self) -> GovernorSettings {
        GovernorSettings {
            voting_delay: self.voting_delay,
            voting_period: self.voting_period,
            proposal_threshold: u128::from(self.proposal_threshold),
            quorum_numerator: u128::from(self.quorum_numerator),
            quorum_policy: self.quorum_policy,
            snapshot_policy: self.snapshot_policy,
            grace_period: self.grace_period,
            guardian: self.guardian.clone(),
        }
    }
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            token: TokenConfig::default(),
            governor: GovernorConfig::default(),
            timelock: TimelockConfig::default(),
            ledger: LedgerConfig::default(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_token_name(),
            symbol: default_token_symbol(),
            decimals: default_decimals(),
            initial_supply: default_initial_supply(),
        }
    }
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            name: default_dao_name(),
            voting_delay: default_voting_delay(),
            voting_period: default_voting_period(),
            proposal_threshold: 0,
            quorum_numerator: default_quorum_numerator(),
            quorum_policy: QuorumPolicy::default(),
            snapshot_policy: SnapshotPolicy::default(),
            grace_period: default_grace_period(),
            guardian: None,
        }
    }
}

impl Default for TimelockConfig {
    fn default() -> Self {
        Self {
            min_delay: default_min_delay(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            automine: default_true(),
            genesis_position: 0,
            block_time_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DaoConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = DaoConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.governor.voting_period, config.governor.voting_period);
        assert_eq!(parsed.timelock.min_delay, config.timelock.min_delay);
        assert_eq!(parsed.token.symbol, "ZRT");
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = DaoConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.token.name, "Zar Token");
        assert_eq!(config.token.initial_supply, 1000);
        assert_eq!(config.governor.quorum_numerator, 4);
        assert_eq!(config.governor.snapshot_policy, SnapshotPolicy::OneBefore);
        assert!(config.ledger.automine);
        assert_eq!(config.log_format().unwrap(), LogFormat::Human);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_format = "json"

            [governor]
            voting_period = 20
            quorum_policy = "for_and_abstain"
            snapshot_policy = "at_creation"
            guardian = "zar_guardian"

            [timelock]
            min_delay = 10
        "#;
        let config = DaoConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.governor.voting_period, 20);
        assert_eq!(config.governor.voting_delay, 1); // default
        assert_eq!(config.governor.quorum_policy, QuorumPolicy::ForAndAbstain);
        assert_eq!(config.governor.snapshot_policy, SnapshotPolicy::AtCreation);
        assert_eq!(
            config.governor.settings().guardian,
            Some(Address::new("zar_guardian"))
        );
        assert_eq!(config.timelock.min_delay, 10);
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
    }

    #[test]
    fn invalid_settings_rejected() {
        let toml = r#"
            [governor]
            voting_delay = 0
            snapshot_policy = "at_creation"
        "#;
        assert!(matches!(
            DaoConfig::from_toml_str(toml),
            Err(DaoError::Governance(_))
        ));
        assert!(matches!(
            DaoConfig::from_toml_str("[governor]\ngrace_period = 0"),
            Err(DaoError::Governance(_))
        ));
        assert!(matches!(
            DaoConfig::from_toml_str(r#"log_format = "xml""#),
            Err(DaoError::Config(_))
        ));
    }

    #[test]
    fn malformed_guardian_rejected() {
        let toml = r#"
            [governor]
            guardian = "alice"
        "#;
        assert!(matches!(
            DaoConfig::from_toml_str(toml),
            Err(DaoError::Config(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[token]\ninitial_supply = 5000\n\n[ledger]\nautomine = false").unwrap();
        let config = DaoConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.token.initial_supply, 5000);
        assert!(!config.ledger.automine);
    }

    #[test]
    fn init_logging_accepts_configured_format() {
        let mut config = DaoConfig::default();
        config.log_format = "json".into();
        assert!(config.init_logging().is_ok());
        config.log_format = "yaml".into();
        assert!(matches!(config.init_logging(), Err(DaoError::Config(_))));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = DaoConfig::from_toml_file("/nonexistent/zar.toml");
        assert!(matches!(result, Err(DaoError::Config(_))));
    }
}
