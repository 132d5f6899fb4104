//! Shared configuration types for LMeter
//!
//! This crate contains the serializable settings graph (meter windows, their
//! config pages and the top-level app config) together with the small game
//! enums those settings refer to. Everything here round-trips through the
//! config codec in lmeter-core, so field names are part of the on-disk format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Jobs
// ─────────────────────────────────────────────────────────────────────────────

/// Character job, identified by its three-letter abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Job {
    #[default]
    Ukn,
    // Base classes
    Gla,
    Pgl,
    Mrd,
    Lnc,
    Arc,
    Cnj,
    Thm,
    Acn,
    Rog,
    // Tanks
    Pld,
    War,
    Drk,
    Gnb,
    // Healers
    Whm,
    Sch,
    Ast,
    Sge,
    // Melee
    Mnk,
    Drg,
    Nin,
    Sam,
    Rpr,
    Vpr,
    // Ranged
    Brd,
    Mch,
    Dnc,
    // Casters
    Blm,
    Smn,
    Rdm,
    Pct,
    Blu,
    // Hands
    Crp,
    Bsm,
    Arm,
    Gsm,
    Ltw,
    Wvr,
    Alc,
    Cul,
    // Lands
    Min,
    Btn,
    Fsh,
}

impl Job {
    pub const ALL: [Job; 43] = [
        Job::Ukn,
        Job::Gla,
        Job::Pgl,
        Job::Mrd,
        Job::Lnc,
        Job::Arc,
        Job::Cnj,
        Job::Thm,
        Job::Acn,
        Job::Rog,
        Job::Pld,
        Job::War,
        Job::Drk,
        Job::Gnb,
        Job::Whm,
        Job::Sch,
        Job::Ast,
        Job::Sge,
        Job::Mnk,
        Job::Drg,
        Job::Nin,
        Job::Sam,
        Job::Rpr,
        Job::Vpr,
        Job::Brd,
        Job::Mch,
        Job::Dnc,
        Job::Blm,
        Job::Smn,
        Job::Rdm,
        Job::Pct,
        Job::Blu,
        Job::Crp,
        Job::Bsm,
        Job::Arm,
        Job::Gsm,
        Job::Ltw,
        Job::Wvr,
        Job::Alc,
        Job::Cul,
        Job::Min,
        Job::Btn,
        Job::Fsh,
    ];

    /// Upper-case abbreviation as it appears in combat data and user input
    pub const fn abbreviation(&self) -> &'static str {
        match self {
            Job::Ukn => "UKN",
            Job::Gla => "GLA",
            Job::Pgl => "PGL",
            Job::Mrd => "MRD",
            Job::Lnc => "LNC",
            Job::Arc => "ARC",
            Job::Cnj => "CNJ",
            Job::Thm => "THM",
            Job::Acn => "ACN",
            Job::Rog => "ROG",
            Job::Pld => "PLD",
            Job::War => "WAR",
            Job::Drk => "DRK",
            Job::Gnb => "GNB",
            Job::Whm => "WHM",
            Job::Sch => "SCH",
            Job::Ast => "AST",
            Job::Sge => "SGE",
            Job::Mnk => "MNK",
            Job::Drg => "DRG",
            Job::Nin => "NIN",
            Job::Sam => "SAM",
            Job::Rpr => "RPR",
            Job::Vpr => "VPR",
            Job::Brd => "BRD",
            Job::Mch => "MCH",
            Job::Dnc => "DNC",
            Job::Blm => "BLM",
            Job::Smn => "SMN",
            Job::Rdm => "RDM",
            Job::Pct => "PCT",
            Job::Blu => "BLU",
            Job::Crp => "CRP",
            Job::Bsm => "BSM",
            Job::Arm => "ARM",
            Job::Gsm => "GSM",
            Job::Ltw => "LTW",
            Job::Wvr => "WVR",
            Job::Alc => "ALC",
            Job::Cul => "CUL",
            Job::Min => "MIN",
            Job::Btn => "BTN",
            Job::Fsh => "FSH",
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// A job token that does not name any known job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseJobError {
    pub token: String,
}

impl fmt::Display for ParseJobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown job '{}'", self.token)
    }
}

impl std::error::Error for ParseJobError {}

impl FromStr for Job {
    type Err = ParseJobError;

    /// Case-insensitive lookup by abbreviation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Job::ALL
            .iter()
            .copied()
            .find(|job| job.abbreviation().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseJobError {
                token: s.to_string(),
            })
    }
}

/// Parse a comma separated job list (e.g. "WAR, sam,BLM").
///
/// All-or-nothing: the first token that is not a job (an empty token included)
/// rejects the whole list.
pub fn parse_job_list(input: &str) -> Result<Vec<Job>, ParseJobError> {
    input.split(',').map(|token| token.trim().parse()).collect()
}

/// Which jobs a meter window is shown for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    All,
    /// Only the jobs listed in `custom_job_list`
    Custom,
    None,
}

// ─────────────────────────────────────────────────────────────────────────────
// Meter Data
// ─────────────────────────────────────────────────────────────────────────────

/// Metric a meter window ranks combatants by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MeterDataType {
    #[default]
    Damage,
    Healing,
    DamageTaken,
    /// Selector written by a newer or foreign build; every value reads as 0
    #[serde(other)]
    Unknown,
}

impl MeterDataType {
    /// Short label for headers (DPS, HPS, DTPS)
    pub fn rate_label(&self) -> &'static str {
        match self {
            MeterDataType::Damage => "DPS",
            MeterDataType::Healing => "HPS",
            MeterDataType::DamageTaken => "DTPS",
            MeterDataType::Unknown => "-",
        }
    }
}

/// Connection state of the combat feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    ShuttingDown,
    Failed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Serde Default Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_position() -> [f32; 2] {
    [100.0, 100.0]
}
fn default_size() -> [f32; 2] {
    [250.0, 250.0]
}
fn default_bar_count() -> usize {
    8
}
fn default_font_key() -> String {
    "Expressway_16".to_string()
}
fn default_feed_address() -> String {
    "ws://127.0.0.1:10501/ws".to_string()
}
fn default_reconnect_delay_secs() -> u32 {
    30
}
fn default_history_size() -> usize {
    15
}

// ─────────────────────────────────────────────────────────────────────────────
// Visibility
// ─────────────────────────────────────────────────────────────────────────────

/// User-configured predicates deciding whether a meter window renders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityRules {
    pub always_hide: bool,
    pub hide_in_combat: bool,
    pub hide_outside_combat: bool,
    pub hide_outside_duty: bool,
    pub hide_while_performing: bool,
    pub hide_in_pvp: bool,
    pub hide_in_golden_saucer: bool,
    pub hide_in_field_operations: bool,
    pub hide_if_not_connected: bool,
    pub show_for_job_types: JobType,
    /// Raw text the custom job list was parsed from (kept for editing)
    pub custom_job_string: String,
    pub custom_job_list: Vec<Job>,
}

/// Visibility page in the pre-options format.
///
/// Still read from old config files and exports; migrated into
/// [`VisibilitySettings`] once on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityConfig {
    #[serde(flatten)]
    pub rules: VisibilityRules,
    #[serde(default = "default_true")]
    pub should_clip: bool,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            rules: VisibilityRules::default(),
            should_clip: true,
        }
    }
}

/// One named rule set inside [`VisibilitySettings`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisibilityOption {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rules: VisibilityRules,
}

/// Current visibility page.
///
/// The window is shown only if every option allows it; no options means
/// always shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilitySettings {
    /// Set once the legacy page has been migrated (or the page was built new)
    #[serde(default)]
    pub initialized: bool,
    /// Skip drawing while another opaque window covers the meter
    #[serde(default = "default_true")]
    pub should_clip: bool,
    #[serde(default)]
    pub options: Vec<VisibilityOption>,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            initialized: false,
            should_clip: true,
            options: Vec::new(),
        }
    }
}

impl VisibilitySettings {
    /// Replace the options with a single option carrying the legacy rule set.
    pub fn set_old_config(&mut self, old: &VisibilityConfig) {
        self.options = vec![VisibilityOption {
            name: "Default".to_string(),
            rules: old.rules.clone(),
        }];
        self.should_clip = old.should_clip;
        self.initialized = true;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Meter Window Pages
// ─────────────────────────────────────────────────────────────────────────────

/// General window behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_position")]
    pub position: [f32; 2],
    #[serde(default = "default_size")]
    pub size: [f32; 2],
    #[serde(default)]
    pub lock: bool,
    #[serde(default)]
    pub click_through: bool,
    /// Show synthetic demo data instead of the feed
    #[serde(default)]
    pub preview: bool,
    /// Jump back to live data when combat starts
    #[serde(default = "default_true")]
    pub return_to_current: bool,
    #[serde(default)]
    pub data_type: MeterDataType,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            position: default_position(),
            size: default_size(),
            lock: false,
            click_through: false,
            preview: false,
            return_to_current: true,
            data_type: MeterDataType::Damage,
        }
    }
}

/// Bar list behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarConfig {
    /// Number of bars visible at once
    #[serde(default = "default_bar_count")]
    pub bar_count: usize,
    /// Keep the local player's bar in view while scrolled
    #[serde(default)]
    pub always_show_self: bool,
    /// Replace the generic "YOU" label with the character name
    #[serde(default)]
    pub use_character_name: bool,
    #[serde(default = "default_font_key")]
    pub font_key: String,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            bar_count: default_bar_count(),
            always_show_self: false,
            use_character_name: false,
            font_key: default_font_key(),
        }
    }
}

/// Persisted settings of one meter window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterWindowConfig {
    pub name: String,
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub bars: BarConfig,
    /// Legacy visibility page, kept so old configs can still be migrated
    #[serde(default)]
    pub visibility: VisibilityConfig,
    #[serde(default)]
    pub visibility2: VisibilitySettings,
}

impl MeterWindowConfig {
    /// A new meter starts on the current visibility format
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            general: GeneralConfig::default(),
            bars: BarConfig::default(),
            visibility: VisibilityConfig::default(),
            visibility2: VisibilitySettings {
                initialized: true,
                ..Default::default()
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// Combat feed connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_address")]
    pub address: String,
    #[serde(default = "default_true")]
    pub auto_reconnect: bool,
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u32,
    /// Past encounters kept for the context menu
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            address: default_feed_address(),
            auto_reconnect: true,
            reconnect_delay_secs: default_reconnect_delay_secs(),
            history_size: default_history_size(),
        }
    }
}

/// Top-level persisted configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub meters: Vec<MeterWindowConfig>,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_parse_is_case_insensitive() {
        assert_eq!("war".parse::<Job>(), Ok(Job::War));
        assert_eq!("Sam".parse::<Job>(), Ok(Job::Sam));
        assert_eq!(Job::Blm.to_string(), "BLM");
    }

    #[test]
    fn job_list_parses_trimmed_tokens() {
        let jobs = parse_job_list("WAR, sam ,BLM").unwrap();
        assert_eq!(jobs, vec![Job::War, Job::Sam, Job::Blm]);
    }

    #[test]
    fn job_list_rejects_whole_input_on_bad_token() {
        let err = parse_job_list("WAR, XYZ, BLM").unwrap_err();
        assert_eq!(err.token, "XYZ");
        assert!(parse_job_list("WAR,").is_err());
        assert!(parse_job_list("").is_err());
    }

    #[test]
    fn abbreviations_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for job in Job::ALL {
            assert!(seen.insert(job.abbreviation()), "duplicate {job}");
        }
    }

    #[test]
    fn unknown_data_type_deserializes_to_unknown() {
        let parsed: MeterDataType = serde_json::from_str("\"Threat\"").unwrap();
        assert_eq!(parsed, MeterDataType::Unknown);
    }

    #[test]
    fn legacy_visibility_reads_flat_fields() {
        let json = r#"{"always_hide":true,"should_clip":false,"custom_job_list":["WAR"]}"#;
        let cfg: VisibilityConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.rules.always_hide);
        assert!(!cfg.should_clip);
        assert_eq!(cfg.rules.custom_job_list, vec![Job::War]);
    }

    #[test]
    fn set_old_config_installs_single_option() {
        let mut old = VisibilityConfig::default();
        old.rules.hide_in_pvp = true;
        old.should_clip = false;

        let mut settings = VisibilitySettings::default();
        settings.set_old_config(&old);

        assert!(settings.initialized);
        assert!(!settings.should_clip);
        assert_eq!(settings.options.len(), 1);
        assert!(settings.options[0].rules.hide_in_pvp);
    }
}
