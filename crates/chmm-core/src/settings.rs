//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub cost: CostSettings,
    pub npath: NPathSettings,
    pub recognizer: RecognizerSettings,
    pub cascade: CascadeSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CostSettings {
    pub unknown_char_cost: f64,
    pub atom_cost: f64,
    pub smoothing: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NPathSettings {
    pub nbest: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognizerSettings {
    pub number_cost: f64,
    pub datetime_cost: f64,
    pub name_penalty: f64,
    pub foreign_name_penalty: f64,
    pub foreign_name_min_chars: usize,
    pub org_penalty: f64,
    pub org_max_prefix_terms: usize,
    pub max_variants: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CascadeSettings {
    pub max_candidates: usize,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_negative {
        ($section:ident . $field:ident) => {
            if !(s.$section.$field >= 0.0) {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be non-negative".to_string(),
                });
            }
        };
    }
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_non_negative!(cost.unknown_char_cost);
    check_non_negative!(cost.atom_cost);
    if !(0.0..=1.0).contains(&s.cost.smoothing) {
        return Err(SettingsError::InvalidValue {
            field: "cost.smoothing".to_string(),
            reason: "must be within [0, 1]".to_string(),
        });
    }

    check_positive_usize!(npath.nbest);

    check_non_negative!(recognizer.number_cost);
    check_non_negative!(recognizer.datetime_cost);
    check_non_negative!(recognizer.name_penalty);
    check_non_negative!(recognizer.foreign_name_penalty);
    check_non_negative!(recognizer.org_penalty);
    check_positive_usize!(recognizer.foreign_name_min_chars);
    check_positive_usize!(recognizer.org_max_prefix_terms);
    check_positive_usize!(recognizer.max_variants);

    check_positive_usize!(cascade.max_candidates);

    Ok(())
}
