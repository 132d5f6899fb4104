//! Legacy visibility migration
//!
//! Older configs carry a single flat visibility rule set per meter. The
//! current format holds a list of named options; a meter that has never been
//! converted gets its legacy rules installed as the only option.

use lmeter_types::{AppConfig, MeterWindowConfig};
use tracing::info;

/// Convert one meter. Returns whether anything changed.
pub fn convert_old_window(meter: &mut MeterWindowConfig) -> bool {
    let settings = &mut meter.visibility2;
    if settings.initialized || !settings.options.is_empty() {
        return false;
    }

    settings.set_old_config(&meter.visibility);
    true
}

/// Convert every meter in place, returning how many were converted
pub fn convert_old_configs(config: &mut AppConfig) -> usize {
    let converted = config
        .meters
        .iter_mut()
        .map(convert_old_window)
        .filter(|converted| *converted)
        .count();

    if converted > 0 {
        info!(converted, "Converted legacy visibility settings");
    }
    converted
}
