//! Configuration validation.
//!
//! Runs against the raw config before any data is fetched, so a bad window or
//! threshold fails fast with the offending section and key.

use crate::domain::error::CycleError;
use crate::domain::halving::DEFAULT_NEXT_HALVING_OFFSET;
use crate::domain::indicator_set::{DEFAULT_CIRCULATING_SUPPLY, WindowConfig};
use crate::domain::regime::RegimeThresholds;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), CycleError> {
    validate_dates(config)?;
    validate_history_start(config)?;
    validate_supply(config)?;
    validate_windows(config)?;
    validate_thresholds(config)?;
    validate_halving_offset(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> CycleError {
    CycleError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

pub fn parse_date(
    value: Option<&str>,
    section: &str,
    field: &str,
) -> Result<NaiveDate, CycleError> {
    match value {
        None => Err(CycleError::ConfigMissing {
            section: section.to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                section,
                field,
                format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), CycleError> {
    let start_str = config.get_string("analysis", "start_date");
    let end_str = config.get_string("analysis", "end_date");

    let start_date = parse_date(start_str.as_deref(), "analysis", "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "analysis", "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "analysis",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

fn validate_history_start(config: &dyn ConfigPort) -> Result<(), CycleError> {
    if let Some(s) = config.get_string("analysis", "history_start") {
        parse_date(Some(&s), "analysis", "history_start")?;
    }
    Ok(())
}

fn validate_supply(config: &dyn ConfigPort) -> Result<(), CycleError> {
    let value = config.get_double("analysis", "circulating_supply", DEFAULT_CIRCULATING_SUPPLY);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "analysis",
            "circulating_supply",
            "circulating_supply must be positive",
        ));
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), CycleError> {
    let defaults = WindowConfig::default();
    let windows = [
        ("rsi", defaults.rsi),
        ("volatility", defaults.volatility),
        ("ma_short", defaults.ma_short),
        ("ma_meyer", defaults.ma_meyer),
        ("ma_long", defaults.ma_long),
    ];
    for (key, default) in windows {
        if config.get_int("windows", key, default as i64) < 1 {
            return Err(invalid("windows", key, format!("{} must be at least 1", key)));
        }
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), CycleError> {
    let defaults = RegimeThresholds::default();
    let thresholds = [
        ("overheat_rsi", defaults.overheat_rsi),
        ("overheat_meyer", defaults.overheat_meyer),
        ("overheat_mvrv", defaults.overheat_mvrv),
        ("extreme_rsi", defaults.extreme_rsi),
        ("extreme_meyer", defaults.extreme_meyer),
        ("extreme_mvrv", defaults.extreme_mvrv),
    ];
    for (key, default) in thresholds {
        if !config.get_double("regime", key, default).is_finite() {
            return Err(invalid("regime", key, format!("{} must be finite", key)));
        }
    }

    for key in ["overheat_rsi", "extreme_rsi"] {
        let value = config.get_double("regime", key, 70.0);
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid("regime", key, format!("{} must be between 0 and 100", key)));
        }
    }
    Ok(())
}

fn validate_halving_offset(config: &dyn ConfigPort) -> Result<(), CycleError> {
    let value = config.get_int("halving", "next_offset", DEFAULT_NEXT_HALVING_OFFSET as i64);
    if value < 1 {
        return Err(invalid(
            "halving",
            "next_offset",
            "next_offset must be at least 1",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const DATES: &str = "[analysis]\nstart_date = 2015-01-01\nend_date = 2026-01-01\n";

    #[test]
    fn valid_config_passes() {
        let config = make_config(
            r#"
[analysis]
start_date = 2015-01-01
end_date = 2026-01-01
history_start = 2014-09-17
circulating_supply = 19000000
symbol = BTC-USD

[windows]
rsi = 14
volatility = 30
ma_short = 111
ma_meyer = 200
ma_long = 350

[regime]
overheat_rsi = 70
extreme_mvrv = 2.5

[halving]
next_offset = 6
"#,
        );
        assert!(validate_analysis_config(&config).is_ok());
    }

    #[test]
    fn minimal_config_uses_defaults() {
        assert!(validate_analysis_config(&make_config(DATES)).is_ok());
    }

    #[test]
    fn missing_start_date_fails() {
        let config = make_config("[analysis]\nend_date = 2026-01-01\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, CycleError::ConfigMissing { key, .. } if key == "start_date"));
    }

    #[test]
    fn invalid_end_date_format_fails() {
        let config = make_config("[analysis]\nstart_date = 2015-01-01\nend_date = 01/01/2026\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "end_date"));
    }

    #[test]
    fn start_not_before_end_fails() {
        let config = make_config("[analysis]\nstart_date = 2026-01-01\nend_date = 2026-01-01\n");
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn bad_history_start_fails() {
        let config = make_config(&format!("{}history_start = soon\n", DATES));
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "history_start"));
    }

    #[test]
    fn non_positive_supply_fails() {
        let config = make_config(&format!("{}circulating_supply = 0\n", DATES));
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(
            matches!(err, CycleError::ConfigInvalid { key, .. } if key == "circulating_supply")
        );
    }

    #[test]
    fn zero_window_fails() {
        let config = make_config(&format!("{}[windows]\nma_meyer = 0\n", DATES));
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "ma_meyer"));
    }

    #[test]
    fn rsi_threshold_out_of_range_fails() {
        let config = make_config(&format!("{}[regime]\nextreme_rsi = 120\n", DATES));
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "extreme_rsi"));
    }

    #[test]
    fn zero_halving_offset_fails() {
        let config = make_config(&format!("{}[halving]\nnext_offset = 0\n", DATES));
        let err = validate_analysis_config(&config).unwrap_err();
        assert!(matches!(err, CycleError::ConfigInvalid { key, .. } if key == "next_offset"));
    }
}
