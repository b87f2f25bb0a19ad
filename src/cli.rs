//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvMacroAdapter, CsvPriceAdapter};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{
    self, API_KEY_ENV, AnalysisConfig, CycleReport, DEFAULT_M2_SERIES, DEFAULT_RATE_SERIES,
    DEFAULT_SYMBOL, DisplayPreset, default_history_start, resolve_api_key,
};
use crate::domain::config_validation::{parse_date, validate_analysis_config};
use crate::domain::error::CycleError;
use crate::domain::halving::{DEFAULT_NEXT_HALVING_OFFSET, HalvingCalendar};
use crate::domain::indicator::IndicatorPoint;
use crate::domain::indicator_set::{DEFAULT_CIRCULATING_SUPPLY, WindowConfig};
use crate::domain::presentation::{
    FEAR_GREED_BANDS, MEYER_BANDS, MVRV_BANDS, RSI_BANDS, ReferenceBand, band_for, format_price,
    format_reading,
};
use crate::domain::regime::{RegimeThresholds, ZoneLabel, count_zones};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "halvcycle", about = "Bitcoin halving-cycle indicators and regime zones")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute indicators and regime zones, write the daily CSV
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Daily CSV output; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        monthly_out: Option<PathBuf>,
        #[arg(long)]
        api_key: Option<String>,
        /// Reference date for presets and the countdown (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// full, around-year, last-5-years, last-year, last-month, last-week
        #[arg(long)]
        preset: Option<DisplayPreset>,
    },
    /// Print the halving schedule and the cycle-top countdown
    Halvings {
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long, default_value_t = DEFAULT_NEXT_HALVING_OFFSET)]
        offset: usize,
    },
    /// Validate an analysis configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            output,
            monthly_out,
            api_key,
            today,
            preset,
        } => run_analyze(
            &config,
            output.as_ref(),
            monthly_out.as_ref(),
            api_key.as_deref(),
            today.unwrap_or_else(local_today),
            preset,
        ),
        Command::Halvings { today, offset } => {
            run_halvings(today.unwrap_or_else(local_today), offset)
        }
        Command::Validate { config } => run_validate(&config),
    }
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = CycleError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn window(adapter: &dyn ConfigPort, key: &str, default: usize) -> usize {
    adapter.get_int("windows", key, default as i64).max(1) as usize
}

/// Builds the explicit analysis parameters from a validated config.
pub fn build_analysis_config(
    adapter: &dyn ConfigPort,
    api_key_override: Option<&str>,
    env_key: Option<&str>,
) -> Result<AnalysisConfig, CycleError> {
    let start_str = adapter.get_string("analysis", "start_date");
    let end_str = adapter.get_string("analysis", "end_date");
    let start_date = parse_date(start_str.as_deref(), "analysis", "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "analysis", "end_date")?;

    let history_start = match adapter.get_string("analysis", "history_start") {
        Some(s) => parse_date(Some(&s), "analysis", "history_start")?,
        None => default_history_start(),
    };

    let defaults = WindowConfig::default();
    let windows = WindowConfig {
        rsi: window(adapter, "rsi", defaults.rsi),
        volatility: window(adapter, "volatility", defaults.volatility),
        ma_short: window(adapter, "ma_short", defaults.ma_short),
        ma_meyer: window(adapter, "ma_meyer", defaults.ma_meyer),
        ma_long: window(adapter, "ma_long", defaults.ma_long),
    };

    let t = RegimeThresholds::default();
    let thresholds = RegimeThresholds {
        overheat_rsi: adapter.get_double("regime", "overheat_rsi", t.overheat_rsi),
        overheat_meyer: adapter.get_double("regime", "overheat_meyer", t.overheat_meyer),
        overheat_mvrv: adapter.get_double("regime", "overheat_mvrv", t.overheat_mvrv),
        extreme_rsi: adapter.get_double("regime", "extreme_rsi", t.extreme_rsi),
        extreme_meyer: adapter.get_double("regime", "extreme_meyer", t.extreme_meyer),
        extreme_mvrv: adapter.get_double("regime", "extreme_mvrv", t.extreme_mvrv),
    };

    let config_key = adapter.get_string("macro", "api_key");

    Ok(AnalysisConfig {
        symbol: adapter
            .get_string("analysis", "symbol")
            .unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
        history_start,
        start_date,
        end_date,
        circulating_supply: adapter.get_double(
            "analysis",
            "circulating_supply",
            DEFAULT_CIRCULATING_SUPPLY,
        ),
        windows,
        thresholds,
        next_halving_offset: adapter
            .get_int("halving", "next_offset", DEFAULT_NEXT_HALVING_OFFSET as i64)
            .max(1) as usize,
        api_key: resolve_api_key(api_key_override, config_key.as_deref(), env_key),
        m2_series: adapter
            .get_string("macro", "m2_series")
            .unwrap_or_else(|| DEFAULT_M2_SERIES.to_string()),
        rate_series: adapter
            .get_string("macro", "rate_series")
            .unwrap_or_else(|| DEFAULT_RATE_SERIES.to_string()),
    })
}

pub fn data_dir(adapter: &dyn ConfigPort) -> PathBuf {
    adapter
        .get_string("data", "dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn run_analyze(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    monthly_path: Option<&PathBuf>,
    api_key_override: Option<&str>,
    today: NaiveDate,
    preset: Option<DisplayPreset>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate
    if let Err(e) = validate_analysis_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 3: Build AnalysisConfig
    let env_key = std::env::var(API_KEY_ENV).ok();
    let mut config = match build_analysis_config(&adapter, api_key_override, env_key.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(p) = preset {
        (config.start_date, config.end_date) = p.range(today);
    }

    // Stage 4: Fetch price and macro data
    let dir = data_dir(&adapter);
    eprintln!(
        "Fetching {} from {} (history from {})",
        config.symbol,
        dir.display(),
        config.history_start
    );
    let price_feed = CsvPriceAdapter::new(dir.clone());
    let macro_feed = CsvMacroAdapter::new(dir);
    let frame = match analysis::fetch_frame(&price_feed, &macro_feed, &config, today) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if frame.is_empty() {
        let e = CycleError::EmptyFeed {
            symbol: config.symbol.clone(),
        };
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("  Loaded: {} observations", frame.len());

    // Stage 5: Compute indicators and classify
    let report = analysis::run_analysis(&frame, &config, &HalvingCalendar::default(), today);

    // Stage 6: Console summary
    print_summary(&report, &config);

    // Stage 7: Write CSV output
    let reporter = CsvReportAdapter;
    let written = match output_path {
        Some(path) => {
            eprintln!("\nWriting daily rows to {}", path.display());
            reporter.write(&report, config.start_date, config.end_date, &path_str(path))
        }
        None => reporter.write_daily_to(
            std::io::stdout().lock(),
            &report,
            config.start_date,
            config.end_date,
        ),
    };
    if let Err(e) = written {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if let Some(path) = monthly_path {
        eprintln!("Writing monthly RSI to {}", path.display());
        if let Err(e) =
            reporter.write_monthly(&report, config.start_date, config.end_date, &path_str(path))
        {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    ExitCode::SUCCESS
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn reading_line(label: &str, point: Option<IndicatorPoint>, bands: &[ReferenceBand]) {
    match point {
        Some(p) => {
            let band = p.value.and_then(|v| band_for(bands, v)).unwrap_or("-");
            eprintln!(
                "{:<17} {:>8}  ({}, {})",
                format!("{}:", label),
                format_reading(p.value, 2),
                p.date,
                band
            );
        }
        None => eprintln!("{:<17} {:>8}", format!("{}:", label), "-"),
    }
}

pub fn print_summary(report: &CycleReport, config: &AnalysisConfig) {
    let latest = report.latest();

    eprintln!("\n=== Latest Readings ===");
    match report.last_data_day() {
        Some(day) => eprintln!("Last data day:    {}", day),
        None => eprintln!("Last data day:    -"),
    }
    eprintln!(
        "Close:            {}",
        latest.close.map(format_price).unwrap_or_else(|| "-".into())
    );
    reading_line("RSI (daily)", latest.rsi_daily, &RSI_BANDS);
    reading_line("RSI (monthly)", latest.rsi_monthly, &RSI_BANDS);
    reading_line("Meyer Multiple", latest.meyer_multiple, &MEYER_BANDS);
    reading_line("MVRV Z-Score", latest.mvrv_z_score, &MVRV_BANDS);
    reading_line("Fear/Greed", latest.fear_greed, &FEAR_GREED_BANDS);

    let counts = count_zones(&report.zones_between(config.start_date, config.end_date));
    eprintln!("\n=== Regime Zones ===");
    eprintln!("None:             {} days", counts.none);
    eprintln!("Overheat:         {} days", counts.overheat);
    eprintln!("Extreme:          {} days", counts.extreme);

    let spans: Vec<_> = report
        .zone_spans()
        .into_iter()
        .filter(|s| s.end > config.start_date && s.start <= config.end_date)
        .collect();
    for span in &spans {
        eprintln!("  {:<9} {} .. {}", span.label.as_str(), span.start, span.end);
    }

    eprintln!("\n=== Halving Countdown ===");
    print_countdown(
        report.next_halving.map(|e| e.date),
        report.days_until_top,
        report.months_until_top,
    );
}

fn print_countdown(halving: Option<NaiveDate>, days: Option<i64>, months: Option<i64>) {
    match (halving, days, months) {
        (Some(h), Some(d), Some(m)) => {
            eprintln!("Countdown halving: {}", h);
            eprintln!("Days until top:    {}", d);
            eprintln!("Months until top:  {}", m);
        }
        _ => eprintln!("Countdown halving: offset outside the schedule"),
    }
}

fn run_halvings(today: NaiveDate, offset: usize) -> ExitCode {
    let calendar = HalvingCalendar::default();

    for event in calendar.events() {
        let window = event.top_window();
        println!(
            "{}  {:<9}  top {} .. {}",
            event.date,
            if event.projected { "projected" } else { "known" },
            window.start,
            window.end
        );
    }

    if let Some(next) = calendar.first_after(today) {
        eprintln!("\nNext halving after {}: {}", today, next.date);
    }
    if let Some(current) = calendar
        .top_windows()
        .into_iter()
        .find(|w| w.contains(today))
    {
        eprintln!("{} is inside a top window ({} .. {})", today, current.start, current.end);
    }
    print_countdown(
        calendar.next_halving(offset).map(|e| e.date),
        calendar.days_until_top(offset, today),
        calendar.months_until_top(offset, today),
    );
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_analysis_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let env_key = std::env::var(API_KEY_ENV).ok();
    let config = match build_analysis_config(&adapter, None, env_key.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let w = &config.windows;
    let t = &config.thresholds;
    eprintln!("\nSymbol:          {}", config.symbol);
    eprintln!("Display window:  {} .. {}", config.start_date, config.end_date);
    eprintln!("History from:    {}", config.history_start);
    eprintln!("Supply:          {}", format_price(config.circulating_supply));
    eprintln!(
        "Windows:         RSI {}, volatility {}, MA {}/{}/{}",
        w.rsi, w.volatility, w.ma_short, w.ma_meyer, w.ma_long
    );
    eprintln!(
        "{:<16} RSI > {}, MM > {}, Z >= {}",
        format!("{}:", ZoneLabel::Overheat),
        t.overheat_rsi,
        t.overheat_meyer,
        t.overheat_mvrv
    );
    eprintln!(
        "{:<16} RSI >= {}, MM > {}, Z >= {}",
        format!("{}:", ZoneLabel::Extreme),
        t.extreme_rsi,
        t.extreme_meyer,
        t.extreme_mvrv
    );
    eprintln!("Macro series:    {}, {}", config.m2_series, config.rate_series);
    eprintln!("Data dir:        {}", data_dir(&adapter).display());

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn build_config_with_defaults() {
        let adapter = FileConfigAdapter::from_string(
            "[analysis]\nstart_date = 2020-01-01\nend_date = 2026-01-01\n",
        )
        .unwrap();
        let config = build_analysis_config(&adapter, None, None).unwrap();
        assert_eq!(config, AnalysisConfig::new(d(2020, 1, 1), d(2026, 1, 1)));
        assert_eq!(data_dir(&adapter), PathBuf::from("."));
    }

    #[test]
    fn build_config_reads_every_section() {
        let adapter = FileConfigAdapter::from_string(
            r#"
[analysis]
start_date = 2020-01-01
end_date = 2026-01-01
history_start = 2014-01-01
circulating_supply = 19500000
symbol = BTC-EUR

[windows]
rsi = 21
ma_long = 300

[regime]
extreme_mvrv = 3

[halving]
next_offset = 5

[macro]
api_key = from-config
rate_series = DFF

[data]
dir = /data
"#,
        )
        .unwrap();
        let config = build_analysis_config(&adapter, None, Some("from-env")).unwrap();
        assert_eq!(config.symbol, "BTC-EUR");
        assert_eq!(config.history_start, d(2014, 1, 1));
        assert_eq!(config.circulating_supply, 19_500_000.0);
        assert_eq!(config.windows.rsi, 21);
        assert_eq!(config.windows.ma_long, 300);
        assert_eq!(config.windows.ma_short, 111);
        assert_eq!(config.thresholds.extreme_mvrv, 3.0);
        assert_eq!(config.next_halving_offset, 5);
        assert_eq!(config.api_key, "from-config");
        assert_eq!(config.m2_series, "M2SL");
        assert_eq!(config.rate_series, "DFF");
        assert_eq!(data_dir(&adapter), PathBuf::from("/data"));
    }

    #[test]
    fn cli_key_beats_config_key() {
        let adapter = FileConfigAdapter::from_string(
            "[analysis]\nstart_date = 2020-01-01\nend_date = 2026-01-01\n[macro]\napi_key = cfg\n",
        )
        .unwrap();
        let config = build_analysis_config(&adapter, Some("cli"), Some("env")).unwrap();
        assert_eq!(config.api_key, "cli");
    }

    #[test]
    fn build_config_missing_dates_fails() {
        let adapter = FileConfigAdapter::from_string("[analysis]\n").unwrap();
        let err = build_analysis_config(&adapter, None, None).unwrap_err();
        assert!(matches!(err, CycleError::ConfigMissing { key, .. } if key == "start_date"));
    }

    #[test]
    fn parses_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "halvcycle",
            "analyze",
            "-c",
            "cycle.ini",
            "--today",
            "2025-06-01",
            "--preset",
            "last-year",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze { today, preset, output, .. } => {
                assert_eq!(today, Some(d(2025, 6, 1)));
                assert_eq!(preset, Some(DisplayPreset::LastYear));
                assert!(output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn halvings_offset_defaults() {
        let cli = Cli::try_parse_from(["halvcycle", "halvings"]).unwrap();
        match cli.command {
            Command::Halvings { offset, today } => {
                assert_eq!(offset, DEFAULT_NEXT_HALVING_OFFSET);
                assert!(today.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_preset() {
        assert!(
            Cli::try_parse_from(["halvcycle", "analyze", "-c", "x.ini", "--preset", "decade"])
                .is_err()
        );
    }
}
