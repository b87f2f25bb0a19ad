//! Helpers for renderers: price axis labels and the reference bands shaded
//! behind each indicator panel.

/// Inclusive `[low, high]` band on an indicator's axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceBand {
    pub name: &'static str,
    pub low: f64,
    pub high: f64,
}

impl ReferenceBand {
    const fn new(name: &'static str, low: f64, high: f64) -> Self {
        Self { name, low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

pub const RSI_BANDS: [ReferenceBand; 3] = [
    ReferenceBand::new("oversold", 0.0, 30.0),
    ReferenceBand::new("neutral", 30.0, 70.0),
    ReferenceBand::new("overbought", 70.0, 100.0),
];

pub const FEAR_GREED_BANDS: [ReferenceBand; 2] = [
    ReferenceBand::new("fear", 0.0, 20.0),
    ReferenceBand::new("greed", 80.0, 100.0),
];

pub const MEYER_BANDS: [ReferenceBand; 2] = [
    ReferenceBand::new("undervalued", 0.0, 1.0),
    ReferenceBand::new("overvalued", 2.4, 4.0),
];

pub const MVRV_BANDS: [ReferenceBand; 2] = [
    ReferenceBand::new("undervalued", -2.0, 0.0),
    ReferenceBand::new("overvalued", 2.0, 4.0),
];

/// First band containing `value`; lower bands win on shared edges.
pub fn band_for(bands: &[ReferenceBand], value: f64) -> Option<&'static str> {
    bands.iter().find(|b| b.contains(value)).map(|b| b.name)
}

/// Compact price label: `1.2e6 -> "1M"`, `65000 -> "65k"`, `950 -> "950"`.
pub fn format_price(value: f64) -> String {
    if value >= 1e6 {
        format!("{:.0}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.0}k", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

/// `"-"` for undefined readings, otherwise fixed precision.
pub fn format_reading(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}
