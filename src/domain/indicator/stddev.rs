//! Sample standard deviation helpers.
//!
//! STDDEV = sqrt(sum((x - mean)^2) / (n - 1))
//! Fewer than two samples is undefined.

/// Sample standard deviation of `values`, `None` for fewer than two values.
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;

    Some(variance.sqrt())
}

/// Trailing sample standard deviation over `period` values.
///
/// A window containing any undefined value is undefined.
pub fn rolling_stddev(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut window: Vec<f64> = Vec::with_capacity(period);

    for i in 0..values.len() {
        if period < 2 || i + 1 < period {
            out.push(None);
            continue;
        }

        window.clear();
        let complete = values[i + 1 - period..=i].iter().all(|v| match v {
            Some(x) => {
                window.push(*x);
                true
            }
            None => false,
        });
        out.push(if complete { sample_stddev(&window) } else { None });
    }

    out
}
