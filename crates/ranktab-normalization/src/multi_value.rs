//! Aggregation of `/`-separated cell values.
//!
//! A stored value such as `"82.1/79.4?"` holds several reported results; a
//! trailing `?` marks one as estimated. Storage keeps the raw text, and these
//! functions compute what is displayed.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::numeric::{js_display, to_fixed};

/// Strict decimal literal; rejects `1e3`, `128k`, `1,000`.
static NUMERIC_SEGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d*\.?\d+$").expect("Invalid numeric segment regex"));

const SEPARATOR: char = '/';
const ESTIMATE_MARKER: char = '?';

/// Trimmed, non-empty `/` segments of `raw`.
pub fn split_values(raw: &str) -> Vec<String> {
    raw.split(SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_estimate(segment: &str) -> String {
    segment.replacen(ESTIMATE_MARKER, "", 1)
}

fn strip_markers(segment: &str) -> String {
    segment.replacen('%', "", 1).replacen(ESTIMATE_MARKER, "", 1)
}

/// Display value of a stored cell.
///
/// Several numeric segments are averaged; otherwise the first segment is
/// shown without its estimation marker.
///
/// ```
/// use ranktab_normalization::normalize;
///
/// assert_eq!(normalize("82.1/79.4"), "80.8");
/// assert_eq!(normalize("90%/80%"), "85.0%");
/// assert_eq!(normalize("70/72"), "71");
/// assert_eq!(normalize("82.1/unknown"), "82.1");
/// assert_eq!(normalize("75.5?"), "75.5");
/// assert_eq!(normalize("  "), "");
/// ```
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    if !raw.contains(SEPARATOR) {
        return strip_estimate(raw).trim().to_string();
    }

    let parts = split_values(raw);
    match parts.as_slice() {
        [] => String::new(),
        [single] => strip_estimate(single),
        [first, ..] => average(&parts).unwrap_or_else(|| strip_estimate(first)),
    }
}

/// Mean of the segments, formatted, or `None` when any segment is not a number.
fn average(parts: &[String]) -> Option<String> {
    let mut numbers = Vec::with_capacity(parts.len());
    let mut decimals = 0usize;
    for part in parts {
        let clean = strip_markers(part);
        if !NUMERIC_SEGMENT_REGEX.is_match(&clean) {
            return None;
        }
        numbers.push(clean.parse::<f64>().ok()?);
        if let Some((_, fraction)) = clean.split_once('.') {
            decimals = decimals.max(fraction.len());
        }
    }

    let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
    let formatted = if parts.iter().any(|part| part.contains('%')) {
        format!("{}%", to_fixed(mean, 1))
    } else if decimals > 0 {
        to_fixed(mean, decimals)
    } else {
        js_display(mean)
    };
    Some(formatted)
}

/// True when any part of the value is marked as estimated.
pub fn is_estimated(raw: &str) -> bool {
    raw.contains(ESTIMATE_MARKER)
}

/// Segments of a value split by their estimation marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstimationInfo {
    pub has_estimated: bool,
    /// Estimated segments, marker still attached.
    pub estimated: Vec<String>,
    pub confirmed: Vec<String>,
    pub all: Vec<String>,
}

pub fn estimation_info(raw: &str) -> EstimationInfo {
    let all = split_values(raw);
    let (estimated, confirmed): (Vec<String>, Vec<String>) =
        all.iter().cloned().partition(|part| is_estimated(part));
    EstimationInfo {
        has_estimated: !estimated.is_empty(),
        estimated,
        confirmed,
        all,
    }
}

/// Language of the estimation tooltip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

struct Labels {
    single_estimated: &'static str,
    confirmed: &'static str,
    estimated: &'static str,
    average: &'static str,
}

impl Locale {
    fn labels(self) -> Labels {
        match self {
            Locale::Zh => Labels {
                single_estimated: "此值为推测值",
                confirmed: "确定值: ",
                estimated: "推测值: ",
                average: "显示平均值: ",
            },
            Locale::En => Labels {
                single_estimated: "This value is estimated",
                confirmed: "Confirmed: ",
                estimated: "Estimated: ",
                average: "Displayed average: ",
            },
        }
    }
}

/// Tooltip text explaining how a value was derived, in the default locale.
pub fn describe_estimation(raw: &str) -> Option<String> {
    describe_estimation_in(raw, Locale::default())
}

/// Tooltip text explaining how a value was derived.
///
/// Returns `None` for empty input and for a single unmarked value.
pub fn describe_estimation_in(raw: &str, locale: Locale) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    let labels = locale.labels();
    let info = estimation_info(raw);
    if info.all.len() <= 1 {
        return info
            .has_estimated
            .then(|| labels.single_estimated.to_string());
    }

    let mut lines = Vec::with_capacity(3);
    if !info.confirmed.is_empty() {
        lines.push(format!("{}{}", labels.confirmed, info.confirmed.join(", ")));
    }
    if !info.estimated.is_empty() {
        let cleaned: Vec<String> = info.estimated.iter().map(|v| strip_estimate(v)).collect();
        lines.push(format!("{}{}", labels.estimated, cleaned.join(", ")));
    }
    lines.push(format!("{}{}", labels.average, normalize(raw)));
    Some(lines.join("\n"))
}
