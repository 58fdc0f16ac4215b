//! Duration parsing and decomposition into BigQuery intervals
//!
//! BigQuery's `TIMESTAMP_ADD`/`TIMESTAMP_SUB` take a single
//! `INTERVAL <amount> <unit>`, so a duration is reduced to one whole amount
//! of one unit. The search for that unit starts at the coarsest unit the
//! duration was written in: `24h` stays `INTERVAL 24 HOUR` and `1h30m`
//! becomes `INTERVAL 90 MINUTE`.

use cel2sql_diagnostics::ConvertError;
use chrono::TimeDelta;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:ns|us|µs|μs|ms|s|m|h|d))+$")
        .expect("duration pattern is valid")
});

static COMPONENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]*)(?:\.([0-9]*))?(ns|us|µs|μs|ms|s|m|h|d)").expect("component pattern is valid")
});

/// Significant fraction digits kept per component
const MAX_FRACTION_DIGITS: usize = 18;

/// Interval units usable in BigQuery date/time arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntervalUnit {
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl IntervalUnit {
    /// Candidate units, coarsest first
    pub const COARSEST_FIRST: [IntervalUnit; 6] = [
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Millisecond,
        Self::Microsecond,
    ];

    /// Length of one unit in nanoseconds
    pub const fn nanos(&self) -> i128 {
        match self {
            Self::Microsecond => 1_000,
            Self::Millisecond => 1_000_000,
            Self::Second => 1_000_000_000,
            Self::Minute => 60 * 1_000_000_000,
            Self::Hour => 3_600 * 1_000_000_000,
            Self::Day => 86_400 * 1_000_000_000,
        }
    }

    /// SQL keyword
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Microsecond => "MICROSECOND",
            Self::Millisecond => "MILLISECOND",
            Self::Second => "SECOND",
            Self::Minute => "MINUTE",
            Self::Hour => "HOUR",
            Self::Day => "DAY",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A whole amount of a single unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub amount: i64,
    pub unit: IntervalUnit,
}

impl Interval {
    pub const fn new(amount: i64, unit: IntervalUnit) -> Self {
        Self { amount, unit }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INTERVAL {} {}", self.amount, self.unit)
    }
}

/// Exact length of a parsed duration string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDuration {
    /// Signed total in nanoseconds
    pub nanos: i128,
    /// Coarsest unit written in the string, `None` for a bare `0`
    pub coarsest: Option<IntervalUnit>,
}

/// Parse a CEL duration string (`"24h"`, `"1h30m"`, `"-1.5s"`, `"300ms"`)
///
/// Accepts the units `ns`, `us`/`µs`, `ms`, `s`, `m`, `h` and `d`, with an
/// optional sign and fractional amounts.
pub fn parse_duration(text: &str) -> Result<ParsedDuration, ConvertError> {
    if matches!(text, "0" | "+0" | "-0") {
        return Ok(ParsedDuration {
            nanos: 0,
            coarsest: None,
        });
    }
    if !DURATION_RE.is_match(text) {
        return Err(ConvertError::invalid_duration(format!(
            "invalid duration {:?}",
            text
        )));
    }

    let negative = text.starts_with('-');
    let mut nanos: i128 = 0;
    let mut coarsest: Option<IntervalUnit> = None;

    for caps in COMPONENT_RE.captures_iter(text) {
        let whole = caps.get(1).map_or("", |m| m.as_str());
        let fraction = caps.get(2).map_or("", |m| m.as_str());
        let (unit_nanos, unit) = unit_of(&caps[3]);

        let component = component_nanos(whole, fraction, unit_nanos)
            .ok_or_else(|| overflow(text))?;
        nanos = nanos.checked_add(component).ok_or_else(|| overflow(text))?;
        coarsest = coarsest.max(Some(unit));
    }

    Ok(ParsedDuration {
        nanos: if negative { -nanos } else { nanos },
        coarsest,
    })
}

/// Reduce `nanos` to the coarsest unit at or below `start` that divides it
pub fn decompose(nanos: i128, start: IntervalUnit) -> Result<Interval, ConvertError> {
    let unit = IntervalUnit::COARSEST_FIRST
        .into_iter()
        .filter(|u| *u <= start)
        .find(|u| nanos % u.nanos() == 0)
        .ok_or_else(|| {
            ConvertError::invalid_duration(format!(
                "{}ns is not a whole number of microseconds",
                nanos
            ))
        })?;

    let amount = i64::try_from(nanos / unit.nanos()).map_err(|_| {
        ConvertError::out_of_range("duration", format!("{}ns does not fit an interval", nanos))
    })?;
    Ok(Interval::new(amount, unit))
}

/// Parse a duration string and decompose it, starting at its coarsest unit
pub fn interval_from_str(text: &str) -> Result<Interval, ConvertError> {
    let parsed = parse_duration(text)?;
    decompose(parsed.nanos, parsed.coarsest.unwrap_or(IntervalUnit::Second))
}

/// Decompose a duration value, starting at hours
pub fn interval_from_delta(delta: TimeDelta) -> Result<Interval, ConvertError> {
    decompose(delta_nanos(delta), IntervalUnit::Hour)
}

/// Express a duration in whole days, as required by `DATE_ADD`/`DATE_SUB`
pub fn whole_days(nanos: i128) -> Result<Interval, ConvertError> {
    if nanos % IntervalUnit::Day.nanos() != 0 {
        return Err(ConvertError::invalid_duration(format!(
            "{}ns is not a whole number of days",
            nanos
        )));
    }
    decompose(nanos, IntervalUnit::Day)
}

/// Total nanoseconds of a `TimeDelta`
pub fn delta_nanos(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * 1_000_000_000 + i128::from(delta.subsec_nanos())
}

fn unit_of(suffix: &str) -> (i128, IntervalUnit) {
    match suffix {
        "ns" => (1, IntervalUnit::Microsecond),
        "us" | "µs" | "μs" => (1_000, IntervalUnit::Microsecond),
        "ms" => (IntervalUnit::Millisecond.nanos(), IntervalUnit::Millisecond),
        "s" => (IntervalUnit::Second.nanos(), IntervalUnit::Second),
        "m" => (IntervalUnit::Minute.nanos(), IntervalUnit::Minute),
        "h" => (IntervalUnit::Hour.nanos(), IntervalUnit::Hour),
        _ => (IntervalUnit::Day.nanos(), IntervalUnit::Day),
    }
}

fn component_nanos(whole: &str, fraction: &str, unit_nanos: i128) -> Option<i128> {
    let whole_value: i128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut total = whole_value.checked_mul(unit_nanos)?;

    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if !fraction.is_empty() {
        let digits: i128 = fraction.parse().ok()?;
        let scale = 10i128.pow(fraction.len() as u32);
        total = total.checked_add(digits * unit_nanos / scale)?;
    }
    Some(total)
}

fn overflow(text: &str) -> ConvertError {
    ConvertError::out_of_range("duration", format!("duration {:?} is too large", text))
}
