use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// `PriceBar` is a single daily bar. Values are taken as given,
/// nothing checks that `high >= low`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl PriceBar {
    pub fn parse(high: &str, low: &str, close: &str, open: &str) -> Result<PriceBar> {
        Ok(PriceBar {
            high: parse_price("high", high)?,
            low: parse_price("low", low)?,
            close: parse_price("close", close)?,
            open: parse_price("open", open)?,
        })
    }
}

/// Largest magnitude a price may have. No formula grows its inputs
/// by more than a factor of five, so bars within this bound never
/// overflow.
pub fn max_price() -> Decimal {
    Decimal::MAX / Decimal::new(8, 0)
}

/// Parses one price field, accepting plain or scientific notation.
pub fn parse_price(field: &'static str, input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    let invalid = |source: rust_decimal::Error| Error::InvalidNumericInput {
        field,
        input: trimmed.to_string(),
        source,
    };
    let value = Decimal::from_str(trimmed)
        .or_else(|err| Decimal::from_scientific(trimmed).map_err(|_| err))
        .map_err(invalid)?;

    let limit = max_price();
    if value > limit {
        return Err(invalid(rust_decimal::Error::ExceedsMaximumPossibleValue));
    }
    if value < -limit {
        return Err(invalid(rust_decimal::Error::LessThanMinimumPossibleValue));
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    P,
    R1,
    R2,
    R3,
    R4,
    S1,
    S2,
    S3,
    S4,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::P => "P",
            Level::R1 => "R1",
            Level::R2 => "R2",
            Level::R3 => "R3",
            Level::R4 => "R4",
            Level::S1 => "S1",
            Level::S2 => "S2",
            Level::S3 => "S3",
            Level::S4 => "S4",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PivotFamily {
    Standard,
    Fibonacci,
    Camarilla,
    Woodie,
    DeMark,
}

impl PivotFamily {
    /// Families in the order the driver prints them.
    pub const ALL: [PivotFamily; 5] = [
        PivotFamily::Standard,
        PivotFamily::Fibonacci,
        PivotFamily::Camarilla,
        PivotFamily::Woodie,
        PivotFamily::DeMark,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PivotFamily::Standard => "Standard",
            PivotFamily::Fibonacci => "Fibonacci",
            PivotFamily::Camarilla => "Camarilla",
            PivotFamily::Woodie => "Woodie's",
            PivotFamily::DeMark => "DeMark's",
        }
    }

    pub fn compute(self, bar: &PriceBar) -> PivotSet {
        match self {
            PivotFamily::Standard => standard_pivots(bar.high, bar.low, bar.close),
            PivotFamily::Fibonacci => fibonacci_pivots(bar.high, bar.low, bar.close),
            PivotFamily::Camarilla => camarilla_pivots(bar.high, bar.low, bar.close),
            PivotFamily::Woodie => woodie_pivots(bar.high, bar.low, bar.close),
            PivotFamily::DeMark => demark_pivots(bar.high, bar.low, bar.close, bar.open),
        }
    }
}

/// `PivotSet` is the labelled output of one formula family,
/// kept in the order the levels are printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotSet {
    pub family: PivotFamily,
    pub levels: Vec<(Level, Decimal)>,
}

impl PivotSet {
    pub fn get(&self, level: Level) -> Option<Decimal> {
        self.levels
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl fmt::Display for PivotSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Pivot Points:", self.family.name())?;
        for (level, value) in &self.levels {
            write!(f, "\n  {}: {}", level, format_price(*value))?;
        }
        Ok(())
    }
}

/// Renders a price with exactly two fractional digits, rounding
/// half to even.
pub fn format_price(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    format!("{:.2}", rounded)
}

fn fibonacci_ratio(thousandths: i64) -> Decimal {
    Decimal::new(thousandths, 3)
}

pub fn standard_pivots(high: Decimal, low: Decimal, close: Decimal) -> PivotSet {
    let two = Decimal::new(2, 0);
    let p = (high + low + close) / Decimal::new(3, 0);
    PivotSet {
        family: PivotFamily::Standard,
        levels: vec![
            (Level::P, p),
            (Level::R3, high + two * (p - low)),
            (Level::R2, p + (high - low)),
            (Level::R1, two * p - low),
            (Level::S1, two * p - high),
            (Level::S2, p - (high - low)),
            (Level::S3, low - two * (high - p)),
        ],
    }
}

pub fn fibonacci_pivots(high: Decimal, low: Decimal, close: Decimal) -> PivotSet {
    let p = (high + low + close) / Decimal::new(3, 0);
    let range = high - low;
    let near = range * fibonacci_ratio(382);
    let mid = range * fibonacci_ratio(618);
    let far = range * fibonacci_ratio(1000);
    PivotSet {
        family: PivotFamily::Fibonacci,
        levels: vec![
            (Level::P, p),
            (Level::R3, p + far),
            (Level::R2, p + mid),
            (Level::R1, p + near),
            (Level::S1, p - near),
            (Level::S2, p - mid),
            (Level::S3, p - far),
        ],
    }
}

/// Camarilla levels fan out around the close, there is no pivot.
pub fn camarilla_pivots(high: Decimal, low: Decimal, close: Decimal) -> PivotSet {
    let spread = (high - low) * Decimal::new(11, 1);
    let offset = |divisor: i64| spread / Decimal::new(divisor, 0);
    PivotSet {
        family: PivotFamily::Camarilla,
        levels: vec![
            (Level::R4, close + offset(2)),
            (Level::R3, close + offset(4)),
            (Level::R2, close + offset(6)),
            (Level::R1, close + offset(12)),
            (Level::S1, close - offset(12)),
            (Level::S2, close - offset(6)),
            (Level::S3, close - offset(4)),
            (Level::S4, close - offset(2)),
        ],
    }
}

pub fn woodie_pivots(high: Decimal, low: Decimal, close: Decimal) -> PivotSet {
    let two = Decimal::new(2, 0);
    let p = (high + low + two * close) / Decimal::new(4, 0);
    PivotSet {
        family: PivotFamily::Woodie,
        levels: vec![
            (Level::P, p),
            (Level::R2, p + (high - low)),
            (Level::R1, two * p - low),
            (Level::S1, two * p - high),
            (Level::S2, p - (high - low)),
        ],
    }
}

pub fn demark_pivots(high: Decimal, low: Decimal, close: Decimal, open: Decimal) -> PivotSet {
    let two = Decimal::new(2, 0);
    let x = if close < open {
        high + two * low + close
    } else if close > open {
        two * high + low + close
    } else {
        high + low + two * close
    };
    let half = x / two;
    PivotSet {
        family: PivotFamily::DeMark,
        levels: vec![
            (Level::P, x / Decimal::new(4, 0)),
            (Level::R1, half - low),
            (Level::S1, half - high),
        ],
    }
}

/// Every family for one bar, in print order.
pub fn pivot_sets(bar: &PriceBar) -> Vec<PivotSet> {
    PivotFamily::ALL.iter().map(|family| family.compute(bar)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn level(set: &PivotSet, l: Level) -> Decimal {
        set.get(l).expect("missing level")
    }

    #[test]
    fn test_standard_pivots() {
        let set = standard_pivots(d("110"), d("90"), d("100"));
        assert_eq!(set.len(), 7);
        assert_eq!(level(&set, Level::P), d("100"));
        assert_eq!(level(&set, Level::R1), d("110"));
        assert_eq!(level(&set, Level::S1), d("90"));
        assert_eq!(level(&set, Level::R2), d("120"));
        assert_eq!(level(&set, Level::S2), d("80"));
        assert_eq!(level(&set, Level::R3), d("130"));
        assert_eq!(level(&set, Level::S3), d("70"));
        assert_eq!(set.get(Level::R4), None);
    }

    #[test]
    fn test_standard_range_symmetry() {
        let set = standard_pivots(d("1.23456"), d("1.19872"), d("1.21003"));
        let p = level(&set, Level::P);
        assert_eq!(level(&set, Level::R2) - p, p - level(&set, Level::S2));

        let centred = standard_pivots(d("110"), d("90"), d("100"));
        let p = level(&centred, Level::P);
        assert_eq!(level(&centred, Level::R1) - p, p - level(&centred, Level::S1));
    }

    #[test]
    fn test_fibonacci_pivots() {
        let set = fibonacci_pivots(d("110"), d("90"), d("100"));
        assert_eq!(level(&set, Level::P), d("100"));
        assert_eq!(level(&set, Level::R1), d("107.64"));
        assert_eq!(level(&set, Level::R2), d("112.36"));
        assert_eq!(level(&set, Level::R3), d("120"));
        assert_eq!(level(&set, Level::S1), d("92.36"));
        assert_eq!(level(&set, Level::S2), d("87.64"));
        assert_eq!(level(&set, Level::S3), d("80"));
    }

    #[test]
    fn test_camarilla_pivots() {
        let set = camarilla_pivots(d("112"), d("100"), d("106"));
        assert_eq!(set.len(), 8);
        assert_eq!(set.get(Level::P), None);
        assert_eq!(level(&set, Level::R1), d("107.1"));
        assert_eq!(level(&set, Level::R2), d("108.2"));
        assert_eq!(level(&set, Level::R3), d("109.3"));
        assert_eq!(level(&set, Level::R4), d("112.6"));
        assert_eq!(level(&set, Level::S4), d("99.4"));
        let close = d("106");
        assert_eq!(level(&set, Level::R1) - close, close - level(&set, Level::S1));
    }

    #[test]
    fn test_woodie_pivots() {
        let set = woodie_pivots(d("110"), d("90"), d("100"));
        assert_eq!(set.len(), 5);
        assert_eq!(level(&set, Level::P), d("100"));
        assert_eq!(level(&set, Level::R1), d("110"));
        assert_eq!(level(&set, Level::S1), d("90"));
        assert_eq!(level(&set, Level::R2), d("120"));
        assert_eq!(level(&set, Level::S2), d("80"));
    }

    #[test]
    fn test_demark_close_below_open() {
        let set = demark_pivots(d("110"), d("90"), d("95"), d("100"));
        assert_eq!(level(&set, Level::P), d("96.25"));
        assert_eq!(level(&set, Level::R1), d("102.5"));
        assert_eq!(level(&set, Level::S1), d("82.5"));
    }

    #[test]
    fn test_demark_close_above_and_equal_open() {
        let up = demark_pivots(d("110"), d("90"), d("105"), d("100"));
        assert_eq!(level(&up, Level::P), d("103.75"));
        assert_eq!(level(&up, Level::R1), d("117.5"));
        assert_eq!(level(&up, Level::S1), d("97.5"));

        let flat = demark_pivots(d("110"), d("90"), d("100"), d("100"));
        assert_eq!(level(&flat, Level::P), d("100"));
        assert_eq!(level(&flat, Level::R1), d("110"));
        assert_eq!(level(&flat, Level::S1), d("90"));
    }

    #[test]
    fn test_inverted_bar_is_computed() {
        let set = standard_pivots(d("90"), d("110"), d("100"));
        assert_eq!(level(&set, Level::R2), d("80"));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(d("100.000000001")), "100.00");
        assert_eq!(format_price(d("102.5")), "102.50");
        assert_eq!(format_price(d("96.25")), "96.25");
        assert_eq!(format_price(d("100")), "100.00");
        assert_eq!(format_price(d("0.125")), "0.12");
        assert_eq!(format_price(d("-3.456")), "-3.46");
        let p = level(&standard_pivots(d("110"), d("90"), d("95")), Level::P);
        assert_eq!(format_price(p), "98.33");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("high", " 1.5e2\n").unwrap(), d("150"));
        assert_eq!(parse_price("high", "1.10345").unwrap(), d("1.10345"));
        match parse_price("low", "abc") {
            Err(Error::InvalidNumericInput { field, input, .. }) => {
                assert_eq!(field, "low");
                assert_eq!(input, "abc");
            }
            other => panic!("expected InvalidNumericInput, got {:?}", other),
        }
        assert!(PriceBar::parse("110", "90", "", "100").is_err());
    }

    #[test]
    fn test_parse_price_rejects_oversized() {
        match PriceBar::parse("5e28", "4e28", "4.5e28", "4e28") {
            Err(Error::InvalidNumericInput { field, input, .. }) => {
                assert_eq!(field, "high");
                assert_eq!(input, "5e28");
            }
            other => panic!("expected InvalidNumericInput, got {:?}", other),
        }
        assert!(parse_price("low", "-2e28").is_err());
        assert!(parse_price("low", &max_price().to_string()).is_ok());
    }

    #[test]
    fn test_largest_bar_does_not_overflow() {
        let bar = PriceBar::parse("9.9e27", "-9.9e27", "9.9e27", "-9.9e27").unwrap();
        let sets = pivot_sets(&bar);
        assert_eq!(sets.len(), 5);
        assert_eq!(sets[0].get(Level::R3), Some(d("36300000000000000000000000000")));
    }

    #[test]
    fn test_pivot_set_display() {
        let set = demark_pivots(d("110"), d("90"), d("95"), d("100"));
        assert_eq!(
            set.to_string(),
            "DeMark's Pivot Points:\n  P: 96.25\n  R1: 102.50\n  S1: 82.50"
        );
    }

    #[test]
    fn test_pivot_sets_order() {
        let bar = PriceBar::parse("110", "90", "95", "100").unwrap();
        let families: Vec<PivotFamily> = pivot_sets(&bar).iter().map(|s| s.family).collect();
        assert_eq!(families, PivotFamily::ALL.to_vec());
        let labels: Vec<&str> = pivot_sets(&bar)[2].levels.iter().map(|(l, _)| l.label()).collect();
        assert_eq!(labels, vec!["R4", "R3", "R2", "R1", "S1", "S2", "S3", "S4"]);
    }
}
