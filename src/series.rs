//! Deterministic series generation.
//!
//! Every value is a pure function of `(metric id, date)`: the pair is hashed
//! with SHA-1, the first 8 digest bytes seed a [`MetricPcg`], and a single
//! uniform draw is scaled into the metric's profile.

use crate::error::{Error, Result};
use crate::registry::MetricProfile;
use crate::rng::MetricPcg;
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use sha1::{Digest, Sha1};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive range of calendar days. `from <= to` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(Error::InvertedRange { from, to });
        }
        Ok(DateRange { from, to })
    }

    /// Parses both ends as `YYYY-MM-DD`. `from` is checked before `to`.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        let from = parse_date("from", from)?;
        let to = parse_date("to", to)?;
        DateRange::new(from, to)
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Number of days in the range, counting both ends.
    pub fn days(&self) -> i64 {
        self.to.signed_duration_since(self.from).num_days() + 1
    }

    pub fn ensure_at_most(&self, max_days: u32) -> Result<()> {
        let days = self.days();
        if days > i64::from(max_days) {
            return Err(Error::RangeTooLong { days, max: max_days });
        }
        Ok(())
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |d| *d <= to)
    }
}

/// Strict `YYYY-MM-DD`: four-digit year, and the input must be the canonical
/// rendering of the date it parses to, so `2024-1-1` and `+12345-01-01` are
/// rejected.
pub fn parse_date(param: &'static str, value: &str) -> Result<NaiveDate> {
    let invalid = || Error::InvalidDate { param, value: value.to_string() };
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())?;
    if !(0..=9999).contains(&date.year()) || date.format(DATE_FORMAT).to_string() != value {
        return Err(invalid());
    }
    Ok(date)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    #[serde(rename = "timestamp", serialize_with = "serialize_date")]
    pub date: NaiveDate,
    pub value: f64,
}

pub type Series = Vec<DataPoint>;

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DATE_FORMAT))
}

/// Seed for one `(metric, date)` pair: first 8 bytes of
/// `SHA-1(metric_id || YYYY-MM-DD)`, big-endian.
pub fn seed_for(metric_id: &str, date: NaiveDate) -> u64 {
    let mut hasher = Sha1::new();
    hasher.update(metric_id.as_bytes());
    hasher.update(date.format(DATE_FORMAT).to_string().as_bytes());
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}

pub fn generate_point(metric_id: &str, profile: &MetricProfile, date: NaiveDate) -> DataPoint {
    let mut rng = MetricPcg::new(seed_for(metric_id, date));
    DataPoint {
        date,
        value: profile.baseline + rng.next_unit() * profile.spread,
    }
}

/// One point per day of `range`, ascending by date.
pub fn generate(metric_id: &str, profile: &MetricProfile, range: &DateRange) -> Series {
    let dates: Vec<NaiveDate> = range.dates().collect();
    dates
        .into_par_iter()
        .map(|date| generate_point(metric_id, profile, date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const REVENUE: MetricProfile = MetricProfile { baseline: 20_000.0, spread: 5_000.0 };
    const PAX: MetricProfile = MetricProfile { baseline: 1_000.0, spread: 250.0 };

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn range(from: &str, to: &str) -> DateRange {
        DateRange::parse(from, to).unwrap()
    }

    #[test]
    fn test_seed_is_sha1_prefix() {
        assert_eq!(seed_for("total-revenue", date("2024-01-01")), 0x6086c244aa1c4776);
        assert_eq!(seed_for("total-revenue", date("2024-01-02")), 0xebb9ae355284d97c);
        assert_eq!(seed_for("total-pax", date("2024-01-01")), 0x7c0a39fbbee9e2ab);
    }

    #[test]
    fn test_golden_values() {
        let series = generate("total-revenue", &REVENUE, &range("2024-01-01", "2024-01-03"));
        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![21008.436019765213, 24186.788897495717, 24536.5899708122]);

        let series = generate("total-pax", &PAX, &range("2024-01-01", "2024-01-03"));
        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1069.463735271711, 1032.0729520753957, 1032.0751740946434]);
    }

    #[test]
    fn test_revenue_example() {
        let r = range("2024-01-01", "2024-01-03");
        let first = generate("total-revenue", &REVENUE, &r);
        let second = generate("total-revenue", &REVENUE, &r);

        let dates: Vec<NaiveDate> = first.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date("2024-01-01"), date("2024-01-02"), date("2024-01-03")]);
        for point in &first {
            assert!(point.value >= 20_000.0 && point.value < 25_000.0);
        }
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_day_range() {
        let series = generate("total-pax", &PAX, &range("2024-06-15", "2024-06-15"));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, date("2024-06-15"));
    }

    #[test]
    fn test_cardinality_and_ordering_across_boundaries() {
        // leap day, month end and year end
        let r = range("2023-12-30", "2024-03-02");
        let series = generate("total-revenue", &REVENUE, &r);
        assert_eq!(series.len() as i64, r.days());
        assert_eq!(series.len(), 2 + 31 + 29 + 2);
        assert_eq!(series.first().unwrap().date, r.from());
        assert_eq!(series.last().unwrap().date, r.to());
        for pair in series.windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
        assert!(series.iter().any(|p| p.date == date("2024-02-29")));
    }

    #[test]
    fn test_point_independent_of_range() {
        let wide = generate("total-revenue", &REVENUE, &range("2024-01-01", "2024-01-31"));
        let narrow = generate("total-revenue", &REVENUE, &range("2024-01-15", "2024-01-15"));
        assert_eq!(wide[14], narrow[0]);
    }

    #[test]
    fn test_metric_changes_value() {
        let d = date("2024-01-01");
        let a = generate_point("total-revenue", &REVENUE, d);
        let b = generate_point("total-pax", &REVENUE, d);
        assert_ne!(a.value, b.value);
    }

    #[test]
    fn test_random_ranges_hold_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed_2024);
        let epoch = date("2000-01-01");
        for _ in 0..50 {
            let from = epoch + chrono::Duration::days(rng.gen_range(0..10_000));
            let to = from + chrono::Duration::days(rng.gen_range(0..90));
            let r = DateRange::new(from, to).unwrap();
            let series = generate("total-pax", &PAX, &r);

            assert_eq!(series.len() as i64, r.days());
            for pair in series.windows(2) {
                assert!(pair[0].date < pair[1].date);
                assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
            }
            for point in &series {
                assert!(point.value >= PAX.baseline);
                assert!(point.value < PAX.baseline + PAX.spread);
            }
        }
    }

    #[test]
    fn test_distinct_dates_distinct_values() {
        let series = generate("total-revenue", &REVENUE, &range("2024-01-01", "2024-03-31"));
        let mut values: Vec<f64> = series.iter().map(|p| p.value).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        values.dedup();
        assert_eq!(values.len(), series.len());
    }

    #[test]
    fn test_inverted_range_rejected() {
        match DateRange::parse("2024-02-01", "2024-01-01") {
            Err(Error::InvertedRange { from, to }) => {
                assert_eq!(from, date("2024-02-01"));
                assert_eq!(to, date("2024-01-01"));
            }
            other => panic!("expected InvertedRange, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_dates_name_the_parameter() {
        for (from, to, param) in [
            ("", "2024-01-01", "from"),
            ("2024-01-01", "", "to"),
            ("2024-02-30", "2024-03-01", "from"),
            ("2024-1-1", "2024-01-02", "from"),
            ("2024-01-01", "2024-01-02T00:00:00", "to"),
            ("garbage", "also-garbage", "from"),
            ("+12345-01-01", "+12345-01-02", "from"),
            ("2024-01-01", "+12345-01-02", "to"),
            ("-0001-01-01", "2024-01-01", "from"),
            ("+2024-01-01", "2024-01-02", "from"),
        ] {
            match DateRange::parse(from, to) {
                Err(Error::InvalidDate { param: p, .. }) => assert_eq!(p, param, "{} / {}", from, to),
                other => panic!("expected InvalidDate for {} / {}, got {:?}", from, to, other),
            }
        }
    }

    #[test]
    fn test_four_digit_year_bounds() {
        let r = range("0000-01-01", "0000-01-02");
        assert_eq!(r.from().year(), 0);
        let r = range("9999-12-30", "9999-12-31");
        assert_eq!(r.days(), 2);

        let series = generate("total-pax", &PAX, &range("0001-01-01", "0001-01-01"));
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json[0]["timestamp"], "0001-01-01");
    }

    #[test]
    fn test_range_limit() {
        let r = range("2024-01-01", "2024-03-01");
        assert_eq!(r.days(), 61);
        assert!(r.ensure_at_most(61).is_ok());
        match r.ensure_at_most(60) {
            Err(Error::RangeTooLong { days, max }) => assert_eq!((days, max), (61, 60)),
            other => panic!("expected RangeTooLong, got {:?}", other),
        }
    }

    #[test]
    fn test_data_point_json() {
        let point = generate_point("total-revenue", &REVENUE, date("2024-01-01"));
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json, serde_json::json!({ "timestamp": "2024-01-01", "value": 21008.436019765213 }));
    }
}
