//! Folding 3-hour forecast samples into per-day summaries.

use chrono::{Local, NaiveDate, TimeZone};
use std::collections::BTreeMap;

use crate::{
    error::Result,
    model::{DailySummary, ForecastSample},
    payload,
};

/// Maximum number of days in an aggregated forecast.
pub const MAX_DAYS: usize = 5;

/// Aggregate samples by calendar date in the process-local timezone.
pub fn aggregate(samples: &[ForecastSample]) -> Vec<DailySummary> {
    aggregate_in(samples, &Local)
}

/// Aggregate samples by calendar date in `tz`.
///
/// Output is sorted ascending by date and holds at most [`MAX_DAYS`] entries.
/// The dominant condition of a day is the most frequent description; on a tie
/// the description seen first in chronological order wins, and its icon is the
/// one from that first occurrence.
pub fn aggregate_in<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<DailySummary> {
    let mut ordered: Vec<&ForecastSample> = samples.iter().collect();
    // Stable, so samples sharing a timestamp keep their input order.
    ordered.sort_by_key(|s| s.timestamp);

    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    for sample in ordered {
        let date = sample.timestamp.with_timezone(tz).date_naive();
        days.entry(date).or_default().push(sample);
    }

    days.into_iter()
        .take(MAX_DAYS)
        .filter_map(|(date, acc)| acc.finish(date))
        .collect()
}

/// Decode a raw forecast body and aggregate it. Any malformed entry aborts the
/// whole aggregation.
pub fn aggregate_payload(body: &str) -> Result<Vec<DailySummary>> {
    let samples = payload::parse_forecast(body)?;
    Ok(aggregate(&samples))
}

#[derive(Debug, Default)]
struct DayAccumulator {
    max_temp: Option<f64>,
    min_temp: Option<f64>,
    humidity_sum: f64,
    wind_sum: f64,
    count: usize,
    // Insertion order doubles as first-seen order for tie breaking.
    conditions: Vec<ConditionTally>,
}

#[derive(Debug)]
struct ConditionTally {
    description: String,
    icon: String,
    count: usize,
}

impl DayAccumulator {
    fn push(&mut self, sample: &ForecastSample) {
        self.max_temp = Some(self.max_temp.map_or(sample.temperature, |t| t.max(sample.temperature)));
        self.min_temp = Some(self.min_temp.map_or(sample.temperature, |t| t.min(sample.temperature)));
        self.humidity_sum += f64::from(sample.humidity_pct);
        self.wind_sum += sample.wind_speed;
        self.count += 1;

        match self.conditions.iter_mut().find(|c| c.description == sample.condition) {
            Some(tally) => tally.count += 1,
            None => self.conditions.push(ConditionTally {
                description: sample.condition.clone(),
                icon: sample.icon.clone(),
                count: 1,
            }),
        }
    }

    fn finish(self, date: NaiveDate) -> Option<DailySummary> {
        let mut dominant: Option<ConditionTally> = None;
        for tally in self.conditions {
            if dominant.as_ref().is_none_or(|d| tally.count > d.count) {
                dominant = Some(tally);
            }
        }
        let dominant = dominant?;
        let n = self.count as f64;

        Some(DailySummary {
            date,
            max_temp: self.max_temp?,
            min_temp: self.min_temp?,
            avg_humidity: self.humidity_sum / n,
            avg_wind: self.wind_sum / n,
            condition: dominant.description,
            icon: dominant.icon,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeatherError;
    use chrono::{DateTime, Duration, Utc};
    use serde_json::json;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).single().expect("valid date")
    }

    fn sample(ts: DateTime<Utc>, temp: f64, condition: &str) -> ForecastSample {
        ForecastSample {
            timestamp: ts,
            temperature: temp,
            humidity_pct: 50,
            wind_speed: 2.0,
            condition: condition.to_string(),
            icon: format!("{condition}-icon"),
        }
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate_in(&[], &Utc).is_empty());
    }

    #[test]
    fn max_and_min_per_day() {
        let samples = vec![
            sample(at(1, 0), 10.0, "clear"),
            sample(at(1, 3), 15.0, "clear"),
            sample(at(1, 6), 12.0, "clear"),
        ];
        let days = aggregate_in(&samples, &Utc);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].max_temp, 15.0);
        assert_eq!(days[0].min_temp, 10.0);
    }

    #[test]
    fn single_sample_day_has_equal_min_and_max() {
        let days = aggregate_in(&[sample(at(2, 21), 7.5, "mist")], &Utc);
        assert_eq!(days[0].max_temp, 7.5);
        assert_eq!(days[0].min_temp, 7.5);
        assert_eq!(days[0].condition, "mist");
    }

    #[test]
    fn means_of_humidity_and_wind() {
        let mut a = sample(at(1, 0), 1.0, "clear");
        a.humidity_pct = 40;
        a.wind_speed = 1.0;
        let mut b = sample(at(1, 3), 1.0, "clear");
        b.humidity_pct = 61;
        b.wind_speed = 4.0;
        let days = aggregate_in(&[a, b], &Utc);
        assert_eq!(days[0].avg_humidity, 50.5);
        assert_eq!(days[0].avg_wind, 2.5);
    }

    #[test]
    fn most_frequent_condition_wins() {
        let samples = vec![
            sample(at(1, 0), 1.0, "clear"),
            sample(at(1, 3), 1.0, "rain"),
            sample(at(1, 6), 1.0, "rain"),
            sample(at(1, 9), 1.0, "rain"),
        ];
        let days = aggregate_in(&samples, &Utc);
        assert_eq!(days[0].condition, "rain");
        assert_eq!(days[0].icon, "rain-icon");
    }

    #[test]
    fn tie_goes_to_first_seen_condition() {
        let samples = vec![
            sample(at(1, 0), 1.0, "rain"),
            sample(at(1, 3), 1.0, "clear"),
            sample(at(1, 6), 1.0, "clear"),
            sample(at(1, 9), 1.0, "rain"),
        ];
        assert_eq!(aggregate_in(&samples, &Utc)[0].condition, "rain");
    }

    #[test]
    fn tie_breaking_uses_chronological_order_not_input_order() {
        let samples = vec![
            sample(at(1, 9), 1.0, "clear"),
            sample(at(1, 6), 1.0, "clear"),
            sample(at(1, 3), 1.0, "rain"),
            sample(at(1, 0), 1.0, "rain"),
        ];
        assert_eq!(aggregate_in(&samples, &Utc)[0].condition, "rain");
    }

    #[test]
    fn dominant_icon_comes_from_first_occurrence() {
        let mut first = sample(at(1, 0), 1.0, "clouds");
        first.icon = "04n".into();
        let mut second = sample(at(1, 12), 1.0, "clouds");
        second.icon = "04d".into();
        assert_eq!(aggregate_in(&[first, second], &Utc)[0].icon, "04n");
    }

    #[test]
    fn sorted_ascending_and_truncated_to_five_days() {
        let start = at(1, 12);
        let mut samples: Vec<ForecastSample> = (0..7)
            .rev()
            .map(|d| sample(start + Duration::days(d), d as f64, "clear"))
            .collect();
        samples.push(sample(start + Duration::hours(3), 99.0, "clear"));

        let days = aggregate_in(&samples, &Utc);
        assert_eq!(days.len(), MAX_DAYS);
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(days[0].date, start.date_naive());
        assert_eq!(days[0].max_temp, 99.0);
    }

    #[test]
    fn output_never_exceeds_distinct_dates() {
        let samples: Vec<ForecastSample> =
            (0..8).map(|h| sample(at(4, h * 3), h as f64, "clear")).collect();
        let days = aggregate_in(&samples, &Utc);
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn grouping_follows_the_given_timezone() {
        let offset = chrono::FixedOffset::east_opt(3 * 3600).expect("valid offset");
        // 22:00 UTC on the 1st is 01:00 on the 2nd at UTC+3.
        let samples = vec![sample(at(1, 12), 1.0, "clear"), sample(at(1, 22), 2.0, "clear")];
        assert_eq!(aggregate_in(&samples, &Utc).len(), 1);
        assert_eq!(aggregate_in(&samples, &offset).len(), 2);
    }

    #[test]
    fn payload_with_missing_field_is_malformed() {
        let body = json!({
            "list": [
                {
                    "dt": 1_709_294_400,
                    "main": { "temp": 3.0, "humidity": 70 },
                    "weather": [{ "description": "snow", "icon": "13d" }],
                    "wind": { "speed": 1.5 }
                },
                {
                    "dt": 1_709_305_200,
                    "main": { "humidity": 70 },
                    "weather": [{ "description": "snow", "icon": "13d" }],
                    "wind": { "speed": 1.5 }
                }
            ]
        });
        let err = aggregate_payload(&body.to_string()).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedData(_)));
    }

    #[test]
    fn payload_with_empty_list_aggregates_to_nothing() {
        assert!(aggregate_payload(r#"{"list": []}"#).unwrap().is_empty());
    }
}
