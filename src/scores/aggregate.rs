use crate::scores::day_key::DayKeyConfig;
use crate::scores::types::{
    AVERAGE_LABEL, DailyTentScore, DayGroup, ScoreRecord, ScoreTable, TENT_COUNT, tent_numbers,
};
use crate::scores::utility::mean;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, warn};

type DayBucket<'a> = (NaiveDate, Vec<&'a ScoreRecord>);

/// Aggregates raw tent scores into a per-day table with an overall average row.
///
/// Records are bucketed by calendar day (see [`DayKeyConfig`]) in first-seen
/// order. Within a day each tent gets the mean of its scores; tents without a
/// score that day get no entry. Tent numbers outside `1..=TENT_COUNT` are ignored.
///
/// The average row divides each tent's summed daily means by the number of
/// days in the table, not by the number of days the tent was scored, so a
/// missed day counts as zero. With no days at all every average is NaN
/// (`0 / 0`); check [`ScoreTable::has_days`] before trusting it.
pub fn aggregate(records: &[ScoreRecord], day_keys: &DayKeyConfig) -> ScoreTable {
    let buckets = group_by_day(records, day_keys);

    let (days, totals) = buckets.into_iter().fold(
        (Vec::new(), [0.0_f64; TENT_COUNT as usize]),
        |(mut days, mut totals), (date, bucket)| {
            let label = day_keys.label(date);
            let scores: Vec<DailyTentScore> = tent_numbers()
                .filter_map(|tent| daily_score(&bucket, tent, &label))
                .collect();

            for entry in &scores {
                if !entry.score.is_nan() {
                    totals[usize::from(entry.tent_nr - 1)] += entry.score;
                }
            }

            days.push(DayGroup {
                date,
                label,
                scores,
            });
            (days, totals)
        },
    );

    let day_count = days.len();
    if day_count == 0 {
        warn!(
            records = records.len(),
            "No scored days, overall tent averages are undefined"
        );
    }

    let average = tent_numbers()
        .map(|tent| DailyTentScore {
            tent_nr: tent,
            score: totals[usize::from(tent - 1)] / day_count as f64,
            created_at: AVERAGE_LABEL.to_string(),
        })
        .collect();

    debug!(records = records.len(), days = day_count, "Aggregated tent scores");

    ScoreTable { days, average }
}

/// Buckets records by calendar day, preserving the order days are first seen.
fn group_by_day<'a>(records: &'a [ScoreRecord], day_keys: &DayKeyConfig) -> Vec<DayBucket<'a>> {
    let (buckets, _) = records.iter().fold(
        (Vec::<DayBucket<'a>>::new(), HashMap::<NaiveDate, usize>::new()),
        |(mut buckets, mut index), record| {
            let date = day_keys.day_of(&record.created_at);
            match index.get(&date) {
                Some(&i) => buckets[i].1.push(record),
                None => {
                    index.insert(date, buckets.len());
                    buckets.push((date, vec![record]));
                }
            }
            (buckets, index)
        },
    );
    buckets
}

fn daily_score(bucket: &[&ScoreRecord], tent: u8, label: &str) -> Option<DailyTentScore> {
    let values: Vec<f64> = bucket
        .iter()
        .filter(|r| r.tent_nr == i64::from(tent))
        .map(|r| r.score)
        .collect();

    mean(&values).map(|score| DailyTentScore {
        tent_nr: tent,
        score,
        created_at: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const EPSILON: f64 = 1e-9;

    fn record(score: f64, tent_nr: i64, day: u32, hour: u32) -> ScoreRecord {
        ScoreRecord::new(
            score,
            tent_nr,
            Utc.with_ymd_and_hms(2024, 7, day, hour, 0, 0).unwrap(),
        )
    }

    fn average_of(table: &ScoreTable, tent: u8) -> f64 {
        ScoreTable::tent_score(&table.average, tent).unwrap()
    }

    #[test]
    fn test_empty_input_has_only_nan_averages() {
        let table = aggregate(&[], &DayKeyConfig::utc_iso());

        assert!(!table.has_days());
        assert_eq!(table.rows().count(), 1);
        assert_eq!(table.average.len(), 10);
        assert!(table.average.iter().all(|e| e.score.is_nan()));
        assert!(table.average.iter().all(|e| e.created_at == AVERAGE_LABEL));
    }

    #[test]
    fn test_single_record() {
        let table = aggregate(&[record(8.0, 1, 1, 12)], &DayKeyConfig::utc_iso());

        assert_eq!(table.day_count(), 1);
        let day = &table.days[0];
        assert_eq!(day.label, "2024-07-01");
        assert_eq!(
            day.scores,
            vec![DailyTentScore {
                tent_nr: 1,
                score: 8.0,
                created_at: "2024-07-01".to_string(),
            }]
        );

        assert_eq!(average_of(&table, 1), 8.0);
        // Never scored, but the day still counts: 0 / 1.
        for tent in 2..=10 {
            assert_eq!(average_of(&table, tent), 0.0);
        }
    }

    #[test]
    fn test_same_day_duplicates_are_averaged() {
        let records = [record(6.0, 1, 1, 9), record(10.0, 1, 1, 18)];
        let table = aggregate(&records, &DayKeyConfig::utc_iso());

        assert_eq!(table.day_count(), 1);
        assert_eq!(table.days[0].scores.len(), 1);
        assert_eq!(table.days[0].scores[0].score, 8.0);
        assert_eq!(average_of(&table, 1), 8.0);
    }

    #[test]
    fn test_average_divides_by_day_count() {
        let records = [record(4.0, 1, 1, 12), record(8.0, 1, 2, 12)];
        let table = aggregate(&records, &DayKeyConfig::utc_iso());

        assert_eq!(table.day_count(), 2);
        assert!(table.days.iter().all(|d| d.scores.len() == 1));
        assert_eq!(average_of(&table, 1), 6.0);
    }

    #[test]
    fn test_sparse_tent_is_diluted() {
        let records = [
            record(9.0, 2, 1, 12),
            record(9.0, 2, 2, 12),
            record(9.0, 3, 2, 12),
        ];
        let table = aggregate(&records, &DayKeyConfig::utc_iso());

        assert_eq!(average_of(&table, 2), 9.0);
        assert_eq!(average_of(&table, 3), 4.5);
    }

    #[test]
    fn test_days_keep_first_seen_order() {
        let records = [
            record(5.0, 1, 3, 12),
            record(5.0, 1, 1, 12),
            record(5.0, 2, 3, 13),
            record(5.0, 1, 2, 12),
        ];
        let table = aggregate(&records, &DayKeyConfig::utc_iso());

        let labels: Vec<_> = table.rows().map(|(label, _)| label.to_string()).collect();
        assert_eq!(
            labels,
            vec!["2024-07-03", "2024-07-01", "2024-07-02", AVERAGE_LABEL]
        );
    }

    #[test]
    fn test_out_of_range_tents_are_ignored() {
        let records = [
            record(7.0, 0, 1, 12),
            record(7.0, 11, 1, 12),
            record(7.0, -3, 1, 12),
            record(7.0, 10, 1, 12),
        ];
        let table = aggregate(&records, &DayKeyConfig::utc_iso());

        assert_eq!(table.day_count(), 1);
        let tents: Vec<_> = table.days[0].scores.iter().map(|e| e.tent_nr).collect();
        assert_eq!(tents, vec![10]);
    }

    #[test]
    fn test_day_of_only_ignored_tents_still_counts() {
        let records = [record(7.0, 1, 1, 12), record(7.0, 42, 2, 12)];
        let table = aggregate(&records, &DayKeyConfig::utc_iso());

        assert_eq!(table.day_count(), 2);
        assert!(table.days[1].scores.is_empty());
        assert_eq!(average_of(&table, 1), 3.5);
    }

    #[test]
    fn test_nan_daily_mean_is_kept_but_not_summed() {
        let records = [record(f64::NAN, 1, 1, 12), record(6.0, 1, 2, 12)];
        let table = aggregate(&records, &DayKeyConfig::utc_iso());

        assert!(table.days[0].scores[0].score.is_nan());
        assert_eq!(average_of(&table, 1), 3.0);
    }

    #[test]
    fn test_grouping_uses_configured_offset() {
        // 22:30 UTC on the 1st is already the 2nd in camp time.
        let records = [
            ScoreRecord::new(6.0, 1, Utc.with_ymd_and_hms(2024, 7, 1, 22, 30, 0).unwrap()),
            ScoreRecord::new(8.0, 1, Utc.with_ymd_and_hms(2024, 7, 2, 8, 0, 0).unwrap()),
        ];

        let utc = aggregate(&records, &DayKeyConfig::utc_iso());
        assert_eq!(utc.day_count(), 2);

        let camp = aggregate(&records, &DayKeyConfig::default());
        assert_eq!(camp.day_count(), 1);
        assert_eq!(camp.days[0].label, "2.07.2024");
        assert_eq!(camp.days[0].scores[0].score, 7.0);
    }

    #[test]
    fn test_permuted_input_gives_same_scores() {
        let records = vec![
            record(3.0, 4, 1, 8),
            record(9.0, 4, 1, 20),
            record(6.5, 7, 2, 8),
            record(2.0, 1, 1, 10),
            record(8.0, 7, 2, 9),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let forward = aggregate(&records, &DayKeyConfig::utc_iso());
        let backward = aggregate(&reversed, &DayKeyConfig::utc_iso());

        let by_date = |table: &ScoreTable| {
            let mut days = table.days.clone();
            days.sort_by_key(|d| d.date);
            days
        };
        assert_eq!(by_date(&forward), by_date(&backward));
        assert_eq!(forward.average, backward.average);
    }

    #[test]
    fn test_entries_match_input_subsets() {
        // Deterministic pseudo-random spread over 5 days and 12 tent numbers.
        let records: Vec<ScoreRecord> = (0..200u32)
            .map(|i| {
                let tent = i64::from((i * 7 + 3) % 12);
                let day = 1 + (i * 13) % 5;
                let score = f64::from((i * 31) % 11);
                record(score, tent, day, i % 24)
            })
            .collect();
        let config = DayKeyConfig::utc_iso();
        let table = aggregate(&records, &config);

        assert_eq!(table.day_count(), 5);

        for day in &table.days {
            for tent in tent_numbers() {
                let subset: Vec<f64> = records
                    .iter()
                    .filter(|r| config.day_of(&r.created_at) == day.date)
                    .filter(|r| r.tent_nr == i64::from(tent))
                    .map(|r| r.score)
                    .collect();
                match ScoreTable::tent_score(&day.scores, tent) {
                    Some(score) => {
                        let expected = subset.iter().sum::<f64>() / subset.len() as f64;
                        assert!((score - expected).abs() < EPSILON);
                    }
                    None => assert!(subset.is_empty()),
                }
            }
        }

        for tent in tent_numbers() {
            let total: f64 = table
                .days
                .iter()
                .filter_map(|d| ScoreTable::tent_score(&d.scores, tent))
                .sum();
            let expected = total / table.day_count() as f64;
            assert!((average_of(&table, tent) - expected).abs() < EPSILON);
        }
    }
}
