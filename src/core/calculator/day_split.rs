use crate::models::daily_total::DaySlice;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// First instant of local date `day` in `tz`.
///
/// When local midnight falls in a DST gap the day starts at the first local
/// time that exists; when it is ambiguous, the earlier instant wins.
pub fn start_of_day<Z: TimeZone>(tz: &Z, day: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = day.and_time(NaiveTime::MIN);

    (0..=24 * 60)
        .map(|m| midnight + Duration::minutes(m))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Distribute `[start, end)` across the calendar days of `tz`.
///
/// One slice per day with a positive overlap, in chronological order. The
/// slice seconds always add up to `(end - start).num_seconds()`; an empty
/// or inverted interval yields no slices.
pub fn split_interval<Z: TimeZone>(
    tz: &Z,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<DaySlice> {
    let mut out = Vec::new();
    if end <= start {
        return out;
    }

    let mut day = start.with_timezone(tz).date_naive();
    let mut cursor = start;

    while cursor < end {
        // last representable date: it takes the rest of the interval
        let Some(next_day) = day.succ_opt() else {
            out.push(DaySlice {
                day,
                seconds: (end - cursor).num_seconds(),
            });
            break;
        };

        let boundary = start_of_day(tz, next_day).unwrap_or(end);
        let segment_end = boundary.min(end);

        if segment_end > cursor {
            out.push(DaySlice {
                day,
                seconds: (segment_end - cursor).num_seconds(),
            });
            cursor = segment_end;
        }

        day = next_day;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::{New_York, Sao_Paulo};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn total(slices: &[DaySlice]) -> i64 {
        slices.iter().map(|s| s.seconds).sum()
    }

    #[test]
    fn same_day_interval_is_one_slice() {
        let s = split_interval(&Utc, utc("2025-03-04T09:00:00Z"), utc("2025-03-04T12:15:30Z"));
        assert_eq!(
            s,
            vec![DaySlice {
                day: day(2025, 3, 4),
                seconds: 3 * 3600 + 15 * 60 + 30
            }]
        );
    }

    #[test]
    fn half_hour_either_side_of_midnight() {
        let s = split_interval(&Utc, utc("2025-01-01T23:30:00Z"), utc("2025-01-02T00:30:00Z"));
        assert_eq!(
            s,
            vec![
                DaySlice { day: day(2025, 1, 1), seconds: 1800 },
                DaySlice { day: day(2025, 1, 2), seconds: 1800 },
            ]
        );
    }

    #[test]
    fn eleven_pm_to_one_am() {
        let s = split_interval(
            &chrono_tz::UTC,
            utc("2025-01-01T23:00:00Z"),
            utc("2025-01-02T01:00:00Z"),
        );
        assert_eq!(s.len(), 2);
        assert_eq!(s[0], DaySlice { day: day(2025, 1, 1), seconds: 3600 });
        assert_eq!(s[1], DaySlice { day: day(2025, 1, 2), seconds: 3600 });
    }

    #[test]
    fn several_full_days_plus_partial_ends() {
        let start = utc("2025-02-26T20:00:00Z");
        let end = utc("2025-03-02T06:00:00Z");
        let s = split_interval(&Utc, start, end);

        // 26 partial, 27 and 28 full (2025 is not a leap year), 1 full, 2 partial
        assert_eq!(s.len(), 5);
        assert_eq!(s[0].seconds, 4 * 3600);
        assert_eq!(s[1], DaySlice { day: day(2025, 2, 27), seconds: 86_400 });
        assert_eq!(s[2], DaySlice { day: day(2025, 2, 28), seconds: 86_400 });
        assert_eq!(s[3], DaySlice { day: day(2025, 3, 1), seconds: 86_400 });
        assert_eq!(s[4], DaySlice { day: day(2025, 3, 2), seconds: 6 * 3600 });
        assert_eq!(total(&s), (end - start).num_seconds());
    }

    #[test]
    fn ending_exactly_at_midnight_adds_no_empty_slice() {
        let s = split_interval(&Utc, utc("2025-05-01T22:00:00Z"), utc("2025-05-02T00:00:00Z"));
        assert_eq!(s, vec![DaySlice { day: day(2025, 5, 1), seconds: 7200 }]);

        let s = split_interval(&Utc, utc("2025-05-01T00:00:00Z"), utc("2025-05-03T00:00:00Z"));
        assert_eq!(s.len(), 2);
        assert_eq!(total(&s), 2 * 86_400);
    }

    #[test]
    fn empty_and_inverted_intervals() {
        let t = utc("2025-05-01T10:00:00Z");
        assert!(split_interval(&Utc, t, t).is_empty());
        assert!(split_interval(&Utc, t, t - Duration::seconds(1)).is_empty());
    }

    #[test]
    fn days_follow_the_reference_timezone() {
        // 22:00 → 01:00 New York time (UTC-5 in January)
        let s = split_interval(
            &New_York,
            utc("2025-01-01T03:00:00Z"),
            utc("2025-01-01T06:00:00Z"),
        );
        assert_eq!(
            s,
            vec![
                DaySlice { day: day(2024, 12, 31), seconds: 7200 },
                DaySlice { day: day(2025, 1, 1), seconds: 3600 },
            ]
        );
    }

    #[test]
    fn spring_forward_day_is_23_hours() {
        // local midnight 2025-03-09 (EST) to local midnight 2025-03-10 (EDT)
        let start = utc("2025-03-09T05:00:00Z");
        let end = utc("2025-03-10T04:00:00Z");
        let s = split_interval(&New_York, start, end);
        assert_eq!(s, vec![DaySlice { day: day(2025, 3, 9), seconds: 23 * 3600 }]);
    }

    #[test]
    fn midnight_in_a_dst_gap_starts_at_first_valid_minute() {
        // Brazil moved clocks from 00:00 to 01:00 on 2018-11-04
        let start = start_of_day(&Sao_Paulo, day(2018, 11, 4)).unwrap();
        assert_eq!(start, utc("2018-11-04T03:00:00Z"));

        let s = split_interval(
            &Sao_Paulo,
            utc("2018-11-04T02:30:00Z"),
            utc("2018-11-04T03:30:00Z"),
        );
        assert_eq!(
            s,
            vec![
                DaySlice { day: day(2018, 11, 3), seconds: 1800 },
                DaySlice { day: day(2018, 11, 4), seconds: 1800 },
            ]
        );
    }

    #[test]
    fn interval_on_the_last_representable_day_keeps_its_seconds() {
        let end = DateTime::<Utc>::MAX_UTC;
        let start = end - Duration::hours(2);
        let s = split_interval(&Utc, start, end);
        assert_eq!(s, vec![DaySlice { day: NaiveDate::MAX, seconds: 7200 }]);
    }

    #[test]
    fn slices_always_sum_to_elapsed_seconds() {
        let base = utc("2024-12-30T17:43:11Z");
        for (offset, len) in [(0, 1), (37, 86_399), (3_600, 86_400), (11, 400_001), (59, 1_000_000)] {
            let start = base + Duration::seconds(offset);
            let end = start + Duration::seconds(len);
            for s in [
                split_interval(&Utc, start, end),
                split_interval(&New_York, start, end),
                split_interval(&chrono_tz::Asia::Kolkata, start, end),
            ] {
                assert_eq!(total(&s), len);
                assert!(s.iter().all(|x| x.seconds > 0));
            }
        }
    }
}
