// Rendering rules for the target system's time-record fields.

use crate::core::event::TimeRange;

/// Duration as zero-padded `HH:mm`, computed in whole minutes from the
/// millisecond difference. Hours are not wrapped at 24; a 25h entry renders
/// as `25:00`. Negative intervals clamp to `00:00`.
pub fn duration_value(range: &TimeRange) -> String {
    let minutes = (range.end - range.start).num_minutes().max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Calendar date of the start instant, rendered as `YYYY-MM-DD` in the
/// offset the source sent. No timezone conversion.
pub fn record_date(range: &TimeRange) -> String {
    range.start.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod format_tests {
    use chrono::DateTime;
    use rstest::rstest;

    use super::*;
    use crate::core::event::TimeRange;

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange {
            start: DateTime::parse_from_rfc3339(start).unwrap(),
            end: DateTime::parse_from_rfc3339(end).unwrap(),
        }
    }

    #[rstest]
    #[case("2024-01-01T09:00:00Z", "2024-01-01T11:30:00Z", "02:30")]
    #[case("2024-01-01T09:00:00Z", "2024-01-01T09:00:00Z", "00:00")]
    #[case("2024-01-01T09:00:00Z", "2024-01-01T09:59:59Z", "00:59")]
    #[case("2024-01-01T00:00:00Z", "2024-01-02T01:00:00Z", "25:00")]
    fn it_should_render_whole_minutes_as_hh_mm(
        #[case] start: &str,
        #[case] end: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(duration_value(&range(start, end)), expected);
    }

    #[rstest]
    fn it_should_clamp_negative_intervals_to_zero() {
        let r = range("2024-01-01T11:00:00Z", "2024-01-01T09:00:00Z");
        assert_eq!(duration_value(&r), "00:00");
    }

    #[rstest]
    fn it_should_use_the_start_instants_calendar_date() {
        let r = range("2024-01-01T09:00:00Z", "2024-01-01T11:30:00Z");
        assert_eq!(record_date(&r), "2024-01-01");
    }

    #[rstest]
    fn it_should_keep_the_source_offset_when_rendering_the_date() {
        // 23:30 on Jan 1st in +02:00 is already Jan 1st 21:30 UTC; the
        // source's own calendar date wins.
        let r = range("2024-01-01T23:30:00+02:00", "2024-01-02T00:30:00+02:00");
        assert_eq!(record_date(&r), "2024-01-01");
    }
}
