// Urgency classification for event time windows. Pure functions only:
// `now` is always supplied by the caller so labels are reproducible.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeLabel {
    Now,
    Soon,
    Today,
    Tomorrow,
    ThisWeek,
    Upcoming,
}

impl TimeLabel {
    /// Display text as shown on event cards.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeLabel::Now => "Now",
            TimeLabel::Soon => "Soon",
            TimeLabel::Today => "Today",
            TimeLabel::Tomorrow => "Tomorrow",
            TimeLabel::ThisWeek => "This Week",
            TimeLabel::Upcoming => "Upcoming",
        }
    }

    /// Badge color hex for the label. Opaque to the core; clients may
    /// ignore it and restyle.
    pub fn color(&self) -> &'static str {
        match self {
            TimeLabel::Now => "#10B981",
            TimeLabel::Soon => "#F59E0B",
            TimeLabel::Today => "#0062B8",
            TimeLabel::Tomorrow => "#6366F1",
            TimeLabel::ThisWeek => "#8B5CF6",
            TimeLabel::Upcoming => "#9CA3AF",
        }
    }
}

/// Classify an event's time window relative to `now`. First match wins:
/// running now, starting within two hours, then by calendar-day distance
/// (midnight-to-midnight on the timestamps' calendar dates).
///
/// Ended events are not rejected here; the directory excludes them from
/// active listings, but historical views still need a label.
pub fn classify(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> TimeLabel {
    if start <= now && now <= end {
        return TimeLabel::Now;
    }

    let until_start = start - now;
    if until_start > Duration::zero() && until_start <= Duration::hours(2) {
        return TimeLabel::Soon;
    }

    match (start.date_naive() - now.date_naive()).num_days() {
        0 => TimeLabel::Today,
        1 => TimeLabel::Tomorrow,
        2..=7 => TimeLabel::ThisWeek,
        _ => TimeLabel::Upcoming,
    }
}

/// "7:05 PM"
pub fn format_event_time(start: DateTime<Utc>) -> String {
    let (is_pm, hour) = start.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        start.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// "Wed, Mar 4"
pub fn format_event_date(start: DateTime<Utc>) -> String {
    start.format("%a, %b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn label_now_iff_within_window() {
        let start = at("2025-01-01T14:00:00Z");
        let end = at("2025-01-01T16:00:00Z");
        assert_eq!(classify(start, end, at("2025-01-01T15:00:00Z")), TimeLabel::Now);
        assert_eq!(classify(start, end, start), TimeLabel::Now);
        assert_eq!(classify(start, end, end), TimeLabel::Now);
        assert_ne!(classify(start, end, at("2025-01-01T13:59:59Z")), TimeLabel::Now);
    }

    #[test]
    fn label_soon_within_two_hours() {
        let now = at("2025-01-01T12:00:00Z");
        assert_eq!(
            classify(at("2025-01-01T13:00:00Z"), at("2025-01-01T14:00:00Z"), now),
            TimeLabel::Soon
        );
        // Exactly two hours out is still Soon.
        assert_eq!(
            classify(at("2025-01-01T14:00:00Z"), at("2025-01-01T15:00:00Z"), now),
            TimeLabel::Soon
        );
        // Past the two-hour mark falls through to the day rules.
        assert_eq!(
            classify(at("2025-01-01T14:00:01Z"), at("2025-01-01T15:00:00Z"), now),
            TimeLabel::Today
        );
    }

    #[test]
    fn label_by_day_distance() {
        let now = at("2025-01-01T08:00:00Z");
        assert_eq!(
            classify(at("2025-01-02T12:00:00Z"), at("2025-01-02T13:00:00Z"), now),
            TimeLabel::Tomorrow
        );
        assert_eq!(
            classify(at("2025-01-04T12:00:00Z"), at("2025-01-04T13:00:00Z"), now),
            TimeLabel::ThisWeek
        );
        assert_eq!(
            classify(at("2025-01-08T12:00:00Z"), at("2025-01-08T13:00:00Z"), now),
            TimeLabel::ThisWeek
        );
        assert_eq!(
            classify(at("2025-01-09T12:00:00Z"), at("2025-01-09T13:00:00Z"), now),
            TimeLabel::Upcoming
        );
    }

    #[test]
    fn ended_events_do_not_panic() {
        // Already over; historical views still get a stable label.
        let label = classify(
            at("2024-12-30T12:00:00Z"),
            at("2024-12-30T13:00:00Z"),
            at("2025-01-01T08:00:00Z"),
        );
        assert_eq!(label, TimeLabel::Upcoming);
    }

    #[test]
    fn classify_is_deterministic() {
        let start = at("2025-03-01T10:00:00Z");
        let end = at("2025-03-01T12:00:00Z");
        let now = at("2025-02-27T10:00:00Z");
        let first = classify(start, end, now);
        for _ in 0..10 {
            assert_eq!(classify(start, end, now), first);
        }
    }

    #[test]
    fn display_strings() {
        assert_eq!(TimeLabel::ThisWeek.as_str(), "This Week");
        assert_eq!(format_event_time(at("2025-01-01T19:05:00Z")), "7:05 PM");
        assert_eq!(format_event_time(at("2025-01-01T00:30:00Z")), "12:30 AM");
        assert_eq!(format_event_date(at("2025-03-04T19:05:00Z")), "Tue, Mar 4");
    }
}
