use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

/// Label given to a task before the first refresh
pub const JUST_CREATED: &str = "less than 2 seconds";

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2520;
const MINUTES_IN_MONTH: i64 = 43200;
const MINUTES_IN_TWO_MONTHS: i64 = 86400;

/// Current wall clock as epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Describe the distance between two epoch-millisecond instants in words,
/// with second-level wording under two minutes ("half a minute",
/// "about 3 hours", "almost 2 years").
///
/// Direction does not matter: a timestamp in the future reads the same as
/// one equally far in the past.
pub fn time_to_now(added_ms: i64, now_ms: i64) -> String {
    let (earlier, later) = if added_ms <= now_ms {
        (added_ms, now_ms)
    } else {
        (now_ms, added_ms)
    };

    let seconds = (later - earlier) / 1000;
    let minutes = (seconds as f64 / 60.0).round() as i64;

    if minutes < 2 {
        return match seconds {
            0..=4 => "less than 5 seconds".to_string(),
            5..=9 => "less than 10 seconds".to_string(),
            10..=19 => "less than 20 seconds".to_string(),
            20..=39 => "half a minute".to_string(),
            40..=59 => "less than a minute".to_string(),
            _ => "1 minute".to_string(),
        };
    }

    if minutes < 45 {
        return counted(minutes, "minute");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = (minutes as f64 / 60.0).round() as i64;
        return format!("about {}", counted(hours, "hour"));
    }
    if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = (minutes as f64 / MINUTES_IN_DAY as f64).round() as i64;
        return counted(days, "day");
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        let months = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return format!("about {}", counted(months, "month"));
    }

    let months = match (
        Utc.timestamp_millis_opt(earlier).single(),
        Utc.timestamp_millis_opt(later).single(),
    ) {
        (Some(from), Some(to)) => calendar_months_between(from, to),
        _ => minutes / MINUTES_IN_MONTH,
    };

    if months < 12 {
        let nearest = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        return counted(nearest, "month");
    }

    let years = months / 12;
    match months % 12 {
        0..=2 => format!("about {}", counted(years, "year")),
        3..=8 => format!("over {}", counted(years, "year")),
        _ => format!("almost {}", counted(years + 1, "year")),
    }
}

/// Whole calendar months from `from` to `to` (`from <= to`)
fn calendar_months_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let mut months = (to.year() as i64 - from.year() as i64) * 12
        + (to.month() as i64 - from.month() as i64);

    // Last month only counts once its day and time of day have been reached
    let from_key = (from.day(), from.num_seconds_from_midnight());
    let to_key = (to.day(), to.num_seconds_from_midnight());
    if months > 0 && to_key < from_key {
        months -= 1;
    }
    months
}

fn counted(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
