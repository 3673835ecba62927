//! Heuristic conversion of backup schedule expressions into an RPO window.
//!
//! Accepts cron macros (`@daily`), frequency labels used by schedulers that do
//! not speak cron (`"Daily"`, `"@hourly"`), and plain five-field cron strings.
//! Anything else is unknown; the estimator never guesses a tighter window than
//! the expression states.

pub const HOURLY_RPO_HOURS: u32 = 1;
pub const DAILY_RPO_HOURS: u32 = 24;
pub const WEEKLY_RPO_HOURS: u32 = 168;
pub const MONTHLY_RPO_HOURS: u32 = 720;

const FREQUENCY_LABELS: [(&str, u32); 4] = [
    ("hourly", HOURLY_RPO_HOURS),
    ("daily", DAILY_RPO_HOURS),
    ("weekly", WEEKLY_RPO_HOURS),
    ("monthly", MONTHLY_RPO_HOURS),
];

/// Estimated RPO in hours for a schedule expression, `None` when unknown.
pub fn estimate_rpo_hours(schedule: &str) -> Option<u32> {
    let schedule = schedule.trim().to_ascii_lowercase();
    if schedule.is_empty() {
        return None;
    }

    match schedule.as_str() {
        "@hourly" => return Some(HOURLY_RPO_HOURS),
        "@daily" | "@midnight" => return Some(DAILY_RPO_HOURS),
        "@weekly" => return Some(WEEKLY_RPO_HOURS),
        "@monthly" => return Some(MONTHLY_RPO_HOURS),
        _ => {}
    }

    if let Some((_, hours)) = FREQUENCY_LABELS
        .iter()
        .find(|(label, _)| schedule.contains(label))
    {
        return Some(*hours);
    }

    cron_interval_hours(&schedule)
}

/// Wire form of an RPO estimate: hours, or `-1` when unknown.
pub fn rpo_sentinel(rpo_hours: Option<u32>) -> i64 {
    rpo_hours.map_or(-1, i64::from)
}

fn cron_interval_hours(expr: &str) -> Option<u32> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    let [minute, hour, day_of_month, _month, day_of_week] = fields.as_slice() else {
        return None;
    };

    if let Some(step) = hour.strip_prefix("*/") {
        return parse_step(step);
    }
    if *hour == "*" {
        // A minute step under a wildcard hour is read as an hour count, capped
        // at a day: a wildcard hour runs at least once every 24 hours.
        return Some(
            minute
                .strip_prefix("*/")
                .and_then(parse_step)
                .unwrap_or(HOURLY_RPO_HOURS)
                .min(DAILY_RPO_HOURS),
        );
    }
    if hour.parse::<u32>().is_err() {
        return None;
    }

    if *day_of_week != "*" {
        Some(WEEKLY_RPO_HOURS)
    } else if *day_of_month != "*" {
        Some(MONTHLY_RPO_HOURS)
    } else {
        Some(DAILY_RPO_HOURS)
    }
}

fn parse_step(step: &str) -> Option<u32> {
    step.parse::<u32>().ok().filter(|n| *n > 0)
}
