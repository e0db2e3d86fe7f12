use chrono::{DateTime, Utc};

/// Score of a win: `floor((100 / elapsed)^2)` with `elapsed` in whole seconds,
/// rounded half up and never below one.
pub fn score(started: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let millis = (now - started).num_milliseconds();
    let elapsed = u64::try_from(millis.saturating_add(500) / 1000)
        .unwrap_or(0)
        .max(1);

    // (100 / e)^2 == 10_000 / e^2 exactly, so integer division floors it.
    let points = 10_000 / elapsed.saturating_mul(elapsed);
    u32::try_from(points).unwrap_or(u32::MAX)
}
