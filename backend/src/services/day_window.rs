use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Half-open `[start, end)` window covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DayWindow {
    /// Window for the calendar day `ts` falls on.
    pub fn containing(ts: NaiveDateTime) -> Option<Self> {
        Self::for_day(ts.date())
    }

    /// `None` on the last representable day, which has no following midnight.
    pub fn for_day(day: NaiveDate) -> Option<Self> {
        Some(Self {
            start: day.and_time(NaiveTime::MIN),
            end: day.succ_opt()?.and_time(NaiveTime::MIN),
        })
    }

    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }

    #[cfg(test)]
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts < self.end
    }
}

/// Truncate a local timestamp to midnight of its day.
pub fn normalize_to_midnight(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date().and_time(NaiveTime::MIN)
}
