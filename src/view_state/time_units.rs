//! Calendar units for time headers.
//!
//! Picks the smallest readable unit for a zoom level and walks a canvas in
//! calendar-aligned steps. Alignment happens in a fixed UTC offset so header
//! cells start on local wall-clock boundaries.

use crate::model::{DurationMillis, EpochMillis};
use crate::view_state::types::CanvasWindow;
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, Months, Offset, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

/// Narrowest header cell, in px, for a unit stepped by 1.
pub const MIN_CELL_WIDTH: f64 = 17.0;

/// Upper bound on intervals produced by [`header_intervals`].
pub const MAX_HEADER_INTERVALS: usize = 10_000;

/// Header time unit, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Seconds.
    Second,
    /// Minutes.
    Minute,
    /// Hours.
    Hour,
    /// Calendar days.
    Day,
    /// Calendar months.
    Month,
    /// Calendar years.
    Year,
}

impl TimeUnit {
    /// All units, smallest first.
    pub const ALL: [TimeUnit; 6] = [
        TimeUnit::Second,
        TimeUnit::Minute,
        TimeUnit::Hour,
        TimeUnit::Day,
        TimeUnit::Month,
        TimeUnit::Year,
    ];

    /// How many of the previous unit make one of this unit. Seconds divide
    /// milliseconds; months are taken as 30 days.
    fn divider(self) -> f64 {
        match self {
            TimeUnit::Second => 1000.0,
            TimeUnit::Minute => 60.0,
            TimeUnit::Hour => 60.0,
            TimeUnit::Day => 24.0,
            TimeUnit::Month => 30.0,
            TimeUnit::Year => 12.0,
        }
    }
}

/// Header step per unit, e.g. `minute = 15` for quarter-hour cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeSteps {
    /// Seconds per cell.
    pub second: u32,
    /// Minutes per cell.
    pub minute: u32,
    /// Hours per cell.
    pub hour: u32,
    /// Days per cell.
    pub day: u32,
    /// Months per cell.
    pub month: u32,
    /// Years per cell.
    pub year: u32,
}

impl Default for TimeSteps {
    fn default() -> Self {
        Self {
            second: 1,
            minute: 1,
            hour: 1,
            day: 1,
            month: 1,
            year: 1,
        }
    }
}

impl TimeSteps {
    /// Step for `unit`, never below 1.
    pub fn get(&self, unit: TimeUnit) -> u32 {
        let step = match unit {
            TimeUnit::Second => self.second,
            TimeUnit::Minute => self.minute,
            TimeUnit::Hour => self.hour,
            TimeUnit::Day => self.day,
            TimeUnit::Month => self.month,
            TimeUnit::Year => self.year,
        };
        step.max(1)
    }
}

/// Smallest unit whose header cells would be at least [`MIN_CELL_WIDTH`] wide
/// (three times that when the unit's step is above 1). Falls back to years.
pub fn min_unit(zoom: DurationMillis, width: f64, steps: &TimeSteps) -> TimeUnit {
    let mut span = zoom as f64;
    for unit in TimeUnit::ALL {
        span /= unit.divider();
        let step = steps.get(unit);
        let cells = span / f64::from(step);
        let cell_width = if step > 1 {
            3.0 * MIN_CELL_WIDTH
        } else {
            MIN_CELL_WIDTH
        };
        if cells < width / cell_width {
            return unit;
        }
    }
    TimeUnit::Year
}

/// The next larger unit. Years stay years.
pub fn next_unit(unit: TimeUnit) -> TimeUnit {
    match unit {
        TimeUnit::Second => TimeUnit::Minute,
        TimeUnit::Minute => TimeUnit::Hour,
        TimeUnit::Hour => TimeUnit::Day,
        TimeUnit::Day => TimeUnit::Month,
        TimeUnit::Month | TimeUnit::Year => TimeUnit::Year,
    }
}

/// UTC offset to align calendar boundaries at instant `at`.
///
/// `Some(minutes)` is a fixed offset; `None` uses the system local zone.
/// Out-of-range minutes fall back to UTC.
pub fn utc_offset_at(offset_minutes: Option<i32>, at: EpochMillis) -> FixedOffset {
    let utc = Utc.fix();
    match offset_minutes {
        Some(minutes) => minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or(utc),
        None => Local
            .timestamp_millis_opt(at)
            .single()
            .map(|dt| dt.offset().fix())
            .unwrap_or(utc),
    }
}

/// One header cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderInterval {
    /// Cell start.
    pub start_time: EpochMillis,
    /// Cell end (start of the next cell).
    pub end_time: EpochMillis,
    /// Canvas x of the cell start.
    pub left: f64,
    /// Cell width in px.
    pub width: f64,
}

fn start_of(time: DateTime<FixedOffset>, unit: TimeUnit, step: u32) -> Option<DateTime<FixedOffset>> {
    let offset = *time.offset();
    let align = |value: u32| value - value % step;
    let (year, month, day, hour, minute, second) = match unit {
        TimeUnit::Second => (
            time.year(),
            time.month(),
            time.day(),
            time.hour(),
            time.minute(),
            align(time.second()),
        ),
        TimeUnit::Minute => (
            time.year(),
            time.month(),
            time.day(),
            time.hour(),
            align(time.minute()),
            0,
        ),
        TimeUnit::Hour => (time.year(), time.month(), time.day(), align(time.hour()), 0, 0),
        TimeUnit::Day => (time.year(), time.month(), align(time.day0()) + 1, 0, 0, 0),
        TimeUnit::Month => (time.year(), align(time.month0()) + 1, 1, 0, 0, 0),
        TimeUnit::Year => {
            let year = time.year();
            (year - year.rem_euclid(step as i32), 1, 1, 0, 0, 0)
        }
    };
    offset
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
}

fn advance(time: DateTime<FixedOffset>, unit: TimeUnit, step: u32) -> Option<DateTime<FixedOffset>> {
    let step_i64 = i64::from(step);
    match unit {
        TimeUnit::Second => time.checked_add_signed(Duration::seconds(step_i64)),
        TimeUnit::Minute => time.checked_add_signed(Duration::minutes(step_i64)),
        TimeUnit::Hour => time.checked_add_signed(Duration::hours(step_i64)),
        TimeUnit::Day => time.checked_add_signed(Duration::days(step_i64)),
        TimeUnit::Month => time.checked_add_months(Months::new(step)),
        TimeUnit::Year => time.checked_add_months(Months::new(step.saturating_mul(12))),
    }
}

/// Calendar-aligned `(start, end)` pairs covering `[start, end)` in steps of `unit`.
///
/// The first pair starts at or before `start`.
pub fn iterate_times(
    start: EpochMillis,
    end: EpochMillis,
    unit: TimeUnit,
    steps: &TimeSteps,
    offset: FixedOffset,
) -> Vec<(EpochMillis, EpochMillis)> {
    let step = steps.get(unit);
    let mut out = Vec::new();
    let Some(first) = offset.timestamp_millis_opt(start).single() else {
        return out;
    };
    let Some(mut time) = start_of(first, unit, step) else {
        return out;
    };

    while time.timestamp_millis() < end {
        let Some(next) = advance(time, unit, step) else {
            break;
        };
        if out.len() == MAX_HEADER_INTERVALS {
            tracing::warn!(?unit, start, end, "header interval limit reached, truncating");
            break;
        }
        out.push((time.timestamp_millis(), next.timestamp_millis()));
        time = next;
    }
    out
}

/// Header cells for the whole canvas, positioned in canvas pixels.
pub fn header_intervals(
    canvas: &CanvasWindow,
    unit: TimeUnit,
    steps: &TimeSteps,
    offset: FixedOffset,
) -> Vec<HeaderInterval> {
    iterate_times(
        canvas.canvas_time_start,
        canvas.canvas_time_end,
        unit,
        steps,
        offset,
    )
    .into_iter()
    .map(|(start_time, end_time)| {
        let left = canvas.time_to_x(start_time);
        HeaderInterval {
            start_time,
            end_time,
            left,
            width: canvas.time_to_x(end_time) - left,
        }
    })
    .collect()
}
