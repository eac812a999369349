//! Time snapping for drag, resize and click times.

use crate::model::{DurationMillis, EpochMillis};
use crate::view_state::time_units::utc_offset_at;

/// Used as the minimum resize duration when snapping is off.
const UNSNAPPED_MIN_DURATION: DurationMillis = 1000;

/// Snap interval plus the UTC offset that absolute snaps align to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapConfig {
    /// Snap interval in ms. Zero disables snapping.
    pub interval: DurationMillis,
    /// Offset for wall-clock alignment. `None` uses the system local zone.
    pub utc_offset_minutes: Option<i32>,
}

impl SnapConfig {
    /// Snap an absolute time down to the interval, aligned to local wall-clock
    /// boundaries.
    pub fn snap(&self, time: EpochMillis) -> EpochMillis {
        if self.interval <= 0 {
            return time;
        }
        let offset = i64::from(utc_offset_at(self.utc_offset_minutes, time).local_minus_utc()) * 1000;
        let local = time.saturating_add(offset);
        local
            .saturating_sub(local.rem_euclid(self.interval))
            .saturating_sub(offset)
    }

    /// Snap a relative value down to the interval, ignoring the UTC offset.
    pub fn floor(&self, value: i64) -> i64 {
        if self.interval <= 0 {
            return value;
        }
        value.saturating_sub(value.rem_euclid(self.interval))
    }

    /// Shortest duration a resize may leave: one interval, or one second when
    /// snapping is off.
    pub fn min_duration(&self) -> DurationMillis {
        if self.interval > 0 {
            self.interval
        } else {
            UNSNAPPED_MIN_DURATION
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUARTER_HOUR: i64 = 900_000;

    fn utc_snap(interval: i64) -> SnapConfig {
        SnapConfig {
            interval,
            utc_offset_minutes: Some(0),
        }
    }

    #[test]
    fn snaps_down_to_interval() {
        let snap = utc_snap(QUARTER_HOUR);
        assert_eq!(snap.snap(1_000), 0);
        assert_eq!(snap.snap(900_001), 900_000);
        assert_eq!(snap.snap(900_000), 900_000);
    }

    #[test]
    fn negative_times_snap_toward_negative_infinity() {
        assert_eq!(utc_snap(QUARTER_HOUR).snap(-1), -QUARTER_HOUR);
    }

    #[test]
    fn extreme_values_saturate() {
        let snap = utc_snap(QUARTER_HOUR);
        assert_eq!(snap.floor(i64::MIN + 1), i64::MIN);
        assert!(i64::MAX - snap.snap(i64::MAX) < QUARTER_HOUR);
        assert_eq!(snap.snap(i64::MIN), i64::MIN);
    }

    #[test]
    fn zero_interval_disables_snapping() {
        let snap = utc_snap(0);
        assert_eq!(snap.snap(1_234), 1_234);
        assert_eq!(snap.floor(-77), -77);
        assert_eq!(snap.min_duration(), 1_000);
    }

    #[test]
    fn offset_aligns_to_local_boundaries() {
        // Hour snapping in UTC+00:30 lands on :30 UTC.
        let snap = SnapConfig {
            interval: 3_600_000,
            utc_offset_minutes: Some(30),
        };
        assert_eq!(snap.snap(2_000_000), 1_800_000);
        assert_eq!(snap.snap(1_000_000), -1_800_000);
    }

    #[test]
    fn floor_ignores_offset() {
        let snap = SnapConfig {
            interval: QUARTER_HOUR,
            utc_offset_minutes: Some(30),
        };
        assert_eq!(snap.floor(-200_000), -QUARTER_HOUR);
        assert_eq!(snap.floor(1_000_000), QUARTER_HOUR);
    }
}
