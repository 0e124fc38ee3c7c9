//! Time-related utilities with clock abstraction for testability.
//!
//! Chat timestamps are display-only: each side stamps the events it builds
//! with its own 24-hour local wall-clock time (`HH:MM:SS`).

use chrono::{DateTime, Local};

/// Format used for every chat timestamp.
pub const WALL_CLOCK_FORMAT: &str = "%H:%M:%S";

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> DateTime<Local>;

    /// Current local time formatted as a chat timestamp
    fn wall_clock(&self) -> String {
        format_wall_clock(&self.now())
    }
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<Local>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    pub fn new(fixed_time: DateTime<Local>) -> Self {
        Self { fixed_time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.fixed_time
    }
}

/// Format a time as a 24-hour wall-clock chat timestamp (e.g. `"10:00:00"`).
pub fn format_wall_clock(time: &DateTime<Local>) -> String {
    time.format(WALL_CLOCK_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, h, m, s).unwrap()
    }

    #[test]
    fn test_fixed_clock_returns_fixed_time() {
        // テスト項目: FixedClock が固定された時刻を返す
        // given (前提条件):
        let fixed_time = local(10, 0, 0);
        let clock = FixedClock::new(fixed_time);

        // when (操作):
        let first = clock.now();
        let second = clock.now();

        // then (期待する結果):
        assert_eq!(first, fixed_time);
        assert_eq!(second, fixed_time);
    }

    #[test]
    fn test_wall_clock_uses_24_hour_format() {
        // テスト項目: 午後の時刻が 24 時間表記でフォーマットされる
        // given (前提条件):
        let clock = FixedClock::new(local(22, 5, 9));

        // when (操作):
        let formatted = clock.wall_clock();

        // then (期待する結果):
        assert_eq!(formatted, "22:05:09");
    }

    #[test]
    fn test_format_wall_clock_pads_fields() {
        // テスト項目: 時・分・秒が 2 桁にゼロ埋めされる
        // given (前提条件):
        let time = local(7, 3, 1);

        // when (操作):
        let formatted = format_wall_clock(&time);

        // then (期待する結果):
        assert_eq!(formatted, "07:03:01");
    }

    #[test]
    fn test_system_clock_wall_clock_has_expected_shape() {
        // テスト項目: システム時刻のタイムスタンプが HH:MM:SS 形式になる
        // given (前提条件):

        // when (操作):
        let timestamp = SystemClock.wall_clock();

        // then (期待する結果):
        assert_eq!(timestamp.len(), 8);
        assert_eq!(timestamp.matches(':').count(), 2);
    }
}
