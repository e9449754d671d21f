//! 小部件状态：目标日期、视图模式与定时刷新

use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::calendar::{MonthGrid, ViewMode, build_months};
use crate::counter::{CounterSnapshot, compute_counters};
use crate::error::TargetDateError;

/// 目标日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 刷新周期（每分钟检查一次，以便跨过午夜后更新）
pub const REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// 解析 `YYYY-MM-DD`，首尾空白忽略，年份不带正负号
pub fn parse_target_date(raw: &str) -> Result<NaiveDate, TargetDateError> {
    let trimmed = raw.trim();
    if trimmed.starts_with(['+', '-']) {
        return Err(TargetDateError::Signed {
            input: raw.to_owned(),
        });
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|source| TargetDateError::Malformed {
        input: raw.to_owned(),
        source,
    })
}

/// 本地系统日期
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// 一次刷新的全部输出，交给界面渲染
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetView {
    pub today: NaiveDate,
    pub target_date: NaiveDate,
    pub view_mode: ViewMode,
    pub counters: CounterSnapshot,
    pub months: Vec<MonthGrid>,
}

/// 可变状态只有目标日期与视图模式；其余每次 tick 重新计算
#[derive(Clone, Debug)]
pub struct WidgetState {
    target_date: NaiveDate,
    view_mode: ViewMode,
    refresh_due: bool,
}

impl WidgetState {
    pub fn new(target_date: NaiveDate) -> Self {
        Self {
            target_date,
            view_mode: ViewMode::default(),
            refresh_due: true,
        }
    }

    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// 状态变化后需要立即重算
    pub fn is_refresh_due(&self) -> bool {
        self.refresh_due
    }

    /// 设置目标日期；解析失败时状态保持不变
    pub fn set_target_date(&mut self, raw: &str) -> Result<(), TargetDateError> {
        let date = parse_target_date(raw)?;
        self.target_date = date;
        self.refresh_due = true;
        Ok(())
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggled();
        self.refresh_due = true;
    }

    /// 以给定的“今天”重算计数与日历
    pub fn tick(&mut self, today: NaiveDate) -> WidgetView {
        self.refresh_due = false;
        WidgetView {
            today,
            target_date: self.target_date,
            view_mode: self.view_mode,
            counters: compute_counters(today, self.target_date),
            months: build_months(today, self.view_mode),
        }
    }
}

/// 固定周期轮询：首次总是到期
#[derive(Clone, Debug)]
pub struct RefreshSchedule {
    period: Duration,
    last: Option<Instant>,
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self::new(REFRESH_PERIOD)
    }
}

impl RefreshSchedule {
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last {
            Some(last) => now.saturating_duration_since(last) >= self.period,
            None => true,
        }
    }

    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// 距下一次刷新的时间，用于 request_repaint_after
    pub fn time_until_due(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self.period.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DayClass;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_set_target_date_roundtrip() {
        let mut state = WidgetState::new(date(2026, 12, 31));
        state.set_target_date("2030-06-15").unwrap();
        assert_eq!(state.target_date(), date(2030, 6, 15));
    }

    #[test]
    fn test_invalid_target_date_leaves_state_unchanged() {
        let mut state = WidgetState::new(date(2026, 12, 31));
        state.tick(date(2025, 1, 1));
        assert!(!state.is_refresh_due());

        let err = state.set_target_date("not-a-date").unwrap_err();
        assert_eq!(err.input(), "not-a-date");
        assert_eq!(state.target_date(), date(2026, 12, 31));
        assert!(!state.is_refresh_due());
    }

    #[test]
    fn test_rejects_impossible_dates() {
        let mut state = WidgetState::new(date(2026, 12, 31));
        assert!(state.set_target_date("2025-02-29").is_err());
        assert!(state.set_target_date("2025-13-01").is_err());
        assert!(state.set_target_date("").is_err());
        assert!(state.set_target_date("2024-02-29").is_ok());
        assert_eq!(state.target_date(), date(2024, 2, 29));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_target_date(" 2030-06-15\n").unwrap(), date(2030, 6, 15));
    }

    #[test]
    fn test_parse_rejects_signed_year() {
        let err = parse_target_date("+2030-06-15").unwrap_err();
        assert!(matches!(err, TargetDateError::Signed { .. }));
        assert_eq!(err.input(), "+2030-06-15");
        assert!(parse_target_date(" -2030-06-15").is_err());

        let mut state = WidgetState::new(date(2026, 12, 31));
        assert!(state.set_target_date("+2030-06-15").is_err());
        assert_eq!(state.target_date(), date(2026, 12, 31));
    }

    #[test]
    fn test_parse_accepts_single_digit_month_and_day() {
        assert_eq!(parse_target_date("2030-6-5").unwrap(), date(2030, 6, 5));
    }

    #[test]
    fn test_changes_mark_refresh_due() {
        let mut state = WidgetState::new(date(2026, 12, 31));
        assert!(state.is_refresh_due());
        state.tick(date(2025, 3, 3));
        assert!(!state.is_refresh_due());

        state.toggle_view_mode();
        assert!(state.is_refresh_due());
        assert_eq!(state.view_mode(), ViewMode::SixMonth);
        state.tick(date(2025, 3, 3));

        state.set_target_date("2027-01-01").unwrap();
        assert!(state.is_refresh_due());
    }

    #[test]
    fn test_tick_is_idempotent() {
        let mut state = WidgetState::new(date(2026, 12, 31));
        let today = date(2025, 8, 20);
        let first = state.tick(today);
        let second = state.tick(today);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tick_follows_view_mode() {
        let mut state = WidgetState::new(date(2026, 12, 31));
        let today = date(2025, 12, 31);
        let view = state.tick(today);
        assert_eq!(view.months.len(), 1);
        assert_eq!(view.counters.days_remaining_in_year, 0);
        assert_eq!(view.counters.days_until_target, 365);
        assert_eq!(view.months[0].days[30].class, DayClass::Current);

        state.toggle_view_mode();
        let view = state.tick(today);
        assert_eq!(view.view_mode, ViewMode::SixMonth);
        assert_eq!(view.months.len(), 6);
        assert_eq!((view.months[5].year, view.months[5].month), (2026, 5));
    }

    #[test]
    fn test_refresh_schedule() {
        let start = Instant::now();
        let mut schedule = RefreshSchedule::new(Duration::from_secs(60));
        assert!(schedule.is_due(start));
        assert_eq!(schedule.time_until_due(start), Duration::ZERO);

        schedule.mark(start);
        assert!(!schedule.is_due(start + Duration::from_secs(59)));
        assert_eq!(
            schedule.time_until_due(start + Duration::from_secs(20)),
            Duration::from_secs(40)
        );
        assert!(schedule.is_due(start + Duration::from_secs(60)));
        assert_eq!(schedule.time_until_due(start + Duration::from_secs(90)), Duration::ZERO);
    }
}
