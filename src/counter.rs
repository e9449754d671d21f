//! 倒计时计算：年内剩余天数、距目标日期天数、年度进度

use chrono::{Datelike, NaiveDate};

/// 一次刷新得到的计数快照（每次 tick 重新计算，不保存）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterSnapshot {
    /// 计算所用的年份（用于 "YEAR 2025 REMAINING" 文案）
    pub year: i32,
    /// 到今年 12 月 31 日的天数，12 月 31 日当天为 0
    pub days_remaining_in_year: i64,
    /// 到目标日期的天数，目标已过时为负数
    pub days_until_target: i64,
    /// 年度进度 0.0..=1.0
    pub year_progress_fraction: f64,
}

impl CounterSnapshot {
    /// 展示用：目标已过时显示 0
    pub fn display_days_until_target(&self) -> i64 {
        self.days_until_target.max(0)
    }
}

/// 某年的 1 月 1 日与 12 月 31 日
fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    // 对合法年份而言 1 月 1 日、12 月 31 日总是存在
    let first = NaiveDate::from_yo_opt(year, 1).unwrap_or(NaiveDate::MIN);
    let last = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
    (first, last)
}

pub fn compute_counters(today: NaiveDate, target_date: NaiveDate) -> CounterSnapshot {
    let (year_start, year_end) = year_bounds(today.year());

    let span = (year_end - year_start).num_days();
    let elapsed = (today - year_start).num_days();

    CounterSnapshot {
        year: today.year(),
        days_remaining_in_year: (year_end - today).num_days(),
        days_until_target: (target_date - today).num_days(),
        year_progress_fraction: (elapsed as f64 / span as f64).clamp(0.0, 1.0),
    }
}
