//! 日历网格：按视图模式生成一个或六个月的日期及其分类（过去/今天/未来）

use chrono::{Datelike, NaiveDate};

/// 日历视图模式（不持久化，启动时为单月）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    SingleMonth,
    SixMonth,
}

impl ViewMode {
    /// 该模式下展示的月份数
    pub fn month_count(self) -> u32 {
        match self {
            ViewMode::SingleMonth => 1,
            ViewMode::SixMonth => 6,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::SingleMonth => ViewMode::SixMonth,
            ViewMode::SixMonth => ViewMode::SingleMonth,
        }
    }
}

/// 日期相对今天的分类
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayClass {
    Past,
    Current,
    Future,
}

impl DayClass {
    pub fn classify(date: NaiveDate, today: NaiveDate) -> Self {
        match date.cmp(&today) {
            std::cmp::Ordering::Less => DayClass::Past,
            std::cmp::Ordering::Equal => DayClass::Current,
            std::cmp::Ordering::Greater => DayClass::Future,
        }
    }
}

/// 日历中的一格
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub class: DayClass,
}

/// 每行 7 格，按日序排布（不按星期对齐）
pub const GRID_COLUMNS: u32 = 7;

impl DayCell {
    /// 网格中的 (行, 列)，均从 0 开始
    pub fn grid_position(&self) -> (u32, u32) {
        let index = self.date.day0();
        (index / GRID_COLUMNS, index % GRID_COLUMNS)
    }
}

/// 一个月的全部日期
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub days: Vec<DayCell>,
}

impl MonthGrid {
    fn build(year: i32, month: u32, today: NaiveDate) -> Self {
        let days = (1..=days_in_month(year, month))
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .map(|date| DayCell {
                date,
                class: DayClass::classify(date, today),
            })
            .collect();
        Self { year, month, days }
    }

    /// 月份缩写，大写，如 "JAN"
    pub fn label(&self) -> String {
        chrono::Month::try_from(self.month as u8)
            .map(|m| m.name()[..3].to_uppercase())
            .unwrap_or_default()
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// 从今天所在月份开始，生成连续 1 或 6 个月
pub fn build_months(today: NaiveDate, mode: ViewMode) -> Vec<MonthGrid> {
    (0..mode.month_count())
        .map(|offset| {
            // 以 0 起算的月序号做整数运算，超过 12 时年份进位
            let index = today.month0() + offset;
            let month = index % 12 + 1;
            let year = today.year() + (index / 12) as i32;
            MonthGrid::build(year, month, today)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_counts_per_mode() {
        let today = date(2025, 5, 10);
        assert_eq!(build_months(today, ViewMode::SingleMonth).len(), 1);
        assert_eq!(build_months(today, ViewMode::SixMonth).len(), 6);
    }

    #[test]
    fn test_six_month_rollover_every_start_month() {
        for start in 1..=12u32 {
            let today = date(2025, start, 1);
            let months = build_months(today, ViewMode::SixMonth);
            for (k, grid) in months.iter().enumerate() {
                let k = k as u32;
                assert_eq!(grid.month, ((start - 1 + k) % 12) + 1);
                let expected_year = if start + k > 12 { 2026 } else { 2025 };
                assert_eq!(grid.year, expected_year, "start {start} offset {k}");
            }
        }
    }

    #[test]
    fn test_months_are_chronological() {
        let months = build_months(date(2025, 10, 3), ViewMode::SixMonth);
        let firsts: Vec<NaiveDate> = months.iter().map(|m| m.days[0].date).collect();
        let mut sorted = firsts.clone();
        sorted.sort();
        assert_eq!(firsts, sorted);
        assert_eq!(firsts[3], date(2026, 1, 1));
    }

    #[test]
    fn test_exactly_one_current_day() {
        let today = date(2025, 7, 16);
        let months = build_months(today, ViewMode::SixMonth);
        let current: Vec<&DayCell> = months
            .iter()
            .flat_map(|m| m.days.iter())
            .filter(|c| c.class == DayClass::Current)
            .collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].date, today);

        for cell in &months[0].days {
            match cell.date.cmp(&today) {
                std::cmp::Ordering::Less => assert_eq!(cell.class, DayClass::Past),
                std::cmp::Ordering::Equal => assert_eq!(cell.class, DayClass::Current),
                std::cmp::Ordering::Greater => assert_eq!(cell.class, DayClass::Future),
            }
        }
        // 之后的月份全部为未来
        assert!(
            months[1..]
                .iter()
                .flat_map(|m| m.days.iter())
                .all(|c| c.class == DayClass::Future)
        );
    }

    #[test]
    fn test_leap_february() {
        let today = date(2024, 2, 28);
        let months = build_months(today, ViewMode::SingleMonth);
        let feb = &months[0];
        assert_eq!(feb.days.len(), 29);
        assert_eq!(feb.days[27].class, DayClass::Current);
        assert_eq!(feb.days[28].date, date(2024, 2, 29));
        assert_eq!(feb.days[28].class, DayClass::Future);
        assert_eq!(feb.days[0].class, DayClass::Past);
    }

    #[test]
    fn test_days_ascending_and_complete() {
        for grid in build_months(date(2023, 9, 1), ViewMode::SixMonth) {
            assert_eq!(grid.days.len() as u32, days_in_month(grid.year, grid.month));
            for (i, cell) in grid.days.iter().enumerate() {
                assert_eq!(cell.date.day(), i as u32 + 1);
            }
        }
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_grid_position() {
        let grid = &build_months(date(2025, 2, 1), ViewMode::SingleMonth)[0];
        assert_eq!(grid.days[0].grid_position(), (0, 0));
        assert_eq!(grid.days[6].grid_position(), (0, 6));
        assert_eq!(grid.days[7].grid_position(), (1, 0));
        assert_eq!(grid.days[27].grid_position(), (3, 6));

        let grid = &build_months(date(2025, 1, 1), ViewMode::SingleMonth)[0];
        assert_eq!(grid.days[30].grid_position(), (4, 2));
    }

    #[test]
    fn test_month_label() {
        let months = build_months(date(2025, 11, 5), ViewMode::SixMonth);
        let labels: Vec<String> = months.iter().map(MonthGrid::label).collect();
        assert_eq!(labels, ["NOV", "DEC", "JAN", "FEB", "MAR", "APR"]);
    }

    #[test]
    fn test_toggle_view_mode() {
        assert_eq!(ViewMode::default(), ViewMode::SingleMonth);
        assert_eq!(ViewMode::SingleMonth.toggled(), ViewMode::SixMonth);
        assert_eq!(ViewMode::SixMonth.toggled(), ViewMode::SingleMonth);
    }
}
