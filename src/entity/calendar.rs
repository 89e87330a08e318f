use crate::entity::datetime::month_name;
use crate::error::BookingError;
use chrono::{Datelike, Duration, NaiveDate};

#[cfg(test)]
use chrono::Weekday;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CalendarMonth {
    year: i32,
    // 1始まり
    month: u32,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, BookingError> {
        if !(1..=12).contains(&month) {
            return Err(BookingError::InvalidMonth(month));
        }

        Ok(Self { year, month })
    }

    pub fn containing(date: &NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn get_year(&self) -> i32 {
        self.year
    }

    pub fn get_month(&self) -> u32 {
        self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    // 月の範囲外の日はNone
    pub fn date_of(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next();
        match (self.date_of(1), next.date_of(1)) {
            (Some(first), Some(next_first)) => (next_first - first).num_days() as u32,
            _ => 0,
        }
    }

    // 月初より前に置く空白セルの数 (日曜始まり)
    pub fn leading_blanks(&self) -> u32 {
        self.date_of(1)
            .map(|first| first.weekday().num_days_from_sunday())
            .unwrap_or(0)
    }

    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

#[test]
fn test_next_12月の次は翌年1月() {
    let dec = CalendarMonth::new(2024, 12).unwrap();
    assert_eq!(dec.next(), CalendarMonth::new(2025, 1).unwrap());
}

#[test]
fn test_prev_1月の前は前年12月() {
    let jan = CalendarMonth::new(2025, 1).unwrap();
    assert_eq!(jan.prev(), CalendarMonth::new(2024, 12).unwrap());
}

#[test]
fn test_new_月が範囲外の場合は異常系() {
    assert_eq!(CalendarMonth::new(2025, 0), Err(BookingError::InvalidMonth(0)));
    assert_eq!(CalendarMonth::new(2025, 13), Err(BookingError::InvalidMonth(13)));
}

#[test]
fn test_days_in_month_うるう年() {
    assert_eq!(CalendarMonth::new(2024, 2).unwrap().days_in_month(), 29);
    assert_eq!(CalendarMonth::new(2025, 2).unwrap().days_in_month(), 28);
    assert_eq!(CalendarMonth::new(2025, 12).unwrap().days_in_month(), 31);
}

#[test]
fn test_leading_blanks_月初の曜日() {
    // 2025/6/1は日曜日
    let june = CalendarMonth::new(2025, 6).unwrap();
    assert_eq!(june.date_of(1).unwrap().weekday(), Weekday::Sun);
    assert_eq!(june.leading_blanks(), 0);

    // 2025/3/1は土曜日
    assert_eq!(CalendarMonth::new(2025, 3).unwrap().leading_blanks(), 6);
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalendarDay {
    label: String,
    date: Option<NaiveDate>,
    is_today: bool,
    is_past: bool,
    is_selected: bool,
}

impl CalendarDay {
    fn padding() -> Self {
        Self {
            label: String::new(),
            date: None,
            is_today: false,
            is_past: false,
            is_selected: false,
        }
    }

    fn new(date: NaiveDate, today: &NaiveDate, selected: Option<&NaiveDate>) -> Self {
        Self {
            label: date.day().to_string(),
            date: Some(date),
            is_today: date == *today,
            is_past: date < *today,
            is_selected: selected.map_or(false, |s| *s == date),
        }
    }

    pub fn get_label(&self) -> &str {
        &self.label
    }

    pub fn get_date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn is_today(&self) -> bool {
        self.is_today
    }

    pub fn is_past(&self) -> bool {
        self.is_past
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn is_padding(&self) -> bool {
        self.date.is_none()
    }

    pub fn is_disabled(&self) -> bool {
        self.is_padding() || self.is_past
    }

    // 選択可能なセルだけが日付を返す
    pub fn tap(&self) -> Option<NaiveDate> {
        if self.is_disabled() {
            return None;
        }

        self.date
    }
}

// todayは呼び出し側で時刻を切り捨てた日付を渡す
pub fn generate_weeks(
    month: &CalendarMonth,
    today: &NaiveDate,
    selected: Option<&NaiveDate>,
) -> Vec<Vec<CalendarDay>> {
    let mut cells: Vec<CalendarDay> = vec![];

    for _ in 0..month.leading_blanks() {
        cells.push(CalendarDay::padding());
    }

    if let Some(first) = month.date_of(1) {
        for offset in 0..month.days_in_month() {
            let date = first + Duration::days(offset as i64);
            cells.push(CalendarDay::new(date, today, selected));
        }
    }

    // 最終週も7マスに揃える
    while cells.len() % 7 != 0 {
        cells.push(CalendarDay::padding());
    }

    cells.chunks(7).map(|week| week.to_vec()).collect()
}

#[cfg(test)]
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_generate_weeks_全ての週が7日であり日数が月の日数と一致すること() {
    let today = ymd(2025, 3, 10);

    for year in [2023, 2024, 2025] {
        for m in 1..=12 {
            let month = CalendarMonth::new(year, m).unwrap();
            let weeks = generate_weeks(&month, &today, None);

            assert!(weeks.iter().all(|week| week.len() == 7));

            let day_count = weeks
                .iter()
                .flatten()
                .filter(|cell| !cell.is_padding())
                .count();
            assert_eq!(day_count as u32, month.days_in_month());
        }
    }
}

#[test]
fn test_generate_weeks_過去の日付は無効になること() {
    let today = ymd(2025, 3, 10);
    let month = CalendarMonth::new(2025, 3).unwrap();
    let weeks = generate_weeks(&month, &today, None);

    for cell in weeks.iter().flatten().filter(|cell| !cell.is_padding()) {
        let date = cell.get_date().unwrap();
        assert_eq!(cell.is_disabled(), date < today);
        assert_eq!(cell.is_today(), date == today);
    }
}

#[test]
fn test_generate_weeks_選択中の日付に印が付くこと() {
    let today = ymd(2025, 3, 10);
    let selected = ymd(2025, 3, 12);
    let month = CalendarMonth::new(2025, 3).unwrap();
    let weeks = generate_weeks(&month, &today, Some(&selected));

    let selected_cells: Vec<&CalendarDay> = weeks
        .iter()
        .flatten()
        .filter(|cell| cell.is_selected())
        .collect();
    assert_eq!(selected_cells.len(), 1);
    assert_eq!(selected_cells[0].get_label(), "12");
}

#[test]
fn test_generate_weeks_先頭の空白セルは月初の曜日分だけ入ること() {
    // 2025/3/1は土曜日なので、先頭6マスは空白
    let today = ymd(2025, 3, 10);
    let month = CalendarMonth::new(2025, 3).unwrap();
    let weeks = generate_weeks(&month, &today, None);

    assert!(weeks[0][..6].iter().all(|cell| cell.is_padding()));
    assert_eq!(weeks[0][6].get_label(), "1");
}

#[test]
fn test_tap_過去の日付と空白セルは何もしないこと() {
    let today = ymd(2025, 3, 10);
    let month = CalendarMonth::new(2025, 3).unwrap();
    let weeks = generate_weeks(&month, &today, None);

    let past = weeks
        .iter()
        .flatten()
        .find(|cell| cell.get_date() == Some(ymd(2025, 3, 3)))
        .unwrap();
    assert_eq!(past.tap(), None);
    assert_eq!(weeks[0][0].tap(), None);

    let today_cell = weeks
        .iter()
        .flatten()
        .find(|cell| cell.is_today())
        .unwrap();
    assert_eq!(today_cell.tap(), Some(today));
}
