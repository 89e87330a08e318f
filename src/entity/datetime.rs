use crate::error::BookingError;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Meridiem::Am => {
                write!(f, "AM")
            }
            Meridiem::Pm => {
                write!(f, "PM")
            }
        }
    }
}

pub fn read_meridiem(s: &str) -> Option<Meridiem> {
    let lc = s.to_lowercase();

    if lc == "am" {
        return Some(Meridiem::Am);
    } else if lc == "pm" {
        return Some(Meridiem::Pm);
    }

    return None;
}

#[test]
#[allow(non_snake_case)]
fn test_read_meridiem_大文字小文字を区別せずに変換する() {
    assert_eq!(read_meridiem("AM"), Some(Meridiem::Am));
    assert_eq!(read_meridiem("pm"), Some(Meridiem::Pm));
}

#[test]
#[allow(non_snake_case)]
fn test_read_meridiem_パーズできなかったときはNoneを返す() {
    assert_eq!(read_meridiem("noon"), None);
}

// 12時間表記 -> 24時間表記。12 AMは0時、12 PMは12時
pub fn to_24_hour(hour: u32, meridiem: Meridiem) -> Result<u32, BookingError> {
    if !(1..=12).contains(&hour) {
        return Err(BookingError::InvalidHour(hour));
    }

    let hour24 = match (meridiem, hour) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Am, h) => h,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Pm, h) => h + 12,
    };

    Ok(hour24)
}

pub fn to_12_hour(hour24: u32) -> (u32, Meridiem) {
    let meridiem = if hour24 >= 12 {
        Meridiem::Pm
    } else {
        Meridiem::Am
    };

    let hour = match hour24 % 12 {
        0 => 12,
        h => h,
    };

    (hour, meridiem)
}

#[test]
#[allow(non_snake_case)]
fn test_to_24_hour_12時AMは0時になること() {
    assert_eq!(to_24_hour(12, Meridiem::Am), Ok(0));
}

#[test]
#[allow(non_snake_case)]
fn test_to_24_hour_12時PMは12時のままであること() {
    assert_eq!(to_24_hour(12, Meridiem::Pm), Ok(12));
    assert_eq!(to_24_hour(2, Meridiem::Pm), Ok(14));
}

#[test]
fn test_to_24_hour_範囲外の時は異常系() {
    assert_eq!(to_24_hour(0, Meridiem::Am), Err(BookingError::InvalidHour(0)));
    assert_eq!(to_24_hour(13, Meridiem::Pm), Err(BookingError::InvalidHour(13)));
}

#[test]
fn test_to_12_hour_正常系() {
    assert_eq!(to_12_hour(0), (12, Meridiem::Am));
    assert_eq!(to_12_hour(9), (9, Meridiem::Am));
    assert_eq!(to_12_hour(12), (12, Meridiem::Pm));
    assert_eq!(to_12_hour(23), (11, Meridiem::Pm));
}

// 時刻選択画面の表示: "9:00 AM"
pub fn format_12_hour(dt: &NaiveDateTime) -> String {
    let (hour, meridiem) = to_12_hour(dt.hour());
    format!("{}:{:02} {}", hour, dt.minute(), meridiem)
}

// 予約確認画面の表示: "09:00"
pub fn format_24_hour(dt: &NaiveDateTime) -> String {
    format!("{:02}:{:02}", dt.hour(), dt.minute())
}

#[cfg(test)]
fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap()
}

#[test]
fn test_format_12_hour_分は0埋めされること() {
    assert_eq!(format_12_hour(&at(2025, 4, 8, 9, 5)), "9:05 AM");
    assert_eq!(format_12_hour(&at(2025, 4, 8, 0, 30)), "12:30 AM");
    assert_eq!(format_12_hour(&at(2025, 4, 8, 14, 45)), "2:45 PM");
}

#[test]
fn test_format_24_hour_正常系() {
    assert_eq!(format_24_hour(&at(2025, 4, 8, 9, 0)), "09:00");
    assert_eq!(format_24_hour(&at(2025, 4, 8, 14, 30)), "14:30");
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// "Tuesday, 8 Apr 2025"
pub fn format_long_date(date: &NaiveDate) -> String {
    format!(
        "{}, {} {} {}",
        weekday_name(date.weekday()),
        date.day(),
        &month_name(date.month())[..3],
        date.year()
    )
}

// "Tue, Apr 8, 2025"
pub fn format_short_date(date: &NaiveDate) -> String {
    format!(
        "{}, {} {}, {}",
        &weekday_name(date.weekday())[..3],
        &month_name(date.month())[..3],
        date.day(),
        date.year()
    )
}

#[test]
fn test_format_long_date_正常系() {
    let date = NaiveDate::from_ymd_opt(2025, 4, 8).unwrap();
    assert_eq!(format_long_date(&date), "Tuesday, 8 Apr 2025");
}

#[test]
fn test_format_short_date_正常系() {
    let date = NaiveDate::from_ymd_opt(2025, 4, 8).unwrap();
    assert_eq!(format_short_date(&date), "Tue, Apr 8, 2025");
}

#[test]
fn test_month_name_範囲外は空文字() {
    assert_eq!(month_name(1), "January");
    assert_eq!(month_name(12), "December");
    assert_eq!(month_name(0), "");
    assert_eq!(month_name(13), "");
}
