use crate::entity::calendar::{CalendarDay, CalendarMonth, WEEKDAY_LABELS};
use termion::style;
use unicode_width::UnicodeWidthStr;

#[cfg(test)]
use crate::entity::calendar::generate_weeks;
#[cfg(test)]
use chrono::NaiveDate;

const CELL_WIDTH: usize = 4;

fn pad_left(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        return s.to_string();
    }
    format!("{}{}", " ".repeat(width - w), s)
}

fn center(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        return s.to_string();
    }
    format!("{}{}", " ".repeat((width - w) / 2), s)
}

// 選択中は反転、今日は太字、過去は薄く
fn decorate(day: &CalendarDay, cell: String, styled: bool) -> String {
    if !styled || day.is_padding() {
        return cell;
    }

    if day.is_selected() {
        format!("{}{}{}", style::Invert, cell, style::Reset)
    } else if day.is_today() {
        format!("{}{}{}", style::Bold, cell, style::Reset)
    } else if day.is_past() {
        format!("{}{}{}", style::Faint, cell, style::Reset)
    } else {
        cell
    }
}

fn marker(day: &CalendarDay) -> &'static str {
    if day.is_selected() {
        "*"
    } else if day.is_today() {
        "."
    } else {
        " "
    }
}

pub fn render_calendar(month: &CalendarMonth, weeks: &[Vec<CalendarDay>], styled: bool) -> Vec<String> {
    let total_width = CELL_WIDTH * WEEKDAY_LABELS.len();
    let mut lines = vec![];

    lines.push(center(&format!("< {} >", month.title()), total_width));
    lines.push(
        WEEKDAY_LABELS
            .iter()
            .map(|label| pad_left(label, CELL_WIDTH))
            .collect::<Vec<_>>()
            .join(""),
    );

    for week in weeks.iter() {
        let mut line = String::new();
        for day in week.iter() {
            let cell = format!("{}{}", pad_left(day.get_label(), CELL_WIDTH - 1), marker(day));
            line += &decorate(day, cell, styled);
        }
        lines.push(line.trim_end().to_string());
    }

    lines
}

#[cfg(test)]
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_render_calendar_2025年3月() {
    let month = CalendarMonth::new(2025, 3).unwrap();
    let selected = ymd(2025, 3, 12);
    let weeks = generate_weeks(&month, &ymd(2025, 3, 10), Some(&selected));

    let actual = render_calendar(&month, &weeks, false);

    assert_eq!(actual[0], "       < March 2025 >");
    assert_eq!(actual[1], " Sun Mon Tue Wed Thu Fri Sat");
    // 1日は土曜日
    assert_eq!(actual[2], format!("{}1", " ".repeat(26)));
    assert_eq!(actual[4], "  9  10. 11  12* 13  14  15");
    assert_eq!(actual.len(), 2 + weeks.len());
}

#[test]
fn test_render_calendar_装飾あり() {
    let month = CalendarMonth::new(2025, 3).unwrap();
    let selected = ymd(2025, 3, 12);
    let weeks = generate_weeks(&month, &ymd(2025, 3, 10), Some(&selected));

    let actual = render_calendar(&month, &weeks, true).join("\n");

    assert!(actual.contains(&format!("{} 12*{}", style::Invert, style::Reset)));
    assert!(actual.contains(&format!("{} 10.{}", style::Bold, style::Reset)));
    assert!(actual.contains(&format!("{}  9 {}", style::Faint, style::Reset)));
}
