use chrono::{Duration, NaiveDateTime};

#[cfg(test)]
use chrono::NaiveDate;

// 1時間あたりの料金 (ルピア)。会場や時間帯による違いはない
pub const HOURLY_RATE: i64 = 59_000;

// 時間単位に四捨五入し、最低1時間とする
pub fn duration_hours(start: &NaiveDateTime, end: &NaiveDateTime) -> i64 {
    let minutes = end.signed_duration_since(*start).num_minutes();
    let rounded = if minutes > 0 { (minutes + 30) / 60 } else { 0 };

    rounded.max(1)
}

pub fn total_price(start: &NaiveDateTime, end: &NaiveDateTime) -> i64 {
    duration_hours(start, end) * HOURLY_RATE
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeSlot {
    start: NaiveDateTime,
    end: NaiveDateTime,
    price: i64,
}

impl TimeSlot {
    pub fn get_start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn get_end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn get_price(&self) -> i64 {
        self.price
    }
}

// 開始から1時間刻みで枠を作る。
// 端数のある時間帯は duration_hours と同じ丸め方で枠数を決めるので、
// 枠の合計金額は常に total_price と一致する
pub fn generate_time_slots(start: &NaiveDateTime, end: &NaiveDateTime) -> Vec<TimeSlot> {
    let mut slots = vec![];
    let mut cursor = *start;

    for _ in 0..duration_hours(start, end) {
        let next = cursor + Duration::hours(1);
        slots.push(TimeSlot {
            start: cursor,
            end: next,
            price: HOURLY_RATE,
        });
        cursor = next;
    }

    slots
}

// "Rp 118.000"
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::new();

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

#[cfg(test)]
fn hm(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 4, 8)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap()
}

#[test]
fn test_duration_hours_9時から11時は2時間() {
    assert_eq!(duration_hours(&hm(9, 0), &hm(11, 0)), 2);
    assert_eq!(total_price(&hm(9, 0), &hm(11, 0)), 118_000);
}

#[test]
fn test_duration_hours_30分以上は切り上げ_未満は切り捨て() {
    assert_eq!(duration_hours(&hm(9, 0), &hm(10, 30)), 2);
    assert_eq!(duration_hours(&hm(9, 0), &hm(10, 15)), 1);
    assert_eq!(duration_hours(&hm(9, 0), &hm(11, 45)), 3);
}

#[test]
fn test_duration_hours_最低1時間になること() {
    assert_eq!(duration_hours(&hm(9, 0), &hm(9, 0)), 1);
    assert_eq!(duration_hours(&hm(9, 0), &hm(9, 15)), 1);
    // 逆転していても1時間
    assert_eq!(duration_hours(&hm(11, 0), &hm(9, 0)), 1);
}

#[test]
fn test_generate_time_slots_1時間ごとに枠ができること() {
    let actual = generate_time_slots(&hm(9, 0), &hm(11, 0));

    assert_eq!(actual.len(), 2);
    assert_eq!(actual[0].get_start(), hm(9, 0));
    assert_eq!(actual[0].get_end(), hm(10, 0));
    assert_eq!(actual[1].get_start(), hm(10, 0));
    assert_eq!(actual[1].get_end(), hm(11, 0));
}

#[test]
fn test_generate_time_slots_枠の合計が総額と一致すること() {
    let start = hm(8, 0);
    for end in [hm(9, 0), hm(9, 15), hm(9, 30), hm(10, 45), hm(14, 0), hm(8, 0)] {
        let slots = generate_time_slots(&start, &end);
        let sum: i64 = slots.iter().map(|slot| slot.get_price()).sum();

        assert_eq!(slots.len() as i64, duration_hours(&start, &end));
        assert_eq!(sum, total_price(&start, &end));
    }
}

#[test]
fn test_format_rupiah_3桁区切り() {
    assert_eq!(format_rupiah(118_000), "Rp 118.000");
    assert_eq!(format_rupiah(6_500), "Rp 6.500");
    assert_eq!(format_rupiah(0), "Rp 0");
    assert_eq!(format_rupiah(1_234_567), "Rp 1.234.567");
}
