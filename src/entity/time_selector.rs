use crate::entity::datetime::{to_12_hour, to_24_hour, Meridiem};
use crate::entity::pricing::duration_hours;
use crate::error::BookingError;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const MINUTE_CHOICES: [u32; 4] = [0, 15, 30, 45];

// 日付を選んだ直後の開始時刻
pub const DEFAULT_START_HOUR: u32 = 9;

// 時・分・AM/PMの3つの選択肢から決まる時刻
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimePick {
    hour: u32,
    minute: u32,
    meridiem: Meridiem,
}

impl TimePick {
    pub fn new(hour: u32, minute: u32, meridiem: Meridiem) -> Result<Self, BookingError> {
        if !(1..=12).contains(&hour) {
            return Err(BookingError::InvalidHour(hour));
        }
        if !MINUTE_CHOICES.contains(&minute) {
            return Err(BookingError::InvalidMinute(minute));
        }

        Ok(Self {
            hour,
            minute,
            meridiem,
        })
    }

    pub fn from_time(dt: &NaiveDateTime) -> Self {
        let (hour, meridiem) = to_12_hour(dt.hour());

        Self {
            hour,
            minute: dt.minute(),
            meridiem,
        }
    }

    pub fn get_hour(&self) -> u32 {
        self.hour
    }

    pub fn get_minute(&self) -> u32 {
        self.minute
    }

    pub fn get_meridiem(&self) -> Meridiem {
        self.meridiem
    }

    pub fn with_hour(&self, hour: u32) -> Result<Self, BookingError> {
        Self::new(hour, self.minute, self.meridiem)
    }

    pub fn with_minute(&self, minute: u32) -> Result<Self, BookingError> {
        Self::new(self.hour, minute, self.meridiem)
    }

    pub fn with_meridiem(&self, meridiem: Meridiem) -> Self {
        Self { meridiem, ..*self }
    }

    pub fn on(&self, date: &NaiveDate) -> Result<NaiveDateTime, BookingError> {
        let hour24 = to_24_hour(self.hour, self.meridiem)?;

        date.and_hms_opt(hour24, self.minute, 0)
            .ok_or(BookingError::InvalidHour(self.hour))
    }
}

#[test]
fn test_time_pick_new_分の選択肢以外は異常系() {
    assert_eq!(
        TimePick::new(9, 10, Meridiem::Am),
        Err(BookingError::InvalidMinute(10))
    );
    assert_eq!(
        TimePick::new(0, 0, Meridiem::Am),
        Err(BookingError::InvalidHour(0))
    );
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

// 選択肢グループ1つ分の変更
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimeChoice {
    Hour(u32),
    Minute(u32),
    Meridiem(Meridiem),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeSelector {
    date: NaiveDate,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeSelector {
    // 日付を選び直すと 9:00 AM - 10:00 AM に戻る
    pub fn for_date(date: &NaiveDate) -> Self {
        let start = date
            .and_hms_opt(DEFAULT_START_HOUR, 0, 0)
            .unwrap_or_else(|| date.and_time(NaiveTime::MIN));

        Self {
            date: *date,
            start,
            end: start + Duration::hours(1),
        }
    }

    pub fn get_date(&self) -> NaiveDate {
        self.date
    }

    pub fn get_start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn get_end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn get_duration_hours(&self) -> i64 {
        duration_hours(&self.start, &self.end)
    }

    // 終了時刻はそれまでの編集に関わらず開始+1時間で上書きする
    pub fn select_start(&self, pick: &TimePick) -> Result<Self, BookingError> {
        let start = pick.on(&self.date)?;

        Ok(Self {
            date: self.date,
            start,
            end: start + Duration::hours(1),
        })
    }

    // 開始以前の終了時刻は黙って開始+1時間に直す
    pub fn select_end(&self, pick: &TimePick) -> Result<Self, BookingError> {
        let candidate = pick.on(&self.date)?;
        let end = if candidate <= self.start {
            log::debug!(
                "end time {} is not after start {}, corrected",
                candidate,
                self.start
            );
            self.start + Duration::hours(1)
        } else {
            candidate
        };

        Ok(Self {
            date: self.date,
            start: self.start,
            end,
        })
    }

    pub fn current_pick(&self, field: TimeField) -> TimePick {
        match field {
            TimeField::Start => TimePick::from_time(&self.start),
            TimeField::End => TimePick::from_time(&self.end),
        }
    }

    // 時・分・AM/PMのどれか1つだけを変える。残りの2つは現在値のまま
    pub fn choose(&self, field: TimeField, choice: TimeChoice) -> Result<Self, BookingError> {
        let current = self.current_pick(field);
        let pick = match choice {
            TimeChoice::Hour(hour) => current.with_hour(hour)?,
            TimeChoice::Minute(minute) => current.with_minute(minute)?,
            TimeChoice::Meridiem(meridiem) => current.with_meridiem(meridiem),
        };

        match field {
            TimeField::Start => self.select_start(&pick),
            TimeField::End => self.select_end(&pick),
        }
    }
}

#[cfg(test)]
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[cfg(test)]
fn hm(date: &NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap()
}

#[test]
fn test_for_date_9時から1時間がデフォルトになること() {
    let date = ymd(2025, 3, 12);
    let selector = TimeSelector::for_date(&date);

    assert_eq!(selector.get_start(), hm(&date, 9, 0));
    assert_eq!(selector.get_end(), hm(&date, 10, 0));
    assert_eq!(selector.get_duration_hours(), 1);
}

#[test]
fn test_select_start_終了時刻は常に開始の1時間後になること() {
    let date = ymd(2025, 3, 12);
    let selector = TimeSelector::for_date(&date)
        .select_end(&TimePick::new(1, 0, Meridiem::Pm).unwrap())
        .unwrap();
    assert_eq!(selector.get_end(), hm(&date, 13, 0));

    for hour in 1..=12 {
        for minute in MINUTE_CHOICES {
            for meridiem in [Meridiem::Am, Meridiem::Pm] {
                let pick = TimePick::new(hour, minute, meridiem).unwrap();
                let actual = selector.select_start(&pick).unwrap();
                assert_eq!(actual.get_end(), actual.get_start() + Duration::hours(1));
            }
        }
    }
}

#[test]
fn test_select_start_23時半開始の終了は翌日になること() {
    let date = ymd(2025, 3, 12);
    let pick = TimePick::new(11, 30, Meridiem::Pm).unwrap();
    let actual = TimeSelector::for_date(&date).select_start(&pick).unwrap();

    assert_eq!(actual.get_end(), hm(&ymd(2025, 3, 13), 0, 30));
    assert_eq!(actual.get_duration_hours(), 1);
}

#[test]
fn test_select_end_開始より前の終了時刻は開始の1時間後に補正されること() {
    // 14:30開始で14:00終了を選ぶと15:30になる
    let date = ymd(2025, 3, 12);
    let selector = TimeSelector::for_date(&date)
        .select_start(&TimePick::new(2, 30, Meridiem::Pm).unwrap())
        .unwrap();

    let actual = selector
        .select_end(&TimePick::new(2, 0, Meridiem::Pm).unwrap())
        .unwrap();
    assert_eq!(actual.get_end(), hm(&date, 15, 30));

    // 補正は冪等
    let again = actual
        .select_end(&TimePick::new(2, 0, Meridiem::Pm).unwrap())
        .unwrap();
    assert_eq!(again, actual);
}

#[test]
fn test_select_end_開始と同時刻も補正されること() {
    let date = ymd(2025, 3, 12);
    let selector = TimeSelector::for_date(&date);
    let actual = selector
        .select_end(&TimePick::new(9, 0, Meridiem::Am).unwrap())
        .unwrap();

    assert_eq!(actual.get_end(), hm(&date, 10, 0));
}

#[test]
fn test_select_end_開始より後ならそのまま受け入れること() {
    let date = ymd(2025, 3, 12);
    let selector = TimeSelector::for_date(&date);
    let actual = selector
        .select_end(&TimePick::new(11, 0, Meridiem::Am).unwrap())
        .unwrap();

    assert_eq!(actual.get_end(), hm(&date, 11, 0));
    assert_eq!(actual.get_duration_hours(), 2);
}

#[test]
#[allow(non_snake_case)]
fn test_choose_PMを選ぶと開始が12時間後ろにずれること() {
    let date = ymd(2025, 3, 12);
    let actual = TimeSelector::for_date(&date)
        .choose(TimeField::Start, TimeChoice::Meridiem(Meridiem::Pm))
        .unwrap();

    assert_eq!(actual.get_start(), hm(&date, 21, 0));
    assert_eq!(actual.get_end(), hm(&date, 22, 0));
}

#[test]
fn test_choose_不正な分は状態を変えずに異常系() {
    let date = ymd(2025, 3, 12);
    let selector = TimeSelector::for_date(&date);

    let actual = selector.choose(TimeField::End, TimeChoice::Minute(20));
    assert_eq!(actual, Err(BookingError::InvalidMinute(20)));
    assert_eq!(selector.get_end(), hm(&date, 10, 0));
}

#[test]
fn test_choose_終了の時だけを変更する() {
    let date = ymd(2025, 3, 12);
    let actual = TimeSelector::for_date(&date)
        .choose(TimeField::End, TimeChoice::Hour(11))
        .unwrap();

    assert_eq!(actual.get_start(), hm(&date, 9, 0));
    assert_eq!(actual.get_end(), hm(&date, 11, 0));
}
