use crate::entity::payment_method::PaymentMethodOption;
use crate::entity::pricing::{generate_time_slots, TimeSlot};
use crate::entity::time_selector::{TimeChoice, TimeField, TimePick, TimeSelector};
use crate::error::BookingError;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

#[cfg(test)]
use crate::entity::datetime::Meridiem;

// 日時選択画面で組み立てる予約の下書き。
// 変更のたびに新しい値を返し、自身は書き換えない
#[derive(Clone, Debug, PartialEq)]
pub struct BookingDraft {
    selected_date: Option<NaiveDate>,
    times: TimeSelector,
}

impl BookingDraft {
    pub fn new(today: &NaiveDate) -> Self {
        Self {
            selected_date: None,
            times: TimeSelector::for_date(today),
        }
    }

    pub fn get_selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn get_start_time(&self) -> NaiveDateTime {
        self.times.get_start()
    }

    pub fn get_end_time(&self) -> NaiveDateTime {
        self.times.get_end()
    }

    pub fn get_duration_hours(&self) -> i64 {
        self.times.get_duration_hours()
    }

    pub fn with_date(&self, date: &NaiveDate) -> Self {
        Self {
            selected_date: Some(*date),
            times: TimeSelector::for_date(date),
        }
    }

    fn selected_times(&self) -> Result<&TimeSelector, BookingError> {
        match self.selected_date {
            Some(_) => Ok(&self.times),
            None => Err(BookingError::NoDateSelected),
        }
    }

    pub fn with_start(&self, pick: &TimePick) -> Result<Self, BookingError> {
        let times = self.selected_times()?.select_start(pick)?;

        Ok(Self {
            selected_date: self.selected_date,
            times,
        })
    }

    pub fn with_end(&self, pick: &TimePick) -> Result<Self, BookingError> {
        let times = self.selected_times()?.select_end(pick)?;

        Ok(Self {
            selected_date: self.selected_date,
            times,
        })
    }

    pub fn with_choice(&self, field: TimeField, choice: TimeChoice) -> Result<Self, BookingError> {
        let times = self.selected_times()?.choose(field, choice)?;

        Ok(Self {
            selected_date: self.selected_date,
            times,
        })
    }
}

#[cfg(test)]
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_with_start_日付未選択の場合は異常系() {
    let draft = BookingDraft::new(&ymd(2025, 3, 10));
    let pick = TimePick::new(10, 0, Meridiem::Am).unwrap();

    assert_eq!(draft.with_start(&pick), Err(BookingError::NoDateSelected));
}

#[test]
fn test_with_date_日付を選び直すと時刻が初期値に戻ること() {
    let draft = BookingDraft::new(&ymd(2025, 3, 10))
        .with_date(&ymd(2025, 3, 12))
        .with_end(&TimePick::new(1, 0, Meridiem::Pm).unwrap())
        .unwrap();
    assert_eq!(draft.get_duration_hours(), 4);

    let actual = draft.with_date(&ymd(2025, 3, 14));
    assert_eq!(actual.get_selected_date(), Some(ymd(2025, 3, 14)));
    assert_eq!(actual.get_duration_hours(), 1);
    assert_eq!(
        actual.get_start_time(),
        ymd(2025, 3, 14).and_hms_opt(9, 0, 0).unwrap()
    );
}

// 日時選択 -> 予約確認 に渡すもの
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleHandoff {
    pub venue_name: String,
    pub venue_location: String,
    pub selected_date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

// 予約確認 -> 支払い方法選択 に渡すもの
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewHandoff {
    pub venue_name: String,
    pub selected_date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub total_price: i64,
}

// 支払い方法選択 -> 支払い完了 に渡すもの
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentHandoff {
    pub payment_method: String,
    pub total_price: i64,
}

const ORDER_ID_PREFIX: &str = "AYOIN";
const BOOKING_ID_PREFIX: &str = "BK";
const SEQUENCE_MODULUS: u128 = 10_000_000;

// 連番は採番サーバが無いので乱数から作る
fn random_sequence() -> u128 {
    Uuid::new_v4().as_u128() % SEQUENCE_MODULUS
}

// 数字だけの会場IDは4桁に揃える
fn venue_code(venue_id: &str) -> String {
    match venue_id.parse::<u32>() {
        Ok(n) => format!("{:04}", n),
        Err(_) => venue_id.to_uppercase(),
    }
}

// "AYOIN2504070000793"
pub fn format_order_id(issued_on: &NaiveDate, sequence: u128) -> String {
    format!(
        "{}{}{:07}",
        ORDER_ID_PREFIX,
        issued_on.format("%y%m%d"),
        sequence % SEQUENCE_MODULUS
    )
}

// "BK/0556/250407/0002721"
pub fn format_booking_id(venue_id: &str, issued_on: &NaiveDate, sequence: u128) -> String {
    format!(
        "{}/{}/{}/{:07}",
        BOOKING_ID_PREFIX,
        venue_code(venue_id),
        issued_on.format("%y%m%d"),
        sequence % SEQUENCE_MODULUS
    )
}

#[test]
fn test_format_order_id_発行日と7桁の連番() {
    assert_eq!(format_order_id(&ymd(2025, 4, 7), 793), "AYOIN2504070000793");
}

#[test]
fn test_format_booking_id_会場コードは4桁() {
    assert_eq!(
        format_booking_id("556", &ymd(2025, 4, 7), 2721),
        "BK/0556/250407/0002721"
    );
    assert_eq!(
        format_booking_id("rekket-bsd", &ymd(2025, 4, 7), 12),
        "BK/REKKET-BSD/250407/0000012"
    );
}

#[derive(Clone, Debug, PartialEq)]
pub struct BookedSlot {
    booking_id: String,
    slot: TimeSlot,
}

impl BookedSlot {
    pub fn get_booking_id(&self) -> &str {
        &self.booking_id
    }

    pub fn get_slot(&self) -> &TimeSlot {
        &self.slot
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PaymentReceipt {
    order_id: String,
    payment_method: PaymentMethodOption,
    venue_name: String,
    selected_date: NaiveDate,
    booked_slots: Vec<BookedSlot>,
    subtotal: i64,
}

impl PaymentReceipt {
    // 枠ごとに連番の予約IDを振る
    pub fn issue(
        review: &ReviewHandoff,
        payment: &PaymentHandoff,
        method: &PaymentMethodOption,
        venue_id: &str,
        issued_on: &NaiveDate,
    ) -> Self {
        let first_sequence = random_sequence();
        let booked_slots = generate_time_slots(&review.start_time, &review.end_time)
            .into_iter()
            .enumerate()
            .map(|(i, slot)| BookedSlot {
                booking_id: format_booking_id(venue_id, issued_on, first_sequence + i as u128),
                slot,
            })
            .collect();

        Self {
            order_id: format_order_id(issued_on, random_sequence()),
            payment_method: method.clone(),
            venue_name: review.venue_name.clone(),
            selected_date: review.selected_date,
            booked_slots,
            subtotal: payment.total_price,
        }
    }

    pub fn get_order_id(&self) -> &str {
        &self.order_id
    }

    pub fn get_payment_method(&self) -> &PaymentMethodOption {
        &self.payment_method
    }

    pub fn get_venue_name(&self) -> &str {
        &self.venue_name
    }

    pub fn get_selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn get_booked_slots(&self) -> &Vec<BookedSlot> {
        &self.booked_slots
    }

    pub fn get_subtotal(&self) -> i64 {
        self.subtotal
    }

    pub fn get_fee(&self) -> i64 {
        self.payment_method.get_fee()
    }

    pub fn get_total_payment(&self) -> i64 {
        self.subtotal + self.get_fee()
    }
}

#[test]
fn test_issue_枠ごとに別の予約idが振られること() {
    let date = ymd(2025, 4, 8);
    let review = ReviewHandoff {
        venue_name: "Rekket Space".to_string(),
        selected_date: date,
        start_time: date.and_hms_opt(10, 0, 0).unwrap(),
        end_time: date.and_hms_opt(12, 0, 0).unwrap(),
        total_price: 118_000,
    };
    let payment = PaymentHandoff {
        payment_method: "gopay".to_string(),
        total_price: 118_000,
    };
    let method = PaymentMethodOption::new("gopay", "GoPay", 4068);

    let actual = PaymentReceipt::issue(&review, &payment, &method, "5", &ymd(2025, 4, 7));

    assert_eq!(actual.get_booked_slots().len(), 2);
    assert_ne!(
        actual.get_booked_slots()[0].get_booking_id(),
        actual.get_booked_slots()[1].get_booking_id()
    );
    assert!(actual.get_order_id().starts_with("AYOIN250407"));
    assert_eq!(actual.get_order_id().len(), "AYOIN2504070000793".len());
    for booked in actual.get_booked_slots().iter() {
        assert!(booked.get_booking_id().starts_with("BK/0005/250407/"));
    }
    assert_eq!(actual.get_total_payment(), 118_000 + 4068);
}
