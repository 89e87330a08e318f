use crate::application::booking_flow::{BookingFlow, FlowStage, ReviewStage};
use crate::application::interface::VenueRepositoryTrait;
use crate::entity::calendar::CalendarMonth;
use crate::entity::time_selector::TimePick;
use crate::error::BookingError;
use chrono::{Datelike, NaiveDate};

#[cfg(test)]
use crate::entity::account::GuestAccount;
#[cfg(test)]
use crate::entity::chat::Chat;
#[cfg(test)]
use crate::entity::datetime::Meridiem;
#[cfg(test)]
use crate::entity::payment_method::PaymentMethodCatalog;
#[cfg(test)]
use crate::entity::venue::{Sport, Venue};
#[cfg(test)]
use chrono::{DateTime, Local, TimeZone};

fn months_between(from: &CalendarMonth, to: &CalendarMonth) -> i32 {
    (to.get_year() * 12 + to.get_month() as i32) - (from.get_year() * 12 + from.get_month() as i32)
}

// 日時選択画面を操作したのと同じ手順で確認画面まで進める
pub fn quote_booking(
    repository: &dyn VenueRepositoryTrait,
    venue_id: &str,
    date: &NaiveDate,
    start: &TimePick,
    end: &TimePick,
) -> Result<ReviewStage, BookingError> {
    let venue = repository
        .get_by_id(venue_id)
        .ok_or_else(|| BookingError::UnknownVenue(venue_id.to_string()))?;

    let today = repository.get_today();
    if *date < today {
        return Err(BookingError::UnselectableDate(*date));
    }

    let mut flow = BookingFlow::start(venue, &today);
    let target_month = CalendarMonth::containing(date);

    flow.update_schedule(|stage| {
        let mut stage = stage.clone();
        for _ in 0..months_between(&stage.get_month(), &target_month) {
            stage = stage.show_next_month();
        }
        Ok(stage.tap_day(date.day()))
    })?;
    flow.update_schedule(|stage| stage.with_start(start))?;
    flow.update_schedule(|stage| stage.with_end(end))?;
    flow.continue_to_review()?;

    match flow.current() {
        FlowStage::Review(stage) => Ok(stage.clone()),
        other => Err(BookingError::WrongStage {
            action: "quote",
            stage: other.name(),
        }),
    }
}

#[cfg(test)]
struct FixedVenueRepository {
    now: DateTime<Local>,
    venues: Vec<Venue>,
    payment_methods: PaymentMethodCatalog,
    chats: Vec<Chat>,
}

#[cfg(test)]
impl FixedVenueRepository {
    fn new() -> Self {
        Self {
            now: Local.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
            venues: vec![Venue::new("5", "Rekket Space BSD", "BSD", Sport::Badminton)],
            payment_methods: PaymentMethodCatalog::default(),
            chats: vec![],
        }
    }
}

#[cfg(test)]
impl VenueRepositoryTrait for FixedVenueRepository {
    fn load(&mut self) -> Result<(), BookingError> {
        Ok(())
    }

    fn sync_clock(&mut self, now: DateTime<Local>) {
        self.now = now;
    }

    fn get_last_synced_time(&self) -> DateTime<Local> {
        self.now
    }

    fn get_today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn get_all_venues(&self) -> &Vec<Venue> {
        &self.venues
    }

    fn get_by_id(&self, id: &str) -> Option<&Venue> {
        self.venues.iter().find(|venue| venue.get_id() == id)
    }

    fn get_payment_methods(&self) -> &PaymentMethodCatalog {
        &self.payment_methods
    }

    fn get_guest_account(&self) -> Option<&GuestAccount> {
        None
    }

    fn get_chats(&self) -> &Vec<Chat> {
        &self.chats
    }
}

#[test]
fn test_quote_booking_翌々月の予約も見積もれること() {
    let repository = FixedVenueRepository::new();
    let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
    let start = TimePick::new(9, 0, Meridiem::Am).unwrap();
    let end = TimePick::new(11, 0, Meridiem::Am).unwrap();

    let actual = quote_booking(&repository, "5", &date, &start, &end).unwrap();

    assert_eq!(actual.get_handoff().selected_date, date);
    assert_eq!(actual.duration_hours(), 2);
    assert_eq!(actual.total_price(), 118_000);
}

#[test]
fn test_quote_booking_過去の日付は異常系() {
    let repository = FixedVenueRepository::new();
    let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    let start = TimePick::new(9, 0, Meridiem::Am).unwrap();
    let end = TimePick::new(11, 0, Meridiem::Am).unwrap();

    let actual = quote_booking(&repository, "5", &date, &start, &end);
    assert_eq!(actual, Err(BookingError::UnselectableDate(date)));
}

#[test]
fn test_quote_booking_存在しない会場は異常系() {
    let repository = FixedVenueRepository::new();
    let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    let start = TimePick::new(9, 0, Meridiem::Am).unwrap();
    let end = TimePick::new(11, 0, Meridiem::Am).unwrap();

    let actual = quote_booking(&repository, "404", &date, &start, &end);
    assert_eq!(actual, Err(BookingError::UnknownVenue("404".to_string())));
}
