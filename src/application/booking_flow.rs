use crate::entity::booking::{
    BookingDraft, PaymentHandoff, PaymentReceipt, ReviewHandoff, ScheduleHandoff,
};
use crate::entity::calendar::{generate_weeks, CalendarDay, CalendarMonth};
use crate::entity::payment_method::{PaymentMethodCatalog, PaymentMethodOption};
use crate::entity::pricing::{duration_hours, generate_time_slots, total_price, TimeSlot};
use crate::entity::time_selector::{TimeChoice, TimeField, TimePick};
use crate::entity::venue::Venue;
use crate::error::BookingError;
use chrono::{Datelike, NaiveDate};

#[cfg(test)]
use crate::entity::datetime::Meridiem;
#[cfg(test)]
use crate::entity::venue::Sport;

// 1. 日時選択
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleStage {
    venue: Venue,
    today: NaiveDate,
    month: CalendarMonth,
    draft: BookingDraft,
}

impl ScheduleStage {
    pub fn new(venue: &Venue, today: &NaiveDate) -> Self {
        Self {
            venue: venue.clone(),
            today: *today,
            month: CalendarMonth::containing(today),
            draft: BookingDraft::new(today),
        }
    }

    pub fn get_venue(&self) -> &Venue {
        &self.venue
    }

    pub fn get_today(&self) -> NaiveDate {
        self.today
    }

    pub fn get_month(&self) -> CalendarMonth {
        self.month
    }

    pub fn get_draft(&self) -> &BookingDraft {
        &self.draft
    }

    // 表示のたびに作り直す
    pub fn weeks(&self) -> Vec<Vec<CalendarDay>> {
        let selected = self.draft.get_selected_date();
        generate_weeks(&self.month, &self.today, selected.as_ref())
    }

    pub fn show_next_month(&self) -> Self {
        Self {
            month: self.month.next(),
            ..self.clone()
        }
    }

    pub fn show_previous_month(&self) -> Self {
        Self {
            month: self.month.prev(),
            ..self.clone()
        }
    }

    // 表示中の月の day 日をタップする。過去の日や月に無い日は何もしない
    pub fn tap_day(&self, day: u32) -> Self {
        let tapped = self
            .weeks()
            .iter()
            .flatten()
            .find(|cell| cell.get_date().map(|date| date.day()) == Some(day))
            .and_then(|cell| cell.tap());

        match tapped {
            Some(date) => Self {
                draft: self.draft.with_date(&date),
                ..self.clone()
            },
            None => {
                log::debug!("day {} of {} is not selectable", day, self.month.title());
                self.clone()
            }
        }
    }

    pub fn with_start(&self, pick: &TimePick) -> Result<Self, BookingError> {
        Ok(Self {
            draft: self.draft.with_start(pick)?,
            ..self.clone()
        })
    }

    pub fn with_end(&self, pick: &TimePick) -> Result<Self, BookingError> {
        Ok(Self {
            draft: self.draft.with_end(pick)?,
            ..self.clone()
        })
    }

    pub fn with_choice(&self, field: TimeField, choice: TimeChoice) -> Result<Self, BookingError> {
        Ok(Self {
            draft: self.draft.with_choice(field, choice)?,
            ..self.clone()
        })
    }

    pub fn submit(&self) -> Result<ScheduleHandoff, BookingError> {
        let selected_date = self
            .draft
            .get_selected_date()
            .ok_or(BookingError::NoDateSelected)?;

        Ok(ScheduleHandoff {
            venue_name: self.venue.get_name().to_string(),
            venue_location: self.venue.get_location().to_string(),
            selected_date,
            start_time: self.draft.get_start_time(),
            end_time: self.draft.get_end_time(),
        })
    }
}

// 2. 予約内容の確認
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewStage {
    handoff: ScheduleHandoff,
}

impl ReviewStage {
    pub fn new(handoff: ScheduleHandoff) -> Self {
        Self { handoff }
    }

    pub fn get_handoff(&self) -> &ScheduleHandoff {
        &self.handoff
    }

    pub fn duration_hours(&self) -> i64 {
        duration_hours(&self.handoff.start_time, &self.handoff.end_time)
    }

    pub fn time_slots(&self) -> Vec<TimeSlot> {
        generate_time_slots(&self.handoff.start_time, &self.handoff.end_time)
    }

    pub fn total_price(&self) -> i64 {
        total_price(&self.handoff.start_time, &self.handoff.end_time)
    }

    pub fn submit(&self) -> ReviewHandoff {
        ReviewHandoff {
            venue_name: self.handoff.venue_name.clone(),
            selected_date: self.handoff.selected_date,
            start_time: self.handoff.start_time,
            end_time: self.handoff.end_time,
            total_price: self.total_price(),
        }
    }
}

// 3. 支払い方法の選択
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentStage {
    handoff: ReviewHandoff,
    catalog: PaymentMethodCatalog,
    selected_id: Option<String>,
}

impl PaymentStage {
    pub fn new(handoff: ReviewHandoff, catalog: &PaymentMethodCatalog) -> Self {
        let selected_id = catalog
            .default_option()
            .map(|option| option.get_id().to_string());

        Self {
            handoff,
            catalog: catalog.clone(),
            selected_id,
        }
    }

    pub fn get_handoff(&self) -> &ReviewHandoff {
        &self.handoff
    }

    pub fn get_catalog(&self) -> &PaymentMethodCatalog {
        &self.catalog
    }

    pub fn get_selected(&self) -> Option<&PaymentMethodOption> {
        self.selected_id
            .as_deref()
            .and_then(|id| self.catalog.get_by_id(id))
    }

    // 利用不可の方法を選んでも選択状態は変わらない
    pub fn select(&self, id: &str) -> Result<Self, BookingError> {
        let option = self.catalog.find_selectable(id)?;

        Ok(Self {
            selected_id: Some(option.get_id().to_string()),
            ..self.clone()
        })
    }

    pub fn total_payment(&self) -> i64 {
        let fee = self.get_selected().map_or(0, |option| option.get_fee());
        self.handoff.total_price + fee
    }

    pub fn submit(&self) -> Result<PaymentHandoff, BookingError> {
        let id = self.selected_id.as_deref().unwrap_or("");
        let option = self.catalog.find_selectable(id)?;

        Ok(PaymentHandoff {
            payment_method: option.get_id().to_string(),
            total_price: self.handoff.total_price,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowStage {
    Schedule(ScheduleStage),
    Review(ReviewStage),
    Payment(PaymentStage),
    // 4. 支払い完了
    Confirmed(PaymentReceipt),
}

impl FlowStage {
    pub fn name(&self) -> &'static str {
        match self {
            FlowStage::Schedule(_) => "Select Schedule",
            FlowStage::Review(_) => "Review Order",
            FlowStage::Payment(_) => "Payment",
            FlowStage::Confirmed(_) => "Payment Confirmation",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BackOutcome {
    Returned,
    Abandoned,
}

// 前の段階は戻った時のためにそのまま積んでおく
#[derive(Clone, Debug)]
pub struct BookingFlow {
    venue_id: String,
    // 予約IDの発行日
    started_on: NaiveDate,
    current: FlowStage,
    history: Vec<FlowStage>,
}

impl BookingFlow {
    pub fn start(venue: &Venue, today: &NaiveDate) -> Self {
        log::info!("start booking {} ({})", venue.get_name(), venue.get_id());

        Self {
            venue_id: venue.get_id().to_string(),
            started_on: *today,
            current: FlowStage::Schedule(ScheduleStage::new(venue, today)),
            history: vec![],
        }
    }

    pub fn current(&self) -> &FlowStage {
        &self.current
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.current, FlowStage::Confirmed(_))
    }

    fn advance(&mut self, next: FlowStage) {
        log::info!("{} -> {}", self.current.name(), next.name());
        let prev = std::mem::replace(&mut self.current, next);
        self.history.push(prev);
    }

    fn wrong_stage(&self, action: &'static str) -> BookingError {
        BookingError::WrongStage {
            action,
            stage: self.current.name(),
        }
    }

    pub fn update_schedule<F>(&mut self, f: F) -> Result<(), BookingError>
    where
        F: FnOnce(&ScheduleStage) -> Result<ScheduleStage, BookingError>,
    {
        match &self.current {
            FlowStage::Schedule(stage) => {
                let next = f(stage)?;
                self.current = FlowStage::Schedule(next);
                Ok(())
            }
            _ => Err(self.wrong_stage("change the schedule")),
        }
    }

    pub fn update_payment<F>(&mut self, f: F) -> Result<(), BookingError>
    where
        F: FnOnce(&PaymentStage) -> Result<PaymentStage, BookingError>,
    {
        match &self.current {
            FlowStage::Payment(stage) => {
                let next = f(stage)?;
                self.current = FlowStage::Payment(next);
                Ok(())
            }
            _ => Err(self.wrong_stage("change the payment method")),
        }
    }

    pub fn continue_to_review(&mut self) -> Result<(), BookingError> {
        let handoff = match &self.current {
            FlowStage::Schedule(stage) => stage.submit()?,
            _ => return Err(self.wrong_stage("review the order")),
        };

        self.advance(FlowStage::Review(ReviewStage::new(handoff)));
        Ok(())
    }

    pub fn continue_to_payment(
        &mut self,
        catalog: &PaymentMethodCatalog,
    ) -> Result<(), BookingError> {
        let handoff = match &self.current {
            FlowStage::Review(stage) => stage.submit(),
            _ => return Err(self.wrong_stage("choose a payment method")),
        };

        self.advance(FlowStage::Payment(PaymentStage::new(handoff, catalog)));
        Ok(())
    }

    pub fn pay(&mut self) -> Result<&PaymentReceipt, BookingError> {
        let receipt = match &self.current {
            FlowStage::Payment(stage) => {
                let handoff = stage.submit()?;
                let method = stage.get_catalog().find_selectable(&handoff.payment_method)?;
                PaymentReceipt::issue(
                    stage.get_handoff(),
                    &handoff,
                    method,
                    &self.venue_id,
                    &self.started_on,
                )
            }
            _ => return Err(self.wrong_stage("pay")),
        };

        log::info!(
            "order {} paid with {}",
            receipt.get_order_id(),
            receipt.get_payment_method().get_id()
        );
        self.advance(FlowStage::Confirmed(receipt));

        match &self.current {
            FlowStage::Confirmed(receipt) => Ok(receipt),
            _ => Err(self.wrong_stage("pay")),
        }
    }

    // 先の段階の状態は捨てる。最初の段階から戻ると予約は破棄される
    pub fn go_back(&mut self) -> Result<BackOutcome, BookingError> {
        if self.is_finished() {
            return Err(self.wrong_stage("go back"));
        }

        match self.history.pop() {
            Some(prev) => {
                log::info!("{} <- {}", prev.name(), self.current.name());
                self.current = prev;
                Ok(BackOutcome::Returned)
            }
            None => {
                log::info!("booking abandoned");
                Ok(BackOutcome::Abandoned)
            }
        }
    }
}

#[cfg(test)]
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[cfg(test)]
fn sample_venue() -> Venue {
    Venue::new("5", "Rekket Space BSD", "KOTA TANGERANG SELATAN", Sport::Badminton)
}

#[cfg(test)]
fn sample_catalog() -> PaymentMethodCatalog {
    PaymentMethodCatalog::new(vec![
        PaymentMethodOption::new("virtual_account", "Virtual Account", 0).expandable(),
        PaymentMethodOption::new("gopay", "GoPay", 4068),
        PaymentMethodOption::new("ovo", "OVO", 3478).disabled("under maintenance"),
    ])
}

#[cfg(test)]
fn scheduled_flow() -> BookingFlow {
    // 9:00 - 11:00 を予約する
    let mut flow = BookingFlow::start(&sample_venue(), &ymd(2025, 3, 10));
    flow.update_schedule(|stage| Ok(stage.tap_day(12))).unwrap();
    flow.update_schedule(|stage| stage.with_end(&TimePick::new(11, 0, Meridiem::Am).unwrap()))
        .unwrap();
    flow
}

#[test]
fn test_tap_day_過去の日付は何もしないこと() {
    // 今日が3/10の時に3/3をタップしても選択されない
    let stage = ScheduleStage::new(&sample_venue(), &ymd(2025, 3, 10));
    let actual = stage.tap_day(3);

    assert_eq!(actual, stage);
    assert_eq!(actual.get_draft().get_selected_date(), None);
}

#[test]
fn test_tap_day_月に無い日は何もしないこと() {
    let stage = ScheduleStage::new(&sample_venue(), &ymd(2025, 4, 10));
    assert_eq!(stage.tap_day(31), stage);
}

#[test]
fn test_tap_day_選択済みの日付は過去の日付のタップで変わらないこと() {
    let stage = ScheduleStage::new(&sample_venue(), &ymd(2025, 3, 10)).tap_day(12);
    let actual = stage.tap_day(3);

    assert_eq!(actual.get_draft().get_selected_date(), Some(ymd(2025, 3, 12)));
}

#[test]
fn test_show_next_month_翌月の日付を選べること() {
    let stage = ScheduleStage::new(&sample_venue(), &ymd(2024, 12, 30))
        .show_next_month()
        .tap_day(2);

    assert_eq!(stage.get_month(), CalendarMonth::new(2025, 1).unwrap());
    assert_eq!(stage.get_draft().get_selected_date(), Some(ymd(2025, 1, 2)));
}

#[test]
fn test_continue_to_review_日付未選択の場合は進めないこと() {
    let mut flow = BookingFlow::start(&sample_venue(), &ymd(2025, 3, 10));
    let actual = flow.continue_to_review();

    assert_eq!(actual, Err(BookingError::NoDateSelected));
    assert_eq!(flow.current().name(), "Select Schedule");
}

#[test]
fn test_continue_to_review_9時から11時は118000ルピア() {
    let mut flow = scheduled_flow();
    flow.continue_to_review().unwrap();

    match flow.current() {
        FlowStage::Review(stage) => {
            assert_eq!(stage.get_handoff().venue_location, "KOTA TANGERANG SELATAN");
            assert_eq!(stage.duration_hours(), 2);
            assert_eq!(stage.time_slots().len(), 2);
            assert_eq!(stage.total_price(), 118_000);
        }
        other => panic!("unexpected stage: {}", other.name()),
    }
}

#[test]
fn test_continue_to_payment_デフォルトの支払い方法が選ばれていること() {
    let mut flow = scheduled_flow();
    flow.continue_to_review().unwrap();
    flow.continue_to_payment(&sample_catalog()).unwrap();

    match flow.current() {
        FlowStage::Payment(stage) => {
            assert_eq!(stage.get_handoff().total_price, 118_000);
            assert_eq!(
                stage.get_selected().map(|option| option.get_id()),
                Some("virtual_account")
            );
        }
        other => panic!("unexpected stage: {}", other.name()),
    }
}

#[test]
fn test_update_payment_利用不可の方法を選ぶと選択が変わらないこと() {
    let mut flow = scheduled_flow();
    flow.continue_to_review().unwrap();
    flow.continue_to_payment(&sample_catalog()).unwrap();
    flow.update_payment(|stage| stage.select("gopay")).unwrap();

    let actual = flow.update_payment(|stage| stage.select("ovo"));
    assert!(matches!(
        actual,
        Err(BookingError::PaymentMethodDisabled { .. })
    ));

    match flow.current() {
        FlowStage::Payment(stage) => {
            assert_eq!(stage.get_selected().map(|o| o.get_id()), Some("gopay"));
            assert_eq!(stage.total_payment(), 118_000 + 4068);
        }
        other => panic!("unexpected stage: {}", other.name()),
    }
}

#[test]
fn test_pay_領収書に枠と手数料が載ること() {
    let mut flow = scheduled_flow();
    flow.continue_to_review().unwrap();
    flow.continue_to_payment(&sample_catalog()).unwrap();
    flow.update_payment(|stage| stage.select("gopay")).unwrap();

    let receipt = flow.pay().unwrap().clone();
    assert_eq!(receipt.get_venue_name(), "Rekket Space BSD");
    assert_eq!(receipt.get_booked_slots().len(), 2);
    assert_eq!(receipt.get_subtotal(), 118_000);
    assert_eq!(receipt.get_total_payment(), 122_068);
    assert!(flow.is_finished());
}

#[test]
fn test_go_back_支払いから戻ると確認画面がそのまま戻ること() {
    let mut flow = scheduled_flow();
    flow.continue_to_review().unwrap();
    let review = flow.current().clone();

    flow.continue_to_payment(&sample_catalog()).unwrap();
    flow.update_payment(|stage| stage.select("gopay")).unwrap();

    assert_eq!(flow.go_back(), Ok(BackOutcome::Returned));
    assert_eq!(flow.current(), &review);

    // もう一度進むと支払い方法の選択は初期値に戻っている
    flow.continue_to_payment(&sample_catalog()).unwrap();
    match flow.current() {
        FlowStage::Payment(stage) => {
            assert_eq!(
                stage.get_selected().map(|o| o.get_id()),
                Some("virtual_account")
            );
        }
        other => panic!("unexpected stage: {}", other.name()),
    }
}

#[test]
fn test_go_back_最初の段階から戻ると破棄されること() {
    let mut flow = scheduled_flow();
    assert_eq!(flow.go_back(), Ok(BackOutcome::Abandoned));
}

#[test]
fn test_go_back_支払い完了後は戻れないこと() {
    let mut flow = scheduled_flow();
    flow.continue_to_review().unwrap();
    flow.continue_to_payment(&sample_catalog()).unwrap();
    flow.pay().unwrap();

    assert_eq!(
        flow.go_back(),
        Err(BookingError::WrongStage {
            action: "go back",
            stage: "Payment Confirmation",
        })
    );
}

#[test]
fn test_update_schedule_確認画面では日時を変えられないこと() {
    let mut flow = scheduled_flow();
    flow.continue_to_review().unwrap();

    let actual = flow.update_schedule(|stage| Ok(stage.tap_day(20)));
    assert!(matches!(actual, Err(BookingError::WrongStage { .. })));
}

#[test]
fn test_go_back_確認画面から戻ると選んだ日時がそのまま残っていること() {
    let mut flow = scheduled_flow();
    flow.update_schedule(|stage| stage.with_start(&TimePick::new(2, 30, Meridiem::Pm).unwrap()))
        .unwrap();
    flow.update_schedule(|stage| stage.with_end(&TimePick::new(5, 0, Meridiem::Pm).unwrap()))
        .unwrap();
    let schedule = flow.current().clone();

    flow.continue_to_review().unwrap();
    assert_eq!(flow.go_back(), Ok(BackOutcome::Returned));
    assert_eq!(flow.current(), &schedule);

    match flow.current() {
        FlowStage::Schedule(stage) => {
            let draft = stage.get_draft();
            assert_eq!(draft.get_selected_date(), Some(ymd(2025, 3, 12)));
            assert_eq!(
                draft.get_start_time(),
                ymd(2025, 3, 12).and_hms_opt(14, 30, 0).unwrap()
            );
            assert_eq!(
                draft.get_end_time(),
                ymd(2025, 3, 12).and_hms_opt(17, 0, 0).unwrap()
            );
        }
        other => panic!("unexpected stage: {}", other.name()),
    }

    // 戻った後も同じ内容で確認画面に進める
    flow.continue_to_review().unwrap();
    match flow.current() {
        FlowStage::Review(stage) => assert_eq!(stage.total_price(), 59_000 * 3),
        other => panic!("unexpected stage: {}", other.name()),
    }
}

#[test]
fn test_pay_予約idに会場と開始日が入ること() {
    let mut flow = scheduled_flow();
    flow.continue_to_review().unwrap();
    flow.continue_to_payment(&sample_catalog()).unwrap();

    let receipt = flow.pay().unwrap();
    assert!(receipt.get_order_id().starts_with("AYOIN250310"));
    assert!(receipt.get_booked_slots()[0]
        .get_booking_id()
        .starts_with("BK/0005/250310/"));
}
