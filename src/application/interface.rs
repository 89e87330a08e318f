use crate::entity::account::GuestAccount;
use crate::entity::chat::Chat;
use crate::entity::payment_method::PaymentMethodCatalog;
use crate::entity::venue::Venue;
use crate::error::BookingError;
use chrono::{DateTime, Local, NaiveDate};

// 会場・支払い方法・ゲストアカウント・チャットの供給元
pub trait VenueRepositoryTrait {
    fn load(&mut self) -> Result<(), BookingError>;
    fn sync_clock(&mut self, now: DateTime<Local>);
    fn get_last_synced_time(&self) -> DateTime<Local>;
    fn get_today(&self) -> NaiveDate;
    fn get_all_venues(&self) -> &Vec<Venue>;
    fn get_by_id(&self, id: &str) -> Option<&Venue>;
    fn get_payment_methods(&self) -> &PaymentMethodCatalog;
    fn get_guest_account(&self) -> Option<&GuestAccount>;
    fn get_chats(&self) -> &Vec<Chat>;
}
