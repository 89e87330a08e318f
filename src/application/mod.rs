pub mod booking_flow;
pub mod interface;
pub mod quote_booking;
pub mod show_venues;
