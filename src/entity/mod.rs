pub mod account;
pub mod booking;
pub mod calendar;
pub mod chat;
pub mod datetime;
pub mod payment_method;
pub mod pricing;
pub mod profile;
pub mod search;
pub mod time_selector;
pub mod venue;
