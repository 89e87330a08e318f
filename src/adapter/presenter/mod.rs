pub mod booking_view;
pub mod calendar_view;
pub mod community_view;
pub mod line_editor;
