pub mod config;
pub mod directions;
pub mod venue_repository;
pub mod yaml;
