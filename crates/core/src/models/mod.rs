pub mod booking;
pub mod profile;
pub mod service;
pub mod working_hours;
