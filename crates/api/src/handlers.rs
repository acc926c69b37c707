pub mod booking;
pub mod brand;
pub mod customer;
pub mod timeslot;
