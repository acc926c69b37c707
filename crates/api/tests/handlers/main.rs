mod test_utils;

mod brand_test;
mod health_test;
mod timeslot_test;
