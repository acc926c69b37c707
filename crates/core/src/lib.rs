//! # BookSlot Core
//!
//! Domain types and the scheduling engine: interval arithmetic, slot
//! generation, availability checks, entity resolution and the booking
//! coordinator. Persistence and caching are reached through the
//! [`store::BookingStore`] and [`cache::Cache`] traits.

pub mod availability;
pub mod cache;
pub mod coordinator;
pub mod errors;
pub mod interval;
pub mod models;
pub mod resolver;
pub mod slots;
pub mod store;
