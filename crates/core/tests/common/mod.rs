#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bookslot_core::interval::Interval;
use bookslot_core::models::{
    booking::{Booking, BookingStatus, NewBooking, Reservation},
    profile::{CreateGuestCustomerRequest, Customer, Provider, UpdateCustomerRequest},
    service::Service,
    working_hours::WorkingHours,
};
use bookslot_core::store::BookingStore;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use eyre::{eyre, Result};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const BRAND: i32 = 1;
pub const PROVIDER: i64 = 10;
pub const CUSTOMER: i64 = 20;

#[derive(Default)]
struct Tables {
    bookings: Vec<Booking>,
    services: HashMap<Uuid, Service>,
    users: HashMap<i64, Provider>,
    customers: HashMap<i64, Customer>,
    working_hours: Vec<WorkingHours>,
    next_booking_id: i64,
    next_customer_id: i64,
}

/// In-process store. Every operation runs under one lock, which makes
/// `try_reserve` atomic the way the row lock makes it atomic in Postgres.
#[derive(Default)]
pub struct MemoryStore {
    pub tables: Mutex<Tables>,
    pub user_lookups: AtomicUsize,
    pub customer_lookups: AtomicUsize,
    pub fail_customer_lookup: bool,
    pub fail_overlap_scan: bool,
    pub service_delay: Option<Duration>,
    pub reserve_delay: Option<Duration>,
}

impl MemoryStore {
    pub async fn add_service(&self, service: Service) {
        self.tables.lock().await.services.insert(service.id, service);
    }

    pub async fn add_provider(&self, provider: Provider) {
        self.tables.lock().await.users.insert(provider.id, provider);
    }

    pub async fn add_customer(&self, customer: Customer) {
        self.tables.lock().await.customers.insert(customer.id, customer);
    }

    pub async fn add_working_hours(&self, hours: WorkingHours) {
        self.tables.lock().await.working_hours.push(hours);
    }

    pub async fn add_booking(&self, mut booking: Booking) -> Booking {
        let mut tables = self.tables.lock().await;
        tables.next_booking_id += 1;
        booking.id = tables.next_booking_id;
        tables.bookings.push(booking.clone());
        booking
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.tables.lock().await.bookings.clone()
    }

    pub async fn rename_customer(&self, id: i64, name: &str) {
        if let Some(customer) = self.tables.lock().await.customers.get_mut(&id) {
            customer.name = name.to_string();
        }
    }
}

fn overlapping(bookings: &[Booking], provider_id: i64, candidate: &Interval, exclude: Option<i64>) -> Option<i64> {
    bookings
        .iter()
        .filter(|b| b.provider_id == provider_id && b.status.occupies_time())
        .filter(|b| Some(b.id) != exclude)
        .find(|b| b.occupied().overlaps(candidate))
        .map(|b| b.id)
}

fn materialize(id: i64, row: &NewBooking) -> Booking {
    let now = Utc::now();
    Booking {
        id,
        brand_id: row.brand_id,
        provider_id: row.provider_id,
        customer_id: row.customer_id,
        service_id: row.service_id,
        start_time: row.start_time,
        end_time: row.end_time,
        status: BookingStatus::Confirmed,
        provider_name: row.provider_name.clone(),
        customer_name: row.customer_name.clone(),
        service_name: row.service_name.clone(),
        cost: row.cost.clone(),
        buffer_time: row.buffer_time,
        comment: row.comment.clone(),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn get_booking(&self, id: i64) -> Result<Option<Booking>> {
        let tables = self.tables.lock().await;
        Ok(tables.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bookings_by_range(&self, brand_id: i32, range: Interval) -> Result<Vec<Booking>> {
        let tables = self.tables.lock().await;
        let mut found: Vec<Booking> = tables
            .bookings
            .iter()
            .filter(|b| b.brand_id == brand_id && range.start <= b.start_time && b.start_time < range.end)
            .cloned()
            .collect();
        found.sort_by_key(|b| b.start_time);
        Ok(found)
    }

    async fn list_provider_bookings(&self, provider_id: i64, range: Interval) -> Result<Vec<Booking>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bookings
            .iter()
            .filter(|b| b.provider_id == provider_id && b.status.occupies_time())
            .filter(|b| b.occupied().overlaps(&range))
            .cloned()
            .collect())
    }

    async fn find_overlapping_booking(
        &self,
        provider_id: i64,
        candidate: Interval,
        exclude: Option<i64>,
    ) -> Result<Option<i64>> {
        if self.fail_overlap_scan {
            return Err(eyre!("connection reset by peer"));
        }
        let tables = self.tables.lock().await;
        Ok(overlapping(&tables.bookings, provider_id, &candidate, exclude))
    }

    async fn try_reserve(&self, booking: &NewBooking, replacing: Option<i64>) -> Result<Reservation> {
        let mut tables = self.tables.lock().await;
        if let Some(delay) = self.reserve_delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(id) = overlapping(&tables.bookings, booking.provider_id, &booking.occupied(), replacing) {
            return Ok(Reservation::Conflict { booking_id: Some(id) });
        }

        match replacing {
            None => {
                tables.next_booking_id += 1;
                let stored = materialize(tables.next_booking_id, booking);
                tables.bookings.push(stored.clone());
                Ok(Reservation::Reserved(stored))
            }
            Some(id) => match tables.bookings.iter_mut().find(|b| b.id == id) {
                Some(existing) => {
                    let created_at = existing.created_at;
                    *existing = materialize(id, booking);
                    existing.created_at = created_at;
                    Ok(Reservation::Reserved(existing.clone()))
                }
                None => Ok(Reservation::Missing),
            },
        }
    }

    async fn get_working_hours(&self, brand_id: i32) -> Result<Vec<WorkingHours>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .working_hours
            .iter()
            .filter(|h| h.brand_id == brand_id)
            .cloned()
            .collect())
    }

    async fn upsert_working_hours(&self, hours: &WorkingHours) -> Result<WorkingHours> {
        let mut tables = self.tables.lock().await;
        tables
            .working_hours
            .retain(|h| !(h.brand_id == hours.brand_id && h.day_of_week == hours.day_of_week));
        tables.working_hours.push(hours.clone());
        Ok(hours.clone())
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>> {
        if let Some(delay) = self.service_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.tables.lock().await.services.get(&id).cloned())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<Provider>> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn get_customer_by_id(&self, id: i64) -> Result<Option<Customer>> {
        self.customer_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_customer_lookup {
            return Err(eyre!("customer table unavailable"));
        }
        Ok(self.tables.lock().await.customers.get(&id).cloned())
    }

    async fn get_or_create_guest_customer(&self, guest: &CreateGuestCustomerRequest) -> Result<(Customer, bool)> {
        let mut tables = self.tables.lock().await;
        let existing = tables.customers.values().find(|c| {
            c.is_guest
                && c.brand_id == guest.brand_id
                && c.name == guest.name
                && c.phone_number.as_deref() == Some(guest.phone_number.as_str())
        });
        if let Some(customer) = existing {
            return Ok((customer.clone(), true));
        }

        tables.next_customer_id += 1;
        let now = Utc::now();
        let customer = Customer {
            id: 1000 + tables.next_customer_id,
            name: guest.name.clone(),
            email: guest.email.clone(),
            phone_number: Some(guest.phone_number.clone()),
            brand_id: guest.brand_id,
            is_guest: true,
            created_at: now,
            updated_at: now,
        };
        tables.customers.insert(customer.id, customer.clone());
        Ok((customer, false))
    }

    async fn update_customer(&self, id: i64, changes: &UpdateCustomerRequest) -> Result<Option<Customer>> {
        let mut tables = self.tables.lock().await;
        let Some(customer) = tables.customers.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            customer.name = name.clone();
        }
        if let Some(phone) = &changes.phone_number {
            customer.phone_number = Some(phone.clone());
        }
        if let Some(email) = &changes.email {
            customer.email = Some(email.clone());
        }
        customer.updated_at = Utc::now();
        Ok(Some(customer.clone()))
    }
}

pub fn at(day: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(hour, minute, 0).unwrap())
}

pub fn clock(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// A day far enough ahead that no slot on it is in the past.
pub fn future_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 3, 3).unwrap()
}

pub fn service(duration: i32, buffer: Option<i32>) -> Service {
    Service {
        id: Uuid::new_v4(),
        title: "Haircut".to_string(),
        description: None,
        duration,
        buffer_time: buffer,
        cost: "25.00".to_string(),
        is_visible: true,
        brand_id: BRAND,
        provider_ids: vec![PROVIDER],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn provider() -> Provider {
    Provider {
        id: PROVIDER,
        name: "Maria Ivanova".to_string(),
        email: "maria@example.com".to_string(),
        brand_id: Some(BRAND),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn customer() -> Customer {
    Customer {
        id: CUSTOMER,
        name: "Georgi Petrov".to_string(),
        email: Some("georgi@example.com".to_string()),
        phone_number: Some("+359888000111".to_string()),
        brand_id: BRAND,
        is_guest: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn hours(day_of_week: i32, open: NaiveTime, close: NaiveTime) -> WorkingHours {
    WorkingHours {
        brand_id: BRAND,
        day_of_week,
        open_time: Some(open),
        close_time: Some(close),
        is_closed: false,
    }
}

pub fn booking(start: DateTime<Utc>, end: DateTime<Utc>, buffer_time: i32) -> Booking {
    Booking {
        id: 0,
        brand_id: BRAND,
        provider_id: PROVIDER,
        customer_id: CUSTOMER,
        service_id: Uuid::new_v4(),
        start_time: start,
        end_time: end,
        status: BookingStatus::Confirmed,
        provider_name: "Maria Ivanova".to_string(),
        customer_name: "Georgi Petrov".to_string(),
        service_name: "Haircut".to_string(),
        cost: "25.00".to_string(),
        buffer_time,
        comment: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Store seeded with the standard provider, customer and a service.
pub async fn seeded_store(service: &Service) -> MemoryStore {
    let store = MemoryStore::default();
    seed(&store, service).await;
    store
}

pub async fn seed(store: &MemoryStore, service: &Service) {
    store.add_provider(provider()).await;
    store.add_customer(customer()).await;
    store.add_service(service.clone()).await;
}
