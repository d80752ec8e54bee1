//! Mock ports for testing
//!
//! In-memory implementations of the four storage ports and a notification
//! dispatcher that records what it was asked to send. Both can be switched
//! into a failing mode.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use appointly::{
    db::{AppointmentStore, BusinessStore, ServiceStore, Stores, UserStore},
    models::{
        Appointment, AppointmentStatus, Business, NotificationAction, NotificationRequest,
        Service, UserProfile,
    },
    services::NotificationDispatcher,
    utils::{AppError, AppResult},
};

/// Document collections held in insertion order
#[derive(Default)]
pub struct InMemoryStore {
    businesses: Mutex<Vec<Business>>,
    services: Mutex<Vec<Service>>,
    appointments: Mutex<Vec<Appointment>>,
    users: Mutex<Vec<UserProfile>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All four ports backed by this store
    pub fn stores(self: &Arc<Self>) -> Stores {
        Stores {
            businesses: self.clone(),
            services: self.clone(),
            appointments: self.clone(),
            users: self.clone(),
        }
    }

    /// Number of successful writes across every collection
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail with a storage error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.appointments.lock().unwrap().clone()
    }

    /// Seed helpers bypass the write counter
    pub fn seed_business(&self, business: Business) {
        self.businesses.lock().unwrap().push(business);
    }

    pub fn seed_service(&self, service: Service) {
        self.services.lock().unwrap().push(service);
    }

    pub fn seed_user(&self, profile: UserProfile) {
        self.users.lock().unwrap().push(profile);
    }

    pub fn replace_business(&self, business: Business) {
        let mut businesses = self.businesses.lock().unwrap();
        if let Some(existing) = businesses.iter_mut().find(|b| b.id == business.id) {
            *existing = business;
        }
    }

    pub fn replace_service(&self, service: Service) {
        let mut services = self.services.lock().unwrap();
        if let Some(existing) = services.iter_mut().find(|s| s.id == service.id) {
            *existing = service;
        }
    }

    fn begin_write(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::storage("simulated backend failure"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn replace_by<T: Clone>(items: &mut [T], item: &T, same: impl Fn(&T) -> bool) -> bool {
    match items.iter_mut().find(|existing| same(existing)) {
        Some(existing) => {
            *existing = item.clone();
            true
        }
        None => false,
    }
}

fn remove_by<T>(items: &mut Vec<T>, same: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !same(item));
    items.len() != before
}

#[async_trait]
impl BusinessStore for InMemoryStore {
    async fn list(&self) -> AppResult<Vec<Business>> {
        let mut all = self.businesses.lock().unwrap().clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Business>> {
        Ok(self
            .businesses
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<Business>> {
        Ok(self
            .businesses
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, business: &Business) -> AppResult<()> {
        self.begin_write()?;
        self.businesses.lock().unwrap().push(business.clone());
        Ok(())
    }

    async fn update(&self, business: &Business) -> AppResult<bool> {
        self.begin_write()?;
        let mut businesses = self.businesses.lock().unwrap();
        Ok(replace_by(&mut businesses, business, |b| b.id == business.id))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.begin_write()?;
        Ok(remove_by(&mut self.businesses.lock().unwrap(), |b| b.id == id))
    }
}

#[async_trait]
impl ServiceStore for InMemoryStore {
    async fn list_by_business(&self, business_id: Uuid) -> AppResult<Vec<Service>> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.business_id == business_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Service>> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn insert(&self, service: &Service) -> AppResult<()> {
        self.begin_write()?;
        self.services.lock().unwrap().push(service.clone());
        Ok(())
    }

    async fn update(&self, service: &Service) -> AppResult<bool> {
        self.begin_write()?;
        let mut services = self.services.lock().unwrap();
        Ok(replace_by(&mut services, service, |s| s.id == service.id))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.begin_write()?;
        Ok(remove_by(&mut self.services.lock().unwrap(), |s| s.id == id))
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn get(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        Ok(self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list_by_business_and_status(
        &self,
        business_id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<Vec<Appointment>> {
        let mut matching: Vec<Appointment> = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.business_id == business_id && a.status == status)
            .cloned()
            .collect();
        matching.sort_by_key(|a| (a.date, a.time));
        Ok(matching)
    }

    async fn insert(&self, appointment: &Appointment) -> AppResult<()> {
        self.begin_write()?;
        self.appointments.lock().unwrap().push(appointment.clone());
        Ok(())
    }

    async fn update(&self, appointment: &Appointment) -> AppResult<bool> {
        self.begin_write()?;
        let mut appointments = self.appointments.lock().unwrap();
        Ok(replace_by(&mut appointments, appointment, |a| {
            a.id == appointment.id
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.begin_write()?;
        Ok(remove_by(&mut self.appointments.lock().unwrap(), |a| {
            a.id == id
        }))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get(&self, id: &str) -> AppResult<Option<UserProfile>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn upsert(&self, profile: &UserProfile) -> AppResult<()> {
        self.begin_write()?;
        let mut users = self.users.lock().unwrap();
        if !replace_by(&mut users, profile, |u| u.id == profile.id) {
            users.push(profile.clone());
        }
        Ok(())
    }
}

/// Dispatcher that keeps every request it receives
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<NotificationRequest>>,
    fail: AtomicBool,
}

impl RecordingDispatcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail every dispatch as if the endpoint answered `success: false`
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<NotificationAction> {
        self.sent().iter().map(|r| r.action).collect()
    }

    pub fn last(&self) -> Option<NotificationRequest> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, request: &NotificationRequest) -> AppResult<()> {
        // Attempts are recorded even when they fail
        self.sent.lock().unwrap().push(request.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Notification(
                "Notification endpoint reported failure".to_string(),
            ));
        }
        Ok(())
    }
}
