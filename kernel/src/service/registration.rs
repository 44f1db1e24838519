use std::collections::HashMap;
use std::sync::Arc;

use derive_new::new;
use serde::Serialize;
use shared::error::{AppError, AppResult};
use tokio::sync::Mutex;

use crate::model::{
    event::Event,
    id::{EventId, UserId},
    user::User,
};
use crate::repository::{event::EventRepository, user::UserRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Waitlisted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
pub struct RegistrationResult {
    pub status: RegistrationStatus,
    pub message: String,
}

/// Orchestrates registration and unregistration against the gateway,
/// enforcing capacity and FIFO waitlist semantics.
///
/// Each mutation is a read-modify-write sequence of several gateway calls
/// with no multi-record transaction underneath, so mutations on the same
/// event are serialized through a per-event lock held for the whole
/// operation.
pub struct RegistrationService {
    user_repository: Arc<dyn UserRepository>,
    event_repository: Arc<dyn EventRepository>,
    event_locks: Mutex<HashMap<EventId, Arc<Mutex<()>>>>,
}

impl RegistrationService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        event_repository: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            user_repository,
            event_repository,
            event_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, event_id: &EventId) -> Arc<Mutex<()>> {
        let mut locks = self.event_locks.lock().await;
        locks
            .entry(event_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub async fn create_user(&self, user_id: &str, name: &str) -> AppResult<User> {
        let candidate_id = UserId::from(user_id);
        if self.user_repository.exists(&candidate_id).await? {
            return Err(AppError::DuplicateUser(format!(
                "User with ID {user_id} already exists"
            )));
        }

        let user = User::new(user_id, name)?;
        let user = self.user_repository.create(user).await?;
        tracing::info!(user_id = %user.user_id, "user created");
        Ok(user)
    }

    pub async fn create_event(
        &self,
        event_id: &str,
        name: &str,
        capacity: i32,
        waitlist_enabled: bool,
    ) -> AppResult<Event> {
        let event = Event::new(event_id, name, capacity, waitlist_enabled)?;
        let event = self.event_repository.create(event).await?;
        tracing::info!(event_id = %event.event_id, capacity, waitlist_enabled, "event created");
        Ok(event)
    }

    pub async fn register_user(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> AppResult<RegistrationResult> {
        let lock = self.lock_for(event_id).await;
        let _guard = lock.lock().await;

        if !self.user_repository.exists(user_id).await? {
            return Err(AppError::EntityNotFound(format!("User {user_id} not found")));
        }

        let mut event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound(format!("Event {event_id} not found")))?;

        if event.registered_users.contains(user_id) {
            return Err(AppError::AlreadyRegistered(format!(
                "User {user_id} is already registered for event {event_id}"
            )));
        }
        if event.waitlist.contains(user_id) {
            return Err(AppError::AlreadyRegistered(format!(
                "User {user_id} is already on the waitlist for event {event_id}"
            )));
        }

        if event.has_available_capacity() {
            event.registered_users.push(user_id.clone());
            self.event_repository
                .add_registration(event_id, user_id)
                .await?;
            self.event_repository.update_counts(&event).await?;

            tracing::info!(%user_id, %event_id, "user registered");
            Ok(RegistrationResult::new(
                RegistrationStatus::Registered,
                format!("User {user_id} successfully registered for event {event_id}"),
            ))
        } else if event.waitlist_enabled {
            event.waitlist.push(user_id.clone());
            let position = event.waitlist.len() - 1;
            self.event_repository
                .add_to_waitlist(event_id, user_id, position)
                .await?;
            self.event_repository.update_counts(&event).await?;

            tracing::info!(%user_id, %event_id, position, "user waitlisted");
            Ok(RegistrationResult::new(
                RegistrationStatus::Waitlisted,
                format!("Event is full. User {user_id} added to waitlist for event {event_id}"),
            ))
        } else {
            Err(AppError::EventFull(format!(
                "Event {event_id} is full and does not have a waitlist"
            )))
        }
    }

    pub async fn unregister_user(&self, user_id: &UserId, event_id: &EventId) -> AppResult<()> {
        let lock = self.lock_for(event_id).await;
        let _guard = lock.lock().await;

        let mut event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound(format!("Event {event_id} not found")))?;

        if let Some(index) = event.registered_users.iter().position(|u| u == user_id) {
            event.registered_users.remove(index);
            self.event_repository
                .remove_registration(event_id, user_id)
                .await?;

            // Capacity freed up: promote the earliest-joined waitlisted user.
            if !event.waitlist.is_empty() {
                let promoted = event.waitlist.remove(0);
                event.registered_users.push(promoted.clone());

                self.event_repository
                    .remove_from_waitlist(event_id, &promoted)
                    .await?;
                self.event_repository
                    .add_registration(event_id, &promoted)
                    .await?;
                self.reindex_waitlist(event_id, &event.waitlist).await?;

                tracing::info!(user_id = %promoted, %event_id, "user promoted from waitlist");
            }

            self.event_repository.update_counts(&event).await?;
            tracing::info!(%user_id, %event_id, "user unregistered");
            return Ok(());
        }

        if let Some(index) = event.waitlist.iter().position(|u| u == user_id) {
            event.waitlist.remove(index);
            self.event_repository
                .remove_from_waitlist(event_id, user_id)
                .await?;
            self.reindex_waitlist(event_id, &event.waitlist).await?;

            self.event_repository.update_counts(&event).await?;
            tracing::info!(%user_id, %event_id, "user removed from waitlist");
            return Ok(());
        }

        Err(AppError::NotRegistered(format!(
            "User {user_id} is not registered or waitlisted for event {event_id}"
        )))
    }

    // Stored positions are the only ordering signal, so after any removal the
    // remaining members are renumbered contiguously from zero.
    async fn reindex_waitlist(&self, event_id: &EventId, waitlist: &[UserId]) -> AppResult<()> {
        for (position, remaining) in waitlist.iter().enumerate() {
            self.event_repository
                .remove_from_waitlist(event_id, remaining)
                .await?;
            self.event_repository
                .add_to_waitlist(event_id, remaining, position)
                .await?;
        }
        Ok(())
    }

    pub async fn user_registrations(&self, user_id: &UserId) -> AppResult<Vec<Event>> {
        self.event_repository.find_by_registered_user(user_id).await
    }

    pub async fn user_waitlists(&self, user_id: &UserId) -> AppResult<Vec<Event>> {
        self.event_repository.find_by_waitlisted_user(user_id).await
    }

    pub async fn event_registrations(&self, event_id: &EventId) -> AppResult<Vec<UserId>> {
        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound(format!("Event {event_id} not found")))?;

        Ok(event.registered_users)
    }
}
