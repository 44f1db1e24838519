use shared::error::{AppError, AppResult};

use crate::model::id::{EventId, UserId};

/// Registration-domain event. Membership lists are reconstructed from the
/// store by the gateway and mutated only through the registration service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub event_id: EventId,
    pub name: String,
    pub capacity: i32,
    pub waitlist_enabled: bool,
    /// Admission order; never longer than `capacity`.
    pub registered_users: Vec<UserId>,
    /// Strict FIFO order, disjoint from `registered_users`.
    pub waitlist: Vec<UserId>,
}

impl Event {
    pub fn new(
        event_id: impl Into<String>,
        name: impl Into<String>,
        capacity: i32,
        waitlist_enabled: bool,
    ) -> AppResult<Self> {
        if capacity <= 0 {
            return Err(AppError::ValidationError(
                "capacity must be greater than zero".into(),
            ));
        }

        Ok(Self {
            event_id: EventId::new(event_id),
            name: name.into(),
            capacity,
            waitlist_enabled,
            registered_users: Vec::new(),
            waitlist: Vec::new(),
        })
    }

    pub fn is_full(&self) -> bool {
        self.registered_users.len() >= self.capacity as usize
    }

    pub fn has_available_capacity(&self) -> bool {
        self.registered_users.len() < self.capacity as usize
    }
}
