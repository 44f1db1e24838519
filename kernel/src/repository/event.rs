use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    event::Event,
    id::{EventId, UserId},
};

#[async_trait]
pub trait EventRepository: Send + Sync {
    // Persist event metadata plus one membership record per registered or
    // waitlisted member already present on the value.
    async fn create(&self, event: Event) -> AppResult<Event>;
    // Reconstruct the event from metadata and its membership records; the
    // waitlist comes back in stored-position order.
    async fn find_by_id(&self, event_id: &EventId) -> AppResult<Option<Event>>;
    // Rewrites only the denormalized counters on the metadata record.
    // Membership records are written through the operations below.
    async fn update_counts(&self, event: &Event) -> AppResult<()>;
    async fn add_registration(&self, event_id: &EventId, user_id: &UserId) -> AppResult<()>;
    async fn remove_registration(&self, event_id: &EventId, user_id: &UserId) -> AppResult<()>;
    // `position` is the sole ordering signal used to rebuild FIFO order.
    async fn add_to_waitlist(
        &self,
        event_id: &EventId,
        user_id: &UserId,
        position: usize,
    ) -> AppResult<()>;
    async fn remove_from_waitlist(&self, event_id: &EventId, user_id: &UserId) -> AppResult<()>;
    async fn find_by_registered_user(&self, user_id: &UserId) -> AppResult<Vec<Event>>;
    async fn find_by_waitlisted_user(&self, user_id: &UserId) -> AppResult<Vec<Event>>;
}
