use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    event::Event,
    id::{EventId, UserId},
};
use kernel::repository::event::EventRepository;
use shared::error::{AppError, AppResult};

use crate::table::{
    event_pk,
    model::event::{EventRow, MembershipRow, MembershipStatus},
    registration_sk, user_pk, waitlist_sk, KvTable, TableRecord, INDEX_SK_REGISTERED,
    INDEX_SK_WAITLISTED, SK_METADATA, SK_REGISTRATION_PREFIX, SK_WAITLIST_PREFIX,
};

#[derive(new)]
pub struct EventRepositoryImpl {
    table: Arc<dyn KvTable>,
}

impl EventRepositoryImpl {
    fn member_ids(records: &[TableRecord]) -> AppResult<Vec<UserId>> {
        records
            .iter()
            .map(|record| {
                let row: MembershipRow = record.payload_as()?;
                Ok(UserId::from(row.user_id))
            })
            .collect()
    }

    async fn events_for_index(&self, user_id: &UserId, index_sk: &str) -> AppResult<Vec<Event>> {
        let records = self.table.query_index(&user_pk(user_id), index_sk).await?;

        let mut events = Vec::with_capacity(records.len());
        for record in records {
            let row: MembershipRow = record.payload_as()?;
            if let Some(event) = self.find_by_id(&EventId::from(row.event_id)).await? {
                events.push(event);
            }
        }
        Ok(events)
    }
}

#[async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn create(&self, event: Event) -> AppResult<Event> {
        let row = EventRow::from(&event);
        let record = TableRecord::new(
            event_pk(&event.event_id),
            SK_METADATA,
            serde_json::to_value(&row)?,
        );
        self.table.put(record).await?;

        for user_id in &event.registered_users {
            self.add_registration(&event.event_id, user_id).await?;
        }
        for (position, user_id) in event.waitlist.iter().enumerate() {
            self.add_to_waitlist(&event.event_id, user_id, position)
                .await?;
        }

        Ok(event)
    }

    async fn find_by_id(&self, event_id: &EventId) -> AppResult<Option<Event>> {
        let Some(record) = self.table.get(&event_pk(event_id), SK_METADATA).await? else {
            return Ok(None);
        };
        let row: EventRow = record.payload_as()?;
        let mut event = Event::new(row.event_id, row.name, row.capacity, row.waitlist_enabled)?;

        let registered = self
            .table
            .query_prefix(&event_pk(event_id), SK_REGISTRATION_PREFIX)
            .await?;
        event.registered_users = Self::member_ids(&registered)?;

        // Waitlist sks embed the zero-padded position, so prefix-query order
        // is FIFO order.
        let waitlisted = self
            .table
            .query_prefix(&event_pk(event_id), SK_WAITLIST_PREFIX)
            .await?;
        event.waitlist = Self::member_ids(&waitlisted)?;

        Ok(Some(event))
    }

    async fn update_counts(&self, event: &Event) -> AppResult<()> {
        let Some(mut record) = self
            .table
            .get(&event_pk(&event.event_id), SK_METADATA)
            .await?
        else {
            return Err(AppError::EntityNotFound(format!(
                "Event {} not found",
                event.event_id
            )));
        };

        let mut row: EventRow = record.payload_as()?;
        row.registered_count = event.registered_users.len();
        row.waitlist_count = event.waitlist.len();
        record.payload = serde_json::to_value(&row)?;

        self.table.put(record).await
    }

    async fn add_registration(&self, event_id: &EventId, user_id: &UserId) -> AppResult<()> {
        let row = MembershipRow {
            event_id: event_id.as_str().to_string(),
            user_id: user_id.as_str().to_string(),
            status: MembershipStatus::Registered,
            position: None,
        };
        let record = TableRecord::new(
            event_pk(event_id),
            registration_sk(user_id),
            serde_json::to_value(&row)?,
        )
        .with_index(user_pk(user_id), INDEX_SK_REGISTERED);

        self.table.put(record).await
    }

    async fn remove_registration(&self, event_id: &EventId, user_id: &UserId) -> AppResult<()> {
        self.table
            .delete(&event_pk(event_id), &registration_sk(user_id))
            .await
    }

    async fn add_to_waitlist(
        &self,
        event_id: &EventId,
        user_id: &UserId,
        position: usize,
    ) -> AppResult<()> {
        let row = MembershipRow {
            event_id: event_id.as_str().to_string(),
            user_id: user_id.as_str().to_string(),
            status: MembershipStatus::Waitlisted,
            position: Some(position),
        };
        let record = TableRecord::new(
            event_pk(event_id),
            waitlist_sk(position, user_id),
            serde_json::to_value(&row)?,
        )
        .with_index(user_pk(user_id), INDEX_SK_WAITLISTED);

        self.table.put(record).await
    }

    async fn remove_from_waitlist(&self, event_id: &EventId, user_id: &UserId) -> AppResult<()> {
        // The caller does not know the stored position, so scan the
        // partition's waitlist records and match on the user id.
        let records = self
            .table
            .query_prefix(&event_pk(event_id), SK_WAITLIST_PREFIX)
            .await?;

        for record in records {
            let row: MembershipRow = record.payload_as()?;
            if row.user_id == user_id.as_str() {
                self.table.delete(&record.pk, &record.sk).await?;
                break;
            }
        }
        Ok(())
    }

    async fn find_by_registered_user(&self, user_id: &UserId) -> AppResult<Vec<Event>> {
        self.events_for_index(user_id, INDEX_SK_REGISTERED).await
    }

    async fn find_by_waitlisted_user(&self, user_id: &UserId) -> AppResult<Vec<Event>> {
        self.events_for_index(user_id, INDEX_SK_WAITLISTED).await
    }
}
