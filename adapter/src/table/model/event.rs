use kernel::model::event::Event;
use serde::{Deserialize, Serialize};

/// Event metadata row. The counters are a derived cache of the membership
/// records, refreshed by `update_counts`; membership itself is never
/// embedded here.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventRow {
    pub event_id: String,
    pub name: String,
    pub capacity: i32,
    pub waitlist_enabled: bool,
    pub registered_count: usize,
    pub waitlist_count: usize,
}

impl From<&Event> for EventRow {
    fn from(value: &Event) -> Self {
        Self {
            event_id: value.event_id.as_str().to_string(),
            name: value.name.clone(),
            capacity: value.capacity,
            waitlist_enabled: value.waitlist_enabled,
            registered_count: value.registered_users.len(),
            waitlist_count: value.waitlist.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Registered,
    Waitlisted,
}

/// One persisted membership fact: a user holds a role for an event.
/// `position` is present on waitlist rows only.
#[derive(Debug, Serialize, Deserialize)]
pub struct MembershipRow {
    pub event_id: String,
    pub user_id: String,
    pub status: MembershipStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}
