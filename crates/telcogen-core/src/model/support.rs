use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::entity::EntityKind;

/// Lookup row keyed by its natural code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStatusCode {
    pub code: String,
    pub description: String,
    pub is_terminal: bool,
}

impl Entity for TicketStatusCode {
    const KIND: EntityKind = EntityKind::TicketStatusCode;
    const COLUMNS: &'static [&'static str] = &["code", "description", "is_terminal"];
    type Key = String;

    fn key(&self) -> String {
        self.code.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    Billing,
    Network,
    Device,
    Provisioning,
}

impl TicketCategory {
    pub const ALL: [TicketCategory; 4] = [
        TicketCategory::Billing,
        TicketCategory::Network,
        TicketCategory::Device,
        TicketCategory::Provisioning,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: i64,
    pub subscriber_id: i64,
    pub status_code: String,
    pub assigned_org_unit_id: i64,
    pub category: TicketCategory,
    pub priority: i64,
    pub subject: String,
    pub opened_at: DateTime<Utc>,
}

impl Entity for Ticket {
    const KIND: EntityKind = EntityKind::Ticket;
    const COLUMNS: &'static [&'static str] = &[
        "ticket_id",
        "subscriber_id",
        "status_code",
        "assigned_org_unit_id",
        "category",
        "priority",
        "subject",
        "opened_at",
    ];
    type Key = i64;

    fn key(&self) -> i64 {
        self.ticket_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteRefType {
    Subscriber,
    Order,
    Ticket,
}

impl NoteRefType {
    pub fn target_kind(self) -> EntityKind {
        match self {
            NoteRefType::Subscriber => EntityKind::Subscriber,
            NoteRefType::Order => EntityKind::Order,
            NoteRefType::Ticket => EntityKind::Ticket,
        }
    }
}

/// What a note is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteTarget {
    Subscriber(i64),
    Order(i64),
    Ticket(i64),
}

impl NoteTarget {
    pub fn ref_type(self) -> NoteRefType {
        match self {
            NoteTarget::Subscriber(_) => NoteRefType::Subscriber,
            NoteTarget::Order(_) => NoteRefType::Order,
            NoteTarget::Ticket(_) => NoteRefType::Ticket,
        }
    }

    pub fn ref_id(self) -> i64 {
        match self {
            NoteTarget::Subscriber(id) | NoteTarget::Order(id) | NoteTarget::Ticket(id) => id,
        }
    }

    pub fn from_parts(ref_type: NoteRefType, ref_id: i64) -> Self {
        match ref_type {
            NoteRefType::Subscriber => NoteTarget::Subscriber(ref_id),
            NoteRefType::Order => NoteTarget::Order(ref_id),
            NoteRefType::Ticket => NoteTarget::Ticket(ref_id),
        }
    }
}

/// Free-text note attached to a subscriber, an order or a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "NoteRecord", from = "NoteRecord")]
pub struct Note {
    pub note_id: i64,
    pub target: NoteTarget,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Note {
    const KIND: EntityKind = EntityKind::Note;
    const COLUMNS: &'static [&'static str] =
        &["note_id", "ref_type", "ref_id", "author", "body", "created_at"];
    type Key = i64;

    fn key(&self) -> i64 {
        self.note_id
    }
}

#[derive(Serialize, Deserialize)]
struct NoteRecord {
    note_id: i64,
    ref_type: NoteRefType,
    ref_id: i64,
    author: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<Note> for NoteRecord {
    fn from(note: Note) -> Self {
        Self {
            note_id: note.note_id,
            ref_type: note.target.ref_type(),
            ref_id: note.target.ref_id(),
            author: note.author,
            body: note.body,
            created_at: note.created_at,
        }
    }
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Self {
            note_id: record.note_id,
            target: NoteTarget::from_parts(record.ref_type, record.ref_id),
            author: record.author,
            body: record.body,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn note_target_flattens_to_ref_columns() {
        let note = Note {
            note_id: 130_000_001,
            target: NoteTarget::Order(90_000_004),
            author: "tier1".to_string(),
            body: "called back".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap(),
        };
        let value = serde_json::to_value(&note).expect("serialize note");
        assert_eq!(value["ref_type"], "order");
        assert_eq!(value["ref_id"], 90_000_004);

        let decoded: Note = serde_json::from_value(value).expect("decode note");
        assert_eq!(decoded, note);
    }

    #[test]
    fn unknown_ref_type_is_rejected() {
        let json = r#"{"note_id":1,"ref_type":"device","ref_id":2,"author":"a","body":"b","created_at":"2024-12-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Note>(json).is_err());
    }
}
