//! Canonical entity records.
//!
//! Field order of every record is its column order in all output shapes.

mod commerce;
mod customer;
mod device;
mod reference;
mod support;
mod usage;

pub use commerce::{Order, OrderChannel, OrderItem, OrderStatus};
pub use customer::{
    Account, PostalAddress, ProvisioningEvent, ProvisioningState, Subscriber, SubscriberFeature,
    SubscriberFeatureState, SubscriberProfile, SubscriberStatus,
};
pub use device::{
    AttachFailure, Device, DeviceEvent, EventPayload, EventType, Handover, LatencyProbe,
    RadioAttach, SessionEnd, SessionStart,
};
pub use reference::{DeviceClass, Feature, OrgUnit, Plan, Rate, Region};
pub use support::{Note, NoteRefType, NoteTarget, Ticket, TicketCategory, TicketStatusCode};
pub use usage::{Usage, UsageRecord, UsageType, rate_usage};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::entity::EntityKind;

/// A canonical record type.
pub trait Entity: Serialize + DeserializeOwned + Clone {
    const KIND: EntityKind;
    /// Serialized field names in emission order.
    const COLUMNS: &'static [&'static str];

    type Key: Ord + Clone + std::fmt::Debug;

    /// Primary key value used to order canonical slices.
    fn key(&self) -> Self::Key;
}
