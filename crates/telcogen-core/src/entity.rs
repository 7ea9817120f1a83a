use std::fmt;
use std::ops::RangeInclusive;

use serde::{Serialize, Serializer};

/// Width of the identifier block owned by each entity kind.
pub const ID_BLOCK_SIZE: i64 = 10_000_000;

/// Every entity type in the dataset, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Region,
    Plan,
    DeviceClass,
    Rate,
    Feature,
    TicketStatusCode,
    OrgUnit,
    Account,
    Subscriber,
    SubscriberProfile,
    Device,
    Order,
    OrderItem,
    SubscriberFeature,
    SubscriberFeatureState,
    Ticket,
    Note,
    DeviceEvent,
    UsageRecord,
}

/// Foreign key from one entity kind to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub columns: &'static [&'static str],
    pub target: EntityKind,
    pub nullable: bool,
}

const fn fk(columns: &'static [&'static str], target: EntityKind) -> ForeignKey {
    ForeignKey {
        columns,
        target,
        nullable: false,
    }
}

impl EntityKind {
    pub const ALL: [EntityKind; 19] = [
        EntityKind::Region,
        EntityKind::Plan,
        EntityKind::DeviceClass,
        EntityKind::Rate,
        EntityKind::Feature,
        EntityKind::TicketStatusCode,
        EntityKind::OrgUnit,
        EntityKind::Account,
        EntityKind::Subscriber,
        EntityKind::SubscriberProfile,
        EntityKind::Device,
        EntityKind::Order,
        EntityKind::OrderItem,
        EntityKind::SubscriberFeature,
        EntityKind::SubscriberFeatureState,
        EntityKind::Ticket,
        EntityKind::Note,
        EntityKind::DeviceEvent,
        EntityKind::UsageRecord,
    ];

    /// Collection, file and table name. Part of the external contract.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Region => "regions",
            EntityKind::Plan => "plans",
            EntityKind::DeviceClass => "device_classes",
            EntityKind::Rate => "rates",
            EntityKind::Feature => "features",
            EntityKind::TicketStatusCode => "ticket_status_codes",
            EntityKind::OrgUnit => "org_units",
            EntityKind::Account => "accounts",
            EntityKind::Subscriber => "subscribers",
            EntityKind::SubscriberProfile => "subscriber_profiles",
            EntityKind::Device => "devices",
            EntityKind::Order => "orders",
            EntityKind::OrderItem => "order_items",
            EntityKind::SubscriberFeature => "subscriber_features",
            EntityKind::SubscriberFeatureState => "subscriber_feature_states",
            EntityKind::Ticket => "tickets",
            EntityKind::Note => "notes",
            EntityKind::DeviceEvent => "device_events",
            EntityKind::UsageRecord => "usage_records",
        }
    }

    pub fn from_name(name: &str) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Primary key columns.
    pub fn primary_key(self) -> &'static [&'static str] {
        match self {
            EntityKind::Region => &["region_id"],
            EntityKind::Plan => &["plan_id"],
            EntityKind::DeviceClass => &["device_class_id"],
            EntityKind::Rate => &["plan_id", "region_id", "device_class_id"],
            EntityKind::Feature => &["feature_id"],
            EntityKind::TicketStatusCode => &["code"],
            EntityKind::OrgUnit => &["org_unit_id"],
            EntityKind::Account => &["account_id"],
            EntityKind::Subscriber | EntityKind::SubscriberProfile => &["subscriber_id"],
            EntityKind::Device => &["device_id"],
            EntityKind::Order => &["order_id"],
            EntityKind::OrderItem => &["order_item_id"],
            EntityKind::SubscriberFeature => &["subscriber_id", "feature_id"],
            EntityKind::SubscriberFeatureState => &["subscriber_feature_state_id"],
            EntityKind::Ticket => &["ticket_id"],
            EntityKind::Note => &["note_id"],
            EntityKind::DeviceEvent => &["device_event_id"],
            EntityKind::UsageRecord => &["usage_record_id"],
        }
    }

    /// Identifier block index for kinds keyed by a minted integer id.
    ///
    /// Block numbers are part of the dataset contract and never reassigned.
    pub fn id_block(self) -> Option<i64> {
        match self {
            EntityKind::Region => Some(1),
            EntityKind::Plan => Some(2),
            EntityKind::DeviceClass => Some(3),
            EntityKind::Feature => Some(4),
            EntityKind::OrgUnit => Some(5),
            EntityKind::Account => Some(6),
            EntityKind::Subscriber => Some(7),
            EntityKind::Device => Some(8),
            EntityKind::Order => Some(9),
            EntityKind::OrderItem => Some(10),
            EntityKind::SubscriberFeatureState => Some(11),
            EntityKind::Ticket => Some(12),
            EntityKind::Note => Some(13),
            EntityKind::DeviceEvent => Some(14),
            EntityKind::UsageRecord => Some(15),
            EntityKind::Rate
            | EntityKind::TicketStatusCode
            | EntityKind::SubscriberProfile
            | EntityKind::SubscriberFeature => None,
        }
    }

    /// Inclusive range of identifiers this kind may mint.
    pub fn id_range(self) -> Option<RangeInclusive<i64>> {
        self.id_block()
            .map(|block| block * ID_BLOCK_SIZE + 1..=block * ID_BLOCK_SIZE + (ID_BLOCK_SIZE - 1))
    }

    /// Static reference catalogs that are materialized without random draws.
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            EntityKind::Region
                | EntityKind::Plan
                | EntityKind::DeviceClass
                | EntityKind::Rate
                | EntityKind::Feature
                | EntityKind::TicketStatusCode
                | EntityKind::OrgUnit
        )
    }

    /// Declared foreign keys. Composite keys reference composite primary keys.
    pub fn foreign_keys(self) -> &'static [ForeignKey] {
        const RATE: &[ForeignKey] = &[
            fk(&["plan_id"], EntityKind::Plan),
            fk(&["region_id"], EntityKind::Region),
            fk(&["device_class_id"], EntityKind::DeviceClass),
        ];
        const ORG_UNIT: &[ForeignKey] = &[ForeignKey {
            columns: &["parent_org_unit_id"],
            target: EntityKind::OrgUnit,
            nullable: true,
        }];
        const ACCOUNT: &[ForeignKey] = &[fk(&["region_id"], EntityKind::Region)];
        const SUBSCRIBER: &[ForeignKey] = &[
            fk(&["account_id"], EntityKind::Account),
            fk(&["plan_id"], EntityKind::Plan),
        ];
        const BY_SUBSCRIBER: &[ForeignKey] = &[fk(&["subscriber_id"], EntityKind::Subscriber)];
        const DEVICE: &[ForeignKey] = &[
            fk(&["subscriber_id"], EntityKind::Subscriber),
            fk(&["device_class_id"], EntityKind::DeviceClass),
        ];
        const ORDER: &[ForeignKey] = &[fk(&["account_id"], EntityKind::Account)];
        const ORDER_ITEM: &[ForeignKey] = &[fk(&["order_id"], EntityKind::Order)];
        const SUBSCRIBER_FEATURE: &[ForeignKey] = &[
            fk(&["subscriber_id"], EntityKind::Subscriber),
            fk(&["feature_id"], EntityKind::Feature),
        ];
        const FEATURE_STATE: &[ForeignKey] = &[fk(
            &["subscriber_id", "feature_id"],
            EntityKind::SubscriberFeature,
        )];
        const TICKET: &[ForeignKey] = &[
            fk(&["subscriber_id"], EntityKind::Subscriber),
            fk(&["status_code"], EntityKind::TicketStatusCode),
            fk(&["assigned_org_unit_id"], EntityKind::OrgUnit),
        ];
        const DEVICE_EVENT: &[ForeignKey] = &[fk(&["device_id"], EntityKind::Device)];
        const USAGE_RECORD: &[ForeignKey] = &[
            fk(&["subscriber_id"], EntityKind::Subscriber),
            fk(&["region_id"], EntityKind::Region),
        ];

        match self {
            EntityKind::Rate => RATE,
            EntityKind::OrgUnit => ORG_UNIT,
            EntityKind::Account => ACCOUNT,
            EntityKind::Subscriber => SUBSCRIBER,
            EntityKind::SubscriberProfile => BY_SUBSCRIBER,
            EntityKind::Device => DEVICE,
            EntityKind::Order => ORDER,
            EntityKind::OrderItem => ORDER_ITEM,
            EntityKind::SubscriberFeature => SUBSCRIBER_FEATURE,
            EntityKind::SubscriberFeatureState => FEATURE_STATE,
            EntityKind::Ticket => TICKET,
            EntityKind::DeviceEvent => DEVICE_EVENT,
            EntityKind::UsageRecord => USAGE_RECORD,
            EntityKind::Region
            | EntityKind::Plan
            | EntityKind::DeviceClass
            | EntityKind::Feature
            | EntityKind::TicketStatusCode
            | EntityKind::Note => &[],
        }
    }

    /// Entity kinds reachable through a `(ref_type, ref_id)` discriminated reference.
    pub fn polymorphic_targets(self) -> &'static [EntityKind] {
        match self {
            EntityKind::Note => &[
                EntityKind::Subscriber,
                EntityKind::Order,
                EntityKind::Ticket,
            ],
            _ => &[],
        }
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_org_unit_parent_is_nullable() {
        let nullable: Vec<(EntityKind, &[&str])> = EntityKind::ALL
            .into_iter()
            .flat_map(|kind| kind.foreign_keys().iter().map(move |key| (kind, key)))
            .filter(|(_, key)| key.nullable)
            .map(|(kind, key)| (kind, key.columns))
            .collect();
        assert_eq!(
            nullable,
            vec![(EntityKind::OrgUnit, &["parent_org_unit_id"][..])]
        );
    }

    #[test]
    fn id_ranges_are_disjoint() {
        let mut ranges: Vec<RangeInclusive<i64>> =
            EntityKind::ALL.iter().filter_map(|kind| kind.id_range()).collect();
        ranges.sort_by_key(|range| *range.start());
        for pair in ranges.windows(2) {
            assert!(pair[0].end() < pair[1].start());
        }
    }

    #[test]
    fn names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(EntityKind::from_name("customers"), None);
    }
}
