use std::collections::BTreeMap;

use crate::entity::EntityKind;
use crate::model::*;

/// The canonical entity graph for one run.
///
/// Every slice is sorted by primary key once generation finishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalDataset {
    pub regions: Vec<Region>,
    pub plans: Vec<Plan>,
    pub device_classes: Vec<DeviceClass>,
    pub rates: Vec<Rate>,
    pub features: Vec<Feature>,
    pub ticket_status_codes: Vec<TicketStatusCode>,
    pub org_units: Vec<OrgUnit>,
    pub accounts: Vec<Account>,
    pub subscribers: Vec<Subscriber>,
    pub subscriber_profiles: Vec<SubscriberProfile>,
    pub devices: Vec<Device>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub subscriber_features: Vec<SubscriberFeature>,
    pub subscriber_feature_states: Vec<SubscriberFeatureState>,
    pub tickets: Vec<Ticket>,
    pub notes: Vec<Note>,
    pub device_events: Vec<DeviceEvent>,
    pub usage_records: Vec<UsageRecord>,
}

/// Callback over every entity slice of a dataset, in [`EntityKind::ALL`] order.
pub trait EntityVisitor {
    type Error;

    fn visit<E: Entity>(&mut self, rows: &[E]) -> Result<(), Self::Error>;
}

/// Source of entity slices used to rebuild a dataset.
pub trait EntityLoader {
    type Error;

    fn load<E: Entity>(&mut self) -> Result<Vec<E>, Self::Error>;
}

impl CanonicalDataset {
    /// Sort every slice by primary key ascending.
    pub fn sort(&mut self) {
        sort_by_key(&mut self.regions);
        sort_by_key(&mut self.plans);
        sort_by_key(&mut self.device_classes);
        sort_by_key(&mut self.rates);
        sort_by_key(&mut self.features);
        sort_by_key(&mut self.ticket_status_codes);
        sort_by_key(&mut self.org_units);
        sort_by_key(&mut self.accounts);
        sort_by_key(&mut self.subscribers);
        sort_by_key(&mut self.subscriber_profiles);
        sort_by_key(&mut self.devices);
        sort_by_key(&mut self.orders);
        sort_by_key(&mut self.order_items);
        sort_by_key(&mut self.subscriber_features);
        sort_by_key(&mut self.subscriber_feature_states);
        sort_by_key(&mut self.tickets);
        sort_by_key(&mut self.notes);
        sort_by_key(&mut self.device_events);
        sort_by_key(&mut self.usage_records);
    }

    pub fn visit<V: EntityVisitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit(&self.regions)?;
        visitor.visit(&self.plans)?;
        visitor.visit(&self.device_classes)?;
        visitor.visit(&self.rates)?;
        visitor.visit(&self.features)?;
        visitor.visit(&self.ticket_status_codes)?;
        visitor.visit(&self.org_units)?;
        visitor.visit(&self.accounts)?;
        visitor.visit(&self.subscribers)?;
        visitor.visit(&self.subscriber_profiles)?;
        visitor.visit(&self.devices)?;
        visitor.visit(&self.orders)?;
        visitor.visit(&self.order_items)?;
        visitor.visit(&self.subscriber_features)?;
        visitor.visit(&self.subscriber_feature_states)?;
        visitor.visit(&self.tickets)?;
        visitor.visit(&self.notes)?;
        visitor.visit(&self.device_events)?;
        visitor.visit(&self.usage_records)?;
        Ok(())
    }

    /// Rebuild a dataset slice by slice. The result is re-sorted.
    pub fn load<L: EntityLoader>(loader: &mut L) -> Result<Self, L::Error> {
        let mut dataset = Self {
            regions: loader.load()?,
            plans: loader.load()?,
            device_classes: loader.load()?,
            rates: loader.load()?,
            features: loader.load()?,
            ticket_status_codes: loader.load()?,
            org_units: loader.load()?,
            accounts: loader.load()?,
            subscribers: loader.load()?,
            subscriber_profiles: loader.load()?,
            devices: loader.load()?,
            orders: loader.load()?,
            order_items: loader.load()?,
            subscriber_features: loader.load()?,
            subscriber_feature_states: loader.load()?,
            tickets: loader.load()?,
            notes: loader.load()?,
            device_events: loader.load()?,
            usage_records: loader.load()?,
        };
        dataset.sort();
        Ok(dataset)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Region => self.regions.len(),
            EntityKind::Plan => self.plans.len(),
            EntityKind::DeviceClass => self.device_classes.len(),
            EntityKind::Rate => self.rates.len(),
            EntityKind::Feature => self.features.len(),
            EntityKind::TicketStatusCode => self.ticket_status_codes.len(),
            EntityKind::OrgUnit => self.org_units.len(),
            EntityKind::Account => self.accounts.len(),
            EntityKind::Subscriber => self.subscribers.len(),
            EntityKind::SubscriberProfile => self.subscriber_profiles.len(),
            EntityKind::Device => self.devices.len(),
            EntityKind::Order => self.orders.len(),
            EntityKind::OrderItem => self.order_items.len(),
            EntityKind::SubscriberFeature => self.subscriber_features.len(),
            EntityKind::SubscriberFeatureState => self.subscriber_feature_states.len(),
            EntityKind::Ticket => self.tickets.len(),
            EntityKind::Note => self.notes.len(),
            EntityKind::DeviceEvent => self.device_events.len(),
            EntityKind::UsageRecord => self.usage_records.len(),
        }
    }

    /// Row counts keyed by entity name.
    pub fn counts(&self) -> BTreeMap<String, u64> {
        EntityKind::ALL
            .iter()
            .map(|kind| (kind.name().to_string(), self.count(*kind) as u64))
            .collect()
    }
}

fn sort_by_key<E: Entity>(rows: &mut [E]) {
    rows.sort_by_key(|row| row.key());
}
