use chrono::{DateTime, Utc};

use telcogen_core::{
    EntityKind, Note, NoteTarget, Order, OrgUnit, Subscriber, Ticket, TicketCategory,
    TicketStatusCode,
};

use crate::catalog;
use crate::errors::GenerationError;
use crate::generators::GenerationContext;

const NOTED_SUBSCRIBERS: usize = 4;
const NOTED_ORDERS: usize = 3;
const NOTED_TICKETS: usize = 3;

pub fn generate_tickets(
    ctx: &mut GenerationContext,
    subscribers: &[Subscriber],
    status_codes: &[TicketStatusCode],
    org_units: &[OrgUnit],
) -> Result<Vec<Ticket>, GenerationError> {
    let queues: Vec<i64> = catalog::TICKET_QUEUES
        .iter()
        .filter_map(|index| org_units.get(*index).map(|unit| unit.org_unit_id))
        .collect();
    if queues.is_empty() || status_codes.is_empty() {
        return Err(GenerationError::InvalidConfiguration(
            "ticket routing needs status codes and org units".to_string(),
        ));
    }

    let mut tickets = Vec::new();
    for subscriber in subscribers {
        let count = ctx.count(ctx.preset.tickets_per_subscriber);
        for _ in 0..count {
            let ticket_id = ctx.ids.next(EntityKind::Ticket)?;
            let status = ctx.rng.pick(status_codes);
            let assigned_org_unit_id = *ctx.rng.pick(&queues);
            let category = *ctx.rng.pick(&TicketCategory::ALL);
            let priority = ctx.rng.int_in(1, 4);
            let subject = ctx.rng.pick(catalog::TICKET_SUBJECTS);
            let opened_at = ctx.window.instant_after(subscriber.activated_at, &mut ctx.rng);

            tickets.push(Ticket {
                ticket_id,
                subscriber_id: subscriber.subscriber_id,
                status_code: status.code.clone(),
                assigned_org_unit_id,
                category,
                priority,
                subject: subject.to_string(),
                opened_at,
            });
        }
    }
    Ok(tickets)
}

/// Notes on a sample of subscribers, then orders, then tickets.
///
/// Each sample is capped at the number of available targets, so an empty
/// parent set yields no notes for that target type.
pub fn generate_notes(
    ctx: &mut GenerationContext,
    subscribers: &[Subscriber],
    orders: &[Order],
    tickets: &[Ticket],
) -> Result<Vec<Note>, GenerationError> {
    let subscriber_targets: Vec<(NoteTarget, DateTime<Utc>)> = subscribers
        .iter()
        .map(|row| (NoteTarget::Subscriber(row.subscriber_id), row.activated_at))
        .collect();
    let order_targets: Vec<(NoteTarget, DateTime<Utc>)> = orders
        .iter()
        .map(|row| (NoteTarget::Order(row.order_id), row.placed_at))
        .collect();
    let ticket_targets: Vec<(NoteTarget, DateTime<Utc>)> = tickets
        .iter()
        .map(|row| (NoteTarget::Ticket(row.ticket_id), row.opened_at))
        .collect();

    let mut targets = ctx.rng.sample(&subscriber_targets, NOTED_SUBSCRIBERS);
    targets.extend(ctx.rng.sample(&order_targets, NOTED_ORDERS));
    targets.extend(ctx.rng.sample(&ticket_targets, NOTED_TICKETS));

    let mut notes = Vec::with_capacity(targets.len());
    for (target, since) in targets {
        let note_id = ctx.ids.next(EntityKind::Note)?;
        let author = ctx.rng.pick(catalog::NOTE_AUTHORS);
        let body = ctx.rng.pick(catalog::NOTE_BODIES);
        let created_at = ctx.window.instant_after(since, &mut ctx.rng);
        notes.push(Note {
            note_id,
            target,
            author: author.to_string(),
            body: body.to_string(),
            created_at,
        });
    }
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use telcogen_core::{Preset, SizeClass};

    #[test]
    fn notes_are_capped_by_available_targets() {
        let mut ctx = GenerationContext::new(1, Preset::for_size(SizeClass::Small));
        let notes = generate_notes(&mut ctx, &[], &[], &[]).unwrap();
        assert!(notes.is_empty());
    }
}
