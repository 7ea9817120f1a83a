use telcogen_core::{
    AttachFailure, Device, DeviceClass, DeviceEvent, EntityKind, EventPayload, EventType,
    Handover, LatencyProbe, RadioAttach, SessionEnd, SessionStart, Subscriber,
};

use crate::catalog;
use crate::errors::GenerationError;
use crate::generators::GenerationContext;
use crate::rng::RandomSource;

/// Exactly one device per subscriber.
pub fn generate_devices(
    ctx: &mut GenerationContext,
    subscribers: &[Subscriber],
    device_classes: &[DeviceClass],
) -> Result<Vec<Device>, GenerationError> {
    let mut devices = Vec::with_capacity(subscribers.len());
    for subscriber in subscribers {
        let device_id = ctx.ids.next(EntityKind::Device)?;
        let class_index = ctx.rng.int_in(0, device_classes.len() as i64 - 1) as usize;
        let class = device_classes.get(class_index).ok_or_else(|| {
            GenerationError::InvalidConfiguration("device class catalog is empty".to_string())
        })?;
        let models = catalog::DEVICE_MODELS
            .get(class_index)
            .copied()
            .unwrap_or(&["Generic"]);
        let model = ctx.rng.pick(models);
        let tac = ctx.rng.int_in(0, 9_999_999);
        let serial = ctx.rng.int_in(0, 999_999);
        let activated_at = ctx.window.instant_after(subscriber.activated_at, &mut ctx.rng);

        devices.push(Device {
            device_id,
            subscriber_id: subscriber.subscriber_id,
            device_class_id: class.device_class_id,
            imei: format!("35{tac:07}{serial:06}"),
            model: model.to_string(),
            activated_at,
        });
    }
    Ok(devices)
}

/// Event type first, then its payload fields in declaration order, then the instant.
pub fn generate_device_events(
    ctx: &mut GenerationContext,
    devices: &[Device],
) -> Result<Vec<DeviceEvent>, GenerationError> {
    let mut events = Vec::new();
    for device in devices {
        let count = ctx.count(ctx.preset.device_events_per_device);
        for _ in 0..count {
            let device_event_id = ctx.ids.next(EntityKind::DeviceEvent)?;
            let event_type = *ctx.rng.pick(&EventType::ALL);
            let payload = event_payload(&mut ctx.rng, event_type);
            let occurred_at = ctx.window.instant_after(device.activated_at, &mut ctx.rng);

            events.push(DeviceEvent {
                device_event_id,
                device_id: device.device_id,
                occurred_at,
                payload,
            });
        }
    }
    Ok(events)
}

fn event_payload(rng: &mut RandomSource, event_type: EventType) -> EventPayload {
    match event_type {
        EventType::RadioAttach => EventPayload::RadioAttach(RadioAttach {
            cell_id: cell_id(rng),
            rat: rng.pick(catalog::RADIO_TECHNOLOGIES).to_string(),
            signal_dbm: rng.int_in(-120, -60),
        }),
        EventType::Handover => EventPayload::Handover(Handover {
            from_cell_id: cell_id(rng),
            to_cell_id: cell_id(rng),
            interruption_ms: rng.int_in(10, 400),
        }),
        EventType::SessionStart => EventPayload::SessionStart(SessionStart {
            session_id: session_id(rng),
            apn: rng.pick(catalog::APNS).to_string(),
        }),
        EventType::SessionEnd => EventPayload::SessionEnd(SessionEnd {
            session_id: session_id(rng),
            bytes_up: rng.int_in(1_000, 50_000_000),
            bytes_down: rng.int_in(10_000, 500_000_000),
        }),
        EventType::LatencyProbe => EventPayload::LatencyProbe(LatencyProbe {
            target: rng.pick(catalog::PROBE_TARGETS).to_string(),
            rtt_ms: rng.int_in(8, 250),
        }),
        EventType::AttachFailure => {
            let (cause_code, reason) = rng.pick(catalog::ATTACH_FAILURES);
            EventPayload::AttachFailure(AttachFailure {
                cause_code: *cause_code,
                reason: reason.to_string(),
            })
        }
    }
}

fn cell_id(rng: &mut RandomSource) -> String {
    format!("310-260-{:05}", rng.int_in(0, 99_999))
}

fn session_id(rng: &mut RandomSource) -> String {
    format!("S{:010}", rng.int_in(0, 9_999_999_999))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_requested_type() {
        let mut rng = RandomSource::new(3);
        for event_type in EventType::ALL {
            assert_eq!(event_payload(&mut rng, event_type).event_type(), event_type);
        }
    }

    #[test]
    fn identifiers_have_fixed_width() {
        let mut rng = RandomSource::new(8);
        assert_eq!(cell_id(&mut rng).len(), "310-260-00000".len());
        assert_eq!(session_id(&mut rng).len(), 11);
    }
}
