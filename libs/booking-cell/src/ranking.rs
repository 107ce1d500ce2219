//! Picks which available slots to recommend.
//!
//! Input slots are expected in ascending datetime order. With a home position the
//! nearest polyclinics win; without one the earliest slots win.

use std::collections::HashMap;

use uuid::Uuid;

use clinic_cell::distance::{geodesic_km, Coordinates};
use shared_models::domain::BookingSlot;

fn polyclinic_position(slot: &BookingSlot) -> Option<Coordinates> {
    slot.polyclinic
        .as_ref()
        .and_then(|c| c.address.as_ref())
        .map(Coordinates::from)
}

/// Orders distinct polyclinics by distance from `home` (first appearance breaks
/// ties), keeps the nearest `polyclinic_limit` and emits up to `timeslot_limit`
/// slots from each, nearest polyclinic first.
pub fn nearest_polyclinics_first(
    slots: Vec<BookingSlot>,
    home: Coordinates,
    polyclinic_limit: usize,
    timeslot_limit: usize,
) -> Vec<BookingSlot> {
    let mut order: Vec<(Uuid, f64)> = Vec::new();
    let mut by_polyclinic: HashMap<Uuid, Vec<BookingSlot>> = HashMap::new();

    for slot in slots {
        let entry = by_polyclinic.entry(slot.polyclinic_id).or_default();
        if entry.is_empty() {
            let distance = polyclinic_position(&slot)
                .map(|p| geodesic_km(home, p))
                .unwrap_or(f64::INFINITY);
            order.push((slot.polyclinic_id, distance));
        }
        entry.push(slot);
    }

    order.sort_by(|a, b| a.1.total_cmp(&b.1));

    order
        .into_iter()
        .take(polyclinic_limit)
        .flat_map(|(id, _)| {
            by_polyclinic
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .take(timeslot_limit)
        })
        .collect()
}

/// Single pass in datetime order. A slot is admitted when its polyclinic is
/// already admitted or there is still room for another polyclinic, and that
/// polyclinic has fewer than `timeslot_limit` admitted slots.
pub fn earliest_first(
    slots: Vec<BookingSlot>,
    polyclinic_limit: usize,
    timeslot_limit: usize,
) -> Vec<BookingSlot> {
    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    let mut admitted = Vec::new();

    for slot in slots {
        if counts.len() >= polyclinic_limit && !counts.contains_key(&slot.polyclinic_id) {
            continue;
        }
        let count = counts.entry(slot.polyclinic_id).or_insert(0);
        if *count < timeslot_limit {
            *count += 1;
            admitted.push(slot);
        }
    }

    admitted
}
