use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::hospital::Appointment;

/// A veterinarian's time slot, optionally ignoring one appointment.
///
/// The excluded appointment is the one being rescheduled, so it never
/// conflicts with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingSlot {
    pub veterinarian_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub exclude: Option<Uuid>,
}

impl BookingSlot {
    pub fn new(veterinarian_id: Uuid, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            veterinarian_id,
            date,
            time,
            exclude: None,
        }
    }

    /// Ignores the given appointment when looking for conflicts.
    pub fn excluding(mut self, appointment_id: Uuid) -> Self {
        self.exclude = Some(appointment_id);
        self
    }

    /// Returns true if `appointment` holds this slot.
    pub fn is_taken_by(&self, appointment: &Appointment) -> bool {
        appointment.veterinarian_id == self.veterinarian_id
            && appointment.date == self.date
            && appointment.time == self.time
            && !appointment.status.releases_slot()
            && self.exclude != Some(appointment.id)
    }
}

/// Orders appointments latest slot first, then most recently created.
pub fn schedule_order(a: &Appointment, b: &Appointment) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.time.cmp(&a.time))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Orders records by creation time, most recent first, with the ID as tiebreaker.
pub fn newest_first(a: (DateTime<Utc>, Uuid), b: (DateTime<Utc>, Uuid)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1))
}
