//! Appointment booking workflow.
//!
//! Runs request input through a validation chain, checks the veterinarian's
//! slot against live bookings and then writes through the repositories.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

use pethospital_core::hospital::{
    parse_calendar_date, parse_hh_mm, Actor, Appointment, AppointmentDetails, AppointmentStatus,
    AppointmentUpdate,
};
use pethospital_core::storage::{
    AppointmentRepository, BookingSlot, PetRepository, RepositoryError, VeterinarianRepository,
};
use pethospital_core::validation::{
    FieldValue, FutureDateValidator, ObjectIdValidator, PetOwnershipValidator,
    RequireFieldsValidator, TimeFormatValidator, ValidationChain, ValidationContext,
    ValidationError, VetApprovalValidator,
};

/// Context field holding the acting user, filled in from the caller's identity.
const USER_ID: &str = "userId";

/// Errors from the booking workflow.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Veterinarian already has an appointment on {date} at {time}")]
    SlotTaken { date: NaiveDate, time: NaiveTime },
    #[error("Appointment not found: {0}")]
    NotFound(Uuid),
    #[error("Cannot move a {from} appointment to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    #[error("Cannot reschedule a {0} appointment")]
    Closed(AppointmentStatus),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl BookingError {
    /// Maps the error to the HTTP status a controller should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            BookingError::Validation(err) => err.status_code(),
            BookingError::SlotTaken { .. } => 409,
            BookingError::NotFound(_) => 404,
            BookingError::InvalidTransition { .. } | BookingError::Closed(_) => 400,
            BookingError::Repository(err) => err.status_code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;

/// Chain for new bookings: shape checks first, then the store lookups.
pub fn booking_chain(
    pets: Arc<dyn PetRepository>,
    veterinarians: Arc<dyn VeterinarianRepository>,
) -> ValidationChain {
    ValidationChain::new()
        .then(RequireFieldsValidator::new([
            "petId",
            "veterinarianId",
            "date",
            "time",
            "reason",
        ]))
        .then(ObjectIdValidator::new(["petId", "veterinarianId"]))
        .then(FutureDateValidator::new("date"))
        .then(TimeFormatValidator::new("time"))
        .then(PetOwnershipValidator::new(pets, "petId", USER_ID))
        .then(VetApprovalValidator::new(veterinarians, "veterinarianId"))
}

/// Chain for moving an existing booking to a new slot.
pub fn reschedule_chain() -> ValidationChain {
    ValidationChain::new()
        .then(RequireFieldsValidator::new(["date", "time"]))
        .then(FutureDateValidator::new("date"))
        .then(TimeFormatValidator::new("time"))
}

/// Chain for a veterinarian's working hours.
pub fn availability_chain() -> ValidationChain {
    ValidationChain::new()
        .then(RequireFieldsValidator::new(["availability"]))
        .then(TimeFormatValidator::new("availability.startTime"))
        .then(TimeFormatValidator::new("availability.endTime"))
}

/// Books, reschedules and moves appointments through their statuses.
pub struct BookingService {
    appointments: Arc<dyn AppointmentRepository>,
    booking: ValidationChain,
    reschedule: ValidationChain,
}

impl BookingService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        pets: Arc<dyn PetRepository>,
        veterinarians: Arc<dyn VeterinarianRepository>,
    ) -> Self {
        Self {
            appointments,
            booking: booking_chain(pets, veterinarians),
            reschedule: reschedule_chain(),
        }
    }

    /// Books a pending appointment for `actor` from a JSON request body.
    ///
    /// Expects `petId`, `veterinarianId`, `date`, `time` and `reason`, plus
    /// optional `notes`. Any `userId` in the body is replaced by the actor.
    pub async fn book(
        &self,
        actor: &Actor,
        request: serde_json::Value,
    ) -> Result<AppointmentDetails> {
        let mut ctx = ValidationContext::from_json(request);
        ctx.insert(USER_ID, actor.id);
        self.booking.run(&mut ctx).await?;

        let pet_id = read_id(&ctx, "petId")?;
        let veterinarian_id = read_id(&ctx, "veterinarianId")?;
        let (date, time) = read_slot(&ctx)?;
        let reason = ctx
            .get("reason")
            .and_then(FieldValue::as_text)
            .unwrap_or_default();

        let slot = BookingSlot::new(veterinarian_id, date, time);
        if self.appointments.find_conflict(&slot).await?.is_some() {
            return Err(BookingError::SlotTaken { date, time });
        }

        let mut appointment =
            Appointment::new(actor.id, pet_id, veterinarian_id, date, time, reason);
        if let Some(notes) = ctx.get("notes").and_then(FieldValue::as_text) {
            appointment = appointment.with_notes(notes);
        }

        let details = self.appointments.create(&appointment).await?;
        tracing::info!(
            appointment_id = %appointment.id,
            user_id = %actor.id,
            %veterinarian_id,
            %date,
            %time,
            "Appointment booked"
        );
        Ok(details)
    }

    /// Moves an appointment the actor can see to a new date and time.
    pub async fn reschedule(
        &self,
        actor: &Actor,
        appointment_id: Uuid,
        request: serde_json::Value,
    ) -> Result<AppointmentDetails> {
        let mut ctx = ValidationContext::from_json(request);
        self.reschedule.run(&mut ctx).await?;
        let (date, time) = read_slot(&ctx)?;

        let current = self.load(actor, appointment_id).await?;
        if current.status.is_terminal() {
            return Err(BookingError::Closed(current.status));
        }

        let slot = BookingSlot::new(current.veterinarian_id, date, time).excluding(appointment_id);
        if self.appointments.find_conflict(&slot).await?.is_some() {
            return Err(BookingError::SlotTaken { date, time });
        }

        let details = self
            .appointments
            .update_by_id(appointment_id, &AppointmentUpdate::reschedule(date, time))
            .await?;
        tracing::info!(%appointment_id, %date, %time, "Appointment rescheduled");
        Ok(details)
    }

    /// Changes the status of an appointment the actor can see.
    ///
    /// Completed, cancelled and rejected appointments are final.
    pub async fn update_status(
        &self,
        actor: &Actor,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<AppointmentDetails> {
        let current = self.load(actor, appointment_id).await?;
        if current.status.is_terminal() {
            return Err(BookingError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let details = self
            .appointments
            .update_by_id(appointment_id, &AppointmentUpdate::status(status))
            .await?;
        tracing::info!(%appointment_id, from = %current.status, to = %status, "Appointment status changed");
        Ok(details)
    }

    async fn load(&self, actor: &Actor, appointment_id: Uuid) -> Result<Appointment> {
        self.appointments
            .find_by_id_for_role(appointment_id, actor)
            .await?
            .map(|details| details.appointment)
            .ok_or(BookingError::NotFound(appointment_id))
    }
}

fn read_id(ctx: &ValidationContext, field: &str) -> Result<Uuid> {
    ctx.get(field).and_then(FieldValue::as_id).ok_or_else(|| {
        BookingError::Validation(ValidationError::InvalidId {
            field: field.to_string(),
        })
    })
}

/// Reads the validated `date` and `time` fields as a calendar slot.
///
/// The day is taken as written; an offset on an RFC 3339 date does not move
/// the booking to another UTC day.
fn read_slot(ctx: &ValidationContext) -> Result<(NaiveDate, NaiveTime)> {
    let date = match ctx.get("date") {
        Some(FieldValue::Date(date)) => Some(date.date_naive()),
        Some(FieldValue::Text(text)) => parse_calendar_date(text),
        _ => None,
    }
    .ok_or_else(|| ValidationError::InvalidDate {
        field: "date".to_string(),
    })?;

    let time = ctx
        .get("time")
        .and_then(FieldValue::as_text)
        .and_then(parse_hh_mm)
        .ok_or_else(|| ValidationError::InvalidTime {
            field: "time".to_string(),
        })?;

    Ok((date, time))
}
