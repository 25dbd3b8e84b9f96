use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::hospital::{Pet, Veterinarian};
use crate::storage::{PetRepository, VeterinarianRepository};
use crate::validation::{FieldValue, Result, ValidationContext, ValidationError, Validator};

/// Context field the pet ownership check fills in on success.
pub const RESOLVED_PET: &str = "resolvedPet";
/// Context field the veterinarian approval check fills in on success.
pub const RESOLVED_VETERINARIAN: &str = "resolvedVeterinarian";

/// Fails unless the referenced pet exists, is active and belongs to the
/// acting user.
///
/// On success a short summary of the pet is added under `resolvedPet`.
pub struct PetOwnershipValidator {
    pets: Arc<dyn PetRepository>,
    pet_field: String,
    user_field: String,
}

impl PetOwnershipValidator {
    pub fn new(
        pets: Arc<dyn PetRepository>,
        pet_field: impl Into<String>,
        user_field: impl Into<String>,
    ) -> Self {
        Self {
            pets,
            pet_field: pet_field.into(),
            user_field: user_field.into(),
        }
    }
}

fn pet_summary(pet: &Pet) -> FieldValue {
    FieldValue::Object(BTreeMap::from([
        ("id".to_string(), FieldValue::Id(pet.id)),
        ("name".to_string(), FieldValue::from(pet.name.as_str())),
        ("species".to_string(), FieldValue::from(pet.species.as_str())),
    ]))
}

#[async_trait]
impl Validator for PetOwnershipValidator {
    fn name(&self) -> &'static str {
        "pet_ownership"
    }

    async fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        let pet_id = ctx.get(&self.pet_field).and_then(FieldValue::as_id);
        let owner_id = ctx.get(&self.user_field).and_then(FieldValue::as_id);
        let (Some(pet_id), Some(owner_id)) = (pet_id, owner_id) else {
            return Err(ValidationError::PetNotFound);
        };

        let pet = self
            .pets
            .find_owned(pet_id, owner_id)
            .await?
            .ok_or(ValidationError::PetNotFound)?;

        ctx.insert(RESOLVED_PET, pet_summary(&pet));
        Ok(())
    }
}

/// Fails unless the referenced veterinarian exists and is approved.
///
/// On success a short summary is added under `resolvedVeterinarian`.
pub struct VetApprovalValidator {
    veterinarians: Arc<dyn VeterinarianRepository>,
    field: String,
}

impl VetApprovalValidator {
    pub fn new(veterinarians: Arc<dyn VeterinarianRepository>, field: impl Into<String>) -> Self {
        Self {
            veterinarians,
            field: field.into(),
        }
    }
}

fn veterinarian_summary(vet: &Veterinarian) -> FieldValue {
    FieldValue::Object(BTreeMap::from([
        ("id".to_string(), FieldValue::Id(vet.id)),
        ("name".to_string(), FieldValue::from(vet.name.as_str())),
        (
            "specialization".to_string(),
            FieldValue::from(vet.specialization.as_str()),
        ),
    ]))
}

#[async_trait]
impl Validator for VetApprovalValidator {
    fn name(&self) -> &'static str {
        "vet_approval"
    }

    async fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        let Some(vet_id) = ctx.get(&self.field).and_then(FieldValue::as_id) else {
            return Err(ValidationError::VeterinarianNotFound);
        };

        let vet = self
            .veterinarians
            .find_by_id(vet_id)
            .await?
            .ok_or(ValidationError::VeterinarianNotFound)?;

        if !vet.is_approved {
            return Err(ValidationError::VeterinarianNotApproved);
        }

        ctx.insert(RESOLVED_VETERINARIAN, veterinarian_summary(&vet));
        Ok(())
    }
}
