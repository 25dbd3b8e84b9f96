mod fields;
mod lookup;
mod schedule;

pub use fields::{ObjectIdValidator, RequireFieldsValidator};
pub use lookup::{
    PetOwnershipValidator, VetApprovalValidator, RESOLVED_PET, RESOLVED_VETERINARIAN,
};
pub use schedule::{FutureDateValidator, TimeFormatValidator};
