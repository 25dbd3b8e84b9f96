//! Request validation as an ordered chain of single-purpose validators.
//!
//! A controller builds a [`ValidationContext`] from request input and runs it
//! through a [`ValidationChain`]. The chain stops at the first failing
//! validator and hands its [`ValidationError`] back untouched.
//!
//! # Example
//!
//! ```ignore
//! let chain = ValidationChain::new()
//!     .then(RequireFieldsValidator::new(["date", "time"]))
//!     .then(TimeFormatValidator::new("time"));
//!
//! let mut ctx = ValidationContext::new().with("date", "2030-01-01").with("time", "09:30");
//! chain.run(&mut ctx).await?;
//! ```

mod chain;
mod context;
mod error;
mod traits;
mod validators;

pub use chain::ValidationChain;
pub use context::{FieldValue, ValidationContext};
pub use error::{Result, ValidationError};
pub use traits::Validator;
pub use validators::{
    FutureDateValidator, ObjectIdValidator, PetOwnershipValidator, RequireFieldsValidator,
    TimeFormatValidator, VetApprovalValidator, RESOLVED_PET, RESOLVED_VETERINARIAN,
};
