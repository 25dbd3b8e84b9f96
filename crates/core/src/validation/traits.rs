use async_trait::async_trait;

use super::{Result, ValidationContext};

/// A single check in a validation chain.
///
/// Validators may read any field and may add new fields for later
/// validators or the caller. They never remove fields.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn validate(&self, ctx: &mut ValidationContext) -> Result<()>;
}
