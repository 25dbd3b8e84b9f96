use std::fmt;
use std::sync::Arc;

use super::{Result, ValidationContext, Validator};

/// An ordered, immutable list of validators.
///
/// The chain is assembled once with [`ValidationChain::then`] and can then be
/// shared across requests. Order matters: cheap shape checks should come
/// before validators that hit the store.
#[derive(Clone, Default)]
pub struct ValidationChain {
    validators: Vec<Arc<dyn Validator>>,
}

impl ValidationChain {
    /// Creates an empty chain. An empty chain always passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validator to the end of the chain.
    pub fn then<V: Validator + 'static>(self, validator: V) -> Self {
        self.then_shared(Arc::new(validator))
    }

    /// Appends a validator that is shared with other chains.
    pub fn then_shared(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Names of the validators, in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Runs every validator in order, stopping at the first failure.
    pub async fn run(&self, ctx: &mut ValidationContext) -> Result<()> {
        for validator in &self.validators {
            if let Err(err) = validator.validate(ctx).await {
                tracing::debug!(
                    validator = validator.name(),
                    error = %err,
                    "Validation chain halted"
                );
                return Err(err);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ValidationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationChain")
            .field("validators", &self.names())
            .finish()
    }
}
