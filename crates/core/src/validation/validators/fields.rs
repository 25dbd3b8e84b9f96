use async_trait::async_trait;

use crate::validation::{Result, ValidationContext, ValidationError, Validator};

/// Fails when any listed field is absent, null or an empty string.
///
/// The error names every missing field, not just the first.
#[derive(Debug, Clone)]
pub struct RequireFieldsValidator {
    fields: Vec<String>,
}

impl RequireFieldsValidator {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Validator for RequireFieldsValidator {
    fn name(&self) -> &'static str {
        "require_fields"
    }

    async fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        let missing: Vec<String> = self
            .fields
            .iter()
            .filter(|field| !ctx.is_present(field))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }
}

/// Fails when a listed field is present but not a well-formed record ID.
///
/// Absent fields are left to [`RequireFieldsValidator`]; put that first when
/// the IDs are mandatory.
#[derive(Debug, Clone)]
pub struct ObjectIdValidator {
    fields: Vec<String>,
}

impl ObjectIdValidator {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Validator for ObjectIdValidator {
    fn name(&self) -> &'static str {
        "object_id"
    }

    async fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        for field in &self.fields {
            let Some(value) = ctx.get(field) else {
                continue;
            };
            if value.is_blank() {
                continue;
            }
            if value.as_id().is_none() {
                return Err(ValidationError::InvalidId {
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }
}
