use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::hospital::{parse_datetime, parse_hh_mm};
use crate::validation::{FieldValue, Result, ValidationContext, ValidationError, Validator};

/// Fails unless a field holds a date strictly after the current time.
///
/// Text is parsed with [`parse_datetime`]; a plain date means midnight UTC,
/// so a booking dated today is already in the past.
#[derive(Debug, Clone)]
pub struct FutureDateValidator {
    field: String,
    now: Option<DateTime<Utc>>,
}

impl FutureDateValidator {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            now: None,
        }
    }

    /// Compares against a fixed instant instead of the wall clock.
    pub fn relative_to(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn read(&self, ctx: &ValidationContext) -> Option<DateTime<Utc>> {
        match ctx.get(&self.field)? {
            FieldValue::Date(date) => Some(*date),
            FieldValue::Text(text) => parse_datetime(text),
            _ => None,
        }
    }
}

#[async_trait]
impl Validator for FutureDateValidator {
    fn name(&self) -> &'static str {
        "future_date"
    }

    async fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        let date = self.read(ctx).ok_or_else(|| ValidationError::InvalidDate {
            field: self.field.clone(),
        })?;

        let now = self.now.unwrap_or_else(Utc::now);
        if date <= now {
            return Err(ValidationError::DateNotInFuture {
                field: self.field.clone(),
            });
        }
        Ok(())
    }
}

/// Fails unless the value at a dotted path is an `HH:MM` time.
#[derive(Debug, Clone)]
pub struct TimeFormatValidator {
    path: String,
}

impl TimeFormatValidator {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Validator for TimeFormatValidator {
    fn name(&self) -> &'static str {
        "time_format"
    }

    async fn validate(&self, ctx: &mut ValidationContext) -> Result<()> {
        let valid = ctx
            .resolve(&self.path)
            .and_then(FieldValue::as_text)
            .and_then(parse_hh_mm)
            .is_some();

        if valid {
            Ok(())
        } else {
            Err(ValidationError::InvalidTime {
                field: self.path.clone(),
            })
        }
    }
}
