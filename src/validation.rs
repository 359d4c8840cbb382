use chrono::NaiveDate;
use log::debug;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{Error, Result};
use crate::models::ARTICLE_DATE_FORMAT;

/// Validates a payload, turning every violated rule into one message.
pub fn validate<T: Validate>(value: &T) -> Result<()> {
    match value.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let messages = error_messages(&errors);
            debug!("Validation failed: {:?}", messages);
            Err(Error::Validation(messages))
        }
    }
}

/// Flattens `validator` output into `"<field>: <message>"` strings sorted by field
pub fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<(String, Vec<String>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("failed on the '{}' rule", error.code),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, messages)| {
            messages
                .into_iter()
                .map(move |message| format!("{}: {}", field, message))
        })
        .collect()
}

/// Non-empty dates must be real `YYYY-MM-DD` calendar days; emptiness is
/// reported by the length rule.
pub fn validate_article_date(date: &str) -> std::result::Result<(), ValidationError> {
    if date.is_empty() {
        return Ok(());
    }
    NaiveDate::parse_from_str(date, ARTICLE_DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| {
            ValidationError::new("date_format")
                .with_message(Cow::Borrowed("date must be a valid YYYY-MM-DD calendar date"))
        })
}

pub fn validate_tag_entries(tags: &[String]) -> std::result::Result<(), ValidationError> {
    if tags.iter().any(|tag| tag.trim().is_empty()) {
        return Err(ValidationError::new("blank_tag")
            .with_message(Cow::Borrowed("tags must not contain blank entries")));
    }
    Ok(())
}
