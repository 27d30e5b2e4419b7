//! Parsing and validation of free-text input captured by the controller.
//!
//! Every [`InputError`] renders as the reply shown to the admin, so the
//! controller can send `err.to_string()` as-is.

use chrono::NaiveDate;

use crate::domain::{ConcertId, NewConcert};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("❌ Неправильный формат! Введите все 4 строки:\n1. Дата\n2. Город\n3. Учреждение\n4. Ссылка")]
    TooFewLines,

    #[error("❌ Неправильный формат даты! Используйте ГГГГ-ММ-ДД (например: 2024-12-25)")]
    InvalidDate,

    #[error("❌ Ссылка должна начинаться с http:// или https://")]
    InvalidLink,

    #[error("❌ Введите корректный ID концерта (число)")]
    InvalidConcertId,
}

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// Parse the four-line "date / city / venue / link" block.
///
/// Blank lines are skipped and anything after the fourth line is ignored.
pub fn parse_concert_input(text: &str) -> Result<NewConcert, InputError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let [date, city, institution, link, ..] = lines.as_slice() else {
        return Err(InputError::TooFewLines);
    };

    let planned_to = parse_date(date).ok_or(InputError::InvalidDate)?;

    if !link.starts_with("http") {
        return Err(InputError::InvalidLink);
    }

    Ok(NewConcert {
        planned_to,
        city_on: city.to_string(),
        institution_on: institution.to_string(),
        link_to: link.to_string(),
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

pub fn parse_concert_id(text: &str) -> Result<ConcertId, InputError> {
    text.trim()
        .parse::<i64>()
        .map(ConcertId)
        .map_err(|_| InputError::InvalidConcertId)
}
