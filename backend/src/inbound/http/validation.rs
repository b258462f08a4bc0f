//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidTimestamp,
    InvalidDecimal,
    InvalidEnum,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidDecimal => "invalid_decimal",
            ErrorCode::InvalidEnum => "invalid_enum",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(&value).map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            &value,
        )
    })
}

pub(crate) fn parse_rfc3339_timestamp(
    value: String,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            field_error(
                field,
                format!("{} must be an RFC 3339 timestamp", field.as_str()),
                ErrorCode::InvalidTimestamp,
                &value,
            )
        })
}

pub(crate) fn parse_decimal(value: String, field: FieldName) -> Result<Decimal, Error> {
    value.parse().map_err(|_| {
        field_error(
            field,
            format!("{} must be a decimal number", field.as_str()),
            ErrorCode::InvalidDecimal,
            &value,
        )
    })
}

/// Parse an enumerated value via its domain `FromStr`, keeping the list of
/// accepted spellings in the error message.
pub(crate) fn parse_enum<T>(value: String, field: FieldName, accepted: &str) -> Result<T, Error>
where
    T: std::str::FromStr,
{
    value.parse().map_err(|_| {
        field_error(
            field,
            format!("{} must be one of: {accepted}", field.as_str()),
            ErrorCode::InvalidEnum,
            &value,
        )
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::AccommodationType;

    #[rstest]
    fn parse_uuid_accepts_canonical_form() {
        let id = Uuid::new_v4();
        let parsed = parse_uuid(id.to_string(), FieldName::new("unitId")).expect("valid uuid");
        assert_eq!(parsed, id);
    }

    #[rstest]
    fn parse_uuid_reports_the_field() {
        let error = parse_uuid("nope".to_owned(), FieldName::new("unitId")).expect_err("bad uuid");
        let details = error.details().expect("details attached");
        assert_eq!(details["field"], "unitId");
        assert_eq!(details["code"], "invalid_uuid");
    }

    #[rstest]
    fn parse_timestamp_handles_offsets() {
        let parsed = parse_rfc3339_timestamp(
            "2026-03-01T14:00:00+02:00".to_owned(),
            FieldName::new("checkInDate"),
        )
        .expect("valid timestamp");
        assert_eq!(parsed.to_rfc3339(), "2026-03-01T12:00:00+00:00");
    }

    #[rstest]
    fn parse_decimal_rejects_garbage() {
        let error =
            parse_decimal("one hundred".to_owned(), FieldName::new("amount")).expect_err("bad");
        assert_eq!(
            error.details().expect("details attached")["code"],
            "invalid_decimal"
        );
    }

    #[rstest]
    fn parse_enum_lists_accepted_values() {
        let error = parse_enum::<AccommodationType>(
            "CASTLE".to_owned(),
            FieldName::new("accommodationType"),
            "HOME, FLAT, APARTMENTS",
        )
        .expect_err("unknown value");
        assert!(error.message().contains("HOME, FLAT, APARTMENTS"));
    }
}
