//! Field-level validation checks.
//!
//! Checks accumulate into a [`FieldViolations`] map so a request
//! reports every failing field at once rather than the first one hit.

use chrono::NaiveDate;

use crate::error::FieldViolations;

const MAX_NAME_LEN: usize = 25;
const MAX_POSTCODE_LEN: usize = 10;

/// A person or hotel name: non-empty, at most 25 characters, letters
/// plus `-` and `'`.
pub fn name(v: &mut FieldViolations, field: &str, value: &str) {
    let well_formed = !value.is_empty()
        && value.chars().count() <= MAX_NAME_LEN
        && value.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'');
    if !well_formed {
        v.add(
            field,
            "must be a non-empty string of up to 25 letters, - and '",
        );
    }
}

/// A UK-style phone number: exactly 11 digits, starting with 0.
pub fn phone_number(v: &mut FieldViolations, field: &str, value: &str) {
    let well_formed = value.len() == 11
        && value.starts_with('0')
        && value.chars().all(|c| c.is_ascii_digit());
    if !well_formed {
        v.add(field, "must be 11 digits starting with 0");
    }
}

/// A structurally plausible email address: one `@` with a non-empty
/// local part and a domain containing a dot. Matching is otherwise
/// deliberately loose; the definitive identity check is the store's
/// exact-match unique key.
pub fn email(v: &mut FieldViolations, field: &str, value: &str) {
    let well_formed = match value.split_once('@') {
        Some((local, dom)) => {
            !local.is_empty()
                && !dom.is_empty()
                && !dom.starts_with('.')
                && !dom.ends_with('.')
                && dom.contains('.')
                && !dom.contains('@')
        }
        None => false,
    };
    if !well_formed {
        v.add(field, "must be a valid email address");
    }
}

/// A postcode: non-empty, at most 10 alphanumeric characters.
pub fn postcode(v: &mut FieldViolations, field: &str, value: &str) {
    let well_formed = !value.is_empty()
        && value.chars().count() <= MAX_POSTCODE_LEN
        && value.chars().all(|c| c.is_ascii_alphanumeric());
    if !well_formed {
        v.add(field, "must be up to 10 alphanumeric characters");
    }
}

/// A booking date: strictly after `today`.
pub fn future_date(v: &mut FieldViolations, field: &str, value: NaiveDate, today: NaiveDate) {
    if value <= today {
        v.add(field, "must be in the future");
    }
}
