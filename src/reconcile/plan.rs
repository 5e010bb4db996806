//! Create/update decisions and update verification.

use super::classify::Classification;
use crate::detector::normalize_ip;
use crate::error::{DdnsError, Result};
use crate::providers::{Record, RecordDraft, RecordType};

/// What to do about one record type of a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<'a> {
    Create,
    Update(&'a Record),
    NoAction,
}

/// Whether `record` holds an address other than `current_ip`.
pub fn needs_update(record: &Record, current_ip: &str) -> bool {
    normalize_ip(&record.address) != normalize_ip(current_ip)
}

/// Decide the action for `record_type`, assuming duplicates were removed.
pub fn plan<'a>(
    records: &'a [Record],
    rule: &Classification,
    record_type: RecordType,
    current_ip: &str,
) -> Action<'a> {
    let existing = records
        .iter()
        .filter(|r| r.record_type == record_type && rule.accepts(r.name.as_deref()))
        .min_by_key(|r| r.id);

    match existing {
        None => Action::Create,
        Some(record) if needs_update(record, current_ip) => Action::Update(record),
        Some(_) => Action::NoAction,
    }
}

fn mismatch(field: &'static str, sent: impl ToString, observed: impl ToString) -> DdnsError {
    DdnsError::VerificationMismatch {
        field,
        sent: sent.to_string(),
        observed: observed.to_string(),
    }
}

/// Check that the provider stored exactly what was sent.
pub fn verify_update(id: u64, sent: &RecordDraft, echoed: &Record) -> Result<()> {
    if echoed.id != id {
        return Err(mismatch("id", id, echoed.id));
    }
    if echoed.record_type != sent.record_type {
        return Err(mismatch("type", sent.record_type, echoed.record_type));
    }
    if echoed.name != sent.name {
        return Err(mismatch(
            "name",
            format!("{:?}", sent.name),
            format!("{:?}", echoed.name),
        ));
    }
    if echoed.ttl != sent.ttl {
        return Err(mismatch("ttl", sent.ttl, echoed.ttl));
    }
    if echoed.address != sent.address {
        return Err(mismatch(
            sent.record_type.address_field(),
            &sent.address,
            &echoed.address,
        ));
    }
    Ok(())
}
