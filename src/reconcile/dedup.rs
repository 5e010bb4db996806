//! Duplicate removal: at most one record per name and type survives.

use super::classify::Classification;
use crate::events::{EventSink, ReconcileEvent};
use crate::providers::{Record, RecordType, ZoneApi};

/// Deletions issued by one deduplication pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DedupOutcome {
    pub attempted: usize,
    pub deleted: usize,
}

/// Ids of the records of `record_type` that should be deleted.
///
/// The lowest id among the domain's records of that type is kept.
pub fn duplicate_ids(
    records: &[Record],
    record_type: RecordType,
    rule: &Classification,
) -> Option<(u64, Vec<u64>)> {
    let mut ids: Vec<u64> = records
        .iter()
        .filter(|r| r.record_type == record_type && rule.accepts(r.name.as_deref()))
        .map(|r| r.id)
        .collect();
    ids.sort_unstable();

    let (&kept, rest) = ids.split_first()?;
    Some((kept, rest.to_vec()))
}

/// Delete every duplicate of `record_type` for the domain.
///
/// Failed deletions are reported and skipped; the next cycle sees the
/// leftovers again and retries.
pub async fn deduplicate(
    api: &dyn ZoneApi,
    sink: &dyn EventSink,
    zone: u64,
    records: &[Record],
    record_type: RecordType,
    rule: &Classification,
) -> DedupOutcome {
    let mut outcome = DedupOutcome::default();

    let Some((kept, extra)) = duplicate_ids(records, record_type, rule) else {
        return outcome;
    };
    if extra.is_empty() {
        return outcome;
    }

    sink.emit(ReconcileEvent::DuplicateFound {
        domain: rule.domain.clone(),
        record_type,
        kept,
        extra: extra.clone(),
    });

    for record_id in extra {
        outcome.attempted += 1;
        match api.delete_record(zone, record_id).await {
            Ok(()) => {
                outcome.deleted += 1;
                sink.emit(ReconcileEvent::RecordDeleted {
                    domain: rule.domain.clone(),
                    record_id,
                });
            }
            Err(e) => sink.emit(ReconcileEvent::DeleteFailed {
                domain: rule.domain.clone(),
                record_id,
                error: e.to_string(),
            }),
        }
    }

    outcome
}
