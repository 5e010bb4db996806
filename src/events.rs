//! Reconciliation events and the sinks that observe them.
//!
//! The reconciler never logs directly; it reports what happened to an
//! injected [`EventSink`]. The binary uses [`TracingSink`], tests record
//! events in memory.

use crate::providers::RecordType;
use crate::reconcile::Outcome;

/// Something the reconciler did or observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileEvent {
    CycleStarted {
        domains: usize,
    },
    AddressesDiscovered {
        ipv4: String,
        ipv6: String,
    },
    DiscoveryFailed {
        error: String,
    },
    ZoneResolved {
        domain: String,
        zone_query: String,
        zone_id: u64,
    },
    RecordsFiltered {
        domain: String,
        total: usize,
        matching: usize,
    },
    DuplicateFound {
        domain: String,
        record_type: RecordType,
        kept: u64,
        extra: Vec<u64>,
    },
    RecordDeleted {
        domain: String,
        record_id: u64,
    },
    DeleteFailed {
        domain: String,
        record_id: u64,
        error: String,
    },
    RecordCreated {
        domain: String,
        record_type: RecordType,
        record_id: u64,
        address: String,
    },
    CreateFailed {
        domain: String,
        record_type: RecordType,
        error: String,
    },
    NoRecords {
        domain: String,
    },
    RecordUpToDate {
        domain: String,
        record_id: u64,
        record_type: RecordType,
        address: String,
    },
    RecordUpdated {
        domain: String,
        record_id: u64,
        record_type: RecordType,
        previous: String,
        address: String,
    },
    UpdateFailed {
        domain: String,
        record_id: u64,
        record_type: RecordType,
        attempted: String,
        error: String,
    },
    DomainFailed {
        domain: String,
        error: String,
    },
    DomainSummary {
        domain: String,
        updated_a: usize,
        updated_aaaa: usize,
        ipv4: String,
        ipv6: String,
        outcomes: Vec<Outcome>,
    },
    CycleFinished {
        succeeded: usize,
        failed: usize,
    },
}

/// Receiver of reconciliation events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ReconcileEvent);
}

/// Renders events as structured `tracing` records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: ReconcileEvent) {
        use tracing::{error, info, warn};

        match event {
            ReconcileEvent::CycleStarted { domains } => {
                info!(domains, "Starting reconciliation cycle");
            }
            ReconcileEvent::AddressesDiscovered { ipv4, ipv6 } => {
                info!(%ipv4, %ipv6, "Current public addresses");
            }
            ReconcileEvent::DiscoveryFailed { error } => {
                error!(%error, "Could not determine current IP address, skipping cycle");
            }
            ReconcileEvent::ZoneResolved {
                domain,
                zone_query,
                zone_id,
            } => {
                info!(%domain, %zone_query, zone_id, "Zone resolved");
            }
            ReconcileEvent::RecordsFiltered {
                domain,
                total,
                matching,
            } => {
                info!(%domain, total, matching, "Filtered zone records");
            }
            ReconcileEvent::DuplicateFound {
                domain,
                record_type,
                kept,
                extra,
            } => {
                warn!(%domain, %record_type, kept, ?extra, "Duplicate records found");
            }
            ReconcileEvent::RecordDeleted { domain, record_id } => {
                info!(%domain, record_id, "Deleted duplicate record");
            }
            ReconcileEvent::DeleteFailed {
                domain,
                record_id,
                error,
            } => {
                error!(%domain, record_id, %error, "Could not delete duplicate record");
            }
            ReconcileEvent::RecordCreated {
                domain,
                record_type,
                record_id,
                address,
            } => {
                info!(%domain, %record_type, record_id, %address, "Created record");
            }
            ReconcileEvent::CreateFailed {
                domain,
                record_type,
                error,
            } => {
                error!(%domain, %record_type, %error, "Could not create record");
            }
            ReconcileEvent::NoRecords { domain } => {
                warn!(%domain, "No matching records found");
            }
            ReconcileEvent::RecordUpToDate {
                domain,
                record_id,
                record_type,
                address,
            } => {
                info!(%domain, record_id, %record_type, %address, "Record up to date");
            }
            ReconcileEvent::RecordUpdated {
                domain,
                record_id,
                record_type,
                previous,
                address,
            } => {
                info!(%domain, record_id, %record_type, %previous, %address, "Updated record");
            }
            ReconcileEvent::UpdateFailed {
                domain,
                record_id,
                record_type,
                attempted,
                error,
            } => {
                error!(%domain, record_id, %record_type, %attempted, %error, "Could not update record");
            }
            ReconcileEvent::DomainFailed { domain, error } => {
                error!(%domain, %error, "Error processing domain");
            }
            ReconcileEvent::DomainSummary {
                domain,
                updated_a,
                updated_aaaa,
                ipv4,
                ipv6,
                outcomes,
            } => {
                if outcomes.iter().any(|o| matches!(o, Outcome::Failed(_))) {
                    warn!(%domain, updated_a, updated_aaaa, %ipv4, %ipv6, ?outcomes, "Domain reconciled with failures");
                } else {
                    info!(%domain, updated_a, updated_aaaa, %ipv4, %ipv6, ?outcomes, "Domain reconciled");
                }
            }
            ReconcileEvent::CycleFinished { succeeded, failed } => {
                info!(succeeded, failed, "Reconciliation cycle finished");
            }
        }
    }
}

/// Keeps every event in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: std::sync::Mutex<Vec<ReconcileEvent>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn events(&self) -> Vec<ReconcileEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn emit(&self, event: ReconcileEvent) {
        self.events.lock().unwrap().push(event);
    }
}
