//! Record reconciliation.
//!
//! One cycle discovers the current addresses once, then walks the
//! configured domains one after another:
//!
//! 1. classify the domain and resolve its zone
//! 2. fetch and filter the zone's records, remove duplicates per type
//! 3. re-fetch, create missing A/AAAA records
//! 4. re-fetch, update every record whose address is stale
//!
//! The provider is re-read after every mutating step instead of patching
//! the local copy. A failing domain is reported and the cycle moves on.

pub mod classify;
pub mod dedup;
pub mod filter;
pub mod plan;


pub use classify::{classify, Classification, DomainKind};
pub use dedup::{deduplicate, DedupOutcome};
pub use filter::filter_records;
pub use plan::{needs_update, plan, verify_update, Action};

use crate::detector::IpSource;
use crate::error::Result;
use crate::events::{EventSink, ReconcileEvent};
use crate::providers::{IpFamily, Record, RecordDraft, RecordType, Zone, ZoneApi};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Tag describing what happened to a domain in one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "reason")]
pub enum Outcome {
    NoAction,
    Created,
    Updated,
    Deduplicated,
    Failed(String),
}

/// Mutations performed for one domain.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DomainActions {
    pub deleted: usize,
    pub delete_failures: usize,
    pub created: Vec<RecordType>,
    pub create_failures: usize,
    pub updated_a: usize,
    pub updated_aaaa: usize,
    pub update_failures: usize,
}

/// Per-domain result of a cycle.
#[derive(Debug, Clone, Serialize)]
pub struct DomainReport {
    pub domain: String,
    pub zone: Option<Zone>,
    pub actions: DomainActions,
    /// Set when the domain could not be reconciled at all.
    pub error: Option<String>,
}

impl DomainActions {
    /// Mutations that were attempted but did not succeed, e.g. `"2 create(s) failed"`.
    pub fn failure_summary(&self) -> Option<String> {
        let failed: Vec<String> = [
            (self.delete_failures, "delete"),
            (self.create_failures, "create"),
            (self.update_failures, "update"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, op)| format!("{} {}(s) failed", count, op))
        .collect();

        (!failed.is_empty()).then(|| failed.join(", "))
    }
}

impl DomainReport {
    /// Whether the domain could not be reconciled at all.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        if self.actions.deleted > 0 {
            outcomes.push(Outcome::Deduplicated);
        }
        if !self.actions.created.is_empty() {
            outcomes.push(Outcome::Created);
        }
        if self.actions.updated_a + self.actions.updated_aaaa > 0 {
            outcomes.push(Outcome::Updated);
        }
        let reason = match (&self.error, self.actions.failure_summary()) {
            (Some(error), Some(ops)) => Some(format!("{}; {}", error, ops)),
            (Some(error), None) => Some(error.clone()),
            (None, ops) => ops,
        };
        if let Some(reason) = reason {
            outcomes.push(Outcome::Failed(reason));
        }
        if outcomes.is_empty() {
            outcomes.push(Outcome::NoAction);
        }
        outcomes
    }
}

/// Summary of one full pass over the configured domains.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub ipv4: String,
    pub ipv6: String,
    pub domains: Vec<DomainReport>,
}

impl CycleReport {
    pub fn failed(&self) -> usize {
        self.domains.iter().filter(|d| d.is_failed()).count()
    }
}

/// Drives reconciliation of all configured domains against a zone API.
pub struct Reconciler {
    api: Box<dyn ZoneApi>,
    ip_source: Box<dyn IpSource>,
    sink: Arc<dyn EventSink>,
    domains: Vec<String>,
}

impl Reconciler {
    pub fn new(
        api: Box<dyn ZoneApi>,
        ip_source: Box<dyn IpSource>,
        sink: Arc<dyn EventSink>,
        domains: Vec<String>,
    ) -> Self {
        Self {
            api,
            ip_source,
            sink,
            domains,
        }
    }

    /// Run one reconciliation cycle.
    ///
    /// Only a failed address discovery is returned as an error, in which
    /// case no domain is touched. Domain failures end up in the report.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let started_at = Utc::now();
        self.sink.emit(ReconcileEvent::CycleStarted {
            domains: self.domains.len(),
        });

        let (ipv4, ipv6) = match self.discover().await {
            Ok(addresses) => addresses,
            Err(e) => {
                self.sink.emit(ReconcileEvent::DiscoveryFailed {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };
        self.sink.emit(ReconcileEvent::AddressesDiscovered {
            ipv4: ipv4.clone(),
            ipv6: ipv6.clone(),
        });

        let mut domains = Vec::with_capacity(self.domains.len());
        for domain in &self.domains {
            domains.push(self.reconcile_domain(domain, &ipv4, &ipv6).await);
        }

        let failed = domains.iter().filter(|d| d.is_failed()).count();
        self.sink.emit(ReconcileEvent::CycleFinished {
            succeeded: domains.len() - failed,
            failed,
        });

        Ok(CycleReport {
            started_at,
            ipv4,
            ipv6,
            domains,
        })
    }

    async fn discover(&self) -> Result<(String, String)> {
        let ipv4 = self.ip_source.current_ip(IpFamily::V4).await?;
        let ipv6 = self.ip_source.current_ip(IpFamily::V6).await?;
        Ok((ipv4, ipv6))
    }

    /// Reconcile a single domain. Never fails; errors are captured in the report.
    pub async fn reconcile_domain(&self, domain: &str, ipv4: &str, ipv6: &str) -> DomainReport {
        let rule = classify(domain);
        let mut report = DomainReport {
            domain: rule.domain.clone(),
            zone: None,
            actions: DomainActions::default(),
            error: None,
        };

        if let Err(e) = self.try_reconcile(&rule, ipv4, ipv6, &mut report).await {
            self.sink.emit(ReconcileEvent::DomainFailed {
                domain: rule.domain.clone(),
                error: e.to_string(),
            });
            report.error = Some(e.to_string());
        }

        self.sink.emit(ReconcileEvent::DomainSummary {
            domain: report.domain.clone(),
            updated_a: report.actions.updated_a,
            updated_aaaa: report.actions.updated_aaaa,
            ipv4: ipv4.to_string(),
            ipv6: ipv6.to_string(),
            outcomes: report.outcomes(),
        });

        report
    }

    async fn try_reconcile(
        &self,
        rule: &Classification,
        ipv4: &str,
        ipv6: &str,
        report: &mut DomainReport,
    ) -> Result<()> {
        let address_for = |record_type: RecordType| match record_type {
            RecordType::A => ipv4,
            RecordType::AAAA => ipv6,
        };

        let zone = self.api.find_zone(&rule.zone_query).await?;
        self.sink.emit(ReconcileEvent::ZoneResolved {
            domain: rule.domain.clone(),
            zone_query: rule.zone_query.clone(),
            zone_id: zone.id,
        });
        let zone_id = zone.id;
        report.zone = Some(zone);

        let records = self.fetch_filtered(zone_id, rule).await?;
        for record_type in RecordType::ALL {
            let outcome = deduplicate(
                self.api.as_ref(),
                self.sink.as_ref(),
                zone_id,
                &records,
                record_type,
                rule,
            )
            .await;
            report.actions.deleted += outcome.deleted;
            report.actions.delete_failures += outcome.attempted - outcome.deleted;
        }

        let records = self.fetch_filtered(zone_id, rule).await?;
        for record_type in RecordType::ALL {
            if plan(&records, rule, record_type, address_for(record_type)) == Action::Create {
                self.create(zone_id, rule, record_type, address_for(record_type), report)
                    .await;
            }
        }

        let records = self.fetch_filtered(zone_id, rule).await?;
        if records.is_empty() {
            self.sink.emit(ReconcileEvent::NoRecords {
                domain: rule.domain.clone(),
            });
            return Ok(());
        }

        for record in &records {
            let address = address_for(record.record_type);
            if !needs_update(record, address) {
                self.sink.emit(ReconcileEvent::RecordUpToDate {
                    domain: rule.domain.clone(),
                    record_id: record.id,
                    record_type: record.record_type,
                    address: record.address.clone(),
                });
                continue;
            }
            self.update(zone_id, rule, record, address, report).await;
        }

        Ok(())
    }

    async fn fetch_filtered(&self, zone: u64, rule: &Classification) -> Result<Vec<Record>> {
        let all = self.api.list_records(zone).await?;
        let filtered = filter_records(&all, rule);
        self.sink.emit(ReconcileEvent::RecordsFiltered {
            domain: rule.domain.clone(),
            total: all.len(),
            matching: filtered.len(),
        });
        Ok(filtered)
    }

    async fn create(
        &self,
        zone: u64,
        rule: &Classification,
        record_type: RecordType,
        address: &str,
        report: &mut DomainReport,
    ) {
        let draft = RecordDraft::create(record_type, &rule.record_name, address);
        match self.api.create_record(zone, &draft).await {
            Ok(created) => {
                report.actions.created.push(record_type);
                self.sink.emit(ReconcileEvent::RecordCreated {
                    domain: rule.domain.clone(),
                    record_type,
                    record_id: created.id,
                    address: draft.address,
                });
            }
            Err(e) => {
                report.actions.create_failures += 1;
                self.sink.emit(ReconcileEvent::CreateFailed {
                    domain: rule.domain.clone(),
                    record_type,
                    error: e.to_string(),
                });
            }
        }
    }

    async fn update(
        &self,
        zone: u64,
        rule: &Classification,
        record: &Record,
        address: &str,
        report: &mut DomainReport,
    ) {
        let draft = RecordDraft::update(record, address);
        let result = match self.api.update_record(zone, record.id, &draft).await {
            Ok(echoed) => verify_update(record.id, &draft, &echoed),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                match record.record_type {
                    RecordType::A => report.actions.updated_a += 1,
                    RecordType::AAAA => report.actions.updated_aaaa += 1,
                }
                self.sink.emit(ReconcileEvent::RecordUpdated {
                    domain: rule.domain.clone(),
                    record_id: record.id,
                    record_type: record.record_type,
                    previous: record.address.clone(),
                    address: draft.address,
                });
            }
            Err(e) => {
                report.actions.update_failures += 1;
                self.sink.emit(ReconcileEvent::UpdateFailed {
                    domain: rule.domain.clone(),
                    record_id: record.id,
                    record_type: record.record_type,
                    attempted: draft.address,
                    error: e.to_string(),
                });
            }
        }
    }
}
