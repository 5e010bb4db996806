//! Zone API client: record model and the Hosttech implementation.

mod hosttech;

#[cfg(test)]
mod tests;

pub use hosttech::{HosttechClient, DEFAULT_BASE_URL};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// TTL used when creating a record that does not exist yet.
pub const DEFAULT_TTL: u32 = 3600;

/// Address family of a record or a discovered IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpFamily {
    V4,
    V6,
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFamily::V4 => f.write_str("IPv4"),
            IpFamily::V6 => f.write_str("IPv6"),
        }
    }
}

/// The record types this client manages. Everything else in a zone is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    A,
    AAAA,
}

impl RecordType {
    /// Both managed types, in processing order.
    pub const ALL: [RecordType; 2] = [RecordType::A, RecordType::AAAA];

    /// Name of the JSON field carrying the address for this type.
    pub fn address_field(self) -> &'static str {
        match self {
            RecordType::A => "ipv4",
            RecordType::AAAA => "ipv6",
        }
    }

    pub fn family(self) -> IpFamily {
        match self {
            RecordType::A => IpFamily::V4,
            RecordType::AAAA => IpFamily::V6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DNS zone owning a domain's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// An A or AAAA record as stored by the provider.
///
/// `address` always comes from the field matching `record_type`; the
/// client rejects records where that field is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub record_type: RecordType,
    /// `None` when the provider sent `null`; kept so updates can echo it.
    pub name: Option<String>,
    pub ttl: u32,
    pub address: String,
}

impl Record {
    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Body of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub record_type: RecordType,
    pub name: Option<String>,
    pub ttl: u32,
    pub address: String,
}

impl RecordDraft {
    /// A new record with the default TTL.
    pub fn create(record_type: RecordType, name: &str, address: &str) -> Self {
        Self {
            record_type,
            name: Some(name.to_string()),
            ttl: DEFAULT_TTL,
            address: address.to_string(),
        }
    }

    /// Same type, name and TTL as `record`, with a new address.
    pub fn update(record: &Record, address: &str) -> Self {
        Self {
            record_type: record.record_type,
            name: record.name.clone(),
            ttl: record.ttl,
            address: address.to_string(),
        }
    }
}

/// Operations the reconciler needs from a zone-hosting API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Resolve the zone for a lookup key. Fails with `ZoneNotFound` on zero matches.
    async fn find_zone(&self, query: &str) -> Result<Zone>;

    /// All A/AAAA records in the zone.
    async fn list_records(&self, zone: u64) -> Result<Vec<Record>>;

    /// Create a record, returning what the provider stored.
    async fn create_record(&self, zone: u64, draft: &RecordDraft) -> Result<Record>;

    /// Replace a record's content, returning what the provider stored.
    async fn update_record(&self, zone: u64, id: u64, draft: &RecordDraft) -> Result<Record>;

    /// Delete a record.
    async fn delete_record(&self, zone: u64, id: u64) -> Result<()>;
}
