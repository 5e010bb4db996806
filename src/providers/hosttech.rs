//! Hosttech DNS API client.
//!
//! API documentation: <https://api.ns1.hosttech.eu/api/documentation/>

use super::{Record, RecordDraft, RecordType, Zone, ZoneApi, DEFAULT_TTL};
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://api.ns1.hosttech.eu";

/// Longest slice of an error body carried into a `DdnsError::Api`.
const MAX_ERROR_BODY: usize = 200;

/// Hosttech zone API client.
pub struct HosttechClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl fmt::Debug for HosttechClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HosttechClient")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum WireRecord {
    A {
        id: u64,
        #[serde(default)]
        name: Option<String>,
        #[serde(default = "default_ttl")]
        ttl: u32,
        ipv4: String,
    },
    AAAA {
        id: u64,
        #[serde(default)]
        name: Option<String>,
        #[serde(default = "default_ttl")]
        ttl: u32,
        ipv6: String,
    },
    #[serde(other)]
    Other,
}

impl WireRecord {
    fn into_record(self) -> Option<Record> {
        match self {
            WireRecord::A { id, name, ttl, ipv4 } => Some(Record {
                id,
                record_type: RecordType::A,
                name,
                ttl,
                address: ipv4,
            }),
            WireRecord::AAAA { id, name, ttl, ipv6 } => Some(Record {
                id,
                record_type: RecordType::AAAA,
                name,
                ttl,
                address: ipv6,
            }),
            WireRecord::Other => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum WirePayload<'a> {
    A {
        name: Option<&'a str>,
        ttl: u32,
        ipv4: &'a str,
    },
    AAAA {
        name: Option<&'a str>,
        ttl: u32,
        ipv6: &'a str,
    },
}

impl<'a> From<&'a RecordDraft> for WirePayload<'a> {
    fn from(draft: &'a RecordDraft) -> Self {
        let name = draft.name.as_deref();
        match draft.record_type {
            RecordType::A => WirePayload::A {
                name,
                ttl: draft.ttl,
                ipv4: &draft.address,
            },
            RecordType::AAAA => WirePayload::AAAA {
                name,
                ttl: draft.ttl,
                ipv6: &draft.address,
            },
        }
    }
}

impl HosttechClient {
    /// Create a new client against the public Hosttech API.
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL.to_string())
    }

    /// Create with custom base URL (for testing).
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn records_url(&self, zone: u64) -> String {
        format!("{}/api/user/v1/zones/{}/records", self.base_url, zone)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
    }

    fn single_record(data: WireRecord) -> Result<Record> {
        data.into_record().ok_or_else(|| {
            DdnsError::InvalidResponse("provider returned a record that is not A/AAAA".to_string())
        })
    }
}

/// Pass the response through if its status is one of `accepted`.
async fn expect_status(
    response: reqwest::Response,
    accepted: &[StatusCode],
) -> Result<reqwest::Response> {
    let status = response.status();
    if accepted.contains(&status) {
        return Ok(response);
    }

    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }

    Err(DdnsError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ZoneApi for HosttechClient {
    async fn find_zone(&self, query: &str) -> Result<Zone> {
        let url = format!("{}/api/user/v1/zones", self.base_url);

        let response = self
            .request(reqwest::Method::GET, &url)
            .query(&[("query", query), ("limit", "1")])
            .send()
            .await?;
        let response = expect_status(response, &[StatusCode::OK]).await?;

        let envelope: Envelope<Vec<Zone>> = response.json().await?;
        let zone = envelope
            .data
            .into_iter()
            .next()
            .ok_or_else(|| DdnsError::ZoneNotFound(query.to_string()))?;

        tracing::debug!(query, zone_id = zone.id, zone = %zone.name, "Resolved zone");
        Ok(zone)
    }

    async fn list_records(&self, zone: u64) -> Result<Vec<Record>> {
        let response = self
            .request(reqwest::Method::GET, &self.records_url(zone))
            .send()
            .await?;
        let response = expect_status(response, &[StatusCode::OK]).await?;

        let envelope: Envelope<Vec<WireRecord>> = response.json().await?;
        let total = envelope.data.len();
        let records: Vec<Record> = envelope
            .data
            .into_iter()
            .filter_map(WireRecord::into_record)
            .collect();

        tracing::debug!(
            zone_id = zone,
            total,
            address_records = records.len(),
            "Fetched zone records"
        );
        Ok(records)
    }

    async fn create_record(&self, zone: u64, draft: &RecordDraft) -> Result<Record> {
        let response = self
            .request(reqwest::Method::POST, &self.records_url(zone))
            .json(&WirePayload::from(draft))
            .send()
            .await?;
        let response = expect_status(response, &[StatusCode::OK, StatusCode::CREATED]).await?;

        let envelope: Envelope<WireRecord> = response.json().await?;
        Self::single_record(envelope.data)
    }

    async fn update_record(&self, zone: u64, id: u64, draft: &RecordDraft) -> Result<Record> {
        let url = format!("{}/{}", self.records_url(zone), id);

        let response = self
            .request(reqwest::Method::PUT, &url)
            .json(&WirePayload::from(draft))
            .send()
            .await?;
        let response = expect_status(response, &[StatusCode::OK]).await?;

        let envelope: Envelope<WireRecord> = response.json().await?;
        Self::single_record(envelope.data)
    }

    async fn delete_record(&self, zone: u64, id: u64) -> Result<()> {
        let url = format!("{}/{}", self.records_url(zone), id);

        let response = self
            .request(reqwest::Method::DELETE, &url)
            .send()
            .await?;
        expect_status(response, &[StatusCode::NO_CONTENT]).await?;
        Ok(())
    }
}
