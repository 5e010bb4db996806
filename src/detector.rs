//! Public IP detection.

use crate::error::{DdnsError, Result};
use crate::providers::IpFamily;
use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of the current public address for a family.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Current public address, normalized (see [`normalize_ip`]).
    async fn current_ip(&self, family: IpFamily) -> Result<String>;
}

/// Normalize an address string for comparison.
///
/// Drops any zone-id suffix (`%eth0`) and surrounding whitespace. Valid
/// addresses are rewritten in canonical form so `2001:DB8:0::1` and
/// `2001:db8::1` compare equal; anything else is returned trimmed.
pub fn normalize_ip(raw: &str) -> String {
    let trimmed = raw.split('%').next().unwrap_or_default().trim();
    match trimmed.parse::<IpAddr>() {
        Ok(ip) => ip.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

pub fn default_ipv4_services() -> Vec<String> {
    vec![
        "https://checkip.amazonaws.com".to_string(),
        "https://api.ipify.org".to_string(),
    ]
}

pub fn default_ipv6_services() -> Vec<String> {
    vec![
        "https://ifconfig.me/ip".to_string(),
        "https://api6.ipify.org".to_string(),
    ]
}

/// IP detector with per-family fallback services.
pub struct IpDetector {
    client: reqwest::Client,
    ipv4_services: Vec<String>,
    ipv6_services: Vec<String>,
}

impl IpDetector {
    /// Create a new IP detector with default services.
    pub fn new() -> Self {
        Self::with_services(default_ipv4_services(), default_ipv6_services())
    }

    /// Create a new IP detector with custom services.
    pub fn with_services(ipv4_services: Vec<String>, ipv6_services: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            ipv4_services,
            ipv6_services,
        }
    }

    fn services(&self, family: IpFamily) -> &[String] {
        match family {
            IpFamily::V4 => &self.ipv4_services,
            IpFamily::V6 => &self.ipv6_services,
        }
    }

    /// Try a single IP detection service.
    async fn try_service(&self, url: &str, family: IpFamily) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DdnsError::IpDetection(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let text = response.text().await?;
        let ip = normalize_ip(&text);

        match ip.parse::<IpAddr>() {
            Ok(IpAddr::V4(_)) if family == IpFamily::V4 => Ok(ip),
            Ok(IpAddr::V6(_)) if family == IpFamily::V6 => Ok(ip),
            Ok(_) => Err(DdnsError::IpDetection(format!(
                "{} returned {} which is not an {} address",
                url, ip, family
            ))),
            Err(_) => Err(DdnsError::IpDetection(format!(
                "Invalid IP response from {}: {:?}",
                url, ip
            ))),
        }
    }
}

impl Default for IpDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpSource for IpDetector {
    async fn current_ip(&self, family: IpFamily) -> Result<String> {
        for service in self.services(family) {
            match self.try_service(service, family).await {
                Ok(ip) => {
                    tracing::debug!("Detected {} {} from {}", family, ip, service);
                    return Ok(ip);
                }
                Err(e) => {
                    tracing::warn!("{} service {} failed: {}", family, service, e);
                }
            }
        }

        Err(DdnsError::IpDetection(format!(
            "All {} detection services failed",
            family
        )))
    }
}
