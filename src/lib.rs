//! # hosttech-ddns
//!
//! A dynamic DNS client for the Hosttech nameserver API.
//!
//! ## Features
//!
//! - Root, subdomain and wildcard (`*.example.com`) domains
//! - Keeps exactly one A and one AAAA record per domain, creating missing
//!   ones and removing duplicates
//! - Updates records only when their address differs from the current
//!   public IPv4/IPv6 address, and verifies what the provider stored
//! - Periodic or single-run operation
//!
//! ## Usage
//!
//! ```bash
//! # Update every 5 minutes
//! hosttech-ddns --token "$TOKEN" -d example.com -d '*.example.com'
//!
//! # Single run, configured through the environment
//! TOKEN=... DOMAINS=example.com,vpn.example.com hosttech-ddns --no-interval
//! ```

pub mod config;
pub mod daemon;
pub mod detector;
pub mod error;
pub mod events;
pub mod providers;
pub mod reconcile;

pub use config::Config;
pub use detector::{IpDetector, IpSource};
pub use error::{DdnsError, Result};
pub use reconcile::Reconciler;
