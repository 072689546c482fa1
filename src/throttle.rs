//! Per-network submission counter kept in Redis.
//!
//! The RSVP form is public, so a client that keeps re-submitting is asked to
//! slow down. Counters expire a day after the first submission.

use std::net::IpAddr;

use rocket_db_pools::deadpool_redis::redis::{self, AsyncCommands, RedisError};
use rocket_db_pools::{deadpool_redis, Connection, Database};
use serde::Deserialize;
use thiserror::Error;

const WINDOW_SECS: i64 = 86_400;

#[derive(Database)]
#[database("redis")]
pub struct Redis(deadpool_redis::Pool);

#[derive(Debug, Error)]
pub enum ThrottleError {
    #[error("redis error: {0}")]
    Redis(#[from] RedisError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    pub max_submissions: i64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        ThrottleConfig { max_submissions: 10 }
    }
}

/// IPv4 clients are counted per address, IPv6 clients per /64.
pub fn network_of(client_ip: Option<IpAddr>) -> String {
    match client_ip {
        Some(IpAddr::V4(ip4)) => ip4.to_string(),
        Some(IpAddr::V6(ip6)) => {
            let ipb = ip6.segments();
            format!("{:04x}:{:04x}:{:04x}:{:04x}::/64", ipb[0], ipb[1], ipb[2], ipb[3])
        }
        None => String::from("unknown"),
    }
}

fn key_for(network: &str) -> String {
    format!("rsvp:submissions:{network}")
}

/// Counts one more submission and returns the new count. The window is
/// (re)started whenever the key has no expiry, so a failed `EXPIRE` is
/// retried on the next submission.
pub async fn record_submission(r: &mut Connection<Redis>, network: &str) -> Result<i64, ThrottleError> {
    let key = key_for(network);
    let (count, ttl): (i64, i64) = redis::pipe()
        .atomic()
        .incr(&key, 1)
        .ttl(&key)
        .query_async(&mut **r)
        .await?;
    if needs_expiry(ttl) {
        let _: i64 = r.expire(&key, WINDOW_SECS).await?;
    }
    Ok(count)
}

// TTL answers -1 for a key without expiry and -2 for a missing key.
fn needs_expiry(ttl: i64) -> bool {
    ttl < 0
}

fn within_limit(count: i64, config: &ThrottleConfig) -> bool {
    count <= config.max_submissions
}

/// Claims a submission slot for the client's network. Returns false once the
/// network has used up its submissions. Redis trouble never blocks an RSVP.
pub async fn claim_submission(r: &mut Connection<Redis>, network: &str, config: &ThrottleConfig) -> bool {
    match record_submission(r, network).await {
        Ok(count) => within_limit(count, config),
        Err(e) => {
            log::warn!("could not count submission from {network}: {e}");
            true
        }
    }
}
