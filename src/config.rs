use serde::{Deserialize, Serialize};

use crate::notify::NotifyConfig;
use crate::throttle::ThrottleConfig;

/// Application settings, extracted from Rocket's figment (`Rocket.toml`,
/// `ROCKET_*` environment variables).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub event: EventDetails,
    #[serde(default)]
    pub notify: Option<NotifyConfig>,
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

/// What the invitation page shows about the party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub title: String,
    pub hosts: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub address: String,
    #[serde(default)]
    pub description: String,
}
