use crate::constants::{QUERY_DEBUG, QUERY_SEED, QUERY_TIER};
use inkburst_core::tier::DeviceTier;

/// Page configuration read from the URL query string.
///
/// Fields:
/// - `seed`: fixed seed instead of today's (`?seed=20250115`)
/// - `tier`: forced device tier for previews (`?tier=mobile`)
/// - `debug`: raise the log level to `Debug`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageConfig {
    pub seed: Option<i32>,
    pub tier: Option<DeviceTier>,
    pub debug: bool,
}

impl PageConfig {
    /// Parse `location.search`, with or without the leading `?`. Unknown
    /// keys and unparsable values are ignored; the last occurrence wins.
    pub fn from_query(query: &str) -> Self {
        let mut cfg = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                k if k == QUERY_SEED => {
                    if let Ok(seed) = value.trim().parse::<i32>() {
                        cfg.seed = Some(seed);
                    }
                }
                k if k == QUERY_TIER => {
                    if let Some(tier) = DeviceTier::from_name(&value.to_ascii_lowercase()) {
                        cfg.tier = Some(tier);
                    }
                }
                k if k == QUERY_DEBUG => {
                    cfg.debug = !matches!(value, "0" | "false");
                }
                _ => {}
            }
        }
        cfg
    }

    pub fn log_level(&self) -> log::Level {
        if self.debug {
            log::Level::Debug
        } else {
            log::Level::Info
        }
    }
}
