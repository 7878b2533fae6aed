// Host-side tests for query-string configuration.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod config {
    include!("../src/config.rs");
}

use config::PageConfig;
use inkburst_core::DeviceTier;

#[test]
fn empty_query_is_default() {
    assert_eq!(PageConfig::from_query(""), PageConfig::default());
    assert_eq!(PageConfig::from_query("?"), PageConfig::default());
    assert_eq!(PageConfig::default().log_level(), log::Level::Info);
}

#[test]
fn seed_tier_and_debug_are_read() {
    let cfg = PageConfig::from_query("?seed=20250115&tier=Mobile&debug");
    assert_eq!(cfg.seed, Some(20250115));
    assert_eq!(cfg.tier, Some(DeviceTier::Mobile));
    assert!(cfg.debug);
    assert_eq!(cfg.log_level(), log::Level::Debug);
}

#[test]
fn bad_values_are_ignored() {
    let cfg = PageConfig::from_query("seed=tomorrow&tier=watch&debug=0&utm_source=x");
    assert_eq!(cfg, PageConfig::default());
}

#[test]
fn last_occurrence_wins() {
    let cfg = PageConfig::from_query("seed=1&seed=-7&tier=wide&tier=nope");
    assert_eq!(cfg.seed, Some(-7));
    assert_eq!(cfg.tier, Some(DeviceTier::Wide));
}
