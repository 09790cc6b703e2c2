//! Configuration loading with environment overrides.
//!
//! Environment mutation is process-global, so every override lives in one
//! test function instead of being spread across parallel tests.

use std::path::PathBuf;

use berth_core::config::{BerthConfig, RatioMode, StorageBackend};

#[test]
fn environment_overrides_apply_and_bad_values_fall_back() {
    // SAFETY: no other test in this binary touches these variables.
    unsafe {
        std::env::set_var("BERTH_PAGE_SIZE", "50");
        std::env::set_var("BERTH_RATIO_MODE", "seedtime");
        std::env::set_var("BERTH_MIN_RATIO", "0.75");
        std::env::set_var("BERTH_MIN_SEEDTIME", "172800");
        std::env::set_var("BERTH_STORAGE_BACKEND", "memory");
        std::env::set_var("BERTH_ARTIFACT_ROOT", "/var/lib/berth/torrents");
    }

    let config = BerthConfig::from_env();
    assert_eq!(config.catalog.page_size, 50);
    assert_eq!(config.ratio.mode, RatioMode::SeedTime);
    assert_eq!(config.ratio.min_ratio, 0.75);
    assert_eq!(config.ratio.min_seed_time, 172_800);
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(
        config.storage.artifact_root,
        PathBuf::from("/var/lib/berth/torrents")
    );

    // Unparseable values fall back to the defaults.
    unsafe {
        std::env::set_var("BERTH_PAGE_SIZE", "many");
        std::env::set_var("BERTH_RATIO_MODE", "sometimes");
    }
    let fallback = BerthConfig::from_env();
    assert_eq!(fallback.catalog.page_size, 25);
    assert_eq!(fallback.ratio.mode, RatioMode::Full);

    unsafe {
        for name in [
            "BERTH_PAGE_SIZE",
            "BERTH_RATIO_MODE",
            "BERTH_MIN_RATIO",
            "BERTH_MIN_SEEDTIME",
            "BERTH_STORAGE_BACKEND",
            "BERTH_ARTIFACT_ROOT",
        ] {
            std::env::remove_var(name);
        }
    }
}

#[test]
fn configuration_serializes_for_diagnostics() {
    let config = BerthConfig::for_testing();
    let json = serde_json::to_value(&config).unwrap();

    assert_eq!(json["storage"]["backend"], "memory");
    assert_eq!(json["ratio"]["mode"], "full");
    assert_eq!(json["catalog"]["page_size"], 25);
}
