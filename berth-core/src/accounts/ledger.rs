//! Contribution accounting over account counters.
//!
//! Stateless evaluators for ratio and seed-time requirements, the display
//! formatters whose bucket boundaries the tracker UI depends on, and passkey
//! generation. Everything here is a pure function of the `Account` value it
//! receives; the backing store owns persistence and passkey uniqueness.

use rand::Rng;
use rand::distr::Alphanumeric;

use super::Account;
use crate::config::{RatioConfig, RatioMode};

/// Length of generated passkeys.
pub const PASSKEY_LENGTH: usize = 32;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// An account's contribution ratio.
///
/// Infinite when nothing has been downloaded; otherwise uploaded/downloaded
/// rounded to two decimals. Requirement checks compare the rounded value,
/// matching what is displayed to the account holder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Infinite,
    Finite(f64),
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ratio::Infinite => write!(f, "Inf"),
            Ratio::Finite(value) => write!(f, "{value:.2}"),
        }
    }
}

/// Computes an account's contribution ratio.
pub fn ratio(account: &Account) -> Ratio {
    if account.downloaded == 0 {
        return Ratio::Infinite;
    }

    let raw = account.uploaded as f64 / account.downloaded as f64;
    Ratio::Finite((raw * 100.0).round() / 100.0)
}

/// Whether the account meets a minimum ratio. Infinite ratios always pass.
pub fn meets_ratio_requirement(account: &Account, min_ratio: f64) -> bool {
    match ratio(account) {
        Ratio::Infinite => true,
        Ratio::Finite(value) => value >= min_ratio,
    }
}

/// Whether the account has accumulated the minimum seed time.
pub fn meets_seed_time_requirement(account: &Account, min_seconds: u64) -> bool {
    account.seed_time >= min_seconds
}

/// Evaluates the requirement selected by the deployment's ratio mode.
///
/// Full enforces the ratio threshold, SeedTime the seed-time threshold, and
/// Off always passes. The individual evaluators stay available for callers
/// that apply their own policy.
pub fn meets_requirement(account: &Account, config: &RatioConfig) -> bool {
    match config.mode {
        RatioMode::Full => meets_ratio_requirement(account, config.min_ratio),
        RatioMode::Off => true,
        RatioMode::SeedTime => meets_seed_time_requirement(account, config.min_seed_time),
    }
}

/// Formats a byte count for contribution stats.
///
/// The unit is selected from the decimal digit count in groups of three and
/// the value divided by the matching power of 1024, always with two decimals:
/// 1_048_576 is "1.00 MB", 1000 is "0.98 KB". Counts past the table clamp
/// to PB.
pub fn format_bytes(bytes: u64) -> String {
    let digits = if bytes == 0 {
        1
    } else {
        bytes.ilog10() as usize + 1
    };
    let factor = ((digits - 1) / 3).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(factor as i32);

    format!("{value:.2} {}", UNITS[factor])
}

/// Formats cumulative seed time.
///
/// Buckets: "Ns" under a minute, "Nm" under an hour, "Hh Mm" under a day,
/// "Dd Hh" beyond, all with floor arithmetic.
pub fn format_seed_time(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 3600 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 86400 {
        return format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60);
    }

    format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
}

/// Generates a fresh 32-character alphanumeric passkey.
///
/// Uses the thread-local CSPRNG; uniqueness across accounts is enforced by
/// the backing store's unique index, not here.
pub fn generate_passkey() -> String {
    generate_passkey_with(&mut rand::rng())
}

/// Passkey generation over a caller-supplied generator.
///
/// Deterministic tests pass a seeded generator.
pub fn generate_passkey_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(PASSKEY_LENGTH)
        .map(char::from)
        .collect()
}

/// Assigns a passkey if the account has none, returning the current one.
pub fn ensure_passkey(account: &mut Account) -> &str {
    if account.passkey.is_none() {
        account.passkey = Some(generate_passkey());
    }
    account
        .passkey
        .as_deref()
        .unwrap_or_default()
}

/// Unconditionally replaces the account's passkey, returning the new value.
pub fn regenerate_passkey(account: &mut Account) -> String {
    let passkey = generate_passkey();
    account.passkey = Some(passkey.clone());
    passkey
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::accounts::AccountId;
    use crate::accounts::role::Role;

    fn account(uploaded: u64, downloaded: u64, seed_time: u64) -> Account {
        Account {
            id: AccountId::new(1),
            role: Role::Member,
            uploaded,
            downloaded,
            seed_time,
            passkey: None,
        }
    }

    #[test]
    fn ratio_is_infinite_without_downloads() {
        assert_eq!(ratio(&account(0, 0, 0)), Ratio::Infinite);
        assert_eq!(ratio(&account(5_000_000_000, 0, 0)), Ratio::Infinite);
    }

    #[test]
    fn ratio_rounds_to_two_decimals() {
        assert_eq!(
            ratio(&account(1_000_000, 2_000_000, 0)),
            Ratio::Finite(0.50)
        );
        assert_eq!(ratio(&account(1, 3, 0)), Ratio::Finite(0.33));
        assert_eq!(ratio(&account(2, 3, 0)), Ratio::Finite(0.67));
    }

    #[test]
    fn ratio_display() {
        assert_eq!(ratio(&account(10, 0, 0)).to_string(), "Inf");
        assert_eq!(ratio(&account(3, 2, 0)).to_string(), "1.50");
    }

    #[test]
    fn infinite_ratio_always_meets_requirement() {
        assert!(meets_ratio_requirement(&account(0, 0, 0), 100.0));
    }

    #[test]
    fn finite_ratio_compares_rounded_value() {
        assert!(meets_ratio_requirement(&account(1_000_000, 2_000_000, 0), 0.5));
        assert!(!meets_ratio_requirement(&account(999, 2_000, 0), 0.5));
        // 0.499 rounds up to 0.50 and passes.
        assert!(meets_ratio_requirement(&account(499, 1_000, 0), 0.5));
    }

    #[test]
    fn seed_time_requirement_is_inclusive() {
        assert!(meets_seed_time_requirement(&account(0, 0, 86_400), 86_400));
        assert!(!meets_seed_time_requirement(&account(0, 0, 86_399), 86_400));
    }

    #[test]
    fn requirement_dispatches_on_configured_mode() {
        let poor_ratio = account(1, 100, 500_000);
        let low_seed_time = account(100, 1, 10);

        let full = RatioConfig {
            mode: RatioMode::Full,
            ..RatioConfig::default()
        };
        let off = RatioConfig {
            mode: RatioMode::Off,
            ..RatioConfig::default()
        };
        let seed_time = RatioConfig {
            mode: RatioMode::SeedTime,
            ..RatioConfig::default()
        };

        assert!(!meets_requirement(&poor_ratio, &full));
        assert!(meets_requirement(&poor_ratio, &off));
        assert!(meets_requirement(&poor_ratio, &seed_time));

        assert!(meets_requirement(&low_seed_time, &full));
        assert!(meets_requirement(&low_seed_time, &off));
        assert!(!meets_requirement(&low_seed_time, &seed_time));
    }

    #[test]
    fn byte_formatting_buckets() {
        assert_eq!(format_bytes(0), "0.00 B");
        assert_eq!(format_bytes(999), "999.00 B");
        assert_eq!(format_bytes(1000), "0.98 KB");
        assert_eq!(format_bytes(1_048_576), "1.00 MB");
        assert_eq!(format_bytes(1_073_741_824), "1.00 GB");
        assert_eq!(format_bytes(1_099_511_627_776), "1.00 TB");
    }

    #[test]
    fn seed_time_formatting_buckets() {
        assert_eq!(format_seed_time(45), "45s");
        assert_eq!(format_seed_time(59), "59s");
        assert_eq!(format_seed_time(60), "1m");
        assert_eq!(format_seed_time(125), "2m");
        assert_eq!(format_seed_time(3600), "1h 0m");
        assert_eq!(format_seed_time(7325), "2h 2m");
        assert_eq!(format_seed_time(86400), "1d 0h");
        assert_eq!(format_seed_time(90000), "1d 1h");
    }

    #[test]
    fn generated_passkeys_are_32_alphanumeric_chars() {
        let passkey = generate_passkey();
        assert_eq!(passkey.len(), PASSKEY_LENGTH);
        assert!(passkey.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let first = generate_passkey_with(&mut ChaCha8Rng::seed_from_u64(7));
        let second = generate_passkey_with(&mut ChaCha8Rng::seed_from_u64(7));
        let other = generate_passkey_with(&mut ChaCha8Rng::seed_from_u64(8));

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn ensure_passkey_assigns_only_when_absent() {
        let mut fresh = account(0, 0, 0);
        let assigned = ensure_passkey(&mut fresh).to_string();
        assert_eq!(assigned.len(), PASSKEY_LENGTH);
        assert_eq!(ensure_passkey(&mut fresh), assigned);

        let mut existing = account(0, 0, 0);
        existing.passkey = Some("already-set-credential-0123456789".to_string());
        assert_eq!(
            ensure_passkey(&mut existing),
            "already-set-credential-0123456789"
        );
    }

    #[test]
    fn regenerate_passkey_always_replaces() {
        let mut subject = account(0, 0, 0);
        let first = regenerate_passkey(&mut subject);
        let second = regenerate_passkey(&mut subject);

        assert_ne!(first, second);
        assert_eq!(subject.passkey.as_deref(), Some(second.as_str()));
    }
}
