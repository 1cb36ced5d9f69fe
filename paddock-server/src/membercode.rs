//! Member code allocation
//!
//! A member code is a prefix plus a zero-padded sequence number: `BTC0007`.
//! Registration allocates under the club prefix; the admin tier-change path
//! allocates under hyphenated tier prefixes (`VIP-0012`, `REG-0012`). Each
//! prefix numbers its own sequence, and the sequences are never merged.
//!
//! Allocation is a read followed by an insert: the proposal here is not a
//! reservation. Concurrent registrations can propose the same code, and the
//! unique constraint on `members.member_code` settles the race; callers
//! recompute and retry on that conflict.

use sqlx::PgPool;

/// Zero-padded width of the numeric suffix. Sequences past 9999 simply grow
/// a digit; the ordering stays intact.
const CODE_WIDTH: usize = 4;

/// How many times writers retry after losing a code race before giving up.
pub const ALLOCATION_ATTEMPTS: u32 = 3;

/// Compute the next code for `prefix` given every code already issued.
///
/// Only codes that carry the prefix followed by a purely numeric suffix
/// participate; malformed or foreign codes are skipped. An empty history
/// starts the sequence at 1.
pub fn next_code(prefix: &str, existing: &[String]) -> String {
    let max = existing
        .iter()
        .filter_map(|code| code.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}{:0width$}", max + 1, width = CODE_WIDTH)
}

/// Read the issued codes under `prefix` and propose the next one.
pub async fn allocate(pool: &PgPool, prefix: &str) -> Result<String, sqlx::Error> {
    let existing: Vec<String> =
        sqlx::query_scalar("SELECT member_code FROM members WHERE member_code LIKE $1 || '%'")
            .bind(prefix)
            .fetch_all(pool)
            .await?;
    Ok(next_code(prefix, &existing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_next_code_increments_highest() {
        let existing = codes(&["BTC0001", "BTC0002", "BTC0009"]);
        assert_eq!(next_code("BTC", &existing), "BTC0010");
    }

    #[test]
    fn test_next_code_empty_history() {
        assert_eq!(next_code("BTC", &[]), "BTC0001");
    }

    #[test]
    fn test_next_code_skips_malformed_suffixes() {
        let existing = codes(&["BTC0001", "BTCX", "BTC00A9", "BTC"]);
        assert_eq!(next_code("BTC", &existing), "BTC0002");
    }

    #[test]
    fn test_next_code_ignores_other_prefixes() {
        let existing = codes(&["VIP-0005", "REG-0019"]);
        assert_eq!(next_code("BTC", &existing), "BTC0001");
    }

    #[test]
    fn test_next_code_hyphenated_prefix() {
        let existing = codes(&["VIP-0011"]);
        assert_eq!(next_code("VIP-", &existing), "VIP-0012");
    }

    #[test]
    fn test_next_code_gap_does_not_backfill() {
        // Holes in the sequence are never reused
        let existing = codes(&["BTC0001", "BTC0007"]);
        assert_eq!(next_code("BTC", &existing), "BTC0008");
    }

    #[test]
    fn test_next_code_grows_past_padding() {
        let existing = codes(&["BTC9999"]);
        assert_eq!(next_code("BTC", &existing), "BTC10000");

        let existing = codes(&["BTC10000"]);
        assert_eq!(next_code("BTC", &existing), "BTC10001");
    }

    #[test]
    fn test_next_code_unpadded_suffix_still_counts() {
        // "BTC12" parses as 12 even without zero padding
        let existing = codes(&["BTC12"]);
        assert_eq!(next_code("BTC", &existing), "BTC0013");
    }
}
