//! Wire decoder property-based tests.
//!
//! ## Purpose
//! Randomized payloads exercise the decoder's fail-closed behavior: arbitrary
//! bytes never panic, and well-formed payloads always round into the same
//! stats and normalized type order.
// crates/dex-core/tests/proptest_decode.rs
// ============================================================================
// Module: Wire Decoder Property-Based Tests
// Description: Fuzz-like checks for payload decoding.
// Purpose: Ensure malformed payloads fail closed without panics.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use dex_core::decode_record;
use dex_core::decode_value;
use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;

fn payload(id: u32, types: &[String], stats: &[i16]) -> Value {
    let types: Vec<Value> = types.iter().map(|name| json!({"type": {"name": name}})).collect();
    let stats: Vec<Value> = stats.iter().map(|value| json!({"base_stat": value})).collect();
    json!({
        "id": id,
        "name": "fuzz",
        "types": types,
        "stats": stats,
        "sprites": {
            "front_default": "https://img.example/a.png",
            "front_shiny": "https://img.example/b.png"
        }
    })
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_record(&bytes);
    }

    #[test]
    fn six_stats_decode_in_order(
        id in 1_u32..10_000,
        stats in proptest::array::uniform6(any::<i16>()),
    ) {
        let record = decode_value(&payload(id, &["water".to_string()], &stats)).unwrap();
        prop_assert_eq!(record.id.get(), id);
        prop_assert_eq!(record.base_stats.to_array(), stats);
    }

    #[test]
    fn wrong_stat_count_is_rejected(
        stats in proptest::collection::vec(any::<i16>(), 0..12)
            .prop_filter("exactly six is valid", |stats| stats.len() != 6),
    ) {
        prop_assert!(decode_value(&payload(1, &["water".to_string()], &stats)).is_err());
    }

    #[test]
    fn normal_is_never_first_in_a_pair(other in "[a-z]{1,10}") {
        let types = vec!["normal".to_string(), other];
        let record = decode_value(&payload(1, &types, &[1, 2, 3, 4, 5, 6])).unwrap();
        prop_assert_eq!(record.types.len(), 2);
        prop_assert_eq!(record.types[1].as_str(), "normal");
    }
}
