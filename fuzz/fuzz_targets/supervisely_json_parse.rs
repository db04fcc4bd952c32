//! Fuzz target for Supervisely JSON parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run supervisely_json_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use yolotxt::supervisely::fuzz_parse_supervisely_json;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid OOM on very large inputs.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = fuzz_parse_supervisely_json(data);
});
