#![allow(dead_code)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use yolotxt::ClassId;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// An image size and a pixel box lying inside it.
pub fn arb_image_and_box() -> impl Strategy<Value = (u32, u32, f64, f64, f64, f64)> {
    (1u32..=4096, 1u32..=4096).prop_flat_map(|(width, height)| {
        (
            Just(width),
            Just(height),
            (0.0..=width as f64, 0.0..=width as f64),
            (0.0..=height as f64, 0.0..=height as f64),
        )
            .prop_map(|(width, height, (x1, x2), (y1, y2))| {
                (width, height, x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
            })
    })
}

/// A class count and a subset of `0..count` to remove.
pub fn arb_count_and_removal() -> impl Strategy<Value = (u32, BTreeSet<ClassId>)> {
    (1u32..40).prop_flat_map(|count| {
        let all: Vec<u32> = (0..count).collect();
        (
            Just(count),
            proptest::sample::subsequence(all, 0..=count as usize)
                .prop_map(|ids| ids.into_iter().map(ClassId::new).collect::<BTreeSet<_>>()),
        )
    })
}

/// A class config and a subset of its ids to remove.
///
/// Configs are `0..n` ascending about half the time; the rest are shuffled
/// or start above zero.
pub fn arb_config_and_removal() -> impl Strategy<Value = (Vec<u32>, BTreeSet<ClassId>)> {
    let classes = prop_oneof![
        2 => (1u32..40).prop_map(|count| (0..count).collect::<Vec<_>>()),
        1 => (1u32..40).prop_flat_map(|count| Just((0..count).collect::<Vec<_>>()).prop_shuffle()),
        1 => (1u32..20, 1u32..40).prop_map(|(offset, count)| (offset..offset + count).collect::<Vec<_>>()),
    ];
    classes.prop_flat_map(|classes| {
        let len = classes.len();
        (
            Just(classes.clone()),
            proptest::sample::subsequence(classes, 0..=len)
                .prop_map(|ids| ids.into_iter().map(ClassId::new).collect::<BTreeSet<_>>()),
        )
    })
}

/// Label lines over classes `0..count`, with short coordinate text.
pub fn arb_label_lines(count: u32) -> impl Strategy<Value = Vec<(u32, String)>> {
    proptest::collection::vec(
        (0..count, "[0-9]\\.[0-9]{1,6} [0-9]\\.[0-9]{1,6} [0-9]\\.[0-9]{1,6} [0-9]\\.[0-9]{1,6}"),
        0..20,
    )
}
