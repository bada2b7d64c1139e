//! Sequence generator properties: uniqueness and contiguity.

mod common;

use std::collections::HashSet;

use gatepass::db::sequence::SequenceService;

#[tokio::test]
async fn serialized_values_are_contiguous_from_one() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let sequences = SequenceService::new(db);

    for expected in 1..=5 {
        let value = sequences.next_value("serial_test").await.expect("next_value");
        assert_eq!(value, expected);
    }
}

#[tokio::test]
async fn sequences_are_independent_per_name() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let sequences = SequenceService::new(db);

    assert_eq!(sequences.next_value("alpha").await.expect("next"), 1);
    assert_eq!(sequences.next_value("alpha").await.expect("next"), 2);
    assert_eq!(sequences.next_value("beta").await.expect("next"), 1);
    assert_eq!(sequences.next_value("alpha").await.expect("next"), 3);
}

#[tokio::test]
async fn concurrent_calls_never_return_duplicates() {
    const N: i64 = 24;

    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let sequences = SequenceService::new(db);

    let mut handles = Vec::new();
    for _ in 0..N {
        let sequences = sequences.clone();
        handles.push(tokio::spawn(async move {
            sequences.next_value("concurrent_test").await.expect("next_value")
        }));
    }

    let mut values = HashSet::new();
    for handle in handles {
        let value = handle.await.expect("join");
        assert!(values.insert(value), "duplicate sequence value {value}");
        assert!(
            (1..=N).contains(&value),
            "value {value} outside the contiguous range 1..={N}"
        );
    }
    assert_eq!(values.len() as i64, N);
}
