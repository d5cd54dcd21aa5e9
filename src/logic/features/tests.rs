//! Feature engineering tests
//!
//! Arithmetic identities, the zero-spend guard and column reordering.

use super::layout::{RADIO, RADIO_SHARE, RADIO_SQ, TV, TV_RADIO_INTERACTION, TV_SHARE, TV_SQ};
use super::{engineer, Budgets, UnknownFeatureError};

const EPS: f64 = 1e-9;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_reference_scenario() {
    let features = engineer(&Budgets::new(150.0, 25.0, 10.0));

    assert_eq!(features.get(TV), Some(150.0));
    assert_eq!(features.get(RADIO), Some(25.0));
    assert_eq!(features.get(TV_RADIO_INTERACTION), Some(3750.0));
    assert_eq!(features.get(TV_SQ), Some(22500.0));
    assert_eq!(features.get(RADIO_SQ), Some(625.0));

    let tv_share = features.get(TV_SHARE).unwrap();
    let radio_share = features.get(RADIO_SHARE).unwrap();
    assert!((tv_share - 150.0 / 185.0).abs() < EPS);
    assert!((radio_share - 25.0 / 185.0).abs() < EPS);
    assert!((tv_share - 0.8108).abs() < 1e-4);
    assert!((radio_share - 0.1351).abs() < 1e-4);
}

#[test]
fn test_zero_spend_has_no_nan() {
    let features = engineer(&Budgets::new(0.0, 0.0, 0.0));

    for value in features.values {
        assert_eq!(value, 0.0);
    }
    assert_eq!(features.get(TV_SHARE), Some(0.0));
    assert_eq!(features.get(RADIO_SHARE), Some(0.0));
}

#[test]
fn test_newspaper_only_spend() {
    let features = engineer(&Budgets::new(0.0, 0.0, 80.0));

    assert_eq!(features.get(TV_SHARE), Some(0.0));
    assert_eq!(features.get(RADIO_SHARE), Some(0.0));
    assert_eq!(features.get(TV_RADIO_INTERACTION), Some(0.0));
}

#[test]
fn test_products_and_squares_over_grid() {
    for tv in [0.0, 5.0, 115.0, 300.0] {
        for radio in [0.0, 1.0, 17.0, 50.0] {
            for newspaper in [0.0, 60.0, 120.0] {
                let f = engineer(&Budgets::new(tv, radio, newspaper));

                assert_eq!(f.get(TV_RADIO_INTERACTION), Some(tv * radio));
                assert_eq!(f.get(TV_SQ), Some(tv * tv));
                assert_eq!(f.get(RADIO_SQ), Some(radio * radio));

                let shares = f.get(TV_SHARE).unwrap() + f.get(RADIO_SHARE).unwrap();
                assert!(shares.is_finite());
                assert!(shares <= 1.0 + EPS, "shares {} for {:?}", shares, (tv, radio, newspaper));
            }
        }
    }
}

#[test]
fn test_shares_sum_to_one_without_newspaper() {
    let f = engineer(&Budgets::new(120.0, 30.0, 0.0));
    let shares = f.get(TV_SHARE).unwrap() + f.get(RADIO_SHARE).unwrap();
    assert!((shares - 1.0).abs() < EPS);
}

#[test]
fn test_arrange_follows_model_order() {
    let f = engineer(&Budgets::new(150.0, 25.0, 10.0));
    let order = names(&[RADIO_SHARE, TV, TV_SQ, RADIO, TV_SHARE, RADIO_SQ, TV_RADIO_INTERACTION]);

    let row = f.arrange(&order).unwrap();

    assert_eq!(row.names, order);
    assert_eq!(row.values.len(), 7);
    assert_eq!(row.values[1], 150.0);
    assert_eq!(row.values[2], 22500.0);
    assert_eq!(row.values[6], 3750.0);
    assert!((row.values[0] - 25.0 / 185.0).abs() < EPS);
}

#[test]
fn test_arrange_subset() {
    let f = engineer(&Budgets::new(10.0, 2.0, 0.0));
    let row = f.arrange(&names(&[TV, RADIO])).unwrap();
    assert_eq!(row.as_slice(), &[10.0, 2.0]);
}

#[test]
fn test_arrange_rejects_unknown_column() {
    let f = engineer(&Budgets::new(10.0, 2.0, 3.0));
    let err = f.arrange(&names(&[TV, "Newspaper"])).unwrap_err();
    assert_eq!(err, UnknownFeatureError("Newspaper".to_string()));
}

#[test]
fn test_canonical_entries() {
    let f = engineer(&Budgets::new(150.0, 25.0, 10.0));
    let entries = f.to_canonical().entries();

    assert_eq!(entries.len(), 7);
    assert_eq!(entries[0].feature, "TV");
    assert_eq!(entries[2].feature, "TV_Radio_Interaction");
    assert_eq!(entries[2].value, 3750.0);
}
