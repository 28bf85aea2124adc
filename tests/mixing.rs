//! 혼합 부피 계산식 회귀 및 성질 테스트.
use alcohol_dilution_calculator::mixing::{
    compute, ContractionModel, MixError, MixtureForm, MixtureRequest, VolumeField,
};
use proptest::prelude::*;

fn req(w: f64, e: f64, t: f64) -> MixtureRequest {
    MixtureRequest {
        water_volume_ml: w,
        ethanol_volume_ml: e,
        temperature_c: t,
    }
}

#[test]
fn equal_quarter_litres_at_25c() {
    let res = compute(&req(250.0, 250.0, 25.0)).expect("mix");
    assert_eq!(res.coefficient_k, 0.05);
    assert_eq!(res.display_ml(), "487.50");
}

#[test]
fn equal_decilitres_at_25c() {
    let res = compute(&req(100.0, 100.0, 25.0)).expect("mix");
    assert_eq!(res.final_volume_ml, 195.0);
    assert_eq!(res.display_ml(), "195.00");
}

#[test]
fn warmer_room_contracts_more() {
    let res = compute(&req(250.0, 250.0, 50.0)).expect("mix");
    assert!((res.final_volume_ml - 486.875).abs() < 1e-9);
    assert_eq!(res.display_ml(), "486.88");
}

#[test]
fn non_numeric_water_is_not_computed() {
    let form = MixtureForm::new("abc", "250", 25.0);
    assert_eq!(
        form.to_request(),
        Err(MixError::InputParse {
            field: VolumeField::Water,
            raw: "abc".into()
        })
    );
}

#[test]
fn non_numeric_ethanol_is_reported_after_valid_water() {
    let form = MixtureForm::new("250", "-5", 25.0);
    assert!(!form.is_valid());
    assert!(matches!(
        form.to_request(),
        Err(MixError::InputParse {
            field: VolumeField::Ethanol,
            ..
        })
    ));
}

#[test]
fn negative_ethanol_reaching_compute_is_a_domain_error() {
    let err = compute(&req(100.0, -0.5, 25.0)).unwrap_err();
    assert!(matches!(
        err,
        MixError::InvalidDomain {
            quantity: "ethanol volume",
            ..
        }
    ));
}

#[test]
fn below_monotonic_boundary_more_water_shrinks_volume() {
    let model = ContractionModel::default();
    let boundary = model.monotonic_from_ml(1000.0, 25.0);
    assert!(boundary > 0.0);
    let tiny = model.final_volume(boundary / 100.0, 1000.0, 25.0).unwrap();
    let zero = model.final_volume(0.0, 1000.0, 25.0).unwrap();
    assert!(tiny < zero, "tiny={tiny} zero={zero}");
}

proptest! {
    #[test]
    fn no_contraction_without_coefficients(
        w in 0.0f64..1e6,
        e in 0.0f64..1e6,
        t in -10.0f64..100.0,
    ) {
        let model = ContractionModel { k0: 0.0, t0: t, alpha: 0.0 };
        prop_assert_eq!(model.final_volume(w, e, t).unwrap(), w + e);
    }

    #[test]
    fn symmetric_in_water_and_ethanol(
        w in 0.0f64..1e6,
        e in 0.0f64..1e6,
        t in -10.0f64..100.0,
    ) {
        let model = ContractionModel::default();
        prop_assert_eq!(
            model.final_volume(w, e, t).unwrap(),
            model.final_volume(e, w, t).unwrap()
        );
    }

    #[test]
    fn zero_volume_is_identity(v in 0.0f64..1e6, t in -10.0f64..100.0) {
        let model = ContractionModel::default();
        prop_assert_eq!(model.final_volume(0.0, v, t).unwrap(), v);
        prop_assert_eq!(model.final_volume(v, 0.0, t).unwrap(), v);
    }

    #[test]
    fn never_exceeds_plain_sum_with_positive_k(
        w in 0.0f64..1e6,
        e in 0.0f64..1e6,
        t in -10.0f64..100.0,
    ) {
        let model = ContractionModel::default();
        prop_assert!(model.coefficient_at(t) > 0.0);
        prop_assert!(model.final_volume(w, e, t).unwrap() <= w + e);
    }

    #[test]
    fn increasing_in_water_above_boundary(
        e in 1.0f64..1e5,
        t in -10.0f64..100.0,
        offset in 1.0f64..1e4,
        step in 1.0f64..1e3,
    ) {
        let model = ContractionModel::default();
        let w = model.monotonic_from_ml(e, t) + offset;
        let lower = model.final_volume(w, e, t).unwrap();
        let upper = model.final_volume(w + step, e, t).unwrap();
        prop_assert!(upper > lower);
    }
}
