use std::collections::BTreeMap;

use propstat_core::PropError;
use propstat_series::{ObservableKind, ObservableSeries};

fn three_frames() -> ObservableSeries {
    ObservableSeries::from_columns(
        vec![-10.0, -11.0, -12.0],
        vec![5.0, 6.0, 7.0],
        vec![-5.0, -5.0, -5.0],
        vec![298.0, 299.0, 300.0],
        vec![27.0, 27.5, 28.0],
        vec![0.99, 1.0, 1.01],
        None,
    )
    .expect("series")
}

#[test]
fn length_follows_channels() {
    let series = three_frames();
    assert_eq!(series.len().unwrap(), 3);
    assert!(!series.is_empty());
    assert_eq!(series.channel_count(), 6);
}

#[test]
fn length_without_any_channel_is_an_error() {
    let series = ObservableSeries::new(BTreeMap::new()).expect("empty series");
    let err = series.len().unwrap_err();
    assert!(matches!(err, PropError::MissingChannel(_)));
    assert!(series.is_empty());
}

#[test]
fn length_without_potential_energy_uses_other_channels() {
    let series =
        ObservableSeries::from_channels([(ObservableKind::Density, vec![1.0, 1.1])]).unwrap();
    assert_eq!(series.len().unwrap(), 2);
}

#[test]
fn unequal_channels_are_rejected_at_construction() {
    let err = ObservableSeries::from_channels([
        (ObservableKind::PotentialEnergy, vec![1.0, 2.0, 3.0]),
        (ObservableKind::Volume, vec![1.0, 2.0]),
    ])
    .unwrap_err();
    assert!(matches!(err, PropError::Validation(_)));
    assert_eq!(err.info().code, "channel_length");
    assert_eq!(err.info().context.get("Volume").map(String::as_str), Some("2"));
}

#[test]
fn duplicate_channels_are_rejected() {
    let err = ObservableSeries::from_channels([
        (ObservableKind::Volume, vec![1.0]),
        (ObservableKind::Volume, vec![2.0]),
    ])
    .unwrap_err();
    assert_eq!(err.info().code, "duplicate_channel");
}

#[test]
fn absent_channels_are_reported_not_fatal() {
    let series = three_frames();
    assert!(!series.has(ObservableKind::Enthalpy));
    assert!(series.get(ObservableKind::Enthalpy).is_none());
    assert!(series.has(ObservableKind::Density));
    assert_eq!(series.get(ObservableKind::Density), Some(&[0.99, 1.0, 1.01][..]));

    let err = series.require(ObservableKind::Enthalpy).unwrap_err();
    assert!(matches!(err, PropError::MissingChannel(_)));
    assert_eq!(err.info().context.get("kind").map(String::as_str), Some("Enthalpy"));
}

#[test]
fn kinds_are_listed_in_column_order() {
    let series = three_frames()
        .with_channel(ObservableKind::Enthalpy, vec![1.0, 2.0, 3.0])
        .unwrap();
    let kinds: Vec<_> = series.kinds().collect();
    assert_eq!(kinds, ObservableKind::ALL.to_vec());
}

#[test]
fn channel_replacement_keeps_length_fixed() {
    let series = three_frames();
    let replaced = series
        .clone()
        .with_channel(ObservableKind::Temperature, vec![1.0, 2.0, 3.0])
        .unwrap();
    assert_eq!(replaced.get(ObservableKind::Temperature), Some(&[1.0, 2.0, 3.0][..]));
    assert_eq!(series.get(ObservableKind::Temperature), Some(&[298.0, 299.0, 300.0][..]));

    let err = series
        .with_channel(ObservableKind::Temperature, vec![1.0])
        .unwrap_err();
    assert_eq!(err.info().code, "channel_length");
}

#[test]
fn subset_repeats_and_reorders_frames() {
    let series = three_frames();
    let derived = series.subset(&[0, 0, 2]).unwrap();
    assert_eq!(derived.len().unwrap(), 3);
    for kind in series.kinds() {
        let orig = series.get(kind).unwrap();
        assert_eq!(derived.get(kind).unwrap(), &[orig[0], orig[0], orig[2]][..]);
    }
    assert!(!derived.has(ObservableKind::Enthalpy));

    let reversed = series.subset(&[2, 1]).unwrap();
    assert_eq!(reversed.get(ObservableKind::Volume), Some(&[28.0, 27.5][..]));
}

#[test]
fn subset_rejects_out_of_range_indices() {
    let err = three_frames().subset(&[0, 3]).unwrap_err();
    assert!(matches!(err, PropError::Validation(_)));
    assert_eq!(err.info().context.get("index").map(String::as_str), Some("3"));
    assert_eq!(err.info().context.get("len").map(String::as_str), Some("3"));
}

#[test]
fn concatenate_stacks_parts_and_reports_counts() {
    let first = three_frames();
    let second = three_frames().subset(&[1]).unwrap();
    let (stacked, counts) = ObservableSeries::concatenate(&[first, second]).unwrap();
    assert_eq!(counts, vec![3, 1]);
    assert_eq!(stacked.len().unwrap(), 4);
    assert_eq!(
        stacked.get(ObservableKind::PotentialEnergy),
        Some(&[-10.0, -11.0, -12.0, -11.0][..])
    );
}

#[test]
fn concatenate_requires_matching_channels() {
    let first = three_frames();
    let second = three_frames()
        .with_channel(ObservableKind::Enthalpy, vec![0.0; 3])
        .unwrap();
    let err = ObservableSeries::concatenate(&[first, second]).unwrap_err();
    assert_eq!(err.info().code, "channel_set_mismatch");

    let err = ObservableSeries::concatenate(&[]).unwrap_err();
    assert_eq!(err.info().code, "concatenate_empty");
}

#[test]
fn kind_names_round_trip_through_strings() {
    for kind in ObservableKind::ALL {
        assert_eq!(kind.to_string().parse::<ObservableKind>().unwrap(), kind);
        assert_eq!(ObservableKind::from_column_header(kind.column_header()), Some(kind));
    }
    assert!("Pressure".parse::<ObservableKind>().is_err());
    assert_eq!(ObservableKind::Volume.unit(), "nm^3");
    assert!(!ObservableKind::Enthalpy.is_mandatory());
}
