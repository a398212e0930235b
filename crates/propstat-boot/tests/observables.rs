use propstat_boot::{bootstrap, BootstrapOptions, GroupPartition, NamedSeries};
use propstat_core::{Pressure, PropError};
use propstat_series::{ObservableKind, ObservableSeries};

fn run(volume: Vec<f64>, density: Vec<f64>) -> ObservableSeries {
    let len = volume.len();
    ObservableSeries::from_columns(
        vec![-100.0; len],
        vec![50.0; len],
        vec![-50.0; len],
        vec![298.0; len],
        volume,
        density,
        None,
    )
    .unwrap()
}

fn average(name: &'static str) -> impl Fn(&NamedSeries) -> Result<f64, PropError> + Sync {
    move |data: &NamedSeries| {
        let values = data.get(name)?;
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[test]
fn channels_feed_the_estimator_by_name() {
    let series = run(vec![27.0, 27.2, 26.8, 27.0], vec![1.0, 0.98, 1.02, 1.0]);
    let data = NamedSeries::from_observables(
        &series,
        &[("volume", ObservableKind::Volume), ("density", ObservableKind::Density)],
    )
    .unwrap();
    assert_eq!(data.names().collect::<Vec<_>>(), vec!["density", "volume"]);

    let result = bootstrap(&data, average("density"), &BootstrapOptions::default(), None).unwrap();
    assert!((result.estimate - 1.0).abs() < 1e-12);
    assert!(result.uncertainty > 0.0);
}

#[test]
fn absent_channels_cannot_be_extracted() {
    let series = run(vec![27.0], vec![1.0]);
    let err = NamedSeries::from_observables(&series, &[("h", ObservableKind::Enthalpy)])
        .unwrap_err();
    assert!(matches!(err, PropError::MissingChannel(_)));
}

#[test]
fn concatenated_sub_runs_are_resampled_per_run() {
    let first = run(vec![27.0, 27.1, 26.9], vec![1.0, 1.0, 1.0]);
    let second = run(vec![30.0, 30.5], vec![0.9, 0.9]);
    let (stacked, counts) = ObservableSeries::concatenate(&[first, second]).unwrap();
    let partition = GroupPartition::new(counts).unwrap();
    let data = NamedSeries::from_observables(&stacked, &[("density", ObservableKind::Density)])
        .unwrap();

    // Each run has a constant density, so stratified trials never mix them and
    // every trial mean equals the full-data mean.
    let result = bootstrap(
        &data,
        average("density"),
        &BootstrapOptions::default().with_seed(8),
        Some(&partition),
    )
    .unwrap();
    assert!((result.estimate - 0.96).abs() < 1e-12);
    assert!(result.uncertainty < 1e-12);
}

#[test]
fn subsampled_series_feed_the_estimator() {
    let series = run(vec![27.0, 28.0, 29.0, 30.0], vec![1.0, 0.99, 0.98, 0.97])
        .with_channel(ObservableKind::Enthalpy, vec![-49.0, -48.9, -48.8, -48.7])
        .unwrap();
    let decorrelated = series.subset(&[0, 2]).unwrap();
    let data = NamedSeries::from_observables(&decorrelated, &[("h", ObservableKind::Enthalpy)])
        .unwrap();
    let result = bootstrap(&data, average("h"), &BootstrapOptions::default(), None).unwrap();
    assert!((result.estimate - (-48.9)).abs() < 1e-12);
}

#[test]
fn derived_enthalpy_can_be_bootstrapped() {
    let source = "\
Potential Energy (kJ/mole),Kinetic Energy (kJ/mole),Total Energy (kJ/mole),Temperature (K),Box Volume (nm^3),Density (g/mL)
-10,5,-5,300,10,1
-11,5,-6,301,20,1
";
    let pressure = Pressure::from_bar(1.0).unwrap();
    let series = ObservableSeries::read_simulation_csv(source.as_bytes(), Some(pressure)).unwrap();
    let data =
        NamedSeries::from_observables(&series, &[("h", ObservableKind::Enthalpy)]).unwrap();
    let result = bootstrap(&data, average("h"), &BootstrapOptions::default(), None).unwrap();
    let expected = (-5.0 + 10.0 * 0.060_221_407_6 + -6.0 + 20.0 * 0.060_221_407_6) / 2.0;
    assert!((result.estimate - expected).abs() < 1e-9);
}
