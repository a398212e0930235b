//! Comma separated import and export of observable series.
//!
//! Two layouts are understood. The round-trip layout is what
//! [`ObservableSeries::write_csv`] produces: an unnamed row index column
//! followed by one column per present channel. The simulation layout is the
//! state-data export of the simulation engine, whose header line may be
//! prefixed with a `#` comment marker and which carries extra bookkeeping
//! columns (step, time, speed) that are ignored here.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use propstat_core::errors::{ErrorInfo, PropError};
use propstat_core::units::Pressure;
use tracing::{debug, warn};

use crate::kind::ObservableKind;
use crate::series::ObservableSeries;

fn format_error(code: &str, err: impl ToString) -> PropError {
    PropError::Format(ErrorInfo::new(code, err.to_string()))
}

fn csv_error(err: csv::Error) -> PropError {
    if let csv::ErrorKind::Io(io) = err.kind() {
        return PropError::Io(ErrorInfo::new("csv_io", io.to_string()));
    }
    let code = match err.kind() {
        csv::ErrorKind::UnequalLengths { .. } => "ragged_row",
        csv::ErrorKind::Utf8 { .. } => "invalid_utf8",
        _ => "malformed_csv",
    };
    let mut error = format_error(code, &err);
    if let Some(position) = err.position() {
        error = error.with_context("line", position.line());
    }
    error
}

impl ObservableSeries {
    /// Writes the round-trip layout: index column first, then present
    /// channels in canonical order.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), PropError> {
        let len = self.len()?;
        let kinds: Vec<_> = self.kinds().collect();
        let columns: Vec<&[f64]> = kinds.iter().filter_map(|kind| self.get(*kind)).collect();

        let mut wtr = csv::Writer::from_writer(writer);
        let header = std::iter::once("").chain(kinds.iter().map(|kind| kind.column_header()));
        wtr.write_record(header).map_err(csv_error)?;

        let mut record = Vec::with_capacity(columns.len() + 1);
        for row in 0..len {
            record.clear();
            record.push(row.to_string());
            record.extend(columns.iter().map(|column| column[row].to_string()));
            wtr.write_record(&record).map_err(csv_error)?;
        }
        wtr.flush()
            .map_err(|err| PropError::Io(ErrorInfo::new("csv_flush", err.to_string())))
    }

    /// Writes the round-trip layout to `path`.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<(), PropError> {
        let path = path.as_ref();
        let file = fs::File::create(path)
            .map_err(|err| PropError::io("csv_create", err, path.display()))?;
        self.write_csv(file)
            .map_err(|err| err.with_context("path", path.display()))
    }

    /// Reads the round-trip layout.
    ///
    /// The six mandatory observables must be present; enthalpy is picked up
    /// when its column exists. Unknown columns, including the row index, are
    /// ignored.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, PropError> {
        let text = read_source(reader)?;
        let table = parse_table(&text)?;
        let series = ObservableSeries::new(table.columns)?;
        debug!(rows = table.rows, channels = series.channel_count(), "imported observable table");
        Ok(series)
    }

    /// Reads the round-trip layout from `path`.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self, PropError> {
        let path = path.as_ref();
        let file =
            fs::File::open(path).map_err(|err| PropError::io("csv_open", err, path.display()))?;
        Self::read_csv(file).map_err(|err| err.with_context("path", path.display()))
    }

    /// Reads the simulation engine's state-data export.
    ///
    /// An existing enthalpy column wins. Otherwise, when `pressure` is given,
    /// enthalpy is derived per frame as `E_total + V·p·N_A`.
    pub fn read_simulation_csv<R: Read>(
        reader: R,
        pressure: Option<Pressure>,
    ) -> Result<Self, PropError> {
        let text = read_source(reader)?;
        let body = strip_metadata(&text);
        if body.trim().is_empty() {
            return Err(format_error("empty_source", "the statistics source is empty"));
        }
        let mut table = parse_table(body)?;

        let has_enthalpy = table.columns.contains_key(&ObservableKind::Enthalpy);
        if let Some(pressure) = pressure.filter(|_| !has_enthalpy) {
            let enthalpies = derive_enthalpies(&table.columns, pressure)?;
            debug!(bar = pressure.as_bar(), "derived enthalpy from reference pressure");
            table.columns.insert(ObservableKind::Enthalpy, enthalpies);
        }

        let series = ObservableSeries::new(table.columns)?;
        debug!(
            rows = table.rows,
            channels = series.channel_count(),
            "imported simulation statistics"
        );
        Ok(series)
    }

    /// Reads the simulation engine's state-data export from `path`.
    pub fn load_simulation_csv(
        path: impl AsRef<Path>,
        pressure: Option<Pressure>,
    ) -> Result<Self, PropError> {
        let path = path.as_ref();
        let file =
            fs::File::open(path).map_err(|err| PropError::io("csv_open", err, path.display()))?;
        Self::read_simulation_csv(file, pressure)
            .map_err(|err| err.with_context("path", path.display()))
    }
}

struct ParsedTable {
    columns: BTreeMap<ObservableKind, Vec<f64>>,
    rows: usize,
}

fn read_source<R: Read>(mut reader: R) -> Result<String, PropError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|err| PropError::Io(ErrorInfo::new("csv_read", err.to_string())))?;
    if text.trim().is_empty() {
        return Err(format_error("empty_source", "the statistics source is empty"));
    }
    Ok(text)
}

/// Drops the `#` comment marker in front of the header, or a whole leading
/// `#` line when it carries no recognisable column.
fn strip_metadata(text: &str) -> &str {
    let Some(rest) = text.strip_prefix('#') else {
        return text;
    };
    let first_line = rest.lines().next().unwrap_or_default();
    let names_column = ObservableKind::ALL
        .iter()
        .any(|kind| first_line.contains(kind.column_header()));
    if names_column {
        rest
    } else {
        warn!(line = first_line, "discarding leading metadata line");
        rest.split_once('\n').map_or("", |(_, body)| body)
    }
}

fn parse_table(text: &str) -> Result<ParsedTable, PropError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers().map_err(csv_error)?.clone();
    let mut positions: Vec<(usize, ObservableKind)> = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        let Some(kind) = ObservableKind::from_column_header(header) else {
            continue;
        };
        if positions.iter().any(|(_, seen)| *seen == kind) {
            return Err(format_error("duplicate_column", "column appears more than once")
                .with_context("column", kind.column_header()));
        }
        positions.push((index, kind));
    }

    for kind in ObservableKind::MANDATORY {
        if !positions.iter().any(|(_, seen)| *seen == kind) {
            return Err(PropError::Format(
                ErrorInfo::new(
                    "missing_column",
                    format!("the statistics source does not contain a {kind} column"),
                )
                .with_context("column", kind.column_header()),
            ));
        }
    }

    let mut columns: BTreeMap<ObservableKind, Vec<f64>> =
        positions.iter().map(|(_, kind)| (*kind, Vec::new())).collect();
    let mut rows = 0;
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_error)?;
        for (index, kind) in &positions {
            let cell = record.get(*index).unwrap_or_default();
            let value = cell.parse::<f64>().map_err(|err| {
                PropError::Format(
                    ErrorInfo::new("invalid_number", err.to_string())
                        .with_context("row", row)
                        .with_context("column", kind.column_header())
                        .with_context("value", cell),
                )
            })?;
            if let Some(column) = columns.get_mut(kind) {
                column.push(value);
            }
        }
        rows += 1;
    }

    Ok(ParsedTable { columns, rows })
}

fn derive_enthalpies(
    columns: &BTreeMap<ObservableKind, Vec<f64>>,
    pressure: Pressure,
) -> Result<Vec<f64>, PropError> {
    let column = |kind: ObservableKind| {
        columns.get(&kind).ok_or_else(|| {
            PropError::missing_channel("channel_absent", "enthalpy derivation input is missing")
                .with_context("kind", kind)
        })
    };
    let totals = column(ObservableKind::TotalEnergy)?;
    let volumes = column(ObservableKind::Volume)?;
    Ok(totals
        .iter()
        .zip(volumes)
        .map(|(total, volume)| total + pressure.pv_work_kj_per_mol(*volume))
        .collect())
}
