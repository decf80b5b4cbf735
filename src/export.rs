//! CSV export of exposure tables and levels
//!
//! Column names follow the serde names of the row types:
//! `strike, call_oi, put_oi, call_gamma, put_gamma, call_gex, put_gex, total_gex`
//! for gamma rows and `strike, call_delta, put_delta, call_dex, put_dex, total_dex`
//! for delta rows. Headers are written even when there are no rows.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::core::GexResult;
use crate::exposure::{DeltaExposureRow, ExposureRow};
use crate::levels::ExposureLevels;

pub const EXPOSURE_COLUMNS: [&str; 8] = [
    "strike",
    "call_oi",
    "put_oi",
    "call_gamma",
    "put_gamma",
    "call_gex",
    "put_gex",
    "total_gex",
];

pub const DELTA_COLUMNS: [&str; 6] = ["strike", "call_delta", "put_delta", "call_dex", "put_dex", "total_dex"];

pub const LEVEL_COLUMNS: [&str; 6] = [
    "flip_strike",
    "support_strike",
    "resistance_strike",
    "total_gex",
    "gex_above_spot",
    "gex_below_spot",
];

fn write_records<W: Write, T: Serialize>(writer: W, header: &[&str], records: &[T]) -> GexResult<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(header)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_exposure_csv<W: Write>(writer: W, rows: &[ExposureRow]) -> GexResult<()> {
    write_records(writer, &EXPOSURE_COLUMNS, rows)
}

pub fn write_delta_csv<W: Write>(writer: W, rows: &[DeltaExposureRow]) -> GexResult<()> {
    write_records(writer, &DELTA_COLUMNS, rows)
}

/// One-row levels table; missing support / resistance are empty fields
pub fn write_levels_csv<W: Write>(writer: W, levels: &ExposureLevels) -> GexResult<()> {
    write_records(writer, &LEVEL_COLUMNS, std::slice::from_ref(levels))
}

/// Write the gamma table to `path`, creating or truncating it
pub fn export_exposure<P: AsRef<Path>>(path: P, rows: &[ExposureRow]) -> GexResult<()> {
    let file = File::create(path.as_ref())?;
    write_exposure_csv(file, rows)?;
    tracing::info!("Wrote {} strikes to {}", rows.len(), path.as_ref().display());
    Ok(())
}

pub fn export_delta<P: AsRef<Path>>(path: P, rows: &[DeltaExposureRow]) -> GexResult<()> {
    let file = File::create(path.as_ref())?;
    write_delta_csv(file, rows)?;
    tracing::info!("Wrote {} delta rows to {}", rows.len(), path.as_ref().display());
    Ok(())
}

pub fn export_levels<P: AsRef<Path>>(path: P, levels: &ExposureLevels) -> GexResult<()> {
    let file = File::create(path.as_ref())?;
    write_levels_csv(file, levels)
}
