//! ROMS history-file reader.
//!
//! Reads grid geometry (`lon_rho`, `lat_rho`, `mask_rho`, `Cs_r`, `Cs_w`) and
//! per-record snapshot fields from ROMS `ocean_his_*.nc` output. Each file is
//! opened only for the duration of a single `load` call.
//!
//! Masked source values (`_FillValue`, typically 1e37) are returned as `NaN`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Field, Snapshot, SnapshotError, SnapshotSource, Variable, VerticalLayout};
use crate::grid::{Axis, GridModel, LandMask};
use crate::types::SnapshotIndex;
use crate::vertical::SigmaLevels;

/// Tolerance (degrees) when reducing plaid 2-D coordinates to 1-D axes.
const PLAID_TOLERANCE: f64 = 1e-6;

/// Check if a value is valid (not a fill value).
#[inline]
fn is_valid(v: f64) -> bool {
    v.is_finite() && v.abs() < 1.0e+30
}

fn read_var(file: &netcdf::File, name: &str) -> Result<Vec<f64>, SnapshotError> {
    let var = file
        .variable(name)
        .ok_or_else(|| SnapshotError::MissingVariable(name.to_string()))?;
    let data: Vec<f64> = var.get_values(..)?;
    Ok(data)
}

fn dims_of(file: &netcdf::File, name: &str) -> Result<Vec<usize>, SnapshotError> {
    let var = file
        .variable(name)
        .ok_or_else(|| SnapshotError::MissingVariable(name.to_string()))?;
    Ok(var.dimensions().iter().map(|d| d.len()).collect())
}

/// Read the grid model from a ROMS grid or history file.
///
/// Curvilinear coordinates must be plaid: `lon_rho` rows identical and
/// `lat_rho` columns constant.
pub fn read_grid(path: impl AsRef<Path>) -> Result<GridModel, SnapshotError> {
    let file = netcdf::open(path.as_ref())?;

    let dims = dims_of(&file, "lon_rho")?;
    let (ny, nx) = match dims.as_slice() {
        [ny, nx] => (*ny, *nx),
        _ => {
            return Err(SnapshotError::InvalidData(format!(
                "lon_rho must be 2-D, found {} dimensions",
                dims.len()
            )))
        }
    };

    let lon = Axis::from_plaid_rows(&read_var(&file, "lon_rho")?, ny, nx, PLAID_TOLERANCE)?;
    let lat = Axis::from_plaid_columns(&read_var(&file, "lat_rho")?, ny, nx, PLAID_TOLERANCE)?;
    let mask = match file.variable("mask_rho") {
        Some(_) => LandMask::from_values(&read_var(&file, "mask_rho")?, ny, nx)?,
        None => LandMask::all_wet(ny, nx),
    };
    let levels = SigmaLevels::from_levels(read_var(&file, "Cs_r")?, read_var(&file, "Cs_w")?)?;

    log::info!(
        "Read grid {}x{} with {} levels from {}",
        ny,
        nx,
        levels.n_levels(),
        path.as_ref().display()
    );
    Ok(GridModel::from_rho_mask(lon, lat, mask, levels)?)
}

#[derive(Clone, Debug)]
struct Record {
    path: PathBuf,
    index: usize,
    time: f64,
}

/// Snapshots read lazily from a list of ROMS history files.
///
/// Files may hold any number of `ocean_time` records; records are indexed in
/// the order the files are given.
#[derive(Clone, Debug)]
pub struct RomsHistorySource {
    grid: Arc<GridModel>,
    records: Vec<Record>,
}

impl RomsHistorySource {
    /// Index the `ocean_time` records of every file.
    pub fn open<P: AsRef<Path>>(paths: &[P], grid: Arc<GridModel>) -> Result<Self, SnapshotError> {
        let mut records = Vec::new();
        for path in paths {
            let file = netcdf::open(path.as_ref())?;
            for (index, time) in read_var(&file, "ocean_time")?.into_iter().enumerate() {
                if let Some(prev) = records.last().map(|r: &Record| r.time) {
                    if time <= prev {
                        return Err(SnapshotError::NonMonotonicTime {
                            index: records.len(),
                            previous: prev,
                            found: time,
                        });
                    }
                }
                records.push(Record {
                    path: path.as_ref().to_path_buf(),
                    index,
                    time,
                });
            }
        }
        log::debug!("Indexed {} history records from {} files", records.len(), paths.len());
        Ok(Self { grid, records })
    }

    fn record(&self, index: SnapshotIndex) -> Result<&Record, SnapshotError> {
        self.records.get(index.get()).ok_or(SnapshotError::IndexOutOfRange {
            index: index.get(),
            len: self.records.len(),
        })
    }

    fn read_field(
        &self,
        file: &netcdf::File,
        var: Variable,
        record: usize,
    ) -> Result<Field, SnapshotError> {
        let nc = file
            .variable(var.name())
            .ok_or_else(|| SnapshotError::MissingVariable(var.name().to_string()))?;
        let timed = nc.dimensions().first().is_some_and(|d| d.name() == "ocean_time");
        let raw: Vec<f64> = match (timed, var.vertical()) {
            (false, _) => nc.get_values(..)?,
            (true, VerticalLayout::Surface) => nc.get_values((record, .., ..))?,
            (true, _) => nc.get_values((record, .., .., ..))?,
        };
        let values = raw.into_iter().map(|v| if is_valid(v) { v } else { f64::NAN }).collect();
        Field::new(Field::expected_shape(&self.grid, var), values)
    }
}

impl SnapshotSource for RomsHistorySource {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn time_of(&self, index: SnapshotIndex) -> Result<f64, SnapshotError> {
        Ok(self.record(index)?.time)
    }

    fn load(&self, index: SnapshotIndex) -> Result<Arc<Snapshot>, SnapshotError> {
        let record = self.record(index)?;
        let file = netcdf::open(&record.path)?;
        let mut snapshot = Snapshot::new(record.time);
        for var in Variable::ALL {
            if file.variable(var.name()).is_none() {
                continue;
            }
            let field = self.read_field(&file, var, record.index)?;
            snapshot.insert(&self.grid, var, field)?;
        }
        log::trace!("Loaded {} record {}", record.path.display(), record.index);
        Ok(Arc::new(snapshot))
    }
}
