//! CF-style NetCDF trajectory file.
//!
//! Variables are laid out `(ot, particle)` with fill values, so a file for a
//! release that stopped early is still a valid, truncated record.

use std::path::Path;

use chrono::Utc;

use super::{DayTrack, Property, StoreError, TrajectoryStore, check_rows};
use crate::types::ParticleId;

/// Fill value for unwritten data (CF-conventions standard).
pub const FILL_VALUE_F64: f64 = 9.96920996838687e+36;
/// Status fill for unwritten rows.
pub const FILL_VALUE_STATUS: i8 = -1;

/// Global attributes for a trajectory file.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryFileConfig {
    /// Title attribute
    pub title: Option<String>,
    /// Reference time of `ot`, e.g. "seconds since 1970-01-01 00:00:00"
    pub time_units: Option<String>,
    /// Comment attribute
    pub comment: Option<String>,
}

impl TrajectoryFileConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_time_units(mut self, units: impl Into<String>) -> Self {
        self.time_units = Some(units.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Trajectory store backed by a NetCDF file.
pub struct NetCDFTrajectoryStore {
    file: netcdf::FileMut,
    n_times: usize,
    n_particles: usize,
}

impl NetCDFTrajectoryStore {
    /// Create the file with every row pre-sized and filled.
    pub fn create(
        path: impl AsRef<Path>,
        n_times: usize,
        ids: &[ParticleId],
        config: &TrajectoryFileConfig,
    ) -> Result<Self, StoreError> {
        let mut file = netcdf::create(path.as_ref())?;
        file.add_dimension("ot", n_times)?;
        file.add_dimension("particle", ids.len())?;

        {
            let mut ot = file.add_variable::<f64>("ot", &["ot"])?;
            ot.put_attribute("standard_name", "time")?;
            ot.put_attribute("long_name", "save time")?;
            let units = config.time_units.as_deref().unwrap_or("seconds");
            ot.put_attribute("units", units)?;
            ot.put_attribute("_FillValue", FILL_VALUE_F64)?;
        }

        {
            let mut id_var = file.add_variable::<i64>("particle_id", &["particle"])?;
            id_var.put_attribute("long_name", "particle index in the initial condition")?;
            let values: Vec<i64> = ids.iter().map(|id| id.get() as i64).collect();
            id_var.put_values(&values, ..)?;
        }

        for prop in Property::ALL {
            let mut var = file.add_variable::<f64>(prop.name(), &["ot", "particle"])?;
            var.put_attribute("long_name", prop.long_name())?;
            var.put_attribute("units", prop.units())?;
            var.put_attribute("_FillValue", FILL_VALUE_F64)?;
        }

        {
            let mut status = file.add_variable::<i8>("status", &["ot", "particle"])?;
            status.put_attribute("long_name", "particle status")?;
            status.put_attribute("flag_meanings", "active beached out_of_domain")?;
            status.put_attribute("_FillValue", FILL_VALUE_STATUS)?;
        }

        file.add_attribute("Conventions", "CF-1.8")?;
        file.add_attribute("featureType", "trajectory")?;
        if let Some(ref title) = config.title {
            file.add_attribute("title", title.as_str())?;
        }
        if let Some(ref comment) = config.comment {
            file.add_attribute("comment", comment.as_str())?;
        }
        let now = Utc::now();
        file.add_attribute(
            "history",
            format!("{}: Created by ptrack-rs", now.format("%Y-%m-%d %H:%M:%S UTC")).as_str(),
        )?;

        log::debug!(
            "Created trajectory file {} ({} times x {} particles)",
            path.as_ref().display(),
            n_times,
            ids.len()
        );
        Ok(Self {
            file,
            n_times,
            n_particles: ids.len(),
        })
    }

    fn variable_mut(&mut self, name: &str) -> Result<netcdf::VariableMut<'_>, StoreError> {
        self.file
            .variable_mut(name)
            .ok_or_else(|| StoreError::MissingVariable(name.to_string()))
    }
}

impl TrajectoryStore for NetCDFTrajectoryStore {
    fn n_times(&self) -> usize {
        self.n_times
    }

    fn n_particles(&self) -> usize {
        self.n_particles
    }

    fn write_rows(&mut self, row0: usize, track: &DayTrack) -> Result<(), StoreError> {
        check_rows(self, row0, track)?;
        for r in 0..track.n_rows() {
            let t = row0 + r;
            self.variable_mut("ot")?.put_value(track.times()[r], [t])?;
            for prop in Property::ALL {
                self.variable_mut(prop.name())?.put_values(track.row(prop, r), (t, ..))?;
            }
            let codes: Vec<i8> = track.status_row(r).iter().map(|s| s.code()).collect();
            self.variable_mut("status")?.put_values(&codes, (t, ..))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release_000.nc");
        let ids: Vec<ParticleId> = (0..3).map(ParticleId::new).collect();
        let config = TrajectoryFileConfig::default();
        let mut store = NetCDFTrajectoryStore::create(&path, 4, &ids, &config).unwrap();
        let mut day = DayTrack::new(2, 3);
        day.set_time(0, 0.0);
        day.set_time(1, 3600.0);
        store.write_rows(0, &day).unwrap();
        assert!(store.write_rows(3, &day).is_err());
        drop(store);

        let file = netcdf::open(&path).unwrap();
        let ot: Vec<f64> = file.variable("ot").unwrap().get_values(..).unwrap();
        assert_eq!(ot[1], 3600.0);
        // unwritten rows hold the fill value
        assert!(ot[3] > 1.0e30);
    }
}
