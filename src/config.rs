//! Readers for the two `.dat` configuration files.
//!
//! Parsing these files carries none of the scheduling/fairness semantics
//! that distinguish one simulation configuration from another, but a
//! runnable tool still has to read them, so this module is a complete,
//! if intentionally thin, implementation of the contract named in the
//! external-interfaces section.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Parsed contents of `sensor.dat`. Only `bits_per_sense` and
/// `max_buffer_mb` feed the simulation's computation; the image geometry
/// fields are retained for analytics that read the full row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    pub bits_per_sense: u64,
    pub image_width_px: u32,
    pub image_height_px: u32,
    pub bits_per_pixel: u32,
    pub max_buffer_mb: f64,
}

impl SensorConfig {
    pub fn max_buffer_capacity(&self) -> u64 {
        if self.max_buffer_mb <= 0.0 {
            u64::MAX
        } else {
            (self.max_buffer_mb * 8.0 * 1024.0 * 1024.0) as u64
        }
    }
}

/// Parsed contents of `constellation.dat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstellationConfig {
    pub satellite_count: u32,
}

fn read_data_line(path: &Path) -> Result<String, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut lines = contents.lines();
    lines.next().ok_or_else(|| ConfigError::Malformed {
        path: path.to_path_buf(),
        reason: "missing header line".to_string(),
    })?;
    let data_line = lines.next().ok_or_else(|| ConfigError::Malformed {
        path: path.to_path_buf(),
        reason: "missing data line".to_string(),
    })?;
    Ok(data_line.to_string())
}

fn parse_field<T: std::str::FromStr>(
    fields: &[&str],
    idx: usize,
    path: &Path,
    name: &str,
) -> Result<T, ConfigError> {
    fields
        .get(idx)
        .ok_or_else(|| ConfigError::Malformed {
            path: path.to_path_buf(),
            reason: format!("missing field `{name}` at column {idx}"),
        })?
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Malformed {
            path: path.to_path_buf(),
            reason: format!("field `{name}` is not a valid number"),
        })
}

pub fn load_sensor_config(config_dir: &Path) -> Result<SensorConfig, ConfigError> {
    let path: PathBuf = config_dir.join("sensor.dat");
    let line = read_data_line(&path)?;
    let fields: Vec<&str> = line.split(',').collect();
    Ok(SensorConfig {
        bits_per_sense: parse_field(&fields, 0, &path, "bits_per_sense")?,
        image_width_px: parse_field(&fields, 1, &path, "image_width_px")?,
        image_height_px: parse_field(&fields, 2, &path, "image_height_px")?,
        bits_per_pixel: parse_field(&fields, 3, &path, "bits_per_pixel")?,
        max_buffer_mb: parse_field(&fields, 4, &path, "max_buffer_mb")?,
    })
}

pub fn load_constellation_config(config_dir: &Path) -> Result<ConstellationConfig, ConfigError> {
    let path: PathBuf = config_dir.join("constellation.dat");
    let line = read_data_line(&path)?;
    let fields: Vec<&str> = line.split(',').collect();
    Ok(ConstellationConfig {
        satellite_count: parse_field(&fields, 0, &path, "count")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn loads_sensor_config() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "sensor.dat",
            "bits-per-sense, width, height, bpp, max_buffer_mb\n8000000,1024,768,8,20\n",
        );
        let cfg = load_sensor_config(dir.path()).unwrap();
        assert_eq!(cfg.bits_per_sense, 8_000_000);
        assert_eq!(cfg.image_width_px, 1024);
        assert_eq!(cfg.max_buffer_mb, 20.0);
    }

    #[test]
    fn loads_constellation_config() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "constellation.dat", "count\n6\n");
        let cfg = load_constellation_config(dir.path()).unwrap();
        assert_eq!(cfg.satellite_count, 6);
    }

    #[test]
    fn missing_data_line_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "constellation.dat", "count\n");
        let err = load_constellation_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_constellation_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
