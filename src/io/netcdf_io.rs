//! NetCDF readers for grids and climatologies, and the dataset writer.
//!
//! # Readers
//!
//! - **Grid**: layer thickness `dz` (m, or cm when the units say so), bottom
//!   index `KMT`, and cell-center coordinates `TLONG`/`TLAT` (2D or 1D)
//! - **Source climatology**: any `[time?, depth?, lat, lon]` variable on a
//!   regular lon/lat grid; the first time record is used, packed data is
//!   unpacked with `scale_factor`/`add_offset`, and fill values become NaN
//! - **Sediment fraction**: a `[k, j, i]` variable on the destination grid
//!
//! # Writer
//!
//! Output files follow CF-1.8 conventions: `z_t`, `dz`, `KMT`, `TLONG`,
//! `TLAT` describe the grid; each field is a `[z_t, nlat, nlon]` double with
//! `_FillValue` on land; `history` and `input_files` record provenance.
//!
//! # Example
//!
//! ```rust,ignore
//! use bgc_inputs::io::{DatasetWriter, DatasetWriterConfig, read_grid};
//!
//! let grid = read_grid("gx1v7_grid.nc", "gx1v7", None)?;
//! let config = DatasetWriterConfig::new("ic.nc").with_title("BGC initial conditions");
//! let mut writer = DatasetWriter::create(config, &grid)?;
//! writer.write_field(&field)?;
//! ```

use std::path::{Path, PathBuf};

use log::{debug, info};
use ndarray::{Array2, Array3};
use netcdf::{AttributeValue, create};
use thiserror::Error;

use crate::fill::{FILL_VALUE_F64, Field3D, is_valid_f64};
use crate::grid::{GridError, OceanGrid};
use crate::provenance::Provenance;
use crate::regrid::{RegridError, SourceField};
use crate::types::GridShape;

const DZ_NAMES: &[&str] = &["dz", "DZ", "dz_t"];
const KMT_NAMES: &[&str] = &["KMT", "kmt", "bottom_index"];
const GRID_LON_NAMES: &[&str] = &["TLONG", "TLON", "geolon", "lon"];
const GRID_LAT_NAMES: &[&str] = &["TLAT", "geolat", "lat"];

const LON_NAMES: &[&str] = &["lon", "longitude", "LON", "x"];
const LAT_NAMES: &[&str] = &["lat", "latitude", "LAT", "y"];
const DEPTH_NAMES: &[&str] = &["depth", "lev", "z", "z_t", "DEPTH"];

/// Error type for NetCDF operations.
#[derive(Debug, Error)]
pub enum NetCDFError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF library error
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),

    /// Invalid data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Missing variable
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// Grid read from file is inconsistent
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Source field read from file is inconsistent
    #[error(transparent)]
    Regrid(#[from] RegridError),
}

// ============================================================================
// Readers
// ============================================================================

/// Read the destination grid.
///
/// `tripolar` overrides the file's global `tripolar` attribute; without
/// either the grid is treated as a plain cyclic grid.
pub fn read_grid(path: impl AsRef<Path>, name: &str, tripolar: Option<bool>) -> Result<OceanGrid, NetCDFError> {
    let path = path.as_ref();
    let file = netcdf::open(path)?;

    let dz_var = find_variable(&file, DZ_NAMES)?;
    let mut dz: Vec<f64> = dz_var.get_values(..)?;
    if matches!(get_attr_string(&dz_var, "units").as_deref(), Some("cm" | "centimeters")) {
        dz.iter_mut().for_each(|d| *d /= 100.0);
    }

    let kmt_var = find_variable(&file, KMT_NAMES)?;
    let (nj, ni) = match dim_lengths(&kmt_var).as_slice() {
        &[nj, ni] => (nj, ni),
        other => {
            return Err(NetCDFError::InvalidData(format!(
                "bottom index must be 2D, found dimensions {other:?}"
            )));
        }
    };
    let raw: Vec<i32> = kmt_var.get_values(..)?;
    // Non-positive entries (marginal-sea flags included) are land.
    let kmt: Vec<usize> = raw.into_iter().map(|v| v.max(0) as usize).collect();
    let bottom_index = to_array2(kmt, nj, ni)?;

    let lon = read_horizontal_coord(&file, GRID_LON_NAMES, nj, ni, false)?;
    let lat = read_horizontal_coord(&file, GRID_LAT_NAMES, nj, ni, true)?;

    let tripolar = tripolar.unwrap_or_else(|| global_flag(&file, "tripolar"));

    let grid = OceanGrid::new(name, dz, bottom_index, lon, lat, tripolar)?;
    info!(
        "read grid {} from {}: {} (tripolar: {})",
        name,
        path.display(),
        grid.shape(),
        tripolar
    );
    Ok(grid)
}

/// Read one source climatology variable on its native lon/lat/depth grid.
///
/// Variables without a depth dimension are read as a single level at 0 m.
pub fn read_source_field(path: impl AsRef<Path>, variable: &str) -> Result<SourceField, NetCDFError> {
    let path = path.as_ref();
    let file = netcdf::open(path)?;
    let var = file
        .variable(variable)
        .ok_or_else(|| NetCDFError::MissingVariable(variable.to_string()))?;

    let lon = read_coord(&file, LON_NAMES)?;
    let lat = read_coord(&file, LAT_NAMES)?;

    let dims = var.dimensions();
    let depth = match dims.iter().find(|d| DEPTH_NAMES.contains(&d.name().as_str())) {
        Some(dim) => {
            let dim_name = dim.name();
            let depth: Vec<f64> = match file.variable(&dim_name) {
                Some(coord) => coord.get_values(..)?,
                None => read_coord(&file, DEPTH_NAMES)?,
            };
            if depth.len() != dim.len() {
                return Err(NetCDFError::InvalidData(format!(
                    "{variable}: depth coordinate has {} levels, dimension '{dim_name}' has {}",
                    depth.len(),
                    dim.len()
                )));
            }
            depth
        }
        None => vec![0.0],
    };

    let lens: Vec<usize> = dims.iter().map(|d| d.len()).collect();
    if lens.len() < 2 || lens[lens.len() - 2..] != [lat.len(), lon.len()] {
        return Err(NetCDFError::InvalidData(format!(
            "{variable}: trailing dimensions {lens:?} do not match lat/lon ({}, {})",
            lat.len(),
            lon.len()
        )));
    }

    // Leading dimensions beyond depth are records; keep the first.
    let n_values = depth.len() * lat.len() * lon.len();
    let mut flat = read_unpacked(&var)?;
    if flat.len() < n_values {
        return Err(NetCDFError::InvalidData(format!(
            "{variable}: {} values, expected at least {n_values}",
            flat.len()
        )));
    }
    flat.truncate(n_values);

    let values = Array3::from_shape_vec((depth.len(), lat.len(), lon.len()), flat)
        .map_err(|e| NetCDFError::InvalidData(e.to_string()))?;
    let units = get_attr_string(&var, "units").unwrap_or_default();

    debug!(
        "read {} from {}: {} levels, {}x{}",
        variable,
        path.display(),
        depth.len(),
        lat.len(),
        lon.len()
    );

    Ok(SourceField::new(variable, units, lon, lat, depth, values)?)
}

/// Read a precomputed sediment fraction `[k, j, i]` on the destination grid.
pub fn read_sedfrac(path: impl AsRef<Path>, variable: &str) -> Result<Array3<f64>, NetCDFError> {
    let file = netcdf::open(path.as_ref())?;
    let var = file
        .variable(variable)
        .ok_or_else(|| NetCDFError::MissingVariable(variable.to_string()))?;

    let (nk, nj, ni) = match dim_lengths(&var).as_slice() {
        &[nk, nj, ni] => (nk, nj, ni),
        other => {
            return Err(NetCDFError::InvalidData(format!(
                "{variable} must be 3D, found dimensions {other:?}"
            )));
        }
    };

    let flat = read_unpacked(&var)?;
    Array3::from_shape_vec((nk, nj, ni), flat).map_err(|e| NetCDFError::InvalidData(e.to_string()))
}

/// Find the first variable present under any of `names`.
fn find_variable<'f>(file: &'f netcdf::File, names: &[&str]) -> Result<netcdf::Variable<'f>, NetCDFError> {
    names
        .iter()
        .find_map(|name| file.variable(name))
        .ok_or_else(|| NetCDFError::MissingVariable(names.join(" or ")))
}

/// Read a 1D coordinate variable.
fn read_coord(file: &netcdf::File, names: &[&str]) -> Result<Vec<f64>, NetCDFError> {
    let var = find_variable(file, names)?;
    Ok(var.get_values(..)?)
}

/// Read a 2D horizontal coordinate, broadcasting 1D axes.
fn read_horizontal_coord(
    file: &netcdf::File,
    names: &[&str],
    nj: usize,
    ni: usize,
    along_rows: bool,
) -> Result<Array2<f64>, NetCDFError> {
    let var = find_variable(file, names)?;
    let data: Vec<f64> = var.get_values(..)?;

    match (dim_lengths(&var).as_slice(), along_rows) {
        (&[a, b], _) if (a, b) == (nj, ni) => to_array2(data, nj, ni),
        (&[n], true) if n == nj => Ok(Array2::from_shape_fn((nj, ni), |(j, _)| data[j])),
        (&[n], false) if n == ni => Ok(Array2::from_shape_fn((nj, ni), |(_, i)| data[i])),
        (other, _) => Err(NetCDFError::Grid(GridError::ShapeMismatch {
            name: var.name(),
            expected: vec![nj, ni],
            found: other.to_vec(),
        })),
    }
}

/// Read a variable as f64, unpacking and replacing fill values with NaN.
fn read_unpacked(var: &netcdf::Variable) -> Result<Vec<f64>, NetCDFError> {
    let scale = get_attr_f64(var, "scale_factor").unwrap_or(1.0);
    let offset = get_attr_f64(var, "add_offset").unwrap_or(0.0);
    let fill = get_attr_f64(var, "_FillValue").or_else(|| get_attr_f64(var, "missing_value"));

    let raw: Vec<f64> = var.get_values(..)?;
    Ok(raw
        .into_iter()
        .map(|v| {
            if !is_valid_f64(v) || fill.is_some_and(|f| v == f) {
                f64::NAN
            } else {
                v * scale + offset
            }
        })
        .collect())
}

fn dim_lengths(var: &netcdf::Variable) -> Vec<usize> {
    var.dimensions().iter().map(|d| d.len()).collect()
}

fn to_array2<T>(data: Vec<T>, nj: usize, ni: usize) -> Result<Array2<T>, NetCDFError> {
    Array2::from_shape_vec((nj, ni), data).map_err(|e| NetCDFError::InvalidData(e.to_string()))
}

/// Get numeric attribute value as f64.
fn get_attr_f64(var: &netcdf::Variable, name: &str) -> Option<f64> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            AttributeValue::Double(d) => Some(d),
            AttributeValue::Float(f) => Some(f as f64),
            AttributeValue::Int(i) => Some(i as f64),
            AttributeValue::Short(s) => Some(s as f64),
            _ => None,
        })
}

/// Get string attribute value.
fn get_attr_string(var: &netcdf::Variable, name: &str) -> Option<String> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        })
}

/// Interpret a global attribute as a boolean flag; absent means false.
fn global_flag(file: &netcdf::File, name: &str) -> bool {
    file.attribute(name)
        .and_then(|a| a.value().ok())
        .is_some_and(|v| match v {
            AttributeValue::Int(i) => i != 0,
            AttributeValue::Short(s) => s != 0,
            AttributeValue::Uchar(u) => u != 0,
            AttributeValue::Schar(s) => s != 0,
            AttributeValue::Str(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
            _ => false,
        })
}

// ============================================================================
// Writer
// ============================================================================

/// Configuration for dataset output.
#[derive(Debug, Clone)]
pub struct DatasetWriterConfig {
    /// Output file path
    pub path: PathBuf,
    /// Title attribute (CF-conventions)
    pub title: Option<String>,
    /// Institution attribute
    pub institution: Option<String>,
    /// Comment attribute
    pub comment: Option<String>,
    /// Provenance for `history`, `source` and `input_files`
    pub provenance: Option<Provenance>,
}

impl DatasetWriterConfig {
    /// Create a new configuration with the given output path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: None,
            institution: None,
            comment: None,
            provenance: None,
        }
    }

    /// Set the title attribute.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the institution attribute.
    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    /// Set the comment attribute.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the provenance record.
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }
}

/// NetCDF writer for fields on the destination grid.
pub struct DatasetWriter {
    file: netcdf::FileMut,
    shape: GridShape,
    variables: Vec<String>,
}

impl DatasetWriter {
    /// Create the output file and write grid metadata.
    pub fn create(config: DatasetWriterConfig, grid: &OceanGrid) -> Result<Self, NetCDFError> {
        let shape = grid.shape();
        let mut file = create(&config.path)?;

        file.add_dimension("z_t", shape.nk)?;
        file.add_dimension("nlat", shape.nj)?;
        file.add_dimension("nlon", shape.ni)?;

        {
            let mut z_var = file.add_variable::<f64>("z_t", &["z_t"])?;
            z_var.put_attribute("long_name", "depth from surface to midpoint of layer")?;
            z_var.put_attribute("units", "m")?;
            z_var.put_attribute("positive", "down")?;
            z_var.put_values(&grid.depth_centers(), ..)?;
        }

        {
            let mut dz_var = file.add_variable::<f64>("dz", &["z_t"])?;
            dz_var.put_attribute("long_name", "thickness of layer k")?;
            dz_var.put_attribute("units", "m")?;
            dz_var.put_values(grid.dz(), ..)?;
        }

        {
            let kmt: Vec<i32> = grid.bottom_index().iter().map(|&d| d as i32).collect();
            let mut kmt_var = file.add_variable::<i32>("KMT", &["nlat", "nlon"])?;
            kmt_var.put_attribute("long_name", "k index of deepest grid cell on T grid")?;
            kmt_var.put_values(&kmt, ..)?;
        }

        {
            let lon: Vec<f64> = grid.lon().iter().copied().collect();
            let mut lon_var = file.add_variable::<f64>("TLONG", &["nlat", "nlon"])?;
            lon_var.put_attribute("standard_name", "longitude")?;
            lon_var.put_attribute("long_name", "array of t-grid longitudes")?;
            lon_var.put_attribute("units", "degrees_east")?;
            lon_var.put_values(&lon, ..)?;
        }

        {
            let lat: Vec<f64> = grid.lat().iter().copied().collect();
            let mut lat_var = file.add_variable::<f64>("TLAT", &["nlat", "nlon"])?;
            lat_var.put_attribute("standard_name", "latitude")?;
            lat_var.put_attribute("long_name", "array of t-grid latitudes")?;
            lat_var.put_attribute("units", "degrees_north")?;
            lat_var.put_values(&lat, ..)?;
        }

        // Global attributes
        file.add_attribute("Conventions", "CF-1.8")?;
        file.add_attribute("grid", grid.name())?;
        file.add_attribute("tripolar", i32::from(grid.topology().is_tripolar()))?;
        if let Some(ref title) = config.title {
            file.add_attribute("title", title.as_str())?;
        }
        if let Some(ref institution) = config.institution {
            file.add_attribute("institution", institution.as_str())?;
        }
        if let Some(ref comment) = config.comment {
            file.add_attribute("comment", comment.as_str())?;
        }
        if let Some(ref provenance) = config.provenance {
            file.add_attribute("source", provenance.source_repo.as_str())?;
            file.add_attribute("history", provenance.history().as_str())?;
            file.add_attribute("input_files", provenance.input_files_attribute().as_str())?;
        }

        info!("created {} for grid {}", config.path.display(), grid.name());

        Ok(Self {
            file,
            shape,
            variables: Vec::new(),
        })
    }

    /// Write a filled field.
    pub fn write_field(&mut self, field: &Field3D) -> Result<(), NetCDFError> {
        self.write_variable(field.name(), field.units(), field.long_name(), field.values())
    }

    /// Write a `[z_t, nlat, nlon]` variable; NaN becomes `_FillValue`.
    pub fn write_variable(
        &mut self,
        name: &str,
        units: &str,
        long_name: Option<&str>,
        values: &Array3<f64>,
    ) -> Result<(), NetCDFError> {
        if values.dim() != self.shape.dim() {
            return Err(NetCDFError::Grid(GridError::ShapeMismatch {
                name: name.to_string(),
                expected: vec![self.shape.nk, self.shape.nj, self.shape.ni],
                found: values.shape().to_vec(),
            }));
        }

        let data: Vec<f64> = values
            .iter()
            .map(|&v| if is_valid_f64(v) { v } else { FILL_VALUE_F64 })
            .collect();

        let mut var = self.file.add_variable::<f64>(name, &["z_t", "nlat", "nlon"])?;
        var.put_attribute("_FillValue", FILL_VALUE_F64)?;
        var.put_attribute("units", units)?;
        if let Some(long_name) = long_name {
            var.put_attribute("long_name", long_name)?;
        }
        var.put_attribute("coordinates", "TLONG TLAT z_t")?;
        var.put_values(&data, ..)?;

        debug!("wrote variable {}", name);
        self.variables.push(name.to_string());
        Ok(())
    }

    /// Names of the data variables written so far.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

// ============================================================================
// Tests
// ============================================================================
