//! # bgc-inputs
//!
//! Initial-condition and sediment forcing generation for ocean
//! biogeochemistry models on layered, masked z-level grids.
//!
//! This crate provides:
//! - Destination grid description (layer thicknesses, bottom index, ocean mask)
//! - Horizontal topology with cyclic longitude and the tripolar fold
//! - Regridding of source climatologies (bilinear horizontal, conservative vertical)
//! - Missing-value fill (lateral neighbor averaging, vertical nearest-above)
//! - Land-adjacency classification and the sediment fraction floor
//! - Run configuration, provenance, and NetCDF I/O (`netcdf` feature)

pub mod config;
pub mod fill;
pub mod grid;
#[cfg(feature = "netcdf")]
pub mod io;
pub mod pipeline;
pub mod provenance;
pub mod regrid;
pub mod sediment;
pub mod types;

// Re-export main types for convenience
pub use config::{ConfigError, RunConfig, TracerSpec};
pub use fill::{
    FillReport, Field3D, LateralFill, LateralFillStats, NeighborAverageFill, fill_missing,
    vertical_fill,
};
pub use grid::{Direction, GridError, GridTopology, MaskStatistics, OceanGrid, OceanMask};
pub use pipeline::{FieldProcessor, PipelineError, load_config};
#[cfg(feature = "netcdf")]
pub use pipeline::{RunSummary, run};
pub use provenance::Provenance;
pub use regrid::{RegridError, Regridder, SourceField, StandardRegridder};
pub use sediment::{
    LandAdjacency, SedimentConfig, SedimentForcing, apply_land_adjacent_floor, land_adjacency,
};
pub use types::{Cell, GridShape};

#[cfg(feature = "netcdf")]
pub use io::{DatasetWriter, DatasetWriterConfig, NetCDFError};
