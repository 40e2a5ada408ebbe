//! NetCDF input and output (requires the `netcdf` feature).
//!
//! This module provides:
//! - **Grid reader**: destination grid (`dz`, `KMT`, `TLONG`, `TLAT`)
//! - **Source reader**: climatology variables on regular lon/lat/depth grids
//! - **Sediment reader**: precomputed sediment fraction on the destination grid
//! - **Dataset writer**: filled fields plus grid metadata and provenance
//!
//! # File Formats
//!
//! ## Grid Files
//!
//! ```text
//! dimensions:
//!     z_t = 60 ; nlat = 384 ; nlon = 320 ;
//! variables:
//!     double dz(z_t) ;          // cm or m, per the units attribute
//!     int KMT(nlat, nlon) ;     // wet levels per column, 0 = land
//!     double TLONG(nlat, nlon) ;
//!     double TLAT(nlat, nlon) ;
//! // global attributes:
//!     :tripolar = 1 ;           // optional
//! ```
//!
//! ## Source Files
//!
//! ```text
//! dimensions:
//!     time = 1 ; depth = 57 ; lat = 180 ; lon = 360 ;
//! variables:
//!     float n_an(time, depth, lat, lon) ;
//! ```

mod netcdf_io;

pub use netcdf_io::{
    DatasetWriter, DatasetWriterConfig, NetCDFError, read_grid, read_sedfrac, read_source_field,
};
