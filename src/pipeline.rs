//! Field processing pipeline.
//!
//! For each tracer: regrid the source climatology onto the destination
//! grid, mask land, apply the unit conversion, then fill missing ocean
//! cells. Sediment forcing is computed from a precomputed sediment fraction
//! on the same grid.
//!
//! Capabilities (regridding, lateral fill) are injected into
//! [`FieldProcessor`], so the pipeline can be driven with synthetic inputs.
//! [`run`] wires the whole configured job to NetCDF files.

use std::path::Path;
#[cfg(feature = "netcdf")]
use std::path::PathBuf;

use log::{debug, info};
use ndarray::Array3;
use thiserror::Error;

use crate::config::{ConfigError, RunConfig, TracerSpec};
use crate::fill::{FillReport, Field3D, LateralFill, NeighborAverageFill, fill_missing};
use crate::grid::{GridError, OceanGrid, OceanMask};
use crate::regrid::{RegridError, Regridder, SourceField, StandardRegridder};
use crate::sediment::{SedimentConfig, SedimentForcing};

#[cfg(feature = "netcdf")]
use crate::io::{DatasetWriter, DatasetWriterConfig, NetCDFError, read_grid, read_sedfrac, read_source_field};
#[cfg(feature = "netcdf")]
use crate::provenance::Provenance;

/// Error type for a pipeline run. Every variant is fatal.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Regrid(#[from] RegridError),

    #[cfg(feature = "netcdf")]
    #[error(transparent)]
    NetCDF(#[from] NetCDFError),
}

/// Regrids, masks, converts and fills fields on one destination grid.
pub struct FieldProcessor<'g> {
    grid: &'g OceanGrid,
    mask: OceanMask,
    regridder: Box<dyn Regridder>,
    lateral: Box<dyn LateralFill>,
}

impl<'g> FieldProcessor<'g> {
    /// Processor with the standard regridder and neighbor-average fill.
    pub fn new(grid: &'g OceanGrid) -> Self {
        Self {
            grid,
            mask: grid.mask(),
            regridder: Box::new(StandardRegridder),
            lateral: Box::new(NeighborAverageFill::default()),
        }
    }

    /// Replace the regridding capability.
    pub fn with_regridder(mut self, regridder: impl Regridder + 'static) -> Self {
        self.regridder = Box::new(regridder);
        self
    }

    /// Replace the lateral fill capability.
    pub fn with_lateral_fill(mut self, lateral: impl LateralFill + 'static) -> Self {
        self.lateral = Box::new(lateral);
        self
    }

    pub fn grid(&self) -> &OceanGrid {
        self.grid
    }

    pub fn mask(&self) -> &OceanMask {
        &self.mask
    }

    /// Produce one filled tracer field on the destination grid.
    ///
    /// Residual missing cells are reported, not fatal; a regridder
    /// returning the wrong shape is.
    pub fn process(&self, source: &SourceField, tracer: &TracerSpec) -> Result<(Field3D, FillReport), PipelineError> {
        let values = self.regridder.regrid(source, self.grid)?;
        self.grid.check_shape(&tracer.name, &values)?;

        let mut field = Field3D::new(tracer.name.as_str(), tracer.units.as_str(), values);
        if let Some(long_name) = &tracer.long_name {
            field = field.with_long_name(long_name.as_str());
        }
        field.normalize_missing();
        field.apply_mask(&self.mask);
        field.scale(tracer.scale);

        let report = fill_missing(&mut field, &self.mask, self.grid.topology(), self.lateral.as_ref());

        info!(
            "{}: regridded with {} from '{}', {} missing before fill, {} after",
            tracer.name,
            self.regridder.name(),
            source.name,
            report.missing_before,
            report.residual
        );
        if let Some((min, max)) = field.valid_range() {
            debug!("{}: filled values span [{min}, {max}] {}", tracer.name, field.units());
        }

        Ok((field, report))
    }

    /// Sediment forcing from a sediment fraction on this grid.
    pub fn sediment_forcing(&self, sedfrac: &Array3<f64>, config: &SedimentConfig) -> Result<SedimentForcing, PipelineError> {
        Ok(SedimentForcing::compute(self.grid, sedfrac, config)?)
    }
}

/// Load and validate the run configuration.
pub fn load_config(path: impl AsRef<Path>) -> Result<RunConfig, PipelineError> {
    let path = path.as_ref();
    let config = RunConfig::load(path)?;
    info!(
        "{} tracers onto grid {} from {}",
        config.tracers.len(),
        config.grid.name,
        path.display()
    );
    Ok(config)
}

/// Outcome of a configured run.
#[derive(Debug, Clone)]
#[cfg(feature = "netcdf")]
pub struct RunSummary {
    /// File written
    pub output: PathBuf,
    /// One report per tracer, in configuration order
    pub reports: Vec<FillReport>,
    /// Number of land-adjacent cells, when sediment forcing was produced
    pub land_adjacent_cells: Option<usize>,
}

#[cfg(feature = "netcdf")]
impl RunSummary {
    /// Tracers that still have missing ocean cells.
    pub fn incomplete(&self) -> impl Iterator<Item = &FillReport> {
        self.reports.iter().filter(|r| !r.is_complete())
    }
}

/// Run a configured job end to end.
///
/// `output` overrides the configured output path.
#[cfg(feature = "netcdf")]
pub fn run(config: &RunConfig, output: Option<&Path>) -> Result<RunSummary, PipelineError> {
    let grid = read_grid(&config.grid.path, &config.grid.name, config.grid.tripolar)?;
    let mask = grid.mask();
    info!("grid {}: {}", grid.name(), mask.statistics());

    let processor =
        FieldProcessor::new(&grid).with_lateral_fill(NeighborAverageFill::new(config.fill.max_sweeps));

    let mut provenance = Provenance::from_config(&config.provenance);
    for path in config.input_files() {
        provenance.add_input(path);
    }

    let output = output.map_or_else(|| config.output.path.clone(), Path::to_path_buf);
    let mut writer_config = DatasetWriterConfig::new(&output).with_provenance(provenance);
    if let Some(title) = &config.output.title {
        writer_config = writer_config.with_title(title.as_str());
    }
    if let Some(institution) = &config.output.institution {
        writer_config = writer_config.with_institution(institution.as_str());
    }
    if let Some(comment) = &config.output.comment {
        writer_config = writer_config.with_comment(comment.as_str());
    }
    let mut writer = DatasetWriter::create(writer_config, &grid)?;

    let mut reports = Vec::with_capacity(config.tracers.len());
    for tracer in &config.tracers {
        let source = read_source_field(&tracer.source_path, &tracer.source_variable)?;
        let (field, report) = processor.process(&source, tracer)?;
        writer.write_field(&field)?;
        reports.push(report);
    }

    let land_adjacent_cells = match &config.sediment {
        Some(input) => {
            let sedfrac = read_sedfrac(&input.path, &input.variable)?;
            let forcing = processor.sediment_forcing(&sedfrac, &input.params)?;
            writer.write_variable(
                "sedfrac",
                "1",
                Some("fraction of cell volume on the sea floor"),
                &forcing.sedfrac,
            )?;
            writer.write_variable("fesedflux", "nmol/cm^2/s", Some("iron sediment flux"), &forcing.iron_flux)?;
            Some(forcing.adjacency.count())
        }
        None => None,
    };

    info!("wrote {}", output.display());

    Ok(RunSummary {
        output,
        reports,
        land_adjacent_cells,
    })
}
