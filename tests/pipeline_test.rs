//! Integration tests for the field processing pipeline.
//!
//! These tests verify:
//! 1. Regrid, mask and fill of a synthetic climatology
//! 2. Deep holes unreachable by the lateral fill are closed vertically
//! 3. Residual gaps are reported without failing the run
//! 4. The vertical fill is a fixed point
//! 5. The lateral fill reaches across the tripolar fold

use bgc_inputs::config::TracerSpec;
use bgc_inputs::fill::{LateralFill, LateralFillStats, vertical_fill};
use bgc_inputs::grid::{GridTopology, OceanGrid, OceanMask};
use bgc_inputs::pipeline::FieldProcessor;
use bgc_inputs::regrid::{RegridError, Regridder, SourceField};
use ndarray::{Array3, array};

const TOL: f64 = 1e-12;

/// 3 levels, 3x3 columns, single deep column at the center.
fn grid() -> OceanGrid {
    let kmt = array![[1, 1, 1], [1, 2, 1], [1, 1, 1]];
    OceanGrid::from_bottom_index(vec![10.0, 10.0, 10.0], kmt, false).unwrap()
}

/// Global source with level values 3, 2, 1 at 5, 15, 25 m.
fn source(values: Array3<f64>) -> SourceField {
    SourceField::new(
        "n_an",
        "umol/kg",
        vec![0.0, 90.0, 180.0, 270.0],
        vec![-60.0, 0.0, 60.0],
        vec![5.0, 15.0, 25.0],
        values,
    )
    .unwrap()
}

fn layered() -> Array3<f64> {
    Array3::from_shape_fn((3, 3, 4), |(k, _, _)| 3.0 - k as f64)
}

/// Lateral fill that leaves everything untouched.
struct NoLateral;

impl LateralFill for NoLateral {
    fn fill(&self, _values: &mut Array3<f64>, _mask: &OceanMask, _topology: &GridTopology) -> LateralFillStats {
        LateralFillStats::default()
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Regridder returning a fixed array.
struct Fixed(Array3<f64>);

impl Regridder for Fixed {
    fn regrid(&self, _source: &SourceField, _grid: &OceanGrid) -> Result<Array3<f64>, RegridError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[test]
fn test_layered_source_regrids_exactly() {
    let grid = grid();
    let processor = FieldProcessor::new(&grid);
    let tracer = TracerSpec::new("NO3", "woa.nc", "n_an", "mmol/m^3");

    let (field, report) = processor.process(&source(layered()), &tracer).unwrap();

    assert_eq!(report.missing_before, 0);
    assert!(report.is_complete());
    for j in 0..3 {
        for i in 0..3 {
            assert!((field.values()[[0, j, i]] - 3.0).abs() < TOL);
        }
    }
    assert!((field.values()[[1, 1, 1]] - 2.0).abs() < TOL);
    assert!(field.values()[[1, 0, 0]].is_nan());
    assert!(field.values()[[2, 1, 1]].is_nan());
}

#[test]
fn test_deep_hole_closed_vertically() {
    let grid = grid();
    let mut values = layered();
    values.slice_mut(ndarray::s![1, .., ..]).fill(f64::NAN);

    let processor = FieldProcessor::new(&grid);
    let tracer = TracerSpec::new("NO3", "woa.nc", "n_an", "mmol/m^3").with_scale(2.0);
    let (field, report) = processor.process(&source(values), &tracer).unwrap();

    // The center is the only wet cell on level 1, so nothing lateral helps.
    assert_eq!(report.missing_before, 1);
    assert_eq!(report.missing_after_lateral, 1);
    assert_eq!(report.residual, 0);
    assert!((field.values()[[1, 1, 1]] - 6.0).abs() < TOL);
}

#[test]
fn test_surface_gap_is_reported_not_fatal() {
    let grid = grid();
    let values = Array3::from_elem((3, 3, 4), f64::NAN);

    let processor = FieldProcessor::new(&grid).with_lateral_fill(NoLateral);
    let tracer = TracerSpec::new("Fe", "fe.nc", "fe", "mmol/m^3");
    let (field, report) = processor.process(&source(values), &tracer).unwrap();

    assert_eq!(report.residual, grid.mask().wet_count());
    assert!(!report.is_complete());
    assert_eq!(report.field, "Fe");
    assert_eq!(field.missing_count(processor.mask()), 10);
}

#[test]
fn test_vertical_fill_fixed_point() {
    let grid = grid();
    let mask = grid.mask();
    let mut values = Array3::from_elem((3, 3, 3), f64::NAN);
    values[[0, 1, 1]] = 4.0;
    values[[0, 0, 0]] = 1.0;

    vertical_fill(&mut values, &mask);
    let once = values.clone();
    vertical_fill(&mut values, &mask);

    assert_eq!(values[[1, 1, 1]], 4.0);
    for (a, b) in once.iter().zip(values.iter()) {
        assert!(a == b || (a.is_nan() && b.is_nan()));
    }
}

#[test]
fn test_tripolar_fold_fills_row_zero() {
    // Two ocean cells on row 0 that only meet across the fold.
    let kmt = array![[0, 1, 0, 0, 1, 0]];
    let mut values = Array3::from_elem((1, 1, 6), f64::NAN);
    values[[0, 0, 4]] = 7.0;
    let tracer = TracerSpec::new("Fe", "fe.nc", "fe", "mmol/m^3");

    let tripolar = OceanGrid::from_bottom_index(vec![10.0], kmt.clone(), true).unwrap();
    let processor = FieldProcessor::new(&tripolar).with_regridder(Fixed(values.clone()));
    let (field, report) = processor.process(&source(layered()), &tracer).unwrap();
    assert_eq!(report.missing_before, 1);
    assert_eq!(report.missing_after_lateral, 0);
    assert!(report.is_complete());
    assert!((field.values()[[0, 0, 1]] - 7.0).abs() < TOL);

    let open = OceanGrid::from_bottom_index(vec![10.0], kmt, false).unwrap();
    let processor = FieldProcessor::new(&open).with_regridder(Fixed(values));
    let (field, report) = processor.process(&source(layered()), &tracer).unwrap();
    assert_eq!(report.residual, 1);
    assert!(field.values()[[0, 0, 1]].is_nan());
}
