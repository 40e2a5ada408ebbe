//! End-to-end run through NetCDF files.
//!
//! Writes a small grid, a source climatology and a sediment fraction to a
//! temporary directory, runs a configured job and inspects the output file.

#![cfg(feature = "netcdf")]

use std::path::Path;

use bgc_inputs::config::RunConfig;
use bgc_inputs::pipeline::{PipelineError, load_config, run};
use netcdf::AttributeValue;
use tempfile::tempdir;

fn write_grid(path: &Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("z_t", 3).unwrap();
    file.add_dimension("nlat", 3).unwrap();
    file.add_dimension("nlon", 3).unwrap();

    let mut dz = file.add_variable::<f64>("dz", &["z_t"]).unwrap();
    dz.put_attribute("units", "m").unwrap();
    dz.put_values(&[10.0, 10.0, 10.0], ..).unwrap();

    let mut kmt = file.add_variable::<i32>("KMT", &["nlat", "nlon"]).unwrap();
    kmt.put_values(&[1, 1, 1, 1, 2, 1, 1, 1, 1], ..).unwrap();

    let mut lon = file.add_variable::<f64>("TLONG", &["nlon"]).unwrap();
    lon.put_values(&[60.0, 180.0, 300.0], ..).unwrap();

    let mut lat = file.add_variable::<f64>("TLAT", &["nlat"]).unwrap();
    lat.put_values(&[60.0, 0.0, -60.0], ..).unwrap();
}

fn write_source(path: &Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("depth", 3).unwrap();
    file.add_dimension("lat", 3).unwrap();
    file.add_dimension("lon", 4).unwrap();
    file.add_variable::<f64>("depth", &["depth"]).unwrap().put_values(&[5.0, 15.0, 25.0], ..).unwrap();
    file.add_variable::<f64>("lat", &["lat"]).unwrap().put_values(&[-60.0, 0.0, 60.0], ..).unwrap();
    file.add_variable::<f64>("lon", &["lon"])
        .unwrap()
        .put_values(&[0.0, 90.0, 180.0, 270.0], ..)
        .unwrap();

    let values: Vec<f64> = (0..36).map(|n| if n / 12 == 1 { 1.0e36 } else { 2.0 }).collect();
    let mut var = file.add_variable::<f64>("p_an", &["depth", "lat", "lon"]).unwrap();
    var.put_attribute("_FillValue", 1.0e36).unwrap();
    var.put_values(&values, ..).unwrap();
}

fn write_sedfrac(path: &Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("z_t", 3).unwrap();
    file.add_dimension("nlat", 3).unwrap();
    file.add_dimension("nlon", 3).unwrap();
    let mut var = file.add_variable::<f64>("sedfrac", &["z_t", "nlat", "nlon"]).unwrap();
    var.put_values(&[0.01; 27], ..).unwrap();
}

fn config_text(dir: &Path) -> String {
    format!(
        r#"
        [grid]
        path = "{dir}/grid.nc"
        name = "test3x3"

        [output]
        path = "{dir}/out.nc"
        title = "test run"
        institution = "NCAR"
        comment = "synthetic inputs"

        [provenance]
        source_repo = "bgc-inputs"
        commit = "deadbeef"

        [[tracers]]
        name = "PO4"
        source_path = "{dir}/woa.nc"
        source_variable = "p_an"
        units = "mmol/m^3"

        [sediment]
        path = "{dir}/sedfrac.nc"
        "#,
        dir = dir.display()
    )
}

#[test]
fn test_configured_run() {
    let dir = tempdir().unwrap();
    write_grid(&dir.path().join("grid.nc"));
    write_source(&dir.path().join("woa.nc"));
    write_sedfrac(&dir.path().join("sedfrac.nc"));

    let config = RunConfig::from_toml_str(&config_text(dir.path())).unwrap();
    let summary = run(&config, None).unwrap();

    assert_eq!(summary.reports.len(), 1);
    assert!(summary.reports[0].is_complete());
    assert_eq!(summary.land_adjacent_cells, Some(9));

    let file = netcdf::open(&summary.output).unwrap();
    let po4: Vec<f64> = file.variable("PO4").unwrap().get_values(..).unwrap();
    // Center column, level 1: missing in the source, filled from above.
    assert_eq!(po4[9 + 4], 2.0);

    let sedfrac: Vec<f64> = file.variable("sedfrac").unwrap().get_values(..).unwrap();
    assert_eq!(sedfrac[0], 0.03);
    assert_eq!(sedfrac[4], 0.01);
    assert_eq!(sedfrac[9 + 4], 0.03);

    let history = file.attribute("history").unwrap().value().unwrap();
    assert!(matches!(history, AttributeValue::Str(ref s) if s.contains("deadbeef")));
    let institution = file.attribute("institution").unwrap().value().unwrap();
    assert!(matches!(institution, AttributeValue::Str(ref s) if s == "NCAR"));
    let comment = file.attribute("comment").unwrap().value().unwrap();
    assert!(matches!(comment, AttributeValue::Str(ref s) if s == "synthetic inputs"));
}

#[test]
fn test_run_from_config_file() {
    let dir = tempdir().unwrap();
    write_grid(&dir.path().join("grid.nc"));
    write_source(&dir.path().join("woa.nc"));
    write_sedfrac(&dir.path().join("sedfrac.nc"));
    let config_path = dir.path().join("run.toml");
    std::fs::write(&config_path, config_text(dir.path())).unwrap();

    let config = load_config(&config_path).unwrap();
    assert_eq!(config.grid.name, "test3x3");
    let summary = run(&config, None).unwrap();
    assert!(summary.output.exists());
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempdir().unwrap();
    write_grid(&dir.path().join("grid.nc"));

    let config = RunConfig::from_toml_str(&config_text(dir.path())).unwrap();
    let other = dir.path().join("elsewhere.nc");
    let result = run(&config, Some(&other));
    assert!(matches!(result, Err(PipelineError::NetCDF(_))));
}
