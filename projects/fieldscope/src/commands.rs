use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use fieldscope::engine::grid::{rasterize_with, GridConfig, GridSummary};
use fieldscope::engine::measure::Measurement;
use fieldscope::engine::slot::{parse_calendar_date, validate_slot};
use fieldscope::engine::types::Point;
use fieldscope::export::write_cells_csv;
use fieldscope::records::{latest_prediction, PolygonGeometry, PredictionRecord};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Where the index series for a grid comes from
pub enum SeriesSource<'a> {
    File(&'a Path),
    Prediction { path: &'a Path, field_id: &'a str },
    Empty,
}

pub fn load_series(source: SeriesSource<'_>) -> Result<Vec<f64>> {
    match source {
        SeriesSource::File(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read series {}", path.display()))?;
            Ok(serde_json::from_str(&content)?)
        }
        SeriesSource::Prediction { path, field_id } => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read predictions {}", path.display()))?;
            let records: Vec<PredictionRecord> = serde_json::from_str(&content)?;
            match latest_prediction(&records, field_id) {
                Some(record) => Ok(record.result.ndvi_series.clone()),
                None => {
                    tracing::warn!("No prediction found for field {}", field_id);
                    Ok(Vec::new())
                }
            }
        }
        SeriesSource::Empty => Ok(Vec::new()),
    }
}

pub fn run_grid(
    boundary_path: &Path,
    series: &[f64],
    config: &GridConfig,
    format: OutputFormat,
    out: Option<&Path>,
) -> Result<()> {
    let content = fs::read_to_string(boundary_path)
        .with_context(|| format!("Failed to read boundary {}", boundary_path.display()))?;
    let geometry: PolygonGeometry = serde_json::from_str(&content)?;
    let boundary = geometry.to_boundary()?;

    let cells = rasterize_with(&boundary, series, config)?;
    let summary = GridSummary::from_cells(config, &cells);
    tracing::info!(
        "Grid {}x{}: {} cells inside, mean index {:?}",
        summary.rows,
        summary.cols,
        summary.inside_cells,
        summary.mean_value
    );

    let mut writer: Box<dyn Write> = match out {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({ "summary": summary, "cells": cells });
            serde_json::to_writer_pretty(&mut writer, &body)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => write_cells_csv(&mut writer, &cells)?,
    }
    Ok(())
}

/// Parses a finite `lat,lng` pair
pub fn parse_point(raw: &str) -> Result<Point> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("Expected lat,lng but got {:?}", raw))?;
    let point = Point::new(lat.trim().parse()?, lng.trim().parse()?);
    if !point.is_finite() {
        anyhow::bail!("Coordinates must be finite, got {:?}", raw);
    }
    Ok(point)
}

pub fn run_measure(raw_points: &[String]) -> Result<Measurement> {
    let points = raw_points
        .iter()
        .map(|p| parse_point(p))
        .collect::<Result<Vec<_>>>()?;
    let measurement = Measurement::checked(points)?;
    println!("Distance: {}", measurement.label());
    Ok(measurement)
}

pub fn run_slot(from: &str, to: Option<&str>) -> Result<()> {
    let from = parse_calendar_date(from)?;
    let to = to.map(parse_calendar_date).transpose()?;
    let slot = validate_slot(Some(from), to)?;
    println!("{}", serde_json::to_string(&slot)?);
    Ok(())
}
