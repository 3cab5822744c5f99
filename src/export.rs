//! Report export: flat field-mapping records, CSV, JSON and a text table.
//!
//! CSV output is one header line plus one row per record. Porosity series are
//! joined with `;` so each record stays a single row; absent optional fields
//! are empty cells.

use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;

use crate::error::ExportError;
use crate::types::{AnalysisReport, AnalyzedSample, TrapPrediction};

/// A record that flattens to one CSV row.
pub trait FlatRecord {
    /// Column names, in row order.
    fn headers() -> &'static [&'static str];
    /// Cell values, one per header.
    fn row(&self) -> Vec<String>;

    /// Header → value mapping for tabular consumers.
    fn to_flat_map(&self) -> serde_json::Map<String, serde_json::Value> {
        Self::headers()
            .iter()
            .zip(self.row())
            .map(|(h, v)| ((*h).to_string(), serde_json::Value::String(v)))
            .collect()
    }
}

fn num(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        value.to_string()
    }
}

fn opt_num(value: Option<f64>) -> String {
    value.map(num).unwrap_or_default()
}

impl FlatRecord for AnalyzedSample {
    fn headers() -> &'static [&'static str] {
        &[
            "depth",
            "lithology",
            "porosity",
            "permeability",
            "entropy",
            "fractal_dim",
            "pressure",
            "rqi",
            "hydraulic_conductivity",
            "contaminant_risk",
            "temperature",
            "heat_capacity_ratio",
            "flow_capacity_index",
            "energy_potential_index",
        ]
    }

    fn row(&self) -> Vec<String> {
        let porosity: Vec<String> = self.porosity.iter().map(|p| num(*p)).collect();
        vec![
            num(self.depth),
            self.lithology.to_string(),
            porosity.join(";"),
            num(self.permeability),
            num(self.entropy),
            num(self.fractal_dim),
            num(self.pressure),
            opt_num(self.rqi),
            opt_num(self.hydraulic_conductivity),
            opt_num(self.contaminant_risk),
            opt_num(self.temperature),
            opt_num(self.heat_capacity_ratio),
            opt_num(self.flow_capacity_index),
            opt_num(self.energy_potential_index),
        ]
    }
}

impl FlatRecord for TrapPrediction {
    fn headers() -> &'static [&'static str] {
        &["depth", "lithology", "confidence", "entropy", "fractal_dim", "leak_risk"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            num(self.depth),
            self.lithology.to_string(),
            num(self.confidence),
            num(self.entropy),
            num(self.fractal_dim),
            self.leak_risk.map(|b| b.to_string()).unwrap_or_default(),
        ]
    }
}

/// Quote a CSV cell when it contains a delimiter, quote or line break.
fn csv_escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Write `records` as CSV (header + one row each).
pub fn write_csv<R: FlatRecord, W: Write>(records: &[R], mut writer: W) -> Result<(), ExportError> {
    writeln!(writer, "{}", R::headers().join(","))?;
    for record in records {
        let cells: Vec<String> = record.row().iter().map(|c| csv_escape(c)).collect();
        writeln!(writer, "{}", cells.join(","))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write any serializable value as pretty JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized, W: Write>(value: &T, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Plain-text summary of a report for terminal output.
pub fn render_table(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Application: {}  |  Samples: {}  |  Rejected: {}  |  Generated: {}",
        report.application,
        report.data_points.len(),
        report.rejected_records,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    let _ = writeln!(out);
    match &report.zones.skipped {
        Some(reason) => {
            let _ = writeln!(out, "Zones: not detected ({reason})");
        }
        None => {
            let _ = writeln!(
                out,
                "Zones: {} (outliers: {}, quality threshold: {:.4})",
                report.zones.len(),
                report.zones.outlier_count,
                report.zones.quality_threshold
            );
            if !report.zones.is_empty() {
                let quality = report.application;
                let _ = writeln!(
                    out,
                    "  {:>10}  {:<12}  {:>8}  {:>8}  {:>12}",
                    "Depth (m)", "Lithology", "Entropy", "Fractal", "Quality"
                );
                for z in &report.zones.zones {
                    let _ = writeln!(
                        out,
                        "  {:>10.1}  {:<12}  {:>8.3}  {:>8.3}  {:>12.4e}",
                        z.depth,
                        z.lithology,
                        z.entropy,
                        z.fractal_dim,
                        quality.quality_metric(z)
                    );
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Predictions: {}", report.predictions.len());
    if !report.predictions.is_empty() {
        let _ = writeln!(
            out,
            "  {:>10}  {:<12}  {:>10}  {:>8}  {:>8}  {:>9}",
            "Depth (m)", "Lithology", "Confidence", "Entropy", "Fractal", "Leak risk"
        );
        for p in &report.predictions {
            let leak = match p.leak_risk {
                Some(true) => "YES",
                Some(false) => "no",
                None => "-",
            };
            let _ = writeln!(
                out,
                "  {:>10.1}  {:<12}  {:>10.3}  {:>8.3}  {:>8.3}  {:>9}",
                p.depth, p.lithology, p.confidence, p.entropy, p.fractal_dim, leak
            );
        }
    }

    if report.application.reports_leak_risk() {
        let depths: Vec<String> = report.leak_zones().map(|p| format!("{:.1}", p.depth)).collect();
        let _ = writeln!(out);
        if depths.is_empty() {
            let _ = writeln!(out, "Leak risk zones: none");
        } else {
            let _ = writeln!(
                out,
                "Leak risk zones: {} (depths: {})",
                depths.len(),
                depths.join(", ")
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Application, Lithology, ZoneDetectionResult};
    use chrono::Utc;

    fn prediction(depth: f64, leak: Option<bool>) -> TrapPrediction {
        TrapPrediction {
            depth,
            lithology: Lithology::Other("sandy, shale".to_string()),
            confidence: 0.5,
            entropy: 1.25,
            fractal_dim: 1.4,
            leak_risk: leak,
        }
    }

    #[test]
    fn test_csv_header_and_rows() {
        let mut buf = Vec::new();
        write_csv(&[prediction(100.0, Some(true)), prediction(110.0, None)], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "depth,lithology,confidence,entropy,fractal_dim,leak_risk");
        assert_eq!(lines[1], "100,\"sandy, shale\",0.5,1.25,1.4,true");
        assert_eq!(lines[2], "110,\"sandy, shale\",0.5,1.25,1.4,");
    }

    #[test]
    fn test_sample_row_joins_porosity() {
        let sample = AnalyzedSample {
            depth: 1500.0,
            porosity: vec![18.0, 20.5],
            permeability: 100.0,
            entropy: f64::NAN,
            fractal_dim: 1.1,
            rqi: Some(0.7),
            ..AnalyzedSample::default()
        };
        let row = sample.row();
        assert_eq!(row.len(), AnalyzedSample::headers().len());
        assert_eq!(row[2], "18;20.5");
        assert_eq!(row[4], "NaN");
        assert_eq!(row[7], "0.7");
        assert_eq!(row[8], "");
    }

    #[test]
    fn test_flat_map_keys_match_headers() {
        let map = prediction(1.0, Some(false)).to_flat_map();
        assert_eq!(map.len(), TrapPrediction::headers().len());
        assert_eq!(map["leak_risk"], serde_json::Value::String("false".to_string()));
    }

    #[test]
    fn test_json_roundtrip_of_predictions() {
        let mut buf = Vec::new();
        write_json(&[prediction(5.0, None)][..], &mut buf).unwrap();
        let parsed: Vec<TrapPrediction> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed[0].depth, 5.0);
        assert_eq!(parsed[0].leak_risk, None);
    }

    #[test]
    fn test_render_table_mentions_skip_reason() {
        let report = AnalysisReport {
            application: Application::Hydrocarbon,
            generated_at: Utc::now(),
            data_points: Vec::new(),
            zones: ZoneDetectionResult::skipped(
                0.15,
                crate::types::DetectionSkipped::InsufficientData {
                    samples: 3,
                    required: 10,
                },
            ),
            predictions: vec![prediction(12.0, None)],
            rejected_records: 0,
        };
        let table = render_table(&report);
        assert!(table.contains("Insufficient data"));
        assert!(table.contains("Predictions: 1"));
    }

    #[test]
    fn test_render_table_lists_leak_zones() {
        let report = AnalysisReport {
            application: Application::Contamination,
            generated_at: Utc::now(),
            data_points: Vec::new(),
            zones: ZoneDetectionResult::skipped(
                0.3,
                crate::types::DetectionSkipped::InsufficientData {
                    samples: 3,
                    required: 10,
                },
            ),
            predictions: vec![
                prediction(12.0, Some(true)),
                prediction(14.0, Some(false)),
                prediction(16.5, Some(true)),
            ],
            rejected_records: 0,
        };
        let table = render_table(&report);
        assert!(table.contains("Leak risk zones: 2 (depths: 12.0, 16.5)"), "{table}");
    }

    #[test]
    fn test_render_table_hydrocarbon_has_no_leak_summary() {
        let report = AnalysisReport {
            application: Application::Hydrocarbon,
            generated_at: Utc::now(),
            data_points: Vec::new(),
            zones: ZoneDetectionResult {
                zones: Vec::new(),
                quality_threshold: 0.15,
                outlier_count: 0,
                skipped: None,
            },
            predictions: vec![prediction(12.0, None)],
            rejected_records: 0,
        };
        assert!(!render_table(&report).contains("Leak risk zones"));
    }
}
