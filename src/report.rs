//! Reporting projected quantities
//!
//! Each quantity is summarised by its central value and range in every year. The final
//! year is reported as a line of text, for example
//!
//! ```text
//!           GMSLR  0.535 [ 0.366 to  0.745]
//! ```
//!
//! When an output directory is configured, the lines are appended to its `list` file and
//! the statistics (and optionally the whole ensemble) are written as JSON files named after
//! the scenario and the quantity.

use log::{debug, info, warn};
use ndarray::{Array2, Axis};
use rslr_core::errors::{RSLRError, RSLRResult};
use rslr_core::field::{AxisKind, Field};
use rslr_core::io::{write_json, FieldFile};
use rslr_core::stats::{RangeKind, SummaryStatistics};
use rslr_core::timeseries::{FloatValue, TimeAxis};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the text log in the output directory
pub const LIST_FILE: &str = "list";

/// File created and removed again to check that the output directory is writable
const WRITE_CHECK_FILE: &str = ".rslr-write-check";

/// Standard name of a quantity, for the quantities which have one
pub fn standard_name(quantity: &str) -> Option<&'static str> {
    match quantity {
        "GMSLR" => Some("global_average_sea_level_change"),
        "expansion" => Some("global_average_thermosteric_sea_level_change"),
        "temperature" => Some("surface_temperature"),
        _ => None,
    }
}

/// Descriptive name of a contribution to GMSLR
pub fn long_name(quantity: &str) -> Option<String> {
    let source = match quantity {
        "glacier" => "decrease of glacier mass",
        "greensmb" => "decrease of Greenland ice sheet mass due to change in SMB",
        "greendyn" => "decrease of Greenland ice sheet mass due to rapid dynamical change",
        "greennet" => "decrease of Greenland ice sheet mass",
        "antsmb" => "decrease of Antarctic ice sheet mass due to change in SMB",
        "antdyn" => "decrease of Antarctic ice sheet mass due to rapid dynamical change",
        "antnet" => "decrease of Antarctic ice sheet mass",
        "landwater" => "decrease of land water storage",
        "sheetdyn" => "decrease of ice sheet mass due to rapid dynamical change",
        _ => return None,
    };
    Some(format!("GMSLR contribution from {}", source))
}

fn units(quantity: &str) -> &'static str {
    if quantity == "temperature" {
        "K"
    } else {
        "m"
    }
}

/// The final-year line for a quantity
pub fn format_line(quantity: &str, statistics: &SummaryStatistics) -> String {
    let (mid, lower, upper) = statistics.final_year();
    format!("{:>15} {:6.3} [{:6.3} to {:6.3}]", quantity, mid, lower, upper)
}

/// Prefix of the lines written to the list file
pub fn line_prefix(scenario: &str) -> String {
    format!("{:<10} ", scenario)
}

/// On-disk representation of the individual realisations of a quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleFile {
    pub name: String,
    pub units: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// `["realization", "time"]`
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    /// Row-major `[realization, time]` values
    pub data: Vec<f32>,
    /// Index of the climate realisation of each realisation
    pub climate_realization: Vec<usize>,
    pub time: Option<TimeAxis>,
}

impl EnsembleFile {
    /// `data` is `[realisation, time]` with the climate realisation varying fastest
    fn new(quantity: &str, data: &Array2<FloatValue>, n_climate: usize, time: Option<TimeAxis>) -> Self {
        let n = data.nrows();
        Self {
            name: quantity.to_string(),
            units: units(quantity).to_string(),
            standard_name: standard_name(quantity).map(str::to_string),
            long_name: long_name(quantity),
            dims: vec!["realization".to_string(), AxisKind::Time.to_string()],
            shape: vec![n, data.ncols()],
            data: data.iter().map(|&v| v as f32).collect(),
            climate_realization: (0..n).map(|i| i % n_climate.max(1)).collect(),
            time,
        }
    }
}

/// Summary of one projected quantity
#[derive(Debug, Clone)]
pub struct QuantityReport {
    pub quantity: String,
    pub statistics: SummaryStatistics,
    /// Final-year line, without the scenario prefix
    pub line: String,
}

/// Writes reports to an optional output directory
#[derive(Debug, Clone)]
pub struct Reporter {
    output: Option<PathBuf>,
    realise: bool,
}

impl Reporter {
    pub fn new(output: Option<PathBuf>, realise: bool) -> Self {
        Self { output, realise }
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Make the output directory ready for a new batch
    ///
    /// The directory is created if it does not exist, and must accept new files. An existing
    /// list file is removed.
    pub fn prepare(&self) -> RSLRResult<()> {
        let Some(dir) = self.output() else {
            return Ok(());
        };
        let not_writable = |e: std::io::Error| {
            warn!("cannot write to {}: {}", dir.display(), e);
            RSLRError::OutputDirectory(dir.to_path_buf())
        };
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(not_writable)?;
            info!("created output directory {}", dir.display());
        }
        if !dir.is_dir() {
            return Err(RSLRError::OutputDirectory(dir.to_path_buf()));
        }
        let check = dir.join(WRITE_CHECK_FILE);
        std::fs::write(&check, b"")
            .and_then(|_| std::fs::remove_file(&check))
            .map_err(not_writable)?;
        let list = dir.join(LIST_FILE);
        if list.exists() {
            std::fs::remove_file(&list).map_err(|source| RSLRError::Io { path: list, source })?;
        }
        Ok(())
    }

    fn append_to_list(&self, line: &str) -> RSLRResult<()> {
        let Some(dir) = self.output() else {
            return Ok(());
        };
        let path = dir.join(LIST_FILE);
        let io_error = |source: std::io::Error| RSLRError::Io {
            path: path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_error)?;
        writeln!(file, "{}", line).map_err(io_error)
    }

    /// Record a line of text as it is
    pub fn note(&self, text: &str) -> RSLRResult<()> {
        info!("{}", text);
        self.append_to_list(text)
    }

    /// Summarise a projected quantity and write its files
    ///
    /// `field` must have a time axis; every other axis is a realisation axis. For a
    /// `[climate, time]` driver, `replicate` repeats each climate realisation that many times
    /// in the ensemble file so that it lines up with the component realisations.
    pub fn report(
        &self,
        scenario: &str,
        field: &Field,
        kind: RangeKind,
        replicate: Option<usize>,
    ) -> RSLRResult<QuantityReport> {
        let quantity = field.name();
        let data = field.realisations_by_time()?;
        let statistics = SummaryStatistics::from_realisations(data.view(), kind)?;
        let line = format_line(quantity, &statistics);
        info!("{}", line);

        if let Some(dir) = self.output() {
            self.append_to_list(&format!("{}{}", line_prefix(scenario), line))?;
            self.write_statistics(dir, scenario, quantity, field.time(), &statistics)?;
            if self.realise {
                let n_climate = field.axis_len(AxisKind::Climate).unwrap_or(1);
                let data = match replicate {
                    Some(n) => replicated(&data, n)?,
                    None => data,
                };
                let path = dir.join(format!("{}_{}.json", scenario, quantity));
                let file = EnsembleFile::new(quantity, &data, n_climate, field.time().cloned());
                write_json(&path, &file)?;
                info!("wrote {}", path.display());
            }
        }

        Ok(QuantityReport {
            quantity: quantity.to_string(),
            statistics,
            line,
        })
    }

    fn write_statistics(
        &self,
        dir: &Path,
        scenario: &str,
        quantity: &str,
        time: Option<&TimeAxis>,
        statistics: &SummaryStatistics,
    ) -> RSLRResult<()> {
        for (statistic, values) in [
            ("mid", &statistics.mid),
            ("lower", &statistics.lower),
            ("upper", &statistics.upper),
        ] {
            let field = Field::new(
                quantity,
                units(quantity),
                vec![AxisKind::Time],
                values.clone().into_dyn(),
                time.cloned(),
            )?;
            let mut file = FieldFile::from_field(&field);
            file.standard_name = standard_name(quantity).map(str::to_string);
            file.long_name = long_name(quantity);
            let path = dir.join(format!("{}_{}_{}.json", scenario, quantity, statistic));
            write_json(&path, &file)?;
            debug!("wrote {}", path.display());
        }
        info!("wrote statistics of {} for {}", quantity, scenario);
        Ok(())
    }
}

/// Repeat the rows of `[realisation, time]` data `n` times as a block
fn replicated(data: &Array2<FloatValue>, n: usize) -> RSLRResult<Array2<FloatValue>> {
    let views = vec![data.view(); n];
    ndarray::concatenate(Axis(0), &views)
        .map_err(|e| RSLRError::Error(format!("cannot replicate realisations {} times: {}", n, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array3};
    use rslr_core::io::read_json;

    fn statistics(mid: f64, lower: f64, upper: f64) -> SummaryStatistics {
        SummaryStatistics {
            kind: RangeKind::Likely,
            mid: array![0.0, mid],
            lower: array![0.0, lower],
            upper: array![0.0, upper],
        }
    }

    #[test]
    fn line_format() {
        assert_eq!(
            format_line("GMSLR", &statistics(0.5354, 0.36612, 0.7449)),
            "          GMSLR  0.535 [ 0.366 to  0.745]"
        );
        assert_eq!(
            format_line("antsmb", &statistics(-0.04, -0.081, -0.0123)),
            "         antsmb -0.040 [-0.081 to -0.012]"
        );
        assert_eq!(line_prefix("rcp85"), "rcp85      ");
    }

    #[test]
    fn metadata_names() {
        assert_eq!(standard_name("GMSLR"), Some("global_average_sea_level_change"));
        assert_eq!(standard_name("glacier"), None);
        assert_eq!(
            long_name("landwater").unwrap(),
            "GMSLR contribution from decrease of land water storage"
        );
        assert_eq!(long_name("temperature"), None);
        assert_eq!(units("temperature"), "K");
        assert_eq!(units("sheetdyn"), "m");
    }

    #[test]
    fn replicates_blocks() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let out = replicated(&data, 3).unwrap();
        assert_eq!(out.nrows(), 6);
        assert_eq!(out.row(2), data.row(0));
        assert_eq!(out.row(5), data.row(1));
        assert!(replicated(&data, 0).is_err());
    }

    #[test]
    fn failed_replication_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(Some(dir.path().to_path_buf()), true);
        let temperature = Field::new(
            "temperature",
            "K",
            vec![AxisKind::Climate, AxisKind::Time],
            array![[1.0, 1.1], [2.0, 2.1]].into_dyn(),
            Some(TimeAxis::year_ends(2006, 2007)),
        )
        .unwrap();
        assert!(reporter
            .report("x", &temperature, RangeKind::Likely, Some(0))
            .is_err());
        assert!(!dir.path().join("x_temperature.json").exists());
    }

    #[test]
    fn output_must_be_a_writable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("results");
        std::fs::write(&file, "not a directory").unwrap();
        for output in [file.clone(), file.join("nested")] {
            let err = Reporter::new(Some(output), false).prepare().unwrap_err();
            assert!(matches!(err, RSLRError::OutputDirectory(_)), "{}", err);
        }

        let reporter = Reporter::new(Some(dir.path().to_path_buf()), false);
        reporter.prepare().unwrap();
        assert!(!dir.path().join(WRITE_CHECK_FILE).exists());
    }

    fn projection_field() -> Field {
        let data = Array3::from_shape_fn((3, 2, 4), |(k, c, j)| (k + 10 * c + 100 * j) as f64);
        Field::new(
            "glacier",
            "m",
            vec![AxisKind::Component, AxisKind::Climate, AxisKind::Time],
            data.into_dyn(),
            Some(TimeAxis::year_ends(2006, 2009)),
        )
        .unwrap()
    }

    #[test]
    fn report_without_output_writes_nothing() {
        let reporter = Reporter::new(None, true);
        reporter.prepare().unwrap();
        let report = reporter
            .report("rcp45", &projection_field(), RangeKind::Actual, None)
            .unwrap();
        assert_eq!(report.quantity, "glacier");
        // Mean, minimum and maximum of the final year over the six realisations
        assert_eq!(report.statistics.final_year(), (306.0, 300.0, 312.0));
    }

    #[test]
    fn writes_list_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let reporter = Reporter::new(Some(output.clone()), true);
        reporter.prepare().unwrap();
        assert!(output.is_dir());

        reporter.note("rcp45").unwrap();
        let report = reporter
            .report("rcp45", &projection_field(), RangeKind::Likely, None)
            .unwrap();

        let list = std::fs::read_to_string(output.join(LIST_FILE)).unwrap();
        assert_eq!(list, format!("rcp45\nrcp45      {}\n", report.line));

        let mid: FieldFile = read_json(&output.join("rcp45_glacier_mid.json")).unwrap();
        assert_eq!(mid.shape, vec![4]);
        assert_eq!(mid.units, "m");
        assert!(mid.long_name.unwrap().contains("glacier mass"));
        assert!(output.join("rcp45_glacier_lower.json").is_file());
        assert!(output.join("rcp45_glacier_upper.json").is_file());

        let ensemble: EnsembleFile = read_json(&output.join("rcp45_glacier.json")).unwrap();
        assert_eq!(ensemble.shape, vec![6, 4]);
        assert_eq!(ensemble.climate_realization, vec![0, 1, 0, 1, 0, 1]);
        assert_eq!(ensemble.data[4], 10.0);

        // A new batch starts a new list
        reporter.prepare().unwrap();
        assert!(!output.join(LIST_FILE).exists());
    }

    #[test]
    fn drivers_are_replicated_in_ensemble_file() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(Some(dir.path().to_path_buf()), true);
        let temperature = Field::new(
            "temperature",
            "K",
            vec![AxisKind::Climate, AxisKind::Time],
            array![[1.0, 1.1], [2.0, 2.1], [3.0, 3.1]].into_dyn(),
            Some(TimeAxis::year_ends(2006, 2007)),
        )
        .unwrap();
        let report = reporter
            .report("x", &temperature, RangeKind::Likely, Some(2))
            .unwrap();
        let (mid, lower, upper) = report.statistics.final_year();
        assert_relative_eq!(mid, 2.1);
        assert_relative_eq!(lower, 1.2, epsilon = 1e-12);
        assert_relative_eq!(upper, 3.0, epsilon = 1e-12);

        let ensemble: EnsembleFile = read_json(&dir.path().join("x_temperature.json")).unwrap();
        assert_eq!(ensemble.shape, vec![6, 2]);
        assert_eq!(ensemble.units, "K");
        assert_eq!(
            ensemble.standard_name.as_deref(),
            Some("surface_temperature")
        );
        assert_eq!(ensemble.climate_realization, vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(ensemble.data[6], 1.0);
    }
}
