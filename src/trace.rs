use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::probe::CycleReport;
use crate::threshold::code_to_volts;

const ITERATION_COLUMN_NAME: &str = "iteration";
const FAMILY_COLUMN_NAME: &str = "family";
const PROBE_RAW_COLUMN_NAME: &str = "probe_raw";
const PROBE_VOLTS_COLUMN_NAME: &str = "probe_volts";
const LEVEL_COLUMN_NAME: &str = "level";
const FLOATING_RAW_COLUMN_NAME: &str = "floating_raw";
const FLOATING_COLUMN_NAME: &str = "floating";
const OSCILLATION_COLUMN_NAME: &str = "oscillation_remaining";
const DISPLAY_COLUMN_NAME: &str = "display";
const CYCLES_COLUMN_NAME: &str = "cycles";

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("DataFrame error: {0}")]
    DataFrame(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recording of consecutive loop iterations for offline inspection.
#[derive(Debug, Default, Clone)]
pub struct ProbeTrace {
    reports: Vec<CycleReport>,
}

impl ProbeTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: CycleReport) {
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[CycleReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// One row per iteration
    pub fn to_dataframe(&self) -> Result<DataFrame, TraceError> {
        let r = &self.reports;
        let columns: Vec<Column> = vec![
            Series::new(
                ITERATION_COLUMN_NAME.into(),
                r.iter().map(|c| c.iteration).collect::<Vec<u64>>(),
            )
            .into(),
            Series::new(
                FAMILY_COLUMN_NAME.into(),
                r.iter().map(|c| c.family.as_str()).collect::<Vec<&str>>(),
            )
            .into(),
            Series::new(
                PROBE_RAW_COLUMN_NAME.into(),
                r.iter().map(|c| u32::from(c.probe_code)).collect::<Vec<u32>>(),
            )
            .into(),
            Series::new(
                PROBE_VOLTS_COLUMN_NAME.into(),
                r.iter()
                    .map(|c| code_to_volts(c.probe_code))
                    .collect::<Vec<f64>>(),
            )
            .into(),
            Series::new(
                LEVEL_COLUMN_NAME.into(),
                r.iter().map(|c| c.level.as_str()).collect::<Vec<&str>>(),
            )
            .into(),
            Series::new(
                FLOATING_RAW_COLUMN_NAME.into(),
                r.iter().map(|c| c.floating_raw).collect::<Vec<bool>>(),
            )
            .into(),
            Series::new(
                FLOATING_COLUMN_NAME.into(),
                r.iter().map(|c| c.floating).collect::<Vec<bool>>(),
            )
            .into(),
            Series::new(
                OSCILLATION_COLUMN_NAME.into(),
                r.iter()
                    .map(|c| u32::from(c.oscillation_remaining))
                    .collect::<Vec<u32>>(),
            )
            .into(),
            Series::new(
                DISPLAY_COLUMN_NAME.into(),
                r.iter().map(|c| c.display.as_str()).collect::<Vec<&str>>(),
            )
            .into(),
        ];

        Ok(DataFrame::new(columns)?)
    }

    /// Number of iterations spent in each display state, sorted by state label
    pub fn display_summary(&self) -> Result<DataFrame, TraceError> {
        let df = self
            .to_dataframe()?
            .lazy()
            .group_by([col(DISPLAY_COLUMN_NAME)])
            .agg([col(ITERATION_COLUMN_NAME)
                .count()
                .cast(DataType::UInt32)
                .alias(CYCLES_COLUMN_NAME)])
            .sort_by_exprs(vec![col(DISPLAY_COLUMN_NAME)], SortMultipleOptions::default())
            .collect()?;
        Ok(df)
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), TraceError> {
        let mut df = self.to_dataframe()?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        log::debug!("Wrote {} trace rows", df.height());
        Ok(())
    }
}

impl Extend<CycleReport> for ProbeTrace {
    fn extend<T: IntoIterator<Item = CycleReport>>(&mut self, iter: T) {
        self.reports.extend(iter);
    }
}
