use std::path::Path;

use anyhow::{Context, Result};
use sheet_charts::chart::ChartSeries;
use sheet_charts::data::builder::{build_dataset, histogram_categories, split_field, ChartKind};
use sheet_charts::data::model::{CellValue, Dataset, Workbook};
use sheet_charts::data::spreadsheet::try_search_for_file;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Selected chart kind (None until the user picks one).
    pub chart_kind: Option<ChartKind>,

    /// First entry field: x values or categories. Unused for histograms.
    pub first_field: String,

    /// Second entry field: y values or values.
    pub second_field: String,

    /// Dataset behind the current chart, handed to the plot and to save.
    pub dataset: Option<Dataset>,

    /// Plot-ready form of `dataset` for `chart_kind`.
    pub series: Option<ChartSeries>,

    /// Colours for category labels.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Switch chart kind. The entry fields start over, as each kind asks for
    /// different values.
    pub fn select_chart_kind(&mut self, kind: ChartKind) {
        if self.chart_kind != Some(kind) {
            self.first_field.clear();
            self.second_field.clear();
        }
        self.chart_kind = Some(kind);
        self.refresh_chart();
    }

    /// Validate the entry fields and chart them.
    pub fn submit(&mut self) {
        let Some(kind) = self.chart_kind else {
            self.status_message = Some("Select a graph type first.".to_string());
            return;
        };

        let (first_name, second_name) = kind.default_column_names();
        let second = split_field(&self.second_field);
        let first = match kind {
            ChartKind::Histogram => histogram_categories(second.len()),
            _ => split_field(&self.first_field),
        };

        match build_dataset(kind, first_name, second_name, first, second) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::warn!("Rejected {kind} input: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Clear the chart kind, the entry fields and the chart.
    pub fn reset(&mut self) {
        *self = AppState::default();
    }

    /// Make `dataset` current and rebuild the chart from it.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        match dataset.to_json() {
            Ok(json) => log::debug!("Current data set: {json}"),
            Err(e) => log::debug!("Current data set is not serializable: {e}"),
        }
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh_chart();
    }

    /// Recompute `series` from the current dataset and chart kind.
    pub fn refresh_chart(&mut self) {
        self.series = None;
        self.color_map = None;

        let (Some(kind), Some(dataset)) = (self.chart_kind, &self.dataset) else {
            return;
        };

        match ChartSeries::from_dataset(kind, dataset) {
            Ok(series) => {
                let labels: Vec<String> = dataset
                    .columns()
                    .first()
                    .map(|c| c.values.iter().map(CellValue::to_string).collect())
                    .unwrap_or_default();
                self.color_map = Some(ColorMap::new(labels.iter().map(String::as_str)));
                self.series = Some(series);
            }
            Err(e) => {
                log::warn!("Cannot draw {kind}: {e}");
                self.status_message = Some(format!("Cannot draw {kind}: {e}"));
            }
        }
    }

    /// Save the current dataset to `path`.
    pub fn save_to(&mut self, path: &Path) {
        let Some(dataset) = &self.dataset else {
            self.status_message = Some("No data to save.".to_string());
            return;
        };
        log::info!("Saving data set to {}", path.display());

        self.status_message = match write_file(path, dataset) {
            Ok(()) => Some(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("Failed to save file: {e:#}");
                Some(format!("Error: {e:#}"))
            }
        };
    }

    /// Load the first sheet of `path`, fill the entry fields from it and
    /// chart it with the selected kind.
    pub fn load_from(&mut self, path: &Path) {
        let workbook = match read_file(path) {
            Ok(workbook) => workbook,
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                return;
            }
        };

        let Some((sheet, dataset)) = workbook.into_iter().next() else {
            self.status_message = Some("The file has no sheets.".to_string());
            return;
        };
        log::info!(
            "Loaded sheet '{sheet}' with {} rows and columns {:?}",
            dataset.len(),
            dataset.column_names()
        );

        let split_values = self.fill_fields(&dataset);
        self.set_dataset(dataset);
        if split_values > 0 {
            self.status_message = Some(format!(
                "{split_values} loaded value(s) contain a comma and will split on Submit."
            ));
        }
    }

    /// Join the first two columns into the entry fields. Returns how many
    /// values contain the `,` separator.
    fn fill_fields(&mut self, dataset: &Dataset) -> usize {
        let mut split_values = 0;
        let mut joined = |index: usize| {
            let Some(column) = dataset.columns().get(index) else {
                return String::new();
            };
            let texts: Vec<String> = column.values.iter().map(CellValue::to_string).collect();
            split_values += texts.iter().filter(|t| t.contains(',')).count();
            texts.join(",")
        };
        self.first_field = joined(0);
        self.second_field = joined(1);
        split_values
    }
}

fn write_file(path: &Path, dataset: &Dataset) -> Result<()> {
    try_search_for_file(path, "write", Some(dataset))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn read_file(path: &Path) -> Result<Workbook> {
    try_search_for_file(path, "read", None)
        .with_context(|| format!("reading {}", path.display()))?
        .into_workbook()
        .context("read produced no workbook")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn state_for(kind: ChartKind, first: &str, second: &str) -> AppState {
        let mut state = AppState::default();
        state.select_chart_kind(kind);
        state.first_field = first.to_string();
        state.second_field = second.to_string();
        state
    }

    #[test]
    fn submit_builds_the_dataset() {
        let mut state = state_for(ChartKind::Bar, "a,b", "1, 2");
        state.submit();

        let dataset = state.dataset.as_ref().unwrap();
        assert_eq!(dataset.column_names(), vec!["category", "value"]);
        assert_eq!(dataset.columns()[1].values[1], CellValue::from(" 2"));
        assert!(matches!(state.series, Some(ChartSeries::Bar { .. })));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn histogram_uses_only_the_value_field() {
        let mut state = state_for(ChartKind::Histogram, "ignored", "1,2,3");
        state.submit();

        let dataset = state.dataset.as_ref().unwrap();
        assert_eq!(dataset.columns()[0].values, vec![CellValue::from("category"); 3]);
    }

    #[test]
    fn invalid_input_keeps_previous_chart() {
        let mut state = state_for(ChartKind::Scatter, "1,2", "3,4");
        state.submit();
        state.second_field = "3,abc".to_string();
        state.submit();

        assert!(state
            .status_message
            .as_deref()
            .unwrap()
            .contains("ALL INPUTS MUST BE NUMERICAL"));
        assert_eq!(state.dataset.as_ref().unwrap().columns()[1].values[1], CellValue::from("4"));
    }

    #[test]
    fn submit_without_kind_asks_for_one() {
        let mut state = AppState::default();
        state.submit();
        assert!(state.dataset.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn save_then_load_fills_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.xlsx");

        let mut state = state_for(ChartKind::Pie, "a,b", "1,3");
        state.submit();
        state.save_to(&path);
        assert!(path.exists());

        let mut loaded = AppState::default();
        loaded.select_chart_kind(ChartKind::Pie);
        loaded.load_from(&path);

        assert_eq!(loaded.first_field, "a,b");
        assert_eq!(loaded.second_field, "1,3");
        assert!(matches!(loaded.series, Some(ChartSeries::Pie { .. })));
    }

    #[test]
    fn loaded_commas_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("commas.csv");
        std::fs::write(&path, "category,value\n\"Smith, J\",1\nLee,2\n").unwrap();

        let mut state = AppState::default();
        state.select_chart_kind(ChartKind::Bar);
        state.load_from(&path);

        assert_eq!(state.first_field, "Smith, J,Lee");
        assert!(state.dataset.is_some());
        assert_eq!(
            state.status_message.as_deref(),
            Some("1 loaded value(s) contain a comma and will split on Submit.")
        );
    }

    #[test]
    fn load_failure_names_the_file_and_the_cause() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.xlsx");

        let mut state = AppState::default();
        state.load_from(&path);

        let msg = state.status_message.unwrap();
        assert!(msg.starts_with("Error: reading "), "{msg}");
        assert!(msg.contains("missing.xlsx: cannot access"), "{msg}");
        assert!(state.dataset.is_none());
    }

    #[test]
    fn save_failure_names_the_file_and_the_cause() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");

        let mut state = state_for(ChartKind::Scatter, "1", "2");
        state.submit();
        state.save_to(&path);

        let msg = state.status_message.unwrap();
        assert!(msg.starts_with("Error: writing "), "{msg}");
        assert!(msg.contains("is not a usable workbook"), "{msg}");
        assert!(!path.exists());
    }

    #[test]
    fn save_without_data_reports() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nothing.xlsx");
        let mut state = AppState::default();
        state.save_to(&path);
        assert_eq!(state.status_message.as_deref(), Some("No data to save."));
        assert!(!path.exists());
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = state_for(ChartKind::Scatter, "1", "2");
        state.submit();
        state.reset();
        assert!(state.chart_kind.is_none());
        assert!(state.dataset.is_none());
        assert!(state.first_field.is_empty());
    }
}
