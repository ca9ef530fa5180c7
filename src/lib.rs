//! Dataset shaping and spreadsheet persistence for the chart builder.

pub mod chart;
pub mod data;

pub use data::builder::{
    build_bar_dataset, build_dataset, build_histogram_dataset, build_pie_dataset,
    build_scatter_dataset, AxisRole, BuildError, ChartKind,
};
pub use data::model::{CellValue, Column, Dataset, DatasetError, Workbook};
pub use data::spreadsheet::{
    read_workbook, search_for_file, try_search_for_file, write_dataset, write_sheets,
    BridgeError, FileOperation, FileOutcome, InvalidOperation,
};
