//! Plot-ready series for the four chart kinds.
//!
//! The first dataset column is the category or x axis, the second the value
//! or y axis. Histograms bin only the second column.

use thiserror::Error;

use crate::data::builder::ChartKind;
use crate::data::model::{CellValue, Column, Dataset};

#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("a chart needs two columns, the dataset has {0}")]
    NotEnoughColumns(usize),

    #[error("column '{column}' has a non-numeric value '{value}' at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("nothing to plot")]
    Empty,

    #[error("pie chart values must be non-negative and sum to more than zero")]
    InvalidPieTotal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    /// Mean of the values sharing this label.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    /// Share of the total, in `0.0..=1.0`.
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSeries {
    Scatter {
        x_label: String,
        y_label: String,
        points: Vec<[f64; 2]>,
    },
    Bar {
        x_label: String,
        y_label: String,
        bars: Vec<Bar>,
    },
    Histogram {
        x_label: String,
        bins: Vec<Bin>,
    },
    Pie {
        slices: Vec<Slice>,
    },
}

impl ChartSeries {
    /// Shape `dataset` for `kind`. Extra columns past the second are ignored.
    pub fn from_dataset(kind: ChartKind, dataset: &Dataset) -> Result<Self, ChartError> {
        let [first, second, ..] = dataset.columns() else {
            return Err(ChartError::NotEnoughColumns(dataset.width()));
        };
        if dataset.is_empty() {
            return Err(ChartError::Empty);
        }

        let series = match kind {
            ChartKind::Scatter => {
                let xs = numeric(first)?;
                let ys = numeric(second)?;
                ChartSeries::Scatter {
                    x_label: first.name.clone(),
                    y_label: second.name.clone(),
                    points: xs.into_iter().zip(ys).map(|(x, y)| [x, y]).collect(),
                }
            }
            ChartKind::Bar => ChartSeries::Bar {
                x_label: first.name.clone(),
                y_label: second.name.clone(),
                bars: mean_by_label(&first.values, &numeric(second)?),
            },
            ChartKind::Histogram => ChartSeries::Histogram {
                x_label: second.name.clone(),
                bins: histogram(&numeric(second)?),
            },
            ChartKind::Pie => ChartSeries::Pie {
                slices: slices(&first.values, &numeric(second)?)?,
            },
        };
        Ok(series)
    }
}

fn numeric(column: &Column) -> Result<Vec<f64>, ChartError> {
    column
        .values
        .iter()
        .enumerate()
        .map(|(row, v)| {
            v.as_f64().ok_or_else(|| ChartError::NonNumeric {
                column: column.name.clone(),
                row,
                value: v.to_string(),
            })
        })
        .collect()
}

/// Average the values per label, labels in order of first appearance.
fn mean_by_label(labels: &[CellValue], values: &[f64]) -> Vec<Bar> {
    let mut groups: Vec<(String, f64, usize)> = Vec::new();
    for (label, &value) in labels.iter().zip(values) {
        let label = label.to_string();
        match groups.iter_mut().find(|(l, _, _)| *l == label) {
            Some((_, sum, n)) => {
                *sum += value;
                *n += 1;
            }
            None => groups.push((label, value, 1)),
        }
    }
    groups
        .into_iter()
        .map(|(label, sum, n)| Bar {
            label,
            value: sum / n as f64,
        })
        .collect()
}

/// Equal-width bins over the data range, bin count by Sturges' rule.
fn histogram(values: &[f64]) -> Vec<Bin> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return vec![Bin {
            start: min - 0.5,
            end: max + 0.5,
            count: values.len(),
        }];
    }

    let n_bins = (values.len() as f64).log2().ceil() as usize + 1;
    let width = (max - min) / n_bins as f64;
    let mut bins: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &v in values {
        // The maximum lands in the last, closed bin.
        let idx = (((v - min) / width).floor() as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

/// One slice per row.
fn slices(labels: &[CellValue], values: &[f64]) -> Result<Vec<Slice>, ChartError> {
    if values.iter().any(|&v| v < 0.0) {
        return Err(ChartError::InvalidPieTotal);
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return Err(ChartError::InvalidPieTotal);
    }
    Ok(labels
        .iter()
        .zip(values)
        .map(|(label, &value)| Slice {
            label: label.to_string(),
            value,
            fraction: value / total,
        })
        .collect())
}
