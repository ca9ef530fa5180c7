use rand::Rng;

use super::model::{CellValue, Column, Dataset, DatasetError};

/// Box-Muller transform for a normal distribution.
pub fn normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-15);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// Inverse-transform sampling for an exponential distribution with the given
/// scale (mean).
pub fn exponential<R: Rng>(rng: &mut R, scale: f64) -> f64 {
    let u: f64 = rng.random();
    -scale * (1.0 - u).ln()
}

fn normal_column<R: Rng>(
    rng: &mut R,
    name: &str,
    rows: usize,
    mean: f64,
    std_dev: f64,
) -> Column {
    let values = (0..rows)
        .map(|_| CellValue::Float(normal(rng, mean, std_dev)))
        .collect();
    Column::new(name, values)
}

fn exponential_column<R: Rng>(rng: &mut R, name: &str, rows: usize, scale: f64) -> Column {
    let values = (0..rows)
        .map(|_| CellValue::Float(exponential(rng, scale)))
        .collect();
    Column::new(name, values)
}

fn choice_column<R: Rng>(rng: &mut R, name: &str, rows: usize, choices: &[&str]) -> Column {
    let values = (0..rows)
        .map(|_| CellValue::from(choices[rng.random_range(0..choices.len())]))
        .collect();
    Column::new(name, values)
}

/// Three normally distributed numeric columns, for scatter plots.
pub fn scatter_dataset<R: Rng>(rng: &mut R, rows: usize) -> Result<Dataset, DatasetError> {
    Dataset::from_columns(vec![
        normal_column(rng, "NumericalColumn1", rows, 50.0, 15.0),
        normal_column(rng, "NumericalColumn2", rows, 70.0, 20.0),
        normal_column(rng, "NumericalColumn3", rows, 80.0, 35.0),
    ])
}

/// Mixed numeric and categorical columns, for histograms and count plots.
pub fn histogram_dataset<R: Rng>(rng: &mut R, rows: usize) -> Result<Dataset, DatasetError> {
    Dataset::from_columns(vec![
        normal_column(rng, "NumericalColumn1", rows, 50.0, 15.0),
        exponential_column(rng, "NumericalColumn2", rows, 5.0),
        choice_column(rng, "CategoricalColumn1", rows, &["A", "B", "C", "D"]),
        choice_column(rng, "CategoricalColumn2", rows, &["X", "Y", "Z"]),
    ])
}

/// The datasets the generator writes, one per sheet.
pub fn sample_workbook<R: Rng>(rng: &mut R, rows: usize) -> Result<Vec<Dataset>, DatasetError> {
    Ok(vec![
        scatter_dataset(rng, rows)?,
        histogram_dataset(rng, rows)?,
        histogram_dataset(rng, rows)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn normal_samples_centre_on_mean() {
        let mut rng = StdRng::seed_from_u64(42);
        let samples: Vec<f64> = (0..20_000).map(|_| normal(&mut rng, 50.0, 15.0)).collect();
        assert!((mean(&samples) - 50.0).abs() < 1.0);
    }

    #[test]
    fn exponential_samples_are_positive_with_scale_mean() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples: Vec<f64> = (0..20_000).map(|_| exponential(&mut rng, 5.0)).collect();
        assert!(samples.iter().all(|&v| v >= 0.0));
        assert!((mean(&samples) - 5.0).abs() < 0.3);
    }

    #[test]
    fn workbook_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let sheets = sample_workbook(&mut rng, 100).unwrap();

        assert_eq!(sheets.len(), 3);
        assert_eq!(
            sheets[0].column_names(),
            vec!["NumericalColumn1", "NumericalColumn2", "NumericalColumn3"]
        );
        assert_eq!(
            sheets[1].column_names(),
            vec![
                "NumericalColumn1",
                "NumericalColumn2",
                "CategoricalColumn1",
                "CategoricalColumn2"
            ]
        );
        assert!(sheets.iter().all(|ds| ds.len() == 100));
    }

    #[test]
    fn categories_come_from_the_choice_list() {
        let mut rng = StdRng::seed_from_u64(3);
        let ds = histogram_dataset(&mut rng, 50).unwrap();
        let column = ds.column("CategoricalColumn2").unwrap();
        assert!(column
            .values
            .iter()
            .all(|v| matches!(v.as_str(), Some("X" | "Y" | "Z"))));
    }

    #[test]
    fn seeded_generation_is_repeatable() {
        let a = scatter_dataset(&mut StdRng::seed_from_u64(9), 10).unwrap();
        let b = scatter_dataset(&mut StdRng::seed_from_u64(9), 10).unwrap();
        assert_eq!(a, b);
    }
}
