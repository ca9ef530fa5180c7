use super::model::CellValue;

/// Storage type recovered for a column before it is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn as_integer(value: &CellValue) -> Option<i64> {
    match value {
        CellValue::Integer(i) => Some(*i),
        CellValue::String(s) if is_all_digits(s.trim()) => s.trim().parse().ok(),
        _ => None,
    }
}

/// NaN and infinities do not count: no spreadsheet cell can hold them.
fn as_float(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Integer(_) | CellValue::Float(_) | CellValue::String(_) => {
            value.as_f64().filter(|f| f.is_finite())
        }
        CellValue::Bool(_) | CellValue::Null => None,
    }
}

/// Decide a column's storage type, all or nothing: every value must qualify
/// or the column stays text. An empty column is text.
pub fn infer_column_type(values: &[CellValue]) -> ColumnType {
    if values.is_empty() {
        ColumnType::Text
    } else if values.iter().all(|v| as_integer(v).is_some()) {
        ColumnType::Integer
    } else if values.iter().all(|v| as_float(v).is_some()) {
        ColumnType::Float
    } else {
        ColumnType::Text
    }
}

/// Convert a column to its inferred type. Text columns come back unchanged.
pub fn recover_column(values: &[CellValue]) -> Vec<CellValue> {
    match infer_column_type(values) {
        ColumnType::Integer => values
            .iter()
            .filter_map(as_integer)
            .map(CellValue::Integer)
            .collect(),
        ColumnType::Float => values
            .iter()
            .filter_map(as_float)
            .map(CellValue::Float)
            .collect(),
        ColumnType::Text => values.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    #[test]
    fn digits_become_integers() {
        let values = strings(&["1", "2", "30"]);
        assert_eq!(infer_column_type(&values), ColumnType::Integer);
        assert_eq!(
            recover_column(&values),
            vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(30)]
        );
    }

    #[test]
    fn decimals_become_floats() {
        let values = strings(&["4.5", "5", "-6.5"]);
        assert_eq!(infer_column_type(&values), ColumnType::Float);
        assert_eq!(
            recover_column(&values),
            vec![CellValue::Float(4.5), CellValue::Float(5.0), CellValue::Float(-6.5)]
        );
    }

    #[test]
    fn negative_integers_are_floats() {
        // A leading sign is not a digit.
        assert_eq!(infer_column_type(&strings(&["-1", "2"])), ColumnType::Float);
    }

    #[test]
    fn one_bad_value_keeps_the_column_text() {
        let values = strings(&["1", "2", "three"]);
        assert_eq!(infer_column_type(&values), ColumnType::Text);
        assert_eq!(recover_column(&values), values);
    }

    #[test]
    fn surrounding_spaces_are_ignored() {
        assert_eq!(infer_column_type(&strings(&["1", " 2"])), ColumnType::Integer);
    }

    #[test]
    fn typed_cells_keep_their_type() {
        let values = vec![CellValue::Integer(1), CellValue::Float(2.5)];
        assert_eq!(infer_column_type(&values), ColumnType::Float);
        assert_eq!(infer_column_type(&[CellValue::Integer(7)]), ColumnType::Integer);
    }

    #[test]
    fn empty_and_null_columns_are_text() {
        assert_eq!(infer_column_type(&[]), ColumnType::Text);
        assert_eq!(infer_column_type(&[CellValue::Null]), ColumnType::Text);
        assert_eq!(infer_column_type(&strings(&[""])), ColumnType::Text);
    }

    #[test]
    fn non_finite_values_keep_the_column_text() {
        let cases: [&[&str]; 3] = [&["nan", "1"], &["inf", "2.5"], &["-inf"]];
        for case in cases {
            let values = strings(case);
            assert_eq!(infer_column_type(&values), ColumnType::Text, "{values:?}");
            assert_eq!(recover_column(&values), values);
        }
        assert_eq!(
            infer_column_type(&[CellValue::Float(f64::INFINITY)]),
            ColumnType::Text
        );
    }

    #[test]
    fn oversized_digit_runs_fall_back_to_float() {
        let values = strings(&["99999999999999999999"]);
        assert_eq!(infer_column_type(&values), ColumnType::Float);
    }
}
