use sheet_charts::data::builder::{histogram_categories, split_field};
use sheet_charts::{
    build_bar_dataset, build_dataset, build_histogram_dataset, build_pie_dataset,
    build_scatter_dataset, AxisRole, BuildError, CellValue, ChartKind,
};

fn cells(values: &[&str]) -> Vec<CellValue> {
    values.iter().map(|v| CellValue::from(*v)).collect()
}

#[test]
fn test_scatter_columns_equal_inputs() {
    let xs = ["0", "1.5", "-2", "1e2"];
    let ys = ["3", "4", "5", "6"];
    let ds = build_scatter_dataset("width", "height", xs, ys).unwrap();

    assert_eq!(ds.column_names(), vec!["width", "height"]);
    assert_eq!(ds.column("width").unwrap().values, cells(&xs));
    assert_eq!(ds.column("height").unwrap().values, cells(&ys));
}

#[test]
fn test_every_kind_rejects_unequal_lengths() {
    for kind in ChartKind::ALL {
        let err = build_dataset(kind, "a", "b", ["1", "2", "3"], ["1"]).unwrap_err();
        assert_eq!(err, BuildError::LengthMismatch { left: 3, right: 1 }, "{kind}");
    }
}

#[test]
fn test_non_numeric_value_axis_fails_for_every_kind() {
    for kind in ChartKind::ALL {
        let err = build_dataset(kind, "a", "b", ["1"], ["abc"]).unwrap_err();
        assert!(
            matches!(err, BuildError::TypeValidation { role: AxisRole::Numeric, .. }),
            "{kind}: {err}"
        );
    }
}

#[test]
fn test_category_kinds_share_validation() {
    let categories = ["red", "green"];
    let values = ["1", "2"];
    let bar = build_bar_dataset("category", "value", categories, values).unwrap();
    let pie = build_pie_dataset("category", "value", categories, values).unwrap();
    let hist = build_histogram_dataset("category", "value", categories, values).unwrap();

    assert_eq!(bar, pie);
    assert_eq!(pie, hist);
}

#[test]
fn test_histogram_entry_path() {
    let values = split_field("1,2,3");
    let ds = build_histogram_dataset(
        "category",
        "value",
        histogram_categories(values.len()),
        values,
    )
    .unwrap();

    assert_eq!(ds.column("category").unwrap().values, cells(&["category"; 3]));
    assert_eq!(ds.column("value").unwrap().values, cells(&["1", "2", "3"]));
}

#[test]
fn test_histogram_with_prefilled_constant_category() {
    let ds = build_histogram_dataset("category", "value", ["v", "v", "v"], ["1", "2", "3"]).unwrap();
    assert_eq!(ds.columns()[0].values, cells(&["v", "v", "v"]));
    assert_eq!(ds.columns()[1].values, cells(&["1", "2", "3"]));
}
