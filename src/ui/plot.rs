use std::f64::consts::TAU;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, PlotUi, Points, Polygon, Text};

use sheet_charts::chart::{Bin, ChartSeries, Slice};

use crate::color::ColorMap;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart plot (central panel)
// ---------------------------------------------------------------------------

/// Render the current chart in the central panel.
pub fn chart_plot(ui: &mut Ui, state: &AppState) {
    let (Some(kind), Some(series)) = (state.chart_kind, &state.series) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Pick a graph type, enter values and press Submit");
        });
        return;
    };

    let fallback = ColorMap::new([]);
    let colors = state.color_map.as_ref().unwrap_or(&fallback);

    ui.heading(kind.to_string());

    match series {
        ChartSeries::Scatter {
            x_label,
            y_label,
            points,
        } => {
            Plot::new("scatter_plot")
                .legend(Legend::default())
                .x_axis_label(x_label.as_str())
                .y_axis_label(y_label.as_str())
                .show(ui, |plot_ui| {
                    let points = Points::new(PlotPoints::from(points.clone()))
                        .name(y_label)
                        .radius(4.0)
                        .color(Color32::LIGHT_BLUE);
                    plot_ui.points(points);
                });
        }
        ChartSeries::Bar {
            x_label,
            y_label,
            bars,
        } => {
            let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
            Plot::new("bar_graph")
                .legend(Legend::default())
                .x_axis_label(x_label.as_str())
                .y_axis_label(y_label.as_str())
                .x_axis_formatter(move |mark, _range| category_tick(&labels, mark.value))
                .include_y(0.0)
                .show(ui, |plot_ui| {
                    let bars: Vec<Bar> = bars
                        .iter()
                        .enumerate()
                        .map(|(i, b)| {
                            Bar::new(i as f64, b.value)
                                .width(0.8)
                                .name(&b.label)
                                .fill(colors.color_for(&b.label))
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(y_label));
                });
        }
        ChartSeries::Histogram { x_label, bins } => {
            Plot::new("histogram")
                .x_axis_label(x_label.as_str())
                .y_axis_label("Count")
                .include_y(0.0)
                .show(ui, |plot_ui| histogram_bars(plot_ui, x_label, bins));
        }
        ChartSeries::Pie { slices } => {
            Plot::new("pie_chart")
                .legend(Legend::default())
                .data_aspect(1.0)
                .show_axes(false)
                .show_grid(false)
                .show(ui, |plot_ui| pie_slices(plot_ui, slices, colors));
        }
    }
}

/// Category label for an integer tick, blank elsewhere.
fn category_tick(labels: &[String], value: f64) -> String {
    if value.fract() != 0.0 || value < 0.0 {
        return String::new();
    }
    labels.get(value as usize).cloned().unwrap_or_default()
}

fn histogram_bars(plot_ui: &mut PlotUi, name: &str, bins: &[Bin]) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .fill(Color32::LIGHT_BLUE)
        })
        .collect();
    plot_ui.bar_chart(BarChart::new(bars).name(name));
}

/// Slices are drawn counter-clockwise from the positive x axis, each split
/// into convex wedges.
fn pie_slices(plot_ui: &mut PlotUi, slices: &[Slice], colors: &ColorMap) {
    const STEPS_PER_TURN: f64 = 128.0;
    const MAX_WEDGE: f64 = TAU / 8.0;

    let mut start = 0.0;
    for slice in slices {
        let sweep = slice.fraction * TAU;
        let color = colors.color_for(&slice.label);

        let mut wedge_start = start;
        while wedge_start < start + sweep {
            let wedge_end = (wedge_start + MAX_WEDGE).min(start + sweep);
            let steps = (((wedge_end - wedge_start) / TAU) * STEPS_PER_TURN).ceil().max(1.0) as usize;

            let mut outline = vec![[0.0, 0.0]];
            outline.extend((0..=steps).map(|i| {
                let angle = wedge_start + (wedge_end - wedge_start) * i as f64 / steps as f64;
                [angle.cos(), angle.sin()]
            }));

            plot_ui.polygon(
                Polygon::new(PlotPoints::from(outline))
                    .name(&slice.label)
                    .fill_color(color)
                    .stroke((1.0, Color32::WHITE)),
            );
            wedge_start = wedge_end;
        }

        let middle = start + sweep / 2.0;
        plot_ui.text(Text::new(
            PlotPoint::new(0.6 * middle.cos(), 0.6 * middle.sin()),
            format!("{:.1}%", slice.fraction * 100.0),
        ));
        start += sweep;
    }
}
