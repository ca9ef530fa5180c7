use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use sheet_charts::data::builder::ChartKind;
use sheet_charts::data::model::Dataset;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – chart kind, entry fields, data preview
// ---------------------------------------------------------------------------

/// Render the left input panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Excel Visualization");
    ui.separator();

    ui.strong("Select Graph Type:");
    let selected = state
        .chart_kind
        .map(|k| k.to_string())
        .unwrap_or_default();
    egui::ComboBox::from_id_salt("graph_type")
        .selected_text(selected)
        .show_ui(ui, |ui: &mut Ui| {
            for kind in ChartKind::ALL {
                if ui
                    .selectable_label(state.chart_kind == Some(kind), kind.to_string())
                    .clicked()
                {
                    state.select_chart_kind(kind);
                }
            }
        });
    ui.add_space(8.0);

    if let Some(kind) = state.chart_kind {
        let (first_label, second_label) = kind.field_labels();
        if let Some(label) = first_label {
            ui.label(label);
            ui.text_edit_singleline(&mut state.first_field);
        }
        ui.label(second_label);
        ui.text_edit_singleline(&mut state.second_field);
        ui.add_space(8.0);
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Submit").clicked() {
            state.submit();
        }
        if ui.button("Reset").clicked() {
            state.reset();
        }
    });

    if let Some(msg) = &state.status_message {
        ui.add_space(4.0);
        ui.label(RichText::new(msg).color(Color32::RED));
    }

    if let Some(dataset) = &state.dataset {
        ui.separator();
        ui.strong(format!("{} rows", dataset.len()));
        data_table(ui, dataset);
    }
}

/// Read-only preview of the current dataset.
fn data_table(ui: &mut Ui, dataset: &Dataset) {
    let columns = dataset.columns();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(60.0), columns.len())
        .header(20.0, |mut header| {
            for column in columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(&column.name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, dataset.len(), |mut row| {
                let index = row.index();
                for column in columns {
                    row.col(|ui: &mut Ui| {
                        ui.label(column.values[index].to_string());
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Load Data…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save Data…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows, columns: {}",
                ds.len(),
                ds.column_names().join(", ")
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

const READABLE: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Load data")
        .add_filter("Supported files", READABLE)
        .add_filter("Excel files", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_from(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    if state.dataset.is_none() {
        state.status_message = Some("No data to save.".to_string());
        return;
    }

    let file = rfd::FileDialog::new()
        .set_title("Save data")
        .set_file_name("data.xlsx")
        .add_filter("Excel files", &["xlsx"])
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(mut path) = file {
        if path.extension().is_none() {
            path.set_extension("xlsx");
        }
        state.save_to(&path);
    }
}
