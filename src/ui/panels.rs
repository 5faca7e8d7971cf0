use std::path::Path;

use amptune::amplify::TransitionMode;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorScheme;
use crate::settings::{ModeKind, Settings};
use crate::state::{AppState, SelectionMode};

// ---------------------------------------------------------------------------
// Left side panel – data info and processing controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            data_info(ui, state);
            ui.separator();

            // ---- Selection ----
            ui.strong("Selection");
            for mode in SelectionMode::ALL {
                if ui
                    .radio_value(&mut state.selection.mode, mode, mode.label())
                    .changed()
                {
                    state.selection.clear();
                }
            }
            ui.label(RichText::new(state.selection.mode.hint()).small().weak());
            ui.separator();

            processing_controls(ui, &mut state.settings);
            ui.separator();

            // ---- Display ----
            ui.strong("Colour scheme");
            let before = state.settings.color_scheme;
            egui::ComboBox::from_id_salt("color_scheme")
                .selected_text(before.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for scheme in ColorScheme::ALL {
                        ui.selectable_value(&mut state.settings.color_scheme, scheme, scheme.label());
                    }
                });
            if state.settings.color_scheme != before {
                state.texture_dirty = true;
            }
            ui.separator();

            history_table(ui, state);
        });
}

fn data_info(ui: &mut Ui, state: &AppState) {
    ui.heading("Data");
    let Some(session) = &state.session else {
        ui.label("No file loaded.");
        return;
    };
    egui::Grid::new("data_info")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("File");
            ui.label(session.file_name());
            ui.end_row();
            ui.label("Traces");
            ui.label(session.original.n_traces().to_string());
            ui.end_row();
            ui.label("Samples");
            ui.label(session.original.n_samples().to_string());
            ui.end_row();
            ui.label("Interval");
            ui.label(format!("{:.3} ms", session.dt_ms()));
            ui.end_row();
        });
}

fn processing_controls(ui: &mut Ui, settings: &mut Settings) {
    ui.strong("Processing");
    for kind in ModeKind::ALL {
        ui.radio_value(&mut settings.mode, kind, kind.label());
    }

    match settings.mode {
        ModeKind::Scale => {
            ui.add(
                egui::Slider::new(&mut settings.scale_factor, 0.1..=20.0)
                    .logarithmic(true)
                    .text("factor"),
            );
        }
        ModeKind::Align => {
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Window");
                ui.add(
                    egui::DragValue::new(&mut settings.align_traces)
                        .range(0..=1000)
                        .suffix(" tr"),
                );
                ui.add(
                    egui::DragValue::new(&mut settings.align_ms)
                        .range(0.0..=10_000.0)
                        .suffix(" ms"),
                );
            });
        }
    }

    ui.add_space(4.0);
    ui.strong("Transition");
    ui.horizontal(|ui: &mut Ui| {
        ui.add(
            egui::DragValue::new(&mut settings.transition_traces)
                .range(0..=1000)
                .suffix(" tr"),
        );
        ui.add(
            egui::DragValue::new(&mut settings.transition_ms)
                .range(0.0..=10_000.0)
                .suffix(" ms"),
        );
    });
    ui.horizontal(|ui: &mut Ui| {
        for mode in TransitionMode::ALL {
            ui.radio_value(&mut settings.transition_mode, mode, mode.label());
        }
    });
}

fn history_table(ui: &mut Ui, state: &AppState) {
    ui.strong("History");
    let current = state.history.current_index();
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::exact(24.0))
        .column(Column::remainder())
        .header(18.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("#");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Step");
            });
        })
        .body(|mut body| {
            for (i, entry) in state.history.entries().iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.set_selected(i == current);
                    row.col(|ui: &mut Ui| {
                        ui.label(i.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&entry.description);
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.session.is_some(), egui::Button::new("Save processed…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Load settings…").clicked() {
                load_settings_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save settings…").clicked() {
                save_settings_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let loaded = state.session.is_some();
        if ui
            .add_enabled(state.history.can_undo(), egui::Button::new("Undo"))
            .clicked()
        {
            state.undo();
        }
        if ui
            .add_enabled(state.history.can_redo(), egui::Button::new("Redo"))
            .clicked()
        {
            state.redo();
        }
        if ui.add_enabled(loaded, egui::Button::new("Reset")).clicked() {
            state.reset();
        }
        if ui
            .add_enabled(!state.selection.points.is_empty(), egui::Button::new("Clear selection"))
            .clicked()
        {
            state.selection.clear();
        }

        ui.separator();

        if let Some(status) = &state.status {
            let color = if status.is_error {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(&status.text).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn segy_dialog(title: &str) -> rfd::FileDialog {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("SEG-Y", &["sgy", "segy"])
        .add_filter("All files", &["*"])
}

fn json_dialog(title: &str) -> rfd::FileDialog {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("JSON", &["json"])
}

pub fn open_file_dialog(state: &mut AppState) {
    if let Some(path) = segy_dialog("Open SEG-Y file").pick_file() {
        if let Err(e) = state.load(&path) {
            state.report(&e);
        }
    }
}

fn save_file_dialog(state: &mut AppState) {
    let suggested = state
        .session
        .as_ref()
        .map(|s| processed_name(&s.path))
        .unwrap_or_else(|| "processed.sgy".into());
    if let Some(path) = segy_dialog("Save processed SEG-Y")
        .set_file_name(suggested)
        .save_file()
    {
        if let Err(e) = state.save(&path) {
            state.report(&e);
        }
    }
}

fn load_settings_dialog(state: &mut AppState) {
    if let Some(path) = json_dialog("Load settings").pick_file() {
        match Settings::load(&path) {
            Ok(settings) => {
                if settings.color_scheme != state.settings.color_scheme {
                    state.texture_dirty = true;
                }
                state.settings = settings;
                state.set_info(format!("Settings loaded from {}", path.display()));
            }
            Err(e) => state.report(&e),
        }
    }
}

fn save_settings_dialog(state: &mut AppState) {
    if let Some(path) = json_dialog("Save settings")
        .set_file_name("amptune_settings.json")
        .save_file()
    {
        match state.settings.save(&path) {
            Ok(()) => state.set_info(format!("Settings saved to {}", path.display())),
            Err(e) => state.report(&e),
        }
    }
}

/// `line.sgy` → `line_processed.sgy`.
fn processed_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "processed".into());
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sgy".into());
    format!("{stem}_processed.{ext}")
}
