use amptune::data::Point;
use eframe::egui::{self, Color32, TextureHandle, Ui};
use egui_plot::{Line, Plot, PlotImage, PlotPoint, PlotPoints, PlotUi, Points, Polygon};

use crate::state::{AppState, SelectionMode};

const SELECTION_COLOR: Color32 = Color32::from_rgb(255, 200, 0);

// ---------------------------------------------------------------------------
// Section plot (central panel)
// ---------------------------------------------------------------------------

/// Render the section image and handle selection input.
pub fn section_plot(ui: &mut Ui, state: &mut AppState, texture: Option<&TextureHandle>) {
    let (Some(session), Some(texture)) = (&state.session, texture) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a SEG-Y file to start  (File → Open…)");
        });
        return;
    };

    let n_traces = session.original.n_traces() as f32;
    let n_samples = session.original.n_samples() as f32;
    let dt_ms = session.dt_ms();
    // Cell i covers [i - 0.5, i + 0.5] along both axes.
    let center = PlotPoint::new(
        f64::from((n_traces - 1.0) / 2.0),
        -f64::from((n_samples - 1.0) * dt_ms / 2.0),
    );
    let size = egui::vec2(n_traces, n_samples * dt_ms);
    let mode = state.selection.mode;
    let points = state.selection.points.clone();

    let response = Plot::new("section_plot")
        .x_axis_label("Trace")
        .y_axis_label("Time (ms)")
        .y_axis_formatter(|mark, _range| format!("{:.0}", -mark.value))
        .allow_drag(mode == SelectionMode::PointByPoint)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.image(PlotImage::new(texture.id(), center, size));
            draw_selection(plot_ui, mode, &points);
            plot_ui.pointer_coordinate()
        });

    let hover = response.inner;
    let r = &response.response;

    match mode {
        SelectionMode::PointByPoint => {
            if r.clicked() {
                if let Some(p) = hover {
                    state.add_point(p.x, p.y);
                }
            }
        }
        SelectionMode::Rectangle => {
            if r.drag_started_by(egui::PointerButton::Primary) {
                if let Some(p) = hover {
                    state.start_rectangle(p.x, p.y);
                }
            } else if r.dragged_by(egui::PointerButton::Primary) {
                if let Some(p) = hover {
                    state.drag_rectangle(p.x, p.y);
                }
            }
        }
    }

    let enter = mode == SelectionMode::PointByPoint
        && ui.input(|i| i.key_pressed(egui::Key::Enter));
    if r.secondary_clicked() || enter {
        if let Err(e) = state.finalize_selection() {
            state.report(&e);
        }
    }
    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        state.selection.clear();
    }
}

fn plot_points(points: &[Point]) -> Vec<[f64; 2]> {
    points
        .iter()
        .map(|p| [f64::from(p.trace), -f64::from(p.time_ms)])
        .collect()
}

fn draw_selection(plot_ui: &mut PlotUi, mode: SelectionMode, points: &[Point]) {
    if points.is_empty() {
        return;
    }
    let coords = plot_points(points);

    match mode {
        SelectionMode::Rectangle if coords.len() == 2 => {
            let ([x0, y0], [x1, y1]) = (coords[0], coords[1]);
            let corners = vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]];
            plot_ui.polygon(
                Polygon::new(PlotPoints::new(corners))
                    .stroke(egui::Stroke::new(1.5, SELECTION_COLOR))
                    .fill_color(SELECTION_COLOR.gamma_multiply(0.15)),
            );
        }
        _ => {
            if coords.len() >= 3 {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(coords.clone()))
                        .stroke(egui::Stroke::new(1.0, SELECTION_COLOR))
                        .fill_color(SELECTION_COLOR.gamma_multiply(0.15)),
                );
            } else {
                plot_ui.line(
                    Line::new(PlotPoints::new(coords.clone()))
                        .color(SELECTION_COLOR)
                        .width(1.5),
                );
            }
            plot_ui.points(
                Points::new(PlotPoints::new(coords))
                    .color(SELECTION_COLOR)
                    .radius(3.0),
            );
        }
    }
}
