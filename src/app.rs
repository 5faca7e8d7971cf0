use eframe::egui;

use crate::color::render_section;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AmptuneApp {
    pub state: AppState,
    /// Section image of the current history entry.
    texture: Option<egui::TextureHandle>,
}

impl AmptuneApp {
    /// Re-upload the section image if the data or colour scheme changed.
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.state.texture_dirty {
            return;
        }
        self.state.texture_dirty = false;

        let (Some(session), Some(data)) = (&self.state.session, self.state.current_data()) else {
            self.texture = None;
            return;
        };
        let max_side = ctx.input(|i| i.max_texture_side);
        let image = render_section(
            data,
            session.display_range,
            self.state.settings.color_scheme,
            max_side,
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("section", image, egui::TextureOptions::NEAREST));
            }
        }
    }
}

impl eframe::App for AmptuneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_texture(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls and history ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: section ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::section_plot(ui, &mut self.state, self.texture.as_ref());
        });

        // Edits made this frame are shown on the next one.
        if self.state.texture_dirty {
            ctx.request_repaint();
        }
    }
}
