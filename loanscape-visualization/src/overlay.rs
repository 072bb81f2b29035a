//! egui overlay drawing the hover tooltip

use crate::tooltip::Tooltip;
use winit::event::WindowEvent;
use winit::window::Window;

/// Tessellated overlay output for one frame
pub struct OverlayOutput {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// egui context and its winit integration
pub struct TooltipOverlay {
    context: egui::Context,
    state: egui_winit::State,
}

impl TooltipOverlay {
    pub fn new(window: &Window) -> Self {
        let context = egui::Context::default();
        let state = egui_winit::State::new(
            context.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
        );
        Self { context, state }
    }

    /// Feed a window event to egui. The overlay never captures input.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) {
        let _ = self.state.on_window_event(window, event);
    }

    /// Lay out the tooltip and tessellate it
    pub fn run(&mut self, window: &Window, tooltip: &Tooltip) -> OverlayOutput {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.context.run(raw_input, |ctx| draw_tooltip(ctx, tooltip));
        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        OverlayOutput {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        }
    }
}

fn draw_tooltip(ctx: &egui::Context, tooltip: &Tooltip) {
    let Some(content) = tooltip.content() else {
        return;
    };
    let position = tooltip.position();

    egui::Area::new(egui::Id::new("record_tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(egui::pos2(position.x, position.y))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                for (label, value) in content.rows() {
                    ui.horizontal(|ui| {
                        ui.strong(format!("{label}:"));
                        ui.label(value);
                    });
                }
            });
        });
}
