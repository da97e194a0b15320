use super::Overlay;
use crate::render::GpuContext;
use winit::event::WindowEvent;
use winit::window::Window;

const PANEL_WIDTH: f32 = 320.0;

/// Native presenter for [`Overlay`]: text areas drawn by egui on top of
/// the resolved frame.
pub struct EguiOverlay {
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl EguiOverlay {
    pub fn new(window: &Window, context: &GpuContext) -> Self {
        let egui_ctx = egui::Context::default();
        let state = egui_winit::State::new(
            egui_ctx,
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(&context.device, context.config.format, None, 1, false);
        Self { state, renderer }
    }

    /// Returns true when egui consumed the event.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    pub fn render(&mut self, window: &Window, context: &GpuContext, view: &wgpu::TextureView, overlay: &Overlay) {
        let raw_input = self.state.take_egui_input(window);
        let egui_ctx = self.state.egui_ctx().clone();

        let full_output = egui_ctx.run(raw_input, |ctx| draw(ctx, overlay));

        self.state.handle_platform_output(window, full_output.platform_output);
        let clipped_primitives = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(&context.device, &context.queue, *id, delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [context.size.width, context.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Egui Encoder"),
        });

        self.renderer.update_buffers(
            &context.device,
            &context.queue,
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            self.renderer.render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        context.queue.submit(std::iter::once(encoder.finish()));

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

fn draw(ctx: &egui::Context, overlay: &Overlay) {
    let dark = egui::Color32::from_rgb(0x21, 0x25, 0x29);

    if let Some(coords) = &overlay.coords {
        egui::Area::new(egui::Id::new("coords"))
            .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(coords).monospace().color(dark));
            });
    }

    if let Some(loading) = &overlay.loading {
        egui::Area::new(egui::Id::new("loading"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(loading).size(18.0).color(dark));
            });
    }

    for panel in overlay.panels.iter().filter(|panel| panel.state.is_visible()) {
        egui::Area::new(egui::Id::new(("panel", panel.class.as_str())))
            .anchor(egui::Align2::LEFT_CENTER, [40.0 + panel.state.offset_x, 0.0])
            .interactable(false)
            .show(ctx, |ui| {
                ui.set_opacity(panel.state.opacity);
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(PANEL_WIDTH);
                    ui.heading(&panel.caption);
                });
            });
    }

    // The window is the pinned section: markers become a scroll gauge.
    if let Some(markers) = overlay.markers {
        egui::Area::new(egui::Id::new("markers"))
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(format!("start {:.0}px", markers.start)).color(egui::Color32::GREEN));
                ui.label(
                    egui::RichText::new(format!("scroll {:.0}px", overlay.scroll_y)).color(dark),
                );
                ui.label(egui::RichText::new(format!("end {:.0}px", markers.end)).color(egui::Color32::RED));
            });
    }
}
