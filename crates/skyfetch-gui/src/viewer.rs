use skyfetch_core::error::{Result, SkyfetchError};
use skyfetch_core::render::{DisplayImage, Renderer, Stretch};
use tracing::info;

use crate::convert::frame_to_color_image;

const MIN_ZOOM: f32 = 0.05;
const MAX_ZOOM: f32 = 20.0;
const MAX_WINDOW: [f32; 2] = [1200.0, 900.0];
const MIN_WINDOW: [f32; 2] = [320.0, 240.0];

/// Shows each image in its own window and blocks until the user closes it.
pub struct WindowRenderer {
    stretch: Stretch,
}

impl WindowRenderer {
    pub fn new(stretch: Stretch) -> Self {
        Self { stretch }
    }
}

impl Renderer for WindowRenderer {
    fn render(&mut self, image: &DisplayImage) -> Result<()> {
        let frame = image.to_frame(&self.stretch);
        let color = frame_to_color_image(&frame);
        let inner_size = initial_window_size(color.size);

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(inner_size)
                .with_min_inner_size(MIN_WINDOW)
                .with_title(&image.title),
            run_and_return: true,
            ..Default::default()
        };

        info!(title = %image.title, width = color.size[0], height = color.size[1], "Opening viewer");
        let viewer = ImageViewer::new(color);
        eframe::run_native(
            "skyfetch-viewer",
            options,
            Box::new(move |_cc| Ok(Box::new(viewer))),
        )
        .map_err(|e| SkyfetchError::Render(format!("viewer window failed: {e}")))
    }
}

/// Window size that fits the image inside `MAX_WINDOW`, keeping its aspect ratio.
fn initial_window_size(size: [usize; 2]) -> [f32; 2] {
    let (w, h) = (size[0].max(1) as f32, size[1].max(1) as f32);
    let scale = (MAX_WINDOW[0] / w).min(MAX_WINDOW[1] / h).min(1.0);
    [
        (w * scale).max(MIN_WINDOW[0]),
        (h * scale).max(MIN_WINDOW[1]),
    ]
}

/// Single-image viewer with axes hidden. Scroll zooms, dragging pans,
/// double-click refits.
struct ImageViewer {
    pending: Option<egui::ColorImage>,
    texture: Option<egui::TextureHandle>,
    image_size: egui::Vec2,
    zoom: f32,
    pan_offset: egui::Vec2,
    needs_fit: bool,
}

impl ImageViewer {
    fn new(image: egui::ColorImage) -> Self {
        let image_size = egui::vec2(image.size[0] as f32, image.size[1] as f32);
        Self {
            pending: Some(image),
            texture: None,
            image_size,
            zoom: 1.0,
            pan_offset: egui::Vec2::ZERO,
            needs_fit: true,
        }
    }
}

impl eframe::App for ImageViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(image) = self.pending.take() {
            self.texture = Some(ctx.load_texture("image", image, egui::TextureOptions::NEAREST));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            ui.painter()
                .rect_filled(rect, 0.0, egui::Color32::from_gray(30));

            let Some(texture_id) = self.texture.as_ref().map(|t| t.id()) else {
                return;
            };
            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

            if self.needs_fit || response.double_clicked() {
                self.fit_to_rect(rect);
                self.needs_fit = false;
            }
            self.handle_zoom(ui, &response, rect);
            self.handle_pan(&response);

            let img_rect = egui::Rect::from_center_size(
                rect.center() + self.pan_offset,
                self.image_size * self.zoom,
            );
            ui.painter().image(
                texture_id,
                img_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        });
    }
}

impl ImageViewer {
    fn handle_zoom(&mut self, ui: &egui::Ui, response: &egui::Response, rect: egui::Rect) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 || !response.hovered() {
            return;
        }

        let zoom_factor = (scroll_delta * 0.005).exp();
        let new_zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);

        // Zoom toward mouse cursor
        if let Some(mouse_pos) = ui.input(|i| i.pointer.hover_pos()) {
            let center = rect.center().to_vec2() + self.pan_offset;
            let mouse_rel = mouse_pos.to_vec2() - center;
            let scale_change = new_zoom / self.zoom;
            self.pan_offset += mouse_rel * (1.0 - scale_change);
        }

        self.zoom = new_zoom;
    }

    fn handle_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Middle)
            || response.dragged_by(egui::PointerButton::Primary)
        {
            self.pan_offset += response.drag_delta();
        }
    }

    fn fit_to_rect(&mut self, rect: egui::Rect) {
        let available = rect.size();
        let fit_x = available.x / self.image_size.x.max(1.0);
        let fit_y = available.y / self.image_size.y.max(1.0);
        self.zoom = fit_x.min(fit_y).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan_offset = egui::Vec2::ZERO;
    }
}
