use egui::{Color32, ColorImage};
use skyfetch_core::frame::Frame;

/// Display level for a normalized sample. Out-of-range and NaN samples clamp to black or white.
fn gray_level(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * f32::from(u8::MAX)).round() as u8
}

/// Texture upload for a frame, one opaque gray pixel per sample in display order.
pub fn frame_to_color_image(frame: &Frame) -> ColorImage {
    let pixels: Vec<Color32> = frame
        .data
        .iter()
        .map(|&v| Color32::from_gray(gray_level(v)))
        .collect();

    ColorImage {
        size: [frame.width(), frame.height()],
        pixels,
        source_size: Default::default(),
    }
}
