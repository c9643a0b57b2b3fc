pub mod png;
pub mod stretch;

use ndarray::{Array2, Axis};

use crate::error::Result;
use crate::frame::Frame;

pub use png::PngRenderer;
pub use stretch::Stretch;

/// Where row 0 of the data is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Row 0 at the top (image convention).
    UpperLeft,
    /// Row 0 at the bottom (plot convention).
    LowerLeft,
}

/// A 2D plane ready for display, titled after its source file.
#[derive(Clone, Debug)]
pub struct DisplayImage {
    pub title: String,
    pub data: Array2<f64>,
    pub origin: Origin,
}

impl DisplayImage {
    /// Normalize to [0, 1] and orient so that row 0 of the frame is the top row on screen.
    pub fn to_frame(&self, stretch: &Stretch) -> Frame {
        let mut data = stretch::normalize(self.data.view(), stretch);
        if self.origin == Origin::LowerLeft {
            data.invert_axis(Axis(0));
            data = data.as_standard_layout().into_owned();
        }
        Frame::new(data)
    }
}

/// Presents one image. Implementations may block until the user is done with it.
pub trait Renderer {
    fn render(&mut self, image: &DisplayImage) -> Result<()>;
}
