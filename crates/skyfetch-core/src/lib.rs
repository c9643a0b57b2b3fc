pub mod catalog;
pub mod consts;
pub mod error;
pub mod fetch;
pub mod fits;
pub mod frame;
pub mod pipeline;
pub mod render;
pub mod shape;
