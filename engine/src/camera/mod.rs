//! Camera Module
//!
//! 2D camera state. This module is window-system agnostic; it only deals
//! with transforms and visibility boxes.

pub mod viewport;

pub use viewport::Viewport;
