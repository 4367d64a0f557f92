//! Reusable UI pieces and the color palette.

pub mod palette;
pub mod widget;
