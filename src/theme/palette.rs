use bevy::prelude::*;

/// #ddd369
pub const LABEL_TEXT: Color = Color::srgb(0.867, 0.827, 0.412);

/// #fcfbcc
pub const HEADER_TEXT: Color = Color::srgb(0.988, 0.984, 0.800);

/// #2b2c2f, translucent so the 3D scene shows through
pub const PANEL_BACKGROUND: Color = Color::srgba(0.169, 0.173, 0.184, 0.8);
