//! The skin showcase: catalog loading, the menu scene and the skin selection flow.

mod configs;
mod scene;
pub mod skins;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((configs::plugin, scene::plugin, skins::plugin));
}
