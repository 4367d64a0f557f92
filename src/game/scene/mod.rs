mod menu_scene;

use bevy::prelude::*;

use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnExit(Screen::Loading), menu_scene::spawn_menu_scene);
}
