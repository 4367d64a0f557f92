//! The title screen that appears after loading.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{screens::Screen, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Title), spawn_title_screen);
    app.add_systems(
        Update,
        open_skin_selection
            .run_if(in_state(Screen::Title).and(input_just_pressed(KeyCode::Enter))),
    );
}

fn spawn_title_screen(mut commands: Commands) {
    commands.spawn((
        widget::ui_root("Title Screen"),
        DespawnOnExit(Screen::Title),
        children![
            widget::header("Skin Showcase"),
            widget::label("Press Enter to customize your character"),
        ],
    ));
}

fn open_skin_selection(mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::SkinSelection);
}
