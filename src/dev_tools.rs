//! Development tools for the game. This plugin is only enabled in dev builds.

use bevy::{
    dev_tools::states::log_transitions, input::common_conditions::input_just_pressed, prelude::*,
};

use crate::{
    game::skins::{SkinCatalog, SkinSelectionCoordinator, UnlockSkin},
    screens::Screen,
};

pub(super) fn plugin(app: &mut App) {
    // Log `Screen` state transitions.
    app.add_systems(Update, log_transitions::<Screen>);

    // Toggle the debug overlay for UI.
    app.add_systems(
        Update,
        toggle_debug_ui.run_if(input_just_pressed(TOGGLE_KEY)),
    );
    app.add_systems(
        Update,
        (
            dump_skin_state.run_if(input_just_pressed(KeyCode::F3)),
            unlock_all_skins.run_if(input_just_pressed(KeyCode::F4)),
        )
            .run_if(in_state(Screen::SkinSelection)),
    );
}

const TOGGLE_KEY: KeyCode = KeyCode::Backquote;

fn toggle_debug_ui(mut options: ResMut<UiDebugOptions>) {
    options.toggle();
}

fn dump_skin_state(coordinator: Res<SkinSelectionCoordinator>) {
    info!(
        "Skin state: displayed={} selected={} presenting={} pending={:?} region={:?} profile={:?}",
        coordinator.displayed_character(),
        coordinator.current_selection(),
        coordinator.is_presentation_active(),
        coordinator.pending_swap(),
        coordinator.active_region(),
        coordinator.profile(),
    );
}

/// Grants every skin of the displayed character
fn unlock_all_skins(
    catalog: Res<SkinCatalog>,
    coordinator: Res<SkinSelectionCoordinator>,
    mut unlocks: MessageWriter<UnlockSkin>,
) {
    let character = coordinator.displayed_character();
    let Ok(record) = catalog.character(character) else {
        return;
    };
    for skin in &record.skins {
        unlocks.write(UnlockSkin {
            character,
            skin: skin.id,
        });
    }
    info!("Unlocked all skins for {character}");
}
