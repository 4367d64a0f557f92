use bevy::prelude::*;

use crate::screens::Screen;

use super::{
    CharacterId, DisplayCharacter, PresentationSignal, PurchaseSkin, SelectSkin, SkinCatalog,
    SkinId, SkinSelectionCoordinator,
};

/// Highlighted entry in the skin list of the displayed character
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkinCursor {
    pub index: usize,
}

/// Skins offered for `character`: the default look first, then catalog order.
pub fn skin_options(catalog: &SkinCatalog, character: CharacterId) -> Vec<SkinId> {
    let mut options = vec![SkinId::DEFAULT];
    if let Ok(record) = catalog.character(character) {
        options.extend(record.skins.iter().map(|skin| skin.id));
    }
    options
}

fn step_cursor(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

pub fn skin_selection_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    catalog: Res<SkinCatalog>,
    coordinator: Res<SkinSelectionCoordinator>,
    mut cursor: ResMut<SkinCursor>,
    mut selections: MessageWriter<SelectSkin>,
    mut purchases: MessageWriter<PurchaseSkin>,
    mut displays: MessageWriter<DisplayCharacter>,
    mut signals: MessageWriter<PresentationSignal>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    let character = coordinator.displayed_character();
    let options = skin_options(&catalog, character);

    if keyboard.just_pressed(KeyCode::ArrowRight) || keyboard.just_pressed(KeyCode::KeyD) {
        cursor.index = step_cursor(cursor.index, options.len(), true);
    }
    if keyboard.just_pressed(KeyCode::ArrowLeft) || keyboard.just_pressed(KeyCode::KeyA) {
        cursor.index = step_cursor(cursor.index, options.len(), false);
    }

    let highlighted = options.get(cursor.index).copied();
    if let Some(skin) = highlighted {
        if keyboard.just_pressed(KeyCode::Enter) {
            selections.write(SelectSkin { character, skin });
        }
        if keyboard.just_pressed(KeyCode::KeyP) {
            purchases.write(PurchaseSkin { character, skin });
        }
    }

    // Skip straight to the swap point of the running presentation
    if keyboard.just_pressed(KeyCode::Space) && coordinator.is_presentation_active() {
        signals.write(PresentationSignal);
    }

    if keyboard.just_pressed(KeyCode::Tab) {
        if let Some(next) = catalog.next_character(character) {
            cursor.index = 0;
            displays.write(DisplayCharacter { character: next });
        }
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        next_screen.set(Screen::Title);
    }
}
