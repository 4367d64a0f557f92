//! Skin selection screen: the skin list of the displayed character over the 3D scene.

use std::fmt::Write;

use bevy::prelude::*;

use crate::{
    game::skins::{
        RefreshSkinUi, SkinCatalog, SkinCursor, SkinNotice, SkinSelectionCoordinator,
        skin_options,
    },
    screens::Screen,
    theme::widget,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::SkinSelection), spawn_skin_hud);
    app.add_systems(OnExit(Screen::SkinSelection), clear_notice);
    app.add_systems(
        Update,
        refresh_skin_hud.run_if(in_state(Screen::SkinSelection)),
    );
}

/// Marker component for the skin list text
#[derive(Component)]
struct SkinListText;

const CONTROLS_HINT: &str =
    "Left/Right browse   Enter select   P buy   Tab next character   Space skip   Esc back";

fn spawn_skin_hud(mut commands: Commands) {
    info!("Entering skin selection");

    commands.spawn((
        widget::ui_root("Skin Selection HUD"),
        DespawnOnExit(Screen::SkinSelection),
        children![(
            widget::panel("Skin List Panel"),
            children![
                (widget::label(""), SkinListText),
                widget::label(CONTROLS_HINT),
            ],
        )],
    ));
}

fn clear_notice(mut notice: ResMut<SkinNotice>) {
    notice.0 = None;
}

fn refresh_skin_hud(
    mut refreshes: MessageReader<RefreshSkinUi>,
    catalog: Res<SkinCatalog>,
    coordinator: Res<SkinSelectionCoordinator>,
    cursor: Res<SkinCursor>,
    notice: Res<SkinNotice>,
    mut texts: Query<&mut Text, With<SkinListText>>,
) {
    let refreshed = refreshes.read().count() > 0;
    if !(refreshed || coordinator.is_changed() || cursor.is_changed() || notice.is_changed()) {
        return;
    }
    let content = skin_list(&catalog, &coordinator, *cursor, notice.0.as_deref());
    for mut text in &mut texts {
        if text.0 != content {
            text.0.clone_from(&content);
        }
    }
}

fn skin_list(
    catalog: &SkinCatalog,
    coordinator: &SkinSelectionCoordinator,
    cursor: SkinCursor,
    notice: Option<&str>,
) -> String {
    let character = coordinator.displayed_character();
    let profile = coordinator.profile();
    let mut out = String::new();

    let name = catalog
        .character(character)
        .map(|record| record.name.as_str())
        .unwrap_or("Unknown");
    let _ = writeln!(
        out,
        "{name}    coins: {}    level: {}",
        profile.coins, profile.level
    );

    let selected = coordinator.current_selection();
    for (index, skin) in skin_options(catalog, character).into_iter().enumerate() {
        let Ok(record) = catalog.get_skin(character, skin) else {
            continue;
        };
        let marker = if index == cursor.index { ">" } else { " " };
        let mut line = format!("{marker} {}", record.name);
        if skin == selected {
            line.push_str("  [selected]");
        }
        if !record.unlocked_by_default && !coordinator.is_unlocked(character, skin) {
            let _ = write!(
                line,
                "  [locked: {} coins, level {}]",
                record.unlock_cost, record.unlock_level
            );
        }
        let _ = writeln!(out, "{line}");
    }

    if coordinator.is_presentation_active() {
        let _ = writeln!(out, "Presenting...");
    }
    if let Some(notice) = notice {
        let _ = writeln!(out, "{notice}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::skins::{
        CharacterId, CharacterRecord, InMemoryStore, PlayerProfile, SkinId, SkinRecord,
        UnlockState,
    };

    #[test]
    fn test_skin_list_marks_cursor_selection_and_locks() {
        let mut ember = SkinRecord::default_skin();
        ember.id = SkinId(3);
        ember.name = "Ember".to_string();
        ember.unlocked_by_default = false;
        ember.unlock_cost = 200;
        ember.unlock_level = 4;
        let catalog = SkinCatalog::new(vec![CharacterRecord {
            id: CharacterId(1),
            name: "Runner".to_string(),
            skins: vec![ember],
        }]);
        let store = InMemoryStore::new(UnlockState::with_profile(PlayerProfile {
            coins: 80,
            level: 2,
        }));
        let coordinator = SkinSelectionCoordinator::new(Box::new(store), CharacterId(1));

        let text = skin_list(&catalog, &coordinator, SkinCursor { index: 1 }, Some("Ember is locked"));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Runner    coins: 80    level: 2");
        assert_eq!(lines[1], "  Default  [selected]");
        assert_eq!(lines[2], "> Ember  [locked: 200 coins, level 4]");
        assert_eq!(lines[3], "Ember is locked");
    }
}
