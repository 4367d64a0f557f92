use bevy::{ecs::system::SystemParam, prelude::*};

use super::{
    CharacterId, DisplayCharacter, EnvironmentSwitch, PresentationPlayer, PresentationSignal,
    PurchaseOutcome, PurchaseSkin, RefreshSkinUi, Region, SelectSkin, SkinApplied, SkinCatalog,
    SkinId, SkinLocked, SkinPresenter, SkinRecord, SkinSelectionCoordinator, SkinSettings,
    UnlockSkin, UnlockState, open_store,
};

/// Marks the character model on the menu pedestal
#[derive(Component, Debug, Default)]
pub struct PreviewCharacter;

/// Skin currently worn by a preview model
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedSkin {
    pub character: CharacterId,
    pub skin: SkinId,
}

impl Default for AppliedSkin {
    fn default() -> Self {
        Self {
            character: CharacterId::default(),
            skin: SkinId::DEFAULT,
        }
    }
}

/// Last player-facing message of the skin flow (locked, purchased, ...)
#[derive(Resource, Debug, Default)]
pub struct SkinNotice(pub Option<String>);

/// Forwards coordinator callbacks as messages.
#[derive(SystemParam)]
pub struct SkinMessageWriters<'w> {
    applied: MessageWriter<'w, SkinApplied>,
    locked: MessageWriter<'w, SkinLocked>,
    refresh: MessageWriter<'w, RefreshSkinUi>,
}

impl SkinPresenter for SkinMessageWriters<'_> {
    fn apply_skin(&mut self, character: CharacterId, skin: SkinId) {
        self.applied.write(SkinApplied { character, skin });
    }

    fn show_locked(&mut self, character: CharacterId, record: &SkinRecord) {
        self.locked.write(SkinLocked {
            character,
            skin: record.id,
        });
    }

    fn refresh(&mut self, character: CharacterId) {
        self.refresh.write(RefreshSkinUi { character });
    }
}

/// Builds the coordinator once the catalog is available
pub fn init_coordinator(
    mut commands: Commands,
    catalog: Res<SkinCatalog>,
    settings: Res<SkinSettings>,
) {
    let store = open_store(
        &settings.save_path,
        UnlockState::with_profile(settings.starting_profile),
    );
    let displayed = catalog.first_character().unwrap_or_default();
    // Scene entities may register further regions as they spawn
    let coordinator = SkinSelectionCoordinator::new(store, displayed)
        .with_environment(EnvironmentSwitch::with_showcases(catalog.showcase_regions))
        .with_presentation_player(PresentationPlayer::default())
        .with_showcase_index(catalog.default_showcase);
    commands.insert_resource(coordinator);
    info!("Skin selection ready, displaying {displayed}");
}

pub fn show_displayed_character(
    catalog: Res<SkinCatalog>,
    mut coordinator: ResMut<SkinSelectionCoordinator>,
    mut presenter: SkinMessageWriters,
) {
    let character = coordinator.displayed_character();
    if let Err(error) = coordinator.display_character(&catalog, character, &mut presenter) {
        warn!("Cannot display {character}: {error}");
    }
}

pub fn exit_skin_selection(mut coordinator: ResMut<SkinSelectionCoordinator>) {
    coordinator.exit_skin_selection();
}

pub fn register_regions(
    regions: Query<&Region, Added<Region>>,
    mut coordinator: ResMut<SkinSelectionCoordinator>,
) {
    let Some(environment) = coordinator.environment_mut() else {
        return;
    };
    for region in &regions {
        environment.register(*region);
    }
}

pub fn handle_skin_requests(
    mut displays: MessageReader<DisplayCharacter>,
    mut unlocks: MessageReader<UnlockSkin>,
    mut purchases: MessageReader<PurchaseSkin>,
    mut selections: MessageReader<SelectSkin>,
    mut signals: MessageReader<PresentationSignal>,
    catalog: Res<SkinCatalog>,
    mut coordinator: ResMut<SkinSelectionCoordinator>,
    mut notice: ResMut<SkinNotice>,
    mut presenter: SkinMessageWriters,
) {
    // Signals belong to the presentation that was running when they were sent
    for _ in signals.read() {
        coordinator.on_presentation_signal(&mut presenter);
    }

    for request in selections.read() {
        if !is_displayed(&coordinator, request.character) {
            continue;
        }
        match catalog.get_skin(request.character, request.skin) {
            Ok(record) => coordinator.select_skin(record, &mut presenter),
            Err(error) => warn!("Selection request rejected: {error}"),
        }
    }

    for request in purchases.read() {
        if !is_displayed(&coordinator, request.character) {
            continue;
        }
        match coordinator.purchase_skin(&catalog, request.character, request.skin, &mut presenter)
        {
            Ok(outcome) => notice.0 = Some(describe_purchase(outcome)),
            Err(error) => warn!("Purchase request rejected: {error}"),
        }
    }

    for request in displays.read() {
        if let Err(error) = coordinator.display_character(&catalog, request.character, &mut presenter)
        {
            warn!("Display request rejected: {error}");
        }
    }

    for request in unlocks.read() {
        if let Err(error) =
            coordinator.unlock_skin(&catalog, request.character, request.skin, &mut presenter)
        {
            warn!("Unlock request rejected: {error}");
        }
    }
}

fn is_displayed(coordinator: &SkinSelectionCoordinator, character: CharacterId) -> bool {
    let displayed = coordinator.displayed_character();
    if character != displayed {
        debug!(%character, %displayed, "Dropping request for a character no longer displayed");
        return false;
    }
    true
}

pub fn advance_presentation(
    time: Res<Time>,
    mut coordinator: ResMut<SkinSelectionCoordinator>,
    mut presenter: SkinMessageWriters,
) {
    coordinator.advance(time.delta_secs(), &mut presenter);
}

/// Visual application: tints the preview model after the applied skin.
pub fn apply_skin_visuals(
    mut applied: MessageReader<SkinApplied>,
    mut previews: Query<
        (&mut AppliedSkin, &MeshMaterial3d<StandardMaterial>),
        With<PreviewCharacter>,
    >,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(latest) = applied.read().last().copied() else {
        return;
    };
    for (mut worn, material) in &mut previews {
        *worn = AppliedSkin {
            character: latest.character,
            skin: latest.skin,
        };
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = skin_tint(latest.skin);
        }
    }
    info!("Applied {} to {}", latest.skin, latest.character);
}

pub fn record_locked_skins(mut locked: MessageReader<SkinLocked>, mut notice: ResMut<SkinNotice>) {
    for message in locked.read() {
        notice.0 = Some(format!("{} is locked", message.skin));
    }
}

/// Mirrors the environment switch into entity visibility.
pub fn sync_region_visibility(
    coordinator: Res<SkinSelectionCoordinator>,
    mut regions: Query<(&Region, &mut Visibility)>,
) {
    let Some(environment) = coordinator.environment() else {
        return;
    };
    for (region, mut visibility) in &mut regions {
        let desired = if environment.is_visible(*region) {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        if *visibility != desired {
            *visibility = desired;
        }
    }
}

fn skin_tint(skin: SkinId) -> Color {
    if skin.is_default() {
        return Color::srgb(0.8, 0.8, 0.8);
    }
    let hue = (skin.0 as f32 * 47.0).rem_euclid(360.0);
    Color::hsl(hue, 0.6, 0.5)
}

fn describe_purchase(outcome: PurchaseOutcome) -> String {
    match outcome {
        PurchaseOutcome::Unlocked { remaining_coins } => {
            format!("Unlocked! {remaining_coins} coins left")
        }
        PurchaseOutcome::AlreadyOwned => "Already owned".to_string(),
        PurchaseOutcome::InsufficientFunds { cost, coins } => {
            format!("Needs {cost} coins, you have {coins}")
        }
        PurchaseOutcome::LevelTooLow { required, level } => {
            format!("Requires level {required}, you are level {level}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;

    use crate::game::skins::{CharacterRecord, InMemoryStore, SwapToken, TimelineSpec};

    const RUNNER: CharacterId = CharacterId(1);
    const CLIMBER: CharacterId = CharacterId(2);

    fn skin(id: i32, presentation: bool, unlocked_by_default: bool) -> SkinRecord {
        SkinRecord {
            id: SkinId(id),
            name: format!("Skin {id}"),
            presentation: presentation.then(|| TimelineSpec {
                name: format!("reveal_{id}"),
                duration_secs: 2.0,
                signal_at_secs: 1.0,
            }),
            unlocked_by_default,
            unlock_cost: 150,
            unlock_level: 1,
        }
    }

    fn request_app() -> App {
        let catalog = SkinCatalog::new(vec![
            CharacterRecord {
                id: RUNNER,
                name: "Runner".to_string(),
                skins: vec![skin(1, false, true), skin(3, true, true), skin(4, true, true)],
            },
            CharacterRecord {
                id: CLIMBER,
                name: "Climber".to_string(),
                skins: vec![skin(1, false, false)],
            },
        ]);
        let coordinator = SkinSelectionCoordinator::new(Box::new(InMemoryStore::default()), RUNNER)
            .with_environment(EnvironmentSwitch::with_showcases(1))
            .with_presentation_player(PresentationPlayer::default());

        let mut app = App::new();
        app.add_message::<DisplayCharacter>()
            .add_message::<UnlockSkin>()
            .add_message::<PurchaseSkin>()
            .add_message::<SelectSkin>()
            .add_message::<PresentationSignal>()
            .add_message::<SkinApplied>()
            .add_message::<SkinLocked>()
            .add_message::<RefreshSkinUi>()
            .insert_resource(catalog)
            .insert_resource(coordinator)
            .init_resource::<SkinNotice>()
            .add_systems(Update, handle_skin_requests);
        app
    }

    fn drain_applied(app: &mut App) -> Vec<SkinApplied> {
        app.world_mut()
            .resource_mut::<Messages<SkinApplied>>()
            .drain()
            .collect()
    }

    #[test]
    fn test_selection_resolves_against_requesting_character() {
        let mut app = request_app();
        // Enter on the Runner list and Tab in the same frame
        app.world_mut().write_message(SelectSkin {
            character: RUNNER,
            skin: SkinId(1),
        });
        app.world_mut().write_message(DisplayCharacter { character: CLIMBER });
        app.update();

        let coordinator = app.world().resource::<SkinSelectionCoordinator>();
        assert_eq!(coordinator.displayed_character(), CLIMBER);
        assert_eq!(coordinator.current_selection(), SkinId::DEFAULT);
        assert!(coordinator.is_unlocked(RUNNER, SkinId(1)));
        assert!(!coordinator.is_unlocked(CLIMBER, SkinId(1)));
        assert_eq!(
            drain_applied(&mut app),
            vec![
                SkinApplied {
                    character: RUNNER,
                    skin: SkinId(1)
                },
                SkinApplied {
                    character: CLIMBER,
                    skin: SkinId::DEFAULT
                },
            ]
        );
    }

    #[test]
    fn test_requests_for_previous_character_are_dropped() {
        let mut app = request_app();
        app.world_mut().write_message(DisplayCharacter { character: CLIMBER });
        app.update();
        drain_applied(&mut app);

        app.world_mut().write_message(SelectSkin {
            character: RUNNER,
            skin: SkinId(1),
        });
        app.world_mut().write_message(PurchaseSkin {
            character: RUNNER,
            skin: SkinId(1),
        });
        app.update();

        let coordinator = app.world().resource::<SkinSelectionCoordinator>();
        assert_eq!(coordinator.current_selection(), SkinId::DEFAULT);
        assert!(!coordinator.is_unlocked(CLIMBER, SkinId(1)));
        assert!(!coordinator.is_unlocked(RUNNER, SkinId(1)));
        assert!(drain_applied(&mut app).is_empty());
        assert!(app.world().resource::<SkinNotice>().0.is_none());
    }

    #[test]
    fn test_signal_is_handled_before_new_selection() {
        let mut app = request_app();
        app.world_mut().write_message(SelectSkin {
            character: RUNNER,
            skin: SkinId(3),
        });
        app.update();
        assert!(drain_applied(&mut app).is_empty());

        // Space for the running presentation and Enter on the next skin together
        app.world_mut().write_message(SelectSkin {
            character: RUNNER,
            skin: SkinId(4),
        });
        app.world_mut().write_message(PresentationSignal);
        app.update();

        assert_eq!(
            drain_applied(&mut app),
            vec![SkinApplied {
                character: RUNNER,
                skin: SkinId(3)
            }]
        );
        let coordinator = app.world().resource::<SkinSelectionCoordinator>();
        assert!(coordinator.is_presentation_active());
        assert_eq!(coordinator.pending_swap(), Some(SwapToken::new(RUNNER, SkinId(4))));
        assert_eq!(coordinator.current_selection(), SkinId(4));
    }

    #[test]
    fn test_purchase_descriptions() {
        assert_eq!(
            describe_purchase(PurchaseOutcome::InsufficientFunds { cost: 300, coins: 20 }),
            "Needs 300 coins, you have 20"
        );
        assert_eq!(describe_purchase(PurchaseOutcome::AlreadyOwned), "Already owned");
    }

    #[test]
    fn test_skin_tints_differ() {
        assert_ne!(skin_tint(SkinId(3)), skin_tint(SkinId(5)));
        assert_eq!(skin_tint(SkinId::DEFAULT), Color::srgb(0.8, 0.8, 0.8));
    }
}
