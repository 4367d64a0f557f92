//! Skin selection: unlock checks, presentation playback and the showcase
//! environment, coordinated by [`SkinSelectionCoordinator`].

mod catalog;
mod controls;
mod coordinator;
mod environment;
mod error;
mod presentation;
mod systems;
mod unlock_store;

use std::path::PathBuf;

use bevy::prelude::*;

use crate::{AppSystems, screens::Screen};

pub use catalog::{CharacterId, CharacterRecord, SkinCatalog, SkinId, SkinRecord, TimelineSpec};
pub use controls::{SkinCursor, skin_options};
pub use coordinator::{PurchaseOutcome, SkinOutcome, SkinPresenter, SkinSelectionCoordinator};
pub use environment::{EnvironmentSwitch, Region};
pub use error::{PersistenceError, SkinError};
pub use presentation::{PlaybackTick, PresentationPlayer, SwapToken};
pub use systems::{AppliedSkin, PreviewCharacter, SkinNotice};
pub use unlock_store::{InMemoryStore, PlayerProfile, SkinPersistence, UnlockState, open_store};

/// Select a skin of the displayed character. Ignored if `character` is no longer
/// the one displayed.
#[derive(Message, Debug, Clone, Copy)]
pub struct SelectSkin {
    pub character: CharacterId,
    pub skin: SkinId,
}

/// Buy a skin of the displayed character with coins. Ignored if `character` is no
/// longer the one displayed.
#[derive(Message, Debug, Clone, Copy)]
pub struct PurchaseSkin {
    pub character: CharacterId,
    pub skin: SkinId,
}

/// Grant a skin without charging for it (rewards, unlock codes)
#[derive(Message, Debug, Clone, Copy)]
pub struct UnlockSkin {
    pub character: CharacterId,
    pub skin: SkinId,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct DisplayCharacter {
    pub character: CharacterId,
}

/// Fired by authored presentation content at its swap point.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct PresentationSignal;

/// A skin should now be visible on a character
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinApplied {
    pub character: CharacterId,
    pub skin: SkinId,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinLocked {
    pub character: CharacterId,
    pub skin: SkinId,
}

/// Unlock or selection data changed for a character
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSkinUi {
    pub character: CharacterId,
}

/// Runtime settings for the skin flow
#[derive(Resource, Debug, Clone)]
pub struct SkinSettings {
    /// Save file, relative to the working directory
    pub save_path: PathBuf,
    /// Profile given to a brand new save
    pub starting_profile: PlayerProfile,
}

impl Default for SkinSettings {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("saves/skins.ron"),
            starting_profile: PlayerProfile {
                coins: 500,
                level: 1,
            },
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<SkinSettings>();
    app.init_resource::<SkinCursor>();
    app.init_resource::<SkinNotice>();
    app.register_type::<Region>();

    app.add_message::<SelectSkin>()
        .add_message::<PurchaseSkin>()
        .add_message::<UnlockSkin>()
        .add_message::<DisplayCharacter>()
        .add_message::<PresentationSignal>()
        .add_message::<SkinApplied>()
        .add_message::<SkinLocked>()
        .add_message::<RefreshSkinUi>();

    app.add_systems(OnExit(Screen::Loading), systems::init_coordinator);
    app.add_systems(OnEnter(Screen::SkinSelection), systems::show_displayed_character);
    app.add_systems(OnExit(Screen::SkinSelection), systems::exit_skin_selection);

    app.add_systems(
        Update,
        controls::skin_selection_controls
            .in_set(AppSystems::RecordInput)
            .run_if(in_state(Screen::SkinSelection)),
    );
    app.add_systems(
        Update,
        (
            systems::register_regions,
            (systems::handle_skin_requests, systems::advance_presentation)
                .chain()
                .run_if(in_state(Screen::SkinSelection)),
            systems::apply_skin_visuals,
            systems::record_locked_skins,
            systems::sync_region_visibility,
        )
            .chain()
            .in_set(AppSystems::Update)
            .run_if(resource_exists::<SkinSelectionCoordinator>),
    );
}
