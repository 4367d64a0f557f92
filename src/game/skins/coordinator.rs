//! Decides when a selected skin becomes visible and keeps the menu environment in
//! step with presentation playback.

use bevy::prelude::Resource;
use tracing::{debug, info, warn};

use super::{
    CharacterId, EnvironmentSwitch, PlaybackTick, PlayerProfile, PresentationPlayer, Region,
    SkinCatalog, SkinError, SkinId, SkinPersistence, SkinRecord, SwapToken, TimelineSpec,
};

/// Visual side of the skin flow. Calls are synchronous and may repeat.
pub trait SkinPresenter {
    fn apply_skin(&mut self, character: CharacterId, skin: SkinId);
    fn show_locked(&mut self, character: CharacterId, record: &SkinRecord);
    fn refresh(&mut self, character: CharacterId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinOutcome {
    Applied { character: CharacterId, skin: SkinId },
    Locked { character: CharacterId, skin: SkinId },
    Refresh { character: CharacterId },
}

/// Buffers presenter calls so they can be forwarded later, in order.
impl SkinPresenter for Vec<SkinOutcome> {
    fn apply_skin(&mut self, character: CharacterId, skin: SkinId) {
        self.push(SkinOutcome::Applied { character, skin });
    }

    fn show_locked(&mut self, character: CharacterId, record: &SkinRecord) {
        self.push(SkinOutcome::Locked {
            character,
            skin: record.id,
        });
    }

    fn refresh(&mut self, character: CharacterId) {
        self.push(SkinOutcome::Refresh { character });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Unlocked { remaining_coins: u32 },
    AlreadyOwned,
    InsufficientFunds { cost: u32, coins: u32 },
    LevelTooLow { required: u32, level: u32 },
}

#[derive(Resource)]
pub struct SkinSelectionCoordinator {
    store: Box<dyn SkinPersistence>,
    environment: Option<EnvironmentSwitch>,
    player: Option<PresentationPlayer>,
    displayed: CharacterId,
    showcase_index: u32,
    player_missing_reported: bool,
    environment_missing_reported: bool,
}

impl SkinSelectionCoordinator {
    /// Coordinator without environment or presentation wiring. Every skin applies
    /// immediately until those are attached.
    pub fn new(store: Box<dyn SkinPersistence>, displayed: CharacterId) -> Self {
        Self {
            store,
            environment: None,
            player: None,
            displayed,
            showcase_index: 0,
            player_missing_reported: false,
            environment_missing_reported: false,
        }
    }

    pub fn with_environment(mut self, environment: EnvironmentSwitch) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_presentation_player(mut self, player: PresentationPlayer) -> Self {
        self.player = Some(player);
        self
    }

    /// Showcase region entered when a presentation starts
    pub fn with_showcase_index(mut self, index: u32) -> Self {
        self.showcase_index = index;
        self
    }

    pub fn environment(&self) -> Option<&EnvironmentSwitch> {
        self.environment.as_ref()
    }

    pub fn environment_mut(&mut self) -> Option<&mut EnvironmentSwitch> {
        self.environment.as_mut()
    }

    /// Selects `record` for the displayed character.
    ///
    /// Presentation skins swap when the timeline signals; others swap now. The
    /// selection is saved before returning either way.
    pub fn select_skin(&mut self, record: &SkinRecord, presenter: &mut impl SkinPresenter) {
        let character = self.displayed;
        if !self.resolve_unlock(character, record) {
            info!(%character, skin = %record.id, "Selected skin is locked");
            presenter.show_locked(character, record);
            return;
        }

        let deferred = match &record.presentation {
            Some(timeline) if self.player.is_some() && self.environment.is_some() => {
                self.start_presentation(SwapToken::new(character, record.id), timeline.clone());
                true
            }
            Some(_) => {
                self.report_missing_wiring();
                false
            }
            None => false,
        };
        if !deferred {
            self.cancel_presentation();
            presenter.apply_skin(character, record.id);
        }

        self.store.set_selected(character, record.id);
        self.persist();
    }

    /// Cancels any presentation and returns the environment to the main region.
    pub fn exit_skin_selection(&mut self) {
        self.cancel_presentation();
        debug!("Left skin selection");
    }

    pub fn unlock_skin(
        &mut self,
        catalog: &SkinCatalog,
        character: CharacterId,
        skin: SkinId,
        presenter: &mut impl SkinPresenter,
    ) -> Result<(), SkinError> {
        catalog.get_skin(character, skin)?;
        self.store.set_unlocked(character, skin);
        self.persist();
        info!(%character, %skin, "Skin unlocked");
        if character == self.displayed {
            presenter.refresh(character);
        }
        Ok(())
    }

    /// Spends coins to unlock `skin`, subject to its level requirement.
    pub fn purchase_skin(
        &mut self,
        catalog: &SkinCatalog,
        character: CharacterId,
        skin: SkinId,
        presenter: &mut impl SkinPresenter,
    ) -> Result<PurchaseOutcome, SkinError> {
        let record = catalog.get_skin(character, skin)?;
        if record.unlocked_by_default || self.store.is_unlocked(character, skin) {
            return Ok(PurchaseOutcome::AlreadyOwned);
        }
        let profile = self.store.profile();
        if profile.level < record.unlock_level {
            return Ok(PurchaseOutcome::LevelTooLow {
                required: record.unlock_level,
                level: profile.level,
            });
        }
        let Some(remaining_coins) = profile.coins.checked_sub(record.unlock_cost) else {
            return Ok(PurchaseOutcome::InsufficientFunds {
                cost: record.unlock_cost,
                coins: profile.coins,
            });
        };
        self.store.set_profile(PlayerProfile {
            coins: remaining_coins,
            ..profile
        });
        self.unlock_skin(catalog, character, skin, presenter)?;
        Ok(PurchaseOutcome::Unlocked { remaining_coins })
    }

    /// Puts `character` on the pedestal wearing its saved skin.
    pub fn display_character(
        &mut self,
        catalog: &SkinCatalog,
        character: CharacterId,
        presenter: &mut impl SkinPresenter,
    ) -> Result<(), SkinError> {
        catalog.character(character)?;
        self.cancel_presentation();
        self.displayed = character;

        let mut selected = self.store.selected(character);
        if let Err(error) = catalog.get_skin(character, selected) {
            warn!("Saved selection no longer exists, using default: {error}");
            selected = SkinId::DEFAULT;
        }
        presenter.apply_skin(character, selected);
        presenter.refresh(character);
        Ok(())
    }

    /// Signal hook for authored presentation content.
    pub fn on_presentation_signal(&mut self, presenter: &mut impl SkinPresenter) {
        let token = self.player.as_mut().and_then(PresentationPlayer::on_signal);
        match token {
            Some(token) => apply_swap(token, presenter),
            None => debug!("Presentation signal with no pending swap ignored"),
        }
    }

    /// Steps the running presentation by one frame.
    pub fn advance(&mut self, delta_secs: f32, presenter: &mut impl SkinPresenter) -> PlaybackTick {
        let Some(player) = self.player.as_mut() else {
            return PlaybackTick::default();
        };
        let tick = player.advance(delta_secs, self.environment.as_mut());
        if let Some(token) = tick.signal {
            apply_swap(token, presenter);
        }
        tick
    }

    pub fn current_selection(&self) -> SkinId {
        self.store.selected(self.displayed)
    }

    pub fn is_presentation_active(&self) -> bool {
        self.player.as_ref().is_some_and(PresentationPlayer::is_playing)
    }

    pub fn pending_swap(&self) -> Option<SwapToken> {
        self.player.as_ref().and_then(PresentationPlayer::pending_swap)
    }

    pub fn displayed_character(&self) -> CharacterId {
        self.displayed
    }

    pub fn active_region(&self) -> Option<Region> {
        self.environment
            .as_ref()
            .and_then(EnvironmentSwitch::active_region)
    }

    pub fn is_unlocked(&self, character: CharacterId, skin: SkinId) -> bool {
        self.store.is_unlocked(character, skin)
    }

    pub fn profile(&self) -> PlayerProfile {
        self.store.profile()
    }

    fn resolve_unlock(&mut self, character: CharacterId, record: &SkinRecord) -> bool {
        if self.store.is_unlocked(character, record.id) {
            return true;
        }
        if !record.unlocked_by_default {
            return false;
        }
        info!(%character, skin = %record.id, "Unlocking skin that ships unlocked");
        self.store.set_unlocked(character, record.id);
        self.persist();
        true
    }

    fn start_presentation(&mut self, token: SwapToken, timeline: TimelineSpec) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        // Latest selection wins: drop the previous playback and its swap first
        player.stop(self.environment.as_mut());
        if let Some(environment) = self.environment.as_mut() {
            environment.show_showcase(self.showcase_index);
            if !environment.in_showcase() {
                debug!("No showcase region, presenting over the main region");
            }
        }
        player.play(timeline, token, self.environment.as_mut());
    }

    fn cancel_presentation(&mut self) {
        match self.player.as_mut() {
            Some(player) => player.stop(self.environment.as_mut()),
            None => {
                if let Some(environment) = self.environment.as_mut() {
                    environment.show_main();
                }
            }
        }
    }

    fn persist(&mut self) {
        if let Err(error) = self.store.save() {
            warn!("Failed to save skin progress: {error}");
        }
    }

    /// Logs each missing collaborator once per coordinator.
    fn report_missing_wiring(&mut self) {
        if self.player.is_none() && !self.player_missing_reported {
            warn!("No presentation player, applying skins immediately");
            self.player_missing_reported = true;
        }
        if self.environment.is_none() && !self.environment_missing_reported {
            warn!("No environment switch, applying skins immediately");
            self.environment_missing_reported = true;
        }
    }
}

fn apply_swap(token: SwapToken, presenter: &mut impl SkinPresenter) {
    debug!(character = %token.character(), skin = %token.skin(), "Presentation swap");
    presenter.apply_skin(token.character(), token.skin());
}
