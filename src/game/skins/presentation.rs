//! Playback of the presentation timeline that precedes a skin swap.

use tracing::{debug, info};

use super::{CharacterId, EnvironmentSwitch, SkinId, TimelineSpec};

/// Correlates a `play` call with the signal that should consume it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapToken {
    character: CharacterId,
    skin: SkinId,
}

impl SwapToken {
    pub fn new(character: CharacterId, skin: SkinId) -> Self {
        Self { character, skin }
    }

    pub fn character(&self) -> CharacterId {
        self.character
    }

    pub fn skin(&self) -> SkinId {
        self.skin
    }
}

#[derive(Debug, Clone)]
struct ActivePlayback {
    timeline: TimelineSpec,
    elapsed: f32,
    /// Taken by the signal; `None` afterwards means the swap already happened
    pending: Option<SwapToken>,
}

#[derive(Debug, Clone, Default)]
enum PlaybackState {
    #[default]
    Idle,
    Playing(ActivePlayback),
}

/// What happened during one [`PresentationPlayer::advance`] step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackTick {
    pub signal: Option<SwapToken>,
    pub finished: bool,
}

#[derive(Debug, Default)]
pub struct PresentationPlayer {
    state: PlaybackState,
}

impl PresentationPlayer {
    /// Starts `timeline` bound to `token`. A running playback is stopped first.
    pub fn play(
        &mut self,
        timeline: TimelineSpec,
        token: SwapToken,
        environment: Option<&mut EnvironmentSwitch>,
    ) {
        if self.is_playing() {
            self.stop(environment);
        }
        info!(
            timeline = %timeline.name,
            character = %token.character,
            skin = %token.skin,
            "Presentation started"
        );
        self.state = PlaybackState::Playing(ActivePlayback {
            timeline,
            elapsed: 0.0,
            pending: Some(token),
        });
    }

    /// Halts playback and returns the environment to main, playing or not.
    pub fn stop(&mut self, environment: Option<&mut EnvironmentSwitch>) {
        if let PlaybackState::Playing(active) = std::mem::take(&mut self.state) {
            debug!(
                timeline = %active.timeline.name,
                cancelled_swap = active.pending.is_some(),
                "Presentation stopped"
            );
        }
        if let Some(environment) = environment {
            environment.show_main();
        }
    }

    /// Hands out the pending swap token once per `play`. Later calls return `None`.
    pub fn on_signal(&mut self) -> Option<SwapToken> {
        match &mut self.state {
            PlaybackState::Playing(active) => active.pending.take(),
            PlaybackState::Idle => None,
        }
    }

    /// Steps playback by `delta_secs`, firing the signal and completion as they are
    /// reached.
    pub fn advance(
        &mut self,
        delta_secs: f32,
        environment: Option<&mut EnvironmentSwitch>,
    ) -> PlaybackTick {
        let PlaybackState::Playing(active) = &mut self.state else {
            return PlaybackTick::default();
        };
        active.elapsed += delta_secs.max(0.0);
        let reached_signal = active.elapsed >= active.timeline.signal_at_secs;
        let finished = active.elapsed >= active.timeline.duration_secs;

        // A signal placed past the end still fires before completion
        let signal = if reached_signal || finished {
            self.on_signal()
        } else {
            None
        };
        if finished {
            info!("Presentation finished");
            self.stop(environment);
        }
        PlaybackTick { signal, finished }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing(_))
    }

    pub fn pending_swap(&self) -> Option<SwapToken> {
        match &self.state {
            PlaybackState::Playing(active) => active.pending,
            PlaybackState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::skins::Region;

    fn timeline(duration_secs: f32, signal_at_secs: f32) -> TimelineSpec {
        TimelineSpec {
            name: "reveal".to_string(),
            duration_secs,
            signal_at_secs,
        }
    }

    fn token(skin: i32) -> SwapToken {
        SwapToken::new(CharacterId(1), SkinId(skin))
    }

    #[test]
    fn test_signal_fires_once_per_play() {
        let mut player = PresentationPlayer::default();
        player.play(timeline(2.0, 1.0), token(5), None);
        assert_eq!(player.on_signal(), Some(token(5)));
        assert_eq!(player.on_signal(), None);
        assert!(player.is_playing());
    }

    #[test]
    fn test_signal_while_idle_is_ignored() {
        let mut player = PresentationPlayer::default();
        assert_eq!(player.on_signal(), None);
        player.play(timeline(2.0, 1.0), token(5), None);
        player.stop(None);
        assert_eq!(player.on_signal(), None);
    }

    #[test]
    fn test_advance_fires_signal_on_crossing() {
        let mut player = PresentationPlayer::default();
        player.play(timeline(2.0, 1.0), token(5), None);

        assert_eq!(player.advance(0.5, None), PlaybackTick::default());
        let tick = player.advance(0.6, None);
        assert_eq!(tick.signal, Some(token(5)));
        assert!(!tick.finished);
        assert_eq!(player.pending_swap(), None);

        assert_eq!(player.advance(0.5, None).signal, None);
    }

    #[test]
    fn test_natural_completion_returns_to_main() {
        let mut environment = EnvironmentSwitch::with_showcases(1);
        environment.show_showcase(0);
        let mut player = PresentationPlayer::default();
        player.play(timeline(1.0, 0.5), token(5), Some(&mut environment));
        assert!(environment.in_showcase());

        player.advance(0.6, Some(&mut environment));
        assert!(environment.in_showcase());
        let tick = player.advance(0.6, Some(&mut environment));
        assert!(tick.finished);
        assert!(!player.is_playing());
        assert_eq!(environment.active_region(), Some(Region::Main));
    }

    #[test]
    fn test_signal_past_end_fires_at_completion() {
        let mut player = PresentationPlayer::default();
        player.play(timeline(1.0, 3.0), token(7), None);
        let tick = player.advance(1.5, None);
        assert_eq!(tick.signal, Some(token(7)));
        assert!(tick.finished);
    }

    #[test]
    fn test_play_while_playing_replaces_token() {
        let mut player = PresentationPlayer::default();
        player.play(timeline(2.0, 1.0), token(5), None);
        player.play(timeline(2.0, 1.0), token(6), None);
        assert_eq!(player.pending_swap(), Some(token(6)));
        assert_eq!(player.on_signal(), Some(token(6)));
        assert_eq!(player.on_signal(), None);
    }

    #[test]
    fn test_stop_when_idle_still_restores_main() {
        let mut environment = EnvironmentSwitch::with_showcases(2);
        environment.show_showcase(1);
        let mut player = PresentationPlayer::default();
        player.stop(Some(&mut environment));
        assert_eq!(environment.active_region(), Some(Region::Main));
        assert!(!player.is_playing());
    }
}
