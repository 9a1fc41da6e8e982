//! Sound cue seam
//!
//! The simulation never plays audio itself. It emits fire-and-forget cues
//! through [`AudioSink`]; the host drains them into whatever backend it has.

/// Sound cue identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player or drone fired a bullet
    Shoot,
    /// Enemy gunner fired a bullet
    EnemyShoot,
    /// Bullet struck an entity
    Hit,
    /// Shield absorbed a body collision
    ShieldHit,
    /// Entity destroyed
    Break,
    /// Power-up collected
    PowerUp,
    /// Player destroyed
    PlayerDeath,
}

impl SoundCue {
    /// Stable identifier handed to the audio backend
    pub fn id(&self) -> &'static str {
        match self {
            SoundCue::Shoot => "shoot",
            SoundCue::EnemyShoot => "enemy_shoot",
            SoundCue::Hit => "hit",
            SoundCue::ShieldHit => "shield_hit",
            SoundCue::Break => "break",
            SoundCue::PowerUp => "power_up",
            SoundCue::PlayerDeath => "player_death",
        }
    }
}

/// Fire-and-forget consumer of sound cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Sink that drops every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct Silence;

impl AudioSink for Silence {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Audio manager for the game
///
/// Applies volume/mute gating and queues cues for the host backend.
#[derive(Debug)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    queue: Vec<(SoundCue, f32)>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            queue: Vec::new(),
        }
    }

    /// Build a manager from runtime settings
    pub fn from_settings(settings: &crate::Settings) -> Self {
        let mut manager = Self::new();
        manager.set_master_volume(settings.master_volume);
        manager.set_sfx_volume(settings.sfx_volume);
        manager.set_muted(settings.muted);
        manager
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cues queued since the last drain, with their playback volume
    pub fn pending(&self) -> &[(SoundCue, f32)] {
        &self.queue
    }

    /// Hand queued cues to the backend
    pub fn drain(&mut self) -> std::vec::Drain<'_, (SoundCue, f32)> {
        self.queue.drain(..)
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.queue.push((cue, vol));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_manager_drops_cues() {
        let mut audio = AudioManager::new();
        audio.set_muted(true);
        audio.play(SoundCue::Break);
        assert!(audio.pending().is_empty());
    }

    #[test]
    fn test_volume_is_product_of_levels() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(0.5);
        audio.play(SoundCue::Hit);
        let drained: Vec<_> = audio.drain().collect();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].0, SoundCue::Hit);
        assert!((drained[0].1 - 0.25).abs() < 1e-6);
        assert!(audio.pending().is_empty());
    }

    #[test]
    fn test_cue_ids_are_distinct() {
        let cues = [
            SoundCue::Shoot,
            SoundCue::EnemyShoot,
            SoundCue::Hit,
            SoundCue::ShieldHit,
            SoundCue::Break,
            SoundCue::PowerUp,
            SoundCue::PlayerDeath,
        ];
        let ids: std::collections::HashSet<_> = cues.iter().map(SoundCue::id).collect();
        assert_eq!(ids.len(), cues.len());
    }
}
