const VOLUME_STEP: f64 = 0.1;
const UNMUTED_VOLUME: f64 = 0.75;

/// Fire-and-forget audio triggers. Implementations own the actual playback.
pub trait AudioSink {
    fn start_background(&mut self);
    fn pause_background(&mut self);
    fn resume_background(&mut self);
    fn stop_background(&mut self);
    fn play_collision(&mut self, volume: f64);
}

/// Mute toggle and master volume shared by background and effects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioSettings {
    muted: bool,
    volume: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            muted: false,
            volume: 1.0,
        }
    }
}

impl AudioSettings {
    pub fn muted(&self) -> bool {
        self.muted
    }

    /// Effective background volume (0 while muted).
    pub fn volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn collision_volume(&self) -> f64 {
        self.volume()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if !muted {
            self.volume = UNMUTED_VOLUME;
        }
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.muted);
    }

    /// Adjusting volume while muted unmutes first.
    pub fn volume_up(&mut self) {
        self.muted = false;
        self.volume = round_step(self.volume + VOLUME_STEP).min(1.0);
    }

    pub fn volume_down(&mut self) {
        self.muted = false;
        self.volume = round_step(self.volume - VOLUME_STEP).max(0.0);
    }
}

// Keeps repeated 0.1 steps from drifting (0.7 + 0.1 + 0.1 ...).
#[inline]
fn round_step(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Discards every trigger; used for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn start_background(&mut self) {}
    fn pause_background(&mut self) {}
    fn resume_background(&mut self) {}
    fn stop_background(&mut self) {}
    fn play_collision(&mut self, _volume: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mute_zeroes_collision_volume() {
        let mut settings = AudioSettings::default();
        assert_eq!(settings.collision_volume(), 1.0);
        settings.toggle_mute();
        assert!(settings.muted());
        assert_eq!(settings.collision_volume(), 0.0);
    }

    #[test]
    fn unmute_restores_fixed_level() {
        let mut settings = AudioSettings::default();
        settings.set_muted(true);
        settings.set_muted(false);
        assert_eq!(settings.volume(), 0.75);
    }

    #[test]
    fn volume_steps_clamp_and_unmute() {
        let mut settings = AudioSettings::default();
        settings.volume_up();
        assert_eq!(settings.volume(), 1.0);

        settings.set_muted(true);
        settings.volume_down();
        assert!(!settings.muted());
        assert_eq!(settings.volume(), 0.9);

        for _ in 0..20 {
            settings.volume_down();
        }
        assert_eq!(settings.volume(), 0.0);
    }
}
