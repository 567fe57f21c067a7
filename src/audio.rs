//! Audio: named sound effects, music tracks and the mixer
//!
//! The simulation only plays, stops and sets the volume of sound effects.
//! Music transitions belong to the screen controller. [`AudioManager`] is an
//! in-memory mixer that tracks what would be audible and logs every call;
//! a device backend can implement [`AudioSink`] on top of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sound {
    /// Player laser fired
    Laser,
    /// Energy ball hum, looped for the ball's lifetime
    EnergyBall,
}

impl Sound {
    /// File name (without extension) of the effect
    pub fn as_str(&self) -> &'static str {
        match self {
            Sound::Laser => "sfx_laser_1",
            Sound::EnergyBall => "sfx_energy_ball",
        }
    }

    /// Mixer channel the effect is bound to
    pub fn channel(&self) -> &'static str {
        match self {
            Sound::Laser => "laser",
            Sound::EnergyBall => "energy",
        }
    }
}

/// Music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    Opening,
    MainTheme,
    Win,
    GameOver,
}

impl Track {
    pub fn file_name(&self) -> &'static str {
        match self {
            Track::Opening => "ost_opening.mp3",
            Track::MainTheme => "ost_maintheme.mp3",
            Track::Win => "ost_win.mp3",
            Track::GameOver => "ost_gameover.wav",
        }
    }
}

/// Loop count meaning "repeat until stopped"
pub const LOOP_FOREVER: i32 = -1;

/// Everything the game asks of the audio device
pub trait AudioSink {
    /// Play an effect; `loops` extra repetitions, or [`LOOP_FOREVER`]
    fn play(&mut self, sound: Sound, loops: i32);
    fn stop(&mut self, sound: Sound);
    fn set_volume(&mut self, sound: Sound, volume: f32);

    /// Stop the current track and start another
    fn play_music(&mut self, track: Track, loops: i32, volume: f32);
    /// Silence every effect and the music, and mute
    fn stop_all(&mut self);
    /// Unmute and restart the current track
    fn resume(&mut self);

    fn is_muted(&self) -> bool;

    /// Mute toggle (the in-game `M` key)
    fn toggle_mute(&mut self) {
        if self.is_muted() {
            self.resume();
        } else {
            self.stop_all();
        }
    }
}

/// Music currently loaded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MusicState {
    pub track: Track,
    pub loops: i32,
    pub volume: f32,
    pub playing: bool,
}

/// In-memory mixer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    /// Per-effect volume (defaults to 1.0)
    volumes: BTreeMap<Sound, f32>,
    /// Effects currently sounding, with their loop count
    playing: BTreeMap<Sound, i32>,
    music: Option<MusicState>,
    /// Number of effects started since creation
    plays: u64,
    /// Number of stop requests since creation
    stops: u64,
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
            music_volume: 0.7,
            muted: false,
            volumes: BTreeMap::new(),
            playing: BTreeMap::new(),
            music: None,
            plays: 0,
            stops: 0,
        }
    }

    /// Mixer configured from the user's settings
    pub fn from_settings(settings: &crate::Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.muted = settings.start_muted;
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Volume an effect would be heard at
    pub fn effective_volume(&self, sound: Sound) -> f32 {
        if self.muted {
            return 0.0;
        }
        let own = self.volumes.get(&sound).copied().unwrap_or(1.0);
        self.master_volume * self.sfx_volume * own
    }

    /// Volume the current track would be heard at
    pub fn effective_music_volume(&self) -> f32 {
        match (&self.music, self.muted) {
            (Some(m), false) if m.playing => self.master_volume * self.music_volume * m.volume,
            _ => 0.0,
        }
    }

    pub fn is_playing(&self, sound: Sound) -> bool {
        self.playing.contains_key(&sound)
    }

    pub fn music(&self) -> Option<MusicState> {
        self.music
    }

    pub fn plays(&self) -> u64 {
        self.plays
    }

    pub fn stops(&self) -> u64 {
        self.stops
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, sound: Sound, loops: i32) {
        if self.muted {
            return;
        }
        log::debug!(
            "play {} on '{}' (loops {loops}, volume {:.2})",
            sound.as_str(),
            sound.channel(),
            self.effective_volume(sound)
        );
        self.plays += 1;
        // A one-shot effect finishes on its own; only loops stay registered
        if loops == LOOP_FOREVER {
            self.playing.insert(sound, loops);
        }
    }

    fn stop(&mut self, sound: Sound) {
        self.stops += 1;
        if self.playing.remove(&sound).is_some() {
            log::debug!("stop {}", sound.as_str());
        }
    }

    fn set_volume(&mut self, sound: Sound, volume: f32) {
        self.volumes.insert(sound, volume.clamp(0.0, 1.0));
    }

    fn play_music(&mut self, track: Track, loops: i32, volume: f32) {
        self.music = Some(MusicState {
            track,
            loops,
            volume: volume.clamp(0.0, 1.0),
            playing: !self.muted,
        });
        log::info!(
            "Music: {} (loops {loops}, volume {:.2})",
            track.file_name(),
            self.effective_music_volume()
        );
    }

    fn stop_all(&mut self) {
        self.muted = true;
        self.playing.clear();
        if let Some(music) = &mut self.music {
            music.playing = false;
        }
        log::debug!("Audio muted");
    }

    fn resume(&mut self) {
        self.muted = false;
        if let Some(music) = &mut self.music {
            music.playing = true;
        }
        log::debug!("Audio resumed");
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}
