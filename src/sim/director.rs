//! Wave and spawn cadence
//!
//! Three counters drive enemy arrivals:
//! - the wave counter opens a wave every few seconds
//! - during a wave, one ship arrives every few ticks until the wave is full
//! - independently, an energy ball arrives on its own longer cadence

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::counter::Counter;
use crate::consts::*;

/// Ship classes a wave draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipClass {
    Level1,
    Level2,
    Level3,
}

/// Something the director wants spawned this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spawn {
    /// A wave just opened
    WaveStarted,
    Ship(ShipClass),
    EnergyBall,
}

/// Director timing, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectorTiming {
    pub wave_period: f32,
    pub new_ship_period: f32,
    pub energy_period: f32,
    pub ships_per_wave: u32,
}

impl Default for DirectorTiming {
    fn default() -> Self {
        Self {
            wave_period: WAVE_PERIOD,
            new_ship_period: NEW_SHIP_PERIOD_TICKS * SIM_DT,
            energy_period: ENERGY_BALL_PERIOD,
            ships_per_wave: SHIPS_PER_WAVE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnDirector {
    timing: DirectorTiming,
    wave_counter: Counter,
    new_ship_counter: Counter,
    energy_counter: Counter,
    should_add: bool,
    ships_added: u32,
}

impl Default for SpawnDirector {
    fn default() -> Self {
        Self::new(DirectorTiming::default())
    }
}

impl SpawnDirector {
    pub fn new(timing: DirectorTiming) -> Self {
        Self {
            timing,
            wave_counter: Counter::new(timing.wave_period),
            new_ship_counter: Counter::new(timing.new_ship_period),
            energy_counter: Counter::new(timing.energy_period),
            should_add: false,
            ships_added: 0,
        }
    }

    /// Advance all counters; returns the spawns due this frame
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) -> Vec<Spawn> {
        let mut spawns = Vec::new();

        if !self.should_add {
            if self.wave_counter.update(dt) {
                self.should_add = true;
                spawns.push(Spawn::WaveStarted);
            }
        } else if self.new_ship_counter.update(dt) {
            self.ships_added += 1;
            let class = match rng.random_range(0..3) {
                0 => ShipClass::Level1,
                1 => ShipClass::Level2,
                _ => ShipClass::Level3,
            };
            spawns.push(Spawn::Ship(class));
            if self.ships_added >= self.timing.ships_per_wave {
                self.should_add = false;
                self.ships_added = 0;
            }
        }

        if self.energy_counter.update(dt) {
            spawns.push(Spawn::EnergyBall);
        }

        spawns
    }

    /// Fresh cycle on every counter, no wave in progress
    pub fn restart(&mut self) {
        self.wave_counter.restart();
        self.new_ship_counter.restart();
        self.energy_counter.restart();
        self.should_add = false;
        self.ships_added = 0;
    }

    /// A wave is currently spawning ships
    pub fn is_adding(&self) -> bool {
        self.should_add
    }

    pub fn ships_added(&self) -> u32 {
        self.ships_added
    }

    pub fn timing(&self) -> DirectorTiming {
        self.timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn quick() -> DirectorTiming {
        DirectorTiming {
            wave_period: 0.5,
            new_ship_period: 0.5,
            energy_period: 1000.0,
            ships_per_wave: 5,
        }
    }

    fn ships(spawns: &[Spawn]) -> usize {
        spawns
            .iter()
            .filter(|s| matches!(s, Spawn::Ship(_)))
            .count()
    }

    #[test]
    fn one_wave_is_five_ships() {
        let mut d = SpawnDirector::new(quick());
        let mut rng = Pcg32::seed_from_u64(11);

        // dt 1.0 trips whichever counter is active every frame
        let first = d.update(1.0, &mut rng);
        assert_eq!(first, vec![Spawn::WaveStarted]);
        assert!(d.is_adding());

        let mut total = 0;
        for i in 1..=5 {
            total += ships(&d.update(1.0, &mut rng));
            if i < 5 {
                assert_eq!(d.ships_added(), i);
                assert!(d.is_adding());
            }
        }
        assert_eq!(total, 5);
        assert!(!d.is_adding());
        assert_eq!(d.ships_added(), 0);

        // Next frame opens a new wave rather than adding a sixth ship
        assert_eq!(d.update(1.0, &mut rng), vec![Spawn::WaveStarted]);
    }

    #[test]
    fn default_cadence_at_30_fps() {
        let mut d = SpawnDirector::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut frames_to_wave = 0;
        loop {
            frames_to_wave += 1;
            if d.update(SIM_DT, &mut rng).contains(&Spawn::WaveStarted) {
                break;
            }
            assert!(frames_to_wave < 1000);
        }
        // 5 s strictly exceeded
        assert!((150..=152).contains(&frames_to_wave), "{frames_to_wave}");
    }

    #[test]
    fn energy_ball_is_independent_of_waves() {
        let timing = DirectorTiming {
            wave_period: 1000.0,
            new_ship_period: 1000.0,
            energy_period: 0.5,
            ships_per_wave: 5,
        };
        let mut d = SpawnDirector::new(timing);
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(d.update(1.0, &mut rng), vec![Spawn::EnergyBall]);
        assert!(!d.is_adding());
    }

    #[test]
    fn energy_ball_spawns_during_a_wave() {
        let timing = DirectorTiming {
            wave_period: 0.5,
            new_ship_period: 0.5,
            energy_period: 1.5,
            ships_per_wave: 5,
        };
        let mut d = SpawnDirector::new(timing);
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(d.update(1.0, &mut rng), vec![Spawn::WaveStarted]);
        assert!(d.is_adding());

        // Ship counter and energy counter both trip on this frame
        let spawns = d.update(1.0, &mut rng);
        assert_eq!(spawns.len(), 2);
        assert_eq!(ships(&spawns), 1);
        assert!(spawns.contains(&Spawn::EnergyBall));
        assert!(d.is_adding());
        assert_eq!(d.ships_added(), 1);
    }

    #[test]
    fn restart_clears_wave_in_progress() {
        let mut d = SpawnDirector::new(quick());
        let mut rng = Pcg32::seed_from_u64(9);
        d.update(1.0, &mut rng);
        d.update(1.0, &mut rng);
        assert!(d.is_adding());
        assert_eq!(d.ships_added(), 1);

        d.restart();
        assert!(!d.is_adding());
        assert_eq!(d.ships_added(), 0);
        assert!(d.update(0.1, &mut rng).is_empty());
    }

    #[test]
    fn same_seed_same_ships() {
        let run = |seed| {
            let mut d = SpawnDirector::new(quick());
            let mut rng = Pcg32::seed_from_u64(seed);
            (0..30).flat_map(|_| d.update(1.0, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
