use rand::Rng;

use crate::settings::Simulation;

const ANALOG_MAX: f64 = 1024.0;

/// Random walk of the analog rain level. Dry plates read high, wet plates low.
pub struct Weather {
    level: f64,
    raining: bool,
    simulation: Simulation,
}

impl Weather {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            level: simulation.dry_level,
            raining: false,
            simulation,
        }
    }

    pub fn is_raining(&self) -> bool {
        self.raining
    }

    pub fn step<R: Rng>(&mut self, rng: &mut R) -> f64 {
        if rng.random_bool(self.simulation.shower_chance) {
            self.raining = !self.raining;
        }

        let target = if self.raining {
            self.simulation.wet_level
        } else {
            self.simulation.dry_level
        };

        // Plates soak and dry gradually, never jump straight to the target
        let noise = rng.random_range(-5.0..5.0);
        self.level = ((target - self.level) * 0.3 + self.level + noise).clamp(0.0, ANALOG_MAX);

        self.level.round()
    }
}
