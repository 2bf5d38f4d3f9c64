use bevy_ecs::prelude::*;

/// Global resource tracking in-game time, measured in hours since midnight of day 0.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct GameClock {
    pub time: f32,
    /// Scaled duration of the last tick.
    pub delta_time: f32,
    pub multiplier: f32,
    enabled: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(9.0, 1.0)
    }
}

impl GameClock {
    pub fn new(start_time: f32, multiplier: f32) -> Self {
        let mut clock = Self {
            time: 0.0,
            delta_time: 0.0,
            multiplier: 1.0,
            enabled: false,
        };
        clock.enable(start_time, multiplier);
        clock
    }

    /// Reset to `start_time` and resume advancing.
    pub fn enable(&mut self, start_time: f32, multiplier: f32) {
        self.time = start_time;
        self.multiplier = multiplier;
        self.delta_time = 0.0;
        self.enabled = true;
    }

    /// Halt the clock. Downstream consumers see a zero delta from here on.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.delta_time = 0.0;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn tick(&mut self, real_delta: f32) {
        if !self.enabled {
            return;
        }
        self.delta_time = real_delta * self.multiplier;
        self.time += self.delta_time;
    }
}

/// Real (unscaled) duration of the frame being simulated. Written by the host before each run.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FrameDelta(pub f32);

/// System: Advances the clock by the current frame delta.
pub fn advance_clock_system(mut clock: ResMut<GameClock>, frame: Res<FrameDelta>) {
    clock.tick(frame.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_scales_real_delta() {
        let mut clock = GameClock::new(9.0, 2.0);
        clock.tick(0.25);
        assert_eq!(clock.delta_time, 0.5);
        assert_eq!(clock.time, 9.5);
        clock.tick(1.0);
        assert_eq!(clock.delta_time, 2.0);
        assert_eq!(clock.time, 11.5);
    }

    #[test]
    fn disabled_clock_is_frozen() {
        let mut clock = GameClock::new(58.0, 1.0);
        clock.tick(2.0);
        clock.disable();
        let frozen = clock;
        clock.tick(5.0);
        clock.tick(3.0);
        assert_eq!(clock.time, 60.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock, frozen);
    }

    #[test]
    fn enable_resets_time() {
        let mut clock = GameClock::new(9.0, 1.0);
        clock.tick(4.0);
        clock.disable();
        clock.enable(20.0, 3.0);
        assert!(clock.is_enabled());
        assert_eq!(clock.time, 20.0);
        clock.tick(1.0);
        assert_eq!(clock.time, 23.0);
    }

    #[test]
    fn out_of_range_values_are_accepted() {
        let mut clock = GameClock::new(-4.0, -1.0);
        clock.tick(1.0);
        assert_eq!(clock.time, -5.0);
    }
}
