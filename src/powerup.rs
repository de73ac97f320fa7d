use crate::config::{
    HOURGLASS_DURATION_MS, HOURGLASS_LEVEL_CHANCE, HOURGLASS_MIN_LEVEL,
    HOURGLASS_SPEED_MULTIPLIER, HOURGLASS_TICK_CHANCE, LIGHTNING_DURATION_MS,
    LIGHTNING_LEVEL_CHANCE, LIGHTNING_MIN_LEVEL, LIGHTNING_SPEED_MULTIPLIER,
    LIGHTNING_TICK_CHANCE, MUSHROOM_DURATION_MS, MUSHROOM_LEVEL_CHANCE, MUSHROOM_MIN_LEVEL,
    MUSHROOM_TICK_CHANCE, PELLET_POINTS, STAR_DURATION_MS, STAR_LEVEL_CHANCE, STAR_MIN_LEVEL,
    STAR_PELLET_POINTS, STAR_TICK_CHANCE,
};

/// The four timed effects a pickup can start.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PowerUpKind {
    /// Collision immunity; eating one always grows the snake.
    Mushroom,
    /// Shorter tick interval.
    LightningBolt,
    /// Longer tick interval.
    Hourglass,
    /// Double pellet reward.
    Star,
}

impl PowerUpKind {
    pub const ALL: [Self; 4] = [
        Self::Mushroom,
        Self::LightningBolt,
        Self::Hourglass,
        Self::Star,
    ];

    #[must_use]
    pub fn duration_ms(self) -> f64 {
        match self {
            Self::Mushroom => MUSHROOM_DURATION_MS,
            Self::LightningBolt => LIGHTNING_DURATION_MS,
            Self::Hourglass => HOURGLASS_DURATION_MS,
            Self::Star => STAR_DURATION_MS,
        }
    }

    /// Tick interval factor, for the kinds that change speed.
    #[must_use]
    pub fn speed_multiplier(self) -> Option<f64> {
        match self {
            Self::LightningBolt => Some(LIGHTNING_SPEED_MULTIPLIER),
            Self::Hourglass => Some(HOURGLASS_SPEED_MULTIPLIER),
            Self::Mushroom | Self::Star => None,
        }
    }

    #[must_use]
    pub fn affects_speed(self) -> bool {
        self.speed_multiplier().is_some()
    }

    /// Lowest level on which items of this kind appear.
    #[must_use]
    pub fn min_level(self) -> u32 {
        match self {
            Self::Mushroom => MUSHROOM_MIN_LEVEL,
            Self::LightningBolt => LIGHTNING_MIN_LEVEL,
            Self::Hourglass => HOURGLASS_MIN_LEVEL,
            Self::Star => STAR_MIN_LEVEL,
        }
    }

    /// Chance of items being placed when a level is generated.
    #[must_use]
    pub fn level_spawn_chance(self) -> f64 {
        match self {
            Self::Mushroom => MUSHROOM_LEVEL_CHANCE,
            Self::LightningBolt => LIGHTNING_LEVEL_CHANCE,
            Self::Hourglass => HOURGLASS_LEVEL_CHANCE,
            Self::Star => STAR_LEVEL_CHANCE,
        }
    }

    /// Chance of one more item appearing on a tick.
    #[must_use]
    pub fn tick_spawn_chance(self) -> f64 {
        match self {
            Self::Mushroom => MUSHROOM_TICK_CHANCE,
            Self::LightningBolt => LIGHTNING_TICK_CHANCE,
            Self::Hourglass => HOURGLASS_TICK_CHANCE,
            Self::Star => STAR_TICK_CHANCE,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Mushroom => "mushroom",
            Self::LightningBolt => "lightning",
            Self::Hourglass => "hourglass",
            Self::Star => "star",
        }
    }
}

/// Wall-clock countdown for one effect.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerUpTimer {
    pub active: bool,
    /// Milliseconds remaining.
    pub timer_ms: f64,
    /// Clock reading of the last countdown step.
    pub last_update_ms: f64,
}

impl PowerUpTimer {
    /// Starts, or restarts, the countdown at `duration_ms`.
    pub fn activate(&mut self, duration_ms: f64, now_ms: f64) {
        self.active = true;
        self.timer_ms = duration_ms;
        self.last_update_ms = now_ms;
    }

    /// Counts down by the time since the last step. Returns true on the step
    /// that expires the effect.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        if !self.active {
            return false;
        }

        let delta_ms = now_ms - self.last_update_ms;
        self.timer_ms -= delta_ms;
        self.last_update_ms = now_ms;

        if self.timer_ms <= 0.0 {
            self.active = false;
            self.timer_ms = 0.0;
            return true;
        }
        false
    }
}

/// The four effect timers of a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerUps {
    mushroom: PowerUpTimer,
    lightning: PowerUpTimer,
    hourglass: PowerUpTimer,
    star: PowerUpTimer,
}

impl PowerUps {
    #[must_use]
    pub fn timer(&self, kind: PowerUpKind) -> &PowerUpTimer {
        match kind {
            PowerUpKind::Mushroom => &self.mushroom,
            PowerUpKind::LightningBolt => &self.lightning,
            PowerUpKind::Hourglass => &self.hourglass,
            PowerUpKind::Star => &self.star,
        }
    }

    pub fn timer_mut(&mut self, kind: PowerUpKind) -> &mut PowerUpTimer {
        match kind {
            PowerUpKind::Mushroom => &mut self.mushroom,
            PowerUpKind::LightningBolt => &mut self.lightning,
            PowerUpKind::Hourglass => &mut self.hourglass,
            PowerUpKind::Star => &mut self.star,
        }
    }

    #[must_use]
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.timer(kind).active
    }

    /// Starts `kind` at its full duration. Picking up an active kind only
    /// restarts its timer.
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: f64) {
        log::debug!("{} active for {} ms", kind.label(), kind.duration_ms());
        self.timer_mut(kind).activate(kind.duration_ms(), now_ms);
    }

    /// Steps every active timer and returns the kinds that expired.
    pub fn advance(&mut self, now_ms: f64) -> Vec<PowerUpKind> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|kind| self.timer_mut(*kind).advance(now_ms))
            .inspect(|kind| log::debug!("{} expired", kind.label()))
            .collect()
    }

    /// Deactivates every effect.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Combined tick interval factor of the active speed effects.
    #[must_use]
    pub fn speed_multiplier(&self) -> f64 {
        PowerUpKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .filter_map(PowerUpKind::speed_multiplier)
            .product()
    }

    /// Score for one pellet under the current effects.
    #[must_use]
    pub fn pellet_points(&self) -> u32 {
        if self.star.active {
            STAR_PELLET_POINTS
        } else {
            PELLET_POINTS
        }
    }
}
