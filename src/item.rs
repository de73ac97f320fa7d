use crate::grid::Position;
use crate::powerup::PowerUpKind;

/// Pickup kinds, in the order they are resolved on a tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ItemKind {
    Pellet,
    Mushroom,
    LightningBolt,
    Hourglass,
    Star,
}

impl ItemKind {
    pub const ALL: [Self; 5] = [
        Self::Pellet,
        Self::Mushroom,
        Self::LightningBolt,
        Self::Hourglass,
        Self::Star,
    ];

    /// Returns the effect started by eating this item, if any.
    #[must_use]
    pub fn power_up(self) -> Option<PowerUpKind> {
        match self {
            Self::Pellet => None,
            Self::Mushroom => Some(PowerUpKind::Mushroom),
            Self::LightningBolt => Some(PowerUpKind::LightningBolt),
            Self::Hourglass => Some(PowerUpKind::Hourglass),
            Self::Star => Some(PowerUpKind::Star),
        }
    }

    #[must_use]
    pub fn from_power_up(kind: PowerUpKind) -> Self {
        match kind {
            PowerUpKind::Mushroom => Self::Mushroom,
            PowerUpKind::LightningBolt => Self::LightningBolt,
            PowerUpKind::Hourglass => Self::Hourglass,
            PowerUpKind::Star => Self::Star,
        }
    }

    /// Returns true when eating this item leaves the tail in place.
    #[must_use]
    pub fn grows_snake(self) -> bool {
        matches!(self, Self::Pellet | Self::Mushroom)
    }
}

/// Item positions on the board, one list per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Items {
    pub pellets: Vec<Position>,
    pub mushrooms: Vec<Position>,
    pub lightning_bolts: Vec<Position>,
    pub hourglasses: Vec<Position>,
    pub stars: Vec<Position>,
}

impl Items {
    #[must_use]
    pub fn of(&self, kind: ItemKind) -> &[Position] {
        match kind {
            ItemKind::Pellet => &self.pellets,
            ItemKind::Mushroom => &self.mushrooms,
            ItemKind::LightningBolt => &self.lightning_bolts,
            ItemKind::Hourglass => &self.hourglasses,
            ItemKind::Star => &self.stars,
        }
    }

    pub fn of_mut(&mut self, kind: ItemKind) -> &mut Vec<Position> {
        match kind {
            ItemKind::Pellet => &mut self.pellets,
            ItemKind::Mushroom => &mut self.mushrooms,
            ItemKind::LightningBolt => &mut self.lightning_bolts,
            ItemKind::Hourglass => &mut self.hourglasses,
            ItemKind::Star => &mut self.stars,
        }
    }

    /// Removes the first `kind` item at `position`. Returns whether one was
    /// there.
    pub fn take(&mut self, kind: ItemKind, position: Position) -> bool {
        let list = self.of_mut(kind);
        match list.iter().position(|item| *item == position) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns the kind of the first item found at `position`.
    #[must_use]
    pub fn kind_at(&self, position: Position) -> Option<ItemKind> {
        ItemKind::ALL
            .into_iter()
            .find(|kind| self.of(*kind).contains(&position))
    }

    #[must_use]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.kind_at(position).is_some()
    }

    /// Removes every power-up item, leaving pellets.
    pub fn clear_power_ups(&mut self) {
        self.mushrooms.clear();
        self.lightning_bolts.clear();
        self.hourglasses.clear();
        self.stars.clear();
    }
}
