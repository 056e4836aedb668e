//! What a cell turns out to be, and how that's decided.
//!
//! Cells have no content until revealed. At reveal time the content is
//! drawn from the game's progress so far:
//!
//! 1. The last unrevealed cell is always a bomb.
//! 2. Otherwise a bomb is drawn with probability
//!    `min(bombs_left / remaining × (1 + 0.15 × turns_without_bomb), 0.7)`,
//!    but only while more than one bomb is left. The final bomb is held
//!    back for rule 1.
//! 3. Otherwise the cell is a modifier, a safe "action", or a special,
//!    weighted by how high the drink counter has climbed.

use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};

/// Upper bound on the per-cell bomb chance.
const MAX_BOMB_PROBABILITY: f64 = 0.7;

/// Bomb chance boost per non-bomb reveal so far.
const STREAK_BOOST: f64 = 0.15;

/// Counters at or below this are "low": big boosts, no dividers.
const LOW_COUNTER: u64 = 3;

/// Counters above this are "high": push towards resolution.
const HIGH_COUNTER: u64 = 10;

/// A revealed cell's content.
///
/// Serialized with its display text, e.g.
/// `{"category": "BOMB", "type": "BOMB_SNIPER", "name": "El Francotirador",
/// "description": "MANDAS beber"}`. Modifiers carry their `value`.
/// Deserialization only needs `category` and `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellContent {
    Bomb {
        #[serde(rename = "type")]
        kind: BombKind,
    },
    Modifier {
        #[serde(rename = "type")]
        kind: Modifier,
    },
    Special {
        #[serde(rename = "type")]
        kind: SpecialKind,
    },
}

impl CellContent {
    pub fn is_bomb(&self) -> bool {
        matches!(self, Self::Bomb { .. })
    }

    /// Player-facing text for the reveal banner.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Bomb { kind } => kind.description(),
            Self::Modifier { kind } => kind.description(),
            Self::Special { kind } => kind.description(),
        }
    }
}

impl Serialize for CellContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (category, kind, name, value) = match *self {
            Self::Bomb { kind } => ("BOMB", ContentType::Bomb(kind), Some(kind.name()), None),
            Self::Modifier { kind } => ("MODIFIER", ContentType::Modifier(kind), None, Some(kind.value())),
            Self::Special { kind } => ("SPECIAL", ContentType::Special(kind), None, None),
        };
        ContentWire {
            category,
            kind,
            name,
            value,
            description: self.description(),
        }
        .serialize(serializer)
    }
}

#[derive(Serialize)]
struct ContentWire {
    category: &'static str,
    #[serde(rename = "type")]
    kind: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<u64>,
    description: &'static str,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ContentType {
    Bomb(BombKind),
    Modifier(Modifier),
    Special(SpecialKind),
}

/// Who drinks when a bomb goes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombKind {
    /// The revealer drinks.
    #[serde(rename = "BOMB_MARTYR")]
    Martyr,
    /// The revealer picks someone to drink.
    #[serde(rename = "BOMB_SNIPER")]
    Sniper,
    /// Everyone but the revealer drinks.
    #[serde(rename = "BOMB_GRENADE")]
    Grenade,
    /// Everyone drinks.
    #[serde(rename = "BOMB_NUKE")]
    Nuke,
}

impl BombKind {
    const ALL: [Self; 4] = [Self::Martyr, Self::Sniper, Self::Grenade, Self::Nuke];

    pub fn name(self) -> &'static str {
        match self {
            Self::Martyr => "El Mártir",
            Self::Sniper => "El Francotirador",
            Self::Grenade => "La Granada",
            Self::Nuke => "La Bomba Nuclear",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Martyr => "TÚ bebes",
            Self::Sniper => "MANDAS beber",
            Self::Grenade => "TODOS MENOS TÚ beben",
            Self::Nuke => "TODOS beben",
        }
    }
}

/// Changes the drink counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    #[serde(rename = "ADD_1")]
    Add1,
    #[serde(rename = "ADD_2")]
    Add2,
    #[serde(rename = "ADD_3")]
    Add3,
    #[serde(rename = "MULT_2")]
    Mult2,
    #[serde(rename = "MULT_3")]
    Mult3,
    #[serde(rename = "DIV_2")]
    Div2,
}

impl Modifier {
    /// Offered while the counter is low. No dividers.
    const LOW: [Self; 5] = [Self::Add1, Self::Add2, Self::Add3, Self::Mult2, Self::Mult3];

    /// Offered once the counter has grown.
    const HIGH: [Self; 4] = [Self::Add1, Self::Add2, Self::Mult2, Self::Div2];

    /// The operand: how much is added, or what the counter is multiplied
    /// or divided by.
    pub fn value(self) -> u64 {
        match self {
            Self::Add1 => 1,
            Self::Add2 | Self::Mult2 | Self::Div2 => 2,
            Self::Add3 | Self::Mult3 => 3,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Add1 => "+1 trago",
            Self::Add2 => "+2 tragos",
            Self::Add3 => "+3 tragos",
            Self::Mult2 => "x2 tragos",
            Self::Mult3 => "x3 tragos",
            Self::Div2 => "÷2 tragos",
        }
    }

    /// Applies the modifier. Never returns less than 1.
    pub fn apply(self, counter: u64) -> u64 {
        match self {
            Self::Add1 => counter.saturating_add(1),
            Self::Add2 => counter.saturating_add(2),
            Self::Add3 => counter.saturating_add(3),
            Self::Mult2 => counter.saturating_mul(2),
            Self::Mult3 => counter.saturating_mul(3),
            Self::Div2 => (counter / 2).max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialKind {
    /// Nothing happens.
    Safe,
    /// Turn order flips direction.
    Reverse,
}

impl SpecialKind {
    const ALL: [Self; 2] = [Self::Safe, Self::Reverse];

    pub fn description(self) -> &'static str {
        match self {
            Self::Safe => "¡Salvado!",
            Self::Reverse => "Cambio de sentido",
        }
    }
}

/// Game progress as seen just before a reveal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Progress {
    pub revealed: usize,
    pub bombs_revealed: usize,
    pub total_squares: usize,
    pub total_bombs: usize,
    pub drink_counter: u64,
}

impl Progress {
    pub fn remaining(&self) -> usize {
        self.total_squares.saturating_sub(self.revealed)
    }

    pub fn bombs_left(&self) -> usize {
        self.total_bombs.saturating_sub(self.bombs_revealed)
    }
}

/// Chance that the next (non-final) cell is a bomb.
pub(crate) fn bomb_probability(progress: &Progress) -> f64 {
    let remaining = progress.remaining();
    if remaining == 0 {
        return 0.0;
    }
    let turns_without_bomb = progress.revealed.saturating_sub(progress.bombs_revealed);
    let base = progress.bombs_left() as f64 / remaining as f64;
    let multiplier = 1.0 + STREAK_BOOST * turns_without_bomb as f64;
    (base * multiplier).min(MAX_BOMB_PROBABILITY)
}

/// Draws the content of the cell being revealed.
pub(crate) fn generate(rng: &mut impl Rng, progress: &Progress) -> CellContent {
    if progress.remaining() == 1 {
        return random_bomb(rng);
    }

    let draw: f64 = rng.random();
    if draw < bomb_probability(progress) && progress.bombs_left() > 1 {
        return random_bomb(rng);
    }

    smart_content(rng, progress.drink_counter)
}

fn smart_content(rng: &mut impl Rng, counter: u64) -> CellContent {
    // (modifier, action); special takes whatever is left (always 0.2).
    let (modifier, action) = if counter <= LOW_COUNTER {
        (0.7, 0.1)
    } else if counter <= HIGH_COUNTER {
        (0.4, 0.4)
    } else {
        (0.2, 0.6)
    };

    let roll: f64 = rng.random();
    if roll < modifier {
        CellContent::Modifier { kind: random_modifier(rng, counter) }
    } else if roll < modifier + action {
        // "Action" cells have no effect of their own yet; they're safe.
        CellContent::Special { kind: SpecialKind::Safe }
    } else {
        CellContent::Special { kind: pick(rng, &SpecialKind::ALL) }
    }
}

fn random_bomb(rng: &mut impl Rng) -> CellContent {
    CellContent::Bomb { kind: pick(rng, &BombKind::ALL) }
}

fn random_modifier(rng: &mut impl Rng, counter: u64) -> Modifier {
    if counter <= LOW_COUNTER {
        pick(rng, &Modifier::LOW)
    } else {
        pick(rng, &Modifier::HIGH)
    }
}

fn pick<T: Copy>(rng: &mut impl Rng, options: &[T]) -> T {
    options[rng.random_range(0..options.len())]
}
