//! Seats: player ids, colors and per-seat values.
//!
//! Seating order is the index order, and turns rotate through it.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A seat at the table, 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every seat of a `player_count` table, in turn order.
    ///
    /// ```
    /// use rust_tiles::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, [PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count).map(|i| PlayerId(i as u8))
    }

    /// The player seated after this one.
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        if player_count == 0 {
            return self;
        }
        Self(((self.index() + 1) % player_count) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Follower color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
    Black,
    Gray,
}

impl PlayerColor {
    /// Colors in seating order.
    pub const ALL: [PlayerColor; 6] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Yellow,
        PlayerColor::Black,
        PlayerColor::Gray,
    ];

    /// Default color for a seat.
    #[must_use]
    pub fn for_seat(player: PlayerId) -> Self {
        Self::ALL[player.index() % Self::ALL.len()]
    }
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    pub color: PlayerColor,
}

impl Player {
    /// Create a new player with the seat's default color.
    pub fn new(id: PlayerId, nickname: impl Into<String>) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            color: PlayerColor::for_seat(id),
        }
    }
}

/// One value per seat, cloned in O(1).
///
/// ```
/// use rust_tiles::core::{PlayerId, PlayerMap};
///
/// let mut supply = PlayerMap::filled(3, 7u8);
/// supply.update(PlayerId::new(1), |n| *n -= 1);
/// assert_eq!(supply[PlayerId::new(1)], 6);
/// assert_eq!(supply.get(PlayerId::new(3)), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerMap<T: Clone> {
    seats: Vector<T>,
}

impl<T: Clone> PlayerMap<T> {
    /// `player_count` seats holding `value`.
    pub fn filled(player_count: usize, value: T) -> Self {
        Self { seats: std::iter::repeat(value).take(player_count).collect() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.seats.get(player.index())
    }

    /// Edit one seat. Unknown players are ignored.
    pub fn update(&mut self, player: PlayerId, f: impl FnOnce(&mut T)) {
        if let Some(value) = self.seats.get_mut(player.index()) {
            f(value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all(self.seats.len()).zip(self.seats.iter())
    }
}

impl<T: Clone> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.seats[player.index()]
    }
}
