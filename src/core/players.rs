//! The players registry: identity, points, tokens and followers.
//!
//! Every collection is persistent, so a snapshot that changes one player's
//! score shares the rest of the registry with its parent.
//!
//! ## Tokens
//!
//! Tokens are opaque to the registry. A capability defines its own
//! [`Token`] kinds and the registry only tracks a non-negative count per
//! player and kind.

use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::FeaturePlace;
use crate::capability::Token;
use crate::core::player::{Player, PlayerId, PlayerMap};
use crate::core::snapshot::seq_map;

/// Where points came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PointCategory {
    Road,
    City,
    Cloister,
    Farm,
    BiggestCity,
    LongestRoad,
    TradeGoods,
    WindRose,
}

impl PointCategory {
    pub const ALL: [PointCategory; 8] = [
        PointCategory::Road,
        PointCategory::City,
        PointCategory::Cloister,
        PointCategory::Farm,
        PointCategory::BiggestCity,
        PointCategory::LongestRoad,
        PointCategory::TradeGoods,
        PointCategory::WindRose,
    ];
}

/// Players with their scores, tokens and followers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayersState {
    players: Vector<Player>,
    points: PlayerMap<OrdMap<PointCategory, i64>>,
    #[serde(with = "seq_map")]
    tokens: OrdMap<(PlayerId, Token), u32>,
    supply: PlayerMap<u8>,
    #[serde(with = "seq_map")]
    deployed: OrdMap<FeaturePlace, PlayerId>,
}

impl PlayersState {
    /// Seat players in the given order, each with `followers` in supply.
    pub fn new<S: Into<String>>(nicknames: impl IntoIterator<Item = S>, followers: u8) -> Self {
        let players: Vector<Player> = nicknames
            .into_iter()
            .enumerate()
            .map(|(i, name)| Player::new(PlayerId::new(i as u8), name))
            .collect();
        let count = players.len();

        Self {
            players,
            points: PlayerMap::filled(count, OrdMap::new()),
            tokens: OrdMap::new(),
            supply: PlayerMap::filled(count, followers),
            deployed: OrdMap::new(),
        }
    }

    /// Number of seated players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Players in seating order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Player ids in seating order.
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.players.len())
    }

    // === Points ===

    /// Points in one category.
    #[must_use]
    pub fn points(&self, player: PlayerId, category: PointCategory) -> i64 {
        self.points
            .get(player)
            .and_then(|m| m.get(&category).copied())
            .unwrap_or(0)
    }

    /// Points across all categories.
    #[must_use]
    pub fn total(&self, player: PlayerId) -> i64 {
        self.points
            .get(player)
            .map_or(0, |m| m.values().sum())
    }

    /// Category totals for a player, in category order.
    #[must_use]
    pub fn points_by_category(&self, player: PlayerId) -> OrdMap<PointCategory, i64> {
        self.points.get(player).cloned().unwrap_or_default()
    }

    /// Add to a category total. Negative amounts and zero are allowed.
    pub fn add_points(&mut self, player: PlayerId, amount: i64, category: PointCategory) {
        self.points.update(player, |m| {
            *m.entry(category).or_insert(0) += amount;
        });
    }

    // === Tokens ===

    #[must_use]
    pub fn token_count(&self, player: PlayerId, token: Token) -> u32 {
        self.tokens.get(&(player, token)).copied().unwrap_or(0)
    }

    /// Overwrite a token count. Unknown players are ignored.
    pub fn set_token_count(&mut self, player: PlayerId, token: Token, count: u32) {
        if player.index() < self.players.len() {
            self.tokens.insert((player, token), count);
        }
    }

    /// Players holding at least one `token`, in seating order.
    pub fn holders(&self, token: Token) -> impl Iterator<Item = PlayerId> + '_ {
        self.ids().filter(move |&p| self.token_count(p, token) > 0)
    }

    // === Followers ===

    /// Followers left in a player's supply.
    #[must_use]
    pub fn supply(&self, player: PlayerId) -> u8 {
        self.supply.get(player).copied().unwrap_or(0)
    }

    /// Who stands on `place`, if anyone.
    #[must_use]
    pub fn follower_at(&self, place: FeaturePlace) -> Option<PlayerId> {
        self.deployed.get(&place).copied()
    }

    /// All deployed followers, in place order.
    pub fn deployed(&self) -> impl Iterator<Item = (FeaturePlace, PlayerId)> + '_ {
        self.deployed.iter().map(|(place, player)| (*place, *player))
    }

    /// Followers standing on any of `places`.
    #[must_use]
    pub fn followers_on(&self, places: &OrdSet<FeaturePlace>) -> SmallVec<[(FeaturePlace, PlayerId); 4]> {
        places
            .iter()
            .filter_map(|place| self.follower_at(*place).map(|p| (*place, p)))
            .collect()
    }

    /// Take a follower from supply and stand it on `place`.
    ///
    /// Callers check supply and occupancy first; a player with an empty
    /// supply is left unchanged.
    pub fn deploy(&mut self, player: PlayerId, place: FeaturePlace) {
        if self.supply(player) == 0 {
            return;
        }
        self.supply.update(player, |n| *n -= 1);
        self.deployed.insert(place, player);
    }

    /// Return the follower on `place` to its owner's supply.
    pub fn return_follower(&mut self, place: FeaturePlace) -> Option<PlayerId> {
        let player = self.deployed.remove(&place)?;
        self.supply.update(player, |n| *n = n.saturating_add(1));
        Some(player)
    }

    /// Players with the most followers on `places`, in seating order.
    ///
    /// Ties share; empty if nobody stands on the feature.
    #[must_use]
    pub fn majority_owners(&self, places: &OrdSet<FeaturePlace>) -> SmallVec<[PlayerId; 6]> {
        let mut counts: OrdMap<PlayerId, u32> = OrdMap::new();
        for (_, player) in self.followers_on(places) {
            *counts.entry(player).or_insert(0) += 1;
        }
        let best = counts.values().copied().max().unwrap_or(0);
        counts
            .iter()
            .filter(|(_, n)| **n == best && **n > 0)
            .map(|(p, _)| *p)
            .collect()
    }
}
