use std::fmt::Debug;
use std::ops::Index;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-player payoffs of a finished game. A larger value is always a better
/// outcome for that player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    player_results: Vec<f64>,
}

impl GameResult {
    pub fn new(player_results: Vec<f64>) -> Self {
        GameResult { player_results }
    }

    pub fn player_results(&self) -> &[f64] {
        &self.player_results
    }

    pub fn len(&self) -> usize {
        self.player_results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.player_results.is_empty()
    }
}

impl Index<usize> for GameResult {
    type Output = f64;

    fn index(&self, player: usize) -> &f64 {
        &self.player_results[player]
    }
}

/// A position in an imperfect-information game, as seen by the search.
///
/// The search only ever mutates private clones produced by
/// [`GameState::randomized_clone`] or [`Clone::clone`]; the root passed in by
/// the caller is left untouched.
pub trait GameState: Clone {
    type Move: Clone + PartialEq + Debug;
    type Player;

    /// Index into [`GameState::players`] of the player whose turn it is.
    fn position_to_move(&self) -> usize;

    /// Seats of the game. Fixed in size for the whole game.
    fn players(&self) -> &[Self::Player];

    /// Moves available to the player to move. Empty iff the game is over.
    /// Querying must not change the state.
    fn legal_moves(&self) -> Vec<Self::Move>;

    fn apply_move(&mut self, mov: &Self::Move);

    /// Present iff the game is over.
    fn result(&self) -> Option<GameResult>;

    /// Deep copy in which everything hidden from `observer` is resampled
    /// consistently with what `observer` has seen. Every move sequence legal
    /// from `observer`'s point of view must stay legal.
    fn randomized_clone<R: Rng + ?Sized>(&self, observer: usize, rng: &mut R) -> Self;

    /// Uniformly random legal move, `None` iff the game is over. Games with a
    /// faster way to draw a move than enumerating them all can override this.
    fn random_legal_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Self::Move> {
        self.legal_moves().choose(rng).cloned()
    }
}
