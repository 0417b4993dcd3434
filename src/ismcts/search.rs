//! Information Set Monte Carlo Tree Search.
//!
//! Every iteration samples one fully observable world consistent with what
//! the player to move at the root can see, then runs the usual four phases
//! against the shared tree:
//! 1. Selection: descend while every legal move already has a child, picking
//!    by UCB over the children that are legal in this world
//! 2. Expansion: add one child for a random untried move
//! 3. Simulation: play uniformly random moves until the game ends
//! 4. Backpropagation: credit each node's mover with their payoff

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, trace};

use crate::ismcts::config::{validate_exploration, SearchConfig, DEFAULT_EXPLORATION};
use crate::ismcts::error::SearchError;
use crate::ismcts::game::GameState;
use crate::ismcts::tree::{ChildStats, Tree};

/// Summary of the work done by an [`IsmctsHandler`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport<M> {
    pub best_move: Option<M>,
    /// Iterations that actually ran. Zero when the root had a single move.
    pub simulations: usize,
    pub tree_size: usize,
    pub root_visits: u32,
    pub children: Vec<ChildStats<M>>,
}

/// Owns one search tree for one root position. Iterations can be run in
/// several batches; statistics accumulate until the handler is dropped.
pub struct IsmctsHandler<G: GameState, R: Rng = StdRng> {
    root_state: G,
    root_moves: Vec<G::Move>,
    tree: Tree<G::Move>,
    exploration: f64,
    rng: R,
    simulations: usize,
}

impl<G: GameState> IsmctsHandler<G, StdRng> {
    /// Handler with the default exploration constant and an entropy seeded RNG.
    pub fn new(root_state: G) -> Self {
        IsmctsHandler::build(root_state, DEFAULT_EXPLORATION, StdRng::from_entropy())
    }

    pub fn with_config(root_state: G, config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(IsmctsHandler::build(
            root_state,
            config.exploration,
            config.rng(),
        ))
    }
}

impl<G: GameState, R: Rng> IsmctsHandler<G, R> {
    pub fn with_rng(root_state: G, exploration: f64, rng: R) -> Result<Self, SearchError> {
        validate_exploration(exploration)?;
        Ok(IsmctsHandler::build(root_state, exploration, rng))
    }

    fn build(root_state: G, exploration: f64, rng: R) -> Self {
        let root_moves = root_state.legal_moves();
        IsmctsHandler {
            root_state,
            root_moves,
            tree: Tree::new(),
            exploration,
            rng,
            simulations: 0,
        }
    }

    /// Runs `iterations` more iterations against the tree. With a single
    /// legal move at the root there is nothing to decide and no work is done.
    pub fn run_iterations(&mut self, iterations: usize) -> Result<(), SearchError> {
        match self.root_moves.len() {
            0 => return Err(SearchError::NoLegalMoves),
            1 => {
                trace!(mov = ?self.root_moves[0], "single legal move, skipping search");
                return Ok(());
            }
            _ => {}
        }

        debug!(
            iterations,
            exploration = self.exploration,
            root_moves = self.root_moves.len(),
            "running ismcts iterations"
        );
        for _ in 0..iterations {
            self.iterate()?;
        }
        debug!(
            simulations = self.simulations,
            tree_size = self.tree.len(),
            best_move = ?self.best_move(),
            "ismcts iterations complete"
        );
        Ok(())
    }

    fn iterate(&mut self) -> Result<(), SearchError> {
        let observer = self.root_state.position_to_move();
        let mut state = self.root_state.randomized_clone(observer, &mut self.rng);
        let mut node = self.tree.root();
        let mut legal_moves = state.legal_moves();

        // Selection
        while !legal_moves.is_empty()
            && self.tree.untried_moves(node, &legal_moves).is_empty()
        {
            let child = match self.tree.select_child(node, &legal_moves, self.exploration) {
                Some(child) => child,
                None => break,
            };
            if let Some(mov) = &self.tree.get(child).mov {
                state.apply_move(mov);
            }
            node = child;
            legal_moves = state.legal_moves();
        }

        // Expansion
        let untried = self.tree.untried_moves(node, &legal_moves);
        if let Some(mov) = untried.choose(&mut self.rng) {
            let player = state.position_to_move();
            state.apply_move(mov);
            node = self.tree.add_child(node, mov.clone(), player);
            trace!(?mov, player, "expanded node");
        }

        // Simulation
        rollout(&mut state, &mut self.rng);

        // Backpropagation
        let result = state.result().ok_or(SearchError::MissingResult)?;
        self.tree.backpropagate(node, &result);
        self.simulations += 1;
        Ok(())
    }

    /// The move of the most visited root child.
    pub fn best_move(&self) -> Option<G::Move> {
        if self.root_moves.len() == 1 {
            return self.root_moves.first().cloned();
        }
        self.tree
            .most_visited_child(self.tree.root())
            .and_then(|child| self.tree.get(child).mov.clone())
    }

    pub fn simulations(&self) -> usize {
        self.simulations
    }

    pub fn tree(&self) -> &Tree<G::Move> {
        &self.tree
    }

    pub fn report(&self) -> SearchReport<G::Move> {
        SearchReport {
            best_move: self.best_move(),
            simulations: self.simulations,
            tree_size: self.tree.len(),
            root_visits: self.tree.get(self.tree.root()).visits,
            children: self.tree.child_stats(self.tree.root()),
        }
    }

    /// Logs the root children, most visited first.
    pub fn debug_children(&self) {
        let mut children = self.tree.child_stats(self.tree.root());
        children.sort_by(|a, b| b.visits.cmp(&a.visits));
        for child in children {
            debug!(
                mov = ?child.mov,
                visits = child.visits,
                availability = child.availability,
                average_reward = child.average_reward,
                "root child"
            );
        }
    }
}

/// Plays uniformly random moves until the game is over.
pub fn rollout<G: GameState, R: Rng + ?Sized>(state: &mut G, rng: &mut R) {
    while let Some(mov) = state.random_legal_move(rng) {
        state.apply_move(&mov);
    }
}

/// Chooses a move for the player to move in `root_state`.
pub fn search<G: GameState>(
    root_state: &G,
    iterations: usize,
    exploration: f64,
) -> Result<G::Move, SearchError> {
    search_with_rng(root_state, iterations, exploration, &mut StdRng::from_entropy())
}

pub fn search_with_config<G: GameState>(
    root_state: &G,
    config: &SearchConfig,
) -> Result<G::Move, SearchError> {
    config.validate()?;
    search_with_rng(
        root_state,
        config.iterations,
        config.exploration,
        &mut config.rng(),
    )
}

pub fn search_with_rng<G: GameState, R: Rng>(
    root_state: &G,
    iterations: usize,
    exploration: f64,
    rng: &mut R,
) -> Result<G::Move, SearchError> {
    if iterations == 0 {
        return Err(SearchError::InvalidConfig(
            "iterations must be at least 1".to_string(),
        ));
    }
    let mut handler = IsmctsHandler::with_rng(root_state.clone(), exploration, rng)?;
    handler.run_iterations(iterations)?;
    handler.best_move().ok_or(SearchError::NoLegalMoves)
}

/// Average payoff for the player to move over `iterations` random
/// playouts that start with `mov`. No tree is built.
pub fn estimate_value<G: GameState>(
    root_state: &G,
    mov: &G::Move,
    iterations: usize,
) -> Result<f64, SearchError> {
    estimate_value_with_rng(root_state, mov, iterations, &mut StdRng::from_entropy())
}

pub fn estimate_value_with_rng<G: GameState, R: Rng + ?Sized>(
    root_state: &G,
    mov: &G::Move,
    iterations: usize,
    rng: &mut R,
) -> Result<f64, SearchError> {
    if iterations == 0 {
        return Err(SearchError::InvalidConfig(
            "iterations must be at least 1".to_string(),
        ));
    }
    let player = root_state.position_to_move();
    let mut total_reward = 0.0;
    for _ in 0..iterations {
        let mut state = root_state.randomized_clone(player, rng);
        state.apply_move(mov);
        rollout(&mut state, rng);
        let result = state.result().ok_or(SearchError::MissingResult)?;
        total_reward += result[player];
    }
    Ok(total_reward / iterations as f64)
}
