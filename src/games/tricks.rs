/*
Game: Lead & Follow
A plain must-follow trick taking game for three players, no trump.
Most tricks wins.
*/

use enum_iterator::{all, Sequence};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::ismcts::{GameResult, GameState};
use crate::utils::shuffle_and_divide_matching_cards;

pub const PLAYER_COUNT: usize = 3;
pub const HAND_SIZE: usize = 8;

#[derive(
    Debug,
    PartialOrd,
    Ord,
    Clone,
    Copy,
    Sequence,
    Default,
    Serialize,
    Deserialize,
    Hash,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "camelCase")]
pub enum Suit {
    #[default]
    Red,
    Blue,
    Yellow,
    Green,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i32,
    pub value: i32,
    pub suit: Suit,
}

/// 4 suits of 1-6, ids in suit order
pub fn deck() -> Vec<Card> {
    let mut deck: Vec<Card> = vec![];
    let mut id = 0;
    for suit in all::<Suit>() {
        for value in 1..=6 {
            deck.push(Card { id, value, suit });
            id += 1;
        }
    }
    deck
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    players: [usize; PLAYER_COUNT],
    hands: [Vec<Card>; PLAYER_COUNT],
    current_trick: [Option<Card>; PLAYER_COUNT],
    lead_suit: Option<Suit>,
    lead_player: usize,
    current_player: usize,
    pub tricks_taken: [i32; PLAYER_COUNT],
    /// Suits each player has shown they are out of
    pub voids: [HashSet<Suit>; PLAYER_COUNT],
    pub winner: Option<usize>,
}

impl Game {
    /// Factory to create a freshly dealt game
    pub fn new() -> Game {
        Game::new_with_rng(&mut thread_rng())
    }

    pub fn new_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Game {
        let mut cards = deck();
        cards.shuffle(rng);
        let mut game = Game {
            players: [0, 1, 2],
            ..Default::default()
        };
        for _ in 0..HAND_SIZE {
            for player in 0..PLAYER_COUNT {
                let card = cards.pop().expect("deck covers every hand");
                game.hands[player].push(card);
            }
        }
        for hand in game.hands.iter_mut() {
            hand.sort_by(card_sorter);
        }
        game
    }

    pub fn hand(&self, player: usize) -> &[Card] {
        &self.hands[player]
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn get_moves(&self) -> Vec<i32> {
        let hand = &self.hands[self.current_player];
        if let Some(lead_suit) = self.lead_suit {
            let actions: Vec<i32> = hand
                .iter()
                .filter(|c| c.suit == lead_suit)
                .map(|c| c.id)
                .collect();
            if !actions.is_empty() {
                return actions;
            }
        }
        hand.iter().map(|c| c.id).collect()
    }

    pub fn play(&mut self, action: i32) {
        let player = self.current_player;
        let position = self.hands[player]
            .iter()
            .position(|c| c.id == action)
            .unwrap_or_else(|| panic!("card {action} has to be in player {player}'s hand"));
        let card = self.hands[player].remove(position);

        match self.lead_suit {
            Some(suit) if suit != card.suit => {
                // Player has revealed a void
                self.voids[player].insert(suit);
            }
            Some(_) => {}
            None => self.lead_suit = Some(card.suit),
        }
        self.current_trick[player] = Some(card);
        self.current_player = (player + 1) % PLAYER_COUNT;

        if self.current_trick.iter().flatten().count() < PLAYER_COUNT {
            return;
        }

        // end trick
        let lead_suit = self.lead_suit.expect("a full trick has a lead suit");
        let trick_winner = get_winner(lead_suit, &self.current_trick);
        self.tricks_taken[trick_winner] += 1;
        self.current_player = trick_winner;
        self.lead_player = trick_winner;
        self.current_trick = [None; PLAYER_COUNT];
        self.lead_suit = None;

        if self.hands.iter().all(|h| h.is_empty()) {
            let most_tricks = *self.tricks_taken.iter().max().unwrap_or(&0);
            self.winner = self.tricks_taken.iter().position(|t| *t == most_tricks);
        }
    }
}

fn card_sorter(a: &Card, b: &Card) -> Ordering {
    match a.suit.cmp(&b.suit) {
        Ordering::Equal => a.value.cmp(&b.value),
        ordering => ordering,
    }
}

/// Highest card of the lead suit takes the trick
pub fn get_winner(lead_suit: Suit, trick: &[Option<Card>; PLAYER_COUNT]) -> usize {
    trick
        .iter()
        .enumerate()
        .filter_map(|(player, card)| card.map(|c| (player, c)))
        .filter(|(_, card)| card.suit == lead_suit)
        .max_by_key(|(_, card)| card.value)
        .map(|(player, _)| player)
        .expect("the lead card is always in the trick")
}

/// 1.0 for the only player with the most tricks, 0.9 when sharing the most
/// tricks, -1.0 otherwise
fn score_tricks(tricks_taken: &[i32; PLAYER_COUNT]) -> GameResult {
    let most_tricks = *tricks_taken.iter().max().unwrap_or(&0);
    let leaders = tricks_taken.iter().filter(|t| **t == most_tricks).count();
    GameResult::new(
        tricks_taken
            .iter()
            .map(|tricks| match *tricks == most_tricks {
                true if leaders > 1 => 0.9,
                true => 1.0,
                false => -1.0,
            })
            .collect(),
    )
}

impl GameState for Game {
    type Move = i32;
    type Player = usize;

    fn position_to_move(&self) -> usize {
        self.current_player
    }

    fn players(&self) -> &[usize] {
        &self.players
    }

    fn legal_moves(&self) -> Vec<i32> {
        if self.winner.is_some() {
            return vec![];
        }
        self.get_moves()
    }

    fn apply_move(&mut self, mov: &i32) {
        self.play(*mov);
    }

    fn result(&self) -> Option<GameResult> {
        self.winner.map(|_| score_tricks(&self.tricks_taken))
    }

    fn randomized_clone<R: Rng + ?Sized>(&self, observer: usize, rng: &mut R) -> Self {
        let mut game = self.clone();
        for p1 in 0..PLAYER_COUNT {
            for p2 in (p1 + 1)..PLAYER_COUNT {
                if p1 == observer || p2 == observer {
                    continue;
                }

                let combined_voids: HashSet<Suit> =
                    game.voids[p1].union(&game.voids[p2]).copied().collect();

                let mut new_hands = [
                    std::mem::take(&mut game.hands[p1]),
                    std::mem::take(&mut game.hands[p2]),
                ];

                // allow swapping of any cards that are not in the combined void set
                shuffle_and_divide_matching_cards(
                    |c: &Card| !combined_voids.contains(&c.suit),
                    &mut new_hands,
                    rng,
                );

                let [hand1, hand2] = new_hands;
                game.hands[p1] = hand1;
                game.hands[p2] = hand2;
            }
        }
        game
    }
}
