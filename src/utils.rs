use rand::{seq::SliceRandom, Rng};

/// Shuffle and exchanges items matching criteria between two lists
/// Used when determining possible cards a player could have in their
/// hand given the current state of a game.
pub fn shuffle_and_divide_matching_cards<T: Copy, R: Rng + ?Sized>(
    matcher: impl Fn(&T) -> bool,
    hands: &mut [Vec<T>; 2],
    rng: &mut R,
) {
    let mut hand_locations: [Vec<usize>; 2] = [
        Vec::with_capacity(hands[0].len()),
        Vec::with_capacity(hands[1].len()),
    ];
    let mut matched_cards: Vec<T> = Vec::with_capacity(hands[0].len() + hands[1].len());

    for (hand, locations) in hands.iter().zip(hand_locations.iter_mut()) {
        for (card_index, card) in hand.iter().enumerate() {
            if matcher(card) {
                locations.push(card_index);
                matched_cards.push(*card);
            }
        }
    }

    matched_cards.shuffle(rng);

    // Every matched slot gets exactly one of the matched cards back, so hand
    // sizes and the positions of unmatched cards never change
    for (hand, locations) in hands.iter_mut().zip(hand_locations.iter()) {
        for (card_index, card) in locations.iter().zip(matched_cards.drain(..locations.len())) {
            hand[*card_index] = card;
        }
    }
}
