use crate::rules::cards::{CardId, CardInstance, InstanceId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Deck, hand, in-play and discard piles of one side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPiles {
    pub deck: VecDeque<CardInstance>,
    pub hand: Vec<CardInstance>,
    pub playing: Vec<CardInstance>,
    pub discard: Vec<CardInstance>,
}

impl CardPiles {
    pub fn from_deck(deck: Vec<CardInstance>) -> Self {
        Self {
            deck: deck.into(),
            ..Default::default()
        }
    }

    pub fn shuffle_deck(&mut self, rng: &mut impl Rng) {
        self.deck.make_contiguous().shuffle(rng);
    }

    /// Draws up to `count` cards, shuffling the discard pile back in once the deck runs out.
    pub fn draw(&mut self, count: u32, rng: &mut impl Rng) -> Vec<CardInstance> {
        let mut drawn = vec![];
        for _ in 0..count {
            if self.deck.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.deck.extend(self.discard.drain(..));
                self.shuffle_deck(rng);
            }

            match self.deck.pop_front() {
                Some(card) => {
                    self.hand.push(card);
                    drawn.push(card);
                }
                None => break,
            }
        }
        drawn
    }

    /// Moves a hand card into the playing area.
    pub fn begin_play(&mut self, hand_index: usize) -> Option<CardInstance> {
        if hand_index >= self.hand.len() {
            return None;
        }
        let card = self.hand.remove(hand_index);
        self.playing.push(card);
        Some(card)
    }

    /// Moves a played card from the playing area to the discard pile.
    pub fn finish_play(&mut self, instance_id: InstanceId) {
        if let Some(pos) = self
            .playing
            .iter()
            .position(|card| card.instance_id == instance_id)
        {
            let card = self.playing.remove(pos);
            self.discard.push(card);
        }
    }

    pub fn discard_from_hand(&mut self, hand_index: usize) -> Option<CardInstance> {
        if hand_index >= self.hand.len() {
            return None;
        }
        let card = self.hand.remove(hand_index);
        self.discard.push(card);
        Some(card)
    }

    pub fn discard_hand(&mut self) -> Vec<CardInstance> {
        let discarded: Vec<CardInstance> = self.hand.drain(..).collect();
        self.discard.extend(discarded.iter().copied());
        discarded
    }

    pub fn copies_of(&self, card_id: CardId) -> u32 {
        self.all_cards()
            .filter(|card| card.card_id == card_id)
            .count() as u32
    }

    /// Finds an instance in any pile.
    pub fn find_mut(&mut self, instance_id: InstanceId) -> Option<&mut CardInstance> {
        self.deck
            .iter_mut()
            .chain(self.hand.iter_mut())
            .chain(self.playing.iter_mut())
            .chain(self.discard.iter_mut())
            .find(|card| card.instance_id == instance_id)
    }

    pub fn all_cards(&self) -> impl Iterator<Item = &CardInstance> {
        self.deck
            .iter()
            .chain(self.hand.iter())
            .chain(self.playing.iter())
            .chain(self.discard.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn instances(card_ids: &[u32]) -> Vec<CardInstance> {
        card_ids
            .iter()
            .enumerate()
            .map(|(i, id)| CardInstance {
                instance_id: InstanceId(i as u32),
                card_id: CardId(*id),
            })
            .collect()
    }

    #[test]
    fn drawing_reshuffles_the_discard_pile() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut piles = CardPiles::from_deck(instances(&[1, 2, 3]));

        assert_eq!(piles.draw(2, &mut rng).len(), 2);
        piles.discard_hand();
        assert_eq!(piles.draw(3, &mut rng).len(), 3);
        assert!(piles.deck.is_empty());
        assert!(piles.discard.is_empty());

        assert!(piles.draw(1, &mut rng).is_empty());
    }

    #[test]
    fn played_cards_pass_through_the_playing_area() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut piles = CardPiles::from_deck(instances(&[1, 1, 2]));
        piles.draw(3, &mut rng);

        let card = piles.begin_play(0).unwrap();
        assert_eq!(piles.playing, vec![card]);
        assert_eq!(piles.copies_of(CardId(1)), 2);

        piles.finish_play(card.instance_id);
        assert!(piles.playing.is_empty());
        assert_eq!(piles.discard, vec![card]);
        assert!(piles.begin_play(5).is_none());
    }
}
