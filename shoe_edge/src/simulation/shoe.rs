use rand::Rng;

use crate::composition::CARDS_PER_DECK;
use crate::{Composition, EngineError, Rank};

/// True count denominators never drop below a quarter of a deck, so the count
/// stays bounded near the cut card.
pub const MIN_DECKS_REMAINING: f64 = 0.25;

/// Represents the observed shoe: what is left of the N-deck composition after
/// every card the caller has reported, plus the history needed to undo.
#[derive(Debug, Clone)]
pub struct ShoeState {
    number_of_decks: u8,
    composition: Composition,
    history: Vec<Rank>,
}

/// How far the shoe has been dealt relative to the cut card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShoeProgress {
    pub seen_to_cut: u16,
    pub cut: u16,
    pub total: u16,
    pub remaining_to_cut: u16,
}

impl ShoeState {
    /// Creates a full shoe with nothing observed.
    pub fn new(number_of_decks: u8) -> ShoeState {
        ShoeState {
            number_of_decks,
            composition: Composition::with_number_of_decks(number_of_decks),
            history: Vec::new(),
        }
    }

    /// Records a dealt card. Fails without changing anything if no card of this
    /// rank is left.
    pub fn observe(&mut self, rank: Rank) -> Result<(), EngineError> {
        self.composition.remove_card(rank)?;
        self.history.push(rank);
        Ok(())
    }

    /// Reverses the last observation. Returns the rank put back, or None if
    /// nothing was observed.
    pub fn undo(&mut self) -> Option<Rank> {
        let rank = self.history.pop()?;
        self.composition.add_card(rank);
        Some(rank)
    }

    /// Returns every observed card into the shoe.
    pub fn reset(&mut self) {
        self.composition = Composition::with_number_of_decks(self.number_of_decks);
        self.history.clear();
    }

    pub fn remaining(&self) -> Composition {
        self.composition
    }

    /// Per-rank counts of the observed cards.
    pub fn seen(&self) -> Composition {
        let mut seen = Composition::with_number_of_decks(self.number_of_decks);
        seen -= &self.composition;
        seen
    }

    pub fn history(&self) -> &[Rank] {
        &self.history
    }

    pub fn get_number_of_decks(&self) -> u8 {
        self.number_of_decks
    }

    pub fn total_cards(&self) -> u16 {
        self.number_of_decks as u16 * CARDS_PER_DECK
    }

    /// `penetration` is the dealt fraction of the shoe at which the cut card
    /// sits. It is clamped into [0, 1].
    pub fn progress(&self, penetration: f64) -> ShoeProgress {
        let total = self.total_cards();
        let cut = (total as f64 * penetration.clamp(0.0, 1.0)).floor() as u16;
        let seen_to_cut = (self.history.len() as u16).min(cut);
        ShoeProgress {
            seen_to_cut,
            cut,
            total,
            remaining_to_cut: cut - seen_to_cut,
        }
    }

    /// Decks still to be dealt before the cut card, never below
    /// `MIN_DECKS_REMAINING`.
    pub fn decks_remaining_to_cut(&self, penetration: f64) -> f64 {
        let decks = self.progress(penetration).remaining_to_cut as f64 / CARDS_PER_DECK as f64;
        decks.max(MIN_DECKS_REMAINING)
    }
}

/// An owned copy of a composition that simulated cards are drawn from. Each
/// simulated round gets its own pile, so the caller's shoe is never touched.
#[derive(Debug, Clone)]
pub struct DrawPile {
    composition: Composition,
    exhausted_draws: u32,
}

impl DrawPile {
    pub fn new(composition: Composition) -> DrawPile {
        DrawPile {
            composition,
            exhausted_draws: 0,
        }
    }

    /// Draws one card without replacement.
    ///
    /// An empty pile yields a ten-value card instead of failing the whole
    /// computation. This is an approximation kept for output compatibility;
    /// every occurrence is counted and reported through `get_exhausted_draws`.
    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Rank {
        match self.composition.draw(rng) {
            Some(rank) => rank,
            None => {
                self.exhausted_draws += 1;
                Rank::Ten
            }
        }
    }

    /// Takes a known card out of the pile. Absent ranks are ignored.
    pub fn discard(&mut self, rank: Rank) {
        let _ = self.composition.remove_card(rank);
    }

    pub fn get_composition(&self) -> &Composition {
        &self.composition
    }

    pub fn get_exhausted_draws(&self) -> u32 {
        self.exhausted_draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn observe_and_undo() {
        let mut shoe = ShoeState::new(1);
        shoe.observe(Rank::Five).unwrap();
        shoe.observe(Rank::King).unwrap();
        assert_eq!(shoe.remaining()[Rank::Five], 3);
        assert_eq!(shoe.remaining().get_total(), 50);
        assert_eq!(shoe.seen()[Rank::King], 1);

        assert_eq!(shoe.undo(), Some(Rank::King));
        assert_eq!(shoe.remaining()[Rank::King], 4);
        assert_eq!(shoe.history(), &[Rank::Five]);
        assert_eq!(shoe.undo(), Some(Rank::Five));
        assert_eq!(shoe.undo(), None);
        assert_eq!(shoe.remaining(), Composition::with_number_of_decks(1));
    }

    #[test]
    fn observing_exhausted_rank_changes_nothing() {
        let mut shoe = ShoeState::new(1);
        for _ in 0..4 {
            shoe.observe(Rank::Ace).unwrap();
        }
        let before = shoe.remaining();
        assert_eq!(
            shoe.observe(Rank::Ace),
            Err(EngineError::RankExhausted(Rank::Ace))
        );
        assert_eq!(shoe.remaining(), before);
        assert_eq!(shoe.history().len(), 4);
    }

    #[test]
    fn reset_restores_full_shoe() {
        let mut shoe = ShoeState::new(6);
        shoe.observe(Rank::Two).unwrap();
        shoe.observe(Rank::Three).unwrap();
        shoe.reset();
        assert_eq!(shoe.remaining().get_total(), 312);
        assert!(shoe.history().is_empty());
        assert_eq!(shoe.undo(), None);
    }

    #[test]
    fn decks_remaining_to_cut() {
        let mut shoe = ShoeState::new(6);
        // Cut at 234 of 312 cards: 4.5 decks before anything is dealt.
        assert!((shoe.decks_remaining_to_cut(0.75) - 4.5).abs() < 1e-12);
        for _ in 0..13 {
            shoe.observe(Rank::Seven).unwrap();
            shoe.observe(Rank::Eight).unwrap();
        }
        assert!((shoe.decks_remaining_to_cut(0.75) - 4.0).abs() < 1e-12);

        let progress = shoe.progress(0.75);
        assert_eq!(progress.cut, 234);
        assert_eq!(progress.seen_to_cut, 26);
        assert_eq!(progress.remaining_to_cut, 208);
        assert_eq!(progress.total, 312);
    }

    #[test]
    fn empty_pile_falls_back_to_ten() {
        let mut counts = [0; 13];
        counts[Rank::Four.index()] = 1;
        let mut pile = DrawPile::new(Composition::new(&counts));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pile.deal(&mut rng), Rank::Four);
        assert_eq!(pile.get_exhausted_draws(), 0);
        assert_eq!(pile.deal(&mut rng), Rank::Ten);
        assert_eq!(pile.deal(&mut rng), Rank::Ten);
        assert_eq!(pile.get_exhausted_draws(), 2);
        pile.discard(Rank::Ace);
        assert!(pile.get_composition().is_empty());
    }

    #[test]
    fn decks_remaining_never_below_floor() {
        let mut shoe = ShoeState::new(1);
        for rank in [Rank::Two, Rank::Three, Rank::Four, Rank::Five] {
            for _ in 0..4 {
                shoe.observe(rank).unwrap();
            }
        }
        // 16 seen, cut at 19: three cards to go is far below a quarter deck.
        assert_eq!(shoe.decks_remaining_to_cut(0.375), MIN_DECKS_REMAINING);
        // Past the cut card.
        assert_eq!(shoe.decks_remaining_to_cut(0.2), MIN_DECKS_REMAINING);
        assert_eq!(shoe.progress(0.2).remaining_to_cut, 0);
    }
}
