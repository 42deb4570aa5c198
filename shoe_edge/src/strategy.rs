use crate::simulation::hand::Hand;
use crate::{Composition, Decision, Rank, Rule, MAX_SPLIT_DEPTH};

/// True count at which insurance is taken regardless of the ten density.
pub const INSURANCE_INDEX: i32 = 3;

pub trait Strategy {
    fn should_buy_insurance(&self, rule: &Rule, shoe: &Composition) -> bool;
    fn make_decision(
        &self,
        rule: &Rule,
        hand: &Hand,
        dealer_up_card: Rank,
        can_double: bool,
        can_split: bool,
    ) -> Decision;
}

/// Basic strategy with the Illustrious 18 and Fab 4 deviations, played at a
/// fixed true count.
#[derive(Debug, Clone, Copy)]
pub struct CountingStrategy {
    pub true_count_floor: i32,
    pub apply_indices: bool,
}

impl CountingStrategy {
    pub fn new(true_count_floor: i32, apply_indices: bool) -> Self {
        CountingStrategy {
            true_count_floor,
            apply_indices,
        }
    }
}

impl Strategy for CountingStrategy {
    /// Insurance pays 2:1, so it is worth it once more than a third of the
    /// unseen cards are tens. The index is an accept-if-either shortcut.
    fn should_buy_insurance(&self, _rule: &Rule, shoe: &Composition) -> bool {
        if self.true_count_floor >= INSURANCE_INDEX {
            return true;
        }
        if shoe.is_empty() {
            return false;
        }
        shoe.ten_value_count() as f64 / shoe.get_total() as f64 > 1.0 / 3.0
    }

    fn make_decision(
        &self,
        rule: &Rule,
        hand: &Hand,
        dealer_up_card: Rank,
        can_double: bool,
        can_split: bool,
    ) -> Decision {
        decide(
            hand,
            dealer_up_card,
            self.true_count_floor,
            rule,
            self.apply_indices,
            can_double,
            can_split,
        )
    }
}

/// The recommended action for a two-card hand with doubling and splitting
/// permitted.
pub fn advise(
    hand: (Rank, Rank),
    dealer_up_card: Rank,
    true_count_floor: i32,
    rule: &Rule,
    apply_indices: bool,
) -> Decision {
    let hand = Hand::from_cards(&[hand.0, hand.1]);
    decide(
        &hand,
        dealer_up_card,
        true_count_floor,
        rule,
        apply_indices,
        true,
        true,
    )
}

/// First match wins: surrender index, soft index, hard index, pair splitting,
/// then the basic chart (which base surrender may replace). A later layer never
/// overrides an index play.
pub fn decide(
    hand: &Hand,
    dealer_up_card: Rank,
    true_count_floor: i32,
    rule: &Rule,
    apply_indices: bool,
    can_double: bool,
    can_split: bool,
) -> Decision {
    let can_double = can_double && hand.len() == 2;

    if apply_indices {
        let deviation = surrender_index(hand, dealer_up_card, true_count_floor, rule)
            .or_else(|| {
                if hand.is_soft() {
                    soft_index(hand, dealer_up_card, true_count_floor, rule, can_double)
                } else {
                    hard_index(hand, dealer_up_card, true_count_floor, rule, can_double)
                }
            });
        if let Some(decision) = deviation {
            return decision;
        }
    }

    if can_split
        && hand.is_pair()
        && hand.get_split_depth() < MAX_SPLIT_DEPTH
        && BASIC_STRATEGY.should_split(hand.get_cards()[0], dealer_up_card, rule)
    {
        return Decision::Split;
    }

    let decision = BASIC_STRATEGY.make_decision(hand, dealer_up_card, rule, can_double);
    if base_surrender(hand, dealer_up_card, rule) {
        return Decision::Surrender;
    }
    decision
}

/// Late surrender is only offered on the original two cards, never after a
/// split, and never on a pair of eights.
fn surrender_allowed(hand: &Hand, rule: &Rule) -> bool {
    rule.allow_late_surrender
        && hand.len() == 2
        && hand.get_split_depth() == 0
        && !hand.is_soft()
        && !hand.is_pair_of(Rank::Eight)
}

fn base_surrender(hand: &Hand, dealer_up_card: Rank, rule: &Rule) -> bool {
    if !surrender_allowed(hand, rule) {
        return false;
    }
    let up = dealer_up_card.blackjack_value();
    match hand.get_actual_sum() {
        16 => up == 9 || up == 10 || up == 1,
        15 => up == 10,
        _ => false,
    }
}

/// Fab 4.
fn surrender_index(
    hand: &Hand,
    dealer_up_card: Rank,
    true_count_floor: i32,
    rule: &Rule,
) -> Option<Decision> {
    if !surrender_allowed(hand, rule) {
        return None;
    }
    let index = match (hand.get_actual_sum(), dealer_up_card.blackjack_value()) {
        (15, 10) => 0,
        (15, 9) => 2,
        (15, 1) => 1,
        (14, 10) => 3,
        _ => return None,
    };
    if true_count_floor >= index {
        Some(Decision::Surrender)
    } else {
        None
    }
}

/// A,8 against a 6 doubles from +1.
fn soft_index(
    hand: &Hand,
    dealer_up_card: Rank,
    true_count_floor: i32,
    rule: &Rule,
    can_double: bool,
) -> Option<Decision> {
    let total = hand.get_actual_sum();
    if total == 19
        && dealer_up_card.blackjack_value() == 6
        && can_double
        && rule.allows_double_on(total)
        && true_count_floor >= 1
    {
        return Some(Decision::Double);
    }
    None
}

#[derive(Debug, Clone, Copy)]
enum IndexPlay {
    StandAtOrAbove,
    DoubleAtOrAbove,
    HitBelow,
}

#[derive(Debug, Clone, Copy)]
struct Deviation {
    total: u8,
    dealer_up_card: u8, // Ace is 1.
    index: i32,
    play: IndexPlay,
}

const fn deviation(total: u8, dealer_up_card: u8, index: i32, play: IndexPlay) -> Deviation {
    Deviation {
        total,
        dealer_up_card,
        index,
        play,
    }
}

/// Illustrious 18 hard-total plays. The soft A,8 play and insurance complete
/// the set elsewhere.
const ILLUSTRIOUS_HARD: [Deviation; 16] = [
    deviation(16, 10, 0, IndexPlay::StandAtOrAbove),
    deviation(15, 10, 4, IndexPlay::StandAtOrAbove),
    deviation(10, 10, 4, IndexPlay::DoubleAtOrAbove),
    deviation(12, 3, 2, IndexPlay::StandAtOrAbove),
    deviation(12, 2, 3, IndexPlay::StandAtOrAbove),
    deviation(11, 1, 1, IndexPlay::DoubleAtOrAbove),
    deviation(9, 2, 1, IndexPlay::DoubleAtOrAbove),
    deviation(10, 1, 4, IndexPlay::DoubleAtOrAbove),
    deviation(9, 7, 3, IndexPlay::DoubleAtOrAbove),
    deviation(16, 9, 5, IndexPlay::StandAtOrAbove),
    deviation(13, 2, -1, IndexPlay::HitBelow),
    deviation(13, 3, -2, IndexPlay::HitBelow),
    deviation(12, 4, 0, IndexPlay::HitBelow),
    deviation(12, 5, -2, IndexPlay::HitBelow),
    deviation(12, 6, -1, IndexPlay::HitBelow),
    deviation(12, 7, 3, IndexPlay::StandAtOrAbove),
];

fn hard_index(
    hand: &Hand,
    dealer_up_card: Rank,
    true_count_floor: i32,
    rule: &Rule,
    can_double: bool,
) -> Option<Decision> {
    let total = hand.get_actual_sum();
    let up = dealer_up_card.blackjack_value();
    let entry = ILLUSTRIOUS_HARD
        .iter()
        .find(|entry| entry.total == total && entry.dealer_up_card == up)?;

    match entry.play {
        IndexPlay::StandAtOrAbove if true_count_floor >= entry.index => Some(Decision::Stand),
        IndexPlay::DoubleAtOrAbove
            if can_double && rule.allows_double_on(total) && true_count_floor >= entry.index =>
        {
            Some(Decision::Double)
        }
        IndexPlay::HitBelow if true_count_floor < entry.index => Some(Decision::Hit),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PairPlay {
    Split,
    SplitWithDas,
    Keep,
}

/// Multi-deck basic strategy charts. Columns are the dealer up card from Ace
/// to Ten. A cell holds the play and the fallback when doubling is not
/// allowed.
struct BasicStrategy {
    hard_charts: [[(Decision, Decision); 10]; 10],
    soft_charts: [[(Decision, Decision); 10]; 8],
    pair_charts: [[PairPlay; 10]; 10],
}

static BASIC_STRATEGY: BasicStrategy = BasicStrategy::new();

impl BasicStrategy {
    const fn new() -> BasicStrategy {
        const H: (Decision, Decision) = (Decision::Hit, Decision::Hit);
        const S: (Decision, Decision) = (Decision::Stand, Decision::Stand);
        const DH: (Decision, Decision) = (Decision::Double, Decision::Hit);
        const P: PairPlay = PairPlay::Split;
        const PD: PairPlay = PairPlay::SplitWithDas;
        const N: PairPlay = PairPlay::Keep;

        BasicStrategy {
            hard_charts: [
                [H, H, H, H, H, H, H, H, H, H], // 8 or less
                [H, H, DH, DH, DH, DH, H, H, H, H],
                [H, DH, DH, DH, DH, DH, DH, DH, DH, H],
                [H, DH, DH, DH, DH, DH, DH, DH, DH, DH],
                [H, H, H, S, S, S, H, H, H, H], // 12
                [H, S, S, S, S, S, H, H, H, H],
                [H, S, S, S, S, S, H, H, H, H],
                [H, S, S, S, S, S, H, H, H, H],
                [H, S, S, S, S, S, H, H, H, H], // 16
                [S, S, S, S, S, S, S, S, S, S], // 17 and more
            ],
            soft_charts: [
                [H, H, H, H, H, H, H, H, H, H], // Ace + Ace
                [H, H, H, H, DH, DH, H, H, H, H],
                [H, H, H, H, DH, DH, H, H, H, H],
                [H, H, H, DH, DH, DH, H, H, H, H],
                [H, H, H, DH, DH, DH, H, H, H, H],
                [H, H, H, DH, DH, DH, H, H, H, H],
                [H, S, DH, DH, DH, DH, S, S, H, H], // Ace + 7
                [S, S, S, S, S, S, S, S, S, S],     // 19 and more
            ],
            pair_charts: [
                [P, P, P, P, P, P, P, P, P, P], // Double Ace
                [N, PD, PD, P, P, P, P, N, N, N], // Double 2
                [N, PD, PD, P, P, P, P, N, N, N],
                [N, N, N, N, PD, PD, N, N, N, N],
                [N, N, N, N, N, N, N, N, N, N],
                [N, PD, P, P, P, P, N, N, N, N],
                [N, P, P, P, P, P, PD, N, N, N],
                [P, P, P, P, P, P, P, P, P, P],
                [N, P, P, P, P, P, N, P, P, N],
                [N, N, N, N, N, N, N, N, N, N], // Double 10
            ],
        }
    }

    fn should_split(&self, card: Rank, dealer_up_card: Rank, rule: &Rule) -> bool {
        let row = (card.blackjack_value() - 1) as usize;
        let col = (dealer_up_card.blackjack_value() - 1) as usize;
        match self.pair_charts[row][col] {
            PairPlay::Split => true,
            PairPlay::SplitWithDas => rule.allow_das,
            PairPlay::Keep => false,
        }
    }

    fn make_decision(
        &self,
        hand: &Hand,
        dealer_up_card: Rank,
        rule: &Rule,
        can_double: bool,
    ) -> Decision {
        let col = (dealer_up_card.blackjack_value() - 1) as usize;
        let total = hand.get_actual_sum();

        let decision = if hand.is_soft() {
            let row = (total.clamp(12, 19) - 12) as usize;
            self.soft_charts[row][col]
        } else {
            let row = (total.clamp(8, 17) - 8) as usize;
            self.hard_charts[row][col]
        };

        match decision.0 {
            Decision::Double if !(can_double && rule.allows_double_on(total)) => decision.1,
            _ => decision.0,
        }
    }
}
