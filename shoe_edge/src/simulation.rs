pub mod hand;
pub mod resolver;
pub mod shoe;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shoe_edge_macros::requires_cards;

use crate::strategy::{self, CountingStrategy, Strategy};
use crate::worker::CancelToken;
use crate::{
    Composition, Decision, EngineError, InitialSituation, Rank, Rule, MAX_SPLIT_DEPTH,
    MIN_SIMULATION_CARDS,
};

use self::hand::Hand;
use self::resolver::{is_dealer_natural, resolve_stand_only, settle_hands};
use self::shoe::DrawPile;

/// Hands between two checks of the cancellation flag.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// A variance below this is treated as this, so Kelly sizing never divides by
/// zero.
pub const MIN_VARIANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub number_of_hands: u64,
    pub seed: u64,
    /// The true count the strategy plays at for every simulated hand.
    pub true_count_floor: i32,
    pub apply_indices: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationResult {
    /// Mean result per initial unit bet, in percent.
    pub mean_ev_percent: f64,
    /// Per-hand variance in squared units, never below `MIN_VARIANCE`.
    pub variance: f64,
    pub number_of_hands: u64,
    pub seed: u64,
    /// How many draws found the pile empty and were served a ten instead.
    pub exhausted_draws: u64,
}

impl SimulationResult {
    /// Standard error of `mean_ev_percent`.
    pub fn standard_error_percent(&self) -> f64 {
        (self.variance / self.number_of_hands as f64).sqrt() * 100.0
    }
}

/// Plays the remaining composition out one independent hand at a time. Every
/// hand is dealt from a fresh copy of the composition, so hands never deplete
/// each other.
#[derive(Debug, Clone)]
pub struct MonteCarlo {
    rule: Rule,
    composition: Composition,
}

impl MonteCarlo {
    pub fn new(rule: &Rule, composition: &Composition) -> Self {
        MonteCarlo {
            rule: *rule,
            composition: *composition,
        }
    }

    pub fn get_composition(&self) -> &Composition {
        &self.composition
    }

    /// Estimates the expected value of a hand played with the counting
    /// strategy, insurance included. Identical inputs and seed give an
    /// identical result.
    #[requires_cards(MIN_SIMULATION_CARDS)]
    pub fn run(
        &self,
        params: &SimulationParams,
        cancel: &CancelToken,
    ) -> Result<SimulationResult, EngineError> {
        if params.number_of_hands == 0 {
            return Err(EngineError::NoHands);
        }
        info!(
            "Simulating {} hands from {} cards at true count {} (seed {})",
            params.number_of_hands,
            self.composition.get_total(),
            params.true_count_floor,
            params.seed
        );
        let strategy = CountingStrategy::new(params.true_count_floor, params.apply_indices);
        let result = self.accumulate(params, cancel, |rng, exhausted_draws| {
            let mut pile = DrawPile::new(self.composition);
            let result = play_hand(&mut pile, &self.rule, &strategy, rng);
            *exhausted_draws += pile.get_exhausted_draws() as u64;
            result
        })?;
        info!(
            "Mean EV {:+.3}% (variance {:.4})",
            result.mean_ev_percent, result.variance
        );
        Ok(result)
    }

    /// Estimates the expected value of one known starting hand when the first
    /// action is forced. Later actions, and all actions on split hands, follow
    /// the counting strategy. Insurance is never taken.
    ///
    /// The player cards and the up card are removed from the composition if it
    /// still holds them. An illegal forced action falls back to the strategy's
    /// own choice.
    #[requires_cards(MIN_SIMULATION_CARDS)]
    pub fn run_forced(
        &self,
        hand: (Rank, Rank),
        dealer_up_card: Rank,
        forced: Decision,
        params: &SimulationParams,
        cancel: &CancelToken,
    ) -> Result<SimulationResult, EngineError> {
        if params.number_of_hands == 0 {
            return Err(EngineError::NoHands);
        }
        let mut shoe = DrawPile::new(self.composition);
        shoe.discard(hand.0);
        shoe.discard(hand.1);
        shoe.discard(dealer_up_card);
        let shoe = *shoe.get_composition();

        let strategy = CountingStrategy::new(params.true_count_floor, params.apply_indices);
        let player = Hand::from_cards(&[hand.0, hand.1]);
        let forced = is_legal_first_action(&player, forced, &self.rule).then_some(forced);
        debug!(
            "Forcing {:?} on {}{} against {}",
            forced, hand.0, hand.1, dealer_up_card
        );

        self.accumulate(params, cancel, |rng, exhausted_draws| {
            let mut pile = DrawPile::new(shoe);
            let dealer_hole_card = pile.deal(rng);
            let result = play_dealt_hand(
                player.clone(),
                dealer_up_card,
                dealer_hole_card,
                &mut pile,
                &self.rule,
                &strategy,
                rng,
                forced,
            );
            *exhausted_draws += pile.get_exhausted_draws() as u64;
            result
        })
    }

    /// Runs `play_one` for every hand and folds the per-hand results into
    /// a mean and variance.
    fn accumulate<F>(
        &self,
        params: &SimulationParams,
        cancel: &CancelToken,
        mut play_one: F,
    ) -> Result<SimulationResult, EngineError>
    where
        F: FnMut(&mut StdRng, &mut u64) -> f64,
    {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut exhausted_draws = 0;
        let mut sum = 0.0;
        let mut sum_of_squares = 0.0;
        for i in 0..params.number_of_hands {
            if i % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            let result = play_one(&mut rng, &mut exhausted_draws);
            sum += result;
            sum_of_squares += result * result;
        }

        if exhausted_draws > 0 {
            warn!(
                "The pile ran empty {} times; tens were dealt in place of the missing cards",
                exhausted_draws
            );
        }
        let n = params.number_of_hands as f64;
        let mean = sum / n;
        let variance = (sum_of_squares / n - mean * mean).max(MIN_VARIANCE);
        Ok(SimulationResult {
            mean_ev_percent: mean * 100.0,
            variance,
            number_of_hands: params.number_of_hands,
            seed: params.seed,
            exhausted_draws,
        })
    }

    /// Every legal first action for the hand, each simulated from the same
    /// seed so that the differences between them are not swamped by noise.
    pub fn compare_actions(
        &self,
        hand: (Rank, Rank),
        dealer_up_card: Rank,
        params: &SimulationParams,
        cancel: &CancelToken,
    ) -> Result<Comparison, EngineError> {
        let actions = available_actions(hand, &self.rule);
        let mut results = Vec::with_capacity(actions.len());
        for action in actions {
            let result = self.run_forced(hand, dealer_up_card, action, params, cancel)?;
            results.push((action, result.mean_ev_percent));
        }
        let recommended = strategy::advise(
            hand,
            dealer_up_card,
            params.true_count_floor,
            &self.rule,
            params.apply_indices,
        );
        Ok(Comparison {
            results,
            recommended,
        })
    }
}

/// Simulated EV of each legal first action for one starting hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// In the order of `available_actions`.
    pub results: Vec<(Decision, f64)>,
    /// What the strategy itself would play.
    pub recommended: Decision,
}

impl Comparison {
    /// The action with the highest simulated EV. Ties keep the earlier action.
    pub fn best(&self) -> Option<(Decision, f64)> {
        self.results.iter().copied().fold(None, |best, candidate| match best {
            Some((_, ev)) if ev >= candidate.1 => best,
            _ => Some(candidate),
        })
    }
}

/// Stand and hit are always offered; double only where the rule allows it on
/// this total; split only for a pair; surrender only under late surrender, and
/// never for a pair of eights.
pub fn available_actions(hand: (Rank, Rank), rule: &Rule) -> Vec<Decision> {
    let player = Hand::from_cards(&[hand.0, hand.1]);
    let mut actions = vec![Decision::Stand, Decision::Hit];
    if rule.allows_double_on(player.get_actual_sum()) {
        actions.push(Decision::Double);
    }
    if player.is_pair() {
        actions.push(Decision::Split);
    }
    if rule.allow_late_surrender && !player.is_pair_of(Rank::Eight) {
        actions.push(Decision::Surrender);
    }
    actions
}

fn is_legal_first_action(player: &Hand, action: Decision, rule: &Rule) -> bool {
    match action {
        Decision::Stand | Decision::Hit => true,
        Decision::Double => rule.allows_double_on(player.get_actual_sum()),
        Decision::Split => player.is_pair(),
        Decision::Surrender => rule.allow_late_surrender && !player.is_pair_of(Rank::Eight),
    }
}

/// Simulates with the counting strategy on a copy of `composition`.
pub fn simulate(
    composition: &Composition,
    rule: &Rule,
    params: &SimulationParams,
) -> Result<SimulationResult, EngineError> {
    MonteCarlo::new(rule, composition).run(params, &CancelToken::new())
}

/// Simulates one starting hand with its first action forced.
pub fn simulate_forced(
    situation: &InitialSituation,
    forced: Decision,
    rule: &Rule,
    params: &SimulationParams,
) -> Result<SimulationResult, EngineError> {
    MonteCarlo::new(rule, situation.get_shoe()).run_forced(
        situation.get_hand_cards(),
        situation.get_dealer_up_card(),
        forced,
        params,
        &CancelToken::new(),
    )
}

/// Deals and plays one full hand: player, up card, player, hole card.
/// Insurance is offered when the dealer peeks under an Ace.
fn play_hand<S: Strategy, R: Rng + ?Sized>(
    pile: &mut DrawPile,
    rule: &Rule,
    strategy: &S,
    rng: &mut R,
) -> f64 {
    let first = pile.deal(rng);
    let dealer_up_card = pile.deal(rng);
    let second = pile.deal(rng);
    let dealer_hole_card = pile.deal(rng);
    let player = Hand::from_cards(&[first, second]);

    let insurance = if dealer_up_card == Rank::Ace
        && rule.dealer_peeks()
        && strategy.should_buy_insurance(rule, pile.get_composition())
    {
        // Half a unit at 2:1.
        if is_dealer_natural(dealer_up_card, dealer_hole_card) {
            1.0
        } else {
            -0.5
        }
    } else {
        0.0
    };

    insurance
        + play_dealt_hand(
            player,
            dealer_up_card,
            dealer_hole_card,
            pile,
            rule,
            strategy,
            rng,
            None,
        )
}

/// Settles naturals, then lets the player act and the dealer finish.
#[allow(clippy::too_many_arguments)]
fn play_dealt_hand<S: Strategy, R: Rng + ?Sized>(
    player: Hand,
    dealer_up_card: Rank,
    dealer_hole_card: Rank,
    pile: &mut DrawPile,
    rule: &Rule,
    strategy: &S,
    rng: &mut R,
    forced: Option<Decision>,
) -> f64 {
    let dealer_natural = is_dealer_natural(dealer_up_card, dealer_hole_card);
    if rule.dealer_peeks() && dealer_natural {
        return if player.is_natural() { 0.0 } else { -1.0 };
    }
    if player.is_natural() {
        return if dealer_natural {
            0.0
        } else {
            rule.blackjack_payout.ratio()
        };
    }

    let first_decision = match forced {
        Some(decision) => decision,
        None => strategy.make_decision(rule, &player, dealer_up_card, true, true),
    };
    if first_decision == Decision::Surrender {
        return -0.5;
    }
    if forced == Some(Decision::Stand) {
        return resolve_stand_only(&player, dealer_up_card, dealer_hole_card, pile, rule, rng);
    }
    if rule.original_bets_only_applies() && dealer_natural {
        return -1.0;
    }

    let mut pending = vec![PendingHand {
        hand: player,
        can_double: true,
        can_split: true,
        split_aces: false,
        first_decision: Some(first_decision),
    }];
    let mut finished = Vec::with_capacity(4);
    while let Some(next) = pending.pop() {
        let hand = play_pending(next, dealer_up_card, pile, rule, strategy, rng, &mut pending);
        if let Some(hand) = hand {
            finished.push(hand);
        }
    }
    settle_hands(&finished, dealer_up_card, dealer_hole_card, pile, rule, rng)
}

/// A hand waiting to be played, with what the rules still allow on it.
#[derive(Debug)]
struct PendingHand {
    hand: Hand,
    can_double: bool,
    can_split: bool,
    split_aces: bool,
    first_decision: Option<Decision>,
}

/// Plays one hand to completion. Returns None when the hand was split: its
/// halves are pushed onto `pending` instead.
fn play_pending<S: Strategy, R: Rng + ?Sized>(
    next: PendingHand,
    dealer_up_card: Rank,
    pile: &mut DrawPile,
    rule: &Rule,
    strategy: &S,
    rng: &mut R,
    pending: &mut Vec<PendingHand>,
) -> Option<Hand> {
    let PendingHand {
        mut hand,
        can_double,
        can_split,
        split_aces,
        mut first_decision,
    } = next;
    if hand.len() == 1 {
        hand.receive_card(pile.deal(rng));
    }
    let can_split_further = |hand: &Hand| {
        can_split && hand.is_pair() && hand.get_split_depth() < MAX_SPLIT_DEPTH
    };

    // Split Aces that cannot be hit take one card each and stand.
    if split_aces && !rule.hit_split_aces {
        if can_split_further(&hand)
            && strategy.make_decision(rule, &hand, dealer_up_card, false, true) == Decision::Split
        {
            split(hand, rule, pending);
            return None;
        }
        if rule.double_on_split_aces {
            hand.double_down();
        }
        return Some(hand);
    }

    loop {
        if hand.get_actual_sum() >= 21 {
            return Some(hand);
        }
        let two_cards = hand.len() == 2;
        let decision = match first_decision.take() {
            Some(decision) => decision,
            None => strategy.make_decision(
                rule,
                &hand,
                dealer_up_card,
                can_double && two_cards,
                can_split_further(&hand),
            ),
        };
        match decision {
            Decision::Hit => hand.receive_card(pile.deal(rng)),
            Decision::Double if can_double && two_cards => {
                hand.double_down();
                hand.receive_card(pile.deal(rng));
                return Some(hand);
            }
            Decision::Double => hand.receive_card(pile.deal(rng)),
            Decision::Split if can_split_further(&hand) => {
                split(hand, rule, pending);
                return None;
            }
            Decision::Split => {
                let fallback = strategy.make_decision(
                    rule,
                    &hand,
                    dealer_up_card,
                    can_double && two_cards,
                    false,
                );
                first_decision = Some(if fallback == Decision::Split {
                    Decision::Stand
                } else {
                    fallback
                });
            }
            // Surrender is only available on the original two cards.
            Decision::Stand | Decision::Surrender => return Some(hand),
        }
    }
}

/// Pushes both halves of a pair so that the left half is played first.
fn split(hand: Hand, rule: &Rule, pending: &mut Vec<PendingHand>) {
    let split_depth = hand.get_split_depth() + 1;
    let aces = hand.is_pair_of(Rank::Ace);
    for &card in hand.get_cards().iter().rev() {
        pending.push(PendingHand {
            hand: Hand::split_from(card, split_depth),
            can_double: if aces {
                rule.double_on_split_aces
            } else {
                rule.allow_das
            },
            can_split: !aces || rule.resplit_aces,
            split_aces: aces,
            first_decision: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DoublePolicy, PeekPolicy};

    fn get_typical_rule() -> Rule {
        Rule::default()
    }

    fn get_typical_params(number_of_hands: u64) -> SimulationParams {
        SimulationParams {
            number_of_hands,
            seed: 42,
            true_count_floor: 0,
            apply_indices: false,
        }
    }

    fn only(rank: Rank, count: u16) -> Composition {
        let mut counts = [0; 13];
        counts[rank.index()] = count;
        Composition::new(&counts)
    }

    fn play_fixed(
        player: (Rank, Rank),
        dealer_up_card: Rank,
        dealer_hole_card: Rank,
        pile: Composition,
        rule: &Rule,
    ) -> f64 {
        let mut pile = DrawPile::new(pile);
        let mut rng = StdRng::seed_from_u64(0);
        play_dealt_hand(
            Hand::from_cards(&[player.0, player.1]),
            dealer_up_card,
            dealer_hole_card,
            &mut pile,
            rule,
            &CountingStrategy::new(0, false),
            &mut rng,
            None,
        )
    }

    #[test]
    fn same_seed_same_result() {
        let composition = Composition::with_number_of_decks(6);
        let rule = get_typical_rule();
        let params = get_typical_params(20_000);
        let first = simulate(&composition, &rule, &params).unwrap();
        let second = simulate(&composition, &rule, &params).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.number_of_hands, 20_000);
        assert_eq!(first.exhausted_draws, 0);
    }

    #[test]
    fn full_shoe_edge_is_near_zero() {
        let composition = Composition::with_number_of_decks(6);
        let params = get_typical_params(200_000);
        let result = simulate(&composition, &get_typical_rule(), &params).unwrap();
        // Basic strategy in a six-deck H17 game gives up roughly half a percent.
        assert!(result.mean_ev_percent > -3.0 && result.mean_ev_percent < 2.0);
        assert!(result.variance > 1.0 && result.variance < 2.0);
        assert!(result.standard_error_percent() < 0.5);
    }

    #[test]
    fn rejects_small_shoes_and_zero_hands() {
        let rule = get_typical_rule();
        let small = only(Rank::Seven, 19);
        assert_eq!(
            simulate(&small, &rule, &get_typical_params(100)),
            Err(EngineError::InsufficientShoe {
                remaining: 19,
                required: MIN_SIMULATION_CARDS
            })
        );
        let composition = Composition::with_number_of_decks(1);
        assert_eq!(
            simulate(&composition, &rule, &get_typical_params(0)),
            Err(EngineError::NoHands)
        );
    }

    #[test]
    fn cancelled_run_reports_cancellation() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let composition = Composition::with_number_of_decks(2);
        let simulator = MonteCarlo::new(&get_typical_rule(), &composition);
        assert_eq!(
            simulator.run(&get_typical_params(10_000), &cancel),
            Err(EngineError::Cancelled)
        );
    }

    #[test]
    fn naturals() {
        let rule = get_typical_rule();
        let pile = only(Rank::Two, 30);
        let payout = play_fixed((Rank::Ace, Rank::King), Rank::Nine, Rank::Seven, pile, &rule);
        assert_eq!(payout, 1.5);

        let six_to_five = Rule {
            blackjack_payout: crate::BlackjackPayout::SixToFive,
            ..rule
        };
        let payout = play_fixed(
            (Rank::Ace, Rank::King),
            Rank::Nine,
            Rank::Seven,
            pile,
            &six_to_five,
        );
        assert_eq!(payout, 1.2);

        // Peeked dealer natural against a natural pushes, against anything else
        // loses one unit.
        assert_eq!(
            play_fixed((Rank::Ace, Rank::Ten), Rank::Ace, Rank::Queen, pile, &rule),
            0.0
        );
        assert_eq!(
            play_fixed((Rank::Ten, Rank::Ten), Rank::Ace, Rank::Queen, pile, &rule),
            -1.0
        );

        let no_hole_card = Rule {
            peek_policy: PeekPolicy::NoHoleCard,
            ..rule
        };
        assert_eq!(
            play_fixed((Rank::Ace, Rank::Ten), Rank::Ace, Rank::Queen, pile, &no_hole_card),
            0.0
        );
    }

    #[test]
    fn split_aces_without_hitting_are_doubled() {
        // Every card left is a ten, so each split Ace makes 21 against the
        // dealer's 17.
        let pile = only(Rank::King, 40);
        let rule = get_typical_rule();
        let result = play_fixed((Rank::Ace, Rank::Ace), Rank::Seven, Rank::Ten, pile, &rule);
        assert_eq!(result, 4.0);

        let single_stake = Rule {
            double_on_split_aces: false,
            ..rule
        };
        let result = play_fixed(
            (Rank::Ace, Rank::Ace),
            Rank::Seven,
            Rank::Ten,
            pile,
            &single_stake,
        );
        assert_eq!(result, 2.0);
    }

    #[test]
    fn split_aces_resplit_up_to_the_limit() {
        // Only Aces remain: every split hand pairs again until the depth limit.
        let pile = only(Rank::Ace, 40);
        let rule = Rule {
            double_on_split_aces: false,
            ..get_typical_rule()
        };
        // Dealer 7 + T is 17. Each final hand is A,A: soft 12, which loses.
        let result = play_fixed((Rank::Ace, Rank::Ace), Rank::Seven, Rank::Ten, pile, &rule);
        assert_eq!(result, -8.0);

        let no_resplit = Rule {
            resplit_aces: false,
            ..rule
        };
        let result = play_fixed(
            (Rank::Ace, Rank::Ace),
            Rank::Seven,
            Rank::Ten,
            pile,
            &no_resplit,
        );
        assert_eq!(result, -2.0);
    }

    #[test]
    fn original_bets_only_caps_the_loss() {
        let pile = only(Rank::Five, 40);
        let rule = Rule {
            peek_policy: PeekPolicy::NoHoleCard,
            ..get_typical_rule()
        };
        // 8,8 splits against the Ace, then the dealer natural takes both stakes.
        let all_stakes =
            play_fixed((Rank::Eight, Rank::Eight), Rank::Ace, Rank::King, pile, &rule);
        assert_eq!(all_stakes, -2.0);

        let obo = Rule {
            original_bets_only: true,
            ..rule
        };
        let capped = play_fixed((Rank::Eight, Rank::Eight), Rank::Ace, Rank::King, pile, &obo);
        assert_eq!(capped, -1.0);
    }

    #[test]
    fn surrender_costs_half() {
        let pile = only(Rank::Two, 30);
        let result = play_fixed(
            (Rank::Ten, Rank::Six),
            Rank::Ace,
            Rank::Seven,
            pile,
            &get_typical_rule(),
        );
        assert_eq!(result, -0.5);
    }

    #[test]
    fn comparison_covers_legal_actions() {
        let rule = get_typical_rule();
        assert_eq!(
            available_actions((Rank::Eight, Rank::Eight), &rule),
            vec![Decision::Stand, Decision::Hit, Decision::Double, Decision::Split]
        );
        let no_surrender = Rule {
            allow_late_surrender: false,
            ..rule
        };
        assert_eq!(
            available_actions((Rank::Ten, Rank::Six), &no_surrender),
            vec![Decision::Stand, Decision::Hit, Decision::Double]
        );

        let simulator = MonteCarlo::new(&rule, &Composition::with_number_of_decks(6));
        let comparison = simulator
            .compare_actions(
                (Rank::Ten, Rank::Six),
                Rank::Ten,
                &get_typical_params(2_000),
                &CancelToken::new(),
            )
            .unwrap();
        assert_eq!(comparison.results.len(), 4);
        assert_eq!(comparison.recommended, Decision::Surrender);
        // Late surrender: a peeked dealer natural still takes the whole unit.
        let (action, ev) = comparison.results[3];
        assert_eq!(action, Decision::Surrender);
        assert!(ev <= -50.0 && ev > -60.0);
        assert!(comparison.best().is_some());
    }

    #[test]
    fn double_is_offered_only_where_allowed() {
        let ten_eleven = Rule {
            double_policy: DoublePolicy::TenElevenOnly,
            allow_late_surrender: false,
            ..get_typical_rule()
        };
        assert_eq!(
            available_actions((Rank::Ten, Rank::Six), &ten_eleven),
            vec![Decision::Stand, Decision::Hit]
        );
        assert_eq!(
            available_actions((Rank::Five, Rank::Six), &ten_eleven),
            vec![Decision::Stand, Decision::Hit, Decision::Double]
        );

        let simulator = MonteCarlo::new(&ten_eleven, &Composition::with_number_of_decks(6));
        let comparison = simulator
            .compare_actions(
                (Rank::Ten, Rank::Six),
                Rank::Ten,
                &get_typical_params(2_000),
                &CancelToken::new(),
            )
            .unwrap();
        let actions: Vec<Decision> = comparison
            .results
            .iter()
            .map(|(action, _)| *action)
            .collect();
        assert_eq!(actions, vec![Decision::Stand, Decision::Hit]);
    }

    #[test]
    fn forced_stand_matches_stand_only_resolution() {
        let situation = InitialSituation::new(
            Composition::with_number_of_decks(1),
            (Rank::Ten, Rank::Nine),
            Rank::Six,
        );
        let rule = get_typical_rule();
        let result =
            simulate_forced(&situation, Decision::Stand, &rule, &get_typical_params(5_000))
                .unwrap();
        assert!(result.mean_ev_percent > 0.0);
        assert!(result.variance <= 1.0);
    }
}
