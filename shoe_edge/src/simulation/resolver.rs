use rand::Rng;

use super::hand::Hand;
use super::shoe::DrawPile;
use crate::{Rank, Rule};

/// Whether an up card and a hole card make a dealer natural.
pub fn is_dealer_natural(dealer_up_card: Rank, dealer_hole_card: Rank) -> bool {
    Hand::from_cards(&[dealer_up_card, dealer_hole_card]).is_natural()
}

/// Draws for the dealer until the rules make her stand. Returns the final
/// total, which is above 21 when she busts.
pub fn dealer_play<R: Rng + ?Sized>(
    dealer: &mut Hand,
    pile: &mut DrawPile,
    rule: &Rule,
    rng: &mut R,
) -> u8 {
    loop {
        let actual_sum = dealer.get_actual_sum();
        let must_hit = actual_sum < 17
            || (actual_sum == 17 && dealer.is_soft() && rule.dealer_hit_on_soft17);
        if !must_hit {
            return actual_sum;
        }
        dealer.receive_card(pile.deal(rng));
    }
}

/// +1, 0 or -1 per unit for a standing player total against a finished dealer.
fn compare(player_total: u8, dealer_total: u8) -> f64 {
    if dealer_total > 21 || player_total > dealer_total {
        1.0
    } else if player_total < dealer_total {
        -1.0
    } else {
        0.0
    }
}

/// Settles one player hand. Shorthand for `settle_hands` with a single hand.
pub fn resolve<R: Rng + ?Sized>(
    player: &Hand,
    dealer_up_card: Rank,
    dealer_hole_card: Rank,
    pile: &mut DrawPile,
    rule: &Rule,
    rng: &mut R,
) -> f64 {
    settle_hands(
        std::slice::from_ref(player),
        dealer_up_card,
        dealer_hole_card,
        pile,
        rule,
        rng,
    )
}

/// Settles every hand the player ended the round with against one dealer
/// play, in units of the original bet.
///
/// Without a hole card the dealer natural is only discovered here. Every stake
/// is then lost, unless original bets only limits the loss to one unit.
/// Busted hands lose their stake whatever the dealer does, and the dealer does
/// not draw if nothing is left to beat.
pub fn settle_hands<R: Rng + ?Sized>(
    hands: &[Hand],
    dealer_up_card: Rank,
    dealer_hole_card: Rank,
    pile: &mut DrawPile,
    rule: &Rule,
    rng: &mut R,
) -> f64 {
    if !rule.dealer_peeks() && is_dealer_natural(dealer_up_card, dealer_hole_card) {
        if rule.original_bets_only {
            return -1.0;
        }
        return -hands.iter().map(|hand| hand.stake()).sum::<f64>();
    }

    let dealer_total = if hands.iter().any(|hand| !hand.bust()) {
        let mut dealer = Hand::from_cards(&[dealer_up_card, dealer_hole_card]);
        dealer_play(&mut dealer, pile, rule, rng)
    } else {
        0
    };

    hands
        .iter()
        .map(|hand| {
            if hand.bust() {
                -hand.stake()
            } else {
                compare(hand.get_actual_sum(), dealer_total) * hand.stake()
            }
        })
        .sum()
}

/// Settles a two-card hand that stands at once. The result is always -1, 0 or
/// +1: nothing was doubled, so original bets only makes no difference.
pub fn resolve_stand_only<R: Rng + ?Sized>(
    player: &Hand,
    dealer_up_card: Rank,
    dealer_hole_card: Rank,
    pile: &mut DrawPile,
    rule: &Rule,
    rng: &mut R,
) -> f64 {
    if !rule.dealer_peeks() && is_dealer_natural(dealer_up_card, dealer_hole_card) {
        return -1.0;
    }
    if player.bust() {
        return -1.0;
    }
    let mut dealer = Hand::from_cards(&[dealer_up_card, dealer_hole_card]);
    let dealer_total = dealer_play(&mut dealer, pile, rule, rng);
    compare(player.get_actual_sum(), dealer_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Composition, PeekPolicy};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn get_typical_rule() -> Rule {
        Rule::default()
    }

    fn pile_of(rank: Rank, count: u16) -> DrawPile {
        let mut counts = [0; 13];
        counts[rank.index()] = count;
        DrawPile::new(Composition::new(&counts))
    }

    #[test]
    fn dealer_soft_seventeen() {
        let mut rng = StdRng::seed_from_u64(0);
        let rule = get_typical_rule();
        let mut pile = pile_of(Rank::Two, 4);
        let mut dealer = Hand::from_cards(&[Rank::Ace, Rank::Six]);
        assert_eq!(dealer_play(&mut dealer, &mut pile, &rule, &mut rng), 19);

        let stand_soft17 = Rule {
            dealer_hit_on_soft17: false,
            ..rule
        };
        let mut pile = pile_of(Rank::Two, 4);
        let mut dealer = Hand::from_cards(&[Rank::Ace, Rank::Six]);
        assert_eq!(
            dealer_play(&mut dealer, &mut pile, &stand_soft17, &mut rng),
            17
        );
        assert_eq!(pile.get_composition().get_total(), 4);
    }

    #[test]
    fn dealer_busts_on_stiff() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pile = pile_of(Rank::King, 4);
        let mut dealer = Hand::from_cards(&[Rank::Ten, Rank::Six]);
        assert_eq!(
            dealer_play(&mut dealer, &mut pile, &get_typical_rule(), &mut rng),
            26
        );
    }

    #[test]
    fn doubled_hand_settles_double_stake() {
        let mut rng = StdRng::seed_from_u64(0);
        let rule = get_typical_rule();
        let mut player = Hand::from_cards(&[Rank::Six, Rank::Five, Rank::King]);
        player.double_down();

        // Dealer 7 + T stands on 17.
        let mut pile = pile_of(Rank::Two, 4);
        let result = resolve(&player, Rank::Seven, Rank::Ten, &mut pile, &rule, &mut rng);
        assert_eq!(result, 2.0);

        let mut busted = Hand::from_cards(&[Rank::Six, Rank::Five, Rank::King, Rank::King]);
        busted.double_down();
        let result = resolve(&busted, Rank::Seven, Rank::Ten, &mut pile, &rule, &mut rng);
        assert_eq!(result, -2.0);
    }

    #[test]
    fn no_hole_card_natural_takes_stakes() {
        let mut rng = StdRng::seed_from_u64(0);
        let rule = Rule {
            peek_policy: PeekPolicy::NoHoleCard,
            ..get_typical_rule()
        };
        let mut doubled = Hand::from_cards(&[Rank::Five, Rank::Six, Rank::Nine]);
        doubled.double_down();
        let hands = [doubled, Hand::from_cards(&[Rank::Eight, Rank::Ten])];
        let mut pile = pile_of(Rank::Two, 4);
        assert_eq!(
            settle_hands(&hands, Rank::Ace, Rank::King, &mut pile, &rule, &mut rng),
            -3.0
        );

        let obo = Rule {
            original_bets_only: true,
            ..rule
        };
        assert_eq!(
            settle_hands(&hands, Rank::Ace, Rank::King, &mut pile, &obo, &mut rng),
            -1.0
        );
        assert_eq!(
            resolve_stand_only(&hands[1], Rank::Ace, Rank::King, &mut pile, &rule, &mut rng),
            -1.0
        );
    }

    #[test]
    fn dealer_skips_drawing_when_every_hand_busted() {
        let mut rng = StdRng::seed_from_u64(0);
        let hands = [
            Hand::from_cards(&[Rank::Ten, Rank::Six, Rank::King]),
            Hand::from_cards(&[Rank::Ten, Rank::Five, Rank::Nine]),
        ];
        let mut pile = pile_of(Rank::Two, 4);
        let result = settle_hands(
            &hands,
            Rank::Six,
            Rank::Two,
            &mut pile,
            &get_typical_rule(),
            &mut rng,
        );
        assert_eq!(result, -2.0);
        assert_eq!(pile.get_composition().get_total(), 4);
    }

    #[test]
    fn split_hands_share_one_dealer_play() {
        let mut rng = StdRng::seed_from_u64(0);
        // Dealer 6 + T draws a single Two: 18.
        let hands = [
            Hand::from_cards(&[Rank::Eight, Rank::Ten]),
            Hand::from_cards(&[Rank::Eight, Rank::Ace]),
            Hand::from_cards(&[Rank::Eight, Rank::Nine, Rank::Two]),
        ];
        let mut pile = pile_of(Rank::Two, 4);
        let result = settle_hands(
            &hands,
            Rank::Six,
            Rank::Ten,
            &mut pile,
            &get_typical_rule(),
            &mut rng,
        );
        assert_eq!(result, 2.0);
        assert_eq!(pile.get_composition().get_total(), 3);
    }

    #[test]
    fn stand_only_is_single_unit() {
        let mut rng = StdRng::seed_from_u64(0);
        let rule = get_typical_rule();
        let player = Hand::from_cards(&[Rank::Ten, Rank::Nine]);
        let mut pile = pile_of(Rank::King, 8);
        assert_eq!(
            resolve_stand_only(&player, Rank::Six, Rank::Ten, &mut pile, &rule, &mut rng),
            1.0
        );
        assert_eq!(
            resolve_stand_only(&player, Rank::Nine, Rank::Ten, &mut pile, &rule, &mut rng),
            0.0
        );
        assert_eq!(
            resolve_stand_only(&player, Rank::Ten, Rank::Ten, &mut pile, &rule, &mut rng),
            -1.0
        );
        assert!(is_dealer_natural(Rank::Queen, Rank::Ace));
        assert!(!is_dealer_natural(Rank::Nine, Rank::Ace));
    }
}
