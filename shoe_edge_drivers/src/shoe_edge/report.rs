use shoe_edge::calibration::EorCalibration;
use shoe_edge::estimation::{kelly_fraction, CountRow, EdgeEstimator};
use shoe_edge::simulation::shoe::ShoeState;
use shoe_edge::simulation::{Comparison, SimulationResult};
use shoe_edge::{Decision, Rank};
use strum::IntoEnumIterator;

pub fn print_progress(shoe: &ShoeState, penetration: f64) {
    let progress = shoe.progress(penetration);
    println!(
        "Shoe progress: seen {}/{} | seen up to cut {}/{} (remaining up to cut: {})",
        shoe.history().len(),
        progress.total,
        progress.seen_to_cut,
        progress.cut,
        progress.remaining_to_cut
    );
    let seen = shoe.seen();
    let remaining = shoe.remaining();
    let header: Vec<String> = Rank::iter().map(|rank| format!("{:>3}", rank)).collect();
    let seen: Vec<String> = seen.iter().map(|(_, n)| format!("{:>3}", n)).collect();
    let remaining: Vec<String> = remaining.iter().map(|(_, n)| format!("{:>3}", n)).collect();
    println!("{:<10}{}", "", header.join(""));
    println!("{:<10}{}", "Seen", seen.join(""));
    println!("{:<10}{}", "Remaining", remaining.join(""));
}

pub fn print_table(estimator: &EdgeEstimator, rows: &[CountRow]) {
    println!("Base edge: {:+.2}%", estimator.base_edge());
    println!(
        "{:<10}{:>6}{:>8}{:>8}{:>9}{:>9}{:>11}",
        "System", "RC", "TC", "Floor", "TC float", "EV", "Insurance"
    );
    for row in rows {
        let insurance = match row.insurance_roi {
            Some(roi) => format!("{:+.2}%", roi),
            None => String::from("-"),
        };
        println!(
            "{:<10}{:>+6}{:>+8}{:>+8}{:>+9.2}{:>+8.2}%{:>11}",
            row.system.name(),
            row.running_count,
            row.true_count_trunc,
            row.true_count_floor,
            row.true_count_float,
            row.display_ev,
            insurance
        );
    }
}

pub fn print_advice(hand: (Rank, Rank), up: Rank, true_count_floor: i32, decision: Decision) {
    println!(
        "{}{} against {} at true count {:+}: {}",
        hand.0, hand.1, up, true_count_floor, decision
    );
}

pub fn print_simulation(result: &SimulationResult) {
    println!(
        "Simulated EV: {:+.2}% ± {:.2} (variance {:.3}, hands {}, seed {})",
        result.mean_ev_percent,
        result.standard_error_percent(),
        result.variance,
        result.number_of_hands,
        result.seed
    );
    println!(
        "Kelly: {:.1}% of bankroll",
        kelly_fraction(result.mean_ev_percent, result.variance) * 100.0
    );
    if result.exhausted_draws > 0 {
        println!(
            "Note: the shoe ran out {} times and tens were dealt instead",
            result.exhausted_draws
        );
    }
}

pub fn print_calibration(calibration: &EorCalibration) {
    for line in calibration_lines(calibration) {
        println!("{}", line);
    }
}

fn calibration_lines(calibration: &EorCalibration) -> Vec<String> {
    let mut lines = vec![format!(
        "EOR calibrated (EV0 {:+.2}%, seed {})",
        calibration.baseline_ev, calibration.seed
    )];
    for rank in Rank::iter() {
        lines.push(format!("  {:>2}: {:+.4}", rank, calibration.get(rank)));
    }
    lines.push(format!(
        "The correction is zero for this shoe and applies to cards observed after it ({} left)",
        calibration.reference.get_total()
    ));
    lines
}

pub fn print_comparison(comparison: &Comparison, seed: u64) {
    println!("Forced first action (seed {}):", seed);
    for (decision, ev) in &comparison.results {
        println!("  {:<10}{:+.2}%", decision.to_string(), ev);
    }
    if let Some((best, ev)) = comparison.best() {
        println!("Best: {} ({:+.2}%)", best, ev);
    }
    println!("Strategy plays: {}", comparison.recommended);
}
