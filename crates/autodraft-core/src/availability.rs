// Availability estimation: Monte Carlo survival odds until the caller's next pick.

use rand::Rng;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::draft::PlayerId;
use crate::simulation::{simulate_until_my_turn, DraftSetup, SimulationConfig};

/// Aggregated result of an availability run.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityEstimate {
    /// Probability (rounded to 3 decimals) that each player is still there.
    pub predictions: BTreeMap<PlayerId, f64>,
    /// Trials in which each player was drafted by another team.
    pub taken_counts: BTreeMap<PlayerId, u32>,
    pub trials_completed: u32,
}

/// Run `trials` independent simulations from `setup` and count how often
/// each originally available player is taken before the caller's turn.
///
/// With zero trials every player is reported as available.
pub fn estimate_availability<R: Rng + ?Sized>(
    setup: &DraftSetup,
    config: &SimulationConfig,
    trials: u32,
    rng: &mut R,
) -> AvailabilityEstimate {
    let mut taken_counts: BTreeMap<PlayerId, u32> =
        setup.available.iter().map(|p| (p.id, 0)).collect();

    for trial in 0..trials {
        let outcome = simulate_until_my_turn(setup, config, rng);
        let remaining: HashSet<PlayerId> = outcome.remaining.iter().map(|p| p.id).collect();
        for (id, count) in taken_counts.iter_mut() {
            if !remaining.contains(id) {
                *count += 1;
            }
        }
        debug!(
            "trial {}: {} picks, stopped on {:?}",
            trial + 1,
            outcome.picks.len(),
            outcome.stop
        );
    }

    let predictions = taken_counts
        .iter()
        .map(|(&id, &taken)| (id, survival_probability(taken, trials)))
        .collect();

    AvailabilityEstimate {
        predictions,
        taken_counts,
        trials_completed: trials,
    }
}

/// `1 - taken / trials`, rounded to three decimal places.
fn survival_probability(taken: u32, trials: u32) -> f64 {
    if trials == 0 {
        return 1.0;
    }
    let raw = 1.0 - f64::from(taken) / f64::from(trials);
    (raw * 1000.0).round() / 1000.0
}
