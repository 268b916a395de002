// Variability: turn a strategy's top choice into a weighted draw over a
// rank-ordered shortlist.

use rand::Rng;

use crate::draft::player::rank_key;
use crate::draft::{Player, PlayerId};

/// Longest shortlist a draw is made from.
pub const SHORTLIST_LEN: usize = 10;

const LOW_WEIGHTS: [f64; SHORTLIST_LEN] = [0.60, 0.25, 0.10, 0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
const MEDIUM_WEIGHTS: [f64; SHORTLIST_LEN] = [0.40, 0.30, 0.15, 0.10, 0.05, 0.0, 0.0, 0.0, 0.0, 0.0];
const HIGH_WEIGHTS: [f64; SHORTLIST_LEN] = [0.30, 0.20, 0.15, 0.12, 0.08, 0.06, 0.04, 0.03, 0.02, 0.0];

/// Above this level the weights are blended toward uniform.
const BLEND_THRESHOLD: f64 = 0.7;
const BLEND_SCALE: f64 = 0.3;

/// Clamp a caller-supplied level into [0, 1]. NaN counts as no variability.
pub fn clamp_variability(variability: f64) -> f64 {
    if variability.is_nan() {
        0.0
    } else {
        variability.clamp(0.0, 1.0)
    }
}

/// Normalised draw weights for a shortlist of `len` players.
///
/// Bands: low up to 0.3, medium up to 0.6, high above. Levels above 0.7 are
/// mixed with a uniform distribution in proportion to the level.
pub fn shortlist_weights(variability: f64, len: usize) -> Vec<f64> {
    let len = len.min(SHORTLIST_LEN);
    if len == 0 {
        return Vec::new();
    }
    let variability = clamp_variability(variability);
    let table = if variability <= 0.3 {
        &LOW_WEIGHTS
    } else if variability <= 0.6 {
        &MEDIUM_WEIGHTS
    } else {
        &HIGH_WEIGHTS
    };

    let mut weights = table[..len].to_vec();
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter_mut().for_each(|w| *w /= total);
    } else {
        weights.iter_mut().for_each(|w| *w = 1.0 / len as f64);
    }

    if variability > BLEND_THRESHOLD {
        let factor = BLEND_SCALE * 2.0 * variability;
        let uniform = factor / len as f64;
        weights
            .iter_mut()
            .for_each(|w| *w = (1.0 - factor) * *w + uniform);
    }
    weights
}

/// Index drawn from `weights` with a single uniform draw against the
/// cumulative distribution. Falls back to 0 if rounding leaves the draw
/// past the final bucket.
pub fn draw_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if roll < cumulative {
            return i;
        }
    }
    0
}

/// The shortlist a draw is made from: the optimal pick first, then the
/// remaining candidates by ascending rank, capped at `SHORTLIST_LEN`.
pub fn shortlist<'a>(candidates: &[&'a Player], optimal: PlayerId) -> Vec<&'a Player> {
    let Some(top) = candidates.iter().copied().find(|p| p.id == optimal) else {
        return Vec::new();
    };
    let mut rest: Vec<&Player> = candidates
        .iter()
        .copied()
        .filter(|p| p.id != optimal)
        .collect();
    rest.sort_by_key(|p| rank_key(p));

    std::iter::once(top)
        .chain(rest)
        .take(SHORTLIST_LEN)
        .collect()
}

/// Apply variability to a strategy's choice.
///
/// Returns `optimal` unchanged when the level is zero, when there are no
/// candidates, or when `optimal` is not among them.
pub fn apply_variability<R: Rng + ?Sized>(
    candidates: &[&Player],
    optimal: PlayerId,
    variability: f64,
    rng: &mut R,
) -> PlayerId {
    let variability = clamp_variability(variability);
    if variability <= 0.0 || candidates.is_empty() {
        return optimal;
    }
    let list = shortlist(candidates, optimal);
    if list.is_empty() {
        return optimal;
    }
    let weights = shortlist_weights(variability, list.len());
    let index = draw_index(&weights, rng);
    list.get(index).map_or(optimal, |p| p.id)
}
