//! Running statistics shared by agents and tools

/// Two-point blend of a running average with a new sample.
///
/// This is `(previous + sample) / 2`, a decaying blend rather than a true mean:
/// the latest sample always carries half the weight.
pub fn blend_average(previous: f64, sample: f64) -> f64 {
    (previous + sample) / 2.0
}

/// Recompute a success percentage after one more attempt.
///
/// `attempts` already includes the new attempt. The prior success count is
/// reconstructed from `previous_rate` over `attempts - 1` earlier attempts.
/// The first recorded attempt yields 100 or 0 directly.
pub fn reconstruct_success_rate(previous_rate: f64, attempts: u64, success: bool) -> f64 {
    if attempts <= 1 {
        return if success { 100.0 } else { 0.0 };
    }

    let prior = (attempts - 1) as f64;
    let successes = previous_rate * prior / 100.0 + if success { 1.0 } else { 0.0 };
    (successes / attempts as f64 * 100.0).clamp(0.0, 100.0)
}
