//! False-alarm level of the standard-normalized periodogram, using Baluev's
//! (2008) upper bound on the probability that noise alone produces a peak
//! this high anywhere below `fmax`.

use std::f64::consts::PI;

const BISECTION_STEPS: usize = 200;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function for `x > 0`.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let series = LANCZOS_COEFFS[1..]
        .iter()
        .enumerate()
        .fold(LANCZOS_COEFFS[0], |acc, (i, c)| acc + c / (x + i as f64 + 1.0));
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// `sqrt(2 / n) * Gamma(n / 2) / Gamma((n - 1) / 2)`
fn gamma_ratio(n: f64) -> f64 {
    (2.0 / n).sqrt() * (ln_gamma(n / 2.0) - ln_gamma((n - 1.0) / 2.0)).exp()
}

/// Inputs of the bound that do not depend on the power level.
#[derive(Clone, Copy, Debug)]
pub struct BaluevBound {
    /// Number of samples.
    pub n: usize,
    /// Highest frequency the search is assumed to cover.
    pub fmax: f64,
    /// Weighted variance of the sample times.
    pub time_variance: f64,
}

impl BaluevBound {
    /// Probability that a single frequency reaches power `z` by chance.
    fn single(&self, z: f64) -> f64 {
        (1.0 - z).powf(0.5 * (self.n as f64 - 3.0))
    }

    /// Expected number of up-crossings of level `z` below `fmax`.
    fn tau(&self, z: f64) -> f64 {
        let n = self.n as f64;
        let w = self.fmax * (4.0 * PI * self.time_variance).sqrt();
        gamma_ratio(n - 1.0) * w * (1.0 - z).powf(0.5 * (n - 4.0)) * (0.5 * (n - 1.0) * z).sqrt()
    }

    /// False-alarm probability of power `z`.
    pub fn probability(&self, z: f64) -> f64 {
        let tau = self.tau(z);
        -(-tau).exp_m1() + self.single(z) * (-tau).exp()
    }

    /// Power whose false-alarm probability equals `p`.
    ///
    /// Returns `None` for fewer than five samples or non-finite inputs.
    pub fn level(&self, p: f64) -> Option<f64> {
        if self.n < 5
            || !(p > 0.0 && p < 1.0)
            || !self.fmax.is_finite()
            || !self.time_variance.is_finite()
        {
            return None;
        }
        // probability() falls monotonically from ~1 at z = 0 to 0 at z = 1.
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            if self.probability(mid) > p {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let z = 0.5 * (lo + hi);
        z.is_finite().then_some(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ln_gamma_matches_factorials() {
        assert_abs_diff_eq!(ln_gamma(1.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ln_gamma(5.0), 24.0_f64.ln(), epsilon = 1e-10);
        assert_abs_diff_eq!(ln_gamma(0.5), PI.sqrt().ln(), epsilon = 1e-10);
        assert_abs_diff_eq!(ln_gamma(101.0), 363.739_375_555_563_5, epsilon = 1e-8);
    }

    #[test]
    fn level_inverts_probability() {
        let bound = BaluevBound {
            n: 500,
            fmax: 2.5,
            time_variance: 100.0_f64.powi(2) / 12.0,
        };
        let z = bound.level(1e-4).unwrap();
        assert!(z > 0.0 && z < 1.0);
        assert_abs_diff_eq!(bound.probability(z), 1e-4, epsilon = 1e-8);
    }

    #[test]
    fn stricter_probability_needs_more_power() {
        let bound = BaluevBound {
            n: 300,
            fmax: 1.0,
            time_variance: 900.0,
        };
        assert!(bound.level(1e-4).unwrap() > bound.level(1e-2).unwrap());
    }
}
