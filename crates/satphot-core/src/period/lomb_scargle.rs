//! Generalized (floating-mean) Lomb-Scargle periodogram with standard
//! normalization: power = 1 - chi2(model) / chi2(constant), in [0, 1].

use std::f64::consts::TAU;

use ndarray::Array1;
use rayon::prelude::*;

use crate::consts::{EPSILON, PARALLEL_GRID_THRESHOLD};

/// Evenly spaced frequency grid, `f_k = start + k * step`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyGrid {
    pub start: f64,
    pub step: f64,
    pub len: usize,
}

impl FrequencyGrid {
    /// Grid over `[min_frequency, max_frequency]` with `samples_per_peak`
    /// points per `1 / baseline` peak width.
    ///
    /// Returns `None` when the bounds are not finite, not ordered, or the
    /// baseline is not positive.
    pub fn new(
        min_frequency: f64,
        max_frequency: f64,
        baseline: f64,
        samples_per_peak: usize,
    ) -> Option<Self> {
        if !(min_frequency.is_finite() && max_frequency.is_finite() && baseline.is_finite()) {
            return None;
        }
        if min_frequency <= 0.0 || max_frequency <= min_frequency || baseline <= 0.0 {
            return None;
        }
        let step = 1.0 / baseline / samples_per_peak.max(1) as f64;
        let len = 1 + ((max_frequency - min_frequency) / step).round() as usize;
        Some(Self {
            start: min_frequency,
            step,
            len,
        })
    }

    pub fn frequencies(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.len, |k| self.start + self.step * k as f64)
    }
}

/// Centred, weighted observations ready for power evaluation.
pub struct LombScargle {
    t: Vec<f64>,
    /// Weighted residuals `w_i * (y_i - ybar)`.
    wy: Vec<f64>,
    /// Normalized weights, summing to one.
    w: Vec<f64>,
    /// Weighted variance of `y`.
    yy: f64,
}

impl LombScargle {
    /// `dy` are per-sample uncertainties used as `1 / dy^2` weights.
    ///
    /// Returns `None` when the signal has no variance.
    pub fn new(t: &[f64], y: &[f64], dy: Option<&[f64]>) -> Option<Self> {
        let n = t.len().min(y.len());
        if n == 0 {
            return None;
        }
        let mut w: Vec<f64> = match dy {
            Some(dy) => dy[..n].iter().map(|e| 1.0 / (e * e)).collect(),
            None => vec![1.0; n],
        };
        let total: f64 = w.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        w.iter_mut().for_each(|wi| *wi /= total);

        let mean: f64 = w.iter().zip(y).map(|(wi, yi)| wi * yi).sum();
        let centred: Vec<f64> = y[..n].iter().map(|yi| yi - mean).collect();
        let yy: f64 = w.iter().zip(&centred).map(|(wi, r)| wi * r * r).sum();
        if !yy.is_finite() || yy <= EPSILON {
            return None;
        }
        let wy = w.iter().zip(&centred).map(|(wi, r)| wi * r).collect();

        Some(Self {
            t: t[..n].to_vec(),
            wy,
            w,
            yy,
        })
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Normalized power at one frequency (Hz).
    pub fn power_at(&self, frequency: f64) -> f64 {
        let omega = TAU * frequency;

        let (mut s, mut c, mut s2, mut c2) = (0.0, 0.0, 0.0, 0.0);
        for (&ti, &wi) in self.t.iter().zip(&self.w) {
            let (sin, cos) = (omega * ti).sin_cos();
            s += wi * sin;
            c += wi * cos;
            s2 += wi * 2.0 * sin * cos;
            c2 += wi * (cos * cos - sin * sin);
        }
        // Phase offset that decouples the sine and cosine terms.
        let omega_tau = 0.5 * (s2 - 2.0 * c * s).atan2(c2 - (c * c - s * s));

        let (mut yc, mut ys) = (0.0, 0.0);
        let (mut cc, mut ss, mut cs, mut sn) = (0.0, 0.0, 0.0, 0.0);
        for ((&ti, &wi), &wyi) in self.t.iter().zip(&self.w).zip(&self.wy) {
            let (sin, cos) = (omega * ti - omega_tau).sin_cos();
            yc += wyi * cos;
            ys += wyi * sin;
            cc += wi * cos * cos;
            ss += wi * sin * sin;
            cs += wi * cos;
            sn += wi * sin;
        }
        cc -= cs * cs;
        ss -= sn * sn;

        let mut power = 0.0;
        if cc > EPSILON {
            power += yc * yc / cc;
        }
        if ss > EPSILON {
            power += ys * ys / ss;
        }
        power / self.yy
    }

    /// Power over every frequency of `frequency`.
    pub fn power(&self, frequency: &Array1<f64>) -> Array1<f64> {
        if frequency.len() >= PARALLEL_GRID_THRESHOLD {
            let freqs = frequency.to_vec();
            let power: Vec<f64> = freqs.par_iter().map(|&f| self.power_at(f)).collect();
            Array1::from_vec(power)
        } else {
            frequency.mapv(|f| self.power_at(f))
        }
    }
}

/// Weighted variance of the sample times, as used by the false-alarm bound.
pub fn weighted_time_variance(t: &[f64], dy: Option<&[f64]>) -> f64 {
    let w: Vec<f64> = match dy {
        Some(dy) => dy.iter().map(|e| 1.0 / (e * e)).collect(),
        None => vec![1.0; t.len()],
    };
    let total: f64 = w.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return f64::NAN;
    }
    let mean = w.iter().zip(t).map(|(wi, ti)| wi * ti).sum::<f64>() / total;
    w.iter()
        .zip(t)
        .map(|(wi, ti)| wi * (ti - mean) * (ti - mean))
        .sum::<f64>()
        / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn grid_spacing_follows_baseline() {
        let grid = FrequencyGrid::new(0.01, 0.5, 100.0, 10).unwrap();
        assert_abs_diff_eq!(grid.step, 0.001, epsilon = 1e-15);
        assert_eq!(grid.len, 491);
        let f = grid.frequencies();
        assert_abs_diff_eq!(f[grid.len - 1], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn inverted_bounds_have_no_grid() {
        assert!(FrequencyGrid::new(0.5, 0.1, 100.0, 30).is_none());
        assert!(FrequencyGrid::new(f64::INFINITY, 1.0, 100.0, 30).is_none());
    }

    #[test]
    fn constant_signal_is_rejected() {
        let t: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y = vec![7.5; 50];
        assert!(LombScargle::new(&t, &y, None).is_none());
    }

    #[test]
    fn pure_sinusoid_has_unit_power_at_its_frequency() {
        let f0 = 0.05;
        let t: Vec<f64> = (0..400).map(|i| i as f64 * 0.7).collect();
        let y: Vec<f64> = t.iter().map(|ti| 3.0 + (TAU * f0 * ti + 0.3).sin()).collect();
        let ls = LombScargle::new(&t, &y, None).unwrap();
        assert_abs_diff_eq!(ls.power_at(f0), 1.0, epsilon = 1e-9);
        assert!(ls.power_at(0.13) < 0.05);
    }
}
