//! 1D Distribution.

use crate::pbrt::{find_interval, Float};

/// Piecewise-constant 1D function with its PDF and CDF, used both to pick
/// lights by power and to seed Markov chains from bootstrap importances.
#[derive(Clone, Debug)]
pub struct Distribution1D {
    /// Piecewise-constant function.
    pub func: Vec<Float>,

    /// CDF for `func`.
    pub cdf: Vec<Float>,

    /// Integral of `func` over [0, 1]; equals the mean of the function values.
    pub func_int: Float,
}

impl Distribution1D {
    /// Returns a new `Distribution1D` for given piecewise-constant function.
    ///
    /// * `f` - Piecewise-constant 1D function values.
    pub fn new(f: Vec<Float>) -> Self {
        let n = f.len();

        // Integrate in f64 so a long bootstrap table does not lose mass.
        let mut running = 0.0_f64;
        let mut cdf: Vec<Float> = Vec::with_capacity(n + 1);
        cdf.push(0.0);
        for v in f.iter() {
            running += *v as f64 / n as f64;
            cdf.push(running as Float);
        }

        let func_int = running as Float;
        if func_int == 0.0 {
            for (i, v) in cdf.iter_mut().enumerate().skip(1) {
                *v = i as Float / n as Float;
            }
        } else {
            for v in cdf.iter_mut().skip(1) {
                *v /= func_int;
            }
        }
        if let Some(last) = cdf.last_mut() {
            *last = 1.0;
        }

        Self { func: f, cdf, func_int }
    }

    /// Returns the number of sample points for the piecewise-constant function.
    pub fn count(&self) -> usize {
        self.func.len()
    }

    /// Return a sample in [0, 1), PDF and offset from the distribution given a random sample.
    ///
    /// * `u` - The random sample.
    pub fn sample_continuous(&self, u: Float) -> (Float, Float, usize) {
        let offset = find_interval(self.cdf.len(), |index| self.cdf[index] <= u);

        let mut du = u - self.cdf[offset];
        let width = self.cdf[offset + 1] - self.cdf[offset];
        if width > 0.0 {
            du /= width;
        }
        debug_assert!(!du.is_nan());

        let pdf = if self.func_int > 0.0 {
            self.func[offset] / self.func_int
        } else {
            0.0
        };

        ((offset as Float + du) / self.count() as Float, pdf, offset)
    }

    /// Return a sample from the discrete distribution given a random sample.
    /// Returns the chosen index, its probability and `u` remapped to [0, 1)
    /// within the chosen segment.
    ///
    /// * `u` - The random sample.
    pub fn sample_discrete(&self, u: Float) -> (usize, Float, Float) {
        let offset = find_interval(self.cdf.len(), |index| self.cdf[index] <= u);
        let pdf = if self.func_int > 0.0 {
            self.func[offset] / (self.func_int * self.count() as Float)
        } else {
            0.0
        };
        let width = self.cdf[offset + 1] - self.cdf[offset];
        let u_remapped = if width > 0.0 {
            (u - self.cdf[offset]) / width
        } else {
            0.0
        };
        debug_assert!((0.0..=1.0).contains(&u_remapped));

        (offset, pdf, u_remapped)
    }

    /// Return the PDF for sampling a given value from the discrete PDF.
    ///
    /// * `index` - Sample index.
    pub fn discrete_pdf(&self, index: usize) -> Float {
        debug_assert!(index < self.count());
        if self.func_int == 0.0 {
            return 0.0;
        }
        self.func[index] / (self.func_int * self.count() as Float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    #[test]
    fn integral_is_mean_of_values() {
        let d = Distribution1D::new(vec![1.0, 3.0, 0.0, 4.0]);
        assert!(approx_eq!(Float, d.func_int, 2.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, d.discrete_pdf(1), 3.0 / 8.0, epsilon = 1e-6));
        assert_eq!(d.discrete_pdf(2), 0.0);
    }

    #[test]
    fn zero_entries_are_never_chosen() {
        let d = Distribution1D::new(vec![0.0, 2.0, 0.0, 1.0, 0.0]);
        let mut rng = RNG::new(11);
        for _ in 0..10_000 {
            let (i, pdf, _) = d.sample_discrete(rng.uniform_float());
            assert!(i == 1 || i == 3, "picked {i}");
            assert!(pdf > 0.0);
        }
    }

    #[test]
    fn sample_frequencies_follow_weights() {
        let d = Distribution1D::new(vec![1.0, 3.0]);
        let mut rng = RNG::new(5);
        let n = 100_000;
        let ones = (0..n).filter(|_| d.sample_discrete(rng.uniform_float()).0 == 1).count();
        let freq = ones as Float / n as Float;
        assert!((freq - 0.75).abs() < 0.01, "freq = {freq}");
    }

    #[test]
    fn all_zero_function_samples_uniformly() {
        let d = Distribution1D::new(vec![0.0; 4]);
        assert_eq!(d.func_int, 0.0);
        assert_eq!(d.sample_discrete(0.6).0, 2);
        assert_eq!(d.discrete_pdf(0), 0.0);
    }

    proptest! {
        #[test]
        fn continuous_sample_in_unit_interval(
            f in prop::collection::vec(0.0f32..10.0, 1..32),
            u in 0.0f32..1.0,
        ) {
            let d = Distribution1D::new(f);
            let (x, pdf, offset) = d.sample_continuous(u);
            prop_assert!((0.0..=1.0).contains(&x));
            prop_assert!(pdf >= 0.0);
            prop_assert!(offset < d.count());
        }
    }
}
