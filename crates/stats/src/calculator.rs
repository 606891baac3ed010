//! Streaming mean and standard deviation for linear and circular samples.

use crate::error::StatsError;

/// Yamartino correction coefficient, `2/sqrt(3) - 1` to four digits.
pub const YAMARTINO_K: f64 = 0.1547;

/// O(1)-update accumulator for a stream of samples.
///
/// Linear streams use Welford's algorithm. Circular streams (degrees) track
/// the running means of sine and cosine and report the Yamartino estimate
/// of the standard deviation. NaN samples are ignored.
///
/// # Example
///
/// ```
/// use anen_stats::MetricCalculator;
///
/// let mut calc = MetricCalculator::linear();
/// for v in [2.0, 4.0, f64::NAN, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     calc.push(v);
/// }
/// assert_eq!(calc.count(), 8);
/// assert!((calc.mean() - 5.0).abs() < 1e-12);
/// assert!((calc.standard_deviation() - 2.13809).abs() < 1e-5);
/// ```
#[derive(Debug, Clone)]
pub struct MetricCalculator {
    circular: bool,
    count: usize,
    mean: f64,
    m2: f64,
    mean_sin: f64,
    mean_cos: f64,
}

impl MetricCalculator {
    /// Creates an empty accumulator.
    pub fn new(circular: bool) -> Self {
        Self {
            circular,
            count: 0,
            mean: 0.0,
            m2: 0.0,
            mean_sin: 0.0,
            mean_cos: 0.0,
        }
    }

    /// Empty accumulator for linear samples.
    pub fn linear() -> Self {
        Self::new(false)
    }

    /// Empty accumulator for circular samples in degrees.
    pub fn circular() -> Self {
        Self::new(true)
    }

    /// Adds a sample. NaN is a no-op.
    #[inline]
    pub fn push(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.count += 1;
        let n = self.count as f64;
        if self.circular {
            let rad = value.to_radians();
            self.mean_sin += (rad.sin() - self.mean_sin) / n;
            self.mean_cos += (rad.cos() - self.mean_cos) / n;
        } else {
            let delta = value - self.mean;
            self.mean += delta / n;
            self.m2 += delta * (value - self.mean);
        }
    }

    /// Number of non-NaN samples pushed so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether this accumulator treats samples as angles.
    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Resets to the empty state, keeping the linear/circular kind.
    pub fn clear(&mut self) {
        *self = Self::new(self.circular);
    }

    /// Running mean. Circular means are in `[0, 360)`. NaN when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        if self.circular {
            self.mean_sin
                .atan2(self.mean_cos)
                .to_degrees()
                .rem_euclid(360.0)
        } else {
            self.mean
        }
    }

    /// Sample variance (`n - 1` denominator). NaN below two samples.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::UnsupportedOperation`] for circular streams.
    pub fn variance(&self) -> Result<f64, StatsError> {
        if self.circular {
            return Err(StatsError::UnsupportedOperation {
                operation: "variance of a circular variable",
            });
        }
        if self.count < 2 {
            return Ok(f64::NAN);
        }
        Ok(self.m2 / (self.count - 1) as f64)
    }

    /// Sample standard deviation; Yamartino estimate for circular streams.
    /// NaN below two samples.
    pub fn standard_deviation(&self) -> f64 {
        if self.count < 2 {
            return f64::NAN;
        }
        if self.circular {
            let r2 = self.mean_sin * self.mean_sin + self.mean_cos * self.mean_cos;
            let eps = (1.0 - r2).max(0.0).sqrt();
            eps.asin().to_degrees() * (1.0 + YAMARTINO_K * eps.powi(3))
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }
}

impl Default for MetricCalculator {
    fn default() -> Self {
        Self::linear()
    }
}
