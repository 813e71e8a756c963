use num_traits::{Float, ToPrimitive};

use crate::{Kbn, Window};

/// Rolling mean and standard deviation over a sliding window.
///
/// `RollingStats<V, F>` retains the `window_size` most recent observations
/// of element type `V` in a circular buffer and keeps the mean and sample
/// variance of those observations up to date in O(1) per observation. The
/// statistics are carried in the floating-point type `F` (`f64` by
/// default), so integer element types work without the caller converting
/// anything.
///
/// A full window replaces its oldest element on every update; mean and
/// variance are adjusted with the add-one/remove-one Welford-style
/// identity rather than rescanning the window. While an empty-start
/// window is still filling, the statistics cover exactly the values
/// retained so far.
///
/// # Example
///
/// ```
/// use roll_stats::RollingStats;
///
/// let mut stats: RollingStats<f64> = RollingStats::new(3);
/// stats.update(25.4).update(26.2).update(26.0);
///
/// assert!((stats.mean().unwrap_or(f64::NAN) - 25.8667).abs() < 1e-4);
/// assert!((stats.stddev().unwrap_or(f64::NAN) - 0.4163).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct RollingStats<V, F = f64> {
    /// Circular buffer of the retained observations
    buf: Window<V>,
    /// Running mean of the retained observations
    mean: F,
    /// Running sample variance of the retained observations; may drift
    /// slightly negative near zero, clamped at read time
    variance: F,
}

impl<V, F> RollingStats<V, F>
where
    V: Copy + Default + ToPrimitive,
    F: Float + Default,
{
    /// Creates an empty-start accumulator with the specified window size.
    ///
    /// The window fills one observation at a time; statistics over the
    /// filling period cover only the values seen so far. Once
    /// `window_size` observations have arrived, every update evicts the
    /// oldest retained one.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(window_size: usize) -> Self {
        Self {
            buf: Window::new(window_size),
            mean: F::zero(),
            variance: F::zero(),
        }
    }

    /// Creates an accumulator with every slot pre-filled with `seed`.
    ///
    /// The window starts full: mean equals `seed`, standard deviation is
    /// zero, and every update evicts a real observation (initially the
    /// seed values). Choose this only when the seed counting as
    /// `window_size - 1` phantom observations is an acceptable bias on
    /// the first `window_size - 1` results.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use roll_stats::RollingStats;
    ///
    /// let mut stats: RollingStats<i32> = RollingStats::prefilled(3, 10);
    /// assert!((stats.mean().unwrap_or(f64::NAN) - 10.0).abs() < 1e-12);
    ///
    /// stats.update(12); // window is now {10, 10, 12}
    /// assert!((stats.mean().unwrap_or(f64::NAN) - 10.6667).abs() < 1e-4);
    /// ```
    pub fn prefilled(window_size: usize, seed: V) -> Self {
        let mut stats = Self::new(window_size);
        for _ in 0..window_size {
            stats.update(seed);
        }
        stats
    }

    /// Updates the statistics with a new observation.
    ///
    /// Inserts `value` into the window, evicting the oldest retained
    /// observation if the window is full, and adjusts mean and variance
    /// in place.
    ///
    /// # Arguments
    ///
    /// * `value` - The new observation
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The accumulator, for chaining
    #[inline]
    pub fn update(&mut self, value: V) -> &mut Self {
        let evicted = self.buf.push(value);
        self.advance(value, evicted);
        self
    }

    /// Applies the incremental mean/variance update.
    ///
    /// # Returns
    ///
    /// * `Option<()>` - `None` if a value does not convert to `F`
    fn advance(&mut self, value: V, evicted: Option<V>) -> Option<()> {
        let x = F::from(value)?;
        let n = F::from(self.buf.len())?;
        let _1 = F::one();

        match evicted {
            // Full window: swap the oldest observation for the new one in
            // a single step. With delta = 0 the statistics are untouched.
            Some(out) => {
                let out = F::from(out)?;
                let delta = x - out;
                let old_mean = self.mean;
                self.mean = old_mean + delta / n;
                // A one-element window has no dispersion; the divisor
                // n - 1 would be zero and poison the accumulator.
                if n > _1 {
                    self.variance =
                        self.variance + delta * (x - self.mean + out - old_mean) / (n - _1);
                }
            }
            None if self.buf.len() == 1 => {
                self.mean = x;
                self.variance = F::zero();
            }
            // Still filling: no eviction, so the swap update degenerates
            // to plain online accumulation over the n retained values.
            // The second observation uses mean divisor 2 and variance
            // divisor 1, the classic two-sample formula.
            None => {
                let old_mean = self.mean;
                self.mean = old_mean + (x - old_mean) / n;
                let _2 = _1 + _1;
                self.variance =
                    ((n - _2) * self.variance + (x - old_mean) * (x - self.mean)) / (n - _1);
            }
        }
        Some(())
    }

    /// Returns the mean of the retained observations.
    ///
    /// # Returns
    ///
    /// * `Option<F>` - The mean, or `None` before any observation
    #[inline]
    pub fn mean(&self) -> Option<F> {
        (self.count() > 0).then_some(self.mean)
    }

    /// Returns the standard deviation of the retained observations.
    ///
    /// Computed as `sqrt(abs(variance))`: floating-point rounding can
    /// drift the incremental variance slightly negative when the true
    /// variance is at or near zero, and the clamp reads that as
    /// near-zero dispersion instead of producing NaN.
    ///
    /// # Returns
    ///
    /// * `Option<F>` - The standard deviation, or `None` before any
    ///   observation
    #[inline]
    pub fn stddev(&self) -> Option<F> {
        (self.count() > 0).then(|| self.variance.abs().sqrt())
    }

    /// Returns the window size the accumulator was constructed with.
    #[inline]
    pub fn window_size(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of observations currently retained.
    #[inline]
    pub const fn count(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` once the window has filled to capacity.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.buf.is_full()
    }

    /// Returns an iterator over the retained observations in arrival
    /// (oldest to newest) order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.buf.iter()
    }

    /// Resets the accumulator to its empty-start initial state.
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The accumulator, for chaining
    pub fn reset(&mut self) -> &mut Self {
        self.buf.reset();
        self.mean = F::zero();
        self.variance = F::zero();
        self
    }

    /// Recomputes mean and variance from the retained observations,
    /// could be called to avoid prolonged compounding of floating
    /// rounding errors.
    ///
    /// Uses Kahan-Babuska-Neumaier compensated summation for the
    /// rebuild.
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The accumulator, for chaining
    pub fn recompute(&mut self) -> &mut Self {
        self.recompute_from_window();
        self
    }

    fn recompute_from_window(&mut self) -> Option<()> {
        let count = self.buf.len();
        if count == 0 {
            return None;
        }
        let n = F::from(count)?;

        let mut sum = Kbn::default();
        for &v in self.buf.iter() {
            sum += F::from(v)?;
        }
        self.mean = sum.total() / n;

        if count < 2 {
            self.variance = F::zero();
            return Some(());
        }
        let mut m2 = Kbn::default();
        for &v in self.buf.iter() {
            let dev = F::from(v)? - self.mean;
            m2 += dev * dev;
        }
        self.variance = m2.total() / (n - F::one());
        Some(())
    }
}
