//! Seeded random numbers for building ensembles
//!
//! A projection consumes a single stream of random numbers. The stream is an explicit value
//! passed to each projector that needs draws, so the sequence of draws, and therefore every
//! ensemble, is reproducible from the seed alone.

use crate::timeseries::FloatValue;
use log::trace;
use ndarray::{Array1, Array2};
use rand::distributions::{Distribution, Open01, Standard};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: ChaCha8Rng,
}

impl RandomStream {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn sample_1d<D: Distribution<FloatValue>>(&mut self, distribution: D, n: usize) -> Array1<FloatValue> {
        trace!("drawing {} values from {}", n, std::any::type_name::<D>());
        Array1::from_shape_simple_fn(n, || distribution.sample(&mut self.rng))
    }

    fn sample_2d<D: Distribution<FloatValue>>(
        &mut self,
        distribution: D,
        rows: usize,
        cols: usize,
    ) -> Array2<FloatValue> {
        trace!(
            "drawing [{}, {}] values from {}",
            rows,
            cols,
            std::any::type_name::<D>()
        );
        // Row-major fill order
        Array2::from_shape_simple_fn((rows, cols), || distribution.sample(&mut self.rng))
    }

    /// `n` draws from N(0, 1)
    pub fn standard_normal(&mut self, n: usize) -> Array1<FloatValue> {
        self.sample_1d(StandardNormal, n)
    }

    /// `rows * cols` draws from N(0, 1)
    pub fn standard_normal_2d(&mut self, rows: usize, cols: usize) -> Array2<FloatValue> {
        self.sample_2d(StandardNormal, rows, cols)
    }

    /// `n` draws from U[0, 1)
    pub fn uniform(&mut self, n: usize) -> Array1<FloatValue> {
        self.sample_1d(Standard, n)
    }

    /// `rows * cols` draws from U[0, 1)
    pub fn uniform_2d(&mut self, rows: usize, cols: usize) -> Array2<FloatValue> {
        self.sample_2d(Standard, rows, cols)
    }

    /// `rows * cols` draws from U(0, 1), excluding both end points
    pub fn open_uniform_2d(&mut self, rows: usize, cols: usize) -> Array2<FloatValue> {
        self.sample_2d(Open01, rows, cols)
    }
}
