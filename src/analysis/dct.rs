//! DCT-II cepstral stage with a memoized cosine basis per input length.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, PoisonError, RwLock};

use ndarray::{Array2, aview1};
use tracing::debug;

use crate::error::{MfccError, ensure_finite};

pub const DEFAULT_NUM_COEFFICIENTS: usize = 12;

/// Weighting applied to each cepstral coefficient after the transform.
#[derive(Debug, Clone, Copy, Default)]
pub enum Lifter {
    /// `scalar * (k + 1)`.
    #[default]
    Linear,
    /// `scalar * (1 + L/2 * sin(π (k + 1) / L))` with `L = cep_lifter`.
    Sinusoidal { cep_lifter: f32 },
    /// Caller-supplied weighting of `(scalar, k)`.
    Custom(fn(f32, usize) -> f32),
}

impl Lifter {
    fn validate(&self) -> Result<(), MfccError> {
        match *self {
            Self::Sinusoidal { cep_lifter } if !cep_lifter.is_finite() || cep_lifter < 0.0 => {
                Err(MfccError::invalid(
                    "cep_lifter",
                    format!("{cep_lifter} must be a finite, non-negative value"),
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn apply(&self, scalar: f32, index: usize) -> f32 {
        let harmonic = (index + 1) as f32;
        match *self {
            Self::Linear => scalar * harmonic,
            Self::Sinusoidal { cep_lifter } => {
                if cep_lifter <= 0.0 {
                    return scalar;
                }
                let weight =
                    1.0 + cep_lifter / 2.0 * (std::f32::consts::PI * harmonic / cep_lifter).sin();
                scalar * weight
            }
            Self::Custom(f) => f(scalar, index),
        }
    }
}

/// Cosine basis for one input length: `num_coefficients x len` values of
/// `cos(π (k + 1) / len * (m + 0.5))`.
#[derive(Debug)]
pub struct CosineTable {
    basis: Array2<f32>,
}

impl CosineTable {
    fn build(num_coefficients: usize, len: usize) -> Self {
        let basis = Array2::from_shape_fn((num_coefficients, len), |(k, m)| {
            (PI * ((k + 1) as f64 / len as f64) * (m as f64 + 0.5)).cos() as f32
        });
        Self { basis }
    }

    pub fn input_len(&self) -> usize {
        self.basis.ncols()
    }

    pub fn num_coefficients(&self) -> usize {
        self.basis.nrows()
    }

    pub fn value(&self, coefficient: usize, input: usize) -> Option<f32> {
        self.basis.get((coefficient, input)).copied()
    }
}

/// Lazily populated, never invalidated map from input length to [`CosineTable`].
///
/// Memory grows with the number of distinct lengths seen. Construction for a
/// given length happens at most once, under the write lock; later lookups
/// only take the read lock.
#[derive(Debug)]
pub struct CosineCache {
    num_coefficients: usize,
    tables: RwLock<HashMap<usize, Arc<CosineTable>>>,
}

impl CosineCache {
    pub fn new(num_coefficients: usize) -> Result<Self, MfccError> {
        if num_coefficients == 0 {
            return Err(MfccError::invalid("num_coefficients", "must be at least 1"));
        }
        Ok(Self {
            num_coefficients,
            tables: RwLock::new(HashMap::new()),
        })
    }

    pub fn num_coefficients(&self) -> usize {
        self.num_coefficients
    }

    pub fn get_or_build(&self, len: usize) -> Arc<CosineTable> {
        if let Some(table) = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&len)
        {
            return Arc::clone(table);
        }
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let table = tables.entry(len).or_insert_with(|| {
            debug!(len, num_coefficients = self.num_coefficients, "Building cosine table");
            Arc::new(CosineTable::build(self.num_coefficients, len))
        });
        Arc::clone(table)
    }

    /// Number of distinct input lengths cached so far.
    pub fn len(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Discrete Cosine Transform producing `num_coefficients` cepstral values.
#[derive(Debug, Clone)]
pub struct Dct {
    cache: Arc<CosineCache>,
    lifter: Option<Lifter>,
}

impl Dct {
    pub fn new(num_coefficients: usize, lifter: Option<Lifter>) -> Result<Self, MfccError> {
        Self::with_cache(Arc::new(CosineCache::new(num_coefficients)?), lifter)
    }

    /// Share an existing cache, e.g. between pipelines running on worker threads.
    pub fn with_cache(
        cache: Arc<CosineCache>,
        lifter: Option<Lifter>,
    ) -> Result<Self, MfccError> {
        if let Some(lifter) = &lifter {
            lifter.validate()?;
        }
        Ok(Self { cache, lifter })
    }

    pub fn num_coefficients(&self) -> usize {
        self.cache.num_coefficients()
    }

    pub fn lifter(&self) -> Option<Lifter> {
        self.lifter
    }

    pub fn cache(&self) -> &Arc<CosineCache> {
        &self.cache
    }

    pub fn run(&self, spectrum: &[f32]) -> Result<Vec<f32>, MfccError> {
        if spectrum.is_empty() {
            return Err(MfccError::invalid("DCT input", "spectrum is empty"));
        }
        ensure_finite("DCT input", spectrum)?;
        let table = self.cache.get_or_build(spectrum.len());
        let scalars = table.basis.dot(&aview1(spectrum));
        let out: Vec<f32> = scalars
            .iter()
            .enumerate()
            .map(|(k, &scalar)| match &self.lifter {
                Some(lifter) => lifter.apply(scalar, k),
                None => scalar,
            })
            .collect();
        ensure_finite("DCT output", &out)?;
        Ok(out)
    }
}

impl Default for Dct {
    fn default() -> Self {
        Self {
            cache: Arc::new(CosineCache {
                num_coefficients: DEFAULT_NUM_COEFFICIENTS,
                tables: RwLock::new(HashMap::new()),
            }),
            lifter: None,
        }
    }
}
