/// Runtime configuration for the linalg ops.
/// Holds the singular value cutoff and the thread count handed to faer.
use faer::Parallelism;

use crate::lib_linalg::errors::{LinalgError, LinalgResult};

/// Relative singular value cutoff override
pub const RCOND_ENV: &str = "LINALG_RS_RCOND";
/// Thread count override, 0 selects the rayon default pool
pub const NUM_THREADS_ENV: &str = "LINALG_RS_NUM_THREADS";


/// Per-call settings.
/// `rcond: None` uses eps * max(m, n), `n_threads: None` defers
/// to faer's global parallelism setting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinalgConfig {
    rcond: Option<f64>,
    n_threads: Option<usize>,
}

impl LinalgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relative cutoff below which singular values are dropped
    pub fn with_rcond(mut self, rcond: Option<f64>) -> LinalgResult<Self> {
        if let Some(r) = rcond {
            if !r.is_finite() || r < 0.0 {
                return Err(LinalgError::InvalidRcond(r));
            }
        }
        self.rcond = rcond;
        Ok(self)
    }

    pub fn with_threads(mut self, n_threads: Option<usize>) -> Self {
        self.n_threads = n_threads;
        self
    }

    pub fn rcond(&self) -> Option<f64> {
        self.rcond
    }

    pub fn n_threads(&self) -> Option<usize> {
        self.n_threads
    }

    /// Parallelism to pass to faer matmul routines
    pub fn parallelism(&self) -> Parallelism {
        match self.n_threads {
            Some(n) => parallelism_for(n),
            None => faer::get_global_parallelism(),
        }
    }

    /// Reads overrides from the process environment
    pub fn from_env() -> LinalgResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from a variable lookup, unset vars keep defaults
    pub fn from_vars<F>(lookup: F) -> LinalgResult<Self>
        where
        F: Fn(&str) -> Option<String>
    {
        let mut cfg = Self::new();
        if let Some(raw) = lookup(RCOND_ENV) {
            let rcond: f64 = raw.trim().parse().map_err(|_| LinalgError::InvalidEnv {
                var: RCOND_ENV,
                value: raw.clone(),
            })?;
            cfg = cfg.with_rcond(Some(rcond))?;
        }
        if let Some(raw) = lookup(NUM_THREADS_ENV) {
            let n: usize = raw.trim().parse().map_err(|_| LinalgError::InvalidEnv {
                var: NUM_THREADS_ENV,
                value: raw.clone(),
            })?;
            cfg = cfg.with_threads(Some(n));
        }
        log::debug!("linalg config: {:?}", cfg);
        Ok(cfg)
    }

    /// Installs the thread count as faer's global parallelism, if set
    pub fn apply_global(&self) {
        if let Some(n) = self.n_threads {
            log::debug!("setting faer global parallelism to {} threads", n);
            faer::set_global_parallelism(parallelism_for(n));
        }
    }
}


/// Maps a thread count onto faer's parallelism setting
pub fn parallelism_for(n_threads: usize) -> Parallelism<'static> {
    match n_threads {
        1 => Parallelism::None,
        n => Parallelism::Rayon(n),
    }
}

/// Number of threads a parallelism setting will use
pub fn threads_of(par: Parallelism) -> usize {
    #[allow(unreachable_patterns)]
    match par {
        Parallelism::None => 1,
        Parallelism::Rayon(0) => rayon::current_num_threads(),
        Parallelism::Rayon(n) => n,
        _ => 1,
    }
}
