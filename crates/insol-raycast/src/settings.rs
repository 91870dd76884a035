//! Tunables for the parallel strategies and the batch pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RaycastError, Result};

/// Ray-casting parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycastSettings {
    /// Elements fetched per read-back transfer from a device output buffer.
    pub read_chunk: usize,
    /// (ray, triangle) pairs sent per triangle-test dispatch.
    pub pair_batch: usize,
    /// Worker threads for the CPU parallel strategies (0 = one per logical CPU).
    pub threads: usize,
}

impl Default for RaycastSettings {
    fn default() -> Self {
        Self {
            read_chunk: 5000,
            pair_batch: 500,
            threads: 0,
        }
    }
}

impl RaycastSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.read_chunk == 0 {
            return Err(RaycastError::InvalidSettings(
                "read_chunk must be positive".into(),
            ));
        }
        if self.pair_batch == 0 {
            return Err(RaycastError::InvalidSettings(
                "pair_batch must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Build the fixed-size worker pool used by the parallel strategies.
    pub fn thread_pool(&self) -> Result<rayon::ThreadPool> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("insol-worker-{i}"))
            .build()?;
        Ok(pool)
    }
}
