//! Planner flags and configuration
//!
//! [`PlannerFlags`] is the mutable hint channel shared by every solver evaluated
//! during one planning session. Solvers read it while scoring and may write it
//! while building, and those writes stay visible to the solvers evaluated after
//! them. Each [`DftPlanner`](crate::DftPlanner) owns its own copy, so separate
//! sessions never share flag state.
//!
//! [`PlannerConfig`] collects the settings a session starts from.
//!
//! # Examples
//!
//! ```
//! use vecfft_planner::{PlannerConfig, PlannerFlags};
//!
//! let config = PlannerConfig::default()
//!     .with_flags(PlannerFlags::IMPATIENT | PlannerFlags::CLASSIC_VRECURSE);
//!
//! assert!(config.flags.contains(PlannerFlags::IMPATIENT));
//! assert_eq!(config.vecloop_preferences, vec![1, -1]);
//! ```

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Session-wide planner flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct PlannerFlags: u32 {
        /// Trust only the primary choice of each solver family
        const IMPATIENT = 1 << 0;
        /// Keep peeling vector dimensions once vector recursion has started
        const FORCE_VRECURSE = 1 << 1;
        /// Legacy vector recursion; consumed by the first rank-1 vector loop
        const CLASSIC_VRECURSE = 1 << 2;
        /// Some vector loop may leave the buffers unaligned
        const POSSIBLY_UNALIGNED = 1 << 3;
    }
}

/// Vector-loop dimension preferences: the natural order and its reverse
pub const DEFAULT_VECLOOP_PREFERENCES: [i32; 2] = [1, -1];

/// Settings for a planning session
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannerConfig {
    /// Flags the session starts with
    pub flags: PlannerFlags,
    /// Remember which solver won for each problem
    pub memoize: bool,
    /// One vector-rank solver is registered per entry, in this order
    pub vecloop_preferences: Vec<i32>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            flags: PlannerFlags::empty(),
            memoize: true,
            vecloop_preferences: DEFAULT_VECLOOP_PREFERENCES.to_vec(),
        }
    }
}

impl PlannerConfig {
    /// Replace the initial flags
    pub fn with_flags(mut self, flags: PlannerFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Enable or disable the solver memo
    pub fn with_memo(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Replace the vector-loop preference list
    pub fn with_vecloop_preferences(mut self, preferences: Vec<i32>) -> Self {
        self.vecloop_preferences = preferences;
        self
    }
}
