//! Stat engine: category-gated modifier aggregation for character stats.
//!
//! `stat-core` decides, each time a stat is read, what its value is given the
//! base value and every modifier currently attached to it.
//!
//! # Architecture
//!
//! ```text
//! [ CategorySet ] ──► [ StatDefinition ] ──► [ StatRegistry ]   (setup, shared read-only)
//!                                                 │
//!                                                 ▼
//! [ StatModifier ] ──────────────────────► [ StatCollection ]  (one per entity)
//!                                            │            │
//!                                            ▼            ▼
//!                                         [ Stat ]   [ TimedModifierManager ]
//! ```
//!
//! ## Principles
//!
//! 1. **Explicit registry**: built once by the host and shared via `Arc`; no globals
//! 2. **Fixed order**: `Additive → PercentageAdditive → Multiplicative → Clamp`
//! 3. **Conservative cache**: every mutation invalidates, reads only refresh
//! 4. **Soft failures**: caller mistakes log a warning and do nothing
//! 5. **Single-threaded**: collections are mutated synchronously within one step
pub mod category;
pub mod collection;
pub mod config;
pub mod definition;
pub mod error;
pub mod modifier;
pub mod registry;
pub mod stat;
pub mod timed;

pub use category::{Category, CategorySet};
pub use collection::StatCollection;
pub use config::{IdCasePolicy, StatConfig};
pub use definition::{StatDefinition, StatExtension};
pub use error::{DefinitionError, ErrorSeverity, StatSystemError};
pub use modifier::{ModifierMode, StatModifier};
pub use registry::{ConditionalStatDefinition, StatRegistry, extended_stat_id};
pub use stat::{Stat, StatBreakdown};
pub use timed::{ScheduledExpiry, TimedModifierManager};
