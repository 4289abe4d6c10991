//! Host-facing battle service: registry, escrow orchestration, settlement.
//!
//! The `arena` crate wraps the pure engine in `battle-core` with the
//! stateful surface callers talk to: battle-id allocation, the per-player
//! active-battle index, creature lock management, stake settlement, and
//! event emission. All commands are synchronous; the host provides the
//! single-writer execution context the engine assumes.
pub mod error;
pub mod oracle;
pub mod registry;

pub use error::ArenaError;
pub use oracle::{MemoryCreatureRegistry, MemoryLedger};
pub use registry::{Arena, PlayerRecord};
