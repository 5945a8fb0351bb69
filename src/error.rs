//! Error kinds surfaced by the table.
//!
//! Lookups and removals report absence with `None`; the only failure is
//! advancing a traversal past its last entry.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IterError {
    #[error("no more entries in the table")]
    Exhausted,
}
