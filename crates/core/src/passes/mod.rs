//! Geometric analysis passes over a built document.
//!
//! Each pass is a synchronous, exclusive transformation of a `Document` and
//! guards its own idempotence: reapplying a pass detects prior results and
//! skips instead of recomputing.

mod drawings;
mod marginals;

pub use drawings::{detect_drawings, group_segments_into_drawings};
pub use marginals::{MarginalsConfig, detect_marginals};
