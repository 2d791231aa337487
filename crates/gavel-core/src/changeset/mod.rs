//! Change-set model: what a review run takes as input.

pub mod diff;
pub mod types;

pub use diff::{new_side, PatchView};
pub use types::{ChangeError, ChangeSet, FileChange};
