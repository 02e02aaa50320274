//! Directory snapshots
//!
//! `TreeWalker` walks one root up to a depth bound and produces a
//! `TreeNode`: nested maps for expanded directories, `FileRecord` leaves
//! for files and for directories left unexpanded.

mod node;
mod walker;

pub use node::TreeNode;
pub use walker::TreeWalker;
