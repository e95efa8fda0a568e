//! Tugzip: recorded tree rewrites
//!
//! Drives label-matching rewrite scripts over JSON trees and records the
//! requested edits, sequentially or with siblings visited in parallel.

// Edit-recording protocol - re-exported from tugzip-core
pub use tugzip_core::buffer;
pub use tugzip_core::context;
pub use tugzip_core::node;
pub use tugzip_core::recorder;
pub use tugzip_core::session;
pub use tugzip_core::zipper;

// Driver
pub mod error;
pub mod output;
pub mod script;
pub mod tree;
pub mod walk;

// Front door
pub mod cli;
