//! Filesystem utilities for tokenforge.

pub mod atomic;

pub use atomic::atomic_write_file;
