//! Implementations of the core traits on top of the host system: a real
//! compiler process, real child processes and the on-disk problem layout.
pub mod catalog;
pub mod compiler;
pub mod process;
pub mod supervisor;
