pub mod catalog;
pub mod compiler;
pub mod judge;
pub mod supervisor;
