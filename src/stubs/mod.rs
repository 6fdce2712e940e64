pub mod compiler;
pub mod judge;
#[cfg(target_os = "linux")]
pub mod process;
