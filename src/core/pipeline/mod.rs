pub mod comparing;
pub mod judging;
pub mod workspace;
