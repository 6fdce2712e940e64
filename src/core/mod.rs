pub mod dispatcher;
pub mod domain;
pub mod pipeline;
pub mod pool;
pub mod reporting;
pub mod traits;
