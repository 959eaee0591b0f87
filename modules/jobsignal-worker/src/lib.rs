pub mod dedup;
pub mod digest;
pub mod mailer;
pub mod normalize;
pub mod pipeline;
pub mod pool;
pub mod run_tracker;
pub mod runner;
pub mod score;
pub mod sources;
pub mod store;

pub use pipeline::Pipeline;
pub use runner::RunPool;
pub use store::{KvStore, RedisStore};

#[cfg(test)]
mod pipeline_tests;
#[cfg(test)]
pub(crate) mod testing;
