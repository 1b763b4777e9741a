pub mod repo;

pub use repo::{GitRepo, LogRequest, DEFAULT_TIMEOUT};
