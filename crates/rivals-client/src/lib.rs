pub mod searchapi;

pub use searchapi::{SearchApiConfig, SearchApiProvider};
