pub mod competitor_repository;
pub mod config;
pub mod crawl_repository;
pub mod database;

pub use competitor_repository::CompetitorRepository;
pub use config::DatabaseConfig;
pub use crawl_repository::CrawlJobRepository;
pub use database::Database;
