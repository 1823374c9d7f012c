pub mod repository;
pub mod result_cache;
