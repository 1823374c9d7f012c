pub mod command;
pub mod normalizer;
pub mod systems;
pub mod tag_filter;
pub mod tags;
