pub mod dispatcher;
pub mod strategies;
