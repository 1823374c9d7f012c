pub mod fuzzy;
pub mod preference;
pub mod selection;
