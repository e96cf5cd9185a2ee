pub mod project;
pub mod script;
