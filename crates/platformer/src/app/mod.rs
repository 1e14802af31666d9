pub(crate) mod bootstrap;
mod gameplay;
mod persistence;
mod quest_file;
pub(crate) mod runner;
mod script;
