pub mod cli;
pub mod commands;
pub mod motif;
pub mod utils;
pub mod writers;
