pub mod discover;
pub mod simulate;
pub mod validate;
