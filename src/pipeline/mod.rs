pub mod discover;
pub mod gif;
pub mod library;
pub mod prepare;
