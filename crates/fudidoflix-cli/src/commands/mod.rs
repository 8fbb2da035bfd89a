pub mod catalog;
pub mod config;
pub mod inbox;
pub mod library;
pub mod sorte;
pub mod title;
