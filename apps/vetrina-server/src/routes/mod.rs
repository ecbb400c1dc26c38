//! Route modules for the Vetrina server

pub mod documents;
pub mod engine;
pub mod files;
pub mod health;
pub mod profile;
