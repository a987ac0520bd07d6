// src/handlers/mod.rs

pub mod auth;
pub mod catalogue;
pub mod olympics;
pub mod results;
