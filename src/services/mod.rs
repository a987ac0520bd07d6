// src/services/mod.rs

//! Database-backed operations. Every write takes the acting identity as an
//! explicit `Actor` argument and stamps audit fields from it.

pub mod catalogue;
pub mod lookup;
pub mod olympics;
pub mod results;
