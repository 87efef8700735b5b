//! Command implementations

pub mod recommend;
