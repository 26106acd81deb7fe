//! Client services, wire clients and local state for the FoodieHub platform.

pub mod cli;
pub mod clients;
pub mod config;
pub mod context;
pub mod domain;
pub mod saga;
pub mod storage;

#[cfg(test)]
mod test;
