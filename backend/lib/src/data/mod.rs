//! Data module for the market backend

pub mod market_db;
