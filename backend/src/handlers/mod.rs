pub mod auth;
pub mod entries;
pub mod health;
pub mod recommendations;
pub mod stats;
