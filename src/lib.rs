pub mod board;
pub mod discord;
pub mod handler;
pub mod model;
pub mod resolver;
pub mod schedule;
pub mod ticker;
