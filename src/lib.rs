pub mod app;
pub mod clock;
pub mod config;
pub mod game;
pub mod input;
pub mod placement;
pub mod render;
pub mod score_store;
pub mod snake;
pub mod term;
