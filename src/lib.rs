//! Slither - classic grid snake for the terminal
//!
//! The simulation lives in the [`game`] module and is deliberately free of
//! I/O: it advances one [`game::Game::tick`] at a time and reports every
//! consequence as a plain value. Around it sit replaceable collaborators:
//! - [`input`] maps key events to game intents
//! - [`render`] draws read-only snapshots with ratatui
//! - [`modes`] owns the terminal and the fixed-timestep loop
//! - [`metrics`] keeps session statistics across restarts

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
