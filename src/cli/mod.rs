//! CLI Interface: Keystroke input and game screen rendering
//!
//! # Components
//! - `input.rs`: Keystroke capture and choice-key mapping using crossterm
//! - `display.rs`: Menus, quiz rounds, match grid, and the capture overlay

pub mod display;
pub mod input;

pub use display::Display;
pub use input::InputHandler;
