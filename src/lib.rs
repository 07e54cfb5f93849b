//! Paint text with drifting sine-wave colors.
//!
//! The [render] module holds the color model, the noise that nudges the color phase
//! along and the loop that writes frames to a terminal. [cli] and [config] resolve
//! everything the loop needs from the command line and an optional config file.

pub mod cli;
pub mod config;
pub mod logging;
pub mod render;
