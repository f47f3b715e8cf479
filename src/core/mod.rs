// src/core/mod.rs

pub mod grid;
pub mod html;
pub mod net;
pub mod sanitize;
