#![forbid(unsafe_code)]
//! Configurable heads-up display engine
//!
//! A tree of typed settings drives a set of draggable HUD elements (unit
//! frames, enemy and party lists, job gauges, the limit break bar). Settings
//! travel between users as compact text blobs and are kept in named profiles.
//! The game itself is reached only through [`game::GameStateProvider`] and
//! drawing only through [`render::Renderer`].

pub mod color;
pub mod config;
pub mod constants;
pub mod context;
pub mod game;
pub mod gui;
pub mod hud;
pub mod layout;
pub mod persistence;
pub mod render;
pub mod simulation;
pub mod snapping;
pub mod types;
