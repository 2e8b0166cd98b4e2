#![forbid(unsafe_code)]

//! Runtime: engine-to-view state bridge and a headless Elm-style loop.
//!
//! # Role in ProofDeck
//! `pdeck-runtime` owns the pieces between an engine and a model:
//! - [`bridge::StateBridge`] holds the single engine subscription of a
//!   mounted view and exposes the latest snapshot lock-free.
//! - [`program::Program`] runs `Model::update` / `Model::view` against
//!   canonical [`Event`](pdeck_core::event::Event)s and keeps the last
//!   rendered [`Frame`](pdeck_render::frame::Frame).
//! - [`config::ViewConfig`] carries every tunable, loadable from TOML or
//!   JSON behind the `config` feature.
//!
//! # How it fits in the system
//! The `pdeck` crate implements [`program::Model`] for its proof view and
//! uses the bridge's version counter as the render trigger. Hosts (the CLI,
//! tests) feed events into a [`program::Program`] and read frames back.

pub mod bridge;
pub mod config;
pub mod program;

pub use bridge::StateBridge;
pub use config::{CommitPolicy, ConfigError, GesturePolicy, Labels, ViewConfig};
pub use program::{Cmd, Model, Program};
