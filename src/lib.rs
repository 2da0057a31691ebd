//! Rail Traffic Simulation Library
//!
//! A discrete-event train-traffic simulation engine that can run headless
//! or feed a dashboard rendering layer.

pub mod simulation;
