pub mod camera;
pub mod capture;
pub mod colony;
pub mod config;
pub mod dna;
pub mod economy;
pub mod error;
pub mod event_log;
pub mod locomotion;
pub mod math;
pub mod outline;
pub mod render;
pub mod selection;
pub mod simulation;
pub mod timer;
pub mod worm;
