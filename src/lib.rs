// Torque dashboard - Client for the torque sensor monitoring API
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
