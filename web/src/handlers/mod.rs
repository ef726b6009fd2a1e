//! HTTP handlers shared by every Eventbook deployment.

pub mod health;

pub use health::health_check;
