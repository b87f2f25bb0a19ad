//! Core domain types and logic.

pub mod observation;
pub mod macro_data;
pub mod frame;
pub mod indicator;
pub mod indicator_set;
pub mod fear_greed;
pub mod resample;
pub mod halving;
pub mod regime;
pub mod analysis;
pub mod presentation;
pub mod config_validation;
pub mod error;
