//! Core types for Pod Reaper

pub mod decision;
pub mod pod;
