//! Core domain types
//!
//! Desired state (job and trigger configuration), the definitions sent to
//! the control plane, and the transient values observed while probing a job
//! or monitoring a run.

pub mod job;
pub mod location;
pub mod run;
