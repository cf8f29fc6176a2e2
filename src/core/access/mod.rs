//! Role-based projection of patient rows
//!
//! Each role reads through its own store query, so raw identity never
//! reaches the doctor or receptionist code path.

pub mod projector;

pub use projector::{AccessProjector, PatientView, RestrictedPatientView, ViewMode, HIDDEN};
