//! Retention policy enforcement
//!
//! [`RetentionPolicy`] fixes a record's deadline at creation;
//! [`RetentionEvaluator`] lists and deletes records past it. Deletion is a
//! separate operation from the access projection.

pub mod evaluator;
pub mod policy;

pub use evaluator::RetentionEvaluator;
pub use policy::RetentionPolicy;
