//! Background tasks for scheduled notification passes.

pub mod scheduler;
