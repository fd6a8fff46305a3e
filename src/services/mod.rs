// Service module exports

pub mod countdown;
pub mod engine;
pub mod schedule;
