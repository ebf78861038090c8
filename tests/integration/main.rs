//! Integration tests for cadence

mod helpers;

mod demo_test;
mod inspect_test;
mod run_test;
mod timer_test;
