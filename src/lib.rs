pub mod aggregate;
pub mod error;
pub mod exit_codes;
pub mod extract;
pub mod plan;
pub mod registry;
pub mod report;
pub mod runner;
pub mod shell;
pub mod suite;
