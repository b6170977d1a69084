/// Presentation layer: command line interface
pub mod cli;
