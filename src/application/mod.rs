/// Application layer: the workflows driven by the command line
pub mod services;
pub mod use_cases;
