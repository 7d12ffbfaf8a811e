pub mod controller;
pub mod prompt;
