pub mod admin;
pub mod check;
pub mod config;
pub mod parallax;
pub mod run;
