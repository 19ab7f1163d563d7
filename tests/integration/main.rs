// tests/integration/main.rs

mod common;
mod groups;
mod syncables;
