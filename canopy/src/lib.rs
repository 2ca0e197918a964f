pub mod geo;
pub mod orchestrator;
pub mod present;
pub mod selector;
pub mod service;
pub mod settings;
pub mod validate;
pub mod view;

#[cfg(test)]
mod tests;
