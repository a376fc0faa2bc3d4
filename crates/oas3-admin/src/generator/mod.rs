pub mod dispatcher;
pub mod emitters;
pub mod fields;
pub mod metrics;
pub mod naming;
pub mod orchestrator;
pub mod schema;
pub mod spec_parser;
pub mod templates;
pub mod validation;

#[cfg(test)]
mod tests;
