//! Generates admin UI components (forms and lists) for React, Vue and Angular
//! from OpenAPI v3 documents.

pub mod generator;
pub mod utils;
