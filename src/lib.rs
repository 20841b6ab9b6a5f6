// Hoaks: hoax detection for Indonesian-language news
//
// This is the library root. Each module corresponds to one stage of the
// pipeline: source files are unified into a normalized corpus, the corpus
// trains a TF-IDF + logistic regression model, and the inference service
// scores new articles with that model.

pub mod config;
pub mod corpus;
pub mod inference;
pub mod language;
pub mod model;
pub mod output;
pub mod pdf;
pub mod status;
pub mod summary;
pub mod text;
pub mod training;

#[cfg(feature = "web")]
pub mod web;
