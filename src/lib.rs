#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! `souschef` turns a list of ingredients into a recipe using Google's
//! [Gemini API].
//!
//! To get started, load a [`Config`], [`Client::connect`] to find a usable
//! [`Model`] and [`Generate::generate`] text from a prompt [`prompt::build`]
//! returns. A [`Session`] wires all of this to a [`session::Console`] and a
//! [`Store`] for the interactive command line program.
//!
//! [Gemini API]: <https://ai.google.dev/api/generate-content>

pub mod key;
pub use key::Key;

pub mod model;
pub use model::Model;

pub mod config;
pub use config::Config;

pub mod prompt;
pub use prompt::{Ingredients, Preferences};

pub mod request;
pub use request::Request;

pub mod response;
pub use response::Response;

pub mod generation;
pub use generation::{GenerationResult, Outcome};

pub mod client;
pub use client::{Client, Generate};

pub mod store;
pub use store::Store;

pub mod session;
pub use session::Session;

/// Re-exports of crates used in the public API to avoid version conflicts.
pub mod exports {
    pub use chrono;
    #[cfg(feature = "log")]
    pub use log;
    pub use reqwest;
    pub use serde;
    pub use serde_json;
}
