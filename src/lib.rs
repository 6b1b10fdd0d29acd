pub mod classification;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod error;
pub mod explainer;
pub mod session;
pub mod tui;
pub mod view;

pub use controller::ScreenController;
pub use dataset::{CategoryLevel, CategoryRecord, Dataset};
pub use error::{MarketError, Result};
pub use explainer::{Explainer, ExplainerError, FailureKind, OpenAiExplainer};

