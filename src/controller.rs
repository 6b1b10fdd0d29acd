//! Screen controller: selection and explanation state machine
//!
//! ```text
//! NoSelection ──select──▶ Selected ──explain──▶ ExplanationPending
//!      ▲                     │                    │         │
//!      └───────clear─────────┘              Ok(text)     Err(e)
//!                                               ▼            ▼
//!                                   ExplanationShown  ExplanationFailed
//!                                               └──explain───┘ (back to Pending)
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dataset::Dataset;
use crate::error::{MarketError, Result};
use crate::explainer::{Explainer, ExplanationResult, build_prompt_for};
use crate::session::{ScreenState, SessionState};
use crate::view::ScreenView;

pub const WARN_NO_SELECTION: &str = "Select a category before requesting an explanation.";

pub struct ScreenController<E: Explainer> {
    dataset: Arc<Dataset>,
    explainer: E,
    session: SessionState,
}

impl<E: Explainer> ScreenController<E> {
    pub fn new(dataset: Arc<Dataset>, explainer: E) -> Self {
        Self {
            dataset,
            explainer,
            session: SessionState::default(),
        }
    }

    pub fn categories(&self) -> Vec<String> {
        self.dataset.list_categories()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn state(&self) -> &ScreenState {
        &self.session.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Select a category. Unknown names leave the state untouched.
    pub fn select(&mut self, category: &str) -> Result<()> {
        if self.dataset.get_record(category).is_none() {
            debug!("select: '{}' not in dataset", category);
            return Err(MarketError::NotFound {
                category: category.to_string(),
            });
        }
        info!("Selected category '{}'", category);
        self.session.state = ScreenState::Selected {
            category: category.to_string(),
        };
        self.session.warning = None;
        Ok(())
    }

    /// Explicit reset back to no selection
    pub fn clear(&mut self) {
        debug!("Selection cleared");
        self.session = SessionState::default();
    }

    /// Enter `ExplanationPending` and return the prompt to send.
    ///
    /// Returns `None` (with a user warning set) when nothing is selected.
    pub fn begin_explanation(&mut self) -> Option<String> {
        let Some(category) = self.session.state.category().map(str::to_string) else {
            warn!("Explanation requested with no category selected");
            self.session.warning = Some(WARN_NO_SELECTION.to_string());
            return None;
        };
        let record = self.dataset.get_record(&category)?;
        let prompt = build_prompt_for(record);

        self.session.state = ScreenState::ExplanationPending { category };
        self.session.warning = None;
        Some(prompt)
    }

    /// Resolve a pending explanation. Ignored unless a request is pending.
    pub fn finish_explanation(&mut self, result: ExplanationResult) {
        let ScreenState::ExplanationPending { category } = &self.session.state else {
            debug!("finish_explanation with no pending request; ignoring");
            return;
        };
        let category = category.clone();

        self.session.state = match result {
            Ok(text) => {
                info!("Explanation received for '{}'", category);
                ScreenState::ExplanationShown {
                    category,
                    text,
                    received_at: chrono::Utc::now(),
                }
            }
            Err(err) => {
                warn!("Explanation failed for '{}': {}", category, err);
                ScreenState::ExplanationFailed {
                    category,
                    kind: err.kind(),
                    message: err.message().to_string(),
                }
            }
        };
    }

    /// One user-triggered request: begin, call the explainer once, finish.
    /// Returns false when nothing was sent.
    pub async fn request_explanation(&mut self) -> bool {
        let Some(prompt) = self.begin_explanation() else {
            return false;
        };
        let result = self.explainer.explain(&prompt).await;
        self.finish_explanation(result);
        true
    }

    pub fn explainer(&self) -> &E {
        &self.explainer
    }

    pub fn view(&self) -> ScreenView {
        ScreenView::build(&self.dataset, &self.session)
    }
}
