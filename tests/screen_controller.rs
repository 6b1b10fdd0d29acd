//! Screen controller state machine driven through a stub explainer

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use market_lens::classification::{recommendation_for, symbol_for};
use market_lens::controller::WARN_NO_SELECTION;
use market_lens::explainer::{ExplanationResult, FailureKind};
use market_lens::session::ScreenState;
use market_lens::view::ExplanationArea;
use market_lens::{
    CategoryLevel, Dataset, Explainer, ExplainerError, MarketError, ScreenController,
};

const DATASET: &str = "\
Category_Main,Demand_Index,Supply_Index,Cost_Index,Attractiveness,Category_Level
Pet Supplies,0.812,0.640,0.530,0.701,Attractive
Beauty,0.91,0.80,0.72,0.826,Highly Attractive
Automotive,0.31,0.22,0.61,0.373,Not Attractive
Books,0.55,0.50,0.48,0.518,Moderate
Garden,0.50,0.50,0.50,0.500,Unspecified
";

/// Replays a fixed outcome and records every prompt it receives
struct StubExplainer {
    outcome: ExplanationResult,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubExplainer {
    fn new(outcome: ExplanationResult) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Explainer for StubExplainer {
    async fn explain(&self, prompt: &str) -> ExplanationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.outcome.clone()
    }
}

fn controller(outcome: ExplanationResult) -> ScreenController<StubExplainer> {
    let dataset = Arc::new(Dataset::from_reader(DATASET.as_bytes()).unwrap());
    ScreenController::new(dataset, StubExplainer::new(outcome))
}

fn ok(text: &str) -> ExplanationResult {
    Ok(text.to_string())
}

#[test]
fn test_initial_state_is_no_selection() {
    let c = controller(ok("unused"));
    assert_eq!(c.state(), &ScreenState::NoSelection);
    let view = c.view();
    assert!(view.selected.is_none());
    assert_eq!(view.explanation, ExplanationArea::Idle);
}

#[test]
fn test_categories_strictly_ascending() {
    let c = controller(ok("unused"));
    let cats = c.categories();
    assert_eq!(
        cats,
        vec!["Automotive", "Beauty", "Books", "Garden", "Pet Supplies"]
    );
    assert!(cats.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_get_record_idempotent_for_every_category() {
    let c = controller(ok("unused"));
    for name in c.categories() {
        let a = c.dataset().get_record(&name).unwrap().clone();
        let b = c.dataset().get_record(&name).unwrap().clone();
        assert_eq!(a.category_name, name);
        assert_eq!(a, b);
    }
}

#[test]
fn test_select_pet_supplies_displays_values() {
    let mut c = controller(ok("unused"));
    c.select("Pet Supplies").unwrap();

    let view = c.view();
    let sel = view.selected.expect("selection should be displayed");
    assert_eq!(sel.category, "Pet Supplies");
    assert_eq!(sel.indicator("Demand Index"), Some("0.812"));
    assert_eq!(sel.indicator("Supply Index"), Some("0.640"));
    assert_eq!(sel.indicator("Cost Index"), Some("0.530"));
    assert_eq!(sel.indicator("Attractiveness Score"), Some("0.701"));
    assert_eq!(sel.banner.symbol, symbol_for(&CategoryLevel::Attractive));
    assert_eq!(sel.banner.level, "Attractive");
    assert_eq!(
        sel.recommendation,
        recommendation_for(&CategoryLevel::Attractive).render()
    );
}

#[test]
fn test_unspecified_level_degrades_to_neutral() {
    let mut c = controller(ok("unused"));
    c.select("Garden").unwrap();
    let sel = c.view().selected.unwrap();
    assert_eq!(sel.banner.symbol, "⚪");
    assert_eq!(sel.banner.level, "Unspecified");
    assert_eq!(
        sel.recommendation,
        recommendation_for(&CategoryLevel::Unknown("anything".into())).render()
    );
}

#[test]
fn test_select_unknown_keeps_state() {
    let mut c = controller(ok("unused"));
    c.select("Beauty").unwrap();
    let err = c.select("Toys").unwrap_err();
    assert!(matches!(err, MarketError::NotFound { ref category } if category == "Toys"));
    assert_eq!(
        c.state(),
        &ScreenState::Selected {
            category: "Beauty".into()
        }
    );
}

#[test]
fn test_clear_returns_to_no_selection() {
    let mut c = controller(ok("unused"));
    c.select("Books").unwrap();
    c.clear();
    assert_eq!(c.state(), &ScreenState::NoSelection);
    assert!(c.view().selected.is_none());
}

#[tokio::test]
async fn test_explain_without_selection_warns_and_skips_call() {
    let mut c = controller(ok("unused"));
    let sent = c.request_explanation().await;

    assert!(!sent);
    assert_eq!(c.explainer().calls.load(Ordering::SeqCst), 0);
    assert_eq!(c.state(), &ScreenState::NoSelection);
    assert_eq!(c.view().warning.as_deref(), Some(WARN_NO_SELECTION));
}

#[tokio::test]
async fn test_explain_success_shows_text() {
    let mut c = controller(ok("Pet supplies have steady demand."));
    c.select("Pet Supplies").unwrap();
    assert!(c.request_explanation().await);

    match c.state() {
        ScreenState::ExplanationShown { category, text, .. } => {
            assert_eq!(category, "Pet Supplies");
            assert_eq!(text, "Pet supplies have steady demand.");
        }
        other => panic!("unexpected state {other:?}"),
    }
    let prompts = c.explainer().prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Pet Supplies"));
    assert!(prompts[0].contains("0.812"));
}

#[tokio::test]
async fn test_auth_failure_shown_and_indicators_unchanged() {
    let mut c = controller(Err(ExplainerError::Auth {
        message: "HTTP 401: invalid key".into(),
    }));
    c.select("Pet Supplies").unwrap();
    let before = c.view().selected.unwrap();

    c.request_explanation().await;

    let view = c.view();
    assert_eq!(view.selected.as_ref(), Some(&before));
    match view.explanation {
        ExplanationArea::Error {
            kind,
            message,
            detail,
        } => {
            assert_eq!(kind, FailureKind::Auth);
            assert_eq!(message, FailureKind::Auth.user_message());
            assert!(detail.contains("401"));
        }
        other => panic!("unexpected explanation area {other:?}"),
    }
}

#[tokio::test]
async fn test_retrigger_discards_previous_text() {
    let mut c = controller(ok("first"));
    c.select("Beauty").unwrap();
    c.request_explanation().await;

    let prompt = c.begin_explanation().expect("selection present");
    assert!(prompt.contains("Beauty"));
    assert_eq!(
        c.state(),
        &ScreenState::ExplanationPending {
            category: "Beauty".into()
        }
    );
    assert_eq!(c.view().explanation, ExplanationArea::Loading);

    c.finish_explanation(Err(ExplainerError::Network {
        message: "timed out".into(),
    }));
    assert!(matches!(
        c.state(),
        ScreenState::ExplanationFailed {
            kind: FailureKind::Network,
            ..
        }
    ));

    // failed -> pending again
    assert!(c.begin_explanation().is_some());
    assert!(c.state().is_pending());
}

#[tokio::test]
async fn test_reselect_drops_explanation() {
    let mut c = controller(ok("text"));
    c.select("Beauty").unwrap();
    c.request_explanation().await;
    c.select("Books").unwrap();
    assert_eq!(
        c.state(),
        &ScreenState::Selected {
            category: "Books".into()
        }
    );
    assert_eq!(c.view().explanation, ExplanationArea::Idle);
}

#[test]
fn test_finish_without_pending_is_ignored() {
    let mut c = controller(ok("unused"));
    c.select("Books").unwrap();
    c.finish_explanation(Ok("stray".into()));
    assert_eq!(
        c.state(),
        &ScreenState::Selected {
            category: "Books".into()
        }
    );
}

#[test]
fn test_select_clears_warning() {
    let mut c = controller(ok("unused"));
    assert!(c.begin_explanation().is_none());
    assert!(c.session().warning.is_some());
    c.select("Books").unwrap();
    assert!(c.session().warning.is_none());
}

#[test]
fn test_session_serializes() {
    let mut c = controller(ok("unused"));
    c.select("Automotive").unwrap();
    let json = serde_json::to_value(c.session()).unwrap();
    assert_eq!(json["state"]["state"], "selected");
    assert_eq!(json["state"]["category"], "Automotive");
}
