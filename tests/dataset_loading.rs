//! File-backed dataset loading and the process-wide shared handle

use std::path::PathBuf;
use std::sync::Arc;

use market_lens::MarketError;
use market_lens::dataset::{self, Dataset};

fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "market_lens_{}_{}.csv",
        name,
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

const GOOD: &str = "\
Category_Main,Demand_Index,Supply_Index,Cost_Index,Attractiveness,Category_Level
Pet Supplies,0.812,0.640,0.530,0.701,Attractive
Toys,0.600,0.550,0.400,0.530,Moderate
";

#[test]
fn test_load_from_file() {
    let path = write_fixture("good", GOOD);
    let ds = Dataset::load(&path).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.list_categories(), vec!["Pet Supplies", "Toys"]);
    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_reports_path_and_columns() {
    let path = write_fixture("bad_header", "Category,Demand\nToys,0.1\n");
    let err = Dataset::load(&path).unwrap_err();
    match err {
        MarketError::DataLoad { path: p, message } => {
            assert_eq!(p, path.display().to_string());
            assert!(message.contains("Category_Main"));
            assert!(message.contains("Category_Level"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    std::fs::remove_file(path).ok();
}

#[test]
fn test_empty_file_has_no_header() {
    let path = write_fixture("empty", "");
    assert!(matches!(
        Dataset::load(&path),
        Err(MarketError::DataLoad { .. })
    ));
    std::fs::remove_file(path).ok();
}

#[test]
fn test_shared_handle_loaded_once() {
    let path = write_fixture("shared", GOOD);
    let first = dataset::load_shared(&path).unwrap();
    // a second call with a different path still returns the cached handle
    let second = dataset::load_shared("/does/not/exist.csv").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 2);
    std::fs::remove_file(path).ok();
}
