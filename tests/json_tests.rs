mod common;

use common::{load_test, run_test};
use std::fs;

#[test]
fn json_validation_tests() {
    let test_dir = "./test_data";
    let mut passed = 0;

    let mut entries: Vec<_> = fs::read_dir(test_dir)
        .expect("test_data directory exists")
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let test_data = load_test(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e));
        let (test_passed, missing_count, extra_count) = run_test(&test_data);

        if !test_passed {
            panic!(
                "Test '{}' failed (missing: {}, extra: {})",
                test_data.test_name, missing_count, extra_count
            );
        }
        passed += 1;
    }

    assert!(passed > 0, "no JSON fixtures found in {}", test_dir);
    println!("All {} JSON validation tests passed", passed);
}
