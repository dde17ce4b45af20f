// Composition tests: verifying that the pipeline stages chain together.
//
// These tests exercise the data flow between modules:
//   CSV table -> split -> vocabulary -> divergence -> user summary -> cohort report
// Tables are written to uniquely named directories under the system temp dir.

use std::fs;
use std::path::PathBuf;

use adverge::analysis::cohort::{self, CohortOptions, CohortReport};
use adverge::analysis::user::{analyze_records, analyze_table, UserSummary};
use adverge::corpus::loader::TableSchema;
use adverge::corpus::record::VideoRecord;
use adverge::error::AnalysisError;
use adverge::output::report::{write_csv, write_json};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("adverge_test_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const SHOES_TABLE: &str = "isAdvertisement,suggestedWords\n\
                           True,\"shoes shoes, sale\"\n\
                           False,shoes style\n\
                           False,\n";

// ============================================================
// Chain: records -> divergence result
// ============================================================

#[test]
fn records_to_divergence_matches_worked_example() {
    let records = vec![
        VideoRecord::new(Some("shoes, shoes sale"), true),
        VideoRecord::new(Some("shoes, style"), false),
        VideoRecord::new(None, true),
    ];
    let result = analyze_records(&records).unwrap();
    assert_eq!(result.num_unique_words, 3);
    assert_eq!(result.num_total_words, 4);
    assert!(result.js_divergence_pq > 0.0 && result.js_divergence_pq < 1.0);
    assert!((result.js_divergence_pq - result.js_divergence_qp).abs() < 1e-12);
    assert!((result.js_distance_pq - result.js_divergence_pq.sqrt()).abs() < 1e-12);
}

#[test]
fn identical_ad_and_organic_content_has_zero_divergence() {
    let records = vec![
        VideoRecord::new(Some("cooking, pasta recipe"), true),
        VideoRecord::new(Some("pasta recipe, cooking"), false),
    ];
    let result = analyze_records(&records).unwrap();
    assert!(result.js_divergence_pq.abs() < 1e-12);
    assert!(result.js_distance_pq.abs() < 1e-12);
    assert_eq!(result.num_unique_words, 3);
    assert_eq!(result.num_total_words, 6);
}

#[test]
fn disjoint_content_has_maximal_divergence() {
    let records = vec![
        VideoRecord::new(Some("insurance quote"), true),
        VideoRecord::new(Some("cat memes"), false),
    ];
    let result = analyze_records(&records).unwrap();
    assert!((result.js_divergence_pq - 1.0).abs() < 1e-12);
    assert!((result.js_distance_qp - 1.0).abs() < 1e-12);
}

#[test]
fn empty_ad_class_is_an_error_not_nan() {
    let records = vec![
        VideoRecord::new(None, true),
        VideoRecord::new(Some("dance"), false),
    ];
    let err = analyze_records(&records).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyClass { .. }));
    assert!(!err.is_fatal());
}

// ============================================================
// Chain: CSV file -> user summary
// ============================================================

#[test]
fn table_on_disk_to_user_summary() {
    let dir = temp_dir("table");
    let path = dir.join("donor_0042.csv");
    fs::write(&path, SHOES_TABLE).unwrap();

    let summary = analyze_table(&path, &TableSchema::default()).unwrap();
    assert_eq!(summary.user, "0042");
    assert_eq!(summary.result.num_unique_words, 3);
    assert_eq!(summary.result.num_total_words, 4);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("adverge_test_does_not_exist_77.csv");
    let err = analyze_table(&path, &TableSchema::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::Io { .. }));
}

// ============================================================
// Chain: directory -> cohort report -> report files
// ============================================================

#[tokio::test]
async fn cohort_run_orders_users_and_excludes_insufficient() {
    let dir = temp_dir("cohort");
    fs::write(dir.join("user_10.csv"), SHOES_TABLE).unwrap();
    fs::write(
        dir.join("user_2.csv"),
        "isAdvertisement,suggestedWords\nFalse,only organic\n",
    )
    .unwrap();
    fs::write(
        dir.join("user_9.csv"),
        "isAdvertisement,suggestedWords\nTrue,buy now\nFalse,buy later\n",
    )
    .unwrap();
    fs::write(dir.join("notes.txt"), "not a table").unwrap();

    let options = CohortOptions {
        schema: TableSchema::default(),
        concurrency: 2,
    };
    let report = cohort::run(&dir, &options).await.unwrap();

    let ids: Vec<&str> = report.users.iter().map(|u| u.user.as_str()).collect();
    assert_eq!(ids, vec!["9", "10"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].user.as_deref(), Some("2"));

    let mean = report.mean.as_ref().unwrap();
    let expected_mean = (report.users[0].result.js_divergence_pq
        + report.users[1].result.js_divergence_pq)
        / 2.0;
    assert!((mean.js_divergence_pq - expected_mean).abs() < 1e-12);
    assert_eq!(report.columns.len(), 6);

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn cohort_run_aborts_on_malformed_file() {
    let dir = temp_dir("malformed");
    fs::write(dir.join("user_1.csv"), SHOES_TABLE).unwrap();
    fs::write(dir.join("user_5.csv"), "suggestedWords\nhello\n").unwrap();

    let err = cohort::run(&dir, &CohortOptions::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("user_5.csv"), "got: {err}");

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn cohort_run_on_empty_directory() {
    let dir = temp_dir("empty");
    let report = cohort::run(&dir, &CohortOptions::default()).await.unwrap();
    assert!(report.users.is_empty());
    assert!(report.mean.is_none());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn csv_report_has_mean_and_std_rows() {
    let dir = temp_dir("csv_report");
    let users = vec![
        UserSummary {
            user: "1".to_string(),
            result: analyze_records(&[
                VideoRecord::new(Some("a b"), true),
                VideoRecord::new(Some("b c"), false),
            ])
            .unwrap(),
        },
        UserSummary {
            user: "2".to_string(),
            result: analyze_records(&[
                VideoRecord::new(Some("x"), true),
                VideoRecord::new(Some("y"), false),
            ])
            .unwrap(),
        },
    ];
    let report = CohortReport::build(users, vec![]);

    let path = dir.join("out").join("summary.csv");
    write_csv(&report, &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "user,num_unique_words,num_total_words,js_divergence_pq,js_distance_pq,js_divergence_qp,js_distance_qp"
    );
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("1,3,4,"));
    assert!(lines[2].starts_with("2,2,2,1,1,"));
    assert!(lines[3].starts_with("mean,2.5,3,"));
    assert!(lines[4].starts_with("std,"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn json_report_round_trips() {
    let dir = temp_dir("json_report");
    let report = CohortReport::build(
        vec![UserSummary {
            user: "7".to_string(),
            result: analyze_records(&[
                VideoRecord::new(Some("sale"), true),
                VideoRecord::new(Some("sale, fun"), false),
            ])
            .unwrap(),
        }],
        vec![],
    );

    let path = dir.join("summary.json");
    write_json(&report, &path).unwrap();

    let parsed: CohortReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.users.len(), 1);
    assert_eq!(parsed.users[0].user, "7");
    assert_eq!(parsed.users[0].result.num_unique_words, 2);
    assert!(
        (parsed.users[0].result.js_divergence_pq - report.users[0].result.js_divergence_pq).abs()
            < 1e-12
    );
    assert_eq!(parsed.std.unwrap().js_divergence_pq, 0.0);
    assert_eq!(parsed.columns.len(), 6);

    let _ = fs::remove_dir_all(&dir);
}
