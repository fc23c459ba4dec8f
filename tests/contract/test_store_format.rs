use certeval::evaluator::EvaluationAggregator;
use certeval::models::{LogEntry, Mandate, Product, SummaryRecord, Verdict, TIMESTAMP_FORMAT};
use certeval::store::{DataDictionary, LogStore, SummaryStore, LOG_COLUMNS, SUMMARY_COLUMNS};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;

const LOG_HEADER: &str = "id,name,category_id,category_label,certs,Certification,Mandate Number,Mandate title,Mandate Description,prompt,response,recommendation,model,rec_datetime";
const SUMMARY_HEADER: &str =
    "product,model,cert,mandates passed,mandates failed,mandates na,percentage_passed,time,cost";

fn product() -> Product {
    let row: HashMap<String, String> = [
        ("id", "17"),
        ("name", "ThinkBook 14"),
        ("category_id", "3"),
        ("category_label", "Notebooks"),
        ("Sustainability certificates.42513", "TCO Certified, EPEAT Gold"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    Product::from_row(row)
}

fn mandate() -> Mandate {
    Mandate {
        certification: "TCO".to_string(),
        number: "2".to_string(),
        title: "Weight".to_string(),
        description: "Portable products must weigh less than 3 kg.".to_string(),
        relevant_columns: Vec::new(),
    }
}

fn entry(response: &str, verdict: Verdict) -> LogEntry {
    LogEntry::new(
        &product(),
        &mandate(),
        "MANDATE\n\nTCO Certification\nMandate 2: Weight".to_string(),
        response.to_string(),
        verdict,
        "Cohere",
    )
}

#[test]
fn test_column_sets() {
    assert_eq!(LOG_COLUMNS.join(","), LOG_HEADER);
    assert_eq!(SUMMARY_COLUMNS.join(","), SUMMARY_HEADER);
}

#[test]
fn test_prepended_entry_reads_back_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = LogStore::new(dir.path().join("product_mandate_recommendation.csv"));
    store
        .prepend(&[entry("Recommendation: FALSE", Verdict::NonCompliant)])
        .unwrap();

    let written = entry(
        "Recommendation: TRUE\nReasoning: 1.4 kg, \"well below\" the limit.",
        Verdict::Compliant,
    );
    store.prepend(std::slice::from_ref(&written)).unwrap();

    let rows = store.read_all().unwrap();
    assert_eq!(rows.len(), 2);

    let first = &rows[0];
    assert_eq!(first.product_id, written.product_id);
    assert_eq!(first.product_name, written.product_name);
    assert_eq!(first.category_id, written.category_id);
    assert_eq!(first.category_label, written.category_label);
    assert_eq!(first.certs, written.certs);
    assert_eq!(first.certification, written.certification);
    assert_eq!(first.mandate_number, written.mandate_number);
    assert_eq!(first.mandate_title, written.mandate_title);
    assert_eq!(first.mandate_description, written.mandate_description);
    assert_eq!(first.prompt_text, written.prompt_text);
    assert_eq!(first.raw_response, written.raw_response);
    assert_eq!(first.verdict, written.verdict);
    assert_eq!(first.provider_name, written.provider_name);
    assert_eq!(
        first.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        written.timestamp.format(TIMESTAMP_FORMAT).to_string()
    );

    assert_eq!(rows[1].verdict, Verdict::NonCompliant);
}

#[test]
fn test_log_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    LogStore::new(&path)
        .prepend(&[
            entry("TRUE", Verdict::Compliant),
            entry("nope", Verdict::NonCompliant),
            entry("more info", Verdict::Indeterminate),
            entry("Error in Cohere response: bad key", Verdict::Error),
        ])
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with(&format!("{}\n", LOG_HEADER)));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    let recommendations: Vec<&str> = rows.iter().map(|r| &r[11]).collect();
    assert_eq!(recommendations, vec!["True", "False", "N/A", "Error"]);

    for row in &rows {
        assert_eq!(&row[4], "TCO Certified, EPEAT Gold");
        assert!(NaiveDateTime::parse_from_str(&row[13], TIMESTAMP_FORMAT).is_ok());
        assert_eq!(row[13].len(), "2024-01-05 10:00:00.000000".len());
    }
}

#[test]
fn test_legacy_rows_survive_a_prepend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    let legacy_row = "5,Old Monitor,2,Monitors,,TCO,1,Energy,Desc,prompt text,\"Recommendation: TRUE\nReasoning: fine\",True,GPT-3.5,2023-11-02 09:15:42.118204\n";
    fs::write(&path, format!("{}\n{}", LOG_HEADER, legacy_row)).unwrap();

    LogStore::new(&path)
        .prepend(&[entry("TRUE", Verdict::Compliant)])
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.ends_with(legacy_row), "content: {}", content);

    let rows = LogStore::new(&path).read_all().unwrap();
    assert_eq!(rows[0].product_name, "ThinkBook 14");
    assert_eq!(rows[1].product_name, "Old Monitor");
    assert_eq!(rows[1].raw_response, "Recommendation: TRUE\nReasoning: fine");
}

#[test]
fn test_logged_run_can_be_summarized_again() {
    let dir = tempfile::tempdir().unwrap();
    let store = LogStore::new(dir.path().join("log.csv"));
    let mut other_provider = entry("TRUE", Verdict::Compliant);
    other_provider.provider_name = "LLaMA2".to_string();
    store
        .prepend(&[
            entry("TRUE", Verdict::Compliant),
            entry("FALSE", Verdict::NonCompliant),
            entry("cannot determine", Verdict::Indeterminate),
            other_provider,
        ])
        .unwrap();

    let entries = store.entries_for("ThinkBook 14", "TCO", "Cohere").unwrap();
    assert_eq!(entries.len(), 3);

    let summary = EvaluationAggregator::new().summarize(
        "ThinkBook 14",
        "TCO",
        "Cohere",
        &entries,
        Duration::from_millis(2600),
    );
    assert_eq!(
        (summary.passed_count, summary.failed_count, summary.indeterminate_count),
        (1, 1, 1)
    );
    assert_eq!(summary.pass_percentage, 50);
    assert_eq!(summary.elapsed_seconds, 3);
}

#[test]
fn test_summary_rows_are_prepended() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("product_recommendation_summary.csv");
    let store = SummaryStore::new(&path);

    let record = |provider: &str, percentage: u32| SummaryRecord {
        product_name: "ThinkBook 14".to_string(),
        provider_name: provider.to_string(),
        certification: "TCO".to_string(),
        passed_count: 1,
        failed_count: 0,
        indeterminate_count: 1,
        pass_percentage: percentage,
        elapsed_seconds: 3,
        cost: 0.0,
    };
    store.prepend(&record("Cohere", 100)).unwrap();
    store.prepend(&record("LLaMA2", 100)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], SUMMARY_HEADER);
    assert!(lines[1].starts_with("ThinkBook 14,LLaMA2,TCO,1,0,1,100,3,"));
    assert!(lines[2].starts_with("ThinkBook 14,Cohere,TCO,1,0,1,100,3,"));

    let records = store.read_all().unwrap();
    assert_eq!(records[1], record("Cohere", 100));
}

#[test]
fn test_dictionary_approval_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Notebooks_Data_Dictionary.csv");
    fs::write(
        &path,
        "Product Category,Column Name Raw,Column Name,Column Top Values,Column Unit,Column Min,Column Max,Column Definition,Approved\n\
         Notebooks,Weight.12,Weight,\"['1.4', '1.9']\",kg,0.9,2.7,,False\n",
    )
    .unwrap();

    let mut dictionary = DataDictionary::load(&path).unwrap();
    dictionary
        .approve("Weight", "Weight of the notebook, in kilograms.")
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content.lines().nth(1).unwrap(),
        "Notebooks,Weight.12,Weight,\"['1.4', '1.9']\",kg,0.9,2.7,\"Weight of the notebook, in kilograms.\",True"
    );
}
