use certeval::error::CertEvalError;
use certeval::evaluator::{Credentials, LlmGateway, ProviderRegistry, RetryPolicy};
use certeval::store::{DataDictionary, DatasetCatalog, LogStore};
use std::fs;
use std::path::PathBuf;

#[test]
fn missing_credential_names_the_provider() {
    let err = Credentials::new().get("GPT-3.5").unwrap_err();

    assert!(matches!(err, CertEvalError::MissingCredential { ref provider } if provider == "GPT-3.5"));
    assert_eq!(err.to_string(), "No credential supplied for provider GPT-3.5");
}

#[tokio::test]
async fn gateway_rejects_unregistered_provider() {
    let gateway = LlmGateway::new(ProviderRegistry::new(), RetryPolicy::none());

    let err = gateway.generate("prompt", "Claude", "key").await.unwrap_err();

    assert!(matches!(err, CertEvalError::UnknownProvider(_)));
}

#[test]
fn unknown_dataset_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file_list.csv");
    fs::write(&path, "file_folder,file_name,file_description\nMonitors,m.csv,Monitors\n").unwrap();

    let catalog = DatasetCatalog::load(&path).unwrap();
    let err = catalog.find("Notebooks").unwrap_err();

    assert!(matches!(err, CertEvalError::DatasetNotFound(ref name) if name == "Notebooks"));
}

#[test]
fn log_with_wrong_width_is_a_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    fs::write(&path, "id,name\n1,ThinkBook\n").unwrap();

    let err = LogStore::new(&path).read_all().unwrap_err();

    assert!(matches!(err, CertEvalError::StoreSchema { .. }));
    assert!(err.is_persistence());
}

#[test]
fn missing_dictionary_is_a_persistence_error() {
    let path = PathBuf::from("/nonexistent/certeval/dictionary.csv");

    let err = DataDictionary::load(&path).unwrap_err();

    assert!(err.is_persistence(), "unexpected error: {:?}", err);
}

#[test]
fn lookup_errors_are_not_persistence_errors() {
    assert!(!CertEvalError::ProductNotFound("X".into()).is_persistence());
    assert!(!CertEvalError::NoMandates("TCO".into()).is_persistence());
}

#[test]
fn exit_codes_group_errors_by_cause() {
    assert_eq!(CertEvalError::InvalidArguments("no certification".into()).exit_code(), 2);
    assert_eq!(CertEvalError::UnknownProvider("Claude".into()).exit_code(), 3);
    assert_eq!(
        CertEvalError::MissingCredential {
            provider: "Cohere".into()
        }
        .exit_code(),
        3
    );
    assert_eq!(CertEvalError::ColumnNotFound("Battery".into()).exit_code(), 4);
    assert_eq!(
        CertEvalError::StoreSchema {
            path: PathBuf::from("log.csv"),
            detail: "expected 14 columns".into(),
        }
        .exit_code(),
        5
    );
    assert_eq!(
        CertEvalError::IoError(std::io::Error::other("disk full")).exit_code(),
        5
    );
}
