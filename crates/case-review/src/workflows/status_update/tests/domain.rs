use crate::workflows::status_update::domain::{
    ApplicationStatus, StatusParseError, StatusUpdateRequest,
};
use serde_json::json;

use super::common::*;

#[test]
fn status_catalogue_is_ordered() {
    let values: Vec<_> = ApplicationStatus::options()
        .into_iter()
        .map(|option| option.value)
        .collect();
    assert_eq!(
        values,
        vec![
            "Pending",
            "Document Verification",
            "On Review",
            "Final Assessment",
            "Needs Revision",
            "Approved",
            "Rejected",
        ]
    );
}

#[test]
fn status_parses_wire_values_and_cli_spellings() {
    assert_eq!(
        "Needs Revision".parse::<ApplicationStatus>(),
        Ok(ApplicationStatus::NeedsRevision)
    );
    assert_eq!(
        "needs-revision".parse::<ApplicationStatus>(),
        Ok(ApplicationStatus::NeedsRevision)
    );
    assert_eq!(
        "FINAL_ASSESSMENT".parse::<ApplicationStatus>(),
        Ok(ApplicationStatus::FinalAssessment)
    );
    assert_eq!(
        "archived".parse::<ApplicationStatus>(),
        Err(StatusParseError("archived".to_string()))
    );
}

#[test]
fn only_needs_revision_requires_instructions() {
    let requiring: Vec<_> = ApplicationStatus::ALL
        .into_iter()
        .filter(|status| status.requires_revision_instructions())
        .collect();
    assert_eq!(requiring, vec![ApplicationStatus::NeedsRevision]);
}

#[test]
fn request_uses_wire_field_names() {
    let request = StatusUpdateRequest {
        status: ApplicationStatus::Approved,
        comment: author().official_comment("Looks complete"),
        revision_instructions: None,
    };

    let value = serde_json::to_value(&request).expect("request serializes");

    assert_eq!(value["status"], json!("Approved"));
    assert_eq!(value["revisionInstructions"], serde_json::Value::Null);
    assert_eq!(value["comment"]["isOfficial"], json!(true));
    assert_eq!(value["comment"]["message"], json!("Looks complete"));
    assert_eq!(value["comment"]["user"], json!("Admin User"));
    assert_eq!(value["comment"]["role"], json!("admin"));
}

#[test]
fn application_summary_reads_camel_case() {
    let summary: crate::workflows::status_update::ApplicationSummary = serde_json::from_value(
        json!({ "referenceNumber": "APP-100", "title": "Grant X", "status": "Pending" }),
    )
    .expect("summary deserializes");
    assert_eq!(summary, application());
}
