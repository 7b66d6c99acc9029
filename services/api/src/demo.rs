use crate::infra::{parse_status, InMemoryApplicationRepository};
use case_review::config::{AppConfig, ReviewConfig};
use case_review::error::AppError;
use case_review::workflows::status_update::{
    Actor, ApplicationRecord, ApplicationStatus, ApplicationStatusService, CommentAuthor,
    ReferenceNumber, StatusChangeInput, StatusChangeOutcome,
};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct StatusUpdateArgs {
    /// Application reference number, e.g. APP-100
    #[arg(long)]
    pub(crate) reference: String,
    /// Target status (e.g. "Approved", "needs-revision")
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: ApplicationStatus,
    /// Official comment recorded with the change
    #[arg(long, default_value = "")]
    pub(crate) comment: String,
    /// Instructions for the applicant; required for Needs Revision
    #[arg(long)]
    pub(crate) revision_instructions: Option<String>,
    /// Reviewer name (defaults to REVIEW_ACTOR_NAME)
    #[arg(long)]
    pub(crate) actor_name: Option<String>,
    /// Reviewer role (defaults to REVIEW_ACTOR_ROLE)
    #[arg(long)]
    pub(crate) actor_role: Option<String>,
}

fn review_service(
    review: &ReviewConfig,
) -> ApplicationStatusService<InMemoryApplicationRepository> {
    ApplicationStatusService::new(
        Arc::new(InMemoryApplicationRepository::seeded()),
        CommentAuthor::new(review.default_actor()),
    )
}

pub(crate) fn run_list() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = review_service(&config.review);

    println!("Applications");
    for summary in service.list()? {
        println!(
            "- {} | {} | {}",
            summary.reference_number, summary.title, summary.status
        );
    }
    Ok(())
}

pub(crate) async fn run_status_update(args: StatusUpdateArgs) -> Result<(), AppError> {
    let StatusUpdateArgs {
        reference,
        status,
        comment,
        revision_instructions,
        actor_name,
        actor_role,
    } = args;

    let config = AppConfig::load()?;
    let service = review_service(&config.review);
    let actor = actor_name.map(|name| {
        Actor::new(
            name,
            actor_role.unwrap_or_else(|| config.review.actor_role.clone()),
        )
    });

    let input = StatusChangeInput {
        status,
        comment,
        revision_instructions,
    };
    let reference = ReferenceNumber(reference);

    match service.change_status(&reference, input, actor).await? {
        StatusChangeOutcome::Updated(record) => {
            render_record(&record);
            Ok(())
        }
        StatusChangeOutcome::Rejected(form) => Err(AppError::Usage(
            form.notice
                .map(|notice| notice.message)
                .unwrap_or_else(|| "status update was not submitted".to_string()),
        )),
        StatusChangeOutcome::Failed { error, .. } => {
            Err(AppError::Usage(format!("Failed to update status: {error}")))
        }
    }
}

pub(crate) async fn run_demo() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = review_service(&config.review);

    println!("Application status review demo");
    println!(
        "Reviewer: {} ({})",
        config.review.actor_name, config.review.actor_role
    );

    let scenarios = [
        (
            "Approve a complete application",
            "APP-100",
            StatusChangeInput {
                status: ApplicationStatus::Approved,
                comment: "Looks complete".to_string(),
                revision_instructions: None,
            },
        ),
        (
            "Request a revision",
            "APP-101",
            StatusChangeInput {
                status: ApplicationStatus::NeedsRevision,
                comment: "See notes".to_string(),
                revision_instructions: Some("Add budget breakdown".to_string()),
            },
        ),
        (
            "Submit without a comment",
            "APP-102",
            StatusChangeInput {
                status: ApplicationStatus::Rejected,
                comment: String::new(),
                revision_instructions: None,
            },
        ),
    ];

    for (title, reference, input) in scenarios {
        println!("\n{title}");
        let reference = ReferenceNumber::from(reference);
        match service.change_status(&reference, input, None).await? {
            StatusChangeOutcome::Updated(record) => render_record(&record),
            StatusChangeOutcome::Rejected(form) => {
                let message = form
                    .notice
                    .map(|notice| notice.message)
                    .unwrap_or_default();
                println!(
                    "- {} stays {}: {}",
                    form.application.reference_number, form.application.status, message
                );
            }
            StatusChangeOutcome::Failed { error, .. } => {
                println!("- Failed to update status: {error}");
            }
        }
    }

    Ok(())
}

fn render_record(record: &ApplicationRecord) {
    println!(
        "- {} ({}) -> {}",
        record.summary.reference_number, record.summary.title, record.summary.status
    );
    if let Some(instructions) = &record.revision_instructions {
        println!("  Revision instructions: {instructions}");
    }
    for comment in &record.comments {
        let marker = if comment.is_official { "official" } else { "remark" };
        println!(
            "  [{}] {} ({}) at {}: {}",
            marker, comment.user, comment.role, comment.timestamp, comment.message
        );
    }
}
