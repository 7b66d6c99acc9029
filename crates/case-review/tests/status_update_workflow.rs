//! End-to-end scenarios for the status update form, driven through the public
//! API with an in-test update handler.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use case_review::workflows::status_update::{
    Actor, ApplicationStatus, ApplicationSummary, CommentAuthor, ReferenceNumber,
    SequentialCommentIds, StatusUpdateForm, StatusUpdateHandler, StatusUpdateRequest,
    SubmitOutcome, SystemClock, UpdateError,
};

#[derive(Default)]
struct CapturingHandler {
    requests: Mutex<Vec<StatusUpdateRequest>>,
}

#[async_trait]
impl StatusUpdateHandler for CapturingHandler {
    async fn update_status(&self, request: StatusUpdateRequest) -> Result<(), UpdateError> {
        self.requests.lock().expect("mutex poisoned").push(request);
        Ok(())
    }
}

fn grant_application() -> ApplicationSummary {
    ApplicationSummary {
        reference_number: ReferenceNumber::from("APP-100"),
        title: "Grant X".to_string(),
        status: ApplicationStatus::Pending,
    }
}

fn author() -> CommentAuthor {
    CommentAuthor::with_sources(
        Actor::new("Admin User", "admin"),
        Arc::new(SequentialCommentIds::default()),
        Arc::new(SystemClock),
    )
}

#[tokio::test]
async fn closure_close_handler_fires_after_approval() {
    let closes = Arc::new(AtomicUsize::new(0));
    let counter = closes.clone();
    let handler = Arc::new(CapturingHandler::default());
    let mut form = StatusUpdateForm::new(
        grant_application(),
        author(),
        handler.clone(),
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    form.select_status(ApplicationStatus::Approved);
    form.set_comment("Looks complete");
    assert!(matches!(form.submit().await, SubmitOutcome::Updated));

    let requests = handler.requests.lock().expect("mutex poisoned").clone();
    assert_eq!(requests.len(), 1);
    let payload = serde_json::to_value(&requests[0]).expect("request serializes");
    assert_eq!(payload["status"], "Approved");
    assert!(payload["revisionInstructions"].is_null());
    assert_eq!(payload["comment"]["message"], "Looks complete");
    assert_eq!(payload["comment"]["isOfficial"], true);
    assert_eq!(payload["comment"]["role"], "admin");
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn every_status_but_needs_revision_omits_instructions() {
    for status in ApplicationStatus::ALL {
        let handler = Arc::new(CapturingHandler::default());
        let mut form = StatusUpdateForm::new(
            grant_application(),
            author(),
            handler.clone(),
            Arc::new(|| {}),
        );
        form.set_revision_instructions("Add budget breakdown");
        form.select_status(status);
        form.set_comment("See notes");

        assert!(matches!(form.submit().await, SubmitOutcome::Updated));

        let request = handler
            .requests
            .lock()
            .expect("mutex poisoned")
            .pop()
            .expect("request recorded");
        if status == ApplicationStatus::NeedsRevision {
            assert_eq!(
                request.revision_instructions.as_deref(),
                Some("Add budget breakdown")
            );
        } else {
            assert_eq!(request.revision_instructions, None, "{status}");
        }
    }
}

#[tokio::test]
async fn blank_comment_keeps_the_form_open() {
    let handler = Arc::new(CapturingHandler::default());
    let closes = Arc::new(AtomicUsize::new(0));
    let counter = closes.clone();
    let mut form = StatusUpdateForm::new(
        grant_application(),
        author(),
        handler.clone(),
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );
    form.select_status(ApplicationStatus::Rejected);

    assert!(matches!(
        form.submit().await,
        SubmitOutcome::Rejected(_)
    ));
    let notice = form.view().notice.expect("validation message shown");
    assert!(!notice.message.is_empty());
    assert!(handler.requests.lock().expect("mutex poisoned").is_empty());
    assert_eq!(closes.load(Ordering::SeqCst), 0);
    assert!(form.controls_enabled());
}
