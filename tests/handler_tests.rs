//! Handler tests: tool behaviour over a file-backed store
mod common;

use common::*;
use std::sync::Arc;
use study_reminders::*;

async fn add(handler: &StudyReminderHandler, title: &str, due: &str, kind: Option<&str>) -> String {
    let response = handler
        .handle_add(
            title.to_string(),
            "Math".to_string(),
            due.to_string(),
            kind.map(str::to_string),
            None,
        )
        .await
        .unwrap();
    extract_id_from_response(&response)
}

#[tokio::test]
async fn test_add_and_list() {
    let (handler, _temp_file) = get_test_handler();

    let id = add(&handler, "Study Calculus", "2099-05-01", None).await;
    assert_eq!(id, "r-1");

    let list = handler.handle_list(None, None, None).await.unwrap();
    assert!(list.starts_with("Found 1 reminder(s):"));
    assert!(list.contains("[r-1] Study Calculus (Study Session)"));
}

#[tokio::test]
async fn test_list_empty() {
    let (handler, _temp_file) = get_test_handler();
    let list = handler.handle_list(None, None, None).await.unwrap();
    assert!(list.starts_with("No reminders yet"));
}

#[tokio::test]
async fn test_list_pinned_first_and_overdue() {
    let (handler, _temp_file) = get_test_handler();
    let past = add(&handler, "Algebra", "2001-01-01", None).await;
    let future = add(&handler, "History quiz", "2099-01-01", Some("quiz")).await;
    handler.handle_toggle_pin(future.clone()).await.unwrap();

    let list = handler.handle_list(None, None, None).await.unwrap();
    let future_at = list.find(&format!("[{}]", future)).unwrap();
    let past_at = list.find(&format!("[{}]", past)).unwrap();
    assert!(future_at < past_at);
    assert!(list.contains("Algebra (Study Session) [overdue]"));
    assert!(list.contains("History quiz (Quiz/Exam) [pinned]\n"));
}

#[tokio::test]
async fn test_list_type_filter_and_search() {
    let (handler, _temp_file) = get_test_handler();
    add(&handler, "Calculus review", "2099-01-01", None).await;
    add(&handler, "Calculus quiz", "2099-01-02", Some("quiz")).await;
    add(&handler, "Chemistry", "2099-01-03", Some("quiz")).await;

    let list = handler
        .handle_list(Some("calc".to_string()), Some("quiz".to_string()), None)
        .await
        .unwrap();
    assert!(list.starts_with("Found 1 reminder(s):"));
    assert!(list.contains("Calculus quiz"));

    let invalid = handler
        .handle_list(None, Some("exam".to_string()), None)
        .await;
    assert!(invalid.is_err());
}

#[tokio::test]
async fn test_add_with_unknown_type_defaults_to_study() {
    let (handler, _temp_file) = get_test_handler();
    add(&handler, "Lecture notes", "2099-01-01", Some("lecture")).await;
    let state = handler.snapshot_state();
    assert_eq!(state.reminders[0].kind, ReminderType::study);
}

#[tokio::test]
async fn test_add_validation_errors() {
    let (handler, _temp_file) = get_test_handler();

    let blank_title = handler
        .handle_add(
            "   ".to_string(),
            "Bio".to_string(),
            "2099-01-01".to_string(),
            None,
            None,
        )
        .await;
    assert!(blank_title.is_err());

    let bad_date = handler
        .handle_add(
            "Cells".to_string(),
            "Bio".to_string(),
            "next tuesday".to_string(),
            None,
            None,
        )
        .await;
    assert!(bad_date.is_err());

    assert!(handler.snapshot_state().reminders.is_empty());
}

#[tokio::test]
async fn test_create_reminder_validation_error_kind() {
    let (handler, _temp_file) = get_test_handler();
    let err = handler
        .create_reminder(&create_test_fields("Cells", " "))
        .unwrap_err();
    assert_eq!(err, ReminderError::Validation(Field::Subject));
}

#[tokio::test]
async fn test_update_keeps_omitted_fields_and_flags() {
    let (handler, _temp_file) = get_test_handler();
    let id = add(&handler, "Algebra", "2099-01-01", Some("quiz")).await;
    handler.handle_toggle_pin(id.clone()).await.unwrap();
    handler.handle_toggle_complete(id.clone()).await.unwrap();
    let before = handler.snapshot_state().reminders[0].clone();

    handler
        .handle_update(
            id.clone(),
            Some("  Linear Algebra ".to_string()),
            None,
            None,
            None,
            Some("matrices".to_string()),
        )
        .await
        .unwrap();

    let after = handler.snapshot_state().reminders[0].clone();
    assert_eq!(after.title, "Linear Algebra");
    assert_eq!(after.subject, before.subject);
    assert_eq!(after.kind, ReminderType::quiz);
    assert_eq!(after.due_date, before.due_date);
    assert_eq!(after.notes.as_deref(), Some("matrices"));
    assert!(after.pinned);
    assert!(after.completed);
    assert_eq!(after.owner_id, "alice");
    assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn test_update_clear_notes_and_reject_blank_title() {
    let (handler, _temp_file) = get_test_handler();
    let id = handler
        .handle_add(
            "Algebra".to_string(),
            "Math".to_string(),
            "2099-01-01".to_string(),
            None,
            Some("old notes".to_string()),
        )
        .await
        .map(|r| extract_id_from_response(&r))
        .unwrap();

    handler
        .handle_update(id.clone(), None, None, None, None, Some(String::new()))
        .await
        .unwrap();
    assert_eq!(handler.snapshot_state().reminders[0].notes, None);

    let result = handler
        .handle_update(id, Some(" ".to_string()), None, None, None, None)
        .await;
    assert!(result.is_err());
    assert_eq!(handler.snapshot_state().reminders[0].title, "Algebra");
}

#[tokio::test]
async fn test_update_missing_reminder() {
    let (handler, _temp_file) = get_test_handler();
    let result = handler
        .handle_update("r-42".to_string(), Some("X".to_string()), None, None, None, None)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_toggle_pin_twice_restores_flag() {
    let (handler, _temp_file) = get_test_handler();
    let id = add(&handler, "Algebra", "2099-01-01", None).await;

    let pinned = handler.flip_pin(&id).unwrap();
    assert!(pinned.pinned);
    assert!(handler.snapshot_state().reminders[0].pinned);

    let unpinned = handler.flip_pin(&id).unwrap();
    assert!(!unpinned.pinned);
    assert!(!handler.snapshot_state().reminders[0].pinned);
}

#[tokio::test]
async fn test_toggle_complete_clears_overdue() {
    let (handler, _temp_file) = get_test_handler();
    let id = add(&handler, "Algebra", "2001-01-01", None).await;

    let message = handler.handle_toggle_complete(id.clone()).await.unwrap();
    assert_eq!(message, format!("Reminder {} marked completed", id));

    let list = handler.handle_list(None, None, None).await.unwrap();
    assert!(list.contains("[x]"));
    assert!(!list.contains("[overdue]"));
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let (handler, _temp_file) = get_test_handler();
    let id = add(&handler, "Algebra", "2099-01-01", None).await;

    assert!(handler.handle_delete(id.clone(), false).await.is_err());
    assert_eq!(handler.snapshot_state().reminders.len(), 1);

    handler.handle_delete(id.clone(), true).await.unwrap();
    assert!(handler.snapshot_state().reminders.is_empty());

    assert!(handler.handle_delete(id, true).await.is_err());
}

#[tokio::test]
async fn test_mutations_require_sign_in() {
    let (handler, _temp_file) = get_signed_out_handler();

    assert_eq!(
        handler.create_reminder(&create_test_fields("Algebra", "Math")),
        Err(ReminderError::AuthRequired)
    );
    assert_eq!(handler.flip_pin("r-1"), Err(ReminderError::AuthRequired));
    assert_eq!(handler.flip_completed("r-1"), Err(ReminderError::AuthRequired));
    assert_eq!(handler.remove_reminder("r-1"), Err(ReminderError::AuthRequired));
    assert!(handler.handle_list(None, None, None).await.is_err());
    assert!(handler.handle_profile().await.is_err());
}

#[tokio::test]
async fn test_sign_in_switches_reminders() {
    let (handler, _temp_file) = get_test_handler();
    add(&handler, "Alice's reminder", "2099-01-01", None).await;

    let greeting = handler
        .handle_sign_in("bob".to_string(), None)
        .await
        .unwrap();
    assert_eq!(greeting, "Signed in as Student (bob)");
    assert!(handler.snapshot_state().reminders.is_empty());

    // bob cannot touch alice's reminder
    assert!(matches!(
        handler.remove_reminder("r-1"),
        Err(ReminderError::Store(StoreError {
            cause: StoreErrorCause::PermissionDenied,
            ..
        }))
    ));

    handler
        .handle_sign_in("alice".to_string(), Some("Alice".to_string()))
        .await
        .unwrap();
    assert_eq!(handler.snapshot_state().reminders.len(), 1);
}

#[tokio::test]
async fn test_sign_out_then_profile() {
    let (handler, _temp_file) = get_test_handler();
    add(&handler, "Algebra", "2099-01-01", None).await;

    let profile = handler.handle_profile().await.unwrap();
    assert!(profile.contains("Name: Alice"));
    assert!(profile.contains("Reminders: 1 (0 completed)"));

    assert_eq!(handler.handle_sign_out().await.unwrap(), "Signed out Alice");
    assert!(handler.snapshot_state().loading);
    assert_eq!(handler.handle_sign_out().await.unwrap(), "Not signed in");
    assert!(handler.handle_profile().await.is_err());
}

#[tokio::test]
async fn test_refresh_picks_up_external_edits() {
    let (handler, temp_file) = get_test_handler();

    let other = FileStore::open(temp_file.path()).unwrap();
    other
        .create(CreatePayload {
            title: "Written elsewhere".to_string(),
            subject: "Math".to_string(),
            kind: ReminderType::study,
            due_date: fixed_now(),
            notes: None,
            completed: false,
            pinned: false,
            owner_id: "alice".to_string(),
        })
        .unwrap();

    assert!(handler.snapshot_state().reminders.is_empty());
    let message = handler.handle_refresh().await.unwrap();
    assert_eq!(message, "Reloaded 1 reminder(s)");
}

#[tokio::test]
async fn test_store_failures_leave_snapshot_unchanged() {
    let existing = create_test_reminder("r-1", "Algebra", 1, false);
    let handler = get_failing_handler(vec![existing.clone()]);

    let err = handler
        .create_reminder(&create_test_fields("Cells", "Bio"))
        .unwrap_err();
    assert_eq!(err.user_message(), "Could not save reminder. Please try again.");

    let err = handler.flip_completed("r-1").unwrap_err();
    assert_eq!(err.user_message(), "Failed to update reminder");

    let err = handler.remove_reminder("r-1").unwrap_err();
    assert_eq!(err.user_message(), "Failed to delete reminder");

    assert!(handler.handle_toggle_pin("r-1".to_string()).await.is_err());
    assert_eq!(handler.snapshot_state().reminders, vec![existing]);
}

#[tokio::test]
async fn test_data_survives_restart() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let path = temp_file.path().to_str().unwrap().to_string();
    {
        let handler =
            StudyReminderHandler::new(&path, Some(UserProfile::new("alice", None))).unwrap();
        add(&handler, "Algebra", "2099-01-01", None).await;
    }

    let handler = StudyReminderHandler::new(&path, Some(UserProfile::new("alice", None))).unwrap();
    let list = handler.handle_list(None, None, None).await.unwrap();
    assert!(list.contains("[r-1] Algebra"));
}

#[tokio::test]
async fn test_list_loading_until_subscription_answers() {
    let store = Arc::new(PendingStore::default());
    let handler = StudyReminderHandler::with_store(
        store.clone(),
        LocalSession::signed_in(UserProfile::new("alice", None)),
    );

    assert!(handler.snapshot_state().loading);
    let list = handler.handle_list(None, None, None).await.unwrap();
    assert_eq!(list, "Loading reminders...");

    // a failed subscription ends loading with an empty list
    store.fail_subscriptions();
    assert!(!handler.snapshot_state().loading);
    let list = handler.handle_list(None, None, None).await.unwrap();
    assert!(list.starts_with("No reminders yet"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sign_ins_keep_session_and_snapshot_together() {
    let (handler, _temp_file) = get_test_handler();
    add(&handler, "Alice's reminder", "2099-01-01", None).await;
    handler
        .handle_sign_in("bob".to_string(), None)
        .await
        .unwrap();
    add(&handler, "Bob's reminder", "2099-01-02", None).await;

    let handler = Arc::new(handler);
    let mut tasks = Vec::new();
    for i in 0..20 {
        let handler = Arc::clone(&handler);
        let user = if i % 2 == 0 { "alice" } else { "bob" };
        tasks.push(tokio::spawn(async move {
            handler.handle_sign_in(user.to_string(), None).await.unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let profile = handler.handle_profile().await.unwrap();
    let uid = profile
        .lines()
        .find_map(|line| line.strip_prefix("User ID: "))
        .unwrap()
        .to_string();
    let state = handler.snapshot_state();
    assert_eq!(state.reminders.len(), 1);
    assert_eq!(state.reminders[0].owner_id, uid);
}
