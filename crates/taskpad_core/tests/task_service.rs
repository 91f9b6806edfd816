use taskpad_core::db::open_db_in_memory;
use taskpad_core::{MemoryStorage, SqliteStorage, TaskDraft, TaskService, TaskServiceError};

#[test]
fn save_draft_without_text_is_rejected() {
    let mut service = TaskService::new(MemoryStorage::new());

    let draft = TaskDraft {
        text: None,
        deadline: Some(1_704_099_600_000),
    };
    let err = service.save_draft(draft).unwrap_err();
    assert!(matches!(err, TaskServiceError::MissingText));
    assert_eq!(service.count(), 0);
}

#[test]
fn save_draft_without_deadline_is_rejected() {
    let mut service = TaskService::new(MemoryStorage::new());

    let draft = TaskDraft {
        text: Some("no deadline picked".to_string()),
        deadline: None,
    };
    let err = service.save_draft(draft).unwrap_err();
    assert!(matches!(err, TaskServiceError::MissingDeadline));
    assert_eq!(service.count(), 0);
}

#[test]
fn save_draft_checks_absence_not_emptiness() {
    let mut service = TaskService::new(MemoryStorage::new());

    // The form delivered a value, even though the user typed nothing.
    let draft = TaskDraft {
        text: Some(String::new()),
        deadline: Some(42),
    };
    let task = service.save_draft(draft).unwrap();
    assert_eq!(task.text, "");
    assert_eq!(service.count(), 1);
}

#[test]
fn save_draft_persists_and_exposes_positional_reads() {
    let mut service = TaskService::new(MemoryStorage::new());
    service.reload().unwrap();

    service
        .save_draft(TaskDraft {
            text: Some("Buy milk".to_string()),
            deadline: Some(1_704_099_600_000),
        })
        .unwrap();
    service
        .save_draft(TaskDraft {
            text: Some("Write report".to_string()),
            deadline: Some(1_704_214_200_000),
        })
        .unwrap();

    assert_eq!(service.count(), 2);
    assert_eq!(service.task_at(0).unwrap().text, "Buy milk");
    assert_eq!(service.task_at(1).unwrap().text, "Write report");
    assert!(service.task_at(2).is_none());
    assert_eq!(service.tasks().len(), 2);
}

#[test]
fn reload_in_a_fresh_service_restores_saved_tasks() {
    let conn = open_db_in_memory().unwrap();

    let mut first = TaskService::new(SqliteStorage::try_new(&conn).unwrap());
    first
        .save_draft(TaskDraft {
            text: Some("water plants".to_string()),
            deadline: Some(7),
        })
        .unwrap();

    let mut second = TaskService::new(SqliteStorage::try_new(&conn).unwrap());
    let report = second.reload().unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(second.task_at(0).unwrap().text, "water plants");
    assert_eq!(second.task_at(0).unwrap().deadline, 7);
}
