//! Integration tests for the database layer.
//!
//! These tests run the owner-scoped repositories against an in-memory SQLite
//! database. Tests are organized by entity.

use tasklift::db::Database;
use tasklift::error::{AppError, ErrorCode};
use tasklift::types::{
    NewTask, NoteFields, Priority, ProjectFields, ProjectStatus, TaskUpdate, UserId,
};

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

/// Insert a user with a placeholder hash.
fn add_user(db: &Database, name: &str) -> UserId {
    db.create_user(name, Some(&format!("{name}@example.com")), "not-a-real-hash")
        .expect("Failed to create user")
}

fn task(description: &str) -> NewTask {
    NewTask {
        description: description.to_string(),
        ..Default::default()
    }
}

fn project(name: &str) -> ProjectFields {
    ProjectFields {
        name: name.to_string(),
        ..Default::default()
    }
}

fn error_code(err: anyhow::Error) -> ErrorCode {
    AppError::from(err).code
}

mod user_tests {
    use super::*;

    #[test]
    fn duplicate_username_conflicts_without_new_row() {
        let db = setup_db();
        add_user(&db, "alice");

        let err = db
            .create_user("alice", Some("other@example.com"), "h")
            .unwrap_err();
        assert_eq!(error_code(err), ErrorCode::AlreadyExists);
        assert_eq!(db.count_users().unwrap(), 1);
    }

    #[test]
    fn duplicate_email_conflicts_without_new_row() {
        let db = setup_db();
        add_user(&db, "alice");

        let err = db
            .create_user("alicia", Some("alice@example.com"), "h")
            .unwrap_err();
        assert_eq!(error_code(err), ErrorCode::AlreadyExists);
        assert_eq!(db.count_users().unwrap(), 1);
    }

    #[test]
    fn credentials_found_by_username_or_email() {
        let db = setup_db();
        let id = add_user(&db, "alice");

        assert_eq!(db.find_credentials("alice").unwrap().unwrap().user_id, id);
        assert_eq!(
            db.find_credentials("alice@example.com").unwrap().unwrap().user_id,
            id
        );
        assert!(db.find_credentials("bob").unwrap().is_none());
    }
}

mod task_tests {
    use super::*;

    #[test]
    fn create_defaults_priority_to_medium() {
        let db = setup_db();
        let alice = add_user(&db, "alice");

        db.create_task(alice, task("buy milk")).unwrap();
        let tasks = db.list_tasks(alice).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "buy milk");
        assert_eq!(tasks[0].priority, Priority::Medium);
        assert!(!tasks[0].done);
        assert_eq!(tasks[0].project_name, "");
        assert_eq!(tasks[0].project_id, None);
    }

    #[test]
    fn blank_description_is_rejected_before_write() {
        let db = setup_db();
        let alice = add_user(&db, "alice");

        let err = db.create_task(alice, task("   ")).unwrap_err();
        assert_eq!(error_code(err), ErrorCode::MissingRequiredField);
        assert!(db.list_tasks(alice).unwrap().is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let db = setup_db();
        let alice = add_user(&db, "alice");

        db.create_task(alice, task("first")).unwrap();
        db.create_task(alice, task("second")).unwrap();
        let tasks = db.list_tasks(alice).unwrap();

        assert_eq!(tasks[0].description, "second");
        assert_eq!(tasks[1].description, "first");
    }

    #[test]
    fn owners_only_see_their_own_tasks() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let bob = add_user(&db, "bob");

        db.create_task(alice, task("alice's")).unwrap();
        db.create_task(bob, task("bob's")).unwrap();

        let tasks = db.list_tasks(alice).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "alice's");
    }

    #[test]
    fn cross_owner_update_is_a_silent_no_op() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let bob = add_user(&db, "bob");
        let id = db.create_task(alice, task("alice's")).unwrap();

        let changed = db
            .update_task(
                bob,
                id,
                TaskUpdate {
                    description: "hijacked".into(),
                    done: true,
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(!changed);
        let t = db.get_task(alice, id).unwrap().unwrap();
        assert_eq!(t.description, "alice's");
        assert!(!t.done);
    }

    #[test]
    fn cross_owner_delete_is_a_silent_no_op() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let bob = add_user(&db, "bob");
        let id = db.create_task(alice, task("alice's")).unwrap();

        assert!(!db.delete_task(bob, id).unwrap());
        assert_eq!(db.list_tasks(alice).unwrap().len(), 1);
    }

    #[test]
    fn delete_is_idempotent() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let id = db.create_task(alice, task("x")).unwrap();

        assert!(db.delete_task(alice, id).unwrap());
        assert!(!db.delete_task(alice, id).unwrap());
        assert!(db.list_tasks(alice).unwrap().is_empty());
    }

    #[test]
    fn linking_to_another_owners_project_is_rejected() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let bob = add_user(&db, "bob");
        let bobs_project = db.create_project(bob, project("Bob's")).unwrap();

        let err = db
            .create_task(
                alice,
                NewTask {
                    description: "sneaky".into(),
                    project_id: Some(bobs_project),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(error_code(err), ErrorCode::InvalidFieldValue);
        assert!(db.list_tasks(alice).unwrap().is_empty());
    }

    #[test]
    fn update_leaves_project_link_unless_asked() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let pid = db.create_project(alice, project("P")).unwrap();
        let id = db
            .create_task(
                alice,
                NewTask {
                    description: "linked".into(),
                    project_id: Some(pid),
                    ..Default::default()
                },
            )
            .unwrap();

        let keep = TaskUpdate {
            description: "still linked".into(),
            priority: Priority::High,
            ..Default::default()
        };
        assert!(db.update_task(alice, id, keep).unwrap());
        let t = db.get_task(alice, id).unwrap().unwrap();
        assert_eq!(t.project_id, Some(pid));
        assert_eq!(t.project_name, "P");
        assert_eq!(t.priority, Priority::High);

        let clear = TaskUpdate {
            description: "unlinked".into(),
            project: Some(None),
            ..Default::default()
        };
        assert!(db.update_task(alice, id, clear).unwrap());
        assert_eq!(db.get_task(alice, id).unwrap().unwrap().project_id, None);
    }
}

mod project_tests {
    use super::*;

    fn add_tasks(db: &Database, owner: UserId, pid: i64, total: usize, done: usize) {
        for i in 0..total {
            db.create_task(
                owner,
                NewTask {
                    description: format!("task {i}"),
                    project_id: Some(pid),
                    done: i < done,
                    ..Default::default()
                },
            )
            .unwrap();
        }
    }

    #[test]
    fn progress_is_floored_percentage() {
        let db = setup_db();
        let alice = add_user(&db, "alice");

        let three_of_four = db.create_project(alice, project("A")).unwrap();
        add_tasks(&db, alice, three_of_four, 4, 3);
        let empty = db.create_project(alice, project("B")).unwrap();
        let one_of_three = db.create_project(alice, project("C")).unwrap();
        add_tasks(&db, alice, one_of_three, 3, 1);

        let a = db.get_project(alice, three_of_four).unwrap().unwrap();
        let b = db.get_project(alice, empty).unwrap().unwrap();
        let c = db.get_project(alice, one_of_three).unwrap().unwrap();
        assert_eq!(a.progress, 75);
        assert_eq!(a.task_count, 4);
        assert_eq!(a.completed_tasks, 3);
        assert_eq!(b.progress, 0);
        assert_eq!(c.progress, 33);
    }

    #[test]
    fn defaults_and_required_name() {
        let db = setup_db();
        let alice = add_user(&db, "alice");

        let id = db.create_project(alice, project("Q1 Launch")).unwrap();
        let p = db.get_project(alice, id).unwrap().unwrap();
        assert_eq!(p.status, ProjectStatus::Active);
        assert_eq!(p.team_members, 0);

        let err = db.create_project(alice, project("")).unwrap_err();
        assert_eq!(error_code(err), ErrorCode::MissingRequiredField);
        assert_eq!(db.list_projects(alice).unwrap().len(), 1);
    }

    #[test]
    fn update_replaces_fields_for_owner_only() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let bob = add_user(&db, "bob");
        let id = db.create_project(alice, project("Old")).unwrap();

        let fields = ProjectFields {
            name: "New".into(),
            status: ProjectStatus::Paused,
            team_members: 4,
            ..Default::default()
        };
        assert!(!db.update_project(bob, id, fields.clone()).unwrap());
        assert_eq!(db.get_project(alice, id).unwrap().unwrap().name, "Old");

        assert!(db.update_project(alice, id, fields).unwrap());
        let p = db.get_project(alice, id).unwrap().unwrap();
        assert_eq!(p.name, "New");
        assert_eq!(p.status, ProjectStatus::Paused);
        assert_eq!(p.team_members, 4);
    }

    #[test]
    fn delete_unlinks_tasks_and_keeps_them() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let pid = db.create_project(alice, project("Q1 Launch")).unwrap();
        add_tasks(&db, alice, pid, 2, 1);
        assert_eq!(db.get_project(alice, pid).unwrap().unwrap().progress, 50);

        assert!(db.delete_project(alice, pid).unwrap());

        let tasks = db.list_tasks(alice).unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.project_id.is_none()));
        assert!(tasks.iter().all(|t| t.project_name.is_empty()));
        assert!(db.list_projects(alice).unwrap().is_empty());
    }

    #[test]
    fn foreign_delete_touches_nothing() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let bob = add_user(&db, "bob");
        let pid = db.create_project(alice, project("Mine")).unwrap();
        add_tasks(&db, alice, pid, 2, 0);

        assert!(!db.delete_project(bob, pid).unwrap());

        assert_eq!(db.list_projects(alice).unwrap().len(), 1);
        let tasks = db.list_tasks(alice).unwrap();
        assert!(tasks.iter().all(|t| t.project_id == Some(pid)));
    }

    #[test]
    fn delete_is_idempotent() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let pid = db.create_project(alice, project("Gone")).unwrap();

        assert!(db.delete_project(alice, pid).unwrap());
        assert!(!db.delete_project(alice, pid).unwrap());
    }
}

mod note_tests {
    use super::*;

    fn note(title: &str, content: &str) -> NoteFields {
        NoteFields {
            title: title.into(),
            content: content.into(),
        }
    }

    #[test]
    fn create_requires_title() {
        let db = setup_db();
        let alice = add_user(&db, "alice");

        let err = db.create_note(alice, note("", "body")).unwrap_err();
        assert_eq!(error_code(err), ErrorCode::MissingRequiredField);
        assert!(db.list_notes(alice).unwrap().is_empty());
    }

    #[test]
    fn recently_updated_notes_come_first() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let first = db.create_note(alice, note("first", "")).unwrap();
        db.create_note(alice, note("second", "")).unwrap();

        assert!(db.update_note(alice, first, note("first, edited", "x")).unwrap());

        let notes = db.list_notes(alice).unwrap();
        assert_eq!(notes[0].title, "first, edited");
        assert_eq!(notes[0].content, "x");
        assert_eq!(notes[1].title, "second");
    }

    #[test]
    fn other_owners_cannot_touch_notes() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let bob = add_user(&db, "bob");
        let id = db.create_note(alice, note("private", "")).unwrap();

        assert!(db.list_notes(bob).unwrap().is_empty());
        assert!(!db.update_note(bob, id, note("mine now", "")).unwrap());
        assert!(!db.delete_note(bob, id).unwrap());
        assert_eq!(db.get_note(alice, id).unwrap().unwrap().title, "private");
    }
}

mod document_tests {
    use super::*;

    #[test]
    fn metadata_is_owner_scoped() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let bob = add_user(&db, "bob");

        db.record_document(alice, "Roadmap", "/files/roadmap.pdf", "application/pdf", 1024)
            .unwrap();

        let docs = db.list_documents(alice).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].file_size, 1024);
        assert!(db.list_documents(bob).unwrap().is_empty());
    }
}

mod analytics_tests {
    use super::*;

    #[test]
    fn empty_account_is_all_zeroes() {
        let db = setup_db();
        let alice = add_user(&db, "alice");

        let s = db.analytics_summary(alice).unwrap();
        assert_eq!(s.total_tasks, 0);
        assert_eq!(s.pending_tasks, 0);
        assert_eq!(s.completion_rate, 0.0);
        assert_eq!(s.total_projects, 0);
        assert_eq!(s.total_notes, 0);
    }

    #[test]
    fn counters_reflect_only_the_owner() {
        let db = setup_db();
        let alice = add_user(&db, "alice");
        let bob = add_user(&db, "bob");

        for i in 0..5 {
            db.create_task(
                alice,
                NewTask {
                    description: format!("t{i}"),
                    done: i < 2,
                    priority: if i == 0 { Priority::High } else { Priority::Low },
                    ..Default::default()
                },
            )
            .unwrap();
        }
        db.create_task(bob, task("bob's")).unwrap();
        let paused = db.create_project(alice, project("paused")).unwrap();
        db.create_project(alice, project("active")).unwrap();
        db.update_project(
            alice,
            paused,
            ProjectFields {
                name: "paused".into(),
                status: ProjectStatus::Paused,
                ..Default::default()
            },
        )
        .unwrap();
        db.create_note(
            alice,
            NoteFields {
                title: "n".into(),
                content: String::new(),
            },
        )
        .unwrap();

        let s = db.analytics_summary(alice).unwrap();
        assert_eq!(s.total_tasks, 5);
        assert_eq!(s.completed_tasks, 2);
        assert_eq!(s.pending_tasks, 3);
        assert_eq!(s.high_priority_tasks, 1);
        assert_eq!(s.completion_rate, 40.0);
        assert_eq!(s.total_projects, 2);
        assert_eq!(s.active_projects, 1);
        assert_eq!(s.total_notes, 1);
    }
}

mod file_database_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn data_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taskmanager.db");

        let alice = {
            let db = Database::open(&path).unwrap();
            let alice = add_user(&db, "alice");
            db.create_task(alice, task("persisted")).unwrap();
            alice
        };

        let db = Database::open(&path).unwrap();
        let tasks = db.list_tasks(alice).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "persisted");
    }
}
