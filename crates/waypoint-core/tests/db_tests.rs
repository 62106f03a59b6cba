use jiff::{SignedDuration, Timestamp};
use tempfile::NamedTempFile;
use waypoint_core::{
    models::{
        NewNotification, NotificationKind, NotificationPriority, PlanFilter, TaskFilter,
        UpdatePlanRequest, UpdateTaskRequest,
    },
    params::{CreateMilestone, CreatePlan, CreateResource, CreateTask},
    Database, PlanStatus, PlannerError, TaskStatus, TransitionPolicy,
};

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn now() -> Timestamp {
    "2026-06-15T12:00:00Z".parse().unwrap()
}

fn plan(db: &mut Database, title: &str) -> u64 {
    db.create_plan(
        &CreatePlan {
            title: title.to_string(),
            goal: "Goal".to_string(),
            ..Default::default()
        },
        now(),
    )
    .expect("Failed to create plan")
    .id
}

fn task(db: &mut Database, plan_id: u64, title: &str) -> u64 {
    db.create_task(
        &CreateTask {
            plan_id,
            title: title.to_string(),
            ..Default::default()
        },
        now(),
    )
    .expect("Failed to create task")
    .id
}

fn overdue(task_id: u64, plan_id: u64) -> NewNotification {
    NewNotification {
        kind: NotificationKind::Overdue,
        title: "Task overdue".to_string(),
        message: format!("Task {task_id} is late"),
        task_id: Some(task_id),
        plan_id: Some(plan_id),
        milestone_id: None,
        due_date: Some(now()),
        priority: NotificationPriority::High,
    }
}

#[test]
fn test_database_initialization_is_repeatable() {
    let temp_file = NamedTempFile::new().unwrap();
    {
        let mut db = Database::new(temp_file.path()).unwrap();
        plan(&mut db, "Persisted");
    }
    let db = Database::new(temp_file.path()).expect("Reopening must keep the schema");
    assert_eq!(db.list_plans(None).unwrap().len(), 1);
}

#[test]
fn test_create_and_get_plan() {
    let (_temp_file, mut db) = create_test_db();

    let created = db
        .create_plan(
            &CreatePlan {
                title: "  Learn Rust  ".to_string(),
                description: Some("Slowly".to_string()),
                goal: "Ship a CLI".to_string(),
                timeframe: Some("  ".to_string()),
            },
            now(),
        )
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.status, PlanStatus::Active);
    assert_eq!(created.created_at, now());

    let fetched = db.get_plan(created.id).unwrap().expect("plan exists");
    assert_eq!(fetched, created);
    assert_eq!(fetched.timeframe, None);

    assert!(db.get_plan(9999).unwrap().is_none());
}

#[test]
fn test_create_plan_requires_title_and_goal() {
    let (_temp_file, mut db) = create_test_db();

    let err = db
        .create_plan(
            &CreatePlan {
                title: "Title".to_string(),
                goal: " ".to_string(),
                ..Default::default()
            },
            now(),
        )
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput { ref field, .. } if field == "goal"));
    assert!(db.list_plans(None).unwrap().is_empty());
}

#[test]
fn test_list_plans_newest_first_with_filters() {
    let (_temp_file, mut db) = create_test_db();
    let first = plan(&mut db, "Garden");
    let second = plan(&mut db, "Rust book");
    let third = plan(&mut db, "Rust course");

    db.update_plan(
        second,
        UpdatePlanRequest::status(PlanStatus::Paused),
        TransitionPolicy::Permissive,
        now(),
    )
    .unwrap();

    let ids: Vec<u64> = db.list_plans(None).unwrap().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![third, second, first]);

    let rust = db
        .list_plans(Some(&PlanFilter {
            title_contains: Some("rust".to_string()),
            status: None,
        }))
        .unwrap();
    assert_eq!(rust.len(), 2);

    let paused = db
        .list_plans(Some(&PlanFilter {
            title_contains: None,
            status: Some(PlanStatus::Paused),
        }))
        .unwrap();
    assert_eq!(paused.len(), 1);
    assert_eq!(paused[0].id, second);
}

#[test]
fn test_task_in_missing_plan_is_not_found() {
    let (_temp_file, mut db) = create_test_db();
    let err = db
        .create_task(
            &CreateTask {
                plan_id: 42,
                title: "Orphan".to_string(),
                ..Default::default()
            },
            now(),
        )
        .unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { entity: "Plan", id: 42 }));
}

#[test]
fn test_task_orders_are_sequential() {
    let (_temp_file, mut db) = create_test_db();
    let plan_id = plan(&mut db, "Plan");
    for title in ["a", "b", "c"] {
        task(&mut db, plan_id, title);
    }

    let tasks = db.list_tasks(&TaskFilter::for_plan(plan_id)).unwrap();
    let orders: Vec<u32> = tasks.iter().map(|t| t.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn test_task_milestone_must_belong_to_plan() {
    let (_temp_file, mut db) = create_test_db();
    let plan_a = plan(&mut db, "A");
    let plan_b = plan(&mut db, "B");
    let milestone_b = db
        .create_milestone(
            &CreateMilestone {
                plan_id: plan_b,
                title: "B1".to_string(),
                ..Default::default()
            },
            now(),
        )
        .unwrap();

    let err = db
        .create_task(
            &CreateTask {
                plan_id: plan_a,
                milestone_id: Some(milestone_b.id),
                title: "Mismatch".to_string(),
                ..Default::default()
            },
            now(),
        )
        .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput { ref field, .. } if field == "milestone_id"));
    assert!(db
        .list_tasks(&TaskFilter::for_plan(plan_a))
        .unwrap()
        .is_empty());

    let ok = task(&mut db, plan_a, "Plain");
    let err = db
        .update_task(
            ok,
            UpdateTaskRequest {
                milestone_id: Some(Some(milestone_b.id)),
                ..Default::default()
            },
            TransitionPolicy::Permissive,
            now(),
        )
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_completed_at_tracks_status_in_store() {
    let (_temp_file, mut db) = create_test_db();
    let plan_id = plan(&mut db, "Plan");
    let id = task(&mut db, plan_id, "Task");
    let later = now() + SignedDuration::from_mins(30);

    let done = db
        .update_task(
            id,
            UpdateTaskRequest::status(TaskStatus::Completed),
            TransitionPolicy::Permissive,
            later,
        )
        .unwrap();
    assert_eq!(done.completed_at, Some(later));
    assert_eq!(
        db.get_task(id).unwrap().unwrap().completed_at,
        Some(later)
    );

    let cancelled = db
        .update_task(
            id,
            UpdateTaskRequest::status(TaskStatus::Cancelled),
            TransitionPolicy::Permissive,
            later,
        )
        .unwrap();
    assert_eq!(cancelled.completed_at, None);
}

#[test]
fn test_delete_plan_cascades() {
    let (_temp_file, mut db) = create_test_db();
    let plan_id = plan(&mut db, "Doomed");
    let keep = plan(&mut db, "Survivor");
    let kept_task = task(&mut db, keep, "Stays");

    for title in ["M1", "M2"] {
        db.create_milestone(
            &CreateMilestone {
                plan_id,
                title: title.to_string(),
                ..Default::default()
            },
            now(),
        )
        .unwrap();
    }
    let t: Vec<u64> = ["T1", "T2", "T3"]
        .iter()
        .map(|title| task(&mut db, plan_id, title))
        .collect();
    db.add_dependency(t[1], t[0], now()).unwrap();
    db.create_resource(
        &CreateResource {
            plan_id,
            title: "Docs".to_string(),
            ..Default::default()
        },
        now(),
    )
    .unwrap();

    let deleted = db.delete_plan(plan_id).unwrap();
    assert_eq!(deleted.title, "Doomed");

    assert!(db.get_plan(plan_id).unwrap().is_none());
    for id in &t {
        assert!(db.get_task(*id).unwrap().is_none());
    }
    assert!(db
        .list_tasks(&TaskFilter::for_plan(plan_id))
        .unwrap()
        .is_empty());
    assert!(matches!(
        db.list_milestones(plan_id),
        Err(PlannerError::NotFound { .. })
    ));
    assert!(matches!(
        db.prerequisites(t[1]),
        Err(PlannerError::NotFound { entity: "Task", .. })
    ));

    assert!(db.get_task(kept_task).unwrap().is_some());
    assert!(matches!(
        db.delete_plan(plan_id),
        Err(PlannerError::NotFound { entity: "Plan", .. })
    ));
}

#[test]
fn test_delete_milestone_detaches_tasks() {
    let (_temp_file, mut db) = create_test_db();
    let plan_id = plan(&mut db, "Plan");
    let milestone = db
        .create_milestone(
            &CreateMilestone {
                plan_id,
                title: "Phase".to_string(),
                ..Default::default()
            },
            now(),
        )
        .unwrap();
    let t = db
        .create_task(
            &CreateTask {
                plan_id,
                milestone_id: Some(milestone.id),
                title: "Grouped".to_string(),
                ..Default::default()
            },
            now(),
        )
        .unwrap();

    db.delete_milestone(milestone.id, now()).unwrap();
    let t = db.get_task(t.id).unwrap().expect("task survives");
    assert_eq!(t.milestone_id, None);
}

#[test]
fn test_dependency_rules() {
    let (_temp_file, mut db) = create_test_db();
    let plan_a = plan(&mut db, "A");
    let plan_b = plan(&mut db, "B");
    let a1 = task(&mut db, plan_a, "a1");
    let a2 = task(&mut db, plan_a, "a2");
    let a3 = task(&mut db, plan_a, "a3");
    let b1 = task(&mut db, plan_b, "b1");

    assert!(matches!(
        db.add_dependency(a1, a1, now()),
        Err(PlannerError::SelfDependency { task_id }) if task_id == a1
    ));
    assert!(matches!(
        db.add_dependency(a1, b1, now()),
        Err(PlannerError::CrossPlanDependency { .. })
    ));
    assert!(matches!(
        db.add_dependency(a1, 999, now()),
        Err(PlannerError::NotFound { entity: "Task", id: 999 })
    ));

    let edge = db.add_dependency(a2, a1, now()).unwrap();
    // Adding the same edge again returns the stored one
    assert_eq!(db.add_dependency(a2, a1, now()).unwrap(), edge);

    db.add_dependency(a3, a2, now()).unwrap();
    let before = db.list_dependencies(plan_a).unwrap();

    let err = db.add_dependency(a1, a3, now()).unwrap_err();
    assert!(matches!(
        err,
        PlannerError::CycleDetected { dependent_id, prerequisite_id }
            if dependent_id == a1 && prerequisite_id == a3
    ));
    assert_eq!(db.list_dependencies(plan_a).unwrap(), before);

    assert!(!db.is_actionable(a2).unwrap());
    assert!(db.is_actionable(a1).unwrap());

    db.remove_dependency(a2, a1).unwrap();
    assert!(db.is_actionable(a2).unwrap());
    assert!(matches!(
        db.remove_dependency(a2, a1),
        Err(PlannerError::NotFound { .. })
    ));
}

#[test]
fn test_deleting_a_task_removes_its_edges() {
    let (_temp_file, mut db) = create_test_db();
    let plan_id = plan(&mut db, "Plan");
    let first = task(&mut db, plan_id, "first");
    let second = task(&mut db, plan_id, "second");
    db.add_dependency(second, first, now()).unwrap();

    db.delete_task(first, now()).unwrap();
    assert!(db.list_dependencies(plan_id).unwrap().is_empty());
    assert!(db.is_actionable(second).unwrap());
}

#[test]
fn test_notification_dedup_and_read_state() {
    let (_temp_file, mut db) = create_test_db();
    let plan_id = plan(&mut db, "Plan");
    let task_id = task(&mut db, plan_id, "Task");

    let stored = db
        .insert_notification(&overdue(task_id, plan_id), now())
        .unwrap()
        .expect("first insert stores");
    assert!(!stored.is_read);
    assert_eq!(stored.created_at, now());

    // Same condition, different text: still a duplicate
    let mut again = overdue(task_id, plan_id);
    again.message = "reworded".to_string();
    assert!(db.insert_notification(&again, now()).unwrap().is_none());

    let mut due_soon = overdue(task_id, plan_id);
    due_soon.kind = NotificationKind::DueDate;
    assert!(db.insert_notification(&due_soon, now()).unwrap().is_none());

    assert_eq!(db.unread_notification_count().unwrap(), 1);
    assert!(db.mark_notification_read(stored.id).unwrap());
    assert!(db.mark_notification_read(stored.id).unwrap());
    assert!(!db.mark_notification_read(9999).unwrap());
    assert!(db.list_unread_notifications().unwrap().is_empty());

    assert!(db.delete_notification(stored.id).unwrap());
    assert!(!db.delete_notification(stored.id).unwrap());
    // The condition may be reported again once its record is gone
    assert!(db
        .insert_notification(&overdue(task_id, plan_id), now())
        .unwrap()
        .is_some());
}

#[test]
fn test_mark_all_and_clear_notifications() {
    let (_temp_file, mut db) = create_test_db();
    let plan_id = plan(&mut db, "Plan");
    let tasks: Vec<u64> = (0..6)
        .map(|i| task(&mut db, plan_id, &format!("Task {i}")))
        .collect();
    let stored: Vec<_> = tasks
        .iter()
        .map(|&t| {
            db.insert_notification(&overdue(t, plan_id), now())
                .unwrap()
                .unwrap()
        })
        .collect();

    db.mark_notification_read(stored[0].id).unwrap();
    db.mark_notification_read(stored[1].id).unwrap();
    assert_eq!(db.unread_notification_count().unwrap(), 4);

    assert_eq!(db.mark_all_notifications_read().unwrap(), 4);
    assert_eq!(db.unread_notification_count().unwrap(), 0);
    assert_eq!(db.list_notifications().unwrap().len(), 6);

    let listed = db.list_notifications().unwrap();
    assert_eq!(listed[0].id, stored[5].id, "newest first");

    assert_eq!(db.clear_notifications().unwrap(), 6);
    assert!(db.list_notifications().unwrap().is_empty());
}

#[test]
fn test_settings_round_trip() {
    let (_temp_file, mut db) = create_test_db();
    assert_eq!(db.get_setting::<u32>("missing").unwrap(), None);

    db.set_setting("answer", &41u32, now()).unwrap();
    db.set_setting("answer", &42u32, now()).unwrap();
    assert_eq!(db.get_setting::<u32>("answer").unwrap(), Some(42));
}
