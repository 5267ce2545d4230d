//! Property-based tests for the wire model.
//!
//! Uses proptest to verify:
//! 1. Enum tokens parse back to the value that displays them, and nothing
//!    else parses.
//! 2. A patch applies exactly the fields it carries.
//! 3. Random bytes never cause a panic in `decode` or `decode_error_detail`.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use proptest::prelude::*;
use taskboard_proto::codec;
use taskboard_proto::task::{Task, TaskId, TaskPatch, TaskPriority, TaskStatus};
use taskboard_proto::user::UserId;

// --- Strategies ---

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop::sample::select(TaskStatus::ALL.to_vec())
}

fn arb_priority() -> impl Strategy<Value = TaskPriority> {
    prop::sample::select(TaskPriority::ALL.to_vec())
}

fn arb_task() -> impl Strategy<Value = Task> {
    (
        any::<u64>(),
        "[a-zA-Z ]{1,40}",
        "[a-zA-Z]{1,15}",
        arb_priority(),
        arb_status(),
        1..1000u64,
        0..3650i64,
    )
        .prop_map(|(id, description, name_class, priority, status, user, days)| Task {
            id: TaskId::new(id),
            description,
            name_class,
            priority,
            status,
            user: UserId::new(user),
            register_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
                + chrono::Duration::days(days),
            update_date: None,
        })
}

fn arb_patch() -> impl Strategy<Value = TaskPatch> {
    (
        proptest::option::of("[a-z ]{1,20}"),
        proptest::option::of("[a-z]{1,15}"),
        proptest::option::of(arb_priority()),
        proptest::option::of(arb_status()),
    )
        .prop_map(|(description, name_class, priority, status)| TaskPatch {
            description,
            name_class,
            priority,
            status,
        })
}

// --- Token parsing ---

proptest! {
    #[test]
    fn status_display_parses_back(status in arb_status()) {
        prop_assert_eq!(status.to_string().parse::<TaskStatus>().ok(), Some(status));
    }

    #[test]
    fn priority_display_parses_back(priority in arb_priority()) {
        prop_assert_eq!(priority.to_string().parse::<TaskPriority>().ok(), Some(priority));
    }

    #[test]
    fn only_exact_tokens_parse(s in "\\PC{0,12}") {
        let known_status = TaskStatus::ALL.iter().any(|v| v.as_str() == s);
        prop_assert_eq!(s.parse::<TaskStatus>().is_ok(), known_status);

        let known_priority = TaskPriority::ALL.iter().any(|v| v.as_str() == s);
        prop_assert_eq!(s.parse::<TaskPriority>().is_ok(), known_priority);
    }

    #[test]
    fn serde_token_matches_display(status in arb_status(), priority in arb_priority()) {
        let status_json = String::from_utf8(codec::encode(&status).unwrap()).unwrap();
        prop_assert_eq!(status_json, format!("\"{status}\""));
        let priority_json = String::from_utf8(codec::encode(&priority).unwrap()).unwrap();
        prop_assert_eq!(priority_json, format!("\"{priority}\""));
    }
}

// --- Patches ---

proptest! {
    #[test]
    fn patch_touches_only_carried_fields(task in arb_task(), patch in arb_patch()) {
        let mut patched = task.clone();
        patch.apply_to(&mut patched);

        prop_assert_eq!(patched.id, task.id);
        prop_assert_eq!(patched.user, task.user);
        prop_assert_eq!(patched.register_date, task.register_date);
        prop_assert_eq!(
            &patched.description,
            patch.description.as_ref().unwrap_or(&task.description)
        );
        prop_assert_eq!(
            &patched.name_class,
            patch.name_class.as_ref().unwrap_or(&task.name_class)
        );
        prop_assert_eq!(patched.priority, patch.priority.unwrap_or(task.priority));
        prop_assert_eq!(patched.status, patch.status.unwrap_or(task.status));
    }

    #[test]
    fn encoded_patch_carries_only_set_fields(patch in arb_patch()) {
        let value: serde_json::Value =
            serde_json::from_slice(&codec::encode(&patch).unwrap()).unwrap();
        let object = value.as_object().unwrap();
        prop_assert_eq!(object.contains_key("description"), patch.description.is_some());
        prop_assert_eq!(object.contains_key("name_class"), patch.name_class.is_some());
        prop_assert_eq!(object.contains_key("priority"), patch.priority.is_some());
        prop_assert_eq!(object.contains_key("status"), patch.status.is_some());
    }
}

// --- Robustness ---

proptest! {
    #[test]
    fn decode_random_bytes_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = codec::decode::<Task>(&bytes);
        let _ = codec::decode::<Vec<Task>>(&bytes);
        let _ = codec::decode_error_detail(&bytes);
    }

    #[test]
    fn string_details_are_surfaced_verbatim(detail in "\\PC{1,60}") {
        let body = codec::encode(&codec::ErrorBody::with_detail(detail.clone())).unwrap();
        prop_assert_eq!(codec::decode_error_detail(&body), Some(detail));
    }
}
