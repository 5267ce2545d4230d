//! Integration tests for the board reconciler.
//!
//! Covers partitioning into columns, status changes by drag and by the
//! inline control, two-step deletion and snapshot diffs, all against the
//! loopback collaborator.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use chrono::NaiveDate;
use taskboard::api::ApiError;
use taskboard::api::loopback::{LoopbackCollaborator, RecordedCall};
use taskboard::board::{
    Board, BoardError, BoardEvent, Column, Move, TransitionOutcome, partition,
};
use taskboard::feedback::{Acknowledgment, CONNECTION_FAILED, STATUS_UPDATED, TASK_DELETED};
use taskboard_proto::task::{Task, TaskId, TaskPatch, TaskPriority, TaskStatus};
use taskboard_proto::user::UserId;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn task(id: u64, status: TaskStatus) -> Task {
    Task {
        id: TaskId::new(id),
        description: format!("tarefa {id}"),
        name_class: "Operações".to_string(),
        priority: TaskPriority::Low,
        status,
        user: UserId::new(3),
        register_date: NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
        update_date: None,
    }
}

fn ids(tasks: &[Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.id.get()).collect()
}

fn drain(rx: &mut mpsc::Receiver<BoardEvent>) -> Vec<BoardEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

async fn board_with(
    tasks: Vec<Task>,
) -> (
    Board<Arc<LoopbackCollaborator>>,
    mpsc::Receiver<BoardEvent>,
    Arc<LoopbackCollaborator>,
) {
    let api = Arc::new(LoopbackCollaborator::new().with_tasks(tasks));
    let (mut board, mut rx) = Board::new(Arc::clone(&api), 32);
    board.reload().await.unwrap();
    drain(&mut rx);
    api.clear_calls();
    (board, rx, api)
}

// ===========================================================================
// Partition
// ===========================================================================

#[test]
fn each_task_lands_in_exactly_one_column() {
    let columns = partition([
        task(1, TaskStatus::Todo),
        task(2, TaskStatus::Done),
        task(3, TaskStatus::InProgress),
    ]);
    assert_eq!(ids(columns.get(Column::Todo)), [1]);
    assert_eq!(ids(columns.get(Column::InProgress)), [3]);
    assert_eq!(ids(columns.get(Column::Done)), [2]);
    assert_eq!(columns.len(), 3);
}

#[test]
fn partition_keeps_server_order_within_a_column() {
    let columns = partition([
        task(9, TaskStatus::Todo),
        task(4, TaskStatus::Todo),
        task(7, TaskStatus::Todo),
    ]);
    assert_eq!(ids(columns.get(Column::Todo)), [9, 4, 7]);
    assert!(columns.get(Column::Done).is_empty());
}

#[test]
fn column_titles_and_parsing() {
    assert_eq!(
        Column::ALL.map(Column::title),
        ["A fazer", "Fazendo", "Pronto"]
    );
    assert_eq!("fazendo".parse::<Column>().unwrap(), Column::InProgress);
    assert_eq!("done".parse::<Column>().unwrap(), Column::Done);
    assert!("later".parse::<Column>().is_err());
}

// ===========================================================================
// Status changes
// ===========================================================================

#[tokio::test]
async fn drag_patches_status_and_refetches() {
    let (mut board, mut rx, api) =
        board_with(vec![task(1, TaskStatus::Todo), task(2, TaskStatus::Done)]).await;

    let outcome = board.drop_task(TaskId::new(1), Column::Done).await.unwrap();
    assert_eq!(outcome, TransitionOutcome::Applied);
    assert_eq!(
        api.calls(),
        [
            RecordedCall::UpdateTask(TaskId::new(1), TaskPatch::status(TaskStatus::Done)),
            RecordedCall::ListTasks,
        ]
    );
    assert_eq!(ids(board.columns().get(Column::Done)), [1, 2]);
    assert!(board.columns().get(Column::Todo).is_empty());

    let events = drain(&mut rx);
    assert_eq!(
        events[0],
        BoardEvent::Acknowledged(Acknowledgment::success(STATUS_UPDATED))
    );
    let BoardEvent::Reloaded(diff) = &events[1] else {
        panic!("expected a reload after the patch");
    };
    assert_eq!(
        diff.moved,
        [Move {
            id: TaskId::new(1),
            from: Column::Todo,
            to: Column::Done,
        }]
    );
}

#[tokio::test]
async fn manual_change_to_current_status_sends_nothing() {
    let (mut board, mut rx, api) = board_with(vec![task(5, TaskStatus::InProgress)]).await;
    let outcome = board
        .change_status(TaskId::new(5), TaskStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(outcome, TransitionOutcome::Unchanged);
    assert!(api.calls().is_empty());
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn failed_patch_keeps_columns_and_acknowledges() {
    let (mut board, mut rx, api) =
        board_with(vec![task(1, TaskStatus::Todo), task(2, TaskStatus::Done)]).await;
    let before = board.columns().clone();
    api.fail_next(ApiError::Network("connection reset".to_string()));

    let err = board
        .drop_task(TaskId::new(1), Column::InProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::Api(ref e) if e.is_network()));
    assert_eq!(board.columns(), &before);
    assert_eq!(
        drain(&mut rx),
        [BoardEvent::Acknowledged(Acknowledgment::error(
            CONNECTION_FAILED
        ))]
    );
    // No re-fetch after a failed mutation.
    assert_eq!(api.calls().len(), 1);
    assert_eq!(api.tasks()[0].status, TaskStatus::Todo);
}

#[tokio::test]
async fn rejection_without_detail_uses_fallback_message() {
    let (mut board, mut rx, api) = board_with(vec![task(1, TaskStatus::Todo)]).await;
    api.fail_next(ApiError::Rejected {
        status: 500,
        detail: None,
    });

    let outcome = board.change_status(TaskId::new(1), TaskStatus::Done).await;
    assert!(outcome.is_err());
    assert_eq!(
        drain(&mut rx),
        [BoardEvent::Acknowledged(Acknowledgment::error(
            "Erro: Verifique os dados"
        ))]
    );
    assert_eq!(board.columns().column_of(TaskId::new(1)), Some(Column::Todo));
}

#[tokio::test]
async fn tasks_missing_from_the_board_are_rejected() {
    let (mut board, _rx, api) = board_with(vec![task(1, TaskStatus::Todo)]).await;
    assert_eq!(
        board.drop_task(TaskId::new(99), Column::Done).await,
        Err(BoardError::UnknownTask(TaskId::new(99)))
    );
    assert_eq!(
        board.request_deletion(TaskId::new(99)),
        Err(BoardError::UnknownTask(TaskId::new(99)))
    );
    assert!(api.calls().is_empty());
}

// ===========================================================================
// Deletion
// ===========================================================================

#[tokio::test]
async fn confirmed_deletion_removes_task_after_refetch() {
    let (mut board, mut rx, api) =
        board_with(vec![task(1, TaskStatus::Todo), task(2, TaskStatus::Todo)]).await;

    let request = board.request_deletion(TaskId::new(2)).unwrap();
    assert_eq!(request.task_id(), TaskId::new(2));
    assert_eq!(request.description(), "tarefa 2");
    board.confirm_deletion(request).await.unwrap();

    assert_eq!(
        api.calls(),
        [RecordedCall::DeleteTask(TaskId::new(2)), RecordedCall::ListTasks]
    );
    assert_eq!(ids(board.columns().get(Column::Todo)), [1]);

    let events = drain(&mut rx);
    assert_eq!(
        events[0],
        BoardEvent::Acknowledged(Acknowledgment::success(TASK_DELETED))
    );
    let BoardEvent::Reloaded(diff) = &events[1] else {
        panic!("expected a reload after the deletion");
    };
    assert_eq!(diff.removed, [TaskId::new(2)]);
}

#[tokio::test]
async fn failed_deletion_leaves_task_on_board() {
    let (mut board, mut rx, api) = board_with(vec![task(1, TaskStatus::Done)]).await;
    api.fail_next(ApiError::Rejected {
        status: 404,
        detail: Some("Tarefa não encontrada".to_string()),
    });

    let request = board.request_deletion(TaskId::new(1)).unwrap();
    assert!(board.confirm_deletion(request).await.is_err());
    assert!(board.columns().find(TaskId::new(1)).is_some());
    assert_eq!(
        drain(&mut rx),
        [BoardEvent::Acknowledged(Acknowledgment::error(
            "Erro: Tarefa não encontrada"
        ))]
    );
}

// ===========================================================================
// Snapshots
// ===========================================================================

#[tokio::test]
async fn reload_reflects_changes_made_elsewhere() {
    let (mut board, _rx, api) =
        board_with(vec![task(1, TaskStatus::Todo), task(2, TaskStatus::Todo)]).await;

    let mut edited = task(1, TaskStatus::Todo);
    edited.description = "tarefa 1 revisada".to_string();
    api.put_task(edited);
    api.put_task(task(2, TaskStatus::InProgress));
    api.put_task(task(3, TaskStatus::Done));

    let diff = board.reload().await.unwrap();
    assert_eq!(diff.added, [TaskId::new(3)]);
    assert!(diff.removed.is_empty());
    assert_eq!(diff.edited, [TaskId::new(1)]);
    assert_eq!(diff.moved.len(), 1);
    assert_eq!(diff.moved[0].to, Column::InProgress);
}

#[tokio::test]
async fn identical_snapshot_yields_empty_diff() {
    let (mut board, _rx, _api) = board_with(vec![task(1, TaskStatus::Todo)]).await;
    assert!(board.reload().await.unwrap().is_empty());
}
