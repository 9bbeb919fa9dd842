// tests/review_workflow_tests.rs
//
// End-to-end checks of the review/publish workflow against the in-memory
// question store: what gets published, what never does, and what every
// failure leaves behind.

mod common;

use common::{MemoryQuestionStore, extracted, material};
use reminded_backend::review::{self, ReviewError, ReviewSessions};

const EDUCATOR: i64 = 7;
const COURSE: i64 = 1;

#[tokio::test]
async fn publishing_a_valid_draft_inserts_the_whole_batch_in_order() {
    let sessions = ReviewSessions::new();
    let store = MemoryQuestionStore::new();

    sessions.begin(
        EDUCATOR,
        COURSE,
        material("lecture1.pdf"),
        vec![
            extracted("q1", &["a", "b"], "a"),
            extracted("q2", &["c", "d"], "d"),
            extracted("q3", &["e", "f"], "e"),
        ],
    );

    let batch = review::publish(&sessions, &store, EDUCATOR, COURSE)
        .await
        .expect("publish should succeed");

    assert_eq!(batch.question_ids.len(), 3);
    assert_eq!(store.material_count(), 1);

    let questions = store.questions();
    assert_eq!(questions.len(), 3);
    assert_eq!(questions[0].question_text, "q1");
    assert_eq!(questions[0].correct_answer, "a");
    assert_eq!(questions[1].question_text, "q2");
    assert_eq!(questions[1].correct_answer, "d");
    assert_eq!(questions[2].question_text, "q3");
    for q in &questions {
        assert_eq!(q.course_id, COURSE);
        assert_eq!(q.material_id, Some(batch.material_id));
    }

    // Publish is one-way: the session is gone afterwards.
    assert_eq!(
        sessions.snapshot(EDUCATOR, COURSE).unwrap_err(),
        ReviewError::NotReviewing
    );
}

#[tokio::test]
async fn an_invalid_entry_fails_the_whole_batch_and_changes_nothing() {
    let sessions = ReviewSessions::new();
    let store = MemoryQuestionStore::new();

    sessions.begin(
        EDUCATOR,
        COURSE,
        material("lecture2.pdf"),
        vec![
            extracted("valid", &["a", "b"], "b"),
            // Stale answer: not a member of the choices.
            extracted("broken", &["A", "B"], "C"),
        ],
    );

    let err = review::publish(&sessions, &store, EDUCATOR, COURSE)
        .await
        .unwrap_err();

    match err {
        ReviewError::ValidationFailed { index, .. } => assert_eq!(index, 1),
        other => panic!("expected ValidationFailed, got {:?}", other),
    }

    // Store untouched, draft untouched, still in Reviewing mode.
    assert!(store.questions().is_empty());
    assert_eq!(store.material_count(), 0);
    let snapshot = sessions.snapshot(EDUCATOR, COURSE).unwrap();
    assert_eq!(snapshot.questions.len(), 2);
    assert_eq!(snapshot.questions[1].question_text, "broken");
}

#[tokio::test]
async fn discard_leaves_no_trace_in_the_store() {
    let sessions = ReviewSessions::new();
    let store = MemoryQuestionStore::new();

    sessions.begin(
        EDUCATOR,
        COURSE,
        material("lecture3.pdf"),
        vec![extracted("q", &["a", "b"], "a")],
    );
    sessions.discard(EDUCATOR, COURSE, true).unwrap();

    assert!(store.questions().is_empty());
    assert_eq!(store.material_count(), 0);
    assert_eq!(
        review::publish(&sessions, &store, EDUCATOR, COURSE)
            .await
            .unwrap_err(),
        ReviewError::NotReviewing
    );
}

#[tokio::test]
async fn deleted_entries_are_never_published() {
    let sessions = ReviewSessions::new();
    let store = MemoryQuestionStore::new();

    sessions.begin(
        EDUCATOR,
        COURSE,
        material("lecture4.pdf"),
        vec![
            extracted("keep me", &["a", "b"], "a"),
            extracted("drop me", &["c", "d"], "c"),
            extracted("keep me too", &["e", "f"], "f"),
        ],
    );
    sessions.delete_question(EDUCATOR, COURSE, 1, true).unwrap();

    review::publish(&sessions, &store, EDUCATOR, COURSE)
        .await
        .unwrap();

    let questions = store.questions();
    assert_eq!(questions.len(), 2);
    assert!(questions.iter().all(|q| q.question_text != "drop me"));
    assert_eq!(questions[1].question_text, "keep me too");
}

#[tokio::test]
async fn repeating_an_edit_with_the_same_value_changes_nothing_further() {
    let sessions = ReviewSessions::new();

    sessions.begin(
        EDUCATOR,
        COURSE,
        material("lecture5.pdf"),
        vec![extracted("original", &["a", "b"], "a")],
    );

    let once = sessions
        .edit_text(EDUCATOR, COURSE, 0, "rephrased".to_string())
        .unwrap();
    let twice = sessions
        .edit_text(EDUCATOR, COURSE, 0, "rephrased".to_string())
        .unwrap();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn arithmetic_example_publishes_with_its_course_reference() {
    let sessions = ReviewSessions::new();
    let store = MemoryQuestionStore::new();

    sessions.begin(
        EDUCATOR,
        COURSE,
        material("arithmetic.pdf"),
        vec![extracted("2+2?", &["3", "4", "5"], "4")],
    );

    review::publish(&sessions, &store, EDUCATOR, COURSE)
        .await
        .unwrap();

    let questions = store.questions();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].course_id, COURSE);
    assert_eq!(questions[0].correct_answer, "4");
    assert_eq!(questions[0].choices.0, vec!["3", "4", "5"]);
    assert_eq!(questions[0].bloom_level, "Remember");
}

#[tokio::test]
async fn a_failed_write_keeps_the_draft_so_retry_is_safe() {
    let sessions = ReviewSessions::new();
    let store = MemoryQuestionStore::new();

    sessions.begin(
        EDUCATOR,
        COURSE,
        material("lecture6.pdf"),
        vec![
            extracted("q1", &["a", "b"], "a"),
            extracted("q2", &["c", "d"], "d"),
        ],
    );

    store.fail_next_publish();
    let err = review::publish(&sessions, &store, EDUCATOR, COURSE)
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::PublishFailed(_)));

    // No partial batch, draft intact, still Reviewing.
    assert!(store.questions().is_empty());
    assert_eq!(store.material_count(), 0);
    assert_eq!(sessions.snapshot(EDUCATOR, COURSE).unwrap().questions.len(), 2);

    // A plain retry now succeeds without re-running extraction.
    let batch = review::publish(&sessions, &store, EDUCATOR, COURSE)
        .await
        .expect("retry should succeed");
    assert_eq!(batch.question_ids.len(), 2);
    assert_eq!(store.questions().len(), 2);
}

#[tokio::test]
async fn editing_the_selected_choice_publishes_its_new_text() {
    let sessions = ReviewSessions::new();
    let store = MemoryQuestionStore::new();

    sessions.begin(
        EDUCATOR,
        COURSE,
        material("lecture7.pdf"),
        vec![extracted("2+2?", &["3", "4"], "4")],
    );

    // The extractor's "4" resolved to choice index 1; rewording that
    // choice must carry the selection along instead of leaving a stale
    // string behind.
    sessions
        .edit_choice(EDUCATOR, COURSE, 0, 1, "four".to_string())
        .unwrap();

    review::publish(&sessions, &store, EDUCATOR, COURSE)
        .await
        .unwrap();

    assert_eq!(store.questions()[0].correct_answer, "four");
}

#[tokio::test]
async fn empty_draft_cannot_be_published() {
    let sessions = ReviewSessions::new();
    let store = MemoryQuestionStore::new();

    sessions.begin(
        EDUCATOR,
        COURSE,
        material("lecture8.pdf"),
        vec![extracted("only one", &["a", "b"], "a")],
    );
    sessions.delete_question(EDUCATOR, COURSE, 0, true).unwrap();

    assert_eq!(
        review::publish(&sessions, &store, EDUCATOR, COURSE)
            .await
            .unwrap_err(),
        ReviewError::EmptyDraft
    );
    assert!(store.questions().is_empty());
}

#[tokio::test]
async fn fixing_a_flagged_entry_then_publishing_succeeds() {
    let sessions = ReviewSessions::new();
    let store = MemoryQuestionStore::new();

    sessions.begin(
        EDUCATOR,
        COURSE,
        material("lecture9.pdf"),
        vec![extracted("q", &["A", "B"], "C")],
    );

    // First attempt fails: the extractor's answer matched no choice.
    assert!(matches!(
        review::publish(&sessions, &store, EDUCATOR, COURSE)
            .await
            .unwrap_err(),
        ReviewError::ValidationFailed { index: 0, .. }
    ));

    // The operator selects a choice and retries.
    sessions.select_correct(EDUCATOR, COURSE, 0, 1).unwrap();
    review::publish(&sessions, &store, EDUCATOR, COURSE)
        .await
        .unwrap();

    assert_eq!(store.questions()[0].correct_answer, "B");
}
