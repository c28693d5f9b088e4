// Integration tests for the companion directory over the in-memory store

mod common;

use common::new_companion;
use learning_companion::directory::{
    Caller, CompanionFilter, DirectoryError, DirectoryService, QuotaPolicy,
};
use learning_companion::{MemoryStore, Subject};
use std::sync::Arc;

fn directory() -> DirectoryService {
    DirectoryService::new(Arc::new(MemoryStore::new()), QuotaPolicy::default())
}

fn filter(subject: Option<&str>, topic: Option<&str>) -> CompanionFilter {
    CompanionFilter {
        subject: subject.map(str::to_string),
        topic: topic.map(str::to_string),
        ..CompanionFilter::default()
    }
}

async fn seed(directory: &DirectoryService) -> anyhow::Result<()> {
    let author = Caller::new("author-1");
    directory
        .create(&author, new_companion(Subject::Maths, "Countsy", "Algebra basics"))
        .await?;
    directory
        .create(&author, new_companion(Subject::Maths, "Algebrina", "Derivatives"))
        .await?;
    directory
        .create(&author, new_companion(Subject::Science, "Neura", "Algebraic biology"))
        .await?;
    directory
        .create(&author, new_companion(Subject::History, "Chrono", "Ancient Rome"))
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_create_stamps_author_and_id() -> anyhow::Result<()> {
    let directory = directory();
    let caller = Caller::new("user-42");

    let created = directory
        .create(&caller, new_companion(Subject::Coding, " Byte ", "Rust ownership"))
        .await?;

    assert_eq!(created.author, "user-42");
    assert_eq!(created.name, "Byte", "fields are trimmed");
    assert!(uuid::Uuid::parse_str(&created.id).is_ok());

    let fetched = directory.get_by_id(&created.id).await?;
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn test_create_rejects_blank_fields() {
    let directory = directory();

    let err = directory
        .create(&Caller::new("u"), new_companion(Subject::Coding, "  ", "Rust"))
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::InvalidInput(_)));
}

#[tokio::test]
async fn test_get_unknown_companion() {
    let err = directory().get_by_id("missing").await.unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(id) if id == "missing"));
}

#[tokio::test]
async fn test_list_by_subject_is_case_insensitive_substring() -> anyhow::Result<()> {
    let directory = directory();
    seed(&directory).await?;

    let maths = directory.list(&filter(Some("MATH"), None)).await?;
    let names: Vec<_> = maths.iter().map(|c| c.name.as_str()).collect();

    assert_eq!(names, vec!["Countsy", "Algebrina"]);
    Ok(())
}

#[tokio::test]
async fn test_list_by_subject_and_topic() -> anyhow::Result<()> {
    let directory = directory();
    seed(&directory).await?;

    // "algebra" matches Countsy by topic and Algebrina by name; Neura is science
    let found = directory.list(&filter(Some("math"), Some("algebra"))).await?;
    let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Countsy", "Algebrina"]);

    let topic_only = directory.list(&filter(None, Some("ALGEBRA"))).await?;
    assert_eq!(topic_only.len(), 3);

    let none = directory.list(&filter(Some("history"), Some("algebra"))).await?;
    assert!(none.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_list_treats_empty_filters_as_absent() -> anyhow::Result<()> {
    let directory = directory();
    seed(&directory).await?;

    let all = directory.list(&filter(Some(""), Some(" "))).await?;
    assert_eq!(all.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_list_pages() -> anyhow::Result<()> {
    let directory = directory();
    seed(&directory).await?;

    let page = |page, limit| CompanionFilter {
        page,
        limit,
        ..CompanionFilter::default()
    };

    let first = directory.list(&page(1, 3)).await?;
    let second = directory.list(&page(2, 3)).await?;
    let third = directory.list(&page(3, 3)).await?;

    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].name, "Chrono");
    assert!(third.is_empty());

    let err = directory.list(&page(0, 3)).await.unwrap_err();
    assert!(matches!(err, DirectoryError::InvalidInput(_)));
    Ok(())
}

#[tokio::test]
async fn test_session_history() -> anyhow::Result<()> {
    let directory = directory();
    let author = Caller::new("author-1");
    let alice = Caller::new("alice");
    let bob = Caller::new("bob");

    let maths = directory
        .create(&author, new_companion(Subject::Maths, "Countsy", "Fractions"))
        .await?;
    let history = directory
        .create(&author, new_companion(Subject::History, "Chrono", "Rome"))
        .await?;

    directory.record_session_start(&alice, &maths.id).await?;
    directory.record_session_start(&bob, &history.id).await?;
    let entry = directory.record_session_start(&alice, &history.id).await?;
    assert_eq!(entry.user_id, "alice");
    assert_eq!(entry.companion_id, history.id);

    let recent: Vec<_> = directory
        .recent_sessions(10)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(recent, vec!["Chrono", "Chrono", "Countsy"]);

    let limited = directory.recent_sessions(1).await?;
    assert_eq!(limited.len(), 1);

    let alice_sessions: Vec<_> = directory
        .sessions_for_user("alice", 10)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(alice_sessions, vec!["Chrono", "Countsy"]);
    Ok(())
}

#[tokio::test]
async fn test_session_for_unknown_companion() {
    let err = directory()
        .record_session_start(&Caller::new("alice"), "missing")
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::NotFound(_)));
}

#[tokio::test]
async fn test_list_for_author_newest_first() -> anyhow::Result<()> {
    let directory = directory();
    let ada = Caller::new("ada");

    directory
        .create(&ada, new_companion(Subject::Coding, "First", "Loops"))
        .await?;
    directory
        .create(&Caller::new("other"), new_companion(Subject::Coding, "Other", "Loops"))
        .await?;
    directory
        .create(&ada, new_companion(Subject::Coding, "Second", "Closures"))
        .await?;

    let names: Vec<_> = directory
        .list_for_author("ada")
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
    Ok(())
}

#[tokio::test]
async fn test_creation_quota_by_tier() -> anyhow::Result<()> {
    let directory = directory();

    let free = Caller::new("free");
    let basic = Caller::new("basic").with_feature("3_active_companions");
    let pro = Caller::new("pro").with_plan("pro");

    // No recognised tier: limit 0
    assert!(!directory.check_creation_quota(&free).await?);

    for i in 0..3 {
        assert!(directory.check_creation_quota(&basic).await?, "below limit at {}", i);
        directory
            .create(&basic, new_companion(Subject::Language, "Lexi", "Verbs"))
            .await?;
    }
    assert!(!directory.check_creation_quota(&basic).await?, "limit reached");

    for _ in 0..12 {
        directory
            .create(&pro, new_companion(Subject::Language, "Lexi", "Verbs"))
            .await?;
    }
    assert!(directory.check_creation_quota(&pro).await?, "pro is unlimited");
    Ok(())
}

#[test]
fn test_quota_policy_first_matching_tier_wins() {
    let policy = QuotaPolicy::default();

    let both = Caller::new("u")
        .with_feature("10_active_companions")
        .with_feature("3_active_companions");
    assert_eq!(policy.limit_for(&both), Some(3));

    let ten = Caller::new("u").with_feature("10_active_companions");
    assert_eq!(policy.limit_for(&ten), Some(10));
    assert!(policy.allows(&ten, 9));
    assert!(!policy.allows(&ten, 10));

    assert_eq!(policy.limit_for(&Caller::new("u").with_plan("pro")), None);
    assert_eq!(policy.limit_for(&Caller::new("u").with_plan("basic")), Some(0));
}
