//! Concept scenario tests
//!
//! These exercise the concept contracts end-to-end against a running
//! MongoDB instance (localhost:27017), so they are ignored by default:
//!
//! ```sh
//! cargo test -- --ignored
//! ```
//!
//! Each test works in its own throwaway database and drops it afterwards.

use agora::concepts::{
    Authentication, Friending, Labelling, Posting, Sorting, Sourcing, Templating, DELETED_USER,
};
use agora::db::schemas::SourceKind;
use agora::db::MongoClient;
use agora::types::AgoraError;

const MONGO_URI: &str = "mongodb://localhost:27017";

async fn test_client() -> (MongoClient, String) {
    let db_name = format!("agora_test_{}", uuid::Uuid::new_v4().simple());
    let client = MongoClient::new(MONGO_URI, &db_name)
        .await
        .expect("ignored tests require a running MongoDB");
    (client, db_name)
}

async fn drop_db(client: &MongoClient, name: &str) {
    let _ = client.inner().database(name).drop().await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn duplicate_username_always_fails_not_allowed() {
    let (client, db) = test_client().await;
    let auth = Authentication::new(&client).await.unwrap();

    auth.register("ada", "pw-one").await.unwrap();

    // Same username fails regardless of password.
    let err = auth.register("ada", "completely-different").await.unwrap_err();
    assert!(matches!(err, AgoraError::NotAllowed { entity: "user", .. }));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn empty_credentials_are_bad_values() {
    let (client, db) = test_client().await;
    let auth = Authentication::new(&client).await.unwrap();

    assert!(matches!(
        auth.register("", "pw").await.unwrap_err(),
        AgoraError::BadValues(_)
    ));
    assert!(matches!(
        auth.register("ada", "").await.unwrap_err(),
        AgoraError::BadValues(_)
    ));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn authenticate_checks_the_pair_jointly() {
    let (client, db) = test_client().await;
    let auth = Authentication::new(&client).await.unwrap();

    let id = auth.register("ada", "correct-pw").await.unwrap();

    let user = auth.authenticate("ada", "correct-pw").await.unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.username, "ada");

    assert!(matches!(
        auth.authenticate("ada", "wrong-pw").await.unwrap_err(),
        AgoraError::NotFound { entity: "user", .. }
    ));
    assert!(matches!(
        auth.authenticate("ghost", "correct-pw").await.unwrap_err(),
        AgoraError::NotFound { entity: "user", .. }
    ));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn ids_to_usernames_tolerates_stale_ids() {
    let (client, db) = test_client().await;
    let auth = Authentication::new(&client).await.unwrap();

    let ada = auth.register("ada", "pw").await.unwrap();
    let ghost = auth.register("ghost", "pw").await.unwrap();
    auth.delete(&ghost).await.unwrap();

    let names = auth
        .ids_to_usernames(&[ada.clone(), ghost.clone(), "not-even-an-id".into()])
        .await
        .unwrap();
    assert_eq!(names, vec!["ada", DELETED_USER, DELETED_USER]);

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn username_and_password_updates() {
    let (client, db) = test_client().await;
    let auth = Authentication::new(&client).await.unwrap();

    let ada = auth.register("ada", "pw").await.unwrap();
    auth.register("zoe", "pw").await.unwrap();

    // Taken by another user.
    assert!(matches!(
        auth.update_username(&ada, "zoe").await.unwrap_err(),
        AgoraError::NotAllowed { .. }
    ));

    auth.update_username(&ada, "ada2").await.unwrap();
    assert_eq!(auth.get_user_by_id(&ada).await.unwrap().username, "ada2");

    // Current password must match.
    assert!(matches!(
        auth.update_password(&ada, "wrong", "next-pw").await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));
    auth.update_password(&ada, "pw", "next-pw").await.unwrap();
    assert!(auth.authenticate("ada2", "next-pw").await.is_ok());

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn at_most_one_pending_request_per_pair() {
    let (client, db) = test_client().await;
    let friending = Friending::new(&client).await.unwrap();

    friending.create_request("alice", "bob").await.unwrap();

    // Second request fails in either direction while one is pending.
    assert!(matches!(
        friending.create_request("alice", "bob").await.unwrap_err(),
        AgoraError::NotAllowed { .. }
    ));
    assert!(matches!(
        friending.create_request("bob", "alice").await.unwrap_err(),
        AgoraError::NotAllowed { .. }
    ));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn accept_consumes_the_request_and_links_both_sides() {
    let (client, db) = test_client().await;
    let friending = Friending::new(&client).await.unwrap();

    friending.create_request("alice", "bob").await.unwrap();
    friending.accept_request("alice", "bob").await.unwrap();

    // Pending request is gone.
    assert!(friending.get_requests("alice").await.unwrap().is_empty());
    assert!(friending.get_requests("bob").await.unwrap().is_empty());

    // Exactly one edge, visible from both sides.
    assert_eq!(friending.get_friends("alice").await.unwrap(), vec!["bob"]);
    assert_eq!(friending.get_friends("bob").await.unwrap(), vec!["alice"]);

    // Removing twice proves there was a single edge.
    friending.remove_friend("bob", "alice").await.unwrap();
    assert!(matches!(
        friending.remove_friend("alice", "bob").await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));
    assert!(friending.get_friends("alice").await.unwrap().is_empty());
    assert!(friending.get_friends("bob").await.unwrap().is_empty());

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn accept_without_pending_request_is_not_found() {
    let (client, db) = test_client().await;
    let friending = Friending::new(&client).await.unwrap();

    assert!(matches!(
        friending.accept_request("alice", "bob").await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));

    // Direction matters for acceptance.
    friending.create_request("alice", "bob").await.unwrap();
    assert!(matches!(
        friending.accept_request("bob", "alice").await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn reject_logs_without_creating_an_edge() {
    let (client, db) = test_client().await;
    let friending = Friending::new(&client).await.unwrap();

    friending.create_request("alice", "bob").await.unwrap();
    friending.reject_request("alice", "bob").await.unwrap();

    assert!(friending.get_friends("alice").await.unwrap().is_empty());
    assert!(friending.get_friends("bob").await.unwrap().is_empty());
    assert!(friending.get_requests("alice").await.unwrap().is_empty());

    // Rejected is not terminal for the pair: a new request may follow.
    friending.create_request("bob", "alice").await.unwrap();

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn friends_cannot_request_again() {
    let (client, db) = test_client().await;
    let friending = Friending::new(&client).await.unwrap();

    friending.create_request("alice", "bob").await.unwrap();
    friending.accept_request("alice", "bob").await.unwrap();

    assert!(matches!(
        friending.create_request("bob", "alice").await.unwrap_err(),
        AgoraError::NotAllowed { .. }
    ));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn label_register_tag_get_untag_scenario() {
    let (client, db) = test_client().await;
    let labelling = Labelling::new(&client).await.unwrap();

    // Tagging against a missing label is NotFound.
    assert!(matches!(
        labelling.add("r1", "work", "ada").await.unwrap_err(),
        AgoraError::NotFound { entity: "label", .. }
    ));

    labelling.register("work", "ada").await.unwrap();
    labelling.add("r1", "work", "ada").await.unwrap();

    assert_eq!(labelling.get("r1", "ada").await.unwrap(), vec!["work"]);

    // Double-tagging is NotAllowed.
    assert!(matches!(
        labelling.add("r1", "work", "ada").await.unwrap_err(),
        AgoraError::NotAllowed { .. }
    ));

    labelling.remove("r1", "work", "ada").await.unwrap();
    assert!(labelling.get("r1", "ada").await.unwrap().is_empty());

    // Removing a non-member resource is NotFound.
    assert!(matches!(
        labelling.remove("r1", "work", "ada").await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn labels_are_scoped_to_their_owner() {
    let (client, db) = test_client().await;
    let labelling = Labelling::new(&client).await.unwrap();

    labelling.register("work", "ada").await.unwrap();
    labelling.register("work", "zoe").await.unwrap();
    labelling.add("r1", "work", "ada").await.unwrap();

    assert_eq!(labelling.get("r1", "ada").await.unwrap(), vec!["work"]);
    assert!(labelling.get("r1", "zoe").await.unwrap().is_empty());

    labelling.unregister("work", "ada").await.unwrap();
    assert!(labelling.lookup("work", "zoe").await.is_ok());
    assert!(matches!(
        labelling.lookup("work", "ada").await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn weight_errors_are_existence_direction_sensitive() {
    let (client, db) = test_client().await;
    let sorting = Sorting::new(&client).await.unwrap();

    // No profile yet.
    assert!(matches!(
        sorting.add_weight("work", 1.0, "ada").await.unwrap_err(),
        AgoraError::NotFound { entity: "sort profile", .. }
    ));

    sorting.register("ada").await.unwrap();
    assert!(matches!(
        sorting.register("ada").await.unwrap_err(),
        AgoraError::NotAllowed { .. }
    ));

    sorting.add_weight("work", 1.0, "ada").await.unwrap();
    assert!(matches!(
        sorting.add_weight("work", 2.0, "ada").await.unwrap_err(),
        AgoraError::NotAllowed { .. }
    ));

    sorting.set_weight("work", 2.5, "ada").await.unwrap();
    assert_eq!(sorting.get_weight("work", "ada").await.unwrap(), 2.5);

    assert!(matches!(
        sorting.set_weight("play", 1.0, "ada").await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));
    assert!(matches!(
        sorting.get_weight("play", "ada").await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));

    sorting.remove_weight("work", "ada").await.unwrap();
    assert!(matches!(
        sorting.remove_weight("work", "ada").await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn source_registration_and_cascaded_unregister() {
    let (client, db) = test_client().await;
    let sourcing = Sourcing::new(&client).await.unwrap();

    let id = sourcing
        .register(SourceKind::Url, "https://example.org/feed", "ada")
        .await
        .unwrap();

    // (owner, kind, uri) is unique.
    assert!(matches!(
        sourcing
            .register(SourceKind::Url, "https://example.org/feed", "ada")
            .await
            .unwrap_err(),
        AgoraError::NotAllowed { .. }
    ));

    // Another user may register the same location.
    sourcing
        .register(SourceKind::Url, "https://example.org/feed", "zoe")
        .await
        .unwrap();

    // Ownership is enforced on reads and removal.
    assert!(matches!(
        sourcing.lookup(&id, "zoe").await.unwrap_err(),
        AgoraError::NotAllowed { .. }
    ));

    assert!(sourcing.get_contents(&id, "ada").await.unwrap().is_empty());

    sourcing.unregister(&id, "ada").await.unwrap();
    assert!(matches!(
        sourcing.lookup(&id, "ada").await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn feed_and_post_lifecycle() {
    let (client, db) = test_client().await;
    let posting = Posting::new(&client).await.unwrap();

    posting.register_feed("general").await.unwrap();
    assert!(matches!(
        posting.register_feed("general").await.unwrap_err(),
        AgoraError::NotAllowed { .. }
    ));

    let first = posting.post("general", "ada", "hello", None).await.unwrap();
    let _second = posting.post("general", "zoe", "hi there", None).await.unwrap();

    let posts = posting.get_posts("general").await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].content, "hello");
    assert_eq!(posts[1].content, "hi there");

    posting.unpost("general", &first).await.unwrap();
    assert_eq!(posting.get_posts("general").await.unwrap().len(), 1);
    assert!(matches!(
        posting.unpost("general", &first).await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));

    // Posting into a missing feed is NotFound.
    assert!(matches!(
        posting.post("missing", "ada", "x", None).await.unwrap_err(),
        AgoraError::NotFound { entity: "feed", .. }
    ));

    posting.unregister_feed("general").await.unwrap();
    assert!(matches!(
        posting.get_posts("general").await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn template_ownership_checks() {
    let (client, db) = test_client().await;
    let templating = Templating::new(&client).await.unwrap();

    let id = templating
        .add("ada", "article", vec!["image".into(), "text".into()], "c1")
        .await
        .unwrap();

    assert!(matches!(
        templating.remove(&id, "zoe").await.unwrap_err(),
        AgoraError::NotAllowed { .. }
    ));

    templating.remove(&id, "ada").await.unwrap();
    assert!(matches!(
        templating.get(&id).await.unwrap_err(),
        AgoraError::NotFound { .. }
    ));

    drop_db(&client, &db).await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn unimplemented_algorithms_fail_hard_without_mutation() {
    let (client, db) = test_client().await;
    let sorting = Sorting::new(&client).await.unwrap();
    let sourcing = Sourcing::new(&client).await.unwrap();
    let templating = Templating::new(&client).await.unwrap();

    assert!(matches!(
        sorting.rank("ada", &["r1".into()]).await.unwrap_err(),
        AgoraError::NotImplemented(_)
    ));

    let source = sourcing
        .register(SourceKind::Folder, "/srv/drop", "ada")
        .await
        .unwrap();
    assert!(matches!(
        sourcing.refresh(&source, "ada").await.unwrap_err(),
        AgoraError::NotImplemented(_)
    ));
    // No contents appeared as a side effect.
    assert!(sourcing.get_contents(&source, "ada").await.unwrap().is_empty());

    let template = templating.add("ada", "article", vec![], "c1").await.unwrap();
    assert!(matches!(
        templating
            .render(&template, "ada", &Default::default())
            .await
            .unwrap_err(),
        AgoraError::NotImplemented(_)
    ));
    assert!(templating.list_renders("ada").await.unwrap().is_empty());

    drop_db(&client, &db).await;
}
