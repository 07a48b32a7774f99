//! End-to-end tests for the voting and content-ownership subsystem
//!
//! These tests drive the repositories against a live database. They run
//! only when `DATABASE_URL` is set and skip cleanly otherwise, so the
//! suite stays green on machines without infrastructure.

use serial_test::serial;
use sqlx::PgPool;
use uuid::Uuid;

use api::error::ApiError;
use api::models::{
    NewAnswer, NewQuestion, NewUser, Target, UpdateComment, UpdateQuestion, User, VoteAction,
    VoteType,
};
use api::repositories::{
    AnswerRepository, CommentRepository, QuestionRepository, UserRepository, VoteRepository,
};
use common::database::{DatabaseConfig, init_pool};

async fn setup() -> Option<PgPool> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping database integration test");
        return None;
    }

    let config = DatabaseConfig::from_env().expect("database config");
    let pool = init_pool(&config).await.expect("database pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    Some(pool)
}

async fn register_user(pool: &PgPool, prefix: &str) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    let users = UserRepository::new(pool.clone());
    users
        .create(&NewUser {
            username: format!("{}_{}", prefix, &suffix[..12]),
            email: format!("{}_{}@example.com", prefix, &suffix[..12]),
            password: "correct horse battery".to_string(),
        })
        .await
        .expect("user registration")
}

async fn create_question(pool: &PgPool, user: &User, tags: &str) -> Uuid {
    let questions = QuestionRepository::new(pool.clone());
    questions
        .create(
            &NewQuestion {
                title: "How to implement JWT authentication in ASP.NET Core?".to_string(),
                body: "I need to secure an API with JSON Web Tokens. What is the idiomatic setup?"
                    .to_string(),
                tags: tags.to_string(),
            },
            user.id,
        )
        .await
        .expect("question creation")
        .id
}

async fn create_answer(pool: &PgPool, user: &User, question_id: Uuid) -> Uuid {
    let answers = AnswerRepository::new(pool.clone());
    answers
        .create(
            &NewAnswer {
                body: "Configure the bearer middleware and validate the signing key.".to_string(),
                question_id,
            },
            user.id,
        )
        .await
        .expect("answer creation")
        .id
}

#[tokio::test]
#[serial]
async fn test_registration_rejects_duplicates() {
    let Some(pool) = setup().await else { return };
    let users = UserRepository::new(pool.clone());

    let user = register_user(&pool, "dup").await;

    let err = users
        .create(&NewUser {
            username: user.username.clone(),
            email: "other@example.com".to_string(),
            password: "correct horse battery".to_string(),
        })
        .await
        .expect_err("duplicate username must be rejected");
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn test_login_round_trip() {
    let Some(pool) = setup().await else { return };
    let users = UserRepository::new(pool.clone());

    let user = register_user(&pool, "login").await;

    let found = users
        .find_by_username_or_email(&user.username)
        .await
        .expect("lookup")
        .expect("registered user is findable");
    assert!(users
        .verify_password(&found, "correct horse battery")
        .expect("verification"));
    assert!(!users
        .verify_password(&found, "wrong password")
        .expect("verification"));
}

#[tokio::test]
#[serial]
async fn test_tag_resolution_is_canonical_and_deduplicated() {
    let Some(pool) = setup().await else { return };
    let questions = QuestionRepository::new(pool.clone());

    let user = register_user(&pool, "tags").await;
    let question_id = create_question(&pool, &user, "C#, csharp, C#").await;

    let detail = questions
        .find_detail(question_id)
        .await
        .expect("detail query")
        .expect("question exists");
    let names: Vec<&str> = detail.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["c#", "csharp"]);
}

#[tokio::test]
#[serial]
async fn test_question_update_replaces_tag_set() {
    let Some(pool) = setup().await else { return };
    let questions = QuestionRepository::new(pool.clone());

    let user = register_user(&pool, "retag").await;
    let question_id = create_question(&pool, &user, "jwt,aspnet").await;

    let updated = questions
        .update(
            question_id,
            &UpdateQuestion {
                title: "How to implement JWT authentication in ASP.NET Core?".to_string(),
                body: "Clarified: which token validation parameters matter most here?".to_string(),
                tags: "jwt".to_string(),
            },
            user.id,
        )
        .await
        .expect("question update");
    assert!(updated.updated_at.is_some(), "update must re-stamp updated_at");

    let detail = questions
        .find_detail(question_id)
        .await
        .expect("detail query")
        .expect("question exists");
    let names: Vec<&str> = detail.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["jwt"]);
}

#[tokio::test]
#[serial]
async fn test_existence_is_checked_before_ownership() {
    let Some(pool) = setup().await else { return };
    let questions = QuestionRepository::new(pool.clone());

    let user = register_user(&pool, "missing").await;

    let err = questions
        .delete(Uuid::new_v4(), user.id)
        .await
        .expect_err("deleting a nonexistent question must fail");
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn test_only_the_owner_may_mutate() {
    let Some(pool) = setup().await else { return };
    let questions = QuestionRepository::new(pool.clone());

    let owner = register_user(&pool, "owner").await;
    let other = register_user(&pool, "other").await;
    let question_id = create_question(&pool, &owner, "jwt").await;

    let err = questions
        .delete(question_id, other.id)
        .await
        .expect_err("non-owner delete must fail");
    assert!(matches!(err, ApiError::Forbidden(_)));

    let err = questions
        .update(
            question_id,
            &UpdateQuestion {
                title: "A different title that is long enough".to_string(),
                body: "A different body that is comfortably over the minimum.".to_string(),
                tags: "jwt".to_string(),
            },
            other.id,
        )
        .await
        .expect_err("non-owner update must fail");
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
#[serial]
async fn test_comment_mutations_respect_ownership() {
    let Some(pool) = setup().await else { return };
    let comments = CommentRepository::new(pool.clone());

    let asker = register_user(&pool, "cmowner").await;
    let commenter = register_user(&pool, "cmuser").await;
    let question_id = create_question(&pool, &asker, "jwt").await;

    let comment = comments
        .create(
            "Could you share the full error output?",
            Target::Question(question_id),
            commenter.id,
        )
        .await
        .expect("comment creation");

    // A nonexistent comment is a 404 regardless of the caller.
    let err = comments
        .update(
            Uuid::new_v4(),
            &UpdateComment {
                body: "Edited text that is long enough".to_string(),
            },
            commenter.id,
        )
        .await
        .expect_err("updating a nonexistent comment must fail");
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = comments
        .delete(Uuid::new_v4(), commenter.id)
        .await
        .expect_err("deleting a nonexistent comment must fail");
    assert!(matches!(err, ApiError::NotFound(_)));

    // The question owner still does not own the comment.
    let err = comments
        .update(
            comment.id,
            &UpdateComment {
                body: "Edited by someone else entirely".to_string(),
            },
            asker.id,
        )
        .await
        .expect_err("non-owner update must fail");
    assert!(matches!(err, ApiError::Forbidden(_)));

    let err = comments
        .delete(comment.id, asker.id)
        .await
        .expect_err("non-owner delete must fail");
    assert!(matches!(err, ApiError::Forbidden(_)));

    // The author can edit and remove their own comment.
    let updated = comments
        .update(
            comment.id,
            &UpdateComment {
                body: "Never mind, found it in the logs.".to_string(),
            },
            commenter.id,
        )
        .await
        .expect("owner update");
    assert_eq!(updated.body, "Never mind, found it in the logs.");

    comments
        .delete(comment.id, commenter.id)
        .await
        .expect("owner delete");
}

#[tokio::test]
#[serial]
async fn test_tag_rows_are_shared_across_questions() {
    let Some(pool) = setup().await else { return };

    let user = register_user(&pool, "share").await;
    let suffix = Uuid::new_v4().simple().to_string();
    let tag = format!("topic{}", &suffix[..12]);

    create_question(&pool, &user, &tag).await;
    create_question(&pool, &user, &tag).await;

    let tag_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE name = $1")
        .bind(&tag)
        .fetch_one(&pool)
        .await
        .expect("tag count query");
    assert_eq!(tag_rows, 1, "resolving the same name twice must reuse the row");

    let linked: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM question_tags qt
        JOIN tags t ON t.id = qt.tag_id
        WHERE t.name = $1
        "#,
    )
    .bind(&tag)
    .fetch_one(&pool)
    .await
    .expect("link count query");
    assert_eq!(linked, 2);
}

#[tokio::test]
#[serial]
async fn test_accept_answer_keeps_at_most_one_accepted() {
    let Some(pool) = setup().await else { return };
    let answers = AnswerRepository::new(pool.clone());

    let asker = register_user(&pool, "asker").await;
    let first_user = register_user(&pool, "first").await;
    let second_user = register_user(&pool, "second").await;
    let question_id = create_question(&pool, &asker, "jwt").await;
    let first_answer = create_answer(&pool, &first_user, question_id).await;
    let second_answer = create_answer(&pool, &second_user, question_id).await;

    // Only the question owner may accept, not the answer owner.
    let err = answers
        .accept(first_answer, first_user.id)
        .await
        .expect_err("answer owner must not accept");
    assert!(matches!(err, ApiError::Forbidden(_)));

    answers.accept(first_answer, asker.id).await.expect("accept");
    answers.accept(second_answer, asker.id).await.expect("re-accept");

    let first = answers
        .find_by_id(first_answer)
        .await
        .expect("lookup")
        .expect("answer exists");
    let second = answers
        .find_by_id(second_answer)
        .await
        .expect("lookup")
        .expect("answer exists");
    assert!(!first.is_accepted, "previous acceptance must be reset");
    assert!(second.is_accepted);

    let listed = answers.list_by_question(question_id).await.expect("listing");
    assert_eq!(listed.iter().filter(|a| a.is_accepted).count(), 1);
    assert_eq!(listed[0].id, second_answer, "accepted answer sorts first");
}

#[tokio::test]
#[serial]
async fn test_vote_toggle_and_flip_keep_count_consistent() {
    let Some(pool) = setup().await else { return };
    let votes = VoteRepository::new(pool.clone());

    let asker = register_user(&pool, "vasker").await;
    let answerer = register_user(&pool, "vanswer").await;
    let voter = register_user(&pool, "voter").await;
    let question_id = create_question(&pool, &asker, "jwt").await;
    let answer_id = create_answer(&pool, &answerer, question_id).await;
    let target = Target::Answer(answer_id);

    // First upvote is recorded.
    let outcome = votes
        .cast(voter.id, target, VoteType::Up)
        .await
        .expect("first vote");
    assert_eq!(outcome.action, VoteAction::Created);
    assert_eq!(outcome.vote_count, 1);
    assert_eq!(votes.get_count(target).await.expect("count"), 1);
    assert_eq!(votes.recount(target).await.expect("recount"), 1);
    assert_eq!(
        votes.get_user_vote(voter.id, target).await.expect("lookup"),
        Some(VoteType::Up)
    );

    // Flipping to a downvote moves the count by two.
    let outcome = votes
        .cast(voter.id, target, VoteType::Down)
        .await
        .expect("flip vote");
    assert_eq!(outcome.action, VoteAction::Updated);
    assert_eq!(outcome.vote_count, -1);
    assert_eq!(votes.recount(target).await.expect("recount"), -1);

    // Repeating the downvote retracts it entirely.
    let outcome = votes
        .cast(voter.id, target, VoteType::Down)
        .await
        .expect("toggle vote off");
    assert_eq!(outcome.action, VoteAction::Removed);
    assert_eq!(outcome.vote_count, 0);
    assert_eq!(votes.get_count(target).await.expect("count"), 0);
    assert_eq!(votes.recount(target).await.expect("recount"), 0);
    assert_eq!(
        votes.get_user_vote(voter.id, target).await.expect("lookup"),
        None
    );
}

#[tokio::test]
#[serial]
async fn test_votes_on_own_content_are_rejected() {
    let Some(pool) = setup().await else { return };
    let votes = VoteRepository::new(pool.clone());

    let asker = register_user(&pool, "selfq").await;
    let answerer = register_user(&pool, "selfa").await;
    let question_id = create_question(&pool, &asker, "jwt").await;
    let answer_id = create_answer(&pool, &answerer, question_id).await;

    let err = votes
        .cast(asker.id, Target::Question(question_id), VoteType::Up)
        .await
        .expect_err("question owner must not vote on it");
    assert!(matches!(err, ApiError::Forbidden(_)));

    let err = votes
        .cast(answerer.id, Target::Answer(answer_id), VoteType::Up)
        .await
        .expect_err("answer owner must not vote on it");
    assert!(matches!(err, ApiError::Forbidden(_)));

    // The rejected casts must not have touched the ledger.
    assert_eq!(votes.get_count(Target::Question(question_id)).await.expect("count"), 0);
    assert_eq!(votes.get_count(Target::Answer(answer_id)).await.expect("count"), 0);
}

#[tokio::test]
#[serial]
async fn test_question_deletion_cascades_to_all_dependents() {
    let Some(pool) = setup().await else { return };
    let questions = QuestionRepository::new(pool.clone());
    let comments = CommentRepository::new(pool.clone());
    let votes = VoteRepository::new(pool.clone());

    let asker = register_user(&pool, "casker").await;
    let answerer = register_user(&pool, "canswer").await;
    let voter = register_user(&pool, "cvoter").await;
    let question_id = create_question(&pool, &asker, "jwt,aspnet").await;
    let answer_id = create_answer(&pool, &answerer, question_id).await;

    comments
        .create("Could you add a code sample?", Target::Question(question_id), answerer.id)
        .await
        .expect("question comment");
    comments
        .create("This fixed it for me.", Target::Answer(answer_id), voter.id)
        .await
        .expect("answer comment");
    votes
        .cast(voter.id, Target::Question(question_id), VoteType::Up)
        .await
        .expect("question vote");
    votes
        .cast(voter.id, Target::Answer(answer_id), VoteType::Up)
        .await
        .expect("answer vote");

    questions
        .delete(question_id, asker.id)
        .await
        .expect("cascade delete");

    assert!(questions
        .find_by_id(question_id)
        .await
        .expect("lookup")
        .is_none());

    let remaining: i64 = sqlx::query_scalar(
        r#"
        SELECT (SELECT COUNT(*) FROM answers WHERE question_id = $1)
             + (SELECT COUNT(*) FROM comments WHERE question_id = $1 OR answer_id = $2)
             + (SELECT COUNT(*) FROM votes WHERE question_id = $1 OR answer_id = $2)
             + (SELECT COUNT(*) FROM question_tags WHERE question_id = $1)
        "#,
    )
    .bind(question_id)
    .bind(answer_id)
    .fetch_one(&pool)
    .await
    .expect("remaining rows query");
    assert_eq!(remaining, 0, "no rows may still reference the deleted question");

    // Tag entities persist even after the question is gone.
    let tag_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE name IN ('jwt', 'aspnet')")
        .fetch_one(&pool)
        .await
        .expect("tag count query");
    assert_eq!(tag_count, 2);
}

#[tokio::test]
#[serial]
async fn test_view_counter_increments() {
    let Some(pool) = setup().await else { return };
    let questions = QuestionRepository::new(pool.clone());

    let user = register_user(&pool, "views").await;
    let question_id = create_question(&pool, &user, "jwt").await;

    questions.increment_view_count(question_id).await.expect("first view");
    questions.increment_view_count(question_id).await.expect("second view");

    let question = questions
        .find_by_id(question_id)
        .await
        .expect("lookup")
        .expect("question exists");
    assert_eq!(question.view_count, 2);

    // A missing id is a silent no-op.
    questions
        .increment_view_count(Uuid::new_v4())
        .await
        .expect("missing id is not an error");
}
