//! Tests for database repository operations.

use tempfile::NamedTempFile;

use kinarow::db::{GameRepository, NewGameRecord, NewUser, User};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path);
    repo.run_migrations().expect("Migrations failed");
    (db_file, repo)
}

fn create_user(repo: &GameRepository, username: &str, is_guest: bool) -> User {
    repo.create_user(NewUser::new(
        username.to_string(),
        username.to_string(),
        "hash".to_string(),
        is_guest,
    ))
    .expect("Create failed")
}

#[test]
fn test_create_user() {
    let (_db, repo) = setup_test_db();
    let user = create_user(&repo, "alice", false);
    assert_eq!(user.username(), "alice");
    assert!(!*user.is_guest());
    assert!(*user.id() > 0);
}

#[test]
fn test_create_user_duplicate_username_is_unique_violation() {
    let (_db, repo) = setup_test_db();
    create_user(&repo, "bob", false);
    let err = repo
        .create_user(NewUser::new(
            "bob".to_string(),
            "Other Bob".to_string(),
            "hash".to_string(),
            false,
        ))
        .expect_err("Duplicate username should fail");
    assert!(err.is_unique_violation(), "got {err}");
}

#[test]
fn test_get_user_by_username() {
    let (_db, repo) = setup_test_db();
    create_user(&repo, "carol", false);

    let found = repo.get_user_by_username("carol").expect("Query failed");
    assert!(found.is_some());
    let missing = repo.get_user_by_username("nobody").expect("Query failed");
    assert!(missing.is_none());
}

#[test]
fn test_get_user_by_id() {
    let (_db, repo) = setup_test_db();
    let user = create_user(&repo, "dave", false);

    let found = repo.get_user_by_id(*user.id()).expect("Query failed");
    assert_eq!(found.map(|u| *u.id()), Some(*user.id()));
    let missing = repo.get_user_by_id(9999).expect("Query failed");
    assert!(missing.is_none());
}

#[test]
fn test_list_guest_accounts_only_returns_guests() {
    let (_db, repo) = setup_test_db();
    create_user(&repo, "regular", false);
    create_user(&repo, "guest_one", true);
    create_user(&repo, "guest_two", true);

    let guests = repo.list_guest_accounts().expect("List failed");
    assert_eq!(guests.len(), 2);
    assert!(guests.iter().all(|u| *u.is_guest()));
}

#[test]
fn test_record_game() {
    let (_db, repo) = setup_test_db();
    let x = create_user(&repo, "xavier", false);
    let o = create_user(&repo, "olivia", false);

    let record = NewGameRecord::new(5, 4, true, 11, Some(73), Some(*x.id()), *x.id(), *o.id());
    let game = repo.record_game(record).expect("Record failed");

    assert_eq!(*game.board_size(), 5);
    assert_eq!(*game.win_length(), 4);
    assert!(*game.is_win());
    assert_eq!(*game.moves(), 11);
    assert_eq!(*game.duration_seconds(), Some(73));
    assert_eq!(*game.winner_id(), Some(*x.id()));
}

#[test]
fn test_games_for_player_covers_both_seats() {
    let (_db, repo) = setup_test_db();
    let a = create_user(&repo, "a", false);
    let b = create_user(&repo, "b", false);
    let c = create_user(&repo, "c", false);

    // a vs b, then b vs a, then b vs c
    for (x, o) in [(&a, &b), (&b, &a), (&b, &c)] {
        let record = NewGameRecord::new(3, 3, false, 9, None, None, *x.id(), *o.id());
        repo.record_game(record).expect("Record failed");
    }

    assert_eq!(repo.games_for_player(*a.id()).expect("Query failed").len(), 2);
    assert_eq!(repo.games_for_player(*b.id()).expect("Query failed").len(), 3);
    assert_eq!(repo.games_for_player(*c.id()).expect("Query failed").len(), 1);
}

#[test]
fn test_aggregated_stats_attribution_by_id() {
    let (_db, repo) = setup_test_db();
    let hero = create_user(&repo, "hero", false);
    let rival = create_user(&repo, "rival", false);

    // Two wins for hero, one loss (rival wins), one draw.
    for winner in [Some(*hero.id()), Some(*hero.id()), Some(*rival.id()), None] {
        let record = NewGameRecord::new(
            3,
            3,
            winner.is_some(),
            7,
            Some(30),
            winner,
            *hero.id(),
            *rival.id(),
        );
        repo.record_game(record).expect("Record failed");
    }

    let stats = repo.aggregated_stats(*hero.id()).expect("Stats failed");
    assert_eq!(*stats.total_games(), 4);
    assert_eq!(*stats.wins(), 2);
    assert_eq!(*stats.losses(), 1);
    assert_eq!(*stats.draws(), 1);
    assert_eq!(*stats.win_rate(), 50.0);

    let rival_stats = repo.aggregated_stats(*rival.id()).expect("Stats failed");
    assert_eq!(*rival_stats.wins(), 1);
    assert_eq!(*rival_stats.losses(), 2);
    assert_eq!(*rival_stats.draws(), 1);
}

#[test]
fn test_aggregated_stats_no_games() {
    let (_db, repo) = setup_test_db();
    let user = create_user(&repo, "newbie", false);

    let stats = repo.aggregated_stats(*user.id()).expect("Stats failed");
    assert_eq!(*stats.total_games(), 0);
    assert_eq!(*stats.win_rate(), 0.0);
}

#[test]
fn test_guest_stats_attributed_like_regular_users() {
    let (_db, repo) = setup_test_db();
    let guest = create_user(&repo, "GeothermalGuru", true);
    let regular = create_user(&repo, "player", false);

    let record = NewGameRecord::new(
        3,
        3,
        true,
        5,
        Some(12),
        Some(*guest.id()),
        *guest.id(),
        *regular.id(),
    );
    repo.record_game(record).expect("Record failed");

    let stats = repo.aggregated_stats(*guest.id()).expect("Stats failed");
    assert_eq!(*stats.wins(), 1);
    assert_eq!(*stats.total_games(), 1);
}
