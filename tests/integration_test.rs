use std::sync::Arc;

use guess_number::{
    FixedSecret, GameConfig, GameResult, GameSession, GameStore, Outcome, SessionState,
    SqliteStore,
};

#[tokio::test]
async fn test_full_won_game_round_trip() {
    let store: Arc<dyn GameStore> = Arc::new(SqliteStore::new(":memory:").await.unwrap());

    let config = GameConfig::new("Ann", 10, 3);
    let mut session = GameSession::start(config, &FixedSecret(7), store.clone())
        .await
        .unwrap();

    let outcomes: Vec<Outcome> = {
        let mut v = Vec::new();
        for guess in [3, 9, 7] {
            v.push(session.guess(guess).await.unwrap().outcome);
        }
        v
    };
    assert_eq!(
        outcomes,
        vec![Outcome::Higher, Outcome::Lower, Outcome::Exact]
    );
    assert_eq!(session.state(), SessionState::Won);
    assert_eq!(session.attempts_count(), 3);

    let game = store
        .get_game(session.game_id())
        .await
        .unwrap()
        .expect("game was persisted at session start");
    assert_eq!(game.player_name, "Ann");
    assert_eq!(game.secret_number, 7);
    assert_eq!(game.result, GameResult::Won);
    assert_eq!(game.attempts_count, 3);
    assert!(game.completed_at.is_some());
}

#[tokio::test]
async fn test_replay_reproduces_attempt_sequence() {
    let store: Arc<dyn GameStore> = Arc::new(SqliteStore::new(":memory:").await.unwrap());

    let mut session = GameSession::start(
        GameConfig::new("Bob", 100, 4),
        &FixedSecret(42),
        store.clone(),
    )
    .await
    .unwrap();

    let guesses = [50, 10, 90, 30];
    for guess in guesses {
        session.guess(guess).await.unwrap();
    }
    assert_eq!(session.state(), SessionState::Lost);

    let game = store.get_game(session.game_id()).await.unwrap().unwrap();
    let attempts = store.get_attempts(session.game_id()).await.unwrap();

    // Every attempt replays in order, with no gaps from 1 to attempts_count
    assert_eq!(attempts.len() as u32, game.attempts_count);
    for (i, attempt) in attempts.iter().enumerate() {
        assert_eq!(attempt.attempt_number, i as u32 + 1);
        assert_eq!(attempt.guessed_value, guesses[i]);
    }
    assert_eq!(attempts[0].outcome, Outcome::Lower);
    assert_eq!(attempts[1].outcome, Outcome::Higher);
}

#[tokio::test]
async fn test_invalid_guesses_never_persisted() {
    let store: Arc<dyn GameStore> = Arc::new(SqliteStore::new(":memory:").await.unwrap());

    let mut session = GameSession::start(
        GameConfig::new("Cid", 10, 3),
        &FixedSecret(5),
        store.clone(),
    )
    .await
    .unwrap();

    assert!(session.guess(0).await.is_err());
    assert!(session.guess(11).await.is_err());
    session.guess(5).await.unwrap();

    let attempts = store.get_attempts(session.game_id()).await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].guessed_value, 5);
}

#[tokio::test]
async fn test_stats_across_multiple_sessions() {
    let store: Arc<dyn GameStore> = Arc::new(SqliteStore::new(":memory:").await.unwrap());

    // Ann wins in 2, Ann loses, Bob never finishes
    let mut won = GameSession::start(
        GameConfig::new("Ann", 10, 5),
        &FixedSecret(7),
        store.clone(),
    )
    .await
    .unwrap();
    won.guess(3).await.unwrap();
    won.guess(7).await.unwrap();

    let mut lost = GameSession::start(
        GameConfig::new("Ann", 10, 2),
        &FixedSecret(7),
        store.clone(),
    )
    .await
    .unwrap();
    lost.guess(1).await.unwrap();
    lost.guess(2).await.unwrap();

    GameSession::start(
        GameConfig::new("Bob", 10, 5),
        &FixedSecret(7),
        store.clone(),
    )
    .await
    .unwrap();

    let stats = store.player_stats().await.unwrap();
    assert_eq!(stats.len(), 1, "in-progress games carry no stats");

    let ann = &stats[0];
    assert_eq!(ann.player_name, "Ann");
    assert_eq!(ann.total_games, 2);
    assert_eq!(ann.wins, 1);
    assert_eq!(ann.losses, 1);
    assert_eq!(ann.win_rate, 50.0);
    assert_eq!(ann.avg_attempts_to_win, Some(2.0));
    assert_eq!(ann.min_attempts_to_win, Some(2));
    assert_eq!(ann.max_attempts_to_win, Some(2));

    // Bob's abandoned game still shows up in the listing
    assert_eq!(store.list_games().await.unwrap().len(), 3);
    assert_eq!(store.list_won().await.unwrap().len(), 1);
    assert_eq!(store.list_lost().await.unwrap().len(), 1);
}
