use std::sync::Arc;

use cinasweeper_common::{
    models::{Cell, GameMode, Move, Outcome},
    protocol::{BoardView, ErrorBody, GameView, MoveResponse},
};
use cinasweeper_server::{
    auth::{TokenTable, Verifier},
    config::Settings,
    store::{GameStore, MemoryStore},
};
use rocket::{
    http::{ContentType, Header, Status},
    local::asynchronous::{Client, LocalResponse},
};

async fn setup() -> (Client, Arc<MemoryStore>) {
    let settings = Settings {
        games_per_minute: 3,
        tokens: vec![
            ("tok-alice".to_string(), "alice".to_string()),
            ("tok-bob".to_string(), "bob".to_string()),
        ],
        ..Settings::default()
    };
    let store = Arc::new(MemoryStore::new());
    let verifier: Verifier = Arc::new(TokenTable::new(settings.tokens.clone()));
    let rocket = cinasweeper_server::build(settings, store.clone(), verifier).unwrap();
    (Client::tracked(rocket).await.unwrap(), store)
}

fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}

async fn create<'c>(client: &'c Client, token: &str, mode: GameMode) -> LocalResponse<'c> {
    let body = format!(r#"{{"mode":{}}}"#, serde_json::to_string(&mode).unwrap());
    client
        .post("/games")
        .header(ContentType::JSON)
        .header(bearer(token))
        .body(body)
        .dispatch()
        .await
}

async fn play<'c>(client: &'c Client, token: &str, id: &str, mv: Move) -> LocalResponse<'c> {
    client
        .post(format!("/games/{id}/moves"))
        .header(ContentType::JSON)
        .header(bearer(token))
        .body(serde_json::to_string(&mv).unwrap())
        .dispatch()
        .await
}

async fn claim<'c>(client: &'c Client, token: &str, id: &str) -> LocalResponse<'c> {
    client
        .put(format!("/games/{id}"))
        .header(bearer(token))
        .dispatch()
        .await
}

#[rocket::async_test]
async fn requests_without_a_valid_token_are_rejected() {
    let (client, _) = setup().await;

    let response = client
        .post("/games")
        .header(ContentType::JSON)
        .body(r#"{"mode":"singleplayer"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
    assert_eq!(response.content_type(), Some(ContentType::JSON));
    let body: ErrorBody = response.into_json().await.unwrap();
    assert!(!body.error.is_empty());

    let response = create(&client, "forged", GameMode::Singleplayer).await;
    assert_eq!(response.status(), Status::Unauthorized);
    assert!(response.into_json::<ErrorBody>().await.is_some());
}

#[rocket::async_test]
async fn unknown_routes_answer_with_json_errors() {
    let (client, _) = setup().await;

    let response = client.get("/nowhere").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    assert!(response.into_json::<ErrorBody>().await.is_some());
}

#[rocket::async_test]
async fn solo_game_played_to_a_win() {
    let (client, store) = setup().await;

    let response = create(&client, "tok-alice", GameMode::Singleplayer).await;
    assert_eq!(response.status(), Status::Ok);
    let game: GameView = response.into_json().await.unwrap();
    assert_eq!(game.owner.as_deref(), Some("alice"));
    assert!(game.started);

    let response = client.get(format!("/games/{}/state", game.id)).dispatch().await;
    let board: BoardView = response.into_json().await.unwrap();
    assert!(board.cells.iter().flatten().all(|cell| *cell == Cell::Hidden));

    let response = play(&client, "tok-alice", &game.id, Move::reveal(6, 9)).await;
    assert_eq!(response.status(), Status::Ok);
    let first: MoveResponse = response.into_json().await.unwrap();
    assert!(first.board.cells[6][9].is_revealed());
    assert!(first.board.mine_positions.is_none());

    let state = store.get_game_state(&game.id).await.unwrap();
    let mines: Vec<_> = state.field.unwrap().mines.positions().iter().copied().collect();

    let mut last = None;
    for mine in mines {
        let response = play(&client, "tok-alice", &game.id, Move::flag(mine.x as i64, mine.y as i64)).await;
        assert_eq!(response.status(), Status::Ok);
        last = Some(response.into_json::<MoveResponse>().await.unwrap());
    }

    let last = last.unwrap();
    assert_eq!(last.outcome, Outcome::Won);
    assert!(last.game.ended);
    assert!(last.game.score > 0);
    assert_eq!(last.board.mine_positions.map(|mines| mines.len()), Some(56));

    let response = play(&client, "tok-alice", &game.id, Move::reveal(0, 0)).await;
    assert_eq!(response.status(), Status::Conflict);

    let response = client.get("/leaderboard").dispatch().await;
    let top: Vec<GameView> = response.into_json().await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, game.id);

    let response = client.get("/games").header(bearer("tok-alice")).dispatch().await;
    let mine: Vec<GameView> = response.into_json().await.unwrap();
    assert_eq!(mine.len(), 1);
}

#[rocket::async_test]
async fn one_v_one_waits_for_a_second_player() {
    let (client, _) = setup().await;

    let seat: GameView = create(&client, "tok-alice", GameMode::OneVOne)
        .await
        .into_json()
        .await
        .unwrap();
    assert!(!seat.started);
    let rival_id = seat.opponent_id.clone().unwrap();

    let response = play(&client, "tok-alice", &seat.id, Move::reveal(0, 0)).await;
    assert_eq!(response.status().code, 425);

    let response = claim(&client, "tok-alice", &rival_id).await;
    assert_eq!(response.status(), Status::BadRequest);
    let body: ErrorBody = response.into_json().await.unwrap();
    assert!(body.error.contains("same user"));

    let response = claim(&client, "tok-bob", &rival_id).await;
    assert_eq!(response.status(), Status::Ok);
    let rival: GameView = response.into_json().await.unwrap();
    assert_eq!(rival.owner.as_deref(), Some("bob"));
    assert!(rival.started);

    let response = claim(&client, "tok-alice", &rival_id).await;
    assert_eq!(response.status(), Status::Ok);
    let unchanged: GameView = response.into_json().await.unwrap();
    assert_eq!(unchanged.owner.as_deref(), Some("bob"));

    let response = play(&client, "tok-alice", &seat.id, Move::reveal(0, 0)).await;
    assert_eq!(response.status(), Status::Ok);
    let response = play(&client, "tok-bob", &seat.id, Move::reveal(1, 1)).await;
    assert_eq!(response.status(), Status::Forbidden);
}

#[rocket::async_test]
async fn errors_map_to_statuses() {
    let (client, _) = setup().await;

    let response = client.get("/games/missing").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);

    let game: GameView = create(&client, "tok-alice", GameMode::Singleplayer)
        .await
        .into_json()
        .await
        .unwrap();
    play(&client, "tok-alice", &game.id, Move::reveal(6, 9)).await;

    let response = play(&client, "tok-alice", &game.id, Move::flag(6, 9)).await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn game_creation_is_rate_limited_per_user() {
    let (client, _) = setup().await;

    for _ in 0..3 {
        let response = create(&client, "tok-alice", GameMode::Singleplayer).await;
        assert_eq!(response.status(), Status::Ok);
    }
    let response = create(&client, "tok-alice", GameMode::Singleplayer).await;
    assert_eq!(response.status(), Status::TooManyRequests);

    let response = create(&client, "tok-bob", GameMode::Singleplayer).await;
    assert_eq!(response.status(), Status::Ok);
}
