use rocket::{
    State, catch, get,
    http::Status,
    post, put,
    request::Request,
    response::{self, Responder},
    serde::json::Json,
};
use tracing::{info, instrument, warn};

use cinasweeper_common::{
    models::Move,
    protocol::{BoardView, CreateGameRequest, ErrorBody, GameView, MoveResponse},
};

use crate::{auth::Player, error::GameError, rate_limit::RateLimiter, service::GameService};

type ApiResult<T> = Result<Json<T>, GameError>;

impl GameError {
    pub fn status(&self) -> Status {
        match self {
            GameError::GameNotFound(_) => Status::NotFound,
            GameError::GameEnded | GameError::Conflict(_) => Status::Conflict,
            GameError::GameNotStarted => Status::new(425),
            GameError::PlayingAgainstSelf | GameError::CellAlreadyOpen(_) => Status::BadRequest,
            GameError::NotOwner => Status::Forbidden,
            GameError::RateLimited => Status::TooManyRequests,
            GameError::Unauthorized => Status::Unauthorized,
            GameError::Configuration(_) | GameError::Storage(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for GameError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status.code >= 500 {
            warn!("Request {} failed: {}", req.uri(), self);
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .respond_to(req)
    }
}

/// Failures raised before a handler runs, such as a rejected `Player` guard
/// or an unparsable body, still answer with an [`ErrorBody`].
#[catch(default)]
pub fn default_catcher(status: Status, _req: &Request<'_>) -> (Status, Json<ErrorBody>) {
    let error = match status {
        s if s == Status::Unauthorized => GameError::Unauthorized.to_string(),
        _ => status.reason().unwrap_or("request failed").to_string(),
    };
    (status, Json(ErrorBody { error }))
}

#[post("/games", data = "<request>")]
#[instrument(level = "trace", skip_all, fields(user = %player.0.id, mode = %request.mode))]
pub async fn create_game(
    request: Json<CreateGameRequest>,
    player: Player,
    service: &State<GameService>,
    rate_limiter: &State<RateLimiter>,
) -> ApiResult<GameView> {
    rate_limiter.check(&player.0)?;

    let game = service.create_game(Some(player.0), request.mode).await?;
    info!("Game {} created via API", game.id);
    Ok(Json(service.game_view(&game)))
}

#[get("/games")]
#[instrument(level = "trace", skip_all, fields(user = %player.0.id))]
pub async fn list_games(player: Player, service: &State<GameService>) -> ApiResult<Vec<GameView>> {
    let games = service.games_of(&player.0).await?;
    Ok(Json(games.iter().map(|game| service.game_view(game)).collect()))
}

#[get("/leaderboard")]
pub async fn leaderboard(service: &State<GameService>) -> ApiResult<Vec<GameView>> {
    let games = service.leaderboard().await?;
    Ok(Json(games.iter().map(|game| service.game_view(game)).collect()))
}

#[get("/games/<id>")]
pub async fn get_game(id: &str, service: &State<GameService>) -> ApiResult<GameView> {
    let game = service.game(id).await?;
    Ok(Json(service.game_view(&game)))
}

#[get("/games/<id>/state")]
pub async fn get_state(id: &str, service: &State<GameService>) -> ApiResult<BoardView> {
    let game = service.game(id).await?;
    let state = service.state(id).await?;
    Ok(Json(service.board_view(&game, &state)))
}

#[put("/games/<id>")]
#[instrument(level = "trace", skip(player, service), fields(user = %player.0.id))]
pub async fn claim_game(id: &str, player: Player, service: &State<GameService>) -> ApiResult<GameView> {
    let game = service.claim(id, &player.0).await?;
    Ok(Json(service.game_view(&game)))
}

#[post("/games/<id>/moves", data = "<mv>")]
#[instrument(level = "trace", skip(player, service, mv), fields(user = %player.0.id, x = mv.x, y = mv.y))]
pub async fn play_move(
    id: &str,
    mv: Json<Move>,
    player: Player,
    service: &State<GameService>,
) -> ApiResult<MoveResponse> {
    let played = service.play(id, &player.0, mv.0).await?;
    Ok(Json(MoveResponse {
        outcome: played.outcome,
        game: service.game_view(&played.game),
        board: service.board_view(&played.game, &played.state),
    }))
}
