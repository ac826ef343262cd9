//! HTTP front end for the Swiss tournament engine: JSON API over actix-web.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Env: HOST, PORT, and DATA_DIR (persist each tournament as CSV files under
//! DATA_DIR/<tournament id>/; tournaments live in memory only when unset).

use actix_web::{
    get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use swiss_tournament::{
    CsvStore, MemoryStore, PairingOptions, PlayerId, RecordStore, StoreError, Tournament,
    TournamentError,
};
use uuid::Uuid;

const OPTIONS_FILE: &str = "options.json";

type Store = Box<dyn RecordStore + Send + Sync>;

/// All tournaments by id. One lock covers each tournament's registry and ledger.
type AppState = Data<RwLock<HashMap<Uuid, Tournament<Store>>>>;

struct Config {
    host: String,
    port: u16,
    data_dir: Option<PathBuf>,
}

impl Config {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            data_dir: std::env::var_os("DATA_DIR").map(PathBuf::from),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    avoid_rematches: Option<bool>,
    fair_byes: Option<bool>,
}

#[derive(Serialize)]
struct TournamentCreated {
    id: Uuid,
    options: PairingOptions,
}

#[derive(Deserialize)]
struct RegisterPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct ReportMatchBody {
    winner: PlayerId,
    loser: PlayerId,
}

#[derive(Deserialize)]
struct ReportByeBody {
    player: PlayerId,
}

#[derive(Serialize)]
struct PlayersResponse<T: Serialize> {
    count: usize,
    players: T,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: Uuid,
}

/// Path segments: tournament id and player id.
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: Uuid,
    player_id: PlayerId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::PlayerNotFound(_) | TournamentError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        TournamentError::SelfMatch(_) | TournamentError::UnknownPlayer(_) => {
            HttpResponse::BadRequest().json(body)
        }
        TournamentError::MatchesOutstanding => HttpResponse::Conflict().json(body),
        TournamentError::DataIntegrity { .. }
        | TournamentError::MalformedMatch(_)
        | TournamentError::Store(_) => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

fn open_store(config: &Config, id: Uuid, options: PairingOptions) -> Result<Store, StoreError> {
    match &config.data_dir {
        Some(root) => {
            let dir = root.join(id.to_string());
            let store = CsvStore::open(&dir)?;
            let json = serde_json::to_vec_pretty(&options)
                .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
            std::fs::write(dir.join(OPTIONS_FILE), json)?;
            Ok(Box::new(store))
        }
        None => Ok(Box::new(MemoryStore::new())),
    }
}

/// Pairing options saved next to a tournament's CSV files. Only a missing file means defaults.
fn read_options(dir: &std::path::Path) -> std::io::Result<PairingOptions> {
    match std::fs::read(dir.join(OPTIONS_FILE)) {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(std::io::Error::from),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PairingOptions::default()),
        Err(e) => Err(e),
    }
}

/// Reopen every tournament directory under DATA_DIR.
fn load_tournaments(root: &std::path::Path) -> std::io::Result<HashMap<Uuid, Tournament<Store>>> {
    let mut tournaments = HashMap::new();
    if !root.exists() {
        return Ok(tournaments);
    }
    for entry in std::fs::read_dir(root)? {
        let path = entry?.path();
        let Some(id) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| Uuid::parse_str(n).ok())
        else {
            continue;
        };
        let options = match read_options(&path) {
            Ok(options) => options,
            Err(e) => {
                log::warn!("Skipping tournament {}: unreadable {}: {}", id, OPTIONS_FILE, e);
                continue;
            }
        };
        match CsvStore::open(&path) {
            Ok(store) => {
                let store: Store = Box::new(store);
                tournaments.insert(id, Tournament::new(store, options));
            }
            Err(e) => log::warn!("Skipping tournament {}: {}", id, e),
        }
    }
    Ok(tournaments)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-tournament",
    })
}

/// Create a new tournament (returns its id; clients use it for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    config: Data<Config>,
    body: Option<Json<CreateTournamentBody>>,
) -> HttpResponse {
    let defaults = PairingOptions::default();
    let options = PairingOptions {
        avoid_rematches: body
            .as_ref()
            .and_then(|b| b.avoid_rematches)
            .unwrap_or(defaults.avoid_rematches),
        fair_byes: body
            .as_ref()
            .and_then(|b| b.fair_byes)
            .unwrap_or(defaults.fair_byes),
    };
    let id = Uuid::new_v4();
    let store = match open_store(&config, id, options) {
        Ok(store) => store,
        Err(e) => return error_response(&TournamentError::Store(e)),
    };
    let Ok(mut g) = state.write() else {
        return lock_error();
    };
    g.insert(id, Tournament::new(store, options));
    log::info!("Created tournament {}", id);
    HttpResponse::Ok().json(TournamentCreated { id, options })
}

/// Registered players and their count.
#[get("/api/tournaments/{id}/players")]
async fn api_players(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let Ok(g) = state.read() else {
        return lock_error();
    };
    let Some(t) = g.get(&path.id) else {
        return no_tournament();
    };
    respond(t.players().map(|players| PlayersResponse {
        count: players.len(),
        players,
    }))
}

#[post("/api/tournaments/{id}/players")]
async fn api_register_player(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RegisterPlayerBody>,
) -> HttpResponse {
    let Ok(mut g) = state.write() else {
        return lock_error();
    };
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    respond(t.register_player(&body.name).and_then(|id| t.player(id)))
}

#[get("/api/tournaments/{id}/players/{player_id}/matches")]
async fn api_player_matches(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    let Ok(g) = state.read() else {
        return lock_error();
    };
    let Some(t) = g.get(&path.id) else {
        return no_tournament();
    };
    respond(t.player(path.player_id).and_then(|p| t.matches_for(p.id)))
}

#[post("/api/tournaments/{id}/matches")]
async fn api_report_match(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<ReportMatchBody>,
) -> HttpResponse {
    let Ok(mut g) = state.write() else {
        return lock_error();
    };
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    respond(t.report_match(body.winner, body.loser))
}

#[post("/api/tournaments/{id}/byes")]
async fn api_report_bye(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<ReportByeBody>,
) -> HttpResponse {
    let Ok(mut g) = state.write() else {
        return lock_error();
    };
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    respond(t.report_bye(body.player))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let Ok(g) = state.read() else {
        return lock_error();
    };
    let Some(t) = g.get(&path.id) else {
        return no_tournament();
    };
    respond(t.standings())
}

/// Next round. Computed under the read lock, so no report can land mid-computation.
#[get("/api/tournaments/{id}/pairings")]
async fn api_pairings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let Ok(g) = state.read() else {
        return lock_error();
    };
    let Some(t) = g.get(&path.id) else {
        return no_tournament();
    };
    respond(t.pairings())
}

/// Delete all matches, byes and players of a tournament.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let Ok(mut g) = state.write() else {
        return lock_error();
    };
    let Some(t) = g.get_mut(&path.id) else {
        return no_tournament();
    };
    match t.reset() {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let tournaments = match &config.data_dir {
        Some(root) => {
            let loaded = load_tournaments(root)?;
            log::info!("Loaded {} tournament(s) from {}", loaded.len(), root.display());
            loaded
        }
        None => HashMap::new(),
    };
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(tournaments));
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_players)
            .service(api_register_player)
            .service(api_player_matches)
            .service(api_report_match)
            .service(api_report_bye)
            .service(api_standings)
            .service(api_pairings)
            .service(api_reset)
    })
    .bind(bind)?
    .run()
    .await
}
