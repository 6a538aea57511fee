//! JSON admin server for the field tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Tournament documents live under TOURNAMENT_DIR (default `tournaments`).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use field_tournament_web::logic::{group_standings, reset_bracket_result};
use field_tournament_web::models::{MatchId, RankingRow, TeamId, GROUP_COUNT};
use field_tournament_web::{
    assign_all_match_numbers, clear_group_result, final_standings, generate_double_elim,
    generate_follower_cup, generate_follower_quali, generate_ghost_teams, generate_group_matches,
    generate_placement_round, generate_super_finals, record_bracket_result,
    record_follower_cup_result, record_follower_quali_result, record_group_result,
    record_placement_result, record_super_finals_result, schedule_all, Score, SuperFinalsRole,
    Tournament, TournamentConfig, TournamentError, TournamentId, TournamentStore,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Cached tournament + last activity time (for cache eviction).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// Tournaments recently touched, by id. The store holds every document;
/// entries here are dropped after inactivity and reloaded on demand.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;
type Store = Data<TournamentStore>;

/// Cached tournaments not accessed for this long are evicted.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    config: Option<TournamentConfig>,
}

#[derive(Deserialize)]
struct TeamBody {
    name: String,
    group: u8,
}

#[derive(Serialize)]
struct GroupStandings<'a> {
    group: u8,
    rows: Vec<&'a RankingRow>,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TeamPath {
    id: TournamentId,
    team_id: TeamId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct RolePath {
    id: TournamentId,
    role: SuperFinalsRole,
}

fn error_body(msg: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": msg.to_string() })
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(error_body("No tournament"))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(error_body("lock error"))
}

/// 404 for missing teams/matches, 409 for phases generated twice, 400 otherwise.
fn error_response(e: &TournamentError) -> HttpResponse {
    match e {
        TournamentError::NotFound(_) => HttpResponse::NotFound().json(error_body(e)),
        TournamentError::AlreadyGenerated(_) => HttpResponse::Conflict().json(error_body(e)),
        _ => HttpResponse::BadRequest().json(error_body(e)),
    }
}

/// Cached entry for `id`, loading it from the store on a miss.
fn cached<'a>(
    cache: &'a mut HashMap<TournamentId, TournamentEntry>,
    store: &TournamentStore,
    id: TournamentId,
) -> Result<&'a mut TournamentEntry, HttpResponse> {
    if !cache.contains_key(&id) {
        let tournament = match store.load(id) {
            Ok(Some(t)) => t,
            Ok(None) => return Err(no_tournament()),
            Err(e) => {
                log::error!("{}", e);
                return Err(HttpResponse::InternalServerError().json(error_body(e)));
            }
        };
        cache.insert(
            id,
            TournamentEntry {
                tournament,
                last_activity: Instant::now(),
            },
        );
    }
    let entry = cache.get_mut(&id).ok_or_else(no_tournament)?;
    entry.last_activity = Instant::now();
    Ok(entry)
}

/// Run one administrative action. The action works on a copy; the copy is
/// written to the store and cached only if the action succeeds.
fn mutate<T>(
    state: &AppState,
    store: &Store,
    id: TournamentId,
    action: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
) -> Result<(Tournament, T), HttpResponse> {
    let mut g = state.write().map_err(|_| lock_error())?;
    let entry = cached(&mut g, store, id)?;
    let mut draft = entry.tournament.clone();
    let out = action(&mut draft).map_err(|e| error_response(&e))?;
    if let Err(e) = store.save(&draft) {
        log::error!("{}", e);
        return Err(HttpResponse::InternalServerError().json(error_body(e)));
    }
    entry.tournament = draft.clone();
    Ok((draft, out))
}

/// Run a read-only query against one tournament.
fn query(
    state: &AppState,
    store: &Store,
    id: TournamentId,
    view: impl FnOnce(&Tournament) -> HttpResponse,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match cached(&mut g, store, id) {
        Ok(entry) => view(&entry.tournament),
        Err(resp) => resp,
    }
}

fn respond<T>(result: Result<(Tournament, T), HttpResponse>) -> HttpResponse {
    match result {
        Ok((t, _)) => HttpResponse::Ok().json(t),
        Err(resp) => resp,
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "field-tournament-web",
    })
}

/// Create a new tournament (returns it with id; client keeps the id for later requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, store: Store, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let config = body.config.unwrap_or_default();
    if let Err(e) = config.validate() {
        return error_response(&e);
    }
    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(error_body("Tournament name must not be empty"));
    }
    let tournament = Tournament::with_config(name, config);
    if let Err(e) = store.save(&tournament) {
        log::error!("{}", e);
        return HttpResponse::InternalServerError().json(error_body(e));
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    log::info!("Created tournament {} ({})", tournament.name, tournament.id);
    let resp = HttpResponse::Ok().json(&tournament);
    g.insert(
        tournament.id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    resp
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    query(&state, &store, path.id, |t| HttpResponse::Ok().json(t))
}

#[put("/api/tournaments/{id}/config")]
async fn api_set_config(
    state: AppState,
    store: Store,
    path: Path<TournamentPath>,
    body: Json<TournamentConfig>,
) -> HttpResponse {
    let config = body.into_inner();
    respond(mutate(&state, &store, path.id, |t| t.set_config(config)))
}

#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(state: AppState, store: Store, path: Path<TournamentPath>, body: Json<TeamBody>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, |t| t.add_team(body.name.as_str(), body.group)))
}

#[put("/api/tournaments/{id}/teams/{team_id}")]
async fn api_edit_team(state: AppState, store: Store, path: Path<TeamPath>, body: Json<TeamBody>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, |t| {
        t.edit_team(path.team_id, body.name.as_str(), body.group)
    }))
}

#[delete("/api/tournaments/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, store: Store, path: Path<TeamPath>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, |t| t.remove_team(path.team_id)))
}

/// Pad every group to six teams with ghost teams.
#[post("/api/tournaments/{id}/teams/ghosts")]
async fn api_generate_ghosts(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, generate_ghost_teams))
}

#[post("/api/tournaments/{id}/group-stage")]
async fn api_generate_group_stage(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, generate_group_matches))
}

#[put("/api/tournaments/{id}/group-stage/matches/{match_id}")]
async fn api_record_group_result(
    state: AppState,
    store: Store,
    path: Path<MatchPath>,
    body: Json<Score>,
) -> HttpResponse {
    let score = body.into_inner();
    respond(mutate(&state, &store, path.id, |t| record_group_result(t, path.match_id, score)))
}

#[delete("/api/tournaments/{id}/group-stage/matches/{match_id}")]
async fn api_clear_group_result(state: AppState, store: Store, path: Path<MatchPath>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, |t| clear_group_result(t, path.match_id)))
}

/// Standings of all ten groups, best first.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    query(&state, &store, path.id, |t| {
        let groups: Vec<GroupStandings> = (1..=GROUP_COUNT)
            .map(|group| GroupStandings {
                group,
                rows: group_standings(t, group),
            })
            .collect();
        HttpResponse::Ok().json(groups)
    })
}

/// Seed brackets A and B from the group standings.
#[post("/api/tournaments/{id}/brackets")]
async fn api_generate_brackets(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, generate_double_elim))
}

#[put("/api/tournaments/{id}/brackets/matches/{match_id}")]
async fn api_record_bracket_result(
    state: AppState,
    store: Store,
    path: Path<MatchPath>,
    body: Json<Score>,
) -> HttpResponse {
    let score = body.into_inner();
    respond(mutate(&state, &store, path.id, |t| record_bracket_result(t, path.match_id, score)))
}

#[delete("/api/tournaments/{id}/brackets/matches/{match_id}")]
async fn api_reset_bracket_result(state: AppState, store: Store, path: Path<MatchPath>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, |t| reset_bracket_result(t, path.match_id)))
}

#[post("/api/tournaments/{id}/super-finals")]
async fn api_generate_super_finals(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, generate_super_finals))
}

/// Record HF1, HF2, THIRD or FINAL.
#[put("/api/tournaments/{id}/super-finals/{role}")]
async fn api_record_super_finals_result(
    state: AppState,
    store: Store,
    path: Path<RolePath>,
    body: Json<Score>,
) -> HttpResponse {
    let score = body.into_inner();
    respond(mutate(&state, &store, path.id, |t| record_super_finals_result(t, path.role, score)))
}

#[get("/api/tournaments/{id}/final-standings")]
async fn api_final_standings(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    query(&state, &store, path.id, |t| HttpResponse::Ok().json(final_standings(t)))
}

#[post("/api/tournaments/{id}/follower-cup/qualification")]
async fn api_generate_follower_quali(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, generate_follower_quali))
}

#[put("/api/tournaments/{id}/follower-cup/qualification/{match_id}")]
async fn api_record_follower_quali_result(
    state: AppState,
    store: Store,
    path: Path<MatchPath>,
    body: Json<Score>,
) -> HttpResponse {
    let score = body.into_inner();
    respond(mutate(&state, &store, path.id, |t| {
        record_follower_quali_result(t, path.match_id, score)
    }))
}

#[post("/api/tournaments/{id}/follower-cup")]
async fn api_generate_follower_cup(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, generate_follower_cup))
}

#[put("/api/tournaments/{id}/follower-cup/matches/{match_id}")]
async fn api_record_follower_cup_result(
    state: AppState,
    store: Store,
    path: Path<MatchPath>,
    body: Json<Score>,
) -> HttpResponse {
    let score = body.into_inner();
    respond(mutate(&state, &store, path.id, |t| {
        record_follower_cup_result(t, path.match_id, score)
    }))
}

#[post("/api/tournaments/{id}/placement")]
async fn api_generate_placement(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    respond(mutate(&state, &store, path.id, generate_placement_round))
}

#[put("/api/tournaments/{id}/placement/{match_id}")]
async fn api_record_placement_result(
    state: AppState,
    store: Store,
    path: Path<MatchPath>,
    body: Json<Score>,
) -> HttpResponse {
    let score = body.into_inner();
    respond(mutate(&state, &store, path.id, |t| record_placement_result(t, path.match_id, score)))
}

/// Renumber every match from 1; returns the per-phase ranges.
#[post("/api/tournaments/{id}/renumber")]
async fn api_renumber(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    match mutate(&state, &store, path.id, |t| Ok(assign_all_match_numbers(t))) {
        Ok((t, ranges)) => HttpResponse::Ok().json(serde_json::json!({ "tournament": t, "ranges": ranges })),
        Err(resp) => resp,
    }
}

/// Recompute every kickoff time; returns first and last kickoff per phase.
#[post("/api/tournaments/{id}/reschedule")]
async fn api_reschedule(state: AppState, store: Store, path: Path<TournamentPath>) -> HttpResponse {
    match mutate(&state, &store, path.id, schedule_all) {
        Ok((t, times)) => HttpResponse::Ok().json(serde_json::json!({ "tournament": t, "times": times })),
        Err(resp) => resp,
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_dir() -> String {
    "tournaments".to_string()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let dir = std::env::var("TOURNAMENT_DIR").unwrap_or_else(|_| default_dir());
    let store = TournamentStore::open(&dir).map_err(|e| std::io::Error::other(e.to_string()))?;
    let known = store.load_all().map(|all| all.len()).unwrap_or_default();
    log::info!("Store at {} holds {} tournament(s)", dir, known);

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
    let store = Data::new(store);

    // Every 30 minutes, evict cached tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Evicted {} inactive tournament(s) from cache", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(store.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_set_config)
            .service(api_generate_ghosts)
            .service(api_add_team)
            .service(api_edit_team)
            .service(api_remove_team)
            .service(api_generate_group_stage)
            .service(api_record_group_result)
            .service(api_clear_group_result)
            .service(api_standings)
            .service(api_generate_brackets)
            .service(api_record_bracket_result)
            .service(api_reset_bracket_result)
            .service(api_generate_super_finals)
            .service(api_record_super_finals_result)
            .service(api_final_standings)
            .service(api_generate_follower_quali)
            .service(api_record_follower_quali_result)
            .service(api_generate_follower_cup)
            .service(api_record_follower_cup_result)
            .service(api_generate_placement)
            .service(api_record_placement_result)
            .service(api_renumber)
            .service(api_reschedule)
    })
    .bind(bind)?
    .run()
    .await
}
