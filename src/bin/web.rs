//! Single binary web server: REST pass-through over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use arena_tournament_web::{
    create_tournament, next_pending_match, ExecuteOutcome, Fighter, FighterStats, LocalResolver,
    MatchController, Tournament, TournamentId, TournamentStatus,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data, automation flags, and last
/// activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    /// True while a background automation loop is running for this entry.
    automating: Arc<AtomicBool>,
    /// Raised by the cancel endpoint; the loop checks it between matches.
    cancel: Arc<AtomicBool>,
    last_activity: Instant,
}

impl TournamentEntry {
    fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            automating: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(AtomicBool::new(false)),
            last_activity: Instant::now(),
        }
    }
}

/// In-memory state: many tournaments by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Delay between automated matches.
const AUTOMATION_DELAY: Duration = Duration::from_secs(1);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct NewFighter {
    name: String,
    stats: FighterStats,
    #[serde(default)]
    unique_abilities: Vec<String>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    fighters: Vec<NewFighter>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "arena-tournament-web",
    })
}

/// Create a tournament from a finished fighter roster (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let fighters: Vec<Fighter> = body
        .fighters
        .into_iter()
        .map(|nf| {
            let mut f = Fighter::new(nf.name, nf.stats);
            f.unique_abilities = nf.unique_abilities;
            f
        })
        .collect();
    let tournament = match create_tournament(body.name, fighters) {
        Ok(t) => t,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    };
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(id, TournamentEntry::new(tournament));
    HttpResponse::Ok().json(&g.get(&id).unwrap().tournament)
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

/// The next executable match, if any (null once the tournament is finished).
#[get("/api/tournaments/{id}/next-match")]
async fn api_next_match(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(next_pending_match(&entry.tournament))
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

/// Execute the next pending match. The two `success: false` signal strings
/// mean the tournament is done, not that something failed.
#[post("/api/tournaments/{id}/execute-next")]
async fn api_execute_next(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    entry.last_activity = Instant::now();
    if entry.automating.load(Ordering::SeqCst) {
        return HttpResponse::Conflict()
            .json(serde_json::json!({ "error": "Automation is running for this tournament" }));
    }
    let mut controller = MatchController::new(LocalResolver::default());
    match controller.execute_next(&mut entry.tournament) {
        Ok(ExecuteOutcome::Executed(m)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "tournament": &entry.tournament,
            "match": m,
        })),
        Ok(ExecuteOutcome::NoPendingMatches) => HttpResponse::Ok().json(serde_json::json!({
            "success": false,
            "error": "No pending matches found",
        })),
        Ok(ExecuteOutcome::AlreadyCompleted) => HttpResponse::Ok().json(serde_json::json!({
            "success": false,
            "error": "Tournament is already completed",
        })),
        Err(e) => HttpResponse::InternalServerError()
            .json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}

/// Start unattended execution of all remaining matches, one per second.
/// One loop per tournament; a second request while running is rejected.
#[post("/api/tournaments/{id}/automate")]
async fn api_automate(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    let (automating, cancel) = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        let entry = match g.get_mut(&id) {
            Some(e) => e,
            None => {
                return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
            }
        };
        entry.last_activity = Instant::now();
        if entry.automating.swap(true, Ordering::SeqCst) {
            return HttpResponse::Conflict()
                .json(serde_json::json!({ "error": "Automation already running" }));
        }
        entry.cancel.store(false, Ordering::SeqCst);
        (Arc::clone(&entry.automating), Arc::clone(&entry.cancel))
    };

    let loop_state = state.clone();
    actix_web::rt::spawn(async move {
        let mut controller = MatchController::new(LocalResolver::default());
        loop {
            if cancel.load(Ordering::SeqCst) {
                log::info!("Automation cancelled for tournament {}", id);
                break;
            }
            // Hold the lock only for one match, never across the delay.
            let step = {
                let mut g = match loop_state.write() {
                    Ok(guard) => guard,
                    Err(_) => break,
                };
                let entry = match g.get_mut(&id) {
                    Some(e) => e,
                    None => break,
                };
                entry.last_activity = Instant::now();
                let outcome = controller.execute_next(&mut entry.tournament);
                (outcome, entry.tournament.status)
            };
            match step {
                (Ok(ExecuteOutcome::Executed(_)), status) => {
                    if status == TournamentStatus::Completed {
                        log::info!("Tournament {} completed by automation", id);
                        break;
                    }
                    tokio::time::sleep(AUTOMATION_DELAY).await;
                }
                (Ok(_), _) => break,
                (Err(e), _) => {
                    log::error!("Automation halted for tournament {}: {}", id, e);
                    break;
                }
            }
        }
        automating.store(false, Ordering::SeqCst);
    });

    HttpResponse::Ok().json(serde_json::json!({ "automating": true }))
}

/// Request cancellation of a running automation loop. The match currently in
/// flight still finishes; no further match starts.
#[post("/api/tournaments/{id}/cancel")]
async fn api_cancel(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    entry.last_activity = Instant::now();
    let was_automating = entry.automating.load(Ordering::SeqCst);
    if was_automating {
        entry.cancel.store(true, Ordering::SeqCst);
    }
    HttpResponse::Ok().json(serde_json::json!({ "cancelled": was_automating }))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
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
            g.retain(|_, entry| {
                entry.automating.load(Ordering::SeqCst)
                    || entry.last_activity.elapsed() < INACTIVITY_TIMEOUT
            });
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_next_match)
            .service(api_execute_next)
            .service(api_automate)
            .service(api_cancel)
    })
    .bind(bind)?
    .run()
    .await
}
