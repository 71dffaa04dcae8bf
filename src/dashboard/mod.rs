use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;

use crate::ledger::models::SessionSnapshot;
use crate::ledger::{LedgerError, Session, StakeQuote, StakeRules};

/// Values pre-filled in the calculator inputs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InputDefaults {
    pub edge: f64,
    pub kelly_fraction: f64,
    pub max_bet_percent: f64,
}

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub defaults: InputDefaults,
}

impl AppState {
    pub fn new(session: Session, defaults: InputDefaults) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            defaults,
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/state", get(state_handler))
        .route("/api/quote", post(quote_handler))
        .route("/api/bets", post(place_bet_handler))
        .route("/api/balance", put(set_balance_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub session: SessionSnapshot,
    pub defaults: InputDefaults,
    pub rules: StakeRules,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub edge: f64,
    pub kelly_fraction: Option<f64>,
    pub max_bet_percent: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaceBetResponse {
    pub quote: StakeQuote,
    #[serde(flatten)]
    pub state: StateResponse,
}

#[derive(Debug, Deserialize)]
pub struct SetBalanceRequest {
    pub balance: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn ledger_error(err: LedgerError) -> ApiError {
    let (status, code) = match err {
        LedgerError::InsufficientFunds { .. } => (StatusCode::CONFLICT, "insufficient_funds"),
        LedgerError::NegativeBalance(_) => (StatusCode::UNPROCESSABLE_ENTITY, "negative_balance"),
    };
    (
        status,
        Json(ErrorBody {
            error: code.to_string(),
            message: err.to_string(),
        }),
    )
}

fn state_response(state: &AppState, session: &Session) -> StateResponse {
    StateResponse {
        session: session.snapshot(),
        defaults: state.defaults,
        rules: *session.rules(),
    }
}

/// Serve the calculator page.
async fn index_handler() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

/// GET /api/state
async fn state_handler(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let session = state.session();
    Json(state_response(&state, &session))
}

impl QuoteRequest {
    /// Fill omitted inputs from the configured defaults.
    fn resolve(&self, defaults: &InputDefaults) -> (f64, f64, f64) {
        (
            self.edge,
            self.kelly_fraction.unwrap_or(defaults.kelly_fraction),
            self.max_bet_percent.unwrap_or(defaults.max_bet_percent),
        )
    }
}

/// POST /api/quote
async fn quote_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuoteRequest>,
) -> Json<StakeQuote> {
    let (edge, kelly_fraction, max_bet_percent) = req.resolve(&state.defaults);
    let session = state.session();
    Json(session.suggest(edge, kelly_fraction, max_bet_percent))
}

/// POST /api/bets
///
/// Takes calculator inputs, not a stake: the stake is re-quoted against
/// the bankroll under the same lock that deducts it.
async fn place_bet_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<PlaceBetResponse>, ApiError> {
    let (edge, kelly_fraction, max_bet_percent) = req.resolve(&state.defaults);
    let mut session = state.session();
    let quote = session
        .place_suggested_bet(edge, kelly_fraction, max_bet_percent)
        .map_err(ledger_error)?;
    Ok(Json(PlaceBetResponse {
        quote,
        state: state_response(&state, &session),
    }))
}

/// PUT /api/balance
async fn set_balance_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetBalanceRequest>,
) -> Result<Json<StateResponse>, ApiError> {
    let mut session = state.session();
    session.set_balance(req.balance).map_err(ledger_error)?;
    Ok(Json(state_response(&state, &session)))
}

/// Embedded single-file calculator page (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Kelly Stake Calculator</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; max-width: 720px; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; display: grid; gap: .8rem; }
  label { color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; display: grid; gap: .3rem; }
  input { background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .45rem .6rem; font-size: 1rem; }
  button { background: var(--accent); color: #fff; border: none; padding: .5rem 1rem; border-radius: 6px; cursor: pointer; font-weight: 600; }
  button.secondary { background: none; border: 1px solid var(--border); color: var(--muted); }
  .value { font-size: 1.7rem; font-weight: 700; }
  .ok { color: var(--green); }
  .err { color: var(--red); min-height: 1.2rem; }
  ul { list-style: none; }
  li { padding: .5rem 0; border-bottom: 1px solid #1e2130; font-size: .88rem; }
  li:last-child { border-bottom: none; }
  .muted { color: var(--muted); font-size: .75rem; }
  .row { display: flex; gap: .6rem; align-items: end; }
</style>
</head>
<body>
<header><h1>Kelly Stake Calculator</h1></header>
<main>
  <div class="panel">
    <label>Edge (%)<input id="edge" type="number" min="0" step="0.1"></label>
    <label>Kelly Fraction <span id="kelly-label"></span><input id="kelly" type="range" min="0" max="100" step="1"></label>
    <label>Max Bet % of Bankroll<input id="maxbet" type="number" min="0" step="0.1"></label>
  </div>

  <div class="panel">
    <div class="muted">Suggested Bet</div>
    <div class="row">
      <div class="value ok" id="stake">–</div>
      <button class="secondary" onclick="copyStake()">Copy</button>
    </div>
    <div class="muted" id="stake-detail"></div>
    <button onclick="placeBet()">I Placed This Bet</button>
    <div class="err" id="bet-error"></div>
  </div>

  <div class="panel">
    <div class="muted">Bankroll</div>
    <div class="value" id="bankroll">–</div>
    <div class="row">
      <label style="flex:1">Set Balance<input id="balance" type="number" step="0.01"></label>
      <button onclick="setBalance()">Update</button>
    </div>
    <div class="err" id="balance-error"></div>
  </div>

  <div class="panel">
    <div class="muted">Log</div>
    <ul id="log"><li class="muted">No changes yet</li></ul>
  </div>
</main>

<script>
let currency = '€';
let currentStake = 0;
const money = v => currency + Number(v).toFixed(2);

async function send(method, url, body) {
  const r = await fetch(url, { method, headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body) });
  const text = await r.text();
  let data;
  try {
    data = JSON.parse(text);
  } catch (_) {
    // axum extractor rejections are plain text
    data = { error: 'bad_request', message: text || r.statusText };
  }
  return { ok: r.ok, data };
}

function inputs() {
  return {
    edge: Number(document.getElementById('edge').value),
    kelly_fraction: Number(document.getElementById('kelly').value),
    max_bet_percent: Number(document.getElementById('maxbet').value),
  };
}

function renderState(s) {
  currency = s.currency;
  document.getElementById('bankroll').textContent = money(s.bankroll);
  const log = document.getElementById('log');
  log.innerHTML = s.log.length
    ? s.log.map(e => `<li>${e.message}<div class="muted">${new Date(e.recorded_at).toLocaleTimeString()}</div></li>`).join('')
    : '<li class="muted">No changes yet</li>';
}

async function refreshQuote() {
  const req = inputs();
  document.getElementById('kelly-label').textContent = req.kelly_fraction;
  const { ok, data } = await send('POST', '/api/quote', req);
  if (!ok) return;
  currentStake = data.stake;
  document.getElementById('stake').textContent = money(data.stake);
  document.getElementById('stake-detail').textContent =
    `Kelly ${money(data.raw_stake)} · cap ${money(data.cap)}` + (data.capped ? ' (capped)' : '');
}

async function placeBet() {
  const { ok, data } = await send('POST', '/api/bets', inputs());
  document.getElementById('bet-error').textContent = ok ? '' : data.message;
  if (ok) { renderState(data); await refreshQuote(); }
}

async function setBalance() {
  const balance = Number(document.getElementById('balance').value);
  const { ok, data } = await send('PUT', '/api/balance', { balance });
  document.getElementById('balance-error').textContent = ok ? '' : data.message;
  if (ok) { renderState(data); await refreshQuote(); }
}

function copyStake() {
  navigator.clipboard.writeText(Number(currentStake).toFixed(2));
}

async function init() {
  const r = await fetch('/api/state');
  if (!r.ok) return;
  const s = await r.json();
  document.getElementById('edge').value = s.defaults.edge;
  const kelly = document.getElementById('kelly');
  if (s.rules.kelly_scale === 'fraction') { kelly.max = 1; kelly.step = 0.01; }
  kelly.value = s.defaults.kelly_fraction;
  document.getElementById('maxbet').value = s.defaults.max_bet_percent;
  document.getElementById('balance').value = s.bankroll;
  renderState(s);
  ['edge', 'kelly', 'maxbet'].forEach(id => document.getElementById(id).addEventListener('input', refreshQuote));
  await refreshQuote();
}

init();
</script>
</body>
</html>"#;
