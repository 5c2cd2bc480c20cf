use axum::extract::{Form, Query, State};
use axum::Router;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use chrono::{Duration as ChronoDuration, Utc};
use serde::Deserialize;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};
use tracing::warn;

use crate::auth::{self, AuthUser};
use crate::state::AppState;
use crate::views;
use crate::{football_fetch, leagues, news_fetch};

const SCHEDULE_WINDOW_DAYS: i64 = 7;

pub fn router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_signed(auth::derive_session_key(&state.config.secret_key));

    Router::new()
        .route("/", get(index))
        .route("/standings", get(standings))
        .route("/news", get(news))
        .route("/register", get(register_form).post(register_submit))
        .route("/login", get(login_form).post(login_submit))
        .route("/logout", get(logout))
        .layer(session_layer)
        .with_state(state)
}

async fn index(AuthUser(user): AuthUser, State(state): State<AppState>) -> Html<String> {
    let today = Utc::now().date_naive();
    let date_to = today + ChronoDuration::days(SCHEDULE_WINDOW_DAYS);
    let groups = match football_fetch::fetch_matches(&state.http, &state.config, today, date_to)
        .await
    {
        Ok(resp) => football_fetch::group_by_competition(resp.matches),
        Err(err) => {
            warn!(transient = err.is_transient(), "fetching matches failed: {err}");
            Vec::new()
        }
    };
    views::index_page(&user, &groups)
}

#[derive(Debug, Deserialize)]
struct StandingsQuery {
    league: Option<String>,
}

async fn standings(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<StandingsQuery>,
) -> Html<String> {
    let code = leagues::normalize(query.league.as_deref());
    let tables = match football_fetch::fetch_standings(&state.http, &state.config, code).await {
        Ok(resp) => football_fetch::total_standings(resp),
        Err(err) => {
            warn!(transient = err.is_transient(), "fetching {code} standings failed: {err}");
            Vec::new()
        }
    };
    views::standings_page(&user, code, &tables)
}

async fn news(AuthUser(user): AuthUser, State(state): State<AppState>) -> Html<String> {
    let articles = match news_fetch::fetch_news(&state.http, &state.config).await {
        Ok(resp) => resp.articles,
        Err(err) => {
            warn!(transient = err.is_transient(), "fetching news failed: {err}");
            Vec::new()
        }
    };
    views::news_page(&user, &articles)
}

#[derive(Debug, Deserialize)]
struct RegisterForm {
    username: String,
    email: String,
    password: String,
}

async fn register_form(session: Session, State(state): State<AppState>) -> Response {
    if auth::current_user(&session, &state).await.is_some() {
        return Redirect::to("/").into_response();
    }
    views::register_page(None).into_response()
}

async fn register_submit(
    session: Session,
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    if auth::current_user(&session, &state).await.is_some() {
        return Redirect::to("/").into_response();
    }
    match auth::register(&state, &form.username, &form.email, &form.password) {
        Ok(_) => Redirect::to("/login?registered=1").into_response(),
        Err(auth::RegisterError::Taken) => {
            views::register_page(Some(auth::TAKEN_MESSAGE)).into_response()
        }
        Err(auth::RegisterError::Invalid(message)) => {
            views::register_page(Some(message)).into_response()
        }
        Err(auth::RegisterError::Internal(err)) => {
            warn!("registration failed: {err:#}");
            views::register_page(Some("Something went wrong, please try again")).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginQuery {
    next: Option<String>,
    registered: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login_form(
    session: Session,
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Response {
    if auth::current_user(&session, &state).await.is_some() {
        return Redirect::to("/").into_response();
    }
    views::login_page(query.next.as_deref(), None, query.registered.is_some()).into_response()
}

async fn login_submit(
    session: Session,
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    Form(form): Form<LoginForm>,
) -> Response {
    if auth::current_user(&session, &state).await.is_some() {
        return Redirect::to("/").into_response();
    }
    match auth::login(&state, &session, &form.username, &form.password).await {
        Ok(_) => {
            let target = query
                .next
                .as_deref()
                .filter(|next| auth::is_local_path(next))
                .unwrap_or("/");
            Redirect::to(target).into_response()
        }
        Err(auth::LoginError::BadCredentials) => {
            views::login_page(query.next.as_deref(), Some(auth::LOGIN_FAILED_MESSAGE), false)
                .into_response()
        }
        Err(auth::LoginError::Internal(err)) => {
            warn!("login failed: {err:#}");
            views::login_page(query.next.as_deref(), Some(auth::LOGIN_FAILED_MESSAGE), false)
                .into_response()
        }
    }
}

async fn logout(session: Session) -> Redirect {
    auth::logout(&session).await;
    Redirect::to("/")
}
