use axum::response::Html;
use chrono::{DateTime, NaiveDateTime};

use crate::football_fetch::{CompetitionGroup, LeagueTable};
use crate::leagues;
use crate::news_fetch::Article;
use crate::store::User;

const DISPLAY_FORMAT: &str = "%a, %b %d %H:%M";

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Kickoff and publish timestamps arrive in two shapes, with and without an
/// explicit offset. Anything else is shown as-is rather than dropped.
pub fn format_timestamp(value: &str) -> String {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%SZ") {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z") {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    value.to_string()
}

fn layout(title: &str, user: Option<&User>, body: &str) -> Html<String> {
    let nav = match user {
        Some(user) => format!(
            "<a href=\"/\">Matches</a> <a href=\"/standings\">Standings</a> \
             <a href=\"/news\">News</a> <span class=\"who\">{}</span> \
             <a href=\"/logout\">Log out</a>",
            escape_html(&user.username)
        ),
        None => "<a href=\"/login\">Log in</a> <a href=\"/register\">Register</a>".to_string(),
    };
    Html(format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} · Matchday</title>\n\
         <style>\n\
         body{{font-family:sans-serif;margin:0;color:#222}}\n\
         nav{{background:#14532d;padding:.7rem 1rem}}\n\
         nav a{{color:#fff;margin-right:1rem;text-decoration:none}}\n\
         nav .who{{color:#bbf7d0;margin-right:1rem}}\n\
         main{{max-width:60rem;margin:0 auto;padding:1rem}}\n\
         table{{border-collapse:collapse;width:100%}}\n\
         td,th{{padding:.3rem .5rem;border-bottom:1px solid #ddd;text-align:left}}\n\
         .notice{{padding:.6rem 1rem;border-radius:.25rem;margin:.5rem 0}}\n\
         .notice.success{{background:#dcfce7}}\n\
         .notice.error{{background:#fee2e2}}\n\
         .empty{{color:#666}}\n\
         h2 small{{color:#666;font-weight:normal}}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <nav>{nav}</nav>\n\
         <main>\n{body}</main>\n\
         </body>\n\
         </html>\n",
        title = escape_html(title),
    ))
}

fn notice(class: &str, message: &str) -> String {
    format!(
        "<p class=\"notice {class}\">{}</p>\n",
        escape_html(message)
    )
}

pub fn index_page(user: &User, groups: &[CompetitionGroup]) -> Html<String> {
    let mut body = String::from("<h1>Upcoming matches</h1>\n");
    if groups.is_empty() {
        body.push_str("<p class=\"empty\">No upcoming matches right now.</p>\n");
    }
    for group in groups {
        let heading = match leagues::get(&group.code) {
            Some(league) => format!(
                "{} <small>{}</small>",
                escape_html(league.name),
                escape_html(league.country)
            ),
            None => escape_html(&group.competition.name),
        };
        body.push_str(&format!("<section>\n<h2>{heading}</h2>\n<table>\n"));
        for m in &group.matches {
            let score = match (m.score.full_time.home, m.score.full_time.away) {
                (Some(home), Some(away)) => format!("{home} - {away}"),
                _ => "vs".to_string(),
            };
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&format_timestamp(&m.utc_date)),
                escape_html(m.home_team.display_name()),
                escape_html(&score),
                escape_html(m.away_team.display_name()),
                escape_html(&m.status),
            ));
        }
        body.push_str("</table>\n</section>\n");
    }
    layout("Matches", Some(user), &body)
}

pub fn standings_page(user: &User, selected: &str, tables: &[LeagueTable]) -> Html<String> {
    let mut body = String::from("<h1>Standings</h1>\n");
    body.push_str("<form method=\"get\" action=\"/standings\">\n<select name=\"league\">\n");
    for (code, league) in leagues::all() {
        let marker = if *code == selected { " selected" } else { "" };
        body.push_str(&format!(
            "<option value=\"{code}\"{marker}>{} ({})</option>\n",
            escape_html(league.name),
            escape_html(league.country),
        ));
    }
    body.push_str("</select>\n<button type=\"submit\">View</button>\n</form>\n");

    if tables.is_empty() {
        body.push_str("<p class=\"empty\">Standings are unavailable right now.</p>\n");
    }
    for table in tables {
        let heading = table
            .competition
            .as_ref()
            .map(|competition| competition.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| {
                leagues::get(selected)
                    .map(|league| league.name.to_string())
                    .unwrap_or_else(|| selected.to_string())
            });
        body.push_str(&format!("<h2>{}</h2>\n", escape_html(&heading)));
        body.push_str(
            "<table>\n<tr><th>#</th><th>Team</th><th>P</th><th>W</th><th>D</th>\
             <th>L</th><th>GD</th><th>Pts</th></tr>\n",
        );
        for row in &table.standing.table {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                 <td>{}</td><td>{}</td><td>{}</td></tr>\n",
                row.position,
                escape_html(&row.team.name),
                row.played_games,
                row.won,
                row.draw,
                row.lost,
                row.goal_difference,
                row.points,
            ));
        }
        body.push_str("</table>\n");
    }
    layout("Standings", Some(user), &body)
}

pub fn news_page(user: &User, articles: &[Article]) -> Html<String> {
    let mut body = String::from("<h1>Football news</h1>\n");
    if articles.is_empty() {
        body.push_str("<p class=\"empty\">No news articles right now.</p>\n");
    }
    for article in articles {
        body.push_str("<article>\n");
        body.push_str(&format!(
            "<h3><a href=\"{}\">{}</a></h3>\n",
            escape_html(&article.url),
            escape_html(&article.title),
        ));
        body.push_str(&format!(
            "<p class=\"empty\">{} · {}</p>\n",
            escape_html(&article.source.name),
            escape_html(&format_timestamp(&article.published_at)),
        ));
        if let Some(description) = article.description.as_deref() {
            body.push_str(&format!("<p>{}</p>\n", escape_html(description)));
        }
        body.push_str("</article>\n");
    }
    layout("News", Some(user), &body)
}

pub fn register_page(error: Option<&str>) -> Html<String> {
    let mut body = String::from("<h1>Register</h1>\n");
    if let Some(message) = error {
        body.push_str(&notice("error", message));
    }
    body.push_str(
        "<form method=\"post\" action=\"/register\">\n\
         <p><label>Username <input name=\"username\" maxlength=\"20\" required></label></p>\n\
         <p><label>Email <input name=\"email\" type=\"email\" maxlength=\"120\" required></label></p>\n\
         <p><label>Password <input name=\"password\" type=\"password\" required></label></p>\n\
         <p><button type=\"submit\">Create account</button></p>\n\
         </form>\n\
         <p><a href=\"/login\">Already have an account? Log in</a></p>\n",
    );
    layout("Register", None, &body)
}

pub fn login_page(next: Option<&str>, error: Option<&str>, registered: bool) -> Html<String> {
    let mut body = String::from("<h1>Log in</h1>\n");
    if registered {
        body.push_str(&notice(
            "success",
            "Your account has been created! You can now log in",
        ));
    }
    if let Some(message) = error {
        body.push_str(&notice("error", message));
    }
    let action = match next {
        Some(next) => format!("/login?next={}", encode_query_value(next)),
        None => "/login".to_string(),
    };
    body.push_str(&format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <p><label>Username <input name=\"username\" maxlength=\"20\" required></label></p>\n\
         <p><label>Password <input name=\"password\" type=\"password\" required></label></p>\n\
         <p><button type=\"submit\">Log in</button></p>\n\
         </form>\n\
         <p><a href=\"/register\">Need an account? Register</a></p>\n",
    ));
    layout("Log in", None, &body)
}
