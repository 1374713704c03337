//! Server-rendered HTML pages.
//!
//! Markup is deliberately plain: every interpolated value goes through
//! [`escape_html`]. The entry form on `/home` uploads its attachment to
//! `/api/uploads` and then posts the submission JSON to `/api/data`.

use std::fmt::Write as _;

use actix_web::{HttpResponse, get, http::header, web};
use tracing::warn;

use crate::domain::{
    AttachmentLink, CUSTOM_LOCATION_SENTINEL, DayCard, LocationChoice, SECONDARY_LABEL_PLACEHOLDER,
};
use crate::inbound::http::data::FETCH_FAILED;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Escape text for HTML element content and double-quoted attributes.
///
/// # Examples
/// ```
/// use daybook::inbound::http::pages::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
/// ```
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(title: &str, signed_in_as: Option<&str>, body: &str) -> HttpResponse {
    let nav = match signed_in_as {
        Some(name) => format!(
            "<nav><a href=\"/home\">New day</a> <a href=\"/days\">Days</a> \
             <a href=\"/account\">{}</a></nav>",
            escape_html(name)
        ),
        None => "<nav><a href=\"/login\">Sign in</a></nav>".to_owned(),
    };
    let page = format!(
        "<!DOCTYPE html><html lang=\"en-GB\"><head><meta charset=\"utf-8\">\
         <title>{title} · Daybook</title></head><body>{nav}<main>{body}</main></body></html>",
        title = escape_html(title),
    );
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(page)
}

/// Render one day card.
pub fn render_card(card: &DayCard) -> String {
    let mut html = format!(
        "<article class=\"day\"><h2>{}</h2><p class=\"location\">{}</p><ul>",
        escape_html(&card.date_label),
        escape_html(&card.location),
    );
    for block in &card.blocks {
        let value = block
            .value
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(|value| format!(": {}", escape_html(value)))
            .unwrap_or_default();
        let _ = write!(
            html,
            "<li><strong>{}</strong>{value} <time>{}</time>–<time>{}</time></li>",
            escape_html(&block.label),
            escape_html(&block.start_time),
            escape_html(&block.end_time),
        );
    }
    html.push_str("</ul>");
    match card.attachment.as_ref() {
        Some(AttachmentLink {
            href: Some(href),
            text,
        }) => {
            let _ = write!(
                html,
                "<p><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></p>",
                escape_html(href),
                escape_html(text),
            );
        }
        Some(AttachmentLink { href: None, text }) => {
            let _ = write!(html, "<p class=\"attachment\">{}</p>", escape_html(text));
        }
        None => {}
    }
    html.push_str("</article>");
    html
}

fn location_options() -> String {
    let mut options = String::new();
    for choice in LocationChoice::FIXED.iter() {
        let _ = write!(
            options,
            "<option value=\"{}\">{}</option>",
            escape_html(choice.key()),
            escape_html(choice.label()),
        );
    }
    let _ = write!(
        options,
        "<option value=\"{CUSTOM_LOCATION_SENTINEL}\">Custom location</option>"
    );
    options
}

/// Landing page.
#[get("/")]
pub async fn landing(session: SessionContext) -> HttpResponse {
    let claims = session.claims();
    layout(
        "Welcome",
        claims.as_ref().map(|c| c.name.as_str()),
        "<h1>Daybook</h1><p>Record what each day was spent on.</p>\
         <p><a href=\"/home\">Record a day</a></p>",
    )
}

/// Sign-in and registration forms.
#[get("/login")]
pub async fn login_page() -> HttpResponse {
    layout("Sign in", None, LOGIN_BODY)
}

/// Entry form.
#[get("/home")]
pub async fn home(session: SessionContext) -> HttpResponse {
    let claims = session.claims();
    let body = HOME_BODY
        .replace("{{LOCATION_OPTIONS}}", &location_options())
        .replace("{{PLACEHOLDER}}", SECONDARY_LABEL_PLACEHOLDER)
        .replace("{{CUSTOM}}", CUSTOM_LOCATION_SENTINEL);
    layout("New day", claims.as_ref().map(|c| c.name.as_str()), &body)
}

/// List of recorded days. Load failures render a banner instead of failing
/// the page.
#[get("/days")]
pub async fn days(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    let claims = session.claims();
    let body = match state.submissions.list().await {
        Ok(submissions) if submissions.is_empty() => {
            "<h1>Days</h1><p>No days recorded yet.</p>".to_owned()
        }
        Ok(submissions) => {
            let mut body = "<h1>Days</h1>".to_owned();
            for submission in &submissions {
                body.push_str(&render_card(&DayCard::from_submission(submission)));
            }
            body
        }
        Err(err) => {
            warn!(error = %err, "failed to load days");
            format!(
                "<h1>Days</h1><div class=\"banner error\" role=\"alert\">{}</div>",
                escape_html(FETCH_FAILED)
            )
        }
    };
    layout("Days", claims.as_ref().map(|c| c.name.as_str()), &body)
}

/// Signed-in account details.
#[get("/account")]
pub async fn account(session: SessionContext) -> HttpResponse {
    let claims = session.claims();
    let body = match &claims {
        Some(claims) => format!(
            "<h1>Account</h1><dl><dt>Name</dt><dd>{}</dd><dt>Email</dt><dd>{}</dd></dl>\
             <form method=\"post\" action=\"/api/auth/logout\" id=\"logout\">\
             <button type=\"submit\">Sign out</button></form>{LOGOUT_SCRIPT}",
            escape_html(&claims.name),
            escape_html(&claims.email),
        ),
        None => "<h1>Account</h1><p>Not signed in.</p>".to_owned(),
    };
    layout("Account", claims.as_ref().map(|c| c.name.as_str()), &body)
}

/// Mount the page routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(landing)
        .service(login_page)
        .service(home)
        .service(days)
        .service(account);
}

const LOGOUT_SCRIPT: &str = r#"<script>
document.getElementById('logout').addEventListener('submit', async (event) => {
  event.preventDefault();
  await fetch('/api/auth/logout', { method: 'POST' });
  window.location.assign('/login');
});
</script>"#;

const LOGIN_BODY: &str = r#"<h1>Sign in</h1>
<div id="banner" role="alert"></div>
<form id="login">
  <label>Email <input name="email" type="email" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">Sign in</button>
</form>
<p><a href="/api/auth/signin/oauth">Sign in with your identity provider</a></p>
<h2>Register</h2>
<form id="register">
  <label>Name <input name="name" required></label>
  <label>Email <input name="email" type="email" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">Create account</button>
</form>
<script>
const banner = document.getElementById('banner');
const target = new URLSearchParams(window.location.search).get('callbackUrl') || '/home';
const safeTarget = target.startsWith('/') && !target.startsWith('//') ? target : '/home';
async function post(url, form) {
  const body = Object.fromEntries(new FormData(form).entries());
  const res = await fetch(url, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  const payload = await res.json().catch(() => ({}));
  return { ok: res.ok, payload };
}
document.getElementById('login').addEventListener('submit', async (event) => {
  event.preventDefault();
  const { ok, payload } = await post('/api/auth/login', event.target);
  if (ok) { window.location.assign(safeTarget); } else { banner.textContent = payload.message || 'Sign in failed'; }
});
document.getElementById('register').addEventListener('submit', async (event) => {
  event.preventDefault();
  const { ok, payload } = await post('/api/auth/register', event.target);
  banner.textContent = ok ? 'Account created; sign in above.' : (payload.message || 'Registration failed');
});
</script>"#;

const HOME_BODY: &str = r#"<h1>Record a day</h1>
<div id="banner" role="alert"></div>
<form id="entry">
  <label>Label <input name="label_one" required></label>
  <label>Location <select name="location" id="location">{{LOCATION_OPTIONS}}</select></label>
  <label id="custom-wrap" hidden>Custom location <input name="custom_location" id="custom_location"></label>
  <label>Start <input name="start_time" type="time" required></label>
  <label>End <input name="end_time" type="time" required></label>
  <fieldset id="secondary"><legend>Additional entries</legend></fieldset>
  <button type="button" id="add-entry">Add entry</button>
  <label>File <input name="file" type="file" id="file"></label>
  <button type="submit">Save</button>
</form>
<template id="entry-template">
  <div class="secondary-entry">
    <input data-field="label" value="{{PLACEHOLDER}}">
    <input data-field="value" placeholder="Details">
    <input data-field="start_time" type="time" required>
    <input data-field="end_time" type="time" required>
  </div>
</template>
<script>
const form = document.getElementById('entry');
const banner = document.getElementById('banner');
const locationSelect = document.getElementById('location');
locationSelect.addEventListener('change', () => {
  document.getElementById('custom-wrap').hidden = locationSelect.value !== '{{CUSTOM}}';
});
document.getElementById('add-entry').addEventListener('click', () => {
  const block = document.getElementById('entry-template').content.cloneNode(true);
  document.getElementById('secondary').appendChild(block);
});
form.addEventListener('submit', async (event) => {
  event.preventDefault();
  banner.textContent = '';
  const data = new FormData(form);
  let fileName = null;
  let fileUrl = null;
  const file = document.getElementById('file').files[0];
  if (file) {
    const res = await fetch('/api/uploads?fileName=' + encodeURIComponent(file.name), { method: 'POST', body: file });
    const payload = await res.json().catch(() => ({}));
    if (!res.ok) { banner.textContent = payload.message || 'Upload failed'; return; }
    fileName = payload.fileName;
    fileUrl = payload.fileUrl;
  }
  const dynamicFields = Array.from(document.querySelectorAll('.secondary-entry')).map((row) => {
    const entry = {};
    row.querySelectorAll('input').forEach((input) => { entry[input.dataset.field] = input.value; });
    return entry;
  });
  const body = {
    label_one: data.get('label_one'),
    location: data.get('location'),
    custom_location: data.get('custom_location'),
    start_time: data.get('start_time'),
    end_time: data.get('end_time'),
    file_name: fileName,
    file_url: fileUrl,
    dynamic_fields: dynamicFields,
    created_at: new Date().toISOString(),
  };
  const res = await fetch('/api/data', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  const payload = await res.json().catch(() => ({}));
  if (res.ok) { window.location.assign('/days'); } else { banner.textContent = [payload.message, payload.error].filter(Boolean).join(': '); }
});
</script>"#;
