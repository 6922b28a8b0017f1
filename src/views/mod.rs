// Page rendering: templates from disk with `{{name}}` placeholders.
use std::path::PathBuf;
use crate::errors::{AppError, AppResult};
use crate::models::{AlumniList, Comment, FlashQuery, ProfileInfo, UserSession};

#[derive(Debug, Clone)]
pub struct Views {
    templates_dir: PathBuf,
    refresh_ms: u64,
}

/// Chrome shared by every full page.
pub struct Page<'a> {
    pub title: &'a str,
    pub user: Option<&'a UserSession>,
    pub flash: &'a FlashQuery,
}

impl Views {
    pub fn new(templates_dir: PathBuf, refresh_ms: u64) -> Self {
        Self { templates_dir, refresh_ms }
    }

    pub async fn template(&self, name: &str) -> AppResult<String> {
        let path = self.templates_dir.join(name);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            tracing::error!("Failed to read template {}: {}", path.display(), e);
            AppError::Template(format!("{}: {}", name, e))
        })
    }

    /// Wraps rendered page content in the layout.
    pub async fn render(&self, page: Page<'_>, content: &str) -> AppResult<String> {
        let layout = self.template("layout.html").await?;
        let nav_user = page.user.map_or(String::new(), |user| {
            format!(
                r#"<li class="nav-item"><span class="navbar-text ms-3">{}</span></li>"#,
                html_escape(&user.username)
            )
        });

        // content goes in last so nothing inside it is treated as a placeholder
        Ok(layout
            .replace("{{title}}", &html_escape(page.title))
            .replace("{{nav_user}}", &nav_user)
            .replace("{{flash}}", &flash_html(page.flash))
            .replace("{{refresh_ms}}", &self.refresh_ms.to_string())
            .replace("{{content}}", content))
    }
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn flash_html(flash: &FlashQuery) -> String {
    let mut html = String::new();
    if let Some(error) = flash.error.as_deref().filter(|m| !m.is_empty()) {
        html.push_str(&format!(r#"<div class="flash-error">{}</div>"#, html_escape(error)));
    }
    if let Some(notice) = flash.notice.as_deref().filter(|m| !m.is_empty()) {
        html.push_str(&format!(r#"<div class="flash-notice">{}</div>"#, html_escape(notice)));
    }
    html
}

pub fn alumni_list_html(alumni: &AlumniList) -> String {
    if alumni.is_empty() {
        return "<p>No alumni yet.</p>".to_string();
    }
    let items = alumni
        .names()
        .iter()
        .map(|name| format!("<li>{}</li>", html_escape(name)))
        .collect::<Vec<_>>()
        .join("");
    format!("<ul>{}</ul>", items)
}

pub fn comments_html(comments: &[Comment]) -> String {
    let items = comments
        .iter()
        .map(|c| {
            if c.timestamp.is_empty() {
                format!("<li><strong>{}</strong>: {}</li>", html_escape(&c.username), html_escape(&c.text))
            } else {
                format!(
                    "<li><strong>{}</strong> <small>({})</small>: {}</li>",
                    html_escape(&c.username),
                    html_escape(&c.timestamp),
                    html_escape(&c.text)
                )
            }
        })
        .collect::<Vec<_>>()
        .join("");
    format!("<ul>{}</ul>", items)
}

pub fn photo_card_html(photo: &str, comments: &[Comment]) -> String {
    let name = html_escape(photo);
    let encoded = urlencoding::encode(photo);
    format!(
        r#"<div class="photo-card" id="{name}">
            <img src="/static/photos/{encoded}" alt="{name}">
            <div data-refresh="/gallery/comments/{encoded}">{comments}</div>
            <form method="post" action="/gallery/comment">
                <input type="hidden" name="photo" value="{name}">
                <input class="form-control" type="text" name="text" placeholder="Add a comment...">
                <button class="btn btn-primary" style="margin-top: 5px;" type="submit">Submit</button>
            </form>
        </div>"#,
        name = name,
        encoded = encoded,
        comments = comments_html(comments),
    )
}

/// Profile entries newest first, or the prompt for an empty profile.
pub fn profile_display_html(profile: Option<&ProfileInfo>) -> String {
    let entries = profile.map(ProfileInfo::newest_first).unwrap_or_default();
    if entries.is_empty() {
        return "<p>No info yet. Add your info below!</p>".to_string();
    }
    entries
        .into_iter()
        .map(|entry| format!("<p>{}</p>", html_escape(entry)))
        .collect::<Vec<_>>()
        .join("")
}
