//! HTML site generation.
//!
//! Final stage of the pipeline. Asks the controller for render directives and
//! writes one HTML file per directive.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): every user, linked to their page
//! - **User pages** (`/user/{slug}.html`): one per request from the request
//!   provider, rendered with the template the controller selects
//!
//! Slugs are lowercased, so `Alice` and `alice` share one. The first of them in
//! request order gets `alice.html`, the next `alice-2.html`, and so on. The
//! index links to whichever path each user ended up with.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! └── user/
//!     ├── jwage.html
//!     ├── ocramius.html
//!     └── ccovey.html
//! ```
//!
//! ## Templates
//!
//! Templates are a fixed set of [maud](https://maud.lambda.xyz/) functions
//! selected by name ([`INDEX_TEMPLATE`], [`USER_TEMPLATE`]). A response naming
//! any other template fails the build. All interpolation is auto-escaped.
//! Links are relative so the output works from `file://` as well as a server.

use crate::config::{self, SiteConfig};
use crate::controller::{Response, USER_TEMPLATE, UserController};
use crate::naming;
use crate::repository::RepositoryError;
use crate::types::RequestCollection;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default template of the index route.
pub const INDEX_TEMPLATE: &str = "index";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
    #[error("Bad render request: {0}")]
    BadRequest(String),
}

/// One page written during generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    /// Display label: "Home" for the index, the username for user pages.
    pub label: String,
    /// Template the page was rendered with.
    pub template: String,
    /// Path relative to the output directory.
    pub path: String,
}

/// Summary of a generation run, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
}

impl GenerateReport {
    pub fn user_pages(&self) -> impl Iterator<Item = &GeneratedPage> {
        self.pages.iter().filter(|p| p.template == USER_TEMPLATE)
    }
}

/// Shared page furniture.
struct Layout<'a> {
    title: &'a str,
    footer: &'a str,
    css: String,
}

impl<'a> Layout<'a> {
    fn new(config: &'a SiteConfig) -> Self {
        Self {
            title: &config.site.title,
            footer: &config.site.footer,
            css: format!(
                "{}\n\n{}",
                config::generate_color_css(&config.colors),
                CSS_STATIC
            ),
        }
    }
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Output path of every user page, keyed by username.
#[derive(Debug, Default)]
struct PagePaths {
    by_username: HashMap<String, String>,
    taken: HashSet<String>,
}

impl PagePaths {
    /// Claim a path for `username`, numbering it past any path already taken.
    ///
    /// Returns `None` when `username` already has a page.
    fn assign(&mut self, username: &str) -> Option<String> {
        if self.by_username.contains_key(username) {
            return None;
        }
        let mut path = naming::user_page_path(username);
        let mut n = 2;
        while self.taken.contains(&path) {
            path = naming::numbered_user_page_path(username, n);
            n += 1;
        }
        if n > 2 {
            tracing::warn!(username, path = %path, "page slug already used, numbering this page");
        }
        self.taken.insert(path.clone());
        self.by_username.insert(username.to_string(), path.clone());
        Some(path)
    }

    fn link(&self, username: &str) -> String {
        self.by_username
            .get(username)
            .cloned()
            .unwrap_or_else(|| naming::user_page_path(username))
    }
}

pub fn generate(
    controller: &UserController<'_>,
    requests: &RequestCollection,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let layout = Layout::new(config);
    let mut report = GenerateReport::default();

    fs::create_dir_all(output_dir.join("user"))?;

    // Paths are settled before the index renders so its links match.
    let mut paths = PagePaths::default();
    let mut user_pages = Vec::with_capacity(requests.len());
    for request in requests {
        let username = request.get_str("username").ok_or_else(|| {
            GenerateError::BadRequest(format!(
                "expected a string 'username' in {}",
                serde_json::to_string(request).unwrap_or_default()
            ))
        })?;
        match paths.assign(username) {
            Some(path) => user_pages.push((username, path)),
            None => tracing::warn!(username, "duplicate request, page already written"),
        }
    }

    let index = controller.index();
    let (template, markup) = render_response(&index, INDEX_TEMPLATE, &layout, &paths)?;
    write_page(output_dir, "index.html", markup)?;
    report.pages.push(GeneratedPage {
        label: "Home".to_string(),
        template,
        path: "index.html".to_string(),
    });

    for (username, path) in user_pages {
        let response = controller.user(username)?;
        let (template, markup) = render_response(&response, USER_TEMPLATE, &layout, &paths)?;
        write_page(output_dir, &path, markup)?;
        tracing::debug!(username, path = %path, "wrote user page");

        report.pages.push(GeneratedPage {
            label: username.to_string(),
            template,
            path,
        });
    }

    tracing::info!(
        pages = report.pages.len(),
        output = %output_dir.display(),
        "site generated"
    );
    Ok(report)
}

fn write_page(output_dir: &Path, rel_path: &str, markup: Markup) -> Result<(), GenerateError> {
    fs::write(output_dir.join(rel_path), markup.into_string())?;
    Ok(())
}

/// Render `response` with its template, or `default` when it names none.
///
/// Returns the template actually used alongside the markup.
fn render_response(
    response: &Response,
    default: &str,
    layout: &Layout<'_>,
    paths: &PagePaths,
) -> Result<(String, Markup), GenerateError> {
    let template = response.template.as_deref().unwrap_or(default);
    let markup = match template {
        INDEX_TEMPLATE => render_index(users_param(response)?, layout, paths),
        USER_TEMPLATE => render_user(username_of(param(response, "user")?)?, layout),
        other => return Err(GenerateError::UnknownTemplate(other.to_string())),
    };
    Ok((template.to_string(), markup))
}

// ============================================================================
// Parameter extraction
// ============================================================================

fn param<'r>(response: &'r Response, name: &str) -> Result<&'r Value, GenerateError> {
    response
        .parameter(name)
        .ok_or_else(|| GenerateError::BadRequest(format!("missing template parameter '{name}'")))
}

fn users_param(response: &Response) -> Result<Vec<&str>, GenerateError> {
    param(response, "users")?
        .as_array()
        .ok_or_else(|| GenerateError::BadRequest("'users' must be an array".into()))?
        .iter()
        .map(username_of)
        .collect()
}

fn username_of(user: &Value) -> Result<&str, GenerateError> {
    user.get("username")
        .and_then(Value::as_str)
        .ok_or_else(|| GenerateError::BadRequest(format!("user without a username: {user}")))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(page_title: &str, layout: &Layout<'_>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                style { (PreEscaped(&layout.css)) }
            }
            body {
                (content)
                @if !layout.footer.is_empty() {
                    footer.site-footer { (layout.footer) }
                }
            }
        }
    }
}

/// Display name, with a placeholder for users hydrated without one.
fn display_name(username: &str) -> Markup {
    html! {
        @if username.is_empty() {
            span.unnamed { "(unnamed)" }
        } @else {
            (username)
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_index(usernames: Vec<&str>, layout: &Layout<'_>, paths: &PagePaths) -> Markup {
    let content = html! {
        header.site-header {
            h1 { (layout.title) }
        }
        main {
            @if usernames.is_empty() {
                p { "No users." }
            } @else {
                ul.user-list {
                    @for username in &usernames {
                        li {
                            a href=(paths.link(username)) { (display_name(username)) }
                        }
                    }
                }
            }
        }
    };
    base_document(layout.title, layout, content)
}

fn render_user(username: &str, layout: &Layout<'_>) -> Markup {
    let page_title = if username.is_empty() {
        layout.title.to_string()
    } else {
        format!("{} - {}", username, layout.title)
    };
    let content = html! {
        header.site-header {
            nav.breadcrumb {
                a href="../index.html" { (layout.title) }
                " › "
                (display_name(username))
            }
        }
        main {
            article.user-card {
                h1 { (display_name(username)) }
                p { "Username: " code { (username) } }
            }
        }
    };
    base_document(&page_title, layout, content)
}

// ============================================================================
// Tests
// ============================================================================
