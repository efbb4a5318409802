//! Profile rendering
//!
//! The callback hands the fetched profile to one of three renderers.
//! Which one is used is a deployment choice (`render.format`).

use axum::{
    Json,
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::auth::{GitHubUser, Profile};
use crate::error::AppError;

/// Output format for the callback result page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// Raw profile body as plain text
    Text,
    /// Callback template bound to the profile
    #[default]
    Html,
    /// Parsed profile as JSON
    Json,
}

impl RenderFormat {
    /// Render a fetched profile
    ///
    /// # Errors
    /// `Json` fails with `ProfileDecode` when the body is not JSON.
    /// `Text` and `Html` never fail.
    pub fn render(self, profile: &Profile) -> Result<Response, AppError> {
        match self {
            RenderFormat::Text => Ok((
                [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                profile.as_text().into_owned(),
            )
                .into_response()),
            RenderFormat::Html => Ok(Html(callback_page(&profile.user())).into_response()),
            RenderFormat::Json => Ok(Json(profile.to_json()?).into_response()),
        }
    }
}

/// Result page shown after a successful login
fn callback_page(user: &GitHubUser) -> String {
    use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

    let display_name = user.name.as_deref().unwrap_or(&user.login);
    let avatar = match &user.avatar_url {
        Some(url) => format!(
            r#"<img src="{}" alt="avatar" width="96" height="96">"#,
            attr(url)
        ),
        None => String::new(),
    };
    let profile_link = match &user.html_url {
        Some(url) => format!(r#"<a href="{}">View on GitHub</a>"#, attr(url)),
        None => String::new(),
    };
    let bio = match &user.bio {
        Some(bio) => format!("<p>{}</p>", text(bio)),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Logged in - ghlogin</title></head>
<body>
    <h1>Hello, {display_name}!</h1>
    {avatar}
    <p>Logged in as <strong>{login}</strong> (id {id})</p>
    {bio}
    {profile_link}
    <p><a href="/">Back home</a></p>
</body>
</html>
"#,
        display_name = text(display_name),
        login = text(&user.login),
        id = user.id,
    )
}
