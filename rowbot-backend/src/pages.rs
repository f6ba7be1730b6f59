//! HTML pages served during account linking.

use anyhow::{Context, Result};
use reqwest::Url;

const MAIN_TEMPLATE: &str = include_str!("../resources/templates/main.html");
const SUCCESS_TEMPLATE: &str = include_str!("../resources/templates/success.html");
const ERROR_TEMPLATE: &str = include_str!("../resources/templates/error.html");

const HIDDEN: &str = "display: none;";
const LOGBOOK_SCOPE: &str = "user:read,results:read";

/// Replace every `{{key}}` with its escaped value
fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |page, (key, value)| {
        page.replace(&format!("{{{{{}}}}}", key), &escape_html(value))
    })
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Logbook authorization URL the login button points at
pub fn login_url(api_base_url: &str, client_id: &str, redirect_uri: &str) -> Result<String> {
    let base = format!("{}/oauth/authorize", api_base_url.trim_end_matches('/'));
    let url = Url::parse_with_params(
        &base,
        &[
            ("client_id", client_id),
            ("scope", LOGBOOK_SCOPE),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
        ],
    )
    .with_context(|| format!("Invalid logbook URL '{}'", base))?;
    Ok(url.into())
}

pub fn main_page(logged_in: bool, login_url: &str) -> String {
    let (login_style, logout_style) = if logged_in { (HIDDEN, "") } else { ("", HIDDEN) };
    render_template(
        MAIN_TEMPLATE,
        &[
            ("descriptionStyle", login_style),
            ("loginStyle", login_style),
            ("logoutStyle", logout_style),
            ("loginUrl", login_url),
        ],
    )
}

pub fn success_page(username: &str) -> String {
    render_template(SUCCESS_TEMPLATE, &[("username", username)])
}

pub fn error_page(message: &str) -> String {
    render_template(ERROR_TEMPLATE, &[("errorMessage", message)])
}
