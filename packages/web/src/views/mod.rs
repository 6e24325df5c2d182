//! HTML views rendered with minijinja.
//!
//! Templates are compiled into the binary. Their names end in `.html`, which
//! turns on HTML auto-escaping for every interpolated value.

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use api::Provider;

use crate::error::AppError;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("register.html", include_str!("../../templates/register.html")),
    ("secrets.html", include_str!("../../templates/secrets.html")),
    ("submit.html", include_str!("../../templates/submit.html")),
];

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, AppError> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

/// A provider button on the login and register pages.
#[derive(Debug, Serialize)]
pub struct ProviderLink {
    pub href: String,
    pub label: &'static str,
    pub class: &'static str,
}

impl From<Provider> for ProviderLink {
    fn from(provider: Provider) -> Self {
        Self {
            href: format!("/auth/{provider}"),
            label: provider.label(),
            class: provider.as_str(),
        }
    }
}

/// Banner text for an `?error=` code. Unknown codes show nothing.
pub fn flash(code: Option<&str>) -> Option<&'static str> {
    let message = match code? {
        "username_taken" => "That username is already taken.",
        "invalid_input" => "Please enter both a username and a password.",
        "invalid_credentials" => "Invalid username or password.",
        "oauth_failed" => "Signing in with that provider did not complete. Please try again.",
        "provider_unavailable" => "That sign-in option is not available.",
        "empty_secret" => "Your secret can't be empty.",
        _ => return None,
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use minijinja::context;

    use super::*;

    #[test]
    fn test_all_templates_compile() {
        let views = Views::new().unwrap();
        let page = views
            .render("login.html", context! { providers => Vec::<ProviderLink>::new() })
            .unwrap();
        assert!(page.0.contains("<form"));
    }

    #[test]
    fn test_secrets_are_escaped() {
        let views = Views::new().unwrap();
        let page = views
            .render(
                "secrets.html",
                context! { secrets => vec!["<script>alert(1)</script>"], authenticated => false },
            )
            .unwrap();
        assert!(!page.0.contains("<script>alert(1)</script>"));
        assert!(page.0.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_flash_messages() {
        assert_eq!(flash(Some("invalid_credentials")), Some("Invalid username or password."));
        assert_eq!(flash(Some("something_else")), None);
        assert_eq!(flash(None), None);
    }
}
