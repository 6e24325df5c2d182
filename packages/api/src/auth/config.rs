//! OAuth provider configuration built from [`Settings`].

use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};

use crate::error::{Error, Result};
use crate::models::Provider;
use crate::settings::{ProviderSettings, Settings};

/// Public endpoints of a provider.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub authorize: String,
    pub token: String,
    pub profile: String,
}

impl Endpoints {
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::Google => Self {
                authorize: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
                token: "https://oauth2.googleapis.com/token".to_string(),
                profile: "https://www.googleapis.com/oauth2/v3/userinfo".to_string(),
            },
            Provider::Facebook => Self {
                authorize: "https://www.facebook.com/v19.0/dialog/oauth".to_string(),
                token: "https://graph.facebook.com/v19.0/oauth/access_token".to_string(),
                profile: "https://graph.facebook.com/me?fields=id".to_string(),
            },
        }
    }
}

/// OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub provider: Provider,
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub redirect_url: RedirectUrl,
    pub profile_url: String,
}

impl OAuthConfig {
    /// Build a config against explicit endpoints. The callback is always
    /// `{base_url}/auth/{provider}/secrets`.
    pub fn new(
        provider: Provider,
        credentials: &ProviderSettings,
        base_url: &str,
        endpoints: Endpoints,
    ) -> Result<Self> {
        let invalid = |e: oauth2::url::ParseError| Error::OAuth(format!("invalid {provider} url: {e}"));
        let redirect = format!("{}/auth/{}/secrets", base_url.trim_end_matches('/'), provider);

        Ok(Self {
            provider,
            client_id: ClientId::new(credentials.id.clone()),
            client_secret: ClientSecret::new(credentials.secret.clone()),
            auth_url: AuthUrl::new(endpoints.authorize).map_err(invalid)?,
            token_url: TokenUrl::new(endpoints.token).map_err(invalid)?,
            redirect_url: RedirectUrl::new(redirect).map_err(invalid)?,
            profile_url: endpoints.profile,
        })
    }

    /// Config for `provider` from settings, or `None` when no client
    /// credentials are configured.
    pub fn from_settings(provider: Provider, settings: &Settings) -> Result<Option<Self>> {
        let credentials = settings.provider(provider);
        if !credentials.is_configured() {
            return Ok(None);
        }
        Self::new(
            provider,
            credentials,
            &settings.auth.base,
            Endpoints::for_provider(provider),
        )
        .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> ProviderSettings {
        ProviderSettings {
            id: "client".into(),
            secret: "shh".into(),
        }
    }

    #[test]
    fn test_callback_url_per_provider() {
        let google = OAuthConfig::new(
            Provider::Google,
            &credentials(),
            "http://localhost:3000/",
            Endpoints::for_provider(Provider::Google),
        )
        .unwrap();
        assert_eq!(
            google.redirect_url.as_str(),
            "http://localhost:3000/auth/google/secrets"
        );

        let facebook = OAuthConfig::new(
            Provider::Facebook,
            &credentials(),
            "http://localhost:3000",
            Endpoints::for_provider(Provider::Facebook),
        )
        .unwrap();
        assert_eq!(
            facebook.redirect_url.as_str(),
            "http://localhost:3000/auth/facebook/secrets"
        );
    }

    #[test]
    fn test_unconfigured_provider_is_skipped() {
        let settings = Settings::default();
        assert!(OAuthConfig::from_settings(Provider::Google, &settings)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = OAuthConfig::new(
            Provider::Google,
            &credentials(),
            "not a url",
            Endpoints::for_provider(Provider::Google),
        );
        assert!(matches!(result, Err(Error::OAuth(_))));
    }
}
