//! # OAuth 2.0 bridge
//!
//! Implements the Authorization Code flow with PKCE for every supported
//! [`Provider`]. Both providers share one code path; they only differ in
//! endpoints, scopes and the shape of the profile response.
//!
//! ## Flow
//!
//! 1. **[`initiate`](OAuthBridge::initiate)**: builds the authorization URL
//!    (client id, fixed callback URL, scopes, random CSRF state, PKCE S256
//!    challenge) and returns the [`PendingAuthorization`] the caller must keep
//!    in the visitor's session.
//!
//! 2. **[`handle_callback`](OAuthBridge::handle_callback)**: called by the
//!    `/auth/{provider}/secrets` route. It:
//!    - rejects provider errors (the user denied access), a missing code, and
//!      any mismatch between the returned `state` and the pending one;
//!    - exchanges the code + PKCE verifier for an access token;
//!    - fetches the subject id from the provider's profile endpoint;
//!    - resolves it to a local user with [`UserStore::find_or_create`].
//!
//! A failed callback never creates or modifies a user.

use std::collections::HashMap;

use oauth2::basic::BasicClient;
use oauth2::{
    AuthType, AuthorizationCode, CsrfToken, EndpointNotSet, EndpointSet, PkceCodeChallenge,
    PkceCodeVerifier, Scope, TokenResponse,
};
use serde::Deserialize;

use super::config::OAuthConfig;
use super::session::PendingAuthorization;
use crate::db::UserStore;
use crate::error::{Error, Result};
use crate::models::{ExternalIdentity, Provider, User};
use crate::settings::Settings;

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Query parameters the provider sends back to the callback URL.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Google userinfo (v3) response.
#[derive(Debug, Deserialize)]
struct GoogleProfile {
    sub: String,
}

/// Facebook Graph `/me` response.
#[derive(Debug, Deserialize)]
struct FacebookProfile {
    id: String,
}

/// Entry point for provider logins.
pub struct OAuthBridge {
    configs: HashMap<Provider, OAuthConfig>,
    http: reqwest::Client,
}

impl OAuthBridge {
    pub fn new(configs: impl IntoIterator<Item = OAuthConfig>) -> Result<Self> {
        // Token endpoints must not be followed through redirects.
        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::OAuth(e.to_string()))?;

        Ok(Self {
            configs: configs.into_iter().map(|c| (c.provider, c)).collect(),
            http,
        })
    }

    /// Bridge for every provider that has credentials in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut configs = Vec::new();
        for provider in Provider::ALL {
            match OAuthConfig::from_settings(provider, settings)? {
                Some(config) => configs.push(config),
                None => tracing::info!(%provider, "provider login disabled: no client credentials"),
            }
        }
        Self::new(configs)
    }

    /// Providers that can be offered on the login page, in display order.
    pub fn enabled(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.configs.contains_key(p))
            .collect()
    }

    fn config(&self, provider: Provider) -> Result<&OAuthConfig> {
        self.configs
            .get(&provider)
            .ok_or(Error::ProviderUnavailable(provider))
    }

    fn create_client(config: &OAuthConfig) -> ConfiguredClient {
        BasicClient::new(config.client_id.clone())
            .set_client_secret(config.client_secret.clone())
            .set_auth_uri(config.auth_url.clone())
            .set_token_uri(config.token_url.clone())
            .set_redirect_uri(config.redirect_url.clone())
            .set_auth_type(AuthType::RequestBody)
    }

    /// Build the authorization redirect for `provider`.
    pub fn initiate(&self, provider: Provider) -> Result<(String, PendingAuthorization)> {
        let config = self.config(provider)?;
        let client = Self::create_client(config);
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(scopes(provider))
            .set_pkce_challenge(pkce_challenge)
            .url();

        let pending = PendingAuthorization {
            provider,
            state: csrf_state.secret().clone(),
            verifier: pkce_verifier.secret().clone(),
        };
        Ok((auth_url.to_string(), pending))
    }

    /// Finish a login attempt and return the local user it resolves to.
    pub async fn handle_callback(
        &self,
        provider: Provider,
        pending: Option<PendingAuthorization>,
        params: CallbackParams,
        store: &dyn UserStore,
    ) -> Result<User> {
        if let Some(error) = params.error {
            return Err(Error::OAuth(format!("{provider} returned an error: {error}")));
        }

        let pending = pending
            .filter(|p| p.provider == provider)
            .ok_or_else(|| Error::OAuth("no login in progress for this session".to_string()))?;

        if params.state.as_deref() != Some(pending.state.as_str()) {
            return Err(Error::OAuth("state mismatch".to_string()));
        }

        let code = params
            .code
            .ok_or_else(|| Error::OAuth("missing authorization code".to_string()))?;

        let identity = self.exchange_code(&pending, &code).await?;
        store.find_or_create(&identity).await
    }

    /// Exchange an authorization code for the provider's subject id.
    async fn exchange_code(
        &self,
        pending: &PendingAuthorization,
        code: &str,
    ) -> Result<ExternalIdentity> {
        let config = self.config(pending.provider)?;
        let client = Self::create_client(config);

        let token_result = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pending.verifier.clone()))
            .request_async(&self.http)
            .await
            .map_err(|e| Error::OAuth(format!("token exchange failed: {}", e)))?;

        let access_token = token_result.access_token().secret();

        let response = self
            .http
            .get(&config.profile_url)
            .bearer_auth(access_token)
            .header("User-Agent", "Secrets")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::OAuth(format!("profile request failed: {}", e)))?;

        let subject = match pending.provider {
            Provider::Google => response.json::<GoogleProfile>().await.map(|p| p.sub),
            Provider::Facebook => response.json::<FacebookProfile>().await.map(|p| p.id),
        }
        .map_err(|e| Error::OAuth(format!("invalid profile response: {}", e)))?;

        Ok(ExternalIdentity::new(pending.provider, subject))
    }
}

fn scopes(provider: Provider) -> Vec<Scope> {
    match provider {
        Provider::Google => vec![Scope::new("profile".to_string())],
        Provider::Facebook => Vec::new(),
    }
}
