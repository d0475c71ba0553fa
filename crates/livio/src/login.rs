// SPDX-FileCopyrightText: 2026 Livio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `livio login` command implementation.
//!
//! One-time OAuth 2.1 bootstrap using Authorization Code + PKCE against the
//! Kick identity service. Prints the authorize URL, accepts the pasted
//! redirect URL (headless paste flow, no callback server), exchanges the
//! code, and prints the refresh token for the user to place in config. The
//! steady-state watcher only ever uses that refresh token.

use std::io::Write;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use livio_config::model::LivioConfig;
use livio_core::{body_excerpt, LivioError};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// OAuth scopes requested for the watcher.
const SCOPE: &str = "user:read channel:read";

/// PKCE material for one login attempt.
struct Pkce {
    verifier: String,
    challenge: String,
    state: String,
}

/// Generate a fresh PKCE verifier/challenge pair and CSRF state.
fn generate_pkce() -> Pkce {
    let mut verifier_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut verifier_bytes);
    let verifier = URL_SAFE_NO_PAD.encode(verifier_bytes);

    let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));

    let mut state_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut state_bytes);

    Pkce {
        verifier,
        challenge,
        state: URL_SAFE_NO_PAD.encode(state_bytes),
    }
}

/// Derive the authorize endpoint from the configured token endpoint.
fn authorize_endpoint(token_url: &str) -> String {
    token_url
        .strip_suffix("/token")
        .map(|base| format!("{base}/authorize"))
        .unwrap_or_else(|| "https://id.kick.com/oauth/authorize".to_string())
}

/// Build the browser authorization URL.
fn build_authorize_url(
    token_url: &str,
    client_id: &str,
    redirect_uri: &str,
    pkce: &Pkce,
) -> Result<String, LivioError> {
    let url = reqwest::Url::parse_with_params(
        &authorize_endpoint(token_url),
        &[
            ("response_type", "code"),
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("scope", SCOPE),
            ("code_challenge", pkce.challenge.as_str()),
            ("code_challenge_method", "S256"),
            ("state", pkce.state.as_str()),
        ],
    )
    .map_err(|e| LivioError::Internal(format!("failed to build authorize URL: {e}")))?;
    Ok(url.to_string())
}

/// Extract the authorization code from a pasted redirect URL, verifying the
/// CSRF state.
fn parse_redirect(input: &str, expected_state: &str) -> Result<String, LivioError> {
    let url = reqwest::Url::parse(input.trim()).map_err(|e| LivioError::Auth {
        message: format!("could not parse redirect URL: {e}"),
        source: None,
    })?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    match state.as_deref() {
        Some(s) if s == expected_state => {}
        _ => {
            return Err(LivioError::Auth {
                message: "OAuth state mismatch: possible CSRF, aborting login".into(),
                source: None,
            });
        }
    }

    code.ok_or_else(|| LivioError::Auth {
        message: "redirect URL carries no authorization code".into(),
        source: None,
    })
}

/// Tokens returned by the authorization-code exchange.
#[derive(Debug, serde::Deserialize)]
struct TokenGrant {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

/// Exchange an authorization code for access and refresh tokens.
async fn exchange_code(
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
    code: &str,
    verifier: &str,
) -> Result<TokenGrant, LivioError> {
    let client = reqwest::Client::new();

    let resp = client
        .post(token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", redirect_uri),
            ("code_verifier", verifier),
            ("code", code),
        ])
        .send()
        .await
        .map_err(|e| LivioError::Auth {
            message: format!("token endpoint unreachable: {e}"),
            source: Some(Box::new(e)),
        })?;

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(LivioError::Auth {
            message: format!("code exchange failed ({status}): {}", body_excerpt(&body)),
            source: None,
        });
    }

    serde_json::from_str(&body).map_err(|e| LivioError::Auth {
        message: format!("failed to parse token response: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Run the `livio login` command.
pub async fn run_login(config: &LivioConfig) -> Result<(), LivioError> {
    let client_id = config
        .kick
        .client_id
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| LivioError::Config("kick.client_id is required for login".into()))?;
    let client_secret = config
        .kick
        .client_secret
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| LivioError::Config("kick.client_secret is required for login".into()))?;

    let pkce = generate_pkce();
    let auth_url = build_authorize_url(
        &config.kick.token_url,
        client_id,
        &config.kick.redirect_uri,
        &pkce,
    )?;

    println!();
    println!("  🔐 Kick OAuth login");
    println!();
    println!("  Open the following URL in your browser and authorize the app:");
    println!("  {auth_url}");
    println!();
    println!("  After authorizing you will land on {}.", config.kick.redirect_uri);
    print!("  Paste the full redirect URL here: ");
    std::io::stdout()
        .flush()
        .map_err(|e| LivioError::Internal(format!("stdout flush failed: {e}")))?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|e| LivioError::Internal(format!("failed to read input: {e}")))?;

    let code = parse_redirect(&input, &pkce.state)?;
    let grant = exchange_code(
        &config.kick.token_url,
        client_id,
        client_secret,
        &config.kick.redirect_uri,
        &code,
        &pkce.verifier,
    )
    .await?;

    println!();
    println!("  ✅ Login successful.");
    match grant.expires_in {
        Some(expires_in) => println!(
            "  Access token acquired ({} chars, valid {expires_in}s); the watcher refreshes on its own.",
            grant.access_token.len()
        ),
        None => println!("  Access token acquired; the watcher refreshes on its own."),
    }

    match grant.refresh_token {
        Some(refresh_token) => {
            println!();
            println!("  Add this to the [kick] section of your livio.toml:");
            println!();
            println!("    refresh_token = \"{refresh_token}\"");
            println!();
        }
        None => {
            println!();
            println!(
                "  The identity service returned no refresh token; the watcher \
                 will fall back to the client-credentials grant."
            );
        }
    }

    Ok(())
}
