//
//  devops-state
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials for the REST API. The platform accepts HTTP Basic
//! authentication over HTTPS, where the password is a personal access token
//! (PAT) and the username may be left empty.
//!
//! Tokens are never read from the configuration file. They come from the
//! `DVS_TOKEN` environment variable (see [`AuthCredential::from_env`]).
//!
//! ## Example
//!
//! ```rust
//! use devops_state::auth::AuthCredential;
//!
//! let credential = AuthCredential::personal_access_token("my-pat");
//! assert!(credential.username().is_none());
//! ```

use reqwest::RequestBuilder;

/// Environment variable holding the personal access token.
pub const TOKEN_ENV: &str = "DVS_TOKEN";

/// Authentication credentials supported by the client.
///
/// # Variants
///
/// - `PersonalAccessToken`: PAT sent as the Basic password with an empty username.
/// - `Basic`: Explicit username and password (or PAT).
#[derive(Clone)]
pub enum AuthCredential {
    /// Personal access token with no username.
    PersonalAccessToken {
        /// The personal access token string.
        token: String,
    },
    /// Basic HTTP authentication with username and password.
    Basic {
        /// The username for authentication.
        username: String,
        /// The password or token for authentication.
        password: String,
    },
}

impl AuthCredential {
    /// Creates a PAT credential.
    pub fn personal_access_token(token: impl Into<String>) -> Self {
        Self::PersonalAccessToken {
            token: token.into(),
        }
    }

    /// Creates a Basic credential.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds a credential from the `DVS_TOKEN` environment variable.
    ///
    /// When `username` is given a [`AuthCredential::Basic`] credential is
    /// returned, otherwise a [`AuthCredential::PersonalAccessToken`].
    ///
    /// # Returns
    ///
    /// `None` if the variable is unset or empty.
    pub fn from_env(username: Option<&str>) -> Option<Self> {
        let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty())?;
        Some(match username {
            Some(user) if !user.is_empty() => Self::basic(user, token),
            _ => Self::personal_access_token(token),
        })
    }

    /// Returns the username, if one is configured.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::PersonalAccessToken { .. } => None,
            Self::Basic { username, .. } => Some(username),
        }
    }

    /// Applies the credential to an HTTP request as a Basic authorization header.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::PersonalAccessToken { token } => request.basic_auth("", Some(token)),
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }
}

impl std::fmt::Debug for AuthCredential {
    // Secrets never reach logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonalAccessToken { .. } => f
                .debug_struct("PersonalAccessToken")
                .field("token", &"********")
                .finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"********")
                .finish(),
        }
    }
}
