//! Blocking HTTP client for the GoodData platform.
//!
//! [`GoodDataClient::connect`] logs in up front; a client made with
//! [`GoodDataClient::new`] logs in on its first request. Login uses
//! `verify_level: 2`, which returns the super secured token (SST) in the
//! response body instead of a cookie; the SST is then exchanged for a
//! temporary token (TT) sent with every metadata request. A TT expires after
//! a few minutes, so a `401` answer triggers one TT refresh and one re-send
//! of the same request.

use std::fmt;

use log::{debug, info, trace};
use reqwest::{
    StatusCode, Url,
    blocking::{Client, Response},
    header::ACCEPT,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use vizaudit_core::{
    Attribute, AttributeDisplayForm, Entry, Project, VisualizationObject,
    attribute::{AttributeDocument, DisplayFormDocument},
    project::{ProjectDocument, QueryDocument},
    visualization::VisualizationObjectDocument,
};

use crate::{AuditError, MetadataService, config::AppConfig};

const LOGIN_PATH: &str = "/gdc/account/login";
const PROJECTS_PATH: &str = "/gdc/projects";
const TOKEN_PATH: &str = "/gdc/account/token";

const SST_HEADER: &str = "X-GDC-AuthSST";
const TT_HEADER: &str = "X-GDC-AuthTT";

const JSON: &str = "application/json";

/// Login name and password for the platform.
#[derive(Clone)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
struct Session {
    sst: String,
    tt: String,
    /// Login resource to `DELETE` on logout.
    state_uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    post_user_login: LoginBody<'a>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    login: &'a str,
    password: &'a str,
    remember: u8,
    verify_level: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    user_login: UserLogin,
}

#[derive(Deserialize)]
struct UserLogin {
    token: String,
    state: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    user_token: UserToken,
}

#[derive(Deserialize)]
struct UserToken {
    token: String,
}

/// [`MetadataService`] over the platform's REST API.
pub struct GoodDataClient {
    http: Client,
    base: Url,
    credentials: Credentials,
    session: Option<Session>,
}

impl GoodDataClient {
    /// Creates a client for the configured server.
    ///
    /// No request is sent until the first metadata call.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Config` if the server address does not form a
    /// valid URL, and `AuditError::Http` if the HTTP client cannot be built.
    pub fn new(config: &AppConfig, credentials: Credentials) -> Result<Self, AuditError> {
        let base_url = config.server().base_url();
        let base = Url::parse(&base_url)
            .map_err(|err| AuditError::Config(format!("Invalid server address `{base_url}`: {err}")))?;

        let http = Client::builder()
            .timeout(config.http().timeout())
            .user_agent(config.http().user_agent())
            .build()?;

        debug!(base_url = base.as_str(); "Created GoodData client");

        Ok(Self {
            http,
            base,
            credentials,
            session: None,
        })
    }

    /// Creates a client and logs in immediately.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [`GoodDataClient::new`], returns
    /// `AuditError::Auth` if the server rejects the credentials.
    pub fn connect(config: &AppConfig, credentials: Credentials) -> Result<Self, AuditError> {
        let mut client = Self::new(config, credentials)?;
        client.session()?;
        Ok(client)
    }

    /// Returns the server the client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Returns whether a login has happened and not been logged out.
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    fn url(&self, uri: &str) -> Result<Url, AuditError> {
        self.base
            .join(uri)
            .map_err(|err| AuditError::Config(format!("Invalid resource URI `{uri}`: {err}")))
    }

    /// Returns the URL of project `project_id`, percent-encoding the ID as a
    /// single path segment.
    fn project_url(&self, project_id: &str) -> Result<Url, AuditError> {
        let mut url = self.url(PROJECTS_PATH)?;
        url.path_segments_mut()
            .map_err(|()| AuditError::Config(format!("Server address `{}` cannot hold a path", self.base)))?
            .push(project_id);
        Ok(url)
    }

    fn session(&mut self) -> Result<&Session, AuditError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => self.login()?,
        };
        Ok(&*self.session.insert(session))
    }

    fn login(&self) -> Result<Session, AuditError> {
        info!(
            user = self.credentials.user,
            host = self.base.host_str().unwrap_or_default();
            "Logging in"
        );

        let request = LoginRequest {
            post_user_login: LoginBody {
                login: &self.credentials.user,
                password: &self.credentials.password,
                remember: 0,
                verify_level: 2,
            },
        };

        let response = self
            .http
            .post(self.url(LOGIN_PATH)?)
            .header(ACCEPT, JSON)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.auth_error(status));
        }

        let login: LoginResponse = decode(LOGIN_PATH, response)?;
        let tt = self.fetch_temporary_token(&login.user_login.token)?;

        debug!(state = login.user_login.state; "Logged in");

        Ok(Session {
            sst: login.user_login.token,
            tt,
            state_uri: login.user_login.state,
        })
    }

    fn fetch_temporary_token(&self, sst: &str) -> Result<String, AuditError> {
        let response = self
            .http
            .get(self.url(TOKEN_PATH)?)
            .header(ACCEPT, JSON)
            .header(SST_HEADER, sst)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.auth_error(status));
        }

        let token: TokenResponse = decode(TOKEN_PATH, response)?;
        Ok(token.user_token.token)
    }

    fn refresh_temporary_token(&mut self) -> Result<String, AuditError> {
        let sst = match &self.session {
            Some(session) => session.sst.clone(),
            None => return self.session().map(|session| session.tt.clone()),
        };

        debug!("Refreshing temporary token");
        let tt = self.fetch_temporary_token(&sst)?;
        if let Some(session) = self.session.as_mut() {
            session.tt.clone_from(&tt);
        }
        Ok(tt)
    }

    fn auth_error(&self, status: StatusCode) -> AuditError {
        let reason = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                format!("credentials rejected by server (HTTP {})", status.as_u16())
            }
            _ => format!("unexpected HTTP status {}", status.as_u16()),
        };
        AuditError::Auth {
            user: self.credentials.user.clone(),
            reason,
        }
    }

    fn send_get(&self, url: &Url, tt: &str) -> Result<Response, AuditError> {
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, JSON)
            .header(TT_HEADER, tt)
            .send()?;
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&mut self, uri: &str) -> Result<T, AuditError> {
        let url = self.url(uri)?;
        self.get_json_at(&url, uri)
    }

    fn get_json_at<T: DeserializeOwned>(&mut self, url: &Url, uri: &str) -> Result<T, AuditError> {
        debug!(uri; "GET");

        let tt = self.session()?.tt.clone();
        let mut response = self.send_get(url, &tt)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let tt = self.refresh_temporary_token()?;
            response = self.send_get(url, &tt)?;
        }

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AuditError::NotFound {
                uri: uri.to_string(),
            });
        }
        if !status.is_success() {
            return Err(AuditError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }

        decode(uri, response)
    }
}

impl fmt::Debug for GoodDataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoodDataClient")
            .field("base", &self.base.as_str())
            .field("credentials", &self.credentials)
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

fn decode<T: DeserializeOwned>(uri: &str, response: Response) -> Result<T, AuditError> {
    let body = response.text()?;
    trace!(uri, body; "Response body");
    serde_json::from_str(&body).map_err(|err| AuditError::new_decode_error(uri, err))
}

impl MetadataService for GoodDataClient {
    fn get_project_by_id(&mut self, project_id: &str) -> Result<Project, AuditError> {
        let url = self.project_url(project_id)?;
        let doc: ProjectDocument = self.get_json_at(&url, url.path())?;
        Ok(doc.project)
    }

    fn find_visualization_objects(&mut self, project: &Project) -> Result<Vec<Entry>, AuditError> {
        let doc: QueryDocument = self.get_json(&project.visualization_objects_query_uri())?;
        Ok(doc.query.entries)
    }

    fn get_visualization_object(&mut self, uri: &str) -> Result<VisualizationObject, AuditError> {
        let doc: VisualizationObjectDocument = self.get_json(uri)?;
        Ok(doc.visualization_object)
    }

    fn get_display_form(&mut self, uri: &str) -> Result<AttributeDisplayForm, AuditError> {
        let doc: DisplayFormDocument = self.get_json(uri)?;
        Ok(doc.attribute_display_form)
    }

    fn get_attribute(&mut self, uri: &str) -> Result<Attribute, AuditError> {
        let doc: AttributeDocument = self.get_json(uri)?;
        Ok(doc.attribute)
    }

    fn logout(&mut self) -> Result<(), AuditError> {
        let Some(session) = self.session.take() else {
            debug!("No open session, skipping logout");
            return Ok(());
        };

        info!(user = self.credentials.user; "Logging out");

        let response = self
            .http
            .delete(self.url(&session.state_uri)?)
            .header(ACCEPT, JSON)
            .header(SST_HEADER, session.sst.as_str())
            .header(TT_HEADER, session.tt.as_str())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::Status {
                uri: session.state_uri,
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
