//! qBittorrent WebUI API v2 client.
//!
//! Uses the curl crate (libcurl) for transport; every request runs on the
//! blocking pool via `spawn_blocking`. The session cookie is captured at
//! login, and a 403 mid-run triggers one silent re-login before the error is
//! surfaced to the caller.

use std::str;
use std::sync::RwLock;
use std::time::Duration;

use super::parse;
use super::types::{StatusClass, TorrentSnapshot, TrackerRecord};
use super::{Gateway, GatewayError};

/// Connected WebUI session. Construct with [`QbitGateway::connect`]; a
/// connection or login failure there is fatal to startup by design.
pub struct QbitGateway {
    base: String,
    username: Option<String>,
    password: Option<String>,
    cookie: RwLock<Option<String>>,
}

struct Response {
    code: u32,
    body: String,
    set_cookie: Option<String>,
}

impl QbitGateway {
    /// Open a session against `host:port`, logging in when credentials are
    /// given (qBittorrent can bypass auth for localhost) and probing the API
    /// to confirm the WebUI is actually reachable.
    pub async fn connect(
        host: &str,
        port: u16,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, GatewayError> {
        let base = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}:{port}")
        } else {
            format!("http://{host}:{port}")
        };
        let gateway = Self {
            base,
            username,
            password,
            cookie: RwLock::new(None),
        };
        gateway.login().await?;

        let resp = gateway.call("app/version", None).await?;
        if resp.code != 200 {
            return Err(GatewayError::Http(resp.code));
        }
        tracing::info!(version = %resp.body.trim(), "connected to qBittorrent");
        Ok(gateway)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.base, path)
    }

    async fn login(&self) -> Result<(), GatewayError> {
        let (Some(user), Some(pass)) = (&self.username, &self.password) else {
            return Ok(());
        };
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("username", user)
            .append_pair("password", pass)
            .finish();
        let resp = dispatch(self.endpoint("auth/login"), Some(form), None).await?;
        // A rejected login is still HTTP 200 with a "Fails." body.
        if resp.code != 200 || !resp.body.trim().eq_ignore_ascii_case("ok.") {
            return Err(GatewayError::LoginRejected);
        }
        let Some(cookie) = resp.set_cookie else {
            return Err(GatewayError::LoginRejected);
        };
        *self.cookie.write().unwrap() = Some(cookie);
        Ok(())
    }

    /// Issue one API call, re-logging-in once if the session expired.
    async fn call(&self, path: &str, form: Option<String>) -> Result<Response, GatewayError> {
        let url = self.endpoint(path);
        let cookie = self.cookie.read().unwrap().clone();
        let resp = dispatch(url.clone(), form.clone(), cookie).await?;
        if resp.code == 403 && self.username.is_some() {
            tracing::debug!("session expired, logging in again");
            self.login().await?;
            let cookie = self.cookie.read().unwrap().clone();
            return dispatch(url, form, cookie).await;
        }
        Ok(resp)
    }

    async fn trackers_for(&self, hash: &str) -> Result<Vec<TrackerRecord>, GatewayError> {
        let resp = self
            .call(&format!("torrents/trackers?hash={hash}"), None)
            .await?;
        if resp.code != 200 {
            return Err(GatewayError::Http(resp.code));
        }
        Ok(parse::parse_trackers(&resp.body)?)
    }

    async fn action(&self, path: &str, hash: &str) -> Result<(), GatewayError> {
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("hashes", hash)
            .finish();
        let resp = self.call(path, Some(form)).await?;
        if resp.code != 200 {
            return Err(GatewayError::Http(resp.code));
        }
        Ok(())
    }
}

impl Gateway for QbitGateway {
    async fn snapshot(
        &self,
        class: StatusClass,
    ) -> Result<Vec<TorrentSnapshot>, GatewayError> {
        let path = format!("torrents/info?filter={}&sort=time_active", class.as_filter());
        let resp = self.call(&path, None).await?;
        if resp.code != 200 {
            return Err(GatewayError::Http(resp.code));
        }
        let rows = parse::parse_torrents(&resp.body)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            // A torrent whose tracker list cannot be fetched degrades to "no
            // real trackers"; the monitor then skips it conservatively.
            let trackers = match self.trackers_for(&row.hash).await {
                Ok(trackers) => trackers,
                Err(err) => {
                    tracing::debug!(hash = %row.hash, %err, "tracker fetch failed");
                    Vec::new()
                }
            };
            out.push(row.into_snapshot(trackers));
        }
        Ok(out)
    }

    async fn reannounce(&self, hash: &str) -> Result<(), GatewayError> {
        self.action("torrents/reannounce", hash).await
    }

    async fn pause(&self, hash: &str) -> Result<(), GatewayError> {
        self.action("torrents/pause", hash).await
    }

    async fn resume(&self, hash: &str) -> Result<(), GatewayError> {
        self.action("torrents/resume", hash).await
    }
}

async fn dispatch(
    url: String,
    form: Option<String>,
    cookie: Option<String>,
) -> Result<Response, GatewayError> {
    tokio::task::spawn_blocking(move || perform(&url, form.as_deref(), cookie.as_deref())).await?
}

/// One blocking HTTP round-trip. Runs on the blocking pool; never call from
/// the async loop directly.
fn perform(url: &str, form: Option<&str>, cookie: Option<&str>) -> Result<Response, GatewayError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(30))?;
    if let Some(cookie) = cookie {
        easy.cookie(cookie)?;
    }
    if let Some(form) = form {
        easy.post(true)?;
        easy.post_fields_copy(form.as_bytes())?;
    }

    let mut body: Vec<u8> = Vec::new();
    let mut headers: Vec<String> = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    Ok(Response {
        code,
        body: String::from_utf8_lossy(&body).into_owned(),
        set_cookie: session_cookie(&headers),
    })
}

/// Extract the `SID=` session cookie from response headers, if present.
fn session_cookie(headers: &[String]) -> Option<String> {
    headers.iter().find_map(|header| {
        let (name, value) = header.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case("set-cookie") {
            return None;
        }
        let cookie = value.split(';').next()?.trim();
        cookie.starts_with("SID=").then(|| cookie.to_string())
    })
}
