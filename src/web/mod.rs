pub mod pages;

use anyhow::{Result, anyhow};
use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tiny_http::{Header, Method, Request, Response, Server};
use url::Url;

use crate::auth::oauth::{AuthContext, PendingAuthorization, now_epoch};
use crate::mail::gmail::GmailClient;
use crate::mail::inbox::{list_unread_emails, render_message};

#[derive(Debug, PartialEq, Eq)]
pub enum Route {
    AuthPage,
    AuthCallback { code: String, state: Option<String> },
    Emails,
    ViewEmail(String),
    NotFound,
}

/// Map a request target ("/path?query") to a route.
pub fn route(target: &str) -> Route {
    let Ok(parsed) = Url::parse(&format!("http://localhost{target}")) else {
        return Route::NotFound;
    };

    let mut code = None;
    let mut state = None;
    for (k, v) in parsed.query_pairs() {
        match k.as_ref() {
            "code" => code = Some(v.into_owned()),
            "state" => state = Some(v.into_owned()),
            _ => {}
        }
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        ["auth"] => match code {
            Some(code) if !code.is_empty() => Route::AuthCallback { code, state },
            _ => Route::AuthPage,
        },
        ["emails"] => Route::Emails,
        ["view-email", id] => Route::ViewEmail((*id).to_string()),
        _ => Route::NotFound,
    }
}

struct Page {
    status: u16,
    html: String,
}

impl Page {
    fn ok(html: String) -> Self {
        Self { status: 200, html }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            html: pages::error_page(message),
        }
    }
}

/// State shared by the request handlers.
pub struct WebApp {
    auth: AuthContext,
    gmail: GmailClient,
    max_results: u32,
    pending: Option<PendingAuthorization>,
}

impl WebApp {
    pub fn new(auth: AuthContext, gmail: GmailClient, max_results: u32) -> Self {
        Self {
            auth,
            gmail,
            max_results,
            pending: None,
        }
    }

    /// Start a new authorization, replacing any pending one.
    pub fn begin_authorization(&mut self) -> Url {
        let (url, pending) = self.auth.authorize_url();
        self.pending = Some(pending);
        url
    }

    fn handle(&mut self, target: &str) -> Page {
        let result = match route(target) {
            Route::AuthPage => Ok(Page::ok(pages::auth_page(self.begin_authorization().as_str()))),
            Route::AuthCallback { code, state } => self.auth_callback(&code, state.as_deref()),
            Route::Emails => self.unread_page(false),
            Route::ViewEmail(id) => self.view_email(&id),
            Route::NotFound => return Page::error(404, "Not found"),
        };

        result.unwrap_or_else(|e| {
            error!("{target}: {e:#}");
            Page::error(500, "Internal server error")
        })
    }

    fn auth_callback(&mut self, code: &str, state: Option<&str>) -> Result<Page> {
        if self.auth.needs_authorization(now_epoch()?) {
            // Only codes for a consent URL issued by this process are exchanged.
            let Some(pending) = &self.pending else {
                warn!("authorization callback with no authorization in progress");
                return Ok(Page::error(
                    400,
                    "No authorization in progress; start again at /auth",
                ));
            };
            if state != Some(pending.state()) {
                warn!("authorization callback with unexpected state");
                return Ok(Page::error(400, "Authorization state mismatch"));
            }
            info!("exchanging authorization code");
            self.auth.exchange_code(code, self.pending.take())?;
        } else {
            info!("already authorized; reusing stored token");
        }
        self.unread_page(true)
    }

    fn unread_page(&mut self, just_authenticated: bool) -> Result<Page> {
        let session = self.gmail.session(&mut self.auth)?;
        let emails = list_unread_emails(&session, self.max_results)?;
        Ok(Page::ok(pages::emails_page(&emails, just_authenticated)))
    }

    fn view_email(&mut self, id: &str) -> Result<Page> {
        let session = self.gmail.session(&mut self.auth)?;
        let email = render_message(&session, id)?;
        Ok(Page::ok(pages::email_page(&email)))
    }
}

fn respond(request: Request, page: Page) {
    let mut response = Response::from_string(page.html).with_status_code(page.status);
    if let Ok(h) = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]) {
        response = response.with_header(h);
    }
    if let Err(e) = request.respond(response) {
        warn!("failed to write response: {e}");
    }
}

/// Serve until Ctrl-C. Handler failures are answered with an error page and
/// never stop the loop.
pub fn serve(app: &mut WebApp, addr: SocketAddr) -> Result<()> {
    let server =
        Server::http(addr).map_err(|e| anyhow!("Failed to bind server on {addr}: {e:?}"))?;
    info!("listening on http://{addr}");

    let running = Arc::new(AtomicBool::new(true));
    let r2 = running.clone();
    ctrlc::set_handler(move || {
        r2.store(false, Ordering::SeqCst);
    })?;

    while running.load(Ordering::SeqCst) {
        let Ok(maybe_request) = server.recv_timeout(Duration::from_millis(500)) else {
            continue;
        };
        let Some(request) = maybe_request else {
            continue;
        };

        let page = if *request.method() == Method::Get {
            app.handle(request.url())
        } else {
            Page::error(405, "Method not allowed")
        };
        respond(request, page);
    }

    info!("shutting down");
    Ok(())
}
