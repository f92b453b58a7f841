//! Page lifecycle: auth guard, header population, logout, dashboard entry.
//!
//! SYSTEM CONTEXT
//! ==============
//! A protected page builds one [`Portal`] and calls [`Portal::init_dashboard`]
//! on load. The guard redirects visitors without a token; otherwise the
//! header is filled from the cached profile, fetching it first if needed.
//!
//! ERROR HANDLING
//! ==============
//! `load_user_info` is the only catch-all: a failed profile fetch is logged
//! and the page keeps rendering with an empty header.

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;

use std::rc::Rc;

use crate::config::ClientConfig;
use crate::net::{ApiClient, ApiError, HttpTransport};
use crate::session::SessionStore;
use crate::util::alert::{AlertKind, Alerts, show_loading};
use crate::util::surface::{NodeId, PageSurface};
use crate::util::timer::TimerHost;

pub const USER_NAME_ELEMENT: &str = "userName";
pub const USER_AVATAR_ELEMENT: &str = "userAvatar";
pub const LOGOUT_PROMPT: &str = "Are you sure you want to logout?";

/// Everything a page needs: config, session, API client, page surface and
/// the page's alert component.
pub struct Portal {
    config: ClientConfig,
    session: SessionStore,
    api: ApiClient,
    surface: Rc<dyn PageSurface>,
    alerts: Alerts,
}

impl Portal {
    pub fn new<S: PageSurface + 'static>(
        config: ClientConfig,
        session: SessionStore,
        transport: Rc<dyn HttpTransport>,
        surface: Rc<S>,
        timers: Rc<dyn TimerHost>,
    ) -> Self {
        let api = ApiClient::new(&config, session.clone(), transport, surface.clone());
        let surface: Rc<dyn PageSurface> = surface;
        let alerts = Alerts::new(Rc::clone(&surface), timers, config.alert_timeout);
        Self { config, session, api, surface, alerts }
    }

    /// Portal over the live document, `localStorage` and `fetch`.
    #[cfg(feature = "hydrate")]
    #[must_use]
    pub fn browser() -> Self {
        Self::new(
            ClientConfig::default(),
            SessionStore::browser(),
            Rc::new(crate::net::transport::GlooTransport),
            Rc::new(crate::util::surface::DomSurface::new()),
            Rc::new(crate::util::timer::GlooTimers),
        )
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn alerts(&self) -> &Alerts {
        &self.alerts
    }

    pub fn show_alert(&self, message: &str, kind: &AlertKind) -> Option<NodeId> {
        self.alerts.show_alert(message, kind)
    }

    pub fn show_loading(&self, element_id: &str) -> bool {
        show_loading(self.surface.as_ref(), element_id)
    }

    /// Redirect to the login page unless a token is stored.
    pub fn check_auth(&self) -> bool {
        if self.session.is_authenticated() {
            return true;
        }
        self.surface.navigate(&self.config.login_page);
        false
    }

    /// Fill `#userName` and `#userAvatar` from the profile, fetching it when
    /// none is cached. Never fails.
    pub async fn load_user_info(&self) {
        if let Err(e) = self.try_load_user_info().await {
            log::error!("Error loading user info: {e}");
        }
    }

    async fn try_load_user_info(&self) -> Result<(), ApiError> {
        if self.session.user().is_none() {
            self.api.current_user().await?;
        }

        let Some(user) = self.session.user() else {
            return Ok(());
        };
        self.surface.set_text_content(USER_NAME_ELEMENT, &user.display_name());
        self.surface.set_text_content(USER_AVATAR_ELEMENT, &user.initials());
        Ok(())
    }

    /// Ask for confirmation, then log out. Returns whether logout ran.
    pub async fn handle_logout(&self) -> bool {
        if !self.surface.confirm(LOGOUT_PROMPT) {
            return false;
        }
        // Already logged by the client; cleanup and redirect ran regardless.
        let _ = self.api.logout().await;
        true
    }

    /// Guard, then header. Returns `false` if the guard redirected.
    pub async fn init_dashboard(&self) -> bool {
        if !self.check_auth() {
            return false;
        }
        self.load_user_info().await;
        true
    }
}
