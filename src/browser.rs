//! `wasm-bindgen` exports for the static HTML pages.
//!
//! Pages load the generated module and call these in place of ad-hoc
//! scripts, e.g. `initDashboard()` on `DOMContentLoaded` and
//! `handleLogout()` from the logout button.

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::pages::Portal;
use crate::util::alert::AlertKind;

thread_local! {
    static PORTAL: Rc<Portal> = Rc::new(Portal::browser());
}

fn portal() -> Rc<Portal> {
    PORTAL.with(Rc::clone)
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen(js_name = checkAuth)]
pub fn check_auth() -> bool {
    portal().check_auth()
}

#[wasm_bindgen(js_name = isAuthenticated)]
pub fn is_authenticated() -> bool {
    portal().session().is_authenticated()
}

#[wasm_bindgen(js_name = getUserInitials)]
pub fn user_initials() -> String {
    portal().session().user_initials()
}

#[wasm_bindgen(js_name = getRole)]
pub fn role() -> Option<String> {
    portal().session().role().map(String::from)
}

#[wasm_bindgen(js_name = loadUserInfo)]
pub async fn load_user_info() {
    portal().load_user_info().await;
}

#[wasm_bindgen(js_name = handleLogout)]
pub async fn handle_logout() -> bool {
    portal().handle_logout().await
}

#[wasm_bindgen(js_name = initDashboard)]
pub async fn init_dashboard() -> bool {
    portal().init_dashboard().await
}

#[wasm_bindgen(js_name = showAlert)]
pub fn show_alert(message: &str, kind: Option<String>) {
    let kind = kind.as_deref().map_or_else(AlertKind::default, AlertKind::from);
    portal().show_alert(message, &kind);
}

#[wasm_bindgen(js_name = showLoading)]
pub fn show_loading(element_id: &str) -> bool {
    portal().show_loading(element_id)
}

#[wasm_bindgen(js_name = formatDate)]
pub fn format_date(value: &str) -> String {
    crate::util::format::format_date(value)
}

#[wasm_bindgen(js_name = formatTime)]
pub fn format_time(value: &str) -> String {
    crate::util::format::format_time(value)
}
