use chatbar_sidebar::SidebarLabels;
use chatbar_types::SidebarConfig;
use rust_i18n::t;

pub const SUPPORTED_LOCALES: &[&str] = &["en", "pt-BR"];

/// Switch the UI language. Unknown locales fall back to English.
pub fn change_locale(locale: &str) {
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        log::warn!("[i18n] Unsupported locale {:?}, using en", locale);
        rust_i18n::set_locale("en");
    }
}

/// Sidebar strings in the active locale
pub fn sidebar_labels(config: &SidebarConfig) -> SidebarLabels {
    SidebarLabels {
        title: t!("sidebar.title").to_string(),
        new_conversation: t!("sidebar.new_conversation").to_string(),
        footer_note: config.footer_note.clone(),
        footer_image: config.footer_image.clone(),
    }
}
