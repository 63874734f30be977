//! Dashboard views

pub mod protection;
pub mod settings;

pub use protection::render_protection_view;
pub use settings::render_settings_view;
