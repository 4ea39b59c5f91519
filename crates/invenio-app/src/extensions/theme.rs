//! Site theme defaults and the theme's asset bundles.

use serde_json::Value;

use super::assets::{AssetEnvironment, Bundle};
use super::string_setting;
use crate::application::{Application, Extension};
use crate::error::{AppError, AppResult};

const SITENAME: &str = "THEME_SITENAME";
const BASE_TEMPLATE: &str = "BASE_TEMPLATE";
const LOGO: &str = "THEME_LOGO";

/// Bundle carrying the theme stylesheet.
pub const THEME_CSS_BUNDLE: &str = "invenio_theme_css";
/// Bundle carrying the theme scripts.
pub const THEME_JS_BUNDLE: &str = "invenio_theme_js";

/// Theme settings visible to page rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSettings {
    /// Site name shown in page headers.
    pub site_name: String,
    /// Template every page extends.
    pub base_template: String,
    /// Logo path relative to the static folder, if any.
    pub logo: Option<String>,
}

/// Site theme: page defaults plus the stylesheet and script bundles.
#[derive(Debug, Default)]
pub struct ThemeExtension;

impl ThemeExtension {
    /// Register the theme bundles in `env`.
    pub fn init_assets(&self, env: &mut AssetEnvironment) {
        env.register(
            THEME_CSS_BUNDLE,
            Bundle::new("gen/invenio_theme.css", &["css/invenio_theme/theme.css"]),
        );
        env.register(
            THEME_JS_BUNDLE,
            Bundle::new("gen/invenio_theme.js", &["js/invenio_theme/theme.js"]),
        );
    }
}

impl Extension for ThemeExtension {
    fn name(&self) -> &'static str {
        "theme"
    }

    fn init_app(&mut self, app: &mut Application) -> AppResult<()> {
        let config = app.config_mut();
        config.set_default(SITENAME, Value::from("Invenio"));
        config.set_default(BASE_TEMPLATE, Value::from("invenio_theme/page.html"));
        config.set_default(LOGO, Value::from("images/invenio-white.svg"));

        let config = app.config();
        let site_name = required(string_setting(config, SITENAME)?, SITENAME)?;
        let base_template = required(string_setting(config, BASE_TEMPLATE)?, BASE_TEMPLATE)?;
        let settings = ThemeSettings {
            site_name: site_name.to_string(),
            base_template: base_template.to_string(),
            logo: string_setting(config, LOGO)?.map(str::to_string),
        };
        app.insert_state(settings);
        Ok(())
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> AppResult<&'a str> {
    value.ok_or(AppError::InvalidConfig {
        field,
        reason: "missing",
        value: None,
    })
}
