use invenio_app::Application;

use crate::context::{CliError, CliResult};
use crate::output::{OutputFormat, format_value, render_config};

pub(crate) fn handle_config_show(app: &Application, format: OutputFormat) -> CliResult<String> {
    render_config(app.config(), format)
}

pub(crate) fn handle_config_get(app: &Application, key: &str) -> CliResult<String> {
    app.config()
        .get(key)
        .map(|value| format!("{}\n", format_value(value)))
        .ok_or_else(|| CliError::validation(format!("setting '{key}' is not configured")))
}
