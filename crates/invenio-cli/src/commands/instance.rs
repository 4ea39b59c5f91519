use std::fmt::Write as _;

use invenio_app::{Application, CommandRegistry};

use crate::context::{CliResult, missing_group};
use crate::output::render_groups;

pub(crate) fn handle_instance(app: &Application) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "instance_path: {}", app.instance_path().display());
    let _ = writeln!(out, "static_folder: {}", app.static_folder().display());
    let _ = writeln!(out, "static_url_path: {}", app.static_url_path());
    let _ = writeln!(out, "extensions: {}", app.extensions().join(", "));
    out
}

pub(crate) fn handle_commands(app: &Application) -> CliResult<String> {
    app.state::<CommandRegistry>()
        .map(render_groups)
        .ok_or_else(|| missing_group("cli"))
}
