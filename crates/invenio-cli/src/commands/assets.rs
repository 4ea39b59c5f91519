use std::fmt::Write as _;

use invenio_app::{AssetEnvironment, Application, CommandRegistry};

use crate::context::{CliError, CliResult, missing_group};
use crate::output::render_bundles;

const GROUP: &str = "assets";

fn environment<'a>(app: &'a Application, command: &str) -> CliResult<&'a AssetEnvironment> {
    let offered = app
        .state::<CommandRegistry>()
        .and_then(|registry| registry.group(GROUP))
        .is_some_and(|group| group.has_command(command));
    if !offered {
        return Err(missing_group(GROUP));
    }
    app.state::<AssetEnvironment>()
        .ok_or_else(|| missing_group(GROUP))
}

pub(crate) fn handle_assets_list(app: &Application) -> CliResult<String> {
    environment(app, "list").map(render_bundles)
}

pub(crate) fn handle_assets_build(app: &Application) -> CliResult<String> {
    let env = environment(app, "build")?;
    let written = env.build().map_err(CliError::from)?;
    let mut out = String::new();
    for path in written {
        let _ = writeln!(out, "{}", path.display());
    }
    Ok(out)
}
