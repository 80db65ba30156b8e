use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};

use arcade_ide::kernel::services::adapters::{
    get_settings_path, AsyncRuntime, Gateways, JsonSettingsStore, LocalFileGateway,
    MakeBuildGateway, APP_NAME,
};
use arcade_ide::kernel::services::ports::{FileGateway, WorkbenchConfig};
use arcade_ide::kernel::{Action, AppState, Store};

mod logging;
mod shell;

#[derive(Debug, PartialEq, Eq)]
struct StartupPaths {
    folder: Option<PathBuf>,
    open_file: Option<PathBuf>,
}

/// The optional argument names either a folder to open or a file to edit.
fn resolve_startup_paths(cwd: &Path, arg: Option<&str>) -> io::Result<StartupPaths> {
    let Some(arg) = arg else {
        return Ok(StartupPaths {
            folder: None,
            open_file: None,
        });
    };

    let path = cwd.join(arg);
    let metadata = std::fs::metadata(&path)?;
    if metadata.is_dir() {
        Ok(StartupPaths {
            folder: Some(path),
            open_file: None,
        })
    } else {
        Ok(StartupPaths {
            folder: None,
            open_file: Some(path),
        })
    }
}

fn main() -> io::Result<()> {
    let cwd = env::current_dir()?;
    let arg = env::args().nth(1);
    let startup = resolve_startup_paths(&cwd, arg.as_deref())?;

    let settings_path = get_settings_path()
        .unwrap_or_else(|| env::temp_dir().join(APP_NAME).join("arcade-ide-config.json"));
    let settings = Arc::new(JsonSettingsStore::open(settings_path));
    let mut config = WorkbenchConfig::from_store(settings.as_ref());

    let _logging = logging::init(&config.log_level);
    tracing::info!(settings = %settings.path().display(), "starting");

    if startup.folder.is_some() {
        config.last_open_folder = startup.folder.clone();
    }

    let dialogs = Arc::new(shell::StdinDialogs::new(cwd));
    let files: Arc<dyn FileGateway> = Arc::new(LocalFileGateway::new(dialogs, config.clone()));
    let gateways = Gateways {
        files: files.clone(),
        build: Arc::new(MakeBuildGateway::new(files)),
        settings,
    };

    let (tx, rx) = mpsc::channel();
    let runtime = AsyncRuntime::new(gateways, tx)?;
    let store = Store::new(AppState::new(config));

    let mut shell = shell::Shell::new(store, runtime, rx);
    let mut stdout = io::stdout();
    shell.run(&mut stdout, startup.open_file.map(Action::OpenPath))
}

#[cfg(test)]
#[path = "../tests/unit/cli_startup_paths.rs"]
mod tests;
