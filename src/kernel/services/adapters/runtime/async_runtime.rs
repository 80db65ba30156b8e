use super::message::AppMessage;
use crate::kernel::services::ports::{BuildGateway, FileGateway, GatewayResult, SettingsStore};
use crate::kernel::Effect;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;

#[derive(Clone)]
pub struct Gateways {
    pub files: Arc<dyn FileGateway>,
    pub build: Arc<dyn BuildGateway>,
    pub settings: Arc<dyn SettingsStore>,
}

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
    gateways: Gateways,
}

impl AsyncRuntime {
    pub fn new(gateways: Gateways, tx: Sender<AppMessage>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            tx,
            gateways,
        })
    }

    /// Runs `effect`. Returns whether an `AppMessage` will follow.
    ///
    /// A gateway call that panics still answers, with a `Failed` result
    /// carrying the ids of the effect that started it.
    pub fn execute(&self, effect: Effect) -> bool {
        let files = self.gateways.files.clone();
        match effect {
            Effect::ReadFile(path) => {
                let key = path.clone();
                self.spawn(
                    move || {
                        let result = files.read_file(&path);
                        AppMessage::FileLoaded { path, result }
                    },
                    move |error| AppMessage::FileLoaded {
                        path: key,
                        result: GatewayResult::Failed(error),
                    },
                )
            }
            Effect::PickAndOpenFile => self.spawn(
                move || AppMessage::FilePicked(files.pick_open_file()),
                |error| AppMessage::FilePicked(GatewayResult::Failed(error)),
            ),
            Effect::PickSavePath { doc, request } => self.spawn(
                move || AppMessage::SavePathPicked {
                    doc,
                    request,
                    result: files.pick_save_path(),
                },
                move |error| AppMessage::SavePathPicked {
                    doc,
                    request,
                    result: GatewayResult::Failed(error),
                },
            ),
            Effect::SaveFile {
                doc,
                request,
                path,
                content,
            } => self.spawn(
                move || AppMessage::FileSaved {
                    doc,
                    request,
                    result: files.write_file(&path, &content).map(|()| path),
                },
                move |error| AppMessage::FileSaved {
                    doc,
                    request,
                    result: GatewayResult::Failed(error),
                },
            ),
            Effect::RunOrBuild { doc, path, content } => {
                let build = self.gateways.build.clone();
                self.spawn(
                    move || AppMessage::BuildFinished {
                        doc,
                        result: build.run_or_build(&path, &content),
                    },
                    move |error| AppMessage::BuildFinished {
                        doc,
                        result: GatewayResult::Failed(error),
                    },
                )
            }
            Effect::LoadDir { path, generation } => {
                let key = path.clone();
                self.spawn(
                    move || {
                        let result = files.read_dir(&path);
                        AppMessage::DirLoaded {
                            path,
                            generation,
                            result,
                        }
                    },
                    move |error| AppMessage::DirLoaded {
                        path: key,
                        generation,
                        result: GatewayResult::Failed(error),
                    },
                )
            }
            Effect::CreateFile(path) => self.spawn_create(files, path, false),
            Effect::CreateFolder(path) => self.spawn_create(files, path, true),
            Effect::RenamePath { from, to } => {
                let key = (from.clone(), to.clone());
                self.spawn(
                    move || {
                        let result = files.rename(&from, &to);
                        AppMessage::PathRenamed { from, to, result }
                    },
                    move |error| AppMessage::PathRenamed {
                        from: key.0,
                        to: key.1,
                        result: GatewayResult::Failed(error),
                    },
                )
            }
            Effect::DeletePath { path, .. } => {
                let key = path.clone();
                self.spawn(
                    move || {
                        let result = files.delete(&path);
                        AppMessage::PathDeleted { path, result }
                    },
                    move |error| AppMessage::PathDeleted {
                        path: key,
                        result: GatewayResult::Failed(error),
                    },
                )
            }
            Effect::PickFolder => self.spawn(
                move || AppMessage::FolderPicked(files.pick_folder()),
                |error| AppMessage::FolderPicked(GatewayResult::Failed(error)),
            ),
            Effect::PersistSetting { key, value } => {
                if let Err(e) = self.gateways.settings.set(key, value) {
                    tracing::warn!(key, error = %e, "failed to persist setting");
                }
                false
            }
        }
    }

    fn spawn_create(&self, files: Arc<dyn FileGateway>, path: PathBuf, is_dir: bool) -> bool {
        let key = path.clone();
        self.spawn(
            move || {
                let result = if is_dir {
                    files.create_folder(&path)
                } else {
                    files.create_file(&path)
                };
                AppMessage::PathCreated {
                    path,
                    is_dir,
                    result,
                }
            },
            move |error| AppMessage::PathCreated {
                path: key,
                is_dir,
                result: GatewayResult::Failed(error),
            },
        )
    }

    fn spawn<F, E>(&self, job: F, on_panic: E) -> bool
    where
        F: FnOnce() -> AppMessage + Send + 'static,
        E: FnOnce(String) -> AppMessage + Send + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let message = match tokio::task::spawn_blocking(job).await {
                Ok(message) => message,
                Err(e) => {
                    tracing::error!(error = %e, "gateway task failed");
                    on_panic(format!("background task failed: {}", e))
                }
            };
            let _ = tx.send(message);
        });
        true
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/async_runtime.rs"]
mod tests;
