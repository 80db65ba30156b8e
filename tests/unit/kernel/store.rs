use super::*;
use crate::kernel::editor::{ModelUri, Surface};
use crate::kernel::services::ports::{BuildOutput, DirEntry, GatewayResult, WorkbenchConfig};
use crate::kernel::session::DocumentId;
use crate::kernel::OutputLevel;
use std::path::{Path, PathBuf};

fn new_store() -> Store {
    Store::new(AppState::new(WorkbenchConfig::default()))
}

fn store_with(configure: impl FnOnce(&mut WorkbenchConfig)) -> Store {
    let mut config = WorkbenchConfig::default();
    configure(&mut config);
    Store::new(AppState::new(config))
}

fn last_message(store: &Store) -> String {
    store
        .state()
        .output
        .message()
        .map(|l| l.text.clone())
        .unwrap_or_default()
}

fn open_text(store: &mut Store, path: &str, content: &str) -> DocumentId {
    let path = PathBuf::from(path);
    let result = store.dispatch(Action::OpenPath(path.clone()));
    assert_eq!(result.effects, vec![Effect::ReadFile(path.clone())]);
    store.dispatch(Action::FileRead {
        path: path.clone(),
        result: GatewayResult::Ok(content.to_string()),
    });
    store.state().session.find_by_path(&path).unwrap()
}

fn type_text(store: &mut Store, text: &str) -> DispatchResult {
    store.dispatch(Action::EditorEdit {
        start_char: 0,
        end_char: 0,
        text: text.to_string(),
    })
}

struct IssuedSave {
    doc: DocumentId,
    request: u64,
    path: Option<PathBuf>,
    content: String,
}

fn save_request(effect: &Effect) -> Option<IssuedSave> {
    match effect {
        Effect::SaveFile {
            doc,
            request,
            path,
            content,
        } => Some(IssuedSave {
            doc: *doc,
            request: *request,
            path: Some(path.clone()),
            content: content.clone(),
        }),
        Effect::PickSavePath { doc, request } => Some(IssuedSave {
            doc: *doc,
            request: *request,
            path: None,
            content: String::new(),
        }),
        _ => None,
    }
}

fn issued_save(result: &DispatchResult) -> IssuedSave {
    result
        .effects
        .iter()
        .find_map(save_request)
        .expect("a save effect")
}

/// Answers `save`. A save-as gets `result` as the picked destination and,
/// when a write follows, that write succeeds.
fn complete(store: &mut Store, save: &IssuedSave, result: GatewayResult<PathBuf>) -> DispatchResult {
    if save.path.is_some() {
        return store.dispatch(Action::SaveCompleted {
            doc: save.doc,
            request: save.request,
            result,
        });
    }
    let picked = store.dispatch(Action::SavePathPicked {
        doc: save.doc,
        request: save.request,
        result,
    });
    let Some(write) = picked
        .effects
        .iter()
        .find_map(save_request)
        .filter(|w| w.path.is_some())
    else {
        return picked;
    };
    store.dispatch(Action::SaveCompleted {
        doc: write.doc,
        request: write.request,
        result: GatewayResult::Ok(write.path.unwrap()),
    })
}

fn entry(path: &str, is_dir: bool) -> DirEntry {
    DirEntry::new(PathBuf::from(path), is_dir)
}

fn load_dir(store: &mut Store, result: &DispatchResult, entries: Vec<DirEntry>) -> DispatchResult {
    let (path, generation) = result
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::LoadDir { path, generation } => Some((path.clone(), *generation)),
            _ => None,
        })
        .expect("a LoadDir effect");
    store.dispatch(Action::DirLoaded {
        path,
        generation,
        result: GatewayResult::Ok(entries),
    })
}

fn open_project(store: &mut Store) {
    let result = store.dispatch(Action::OpenFolder(PathBuf::from("/proj")));
    load_dir(
        store,
        &result,
        vec![
            entry("/proj/src", true),
            entry("/proj/Makefile", false),
            entry("/proj/main.c", false),
        ],
    );
}

#[test]
fn new_document_is_untitled_dirty_and_active() {
    let mut store = new_store();
    store.dispatch(Action::NewDocument);

    let session = &store.state().session;
    let doc = session.active_document().unwrap();
    assert_eq!(doc.path(), None);
    assert!(doc.is_dirty());
    assert_eq!(doc.name(), "Untitled-0");
    assert_eq!(store.state().window_title(), "● Untitled-0 - Arcade IDE");
}

#[test]
fn opening_the_same_file_twice_focuses_the_first_tab() {
    let mut store = new_store();
    let first = open_text(&mut store, "/proj/main.c", "int main;");
    store.dispatch(Action::NewDocument);
    let models = store.state().session.registry().model_count();

    let result = store.dispatch(Action::OpenPath(PathBuf::from("/proj/main.c")));
    assert!(result.effects.is_empty(), "an open file is not read again");
    assert_eq!(store.state().session.len(), 2);
    assert_eq!(store.state().session.active(), Some(first));
    assert_eq!(store.state().session.registry().model_count(), models);
}

#[test]
fn previews_open_without_reading_the_file() {
    let mut store = new_store();
    let result = store.dispatch(Action::OpenPath(PathBuf::from("/proj/hero.png")));
    assert!(result.effects.is_empty());

    let doc = store.state().session.active_document().unwrap();
    assert!(doc.is_preview());
    assert!(matches!(
        store.state().session.viewport().mounted(),
        Some(Surface::Preview(_))
    ));

    store.dispatch(Action::Save(None));
    assert_eq!(store.state().output.message().unwrap().level, OutputLevel::Warning);
    assert!(!store.state().session.active_document().unwrap().is_dirty());
}

#[test]
fn failed_read_reports_and_opens_nothing() {
    let mut store = new_store();
    store.dispatch(Action::FileRead {
        path: PathBuf::from("/proj/gone.c"),
        result: GatewayResult::Failed("Not found".to_string()),
    });
    assert!(store.state().session.is_empty());
    assert_eq!(store.state().output.toasts().count(), 1);
}

#[test]
fn dirty_flag_flips_on_first_edit_only() {
    let mut store = new_store();
    open_text(&mut store, "/proj/main.c", "");
    assert!(!store.state().session.active_document().unwrap().is_dirty());

    let first = type_text(&mut store, "a");
    assert!(first.state_changed);
    assert!(store.state().session.active_document().unwrap().is_dirty());
    assert_eq!(store.state().window_title(), "● main.c - Arcade IDE");

    type_text(&mut store, "b");
    assert!(store.state().session.active_document().unwrap().is_dirty());
}

#[test]
fn save_as_rebinds_path_name_and_model() {
    let mut store = new_store();
    store.dispatch(Action::NewDocument);
    type_text(&mut store, "int main(void) { return 0; }");

    let save = issued_save(&store.dispatch(Action::Save(None)));
    assert_eq!(save.path, None);

    let picked = store.dispatch(Action::SavePathPicked {
        doc: save.doc,
        request: save.request,
        result: GatewayResult::Ok(PathBuf::from("/proj/game.c")),
    });
    let write = issued_save(&picked);
    assert_eq!(write.request, save.request);
    assert_eq!(write.path.as_deref(), Some(Path::new("/proj/game.c")));
    assert_eq!(write.content, "int main(void) { return 0; }");
    assert!(store.state().session.document(save.doc).unwrap().is_dirty());

    complete(&mut store, &write, GatewayResult::Ok(PathBuf::from("/proj/game.c")));

    let session = &store.state().session;
    let doc = session.document(save.doc).unwrap();
    assert_eq!(doc.path(), Some(Path::new("/proj/game.c")));
    assert_eq!(doc.name(), "game.c");
    assert!(!doc.is_dirty());
    let model = session.model(save.doc).unwrap();
    assert_eq!(model.uri(), &ModelUri::File(PathBuf::from("/proj/game.c")));
    assert_eq!(model.content(), "int main(void) { return 0; }");
    assert_eq!(
        session.viewport().mounted(),
        Some(Surface::Model(doc.model_id().unwrap()))
    );
    assert_eq!(store.state().window_title(), "game.c - Arcade IDE");
}

#[test]
fn saving_a_clean_document_reports_nothing_to_save() {
    let mut store = new_store();
    open_text(&mut store, "/proj/main.c", "int x;");
    let result = store.dispatch(Action::Save(None));
    assert!(result.effects.is_empty());
    assert_eq!(last_message(&store), "Nothing to save in main.c.");
}

#[test]
fn canceled_save_is_neutral() {
    let mut store = new_store();
    store.dispatch(Action::NewDocument);
    let save = issued_save(&store.dispatch(Action::Save(None)));

    complete(&mut store, &save, GatewayResult::Canceled);
    assert_eq!(last_message(&store), "Save canceled.");
    assert_eq!(store.state().output.toasts().count(), 0);
    let doc = store.state().session.document(save.doc).unwrap();
    assert!(doc.is_dirty());
    assert_eq!(doc.path(), None);
}

#[test]
fn failed_save_keeps_the_document_dirty() {
    let mut store = new_store();
    open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "x");
    let save = issued_save(&store.dispatch(Action::Save(None)));

    complete(&mut store, &save, GatewayResult::Failed("disk full".to_string()));
    assert!(store.state().session.document(save.doc).unwrap().is_dirty());
    assert!(last_message(&store).contains("disk full"));
    assert_eq!(store.state().output.toasts().count(), 1);
}

#[test]
fn stale_save_responses_are_ignored() {
    let mut store = new_store();
    open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "x");
    let save = issued_save(&store.dispatch(Action::Save(None)));

    let stale = store.dispatch(Action::SaveCompleted {
        doc: save.doc,
        request: save.request + 100,
        result: GatewayResult::Ok(PathBuf::from("/proj/main.c")),
    });
    assert!(!stale.state_changed);
    assert!(store.state().session.document(save.doc).unwrap().is_dirty());
}

#[test]
fn edits_during_a_save_keep_the_document_dirty() {
    let mut store = new_store();
    open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "a");
    let save = issued_save(&store.dispatch(Action::Save(None)));
    type_text(&mut store, "b");

    complete(&mut store, &save, GatewayResult::Ok(PathBuf::from("/proj/main.c")));
    assert!(store.state().session.document(save.doc).unwrap().is_dirty());
}

#[test]
fn a_second_save_waits_for_the_first() {
    let mut store = new_store();
    open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "a");
    let first = issued_save(&store.dispatch(Action::Save(None)));
    type_text(&mut store, "b");

    let queued = store.dispatch(Action::Save(None));
    assert!(queued.effects.is_empty());
    assert_eq!(last_message(&store), "Save of main.c queued.");

    let result = complete(&mut store, &first, GatewayResult::Ok(PathBuf::from("/proj/main.c")));
    let second = issued_save(&result);
    assert_ne!(second.request, first.request);
    assert_eq!(second.content, "ba");

    complete(&mut store, &second, GatewayResult::Ok(PathBuf::from("/proj/main.c")));
    assert!(!store.state().session.document(first.doc).unwrap().is_dirty());
}

#[test]
fn invalid_json_is_blocked_before_the_gateway() {
    let mut store = new_store();
    open_text(&mut store, "/proj/level.json", "{}");
    store.dispatch(Action::EditorEdit {
        start_char: 1,
        end_char: 2,
        text: String::new(),
    });

    let result = store.dispatch(Action::Save(None));
    assert!(result.effects.is_empty());
    assert_eq!(store.state().output.message().unwrap().level, OutputLevel::Error);
    assert!(store.state().session.active_document().unwrap().is_dirty());
}

#[test]
fn closing_a_dirty_document_asks_first() {
    let mut store = new_store();
    let id = open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "x");

    store.dispatch(Action::Close(None));
    assert_eq!(store.state().ui.close_confirm.as_ref().map(|c| c.doc), Some(id));
    assert_eq!(store.state().session.len(), 1);

    store.dispatch(Action::CloseConfirmCancel);
    assert!(store.state().ui.close_confirm.is_none());
    assert_eq!(store.state().session.len(), 1);

    store.dispatch(Action::Close(None));
    store.dispatch(Action::CloseConfirmDiscard);
    assert!(store.state().session.is_empty());
    assert!(store.state().session.viewport().is_empty());
    assert_eq!(store.state().session.registry().model_count(), 0);
}

#[test]
fn save_then_close_only_closes_after_success() {
    let mut store = new_store();
    let id = open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "x");

    store.dispatch(Action::Close(Some(id)));
    let save = issued_save(&store.dispatch(Action::CloseConfirmSave));
    complete(&mut store, &save, GatewayResult::Failed("read-only".to_string()));
    assert!(store.state().session.document(id).is_some());

    store.dispatch(Action::Close(Some(id)));
    let save = issued_save(&store.dispatch(Action::CloseConfirmSave));
    complete(&mut store, &save, GatewayResult::Canceled);
    assert!(store.state().session.document(id).is_some());

    store.dispatch(Action::Close(Some(id)));
    let save = issued_save(&store.dispatch(Action::CloseConfirmSave));
    complete(&mut store, &save, GatewayResult::Ok(PathBuf::from("/proj/main.c")));
    assert!(store.state().session.document(id).is_none());
}

#[test]
fn edits_during_save_and_close_keep_the_document_open() {
    let mut store = new_store();
    let id = open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "x");

    store.dispatch(Action::Close(Some(id)));
    let save = issued_save(&store.dispatch(Action::CloseConfirmSave));
    type_text(&mut store, "LATE ");
    complete(&mut store, &save, GatewayResult::Ok(PathBuf::from("/proj/main.c")));

    let doc = store.state().session.document(id).expect("still open");
    assert!(doc.is_dirty());
    assert_eq!(store.state().session.content(id).unwrap(), "LATE x");
    assert_eq!(store.state().ui.close_confirm.as_ref().map(|c| c.doc), Some(id));
    assert_eq!(store.state().output.message().unwrap().level, OutputLevel::Warning);

    let save = issued_save(&store.dispatch(Action::CloseConfirmSave));
    assert_eq!(save.content, "LATE x");
    complete(&mut store, &save, GatewayResult::Ok(PathBuf::from("/proj/main.c")));
    assert!(store.state().session.document(id).is_none());
}

#[test]
fn a_queued_save_inherits_the_pending_close() {
    let mut store = new_store();
    let id = open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "x");

    store.dispatch(Action::Close(Some(id)));
    let first = issued_save(&store.dispatch(Action::CloseConfirmSave));
    type_text(&mut store, "y");
    store.dispatch(Action::Save(None));

    let result = complete(&mut store, &first, GatewayResult::Ok(PathBuf::from("/proj/main.c")));
    assert!(store.state().session.document(id).is_some());
    assert!(store.state().ui.close_confirm.is_none());
    let second = issued_save(&result);
    assert_eq!(second.content, "yx");

    complete(&mut store, &second, GatewayResult::Ok(PathBuf::from("/proj/main.c")));
    assert!(store.state().session.document(id).is_none());
}

#[test]
fn closing_the_active_document_activates_the_last_one() {
    let mut store = new_store();
    let a = open_text(&mut store, "/proj/a.c", "");
    let b = open_text(&mut store, "/proj/b.c", "");
    let c = open_text(&mut store, "/proj/c.c", "");
    store.dispatch(Action::Activate(a));

    store.dispatch(Action::Close(None));
    assert_eq!(store.state().session.active(), Some(c));
    store.dispatch(Action::Close(Some(b)));
    assert_eq!(store.state().session.active(), Some(c));
}

#[test]
fn run_saves_then_builds() {
    let mut store = new_store();
    let id = open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "int main;");

    let save = issued_save(&store.dispatch(Action::Run));
    let result = complete(&mut store, &save, GatewayResult::Ok(PathBuf::from("/proj/main.c")));
    assert!(result.effects.contains(&Effect::RunOrBuild {
        doc: id,
        path: PathBuf::from("/proj/main.c"),
        content: "int main;".to_string(),
    }));

    store.dispatch(Action::BuildFinished {
        doc: id,
        result: GatewayResult::Ok(BuildOutput {
            success: true,
            output: "cc main.c".to_string(),
        }),
    });
    let history: Vec<_> = store.state().output.history().collect();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, "cc main.c");
    assert_eq!(history[0].level, OutputLevel::Success);
}

#[test]
fn run_of_a_clean_document_builds_immediately() {
    let mut store = new_store();
    let id = open_text(&mut store, "/proj/main.c", "int x;");
    let result = store.dispatch(Action::Run);
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::RunOrBuild { doc, .. }] if *doc == id
    ));
}

#[test]
fn no_build_after_a_canceled_save() {
    let mut store = new_store();
    store.dispatch(Action::NewDocument);
    let save = issued_save(&store.dispatch(Action::Run));
    let result = complete(&mut store, &save, GatewayResult::Canceled);
    assert!(result.effects.is_empty());
}

#[test]
fn failed_build_raises_an_error() {
    let mut store = new_store();
    let id = open_text(&mut store, "/proj/main.c", "int x;");
    store.dispatch(Action::BuildFinished {
        doc: id,
        result: GatewayResult::Ok(BuildOutput {
            success: false,
            output: "main.c:1: error".to_string(),
        }),
    });
    assert_eq!(last_message(&store), "Build of main.c failed.");
    assert_eq!(store.state().output.toasts().count(), 1);
}

#[test]
fn run_without_a_document_warns() {
    let mut store = new_store();
    let result = store.dispatch(Action::Run);
    assert!(result.effects.is_empty());
    assert_eq!(last_message(&store), "Open a file to run.");
}

#[test]
fn autosave_triggers_on_the_dirty_transition() {
    let mut store = store_with(|c| c.auto_save = true);
    open_text(&mut store, "/proj/main.c", "");

    let first = type_text(&mut store, "a");
    let save = issued_save(&first);
    assert_eq!(save.path, Some(PathBuf::from("/proj/main.c")));

    let second = type_text(&mut store, "b");
    assert!(second.effects.is_empty());

    let result = complete(&mut store, &save, GatewayResult::Ok(PathBuf::from("/proj/main.c")));
    let follow_up = issued_save(&result);
    assert_eq!(follow_up.content, "ba");
}

#[test]
fn autosave_skips_untitled_documents() {
    let mut store = store_with(|c| c.auto_save = true);
    store.dispatch(Action::NewDocument);
    assert!(type_text(&mut store, "a").effects.is_empty());
}

#[test]
fn open_folder_loads_the_tree_and_remembers_it() {
    let mut store = new_store();
    let result = store.dispatch(Action::OpenFolder(PathBuf::from("/proj")));

    assert!(result.effects.contains(&Effect::PersistSetting {
        key: "lastOpenFolder",
        value: Value::String("/proj".to_string()),
    }));
    assert!(result.effects.contains(&Effect::PersistSetting {
        key: "recentFolders",
        value: serde_json::json!(["/proj"]),
    }));
    load_dir(&mut store, &result, vec![entry("/proj/main.c", false)]);
    assert_eq!(store.state().session.root(), Some(Path::new("/proj")));
    assert_eq!(store.state().explorer.rows.len(), 1);
}

#[test]
fn recent_folders_are_deduplicated_and_capped() {
    let mut store = new_store();
    for i in 0..6 {
        store.dispatch(Action::OpenFolder(PathBuf::from(format!("/p{}", i))));
    }
    store.dispatch(Action::OpenFolder(PathBuf::from("/p3")));

    let recent = &store.state().config.recent_folders;
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0], PathBuf::from("/p3"));
    assert_eq!(recent.iter().filter(|p| *p == Path::new("/p3")).count(), 1);

    let result = store.dispatch(Action::ClearRecentFolders);
    assert_eq!(
        result.effects,
        vec![Effect::PersistSetting {
            key: "recentFolders",
            value: serde_json::json!([]),
        }]
    );
    assert!(store.state().config.recent_folders.is_empty());
}

#[test]
fn switching_folders_keeps_tabs_by_default() {
    let mut store = new_store();
    open_project(&mut store);
    open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "x");

    store.dispatch(Action::OpenFolder(PathBuf::from("/other")));
    assert_eq!(store.state().session.len(), 1);
    assert_eq!(store.state().session.root(), Some(Path::new("/other")));
}

#[test]
fn closing_tabs_on_switch_is_blocked_by_unsaved_changes() {
    let mut store = store_with(|c| c.close_tabs_on_folder_switch = true);
    open_project(&mut store);
    open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "x");

    let result = store.dispatch(Action::OpenFolder(PathBuf::from("/other")));
    assert!(result.effects.is_empty());
    assert_eq!(store.state().session.root(), Some(Path::new("/proj")));

    let save = issued_save(&store.dispatch(Action::Save(None)));
    complete(&mut store, &save, GatewayResult::Ok(PathBuf::from("/proj/main.c")));
    store.dispatch(Action::OpenFolder(PathBuf::from("/other")));
    assert!(store.state().session.is_empty());
    assert_eq!(store.state().session.root(), Some(Path::new("/other")));
}

#[test]
fn close_folder_returns_to_placeholder() {
    let mut store = new_store();
    open_project(&mut store);

    let result = store.dispatch(Action::CloseFolder);
    assert_eq!(
        result.effects,
        vec![Effect::PersistSetting {
            key: "lastOpenFolder",
            value: Value::Null,
        }]
    );
    assert!(!store.state().explorer.is_open());
    assert_eq!(store.state().session.root(), None);
    assert!(!store.dispatch(Action::CloseFolder).state_changed);
}

#[test]
fn folder_picker_cancel_is_neutral() {
    let mut store = new_store();
    assert_eq!(
        store.dispatch(Action::OpenFolderDialog).effects,
        vec![Effect::PickFolder]
    );
    store.dispatch(Action::FolderPicked(GatewayResult::Canceled));
    assert!(!store.state().explorer.is_open());
    assert_eq!(store.state().output.toasts().count(), 0);
}

#[test]
fn activating_tree_entries() {
    let mut store = new_store();
    open_project(&mut store);

    let result = store.dispatch(Action::ExplorerActivate(PathBuf::from("/proj/main.c")));
    assert_eq!(result.effects, vec![Effect::ReadFile(PathBuf::from("/proj/main.c"))]);

    let result = store.dispatch(Action::ExplorerActivate(PathBuf::from("/proj/src")));
    assert!(matches!(result.effects.as_slice(), [Effect::LoadDir { .. }]));
    assert!(store.state().session.is_empty(), "folders never touch the session");
}

#[test]
fn new_file_is_validated_created_and_opened() {
    let mut store = new_store();
    open_project(&mut store);
    let root = PathBuf::from("/proj");

    for bad in ["", "a/b.c", "..", "notes.txt"] {
        let result = store.dispatch(Action::ExplorerNewFile {
            parent: root.clone(),
            name: bad.to_string(),
        });
        assert!(result.effects.is_empty(), "{:?} should be rejected", bad);
    }
    let exists = store.dispatch(Action::ExplorerNewFile {
        parent: root.clone(),
        name: "main.c".to_string(),
    });
    assert!(exists.effects.is_empty());

    let result = store.dispatch(Action::ExplorerNewFile {
        parent: root.clone(),
        name: "player.c".to_string(),
    });
    assert_eq!(result.effects, vec![Effect::CreateFile(root.join("player.c"))]);

    let created = store.dispatch(Action::PathCreated {
        path: root.join("player.c"),
        is_dir: false,
        result: GatewayResult::Ok(()),
    });
    assert!(matches!(created.effects.as_slice(), [Effect::LoadDir { .. }]));
    let doc = store.state().session.active_document().unwrap();
    assert_eq!(doc.name(), "player.c");
    assert!(!doc.is_dirty());
}

#[test]
fn new_folder_accepts_any_valid_name() {
    let mut store = new_store();
    open_project(&mut store);
    let result = store.dispatch(Action::ExplorerNewFolder {
        parent: PathBuf::from("/proj"),
        name: "levels".to_string(),
    });
    assert_eq!(
        result.effects,
        vec![Effect::CreateFolder(PathBuf::from("/proj/levels"))]
    );
}

#[test]
fn creating_entries_needs_an_open_folder() {
    let mut store = new_store();
    let result = store.dispatch(Action::ExplorerNewFile {
        parent: PathBuf::from("/proj"),
        name: "a.c".to_string(),
    });
    assert!(result.effects.is_empty());
    assert_eq!(last_message(&store), "Open a folder first.");
}

#[test]
fn rename_follows_the_open_document_and_keeps_it_dirty() {
    let mut store = new_store();
    open_project(&mut store);
    let id = open_text(&mut store, "/proj/main.c", "int x;");
    type_text(&mut store, "// ");

    let result = store.dispatch(Action::ExplorerRename {
        path: PathBuf::from("/proj/main.c"),
        new_name: "game.c".to_string(),
    });
    assert_eq!(
        result.effects,
        vec![Effect::RenamePath {
            from: PathBuf::from("/proj/main.c"),
            to: PathBuf::from("/proj/game.c"),
        }]
    );

    let renamed = store.dispatch(Action::PathRenamed {
        from: PathBuf::from("/proj/main.c"),
        to: PathBuf::from("/proj/game.c"),
        result: GatewayResult::Ok(()),
    });
    assert!(matches!(renamed.effects.as_slice(), [Effect::LoadDir { .. }]));

    let session = &store.state().session;
    let doc = session.document(id).unwrap();
    assert_eq!(doc.path(), Some(Path::new("/proj/game.c")));
    assert_eq!(doc.name(), "game.c");
    assert!(doc.is_dirty());
    assert_eq!(session.content(id).unwrap(), "// int x;");
    assert_eq!(
        session.model(id).unwrap().uri(),
        &ModelUri::File(PathBuf::from("/proj/game.c"))
    );
}

#[test]
fn renaming_a_folder_moves_documents_inside_it() {
    let mut store = new_store();
    open_project(&mut store);
    let id = open_text(&mut store, "/proj/src/player.c", "");

    store.dispatch(Action::PathRenamed {
        from: PathBuf::from("/proj/src"),
        to: PathBuf::from("/proj/code"),
        result: GatewayResult::Ok(()),
    });
    assert_eq!(
        store.state().session.document(id).unwrap().path(),
        Some(Path::new("/proj/code/player.c"))
    );
}

#[test]
fn rename_is_refused_for_the_root_and_existing_targets() {
    let mut store = new_store();
    open_project(&mut store);

    let root = store.dispatch(Action::ExplorerRename {
        path: PathBuf::from("/proj"),
        new_name: "x".to_string(),
    });
    assert!(root.effects.is_empty());

    let clash = store.dispatch(Action::ExplorerRename {
        path: PathBuf::from("/proj/main.c"),
        new_name: "Makefile".to_string(),
    });
    assert!(clash.effects.is_empty());
    assert!(last_message(&store).contains("already exists"));
}

#[test]
fn failed_rename_leaves_documents_alone() {
    let mut store = new_store();
    open_project(&mut store);
    let id = open_text(&mut store, "/proj/main.c", "");

    store.dispatch(Action::PathRenamed {
        from: PathBuf::from("/proj/main.c"),
        to: PathBuf::from("/proj/game.c"),
        result: GatewayResult::Failed("permission denied".to_string()),
    });
    assert_eq!(
        store.state().session.document(id).unwrap().path(),
        Some(Path::new("/proj/main.c"))
    );
}

#[test]
fn delete_asks_for_confirmation_then_closes_documents() {
    let mut store = new_store();
    open_project(&mut store);
    open_text(&mut store, "/proj/main.c", "");
    type_text(&mut store, "unsaved");

    let result = store.dispatch(Action::ExplorerDelete(PathBuf::from("/proj/main.c")));
    assert!(result.effects.is_empty());
    assert!(store.state().ui.confirm_dialog.visible);

    store.dispatch(Action::ConfirmDialogCancel);
    assert!(!store.state().ui.confirm_dialog.visible);
    assert_eq!(last_message(&store), "Delete canceled.");

    store.dispatch(Action::ExplorerDelete(PathBuf::from("/proj/main.c")));
    let accepted = store.dispatch(Action::ConfirmDialogAccept);
    assert_eq!(
        accepted.effects,
        vec![Effect::DeletePath {
            path: PathBuf::from("/proj/main.c"),
            is_dir: false,
        }]
    );

    let deleted = store.dispatch(Action::PathDeleted {
        path: PathBuf::from("/proj/main.c"),
        result: GatewayResult::Ok(()),
    });
    assert!(matches!(deleted.effects.as_slice(), [Effect::LoadDir { .. }]));
    assert!(store.state().session.is_empty());
}

#[test]
fn the_workspace_root_cannot_be_deleted() {
    let mut store = new_store();
    open_project(&mut store);
    store.dispatch(Action::ExplorerDelete(PathBuf::from("/proj")));
    assert!(!store.state().ui.confirm_dialog.visible);
}

#[test]
fn saving_over_an_open_path_closes_the_other_tab() {
    let mut store = new_store();
    let existing = open_text(&mut store, "/proj/game.c", "old");
    store.dispatch(Action::NewDocument);
    type_text(&mut store, "new");

    let save = issued_save(&store.dispatch(Action::Save(None)));
    complete(&mut store, &save, GatewayResult::Ok(PathBuf::from("/proj/game.c")));

    let session = &store.state().session;
    assert!(session.document(existing).is_none());
    assert_eq!(session.find_by_path(Path::new("/proj/game.c")), Some(save.doc));
    assert_eq!(session.len(), 1);
}

#[test]
fn save_as_onto_a_tab_with_unsaved_changes_is_refused() {
    let mut store = new_store();
    let existing = open_text(&mut store, "/proj/game.c", "old");
    type_text(&mut store, "UNSAVED WORK ");
    store.dispatch(Action::NewDocument);
    type_text(&mut store, "new");

    let save = issued_save(&store.dispatch(Action::Save(None)));
    let picked = store.dispatch(Action::SavePathPicked {
        doc: save.doc,
        request: save.request,
        result: GatewayResult::Ok(PathBuf::from("/proj/game.c")),
    });
    assert!(picked.effects.is_empty(), "nothing is written");
    assert!(last_message(&store).contains("game.c is open with unsaved changes"));

    let session = &store.state().session;
    assert_eq!(session.content(existing).unwrap(), "UNSAVED WORK old");
    assert!(session.document(existing).unwrap().is_dirty());
    let fresh = session.document(save.doc).unwrap();
    assert_eq!(fresh.path(), None);
    assert!(fresh.is_dirty());
    assert!(!fresh.save_in_flight());

    let retry = store.dispatch(Action::Save(None));
    assert!(matches!(retry.effects.as_slice(), [Effect::PickSavePath { .. }]));
}

#[test]
fn a_tab_edited_while_its_path_is_written_is_not_closed() {
    let mut store = new_store();
    let existing = open_text(&mut store, "/proj/game.c", "old");
    store.dispatch(Action::NewDocument);
    type_text(&mut store, "new");

    let save = issued_save(&store.dispatch(Action::Save(None)));
    let write = issued_save(&store.dispatch(Action::SavePathPicked {
        doc: save.doc,
        request: save.request,
        result: GatewayResult::Ok(PathBuf::from("/proj/game.c")),
    }));
    store.dispatch(Action::Activate(existing));
    type_text(&mut store, "late ");
    complete(&mut store, &write, GatewayResult::Ok(PathBuf::from("/proj/game.c")));

    let session = &store.state().session;
    assert_eq!(session.len(), 2);
    assert_eq!(session.content(existing).unwrap(), "late old");
    assert_eq!(session.find_by_path(Path::new("/proj/game.c")), Some(existing));
    assert_eq!(session.document(save.doc).unwrap().path(), None);
    assert!(session.document(save.doc).unwrap().is_dirty());
    assert_eq!(store.state().output.message().unwrap().level, OutputLevel::Error);
}

#[test]
fn saving_with_a_workspace_open_refreshes_the_tree() {
    let mut store = new_store();
    open_project(&mut store);
    store.dispatch(Action::NewDocument);
    let save = issued_save(&store.dispatch(Action::Save(None)));
    let result = complete(&mut store, &save, GatewayResult::Ok(PathBuf::from("/proj/new.c")));
    assert!(matches!(result.effects.as_slice(), [Effect::LoadDir { .. }]));
}

#[test]
fn startup_reopens_the_last_folder() {
    let mut store = store_with(|c| c.last_open_folder = Some(PathBuf::from("/proj")));
    let result = store.startup();
    assert!(result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::LoadDir { path, .. } if path == Path::new("/proj"))));
    assert_eq!(store.state().session.root(), Some(Path::new("/proj")));

    assert!(new_store().startup().effects.is_empty());
}

#[test]
fn shutdown_flushes_folder_settings() {
    let mut store = new_store();
    open_project(&mut store);
    assert_eq!(
        store.shutdown(),
        vec![
            Effect::PersistSetting {
                key: "lastOpenFolder",
                value: Value::String("/proj".to_string()),
            },
            Effect::PersistSetting {
                key: "recentFolders",
                value: serde_json::json!(["/proj"]),
            },
        ]
    );

    store.dispatch(Action::CloseFolder);
    assert_eq!(
        store.shutdown()[0],
        Effect::PersistSetting {
            key: "lastOpenFolder",
            value: Value::Null,
        }
    );
}

#[test]
fn clear_output() {
    let mut store = new_store();
    store.dispatch(Action::Run);
    assert!(store.dispatch(Action::ClearOutput).state_changed);
    assert!(!store.dispatch(Action::ClearOutput).state_changed);
}
