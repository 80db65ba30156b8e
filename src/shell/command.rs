//! Line commands understood by the shell.

use std::path::{Path, PathBuf};

use arcade_ide::kernel::{Action, AppState, DocumentId};

#[derive(Debug, Clone)]
pub enum Command {
    Dispatch(Action),
    Help,
    Tabs,
    Tree,
    Recent,
    Show,
    Quit,
}

pub const HELP: &str = "\
new                      new untitled C file
open [path]              open a file (picker without a path)
folder [path]            open a folder (picker without a path)
close-folder             close the workspace folder
recent                   list recent folders
recent clear             forget recent folders
tabs                     list open documents
switch <n>               activate document n
save [n]                 save document n (default: active)
close [n]                close document n (default: active)
confirm save|discard|cancel
                         answer the unsaved-changes prompt
yes | no                 answer the delete prompt
type <text>              insert text at the cursor (\\n, \\t escapes)
replace <start> <end> [text]
                         replace a char range of the active document
goto <row> <col>         move the cursor
scroll <line>            scroll the active document
show                     print the active document
run                      save and build the active document
tree                     print the project tree
toggle <path>            expand or collapse a folder
activate <path>          open a file or toggle a folder from the tree
touch <dir> <name>       create a file in a workspace folder
mkdir <dir> <name>       create a folder in a workspace folder
mv <path> <new-name>     rename a file or folder
rm <path>                delete a file or folder
clear                    clear the output
help                     this text
quit";

/// Parses one input line. `Ok(None)` for blank lines.
pub fn parse(line: &str, state: &AppState) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let action = match word {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "tabs" => return Ok(Some(Command::Tabs)),
        "tree" => return Ok(Some(Command::Tree)),
        "show" => return Ok(Some(Command::Show)),
        "new" => Action::NewDocument,
        "open" if rest.is_empty() => Action::OpenFileDialog,
        "open" => Action::OpenPath(resolve(rest, state)),
        "folder" if rest.is_empty() => Action::OpenFolderDialog,
        "folder" => Action::OpenFolder(resolve(rest, state)),
        "close-folder" => Action::CloseFolder,
        "recent" => match args.as_slice() {
            [] => return Ok(Some(Command::Recent)),
            ["clear"] => Action::ClearRecentFolders,
            _ => return Err("usage: recent [clear]".to_string()),
        },
        "switch" => Action::Activate(document_at(state, args.first().copied())?),
        "save" => Action::Save(optional_document(state, args.first().copied())?),
        "close" => Action::Close(optional_document(state, args.first().copied())?),
        "confirm" => match args.as_slice() {
            ["save"] => Action::CloseConfirmSave,
            ["discard"] => Action::CloseConfirmDiscard,
            ["cancel"] => Action::CloseConfirmCancel,
            _ => return Err("usage: confirm save|discard|cancel".to_string()),
        },
        "yes" => Action::ConfirmDialogAccept,
        "no" => Action::ConfirmDialogCancel,
        "type" => {
            let at = cursor_offset(state).ok_or("no document to type into")?;
            Action::EditorEdit {
                start_char: at,
                end_char: at,
                text: unescape(rest),
            }
        }
        "replace" => {
            let mut parts = rest.splitn(3, char::is_whitespace);
            let start = number(parts.next(), "start")?;
            let end = number(parts.next(), "end")?;
            Action::EditorEdit {
                start_char: start,
                end_char: end,
                text: unescape(parts.next().unwrap_or("")),
            }
        }
        "goto" => Action::EditorSetCursor {
            row: number(args.first().copied(), "row")?,
            col: number(args.get(1).copied(), "col")?,
        },
        "scroll" => Action::EditorScrollTo {
            line: number(args.first().copied(), "line")?,
        },
        "run" => Action::Run,
        "toggle" => Action::ExplorerToggle(resolve(required(rest, "path")?, state)),
        "activate" => Action::ExplorerActivate(resolve(required(rest, "path")?, state)),
        "touch" | "mkdir" => {
            let [dir, name] = args.as_slice() else {
                return Err(format!("usage: {} <dir> <name>", word));
            };
            let parent = resolve(dir, state);
            let name = name.to_string();
            if word == "touch" {
                Action::ExplorerNewFile { parent, name }
            } else {
                Action::ExplorerNewFolder { parent, name }
            }
        }
        "mv" => {
            let [path, new_name] = args.as_slice() else {
                return Err("usage: mv <path> <new-name>".to_string());
            };
            Action::ExplorerRename {
                path: resolve(path, state),
                new_name: new_name.to_string(),
            }
        }
        "rm" => Action::ExplorerDelete(resolve(required(rest, "path")?, state)),
        "clear" => Action::ClearOutput,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(Command::Dispatch(action)))
}

/// Relative paths are taken from the workspace root when one is open.
fn resolve(arg: &str, state: &AppState) -> PathBuf {
    let path = Path::new(arg.trim());
    match state.session.root() {
        Some(root) if path.is_relative() => {
            if path == Path::new(".") {
                root.to_path_buf()
            } else {
                root.join(path)
            }
        }
        _ => path.to_path_buf(),
    }
}

fn required<'a>(rest: &'a str, what: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("missing <{}>", what))
    } else {
        Ok(rest)
    }
}

fn number(arg: Option<&str>, what: &str) -> Result<usize, String> {
    let arg = arg.ok_or_else(|| format!("missing <{}>", what))?;
    arg.parse()
        .map_err(|_| format!("<{}> must be a number, got '{}'", what, arg))
}

fn document_at(state: &AppState, arg: Option<&str>) -> Result<DocumentId, String> {
    let n = number(arg, "n")?;
    n.checked_sub(1)
        .and_then(|i| state.session.documents().get(i))
        .map(|doc| doc.id())
        .ok_or_else(|| format!("no document {}", n))
}

fn optional_document(state: &AppState, arg: Option<&str>) -> Result<Option<DocumentId>, String> {
    arg.map(|a| document_at(state, Some(a))).transpose()
}

fn cursor_offset(state: &AppState) -> Option<usize> {
    let id = state.session.active()?;
    let buffer = state.session.model(id)?.buffer();
    Some(buffer.pos_to_char(buffer.cursor()))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/shell/command.rs"]
mod tests;
