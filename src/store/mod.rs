//! File-backed record store for memos and users.
//!
//! The whole data set lives in memory and is written back as one JSON
//! snapshot after every mutation. Writes go to a sibling temp file that is
//! renamed over the data file, so a crash never leaves a half-written file.
//! A mutation is applied to a copy first; the in-memory state only changes
//! once the snapshot is on disk.

mod error;
mod records;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use error::{RecordKind, StoreError};
pub use records::{MIN_NAME_CHARS, Memo, MemoDraft, User, UserDraft, is_valid_email};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    next_memo_id: u64,
    next_user_id: u64,
    memos: Vec<Memo>,
    users: Vec<User>,
}

impl Snapshot {
    fn memo_index(&self, id: u64) -> Result<usize> {
        self.memos
            .iter()
            .position(|memo| memo.id == id)
            .ok_or(StoreError::NotFound {
                kind: RecordKind::Memo,
                id,
            })
    }

    fn user_index(&self, id: u64) -> Result<usize> {
        self.users
            .iter()
            .position(|user| user.id == id)
            .ok_or(StoreError::NotFound {
                kind: RecordKind::User,
                id,
            })
    }

    fn ensure_email_free(&self, email: &str, except: Option<u64>) -> Result<()> {
        let taken = self
            .users
            .iter()
            .any(|user| Some(user.id) != except && user.email.eq_ignore_ascii_case(email));
        if taken {
            return Err(StoreError::validation(format!("{email} is already registered")));
        }
        Ok(())
    }
}

/// Memo and user records, optionally persisted to a JSON file.
#[derive(Debug, Clone, Default)]
pub struct Store {
    path: Option<PathBuf>,
    data: Snapshot,
}

impl Store {
    /// Open the store at `path`. A missing file is an empty store; it is
    /// created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no data file yet, starting empty");
                Snapshot::default()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!(
            path = %path.display(),
            memos = data.memos.len(),
            users = data.users.len(),
            "opened store"
        );
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All memos, most recently updated first.
    pub fn memos(&self) -> Vec<Memo> {
        let mut memos = self.data.memos.clone();
        memos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        memos
    }

    pub fn memo(&self, id: u64) -> Result<&Memo> {
        let idx = self.data.memo_index(id)?;
        Ok(&self.data.memos[idx])
    }

    pub fn create_memo(&mut self, draft: &MemoDraft) -> Result<Memo> {
        let draft = draft.validated()?;
        let mut next = self.data.clone();
        next.next_memo_id += 1;
        let now = Utc::now();
        let memo = Memo {
            id: next.next_memo_id,
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
        };
        next.memos.push(memo.clone());
        self.commit(next)?;
        info!(id = memo.id, "created memo");
        Ok(memo)
    }

    pub fn update_memo(&mut self, id: u64, draft: &MemoDraft) -> Result<Memo> {
        let draft = draft.validated()?;
        let mut next = self.data.clone();
        let idx = next.memo_index(id)?;
        let memo = &mut next.memos[idx];
        memo.title = draft.title;
        memo.content = draft.content;
        memo.updated_at = Utc::now();
        let memo = memo.clone();
        self.commit(next)?;
        info!(id, "updated memo");
        Ok(memo)
    }

    pub fn delete_memo(&mut self, id: u64) -> Result<()> {
        let mut next = self.data.clone();
        let idx = next.memo_index(id)?;
        next.memos.remove(idx);
        self.commit(next)?;
        info!(id, "deleted memo");
        Ok(())
    }

    /// All users in creation order.
    pub fn users(&self) -> Vec<User> {
        let mut users = self.data.users.clone();
        users.sort_by_key(|user| user.id);
        users
    }

    pub fn user(&self, id: u64) -> Result<&User> {
        let idx = self.data.user_index(id)?;
        Ok(&self.data.users[idx])
    }

    pub fn create_user(&mut self, draft: &UserDraft) -> Result<User> {
        let draft = draft.validated()?;
        self.data.ensure_email_free(&draft.email, None)?;
        let mut next = self.data.clone();
        next.next_user_id += 1;
        let user = User {
            id: next.next_user_id,
            name: draft.name,
            email: draft.email,
        };
        next.users.push(user.clone());
        self.commit(next)?;
        info!(id = user.id, "created user");
        Ok(user)
    }

    pub fn update_user(&mut self, id: u64, draft: &UserDraft) -> Result<User> {
        let draft = draft.validated()?;
        let mut next = self.data.clone();
        let idx = next.user_index(id)?;
        next.ensure_email_free(&draft.email, Some(id))?;
        let user = &mut next.users[idx];
        user.name = draft.name;
        user.email = draft.email;
        let user = user.clone();
        self.commit(next)?;
        info!(id, "updated user");
        Ok(user)
    }

    pub fn delete_user(&mut self, id: u64) -> Result<()> {
        let mut next = self.data.clone();
        let idx = next.user_index(id)?;
        next.users.remove(idx);
        self.commit(next)?;
        info!(id, "deleted user");
        Ok(())
    }

    /// Persist `next` and make it the current state.
    fn commit(&mut self, next: Snapshot) -> Result<()> {
        if let Some(path) = &self.path {
            write_snapshot(path, &next)?;
        }
        self.data = next;
        Ok(())
    }
}

fn write_snapshot(path: &Path, data: &Snapshot) -> Result<()> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(data).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json).map_err(io_err)?;
    fs::rename(&temp_path, path).map_err(io_err)?;
    debug!(path = %path.display(), "wrote snapshot");
    Ok(())
}
