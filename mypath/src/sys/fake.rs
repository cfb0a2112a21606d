//! An in-memory [`Host`] for tests.

use std::collections::{HashMap, VecDeque};
use std::ffi::{OsStr, OsString};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{Credentials, FileKind, FileStat, Host};

/// Symlink hops followed before giving up with `ELOOP`.
const MAX_SYMLINK_HOPS: usize = 40;

#[derive(Debug)]
enum Entry {
    Dir {
        uid: u32,
    },
    File {
        uid: u32,
    },
    Symlink {
        uid: u32,
        /// Answers handed out by successive `readlink` calls before `target`.
        scripted: Mutex<VecDeque<OsString>>,
        target: OsString,
    },
}

impl Entry {
    fn stat(&self) -> FileStat {
        let (kind, uid) = match self {
            Self::Dir { uid } => (FileKind::Directory, *uid),
            Self::File { uid } => (FileKind::Regular, *uid),
            Self::Symlink { uid, .. } => (FileKind::Symlink, *uid),
        };
        FileStat { kind, uid }
    }
}

/// Mock host with a scripted filesystem, identity and environment.
///
/// Entries are keyed by absolute path. Adding an entry creates any missing
/// parent directories, owned by root. Symbolic links may be scripted to
/// return different targets on successive reads, which is how a link that
/// changes underneath a reader is simulated.
///
/// # Examples
///
/// ```
/// use mypath::sys::{FakeHost, Host};
/// use std::path::Path;
///
/// let host = FakeHost::new()
///     .with_file("/opt/app/bin/app", 0)
///     .with_symlink("/usr/bin/app", "/opt/app/bin/app");
///
/// let real = host.canonicalize(Path::new("/usr/bin/app")).unwrap();
/// assert_eq!(real, Path::new("/opt/app/bin/app"));
/// ```
#[derive(Debug)]
pub struct FakeHost {
    entries: HashMap<PathBuf, Entry>,
    pid: u32,
    credentials: Credentials,
    env: HashMap<String, OsString>,
    cwd: Option<PathBuf>,
    loader_module: Option<OsString>,
    link_reads: AtomicUsize,
    calls: AtomicUsize,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// Create a host with only a root-owned `/`, pid 4242 and an
    /// unprivileged identity (uid/gid 1000).
    #[must_use]
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(PathBuf::from("/"), Entry::Dir { uid: 0 });
        Self {
            entries,
            pid: 4242,
            credentials: Credentials::user(1000),
            env: HashMap::new(),
            cwd: None,
            loader_module: None,
            link_reads: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    fn insert(mut self, path: impl AsRef<Path>, entry: Entry) -> Self {
        let path = path.as_ref();
        for parent in path.ancestors().skip(1) {
            if parent.as_os_str().is_empty() {
                break;
            }
            self.entries
                .entry(parent.to_path_buf())
                .or_insert(Entry::Dir { uid: 0 });
        }
        self.entries.insert(path.to_path_buf(), entry);
        self
    }

    /// Add a directory owned by `uid`.
    #[must_use]
    pub fn with_dir(self, path: impl AsRef<Path>, uid: u32) -> Self {
        self.insert(path, Entry::Dir { uid })
    }

    /// Add a regular file owned by `uid`.
    #[must_use]
    pub fn with_file(self, path: impl AsRef<Path>, uid: u32) -> Self {
        self.insert(path, Entry::File { uid })
    }

    /// Add a root-owned symbolic link with a fixed target.
    #[must_use]
    pub fn with_symlink(self, path: impl AsRef<Path>, target: impl AsRef<OsStr>) -> Self {
        self.with_changing_symlink(path, Vec::<OsString>::new(), target)
    }

    /// Add a symbolic link whose first reads return `scripted` in order,
    /// after which every read (and every traversal) sees `target`.
    #[must_use]
    pub fn with_changing_symlink<I, S>(
        self,
        path: impl AsRef<Path>,
        scripted: I,
        target: impl AsRef<OsStr>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let scripted = scripted
            .into_iter()
            .map(|s| s.as_ref().to_os_string())
            .collect();
        self.insert(
            path,
            Entry::Symlink {
                uid: 0,
                scripted: Mutex::new(scripted),
                target: target.as_ref().to_os_string(),
            },
        )
    }

    /// Set the process id.
    #[must_use]
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    /// Set the process credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.env.insert(key.to_string(), value.as_ref().to_os_string());
        self
    }

    /// Set the working directory reported by `getcwd`.
    #[must_use]
    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Set the module name the dynamic loader reports.
    #[must_use]
    pub fn with_loader_module(mut self, name: impl AsRef<OsStr>) -> Self {
        self.loader_module = Some(name.as_ref().to_os_string());
        self
    }

    /// Number of `readlink` calls made so far.
    #[must_use]
    pub fn link_reads(&self) -> usize {
        self.link_reads.load(Ordering::SeqCst)
    }

    /// Number of host calls of any kind made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        match &self.cwd {
            Some(cwd) if path.is_relative() => cwd.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Resolve `path` component by component, following every symbolic
    /// link except possibly the last one.
    fn walk(&self, path: &Path, follow_last: bool) -> io::Result<PathBuf> {
        let mut pending: VecDeque<OsString> = self
            .absolute(path)
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_os_string()),
                Component::ParentDir => Some(OsString::from("..")),
                _ => None,
            })
            .collect();
        let mut resolved = PathBuf::from("/");
        let mut hops = 0;

        while let Some(part) = pending.pop_front() {
            if part == ".." {
                resolved.pop();
                continue;
            }
            let candidate = resolved.join(&part);
            let entry = self
                .entries
                .get(&candidate)
                .ok_or_else(|| io::Error::from_raw_os_error(libc::ENOENT))?;
            match entry {
                Entry::Symlink { target, .. } if follow_last || !pending.is_empty() => {
                    hops += 1;
                    if hops > MAX_SYMLINK_HOPS {
                        return Err(io::Error::from_raw_os_error(libc::ELOOP));
                    }
                    let target = Path::new(target);
                    if target.is_absolute() {
                        resolved = PathBuf::from("/");
                    }
                    for component in target.components().rev() {
                        match component {
                            Component::Normal(name) => pending.push_front(name.to_os_string()),
                            Component::ParentDir => pending.push_front(OsString::from("..")),
                            _ => {}
                        }
                    }
                }
                Entry::Dir { .. } => resolved = candidate,
                _ if pending.is_empty() => resolved = candidate,
                _ => return Err(io::Error::from_raw_os_error(libc::ENOTDIR)),
            }
        }
        Ok(resolved)
    }

    fn entry(&self, path: &Path, follow_last: bool) -> io::Result<&Entry> {
        let resolved = self.walk(path, follow_last)?;
        self.entries
            .get(&resolved)
            .ok_or_else(|| io::Error::from_raw_os_error(libc::ENOENT))
    }
}

impl Host for FakeHost {
    fn metadata(&self, path: &Path) -> io::Result<FileStat> {
        self.record();
        self.entry(path, true).map(Entry::stat)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat> {
        self.record();
        self.entry(path, false).map(Entry::stat)
    }

    fn read_link_into(&self, path: &Path, buf: &mut [u8]) -> io::Result<usize> {
        self.record();
        self.link_reads.fetch_add(1, Ordering::SeqCst);
        let Entry::Symlink {
            scripted, target, ..
        } = self.entry(path, false)?
        else {
            return Err(io::Error::from_raw_os_error(libc::EINVAL));
        };
        let answer = scripted
            .lock()
            .map_err(|_| io::Error::other("poisoned link script"))?
            .pop_front()
            .unwrap_or_else(|| target.clone());
        let bytes = answer.as_bytes();
        let n = bytes.len().min(buf.len());
        buf[..n].copy_from_slice(&bytes[..n]);
        Ok(n)
    }

    fn current_dir_into(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.record();
        let cwd = self
            .cwd
            .as_ref()
            .ok_or_else(|| io::Error::from_raw_os_error(libc::ENOENT))?;
        let bytes = cwd.as_os_str().as_bytes();
        if bytes.len() >= buf.len() {
            return Err(io::Error::from_raw_os_error(libc::ERANGE));
        }
        buf[..bytes.len()].copy_from_slice(bytes);
        buf[bytes.len()] = 0;
        Ok(bytes.len())
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.record();
        let resolved = self.walk(path, true)?;
        if self.entries.contains_key(&resolved) {
            Ok(resolved)
        } else {
            Err(io::Error::from_raw_os_error(libc::ENOENT))
        }
    }

    fn process_id(&self) -> u32 {
        self.record();
        self.pid
    }

    fn credentials(&self) -> Credentials {
        self.credentials
    }

    fn var_os(&self, key: &str) -> Option<OsString> {
        self.record();
        self.env.get(key).cloned()
    }

    fn loader_module_name(&self) -> Option<OsString> {
        self.record();
        self.loader_module.clone()
    }
}
