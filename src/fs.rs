//! A small in-memory, POSIX-flavored filesystem: a flat pool of nodes
//! linked by parent index, resolved component-by-component like a real
//! path walk.

use lazy_static::lazy_static;
use spin::Mutex;

const MAX_NODES: usize = 128;
const MAX_NAME: usize = 31;
const MAX_CONTENT: usize = 512;
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsStatus {
    Ok,
    NotFound,
    Exists,
    NotDir,
    IsDir,
    Invalid,
    NoSpace,
}

impl FsStatus {
    pub fn status_str(&self) -> &'static str {
        match self {
            FsStatus::Ok => "ok",
            FsStatus::NotFound => "not-found",
            FsStatus::Exists => "already-exists",
            FsStatus::NotDir => "not-directory",
            FsStatus::IsDir => "is-directory",
            FsStatus::Invalid => "invalid-args",
            FsStatus::NoSpace => "no-space",
        }
    }
}

pub struct FsEntry {
    pub name: [u8; MAX_NAME + 1],
    pub name_len: usize,
    pub is_dir: bool,
    pub size: usize,
}

impl FsEntry {
    pub fn name(&self) -> &str {
        core::str::from_utf8(&self.name[..self.name_len]).unwrap_or("")
    }
}

#[derive(Clone, Copy)]
struct Node {
    in_use: bool,
    is_dir: bool,
    parent: i32,
    name: [u8; MAX_NAME + 1],
    name_len: usize,
    content: [u8; MAX_CONTENT],
    size: usize,
}

impl Node {
    const fn empty() -> Self {
        Node {
            in_use: false,
            is_dir: false,
            parent: 0,
            name: [0; MAX_NAME + 1],
            name_len: 0,
            content: [0; MAX_CONTENT],
            size: 0,
        }
    }

    fn set_name(&mut self, name: &[u8]) {
        let n = name.len().min(MAX_NAME);
        self.name[..n].copy_from_slice(&name[..n]);
        self.name_len = n;
    }

    fn name_eq(&self, other: &[u8]) -> bool {
        &self.name[..self.name_len] == other
    }
}

struct FsTable {
    nodes: [Node; MAX_NODES],
    cwd: usize,
}

lazy_static! {
    static ref FS: Mutex<FsTable> = Mutex::new(FsTable {
        nodes: [Node::empty(); MAX_NODES],
        cwd: 0,
    });
}

impl FsTable {
    fn find_child(&self, parent: usize, name: &[u8]) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, n)| n.in_use && n.parent == parent as i32 && n.name_eq(name))
            .map(|(i, _)| i)
    }

    fn alloc_node(&mut self) -> Option<usize> {
        (1..MAX_NODES).find(|&i| !self.nodes[i].in_use)
    }

    /// Resolves a path (absolute if it starts with `/`, relative to cwd
    /// otherwise) to a node index.
    fn resolve(&self, path: &str) -> Result<usize, FsStatus> {
        if path.is_empty() {
            return Ok(self.cwd);
        }

        let bytes = path.as_bytes();
        let (mut cur, start) = if bytes[0] == b'/' { (0usize, 1usize) } else { (self.cwd, 0usize) };

        let mut i = start;
        while i < bytes.len() {
            while i < bytes.len() && bytes[i] == b'/' {
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }

            let comp_start = i;
            while i < bytes.len() && bytes[i] != b'/' {
                i += 1;
            }
            let comp = &bytes[comp_start..i];
            if comp.len() > MAX_NAME {
                return Err(FsStatus::Invalid);
            }

            if comp == b"." {
                continue;
            }
            if comp == b".." {
                cur = self.nodes[cur].parent as usize;
                continue;
            }

            cur = self.find_child(cur, comp).ok_or(FsStatus::NotFound)?;
        }

        Ok(cur)
    }

    /// Resolves the parent directory and final component name of a path,
    /// used before creating a new node.
    fn resolve_parent<'a>(&self, path: &'a str) -> Result<(usize, &'a [u8]), FsStatus> {
        if path.is_empty() {
            return Err(FsStatus::Invalid);
        }

        let bytes = path.as_bytes();
        let (mut cur, start) = if bytes[0] == b'/' { (0usize, 1usize) } else { (self.cwd, 0usize) };

        let mut i = start;
        loop {
            while i < bytes.len() && bytes[i] == b'/' {
                i += 1;
            }
            if i >= bytes.len() {
                return Err(FsStatus::Invalid);
            }

            let comp_start = i;
            while i < bytes.len() && bytes[i] != b'/' {
                i += 1;
            }
            let comp = &bytes[comp_start..i];
            if comp.len() > MAX_NAME {
                return Err(FsStatus::Invalid);
            }

            let mut j = i;
            while j < bytes.len() && bytes[j] == b'/' {
                j += 1;
            }

            if j >= bytes.len() {
                if comp == b"." || comp == b".." {
                    return Err(FsStatus::Invalid);
                }
                return Ok((cur, comp));
            }

            if comp == b"." {
                // stay
            } else if comp == b".." {
                cur = self.nodes[cur].parent as usize;
            } else {
                cur = self.find_child(cur, comp).ok_or(FsStatus::NotFound)?;
                if !self.nodes[cur].is_dir {
                    return Err(FsStatus::NotDir);
                }
            }
        }
    }

    fn create_node(&mut self, path: &str, is_dir: bool) -> Result<usize, FsStatus> {
        let (parent, name) = self.resolve_parent(path)?;
        if !self.nodes[parent].is_dir {
            return Err(FsStatus::NotDir);
        }
        if self.find_child(parent, name).is_some() {
            return Err(FsStatus::Exists);
        }

        let idx = self.alloc_node().ok_or(FsStatus::NoSpace)?;
        self.nodes[idx] = Node::empty();
        self.nodes[idx].in_use = true;
        self.nodes[idx].is_dir = is_dir;
        self.nodes[idx].parent = parent as i32;
        self.nodes[idx].set_name(name);
        Ok(idx)
    }
}

fn mkdir_locked(table: &mut FsTable, path: &str) -> FsStatus {
    match table.create_node(path, true) {
        Ok(_) => FsStatus::Ok,
        Err(e) => e,
    }
}

fn seed_dirs(table: &mut FsTable) {
    for path in ["/home", "/tmp", "/media", "/media/usb0"] {
        mkdir_locked(table, path);
    }
}

pub fn init() {
    let mut table = FS.lock();
    table.nodes = [Node::empty(); MAX_NODES];
    table.nodes[0].in_use = true;
    table.nodes[0].is_dir = true;
    table.nodes[0].parent = 0;
    table.nodes[0].set_name(b"/");
    table.cwd = 0;
    seed_dirs(&mut table);
}

pub fn pwd(out: &mut [u8]) -> Result<usize, FsStatus> {
    let table = FS.lock();
    if out.is_empty() {
        return Err(FsStatus::Invalid);
    }

    if table.cwd == 0 {
        if out.len() < 2 {
            return Err(FsStatus::NoSpace);
        }
        out[0] = b'/';
        return Ok(1);
    }

    let mut stack = [0usize; MAX_DEPTH];
    let mut depth = 0;
    let mut cur = table.cwd;
    while cur != 0 {
        if depth >= MAX_DEPTH {
            return Err(FsStatus::NoSpace);
        }
        stack[depth] = cur;
        depth += 1;
        cur = table.nodes[cur].parent as usize;
    }

    let mut pos = 0;
    if pos + 1 >= out.len() {
        return Err(FsStatus::NoSpace);
    }
    out[pos] = b'/';
    pos += 1;

    for i in (0..depth).rev() {
        let node = &table.nodes[stack[i]];
        let n = node.name_len;
        let sep = if i > 0 { 1 } else { 0 };
        if pos + n + sep >= out.len() {
            return Err(FsStatus::NoSpace);
        }
        out[pos..pos + n].copy_from_slice(&node.name[..n]);
        pos += n;
        if i > 0 {
            out[pos] = b'/';
            pos += 1;
        }
    }

    Ok(pos)
}

pub fn chdir(path: &str) -> FsStatus {
    let mut table = FS.lock();
    match table.resolve(path) {
        Ok(idx) => {
            if !table.nodes[idx].is_dir {
                return FsStatus::NotDir;
            }
            table.cwd = idx;
            FsStatus::Ok
        }
        Err(e) => e,
    }
}

pub fn mkdir(path: &str) -> FsStatus {
    mkdir_locked(&mut FS.lock(), path)
}

/// Supplemental: creates every missing directory along `path`.
pub fn mkdir_p(path: &str) -> FsStatus {
    if !path.starts_with('/') {
        return FsStatus::Invalid;
    }

    let mut table = FS.lock();
    let mut buf = [0u8; MAX_DEPTH * (MAX_NAME + 1)];
    let mut len = 0usize;

    for comp in path.split('/').filter(|c| !c.is_empty()) {
        if len + 1 + comp.len() > buf.len() {
            return FsStatus::NoSpace;
        }
        buf[len] = b'/';
        len += 1;
        buf[len..len + comp.len()].copy_from_slice(comp.as_bytes());
        len += comp.len();

        let built = match core::str::from_utf8(&buf[..len]) {
            Ok(s) => s,
            Err(_) => return FsStatus::Invalid,
        };
        match table.create_node(built, true) {
            Ok(_) | Err(FsStatus::Exists) => {}
            Err(e) => return e,
        }
    }
    FsStatus::Ok
}

pub fn touch(path: &str) -> FsStatus {
    let mut table = FS.lock();
    match table.resolve(path) {
        Ok(idx) => {
            if table.nodes[idx].is_dir {
                FsStatus::IsDir
            } else {
                FsStatus::Ok
            }
        }
        Err(FsStatus::NotFound) => match table.create_node(path, false) {
            Ok(_) => FsStatus::Ok,
            Err(e) => e,
        },
        Err(e) => e,
    }
}

pub fn write(path: &str, data: &[u8], append: bool) -> FsStatus {
    let mut table = FS.lock();
    let idx = match table.resolve(path) {
        Ok(idx) => idx,
        Err(FsStatus::NotFound) => match table.create_node(path, false) {
            Ok(idx) => idx,
            Err(e) => return e,
        },
        Err(e) => return e,
    };

    if table.nodes[idx].is_dir {
        return FsStatus::IsDir;
    }

    let existing = if append { table.nodes[idx].size } else { 0 };
    if existing + data.len() >= MAX_CONTENT {
        return FsStatus::NoSpace;
    }

    if !append {
        table.nodes[idx].size = 0;
    }

    if !data.is_empty() {
        table.nodes[idx].content[existing..existing + data.len()].copy_from_slice(data);
    }
    table.nodes[idx].size = existing + data.len();
    FsStatus::Ok
}

pub fn read(path: &str, out: &mut [u8]) -> Result<usize, FsStatus> {
    let table = FS.lock();
    let idx = table.resolve(path)?;
    if table.nodes[idx].is_dir {
        return Err(FsStatus::IsDir);
    }

    let n = table.nodes[idx].size;
    if n > out.len() {
        return Err(FsStatus::NoSpace);
    }
    out[..n].copy_from_slice(&table.nodes[idx].content[..n]);
    Ok(n)
}

pub fn stat(path: &str) -> Result<FsEntry, FsStatus> {
    let table = FS.lock();
    let idx = table.resolve(path)?;
    let node = &table.nodes[idx];
    Ok(FsEntry {
        name: node.name,
        name_len: node.name_len,
        is_dir: node.is_dir,
        size: node.size,
    })
}

pub fn list(path: &str, entries: &mut [FsEntry]) -> Result<usize, FsStatus> {
    let table = FS.lock();
    let dir = if path.is_empty() { table.cwd } else { table.resolve(path)? };

    if !table.nodes[dir].is_dir {
        return Err(FsStatus::NotDir);
    }

    let mut count = 0;
    for (i, node) in table.nodes.iter().enumerate() {
        if !node.in_use {
            continue;
        }
        if i == 0 && dir != 0 {
            continue;
        }
        if node.parent != dir as i32 {
            continue;
        }
        if count < entries.len() {
            entries[count] = FsEntry {
                name: node.name,
                name_len: node.name_len,
                is_dir: node.is_dir,
                size: node.size,
            };
        }
        count += 1;
    }

    if count > entries.len() {
        return Err(FsStatus::NoSpace);
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_roundtrip() {
        init();
        assert_eq!(write("/tmp/a.txt", b"hello", false), FsStatus::Ok);
        let mut buf = [0u8; 16];
        let n = read("/tmp/a.txt", &mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
    }

    #[test]
    fn mkdir_then_chdir_then_relative_touch() {
        init();
        assert_eq!(mkdir("/tmp/sub"), FsStatus::Ok);
        assert_eq!(chdir("/tmp/sub"), FsStatus::Ok);
        assert_eq!(touch("file"), FsStatus::Ok);
        let mut buf = [0u8; 8];
        let n = pwd(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"/tmp/sub");
    }

    #[test]
    fn seeded_directories_exist() {
        init();
        assert_eq!(chdir("/home"), FsStatus::Ok);
        assert_eq!(chdir("/media/usb0"), FsStatus::Ok);
    }
}
