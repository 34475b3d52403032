//! Session table: binds a leader PID to a controlling PTY, one of which is
//! "active" at a time (the one the console currently talks to).

use crate::pty;
use lazy_static::lazy_static;
use spin::Mutex;

const SESSION_MAX: usize = 16;

#[derive(Clone, Copy)]
struct SessionEntry {
    in_use: bool,
    id: i32,
    leader_pid: u32,
    controlling_pty: i32,
}

impl SessionEntry {
    const fn empty() -> Self {
        SessionEntry {
            in_use: false,
            id: 0,
            leader_pid: 0,
            controlling_pty: -1,
        }
    }
}

struct SessionTable {
    sessions: [SessionEntry; SESSION_MAX],
    active_session_id: i32,
    invalid_ops: u64,
}

lazy_static! {
    static ref SESSIONS: Mutex<SessionTable> = Mutex::new(SessionTable {
        sessions: [SessionEntry::empty(); SESSION_MAX],
        active_session_id: -1,
        invalid_ops: 0,
    });
}

impl SessionTable {
    fn find_mut(&mut self, session_id: i32) -> Option<&mut SessionEntry> {
        self.sessions
            .iter_mut()
            .find(|entry| entry.in_use && entry.id == session_id)
    }

    fn find(&self, session_id: i32) -> Option<&SessionEntry> {
        self.sessions
            .iter()
            .find(|entry| entry.in_use && entry.id == session_id)
    }
}

pub fn init() {
    let mut table = SESSIONS.lock();
    table.sessions = [SessionEntry::empty(); SESSION_MAX];
    table.active_session_id = -1;
    table.invalid_ops = 0;
}

pub fn create(leader_pid: u32) -> i32 {
    let mut table = SESSIONS.lock();
    for (i, entry) in table.sessions.iter_mut().enumerate() {
        if !entry.in_use {
            entry.in_use = true;
            entry.id = (i + 1) as i32;
            entry.leader_pid = leader_pid;
            entry.controlling_pty = -1;
            return entry.id;
        }
    }
    table.invalid_ops += 1;
    -1
}

pub fn set_controlling_pty(session_id: i32, pty_id: i32) -> bool {
    if !pty::is_valid(pty_id) {
        SESSIONS.lock().invalid_ops += 1;
        return false;
    }

    let mut table = SESSIONS.lock();
    match table.find_mut(session_id) {
        Some(entry) => {
            entry.controlling_pty = pty_id;
            true
        }
        None => {
            table.invalid_ops += 1;
            false
        }
    }
}

pub fn set_active(session_id: i32) -> bool {
    let mut table = SESSIONS.lock();
    if table.find(session_id).is_none() {
        table.invalid_ops += 1;
        return false;
    }
    table.active_session_id = session_id;
    true
}

pub fn active_id() -> i32 {
    SESSIONS.lock().active_session_id
}

pub fn active_pty() -> i32 {
    let table = SESSIONS.lock();
    match table.find(table.active_session_id) {
        Some(entry) => entry.controlling_pty,
        None => -1,
    }
}

pub fn invalid_ops() -> u64 {
    SESSIONS.lock().invalid_ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_bind_and_activate() {
        init();
        crate::pty::init();
        let sid = create(1);
        assert!(sid > 0);
        let pty_id = crate::pty::alloc();
        assert!(set_controlling_pty(sid, pty_id));
        assert!(set_active(sid));
        assert_eq!(active_id(), sid);
        assert_eq!(active_pty(), pty_id);
    }
}
