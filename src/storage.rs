//! Storage device registry and the mount-policy engine sitting on top of
//! it. Devices and mounts are both fixed-size slot tables; policy checks
//! (read-only media, untrusted removable writes, confirmation-gated
//! destructive ops) are enforced here rather than by callers.

use lazy_static::lazy_static;
use spin::Mutex;

const MAX_DEVICES: usize = 8;
const MAX_MOUNTS: usize = 8;

const NAME_MAX: usize = 16;
const PATH_MAX: usize = 32;
const FSTYPE_MAX: usize = 16;
const LABEL_MAX: usize = 32;
const UUID_MAX: usize = 37;
const TARGET_MAX: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageStatus {
    Ok,
    NotFound,
    Invalid,
    AlreadyMounted,
    NotMounted,
    Busy,
    Policy,
    ConfirmationRequired,
    NoFilesystem,
}

impl StorageStatus {
    pub fn status_str(&self) -> &'static str {
        match self {
            StorageStatus::Ok => "ok",
            StorageStatus::NotFound => "not-found",
            StorageStatus::Invalid => "invalid-args",
            StorageStatus::AlreadyMounted => "already-mounted",
            StorageStatus::NotMounted => "not-mounted",
            StorageStatus::Busy => "busy",
            StorageStatus::Policy => "policy-denied",
            StorageStatus::ConfirmationRequired => "confirmation-required",
            StorageStatus::NoFilesystem => "no-filesystem",
        }
    }
}

fn copy_into(dst: &mut [u8], src: &str) -> usize {
    let n = src.len().min(dst.len());
    dst[..n].copy_from_slice(&src.as_bytes()[..n]);
    n
}

fn str_from(buf: &[u8], len: usize) -> &str {
    core::str::from_utf8(&buf[..len]).unwrap_or("")
}

#[derive(Clone, Copy)]
struct Device {
    in_use: bool,
    name: [u8; NAME_MAX],
    name_len: usize,
    path: [u8; PATH_MAX],
    path_len: usize,
    size_bytes: u64,
    removable: bool,
    read_only: bool,
    formatted: bool,
    fstype: [u8; FSTYPE_MAX],
    fstype_len: usize,
    label: [u8; LABEL_MAX],
    label_len: usize,
    uuid: [u8; UUID_MAX],
    uuid_len: usize,
    mount_slot: i32,
}

impl Device {
    const fn empty() -> Self {
        Device {
            in_use: false,
            name: [0; NAME_MAX],
            name_len: 0,
            path: [0; PATH_MAX],
            path_len: 0,
            size_bytes: 0,
            removable: false,
            read_only: false,
            formatted: false,
            fstype: [0; FSTYPE_MAX],
            fstype_len: 0,
            label: [0; LABEL_MAX],
            label_len: 0,
            uuid: [0; UUID_MAX],
            uuid_len: 0,
            mount_slot: -1,
        }
    }
}

#[derive(Clone, Copy)]
struct Mount {
    in_use: bool,
    device_slot: i32,
    target: [u8; TARGET_MAX],
    target_len: usize,
    read_write: bool,
    trusted: bool,
}

impl Mount {
    const fn empty() -> Self {
        Mount {
            in_use: false,
            device_slot: -1,
            target: [0; TARGET_MAX],
            target_len: 0,
            read_write: false,
            trusted: false,
        }
    }
}

pub struct DeviceInfo {
    pub name: [u8; NAME_MAX],
    pub name_len: usize,
    pub path: [u8; PATH_MAX],
    pub path_len: usize,
    pub size_bytes: u64,
    pub removable: bool,
    pub read_only: bool,
    pub formatted: bool,
    pub fstype: [u8; FSTYPE_MAX],
    pub fstype_len: usize,
    pub label: [u8; LABEL_MAX],
    pub label_len: usize,
    pub uuid: [u8; UUID_MAX],
    pub uuid_len: usize,
    pub mountpoint: [u8; TARGET_MAX],
    pub mountpoint_len: usize,
    pub mount_read_write: bool,
}

impl DeviceInfo {
    pub fn name(&self) -> &str {
        str_from(&self.name, self.name_len)
    }
    pub fn path(&self) -> &str {
        str_from(&self.path, self.path_len)
    }
    pub fn fstype(&self) -> &str {
        str_from(&self.fstype, self.fstype_len)
    }
    pub fn label(&self) -> &str {
        str_from(&self.label, self.label_len)
    }
    pub fn uuid(&self) -> &str {
        str_from(&self.uuid, self.uuid_len)
    }
    pub fn mountpoint(&self) -> &str {
        str_from(&self.mountpoint, self.mountpoint_len)
    }
}

struct StorageTable {
    devices: [Device; MAX_DEVICES],
    mounts: [Mount; MAX_MOUNTS],
    uuid_generation: u32,
}

lazy_static! {
    static ref STORAGE: Mutex<StorageTable> = Mutex::new(StorageTable {
        devices: [Device::empty(); MAX_DEVICES],
        mounts: [Mount::empty(); MAX_MOUNTS],
        uuid_generation: 1,
    });
}

fn is_absolute_path(path: &str) -> bool {
    path.starts_with('/')
}

fn is_valid_device_path(path: &str) -> bool {
    path.starts_with("/dev/") && path.len() > 5 && path.len() <= PATH_MAX
}

fn is_supported_fstype(fstype: &str) -> bool {
    matches!(fstype, "ext4" | "vfat" | "xfs")
}

fn hex_digit(value: u8) -> u8 {
    if value < 10 { b'0' + value } else { b'a' + (value - 10) }
}

fn write_hex_u32(dst: &mut [u8], value: u32, digits: usize) {
    for i in 0..digits {
        let shift = (digits - 1 - i) * 4;
        dst[i] = hex_digit(((value >> shift) & 0xF) as u8);
    }
}

fn make_uuid(out: &mut [u8; UUID_MAX], generation: u32, dev_slot: u32) -> usize {
    let a = 0xA11C_0000u32 | ((generation.wrapping_add(dev_slot)) & 0xFFFF);
    let b = 0xBEEFu32.wrapping_add(generation).wrapping_add(dev_slot);
    let c = 0x1000u32 | ((generation.wrapping_add(dev_slot)) & 0x0FFF);
    let d = 0x8000u32 | ((dev_slot.wrapping_add(1)) & 0x0FFF);
    let e_hi = 0xC0DEu32;
    let e_lo = (generation.wrapping_mul(37)).wrapping_add(dev_slot);

    write_hex_u32(&mut out[0..8], a, 8);
    out[8] = b'-';
    write_hex_u32(&mut out[9..13], b, 4);
    out[13] = b'-';
    write_hex_u32(&mut out[14..18], c, 4);
    out[18] = b'-';
    write_hex_u32(&mut out[19..23], d, 4);
    out[23] = b'-';
    write_hex_u32(&mut out[24..28], e_hi, 4);
    write_hex_u32(&mut out[28..36], e_lo, 8);
    36
}

impl StorageTable {
    fn find_device_slot(&self, path: &str) -> Option<usize> {
        self.devices
            .iter()
            .enumerate()
            .find(|(_, d)| d.in_use && str_from(&d.path, d.path_len) == path)
            .map(|(i, _)| i)
    }

    fn find_mount_by_target(&self, target: &str) -> Option<usize> {
        self.mounts
            .iter()
            .enumerate()
            .find(|(_, m)| m.in_use && str_from(&m.target, m.target_len) == target)
            .map(|(i, _)| i)
    }

    fn find_free_mount_slot(&self) -> Option<usize> {
        (0..MAX_MOUNTS).find(|&i| !self.mounts[i].in_use)
    }

    #[allow(clippy::too_many_arguments)]
    fn add_device(
        &mut self,
        name: &str,
        path: &str,
        size_bytes: u64,
        removable: bool,
        read_only: bool,
        formatted: bool,
        fstype: &str,
        label: &str,
    ) -> Option<usize> {
        let idx = (0..MAX_DEVICES).find(|&i| !self.devices[i].in_use)?;
        let d = &mut self.devices[idx];
        *d = Device::empty();
        d.in_use = true;
        d.name_len = copy_into(&mut d.name, name);
        d.path_len = copy_into(&mut d.path, path);
        d.size_bytes = size_bytes;
        d.removable = removable;
        d.read_only = read_only;
        d.formatted = formatted;
        if formatted {
            d.fstype_len = copy_into(&mut d.fstype, fstype);
            d.label_len = copy_into(&mut d.label, label);
        }
        d.mount_slot = -1;

        let mut uuid = [0u8; UUID_MAX];
        let uuid_len = make_uuid(&mut uuid, self.uuid_generation, idx as u32);
        self.devices[idx].uuid = uuid;
        self.devices[idx].uuid_len = uuid_len;
        self.uuid_generation += 1;
        Some(idx)
    }

    fn fill_device_info(&self, index: usize) -> DeviceInfo {
        let d = &self.devices[index];
        let mut info = DeviceInfo {
            name: d.name,
            name_len: d.name_len,
            path: d.path,
            path_len: d.path_len,
            size_bytes: d.size_bytes,
            removable: d.removable,
            read_only: d.read_only,
            formatted: d.formatted,
            fstype: if d.formatted { d.fstype } else { [0; FSTYPE_MAX] },
            fstype_len: if d.formatted { d.fstype_len } else { 0 },
            label: if d.formatted { d.label } else { [0; LABEL_MAX] },
            label_len: if d.formatted { d.label_len } else { 0 },
            uuid: if d.formatted { d.uuid } else { [0; UUID_MAX] },
            uuid_len: if d.formatted { d.uuid_len } else { 0 },
            mountpoint: [0; TARGET_MAX],
            mountpoint_len: 0,
            mount_read_write: false,
        };

        if d.mount_slot >= 0 {
            let slot = d.mount_slot as usize;
            if slot < MAX_MOUNTS && self.mounts[slot].in_use {
                info.mountpoint = self.mounts[slot].target;
                info.mountpoint_len = self.mounts[slot].target_len;
                info.mount_read_write = self.mounts[slot].read_write;
            }
        }
        info
    }
}

pub fn init() {
    let mut table = STORAGE.lock();
    table.devices = [Device::empty(); MAX_DEVICES];
    table.mounts = [Mount::empty(); MAX_MOUNTS];
    table.uuid_generation = 1;

    table.add_device("ram0", "/dev/ram0", 64 * 1024 * 1024, false, false, true, "ext4", "rootfs");
    table.add_device("usb0", "/dev/usb0", 32 * 1024 * 1024, true, false, false, "", "");

    if table.devices[0].in_use {
        table.mounts[0].in_use = true;
        table.mounts[0].device_slot = 0;
        table.mounts[0].target_len = copy_into(&mut table.mounts[0].target, "/");
        table.mounts[0].read_write = true;
        table.mounts[0].trusted = true;
        table.devices[0].mount_slot = 0;
    }
}

pub fn device_count() -> usize {
    STORAGE.lock().devices.iter().filter(|d| d.in_use).count()
}

pub fn device_info(index: usize) -> Option<DeviceInfo> {
    let table = STORAGE.lock();
    table
        .devices
        .iter()
        .enumerate()
        .filter(|(_, d)| d.in_use)
        .nth(index)
        .map(|(i, _)| table.fill_device_info(i))
}

pub fn find_device(path: &str) -> Option<DeviceInfo> {
    let table = STORAGE.lock();
    let slot = table.find_device_slot(path)?;
    Some(table.fill_device_info(slot))
}

pub fn mount(device: &str, target: &str, read_write: bool, trusted: bool, force: bool, dry_run: bool) -> StorageStatus {
    if !is_valid_device_path(device) || !is_absolute_path(target) {
        return StorageStatus::Invalid;
    }

    let mut table = STORAGE.lock();
    let device_slot = match table.find_device_slot(device) {
        Some(s) => s,
        None => return StorageStatus::NotFound,
    };

    if !table.devices[device_slot].formatted {
        return StorageStatus::NoFilesystem;
    }
    if table.devices[device_slot].mount_slot >= 0 {
        return StorageStatus::AlreadyMounted;
    }
    if table.find_mount_by_target(target).is_some() {
        return StorageStatus::Busy;
    }
    if table.devices[device_slot].read_only && read_write {
        return StorageStatus::Policy;
    }
    if table.devices[device_slot].removable && !trusted && read_write && !force {
        return StorageStatus::Policy;
    }

    let mount_slot = match table.find_free_mount_slot() {
        Some(s) => s,
        None => return StorageStatus::Busy,
    };

    if dry_run {
        return StorageStatus::Ok;
    }

    let removable = table.devices[device_slot].removable;
    table.mounts[mount_slot].in_use = true;
    table.mounts[mount_slot].device_slot = device_slot as i32;
    table.mounts[mount_slot].target_len = copy_into(&mut table.mounts[mount_slot].target, target);
    table.mounts[mount_slot].read_write = read_write && (!removable || trusted || force);
    table.mounts[mount_slot].trusted = trusted;
    table.devices[device_slot].mount_slot = mount_slot as i32;
    StorageStatus::Ok
}

pub fn umount_target(target: &str, dry_run: bool) -> StorageStatus {
    if target.is_empty() {
        return StorageStatus::Invalid;
    }

    let mut table = STORAGE.lock();
    let mut slot = table.find_mount_by_target(target);
    if slot.is_none() && is_valid_device_path(target) {
        if let Some(device_slot) = table.find_device_slot(target) {
            let ms = table.devices[device_slot].mount_slot;
            if ms >= 0 {
                slot = Some(ms as usize);
            }
        }
    }

    let slot = match slot {
        Some(s) if s < MAX_MOUNTS && table.mounts[s].in_use => s,
        _ => return StorageStatus::NotMounted,
    };

    if dry_run {
        return StorageStatus::Ok;
    }

    let device_slot = table.mounts[slot].device_slot;
    if device_slot >= 0 && (device_slot as usize) < MAX_DEVICES {
        table.devices[device_slot as usize].mount_slot = -1;
    }
    table.mounts[slot] = Mount::empty();
    StorageStatus::Ok
}

pub fn fsck(device: &str, force: bool, dry_run: bool, confirmed: bool) -> StorageStatus {
    if !is_valid_device_path(device) {
        return StorageStatus::Invalid;
    }

    let table = STORAGE.lock();
    let slot = match table.find_device_slot(device) {
        Some(s) => s,
        None => return StorageStatus::NotFound,
    };

    if !table.devices[slot].formatted {
        return StorageStatus::NoFilesystem;
    }
    if table.devices[slot].mount_slot >= 0 {
        return StorageStatus::Busy;
    }
    if force && !confirmed {
        return StorageStatus::ConfirmationRequired;
    }
    StorageStatus::Ok
}

pub fn format(device: &str, fstype: &str, label: &str, force: bool, dry_run: bool, confirmed: bool) -> StorageStatus {
    let use_fstype = if fstype.is_empty() { "ext4" } else { fstype };

    if !is_valid_device_path(device) {
        return StorageStatus::Invalid;
    }
    if !is_supported_fstype(use_fstype) {
        return StorageStatus::Invalid;
    }

    let mut table = STORAGE.lock();
    let slot = match table.find_device_slot(device) {
        Some(s) => s,
        None => return StorageStatus::NotFound,
    };

    if table.devices[slot].mount_slot >= 0 {
        return StorageStatus::Busy;
    }
    if !force || !confirmed {
        return StorageStatus::ConfirmationRequired;
    }
    if dry_run {
        return StorageStatus::Ok;
    }

    table.devices[slot].formatted = true;
    table.devices[slot].fstype_len = copy_into(&mut table.devices[slot].fstype, use_fstype);
    table.devices[slot].label_len = copy_into(&mut table.devices[slot].label, label);

    let mut uuid = [0u8; UUID_MAX];
    let generation = table.uuid_generation;
    let uuid_len = make_uuid(&mut uuid, generation, slot as u32);
    table.devices[slot].uuid = uuid;
    table.devices[slot].uuid_len = uuid_len;
    table.uuid_generation += 1;
    StorageStatus::Ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_device_is_mounted_read_write() {
        init();
        let info = find_device("/dev/ram0").unwrap();
        assert!(info.formatted);
        assert_eq!(info.mountpoint(), "/");
        assert!(info.mount_read_write);
    }

    #[test]
    fn untrusted_removable_write_mount_is_denied() {
        init();
        let status = mount("/dev/usb0", "/media/usb0", true, false, false, false);
        assert_eq!(status, StorageStatus::Policy);
    }

    #[test]
    fn format_requires_force_and_confirmation() {
        init();
        assert_eq!(format("/dev/usb0", "vfat", "data", false, false, false), StorageStatus::ConfirmationRequired);
        assert_eq!(format("/dev/usb0", "vfat", "data", true, false, true), StorageStatus::Ok);
    }
}
