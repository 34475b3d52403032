//! Text console: VGA/framebuffer backend selection plus an embedded VT100
//! (ANSI CSI) parser and UTF-8 decoder for everything written through it.

mod backend;
mod font8x8;

use crate::serial;
use backend::{Backend, FB_MAX_COLS, FB_MAX_ROWS};
use lazy_static::lazy_static;
use spin::Mutex;

const VGA_WIDTH: usize = 80;
const VGA_HEIGHT: usize = 25;
const ANSI_MAX_PARAMS: usize = 8;

const ANSI_BASE_TO_VGA: [u8; 8] = [0, 4, 2, 6, 1, 5, 3, 7];

#[derive(Clone, Copy, PartialEq, Eq)]
enum AnsiState {
    Ground,
    Esc,
    Csi,
}

struct ConsoleState {
    backend: Backend,
    term_cols: usize,
    term_rows: usize,

    cursor_row: usize,
    cursor_col: usize,
    saved_cursor_row: usize,
    saved_cursor_col: usize,

    ansi_fg: u8,
    ansi_bg: u8,
    ansi_state: AnsiState,
    ansi_params: [i32; ANSI_MAX_PARAMS],
    ansi_param_count: usize,
    ansi_param_current: i32,
    ansi_param_active: bool,

    utf8_codepoint: u32,
    utf8_needed: u8,
    utf8_total: u8,

    fb_cells: [[u8; FB_MAX_COLS]; FB_MAX_ROWS],
    fb_cell_colors: [[u8; FB_MAX_COLS]; FB_MAX_ROWS],
}

lazy_static! {
    static ref CONSOLE: Mutex<ConsoleState> = Mutex::new(ConsoleState {
        backend: Backend::VgaText,
        term_cols: VGA_WIDTH,
        term_rows: VGA_HEIGHT,
        cursor_row: 0,
        cursor_col: 0,
        saved_cursor_row: 0,
        saved_cursor_col: 0,
        ansi_fg: 15,
        ansi_bg: 0,
        ansi_state: AnsiState::Ground,
        ansi_params: [0; ANSI_MAX_PARAMS],
        ansi_param_count: 0,
        ansi_param_current: 0,
        ansi_param_active: false,
        utf8_codepoint: 0,
        utf8_needed: 0,
        utf8_total: 0,
        fb_cells: [[b' '; FB_MAX_COLS]; FB_MAX_ROWS],
        fb_cell_colors: [[0x0F; FB_MAX_COLS]; FB_MAX_ROWS],
    });
}

impl ConsoleState {
    fn current_color(&self) -> u8 {
        (self.ansi_bg << 4) | (self.ansi_fg & 0x0F)
    }

    fn put_cell(&mut self, row: usize, col: usize, c: u8, color: u8) {
        if row >= self.term_rows || col >= self.term_cols {
            return;
        }

        match self.backend {
            Backend::VgaText => self.backend.write_vga_cell(self.term_cols, row, col, c, color),
            Backend::Framebuffer { .. } => {
                self.fb_cells[row][col] = c;
                self.fb_cell_colors[row][col] = color;
                self.backend.draw_cell(self.term_cols, self.term_rows, row, col, c, color);
            }
        }
    }

    fn redraw_full(&mut self) {
        if matches!(self.backend, Backend::VgaText) {
            return;
        }
        for row in 0..self.term_rows {
            for col in 0..self.term_cols {
                let c = self.fb_cells[row][col];
                let color = self.fb_cell_colors[row][col];
                self.backend.draw_cell(self.term_cols, self.term_rows, row, col, c, color);
            }
        }
    }

    fn clear_all(&mut self, color: u8) {
        for row in 0..self.term_rows {
            for col in 0..self.term_cols {
                self.put_cell(row, col, b' ', color);
            }
        }
    }

    fn scroll_up(&mut self, color: u8) {
        for row in 1..self.term_rows {
            for col in 0..self.term_cols {
                let c = self.fb_cells[row][col];
                let cc = self.fb_cell_colors[row][col];
                self.put_cell(row - 1, col, c, cc);
            }
        }
        for col in 0..self.term_cols {
            self.put_cell(self.term_rows - 1, col, b' ', color);
        }
    }

    fn scroll_if_needed(&mut self) {
        if self.cursor_row < self.term_rows {
            return;
        }
        let color = self.current_color();
        self.scroll_up(color);
        self.cursor_row = self.term_rows - 1;
    }

    fn clear_line_range(&mut self, row: usize, col_start: usize, col_end: usize) {
        let color = self.current_color();
        if row >= self.term_rows {
            return;
        }
        let start = col_start.min(self.term_cols - 1);
        let end = col_end.min(self.term_cols - 1);
        if start > end {
            return;
        }
        for col in start..=end {
            self.put_cell(row, col, b' ', color);
        }
    }

    fn raw_put_visible(&mut self, c: u8) {
        let color = self.current_color();
        self.put_cell(self.cursor_row, self.cursor_col, c, color);
        self.cursor_col += 1;
        if self.cursor_col >= self.term_cols {
            self.cursor_col = 0;
            self.cursor_row += 1;
        }
        self.scroll_if_needed();
    }

    fn raw_newline(&mut self) {
        self.cursor_col = 0;
        self.cursor_row += 1;
        self.scroll_if_needed();
    }

    fn backspace(&mut self) {
        if self.cursor_col == 0 && self.cursor_row == 0 {
            return;
        }
        if self.cursor_col == 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.term_cols - 1;
        } else {
            self.cursor_col -= 1;
        }
        let color = self.current_color();
        self.put_cell(self.cursor_row, self.cursor_col, b' ', color);
    }

    fn ansi_color_to_vga(ansi_color: u8, bright: bool) -> u8 {
        let mut vga = ANSI_BASE_TO_VGA[(ansi_color & 0x7) as usize];
        if bright && vga < 8 {
            vga += 8;
        }
        vga
    }

    fn sgr_apply(&mut self, code: i32) {
        match code {
            0 => {
                self.ansi_fg = 15;
                self.ansi_bg = 0;
            }
            1 => {
                if self.ansi_fg < 8 {
                    self.ansi_fg += 8;
                }
            }
            22 => {
                if self.ansi_fg >= 8 {
                    self.ansi_fg -= 8;
                }
            }
            30..=37 => self.ansi_fg = Self::ansi_color_to_vga((code - 30) as u8, false),
            90..=97 => self.ansi_fg = Self::ansi_color_to_vga((code - 90) as u8, true),
            39 => self.ansi_fg = 15,
            40..=47 => self.ansi_bg = Self::ansi_color_to_vga((code - 40) as u8, false),
            100..=107 => self.ansi_bg = Self::ansi_color_to_vga((code - 100) as u8, true),
            49 => self.ansi_bg = 0,
            _ => {}
        }
    }

    fn param_at(&self, i: usize, fallback: i32) -> i32 {
        if i >= self.ansi_param_count {
            fallback
        } else {
            self.ansi_params[i]
        }
    }

    fn reset_params(&mut self) {
        self.ansi_param_count = 0;
        self.ansi_param_current = 0;
        self.ansi_param_active = false;
    }

    fn push_current_param(&mut self) {
        if !self.ansi_param_active && self.ansi_param_count == 0 {
            return;
        }
        if self.ansi_param_count < ANSI_MAX_PARAMS {
            self.ansi_params[self.ansi_param_count] =
                if self.ansi_param_active { self.ansi_param_current } else { 0 };
            self.ansi_param_count += 1;
        }
        self.ansi_param_current = 0;
        self.ansi_param_active = false;
    }

    fn execute_csi(&mut self, fin: u8) {
        match fin {
            b'm' => {
                if self.ansi_param_count == 0 {
                    self.sgr_apply(0);
                } else {
                    for i in 0..self.ansi_param_count {
                        self.sgr_apply(self.ansi_params[i]);
                    }
                }
                return;
            }
            b'H' | b'f' => {
                let row = (self.param_at(0, 1) - 1).max(0) as usize;
                let col = (self.param_at(1, 1) - 1).max(0) as usize;
                self.cursor_row = row.min(self.term_rows - 1);
                self.cursor_col = col.min(self.term_cols - 1);
                return;
            }
            _ => {}
        }

        let n = self.param_at(0, 1).max(1) as usize;

        match fin {
            b'A' => self.cursor_row = self.cursor_row.saturating_sub(n),
            b'B' => self.cursor_row = (self.cursor_row + n).min(self.term_rows - 1),
            b'C' => self.cursor_col = (self.cursor_col + n).min(self.term_cols - 1),
            b'D' => self.cursor_col = self.cursor_col.saturating_sub(n),
            b'J' => {
                let mode = self.param_at(0, 0);
                if mode == 2 {
                    self.clear();
                } else if mode == 0 {
                    let (row, col, cols) = (self.cursor_row, self.cursor_col, self.term_cols);
                    self.clear_line_range(row, col, cols - 1);
                    for y in (row + 1)..self.term_rows {
                        self.clear_line_range(y, 0, cols - 1);
                    }
                } else if mode == 1 {
                    let (row, col, cols) = (self.cursor_row, self.cursor_col, self.term_cols);
                    for y in 0..row {
                        self.clear_line_range(y, 0, cols - 1);
                    }
                    self.clear_line_range(row, 0, col);
                }
            }
            b'K' => {
                let mode = self.param_at(0, 0);
                let (row, col, cols) = (self.cursor_row, self.cursor_col, self.term_cols);
                if mode == 0 {
                    self.clear_line_range(row, col, cols - 1);
                } else if mode == 1 {
                    self.clear_line_range(row, 0, col);
                } else if mode == 2 {
                    self.clear_line_range(row, 0, cols - 1);
                }
            }
            b's' => {
                self.saved_cursor_row = self.cursor_row;
                self.saved_cursor_col = self.cursor_col;
            }
            b'u' => {
                self.cursor_row = self.saved_cursor_row.min(self.term_rows - 1);
                self.cursor_col = self.saved_cursor_col.min(self.term_cols - 1);
            }
            _ => {}
        }
    }

    fn emit_codepoint(&mut self, codepoint: u32) {
        if codepoint == 0 {
            return;
        }
        if codepoint <= 0x7F {
            self.raw_put_visible(codepoint as u8);
        } else {
            self.raw_put_visible(b'?');
        }
    }

    fn emit_utf8_byte(&mut self, byte: u8) {
        if self.utf8_needed == 0 {
            if byte & 0xE0 == 0xC0 {
                self.utf8_codepoint = (byte & 0x1F) as u32;
                self.utf8_needed = 1;
                self.utf8_total = 1;
            } else if byte & 0xF0 == 0xE0 {
                self.utf8_codepoint = (byte & 0x0F) as u32;
                self.utf8_needed = 2;
                self.utf8_total = 2;
            } else if byte & 0xF8 == 0xF0 {
                self.utf8_codepoint = (byte & 0x07) as u32;
                self.utf8_needed = 3;
                self.utf8_total = 3;
            } else {
                self.emit_codepoint('?' as u32);
            }
            return;
        }

        if byte & 0xC0 != 0x80 {
            self.utf8_needed = 0;
            self.utf8_total = 0;
            self.utf8_codepoint = 0;
            self.emit_codepoint('?' as u32);
            return;
        }

        self.utf8_codepoint = (self.utf8_codepoint << 6) | (byte & 0x3F) as u32;
        self.utf8_needed -= 1;

        if self.utf8_needed == 0 {
            let cp = self.utf8_codepoint;
            let mut valid = true;
            if self.utf8_total == 1 && cp < 0x80 {
                valid = false;
            }
            if self.utf8_total == 2 && cp < 0x800 {
                valid = false;
            }
            if self.utf8_total == 3 && cp < 0x10000 {
                valid = false;
            }
            if cp > 0x10FFFF || (0xD800..=0xDFFF).contains(&cp) {
                valid = false;
            }

            if valid {
                self.emit_codepoint(cp);
            } else {
                self.emit_codepoint('?' as u32);
            }
            self.utf8_total = 0;
            self.utf8_codepoint = 0;
        }
    }

    fn handle_ground_byte(&mut self, byte: u8) {
        match byte {
            0x1B => self.ansi_state = AnsiState::Esc,
            b'\n' => self.raw_newline(),
            b'\r' => self.cursor_col = 0,
            0x08 => self.backspace(),
            b'\t' => {
                let spaces = 4 - (self.cursor_col % 4);
                for _ in 0..spaces {
                    self.raw_put_visible(b' ');
                }
            }
            b if b < 0x20 => {}
            b if b < 0x80 => self.raw_put_visible(b),
            b => self.emit_utf8_byte(b),
        }
    }

    fn putc(&mut self, c: u8) {
        if c == b'\n' {
            serial::put_byte(b'\r');
        }
        serial::put_byte(c);

        match self.ansi_state {
            AnsiState::Ground => self.handle_ground_byte(c),
            AnsiState::Esc => {
                if c == b'[' {
                    self.ansi_state = AnsiState::Csi;
                    self.reset_params();
                } else {
                    self.ansi_state = AnsiState::Ground;
                    self.handle_ground_byte(c);
                }
            }
            AnsiState::Csi => {
                if c.is_ascii_digit() {
                    self.ansi_param_current = self.ansi_param_current * 10 + (c - b'0') as i32;
                    self.ansi_param_active = true;
                } else if c == b';' {
                    self.push_current_param();
                } else if (0x40..=0x7E).contains(&c) {
                    self.push_current_param();
                    self.execute_csi(c);
                    self.ansi_state = AnsiState::Ground;
                    self.reset_params();
                } else {
                    self.ansi_state = AnsiState::Ground;
                }
            }
        }
    }

    fn clear(&mut self) {
        self.ansi_fg = 15;
        self.ansi_bg = 0;
        self.ansi_state = AnsiState::Ground;
        self.reset_params();
        self.utf8_codepoint = 0;
        self.utf8_needed = 0;
        self.utf8_total = 0;

        let color = self.current_color();
        self.clear_all(color);

        self.cursor_row = 0;
        self.cursor_col = 0;
        self.saved_cursor_row = 0;
        self.saved_cursor_col = 0;
    }
}

pub fn init() {
    serial::init();
    let mut state = CONSOLE.lock();
    state.backend = Backend::VgaText;
    state.term_cols = VGA_WIDTH;
    state.term_rows = VGA_HEIGHT;
    state.clear();
}

/// Switches the active backend to the mapped linear framebuffer, if it is
/// suitable (RGB32, big enough for at least one glyph cell).
pub fn enable_framebuffer(addr: u64, width: u32, height: u32, pitch: u32) -> bool {
    const GLYPH_WIDTH: u32 = 8;
    const GLYPH_HEIGHT: u32 = 16;

    if width < GLYPH_WIDTH || height < GLYPH_HEIGHT || pitch < 4 || pitch % 4 != 0 {
        return false;
    }

    let mut term_cols = (width / GLYPH_WIDTH) as usize;
    let mut term_rows = (height / GLYPH_HEIGHT) as usize;
    if term_cols > FB_MAX_COLS {
        term_cols = FB_MAX_COLS;
    }
    if term_rows > FB_MAX_ROWS {
        term_rows = FB_MAX_ROWS;
    }
    if term_cols == 0 || term_rows == 0 {
        return false;
    }

    let mut state = CONSOLE.lock();
    state.backend = Backend::Framebuffer {
        addr,
        width,
        height,
        pitch_pixels: pitch / 4,
    };
    state.term_cols = term_cols;
    state.term_rows = term_rows;
    state.clear();
    true
}

pub fn clear() {
    CONSOLE.lock().clear();
}

pub fn putc(c: u8) {
    CONSOLE.lock().putc(c);
}

pub fn backspace() {
    CONSOLE.lock().backspace();
}

pub fn write_str(s: &str) {
    let mut state = CONSOLE.lock();
    for byte in s.bytes() {
        state.putc(byte);
    }
}

pub fn write_hex(value: u64) {
    write_str("0x");
    let mut state = CONSOLE.lock();
    for shift in (0..=60).rev().step_by(4) {
        let nibble = ((value >> shift) & 0xF) as u8;
        let c = if nibble < 10 { b'0' + nibble } else { b'A' + nibble - 10 };
        state.putc(c);
    }
}

pub fn write_dec(mut value: u64) {
    if value == 0 {
        putc(b'0');
        return;
    }
    let mut buf = [0u8; 20];
    let mut i = 0;
    while value > 0 && i < buf.len() {
        buf[i] = b'0' + (value % 10) as u8;
        value /= 10;
        i += 1;
    }
    let mut state = CONSOLE.lock();
    while i > 0 {
        i -= 1;
        state.putc(buf[i]);
    }
}

pub fn term_cols() -> usize {
    CONSOLE.lock().term_cols
}

pub fn term_rows() -> usize {
    CONSOLE.lock().term_rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sgr_reset_restores_defaults() {
        let mut state = ConsoleState {
            backend: Backend::VgaText,
            term_cols: VGA_WIDTH,
            term_rows: VGA_HEIGHT,
            cursor_row: 0,
            cursor_col: 0,
            saved_cursor_row: 0,
            saved_cursor_col: 0,
            ansi_fg: 2,
            ansi_bg: 3,
            ansi_state: AnsiState::Ground,
            ansi_params: [0; ANSI_MAX_PARAMS],
            ansi_param_count: 0,
            ansi_param_current: 0,
            ansi_param_active: false,
            utf8_codepoint: 0,
            utf8_needed: 0,
            utf8_total: 0,
            fb_cells: [[b' '; FB_MAX_COLS]; FB_MAX_ROWS],
            fb_cell_colors: [[0x0F; FB_MAX_COLS]; FB_MAX_ROWS],
        };
        state.sgr_apply(0);
        assert_eq!(state.ansi_fg, 15);
        assert_eq!(state.ansi_bg, 0);
    }

    #[test]
    fn bright_toggle_is_idempotent_above_eight() {
        let mut state = ConsoleState {
            backend: Backend::VgaText,
            term_cols: VGA_WIDTH,
            term_rows: VGA_HEIGHT,
            cursor_row: 0,
            cursor_col: 0,
            saved_cursor_row: 0,
            saved_cursor_col: 0,
            ansi_fg: 9,
            ansi_bg: 0,
            ansi_state: AnsiState::Ground,
            ansi_params: [0; ANSI_MAX_PARAMS],
            ansi_param_count: 0,
            ansi_param_current: 0,
            ansi_param_active: false,
            utf8_codepoint: 0,
            utf8_needed: 0,
            utf8_total: 0,
            fb_cells: [[b' '; FB_MAX_COLS]; FB_MAX_ROWS],
            fb_cell_colors: [[0x0F; FB_MAX_COLS]; FB_MAX_ROWS],
        };
        state.sgr_apply(1);
        assert_eq!(state.ansi_fg, 9);
    }
}
