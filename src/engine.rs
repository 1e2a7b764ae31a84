use tracing::trace;
use vte::Perform;

use crate::color::{self, Color};
use crate::cursor::{CellAttrs, CursorShape, CursorState};
use crate::effects::EffectSink;
use crate::grid::{Cell, CellFlags, Grid, MAX_SCROLLBACK};
use crate::modes::TerminalModes;
use crate::wide;

/// Translate a DEC Special Graphics (G0 line-drawing) codepoint. Only active
/// while `charset_g0_drawing` is set; anything outside the mapped range
/// passes through unchanged.
fn dec_line_drawing_char(c: char) -> char {
    match c {
        'j' => '\u{2518}', // ┘
        'k' => '\u{2510}', // ┐
        'l' => '\u{250c}', // ┌
        'm' => '\u{2514}', // └
        'n' => '\u{253c}', // ┼
        'q' => '\u{2500}', // ─
        't' => '\u{251c}', // ├
        'u' => '\u{2524}', // ┤
        'v' => '\u{2534}', // ┴
        'w' => '\u{252c}', // ┬
        'x' => '\u{2502}', // │
        'a' => '\u{2592}', // ▒
        '~' => '\u{00b7}', // ·
        '_' => ' ',
        other => other,
    }
}

fn param(raw: &[u16], idx: usize, default: u16) -> u16 {
    match raw.get(idx) {
        Some(&0) | None => default,
        Some(&v) => v,
    }
}

/// A single VT/xterm-compatible terminal screen: the parser driver, grid,
/// cursor, and mode state, plus the effect sink an embedder wires up to
/// learn about bells, title changes, and host responses.
pub struct TerminalEngine {
    pub grid: Grid,
    alt_grid: Option<Grid>,
    using_alt: bool,
    saved_scroll_region: Option<(u16, u16)>,
    pub cursor: CursorState,
    pub modes: TerminalModes,
    pub scroll_top: u16,
    pub scroll_bottom: u16,
    pub title: String,
    pub current_directory: Option<String>,
    input_buffer: String,
    cols: u16,
    rows: u16,
    charset_g0_drawing: bool,
    last_printed_char: char,
    parser: vte::Parser,
    pub effects: EffectSink,
}

impl TerminalEngine {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self::with_scrollback_limit(rows, cols, MAX_SCROLLBACK)
    }

    pub fn with_scrollback_limit(rows: u16, cols: u16, scrollback_limit: usize) -> Self {
        Self {
            grid: Grid::with_scrollback_limit(rows, cols, scrollback_limit),
            alt_grid: None,
            using_alt: false,
            saved_scroll_region: None,
            cursor: CursorState::new(),
            modes: TerminalModes::default(),
            scroll_top: 0,
            scroll_bottom: rows.saturating_sub(1),
            title: String::new(),
            current_directory: None,
            input_buffer: String::new(),
            cols,
            rows,
            charset_g0_drawing: false,
            last_printed_char: ' ',
            parser: vte::Parser::new(),
            effects: EffectSink::new(),
        }
    }

    /// Feed a chunk of host output through the parser. Always fires
    /// `on_change` exactly once, even for an empty buffer.
    pub fn process(&mut self, bytes: &[u8]) {
        let mut parser = std::mem::replace(&mut self.parser, vte::Parser::new());
        for &b in bytes {
            parser.advance(self, b);
        }
        self.parser = parser;
        self.effects.change();
    }

    pub fn dimensions(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    /// Resize to new dimensions, preserving the overlapping top-left
    /// sub-rectangle of the primary screen (SPEC_FULL §4.10).
    pub fn resize(&mut self, rows: u16, cols: u16) {
        self.grid.resize(rows, cols);
        if let Some(alt) = self.alt_grid.as_mut() {
            alt.resize_no_scrollback(rows, cols);
        }
        self.rows = rows;
        self.cols = cols;
        self.scroll_top = 0;
        self.scroll_bottom = rows.saturating_sub(1);
        self.cursor.row = self.cursor.row.min(rows.saturating_sub(1));
        self.cursor.col = self.cursor.col.min(cols.saturating_sub(1));
    }

    /// Full reset (RIS / DECSTR), preserving the registered effect
    /// callbacks and the scrollback cap across the reset.
    pub fn reset(&mut self) {
        let rows = self.rows;
        let cols = self.cols;
        let scrollback_limit = self.grid.scrollback_limit;
        let effects = std::mem::take(&mut self.effects);
        let parser = std::mem::replace(&mut self.parser, vte::Parser::new());
        *self = Self::with_scrollback_limit(rows, cols, scrollback_limit);
        self.effects = effects;
        self.parser = parser;
    }

    /// Extract plain text: scrollback rows followed by the current grid's
    /// visible rows, each trimmed of trailing spaces, trailing blank rows
    /// dropped (SPEC_FULL §4.11).
    pub fn extract_text(&self) -> String {
        let grid = self.active_grid();
        let mut lines: Vec<String> = grid.rows.iter().map(|r| r.text()).collect();
        while lines.last().map_or(false, |l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    /// Append to the pending input buffer (local-echo staging area; the
    /// engine never interprets it, it's a courtesy store for the embedder's
    /// line editor).
    pub fn push_input(&mut self, s: &str) {
        self.input_buffer.push_str(s);
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
    }

    pub fn take_input(&self) -> &str {
        &self.input_buffer
    }

    /// Clear the input buffer and fire `on_command_entered` with its
    /// former contents, returning what was flushed.
    pub fn flush_input(&mut self) -> String {
        let s = std::mem::take(&mut self.input_buffer);
        self.effects.command_entered(&s);
        s
    }

    fn active_grid(&self) -> &Grid {
        if self.using_alt {
            self.alt_grid.as_ref().unwrap_or(&self.grid)
        } else {
            &self.grid
        }
    }

    fn active_grid_mut(&mut self) -> &mut Grid {
        if self.using_alt {
            self.alt_grid.as_mut().unwrap_or(&mut self.grid)
        } else {
            &mut self.grid
        }
    }

    fn enter_alt_screen(&mut self) {
        if self.using_alt {
            return;
        }
        self.saved_scroll_region = Some((self.scroll_top, self.scroll_bottom));
        let alt = Grid::with_scrollback_limit(self.rows, self.cols, 0);
        self.alt_grid = Some(alt);
        self.using_alt = true;
        self.modes.alt_screen = true;
        self.scroll_top = 0;
        self.scroll_bottom = self.rows.saturating_sub(1);
        self.cursor.row = 0;
        self.cursor.col = 0;
    }

    fn exit_alt_screen(&mut self) {
        self.alt_grid = None;
        self.using_alt = false;
        self.modes.alt_screen = false;
        if let Some((top, bottom)) = self.saved_scroll_region.take() {
            let max_row = self.rows.saturating_sub(1);
            self.scroll_top = top.min(max_row);
            self.scroll_bottom = bottom.min(max_row);
        }
    }

    fn clear_screen(&mut self) {
        let bg = self.cursor.bg;
        let grid = self.active_grid_mut();
        for row in grid.rows.iter_mut() {
            row.erase_with_bg(bg);
        }
    }

    fn linefeed(&mut self) {
        if self.cursor.row == self.scroll_bottom {
            self.scroll_up_n(1);
        } else if self.cursor.row < self.rows.saturating_sub(1) {
            self.cursor.row += 1;
        }
    }

    fn reverse_index(&mut self) {
        if self.cursor.row == self.scroll_top {
            self.scroll_down_n(1);
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
        }
    }

    fn carriage_return(&mut self) {
        self.cursor.col = 0;
    }

    fn backspace(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        }
    }

    fn tab(&mut self) {
        self.cursor.col = ((self.cursor.col / 8) + 1) * 8;
        self.cursor.col = self.cursor.col.min(self.cols.saturating_sub(1));
    }

    fn cursor_up(&mut self, n: u16) {
        self.cursor.row = self.cursor.row.saturating_sub(n.max(1));
    }

    fn cursor_down(&mut self, n: u16) {
        self.cursor.row = (self.cursor.row + n.max(1)).min(self.rows.saturating_sub(1));
    }

    fn cursor_forward(&mut self, n: u16) {
        self.cursor.col = (self.cursor.col + n.max(1)).min(self.cols.saturating_sub(1));
    }

    fn cursor_backward(&mut self, n: u16) {
        self.cursor.col = self.cursor.col.saturating_sub(n.max(1));
    }

    fn scroll_up_n(&mut self, n: u16) {
        let top = self.scroll_top;
        let bottom = self.scroll_bottom;
        for _ in 0..n.max(1) {
            self.active_grid_mut().scroll_up(top, bottom);
        }
    }

    fn scroll_down_n(&mut self, n: u16) {
        let top = self.scroll_top;
        let bottom = self.scroll_bottom;
        for _ in 0..n.max(1) {
            self.active_grid_mut().scroll_down(top, bottom);
        }
    }

    fn save_cursor(&mut self) {
        self.cursor.save();
    }

    fn restore_cursor(&mut self) {
        self.cursor.restore();
    }

    fn full_reset(&mut self) {
        self.reset();
    }

    /// Print a single already-resolved (charset-translated) character,
    /// following the wrap / insert / wide-pair steps of SPEC_FULL §4.4.
    fn write_printable(&mut self, c: char) {
        let width = wide::width(c);
        let cols = self.cols;

        if width == 2 && self.cursor.col == cols.saturating_sub(1) {
            if self.modes.autowrap {
                let row = self.cursor.row;
                let col = self.cursor.col;
                self.active_grid_mut().set_cell(row, col, Cell::default());
                self.carriage_return();
                self.linefeed();
            } else {
                return;
            }
        } else if self.cursor.col >= cols {
            if self.modes.autowrap {
                self.carriage_return();
                self.linefeed();
            } else {
                self.cursor.col = cols.saturating_sub(1);
            }
        }

        let row = self.cursor.row;
        let col = self.cursor.col;

        if self.modes.insert {
            self.active_grid_mut().insert_cells(row, col, width);
        }

        // Printing over half of an existing wide pair clears its partner
        // too, so a wide/spacer cell never ends up orphaned.
        {
            let grid = self.active_grid_mut();
            if col < grid.cols {
                let existing = grid.visible_row(row).cells[col as usize];
                if existing.flags.contains(CellFlags::WIDE_SPACER) && col > 0 {
                    grid.set_cell(row, col - 1, Cell::default());
                } else if existing.flags.contains(CellFlags::WIDE_CHAR) && col + 1 < grid.cols {
                    grid.set_cell(row, col + 1, Cell::default());
                }
            }
        }

        let cell = Cell {
            c,
            fg: self.cursor.fg,
            bg: self.cursor.bg,
            attrs: self.cursor.attrs,
            flags: if width == 2 {
                CellFlags::WIDE_CHAR
            } else {
                CellFlags::empty()
            },
        };
        let bg = self.cursor.bg;
        let grid = self.active_grid_mut();
        grid.set_cell(row, col, cell);
        if width == 2 && col + 1 < cols {
            grid.set_cell(row, col + 1, Cell::wide_spacer(bg));
        }

        self.cursor.col += width;
        self.last_printed_char = c;
    }

    fn erase_display(&mut self, mode: u16) {
        let bg = self.cursor.bg;
        let (row, col, rows, cols) = (self.cursor.row, self.cursor.col, self.rows, self.cols);
        match mode {
            0 => {
                self.active_grid_mut().erase_cells(row, col, cols, bg);
                for r in (row + 1)..rows {
                    self.active_grid_mut().erase_cells(r, 0, cols, bg);
                }
            }
            1 => {
                for r in 0..row {
                    self.active_grid_mut().erase_cells(r, 0, cols, bg);
                }
                self.active_grid_mut().erase_cells(row, 0, col + 1, bg);
            }
            2 => self.clear_screen(),
            3 => {
                self.clear_screen();
                self.active_grid_mut().clear_scrollback();
            }
            _ => {}
        }
    }

    fn erase_line(&mut self, mode: u16) {
        let bg = self.cursor.bg;
        let (row, col, cols) = (self.cursor.row, self.cursor.col, self.cols);
        match mode {
            0 => self.active_grid_mut().erase_cells(row, col, cols, bg),
            1 => self.active_grid_mut().erase_cells(row, 0, col + 1, bg),
            2 => self.active_grid_mut().erase_cells(row, 0, cols, bg),
            _ => {}
        }
    }

    fn insert_lines(&mut self, n: u16) {
        if self.cursor.row < self.scroll_top || self.cursor.row > self.scroll_bottom {
            return;
        }
        let bottom = self.scroll_bottom;
        let row = self.cursor.row;
        for _ in 0..n.max(1) {
            self.active_grid_mut().scroll_down(row, bottom);
        }
    }

    fn delete_lines(&mut self, n: u16) {
        if self.cursor.row < self.scroll_top || self.cursor.row > self.scroll_bottom {
            return;
        }
        let bottom = self.scroll_bottom;
        let row = self.cursor.row;
        for _ in 0..n.max(1) {
            self.active_grid_mut().scroll_up(row, bottom);
        }
    }

    fn erase_chars(&mut self, n: u16) {
        let bg = self.cursor.bg;
        let (row, col) = (self.cursor.row, self.cursor.col);
        self.active_grid_mut().erase_cells(row, col, col + n.max(1), bg);
    }

    fn insert_chars(&mut self, n: u16) {
        let (row, col) = (self.cursor.row, self.cursor.col);
        self.active_grid_mut().insert_cells(row, col, n.max(1));
    }

    fn delete_chars(&mut self, n: u16) {
        let (row, col) = (self.cursor.row, self.cursor.col);
        self.active_grid_mut().delete_cells(row, col, n.max(1));
    }

    fn handle_sgr(&mut self, params: &[u16]) {
        if params.is_empty() {
            self.cursor.attrs = CellAttrs::empty();
            self.cursor.fg = Color::Default;
            self.cursor.bg = Color::Default;
            return;
        }

        let mut i = 0;
        while i < params.len() {
            match params[i] {
                0 => {
                    self.cursor.attrs = CellAttrs::empty();
                    self.cursor.fg = Color::Default;
                    self.cursor.bg = Color::Default;
                }
                1 => self.cursor.attrs.insert(CellAttrs::BOLD),
                2 => self.cursor.attrs.insert(CellAttrs::DIM),
                3 => self.cursor.attrs.insert(CellAttrs::ITALIC),
                4 => self.cursor.attrs.insert(CellAttrs::UNDERLINE),
                5 => self.cursor.attrs.insert(CellAttrs::BLINK),
                7 => std::mem::swap(&mut self.cursor.fg, &mut self.cursor.bg),
                8 => self.cursor.attrs.insert(CellAttrs::HIDDEN),
                9 => self.cursor.attrs.insert(CellAttrs::STRIKETHROUGH),
                22 => self.cursor.attrs.remove(CellAttrs::BOLD | CellAttrs::DIM),
                23 => self.cursor.attrs.remove(CellAttrs::ITALIC),
                24 => self.cursor.attrs.remove(CellAttrs::UNDERLINE),
                25 => self.cursor.attrs.remove(CellAttrs::BLINK),
                27 => {
                    self.cursor.fg = Color::Default;
                    self.cursor.bg = Color::Default;
                }
                28 => self.cursor.attrs.remove(CellAttrs::HIDDEN),
                29 => self.cursor.attrs.remove(CellAttrs::STRIKETHROUGH),
                30..=37 => self.cursor.fg = Color::Indexed((params[i] - 30) as u8),
                39 => self.cursor.fg = Color::Default,
                40..=47 => self.cursor.bg = Color::Indexed((params[i] - 40) as u8),
                49 => self.cursor.bg = Color::Default,
                90..=97 => self.cursor.fg = Color::Indexed((params[i] - 90 + 8) as u8),
                100..=107 => self.cursor.bg = Color::Indexed((params[i] - 100 + 8) as u8),
                38 | 48 => {
                    let target = params[i];
                    match params.get(i + 1) {
                        Some(5) => {
                            if let Some(&idx) = params.get(i + 2) {
                                let color = color::palette256(idx as u8);
                                if target == 38 {
                                    self.cursor.fg = color;
                                } else {
                                    self.cursor.bg = color;
                                }
                            }
                            i += 2;
                        }
                        Some(2) => {
                            if let (Some(&r), Some(&g), Some(&b)) =
                                (params.get(i + 2), params.get(i + 3), params.get(i + 4))
                            {
                                let color = Color::Rgb(r as u8, g as u8, b as u8);
                                if target == 38 {
                                    self.cursor.fg = color;
                                } else {
                                    self.cursor.bg = color;
                                }
                            }
                            i += 4;
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    fn recompute_scroll_region(&mut self, raw: &[u16]) {
        let top = param(raw, 0, 1).saturating_sub(1);
        let bottom = param(raw, 1, self.rows)
            .saturating_sub(1)
            .min(self.rows.saturating_sub(1));
        if top < bottom {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
            self.cursor.row = if self.modes.origin { self.scroll_top } else { 0 };
            self.cursor.col = 0;
        }
    }

    fn set_mode_bit(&mut self, code: u16, private: bool, enable: bool) {
        if private {
            match code {
                1 => self.modes.cursor_keys_application = enable,
                6 => {
                    self.modes.origin = enable;
                    self.cursor.row = if enable { self.scroll_top } else { 0 };
                    self.cursor.col = 0;
                }
                7 => self.modes.autowrap = enable,
                25 => {
                    self.modes.cursor_visible = enable;
                    self.cursor.visible = enable;
                }
                1000 => self.modes.mouse_tracking = enable,
                1002 => self.modes.mouse_motion = enable,
                1003 => self.modes.mouse_all_motion = enable,
                1004 => self.modes.focus_events = enable,
                1006 => self.modes.sgr_mouse = enable,
                1048 => {
                    if enable {
                        self.save_cursor();
                    } else {
                        self.restore_cursor();
                    }
                }
                47 => {
                    if enable {
                        self.enter_alt_screen();
                    } else {
                        self.exit_alt_screen();
                    }
                }
                1047 => {
                    if enable {
                        self.enter_alt_screen();
                        self.clear_screen();
                    } else {
                        self.exit_alt_screen();
                    }
                }
                1049 => {
                    if enable {
                        self.save_cursor();
                        self.enter_alt_screen();
                        self.clear_screen();
                    } else {
                        self.exit_alt_screen();
                        self.restore_cursor();
                    }
                }
                2004 => self.modes.bracketed_paste = enable,
                2026 => self.modes.synchronized_output = enable,
                _ => {}
            }
        } else {
            match code {
                4 => self.modes.insert = enable,
                20 => self.modes.linefeed_newline = enable,
                _ => {}
            }
        }
    }

    fn report_mode(&mut self, code: u16, private: bool) {
        let state = self.mode_state(code, private);
        let reply = if private {
            format!("\x1b[?{};{}$y", code, state)
        } else {
            format!("\x1b[{};{}$y", code, state)
        };
        self.effects.response(reply.as_bytes());
    }

    fn mode_state(&self, code: u16, private: bool) -> u16 {
        // 0 = not recognized, 1 = set, 2 = reset, 3/4 = permanently set/reset
        if private {
            match code {
                1 => bit(self.modes.cursor_keys_application),
                6 => bit(self.modes.origin),
                7 => bit(self.modes.autowrap),
                25 => bit(self.modes.cursor_visible),
                1000 => bit(self.modes.mouse_tracking),
                1002 => bit(self.modes.mouse_motion),
                1003 => bit(self.modes.mouse_all_motion),
                1004 => bit(self.modes.focus_events),
                1006 => bit(self.modes.sgr_mouse),
                47 | 1047 | 1049 => bit(self.modes.alt_screen),
                2004 => bit(self.modes.bracketed_paste),
                2026 => bit(self.modes.synchronized_output),
                _ => 0,
            }
        } else {
            match code {
                4 => bit(self.modes.insert),
                20 => bit(self.modes.linefeed_newline),
                _ => 0,
            }
        }
    }

    fn handle_osc(&mut self, params: &[&[u8]]) {
        if params.is_empty() {
            return;
        }
        match params[0] {
            b"0" | b"2" => {
                if let Some(title) = params.get(1) {
                    self.title = String::from_utf8_lossy(title).into_owned();
                    let title = self.title.clone();
                    self.effects.title_change(&title);
                }
            }
            b"7" => {
                if let Some(uri) = params.get(1) {
                    let uri = String::from_utf8_lossy(uri);
                    let path = uri
                        .strip_prefix("file://")
                        .and_then(|rest| rest.find('/').map(|i| &rest[i..]))
                        .unwrap_or(&uri)
                        .to_string();
                    self.current_directory = Some(path.clone());
                    self.effects.title_change(&path);
                }
            }
            _ => {
                trace!("dropping unhandled OSC sequence");
            }
        }
    }
}

fn bit(set: bool) -> u16 {
    if set {
        1
    } else {
        2
    }
}

impl Perform for TerminalEngine {
    fn print(&mut self, c: char) {
        let c = if self.charset_g0_drawing {
            dec_line_drawing_char(c)
        } else {
            c
        };
        self.write_printable(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            0x07 => self.effects.bell(),
            0x08 => self.backspace(),
            0x09 => self.tab(),
            0x0a | 0x0b | 0x0c => {
                self.linefeed();
                if self.modes.linefeed_newline {
                    self.carriage_return();
                }
            }
            0x0d => self.carriage_return(),
            _ => {}
        }
    }

    fn hook(&mut self, _params: &vte::Params, _intermediates: &[u8], _ignore: bool, _action: char) {
        // DCS payloads (XTGETTCAP, DECRQSS, Sixel, tmux control mode) are
        // consumed and discarded as plain string sequences.
    }

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        self.handle_osc(params);
    }

    fn csi_dispatch(
        &mut self,
        params: &vte::Params,
        intermediates: &[u8],
        ignore: bool,
        action: char,
    ) {
        if ignore {
            return;
        }
        let raw: Vec<u16> = params.iter().map(|p| p.first().copied().unwrap_or(0)).collect();
        let has_question = intermediates.first() == Some(&b'?');
        let has_dollar = intermediates.first() == Some(&b'$') || intermediates.get(1) == Some(&b'$');
        let has_gt = intermediates.first() == Some(&b'>');
        let has_eq = intermediates.first() == Some(&b'=');
        let has_bang = intermediates.first() == Some(&b'!');

        if has_dollar {
            match action {
                'p' => {
                    for &code in raw.iter() {
                        self.report_mode(code, has_question);
                    }
                }
                _ => {}
            }
            return;
        }

        if has_bang && action == 'p' {
            self.full_reset();
            return;
        }

        if has_question {
            match action {
                'h' => {
                    for &code in raw.iter() {
                        self.set_mode_bit(code, true, true);
                    }
                }
                'l' => {
                    for &code in raw.iter() {
                        self.set_mode_bit(code, true, false);
                    }
                }
                _ => {}
            }
            return;
        }

        match action {
            'h' => {
                for &code in raw.iter() {
                    self.set_mode_bit(code, false, true);
                }
            }
            'l' => {
                for &code in raw.iter() {
                    self.set_mode_bit(code, false, false);
                }
            }
            'm' => self.handle_sgr(&raw),
            'A' => self.cursor_up(param(&raw, 0, 1)),
            'B' => self.cursor_down(param(&raw, 0, 1)),
            'C' => self.cursor_forward(param(&raw, 0, 1)),
            'D' => self.cursor_backward(param(&raw, 0, 1)),
            'E' => {
                self.cursor_down(param(&raw, 0, 1));
                self.carriage_return();
            }
            'F' => {
                self.cursor_up(param(&raw, 0, 1));
                self.carriage_return();
            }
            'G' | '`' => {
                self.cursor.col = (param(&raw, 0, 1) - 1).min(self.cols.saturating_sub(1));
            }
            'd' => {
                let row = param(&raw, 0, 1) - 1;
                self.cursor.row = if self.modes.origin {
                    (self.scroll_top + row).min(self.scroll_bottom)
                } else {
                    row.min(self.rows.saturating_sub(1))
                };
            }
            'H' | 'f' => {
                let row = param(&raw, 0, 1) - 1;
                self.cursor.row = if self.modes.origin {
                    (self.scroll_top + row).min(self.scroll_bottom)
                } else {
                    row.min(self.rows.saturating_sub(1))
                };
                self.cursor.col = (param(&raw, 1, 1) - 1).min(self.cols.saturating_sub(1));
            }
            'J' => self.erase_display(param(&raw, 0, 0)),
            'K' => self.erase_line(param(&raw, 0, 0)),
            'L' => self.insert_lines(param(&raw, 0, 1)),
            'M' => self.delete_lines(param(&raw, 0, 1)),
            'P' => self.delete_chars(param(&raw, 0, 1)),
            '@' => self.insert_chars(param(&raw, 0, 1)),
            'X' => self.erase_chars(param(&raw, 0, 1)),
            'S' => self.scroll_up_n(param(&raw, 0, 1)),
            'T' => self.scroll_down_n(param(&raw, 0, 1)),
            'r' => self.recompute_scroll_region(&raw),
            'b' => {
                let count = param(&raw, 0, 1).min(2048);
                let c = self.last_printed_char;
                for _ in 0..count {
                    self.write_printable(c);
                }
            }
            's' => self.save_cursor(),
            'u' => self.restore_cursor(),
            'q' if intermediates.first() == Some(&b' ') => {
                self.cursor.shape = match param(&raw, 0, 1) {
                    0 | 1 | 2 => CursorShape::Block,
                    3 | 4 => CursorShape::Underline,
                    5 | 6 => CursorShape::Bar,
                    _ => self.cursor.shape,
                };
            }
            'n' => match param(&raw, 0, 0) {
                5 => self.effects.response(b"\x1b[0n"),
                6 => {
                    let reply = format!("\x1b[{};{}R", self.cursor.row + 1, self.cursor.col + 1);
                    self.effects.response(reply.as_bytes());
                }
                _ => {}
            },
            'c' if has_eq => {
                // Tertiary DA: not answered.
            }
            'c' if has_gt => {
                self.effects.response(b"\x1b[>0;0;0c");
            }
            'c' => {
                self.effects.response(b"\x1b[?1;2c");
            }
            _ => {}
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        match (byte, intermediates) {
            (b'c', []) => self.full_reset(),
            (b'D', []) => self.linefeed(),
            (b'M', []) => self.reverse_index(),
            (b'E', []) => {
                self.carriage_return();
                self.linefeed();
            }
            (b'7', []) => self.save_cursor(),
            (b'8', []) => self.restore_cursor(),
            (b'0', [b'(']) | (b'B', [b'(']) => {
                self.charset_g0_drawing = byte == b'0';
            }
            _ => {}
        }
    }
}
