use std::cell::RefCell;
use std::rc::Rc;

use rain_term::color::Color;
use rain_term::TerminalEngine;

fn responses(engine: &mut TerminalEngine) -> Rc<RefCell<Vec<Vec<u8>>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    engine.effects.on_response = Some(Box::new(move |bytes| sink.borrow_mut().push(bytes.to_vec())));
    log
}

#[test]
fn s1_hello_plain() {
    let mut engine = TerminalEngine::new(25, 80);
    engine.process(b"Hi");
    assert_eq!(engine.grid.visible_row(0).cells[0].c, 'H');
    assert_eq!(engine.grid.visible_row(0).cells[1].c, 'i');
    assert_eq!(engine.cursor.row, 0);
    assert_eq!(engine.cursor.col, 2);
}

#[test]
fn s2_wrap() {
    let mut engine = TerminalEngine::new(25, 80);
    let input = vec![b'A'; 81];
    engine.process(&input);
    for col in 0..80 {
        assert_eq!(engine.grid.visible_row(0).cells[col].c, 'A');
    }
    assert_eq!(engine.grid.visible_row(1).cells[0].c, 'A');
    assert_eq!(engine.cursor.row, 1);
    assert_eq!(engine.cursor.col, 1);
}

#[test]
fn s3_wide_char_wrap() {
    let mut engine = TerminalEngine::new(3, 2);
    engine.cursor.col = 1;
    engine.process("\u{4e00}".as_bytes());
    assert_eq!(engine.grid.visible_row(0).cells[1].c, ' ');
    assert_eq!(engine.grid.visible_row(1).cells[0].c, '\u{4e00}');
    assert!(engine.grid.visible_row(1).cells[0].flags.contains(rain_term::CellFlags::WIDE_CHAR));
    assert!(engine.grid.visible_row(1).cells[1].flags.contains(rain_term::CellFlags::WIDE_SPACER));
    assert_eq!(engine.cursor.row, 1);
    assert_eq!(engine.cursor.col, 2);
}

#[test]
fn s4_csi_cursor_and_erase() {
    let mut engine = TerminalEngine::new(25, 80);
    engine.process(b"\x1b[2J\x1b[5;10HX");
    assert_eq!(engine.grid.visible_row(4).cells[9].c, 'X');
    assert_eq!(engine.cursor.row, 4);
    assert_eq!(engine.cursor.col, 10);
    for row in 0..25 {
        for col in 0..80 {
            if row == 4 && col == 9 {
                continue;
            }
            assert_eq!(engine.grid.visible_row(row).cells[col].c, ' ');
        }
    }
}

#[test]
fn s5_primary_da_reply() {
    let mut engine = TerminalEngine::new(25, 80);
    let log = responses(&mut engine);
    engine.process(b"\x1b[c");
    assert_eq!(*log.borrow(), vec![b"\x1b[?1;2c".to_vec()]);
}

#[test]
fn s6_alternate_screen_round_trip() {
    let mut engine = TerminalEngine::new(25, 80);
    engine.process(b"abc\n");
    let cursor_before = (engine.cursor.row, engine.cursor.col);
    let before: Vec<char> = engine.grid.visible_row(0).cells[0..3].iter().map(|c| c.c).collect();
    let scrollback_before = engine.grid.scrollback_len();

    engine.process(b"\x1b[?1049h\x1b[2J\x1b[?1049l");

    let after: Vec<char> = engine.grid.visible_row(0).cells[0..3].iter().map(|c| c.c).collect();
    assert_eq!(before, after);
    assert_eq!(cursor_before, (engine.cursor.row, engine.cursor.col));
    assert_eq!(scrollback_before, engine.grid.scrollback_len());
}

#[test]
fn s7_osc7_cwd() {
    let mut engine = TerminalEngine::new(25, 80);
    let titles = Rc::new(RefCell::new(Vec::new()));
    let sink = titles.clone();
    engine.effects.on_title_change = Some(Box::new(move |t| sink.borrow_mut().push(t.to_string())));

    engine.process(b"\x1b]7;file:///Users/x\x07");

    assert_eq!(engine.current_directory.as_deref(), Some("/Users/x"));
    assert_eq!(*titles.borrow(), vec!["/Users/x".to_string()]);
}

#[test]
fn s8_sgr_truecolor() {
    let mut engine = TerminalEngine::new(25, 80);
    engine.process(b"\x1b[38;2;10;20;30mA");
    let cell = engine.grid.visible_row(0).cells[0];
    assert_eq!(cell.c, 'A');
    assert_eq!(cell.fg, Color::Rgb(10, 20, 30));
}

#[test]
fn cpr_reports_one_based_cursor_position() {
    let mut engine = TerminalEngine::new(25, 80);
    let log = responses(&mut engine);
    engine.process(b"\x1b[5;10H\x1b[6n");
    assert_eq!(*log.borrow(), vec![b"\x1b[5;10R".to_vec()]);
}

#[test]
fn decrqm_reports_tracked_mode_state() {
    let mut engine = TerminalEngine::new(25, 80);
    let log = responses(&mut engine);
    engine.process(b"\x1b[?25$p");
    assert_eq!(*log.borrow(), vec![b"\x1b[?25;1$y".to_vec()]);

    engine.process(b"\x1b[?25l");
    log.borrow_mut().clear();
    engine.process(b"\x1b[?25$p");
    assert_eq!(*log.borrow(), vec![b"\x1b[?25;2$y".to_vec()]);
}

#[test]
fn ris_restores_default_modes_and_clears_grid() {
    let mut engine = TerminalEngine::new(25, 80);
    engine.process(b"\x1b[?7l\x1b[?25lHi\x1bc");
    assert!(engine.modes.autowrap);
    assert!(engine.modes.cursor_visible);
    assert_eq!(engine.cursor.row, 0);
    assert_eq!(engine.cursor.col, 0);
    assert_eq!(engine.grid.visible_row(0).cells[0].c, ' ');
}
