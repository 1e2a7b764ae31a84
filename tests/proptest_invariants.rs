//! Fuzzes arbitrary byte streams against the structural invariants engine
//! state must hold after every processed chunk (SPEC_FULL §3), in the style
//! of the frankenterm-core conformance harness.

use proptest::prelude::*;

use rain_term::grid::MAX_SCROLLBACK;
use rain_term::{CellFlags, TerminalEngine};

fn dims() -> impl Strategy<Value = (u16, u16)> {
    (3u16..=40, 3u16..=120)
}

/// A byte likely to exercise interesting parser paths: printables, the C0
/// controls the engine honors, and fragments of common CSI/OSC/ESC
/// sequences, rather than uniform random bytes that mostly just abort CSI.
fn interesting_byte() -> impl Strategy<Value = u8> {
    prop_oneof![
        3 => b' '..=b'~',
        1 => Just(0x07u8),
        1 => Just(0x08u8),
        1 => Just(0x09u8),
        1 => Just(0x0au8),
        1 => Just(0x0du8),
        1 => Just(0x1bu8),
        1 => Just(b'['),
        1 => Just(b']'),
        1 => Just(b';'),
        1 => Just(b'?'),
    ]
}

fn assert_invariants(engine: &TerminalEngine) {
    let (rows, cols) = engine.dimensions();
    assert_eq!(engine.grid.visible_rows, rows, "grid row count must track dimensions");
    assert_eq!(engine.grid.cols, cols, "grid col count must track dimensions");

    assert!(engine.cursor.row < rows, "cursor row {} out of 0..{}", engine.cursor.row, rows);
    assert!(engine.cursor.col < cols, "cursor col {} out of 0..{}", engine.cursor.col, cols);

    assert!(engine.scroll_top <= engine.scroll_bottom);
    assert!(engine.scroll_bottom < rows);

    assert!(engine.grid.scrollback_len() <= MAX_SCROLLBACK);

    for r in 0..rows {
        let row = engine.grid.visible_row(r);
        assert_eq!(row.cells.len(), cols as usize);
        for c in 0..cols {
            let cell = row.cells[c as usize];
            if cell.flags.contains(CellFlags::WIDE_CHAR) {
                assert!(c + 1 < cols, "wide cell may never land on the last column");
                let partner = row.cells[(c + 1) as usize];
                assert!(
                    partner.flags.contains(CellFlags::WIDE_SPACER),
                    "wide cell at col {c} must be followed by a spacer"
                );
                assert_eq!(partner.bg, cell.bg, "spacer inherits the wide cell's background");
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn invariants_hold_after_arbitrary_byte_streams(
        (rows, cols) in dims(),
        bytes in prop::collection::vec(interesting_byte(), 0..400),
    ) {
        let mut engine = TerminalEngine::new(rows, cols);
        engine.process(&bytes);
        assert_invariants(&engine);
    }

    #[test]
    fn invariants_hold_across_resizes(
        (rows, cols) in dims(),
        (new_rows, new_cols) in dims(),
        bytes in prop::collection::vec(interesting_byte(), 0..200),
    ) {
        let mut engine = TerminalEngine::new(rows, cols);
        engine.process(&bytes);
        engine.resize(new_rows, new_cols);
        assert_invariants(&engine);
    }

    #[test]
    fn reset_always_returns_to_a_blank_default_state(
        (rows, cols) in dims(),
        bytes in prop::collection::vec(interesting_byte(), 0..300),
    ) {
        let mut engine = TerminalEngine::new(rows, cols);
        engine.process(&bytes);
        engine.reset();

        prop_assert_eq!(engine.cursor.row, 0);
        prop_assert_eq!(engine.cursor.col, 0);
        prop_assert_eq!(engine.scroll_top, 0);
        prop_assert_eq!(engine.scroll_bottom, rows.saturating_sub(1));
        prop_assert_eq!(engine.grid.scrollback_len(), 0);
        prop_assert_eq!(engine.extract_text(), "");
        assert_invariants(&engine);
    }
}
