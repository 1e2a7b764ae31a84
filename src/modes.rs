/// Terminal mode flags tracking the DEC and ANSI modes this engine honors,
/// plus the toggles it only accepts-and-ignores (tracked so DECRQM can
/// answer truthfully, per SPEC_FULL §4.2).
#[derive(Debug, Clone)]
pub struct TerminalModes {
    /// DECCKM: cursor key mode (application vs normal)
    pub cursor_keys_application: bool,
    /// DECOM: origin mode
    pub origin: bool,
    /// DECAWM: auto-wrap mode
    pub autowrap: bool,
    /// DECTCEM: text cursor visible
    pub cursor_visible: bool,
    /// Mouse tracking (mode 1000) — accepted/ignored, tracked for DECRPM only
    pub mouse_tracking: bool,
    /// Mouse motion tracking (mode 1002) — accepted/ignored
    pub mouse_motion: bool,
    /// Mouse all-motion tracking (mode 1003) — accepted/ignored
    pub mouse_all_motion: bool,
    /// SGR mouse reporting (mode 1006) — accepted/ignored
    pub sgr_mouse: bool,
    /// Focus events (mode 1004) — accepted/ignored
    pub focus_events: bool,
    /// Synchronized output (mode 2026) — accepted/ignored
    pub synchronized_output: bool,
    /// Bracketed paste mode (mode 2004)
    pub bracketed_paste: bool,
    /// Alternate screen active
    pub alt_screen: bool,
    /// Insert mode (IRM)
    pub insert: bool,
    /// Line feed / new line mode (LNM)
    pub linefeed_newline: bool,
}

impl Default for TerminalModes {
    fn default() -> Self {
        Self {
            cursor_keys_application: false,
            origin: false,
            autowrap: true,
            cursor_visible: true,
            mouse_tracking: false,
            mouse_motion: false,
            mouse_all_motion: false,
            sgr_mouse: false,
            focus_events: false,
            synchronized_output: false,
            bracketed_paste: false,
            alt_screen: false,
            insert: false,
            linefeed_newline: false,
        }
    }
}
