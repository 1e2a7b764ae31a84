/// A small record of optional closures the engine invokes synchronously
/// while processing input (SPEC_FULL §9: "replace framework-style observers
/// with a small effect sink ... invoked synchronously").
///
/// All callbacks are optional; an embedder wires up only the ones it cares
/// about. The engine owns this sink and never leaks it outside `process()`.
#[derive(Default)]
pub struct EffectSink {
    pub on_change: Option<Box<dyn FnMut()>>,
    pub on_bell: Option<Box<dyn FnMut()>>,
    pub on_title_change: Option<Box<dyn FnMut(&str)>>,
    pub on_command_entered: Option<Box<dyn FnMut(&str)>>,
    pub on_response: Option<Box<dyn FnMut(&[u8])>>,
}

impl EffectSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn change(&mut self) {
        if let Some(f) = self.on_change.as_mut() {
            f();
        }
    }

    pub(crate) fn bell(&mut self) {
        if let Some(f) = self.on_bell.as_mut() {
            f();
        }
    }

    pub(crate) fn title_change(&mut self, title: &str) {
        if let Some(f) = self.on_title_change.as_mut() {
            f(title);
        }
    }

    pub(crate) fn command_entered(&mut self, command: &str) {
        if let Some(f) = self.on_command_entered.as_mut() {
            f(command);
        }
    }

    pub(crate) fn response(&mut self, bytes: &[u8]) {
        if let Some(f) = self.on_response.as_mut() {
            f(bytes);
        }
    }
}

impl std::fmt::Debug for EffectSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectSink")
            .field("on_change", &self.on_change.is_some())
            .field("on_bell", &self.on_bell.is_some())
            .field("on_title_change", &self.on_title_change.is_some())
            .field("on_command_entered", &self.on_command_entered.is_some())
            .field("on_response", &self.on_response.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn fires_only_wired_callbacks() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut sink = EffectSink::new();

        let c = calls.clone();
        sink.on_bell = Some(Box::new(move || c.borrow_mut().push("bell")));

        sink.bell();
        sink.change(); // unwired, must not panic
        sink.title_change("ignored");

        assert_eq!(*calls.borrow(), vec!["bell"]);
    }
}
