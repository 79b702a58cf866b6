//! Local undo/redo engine
//!
//! A stack pair scoped to one open transaction. Actions are opaque: the
//! engine only sequences them, so the correctness of each action's inverse
//! is entirely the author's responsibility. Pushing after an undo discards
//! the redo stack (linear history, no branches).

/// A reversible edit recorded during an active transaction.
///
/// Implementations own whatever state handle they need to re-apply or
/// invert the edit; the engine never inspects the effect.
pub trait LocalAction {
    /// Machine-readable tag ("ADD_VERTEX", "MOVE_POLE", ...)
    fn label(&self) -> &str;

    /// Human-readable description for history UI
    fn description(&self) -> &str;

    /// Revert the edit
    fn undo(&mut self);

    /// Re-apply the edit
    fn redo(&mut self);
}

impl<A: LocalAction + ?Sized> LocalAction for Box<A> {
    fn label(&self) -> &str {
        (**self).label()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn undo(&mut self) {
        (**self).undo()
    }

    fn redo(&mut self) {
        (**self).redo()
    }
}

/// Convenience [`LocalAction`] built from a pair of closures.
pub struct CallbackAction {
    label: String,
    description: String,
    undo_fn: Box<dyn FnMut() + Send>,
    redo_fn: Box<dyn FnMut() + Send>,
}

impl CallbackAction {
    pub fn new(
        label: impl Into<String>,
        description: impl Into<String>,
        undo_fn: impl FnMut() + Send + 'static,
        redo_fn: impl FnMut() + Send + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            undo_fn: Box::new(undo_fn),
            redo_fn: Box::new(redo_fn),
        }
    }
}

impl LocalAction for CallbackAction {
    fn label(&self) -> &str {
        &self.label
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn undo(&mut self) {
        (self.undo_fn)()
    }

    fn redo(&mut self) {
        (self.redo_fn)()
    }
}

impl std::fmt::Debug for CallbackAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackAction")
            .field("label", &self.label)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// LIFO undo/redo stacks over opaque actions.
#[derive(Debug)]
pub struct UndoHistory<A> {
    undo_stack: Vec<A>,
    redo_stack: Vec<A>,
}

impl<A> Default for UndoHistory<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> UndoHistory<A> {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl<A: LocalAction> UndoHistory<A> {
    /// Record a new action. Any redone-away branch is discarded.
    pub fn push(&mut self, action: A) {
        self.undo_stack.push(action);
        self.redo_stack.clear();
    }

    /// Invert the most recent action. Returns false when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(mut action) => {
                action.undo();
                self.redo_stack.push(action);
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone action. Returns false when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(mut action) => {
                action.redo();
                self.undo_stack.push(action);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recording_action(tag: &str, log: &Arc<Mutex<Vec<String>>>) -> CallbackAction {
        let undo_log = Arc::clone(log);
        let redo_log = Arc::clone(log);
        let undo_tag = format!("undo-{tag}");
        let redo_tag = format!("redo-{tag}");
        CallbackAction::new(
            tag.to_string(),
            format!("action {tag}"),
            move || undo_log.lock().expect("lock").push(undo_tag.clone()),
            move || redo_log.lock().expect("lock").push(redo_tag.clone()),
        )
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut history: UndoHistory<CallbackAction> = UndoHistory::new();
        assert!(!history.undo());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_runs_in_lifo_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut history = UndoHistory::new();
        for tag in ["1", "2", "3"] {
            history.push(recording_action(tag, &log));
        }

        while history.undo() {}

        assert_eq!(
            *log.lock().expect("lock"),
            vec!["undo-3", "undo-2", "undo-1"]
        );
    }

    #[test]
    fn test_redo_runs_in_push_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut history = UndoHistory::new();
        for tag in ["1", "2", "3"] {
            history.push(recording_action(tag, &log));
        }
        while history.undo() {}
        log.lock().expect("lock").clear();

        while history.redo() {}

        assert_eq!(
            *log.lock().expect("lock"),
            vec!["redo-1", "redo-2", "redo-3"]
        );
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_after_undo_discards_redo_branch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut history = UndoHistory::new();
        history.push(recording_action("1", &log));
        history.push(recording_action("2", &log));

        assert!(history.undo());
        assert!(history.can_redo());

        history.push(recording_action("3", &log));
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn test_each_undo_invoked_exactly_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut history = UndoHistory::new();
        for tag in ["a", "b"] {
            history.push(recording_action(tag, &log));
        }
        assert!(history.undo());
        assert!(history.undo());
        assert!(!history.undo());

        let entries = log.lock().expect("lock").clone();
        assert_eq!(
            entries.iter().filter(|e| *e == "undo-a").count(),
            1,
            "each action's undo runs once"
        );
        assert_eq!(entries.iter().filter(|e| *e == "undo-b").count(), 1);
    }
}
