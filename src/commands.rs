//! User actions and the table that dispatches them
//!
//! Tray menu items and the global hotkey only produce a [`UserAction`]; the
//! handler registered for that action decides what happens.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Actions reachable from the tray menu or hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// Show the main window
    Open,
    /// Start, pause or resume protection
    ToggleProtection,
    /// Quit the application
    Exit,
}

impl UserAction {
    pub const ALL: [UserAction; 3] = [Self::Open, Self::ToggleProtection, Self::Exit];

    /// Stable identifier, also used as the tray menu item id
    pub fn id(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::ToggleProtection => "toggle-protection",
            Self::Exit => "exit",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }
}

/// Sending half of the action queue, shared with tray and hotkey callbacks
///
/// Those callbacks run on the platform event loop, whether or not the main
/// window is drawing; every queued action also wakes the UI loop.
#[derive(Clone)]
pub struct ActionSender {
    sender: Sender<UserAction>,
    wake: Arc<dyn Fn() + Send + Sync>,
}

impl ActionSender {
    pub fn send(&self, action: UserAction) {
        if self.sender.send(action).is_ok() {
            (self.wake)();
        }
    }
}

/// Create the action queue; `wake` is called after every queued action
pub fn action_channel(wake: impl Fn() + Send + Sync + 'static) -> (ActionSender, Receiver<UserAction>) {
    let (sender, receiver) = unbounded();
    (
        ActionSender {
            sender,
            wake: Arc::new(wake),
        },
        receiver,
    )
}

type Handler<C> = Box<dyn Fn(&mut C)>;

/// Maps each action to the callback that handles it
pub struct CommandTable<C> {
    handlers: HashMap<UserAction, Handler<C>>,
}

impl<C> Default for CommandTable<C> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<C> CommandTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one for the action
    pub fn register(&mut self, action: UserAction, handler: impl Fn(&mut C) + 'static) -> &mut Self {
        self.handlers.insert(action, Box::new(handler));
        self
    }

    #[cfg(test)]
    pub fn is_registered(&self, action: UserAction) -> bool {
        self.handlers.contains_key(&action)
    }

    /// Run the handler for `action`; returns false if none is registered
    pub fn dispatch(&self, action: UserAction, context: &mut C) -> bool {
        match self.handlers.get(&action) {
            Some(handler) => {
                debug!("Dispatching {:?}", action);
                handler(context);
                true
            }
            None => false,
        }
    }
}
