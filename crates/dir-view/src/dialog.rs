//! Dialog hook interface.
//!
//! The surrounding application hosts configuration dialogs around the view.
//! Instead of a base class with virtual overrides, a concrete dialog
//! implements only the hooks it needs and is composed into a `DialogHost`,
//! which owns the open/close lifecycle and dispatches messages.

/// Hook set a concrete dialog implements. Every hook has a default no-op.
pub trait DialogHooks {
    /// Called once when the dialog opens.
    fn on_init(&mut self) {}

    /// A command (button, menu item) was issued. Return `true` if handled.
    fn on_command(&mut self, _command: u32) -> bool {
        false
    }

    /// A control notification arrived. Return `true` if handled.
    fn on_notify(&mut self, _code: u32) -> bool {
        false
    }

    fn on_size(&mut self, _width: u32, _height: u32) {}

    /// The user asked to close. Return `false` to veto.
    fn on_close(&mut self) -> bool {
        true
    }

    /// Called once when the dialog is torn down.
    fn on_destroy(&mut self) {}

    /// Application-private messages outside the standard set.
    fn on_custom_message(&mut self, _message: u32, _param: u64) {}
}

/// A message routed to a hosted dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMessage {
    Command(u32),
    Notify(u32),
    Size { width: u32, height: u32 },
    Close,
    Custom { message: u32, param: u64 },
}

/// Drives a dialog's hooks through its lifecycle.
pub struct DialogHost<H: DialogHooks> {
    hooks: H,
    open: bool,
}

impl<H: DialogHooks> DialogHost<H> {
    pub fn new(hooks: H) -> Self {
        Self { hooks, open: false }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens the dialog, firing `on_init` once. Reopening an open dialog is
    /// a no-op.
    pub fn open(&mut self) {
        if self.open {
            return;
        }
        self.open = true;
        self.hooks.on_init();
    }

    /// Dispatches one message to the hooks. Returns `true` if the message was
    /// handled. Messages to a closed dialog are dropped.
    pub fn handle_message(&mut self, message: DialogMessage) -> bool {
        if !self.open {
            return false;
        }
        match message {
            DialogMessage::Command(command) => self.hooks.on_command(command),
            DialogMessage::Notify(code) => self.hooks.on_notify(code),
            DialogMessage::Size { width, height } => {
                self.hooks.on_size(width, height);
                true
            }
            DialogMessage::Close => {
                if self.hooks.on_close() {
                    self.open = false;
                    self.hooks.on_destroy();
                }
                true
            }
            DialogMessage::Custom { message, param } => {
                self.hooks.on_custom_message(message, param);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingDialog {
        inits: u32,
        commands: Vec<u32>,
        destroys: u32,
        veto_close: bool,
    }

    impl DialogHooks for RecordingDialog {
        fn on_init(&mut self) {
            self.inits += 1;
        }

        fn on_command(&mut self, command: u32) -> bool {
            self.commands.push(command);
            true
        }

        fn on_close(&mut self) -> bool {
            !self.veto_close
        }

        fn on_destroy(&mut self) {
            self.destroys += 1;
        }
    }

    #[test]
    fn test_lifecycle_dispatch() {
        let mut host = DialogHost::new(RecordingDialog::default());

        // Messages before open are dropped.
        assert!(!host.handle_message(DialogMessage::Command(1)));

        host.open();
        host.open(); // idempotent
        assert!(host.handle_message(DialogMessage::Command(7)));
        assert!(host.handle_message(DialogMessage::Close));

        assert!(!host.is_open());
        assert_eq!(host.hooks.inits, 1);
        assert_eq!(host.hooks.commands, [7]);
        assert_eq!(host.hooks.destroys, 1);
    }

    #[test]
    fn test_close_can_be_vetoed() {
        let mut host = DialogHost::new(RecordingDialog {
            veto_close: true,
            ..Default::default()
        });
        host.open();
        host.handle_message(DialogMessage::Close);
        assert!(host.is_open());
        assert_eq!(host.hooks.destroys, 0);
    }
}
