//! Presentation mode: fullscreen and the quick-settings overlay
//!
//! The controller never decides on its own whether the display is
//! fullscreen. It asks a `FullscreenHost`, and it follows the host when the
//! host leaves fullscreen by itself (an escape gesture, the terminal
//! becoming too small).

/// Why the host refused to present
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error(
        "presentation mode needs at least {min_width}x{min_height} cells (terminal is {width}x{height})"
    )]
    TooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
}

/// Something that can give the teleprompter exclusive use of the display
pub trait FullscreenHost {
    /// Ask for exclusive presentation
    fn request_fullscreen(&mut self) -> Result<(), CapabilityError>;

    /// Release exclusive presentation
    fn exit_fullscreen(&mut self);

    /// Host-originated change since the last call, if any
    ///
    /// `Some(false)` means the host left fullscreen without being asked.
    fn take_change(&mut self) -> Option<bool>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PresentationController {
    is_fullscreen: bool,
    overlay_open: bool,
}

impl PresentationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    /// Only ever true while fullscreen
    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    pub fn enter_fullscreen(&mut self, host: &mut dyn FullscreenHost) -> Result<(), CapabilityError> {
        if self.is_fullscreen {
            return Ok(());
        }
        match host.request_fullscreen() {
            Ok(()) => {
                self.is_fullscreen = true;
                tracing::debug!("Entered presentation mode");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Fullscreen request refused: {}", e);
                Err(e)
            }
        }
    }

    pub fn exit_fullscreen(&mut self, host: &mut dyn FullscreenHost) {
        if self.is_fullscreen {
            host.exit_fullscreen();
            tracing::debug!("Left presentation mode");
        }
        self.is_fullscreen = false;
        self.overlay_open = false;
    }

    pub fn toggle_fullscreen(&mut self, host: &mut dyn FullscreenHost) -> Result<(), CapabilityError> {
        if self.is_fullscreen {
            self.exit_fullscreen(host);
            Ok(())
        } else {
            self.enter_fullscreen(host)
        }
    }

    /// Follow a fullscreen change the host made on its own
    pub fn sync_with_host(&mut self, host_fullscreen: bool) {
        if self.is_fullscreen && !host_fullscreen {
            tracing::debug!("Presentation mode ended by the host");
        }
        self.is_fullscreen = host_fullscreen;
        if !host_fullscreen {
            self.overlay_open = false;
        }
    }

    /// Flip the overlay; ignored outside fullscreen
    pub fn toggle_overlay(&mut self) -> bool {
        if !self.is_fullscreen {
            return false;
        }
        self.overlay_open = !self.overlay_open;
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Host that grants or refuses on demand and can leave on its own
    #[derive(Default)]
    pub(crate) struct FakeHost {
        pub refuse: bool,
        pub active: bool,
        pub change: Option<bool>,
    }

    impl FakeHost {
        pub fn escape(&mut self) {
            if self.active {
                self.active = false;
                self.change = Some(false);
            }
        }
    }

    impl FullscreenHost for FakeHost {
        fn request_fullscreen(&mut self) -> Result<(), CapabilityError> {
            if self.refuse {
                return Err(CapabilityError::TooSmall {
                    width: 1,
                    height: 1,
                    min_width: 20,
                    min_height: 5,
                });
            }
            self.active = true;
            Ok(())
        }

        fn exit_fullscreen(&mut self) {
            self.active = false;
        }

        fn take_change(&mut self) -> Option<bool> {
            self.change.take()
        }
    }

    #[test]
    fn refused_request_leaves_state_unchanged() {
        let mut host = FakeHost {
            refuse: true,
            ..Default::default()
        };
        let mut controller = PresentationController::new();
        assert!(controller.enter_fullscreen(&mut host).is_err());
        assert!(!controller.is_fullscreen());
    }

    #[test]
    fn overlay_only_toggles_in_fullscreen() {
        let mut host = FakeHost::default();
        let mut controller = PresentationController::new();

        assert!(!controller.toggle_overlay());
        assert!(!controller.overlay_open());

        controller.enter_fullscreen(&mut host).unwrap();
        assert!(controller.toggle_overlay());
        assert!(controller.overlay_open());
        assert!(controller.toggle_overlay());
        assert!(!controller.overlay_open());
    }

    #[test]
    fn exit_forces_overlay_closed() {
        let mut host = FakeHost::default();
        let mut controller = PresentationController::new();
        controller.enter_fullscreen(&mut host).unwrap();
        controller.toggle_overlay();

        controller.exit_fullscreen(&mut host);
        assert!(!controller.is_fullscreen());
        assert!(!controller.overlay_open());
        assert!(!host.active);
    }

    #[test]
    fn external_exit_resyncs_without_exit_call() {
        let mut host = FakeHost::default();
        let mut controller = PresentationController::new();
        controller.enter_fullscreen(&mut host).unwrap();
        controller.toggle_overlay();

        host.escape();
        if let Some(state) = host.take_change() {
            controller.sync_with_host(state);
        }
        assert!(!controller.is_fullscreen());
        assert!(!controller.overlay_open());
    }
}
