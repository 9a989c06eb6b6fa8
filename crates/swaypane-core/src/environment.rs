//! Immutable environment resolved once per update pass.

/// Design language the host is imitating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    #[default]
    Ios,
    Android,
    Desktop,
}

/// How raw drag distance is turned into on-screen movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RubberProfile {
    /// Resistance grows with distance (iOS feel).
    Resisted,
    /// Distance is applied as-is.
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ViewWidth {
    SmallMobile,
    #[default]
    Mobile,
    SmallTablet,
    Tablet,
    Desktop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ViewHeight {
    ExtraSmall,
    Small,
    #[default]
    Medium,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    pub platform: Platform,
    /// Running inside an embedding web view (swipe-back is handled by the app).
    pub is_webview: bool,
    pub transition_motion_enabled: bool,
    /// Whether the split column hosting the view animates panel changes.
    pub split_col_animate: bool,
    pub has_mouse: bool,
    pub has_hover: bool,
    pub view_width: ViewWidth,
    pub view_height: ViewHeight,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            platform: Platform::Ios,
            is_webview: true,
            transition_motion_enabled: true,
            split_col_animate: true,
            has_mouse: false,
            has_hover: false,
            view_width: ViewWidth::Mobile,
            view_height: ViewHeight::Medium,
        }
    }
}

impl Environment {
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    pub fn with_webview(mut self, is_webview: bool) -> Self {
        self.is_webview = is_webview;
        self
    }

    pub fn with_motion(mut self, enabled: bool) -> Self {
        self.transition_motion_enabled = enabled;
        self
    }

    pub fn with_pointer(mut self, has_mouse: bool, has_hover: bool) -> Self {
        self.has_mouse = has_mouse;
        self.has_hover = has_hover;
        self
    }

    pub fn with_viewport_class(mut self, width: ViewWidth, height: ViewHeight) -> Self {
        self.view_width = width;
        self.view_height = height;
        self
    }

    fn is_android_like(&self) -> bool {
        matches!(self.platform, Platform::Android | Platform::Desktop)
    }

    /// Duration of modal enter/exit transitions.
    pub fn modal_transition_millis(&self) -> u64 {
        if self.is_android_like() {
            320
        } else {
            400
        }
    }

    /// Fallback for panel transitions when the host reports no completion event.
    pub fn view_transition_millis(&self) -> u64 {
        if self.is_android_like() {
            300
        } else {
            600
        }
    }

    pub fn rubber_profile(&self) -> RubberProfile {
        if self.is_android_like() {
            RubberProfile::Linear
        } else {
            RubberProfile::Resisted
        }
    }

    pub fn is_desktop(&self) -> bool {
        self.view_width >= ViewWidth::SmallTablet
            && (self.has_mouse || self.view_height >= ViewHeight::Medium)
    }

    pub fn view_motion_disabled(&self) -> bool {
        !self.transition_motion_enabled || !self.split_col_animate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_depends_on_platform() {
        assert_eq!(Environment::for_platform(Platform::Ios).modal_transition_millis(), 400);
        assert_eq!(Environment::for_platform(Platform::Android).modal_transition_millis(), 320);
        assert_eq!(Environment::for_platform(Platform::Desktop).view_transition_millis(), 300);
        assert_eq!(Environment::for_platform(Platform::Ios).view_transition_millis(), 600);
    }

    #[test]
    fn desktop_requires_wide_viewport() {
        let env = Environment::default()
            .with_viewport_class(ViewWidth::Mobile, ViewHeight::Medium)
            .with_pointer(true, true);
        assert!(!env.is_desktop());

        let env = env.with_viewport_class(ViewWidth::SmallTablet, ViewHeight::Small);
        assert!(env.is_desktop());

        let env = env.with_pointer(false, false);
        assert!(!env.is_desktop());
    }
}
