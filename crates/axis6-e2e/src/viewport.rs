//! Device profiles and responsive-layout checks.

use serde::{Deserialize, Serialize};

/// How far content may extend past the viewport before it counts as overflow
pub const OVERFLOW_TOLERANCE_PX: u32 = 20;

/// Reads the viewport and the widest content extent
pub const LAYOUT_SCRIPT: &str = "({ \
    viewport_width: window.innerWidth, \
    content_width: Math.max(document.documentElement.scrollWidth, document.body ? document.body.scrollWidth : 0) \
})";

/// Named viewport used to parametrize responsive checks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceProfile {
    /// Device name
    pub name: &'static str,
    /// Viewport width (CSS px)
    pub width: u32,
    /// Viewport height (CSS px)
    pub height: u32,
    /// Device scale factor
    pub device_scale_factor: f64,
    /// Emulate a mobile device
    pub is_mobile: bool,
}

impl DeviceProfile {
    /// iPhone SE
    pub const IPHONE_SE: Self = Self {
        name: "iPhone SE",
        width: 375,
        height: 667,
        device_scale_factor: 2.0,
        is_mobile: true,
    };

    /// iPhone 12
    pub const IPHONE_12: Self = Self {
        name: "iPhone 12",
        width: 390,
        height: 844,
        device_scale_factor: 3.0,
        is_mobile: true,
    };

    /// Galaxy S20 class Android phone
    pub const ANDROID: Self = Self {
        name: "Android",
        width: 360,
        height: 800,
        device_scale_factor: 3.0,
        is_mobile: true,
    };

    /// iPad (portrait)
    pub const IPAD: Self = Self {
        name: "iPad",
        width: 768,
        height: 1024,
        device_scale_factor: 2.0,
        is_mobile: true,
    };

    /// Laptop desktop
    pub const DESKTOP: Self = Self {
        name: "Desktop",
        width: 1440,
        height: 900,
        device_scale_factor: 1.0,
        is_mobile: false,
    };

    /// Desktop profile of an arbitrary size
    #[must_use]
    pub const fn desktop(width: u32, height: u32) -> Self {
        Self {
            name: "Desktop",
            width,
            height,
            device_scale_factor: 1.0,
            is_mobile: false,
        }
    }

    /// Every declared breakpoint, smallest device first
    #[must_use]
    pub const fn breakpoints() -> [Self; 5] {
        [
            Self::IPHONE_SE,
            Self::IPHONE_12,
            Self::ANDROID,
            Self::IPAD,
            Self::DESKTOP,
        ]
    }

    /// Lowercase, dash-separated name (`iphone-se`)
    #[must_use]
    pub fn slug(&self) -> String {
        self.name.to_ascii_lowercase().replace(' ', "-")
    }
}

/// Measured page extent at the current viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    /// `window.innerWidth`, or the breakpoint width after [`Self::against`]
    pub viewport_width: u32,
    /// Widest scroll extent of the document
    pub content_width: u32,
}

impl LayoutMetrics {
    /// Measure against the emulated breakpoint width instead of
    /// `innerWidth`, which grows with overflowing content on mobile
    #[must_use]
    pub const fn against(self, profile: &DeviceProfile) -> Self {
        Self {
            viewport_width: profile.width,
            content_width: self.content_width,
        }
    }

    /// Pixels of content beyond the viewport (0 when it fits)
    #[must_use]
    pub const fn overflow_px(&self) -> u32 {
        self.content_width.saturating_sub(self.viewport_width)
    }

    /// Whether the content stays within the viewport plus `tolerance`
    #[must_use]
    pub const fn fits(&self, tolerance: u32) -> bool {
        self.overflow_px() <= tolerance
    }
}
