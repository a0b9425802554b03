/// Configurations for the Arbor toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Platform the style sheets are prepared for.
    pub platform: Platform,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            platform: Platform::current(),
        }
    }
}

impl Config {
    /// Configuration targeting a specific platform instead of the build target.
    pub fn for_platform(platform: Platform) -> Self {
        Config { platform }
    }
}

/// The platform the host framework renders on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Android devices
    Android,
    /// iOS and iPadOS devices
    Ios,
    /// Browsers (wasm targets)
    Web,
    /// Everything else (desktop hosts, test runners)
    Desktop,
}

impl Platform {
    /// Detect the platform from the compilation target.
    pub const fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_family = "wasm") {
            Platform::Web
        } else {
            Platform::Desktop
        }
    }

    /// Whether bold text needs an explicit (possibly empty) `fontFamily` to lay out
    /// correctly.
    ///
    /// Some Android devices mis-measure text that sets `fontWeight` without a font
    /// family.
    pub const fn requires_explicit_font_family(self) -> bool {
        matches!(self, Platform::Android)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Web => "web",
            Platform::Desktop => "desktop",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

static_assertions::assert_impl_all!(Config: Copy, Send, Sync);
static_assertions::assert_impl_all!(Platform: Copy, Send, Sync);
