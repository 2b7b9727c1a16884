//! Icon slots produced for each platform.

use super::Platform;

/// Size and compositing flags of a single PNG slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconProperties {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Whether the canvas may stay transparent.
    pub transparent: bool,
    /// Rotate the rendered icon by 90 degrees (landscape startup images).
    pub rotate: bool,
}

/// What a slot produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Png(IconProperties),
    /// A multi-resolution `.ico` with one square frame per size.
    Ico { sizes: &'static [u32], transparent: bool },
}

/// A named image output of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSlot {
    /// Output file name.
    pub name: &'static str,
    pub kind: SlotKind,
}

const fn png(name: &'static str, width: u32, height: u32, transparent: bool, rotate: bool) -> IconSlot {
    IconSlot {
        name,
        kind: SlotKind::Png(IconProperties {
            width,
            height,
            transparent,
            rotate,
        }),
    }
}

const ANDROID: &[IconSlot] = &[
    png("android-chrome-36x36.png", 36, 36, true, false),
    png("android-chrome-48x48.png", 48, 48, true, false),
    png("android-chrome-72x72.png", 72, 72, true, false),
    png("android-chrome-96x96.png", 96, 96, true, false),
    png("android-chrome-144x144.png", 144, 144, true, false),
    png("android-chrome-192x192.png", 192, 192, true, false),
    png("android-chrome-256x256.png", 256, 256, true, false),
    png("android-chrome-384x384.png", 384, 384, true, false),
    png("android-chrome-512x512.png", 512, 512, true, false),
];

const APPLE_ICON: &[IconSlot] = &[
    png("apple-touch-icon-57x57.png", 57, 57, false, false),
    png("apple-touch-icon-60x60.png", 60, 60, false, false),
    png("apple-touch-icon-72x72.png", 72, 72, false, false),
    png("apple-touch-icon-76x76.png", 76, 76, false, false),
    png("apple-touch-icon-114x114.png", 114, 114, false, false),
    png("apple-touch-icon-120x120.png", 120, 120, false, false),
    png("apple-touch-icon-144x144.png", 144, 144, false, false),
    png("apple-touch-icon-152x152.png", 152, 152, false, false),
    png("apple-touch-icon-167x167.png", 167, 167, false, false),
    png("apple-touch-icon-180x180.png", 180, 180, false, false),
    png("apple-touch-icon.png", 180, 180, false, false),
    png("apple-touch-icon-precomposed.png", 180, 180, false, false),
];

// Landscape images are rendered into the portrait box and rotated.
const APPLE_STARTUP: &[IconSlot] = &[
    png("apple-touch-startup-image-320x460.png", 320, 460, false, false),
    png("apple-touch-startup-image-640x920.png", 640, 920, false, false),
    png("apple-touch-startup-image-640x1096.png", 640, 1096, false, false),
    png("apple-touch-startup-image-748x1024.png", 748, 1024, false, true),
    png("apple-touch-startup-image-750x1294.png", 750, 1294, false, false),
    png("apple-touch-startup-image-768x1004.png", 768, 1004, false, false),
    png("apple-touch-startup-image-1182x2208.png", 1182, 2208, false, true),
    png("apple-touch-startup-image-1242x2148.png", 1242, 2148, false, false),
    png("apple-touch-startup-image-1496x2048.png", 1496, 2048, false, true),
    png("apple-touch-startup-image-1536x2008.png", 1536, 2008, false, false),
];

const COAST: &[IconSlot] = &[png("coast-228x228.png", 228, 228, false, false)];

const FAVICONS: &[IconSlot] = &[
    IconSlot {
        name: "favicon.ico",
        kind: SlotKind::Ico {
            sizes: &[16, 24, 32, 48, 64],
            transparent: true,
        },
    },
    png("favicon-16x16.png", 16, 16, true, false),
    png("favicon-32x32.png", 32, 32, true, false),
];

const FIREFOX: &[IconSlot] = &[
    png("firefox_app_60x60.png", 60, 60, false, false),
    png("firefox_app_128x128.png", 128, 128, false, false),
    png("firefox_app_512x512.png", 512, 512, false, false),
];

const WINDOWS: &[IconSlot] = &[
    png("mstile-70x70.png", 70, 70, true, false),
    png("mstile-144x144.png", 144, 144, true, false),
    png("mstile-150x150.png", 150, 150, true, false),
    png("mstile-310x150.png", 310, 150, true, false),
    png("mstile-310x310.png", 310, 310, true, false),
];

const YANDEX: &[IconSlot] = &[png("yandex-browser-50x50.png", 50, 50, false, false)];

/// The image slots generated for `platform`, in output order.
pub fn slots(platform: Platform) -> &'static [IconSlot] {
    match platform {
        Platform::Android => ANDROID,
        Platform::AppleIcon => APPLE_ICON,
        Platform::AppleStartup => APPLE_STARTUP,
        Platform::Coast => COAST,
        Platform::Favicons => FAVICONS,
        Platform::Firefox => FIREFOX,
        Platform::Windows => WINDOWS,
        Platform::Yandex => YANDEX,
    }
}
