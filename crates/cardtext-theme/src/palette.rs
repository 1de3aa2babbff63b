//! Process-wide terminal palette state.
//!
//! The palette is the terminal's 16 indexed ANSI colors plus its default
//! foreground and background. It is initialized synchronously to a built-in
//! fallback at load, and may be replaced **at most once** by a completed
//! detection round (see [`crate::detect`]). After that first completion the
//! cell is read-only: a single-writer/many-reader discipline enforced by an
//! atomic first-completion guard, so a late-arriving detection result can
//! never clobber settled state.
//!
//! Readers never block on detection; [`current`] always has a usable value.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use crate::color::Rgb;

/// The terminal's 16 indexed colors plus default foreground and background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// ANSI slots 0–15: black, red, green, yellow, blue, magenta, cyan,
    /// white, then the bright variants in the same order.
    pub colors: [Rgb; 16],
    pub foreground: Rgb,
    pub background: Rgb,
}

impl Palette {
    /// Built-in fallback for dark terminals (xterm defaults).
    pub const fn dark_fallback() -> Self {
        Self {
            colors: [
                Rgb::new(0, 0, 0),
                Rgb::new(205, 0, 0),
                Rgb::new(0, 205, 0),
                Rgb::new(205, 205, 0),
                Rgb::new(0, 0, 238),
                Rgb::new(205, 0, 205),
                Rgb::new(0, 205, 205),
                Rgb::new(229, 229, 229),
                Rgb::new(127, 127, 127),
                Rgb::new(255, 0, 0),
                Rgb::new(0, 255, 0),
                Rgb::new(255, 255, 0),
                Rgb::new(92, 92, 255),
                Rgb::new(255, 0, 255),
                Rgb::new(0, 255, 255),
                Rgb::new(255, 255, 255),
            ],
            foreground: Rgb::new(229, 229, 229),
            background: Rgb::new(0, 0, 0),
        }
    }

    /// Built-in fallback for light terminals.
    ///
    /// Same hues as the dark fallback, darkened where the default variants
    /// would wash out on a white background.
    pub const fn light_fallback() -> Self {
        Self {
            colors: [
                Rgb::new(0, 0, 0),
                Rgb::new(170, 0, 0),
                Rgb::new(0, 130, 0),
                Rgb::new(150, 120, 0),
                Rgb::new(0, 0, 190),
                Rgb::new(150, 0, 150),
                Rgb::new(0, 140, 140),
                Rgb::new(229, 229, 229),
                Rgb::new(90, 90, 90),
                Rgb::new(210, 0, 0),
                Rgb::new(0, 160, 0),
                Rgb::new(170, 140, 0),
                Rgb::new(40, 40, 220),
                Rgb::new(180, 0, 180),
                Rgb::new(0, 160, 160),
                Rgb::new(255, 255, 255),
            ],
            foreground: Rgb::new(26, 26, 26),
            background: Rgb::new(255, 255, 255),
        }
    }

    /// Returns the fallback palette matching an OS color mode.
    pub const fn fallback_for(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Dark => Self::dark_fallback(),
            ColorMode::Light => Self::light_fallback(),
        }
    }

    /// Returns the color in an ANSI slot (0–15); out-of-range indices wrap.
    pub fn slot(&self, index: usize) -> Rgb {
        self.colors[index % 16]
    }
}

static PALETTE: Lazy<RwLock<Palette>> = Lazy::new(|| RwLock::new(Palette::dark_fallback()));
static SETTLED: AtomicBool = AtomicBool::new(false);

/// Returns a snapshot of the current palette.
///
/// Always usable: fallback before detection settles, detected values after.
pub fn current() -> Palette {
    PALETTE
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .clone()
}

/// Commits a palette as the settled process-wide state.
///
/// Only the first commit wins; returns `false` (discarding `palette`) if
/// state has already settled. Called by the detector on success, and with
/// the mode-appropriate fallback on timeout/failure.
pub(crate) fn commit(palette: Palette) -> bool {
    if SETTLED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
    {
        *PALETTE
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = palette;
        true
    } else {
        false
    }
}

#[cfg(test)]
pub(crate) fn reset_for_tests() {
    SETTLED.store(false, Ordering::SeqCst);
    *PALETTE
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner) = Palette::dark_fallback();
}

// ─── OS color mode ──────────────────────────────────────────────────────────

/// The user's preferred color mode, used to pick a fallback palette when
/// terminal detection yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Light,
    Dark,
}

type ModeDetector = fn() -> ColorMode;

static MODE_DETECTOR: Lazy<Mutex<ModeDetector>> = Lazy::new(|| Mutex::new(os_mode_detector));

/// Overrides the OS color mode detector.
///
/// Useful for testing or for forcing a specific fallback mode.
pub fn set_mode_detector(detector: ModeDetector) {
    let mut guard = MODE_DETECTOR
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    *guard = detector;
}

/// Detects the user's preferred color mode from the OS.
pub fn detect_color_mode() -> ColorMode {
    let detector = MODE_DETECTOR
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    (*detector)()
}

fn os_mode_detector() -> ColorMode {
    match dark_light::detect() {
        Ok(dark_light::Mode::Light) => ColorMode::Light,
        _ => ColorMode::Dark,
    }
}
