//! Appearance preferences.
//!
//! # Responsibility
//! - Model theme, aesthetic and font choices.
//! - Hold the current preferences in an explicit object that persists on
//!   every mutation.
//!
//! # Invariants
//! - There is no process-wide preference state; callers pass a
//!   `PreferencesHolder` where it is needed.
//! - A missing or corrupt stored value loads as defaults.

mod store;

pub use store::{JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore, PreferencesError};

use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Value for the document root `data-theme` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aesthetic {
    #[default]
    Minimalist,
    Moody,
}

/// Selectable reading font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontChoice {
    #[default]
    Inter,
    Merriweather,
    Lora,
    JetBrainsMono,
}

/// Catalog row describing one font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontInfo {
    pub choice: FontChoice,
    pub name: &'static str,
    pub family: &'static str,
}

impl FontChoice {
    pub fn catalog() -> &'static [FontInfo] {
        &[
            FontInfo {
                choice: FontChoice::Inter,
                name: "Inter",
                family: "'Inter', sans-serif",
            },
            FontInfo {
                choice: FontChoice::Merriweather,
                name: "Merriweather",
                family: "'Merriweather', serif",
            },
            FontInfo {
                choice: FontChoice::Lora,
                name: "Lora",
                family: "'Lora', serif",
            },
            FontInfo {
                choice: FontChoice::JetBrainsMono,
                name: "JetBrains Mono",
                family: "'JetBrains Mono', monospace",
            },
        ]
    }

    /// Catalog rows are declared in variant order.
    pub fn info(self) -> FontInfo {
        Self::catalog()[self as usize]
    }
}

/// Complete appearance configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub aesthetic: Aesthetic,
    pub font: FontChoice,
}

/// Owner of the current preferences; every setter persists through `S`.
#[derive(Debug)]
pub struct PreferencesHolder<S: PreferenceStore> {
    current: Preferences,
    store: S,
}

impl<S: PreferenceStore> PreferencesHolder<S> {
    /// Loads stored preferences, falling back to defaults when unreadable.
    pub fn load(store: S) -> Self {
        let current = match store.load() {
            Ok(Some(preferences)) => preferences,
            Ok(None) => Preferences::default(),
            Err(err) => {
                warn!(
                    "event=preferences_load module=preferences status=error fallback=defaults error={}",
                    err
                );
                Preferences::default()
            }
        };
        Self { current, store }
    }

    pub fn get(&self) -> Preferences {
        self.current
    }

    pub fn theme(&self) -> Theme {
        self.current.theme
    }

    pub fn aesthetic(&self) -> Aesthetic {
        self.current.aesthetic
    }

    pub fn font(&self) -> FontChoice {
        self.current.font
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), PreferencesError> {
        self.update(|preferences| preferences.theme = theme)
    }

    /// Flips light/dark and returns the new theme.
    pub fn toggle_theme(&mut self) -> Result<Theme, PreferencesError> {
        let next = self.current.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn set_aesthetic(&mut self, aesthetic: Aesthetic) -> Result<(), PreferencesError> {
        self.update(|preferences| preferences.aesthetic = aesthetic)
    }

    pub fn set_font(&mut self, font: FontChoice) -> Result<(), PreferencesError> {
        self.update(|preferences| preferences.font = font)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies `change` and persists; the in-memory value is kept only when
    /// the write succeeds.
    fn update(&mut self, change: impl FnOnce(&mut Preferences)) -> Result<(), PreferencesError> {
        let mut next = self.current;
        change(&mut next);
        self.store.save(&next)?;
        self.current = next;
        info!(
            "event=preferences_save module=preferences status=ok theme={} aesthetic={:?} font={:?}",
            next.theme.as_str(),
            next.aesthetic,
            next.font
        );
        Ok(())
    }
}
