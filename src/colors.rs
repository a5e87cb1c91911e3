use crate::app::ColorBackendConfig;
use crate::registry::Registry;
use std::path::{Path, PathBuf};

mod dms;

pub use dms::DmsColorGenerator;

/// Capability interface of a color-theme generator.
///
/// Theming is cosmetic: every operation reports failure as `false` and logs
/// it, nothing here may abort a wallpaper change.
pub trait ColorGenerator {
    fn name(&self) -> &'static str;

    /// Ask the external tool to derive a palette from `wallpaper`.
    fn generate(&self, wallpaper: &Path) -> bool;

    /// Record `wallpaper` in the shared session document, keeping every other key.
    /// Never creates the document.
    fn update_session(&self, wallpaper: &Path) -> bool;

    /// Where the generated palette lands.
    fn colors_path(&self) -> PathBuf;

    /// Palette exists and the session already points at `wallpaper`.
    fn is_cached(&self, wallpaper: &Path) -> bool;
}

pub type ColorGeneratorRegistry = Registry<ColorBackendConfig, dyn ColorGenerator>;

/// Registry with every color generator shipped in this crate.
pub fn builtin_registry() -> ColorGeneratorRegistry {
    let mut registry = ColorGeneratorRegistry::new("color");
    registry.register(DmsColorGenerator::NAME, |cfg: &ColorBackendConfig| {
        Box::new(DmsColorGenerator::from_config(cfg))
    });
    registry
}
