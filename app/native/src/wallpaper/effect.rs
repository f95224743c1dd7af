//! Effect kinds derived from a wallpaper.
//!
//! Each effect names an image transformation run by the external transform
//! tool. Built-in effects carry fixed argument templates; additional effects can
//! be declared in the configuration file as `{ "name": ..., "args": [...] }`.

use std::ffi::OsStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Effects shipped with a fixed argument template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinEffect {
    /// Center-cropped 1:1 thumbnail at quarter size.
    Square,
    /// Heavily blurred copy at three-quarter size.
    Blurred,
}

impl BuiltinEffect {
    /// All built-in effects, in the order they are run by default.
    pub const ALL: [Self; 2] = [Self::Square, Self::Blurred];

    const fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Blurred => "blurred",
        }
    }

    const fn args(self) -> &'static [&'static str] {
        match self {
            Self::Square => &["-gravity", "Center", "-extent", "1:1", "-resize", "25%"],
            Self::Blurred => &["-blur", "50x30", "-resize", "75%"],
        }
    }
}

/// A user-declared effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CustomEffect {
    /// Effect name, used in cache file names.
    pub name: String,
    /// Arguments passed to the transform tool between the source and output paths.
    pub args: Vec<String>,
}

/// An effect applied to every wallpaper that gets set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EffectKind {
    /// One of the built-in effects, written as its name.
    Builtin(BuiltinEffect),
    /// A custom effect.
    Custom(CustomEffect),
}

impl EffectKind {
    /// The square thumbnail effect.
    pub const SQUARE: Self = Self::Builtin(BuiltinEffect::Square);
    /// The blurred effect.
    pub const BLURRED: Self = Self::Builtin(BuiltinEffect::Blurred);

    /// Returns the default effect list.
    #[must_use]
    pub fn defaults() -> Vec<Self> { BuiltinEffect::ALL.into_iter().map(Self::Builtin).collect() }

    /// Returns the effect name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(effect) => effect.name(),
            Self::Custom(effect) => &effect.name,
        }
    }

    /// Returns the transform arguments inserted between source and output.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Builtin(effect) => effect.args().iter().map(|arg| (*arg).to_string()).collect(),
            Self::Custom(effect) => effect.args.clone(),
        }
    }

    /// Returns `true` if the name is usable as a file name component.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let name = self.name();
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(std::path::is_separator)
            && !name.contains('\0')
    }

    /// File name of the per-source cache entry for an image with the given basename.
    #[must_use]
    pub fn cache_file_name(&self, basename: &OsStr) -> String {
        format!("{}-{}.png", self.name(), basename.to_string_lossy())
    }

    /// File name of the generic-latest artifact.
    #[must_use]
    pub fn latest_file_name(&self) -> String { format!("{}-wallpaper.png", self.name()) }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_square_then_blurred() {
        assert_eq!(EffectKind::defaults(), vec![EffectKind::SQUARE, EffectKind::BLURRED]);
    }

    #[test]
    fn test_builtin_args_templates() {
        assert_eq!(
            EffectKind::SQUARE.args(),
            vec!["-gravity", "Center", "-extent", "1:1", "-resize", "25%"]
        );
        assert_eq!(EffectKind::BLURRED.args(), vec!["-blur", "50x30", "-resize", "75%"]);
    }

    #[test]
    fn test_cache_file_name_keeps_source_extension() {
        let name = EffectKind::BLURRED.cache_file_name(OsStr::new("forest.jpg"));
        assert_eq!(name, "blurred-forest.jpg.png");
    }

    #[test]
    fn test_latest_file_name() {
        assert_eq!(EffectKind::SQUARE.latest_file_name(), "square-wallpaper.png");
    }

    #[test]
    fn test_deserialize_builtin_from_name() {
        let effect: EffectKind = serde_json::from_str(r#""blurred""#).unwrap();
        assert_eq!(effect, EffectKind::BLURRED);
    }

    #[test]
    fn test_deserialize_custom_effect() {
        let effect: EffectKind =
            serde_json::from_str(r#"{ "name": "dim", "args": ["-brightness-contrast", "-30"] }"#)
                .unwrap();
        assert_eq!(effect.name(), "dim");
        assert_eq!(effect.args(), vec!["-brightness-contrast", "-30"]);
    }

    #[test]
    fn test_unknown_builtin_name_is_rejected() {
        let result: Result<EffectKind, _> = serde_json::from_str(r#""sepia""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_valid_rejects_path_components() {
        let bad = EffectKind::Custom(CustomEffect {
            name: "../escape".to_string(),
            args: Vec::new(),
        });
        assert!(!bad.is_valid());

        let empty = EffectKind::Custom(CustomEffect { name: String::new(), args: Vec::new() });
        assert!(!empty.is_valid());

        assert!(EffectKind::SQUARE.is_valid());
    }
}
