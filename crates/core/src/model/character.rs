use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::CharacterId;

//
// ─── SCRIPT TYPE ───────────────────────────────────────────────────────────────
//

/// The two phonetic scripts taught by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    Hiragana,
    Katakana,
}

impl ScriptType {
    pub const ALL: [ScriptType; 2] = [ScriptType::Hiragana, ScriptType::Katakana];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptType::Hiragana => "hiragana",
            ScriptType::Katakana => "katakana",
        }
    }

    /// The other script, used to pair characters sharing a romanization.
    #[must_use]
    pub fn counterpart(self) -> Self {
        match self {
            ScriptType::Hiragana => ScriptType::Katakana,
            ScriptType::Katakana => ScriptType::Hiragana,
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Row grouping of a character (consonant row, voiced row, or contracted sound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vowel,
    K,
    S,
    T,
    N,
    H,
    M,
    Y,
    R,
    W,
    Nn,
    G,
    Z,
    D,
    B,
    P,
    Ky,
    Sy,
    Ty,
    Ny,
    Hy,
    My,
    Ry,
    Gy,
    Zy,
    By,
    Py,
}

impl Category {
    /// Plain rows, the default learning scope.
    pub const BASIC: [Category; 11] = [
        Category::Vowel,
        Category::K,
        Category::S,
        Category::T,
        Category::N,
        Category::H,
        Category::M,
        Category::Y,
        Category::R,
        Category::W,
        Category::Nn,
    ];

    /// Voiced (dakuten) and semi-voiced (handakuten) rows.
    pub const DAKUTEN: [Category; 5] = [
        Category::G,
        Category::Z,
        Category::D,
        Category::B,
        Category::P,
    ];

    /// Contracted (yoon) rows.
    pub const YOON: [Category; 11] = [
        Category::Ky,
        Category::Sy,
        Category::Ty,
        Category::Ny,
        Category::Hy,
        Category::My,
        Category::Ry,
        Category::Gy,
        Category::Zy,
        Category::By,
        Category::Py,
    ];

    /// Every category in catalog order.
    #[must_use]
    pub fn all() -> impl Iterator<Item = Category> {
        Self::BASIC
            .into_iter()
            .chain(Self::DAKUTEN)
            .chain(Self::YOON)
    }
}

//
// ─── CHARACTER ENTRY ───────────────────────────────────────────────────────────
//

/// One immutable catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub id: CharacterId,
    pub symbol: String,
    pub romanization: String,
    pub script_type: ScriptType,
    pub category: Category,
}

impl CharacterEntry {
    /// Builds an entry whose id is derived as `<script>-<romanization>`.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        romanization: impl Into<String>,
        script_type: ScriptType,
        category: Category,
    ) -> Self {
        let romanization = romanization.into();
        Self {
            id: CharacterId::new(format!("{}-{romanization}", script_type.as_str())),
            symbol: symbol.into(),
            romanization,
            script_type,
            category,
        }
    }
}
