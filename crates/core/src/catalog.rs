//! Read-only character catalog.

use std::collections::HashMap;

use crate::model::{Category, CharacterEntry, CharacterId, ScriptType};

/// Query interface over an immutable set of characters.
pub trait Catalog: Send + Sync {
    /// All entries in catalog order.
    fn entries(&self) -> &[CharacterEntry];

    fn get(&self, id: &CharacterId) -> Option<&CharacterEntry>;

    fn contains(&self, id: &CharacterId) -> bool {
        self.get(id).is_some()
    }

    fn entries_by_type(&self, script_type: ScriptType) -> Vec<&CharacterEntry> {
        self.entries()
            .iter()
            .filter(|entry| entry.script_type == script_type)
            .collect()
    }

    fn entries_by_category(&self, category: Category) -> Vec<&CharacterEntry> {
        self.entries()
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// The entry with the same romanization in the other script.
    fn paired(&self, entry: &CharacterEntry) -> Option<&CharacterEntry> {
        let target = entry.script_type.counterpart();
        self.entries()
            .iter()
            .find(|other| other.script_type == target && other.romanization == entry.romanization)
    }
}

/// (hiragana, katakana, romanization) rows grouped by category, in teaching order.
const KANA_TABLE: &[(Category, &[(&str, &str, &str)])] = &[
    (
        Category::Vowel,
        &[("あ", "ア", "a"), ("い", "イ", "i"), ("う", "ウ", "u"), ("え", "エ", "e"), ("お", "オ", "o")],
    ),
    (
        Category::K,
        &[("か", "カ", "ka"), ("き", "キ", "ki"), ("く", "ク", "ku"), ("け", "ケ", "ke"), ("こ", "コ", "ko")],
    ),
    (
        Category::S,
        &[("さ", "サ", "sa"), ("し", "シ", "shi"), ("す", "ス", "su"), ("せ", "セ", "se"), ("そ", "ソ", "so")],
    ),
    (
        Category::T,
        &[("た", "タ", "ta"), ("ち", "チ", "chi"), ("つ", "ツ", "tsu"), ("て", "テ", "te"), ("と", "ト", "to")],
    ),
    (
        Category::N,
        &[("な", "ナ", "na"), ("に", "ニ", "ni"), ("ぬ", "ヌ", "nu"), ("ね", "ネ", "ne"), ("の", "ノ", "no")],
    ),
    (
        Category::H,
        &[("は", "ハ", "ha"), ("ひ", "ヒ", "hi"), ("ふ", "フ", "fu"), ("へ", "ヘ", "he"), ("ほ", "ホ", "ho")],
    ),
    (
        Category::M,
        &[("ま", "マ", "ma"), ("み", "ミ", "mi"), ("む", "ム", "mu"), ("め", "メ", "me"), ("も", "モ", "mo")],
    ),
    (Category::Y, &[("や", "ヤ", "ya"), ("ゆ", "ユ", "yu"), ("よ", "ヨ", "yo")]),
    (
        Category::R,
        &[("ら", "ラ", "ra"), ("り", "リ", "ri"), ("る", "ル", "ru"), ("れ", "レ", "re"), ("ろ", "ロ", "ro")],
    ),
    (Category::W, &[("わ", "ワ", "wa"), ("を", "ヲ", "wo")]),
    (Category::Nn, &[("ん", "ン", "n")]),
    (
        Category::G,
        &[("が", "ガ", "ga"), ("ぎ", "ギ", "gi"), ("ぐ", "グ", "gu"), ("げ", "ゲ", "ge"), ("ご", "ゴ", "go")],
    ),
    (
        Category::Z,
        &[("ざ", "ザ", "za"), ("じ", "ジ", "ji"), ("ず", "ズ", "zu"), ("ぜ", "ゼ", "ze"), ("ぞ", "ゾ", "zo")],
    ),
    (
        Category::D,
        &[("だ", "ダ", "da"), ("ぢ", "ヂ", "di"), ("づ", "ヅ", "du"), ("で", "デ", "de"), ("ど", "ド", "do")],
    ),
    (
        Category::B,
        &[("ば", "バ", "ba"), ("び", "ビ", "bi"), ("ぶ", "ブ", "bu"), ("べ", "ベ", "be"), ("ぼ", "ボ", "bo")],
    ),
    (
        Category::P,
        &[("ぱ", "パ", "pa"), ("ぴ", "ピ", "pi"), ("ぷ", "プ", "pu"), ("ぺ", "ペ", "pe"), ("ぽ", "ポ", "po")],
    ),
    (Category::Ky, &[("きゃ", "キャ", "kya"), ("きゅ", "キュ", "kyu"), ("きょ", "キョ", "kyo")]),
    (Category::Sy, &[("しゃ", "シャ", "sha"), ("しゅ", "シュ", "shu"), ("しょ", "ショ", "sho")]),
    (Category::Ty, &[("ちゃ", "チャ", "cha"), ("ちゅ", "チュ", "chu"), ("ちょ", "チョ", "cho")]),
    (Category::Ny, &[("にゃ", "ニャ", "nya"), ("にゅ", "ニュ", "nyu"), ("にょ", "ニョ", "nyo")]),
    (Category::Hy, &[("ひゃ", "ヒャ", "hya"), ("ひゅ", "ヒュ", "hyu"), ("ひょ", "ヒョ", "hyo")]),
    (Category::My, &[("みゃ", "ミャ", "mya"), ("みゅ", "ミュ", "myu"), ("みょ", "ミョ", "myo")]),
    (Category::Ry, &[("りゃ", "リャ", "rya"), ("りゅ", "リュ", "ryu"), ("りょ", "リョ", "ryo")]),
    (Category::Gy, &[("ぎゃ", "ギャ", "gya"), ("ぎゅ", "ギュ", "gyu"), ("ぎょ", "ギョ", "gyo")]),
    (Category::Zy, &[("じゃ", "ジャ", "ja"), ("じゅ", "ジュ", "ju"), ("じょ", "ジョ", "jo")]),
    (Category::By, &[("びゃ", "ビャ", "bya"), ("びゅ", "ビュ", "byu"), ("びょ", "ビョ", "byo")]),
    (Category::Py, &[("ぴゃ", "ピャ", "pya"), ("ぴゅ", "ピュ", "pyu"), ("ぴょ", "ピョ", "pyo")]),
];

/// In-memory catalog, either the built-in kana table or a custom entry list.
#[derive(Debug, Clone)]
pub struct KanaCatalog {
    entries: Vec<CharacterEntry>,
    index: HashMap<CharacterId, usize>,
}

impl KanaCatalog {
    /// Every hiragana character followed by every katakana character.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = ScriptType::ALL
            .into_iter()
            .flat_map(|script_type| {
                KANA_TABLE.iter().flat_map(move |(category, rows)| {
                    rows.iter().map(move |(hiragana, katakana, romanization)| {
                        let symbol = match script_type {
                            ScriptType::Hiragana => hiragana,
                            ScriptType::Katakana => katakana,
                        };
                        CharacterEntry::new(*symbol, *romanization, script_type, *category)
                    })
                })
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Builds a catalog from arbitrary entries; later duplicates of an id are dropped.
    #[must_use]
    pub fn from_entries(entries: Vec<CharacterEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        let mut unique = Vec::with_capacity(entries.len());
        for entry in entries {
            if index.contains_key(&entry.id) {
                tracing::warn!(id = %entry.id, "duplicate catalog id ignored");
                continue;
            }
            index.insert(entry.id.clone(), unique.len());
            unique.push(entry);
        }
        Self {
            entries: unique,
            index,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KanaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog for KanaCatalog {
    fn entries(&self) -> &[CharacterEntry] {
        &self.entries
    }

    fn get(&self, id: &CharacterId) -> Option<&CharacterEntry> {
        self.index.get(id).map(|&position| &self.entries[position])
    }
}
