//! Numerus form selection.
//!
//! Qt stores one `<numerusform>` per plural form of the target language, in
//! the order defined by the language's rule. The rule only has to map a
//! count to an index into that list.

use crate::types::Locale;

/// Plural rule families used by Qt Linguist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// One form for every count (Chinese, Japanese, Korean, …).
    Single,
    /// `n == 1` → form 0, otherwise form 1 (English, German, …).
    OneOther,
    /// `n <= 1` → form 0, otherwise form 1 (French, Brazilian Portuguese).
    OneOrZeroOther,
    /// Russian, Ukrainian, Belarusian, Serbian, Croatian, Bosnian.
    EastSlavic,
    /// Polish.
    Polish,
    /// Czech and Slovak: 1 / 2–4 / other.
    Czech,
}

/// Languages without plural distinction.
const SINGLE_FORM_LANGUAGES: &[&str] = &["zh", "ja", "ko", "vi", "th", "id", "ms", "tr", "lo", "my"];

/// Slavic languages sharing the three-form rule.
const EAST_SLAVIC_LANGUAGES: &[&str] = &["ru", "uk", "be", "sr", "hr", "bs"];

impl PluralRule {
    /// Rule for a locale; unknown languages use [`PluralRule::OneOther`].
    #[must_use]
    pub fn for_locale(locale: &Locale) -> Self {
        let language = locale.language();
        let language = language.as_str();

        if SINGLE_FORM_LANGUAGES.contains(&language) {
            Self::Single
        } else if EAST_SLAVIC_LANGUAGES.contains(&language) {
            Self::EastSlavic
        } else if language == "pl" {
            Self::Polish
        } else if matches!(language, "cs" | "sk") {
            Self::Czech
        } else if language == "fr" || locale.matches("pt_BR") {
            Self::OneOrZeroOther
        } else {
            Self::OneOther
        }
    }

    /// Number of numerus forms a translation in this rule carries.
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::OneOther | Self::OneOrZeroOther => 2,
            Self::EastSlavic | Self::Polish | Self::Czech => 3,
        }
    }

    /// Index of the numerus form used for `count`.
    #[must_use]
    pub const fn form_index(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        match self {
            Self::Single => 0,
            Self::OneOther => {
                if n == 1 {
                    0
                } else {
                    1
                }
            }
            Self::OneOrZeroOther => {
                if n <= 1 {
                    0
                } else {
                    1
                }
            }
            Self::EastSlavic => {
                if n % 10 == 1 && n % 100 != 11 {
                    0
                } else if n % 10 >= 2 && n % 10 <= 4 && (n % 100 < 10 || n % 100 >= 20) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if n % 10 >= 2 && n % 10 <= 4 && (n % 100 < 10 || n % 100 >= 20) {
                    1
                } else {
                    2
                }
            }
            Self::Czech => {
                if n == 1 {
                    0
                } else if n >= 2 && n <= 4 {
                    1
                } else {
                    2
                }
            }
        }
    }

    /// Pick the form for `count`, clamping to the last available form.
    #[must_use]
    pub fn select(self, forms: &[String], count: i64) -> Option<&str> {
        let index = self.form_index(count);
        forms.get(index).or_else(|| forms.last()).map(String::as_str)
    }
}
