//! Closed vocabularies for corpus records.
//!
//! JSON and the database carry the canonical snake_case name. Parsing also
//! accepts the Arabic labels used by the source corpus, so seed data and
//! hand-written submissions round-trip without a translation step.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct VocabularyError {
    pub kind: &'static str,
    pub value: String,
}

impl VocabularyError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Literary period a poet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Era {
    PreIslamic,
    Umayyad,
    Abbasid,
    Andalusian,
    Modern,
}

impl Era {
    pub fn as_str(self) -> &'static str {
        match self {
            Era::PreIslamic => "pre_islamic",
            Era::Umayyad => "umayyad",
            Era::Abbasid => "abbasid",
            Era::Andalusian => "andalusian",
            Era::Modern => "modern",
        }
    }
}

impl FromStr for Era {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pre_islamic" | "جاهلي" => Ok(Era::PreIslamic),
            "umayyad" | "أموي" => Ok(Era::Umayyad),
            "abbasid" | "عباسي" => Ok(Era::Abbasid),
            "andalusian" | "أندلسي" => Ok(Era::Andalusian),
            "modern" | "حديث" => Ok(Era::Modern),
            other => Err(VocabularyError::new("era", other)),
        }
    }
}

/// Thematic genre of a poem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Theme {
    /// غزل
    Love,
    /// مدح (panegyric), sometimes rendered "eulogy".
    Praise,
    /// رثاء
    Elegy,
    /// حكمة
    Wisdom,
    /// وصف
    Description,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Love => "love",
            Theme::Praise => "praise",
            Theme::Elegy => "elegy",
            Theme::Wisdom => "wisdom",
            Theme::Description => "description",
        }
    }
}

impl FromStr for Theme {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "love" | "غزل" => Ok(Theme::Love),
            "praise" | "eulogy" | "مدح" => Ok(Theme::Praise),
            "elegy" | "رثاء" => Ok(Theme::Elegy),
            "wisdom" | "حكمة" => Ok(Theme::Wisdom),
            "description" | "وصف" => Ok(Theme::Description),
            other => Err(VocabularyError::new("theme", other)),
        }
    }
}

/// The sixteen classical meters (buhur) of Arabic prosody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Meter {
    Tawil,
    Madid,
    Basit,
    Wafir,
    Kamil,
    Hazaj,
    Rajaz,
    Ramal,
    Sari,
    Munsarih,
    Khafif,
    Mudari,
    Muqtadab,
    Mujtathth,
    Mutaqarib,
    Mutadarik,
}

impl Meter {
    pub fn as_str(self) -> &'static str {
        match self {
            Meter::Tawil => "tawil",
            Meter::Madid => "madid",
            Meter::Basit => "basit",
            Meter::Wafir => "wafir",
            Meter::Kamil => "kamil",
            Meter::Hazaj => "hazaj",
            Meter::Rajaz => "rajaz",
            Meter::Ramal => "ramal",
            Meter::Sari => "sari",
            Meter::Munsarih => "munsarih",
            Meter::Khafif => "khafif",
            Meter::Mudari => "mudari",
            Meter::Muqtadab => "muqtadab",
            Meter::Mujtathth => "mujtathth",
            Meter::Mutaqarib => "mutaqarib",
            Meter::Mutadarik => "mutadarik",
        }
    }
}

impl FromStr for Meter {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "tawil" | "الطويل" => Ok(Meter::Tawil),
            "madid" | "المديد" => Ok(Meter::Madid),
            "basit" | "البسيط" => Ok(Meter::Basit),
            "wafir" | "الوافر" => Ok(Meter::Wafir),
            "kamil" | "الكامل" => Ok(Meter::Kamil),
            "hazaj" | "الهزج" => Ok(Meter::Hazaj),
            "rajaz" | "الرجز" => Ok(Meter::Rajaz),
            "ramal" | "الرمل" => Ok(Meter::Ramal),
            "sari" | "السريع" => Ok(Meter::Sari),
            "munsarih" | "المنسرح" => Ok(Meter::Munsarih),
            "khafif" | "الخفيف" => Ok(Meter::Khafif),
            "mudari" | "المضارع" => Ok(Meter::Mudari),
            "muqtadab" | "المقتضب" => Ok(Meter::Muqtadab),
            "mujtathth" | "المجتث" => Ok(Meter::Mujtathth),
            "mutaqarib" | "المتقارب" => Ok(Meter::Mutaqarib),
            "mutadarik" | "المتدارك" => Ok(Meter::Mutadarik),
            other => Err(VocabularyError::new("meter", other)),
        }
    }
}

impl TryFrom<String> for Era {
    type Error = VocabularyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Theme {
    type Error = VocabularyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Meter {
    type Error = VocabularyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
