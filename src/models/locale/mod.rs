// Locale module
// Two display languages: Arabic (primary) and Bengali

use serde::{Deserialize, Serialize};

/// Display language selector passed into every render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ar,
    Bn,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::Bn => "bn",
        }
    }

    /// Parse a two-letter language code as used by the dashboard language toggle.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ar" => Some(Locale::Ar),
            "bn" => Some(Locale::Bn),
            _ => None,
        }
    }
}

/// Text carried by the schedule feed in both languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocalizedText {
    pub ar: String,
    pub bn: String,
}

impl LocalizedText {
    pub fn new(ar: impl Into<String>, bn: impl Into<String>) -> Self {
        Self {
            ar: ar.into(),
            bn: bn.into(),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ar => &self.ar,
            Locale::Bn => &self.bn,
        }
    }
}

/// Static UI labels for one language. Renderers look these up instead of
/// branching on the locale themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleLabels {
    pub next_task: &'static str,
    pub nothing_scheduled: &'static str,
    pub loading: &'static str,
    pub unavailable: &'static str,
    pub day: &'static str,
    pub hour: &'static str,
    pub minute: &'static str,
    pub second: &'static str,
}

const AR_LABELS: LocaleLabels = LocaleLabels {
    next_task: "الإشعار القادم لهذه المهمة",
    nothing_scheduled: "لا توجد إشعارات قادمة",
    loading: "جاري تحميل البيانات...",
    unavailable: "لا توجد بيانات",
    day: "يوم",
    hour: "ساعة",
    minute: "دقيقة",
    second: "ثانية",
};

const BN_LABELS: LocaleLabels = LocaleLabels {
    next_task: "এই কাজের পরবর্তী বিজ্ঞপ্তি",
    nothing_scheduled: "কোনো আসন্ন বিজ্ঞপ্তি নেই",
    loading: "ডেটা লোড হচ্ছে...",
    unavailable: "কোনো তথ্য নেই",
    day: "দিন",
    hour: "ঘন্টা",
    minute: "মিনিট",
    second: "সেকেন্ড",
};

/// Label table for the given language.
pub fn labels(locale: Locale) -> &'static LocaleLabels {
    match locale {
        Locale::Ar => &AR_LABELS,
        Locale::Bn => &BN_LABELS,
    }
}
