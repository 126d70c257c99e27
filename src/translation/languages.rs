//! DeepL language codes offered by the tool

use tracing::warn;

/// Supported codes and their English names, sorted by code
pub const LANGUAGES: &[(&str, &str)] = &[
    ("AR", "Arabic"),
    ("BG", "Bulgarian"),
    ("CS", "Czech"),
    ("DA", "Danish"),
    ("DE", "German"),
    ("EL", "Greek"),
    ("EN-GB", "English (UK)"),
    ("EN-US", "English (US)"),
    ("ES", "Spanish"),
    ("ET", "Estonian"),
    ("FI", "Finnish"),
    ("FR", "French"),
    ("HU", "Hungarian"),
    ("ID", "Indonesian"),
    ("IT", "Italian"),
    ("JA", "Japanese"),
    ("KO", "Korean"),
    ("LT", "Lithuanian"),
    ("LV", "Latvian"),
    ("NB", "Norwegian (Bokmål)"),
    ("NL", "Dutch"),
    ("PL", "Polish"),
    ("PT-BR", "Portuguese (Brazil)"),
    ("PT-PT", "Portuguese (Portugal)"),
    ("RO", "Romanian"),
    ("RU", "Russian"),
    ("SK", "Slovak"),
    ("SL", "Slovenian"),
    ("SV", "Swedish"),
    ("TH", "Thai"),
    ("TR", "Turkish"),
    ("UK", "Ukrainian"),
    ("VI", "Vietnamese"),
    ("ZH-HANS", "Chinese (Simplified)"),
    ("ZH-HANT", "Chinese (Traditional)"),
];

/// Canonical form of a language code
///
/// Accepts display values such as `"EN-US - English (US)"` and keeps only
/// the code part, trimmed and uppercased.
pub fn normalize_code(code: &str) -> String {
    code.split(" - ")
        .next()
        .unwrap_or_default()
        .trim()
        .to_uppercase()
}

/// English name of a supported code
pub fn language_name(code: &str) -> Option<&'static str> {
    let code = normalize_code(code);
    LANGUAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

pub fn is_supported(code: &str) -> bool {
    language_name(code).is_some()
}

/// Whether two codes name the same language, ignoring case and whitespace
pub fn same_language(a: &str, b: &str) -> bool {
    normalize_code(a) == normalize_code(b)
}

/// Normalize a list of requested target codes
///
/// Unknown codes are kept; the provider decides whether they are valid.
/// Duplicates are dropped, first occurrence wins.
pub fn normalize_targets<I, S>(codes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut targets: Vec<String> = Vec::new();
    for code in codes {
        let code = normalize_code(code.as_ref());
        if code.is_empty() || targets.contains(&code) {
            continue;
        }
        if !is_supported(&code) {
            warn!("Unknown target language code {}, passing it through", code);
        }
        targets.push(code);
    }
    targets
}
