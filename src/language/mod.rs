//! Language identification and routing to model locale tags.
//!
//! Detection produces short codes in the style of `en`, `tr`, `zh-cn`. The router maps them
//! onto the locale tags understood by the summarization model through an explicit table, since
//! the mapping is arbitrary per model. Anything the table does not know, and any detection
//! failure, falls back to [`DEFAULT_LANGUAGE_TAG`].

use std::sync::Arc;
use thiserror::Error;

/// Locale tag used when detection fails or the detected language is not mapped.
pub const DEFAULT_LANGUAGE_TAG: &str = "en_XX";

const LANGUAGE_TAGS: &[(&str, &str)] = &[
    ("en", "en_XX"),
    ("tr", "tr_TR"),
    ("fr", "fr_XX"),
    ("de", "de_DE"),
    ("es", "es_XX"),
    ("it", "it_IT"),
    ("ru", "ru_RU"),
    ("ar", "ar_AR"),
    ("zh-cn", "zh_CN"),
    ("pt", "pt_XX"),
    ("nl", "nl_XX"),
    ("ja", "ja_XX"),
    ("ko", "ko_KR"),
    ("hi", "hi_IN"),
    ("ur", "ur_PK"),
    ("fa", "fa_IR"),
    ("bn", "bn_IN"),
    ("vi", "vi_VN"),
    ("th", "th_TH"),
    ("id", "id_ID"),
    ("ms", "ms_MY"),
    ("sw", "sw_KE"),
    ("ha", "ha_NG"),
    ("pl", "pl_PL"),
    ("uk", "uk_UA"),
    ("ro", "ro_RO"),
    ("cs", "cs_CZ"),
    ("hu", "hu_HU"),
    ("fi", "fi_FI"),
    ("sv", "sv_SE"),
    ("da", "da_DK"),
    ("no", "no_NO"),
    ("el", "el_GR"),
    ("bg", "bg_BG"),
    ("sr", "sr_RS"),
    ("sk", "sk_SK"),
    ("sl", "sl_SI"),
    ("et", "et_EE"),
    ("lv", "lv_LV"),
    ("lt", "lt_LT"),
    ("hr", "hr_HR"),
    ("ca", "ca_ES"),
    ("eu", "eu_ES"),
    ("gl", "gl_ES"),
    ("af", "af_ZA"),
    ("am", "am_ET"),
    ("az", "az_AZ"),
    ("be", "be_BY"),
    ("gu", "gu_IN"),
    ("is", "is_IS"),
    ("ka", "ka_GE"),
    ("km", "km_KH"),
    ("lo", "lo_LA"),
    ("mk", "mk_MK"),
    ("ml", "ml_IN"),
    ("mn", "mn_MN"),
    ("my", "my_MM"),
    ("ne", "ne_NP"),
    ("om", "om_ET"),
    ("ps", "ps_AF"),
    ("so", "so_SO"),
    ("sq", "sq_AL"),
    ("ta", "ta_IN"),
    ("te", "te_IN"),
    ("ti", "ti_ET"),
    ("ug", "ug_CN"),
    ("uz", "uz_UZ"),
    ("xh", "xh_ZA"),
    ("yi", "yi_US"),
    ("yo", "yo_NG"),
    ("zu", "zu_ZA"),
];

/// `whatlang` reports ISO 639-3 codes; the routing table is keyed by the shorter codes.
const WHATLANG_CODES: &[(&str, &str)] = &[
    ("afr", "af"),
    ("aka", "ak"),
    ("amh", "am"),
    ("ara", "ar"),
    ("aze", "az"),
    ("bel", "be"),
    ("ben", "bn"),
    ("bul", "bg"),
    ("cat", "ca"),
    ("ces", "cs"),
    ("cmn", "zh-cn"),
    ("dan", "da"),
    ("deu", "de"),
    ("ell", "el"),
    ("eng", "en"),
    ("epo", "eo"),
    ("est", "et"),
    ("fin", "fi"),
    ("fra", "fr"),
    ("guj", "gu"),
    ("heb", "he"),
    ("hin", "hi"),
    ("hrv", "hr"),
    ("hun", "hu"),
    ("hye", "hy"),
    ("ind", "id"),
    ("ita", "it"),
    ("jav", "jv"),
    ("jpn", "ja"),
    ("kan", "kn"),
    ("kat", "ka"),
    ("khm", "km"),
    ("kor", "ko"),
    ("lat", "la"),
    ("lav", "lv"),
    ("lit", "lt"),
    ("mal", "ml"),
    ("mar", "mr"),
    ("mkd", "mk"),
    ("mya", "my"),
    ("nep", "ne"),
    ("nld", "nl"),
    ("nob", "no"),
    ("ori", "or"),
    ("pan", "pa"),
    ("pes", "fa"),
    ("pol", "pl"),
    ("por", "pt"),
    ("ron", "ro"),
    ("rus", "ru"),
    ("sin", "si"),
    ("slk", "sk"),
    ("slv", "sl"),
    ("sna", "sn"),
    ("spa", "es"),
    ("srp", "sr"),
    ("swe", "sv"),
    ("tam", "ta"),
    ("tel", "te"),
    ("tgl", "tl"),
    ("tha", "th"),
    ("tuk", "tk"),
    ("tur", "tr"),
    ("ukr", "uk"),
    ("urd", "ur"),
    ("uzb", "uz"),
    ("vie", "vi"),
    ("yid", "yi"),
    ("zul", "zu"),
];

/// Errors raised by language identification.
#[derive(Debug, Error)]
pub enum LanguageDetectionError {
    /// Input carried no usable signal (empty, digits, symbols).
    #[error("no language could be detected in the input")]
    Undetectable,
    /// The detector recognized a language it has no short code for.
    #[error("detected language '{0}' has no short code")]
    UnknownCode(String),
}

/// Language identification capability.
pub trait LanguageDetector: Send + Sync {
    /// Return the short code of the dominant language in `text`.
    fn detect(&self, text: &str) -> Result<String, LanguageDetectionError>;
}

/// Detector backed by the `whatlang` trigram models.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String, LanguageDetectionError> {
        let info = whatlang::detect(text).ok_or(LanguageDetectionError::Undetectable)?;
        let code = info.lang().code();
        tracing::trace!(
            code,
            confidence = info.confidence(),
            reliable = info.is_reliable(),
            "Detected language"
        );
        WHATLANG_CODES
            .iter()
            .find(|(long, _)| *long == code)
            .map(|(_, short)| (*short).to_string())
            .ok_or_else(|| LanguageDetectionError::UnknownCode(code.to_string()))
    }
}

/// Look up the model locale tag for a detected short code.
pub fn map_language_code(code: &str) -> Option<&'static str> {
    let normalized = code.trim().to_lowercase();
    LANGUAGE_TAGS
        .iter()
        .find(|(short, _)| *short == normalized)
        .map(|(_, tag)| *tag)
}

/// Detects a chunk's language and maps it to the summarization model's locale tag.
#[derive(Clone)]
pub struct LanguageRouter {
    detector: Arc<dyn LanguageDetector>,
}

impl LanguageRouter {
    /// Build a router around an explicit detector.
    pub fn new(detector: Arc<dyn LanguageDetector>) -> Self {
        Self { detector }
    }

    /// Detect the language of `text` and return the mapped locale tag.
    ///
    /// Never fails: detection errors and unmapped codes resolve to [`DEFAULT_LANGUAGE_TAG`].
    pub fn detect_and_map(&self, text: &str) -> &'static str {
        match self.detector.detect(text) {
            Ok(code) => map_language_code(&code).unwrap_or_else(|| {
                tracing::debug!(code = %code, "No locale tag for detected language; using default");
                DEFAULT_LANGUAGE_TAG
            }),
            Err(error) => {
                tracing::debug!(error = %error, "Language detection failed; using default");
                DEFAULT_LANGUAGE_TAG
            }
        }
    }
}

impl Default for LanguageRouter {
    fn default() -> Self {
        Self::new(Arc::new(WhatlangDetector))
    }
}
