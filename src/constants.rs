pub const SITE_NAME: &str = "drikpanchang.com";

pub const BASE_URL: &str = "https://www.drikpanchang.com/panchang/month-panchang.html";

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; PanchangCrawler/1.0; +https://example.com)";

pub(crate) const WHITESPACE_RUN: &str = r"\s+";

pub(crate) const SUNRISE_PATTERNS: &[&str] = &[r"(?i)Sunrise\s*([0-9: ]+[AP]M)"];
pub(crate) const SUNSET_PATTERNS: &[&str] = &[r"(?i)Sunset\s*([0-9: ]+[AP]M)"];
pub(crate) const MOONRISE_PATTERNS: &[&str] = &[r"(?i)Moonrise\s*([0-9: ]+[AP]M|No Moonrise)"];
pub(crate) const MOONSET_PATTERNS: &[&str] = &[r"(?i)Moonset\s*([0-9: ]+[AP]M|No Moonset)"];

// Label-adjacent captures over free-form page text; approximate on purpose.
pub(crate) const TITHI_PATTERNS: &[&str] = &[r"(?i)\bTithi\b.*?\b([A-Za-z ]+)\b"];
pub(crate) const NAKSHATRA_PATTERNS: &[&str] = &[r"(?i)\bNakshatra\b.*?\b([A-Za-z .]+)\b"];
pub(crate) const YOGA_PATTERNS: &[&str] = &[r"(?i)\bYoga\b.*?\b([A-Za-z .]+)\b"];
pub(crate) const KARANA_PATTERNS: &[&str] = &[r"(?i)\bKarana\b.*?\b([A-Za-z .]+)\b"];

pub(crate) const FESTIVAL_LABEL: &str = r"\bFestival\b\s*([A-Za-z0-9*().,' -]{3,80})";

pub(crate) const MAX_LABEL_WORDS: usize = 8;

pub(crate) const LABEL_REJECT_WORDS: &[&str] = &["sunrise", "sunset", "panchang"];

// One capitalized word of a candidate festival phrase.
pub(crate) const TITLE_WORD: &str = r"[A-Z][A-Za-z*()'.-]+";

pub(crate) const FESTIVAL_KEYWORDS: &[&str] = &[
    "Jayanti",
    "Ekadashi",
    "Amavasya",
    "Purnima",
    "Sankranti",
    "Navratri",
    "Chaturthi",
    "Ashtami",
    "Dussehra",
    "Diwali",
    "Holi",
    "Rakhi",
    "Raksha",
    "Shivaratri",
    "Janmashtami",
    "Rathyatra",
    "Chhath",
    "Teej",
    "Grahan",
    "Puja",
    "Vrat",
];

pub(crate) const OBSERVANCE_KEYWORDS: &[&str] = &[
    "ekadashi",
    "amavas",
    "amavasya",
    "purnima",
    "sankranti",
    "grahan",
    "jayanti",
    "navratri",
    "chaturthi",
    "ashtami",
    "dwadashi",
    "trayodashi",
    "chaturdashi",
    "vrat",
    "puja",
];
