// Service endpoints
pub const BASE_URL: &str = "https://agenda-lgo.de/api";
pub const AUTH_PATH: &str = "/auth";
pub const DOCUMENT_LIST_PATH: &str = "/me/e";

// Fixed request headers expected by the service
pub const ORIGIN: &str = "https://agenda-lgo.de";
pub const USER_AGENT: &str = "LGO-Downloader 0.1";
pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

// Login form field names
pub const EMAIL_FIELD: &str = "eml";
pub const PASSWORD_FIELD: &str = "pwd";

// Defaults
pub const DEFAULT_AUTH_FILE: &str = ".auth";
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DOCUMENT_EXTENSION: &str = "pdf";
pub const PARTIAL_SUFFIX: &str = "part";

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// Collision policy aliases
pub const OVERWRITE_ALIASES: &[&str] = &["overwrite", "replace"];
pub const FAIL_ALIASES: &[&str] = &["fail", "error"];
pub const SUFFIX_ALIASES: &[&str] = &["suffix", "disambiguate"];
