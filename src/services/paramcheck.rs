//! Allow-lists for values passed through to cppcheck.

const STANDARDS: &[&str] = &["posix", "c89", "c99", "c11", "c++03", "c++11"];
const PLATFORMS: &[&str] = &["unix32", "unix64", "win32A", "win32W", "win64", "native"];
const LANGUAGES: &[&str] = &["c", "c++"];

pub fn is_valid_standard(standard: &str) -> bool {
    STANDARDS.contains(&standard)
}

pub fn is_valid_platform(platform: &str) -> bool {
    PLATFORMS.contains(&platform)
}

pub fn is_valid_language(language: &str) -> bool {
    LANGUAGES.contains(&language)
}
