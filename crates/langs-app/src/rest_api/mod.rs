pub mod language;

pub const LANGUAGES_PATH: &str = "/api/v1/languages";
