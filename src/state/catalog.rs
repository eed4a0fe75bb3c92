//! Static lookup tables for the builder and factory forms.

pub const PROJECT_TYPES: &[(&str, &str)] = &[
    ("webapp", "Web Application"),
    ("api", "API Service"),
    ("mobile", "Mobile App"),
    ("desktop", "Desktop App"),
    ("game", "Game"),
    ("ai", "AI/ML Project"),
];

pub const LANGUAGES: &[&str] = &["python", "javascript", "typescript", "rust", "go", "java"];

pub const PROVIDERS: &[&str] = &["auto", "openai", "llama", "claude", "local"];

pub const FACTORY_FUNCTIONS: &[&str] = &[
    "authentication",
    "data-processing",
    "file-handling",
    "api-integration",
    "reporting",
    "scheduling",
];

pub const FACTORY_INTERFACES: &[&str] = &["web", "cli", "rest-api", "websocket"];

pub const FACTORY_FEATURES: &[&str] = &[
    "logging",
    "caching",
    "rate-limiting",
    "notifications",
    "search",
    "export",
];

pub const DATABASE_TYPES: &[&str] = &["sqlite", "postgres", "mysql", "mongodb", "none"];

pub const PERFORMANCE_LEVELS: &[&str] = &["basic", "standard", "optimized"];

/// Tech stacks available for a project type. Unknown types return `None`
/// so callers can leave the current options untouched.
pub fn stacks_for(project_type: &str) -> Option<&'static [&'static str]> {
    match project_type {
        "webapp" => Some(&["react", "vue", "angular", "svelte"]),
        "api" => Some(&["flask", "fastapi", "express", "django"]),
        "mobile" => Some(&["react-native", "flutter", "ionic"]),
        "desktop" => Some(&["electron", "tauri", "qt"]),
        "game" => Some(&["unity", "godot", "phaser"]),
        "ai" => Some(&["pytorch", "tensorflow", "scikit-learn"]),
        _ => None,
    }
}
