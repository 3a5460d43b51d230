use serde::Serialize;

const CONFIG_EXTENSIONS: &[&str] = &[
    ".config", ".cfg", ".conf", ".ini", ".yaml", ".yml", ".toml", ".json", ".xml",
];
const CONFIG_STEMS: &[&str] = &["config", "configuration", "settings"];
const ENV_PATTERNS: &[&str] = &[".env", "environment", "env"];

/// Visual tag for notable files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileTag {
    Config,
    Env,
}

impl FileTag {
    pub fn css_class(&self) -> &'static str {
        match self {
            FileTag::Config => "config-file",
            FileTag::Env => "env-file",
        }
    }
}

/// Tags for a file name
pub fn tags(file_name: &str) -> Vec<FileTag> {
    let mut tags = Vec::new();
    if is_config_file(file_name) {
        tags.push(FileTag::Config);
    }
    if is_env_file(file_name) {
        tags.push(FileTag::Env);
    }
    tags
}

pub fn is_config_file(file_name: &str) -> bool {
    let Some(dot) = file_name.rfind('.') else {
        return false;
    };
    let extension = file_name[dot..].to_lowercase();
    let stem = file_name[..dot].to_lowercase();

    CONFIG_EXTENSIONS.contains(&extension.as_str())
        || CONFIG_STEMS.iter().any(|name| stem.contains(name))
}

pub fn is_env_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    ENV_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}
