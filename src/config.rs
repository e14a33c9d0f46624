use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use cross_xdg::BaseDirs;
use nu_ansi_term::Color;

/// Colors for stderr diagnostics and the shell's syntax highlighter.
#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub error: Color,
    pub warning: Color,

    pub op_move: Color,   // '>' and '<'
    pub op_data: Color,   // '+' and '-'
    pub op_io: Color,     // '.' and ','
    pub op_loop: Color,   // '[' and ']'
    pub op_other: Color,
}

impl Default for Colors {
    fn default() -> Self {
        // Catppuccin Mocha accents
        Self {
            error: Color::Rgb(243, 139, 168),
            warning: Color::Rgb(249, 226, 175),

            op_move: Color::Rgb(137, 220, 235),
            op_data: Color::Rgb(166, 227, 161),
            op_io: Color::Rgb(250, 179, 135),
            op_loop: Color::Rgb(203, 166, 247),
            op_other: Color::Rgb(108, 112, 134),
        }
    }
}

/// Settings read from `bf.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Prompt shown by the shell before each line.
    pub prompt: String,
    /// Trace every instruction unless overridden on the command line.
    pub debug: bool,
    /// Step budget per execution call.
    pub max_steps: Option<usize>,
    pub colors: Colors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "- ".to_string(),
            debug: false,
            max_steps: None,
            colors: Colors::default(),
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| load().unwrap_or_default())
}

/// Step limit from `BF_MAX_STEPS`, if set and numeric.
pub fn env_max_steps() -> Option<usize> {
    env::var("BF_MAX_STEPS").ok().and_then(|s| s.trim().parse::<usize>().ok())
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("BF_CONFIG") {
        return Some(PathBuf::from(path));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

fn load() -> Option<Config> {
    let content = fs::read_to_string(config_path()?).ok()?;
    Some(parse(&content))
}

fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        return None;
    }

    let name = s.to_ascii_lowercase();
    Some(match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "purple" | "magenta" => Color::Purple,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "darkgray" | "dark_gray" => Color::DarkGray,
        "lightred" | "light_red" => Color::LightRed,
        "lightgreen" | "light_green" => Color::LightGreen,
        "lightblue" | "light_blue" => Color::LightBlue,
        "lightpurple" | "light_purple" | "lightmagenta" | "light_magenta" => Color::LightPurple,
        "lightcyan" | "light_cyan" => Color::LightCyan,
        _ => return None,
    })
}

/// Parse the small TOML subset we accept: `[section]` headers and
/// `key = value` pairs, with optional double quotes around values.
/// Unknown keys and malformed values fall back to defaults.
pub fn parse(content: &str) -> Config {
    let mut section = String::new();
    let mut map: HashMap<(String, String), String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len() - 1].trim().to_string();
            continue;
        }
        if let Some(eq) = line.find('=') {
            let key = line[..eq].trim().to_string();
            let val_raw = line[eq + 1..].trim();
            let val = if val_raw.starts_with('"') && val_raw.ends_with('"') && val_raw.len() >= 2 {
                val_raw[1..val_raw.len() - 1].to_string()
            } else {
                val_raw.to_string()
            };
            map.insert((section.clone(), key), val);
        }
    }

    let get = |section: &str, key: &str| map.get(&(section.to_string(), key.to_string()));
    let mut cfg = Config::default();

    if let Some(prompt) = get("shell", "prompt") {
        cfg.prompt = prompt.clone();
    }
    if let Some(debug) = get("run", "debug").and_then(|v| v.parse::<bool>().ok()) {
        cfg.debug = debug;
    }
    if let Some(steps) = get("run", "max_steps").and_then(|v| v.parse::<usize>().ok()) {
        cfg.max_steps = Some(steps);
    }

    macro_rules! set {
        ($field:ident) => {
            if let Some(v) = get("colors", stringify!($field)).and_then(|s| parse_color(s)) {
                cfg.colors.$field = v;
            }
        };
    }

    set!(error);
    set!(warning);
    set!(op_move);
    set!(op_data);
    set!(op_io);
    set!(op_loop);
    set!(op_other);

    cfg
}
