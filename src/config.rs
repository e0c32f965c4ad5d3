/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or incomplete.
/// Command-line flags are applied on top by `main`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub general: GeneralConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    pub gate_open_ticks: u32,      // raise button, short press
    pub gate_forever_ticks: u32,   // scripted or crushed buttons
    pub float_ticks: u32,
    pub flash_ticks: u32,
    pub dying_ticks: u32,
    pub chomper_period_ms: u64,
    pub easy_attack_ms: u64,
    pub hard_attack_ms: u64,
    pub boss_attack_ms: u64,
    pub loose_wobble_ticks: u32,
    pub mouse_delay_ticks: u32,
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    /// Directory holding one sub-directory of text levels per game.
    pub games_dir: PathBuf,
    pub game: String,
    pub archive: PathBuf,
    pub start_level: u8,
    pub start_lives: u32,
    pub cheats: bool,
    pub log_file: PathBuf,
}

impl GeneralConfig {
    /// Directory of the selected game's text levels.
    pub fn game_dir(&self) -> PathBuf {
        self.games_dir.join(&self.game)
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_gate_open")]
    gate_open_ticks: u32,
    #[serde(default = "default_gate_forever")]
    gate_forever_ticks: u32,
    #[serde(default = "default_float")]
    float_ticks: u32,
    #[serde(default = "default_flash")]
    flash_ticks: u32,
    #[serde(default = "default_dying")]
    dying_ticks: u32,
    #[serde(default = "default_chomper_period")]
    chomper_period_ms: u64,
    #[serde(default = "default_easy_attack")]
    easy_attack_ms: u64,
    #[serde(default = "default_hard_attack")]
    hard_attack_ms: u64,
    #[serde(default = "default_boss_attack")]
    boss_attack_ms: u64,
    #[serde(default = "default_loose_wobble")]
    loose_wobble_ticks: u32,
    #[serde(default = "default_mouse_delay")]
    mouse_delay_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_games_dir")]
    games_dir: String,
    #[serde(default = "default_game")]
    game: String,
    #[serde(default = "default_archive")]
    archive: String,
    #[serde(default = "default_start_level")]
    start_level: u8,
    #[serde(default = "default_start_lives")]
    start_lives: u32,
    #[serde(default)]
    cheats: bool,
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 80 }
fn default_gate_open() -> u32 { 125 }       // 10s at 80ms
fn default_gate_forever() -> u32 { 45000 }  // one hour
fn default_float() -> u32 { 50 }
fn default_flash() -> u32 { 25 }
fn default_dying() -> u32 { 12 }            // ~1s
fn default_chomper_period() -> u64 { 1000 }
fn default_easy_attack() -> u64 { 500 }
fn default_hard_attack() -> u64 { 250 }
fn default_boss_attack() -> u64 { 200 }
fn default_loose_wobble() -> u32 { 2 }
fn default_mouse_delay() -> u32 { 150 }

fn default_games_dir() -> String { "games".into() }
fn default_game() -> String { "LEVELS.DAT".into() }
fn default_archive() -> String { "LEVELS.DAT".into() }
fn default_start_level() -> u8 { 1 }
fn default_start_lives() -> u32 { 3 }
fn default_log_file() -> String { "punyprince.log".into() }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            gate_open_ticks: default_gate_open(),
            gate_forever_ticks: default_gate_forever(),
            float_ticks: default_float(),
            flash_ticks: default_flash(),
            dying_ticks: default_dying(),
            chomper_period_ms: default_chomper_period(),
            easy_attack_ms: default_easy_attack(),
            hard_attack_ms: default_hard_attack(),
            boss_attack_ms: default_boss_attack(),
            loose_wobble_ticks: default_loose_wobble(),
            mouse_delay_ticks: default_mouse_delay(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            games_dir: default_games_dir(),
            game: default_game(),
            archive: default_archive(),
            start_level: default_start_level(),
            start_lives: default_start_lives(),
            cheats: false,
            log_file: default_log_file(),
        }
    }
}

impl From<TomlSpeed> for SpeedConfig {
    fn from(t: TomlSpeed) -> Self {
        SpeedConfig {
            // A zero period would divide by zero in the cadence clocks.
            tick_rate_ms: t.tick_rate_ms.max(1),
            gate_open_ticks: t.gate_open_ticks,
            gate_forever_ticks: t.gate_forever_ticks,
            float_ticks: t.float_ticks,
            flash_ticks: t.flash_ticks,
            dying_ticks: t.dying_ticks,
            chomper_period_ms: t.chomper_period_ms.max(1),
            easy_attack_ms: t.easy_attack_ms.max(1),
            hard_attack_ms: t.hard_attack_ms.max(1),
            boss_attack_ms: t.boss_attack_ms.max(1),
            loose_wobble_ticks: t.loose_wobble_ticks,
            mouse_delay_ticks: t.mouse_delay_ticks,
        }
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        TomlSpeed::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::resolve(toml_cfg, &search_dirs)
    }

    /// Parse a config document without touching the filesystem.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::resolve(toml_cfg, &[]))
    }

    fn resolve(cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let general = cfg.general;
        GameConfig {
            speed: cfg.speed.into(),
            general: GeneralConfig {
                games_dir: locate(&general.games_dir, search_dirs, Path::is_dir),
                game: general.game,
                archive: locate(&general.archive, search_dirs, Path::is_file),
                start_level: general.start_level,
                start_lives: general.start_lives.max(1),
                cheats: general.cheats,
                log_file: PathBuf::from(general.log_file),
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::resolve(TomlConfig::default(), &[])
    }
}

/// Resolve a relative path against the search dirs; the first existing
/// match wins, otherwise it stays relative to the CWD.
fn locate(name: &str, search_dirs: &[PathBuf], exists: fn(&Path) -> bool) -> PathBuf {
    let path = PathBuf::from(name);
    if path.is_absolute() {
        return path;
    }
    search_dirs
        .iter()
        .map(|d| d.join(name))
        .find(|p| exists(p))
        .unwrap_or(path)
}

/// Candidate directories to search: exe dir + CWD + user data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/punyprince");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.speed, SpeedConfig::default());
        assert_eq!(cfg.speed.tick_rate_ms, 80);
        assert_eq!(cfg.speed.gate_open_ticks, 125);
        assert_eq!(cfg.general.start_lives, 3);
        assert!(!cfg.general.cheats);
        assert_eq!(cfg.general.game_dir(), PathBuf::from("games").join("LEVELS.DAT"));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[speed]\nfloat_ticks = 90\nchomper_period_ms = 0\n\n[general]\ncheats = true\ngame = \"custom\"\n",
        )
        .unwrap();
        assert_eq!(cfg.speed.float_ticks, 90);
        assert_eq!(cfg.speed.chomper_period_ms, 1, "zero periods are clamped");
        assert_eq!(cfg.speed.boss_attack_ms, 200);
        assert!(cfg.general.cheats);
        assert_eq!(cfg.general.game, "custom");
        assert_eq!(cfg.general.start_level, 1);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::from_toml_str("[speed]\ntick_rate_ms = \"fast\"\n").is_err());
    }
}
