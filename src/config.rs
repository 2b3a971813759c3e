//! User configuration: keybindings and display settings.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/relview/config.toml` (default `~/.config/relview/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const DEFAULT_DOUBLE_CLICK_MS: u64 = 250;
const DEFAULT_EXPAND_DEPTH: usize = 1;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    Expand,
    Collapse,
    SwitchFocus,
    FollowRelation,
    Back,
    Reload,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::Expand,
        Action::Collapse,
        Action::SwitchFocus,
        Action::FollowRelation,
        Action::Back,
        Action::Reload,
        Action::Help,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveUp => "Move Up",
            Action::MoveDown => "Move Down",
            Action::Expand => "Expand",
            Action::Collapse => "Collapse / Parent",
            Action::SwitchFocus => "Tree ⇄ Relations",
            Action::FollowRelation => "Follow Relation",
            Action::Back => "Back",
            Action::Reload => "Reload Document",
            Action::Help => "Help",
            Action::Quit => "Quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "move_up" => Some(Action::MoveUp),
            "move_down" => Some(Action::MoveDown),
            "expand" => Some(Action::Expand),
            "collapse" => Some(Action::Collapse),
            "switch_focus" => Some(Action::SwitchFocus),
            "follow_relation" => Some(Action::FollowRelation),
            "back" => Some(Action::Back),
            "reload" => Some(Action::Reload),
            "help" => Some(Action::Help),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Text shown in the help popup and status bar, e.g. `Ctrl+c` or `↑`.
    pub fn display(&self) -> String {
        let mut out: String = MODIFIER_NAMES
            .iter()
            .filter(|(_, m)| self.modifiers.contains(*m))
            .map(|(name, _)| format!("{name}+"))
            .collect();
        match self.code {
            KeyCode::Char(' ') => out.push_str("Space"),
            KeyCode::Char(c) => out.push(c),
            KeyCode::F(n) => out.push_str(&format!("F{n}")),
            code => match NAMED_KEYS.iter().find(|k| k.code == code) {
                Some(k) => out.push_str(k.label),
                None => out.push_str(&format!("{code:?}")),
            },
        }
        out
    }

    /// Parse a binding written as `[Mod+]...Key`, e.g. `Ctrl+c` or `enter`.
    /// Letters are case-sensitive; named keys and modifiers are not.
    fn parse(s: &str) -> Option<Self> {
        let (key, mods) = s.rsplit_once('+').map_or((s, ""), |(m, k)| (k, m));

        let mut modifiers = KeyModifiers::NONE;
        for part in mods.split('+').filter(|p| !p.is_empty()) {
            let (_, m) = MODIFIER_NAMES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(part))?;
            modifiers |= *m;
        }

        let lower = key.to_ascii_lowercase();
        let code = if let Some(k) = NAMED_KEYS.iter().find(|k| k.names.contains(&lower.as_str())) {
            k.code
        } else if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse().ok()) {
            KeyCode::F(n)
        } else {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        };

        Some(Self::new(code, modifiers))
    }
}

const MODIFIER_NAMES: &[(&str, KeyModifiers)] = &[
    ("Ctrl", KeyModifiers::CONTROL),
    ("Alt", KeyModifiers::ALT),
    ("Shift", KeyModifiers::SHIFT),
];

/// Non-character keys: accepted config spellings and display label.
struct NamedKey {
    code: KeyCode,
    names: &'static [&'static str],
    label: &'static str,
}

const NAMED_KEYS: &[NamedKey] = &[
    NamedKey { code: KeyCode::Up, names: &["up"], label: "↑" },
    NamedKey { code: KeyCode::Down, names: &["down"], label: "↓" },
    NamedKey { code: KeyCode::Left, names: &["left"], label: "←" },
    NamedKey { code: KeyCode::Right, names: &["right"], label: "→" },
    NamedKey { code: KeyCode::Enter, names: &["enter", "return"], label: "Enter" },
    NamedKey { code: KeyCode::Esc, names: &["esc", "escape"], label: "Esc" },
    NamedKey { code: KeyCode::Tab, names: &["tab"], label: "Tab" },
    NamedKey { code: KeyCode::Backspace, names: &["backspace", "bksp"], label: "Bksp" },
    NamedKey { code: KeyCode::Home, names: &["home"], label: "Home" },
    NamedKey { code: KeyCode::End, names: &["end"], label: "End" },
    NamedKey { code: KeyCode::Char(' '), names: &["space"], label: "Space" },
];

// ───────────────────────────────────────── config ────────────

/// Application configuration: keybindings and display settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Double-click detection window for expanding tree rows with the mouse.
    pub double_click_ms: u64,
    /// How many levels of the tree start expanded.
    pub expand_depth: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            expand_depth: DEFAULT_EXPAND_DEPTH,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Expand, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(Collapse, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(SwitchFocus, vec![KeyBind::new(Tab, n)]);
        m.insert(FollowRelation, vec![KeyBind::new(Enter, n)]);
        m.insert(Back, vec![KeyBind::new(Backspace, n), KeyBind::new(Char('b'), n)]);
        m.insert(Reload, vec![KeyBind::new(Char('r'), n)]);
        m.insert(Help, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Action bound to `event`.  If several bindings match, the one with
    /// more modifiers wins, so `Ctrl+b` beats a bare `b`.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, bind)| bind.matches(event))
            .max_by_key(|(_, bind)| bind.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// Every binding of `action`, slash-separated (`↑/k`).
    pub fn display_bindings(&self, action: Action) -> String {
        let binds = self.bindings.get(&action).map(Vec::as_slice).unwrap_or_default();
        if binds.is_empty() {
            return "unbound".into();
        }
        binds.iter().map(KeyBind::display).collect::<Vec<_>>().join("/")
    }

    /// One-line key hint for the status bar, using each action's first binding.
    pub fn status_bar_hint(&self) -> String {
        let first = |action: Action| {
            self.bindings
                .get(&action)
                .and_then(|b| b.first())
                .map_or_else(|| "?".to_string(), KeyBind::display)
        };
        [
            (Action::MoveUp, "navigate"),
            (Action::Expand, "expand"),
            (Action::SwitchFocus, "relations"),
            (Action::FollowRelation, "follow"),
            (Action::Back, "back"),
            (Action::Reload, "reload"),
            (Action::Help, "help"),
        ]
        .iter()
        .map(|&(action, what)| format!("{}: {what}", first(action)))
        .collect::<Vec<_>>()
        .join(" | ")
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Self::parse(&contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read config, using defaults");
                Self::default()
            }
        }
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "double_click_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        // Keep this bounded for predictable UX.
                        config.double_click_ms = v.clamp(100, 2000);
                    }
                    continue;
                }
                "expand_depth" => {
                    if let Ok(v) = value.parse::<usize>() {
                        config.expand_depth = v;
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "ignoring unknown config key");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/relview/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("relview").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_cover_every_action() {
        let config = AppConfig::default();
        for &action in Action::ALL {
            assert_ne!(config.display_bindings(action), "unbound", "{action:?}");
        }
        assert_eq!(config.match_key(key(KeyCode::Enter)), Some(Action::FollowRelation));
        assert_eq!(config.match_key(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn parses_overrides_and_ignores_junk() {
        let config = AppConfig::parse(
            "# comment\n\
             [section]\n\
             follow_relation = Space, Ctrl+o\n\
             back = Nope+x\n\
             double_click_ms = 5\n\
             expand_depth = 3\n\
             mystery = q\n",
        );

        assert_eq!(config.match_key(key(KeyCode::Char(' '))), Some(Action::FollowRelation));
        assert_eq!(
            config.match_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL)),
            Some(Action::FollowRelation)
        );
        // Unparseable bindings leave the default in place.
        assert_eq!(config.match_key(key(KeyCode::Backspace)), Some(Action::Back));
        assert_eq!(config.double_click_ms, 100);
        assert_eq!(config.expand_depth, 3);
    }

    #[test]
    fn key_strings_parse_and_display() {
        let bind = KeyBind::parse("alt+UP").unwrap();
        assert_eq!(bind, KeyBind::new(KeyCode::Up, KeyModifiers::ALT));
        assert_eq!(bind.display(), "Alt+↑");
        assert_eq!(KeyBind::parse("F5").unwrap().code, KeyCode::F(5));
        assert_eq!(KeyBind::parse("Q").unwrap().code, KeyCode::Char('Q'));
        assert!(KeyBind::parse("pgup").is_none());
    }

    #[test]
    fn status_hint_uses_first_binding() {
        let hint = AppConfig::default().status_bar_hint();
        assert!(hint.starts_with("↑: navigate"));
        assert!(hint.contains("Tab: relations"));
    }
}
