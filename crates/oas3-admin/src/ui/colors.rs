use std::io::IsTerminal;

use clap::{
  ValueEnum,
  builder::styling::{Color as ClapColor, RgbColor, Style, Styles},
};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// What a piece of terminal output means; each role maps to one color per theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  Timestamp,
  Primary,
  Accent,
  Success,
  Label,
  Value,
  Muted,
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
  Color::Rgb { r, g, b }
}

const fn palette(theme: Theme, role: Role) -> Color {
  match (theme, role) {
    (Theme::Dark, Role::Timestamp | Role::Muted) => rgb(128, 150, 160),
    (Theme::Dark, Role::Primary) => rgb(96, 165, 250),
    (Theme::Dark, Role::Accent) => rgb(244, 114, 94),
    (Theme::Dark, Role::Success) => rgb(74, 222, 128),
    (Theme::Dark, Role::Label) => rgb(192, 168, 255),
    (Theme::Dark, Role::Value) => rgb(250, 204, 21),
    (Theme::Light, Role::Timestamp | Role::Muted) => rgb(90, 100, 110),
    (Theme::Light, Role::Primary) => rgb(29, 78, 216),
    (Theme::Light, Role::Accent) => rgb(190, 40, 30),
    (Theme::Light, Role::Success) => rgb(21, 128, 61),
    (Theme::Light, Role::Label) => rgb(109, 40, 217),
    (Theme::Light, Role::Value) => rgb(161, 98, 7),
  }
}

pub struct Colors {
  enabled: bool,
  theme: Theme,
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  /// The color for `role`, or [`Color::Reset`] when colors are disabled.
  pub const fn get(&self, role: Role) -> Color {
    if self.enabled {
      palette(self.theme, role)
    } else {
      Color::Reset
    }
  }

  /// Palette entries are all RGB, so anything else means colors are off.
  pub const fn comfy(&self, role: Role) -> ComfyColor {
    match self.get(role) {
      Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
      _ => ComfyColor::Reset,
    }
  }

  pub const fn timestamp(&self) -> Color {
    self.get(Role::Timestamp)
  }

  pub const fn primary(&self) -> Color {
    self.get(Role::Primary)
  }

  pub const fn accent(&self) -> Color {
    self.get(Role::Accent)
  }

  pub const fn success(&self) -> Color {
    self.get(Role::Success)
  }

  pub const fn label(&self) -> Color {
    self.get(Role::Label)
  }

  pub const fn value(&self) -> Color {
    self.get(Role::Value)
  }

  pub const fn muted(&self) -> Color {
    self.get(Role::Muted)
  }

  const fn to_clap(color: Color) -> Option<ClapColor> {
    match color {
      Color::Rgb { r, g, b } => Some(ClapColor::Rgb(RgbColor(r, g, b))),
      _ => None,
    }
  }

  /// Help output styles, always using the dark palette.
  pub const fn clap_styles() -> Styles {
    let colors = Self::new(true, Theme::Dark);

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(Self::to_clap(colors.label())))
      .usage(Style::new().bold().fg_color(Self::to_clap(colors.label())))
      .literal(Style::new().fg_color(Self::to_clap(colors.success())))
      .placeholder(Style::new().fg_color(Self::to_clap(colors.primary())))
      .error(Style::new().bold().fg_color(Self::to_clap(colors.accent())))
      .valid(Style::new().fg_color(Self::to_clap(colors.success())))
      .invalid(Style::new().bold().fg_color(Self::to_clap(colors.accent())))
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()).unwrap_or(Theme::Dark),
  }
}

/// Reads the background slot of `COLORFGBG` (`"15;0"` is light text on black).
fn theme_from_colorfgbg(value: Option<&str>) -> Option<Theme> {
  let background = value?.split(';').next_back()?.parse::<u8>().ok()?;
  Some(if background >= 8 { Theme::Light } else { Theme::Dark })
}
