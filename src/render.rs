//! Terminal drawing of render plans.
//!
//! Extension traits give core plan types a colored terminal form; [`Screen`]
//! is the [`DisplaySurface`] and [`EffectSink`] the commands draw on.

use std::io::{self, Write};

use birthday_core::display::{Color, Element, ItemSpec, StyleTag};
use birthday_core::effects::{Burst, PARTY_PALETTE};
use birthday_core::surface::{DisplaySurface, EffectSink};
use owo_colors::OwoColorize;

/// Gap between grid columns.
const COLUMN_GAP: usize = 4;

/// Width of a line of terminal confetti.
const CONFETTI_WIDTH: usize = 60;

const CONFETTI_GLYPHS: [char; 6] = ['*', '+', '.', 'o', '~', '\''];

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for ItemSpec {
    fn render(&self) -> String {
        let mut text = self.text.clone();
        if self.tags.contains(&StyleTag::BounceIn) {
            text = text.bold().to_string();
        }
        if self.tags.contains(&StyleTag::Italic) {
            text = text.italic().to_string();
        }
        if self.tags.contains(&StyleTag::Dimmed) || self.tags.contains(&StyleTag::Faint) {
            text = text.dimmed().to_string();
        }
        text
    }
}

impl Render for Element {
    fn render(&self) -> String {
        match self {
            Element::Item(item) => format!("  {}", item.render()),
            Element::Grid { columns, .. } => render_grid(columns),
        }
    }
}

/// Lay grid columns out side by side.
fn render_grid(columns: &[Vec<ItemSpec>]) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .map(|column| column.iter().map(|item| item.text.chars().count()).max().unwrap_or(0))
        .collect();
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(rows);
    for row in 0..rows {
        let mut line = String::from("  ");
        for (column, width) in columns.iter().zip(&widths) {
            let Some(item) = column.get(row) else {
                line.push_str(&" ".repeat(width + COLUMN_GAP));
                continue;
            };
            let padding = width - item.text.chars().count() + COLUMN_GAP;
            line.push_str(&item.render());
            line.push_str(&" ".repeat(padding));
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

impl Render for Burst {
    /// One line of confetti centred on the burst's origin.
    fn render(&self) -> String {
        let palette: &[Color] = if self.palette.is_empty() {
            &PARTY_PALETTE
        } else {
            &self.palette
        };

        let count = (self.particles as usize / 8).clamp(1, CONFETTI_WIDTH);
        let reach = ((self.spread / 360.0) * CONFETTI_WIDTH as f32).max(4.0) as usize;
        let centre = (self.origin.x.clamp(0.0, 1.0) * (CONFETTI_WIDTH - 1) as f32) as usize;

        let mut cells: Vec<Option<(char, Color)>> = vec![None; CONFETTI_WIDTH];
        for i in 0..count {
            let offset = (i * 7919) % reach;
            let pos = (centre + offset).saturating_sub(reach / 2).min(CONFETTI_WIDTH - 1);
            let glyph = CONFETTI_GLYPHS[(i * 31) % CONFETTI_GLYPHS.len()];
            cells[pos] = Some((glyph, palette[i % palette.len()]));
        }

        cells
            .into_iter()
            .map(|cell| match cell {
                Some((glyph, c)) => glyph.truecolor(c.r, c.g, c.b).to_string(),
                None => " ".to_string(),
            })
            .collect::<String>()
            .trim_end()
            .to_string()
    }
}

/// Terminal display.
///
/// An inline screen prints each plan below whatever is already on the
/// terminal; a live screen clears and redraws in place, keeping a line of
/// confetti above the title. Between the first surface call of a plan and its
/// flush the frame is half built, so confetti only redraws outside that window.
#[derive(Debug, Default)]
pub struct Screen {
    live: bool,
    title: Option<(String, Color)>,
    elements: Vec<Element>,
    confetti: String,
    staging: bool,
    draws: usize,
}

impl Screen {
    pub fn inline() -> Self {
        Screen::default()
    }

    pub fn live() -> Self {
        Screen {
            live: true,
            ..Screen::default()
        }
    }

    /// Everything below the confetti line.
    pub fn body(&self) -> String {
        let mut lines = Vec::new();
        if let Some((title, c)) = &self.title {
            lines.push(title.truecolor(c.r, c.g, c.b).bold().to_string());
            lines.push(String::new());
        }
        lines.extend(self.elements.iter().map(Render::render));
        lines.join("\n")
    }

    fn draw(&mut self) -> io::Result<()> {
        self.draws += 1;
        let mut out = io::stdout().lock();
        if self.live {
            // Clear screen, cursor home.
            write!(out, "\x1B[2J\x1B[H")?;
            writeln!(out, "{}", self.confetti)?;
        }
        writeln!(out, "{}", self.body())?;
        out.flush()
    }
}

impl DisplaySurface for Screen {
    fn set_title(&mut self, text: &str, color: Color) {
        self.staging = true;
        self.title = Some((text.to_string(), color));
    }

    fn clear_list(&mut self) {
        self.staging = true;
        self.elements.clear();
    }

    fn append_item(&mut self, element: &Element) {
        self.staging = true;
        self.elements.push(element.clone());
    }

    fn flush(&mut self) {
        self.staging = false;
        if let Err(e) = self.draw() {
            tracing::warn!(error = %e, "could not draw to terminal");
        }
    }
}

impl EffectSink for Screen {
    fn burst(&mut self, burst: &Burst) {
        self.confetti = burst.render();

        let result = if self.live {
            if self.staging {
                // Shown with the frame on the next flush.
                return;
            }
            self.draw()
        } else {
            writeln!(io::stdout(), "{}", self.confetti)
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "could not draw confetti");
        }
    }
}
