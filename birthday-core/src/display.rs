//! Turning match results into a declarative render plan.
//!
//! Nothing here touches a real display. A [`RenderPlan`] says what the
//! title, list and confetti should look like; [`crate::surface::present`]
//! hands it to whatever surface draws it.

use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::birthday::{BirthdayEntry, MatchSets};
use crate::effects::{self, Burst};
use crate::error::BoardError;
use crate::layout::{Layout, entry_label, layout_month};

pub const TODAY_COLOR: Color = Color::from_hex(0xe63946);
pub const MONTH_COLOR: Color = Color::from_hex(0x00b4d8);
pub const ERROR_COLOR: Color = Color::from_hex(0xff6b6b);

pub const TODAY_TITLE: &str = "Happy Birthday!";
pub const ERROR_TITLE: &str = "Unable to Load Birthdays";
pub const EMPTY_MONTH_MESSAGE: &str = "No birthdays this month!";

const TODAY_STAGGER_MS: u64 = 300;
const MONTH_STAGGER_MS: u64 = 100;
const CROWDED_FONT_REM: f32 = 2.3;

/// 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_hex(rgb: u32) -> Self {
        Color {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Presentation hints attached to a list element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleTag {
    BirthdayName,
    Monthly,
    BounceIn,
    FadeInUp,
    Italic,
    Dimmed,
    Faint,
    ThreeColumns,
    ManyBirthdays,
}

/// One line of text in the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSpec {
    pub text: String,
    /// `None` leaves the surface's default size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_rem: Option<f32>,
    /// Entrance animation delay, used to stagger items.
    pub delay_ms: u64,
    pub tags: Vec<StyleTag>,
}

impl ItemSpec {
    fn new(text: impl Into<String>) -> Self {
        ItemSpec {
            text: text.into(),
            font_size_rem: None,
            delay_ms: 0,
            tags: Vec::new(),
        }
    }

    fn sized(mut self, rem: f32) -> Self {
        self.font_size_rem = Some(rem);
        self
    }

    fn delayed(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    fn tagged(mut self, tags: &[StyleTag]) -> Self {
        self.tags.extend_from_slice(tags);
        self
    }
}

/// Something appended to the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Item(ItemSpec),
    Grid {
        columns: Vec<Vec<ItemSpec>>,
        tags: Vec<StyleTag>,
    },
}

/// Everything a surface needs to draw one cycle's result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub title: String,
    pub color: Color,
    pub elements: Vec<Element>,
    pub effects: Vec<Burst>,
}

/// Which of the two views a cycle shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayMode {
    Today(Vec<String>),
    Month(Layout),
}

/// Today's birthdays win; the month view is only shown when nobody
/// celebrates today.
pub fn select_display_mode(today: &[String], month: &[BirthdayEntry]) -> DisplayMode {
    if !today.is_empty() {
        return DisplayMode::Today(today.to_vec());
    }

    let mut sorted = month.to_vec();
    sorted.sort_by_key(|e| e.day);
    DisplayMode::Month(layout_month(&sorted))
}

impl DisplayMode {
    pub fn from_matches(sets: &MatchSets) -> Self {
        select_display_mode(&sets.today, &sets.month)
    }

    /// Build the render plan. `reference` names the month in the title.
    pub fn plan(&self, reference: NaiveDate) -> RenderPlan {
        match self {
            DisplayMode::Today(names) => today_plan(names),
            DisplayMode::Month(layout) => month_plan(layout, reference),
        }
    }
}

/// Render plan for a cycle that produced match sets.
pub fn plan_for(sets: &MatchSets, reference: NaiveDate) -> RenderPlan {
    DisplayMode::from_matches(sets).plan(reference)
}

fn today_plan(names: &[String]) -> RenderPlan {
    let multiplier = if names.len() == 1 { 2.0 } else { 1.99 };

    let elements = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Element::Item(
                ItemSpec::new(name.as_str())
                    .sized(name_font_size(name) * multiplier)
                    .delayed(i as u64 * TODAY_STAGGER_MS)
                    .tagged(&[StyleTag::BirthdayName, StyleTag::BounceIn]),
            )
        })
        .collect();

    RenderPlan {
        title: TODAY_TITLE.to_string(),
        color: TODAY_COLOR,
        elements,
        effects: effects::celebration(),
    }
}

/// Base size for a celebrated name; long names get smaller text.
fn name_font_size(name: &str) -> f32 {
    match name.chars().count() {
        n if n > 15 => 1.8,
        n if n > 10 => 2.2,
        _ => 2.8,
    }
}

fn month_plan(layout: &Layout, reference: NaiveDate) -> RenderPlan {
    let title = reference.format("%B Birthdays").to_string();

    let (elements, effects) = match layout {
        Layout::Placeholder => (
            vec![Element::Item(
                ItemSpec::new(EMPTY_MONTH_MESSAGE).tagged(&[StyleTag::Italic, StyleTag::Dimmed]),
            )],
            Vec::new(),
        ),
        Layout::Grid(columns) => {
            let crowded = layout.is_crowded();
            let mut index = 0u64;
            let mut grid = Vec::with_capacity(columns.len());
            for column in columns {
                let mut items = Vec::with_capacity(column.len());
                for entry in column {
                    let mut item = ItemSpec::new(entry_label(entry))
                        .delayed(index * MONTH_STAGGER_MS)
                        .tagged(&[StyleTag::BirthdayName, StyleTag::Monthly, StyleTag::FadeInUp]);
                    if crowded {
                        item = item.sized(CROWDED_FONT_REM);
                    }
                    items.push(item);
                    index += 1;
                }
                grid.push(items);
            }

            let mut tags = Vec::new();
            if layout.column_count() == 3 {
                tags.push(StyleTag::ThreeColumns);
            }
            if crowded {
                tags.push(StyleTag::ManyBirthdays);
            }

            (
                vec![Element::Grid { columns: grid, tags }],
                vec![effects::monthly()],
            )
        }
    };

    RenderPlan {
        title,
        color: MONTH_COLOR,
        elements,
        effects,
    }
}

/// Render plan shown when a cycle fails.
pub fn error_plan(error: &BoardError) -> RenderPlan {
    let message = match error {
        BoardError::Network(_) => {
            "Cannot access the spreadsheet. Please check the sharing settings.".to_string()
        }
        BoardError::Schema { .. } => format!("Spreadsheet format error: {error}"),
        BoardError::EmptyData => "The spreadsheet appears to be empty.".to_string(),
        other => format!("Error: {other}"),
    };

    RenderPlan {
        title: ERROR_TITLE.to_string(),
        color: ERROR_COLOR,
        elements: vec![
            Element::Item(
                ItemSpec::new(message)
                    .sized(1.5)
                    .tagged(&[StyleTag::Italic, StyleTag::Dimmed]),
            ),
            Element::Item(
                ItemSpec::new("Check the log for detailed error information.")
                    .sized(1.0)
                    .tagged(&[StyleTag::Faint]),
            ),
        ],
        effects: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, day: u32) -> BirthdayEntry {
        BirthdayEntry {
            name: name.to_string(),
            day,
        }
    }

    fn june_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn item_texts(plan: &RenderPlan) -> Vec<String> {
        plan.elements
            .iter()
            .flat_map(|element| match element {
                Element::Item(item) => vec![item.text.clone()],
                Element::Grid { columns, .. } => columns
                    .iter()
                    .flatten()
                    .map(|item| item.text.clone())
                    .collect(),
            })
            .collect()
    }

    #[test]
    fn test_today_takes_priority_over_month() {
        let mode = select_display_mode(&["Alice".to_string()], &[entry("Bob", 2)]);
        assert_eq!(mode, DisplayMode::Today(vec!["Alice".to_string()]));
    }

    #[test]
    fn test_month_mode_sorts_by_day() {
        let mode = select_display_mode(&[], &[entry("Alice", 15), entry("Bob", 2)]);
        assert_eq!(
            mode,
            DisplayMode::Month(Layout::Grid(vec![vec![entry("Bob", 2)], vec![entry("Alice", 15)]]))
        );
    }

    #[test]
    fn test_today_plan() {
        let names = vec!["Ann".to_string(), "Bartholomew Jones".to_string()];
        let plan = DisplayMode::Today(names).plan(june_15());

        assert_eq!(plan.title, TODAY_TITLE);
        assert_eq!(plan.color, TODAY_COLOR);
        assert_eq!(plan.effects.len(), 3);

        let Element::Item(second) = &plan.elements[1] else {
            panic!("expected item");
        };
        assert_eq!(second.delay_ms, 300);
        assert_eq!(second.font_size_rem, Some(1.8 * 1.99));
        assert_eq!(second.tags, vec![StyleTag::BirthdayName, StyleTag::BounceIn]);
    }

    #[test]
    fn test_single_name_is_doubled() {
        let plan = DisplayMode::Today(vec!["Ann".to_string()]).plan(june_15());
        let Element::Item(item) = &plan.elements[0] else {
            panic!("expected item");
        };
        assert_eq!(item.font_size_rem, Some(2.8 * 2.0));
    }

    #[test]
    fn test_name_font_size_steps() {
        assert_eq!(name_font_size("Ten chars!"), 2.8);
        assert_eq!(name_font_size("Eleven char"), 2.2);
        assert_eq!(name_font_size("Sixteen chars!!!"), 1.8);
    }

    #[test]
    fn test_empty_month_plan_shows_placeholder() {
        let plan = plan_for(&MatchSets::default(), june_15());

        assert_eq!(plan.title, "June Birthdays");
        assert_eq!(plan.color, MONTH_COLOR);
        assert_eq!(item_texts(&plan), vec![EMPTY_MONTH_MESSAGE]);
        assert!(plan.effects.is_empty());
    }

    #[test]
    fn test_month_plan_labels_and_staggers_in_day_order() {
        let sets = MatchSets {
            today: vec![],
            month: vec![entry("Alice", 15), entry("Bob", 2), entry("Cleo", 21)],
        };

        let plan = plan_for(&sets, june_15());

        assert_eq!(
            item_texts(&plan),
            vec!["Bob — 2nd", "Alice — 15th", "Cleo — 21st"]
        );
        let Element::Grid { columns, tags } = &plan.elements[0] else {
            panic!("expected grid");
        };
        assert!(tags.is_empty());
        assert_eq!(columns[1][0].delay_ms, 200);
        assert_eq!(columns[0][0].font_size_rem, None);
        assert_eq!(plan.effects.len(), 1);
    }

    #[test]
    fn test_crowded_month_plan_is_tagged_and_shrunk() {
        let month: Vec<_> = (1..=19).map(|d| entry(&format!("P{d}"), d)).collect();
        let plan = plan_for(&MatchSets { today: vec![], month }, june_15());

        let Element::Grid { columns, tags } = &plan.elements[0] else {
            panic!("expected grid");
        };
        assert_eq!(columns.len(), 3);
        assert_eq!(tags, &vec![StyleTag::ThreeColumns, StyleTag::ManyBirthdays]);
        assert_eq!(columns[2][0].font_size_rem, Some(CROWDED_FONT_REM));
    }

    #[test]
    fn test_error_plan_message_by_kind() {
        let texts = |e: BoardError| item_texts(&error_plan(&e))[0].clone();

        assert!(texts(BoardError::Network("HTTP 404".into())).contains("sharing settings"));
        assert_eq!(texts(BoardError::EmptyData), "The spreadsheet appears to be empty.");
        assert!(
            texts(BoardError::Schema {
                missing: vec!["Name".into()],
                available: vec!["Email".into()],
            })
            .starts_with("Spreadsheet format error: Required columns not found")
        );
        assert_eq!(
            texts(BoardError::Config("bad url".into())),
            "Error: Configuration error: bad url"
        );

        let plan = error_plan(&BoardError::EmptyData);
        assert_eq!(plan.title, ERROR_TITLE);
        assert_eq!(plan.color, ERROR_COLOR);
        assert_eq!(plan.elements.len(), 2);
    }

    #[test]
    fn test_color_displays_as_hex() {
        assert_eq!(TODAY_COLOR.to_string(), "#e63946");
        assert_eq!(Color::from_hex(0x000a0b).to_string(), "#000a0b");
    }
}
