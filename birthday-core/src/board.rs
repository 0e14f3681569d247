//! One refresh cycle: fetch, parse, match, plan, present.

use chrono::NaiveDate;
use tracing::{error, info};

use crate::birthday::MatchSets;
use crate::display::{RenderPlan, error_plan, plan_for};
use crate::error::BoardResult;
use crate::sheet::Sheet;
use crate::source::SheetSource;
use crate::surface::{DisplaySurface, EffectSink, present};

/// Result of a single refresh cycle.
#[derive(Debug)]
pub struct Cycle {
    pub reference: NaiveDate,
    pub result: BoardResult<MatchSets>,
}

impl Cycle {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }

    /// What the display should show for this cycle.
    pub fn plan(&self) -> RenderPlan {
        match &self.result {
            Ok(sets) => plan_for(sets, self.reference),
            Err(e) => error_plan(e),
        }
    }
}

pub struct Board<S> {
    source: S,
}

impl<S: SheetSource> Board<S> {
    pub fn new(source: S) -> Self {
        Board { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the sheet and match it against `reference`.
    pub async fn load(&self, reference: NaiveDate) -> BoardResult<MatchSets> {
        let text = self.source.fetch().await?;
        Sheet::parse(&text)?.select(reference)
    }

    /// Run one cycle. Errors are logged and kept in the returned [`Cycle`],
    /// never propagated.
    pub async fn run_cycle(&self, reference: NaiveDate) -> Cycle {
        info!(source = %self.source.describe(), %reference, "loading birthdays");

        let result = self.load(reference).await;
        match &result {
            Ok(sets) => info!(today = sets.today.len(), month = sets.month.len(), "birthdays loaded"),
            Err(e) => error!(kind = e.kind(), error = %e, "failed to load birthdays"),
        }

        Cycle { reference, result }
    }

    /// Run one cycle and draw its outcome, replacing the previous display.
    pub async fn refresh<D, E>(&self, reference: NaiveDate, surface: &mut D, effects: &mut E) -> Cycle
    where
        D: DisplaySurface + ?Sized,
        E: EffectSink + ?Sized,
    {
        let cycle = self.run_cycle(reference).await;
        present(&cycle.plan(), surface, effects);
        cycle
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::error::{BoardError, BoardResult};
    use crate::source::SheetSource;

    pub const JUNE_SHEET: &str = "Name,Birthday\nAlice,1990-06-15\nBob,1985-06-02\n";

    /// Source that replays queued responses, then serves [`JUNE_SHEET`].
    #[derive(Default)]
    pub struct ScriptedSource {
        responses: Mutex<VecDeque<BoardResult<String>>>,
        pub latency: Duration,
        pub calls: AtomicUsize,
        in_flight: AtomicUsize,
        pub max_in_flight: AtomicUsize,
    }

    impl ScriptedSource {
        pub fn with(responses: Vec<BoardResult<String>>) -> Self {
            ScriptedSource {
                responses: Mutex::new(responses.into()),
                ..Default::default()
            }
        }

        pub fn failing(times: usize) -> Self {
            Self::with(
                (0..times)
                    .map(|_| Err(BoardError::Network("status: 503".into())))
                    .collect(),
            )
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SheetSource for ScriptedSource {
        async fn fetch(&self) -> BoardResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            let next = self.responses.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(JUNE_SHEET.to_string()))
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{JUNE_SHEET, ScriptedSource};
    use super::*;
    use crate::display::{ERROR_TITLE, Element, TODAY_TITLE};
    use crate::error::BoardError;
    use crate::surface::testing::Recorder;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_load_matches_fetched_sheet() {
        let board = Board::new(ScriptedSource::with(vec![Ok(JUNE_SHEET.to_string())]));

        let sets = board.load(date(6, 15)).await.unwrap();

        assert_eq!(sets.today, vec!["Alice"]);
        assert_eq!(sets.month.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_draws_today_view() {
        let board = Board::new(ScriptedSource::default());
        let mut surface = Recorder::default();
        let mut effects = Recorder::default();

        let cycle = board.refresh(date(6, 15), &mut surface, &mut effects).await;

        assert!(!cycle.is_failure());
        assert_eq!(surface.title.as_ref().unwrap().0, TODAY_TITLE);
        assert_eq!(surface.elements.len(), 1);
        assert_eq!(effects.bursts.len(), 3);
    }

    #[tokio::test]
    async fn test_refresh_draws_month_view_when_nobody_celebrates_today() {
        let board = Board::new(ScriptedSource::default());
        let mut surface = Recorder::default();
        let mut effects = Recorder::default();

        board.refresh(date(6, 1), &mut surface, &mut effects).await;

        assert_eq!(surface.title.as_ref().unwrap().0, "June Birthdays");
        assert!(matches!(surface.elements[0], Element::Grid { .. }));
    }

    #[tokio::test]
    async fn test_failures_become_error_view() {
        let responses = vec![
            Err(BoardError::Network("status: 404".into())),
            Ok("Name,Birthday".to_string()),
            Ok("Who,When\nAlice,1990-06-15".to_string()),
        ];
        let board = Board::new(ScriptedSource::with(responses));

        for expected in ["network", "empty", "schema"] {
            let mut surface = Recorder::default();
            let mut effects = Recorder::default();

            let cycle = board.refresh(date(6, 15), &mut surface, &mut effects).await;

            assert_eq!(cycle.result.as_ref().unwrap_err().kind(), expected);
            assert_eq!(surface.title.as_ref().unwrap().0, ERROR_TITLE);
            assert!(effects.bursts.is_empty());
        }
    }

    #[tokio::test]
    async fn test_sheet_of_only_bad_rows_is_an_empty_month() {
        let board = Board::new(ScriptedSource::with(vec![Ok(
            "Name,Birthday\n,1990-06-15\nZoe,1990-6\n".to_string(),
        )]));

        let cycle = board.run_cycle(date(6, 15)).await;

        assert_eq!(cycle.result.as_ref().unwrap(), &MatchSets::default());
        assert_eq!(cycle.plan().title, "June Birthdays");
    }
}
