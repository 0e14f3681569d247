//! Contracts for whatever draws a [`RenderPlan`].

use std::sync::{Arc, Mutex, MutexGuard};

use crate::display::{Color, Element, RenderPlan};
use crate::effects::Burst;

/// A display that shows a title and a list of elements.
pub trait DisplaySurface {
    fn set_title(&mut self, text: &str, color: Color);
    fn clear_list(&mut self);
    fn append_item(&mut self, element: &Element);

    /// Called once every element of a plan has been appended.
    fn flush(&mut self) {}
}

/// Receiver of decorative confetti bursts.
pub trait EffectSink {
    fn burst(&mut self, burst: &Burst);
}

/// Sink that drops every burst.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEffects;

impl EffectSink for NoEffects {
    fn burst(&mut self, _burst: &Burst) {}
}

/// A surface shared between tasks, e.g. the refresh loop and the drizzle.
impl<T: DisplaySurface + ?Sized> DisplaySurface for Arc<Mutex<T>> {
    fn set_title(&mut self, text: &str, color: Color) {
        lock(self).set_title(text, color);
    }

    fn clear_list(&mut self) {
        lock(self).clear_list();
    }

    fn append_item(&mut self, element: &Element) {
        lock(self).append_item(element);
    }

    fn flush(&mut self) {
        lock(self).flush();
    }
}

impl<T: EffectSink + ?Sized> EffectSink for Arc<Mutex<T>> {
    fn burst(&mut self, burst: &Burst) {
        lock(self).burst(burst);
    }
}

/// Lock, ignoring poisoning.
fn lock<T: ?Sized>(shared: &Mutex<T>) -> MutexGuard<'_, T> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Draw `plan`, replacing whatever the surface showed before.
pub fn present<S, E>(plan: &RenderPlan, surface: &mut S, effects: &mut E)
where
    S: DisplaySurface + ?Sized,
    E: EffectSink + ?Sized,
{
    surface.set_title(&plan.title, plan.color);
    surface.clear_list();
    for element in &plan.elements {
        surface.append_item(element);
    }
    surface.flush();

    for burst in &plan.effects {
        effects.burst(burst);
    }
}
